use super::NodeId;

/// Which input molecules a scaffold was derived from.
///
/// `origins` lists the identities of every input molecule whose hierarchy contains
/// the scaffold. `non_virtual` lists those whose own scaffold *is* this scaffold,
/// as opposed to reaching it only through ring removal. Both lists keep insertion
/// order and never hold duplicates; a non-virtual origin is always an origin too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origins {
    origins: Vec<String>,
    non_virtual: Vec<String>,
}

impl Origins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_origin_smiles(&mut self, smiles: impl Into<String>) {
        let smiles = smiles.into();
        if !self.origins.contains(&smiles) {
            self.origins.push(smiles);
        }
    }

    pub fn add_non_virtual_origin_smiles(&mut self, smiles: impl Into<String>) {
        let smiles = smiles.into();
        self.add_origin_smiles(smiles.clone());
        if !self.non_virtual.contains(&smiles) {
            self.non_virtual.push(smiles);
        }
    }

    /// Folds another origin record into this one.
    pub fn merge(&mut self, other: &Origins) {
        for smiles in &other.origins {
            self.add_origin_smiles(smiles.as_str());
        }
        for smiles in &other.non_virtual {
            self.add_non_virtual_origin_smiles(smiles.as_str());
        }
    }

    pub fn origin_count(&self) -> usize {
        self.origins.len()
    }

    pub fn non_virtual_origin_count(&self) -> usize {
        self.non_virtual.len()
    }

    pub fn origin_smiles_list(&self) -> &[String] {
        &self.origins
    }

    pub fn non_virtual_origin_smiles_list(&self) -> &[String] {
        &self.non_virtual
    }

    pub fn has_non_virtual_origin_smiles(&self) -> bool {
        !self.non_virtual.is_empty()
    }
}

/// Read access shared by tree and network nodes.
///
/// Parents are the smaller scaffolds a node was reduced to; children are the larger
/// scaffolds it was derived from. A node without parents is an orphan and sits on
/// level 0; any other node sits one level above its highest parent.
pub trait ScaffoldNode {
    type Molecule;

    fn molecule(&self) -> &Self::Molecule;

    /// Canonical identity of the molecule.
    fn identity(&self) -> &str;

    fn parents(&self) -> &[NodeId];

    fn children(&self) -> &[NodeId];

    fn level(&self) -> usize;

    fn origins(&self) -> &Origins;

    fn is_orphan(&self) -> bool {
        self.parents().is_empty()
    }

    fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    fn origin_count(&self) -> usize {
        self.origins().origin_count()
    }

    fn non_virtual_origin_count(&self) -> usize {
        self.origins().non_virtual_origin_count()
    }

    fn origin_smiles_list(&self) -> &[String] {
        self.origins().origin_smiles_list()
    }

    fn non_virtual_origin_smiles_list(&self) -> &[String] {
        self.origins().non_virtual_origin_smiles_list()
    }

    fn has_non_virtual_origin_smiles(&self) -> bool {
        self.origins().has_non_virtual_origin_smiles()
    }
}

/// Mutation hooks used by the graphs; not part of the public node API.
pub(crate) trait NodeLinks: ScaffoldNode {
    fn set_level(&mut self, level: usize);
    fn push_child(&mut self, child: NodeId);
    fn origins_mut(&mut self) -> &mut Origins;
}

/// Fields common to both node variants.
#[derive(Debug, Clone)]
struct NodeData<M> {
    molecule: M,
    identity: String,
    children: Vec<NodeId>,
    level: usize,
    origins: Origins,
}

impl<M> NodeData<M> {
    fn new(molecule: M, identity: String) -> Self {
        Self {
            molecule,
            identity,
            children: Vec::new(),
            level: 0,
            origins: Origins::new(),
        }
    }

    fn push_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }
}

/// A scaffold tree node: at most one parent, assigned once.
#[derive(Debug, Clone)]
pub struct TreeNode<M> {
    data: NodeData<M>,
    parent: Option<NodeId>,
}

impl<M> TreeNode<M> {
    pub(crate) fn new(molecule: M, identity: String) -> Self {
        Self {
            data: NodeData::new(molecule, identity),
            parent: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }
}

impl<M> ScaffoldNode for TreeNode<M> {
    type Molecule = M;

    fn molecule(&self) -> &M {
        &self.data.molecule
    }
    fn identity(&self) -> &str {
        &self.data.identity
    }
    fn parents(&self) -> &[NodeId] {
        self.parent.as_slice()
    }
    fn children(&self) -> &[NodeId] {
        &self.data.children
    }
    fn level(&self) -> usize {
        self.data.level
    }
    fn origins(&self) -> &Origins {
        &self.data.origins
    }
}

impl<M> NodeLinks for TreeNode<M> {
    fn set_level(&mut self, level: usize) {
        self.data.level = level;
    }
    fn push_child(&mut self, child: NodeId) {
        self.data.push_child(child);
    }
    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.data.origins
    }
}

/// A scaffold network node: any number of parents.
#[derive(Debug, Clone)]
pub struct NetworkNode<M> {
    data: NodeData<M>,
    parents: Vec<NodeId>,
}

impl<M> NetworkNode<M> {
    pub(crate) fn new(molecule: M, identity: String) -> Self {
        Self {
            data: NodeData::new(molecule, identity),
            parents: Vec::new(),
        }
    }

    /// Adds a parent; returns `false` if it was already present.
    pub(crate) fn add_parent(&mut self, parent: NodeId) -> bool {
        if self.parents.contains(&parent) {
            return false;
        }
        self.parents.push(parent);
        true
    }
}

impl<M> ScaffoldNode for NetworkNode<M> {
    type Molecule = M;

    fn molecule(&self) -> &M {
        &self.data.molecule
    }
    fn identity(&self) -> &str {
        &self.data.identity
    }
    fn parents(&self) -> &[NodeId] {
        &self.parents
    }
    fn children(&self) -> &[NodeId] {
        &self.data.children
    }
    fn level(&self) -> usize {
        self.data.level
    }
    fn origins(&self) -> &Origins {
        &self.data.origins
    }
}

impl<M> NodeLinks for NetworkNode<M> {
    fn set_level(&mut self, level: usize) {
        self.data.level = level;
    }
    fn push_child(&mut self, child: NodeId) {
        self.data.push_child(child);
    }
    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.data.origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_deduplicate_and_keep_order() {
        let mut origins = Origins::new();
        origins.add_origin_smiles("CCO");
        origins.add_origin_smiles("c1ccccc1");
        origins.add_origin_smiles("CCO");

        assert_eq!(origins.origin_smiles_list(), ["CCO", "c1ccccc1"]);
        assert!(!origins.has_non_virtual_origin_smiles());
    }

    #[test]
    fn non_virtual_origins_are_also_origins() {
        let mut origins = Origins::new();
        origins.add_non_virtual_origin_smiles("c1ccccc1");

        assert_eq!(origins.origin_count(), 1);
        assert_eq!(origins.non_virtual_origin_count(), 1);
        assert!(origins.has_non_virtual_origin_smiles());
    }

    #[test]
    fn merge_unions_both_lists() {
        let mut first = Origins::new();
        first.add_origin_smiles("A");
        let mut second = Origins::new();
        second.add_origin_smiles("B");
        second.add_non_virtual_origin_smiles("A");

        first.merge(&second);
        assert_eq!(first.origin_smiles_list(), ["A", "B"]);
        assert_eq!(first.non_virtual_origin_smiles_list(), ["A"]);
    }

    #[test]
    fn new_nodes_are_orphan_leaves_on_level_zero() {
        let tree_node = TreeNode::new((), "C1CC1".to_string());
        assert!(tree_node.is_orphan());
        assert!(tree_node.is_leaf());
        assert_eq!(tree_node.level(), 0);
        assert_eq!(tree_node.parent(), None);

        let mut network_node = NetworkNode::new((), "C1CC1".to_string());
        assert!(network_node.is_orphan());
        assert!(network_node.add_parent(NodeId::default()));
        assert!(!network_node.add_parent(NodeId::default()));
        assert_eq!(network_node.parents().len(), 1);
    }
}
