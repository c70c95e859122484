use super::matrix::MatrixView;
use super::node::{NetworkNode, NodeLinks, Origins, ScaffoldNode};
use super::store::NodeStore;
use super::{GraphError, IdentityFn, NodeId, ScaffoldGraph};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// A scaffold network: nodes may have several parents and several roots.
#[derive(Clone)]
pub struct ScaffoldNetwork<M> {
    store: NodeStore<NetworkNode<M>>,
    identity: IdentityFn<M>,
}

impl<M> fmt::Debug for ScaffoldNetwork<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaffoldNetwork")
            .field("node_count", &self.store.order().len())
            .finish_non_exhaustive()
    }
}

impl<M> ScaffoldNetwork<M> {
    /// Creates an empty network that identifies molecules with `identity`.
    pub fn new(identity: IdentityFn<M>) -> Self {
        Self {
            store: NodeStore::default(),
            identity,
        }
    }

    fn require(&self, id: NodeId) -> Result<&NetworkNode<M>, GraphError> {
        self.store
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(format!("{id:?}")))
    }

    fn require_mut(&mut self, id: NodeId) -> Result<&mut NetworkNode<M>, GraphError> {
        self.store
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(format!("{id:?}")))
    }

    /// Adds a molecule, or returns the node that already holds its identity.
    pub fn add_node(&mut self, molecule: M) -> Result<NodeId, GraphError> {
        let identity = (self.identity)(&molecule);
        match self.store.find(&identity) {
            Some(existing) => Ok(existing),
            None => self.store.insert(NetworkNode::new(molecule, identity)),
        }
    }

    /// Adds a molecule (or reuses its node) and links it below `parent`.
    pub fn add_child(&mut self, parent: NodeId, molecule: M) -> Result<NodeId, GraphError> {
        self.require(parent)?;
        let child = self.add_node(molecule)?;
        self.add_edge(parent, child)?;
        Ok(child)
    }

    /// Links `child` below `parent`; an existing link is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] when the link would close a cycle.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.require(parent)?;
        self.require(child)?;
        if self.is_ancestor(child, parent) {
            return Err(GraphError::InvalidArgument(
                "a node can not become its own ancestor".to_string(),
            ));
        }
        if !self.require_mut(child)?.add_parent(parent) {
            return Ok(());
        }
        self.require_mut(parent)?.push_child(child);
        self.store.invalidate();
        self.store.propagate_levels(child);
        Ok(())
    }

    /// Whether `candidate` is `node` or one of its ancestors.
    fn is_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue = VecDeque::from([node]);
        while let Some(current) = queue.pop_front() {
            if current == candidate {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(n) = self.store.get(current) {
                queue.extend(n.parents().iter().copied());
            }
        }
        false
    }

    /// Folds new information into the node with identity `identity`.
    ///
    /// Adds `new_parent` as a parent when given and not yet linked, and unions the
    /// origins.
    pub fn merge_node(
        &mut self,
        identity: &str,
        new_parent: Option<NodeId>,
        origins: &Origins,
    ) -> Result<NodeId, GraphError> {
        let id = self
            .store
            .find(identity)
            .ok_or_else(|| GraphError::NodeNotFound(identity.to_string()))?;
        if let Some(parent) = new_parent {
            self.add_edge(parent, id)?;
        }
        self.merge_origins(id, origins)?;
        Ok(id)
    }

    /// All orphan nodes in insertion order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.store
            .order()
            .iter()
            .copied()
            .filter(|&id| self.store.get(id).is_some_and(|n| n.is_orphan()))
            .collect()
    }

    pub fn add_origin_smiles(&mut self, id: NodeId, smiles: &str) -> Result<(), GraphError> {
        self.require_mut(id)?.origins_mut().add_origin_smiles(smiles);
        Ok(())
    }

    pub fn add_non_virtual_origin_smiles(&mut self, id: NodeId, smiles: &str) -> Result<(), GraphError> {
        self.require_mut(id)?
            .origins_mut()
            .add_non_virtual_origin_smiles(smiles);
        Ok(())
    }

    pub fn merge_origins(&mut self, id: NodeId, origins: &Origins) -> Result<(), GraphError> {
        self.require_mut(id)?.origins_mut().merge(origins);
        Ok(())
    }
}

impl<M: Clone> ScaffoldNetwork<M> {
    /// Folds every node, edge and origin of another network into this one.
    pub fn merge_network(&mut self, other: &ScaffoldNetwork<M>) -> Result<(), GraphError> {
        let mut mapping: HashMap<NodeId, NodeId> = HashMap::new();
        for &other_id in other.store.order() {
            let other_node = other.require(other_id)?;
            let own_id = self.add_node(other_node.molecule().clone())?;
            self.merge_origins(own_id, other_node.origins())?;
            mapping.insert(other_id, own_id);
        }
        for &other_id in other.store.order() {
            let other_node = other.require(other_id)?;
            for parent in other_node.parents() {
                if let (Some(&own_parent), Some(&own_child)) =
                    (mapping.get(parent), mapping.get(&other_id))
                {
                    self.add_edge(own_parent, own_child)?;
                }
            }
        }
        Ok(())
    }
}

impl<M> ScaffoldGraph for ScaffoldNetwork<M> {
    type Molecule = M;
    type Node = NetworkNode<M>;

    fn node(&self, id: NodeId) -> Option<&NetworkNode<M>> {
        self.store.get(id)
    }

    fn node_order(&self) -> &[NodeId] {
        self.store.order()
    }

    fn find_identity(&self, identity: &str) -> Option<NodeId> {
        self.store.find(identity)
    }

    fn identity_of(&self, molecule: &M) -> String {
        (self.identity)(molecule)
    }

    fn matrix_view(&self) -> &MatrixView {
        self.store.matrix_view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn network() -> ScaffoldNetwork<String> {
        ScaffoldNetwork::new(Arc::new(|m: &String| m.clone()))
    }

    fn id(network: &ScaffoldNetwork<String>, name: &str) -> NodeId {
        network.find_identity(name).unwrap()
    }

    /// Two roots `R` and `S`, a shared child `A`, and `B` below `A`.
    fn diamond() -> ScaffoldNetwork<String> {
        let mut network = network();
        let r = network.add_node("R".to_string()).unwrap();
        let s = network.add_node("S".to_string()).unwrap();
        let a = network.add_child(r, "A".to_string()).unwrap();
        network.add_child(s, "A".to_string()).unwrap();
        network.add_child(a, "B".to_string()).unwrap();
        network
    }

    #[test]
    fn shared_children_are_stored_once() {
        let network = diamond();
        let a = id(&network, "A");

        assert_eq!(network.node_count(), 4);
        assert_eq!(network.node(a).unwrap().parents().len(), 2);
        assert_eq!(network.roots(), vec![id(&network, "R"), id(&network, "S")]);
        assert_eq!(network.node(id(&network, "R")).unwrap().children(), [a]);
    }

    #[test]
    fn levels_follow_the_highest_parent() {
        let mut network = diamond();
        let b = id(&network, "B");
        assert_eq!(network.node(b).unwrap().level(), 2);

        let c = network.add_child(b, "C".to_string()).unwrap();
        let r = id(&network, "R");
        network.add_edge(r, c).unwrap();
        assert_eq!(network.node(c).unwrap().level(), 3);
        assert_eq!(network.max_level(), 3);
        assert_eq!(network.all_nodes_on_level(0).len(), 2);
    }

    #[test]
    fn levels_propagate_when_a_parent_is_added_later() {
        let mut network = network();
        let a = network.add_node("A".to_string()).unwrap();
        let b = network.add_child(a, "B".to_string()).unwrap();
        let root = network.add_node("R".to_string()).unwrap();
        network.add_edge(root, a).unwrap();

        assert_eq!(network.node(a).unwrap().level(), 1);
        assert_eq!(network.node(b).unwrap().level(), 2);
    }

    #[test]
    fn repeated_edges_are_ignored_and_cycles_rejected() {
        let mut network = diamond();
        let (r, a) = (id(&network, "R"), id(&network, "A"));
        network.add_edge(r, a).unwrap();
        assert_eq!(network.node(a).unwrap().parents().len(), 2);

        let b = id(&network, "B");
        assert!(matches!(
            network.add_edge(b, r),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn merge_node_adds_parent_and_origins() {
        let mut network = network();
        let r = network.add_node("R".to_string()).unwrap();
        network.add_node("A".to_string()).unwrap();
        let mut origins = Origins::new();
        origins.add_non_virtual_origin_smiles("mol");

        let a = network.merge_node("A", Some(r), &origins).unwrap();
        assert_eq!(network.node(a).unwrap().parents(), [r]);
        assert_eq!(network.node(a).unwrap().non_virtual_origin_count(), 1);
        assert_eq!(
            network.merge_node("missing", None, &origins),
            Err(GraphError::NodeNotFound("missing".to_string()))
        );
    }

    #[test]
    fn empty_identity_is_invalid() {
        let mut network = network();
        assert!(matches!(
            network.add_node(String::new()),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn merged_networks_union_nodes_edges_and_origins() {
        let mut first = diamond();
        let mut second = network();
        let r = second.add_node("R".to_string()).unwrap();
        let c = second.add_child(r, "C".to_string()).unwrap();
        second.add_origin_smiles(c, "mol-c").unwrap();

        first.merge_network(&second).unwrap();
        assert_eq!(first.node_count(), 5);
        let c = id(&first, "C");
        assert_eq!(first.node(c).unwrap().parents(), [id(&first, "R")]);
        assert_eq!(first.node(c).unwrap().origin_count(), 1);
    }

    #[test]
    fn matrix_marks_every_parent_edge() {
        let network = diamond();
        let matrix = network.matrix();
        let index = |name: &str| network.node_number(id(&network, name)).unwrap();
        assert_eq!(matrix[(index("R"), index("A"))], 1);
        assert_eq!(matrix[(index("S"), index("A"))], 1);
        assert_eq!(matrix[(index("A"), index("B"))], 1);
        assert_eq!(matrix[(index("R"), index("S"))], 0);
        assert_eq!(matrix.iter().map(|&v| v as usize).sum::<usize>(), 6);
    }

    #[test]
    fn matrix_exports_as_csv() {
        let network = diamond();
        let mut buffer = Vec::new();
        network.write_matrix_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("R,S,A,B"));
        assert_eq!(lines.next(), Some("0,0,1,0"));
        assert_eq!(lines.count(), 3);
    }
}
