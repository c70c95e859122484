use super::matrix::MatrixView;
use super::node::{NodeLinks, Origins, ScaffoldNode, TreeNode};
use super::store::NodeStore;
use super::{GraphError, IdentityFn, NodeId, ScaffoldGraph};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::warn;

/// A scaffold tree: every node has at most one parent and a single root remains.
///
/// The root is the smallest scaffold; leaves are the scaffolds of the input
/// molecules. A parent, once set, can not be changed.
#[derive(Clone)]
pub struct ScaffoldTree<M> {
    store: NodeStore<TreeNode<M>>,
    identity: IdentityFn<M>,
}

impl<M> fmt::Debug for ScaffoldTree<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaffoldTree")
            .field("node_count", &self.store.order().len())
            .finish_non_exhaustive()
    }
}

impl<M> ScaffoldTree<M> {
    /// Creates an empty tree that identifies molecules with `identity`.
    pub fn new(identity: IdentityFn<M>) -> Self {
        Self {
            store: NodeStore::default(),
            identity,
        }
    }

    fn require(&self, id: NodeId) -> Result<&TreeNode<M>, GraphError> {
        self.store
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(format!("{id:?}")))
    }

    fn require_mut(&mut self, id: NodeId) -> Result<&mut TreeNode<M>, GraphError> {
        self.store
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(format!("{id:?}")))
    }

    /// Adds a molecule as a new node without parent.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] when the molecule has an empty identity
    /// and [`GraphError::DuplicateIdentity`] when the tree already holds it.
    pub fn add_node(&mut self, molecule: M) -> Result<NodeId, GraphError> {
        let identity = (self.identity)(&molecule);
        self.store.insert(TreeNode::new(molecule, identity))
    }

    /// Adds a molecule as a new child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, molecule: M) -> Result<NodeId, GraphError> {
        self.require(parent)?;
        let child = self.add_node(molecule)?;
        self.set_parent(child, parent)?;
        Ok(child)
    }

    /// Links an orphan node below `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ParentAlreadySet`] when `child` already has a parent and
    /// [`GraphError::InvalidArgument`] when the link would close a cycle.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), GraphError> {
        let child_node = self.require(child)?;
        if child_node.parent().is_some() {
            return Err(GraphError::ParentAlreadySet(child_node.identity().to_string()));
        }
        self.require(parent)?;

        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return Err(GraphError::InvalidArgument(
                    "a node can not become its own ancestor".to_string(),
                ));
            }
            ancestor = self.store.get(current).and_then(|n| n.parent());
        }

        self.require_mut(child)?.set_parent(parent);
        self.require_mut(parent)?.push_child(child);
        self.store.invalidate();
        self.store.propagate_levels(child);
        Ok(())
    }

    /// The single orphan node of the tree.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::RootNotSet`] for an empty tree and
    /// [`GraphError::AmbiguousRoot`] while more than one node has no parent.
    pub fn root(&self) -> Result<NodeId, GraphError> {
        let mut orphans = self
            .store
            .order()
            .iter()
            .copied()
            .filter(|&id| self.store.get(id).is_some_and(|n| n.is_orphan()));
        let root = orphans.next().ok_or(GraphError::RootNotSet)?;
        if orphans.next().is_some() {
            return Err(GraphError::AmbiguousRoot);
        }
        Ok(root)
    }

    pub fn root_node(&self) -> Result<&TreeNode<M>, GraphError> {
        self.require(self.root()?)
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

impl<M: Clone> ScaffoldTree<M> {
    /// Merges another tree whose root has the same identity into this one.
    ///
    /// Nodes of `other` missing here are added below the node matching their
    /// parent; origins of nodes present in both are folded together. An empty tree
    /// takes over the content of `other`. Returns `false`, changing nothing, when
    /// the roots differ or either tree has no single root.
    ///
    /// A node of `other` that can not be added here, because this tree identifies
    /// its molecule as one it already holds elsewhere, is skipped together with its
    /// descendants and reported with a warning.
    pub fn merge_tree(&mut self, other: &ScaffoldTree<M>) -> bool {
        let Ok(other_root) = other.root() else {
            return false;
        };
        let Some(other_root_node) = other.store.get(other_root) else {
            return false;
        };
        if self.store.order().is_empty() && self.add_node(other_root_node.molecule().clone()).is_err() {
            return false;
        }
        let Ok(own_root) = self.root() else {
            return false;
        };
        if self.store.get(own_root).map(|n| n.identity()) != Some(other_root_node.identity()) {
            return false;
        }

        let mut mapping: HashMap<NodeId, NodeId> = HashMap::from([(other_root, own_root)]);
        let mut queue = VecDeque::from([other_root]);
        while let Some(other_id) = queue.pop_front() {
            let Some(other_node) = other.store.get(other_id) else {
                continue;
            };
            let Some(&own_id) = mapping.get(&other_id) else {
                continue;
            };
            let _ = self.merge_origins(own_id, other_node.origins());

            for &other_child in other_node.children() {
                let Some(child_node) = other.store.get(other_child) else {
                    continue;
                };
                let own_child = match self.store.find(child_node.identity()) {
                    Some(existing) => existing,
                    None => match self.add_child(own_id, child_node.molecule().clone()) {
                        Ok(created) => created,
                        Err(error) => {
                            warn!(
                                identity = child_node.identity(),
                                %error,
                                "Skipping a branch that could not be merged into the tree."
                            );
                            continue;
                        }
                    },
                };
                mapping.insert(other_child, own_child);
                queue.push_back(other_child);
            }
        }
        true
    }
}

impl<M> ScaffoldGraph for ScaffoldTree<M> {
    type Molecule = M;
    type Node = TreeNode<M>;

    fn node(&self, id: NodeId) -> Option<&TreeNode<M>> {
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
