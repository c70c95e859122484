//! # Graph Module
//!
//! Scaffold trees and scaffold networks: directed graphs whose nodes hold scaffold
//! molecules and whose edges lead from a parent scaffold to the larger scaffolds
//! it was derived from.
//!
//! ## Overview
//!
//! Nodes live in an arena owned by the graph and are addressed by [`NodeId`]. A node is
//! unique per canonical identity, computed by the [`IdentityFn`] injected when the
//! graph is created. Graphs never delete nodes, so a `NodeId` stays valid for the
//! lifetime of its graph.
//!
//! ## Architecture
//!
//! - **Nodes** ([`node`]) - Tree and network node variants with origin bookkeeping
//! - **Trees** ([`tree`]) - Single-root graphs with exactly one parent per node
//! - **Networks** ([`network`]) - Graphs whose nodes may have many parents
//! - **Matrix View** ([`matrix`]) - Adjacency matrix over insertion order with CSV export

pub mod matrix;
pub mod network;
pub mod node;
pub(crate) mod store;
pub mod tree;

use matrix::MatrixView;
use node::ScaffoldNode;
use slotmap::new_key_type;
use std::io::Write;
use std::sync::Arc;
use thiserror::Error;

new_key_type! {
    /// Handle of a node inside one scaffold graph.
    pub struct NodeId;
}

/// Computes the canonical identity of a molecule.
pub type IdentityFn<M> = Arc<dyn Fn(&M) -> String + Send + Sync>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GraphError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Node '{0}' already has a parent")]
    ParentAlreadySet(String),

    #[error("The tree has no root")]
    RootNotSet,

    #[error("The tree has more than one orphan node")]
    AmbiguousRoot,

    #[error("No node for molecule '{0}'")]
    NodeNotFound(String),

    #[error("Matrix index {index} out of range for {size} nodes")]
    MatrixIndexOutOfRange { index: usize, size: usize },

    #[error("A node with identity '{0}' already exists")]
    DuplicateIdentity(String),
}

/// Read access shared by scaffold trees and scaffold networks.
pub trait ScaffoldGraph {
    type Molecule;
    type Node: ScaffoldNode<Molecule = Self::Molecule>;

    /// Returns a node by handle.
    fn node(&self, id: NodeId) -> Option<&Self::Node>;

    /// Node handles in insertion order.
    fn node_order(&self) -> &[NodeId];

    /// Looks up a node by canonical identity.
    fn find_identity(&self, identity: &str) -> Option<NodeId>;

    /// Computes the canonical identity of a molecule with the graph's identity function.
    fn identity_of(&self, molecule: &Self::Molecule) -> String;

    /// The cached adjacency matrix over [`Self::node_order`].
    fn matrix_view(&self) -> &MatrixView;

    fn node_count(&self) -> usize {
        self.node_order().len()
    }

    /// All nodes in insertion order.
    fn all_nodes(&self) -> Vec<&Self::Node> {
        self.node_order()
            .iter()
            .filter_map(|&id| self.node(id))
            .collect()
    }

    /// Nodes on one level, in insertion order.
    fn all_nodes_on_level(&self, level: usize) -> Vec<NodeId> {
        self.node_order()
            .iter()
            .copied()
            .filter(|&id| self.node(id).is_some_and(|n| n.level() == level))
            .collect()
    }

    /// The highest level of any node, or 0 for an empty graph.
    fn max_level(&self) -> usize {
        self.node_order()
            .iter()
            .filter_map(|&id| self.node(id))
            .map(|n| n.level())
            .max()
            .unwrap_or(0)
    }

    fn contains_molecule(&self, molecule: &Self::Molecule) -> bool {
        self.find_identity(&self.identity_of(molecule)).is_some()
    }

    /// The handle of the node holding a molecule with the same identity.
    fn node_id(&self, molecule: &Self::Molecule) -> Result<NodeId, GraphError> {
        let identity = self.identity_of(molecule);
        self.find_identity(&identity)
            .ok_or(GraphError::NodeNotFound(identity))
    }

    /// The node holding a molecule with the same identity.
    fn get_node(&self, molecule: &Self::Molecule) -> Result<&Self::Node, GraphError> {
        let id = self.node_id(molecule)?;
        self.node(id)
            .ok_or_else(|| GraphError::NodeNotFound(self.identity_of(molecule)))
    }

    /// Symmetric 0/1 adjacency matrix; row and column `i` belong to the `i`-th
    /// inserted node.
    fn matrix(&self) -> &nalgebra::DMatrix<u8> {
        self.matrix_view().matrix()
    }

    /// Node handle of every matrix index.
    fn matrix_nodes(&self) -> &[NodeId] {
        self.matrix_view().nodes()
    }

    fn matrix_node(&self, index: usize) -> Result<&Self::Node, GraphError> {
        let view = self.matrix_view();
        view.node(index)
            .and_then(|id| self.node(id))
            .ok_or(GraphError::MatrixIndexOutOfRange {
                index,
                size: view.size(),
            })
    }

    /// Matrix index of a node.
    fn node_number(&self, id: NodeId) -> Option<usize> {
        self.matrix_view().index_of(id)
    }

    /// Writes the adjacency matrix as CSV with a header row of node identities.
    fn write_matrix_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let headers: Vec<&str> = self
            .matrix_nodes()
            .iter()
            .filter_map(|&id| self.node(id))
            .map(|n| n.identity())
            .collect();
        matrix::write_csv(self.matrix_view(), &headers, writer)
    }
}
