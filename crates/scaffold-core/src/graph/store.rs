use super::matrix::MatrixView;
use super::node::NodeLinks;
use super::{GraphError, NodeId};
use slotmap::SlotMap;
use std::collections::{HashMap, VecDeque};
use std::sync::OnceLock;

/// Node arena shared by trees and networks.
///
/// Keeps the identity index, the insertion order and the lazily built matrix view.
/// Every structural mutation goes through this type so the matrix cache can be
/// dropped when the structure changes.
#[derive(Debug, Clone)]
pub(crate) struct NodeStore<N> {
    nodes: SlotMap<NodeId, N>,
    by_identity: HashMap<String, NodeId>,
    order: Vec<NodeId>,
    matrix: OnceLock<MatrixView>,
}

impl<N> Default for NodeStore<N> {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            by_identity: HashMap::new(),
            order: Vec::new(),
            matrix: OnceLock::new(),
        }
    }
}

impl<N: NodeLinks> NodeStore<N> {
    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(id)
    }

    pub fn find(&self, identity: &str) -> Option<NodeId> {
        self.by_identity.get(identity).copied()
    }

    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Inserts a node under a new identity.
    pub fn insert(&mut self, node: N) -> Result<NodeId, GraphError> {
        let identity = node.identity().to_string();
        if identity.is_empty() {
            return Err(GraphError::InvalidArgument(
                "molecule has an empty identity".to_string(),
            ));
        }
        if self.by_identity.contains_key(&identity) {
            return Err(GraphError::DuplicateIdentity(identity));
        }
        let id = self.nodes.insert(node);
        self.by_identity.insert(identity, id);
        self.order.push(id);
        self.invalidate();
        Ok(id)
    }

    /// Drops the cached matrix view.
    pub fn invalidate(&mut self) {
        self.matrix.take();
    }

    pub fn matrix_view(&self) -> &MatrixView {
        self.matrix.get_or_init(|| {
            let edges = self.order.iter().flat_map(|&child| {
                self.nodes
                    .get(child)
                    .map(|n| n.parents().to_vec())
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |parent| (parent, child))
            });
            MatrixView::build(&self.order, edges)
        })
    }

    /// Recomputes levels from `start` downwards to the larger scaffolds.
    ///
    /// A node sits one level above its highest parent; changes travel breadth-first
    /// through the children until no level changes any more.
    pub fn propagate_levels(&mut self, start: NodeId) {
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let level = node
                .parents()
                .iter()
                .filter_map(|&p| self.nodes.get(p))
                .map(|p| p.level() + 1)
                .max()
                .unwrap_or(0);
            let changed = node.level() != level;
            let children = node.children().to_vec();
            if let Some(node) = self.nodes.get_mut(id) {
                node.set_level(level);
            }
            if changed {
                queue.extend(children);
            }
        }
    }
}
