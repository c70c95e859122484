use super::NodeId;
use nalgebra::DMatrix;
use std::collections::HashMap;
use std::io::Write;

/// Adjacency matrix of a scaffold graph over the node insertion order.
///
/// Entry `(i, j)` is 1 when nodes `i` and `j` are joined by a parent-child edge,
/// in either direction, and 0 otherwise.
#[derive(Debug, Clone)]
pub struct MatrixView {
    matrix: DMatrix<u8>,
    nodes: Vec<NodeId>,
    index_of: HashMap<NodeId, usize>,
}

impl MatrixView {
    /// Builds the matrix from the node order and the parent-child edges.
    pub(crate) fn build(nodes: &[NodeId], edges: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        let index_of: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut matrix = DMatrix::<u8>::zeros(nodes.len(), nodes.len());
        for (parent, child) in edges {
            if let (Some(&i), Some(&j)) = (index_of.get(&parent), index_of.get(&child)) {
                matrix[(i, j)] = 1;
                matrix[(j, i)] = 1;
            }
        }
        Self {
            matrix,
            nodes: nodes.to_vec(),
            index_of,
        }
    }

    pub fn matrix(&self) -> &DMatrix<u8> {
        &self.matrix
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index_of.get(&id).copied()
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }
}

/// Writes a matrix as CSV: one header row, then one row of 0/1 values per node.
pub fn write_csv<W: Write>(view: &MatrixView, headers: &[&str], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(headers)?;
    for row in view.matrix.row_iter() {
        csv_writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}
