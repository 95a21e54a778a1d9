use super::cell::CellId;
use super::node::NodeId;

slotmap::new_key_type! {
    /// Unique identifier for a boundary in a mesh.
    pub struct BoundaryId;
}

/// Data associated with a mesh boundary (node, edge or face bounding cells).
#[derive(Debug, Clone)]
pub struct BoundaryData {
    /// Ordered nodes of the boundary.
    pub nodes: Vec<NodeId>,
    /// Marker tag, 0 when unset.
    pub marker: i32,
    /// Cell whose facet orientation matches this boundary.
    pub left: Option<CellId>,
    /// Neighbour cell on the other side, if any.
    pub right: Option<CellId>,
    /// Position of the boundary in creation order.
    pub index: usize,
}

impl BoundaryData {
    /// Returns `true` if the boundary touches exactly one cell.
    #[must_use]
    pub fn is_outer(&self) -> bool {
        self.left.is_some() != self.right.is_some()
    }
}
