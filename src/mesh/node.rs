use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a node in a mesh.
    pub struct NodeId;
}

/// Data associated with a mesh node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Node position. Unused trailing components are zero.
    pub pos: Point3,
    /// Marker tag, 0 when unset.
    pub marker: i32,
    /// Position of the node in creation order.
    pub index: usize,
}
