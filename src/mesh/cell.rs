use super::node::NodeId;

slotmap::new_key_type! {
    /// Unique identifier for a cell in a mesh.
    pub struct CellId;
}

/// Shape of a cell, inferred from mesh dimension and node count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellShape {
    /// 1D segment.
    Edge,
    /// 2D triangle.
    Triangle,
    /// 2D quadrangle.
    Quadrangle,
    /// 3D tetrahedron.
    Tetrahedron,
    /// 3D triangular prism: bottom triangle then top triangle.
    TriPrism,
    /// 3D hexahedron: bottom quad then top quad.
    Hexahedron,
}

impl CellShape {
    /// Resolves the shape for a cell of `node_count` nodes in a `dim`-dimensional mesh.
    #[must_use]
    pub fn from_node_count(dim: u8, node_count: usize) -> Option<Self> {
        match (dim, node_count) {
            (1, 2) => Some(Self::Edge),
            (2, 3) => Some(Self::Triangle),
            (2, 4) => Some(Self::Quadrangle),
            (3, 4) => Some(Self::Tetrahedron),
            (3, 6) => Some(Self::TriPrism),
            (3, 8) => Some(Self::Hexahedron),
            _ => None,
        }
    }

    /// Local node indices of every facet.
    ///
    /// Facets of a counter-clockwise (2D) or positive-volume (3D) cell are
    /// listed with outward orientation.
    #[must_use]
    pub fn facets(self) -> &'static [&'static [usize]] {
        match self {
            Self::Edge => &[&[0], &[1]],
            Self::Triangle => &[&[0, 1], &[1, 2], &[2, 0]],
            Self::Quadrangle => &[&[0, 1], &[1, 2], &[2, 3], &[3, 0]],
            Self::Tetrahedron => &[&[1, 2, 3], &[2, 0, 3], &[0, 1, 3], &[0, 2, 1]],
            Self::TriPrism => &[
                &[0, 2, 1],
                &[3, 4, 5],
                &[0, 1, 4, 3],
                &[1, 2, 5, 4],
                &[2, 0, 3, 5],
            ],
            Self::Hexahedron => &[
                &[0, 3, 2, 1],
                &[4, 5, 6, 7],
                &[0, 1, 5, 4],
                &[1, 2, 6, 5],
                &[2, 3, 7, 6],
                &[3, 0, 4, 7],
            ],
        }
    }
}

/// Data associated with a mesh cell.
#[derive(Debug, Clone)]
pub struct CellData {
    /// Ordered nodes; the order encodes orientation.
    pub nodes: Vec<NodeId>,
    /// Resolved shape.
    pub shape: CellShape,
    /// Marker tag, 0 when unset.
    pub marker: i32,
    /// Position of the cell in creation order.
    pub index: usize,
}
