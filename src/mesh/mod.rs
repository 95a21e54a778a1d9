pub mod boundary;
pub mod bounds;
pub mod cell;
pub mod node;

pub use boundary::{BoundaryData, BoundaryId};
pub use bounds::Aabb;
pub use cell::{CellData, CellId, CellShape};
pub use node::{NodeData, NodeId};

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::{MeshError, OperationError, Result};
use crate::math::Point3;

/// Central arena that owns all nodes, cells and boundaries of one mesh.
///
/// Entities reference each other via typed IDs (generational indices).
/// Creation order is recorded per entity kind, so `node_at(i)` addresses the
/// i-th created node and builders can rely on stable replica numbering.
#[derive(Debug, Clone)]
pub struct Mesh {
    dim: u8,
    nodes: SlotMap<NodeId, NodeData>,
    cells: SlotMap<CellId, CellData>,
    boundaries: SlotMap<BoundaryId, BoundaryData>,
    node_order: Vec<NodeId>,
    cell_order: Vec<CellId>,
    boundary_order: Vec<BoundaryId>,
    boundary_lookup: HashMap<Vec<NodeId>, BoundaryId>,
}

impl Mesh {
    /// Creates a new, empty mesh of dimension 1, 2 or 3.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] for any other dimension.
    pub fn new(dim: u8) -> Result<Self> {
        if !(1..=3).contains(&dim) {
            return Err(
                OperationError::InvalidArgument(format!("mesh dimension {dim} not in 1..=3"))
                    .into(),
            );
        }
        Ok(Self {
            dim,
            nodes: SlotMap::with_key(),
            cells: SlotMap::with_key(),
            boundaries: SlotMap::with_key(),
            node_order: Vec::new(),
            cell_order: Vec::new(),
            boundary_order: Vec::new(),
            boundary_lookup: HashMap::new(),
        })
    }

    /// Returns the mesh dimension.
    #[must_use]
    pub fn dim(&self) -> u8 {
        self.dim
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cell_order.len()
    }

    #[must_use]
    pub fn boundary_count(&self) -> usize {
        self.boundary_order.len()
    }

    // --- Node operations ---

    /// Inserts a node and returns its ID.
    pub fn create_node(&mut self, pos: Point3, marker: i32) -> NodeId {
        let index = self.node_order.len();
        let id = self.nodes.insert(NodeData { pos, marker, index });
        self.node_order.push(id);
        id
    }

    /// Returns the first node within `tol` of `pos`.
    #[must_use]
    pub fn find_node(&self, pos: &Point3, tol: f64) -> Option<NodeId> {
        self.node_order
            .iter()
            .copied()
            .find(|&id| (self.nodes[id].pos - pos).norm() < tol)
    }

    /// Returns the node at `pos` if one exists within `tol`, otherwise creates it.
    pub fn create_node_unique(&mut self, pos: Point3, marker: i32, tol: f64) -> NodeId {
        match self.find_node(&pos, tol) {
            Some(id) => id,
            None => self.create_node(pos, marker),
        }
    }

    /// Returns a reference to the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn node(&self, id: NodeId) -> Result<&NodeData, MeshError> {
        self.nodes
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("node".into()))
    }

    /// Returns the ID of the `index`-th created node.
    #[must_use]
    pub fn node_at(&self, index: usize) -> Option<NodeId> {
        self.node_order.get(index).copied()
    }

    /// Node IDs in creation order.
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_order
    }

    /// Iterates over nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> + '_ {
        self.node_order.iter().map(move |&id| (id, &self.nodes[id]))
    }

    /// Returns all nodes carrying `marker`.
    #[must_use]
    pub fn nodes_by_marker(&self, marker: i32) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, n)| n.marker == marker)
            .map(|(id, _)| id)
            .collect()
    }

    // --- Cell operations ---

    /// Inserts a cell and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMesh`] if the node count does not form a
    /// cell in this dimension, or [`MeshError::EntityNotFound`] for an unknown node.
    pub fn create_cell(&mut self, nodes: Vec<NodeId>, marker: i32) -> Result<CellId> {
        let shape = CellShape::from_node_count(self.dim, nodes.len()).ok_or_else(|| {
            MeshError::InvalidMesh(format!(
                "no {}D cell has {} nodes",
                self.dim,
                nodes.len()
            ))
        })?;
        self.check_nodes(&nodes)?;

        let index = self.cell_order.len();
        let id = self.cells.insert(CellData {
            nodes,
            shape,
            marker,
            index,
        });
        self.cell_order.push(id);
        Ok(id)
    }

    /// Returns a reference to the cell data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn cell(&self, id: CellId) -> Result<&CellData, MeshError> {
        self.cells
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("cell".into()))
    }

    /// Returns a mutable reference to the cell data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn cell_mut(&mut self, id: CellId) -> Result<&mut CellData, MeshError> {
        self.cells
            .get_mut(id)
            .ok_or_else(|| MeshError::EntityNotFound("cell".into()))
    }

    /// Cell IDs in creation order.
    #[must_use]
    pub fn cell_ids(&self) -> &[CellId] {
        &self.cell_order
    }

    /// Iterates over cells in creation order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &CellData)> + '_ {
        self.cell_order.iter().map(move |&id| (id, &self.cells[id]))
    }

    /// Returns all cells carrying `marker`.
    #[must_use]
    pub fn cells_by_marker(&self, marker: i32) -> Vec<CellId> {
        self.cells()
            .filter(|(_, c)| c.marker == marker)
            .map(|(id, _)| id)
            .collect()
    }

    /// Positions of the cell's nodes, in cell order.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is not found.
    pub fn cell_positions(&self, id: CellId) -> Result<Vec<Point3>> {
        let cell = self.cell(id)?;
        Ok(cell.nodes.iter().map(|&n| self.nodes[n].pos).collect())
    }

    // --- Boundary operations ---

    /// Inserts a boundary and returns its ID.
    ///
    /// A boundary over the same node set (in any order) is unique: if one
    /// exists it is returned, taking over `marker` when that is nonzero.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMesh`] if the node count cannot bound a
    /// cell in this dimension, or [`MeshError::EntityNotFound`] for an unknown node.
    pub fn create_boundary(&mut self, nodes: Vec<NodeId>, marker: i32) -> Result<BoundaryId> {
        let valid = match self.dim {
            1 => nodes.len() == 1,
            2 => nodes.len() == 2,
            _ => nodes.len() == 3 || nodes.len() == 4,
        };
        if !valid {
            return Err(MeshError::InvalidMesh(format!(
                "no {}D boundary has {} nodes",
                self.dim,
                nodes.len()
            ))
            .into());
        }
        self.check_nodes(&nodes)?;

        let key = boundary_key(&nodes);
        if let Some(&existing) = self.boundary_lookup.get(&key) {
            if marker != 0 {
                self.boundaries[existing].marker = marker;
            }
            return Ok(existing);
        }

        let index = self.boundary_order.len();
        let id = self.boundaries.insert(BoundaryData {
            nodes,
            marker,
            left: None,
            right: None,
            index,
        });
        self.boundary_order.push(id);
        self.boundary_lookup.insert(key, id);
        Ok(id)
    }

    /// Looks up the boundary spanning exactly `nodes`, ignoring their order.
    #[must_use]
    pub fn find_boundary(&self, nodes: &[NodeId]) -> Option<BoundaryId> {
        self.boundary_lookup.get(&boundary_key(nodes)).copied()
    }

    /// Returns a reference to the boundary data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn boundary(&self, id: BoundaryId) -> Result<&BoundaryData, MeshError> {
        self.boundaries
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("boundary".into()))
    }

    /// Returns a mutable reference to the boundary data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn boundary_mut(&mut self, id: BoundaryId) -> Result<&mut BoundaryData, MeshError> {
        self.boundaries
            .get_mut(id)
            .ok_or_else(|| MeshError::EntityNotFound("boundary".into()))
    }

    /// Boundary IDs in creation order.
    #[must_use]
    pub fn boundary_ids(&self) -> &[BoundaryId] {
        &self.boundary_order
    }

    /// Iterates over boundaries in creation order.
    pub fn boundaries(&self) -> impl Iterator<Item = (BoundaryId, &BoundaryData)> + '_ {
        self.boundary_order
            .iter()
            .map(move |&id| (id, &self.boundaries[id]))
    }

    /// Returns all boundaries carrying `marker`.
    #[must_use]
    pub fn boundaries_by_marker(&self, marker: i32) -> Vec<BoundaryId> {
        self.boundaries()
            .filter(|(_, b)| b.marker == marker)
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns all boundaries adjacent to exactly one cell.
    #[must_use]
    pub fn outer_boundaries(&self) -> Vec<BoundaryId> {
        self.boundaries()
            .filter(|(_, b)| b.is_outer())
            .map(|(id, _)| id)
            .collect()
    }

    /// Arithmetic mean of the boundary's node positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary is not found.
    pub fn boundary_center(&self, id: BoundaryId) -> Result<Point3> {
        let b = self.boundary(id)?;
        Ok(centroid(b.nodes.iter().map(|&n| &self.nodes[n].pos)))
    }

    /// Derives every cell facet as a boundary and records adjacent cells.
    ///
    /// Existing boundaries keep their markers; missing facets are created with
    /// marker 0. The cell listing the facet first becomes its `left` cell.
    /// Calling this repeatedly is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if a facet cannot be created as a boundary.
    pub fn create_neighbour_infos(&mut self) -> Result<()> {
        for ci in 0..self.cell_order.len() {
            let cell_id = self.cell_order[ci];
            let (shape, nodes) = {
                let cell = &self.cells[cell_id];
                (cell.shape, cell.nodes.clone())
            };
            for facet in shape.facets() {
                let facet_nodes: Vec<NodeId> = facet.iter().map(|&i| nodes[i]).collect();
                let bid = self.create_boundary(facet_nodes, 0)?;
                let b = &mut self.boundaries[bid];
                if b.left == Some(cell_id) || b.right == Some(cell_id) {
                    continue;
                }
                if b.left.is_none() {
                    b.left = Some(cell_id);
                } else {
                    b.right = Some(cell_id);
                }
            }
        }
        Ok(())
    }

    /// Returns the axis-aligned bounding box of all nodes.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.nodes().map(|(_, n)| &n.pos))
    }

    fn check_nodes(&self, nodes: &[NodeId]) -> Result<(), MeshError> {
        if nodes.iter().all(|&n| self.nodes.contains_key(n)) {
            Ok(())
        } else {
            Err(MeshError::EntityNotFound("node".into()))
        }
    }
}

fn boundary_key(nodes: &[NodeId]) -> Vec<NodeId> {
    let mut key = nodes.to_vec();
    key.sort_unstable();
    key
}

fn centroid<'a>(points: impl Iterator<Item = &'a Point3>) -> Point3 {
    let mut sum = nalgebra::Vector3::zeros();
    let mut n = 0.0;
    for p in points {
        sum += p.coords;
        n += 1.0;
    }
    Point3::from(sum / n)
}
