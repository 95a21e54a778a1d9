use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};
use tracing::{debug, info, warn};

use crate::error::{OperationError, Result};
use crate::io::write_gmsh;
use crate::math::polygon::{point_in_polygon_2d, signed_area_2d};
use crate::math::{Point3, TOLERANCE};
use crate::mesh::{BoundaryId, Mesh, NodeId};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Parameters for far-field boundary augmentation.
#[derive(Debug, Clone)]
pub struct FarFieldParams {
    /// Total x extent of the far-field rectangle.
    pub x_boundary: f64,
    /// Total y extent of the far-field rectangle.
    pub y_boundary: f64,
    /// Marker of every created triangle.
    pub cell_marker: i32,
    /// Write the augmented mesh here (Gmsh 2.2) after success.
    pub save_path: Option<PathBuf>,
    /// Minimum margin between the mesh bounding box and the rectangle.
    pub tolerance: f64,
}

impl Default for FarFieldParams {
    fn default() -> Self {
        Self {
            x_boundary: 0.0,
            y_boundary: 0.0,
            cell_marker: 0,
            save_path: None,
            tolerance: TOLERANCE,
        }
    }
}

/// Surrounds a 2D mesh with a triangulated far-field region.
///
/// The region fills the space between a rectangle of the requested extents,
/// centred on the mesh bounding box, and every outermost closed boundary loop
/// of the mesh. Concave bays are filled, holes stay open. The rectangle
/// contributes its corners and edge midpoints as new nodes; loop nodes are
/// reused.
pub struct AddTriangleBoundary {
    params: FarFieldParams,
}

impl AddTriangleBoundary {
    /// Creates a new `AddTriangleBoundary` operation with the given total extents.
    #[must_use]
    pub fn new(x_boundary: f64, y_boundary: f64) -> Self {
        Self {
            params: FarFieldParams {
                x_boundary,
                y_boundary,
                ..FarFieldParams::default()
            },
        }
    }

    /// Replaces all parameters.
    #[must_use]
    pub fn with_params(mut self, params: FarFieldParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the marker of the created triangles.
    #[must_use]
    pub fn with_cell_marker(mut self, marker: i32) -> Self {
        self.params.cell_marker = marker;
        self
    }

    /// Saves the augmented mesh to `path` after success.
    #[must_use]
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.params.save_path = Some(path.into());
        self
    }

    /// Augments `mesh` in place.
    ///
    /// Returns `false` and leaves `mesh` untouched if it is not 2D, has no
    /// closed outer boundary, or the extents do not exceed its bounding box.
    /// A failed save is logged and does not affect the result.
    pub fn execute(&self, mesh: &mut Mesh) -> bool {
        let augmented = match self.augment(mesh) {
            Ok(Some(augmented)) => augmented,
            Ok(None) => return false,
            Err(e) => {
                warn!(error = %e, "far-field triangulation failed");
                return false;
            }
        };
        *mesh = augmented;

        if let Some(path) = &self.params.save_path {
            if let Err(e) = write_gmsh(mesh, path) {
                warn!(path = %path.display(), error = %e, "failed to save augmented mesh");
            }
        }
        true
    }

    /// Builds the augmented copy, or `None` if the input is rejected.
    fn augment(&self, mesh: &Mesh) -> Result<Option<Mesh>> {
        let FarFieldParams {
            x_boundary,
            y_boundary,
            cell_marker,
            tolerance,
            ..
        } = self.params;

        if mesh.dim() != 2 {
            debug!(dim = mesh.dim(), "far field needs a 2D mesh");
            return Ok(None);
        }
        let Some(bbox) = mesh.bounding_box() else {
            debug!("far field needs a non-empty mesh");
            return Ok(None);
        };
        if x_boundary <= bbox.width() + tolerance || y_boundary <= bbox.height() + tolerance {
            debug!(
                x_boundary,
                y_boundary,
                width = bbox.width(),
                height = bbox.height(),
                "far-field extents do not exceed the mesh"
            );
            return Ok(None);
        }

        let mut out = mesh.clone();
        out.create_neighbour_infos()?;
        let loops = outermost_loops(&out, outer_loops(&out)?)?;
        if loops.is_empty() {
            debug!("mesh has no closed outer boundary");
            return Ok(None);
        }

        let center = bbox.center();
        let (hx, hy) = (x_boundary / 2.0, y_boundary / 2.0);
        let rectangle: Vec<Point3> = [
            (-1.0, -1.0),
            (0.0, -1.0),
            (1.0, -1.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (-1.0, 1.0),
            (-1.0, 0.0),
        ]
        .iter()
        .map(|&(sx, sy)| Point3::new(center.x + sx * hx, center.y + sy * hy, 0.0))
        .collect();

        let mut cdt = Cdt::new();
        let mut vertex_nodes: HashMap<usize, NodeId> = HashMap::new();
        for (chain, positions) in &loops {
            let handles = insert_constraint_loop(&mut cdt, positions)?;
            for (&handle, &node) in handles.iter().zip(chain) {
                vertex_nodes.insert(handle, node);
            }
        }
        let rect_handles = insert_constraint_loop(&mut cdt, &rectangle)?;
        for (&handle, &pos) in rect_handles.iter().zip(&rectangle) {
            vertex_nodes
                .entry(handle)
                .or_insert_with(|| out.create_node(pos, 0));
        }

        let ring = classify_ring_faces(&cdt);
        let mut created = 0usize;
        for face in cdt.inner_faces() {
            if !ring.contains(&face.fix().index()) {
                continue;
            }
            let mut nodes = face
                .vertices()
                .iter()
                .map(|v| {
                    vertex_nodes.get(&v.fix().index()).copied().ok_or_else(|| {
                        OperationError::Failed("triangulation created an unknown vertex".into())
                    })
                })
                .collect::<Result<Vec<_>, OperationError>>()?;
            let positions = nodes
                .iter()
                .map(|&id| -> Result<Point3> { Ok(out.node(id)?.pos) })
                .collect::<Result<Vec<_>>>()?;
            if signed_area_2d(&positions) < 0.0 {
                nodes.reverse();
            }
            out.create_cell(nodes, cell_marker)?;
            created += 1;
        }
        out.create_neighbour_infos()?;

        info!(
            loops = loops.len(),
            loop_nodes = loops.iter().map(|(chain, _)| chain.len()).sum::<usize>(),
            triangles = created,
            nodes = out.node_count(),
            cells = out.cell_count(),
            "added far-field boundary"
        );
        Ok(Some(out))
    }
}

/// Chains the outer boundary edges into closed node loops.
///
/// Chains that do not close are dropped.
fn outer_loops(mesh: &Mesh) -> Result<Vec<Vec<NodeId>>> {
    let outer = mesh.outer_boundaries();
    let mut adjacency: HashMap<NodeId, Vec<(NodeId, BoundaryId)>> = HashMap::new();
    for &bid in &outer {
        let b = mesh.boundary(bid)?;
        adjacency.entry(b.nodes[0]).or_default().push((b.nodes[1], bid));
        adjacency.entry(b.nodes[1]).or_default().push((b.nodes[0], bid));
    }

    let mut used: HashSet<BoundaryId> = HashSet::new();
    let mut loops = Vec::new();
    for &bid in &outer {
        if !used.insert(bid) {
            continue;
        }
        let b = mesh.boundary(bid)?;
        let start = b.nodes[0];
        let mut chain = vec![start];
        let mut current = b.nodes[1];
        let closed = loop {
            if current == start {
                break true;
            }
            chain.push(current);
            let next = adjacency
                .get(&current)
                .and_then(|edges| edges.iter().find(|(_, e)| !used.contains(e)));
            let Some(&(node, edge)) = next else {
                break false;
            };
            used.insert(edge);
            current = node;
        };
        if closed && chain.len() >= 3 {
            loops.push(chain);
        }
    }
    Ok(loops)
}

/// Loops not enclosed by any other loop, paired with their node positions.
///
/// Holes and islands inside holes are enclosed and dropped.
fn outermost_loops(mesh: &Mesh, loops: Vec<Vec<NodeId>>) -> Result<Vec<(Vec<NodeId>, Vec<Point3>)>> {
    let located = loops
        .into_iter()
        .map(|chain| -> Result<_> {
            let positions = chain
                .iter()
                .map(|&id| -> Result<Point3> { Ok(mesh.node(id)?.pos) })
                .collect::<Result<Vec<_>>>()?;
            Ok((chain, positions))
        })
        .collect::<Result<Vec<_>>>()?;

    let enclosed: Vec<bool> = located
        .iter()
        .enumerate()
        .map(|(i, (_, positions))| {
            let sample = nalgebra::center(&positions[0], &positions[1]);
            located
                .iter()
                .enumerate()
                .any(|(j, (_, other))| j != i && point_in_polygon_2d(&sample, other))
        })
        .collect();

    Ok(located
        .into_iter()
        .zip(enclosed)
        .filter(|(_, enclosed)| !enclosed)
        .map(|(located, _)| located)
        .collect())
}

/// Inserts a closed polygon as constraint edges, returning the vertex indices.
fn insert_constraint_loop(cdt: &mut Cdt, points: &[Point3]) -> Result<Vec<usize>> {
    if points.len() < 3 {
        return Err(OperationError::Failed("constraint loop needs at least 3 points".into()).into());
    }
    let mut handles = Vec::with_capacity(points.len());
    for p in points {
        let h = cdt
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e: InsertionError| OperationError::Failed(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from != to {
            cdt.add_constraint(from, to);
        }
    }

    Ok(handles.iter().map(|h| h.index()).collect())
}

/// Faces inside the rectangle and outside every constrained mesh loop.
///
/// Flood-fills from the convex hull, counting crossed constraint edges. The
/// hull lies on the rectangle, so a face is in the ring when its depth is odd.
fn classify_ring_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();
    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let idx = inner.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            queue.push_back((inner.fix(), depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        for edge in cdt.face(face_fix).adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_idx = neighbor.fix().index();
            if depth_map.contains_key(&n_idx) {
                continue;
            }
            let new_depth = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(n_idx, new_depth);
            queue.push_back((neighbor.fix(), new_depth));
        }
    }

    depth_map
        .into_iter()
        .filter(|&(_, depth)| depth % 2 == 1)
        .map(|(idx, _)| idx)
        .collect()
}
