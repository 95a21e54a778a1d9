use tracing::{debug, info};

use crate::error::{MeshError, Result};
use crate::math::polygon::signed_area_2d;
use crate::mesh::{Mesh, NodeId};
use crate::operations::grid::check_axis;

use super::policy::{resolve, Lift, Overrides, Position};
use super::{node_indices, replicate_nodes, ExtrudeParams};

/// Extrudes a 1D mesh, or a marked polyline of a 2D mesh, along y into quadrangles.
///
/// A 1D base lifts all its cells; a 2D base lifts its edge boundaries with a
/// nonzero marker. Every lifted segment becomes one quadrangle per layer
/// carrying the segment's marker. Marked nodes become marked side edges, and
/// the first/last replica get the front/back markers when those are nonzero.
pub struct Extrude2D<'a> {
    base: &'a Mesh,
    y: Vec<f64>,
    params: ExtrudeParams,
}

impl<'a> Extrude2D<'a> {
    /// Creates a new `Extrude2D` operation over the coordinates `y`.
    #[must_use]
    pub fn new(base: &'a Mesh, y: &[f64]) -> Self {
        Self {
            base,
            y: y.to_vec(),
            params: ExtrudeParams::default(),
        }
    }

    /// Replaces all extrusion parameters.
    #[must_use]
    pub fn with_params(mut self, params: ExtrudeParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the markers of the first (front) and last (back) replica.
    #[must_use]
    pub fn with_front_back(mut self, front: i32, back: i32) -> Self {
        self.params.start_marker = front;
        self.params.end_marker = back;
        self
    }

    /// Sets the markers of the sides through the leftmost and rightmost base node.
    #[must_use]
    pub fn with_left_right(mut self, left: i32, right: i32) -> Self {
        self.params.left_marker = left;
        self.params.right_marker = right;
        self
    }

    /// Snaps the last replica onto the line `y = y.last()`.
    #[must_use]
    pub fn with_adjust_back(mut self, adjust_back: bool) -> Self {
        self.params.adjust_back = adjust_back;
        self
    }

    /// Executes the extrusion, returning a new 2D mesh.
    ///
    /// Replica `k` holds the copies of all base nodes, numbered in base order
    /// directly after replica `k - 1`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `y` has fewer than two values or is not
    /// strictly increasing, or if `adjust_back` would collapse a layer.
    /// Returns `InvalidMesh` if the base is not 1D/2D, has a degenerate
    /// boundary, or has nothing to lift.
    pub fn execute(&self) -> Result<Mesh> {
        check_axis("y", &self.y, 2)?;
        let base = self.base;
        let overrides = self.params.overrides();
        let segments = lifted_segments(base, &overrides)?;

        let mut out = Mesh::new(2)?;
        let replicas = replicate_nodes(base, &mut out, &self.y, 1, &self.params)?;
        let layers = replicas.len();

        for k in 1..layers {
            let (lo, hi) = (&replicas[k - 1], &replicas[k]);
            for &(a, b, marker) in &segments {
                let mut quad = vec![lo[a], lo[b], hi[b], hi[a]];
                let positions = quad
                    .iter()
                    .map(|&n| -> Result<_, MeshError> { Ok(out.node(n)?.pos) })
                    .collect::<Result<Vec<_>, MeshError>>()?;
                let area = signed_area_2d(&positions);
                if area.abs() <= self.params.tolerance {
                    return Err(MeshError::InvalidMesh(format!(
                        "segment ({a}, {b}) lies along the extrusion axis"
                    ))
                    .into());
                }
                if area < 0.0 {
                    quad = vec![lo[b], lo[a], hi[a], hi[b]];
                }
                out.create_cell(quad, marker)?;
            }
        }
        out.create_neighbour_infos()?;

        let mut lifted_nodes: Vec<usize> = segments.iter().flat_map(|&(a, b, _)| [a, b]).collect();
        lifted_nodes.sort_unstable();
        lifted_nodes.dedup();

        for &i in &lifted_nodes {
            let marker = base.node(base_node(base, i)?)?.marker;
            tag_trajectory(&mut out, &replicas, i, Lift::NodeTrajectory, marker, &overrides)?;
        }

        if let Some((left, right)) = extremes(base, &lifted_nodes)? {
            tag_trajectory(&mut out, &replicas, left, Lift::LeftTrajectory, 0, &overrides)?;
            tag_trajectory(&mut out, &replicas, right, Lift::RightTrajectory, 0, &overrides)?;
        }

        for (k, layer) in [(0, &replicas[0]), (layers - 1, &replicas[layers - 1])] {
            let Some(marker) = resolve(Lift::EndCap, Position::of(k, layers), 0, &overrides) else {
                continue;
            };
            for &(a, b, _) in &segments {
                if let Some(bid) = out.find_boundary(&[layer[a], layer[b]]) {
                    out.boundary_mut(bid)?.marker = marker;
                }
            }
        }

        info!(
            segments = segments.len(),
            layers = layers - 1,
            nodes = out.node_count(),
            cells = out.cell_count(),
            boundaries = out.boundary_count(),
            "extruded mesh to 2D"
        );
        Ok(out)
    }
}

/// Segments to lift as `(node index, node index, cell marker)`.
fn lifted_segments(base: &Mesh, overrides: &Overrides) -> Result<Vec<(usize, usize, i32)>> {
    let mut segments = Vec::new();
    match base.dim() {
        1 => {
            for (_, cell) in base.cells() {
                let idx = node_indices(base, &cell.nodes)?;
                if let Some(marker) = resolve(Lift::SweptCell, Position::First, cell.marker, overrides) {
                    segments.push((idx[0], idx[1], marker));
                }
            }
        }
        2 => {
            for (_, boundary) in base.boundaries() {
                if boundary.nodes.len() < 2 {
                    return Err(MeshError::InvalidMesh(format!(
                        "edge boundary with {} nodes",
                        boundary.nodes.len()
                    ))
                    .into());
                }
                if let Some(marker) =
                    resolve(Lift::SweptEdge, Position::First, boundary.marker, overrides)
                {
                    let idx = node_indices(base, &boundary.nodes)?;
                    segments.push((idx[0], idx[1], marker));
                }
            }
        }
        dim => {
            return Err(
                MeshError::InvalidMesh(format!("cannot extrude a {dim}D mesh to 2D")).into(),
            )
        }
    }

    if segments.is_empty() {
        return Err(MeshError::InvalidMesh("base mesh has no segments to extrude".into()).into());
    }
    debug!(segments = segments.len(), "collected segments to extrude");
    Ok(segments)
}

fn base_node(base: &Mesh, index: usize) -> Result<NodeId, MeshError> {
    base.node_at(index)
        .ok_or_else(|| MeshError::EntityNotFound(format!("node {index}")))
}

/// Lifted node indices with minimal and maximal x; ties keep the first found.
fn extremes(base: &Mesh, lifted: &[usize]) -> Result<Option<(usize, usize)>> {
    let mut best: Option<((usize, f64), (usize, f64))> = None;
    for &i in lifted {
        let x = base.node(base_node(base, i)?)?.pos.x;
        best = Some(match best {
            None => ((i, x), (i, x)),
            Some((lo, hi)) => (
                if x < lo.1 { (i, x) } else { lo },
                if x > hi.1 { (i, x) } else { hi },
            ),
        });
    }
    Ok(best.map(|(lo, hi)| (lo.0, hi.0)))
}

/// Tags the side edges traced by base node `i` between consecutive replicas.
fn tag_trajectory(
    out: &mut Mesh,
    replicas: &[Vec<NodeId>],
    i: usize,
    lift: Lift,
    source: i32,
    overrides: &Overrides,
) -> Result<()> {
    let layers = replicas.len();
    for k in 1..layers {
        let Some(marker) = resolve(lift, Position::of(k, layers), source, overrides) else {
            continue;
        };
        if let Some(bid) = out.find_boundary(&[replicas[k - 1][i], replicas[k][i]]) {
            out.boundary_mut(bid)?.marker = marker;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::Point3;
    use crate::mesh::CellShape;
    use crate::operations::grid::MakeGrid;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    /// Closed ring of `k` marked edges through `(i, i²)`; no edge is parallel to y.
    #[allow(clippy::cast_precision_loss)]
    fn ring(k: usize) -> Mesh {
        let mut mesh = Mesh::new(2).unwrap();
        let ids: Vec<_> = (0..k)
            .map(|i| mesh.create_node(p(i as f64, (i * i) as f64), 0))
            .collect();
        for i in 0..k {
            let marker = i32::try_from(i + 1).unwrap();
            mesh.create_boundary(vec![ids[i], ids[(i + 1) % k]], marker).unwrap();
        }
        mesh
    }

    /// Open polyline `x` along y = 0 with edge marker 1 and the given node markers.
    fn polyline(x: &[f64], node_markers: &[i32]) -> Mesh {
        let mut mesh = Mesh::new(2).unwrap();
        let ids: Vec<_> = x
            .iter()
            .zip(node_markers)
            .map(|(&xi, &m)| mesh.create_node(p(xi, 0.0), m))
            .collect();
        for w in ids.windows(2) {
            mesh.create_boundary(vec![w[0], w[1]], 1).unwrap();
        }
        mesh
    }

    // ── counts ──

    #[test]
    fn closed_ring_of_k_edges_counts_2k_nodes_and_k_quads() {
        let base = ring(5);
        let mesh = Extrude2D::new(&base, &[0.0, 2.0]).execute().unwrap();
        assert_eq!(mesh.node_count(), 10);
        assert_eq!(mesh.cell_count(), 5);
        let mut markers: Vec<_> = mesh.cells().map(|(_, c)| c.marker).collect();
        markers.sort_unstable();
        assert_eq!(markers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn one_dimensional_mesh_lifts_every_cell() {
        let base = MakeGrid::line(&[0.0, 1.0, 3.0]).execute().unwrap();
        let mesh = Extrude2D::new(&base, &[0.0, 1.0, 2.0]).execute().unwrap();
        assert_eq!(mesh.node_count(), 9);
        assert_eq!(mesh.cell_count(), 4);
        for (id, cell) in mesh.cells() {
            assert_eq!(cell.shape, CellShape::Quadrangle);
            assert!(signed_area_2d(&mesh.cell_positions(id).unwrap()) > 0.0);
        }
    }

    #[test]
    fn replicas_are_numbered_layer_by_layer() {
        let base = MakeGrid::line(&[0.0, 1.0, 3.0]).execute().unwrap();
        let y = [-2.0, 0.5, 1.0];
        let mesh = Extrude2D::new(&base, &y).execute().unwrap();
        for (k, &yk) in y.iter().enumerate() {
            for (i, (_, node)) in base.nodes().enumerate() {
                let copy = mesh.node(mesh.node_at(k * 3 + i).unwrap()).unwrap();
                assert_abs_diff_eq!(copy.pos, node.pos + crate::math::Vector3::y() * yk);
            }
        }
    }

    #[test]
    fn unmarked_edges_are_skipped() {
        let mut base = polyline(&[0.0, 1.0, 2.0], &[0, 0, 0]);
        let first = base.boundary_ids()[0];
        base.boundary_mut(first).unwrap().marker = 0;
        let mesh = Extrude2D::new(&base, &[0.0, 1.0]).execute().unwrap();
        assert_eq!(mesh.cell_count(), 1);
        // all base nodes are still replicated
        assert_eq!(mesh.node_count(), 6);
    }

    #[test]
    fn reversed_edges_still_give_counter_clockwise_quads() {
        let mut base = Mesh::new(2).unwrap();
        let a = base.create_node(p(0.0, 0.0), 0);
        let b = base.create_node(p(1.0, 0.0), 0);
        base.create_boundary(vec![b, a], 4).unwrap();
        let mesh = Extrude2D::new(&base, &[0.0, 1.0]).execute().unwrap();
        let cell = mesh.cell_ids()[0];
        assert!(signed_area_2d(&mesh.cell_positions(cell).unwrap()) > 0.0);
    }

    // ── errors ──

    #[test]
    fn invalid_axis_is_rejected() {
        let base = ring(3);
        assert!(Extrude2D::new(&base, &[]).execute().is_err());
        assert!(Extrude2D::new(&base, &[1.0]).execute().is_err());
        assert!(Extrude2D::new(&base, &[1.0, 0.0]).execute().is_err());
    }

    #[test]
    fn edge_along_extrusion_axis_is_invalid() {
        let mut base = Mesh::new(2).unwrap();
        let a = base.create_node(p(0.0, 0.0), 0);
        let b = base.create_node(p(0.0, 1.0), 0);
        base.create_boundary(vec![a, b], 1).unwrap();
        let err = Extrude2D::new(&base, &[0.0, 1.0]).execute().unwrap_err();
        assert!(matches!(err, crate::MeshgenError::Mesh(MeshError::InvalidMesh(_))));
    }

    #[test]
    fn base_without_segments_is_invalid() {
        let mut base = Mesh::new(2).unwrap();
        base.create_node(p(0.0, 0.0), 0);
        let err = Extrude2D::new(&base, &[0.0, 1.0]).execute().unwrap_err();
        assert!(matches!(err, crate::MeshgenError::Mesh(MeshError::InvalidMesh(_))));

        let cube = MakeGrid::uniform_3d(1, 1, 1).execute().unwrap();
        assert!(Extrude2D::new(&cube, &[0.0, 1.0]).execute().is_err());
    }

    // ── markers ──

    #[test]
    fn marked_nodes_become_side_edges() {
        let base = polyline(&[0.0, 1.0, 2.0], &[0, 7, 0]);
        let mesh = Extrude2D::new(&base, &[0.0, 1.0, 2.0]).execute().unwrap();
        let sides = mesh.boundaries_by_marker(7);
        assert_eq!(sides.len(), 2);
        for bid in sides {
            assert_abs_diff_eq!(mesh.boundary_center(bid).unwrap().x, 1.0);
        }
    }

    #[test]
    fn front_back_override_when_nonzero() {
        let base = polyline(&[0.0, 1.0, 2.0], &[3, 3, 3]);
        let mesh = Extrude2D::new(&base, &[0.0, 1.0, 2.0])
            .with_front_back(11, 12)
            .execute()
            .unwrap();

        let front = mesh.boundaries_by_marker(11);
        let back = mesh.boundaries_by_marker(12);
        assert_eq!(front.len(), 2);
        assert_eq!(back.len(), 2);
        for bid in front {
            assert_abs_diff_eq!(mesh.boundary_center(bid).unwrap().y, 0.0);
        }
        for bid in back {
            assert_abs_diff_eq!(mesh.boundary_center(bid).unwrap().y, 2.0);
        }
        // end replica nodes take the override, the middle keeps the original
        let markers: Vec<_> = mesh.nodes().map(|(_, n)| n.marker).collect();
        assert_eq!(markers, vec![11, 11, 11, 3, 3, 3, 12, 12, 12]);
    }

    #[test]
    fn zero_front_back_keep_original_markers() {
        let base = polyline(&[0.0, 1.0, 2.0], &[3, 3, 3]);
        let mesh = Extrude2D::new(&base, &[0.0, 1.0, 2.0]).execute().unwrap();
        assert!(mesh.nodes().all(|(_, n)| n.marker == 3));
        // horizontal end edges stay unset; only the node trajectories are tagged
        for bid in mesh.boundaries_by_marker(0) {
            let b = mesh.boundary(bid).unwrap();
            let y0 = mesh.node(b.nodes[0]).unwrap().pos.y;
            let y1 = mesh.node(b.nodes[1]).unwrap().pos.y;
            assert_abs_diff_eq!(y0, y1);
        }
        assert_eq!(mesh.boundaries_by_marker(3).len(), 6);
    }

    #[test]
    fn left_right_tag_extreme_sides() {
        let base = polyline(&[0.0, 1.0, 2.0], &[5, 5, 5]);
        let mesh = Extrude2D::new(&base, &[0.0, 1.0, 2.0])
            .with_left_right(21, 22)
            .execute()
            .unwrap();
        for (marker, x) in [(21, 0.0), (22, 2.0)] {
            let sides = mesh.boundaries_by_marker(marker);
            assert_eq!(sides.len(), 2);
            for bid in sides {
                assert_abs_diff_eq!(mesh.boundary_center(bid).unwrap().x, x);
            }
        }
        // the middle trajectory keeps its node marker
        assert_eq!(mesh.boundaries_by_marker(5).len(), 2);
    }

    // ── adjust_back ──

    #[test]
    fn adjust_back_flattens_last_replica() {
        let mut base = Mesh::new(2).unwrap();
        let a = base.create_node(p(0.0, 0.0), 0);
        let b = base.create_node(p(1.0, 1.0), 0);
        let c = base.create_node(p(2.0, -1.0), 0);
        base.create_boundary(vec![a, b], 1).unwrap();
        base.create_boundary(vec![b, c], 1).unwrap();

        let y = [0.0, 5.0, 10.0];
        let plain = Extrude2D::new(&base, &y).execute().unwrap();
        let adjusted = Extrude2D::new(&base, &y).with_adjust_back(true).execute().unwrap();

        let last_y = |m: &Mesh| {
            (6..9)
                .map(|i| m.node(m.node_at(i).unwrap()).unwrap().pos.y)
                .collect::<Vec<_>>()
        };
        assert_eq!(last_y(&plain), vec![10.0, 11.0, 9.0]);
        for yv in last_y(&adjusted) {
            assert_abs_diff_eq!(yv, 10.0, epsilon = 1e-12);
        }
        // middle replica sits halfway along each trajectory
        let mid = adjusted.node(adjusted.node_at(4).unwrap()).unwrap().pos;
        assert_abs_diff_eq!(mid, p(1.0, 5.5), epsilon = 1e-12);
        // x never changes
        let first = adjusted.node(adjusted.node_at(2).unwrap()).unwrap().pos;
        let last = adjusted.node(adjusted.node_at(8).unwrap()).unwrap().pos;
        assert_abs_diff_eq!(first.x, last.x);
    }

    #[test]
    fn adjust_back_rejects_collapsing_layers() {
        let mut base = Mesh::new(2).unwrap();
        let a = base.create_node(p(0.0, 0.0), 0);
        let b = base.create_node(p(1.0, 20.0), 0);
        base.create_boundary(vec![a, b], 1).unwrap();
        assert!(Extrude2D::new(&base, &[0.0, 10.0])
            .with_adjust_back(true)
            .execute()
            .is_err());
    }
}
