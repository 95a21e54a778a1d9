mod extrude_2d;
mod extrude_3d;
pub mod policy;

pub use extrude_2d::Extrude2D;
pub use extrude_3d::Extrude3D;

use crate::error::{OperationError, Result};
use crate::geometry::{Line, Plane};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::{Mesh, NodeId};

use policy::{resolve, Lift, Overrides, Position};

/// Parameters shared by the extrusion builders.
#[derive(Debug, Clone)]
pub struct ExtrudeParams {
    /// Marker for the first replica: front in 2D, bottom in 3D. 0 = propagate.
    pub start_marker: i32,
    /// Marker for the last replica: back in 2D, top in 3D. 0 = propagate.
    pub end_marker: i32,
    /// Marker for the side through the base node with minimal x (2D only).
    pub left_marker: i32,
    /// Marker for the side through the base node with maximal x (2D only).
    pub right_marker: i32,
    /// Snap the last replica onto the plane `axis = coords.last()`.
    pub adjust_back: bool,
    /// Tolerance for the snap plane and degenerate layer checks.
    pub tolerance: f64,
}

impl Default for ExtrudeParams {
    fn default() -> Self {
        Self {
            start_marker: 0,
            end_marker: 0,
            left_marker: 0,
            right_marker: 0,
            adjust_back: false,
            tolerance: TOLERANCE,
        }
    }
}

impl ExtrudeParams {
    fn overrides(&self) -> Overrides {
        Overrides {
            start: self.start_marker,
            end: self.end_marker,
            left: self.left_marker,
            right: self.right_marker,
        }
    }
}

/// Creates one copy of every base node per coordinate, replica by replica.
///
/// Returns `replicas[k][i]`, the copy of base node `i` (creation index) on
/// replica `k`. Node markers follow [`Lift::ReplicaNode`].
fn replicate_nodes(
    base: &Mesh,
    out: &mut Mesh,
    coords: &[f64],
    axis: usize,
    params: &ExtrudeParams,
) -> Result<Vec<Vec<NodeId>>> {
    let dir = Vector3::ith(axis, 1.0);
    let count = coords.len();
    let (c0, c_last) = (coords[0], coords[count - 1]);
    let overrides = params.overrides();

    let trajectories = base
        .nodes()
        .map(|(_, node)| -> Result<(Point3, Point3, i32)> {
            let first = node.pos + dir * c0;
            let last = if params.adjust_back {
                snap_to_back(&first, &dir, c_last, params.tolerance)?
            } else {
                node.pos + dir * c_last
            };
            Ok((first, last, node.marker))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut replicas = Vec::with_capacity(count);
    for (k, &ck) in coords.iter().enumerate() {
        let position = Position::of(k, count);
        let fraction = (ck - c0) / (c_last - c0);
        let mut layer = Vec::with_capacity(trajectories.len());
        for &(first, last, marker) in &trajectories {
            let pos = match position {
                Position::First => first,
                Position::Last => last,
                Position::Interior if params.adjust_back => first + (last - first) * fraction,
                Position::Interior => first + dir * (ck - c0),
            };
            let marker = resolve(Lift::ReplicaNode, position, marker, &overrides).unwrap_or(marker);
            layer.push(out.create_node(pos, marker));
        }
        replicas.push(layer);
    }
    Ok(replicas)
}

/// Moves a node's trajectory end onto the back plane `dir · x = c_last`.
fn snap_to_back(first: &Point3, dir: &Vector3, c_last: f64, tol: f64) -> Result<Point3> {
    let degenerate = || {
        OperationError::InvalidArgument(format!(
            "node at {first:?} cannot be adjusted onto back plane at {c_last}"
        ))
    };
    let back = Plane::new(*dir, c_last).ok_or_else(degenerate)?;
    let trajectory = Line::from_direction(*first, *dir).ok_or_else(degenerate)?;
    let hit = back
        .intersect_line(&trajectory, tol, false)
        .ok_or_else(degenerate)?;
    if (hit - first).dot(dir) <= tol {
        return Err(degenerate().into());
    }
    Ok(hit)
}

/// Base node creation indices of `ids`.
fn node_indices(base: &Mesh, ids: &[NodeId]) -> Result<Vec<usize>> {
    ids.iter()
        .map(|&id| -> Result<usize> { Ok(base.node(id)?.index) })
        .collect()
}
