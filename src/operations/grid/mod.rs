mod layered;
mod marker;

pub use layered::{MakeBlock1D, MakeMesh1D};
pub use marker::MarkerType;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::Plane;
use crate::math::polygon::is_strictly_increasing;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::{Mesh, NodeId};

/// Builds a structured grid from one, two or three coordinate axes.
///
/// Nodes are the Cartesian product of the axes with x varying fastest, so the
/// node at grid index `(i, j, k)` has creation index `i + nx * (j + ny * k)`.
/// Each hyper-rectangle of adjacent nodes becomes one cell: a segment in 1D,
/// a counter-clockwise quadrangle in 2D and a hexahedron in 3D.
#[derive(Debug, Clone)]
pub struct MakeGrid {
    axes: Vec<Vec<f64>>,
    marker_type: MarkerType,
}

impl MakeGrid {
    /// Creates a 1D grid builder over `x`.
    #[must_use]
    pub fn line(x: &[f64]) -> Self {
        Self::from_axes(vec![x.to_vec()])
    }

    /// Creates a 2D grid builder over `x × y`.
    #[must_use]
    pub fn rect(x: &[f64], y: &[f64]) -> Self {
        Self::from_axes(vec![x.to_vec(), y.to_vec()])
    }

    /// Creates a 3D grid builder over `x × y × z`.
    #[must_use]
    pub fn cuboid(x: &[f64], y: &[f64], z: &[f64]) -> Self {
        Self::from_axes(vec![x.to_vec(), y.to_vec(), z.to_vec()])
    }

    /// Creates a 2D builder with `nx × ny` unit cells starting at the origin.
    #[must_use]
    pub fn uniform_2d(nx: usize, ny: usize) -> Self {
        Self::from_axes(vec![unit_axis(nx), unit_axis(ny)])
    }

    /// Creates a 3D builder with `nx × ny × nz` unit cells starting at the origin.
    #[must_use]
    pub fn uniform_3d(nx: usize, ny: usize, nz: usize) -> Self {
        Self::from_axes(vec![unit_axis(nx), unit_axis(ny), unit_axis(nz)])
    }

    /// Selects how cells and outer boundaries are tagged.
    #[must_use]
    pub fn with_marker_type(mut self, marker_type: MarkerType) -> Self {
        self.marker_type = marker_type;
        self
    }

    fn from_axes(axes: Vec<Vec<f64>>) -> Self {
        Self {
            axes,
            marker_type: MarkerType::None,
        }
    }

    /// Executes the build, returning a fresh mesh.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] if any axis has fewer than
    /// two values, contains non-finite values or is not strictly increasing.
    pub fn execute(&self) -> Result<Mesh> {
        const NAMES: [&str; 3] = ["x", "y", "z"];
        for (axis, name) in self.axes.iter().zip(NAMES) {
            check_axis(name, axis, 2)?;
        }

        let dim = match self.axes.len() {
            1 => 1,
            2 => 2,
            _ => 3,
        };
        let mut mesh = Mesh::new(dim)?;

        let x = &self.axes[0];
        let y = self.axes.get(1).map_or(&[0.0][..], Vec::as_slice);
        let z = self.axes.get(2).map_or(&[0.0][..], Vec::as_slice);
        let (nx, ny) = (x.len(), y.len());

        for &zk in z {
            for &yj in y {
                for &xi in x {
                    mesh.create_node(Point3::new(xi, yj, zk), 0);
                }
            }
        }

        let ids = mesh.node_ids().to_vec();
        let at = |i: usize, j: usize, k: usize| -> NodeId { ids[i + nx * (j + ny * k)] };

        let mut cell_index = 0usize;
        let mut next_marker = || -> Result<i32> {
            let marker = match self.marker_type {
                MarkerType::CellIndex => i32::try_from(cell_index).map_err(|_| {
                    OperationError::InvalidArgument("cell index exceeds marker range".into())
                })?,
                MarkerType::None | MarkerType::BoundarySides => 0,
            };
            cell_index += 1;
            Ok(marker)
        };

        match dim {
            1 => {
                for i in 0..nx - 1 {
                    mesh.create_cell(vec![at(i, 0, 0), at(i + 1, 0, 0)], next_marker()?)?;
                }
            }
            2 => {
                for j in 0..ny - 1 {
                    for i in 0..nx - 1 {
                        let quad = vec![at(i, j, 0), at(i + 1, j, 0), at(i + 1, j + 1, 0), at(i, j + 1, 0)];
                        mesh.create_cell(quad, next_marker()?)?;
                    }
                }
            }
            _ => {
                for k in 0..z.len() - 1 {
                    for j in 0..ny - 1 {
                        for i in 0..nx - 1 {
                            let hex = vec![
                                at(i, j, k),
                                at(i + 1, j, k),
                                at(i + 1, j + 1, k),
                                at(i, j + 1, k),
                                at(i, j, k + 1),
                                at(i + 1, j, k + 1),
                                at(i + 1, j + 1, k + 1),
                                at(i, j + 1, k + 1),
                            ];
                            mesh.create_cell(hex, next_marker()?)?;
                        }
                    }
                }
            }
        }

        mesh.create_neighbour_infos()?;
        if self.marker_type == MarkerType::BoundarySides {
            tag_boundary_sides(&mut mesh, &self.axes)?;
        }

        debug!(
            dim,
            nodes = mesh.node_count(),
            cells = mesh.cell_count(),
            boundaries = mesh.boundary_count(),
            "created grid"
        );
        Ok(mesh)
    }
}

/// Validates one coordinate axis.
///
/// `min_len` is 2 for axes that must produce cells and 1 otherwise.
pub(crate) fn check_axis(name: &str, values: &[f64], min_len: usize) -> Result<()> {
    if values.is_empty() {
        return Err(OperationError::InvalidArgument(format!("{name} coordinates are empty")).into());
    }
    if values.len() < min_len {
        return Err(OperationError::InvalidArgument(format!(
            "{name} needs at least {min_len} coordinates, got {}",
            values.len()
        ))
        .into());
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(
            OperationError::InvalidArgument(format!("{name} coordinates must be finite")).into(),
        );
    }
    if !is_strictly_increasing(values) {
        return Err(OperationError::InvalidArgument(format!(
            "{name} coordinates must be strictly increasing"
        ))
        .into());
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn unit_axis(n: usize) -> Vec<f64> {
    (0..=n).map(|i| i as f64).collect()
}

/// Tags outer boundaries 1..=6 by the axis-aligned side they lie on:
/// x-min, x-max, y-min, y-max, z-min, z-max.
fn tag_boundary_sides(mesh: &mut Mesh, axes: &[Vec<f64>]) -> Result<()> {
    let mut sides = Vec::with_capacity(axes.len() * 2);
    for (a, axis) in axes.iter().enumerate() {
        let normal = Vector3::ith(a, 1.0);
        let (Some(&lo), Some(&hi)) = (axis.first(), axis.last()) else {
            continue;
        };
        if let (Some(min), Some(max)) = (Plane::new(normal, lo), Plane::new(normal, hi)) {
            sides.push(min);
            sides.push(max);
        }
    }

    for bid in mesh.outer_boundaries() {
        let center = mesh.boundary_center(bid)?;
        if let Some(side) = sides.iter().position(|plane| plane.touch(&center, TOLERANCE)) {
            mesh.boundary_mut(bid)?.marker = i32::try_from(side + 1).unwrap_or(0);
        }
    }
    Ok(())
}
