//! Free-function entry points over the mesh builders.
//!
//! Each function configures and executes one operation from
//! [`crate::operations`]; use the operations directly for finer control.

use std::path::Path;

use crate::error::Result;
use crate::mesh::Mesh;
use crate::operations::{
    AddTriangleBoundary, Extrude2D, Extrude3D, ExtrudeParams, MakeBlock1D, MakeGrid, MakeMesh1D,
    MarkerType,
};

/// 1D grid with nodes at `x`.
///
/// # Errors
///
/// Returns `InvalidArgument` if `x` has fewer than two values or is not
/// strictly increasing.
pub fn create_grid(x: &[f64]) -> Result<Mesh> {
    MakeGrid::line(x).execute()
}

/// 2D grid with nodes at `x × y`.
///
/// # Errors
///
/// Returns `InvalidArgument` for an invalid axis.
pub fn create_grid_2d(x: &[f64], y: &[f64]) -> Result<Mesh> {
    MakeGrid::rect(x, y).execute()
}

/// 3D grid with nodes at `x × y × z`.
///
/// # Errors
///
/// Returns `InvalidArgument` for an invalid axis.
pub fn create_grid_3d(x: &[f64], y: &[f64], z: &[f64]) -> Result<Mesh> {
    MakeGrid::cuboid(x, y, z).execute()
}

/// 1D mesh with nodes at `x`.
///
/// # Errors
///
/// Returns `InvalidArgument` for an invalid axis.
pub fn create_mesh_1d(x: &[f64]) -> Result<Mesh> {
    MakeGrid::line(x).execute()
}

/// 1D chain of `n_cells * n_properties` unit cells in `n_properties` regions.
///
/// # Errors
///
/// Returns `InvalidArgument` if either count is zero.
pub fn create_mesh_1d_cells(n_cells: usize, n_properties: usize) -> Result<Mesh> {
    MakeMesh1D::new(n_cells, n_properties).execute()
}

/// 1D block model of layer thicknesses followed by per-layer properties.
///
/// # Errors
///
/// Returns `InvalidArgument` if either count is zero.
pub fn create_mesh_1d_block(n_layers: usize, n_properties: usize) -> Result<Mesh> {
    MakeBlock1D::new(n_layers, n_properties).execute()
}

/// 2D quadrangle mesh with nodes at `x × y`.
///
/// # Errors
///
/// Returns `InvalidArgument` for an invalid axis.
pub fn create_mesh_2d(x: &[f64], y: &[f64], marker_type: MarkerType) -> Result<Mesh> {
    MakeGrid::rect(x, y).with_marker_type(marker_type).execute()
}

/// 2D mesh of `x_dim × y_dim` unit quadrangles.
///
/// # Errors
///
/// Returns `InvalidArgument` if a dimension is zero.
pub fn create_mesh_2d_uniform(x_dim: usize, y_dim: usize, marker_type: MarkerType) -> Result<Mesh> {
    MakeGrid::uniform_2d(x_dim, y_dim)
        .with_marker_type(marker_type)
        .execute()
}

/// Extrudes `mesh` along `y`; see [`Extrude2D`].
///
/// # Errors
///
/// Returns `InvalidArgument` for an invalid `y` axis and `InvalidMesh` if
/// `mesh` has nothing to extrude.
pub fn create_mesh_2d_from_mesh(mesh: &Mesh, y: &[f64], params: ExtrudeParams) -> Result<Mesh> {
    Extrude2D::new(mesh, y).with_params(params).execute()
}

/// 3D hexahedral mesh with nodes at `x × y × z`.
///
/// # Errors
///
/// Returns `InvalidArgument` for an invalid axis.
pub fn create_mesh_3d(x: &[f64], y: &[f64], z: &[f64], marker_type: MarkerType) -> Result<Mesh> {
    MakeGrid::cuboid(x, y, z)
        .with_marker_type(marker_type)
        .execute()
}

/// 3D mesh of `x_dim × y_dim × z_dim` unit hexahedra.
///
/// # Errors
///
/// Returns `InvalidArgument` if a dimension is zero.
pub fn create_mesh_3d_uniform(
    x_dim: usize,
    y_dim: usize,
    z_dim: usize,
    marker_type: MarkerType,
) -> Result<Mesh> {
    MakeGrid::uniform_3d(x_dim, y_dim, z_dim)
        .with_marker_type(marker_type)
        .execute()
}

/// Extrudes a 2D `mesh` along `z`; see [`Extrude3D`].
///
/// # Errors
///
/// Returns `InvalidArgument` for an invalid `z` axis and `InvalidMesh` if
/// `mesh` is not a 2D mesh of triangles and quadrangles.
pub fn create_mesh_3d_from_mesh(
    mesh: &Mesh,
    z: &[f64],
    top_marker: i32,
    bottom_marker: i32,
) -> Result<Mesh> {
    Extrude3D::new(mesh, z)
        .with_top_bottom(top_marker, bottom_marker)
        .execute()
}

/// Surrounds a 2D `mesh` with a far-field triangle region; see [`AddTriangleBoundary`].
///
/// Returns `false` with `mesh` untouched if the augmentation is rejected.
pub fn add_triangle_boundary(
    mesh: &mut Mesh,
    x_boundary: f64,
    y_boundary: f64,
    cell_marker: i32,
    save: Option<&Path>,
) -> bool {
    let mut op = AddTriangleBoundary::new(x_boundary, y_boundary).with_cell_marker(cell_marker);
    if let Some(path) = save {
        op = op.with_save_path(path);
    }
    op.execute(mesh)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn uniform_builders_match_unit_axes() {
        let a = create_mesh_2d_uniform(2, 3, MarkerType::CellIndex).unwrap();
        let b = create_mesh_2d(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0, 3.0], MarkerType::CellIndex)
            .unwrap();
        assert_eq!(a.node_count(), b.node_count());
        let markers = |m: &Mesh| m.cells().map(|(_, c)| c.marker).collect::<Vec<_>>();
        assert_eq!(markers(&a), markers(&b));

        let cube = create_mesh_3d_uniform(1, 2, 1, MarkerType::None).unwrap();
        assert_eq!(cube.cell_count(), 2);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(create_mesh_2d_uniform(0, 3, MarkerType::None).is_err());
        assert!(create_mesh_3d_uniform(1, 1, 0, MarkerType::None).is_err());
    }

    #[test]
    fn one_dimensional_variants() {
        assert_eq!(create_grid(&[0.0, 0.5, 2.0]).unwrap().cell_count(), 2);
        assert_eq!(create_mesh_1d(&[0.0, 0.5]).unwrap().node_count(), 2);
        assert_eq!(create_mesh_1d_cells(2, 3).unwrap().cell_count(), 6);
        assert_eq!(create_mesh_1d_block(2, 2).unwrap().node_count(), 6);
    }

    #[test]
    fn extrusion_chain_reaches_three_dimensions() {
        let line = create_mesh_1d(&[0.0, 1.0, 2.0]).unwrap();
        let params = ExtrudeParams {
            start_marker: 1,
            end_marker: 2,
            ..ExtrudeParams::default()
        };
        let plane = create_mesh_2d_from_mesh(&line, &[0.0, 1.0], params).unwrap();
        assert_eq!(plane.dim(), 2);
        assert_eq!(plane.boundaries_by_marker(1).len(), 2);

        let solid = create_mesh_3d_from_mesh(&plane, &[0.0, 1.0, 2.0], 6, 5).unwrap();
        assert_eq!(solid.cell_count(), 4);
        assert_eq!(solid.boundaries_by_marker(5).len(), 2);
    }

    #[test]
    fn far_field_facade() {
        let mut mesh = create_grid_2d(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert!(!add_triangle_boundary(&mut mesh, 0.5, 0.5, 3, None));
        assert!(add_triangle_boundary(&mut mesh, 3.0, 3.0, 3, None));
        assert_eq!(mesh.cells_by_marker(3).len(), 12);
    }
}
