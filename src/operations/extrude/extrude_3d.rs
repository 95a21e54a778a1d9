use tracing::info;

use crate::error::{MeshError, Result};
use crate::math::polygon::signed_area_2d;
use crate::mesh::{CellShape, Mesh};
use crate::operations::grid::check_axis;

use super::policy::{resolve, Lift, Position};
use super::{node_indices, replicate_nodes, ExtrudeParams};

/// Extrudes a 2D mesh along z into prisms and hexahedra.
///
/// Triangles become triangular prisms and quadrangles become hexahedra, one
/// per layer, each keeping its base cell's marker. Marked base edges become
/// marked side faces; the bottom and top replica faces take the bottom/top
/// markers when those are nonzero.
pub struct Extrude3D<'a> {
    base: &'a Mesh,
    z: Vec<f64>,
    params: ExtrudeParams,
}

impl<'a> Extrude3D<'a> {
    /// Creates a new `Extrude3D` operation over the coordinates `z`.
    #[must_use]
    pub fn new(base: &'a Mesh, z: &[f64]) -> Self {
        Self {
            base,
            z: z.to_vec(),
            params: ExtrudeParams::default(),
        }
    }

    /// Replaces all extrusion parameters. Left/right markers are ignored.
    #[must_use]
    pub fn with_params(mut self, params: ExtrudeParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the markers of the top (last) and bottom (first) replica.
    #[must_use]
    pub fn with_top_bottom(mut self, top: i32, bottom: i32) -> Self {
        self.params.end_marker = top;
        self.params.start_marker = bottom;
        self
    }

    /// Snaps the top replica onto the plane `z = z.last()`.
    #[must_use]
    pub fn with_adjust_back(mut self, adjust_back: bool) -> Self {
        self.params.adjust_back = adjust_back;
        self
    }

    /// Executes the extrusion, returning a new 3D mesh.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an invalid `z` axis and `InvalidMesh` if
    /// the base is not a 2D mesh of triangles and quadrangles, or has a
    /// degenerate boundary.
    pub fn execute(&self) -> Result<Mesh> {
        check_axis("z", &self.z, 2)?;
        let base = self.base;
        if base.dim() != 2 {
            return Err(MeshError::InvalidMesh(format!(
                "cannot extrude a {}D mesh to 3D",
                base.dim()
            ))
            .into());
        }
        if base.cell_count() == 0 {
            return Err(MeshError::InvalidMesh("base mesh has no cells".into()).into());
        }

        let overrides = self.params.overrides();
        let mut footprints = Vec::with_capacity(base.cell_count());
        for (id, cell) in base.cells() {
            if !matches!(cell.shape, CellShape::Triangle | CellShape::Quadrangle) {
                return Err(MeshError::InvalidMesh(format!(
                    "cannot lift {:?} to a 3D cell",
                    cell.shape
                ))
                .into());
            }
            let mut idx = node_indices(base, &cell.nodes)?;
            if signed_area_2d(&base.cell_positions(id)?) < 0.0 {
                idx.reverse();
            }
            footprints.push((idx, cell.marker));
        }

        let mut sides = Vec::new();
        for (_, boundary) in base.boundaries() {
            if boundary.nodes.len() < 2 {
                return Err(MeshError::InvalidMesh(format!(
                    "edge boundary with {} nodes",
                    boundary.nodes.len()
                ))
                .into());
            }
            let idx = node_indices(base, &boundary.nodes)?;
            sides.push((idx[0], idx[1], boundary.marker));
        }

        let mut out = Mesh::new(3)?;
        let replicas = replicate_nodes(base, &mut out, &self.z, 2, &self.params)?;
        let layers = replicas.len();

        for k in 1..layers {
            let (lo, hi) = (&replicas[k - 1], &replicas[k]);
            for (idx, marker) in &footprints {
                let Some(marker) = resolve(Lift::SweptCell, Position::of(k, layers), *marker, &overrides)
                else {
                    continue;
                };
                let nodes = idx.iter().map(|&i| lo[i]).chain(idx.iter().map(|&i| hi[i])).collect();
                out.create_cell(nodes, marker)?;
            }
        }
        out.create_neighbour_infos()?;

        for k in 1..layers {
            for &(a, b, marker) in &sides {
                let Some(marker) = resolve(Lift::SweptSide, Position::of(k, layers), marker, &overrides)
                else {
                    continue;
                };
                let face = [replicas[k - 1][a], replicas[k - 1][b], replicas[k][b], replicas[k][a]];
                if let Some(bid) = out.find_boundary(&face) {
                    out.boundary_mut(bid)?.marker = marker;
                }
            }
        }

        for k in [0, layers - 1] {
            let Some(marker) = resolve(Lift::EndCap, Position::of(k, layers), 0, &overrides) else {
                continue;
            };
            for (idx, _) in &footprints {
                let face: Vec<_> = idx.iter().map(|&i| replicas[k][i]).collect();
                if let Some(bid) = out.find_boundary(&face) {
                    out.boundary_mut(bid)?.marker = marker;
                }
            }
        }

        info!(
            base_cells = footprints.len(),
            layers = layers - 1,
            nodes = out.node_count(),
            cells = out.cell_count(),
            boundaries = out.boundary_count(),
            "extruded mesh to 3D"
        );
        Ok(out)
    }
}
