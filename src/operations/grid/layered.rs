use tracing::debug;

use crate::error::{OperationError, Result};
use crate::mesh::Mesh;

use super::MakeGrid;

/// Builds a 1D chain of unit cells split into equally sized marker regions.
///
/// The chain has `n_cells * n_properties` cells; cells
/// `[p * n_cells, (p + 1) * n_cells)` carry marker `p`. With one property
/// every cell keeps marker 0.
#[derive(Debug, Clone, Copy)]
pub struct MakeMesh1D {
    n_cells: usize,
    n_properties: usize,
}

impl MakeMesh1D {
    /// Creates a new `MakeMesh1D` operation.
    #[must_use]
    pub fn new(n_cells: usize, n_properties: usize) -> Self {
        Self {
            n_cells,
            n_properties,
        }
    }

    /// Executes the build, returning a fresh 1D mesh.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] if either count is zero.
    pub fn execute(&self) -> Result<Mesh> {
        if self.n_cells == 0 || self.n_properties == 0 {
            return Err(OperationError::InvalidArgument(format!(
                "1D mesh needs at least one cell and one property, got {} x {}",
                self.n_cells, self.n_properties
            ))
            .into());
        }

        let x = unit_positions(self.n_cells * self.n_properties + 1);
        let mut mesh = MakeGrid::line(&x).execute()?;

        let ids = mesh.cell_ids().to_vec();
        for (i, id) in ids.into_iter().enumerate() {
            mesh.cell_mut(id)?.marker = marker_of(i / self.n_cells)?;
        }

        debug!(
            cells = mesh.cell_count(),
            regions = self.n_properties,
            "created layered 1D mesh"
        );
        Ok(mesh)
    }
}

/// Builds a 1D block model of `n_layers` layers with `n_properties` each.
///
/// The mesh has `n_layers * (n_properties + 1)` nodes at unit spacing and
/// therefore `n_layers * n_properties + n_layers - 1` cells. The first
/// `n_layers - 1` cells hold layer thicknesses (marker 0; the last layer is a
/// half-space without one). Property `p` occupies the `n_layers` cells starting
/// at `(p + 1) * n_layers - 1` and carries marker `p + 1`.
#[derive(Debug, Clone, Copy)]
pub struct MakeBlock1D {
    n_layers: usize,
    n_properties: usize,
}

impl MakeBlock1D {
    /// Creates a new `MakeBlock1D` operation.
    #[must_use]
    pub fn new(n_layers: usize, n_properties: usize) -> Self {
        Self {
            n_layers,
            n_properties,
        }
    }

    /// Executes the build, returning a fresh 1D mesh.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] if either count is zero.
    pub fn execute(&self) -> Result<Mesh> {
        if self.n_layers == 0 || self.n_properties == 0 {
            return Err(OperationError::InvalidArgument(format!(
                "block model needs at least one layer and one property, got {} x {}",
                self.n_layers, self.n_properties
            ))
            .into());
        }

        let x = unit_positions(self.n_layers * (self.n_properties + 1));
        let mut mesh = MakeGrid::line(&x).execute()?;

        let ids = mesh.cell_ids().to_vec();
        for p in 0..self.n_properties {
            let first = (p + 1) * self.n_layers - 1;
            for &id in &ids[first..first + self.n_layers] {
                mesh.cell_mut(id)?.marker = marker_of(p + 1)?;
            }
        }

        debug!(
            layers = self.n_layers,
            properties = self.n_properties,
            cells = mesh.cell_count(),
            "created 1D block model"
        );
        Ok(mesh)
    }
}

#[allow(clippy::cast_precision_loss)]
fn unit_positions(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

fn marker_of(value: usize) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| OperationError::InvalidArgument("region count exceeds marker range".into()).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn markers(mesh: &Mesh) -> Vec<i32> {
        mesh.cells().map(|(_, c)| c.marker).collect()
    }

    // ── MakeMesh1D ──

    #[test]
    fn single_property_chain() {
        let mesh = MakeMesh1D::new(4, 1).execute().unwrap();
        assert_eq!(mesh.node_count(), 5);
        assert_eq!(mesh.cell_count(), 4);
        assert_eq!(markers(&mesh), vec![0; 4]);
    }

    #[test]
    fn properties_split_into_equal_regions() {
        let mesh = MakeMesh1D::new(3, 2).execute().unwrap();
        assert_eq!(mesh.cell_count(), 6);
        assert_eq!(markers(&mesh), vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert!(MakeMesh1D::new(0, 1).execute().is_err());
        assert!(MakeMesh1D::new(3, 0).execute().is_err());
    }

    // ── MakeBlock1D ──

    #[test]
    fn block_model_layout() {
        // 3 layers, 2 properties: 2 thicknesses + 2 * 3 property cells
        let mesh = MakeBlock1D::new(3, 2).execute().unwrap();
        assert_eq!(mesh.node_count(), 9);
        assert_eq!(mesh.cell_count(), 3 * 2 + 3 - 1);
        assert_eq!(markers(&mesh), vec![0, 0, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn single_layer_has_no_thickness() {
        let mesh = MakeBlock1D::new(1, 3).execute().unwrap();
        assert_eq!(mesh.cell_count(), 3);
        assert_eq!(markers(&mesh), vec![1, 2, 3]);
    }

    #[test]
    fn block_model_rejects_empty() {
        assert!(MakeBlock1D::new(0, 2).execute().is_err());
        assert!(MakeBlock1D::new(2, 0).execute().is_err());
    }
}
