pub mod extrude;
pub mod far_field;
pub mod grid;

pub use extrude::{Extrude2D, Extrude3D, ExtrudeParams};
pub use far_field::{AddTriangleBoundary, FarFieldParams};
pub use grid::{MakeBlock1D, MakeGrid, MakeMesh1D, MarkerType};
