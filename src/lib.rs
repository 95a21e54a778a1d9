pub mod error;
pub mod generators;
pub mod geometry;
pub mod io;
pub mod math;
pub mod mesh;
pub mod operations;

pub use error::{MeshgenError, Result};
pub use mesh::Mesh;
