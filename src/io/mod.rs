//! Mesh persistence.

pub mod gmsh;

pub use gmsh::write_gmsh;
