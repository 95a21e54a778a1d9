pub mod polygon;

/// 3D point type. 1D and 2D meshes use the leading components only.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Shared by coordinate validation, plane predicates, node matching and
/// boundary tagging so that every meshing stage agrees on coincidence.
pub const TOLERANCE: f64 = 1e-10;
