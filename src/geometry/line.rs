use crate::math::{Point3, Vector3, TOLERANCE};

/// A line through two distinct points.
///
/// The parametric form is `P(t) = p0 + t * (p1 - p0)`, so the defining
/// segment is the parameter range `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct Line {
    p0: Point3,
    p1: Point3,
}

impl Line {
    /// Creates a line through `p0` and `p1`.
    ///
    /// Returns `None` if the points coincide within [`TOLERANCE`].
    #[must_use]
    pub fn new(p0: Point3, p1: Point3) -> Option<Self> {
        if (p1 - p0).norm() < TOLERANCE {
            return None;
        }
        Some(Self { p0, p1 })
    }

    /// Creates a line through `origin` along `direction`.
    ///
    /// Returns `None` for a zero-length direction.
    #[must_use]
    pub fn from_direction(origin: Point3, direction: Vector3) -> Option<Self> {
        Self::new(origin, origin + direction)
    }

    /// Returns the first defining point.
    #[must_use]
    pub fn p0(&self) -> &Point3 {
        &self.p0
    }

    /// Returns the (non-normalized) direction `p1 - p0`.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        self.p1 - self.p0
    }

    /// Evaluates the line at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> Point3 {
        self.p0 + self.direction() * t
    }

    /// Returns `true` if `point` lies on the line within `tol`.
    #[must_use]
    pub fn touch(&self, point: &Point3, tol: f64) -> bool {
        let dir = self.direction();
        dir.cross(&(point - self.p0)).norm() / dir.norm() < tol
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn coincident_points_give_no_line() {
        assert!(Line::new(p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0)).is_none());
        assert!(Line::from_direction(p(0.0, 0.0, 0.0), Vector3::zeros()).is_none());
    }

    #[test]
    fn evaluates_along_segment() {
        let line = Line::new(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0)).unwrap();
        assert!((line.at(0.5) - p(1.0, 0.0, 0.0)).norm() < TOLERANCE);
        assert!(line.touch(&p(5.0, 0.0, 0.0), TOLERANCE));
        assert!(!line.touch(&p(1.0, 0.1, 0.0), TOLERANCE));
    }
}
