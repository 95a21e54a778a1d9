use std::fmt;

use crate::math::{Point3, Vector3, TOLERANCE};

use super::Line;

/// Classification of a point relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is on the positive side (in the direction of the normal).
    Front,
    /// Point is on the negative side (opposite the normal).
    Back,
    /// Point lies on the plane (within tolerance).
    On,
}

/// An infinite plane in Hessian normal form, `norm · x = d` with `|norm| = 1`.
///
/// Every constructor returns `None` when its input does not span a plane, so a
/// value of this type is always valid. There is no default or "zero" plane.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    norm: Vector3,
    d: f64,
}

impl Plane {
    /// Creates a plane from a normal vector and the offset `d` in `norm · x = d`.
    ///
    /// The normal is rescaled to unit length and `d` with it, so the described
    /// point set is unchanged. Returns `None` for a zero-length normal.
    #[must_use]
    pub fn new(norm: Vector3, d: f64) -> Option<Self> {
        let len = norm.norm();
        if len < TOLERANCE {
            return None;
        }
        Some(Self {
            norm: norm / len,
            d: d / len,
        })
    }

    /// Creates a plane from a normal vector and a point lying on it.
    #[must_use]
    pub fn from_normal_point(norm: Vector3, x0: &Point3) -> Option<Self> {
        let len = norm.norm();
        if len < TOLERANCE {
            return None;
        }
        let norm = norm / len;
        Some(Self {
            norm,
            d: norm.dot(&x0.coords),
        })
    }

    /// Creates the plane through three points.
    ///
    /// The normal follows the right-hand rule on `p0 → p1 → p2`.
    /// Returns `None` if the points are collinear or coincident.
    #[must_use]
    pub fn from_points(p0: &Point3, p1: &Point3, p2: &Point3) -> Option<Self> {
        let n = (p1 - p0).cross(&(p2 - p0));
        Self::from_normal_point(n, p0)
    }

    /// Creates a plane from the general equation `a*x + b*y + c*z + d = 0`.
    #[must_use]
    pub fn from_coefficients(a: f64, b: f64, c: f64, d: f64) -> Option<Self> {
        Self::new(Vector3::new(a, b, c), -d)
    }

    /// Returns the unit normal.
    #[must_use]
    pub fn norm(&self) -> &Vector3 {
        &self.norm
    }

    /// Returns the signed distance of the plane from the origin.
    #[must_use]
    pub fn d(&self) -> f64 {
        self.d
    }

    /// Returns the foot point of the origin on the plane, `norm * d`.
    #[must_use]
    pub fn x0(&self) -> Point3 {
        Point3::from(self.norm * self.d)
    }

    /// Signed distance from `pos` to the plane.
    /// Positive = on the normal side, negative = opposite.
    #[must_use]
    pub fn distance(&self, pos: &Point3) -> f64 {
        self.norm.dot(&pos.coords) - self.d
    }

    /// Returns `true` if `pos` lies on the plane, `|distance(pos)| < tol`.
    #[must_use]
    pub fn touch(&self, pos: &Point3, tol: f64) -> bool {
        self.distance(pos).abs() < tol
    }

    /// Classifies `pos` relative to the plane.
    #[must_use]
    pub fn side(&self, pos: &Point3, tol: f64) -> PlaneSide {
        let dist = self.distance(pos);
        if dist > tol {
            PlaneSide::Front
        } else if dist < -tol {
            PlaneSide::Back
        } else {
            PlaneSide::On
        }
    }

    /// Checks that the normal still has unit length within `tol`.
    #[must_use]
    pub fn check_validity(&self, tol: f64) -> bool {
        (self.norm.norm() - 1.0).abs() < tol
    }

    /// Compares two planes: both normals and both offsets must match within `tol`.
    ///
    /// Antiparallel representations of the same surface compare unequal.
    #[must_use]
    pub fn compare(&self, other: &Plane, tol: f64) -> bool {
        (self.norm - other.norm).norm() < tol && (self.d - other.d).abs() < tol
    }

    /// Returns the line where this plane meets `other`.
    ///
    /// Returns `None` if the normals are parallel within `tol`, which includes
    /// identical and antiparallel planes.
    #[must_use]
    pub fn intersect_plane(&self, other: &Plane, tol: f64) -> Option<Line> {
        let dir = self.norm.cross(&other.norm);
        let det = dir.norm_squared();
        if dir.norm() < tol {
            return None;
        }

        // Point on both planes spanned by the two normals:
        // p = a * n1 + b * n2 with n1·p = d1 and n2·p = d2.
        let c = self.norm.dot(&other.norm);
        let a = (self.d - other.d * c) / det;
        let b = (other.d - self.d * c) / det;
        let origin = Point3::from(self.norm * a + other.norm * b);

        Line::from_direction(origin, dir / dir.norm())
    }

    /// Returns the point where `line` crosses the plane.
    ///
    /// Returns `None` if the line is parallel to the plane within `tol`. With
    /// `inside` set, also returns `None` when the crossing lies outside the
    /// segment `[p0, p1]` of the line; the endpoints count as inside.
    #[must_use]
    pub fn intersect_line(&self, line: &Line, tol: f64, inside: bool) -> Option<Point3> {
        let dir = line.direction();
        let len = dir.norm();
        let denom = self.norm.dot(&dir);
        if (denom / len).abs() < tol {
            return None;
        }

        let t = -self.distance(line.p0()) / denom;
        if inside {
            let t_tol = tol / len;
            if t < -t_tol || t > 1.0 + t_tol {
                return None;
            }
        }
        Some(line.at(t))
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "norm = ({}, {}, {}) d = {}",
            self.norm.x, self.norm.y, self.norm.z, self.d
        )
    }
}
