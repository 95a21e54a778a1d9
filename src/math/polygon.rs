use super::{Point3, TOLERANCE};

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` if `point` lies inside the closed XY polygon (crossing number).
///
/// Points exactly on an edge may land on either side.
#[must_use]
pub fn point_in_polygon_2d(point: &Point3, polygon: &[Point3]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    for i in 0..n {
        let (a, b) = (&polygon[i], &polygon[(i + 1) % n]);
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Signed volume of the tetrahedron `(a, b, c, d)`.
///
/// Positive when `d` lies on the side of `(a, b, c)` that the counter-clockwise
/// normal points to.
#[must_use]
pub fn signed_volume_tet(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> f64 {
    (b - a).cross(&(c - a)).dot(&(d - a)) / 6.0
}

/// Returns `true` if every consecutive pair increases by more than [`TOLERANCE`].
#[must_use]
pub fn is_strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] - w[0] > TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn ccw_square_has_positive_area() {
        let sq = [p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 2.0, 0.0), p(0.0, 2.0, 0.0)];
        assert!((signed_area_2d(&sq) - 4.0).abs() < TOLERANCE);

        let cw: Vec<_> = sq.iter().rev().copied().collect();
        assert!((signed_area_2d(&cw) + 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn degenerate_polygon_has_zero_area() {
        assert!(signed_area_2d(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]).abs() < TOLERANCE);
    }

    #[test]
    fn point_in_concave_polygon() {
        // U shape opening upwards
        let u = [
            p(0.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(3.0, 3.0, 0.0),
            p(2.0, 3.0, 0.0),
            p(2.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(1.0, 3.0, 0.0),
            p(0.0, 3.0, 0.0),
        ];
        assert!(point_in_polygon_2d(&p(0.5, 2.0, 0.0), &u));
        assert!(point_in_polygon_2d(&p(1.5, 0.5, 0.0), &u));
        assert!(!point_in_polygon_2d(&p(1.5, 2.0, 0.0), &u));
        assert!(!point_in_polygon_2d(&p(4.0, 1.0, 0.0), &u));
        assert!(!point_in_polygon_2d(&p(0.5, 0.5, 0.0), &u[..2]));
    }

    #[test]
    fn unit_tet_volume() {
        let v = signed_volume_tet(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            &p(0.0, 0.0, 1.0),
        );
        assert!((v - 1.0 / 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn increasing_checks() {
        assert!(is_strictly_increasing(&[0.0, 1.0, 2.5]));
        assert!(is_strictly_increasing(&[3.0]));
        assert!(!is_strictly_increasing(&[0.0, 1.0, 1.0]));
        assert!(!is_strictly_increasing(&[2.0, 1.0]));
        assert!(!is_strictly_increasing(&[0.0, f64::NAN]));
    }
}
