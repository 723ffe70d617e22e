use super::{Point3, Vector3};

/// Twice the signed area of triangle `a, b, c` in the horizontal plane.
///
/// Positive when `c` lies to the left of the directed line `a` to `b`
/// (negative to the right, zero for collinear) in the compass frame where
/// heading 0 runs along +y. Used only for orientation tests (path
/// left/right ordering, crossing existence).
#[must_use]
pub fn tri_area_2(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// Bounded segment-segment intersection in the horizontal plane.
///
/// Solves the 2x2 system for parameters `s` on `a-b` and `t` on `c-d`.
/// Returns `None` when the determinant is exactly zero (parallel or
/// collinear segments are treated as a miss, never subdivided) or when
/// either parameter falls outside `[0, 1]`. The returned point always has
/// `z = 0`; all callers operate purely in the horizontal plane.
#[must_use]
pub fn segment_intersect(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> Option<Point3> {
    let denom =
        a.x * (d.y - c.y) + b.x * (c.y - d.y) + c.x * (a.y - b.y) + d.x * (b.y - a.y);
    if denom == 0.0 {
        return None;
    }
    let s = (a.x * (d.y - c.y) + c.x * (a.y - d.y) + d.x * (c.y - a.y)) / denom;
    if !(0.0..=1.0).contains(&s) {
        return None;
    }
    let t = -(a.x * (c.y - b.y) + b.x * (a.y - c.y) + c.x * (b.y - a.y)) / denom;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(Point3::new(
        a.x + s * (b.x - a.x),
        a.y + s * (b.y - a.y),
        0.0,
    ))
}

/// Unit direction vector for a compass-style heading in degrees.
///
/// Heading 0 points along +y and the components are `(sin, cos, 0)`; this
/// is not the mathematical angle convention. All downstream angle
/// arithmetic (perpendiculars at heading + 90, accumulated curve rotation)
/// depends on it exactly.
#[must_use]
pub fn heading_vector(angle_degrees: f64) -> Vector3 {
    let a = angle_degrees.to_radians();
    Vector3::new(a.sin(), a.cos(), 0.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    #[test]
    fn tri_area_sign_gives_side() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(0.0, 2.0, 0.0);
        let right = Point3::new(2.0, 0.0, 0.0);
        let left = Point3::new(-2.0, 0.0, 0.0);
        assert!(tri_area_2(&a, &b, &right) < 0.0);
        assert!(tri_area_2(&a, &b, &left) > 0.0);
    }

    #[test]
    fn tri_area_collinear_zero() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 1.0, 0.0);
        let c = Point3::new(3.0, 3.0, 0.0);
        assert!(tri_area_2(&a, &b, &c).abs() < TOLERANCE);
    }

    #[test]
    fn segments_crossing_at_midpoints() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 2.0, 0.0);
        let c = Point3::new(0.0, 2.0, 0.0);
        let d = Point3::new(2.0, 0.0, 0.0);
        let pt = segment_intersect(&a, &b, &c, &d).unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE);
        assert!((pt.y - 1.0).abs() < TOLERANCE);
        assert!(pt.z.abs() < TOLERANCE);
    }

    #[test]
    fn segments_intersect_is_symmetric() {
        let a = Point3::new(-1.0, 0.5, 0.0);
        let b = Point3::new(3.0, 1.5, 0.0);
        let c = Point3::new(1.0, -2.0, 0.0);
        let d = Point3::new(1.5, 4.0, 0.0);
        let p1 = segment_intersect(&a, &b, &c, &d).unwrap();
        let p2 = segment_intersect(&c, &d, &a, &b).unwrap();
        assert!((p1.x - p2.x).abs() < 1e-9);
        assert!((p1.y - p2.y).abs() < 1e-9);
    }

    #[test]
    fn parallel_segments_miss() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let d = Point3::new(1.0, 1.0, 0.0);
        assert!(segment_intersect(&a, &b, &c, &d).is_none());
    }

    #[test]
    fn off_segment_miss() {
        // Lines cross at (5, 0) but segment c-d stops short of it.
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, 0.0, 0.0);
        let c = Point3::new(5.0, 3.0, 0.0);
        let d = Point3::new(5.0, 1.0, 0.0);
        assert!(segment_intersect(&a, &b, &c, &d).is_none());
    }

    #[test]
    fn heading_vector_compass_convention() {
        let north = heading_vector(0.0);
        assert!((north.x).abs() < TOLERANCE);
        assert!((north.y - 1.0).abs() < TOLERANCE);

        let east = heading_vector(90.0);
        assert!((east.x - 1.0).abs() < TOLERANCE);
        assert!((east.y).abs() < 1e-15);

        let v = heading_vector(30.0);
        assert!((v.norm() - 1.0).abs() < TOLERANCE);
    }
}
