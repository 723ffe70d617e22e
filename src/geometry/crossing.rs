use tracing::debug;

use crate::geometry::CenterLine;
use crate::math::intersect_2d::{segment_intersect, tri_area_2};
use crate::math::Point3;

/// Epsilon for the coarse crossing-existence test; rejects near-collinear
/// endpoint triangles as false positives.
const AREA_EPSILON: f64 = 0.1;

/// The first intersection of two laterally offset centerlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Intersection point of the offset curves (horizontal plane, z = 0).
    pub point: Point3,
    /// Along-curve distance on the first centerline up to the crossing.
    pub dist1: f64,
    /// Along-curve distance on the second centerline up to the crossing.
    pub dist2: f64,
}

/// Finds the first point where two offset curves intersect.
///
/// Both centerlines are conceptually offset laterally by the given signed
/// amounts along each sample's perpendicular. A two-pointer sweep advances
/// whichever curve has accumulated less distance (biased by each curve's
/// start-point distance from the origin) and tests the current segment pair
/// at each step, so the search is O(n + m) amortized. That greedy merge is
/// valid only because both curves are monotonic in along-curve distance and
/// roughly co-directional, which holds for switch and crossing geometry.
///
/// Returns `None` when either curve is exhausted before an intersection is
/// found; a missing crossing is an expected degenerate outcome, never an
/// error.
#[must_use]
pub fn find_crossing(
    cl1: &CenterLine,
    cl2: &CenterLine,
    offset1: f64,
    offset2: f64,
) -> Option<Crossing> {
    let s1 = cl1.samples();
    let s2 = cl2.samples();
    let bias1 = s1[0].point.coords.norm();
    let bias2 = s2[0].point.coords.norm();
    let mut dist1 = 0.0;
    let mut dist2 = 0.0;
    let mut i1 = 0;
    let mut i2 = 0;
    while i1 < s1.len() - 1 && i2 < s2.len() - 1 {
        let p11 = s1[i1].point + s1[i1].perp * offset1;
        let p12 = s1[i1 + 1].point + s1[i1 + 1].perp * offset1;
        let p21 = s2[i2].point + s2[i2].perp * offset2;
        let p22 = s2[i2 + 1].point + s2[i2 + 1].perp * offset2;
        if let Some(point) = segment_intersect(&p11, &p12, &p21, &p22) {
            let d1 = (point - p11).norm();
            let d2 = (point - p21).norm();
            return Some(Crossing {
                point,
                dist1: dist1 + d1,
                dist2: dist2 + d2,
            });
        }
        let d1 = (p12 - p11).norm();
        let d2 = (p22 - p21).norm();
        if bias1 + dist1 + d1 < bias2 + dist2 + d2 {
            i1 += 1;
            dist1 += d1;
        } else {
            i2 += 1;
            dist2 += d2;
        }
    }
    debug!(offset1, offset2, "no crossing");
    None
}

/// Coarse crossing-existence test.
///
/// True iff the second centerline's endpoints lie on strictly opposite
/// sides of the line through the first centerline's endpoints, with
/// triangle areas beyond [`AREA_EPSILON`] on both sides.
#[must_use]
pub fn has_crossing(cl1: &CenterLine, cl2: &CenterLine) -> bool {
    let a = tri_area_2(&cl1.first().point, &cl1.last().point, &cl2.first().point);
    let b = tri_area_2(&cl1.first().point, &cl1.last().point, &cl2.last().point);
    (a > AREA_EPSILON && b < -AREA_EPSILON) || (a < -AREA_EPSILON && b > AREA_EPSILON)
}
