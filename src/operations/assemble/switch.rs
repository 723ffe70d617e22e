use tracing::debug;

use super::{
    PartLine, PointAnimation, BALLAST, ENDS_FAR_OUTER, ENDS_NEAR_INNER, ENDS_NONE, LEFT_FROG_RAIL,
    LEFT_GUARD_RAIL, LEFT_RAIL, RIGHT_FROG_RAIL, RIGHT_GUARD_RAIL, RIGHT_RAIL, TIES,
};
use crate::geometry::{find_crossing, CenterLine};
use crate::math::Vector3;
use crate::profile::Profile;
use crate::shape::{Derail, Shape};

/// A part that tapers in at its start and out at its end: inner ring at
/// the first sample, outer ring at the last.
const ENDS_BOTH_TAPERED: u8 = ENDS_NEAR_INNER | ENDS_FAR_OUTER;

/// Taper transition length of the short guard rail ahead of the points.
const POINT_GUARD_LEAD: f64 = 0.1;

/// Default guard-rail cut lengths `[lead, flat, total]` from the frog.
const DEFAULT_GUARD_LENGTHS: [f64; 3] = [1.0, 1.8, 2.0];

/// Beyond any real part length; used as an open-ended cut bound.
const FAR_CUT: f64 = 1000.0;

/// Decomposes a switch (turnout) into its named part lines.
///
/// The first centerline is the left/through route, the second the
/// right-diverging route. Every part is derived from offset-curve crossing
/// queries at gauge-derived lateral offsets; a crossing that does not exist
/// silently drops the dependent part and the assembly degrades to whatever
/// the remaining crossings support.
pub struct AssembleSwitch<'a> {
    shape: &'a Shape,
    profile: &'a Profile,
}

impl<'a> AssembleSwitch<'a> {
    #[must_use]
    pub fn new(shape: &'a Shape, profile: &'a Profile) -> Self {
        Self { shape, profile }
    }

    /// Builds the part-line list for the switch.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn execute(&self, cl1: &CenterLine, cl2: &CenterLine) -> Vec<PartLine> {
        let g = self.profile.gauge;
        let rh = self.profile.railhead;
        let f = self.profile.flangeway;
        let derail = self.shape.derail;
        let guard = self.shape.guard_rail_lengths.unwrap_or(DEFAULT_GUARD_LENGTHS);
        let [guard_lead, guard_flat, guard_total] = guard;
        let guard_taper = guard_total - guard_flat;

        // Crossing queries at the gauge-derived offsets. `points0` is the
        // route divergence itself, `points` where the point-rail tips reach
        // full flangeway-plus-railhead separation; the frog queries locate
        // the crossing of the two inner rails and its railhead tapers.
        let points0 = find_crossing(cl1, cl2, 0.0, 0.0);
        let points = find_crossing(cl1, cl2, (f + rh) / 2.0, -(f + rh) / 2.0);
        let frog_point = find_crossing(cl1, cl2, g / 2.0, -g / 2.0);
        let frog_start = find_crossing(cl1, cl2, g / 2.0 - f / 2.0, -(g / 2.0 - f / 2.0));
        let frog_point_rh = find_crossing(cl1, cl2, (g + rh) / 2.0, -(g + rh) / 2.0);
        let frog_start_rh = find_crossing(
            cl1,
            cl2,
            g / 2.0 - f / 2.0 + rh / 2.0,
            -(g / 2.0 - f / 2.0 + rh / 2.0),
        );

        let (anim_left, anim_right) = self.point_animations(points0.as_ref(), points.as_ref());

        // The diverging route's whole-line parts share perpendiculars
        // projected onto the through route so both routes can carry one
        // ballast/tie section.
        let cl2_shared = cl2.project_perp(cl1);

        let mut parts = Vec::new();

        if let Some(fs) = &frog_start {
            let x = fs.dist1;
            parts.push(PartLine::tapered(
                RIGHT_GUARD_RAIL,
                cl1.sub_range(
                    Some(x - POINT_GUARD_LEAD),
                    Some(x),
                    Some(x + guard_flat),
                    Some(x + guard_total),
                ),
                ENDS_BOTH_TAPERED,
            ));
            let x = fs.dist2;
            parts.push(PartLine::tapered(
                LEFT_GUARD_RAIL,
                cl2.sub_range(
                    Some(x - POINT_GUARD_LEAD),
                    Some(x),
                    Some(x + guard_flat),
                    Some(x + guard_total),
                ),
                ENDS_BOTH_TAPERED,
            ));
        }
        if let Some(fp) = &frog_point {
            let x = fp.dist1;
            parts.push(PartLine::tapered(
                LEFT_GUARD_RAIL,
                cl1.sub_range(
                    Some(x - guard_lead),
                    Some(x - guard_lead + guard_taper),
                    Some(x + guard_flat),
                    Some(x + guard_total),
                ),
                ENDS_BOTH_TAPERED,
            ));
            let x = fp.dist2;
            parts.push(PartLine::tapered(
                RIGHT_GUARD_RAIL,
                cl2.sub_range(
                    Some(x - guard_lead),
                    Some(x - guard_lead + guard_taper),
                    Some(x + guard_flat),
                    Some(x + guard_total),
                ),
                ENDS_BOTH_TAPERED,
            ));
        }

        parts.push(PartLine::plain(LEFT_RAIL, cl1.clone()));
        if derail != Some(Derail::Left) {
            self.push_inner_rail(
                &mut parts,
                cl1,
                RIGHT_FROG_RAIL,
                RIGHT_RAIL,
                anim_right,
                points0.as_ref().map(|c| c.dist1),
                points.as_ref().map(|c| c.dist1),
                frog_start.as_ref().map(|c| c.dist1),
                frog_start_rh.as_ref().map(|c| c.dist1),
            );
        }
        if let (Some(fp), Some(fprh)) = (&frog_point, &frog_point_rh) {
            parts.push(PartLine::tapered(
                RIGHT_FROG_RAIL,
                cl1.sub_range(Some(fp.dist1), Some(fprh.dist1), Some(FAR_CUT), None),
                ENDS_BOTH_TAPERED,
            ));
        }

        parts.push(PartLine::plain(RIGHT_RAIL, cl2_shared.clone()));
        if derail != Some(Derail::Right) {
            self.push_inner_rail(
                &mut parts,
                cl2,
                LEFT_FROG_RAIL,
                LEFT_RAIL,
                anim_left,
                points0.as_ref().map(|c| c.dist2),
                points.as_ref().map(|c| c.dist2),
                frog_start.as_ref().map(|c| c.dist2),
                frog_start_rh.as_ref().map(|c| c.dist2),
            );
        }
        if let (Some(fp), Some(fprh)) = (&frog_point, &frog_point_rh) {
            parts.push(PartLine::tapered(
                LEFT_FROG_RAIL,
                cl2.sub_range(Some(fp.dist2), Some(fprh.dist2), Some(FAR_CUT), None),
                ENDS_BOTH_TAPERED,
            ));
        }

        if derail != Some(Derail::Left) {
            parts.push(PartLine::plain(BALLAST, cl1.clone()));
            parts.push(PartLine::plain(TIES, cl1.clone()));
        }
        if derail != Some(Derail::Right) {
            parts.push(PartLine::plain(BALLAST, cl2_shared.clone()));
            parts.push(PartLine::plain(TIES, cl2_shared));
        }
        parts
    }

    /// Pivot positions and two-keyframe rotations for the moving point
    /// rails. The rotation swings the points between the diverging and
    /// normal routes; with `mainroute` the points rest on the mainline.
    fn point_animations(
        &self,
        points0: Option<&crate::geometry::Crossing>,
        points: Option<&crate::geometry::Crossing>,
    ) -> (Option<PointAnimation>, Option<PointAnimation>) {
        let (Some(points0), Some(points)) = (points0, points) else {
            return (None, None);
        };
        let g = self.profile.gauge;
        let spacing = points.dist1 - points0.dist1;
        let throw = self.profile.flangeway + self.profile.railhead;
        if spacing <= 0.0 || throw > spacing {
            debug!(spacing, throw, "point pivots too close, skipping animation");
            return (None, None);
        }
        let a = (throw / spacing).asin();
        let pivot1 = points.point + Vector3::new(-g / 2.0, 0.0, 0.0);
        let pivot2 = points.point + Vector3::new(g / 2.0, 0.0, 0.0);
        if self.shape.mainroute == Some(true) {
            (
                Some(PointAnimation {
                    pivot: pivot1,
                    angle0: 0.0,
                    angle1: a,
                }),
                Some(PointAnimation {
                    pivot: pivot2,
                    angle0: -a,
                    angle1: 0.0,
                }),
            )
        } else {
            (
                Some(PointAnimation {
                    pivot: pivot1,
                    angle0: a,
                    angle1: 0.0,
                }),
                Some(PointAnimation {
                    pivot: pivot2,
                    angle0: 0.0,
                    angle1: -a,
                }),
            )
        }
    }

    /// The inner (frog-side) rail of one route: the animated point rail
    /// from the divergence to the full-throw distance, then the running
    /// rail clipped where the frog begins, tapering on its outer face.
    #[allow(clippy::too_many_arguments)]
    fn push_inner_rail(
        &self,
        parts: &mut Vec<PartLine>,
        cl: &CenterLine,
        frog_rail: &'static str,
        rail: &'static str,
        animation: Option<PointAnimation>,
        points0: Option<f64>,
        points: Option<f64>,
        frog_start: Option<f64>,
        frog_start_rh: Option<f64>,
    ) {
        if let (Some(y0), Some(x)) = (points0, points) {
            // The divergence can sit exactly on the first sample; nudge the
            // cut inside the first segment.
            let y = if y0 == 0.0 { 0.001 } else { y0 };
            parts.push(PartLine {
                part: frog_rail,
                centerline: cl.sub_range(Some(y), Some((x + y) / 2.0), Some(x), None),
                ends: ENDS_NEAR_INNER,
                animation,
            });
            if let (Some(fs), Some(fsrh)) = (frog_start, frog_start_rh) {
                parts.push(PartLine::tapered(
                    rail,
                    cl.sub_range(None, Some(x), Some(fs), Some(fsrh)),
                    ENDS_FAR_OUTER,
                ));
            } else {
                parts.push(PartLine::tapered(
                    rail,
                    cl.sub_range(None, Some(x), Some(FAR_CUT), None),
                    ENDS_NONE,
                ));
            }
        } else if let (Some(fs), Some(fsrh)) = (frog_start, frog_start_rh) {
            parts.push(PartLine::tapered(
                rail,
                cl.sub_range(None, Some(-1.0), Some(fs), Some(fsrh)),
                ENDS_FAR_OUTER,
            ));
        } else {
            parts.push(PartLine::plain(rail, cl.clone()));
        }
    }
}
