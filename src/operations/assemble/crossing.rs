use tracing::debug;

use super::{
    PartLine, BALLAST, ENDS_FAR_OUTER, ENDS_NEAR_INNER, LEFT_GUARD_RAIL, LEFT_RAIL,
    RIGHT_GUARD_RAIL, RIGHT_RAIL, TIES,
};
use crate::geometry::{find_crossing, CenterLine};
use crate::profile::Profile;

const ENDS_BOTH_TAPERED: u8 = ENDS_NEAR_INNER | ENDS_FAR_OUTER;

/// Guard-rail margin past the outermost flangeway gap.
const GUARD_MARGIN: f64 = 0.1;

/// Guard-rail end taper length.
const GUARD_TAPER: f64 = 0.2;

/// Beyond any real part length; used as an open-ended cut bound.
const FAR_CUT: f64 = 1000.0;

/// One flangeway gap cut into a crossing rail, with the taper cut beyond
/// each edge. All distances are along the clipped rail's own centerline,
/// sorted so `near_taper <= near_edge <= far_edge <= far_taper`.
#[derive(Debug, Clone, Copy)]
struct Gap {
    near_taper: f64,
    near_edge: f64,
    far_edge: f64,
    far_taper: f64,
    /// Lateral offset of the opposing rail that cuts this gap.
    opposing_offset: f64,
}

/// Decomposes a diamond crossing into its named part lines.
///
/// Each of the four running rails is interrupted where the other route's
/// two rails cross it: per opposing rail, four offset-crossing queries
/// locate the flangeway gap's edges and the railhead taper cuts beyond
/// them (8 queries per rail in all), and the sorted gap list yields the
/// approach / through-frog / departure clips. A guard rail spans the frog
/// region inside each running rail, shifted by the skew measured with one
/// extra crossing query at the guard's own lateral offset so non-right-
/// angle crossings keep the guards opposite their gaps.
pub struct AssembleCrossing<'a> {
    profile: &'a Profile,
}

impl<'a> AssembleCrossing<'a> {
    #[must_use]
    pub fn new(profile: &'a Profile) -> Self {
        Self { profile }
    }

    /// Builds the part-line list for the crossing.
    #[must_use]
    pub fn execute(&self, cl1: &CenterLine, cl2: &CenterLine) -> Vec<PartLine> {
        let g = self.profile.gauge;
        let mut parts = Vec::new();

        for (own, other, rail, guard, side) in [
            (cl1, cl2, RIGHT_RAIL, RIGHT_GUARD_RAIL, 1.0),
            (cl1, cl2, LEFT_RAIL, LEFT_GUARD_RAIL, -1.0),
            (cl2, cl1, RIGHT_RAIL, RIGHT_GUARD_RAIL, 1.0),
            (cl2, cl1, LEFT_RAIL, LEFT_GUARD_RAIL, -1.0),
        ] {
            let offset = side * g / 2.0;
            let gaps = self.rail_gaps(own, other, offset);
            self.push_clipped_rail(&mut parts, own, rail, &gaps);
            self.push_guard_rail(&mut parts, own, other, guard, offset, &gaps);
        }

        let cl2_shared = cl2.project_perp(cl1);
        parts.push(PartLine::plain(BALLAST, cl1.clone()));
        parts.push(PartLine::plain(TIES, cl1.clone()));
        parts.push(PartLine::plain(BALLAST, cl2_shared.clone()));
        parts.push(PartLine::plain(TIES, cl2_shared));
        parts
    }

    /// Locates the flangeway gaps the opposing route cuts into the rail at
    /// `offset`. A gap whose four queries do not all cross is skipped and
    /// the rail degrades to the gaps that remain.
    fn rail_gaps(&self, own: &CenterLine, other: &CenterLine, offset: f64) -> Vec<Gap> {
        let g = self.profile.gauge;
        let f = self.profile.flangeway;
        let rh = self.profile.railhead;
        let mut gaps = Vec::with_capacity(2);
        for opposing in [g / 2.0, -g / 2.0] {
            let e1 = find_crossing(own, other, offset, opposing - f / 2.0);
            let e2 = find_crossing(own, other, offset, opposing + f / 2.0);
            let t1 = find_crossing(own, other, offset, opposing - f / 2.0 - rh);
            let t2 = find_crossing(own, other, offset, opposing + f / 2.0 + rh);
            let (Some(e1), Some(e2), Some(t1), Some(t2)) = (e1, e2, t1, t2) else {
                debug!(offset, opposing, "incomplete gap, skipping");
                continue;
            };
            let near_edge = e1.dist1.min(e2.dist1);
            let far_edge = e1.dist1.max(e2.dist1);
            let near_taper = t1.dist1.min(t2.dist1).min(near_edge);
            let far_taper = t1.dist1.max(t2.dist1).max(far_edge);
            gaps.push(Gap {
                near_taper,
                near_edge,
                far_edge,
                far_taper,
                opposing_offset: opposing,
            });
        }
        gaps.sort_by(|a, b| a.near_edge.total_cmp(&b.near_edge));
        gaps
    }

    /// Emits the approach / through-frog / departure clips of one rail.
    fn push_clipped_rail(
        &self,
        parts: &mut Vec<PartLine>,
        own: &CenterLine,
        rail: &'static str,
        gaps: &[Gap],
    ) {
        let Some(first) = gaps.first() else {
            parts.push(PartLine::plain(rail, own.clone()));
            return;
        };
        parts.push(PartLine::tapered(
            rail,
            own.sub_range(None, Some(-1.0), Some(first.near_taper), Some(first.near_edge)),
            ENDS_FAR_OUTER,
        ));
        for pair in gaps.windows(2) {
            parts.push(PartLine::tapered(
                rail,
                own.sub_range(
                    Some(pair[0].far_edge),
                    Some(pair[0].far_taper),
                    Some(pair[1].near_taper),
                    Some(pair[1].near_edge),
                ),
                ENDS_BOTH_TAPERED,
            ));
        }
        let last = gaps[gaps.len() - 1];
        parts.push(PartLine::tapered(
            rail,
            own.sub_range(Some(last.far_edge), Some(last.far_taper), Some(FAR_CUT), None),
            ENDS_NEAR_INNER,
        ));
    }

    /// Emits the guard rail spanning the frog region inside one rail.
    fn push_guard_rail(
        &self,
        parts: &mut Vec<PartLine>,
        own: &CenterLine,
        other: &CenterLine,
        guard: &'static str,
        offset: f64,
        gaps: &[Gap],
    ) {
        let (Some(first), Some(last)) = (gaps.first(), gaps.last()) else {
            return;
        };
        let f = self.profile.flangeway;
        let rh = self.profile.railhead;
        // Guard sits inside the gauge, a flangeway plus railhead off the
        // running rail. Its crossing with the first opposing rail lands at
        // a different along-curve distance than the rail's own when the
        // routes cross at a skew; that delta shifts the whole guard.
        let guard_offset = offset - offset.signum() * (f + rh);
        let center = (first.near_edge + first.far_edge) / 2.0;
        let skew = find_crossing(own, other, guard_offset, first.opposing_offset)
            .map_or(0.0, |c| c.dist1 - center);
        let start = first.near_edge + skew - GUARD_MARGIN;
        let end = last.far_edge + skew + GUARD_MARGIN;
        if end - start < 2.0 * GUARD_TAPER {
            return;
        }
        parts.push(PartLine::tapered(
            guard,
            own.sub_range(
                Some(start),
                Some(start + GUARD_TAPER),
                Some(end - GUARD_TAPER),
                Some(end),
            ),
            ENDS_BOTH_TAPERED,
        ));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::CenterLine;
    use crate::profile::Profile;
    use crate::shape::{Move, Path};

    fn crossing_profile() -> Profile {
        serde_json::from_str(
            r#"{
                "gauge": 1.435,
                "railhead": 0.07,
                "flangeway": 0.045,
                "LODs": [{
                    "Name": "rails", "TexName": "t.ace", "CutoffRadius": 700,
                    "MipMapLevelOfDetailBias": 0, "Polylines": [{
                        "part": "rightrail",
                        "DeltaTexCoord": [0.1, 0],
                        "Vertices": [
                            { "Position": [0.6, 0.2], "TexCoord": [0.1, 0.1] },
                            { "Position": [0.75, 0.2], "TexCoord": [0.2, 0.1] }
                        ]
                    }]
                }]
            }"#,
        )
        .unwrap()
    }

    fn line(start: [f64; 3], angle: f64, length: f64) -> CenterLine {
        CenterLine::from_path(&Path {
            start,
            angle,
            moves: vec![Move::Straight { length }],
        })
        .unwrap()
    }

    #[test]
    fn right_angle_diamond_clips_every_rail() {
        let profile = crossing_profile();
        // cl1 north through (10, 0..20), cl2 east through (0..20, 10).
        let cl1 = line([10.0, 0.0, 0.0], 0.0, 20.0);
        let cl2 = line([0.0, 0.0, 10.0], 90.0, 20.0);
        let parts = AssembleCrossing::new(&profile).execute(&cl1, &cl2);

        // Per route: each rail in 3 clips, 2 guards; plus ballast/ties.
        let rail_clips = parts
            .iter()
            .filter(|p| p.part == RIGHT_RAIL || p.part == LEFT_RAIL)
            .count();
        assert_eq!(rail_clips, 12);
        let guards = parts
            .iter()
            .filter(|p| p.part.ends_with("guardrail"))
            .count();
        assert_eq!(guards, 4);
        assert_eq!(parts.iter().filter(|p| p.part == BALLAST).count(), 2);
        assert_eq!(parts.iter().filter(|p| p.part == TIES).count(), 2);
        assert!(parts.iter().all(|p| p.animation.is_none()));
    }

    #[test]
    fn right_angle_gaps_are_flangeway_wide() {
        let profile = crossing_profile();
        let cl1 = line([10.0, 0.0, 0.0], 0.0, 20.0);
        let cl2 = line([0.0, 0.0, 10.0], 90.0, 20.0);
        let assembler = AssembleCrossing::new(&profile);
        let gaps = assembler.rail_gaps(&cl1, &cl2, profile.gauge / 2.0);
        assert_eq!(gaps.len(), 2);
        for gap in &gaps {
            assert!((gap.far_edge - gap.near_edge - profile.flangeway).abs() < 1e-9);
            assert!(gap.near_taper < gap.near_edge);
            assert!(gap.far_taper > gap.far_edge);
        }
        // The two gaps are one gauge apart, centered on the other route.
        let c0 = (gaps[0].near_edge + gaps[0].far_edge) / 2.0;
        let c1 = (gaps[1].near_edge + gaps[1].far_edge) / 2.0;
        assert!((c1 - c0 - profile.gauge).abs() < 1e-9);
    }

    #[test]
    fn skewed_diamond_still_produces_full_part_set() {
        let profile = crossing_profile();
        let cl1 = line([10.0, 0.0, 0.0], 0.0, 25.0);
        let cl2 = line([0.0, 0.0, 4.0], 60.0, 25.0);
        let parts = AssembleCrossing::new(&profile).execute(&cl1, &cl2);
        let guards = parts
            .iter()
            .filter(|p| p.part.ends_with("guardrail"))
            .count();
        assert_eq!(guards, 4);
        // Skewed gaps are wider than the flangeway along the rail.
        let assembler = AssembleCrossing::new(&profile);
        let gaps = assembler.rail_gaps(&cl1, &cl2, profile.gauge / 2.0);
        assert_eq!(gaps.len(), 2);
        for gap in &gaps {
            assert!(gap.far_edge - gap.near_edge > profile.flangeway);
        }
    }

    #[test]
    fn missing_crossing_degrades_to_plain_rail() {
        let profile = crossing_profile();
        let cl1 = line([10.0, 0.0, 0.0], 0.0, 20.0);
        let cl2 = line([100.0, 0.0, 10.0], 90.0, 20.0); // never reaches cl1
        let parts = AssembleCrossing::new(&profile).execute(&cl1, &cl2);
        // No gaps: each rail survives whole, no guards.
        let rails = parts
            .iter()
            .filter(|p| p.part == RIGHT_RAIL || p.part == LEFT_RAIL)
            .count();
        assert_eq!(rails, 4);
        assert_eq!(
            parts
                .iter()
                .filter(|p| p.part.ends_with("guardrail"))
                .count(),
            0
        );
    }
}
