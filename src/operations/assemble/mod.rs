mod crossing;
mod switch;

pub use crossing::AssembleCrossing;
pub use switch::AssembleSwitch;

use crate::geometry::CenterLine;
use crate::math::Point3;

/// End-taper bit flags.
///
/// The near flags apply at a part's first sample, the far flags at its
/// last. Inner flags select the polyline's `vertices_inner` ring, outer
/// flags its `vertices_outer` ring; a set flag whose ring is absent in the
/// profile falls back to the normal ring.
pub const ENDS_NONE: u8 = 0;
pub const ENDS_NEAR_INNER: u8 = 1;
pub const ENDS_FAR_INNER: u8 = 2;
pub const ENDS_NEAR_OUTER: u8 = 4;
pub const ENDS_FAR_OUTER: u8 = 8;

/// Part names shared between the assemblers and the profile polylines.
pub const LEFT_RAIL: &str = "leftrail";
pub const RIGHT_RAIL: &str = "rightrail";
pub const LEFT_FROG_RAIL: &str = "leftfrograil";
pub const RIGHT_FROG_RAIL: &str = "rightfrograil";
pub const LEFT_GUARD_RAIL: &str = "leftguardrail";
pub const RIGHT_GUARD_RAIL: &str = "rightguardrail";
pub const BALLAST: &str = "ballast";
pub const TIES: &str = "ties";

/// Rigid rotation descriptor for the moving point rails of a switch: a
/// pivot position plus a two-keyframe rotation about the vertical axis
/// (radians, frame 0 is the resting pose).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointAnimation {
    pub pivot: Point3,
    pub angle0: f64,
    pub angle1: f64,
}

/// One named track component ready for the section sweep.
#[derive(Debug, Clone)]
pub struct PartLine {
    pub part: &'static str,
    pub centerline: CenterLine,
    pub ends: u8,
    pub animation: Option<PointAnimation>,
}

impl PartLine {
    pub(crate) fn plain(part: &'static str, centerline: CenterLine) -> Self {
        Self {
            part,
            centerline,
            ends: ENDS_NONE,
            animation: None,
        }
    }

    pub(crate) fn tapered(part: &'static str, centerline: CenterLine, ends: u8) -> Self {
        Self {
            part,
            centerline,
            ends,
            animation: None,
        }
    }
}
