use std::fmt;
use std::path::PathBuf;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::math::Point3;

/// One horizontal path move.
///
/// Shape documents store moves in a compact array form:
/// - `[length, 0]` — straight move
/// - `[radius, angle]` — curve with the given signed radius and total turn
///   angle in degrees
/// - `[radius, angle, segments]` — curve with an explicit segment count
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Move {
    Straight {
        length: f64,
    },
    Curve {
        radius: f64,
        /// Total turn angle in degrees, positive turning right.
        angle: f64,
        /// Explicit flattening segment count; `ceil(|angle|)` when absent.
        segments: Option<u32>,
    },
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MoveVisitor;

        impl<'de> Visitor<'de> for MoveVisitor {
            type Value = Move;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a move array of 2 or 3 numbers")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Move, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let first: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let angle: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let segments: Option<u32> = seq.next_element()?;
                if seq.next_element::<f64>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }
                if angle == 0.0 {
                    Ok(Move::Straight { length: first })
                } else {
                    Ok(Move::Curve {
                        radius: first,
                        angle,
                        segments,
                    })
                }
            }
        }

        deserializer.deserialize_seq(MoveVisitor)
    }
}

/// Horizontal path spec: a start pose plus an ordered sequence of moves.
///
/// Immutable once parsed; each path produces exactly one centerline.
#[derive(Debug, Clone, Deserialize)]
pub struct Path {
    /// Start position as stored in the document: `(x, elevation, y)`.
    pub start: [f64; 3],
    /// Start heading in compass degrees (0 = +y).
    pub angle: f64,
    pub moves: Vec<Move>,
}

impl Path {
    /// Start position in kernel coordinates (horizontal plane x-y, z up).
    #[must_use]
    pub fn start_point(&self) -> Point3 {
        Point3::new(self.start[0], self.start[2], self.start[1])
    }
}

/// Which diverging side of a switch is a derail (its running rail, ballast
/// and ties are omitted so a vehicle taking that route leaves the rails).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Derail {
    Left,
    Right,
}

/// Reference to a host-side switch-stand asset placed next to a switch.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchStand {
    pub file: PathBuf,
    /// Placement in document coordinates.
    pub position: [f64; 3],
    /// Rotation about the vertical axis, degrees.
    pub rotation: f64,
    #[serde(default, rename = "crankRotation")]
    pub crank_rotation: Option<f64>,
}

/// Top-level unit of work: one or two paths plus switch/crossing markers.
#[derive(Debug, Clone, Deserialize)]
pub struct Shape {
    pub paths: Vec<Path>,
    /// Present for switch shapes; `true` when the straight route is the
    /// mainline (rest pose of the moving points).
    #[serde(default)]
    pub mainroute: Option<bool>,
    #[serde(default)]
    pub derail: Option<Derail>,
    /// Guard-rail cut lengths `[lead, flat, total]` measured from the frog.
    #[serde(default, rename = "guardRailLengths")]
    pub guard_rail_lengths: Option<[f64; 3]>,
    #[serde(default)]
    pub switchstand: Option<SwitchStand>,
    /// Output artifact name handed to the host exporter.
    pub filename: String,
}

impl Shape {
    /// True when this shape is a switch (turnout) rather than plain track
    /// or a diamond crossing.
    #[must_use]
    pub fn is_switch(&self) -> bool {
        self.mainroute.is_some()
    }
}
