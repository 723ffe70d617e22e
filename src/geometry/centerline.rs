use crate::error::{GeometryError, Result};
use crate::math::intersect_2d::{heading_vector, segment_intersect};
use crate::math::{Point3, Vector3};
use crate::shape::{Move, Path};

/// One centerline sample: a position and the unit lateral direction of the
/// track at that position (always in the horizontal plane).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub point: Point3,
    pub perp: Vector3,
}

/// A sampled track running line.
///
/// Consecutive samples are connected by straight chords only; curvature is
/// pre-flattened into the samples by [`CenterLine::from_path`]. Sample
/// order defines "distance along curve" for every downstream operation.
/// The editing operations (`sub_range`, `project_perp`) never mutate in
/// place; they return a new centerline.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterLine {
    samples: Vec<Sample>,
}

impl CenterLine {
    /// Builds a centerline directly from samples.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewSamples`] for fewer than 2 samples.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if samples.len() < 2 {
            return Err(GeometryError::TooFewSamples(samples.len()).into());
        }
        Ok(Self { samples })
    }

    /// Flattens a path spec into a sampled centerline.
    ///
    /// Straight moves advance the point along the current heading and emit
    /// one sample. Curve moves are flattened with the tangent-offset
    /// construction: `m` equal chords (`ceil(|angle|)` unless overridden),
    /// each built from two half-steps of tangent length `t = |r*tan(a/2)|`
    /// in the basis captured at the start of the move, with the sample
    /// perpendicular at `heading + 90 + accumulated rotation`. A curve with
    /// `t < 0.01` is negligible and emits nothing. The chord construction
    /// keeps the arc's end tangents exact, so the committed heading after
    /// the move equals the heading plus the full turn angle.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewSamples`] when the path's moves are
    /// all negligible and fewer than 2 samples result.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut samples = Vec::with_capacity(path.moves.len() + 1);
        let mut p = path.start_point();
        let mut heading = path.angle;
        samples.push(Sample {
            point: p,
            perp: heading_vector(heading + 90.0),
        });
        for mv in &path.moves {
            let dir = heading_vector(heading);
            match *mv {
                Move::Straight { length } => {
                    p += dir * length;
                    samples.push(Sample {
                        point: p,
                        perp: heading_vector(heading + 90.0),
                    });
                }
                Move::Curve {
                    radius,
                    angle,
                    segments,
                } => {
                    let perp = heading_vector(heading + 90.0);
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let mut m = segments.unwrap_or_else(|| angle.abs().ceil().max(1.0) as u32);
                    let a = angle.to_radians() / f64::from(m);
                    let t = (radius * (a / 2.0).tan()).abs();
                    if t < 0.01 {
                        m = 0;
                    }
                    let mut h = 0.0_f64;
                    let mut cs = 1.0_f64;
                    let mut sn = 0.0_f64;
                    for _ in 0..m {
                        p += dir * (t * cs) + perp * (t * sn);
                        h += a;
                        cs = h.cos();
                        sn = h.sin();
                        p += dir * (t * cs) + perp * (t * sn);
                        samples.push(Sample {
                            point: p,
                            perp: heading_vector(heading + 90.0 + h.to_degrees()),
                        });
                    }
                    heading += h.to_degrees();
                }
            }
        }
        Self::new(samples)
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn first(&self) -> &Sample {
        &self.samples[0]
    }

    #[must_use]
    pub fn last(&self) -> &Sample {
        &self.samples[self.samples.len() - 1]
    }

    /// Total along-curve length (sum of chord lengths).
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|w| (w[1].point - w[0].point).norm())
            .sum()
    }

    /// Extracts a sub-range with up to four inserted cut points.
    ///
    /// Walks the existing segments accumulating along-curve distance. Each
    /// active cut distance falling inside the current segment inserts a
    /// linearly interpolated sample (point and perpendicular both by plain
    /// vector interpolation). Original samples are preserved only when they
    /// lie strictly between `d2` and `d3`: the very first vertex when
    /// `d2 < 0 < d3`, a segment's trailing vertex when its distance is
    /// strictly inside `(d2, d3)`. A cut exactly at the total length emits
    /// the final vertex. Callers supply the cuts in non-decreasing semantic
    /// role (`d1 <= d2 <= d3 <= d4`); inactive roles are `None`.
    #[must_use]
    pub fn sub_range(
        &self,
        d1: Option<f64>,
        d2: Option<f64>,
        d3: Option<f64>,
        d4: Option<f64>,
    ) -> CenterLine {
        let cuts = [d1, d2, d3, d4];
        let mut out = Vec::new();
        let mut dist = 0.0;
        let n = self.samples.len();
        for i in 0..n - 1 {
            let s1 = self.samples[i];
            let s2 = self.samples[i + 1];
            let d = (s2.point - s1.point).norm();
            let last_segment = i == n - 2;
            for cut in cuts.iter().flatten().copied() {
                let inside = dist <= cut && (dist + d > cut || (last_segment && dist + d >= cut));
                if inside && d > 0.0 {
                    let x = (cut - dist) / d;
                    out.push(Sample {
                        point: lerp_point(&s1.point, &s2.point, x),
                        perp: s1.perp.lerp(&s2.perp, x),
                    });
                }
            }
            if let (Some(lo), Some(hi)) = (d2, d3) {
                if i == 0 && lo < dist && dist < hi {
                    out.push(s1);
                }
                if lo < dist + d && dist + d < hi {
                    out.push(s2);
                }
            }
            dist += d;
        }
        CenterLine { samples: out }
    }

    /// Returns a copy of this centerline whose perpendiculars are projected
    /// onto `source`.
    ///
    /// Each sample casts a ±100-unit probe along its current perpendicular,
    /// intersects it against every segment of `source`, and takes the
    /// interpolated perpendicular at the hit. Up to 5 probe passes are made
    /// per sample (each pass re-probes with the updated direction); a
    /// sample whose probes never hit keeps its prior perpendicular. Used
    /// when two routes share one ballast/tie section whose lateral
    /// direction must agree with both.
    #[must_use]
    pub fn project_perp(&self, source: &CenterLine) -> CenterLine {
        let samples = self
            .samples
            .iter()
            .map(|s| {
                let mut perp = s.perp;
                for _ in 0..5 {
                    let p11 = s.point + perp * 100.0;
                    let p12 = s.point - perp * 100.0;
                    for w in source.samples.windows(2) {
                        if let Some(pi) =
                            segment_intersect(&p11, &p12, &w[0].point, &w[1].point)
                        {
                            let d1 = (pi - w[0].point).norm();
                            let d2 = (pi - w[1].point).norm();
                            if d1 + d2 > 0.0 {
                                perp = w[0].perp.lerp(&w[1].perp, d2 / (d1 + d2));
                            }
                            break;
                        }
                    }
                }
                Sample {
                    point: s.point,
                    perp,
                }
            })
            .collect();
        CenterLine { samples }
    }
}

fn lerp_point(a: &Point3, b: &Point3, t: f64) -> Point3 {
    Point3::from(a.coords.lerp(&b.coords, t))
}
