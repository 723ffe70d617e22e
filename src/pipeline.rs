//! Shape and profile documents in, swept meshes out.
//!
//! This is the pure kernel entry point: no scene-host calls happen here,
//! only geometry. Hosts consume the returned meshes afterwards.

use tracing::info;

use crate::error::Result;
use crate::geometry::{has_crossing, CenterLine};
use crate::math::intersect_2d::tri_area_2;
use crate::operations::assemble::{
    AssembleCrossing, AssembleSwitch, PartLine, BALLAST, ENDS_NONE, LEFT_RAIL, RIGHT_RAIL, TIES,
};
use crate::operations::{Mesh, SweepSection};
use crate::profile::Profile;
use crate::shape::Shape;

/// Plain-track part names, in sweep order.
const PLAIN_PARTS: [&str; 4] = [RIGHT_RAIL, LEFT_RAIL, BALLAST, TIES];

/// Builds all meshes for one shape document against one profile.
///
/// Paths are flattened to centerlines and ordered left-to-right before
/// assembly, so a shape author may list a switch's routes in either
/// order. Two-path shapes assemble as a switch or, when the paths cross,
/// as a diamond; everything else sweeps as plain track.
pub fn build_meshes(shape: &Shape, profile: &Profile) -> Result<Vec<Mesh>> {
    let mut centerlines = Vec::with_capacity(shape.paths.len());
    for path in &shape.paths {
        centerlines.push(CenterLine::from_path(path)?);
    }
    sort_left_to_right(&mut centerlines);

    let partlines = assemble(shape, profile, &centerlines);
    info!(
        shape = %shape.filename,
        paths = centerlines.len(),
        parts = partlines.len(),
        "assembled"
    );

    let mut meshes = Vec::new();
    for lod in &profile.lods {
        if !partlines.is_empty() {
            for line in &partlines {
                let sweep = SweepSection::new(
                    lod,
                    Some(line.part),
                    &line.centerline,
                    line.ends,
                    line.animation,
                );
                meshes.extend(sweep.execute());
            }
        } else if profile.has_part_sections() {
            for cl in &centerlines {
                for part in PLAIN_PARTS {
                    let sweep = SweepSection::new(lod, Some(part), cl, ENDS_NONE, None);
                    meshes.extend(sweep.execute());
                }
            }
        } else {
            for cl in &centerlines {
                let sweep = SweepSection::new(lod, None, cl, ENDS_NONE, None);
                meshes.extend(sweep.execute());
            }
        }
    }
    Ok(meshes)
}

/// Orders two centerlines so index 0 is the left route and index 1 the
/// right, judged by the signed area of (first of a, last of a, last of b)
/// in the horizontal plane. A positive area puts b's endpoint on a's left
/// side, so b must come first. Shapes with one path (or more than two)
/// keep their document order.
fn sort_left_to_right(centerlines: &mut [CenterLine]) {
    if centerlines.len() != 2 {
        return;
    }
    let area = tri_area_2(
        &centerlines[0].first().point,
        &centerlines[0].last().point,
        &centerlines[1].last().point,
    );
    if area > 0.0 {
        centerlines.swap(0, 1);
    }
}

fn assemble(shape: &Shape, profile: &Profile, centerlines: &[CenterLine]) -> Vec<PartLine> {
    if centerlines.len() != 2 {
        return Vec::new();
    }
    let (left, right) = (&centerlines[0], &centerlines[1]);
    if shape.is_switch() {
        return AssembleSwitch::new(shape, profile).execute(left, right);
    }
    if has_crossing(left, right) {
        return AssembleCrossing::new(profile).execute(left, right);
    }
    Vec::new()
}
