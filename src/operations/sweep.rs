use crate::geometry::CenterLine;
use crate::math::{up, Point3, Vector3};
use crate::operations::assemble::{
    PointAnimation, ENDS_FAR_INNER, ENDS_FAR_OUTER, ENDS_NEAR_INNER, ENDS_NEAR_OUTER,
};
use crate::profile::{SectionLod, SectionPolyline, SectionVertex};

/// Lighting mode tag derived from the LOD's light model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lighting {
    Specular25,
    Specular750,
    Normal,
}

/// Transparency tag derived from the LOD's shader name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transparency {
    Alpha,
    Opaque,
}

/// Swept mesh data for one (LOD, part) pair.
///
/// Output-only: never mutated after creation. Faces are quads winding
/// consistently along the sweep; UVs carry the along-distance texture
/// accumulation with the V axis already flipped.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Point3>,
    pub uvs: Vec<[f64; 2]>,
    pub faces: Vec<[u32; 4]>,
    pub texture: String,
    pub mip_map_bias: f64,
    pub lighting: Lighting,
    pub transparency: Transparency,
    pub cutoff_radius: f64,
    pub animation: Option<PointAnimation>,
}

/// Sweeps a named cross-section along a centerline.
///
/// Every polyline of the LOD whose part name matches (or all of them when
/// no part filter is given, the plain-track case) contributes one ring of
/// vertices per centerline sample at
/// `sample + perp * lateral + up * vertical - pivot`, quad-stitched ring
/// to ring. End-taper flags swap in the polyline's inner/outer alternate
/// ring at the first/last sample; a ring-count change is accepted only at
/// that taper boundary.
pub struct SweepSection<'a> {
    lod: &'a SectionLod,
    part: Option<&'a str>,
    centerline: &'a CenterLine,
    ends: u8,
    animation: Option<PointAnimation>,
}

impl<'a> SweepSection<'a> {
    #[must_use]
    pub fn new(
        lod: &'a SectionLod,
        part: Option<&'a str>,
        centerline: &'a CenterLine,
        ends: u8,
        animation: Option<PointAnimation>,
    ) -> Self {
        Self {
            lod,
            part,
            centerline,
            ends,
            animation,
        }
    }

    /// Executes the sweep. Returns `None` when no polyline matched the
    /// part filter (no mesh is emitted for an absent part).
    #[must_use]
    pub fn execute(&self) -> Option<Mesh> {
        let pivot = self
            .animation
            .map_or_else(Vector3::zeros, |a| a.pivot.coords);
        let mut vertices = Vec::new();
        let mut uvs = Vec::new();
        let mut faces = Vec::new();

        for polyline in &self.lod.polylines {
            if let Some(part) = self.part {
                if polyline.part.as_deref() != Some(part) {
                    continue;
                }
            }
            self.sweep_polyline(polyline, &pivot, &mut vertices, &mut uvs, &mut faces);
        }

        if vertices.is_empty() {
            return None;
        }
        Some(Mesh {
            name: self.lod.name.clone(),
            vertices,
            uvs,
            faces,
            texture: self.lod.tex_name.clone(),
            mip_map_bias: self.lod.mip_map_bias,
            lighting: lighting_of(&self.lod.light_model_name),
            transparency: transparency_of(&self.lod.shader_name),
            cutoff_radius: self.lod.cutoff_radius,
            animation: self.animation,
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn sweep_polyline(
        &self,
        polyline: &SectionPolyline,
        pivot: &Vector3,
        vertices: &mut Vec<Point3>,
        uvs: &mut Vec<[f64; 2]>,
        faces: &mut Vec<[u32; 4]>,
    ) {
        let samples = self.centerline.samples();
        // A clip that collapsed to nothing sweeps to nothing.
        let Some(first) = samples.first() else {
            return;
        };
        let dtc = polyline.delta_tex_coord;
        let mut dist = 0.0;
        let mut point0 = first.point;
        let mut prev_start = 0_usize;
        let mut prev_count = 0_usize;
        for (i, sample) in samples.iter().enumerate() {
            dist += (sample.point - point0).norm();
            let ring = self.select_ring(polyline, i, samples.len());
            let start = vertices.len();
            for (j, v) in ring.iter().enumerate() {
                let p = sample.point
                    + sample.perp * v.position[0]
                    + up() * v.position[1]
                    - pivot;
                vertices.push(p);
                uvs.push([
                    v.tex_coord[0] + dist * dtc[0],
                    1.0 - (v.tex_coord[1] + dist * dtc[1]),
                ]);
                if i > 0 && j > 0 && j < prev_count {
                    faces.push([
                        (prev_start + j - 1) as u32,
                        (prev_start + j) as u32,
                        (start + j) as u32,
                        (start + j - 1) as u32,
                    ]);
                }
            }
            point0 = sample.point;
            prev_start = start;
            prev_count = ring.len();
        }
    }

    /// Picks the cross-section ring for sample `i`: the normal ring, or an
    /// alternate taper ring at a flagged end when the profile carries one.
    fn select_ring<'p>(
        &self,
        polyline: &'p SectionPolyline,
        i: usize,
        count: usize,
    ) -> &'p [SectionVertex] {
        let alternate = if i == 0 {
            if self.ends & ENDS_NEAR_INNER != 0 {
                polyline.vertices_inner.as_deref()
            } else if self.ends & ENDS_NEAR_OUTER != 0 {
                polyline.vertices_outer.as_deref()
            } else {
                None
            }
        } else if i == count - 1 {
            if self.ends & ENDS_FAR_INNER != 0 {
                polyline.vertices_inner.as_deref()
            } else if self.ends & ENDS_FAR_OUTER != 0 {
                polyline.vertices_outer.as_deref()
            } else {
                None
            }
        } else {
            None
        };
        alternate.unwrap_or(&polyline.vertices)
    }
}

fn lighting_of(light_model_name: &str) -> Lighting {
    match light_model_name {
        "OptSpecular25" => Lighting::Specular25,
        "OptSpecular750" => Lighting::Specular750,
        _ => Lighting::Normal,
    }
}

fn transparency_of(shader_name: &str) -> Transparency {
    if shader_name.starts_with("BlendA") {
        Transparency::Alpha
    } else {
        Transparency::Opaque
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::operations::assemble::{ENDS_NEAR_INNER, ENDS_NONE};
    use crate::shape::{Move, Path};

    fn lod(json: &str) -> SectionLod {
        serde_json::from_str(json).unwrap()
    }

    fn rail_lod() -> SectionLod {
        lod(r#"{
            "Name": "rails", "TexName": "rails.ace", "CutoffRadius": 700,
            "MipMapLevelOfDetailBias": -1,
            "LightModelName": "OptSpecular25", "ShaderName": "TexDiff",
            "Polylines": [{
                "part": "rightrail",
                "DeltaTexCoord": [0.2, 0],
                "Vertices": [
                    { "Position": [0.6675, 0.325], "TexCoord": [0.12, 0.1] },
                    { "Position": [0.7375, 0.325], "TexCoord": [0.18, 0.1] }
                ],
                "VerticesInner": [
                    { "Position": [0.7375, 0.325], "TexCoord": [0.15, 0.1] },
                    { "Position": [0.7375, 0.325], "TexCoord": [0.15, 0.1] }
                ]
            }]
        }"#)
    }

    fn straight(length: f64, segments: usize) -> CenterLine {
        let moves = (0..segments)
            .map(|_| Move::Straight {
                length: length / segments as f64,
            })
            .collect();
        CenterLine::from_path(&Path {
            start: [0.0, 0.0, 0.0],
            angle: 0.0,
            moves,
        })
        .unwrap()
    }

    #[test]
    fn plain_sweep_counts_match_samples() {
        let lod = rail_lod();
        let cl = straight(20.0, 4); // 5 samples
        let mesh = SweepSection::new(&lod, None, &cl, ENDS_NONE, None)
            .execute()
            .unwrap();
        // 2 vertices per sample, one quad per segment.
        assert_eq!(mesh.vertices.len(), 2 * 5);
        assert_eq!(mesh.faces.len(), 4);
        assert_eq!(mesh.texture, "rails.ace");
        assert_eq!(mesh.lighting, Lighting::Specular25);
        assert_eq!(mesh.transparency, Transparency::Opaque);
    }

    #[test]
    fn vertices_follow_perp_and_vertical_offsets() {
        let lod = rail_lod();
        let cl = straight(10.0, 1);
        let mesh = SweepSection::new(&lod, None, &cl, ENDS_NONE, None)
            .execute()
            .unwrap();
        // Heading 0: perp = +x, so lateral offsets land on x, vertical on z.
        let v = mesh.vertices[0];
        assert_relative_eq!(v.x, 0.6675);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.z, 0.325);
    }

    #[test]
    fn uv_accumulates_distance_and_flips_v() {
        let lod = rail_lod();
        let cl = straight(10.0, 1);
        let mesh = SweepSection::new(&lod, None, &cl, ENDS_NONE, None)
            .execute()
            .unwrap();
        // First sample: base UV with V flipped.
        assert_relative_eq!(mesh.uvs[0][0], 0.12);
        assert_relative_eq!(mesh.uvs[0][1], 0.9);
        // Last sample: U advanced by dist * delta = 10 * 0.2.
        assert_relative_eq!(mesh.uvs[2][0], 2.12);
    }

    #[test]
    fn part_filter_mismatch_emits_no_mesh() {
        let lod = rail_lod();
        let cl = straight(10.0, 1);
        assert!(SweepSection::new(&lod, Some("ballast"), &cl, ENDS_NONE, None)
            .execute()
            .is_none());
    }

    #[test]
    fn near_taper_uses_inner_ring() {
        let lod = rail_lod();
        let cl = straight(10.0, 1);
        let mesh = SweepSection::new(&lod, None, &cl, ENDS_NEAR_INNER, None)
            .execute()
            .unwrap();
        // First ring is the collapsed inner pair.
        assert!((mesh.vertices[0].x - 0.7375).abs() < 1e-12);
        assert!((mesh.vertices[1].x - 0.7375).abs() < 1e-12);
        // Last ring is the normal section.
        assert!((mesh.vertices[2].x - 0.6675).abs() < 1e-12);
        assert_eq!(mesh.faces.len(), 1);
    }

    #[test]
    fn legacy_rings_select_by_position() {
        // A legacy-keyed guard-rail section: vertices0 is the first-sample
        // ring, verticesn the last-sample ring, and they differ.
        let lod = lod(r#"{
            "Name": "rails", "TexName": "rails.ace", "CutoffRadius": 700,
            "MipMapLevelOfDetailBias": -1,
            "Polylines": [{
                "part": "rightguardrail",
                "DeltaTexCoord": [0.2, 0],
                "Vertices": [
                    { "Position": [0.7, 0.325], "TexCoord": [0.12, 0.1] },
                    { "Position": [0.77, 0.325], "TexCoord": [0.18, 0.1] }
                ],
                "vertices0": [
                    { "Position": [0.5, 0.325], "TexCoord": [0.15, 0.1] },
                    { "Position": [0.5, 0.325], "TexCoord": [0.15, 0.1] }
                ],
                "verticesn": [
                    { "Position": [0.9, 0.325], "TexCoord": [0.15, 0.1] },
                    { "Position": [0.9, 0.325], "TexCoord": [0.15, 0.1] }
                ]
            }]
        }"#);
        let cl = straight(10.0, 2);
        let ends = ENDS_NEAR_INNER | crate::operations::assemble::ENDS_FAR_OUTER;
        let mesh = SweepSection::new(&lod, None, &cl, ends, None)
            .execute()
            .unwrap();
        // First ring collapses to the vertices0 ring, the far ring to the
        // verticesn ring, interior samples keep the normal section.
        assert_relative_eq!(mesh.vertices[0].x, 0.5);
        assert_relative_eq!(mesh.vertices[1].x, 0.5);
        assert_relative_eq!(mesh.vertices[2].x, 0.7);
        assert_relative_eq!(mesh.vertices[3].x, 0.77);
        assert_relative_eq!(mesh.vertices[4].x, 0.9);
        assert_relative_eq!(mesh.vertices[5].x, 0.9);
    }

    #[test]
    fn quad_indices_stitch_consecutive_rings() {
        let lod = rail_lod();
        let cl = straight(10.0, 2);
        let mesh = SweepSection::new(&lod, None, &cl, ENDS_NONE, None)
            .execute()
            .unwrap();
        assert_eq!(mesh.faces[0], [0, 1, 3, 2]);
        assert_eq!(mesh.faces[1], [2, 3, 5, 4]);
    }

    #[test]
    fn animation_pivot_offsets_vertices() {
        let lod = rail_lod();
        let cl = straight(10.0, 1);
        let anim = PointAnimation {
            pivot: Point3::new(0.5, 2.0, 0.0),
            angle0: 0.0,
            angle1: 0.1,
        };
        let mesh = SweepSection::new(&lod, None, &cl, ENDS_NONE, Some(anim))
            .execute()
            .unwrap();
        assert!((mesh.vertices[0].x - (0.6675 - 0.5)).abs() < 1e-12);
        assert!((mesh.vertices[0].y + 2.0).abs() < 1e-12);
        assert_eq!(mesh.animation, Some(anim));
    }

    #[test]
    fn blend_shader_is_alpha() {
        assert_eq!(transparency_of("BlendATexDiff"), Transparency::Alpha);
        assert_eq!(transparency_of("TexDiff"), Transparency::Opaque);
        assert_eq!(lighting_of("OptSpecular750"), Lighting::Specular750);
        assert_eq!(lighting_of(""), Lighting::Normal);
    }
}
