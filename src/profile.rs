use serde::Deserialize;

/// One 2D cross-section vertex: lateral/vertical offsets plus a base
/// texture coordinate.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SectionVertex {
    /// `(lateral offset, vertical offset)` relative to the centerline.
    #[serde(rename = "Position")]
    pub position: [f64; 2],
    #[serde(rename = "TexCoord")]
    pub tex_coord: [f64; 2],
}

/// A named cross-section polyline swept along a part's centerline.
///
/// `vertices_inner` / `vertices_outer` are the alternate taper rings used
/// at a part's first/last sample when the matching end flag is set. The
/// legacy document keys map positionally: `vertices0` (first-sample ring)
/// onto the inner set, `verticesn` (last-sample ring) onto the outer set.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionPolyline {
    /// Part name this polyline belongs to (`rightrail`, `ballast`, ...).
    /// Absent for single-part profiles swept without a filter.
    #[serde(default)]
    pub part: Option<String>,
    /// Per-unit-distance texture coordinate delta along the sweep.
    #[serde(rename = "DeltaTexCoord")]
    pub delta_tex_coord: [f64; 2],
    #[serde(rename = "Vertices")]
    pub vertices: Vec<SectionVertex>,
    #[serde(default, rename = "VerticesInner", alias = "vertices0")]
    pub vertices_inner: Option<Vec<SectionVertex>>,
    #[serde(default, rename = "VerticesOuter", alias = "verticesn")]
    pub vertices_outer: Option<Vec<SectionVertex>>,
}

/// One level-of-detail cross-section catalog with its texturing metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionLod {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "TexName")]
    pub tex_name: String,
    /// Viewing distance beyond which this LOD is dropped.
    #[serde(rename = "CutoffRadius")]
    pub cutoff_radius: f64,
    #[serde(rename = "MipMapLevelOfDetailBias")]
    pub mip_map_bias: f64,
    #[serde(rename = "LightModelName", default)]
    pub light_model_name: String,
    #[serde(rename = "ShaderName", default)]
    pub shader_name: String,
    #[serde(rename = "Polylines")]
    pub polylines: Vec<SectionPolyline>,
}

/// Read-only catalog of track cross-sections shared across many shapes.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Lateral distance between the two rails.
    pub gauge: f64,
    /// Half-width of a rail's contact surface.
    pub railhead: f64,
    /// Clearance gap at a frog allowing a wheel flange to pass.
    pub flangeway: f64,
    /// When present, plain track is swept one named part at a time
    /// (rails/ballast/ties) instead of as one unfiltered section.
    #[serde(default)]
    pub parts: Option<serde_json::Value>,
    #[serde(rename = "LODs")]
    pub lods: Vec<SectionLod>,
}

impl Profile {
    /// True when plain track should be swept as four named parts.
    #[must_use]
    pub fn has_part_sections(&self) -> bool {
        self.parts.is_some()
    }
}
