use std::fs;
use std::path::Path as FsPath;

use crate::error::{InputError, Result};
use crate::profile::Profile;
use crate::shape::Shape;

/// Loads and validates a shape document.
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read, is not valid JSON for
/// the shape schema, or fails the semantic checks (at least one path, each
/// path with at least one move).
pub fn load_shape(path: &FsPath) -> Result<Shape> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let shape: Shape = serde_json::from_str(&text).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_shape(&shape)?;
    Ok(shape)
}

/// Loads and validates a profile document.
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read, is not valid JSON for
/// the profile schema, or fails the semantic checks (positive gauge,
/// non-negative railhead/flangeway, at least one LOD).
pub fn load_profile(path: &FsPath) -> Result<Profile> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let profile: Profile = serde_json::from_str(&text).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_profile(&profile)?;
    Ok(profile)
}

fn validate_shape(shape: &Shape) -> Result<()> {
    if shape.paths.is_empty() {
        return Err(shape_invalid(shape, "shape has no paths"));
    }
    for (i, path) in shape.paths.iter().enumerate() {
        if path.moves.is_empty() {
            return Err(shape_invalid(shape, format!("path {i} has no moves")));
        }
    }
    if shape.is_switch() && shape.paths.len() != 2 {
        return Err(shape_invalid(
            shape,
            format!("switch shape needs 2 paths, got {}", shape.paths.len()),
        ));
    }
    if shape.filename.is_empty() {
        return Err(shape_invalid(shape, "shape has an empty filename"));
    }
    Ok(())
}

fn validate_profile(profile: &Profile) -> Result<()> {
    if profile.gauge <= 0.0 {
        return Err(profile_invalid(format!(
            "gauge must be positive, got {}",
            profile.gauge
        )));
    }
    if profile.railhead < 0.0 || profile.flangeway < 0.0 {
        return Err(profile_invalid(
            "railhead and flangeway must be non-negative".to_string(),
        ));
    }
    if profile.lods.is_empty() {
        return Err(profile_invalid("profile has no LODs".to_string()));
    }
    for lod in &profile.lods {
        if lod.polylines.is_empty() {
            return Err(profile_invalid(format!("LOD {} has no polylines", lod.name)));
        }
        for poly in &lod.polylines {
            if poly.vertices.len() < 2 {
                return Err(profile_invalid(format!(
                    "LOD {} has a polyline with fewer than 2 vertices",
                    lod.name
                )));
            }
        }
    }
    Ok(())
}

fn shape_invalid(shape: &Shape, what: impl Into<String>) -> crate::TrackgenError {
    let mut what = what.into();
    if !shape.filename.is_empty() {
        what = format!("{what} (shape {})", shape.filename);
    }
    InputError::Invalid {
        document: "shape",
        what,
    }
    .into()
}

fn profile_invalid(what: String) -> crate::TrackgenError {
    InputError::Invalid {
        document: "profile",
        what,
    }
    .into()
}
