//! Scene-host boundary.
//!
//! The geometry kernel never talks to a renderer or exporter directly; it
//! hands finished meshes to a [`SceneHost`] implementation. Everything in
//! this module is mechanical plumbing: create, bind, group, export, in
//! that order, for one shape at a time.

use tracing::warn;

use crate::error::Result;
use crate::operations::{Lighting, Mesh, Transparency};
use crate::shape::{Shape, SwitchStand};

/// Outward collaborator interface for scene construction and export.
///
/// Handle types are host-defined; the kernel only threads them between
/// calls. A failing `place_switch_stand` is the one non-fatal call here
/// (the referenced asset file may simply be absent from the host's
/// library).
pub trait SceneHost {
    type MeshId: Copy;
    type MaterialId: Copy;

    fn create_mesh(&mut self, mesh: &Mesh) -> Result<Self::MeshId>;

    fn create_material(
        &mut self,
        texture: &str,
        mip_map_bias: f64,
        lighting: Lighting,
        transparency: Transparency,
    ) -> Result<Self::MaterialId>;

    fn bind_material(&mut self, mesh: Self::MeshId, material: Self::MaterialId) -> Result<()>;

    /// Sets a mesh's pivot point plus a two-keyframe rotation about the
    /// vertical axis (radians; frame 0 is the resting pose).
    fn set_pivot_keyframes(
        &mut self,
        mesh: Self::MeshId,
        pivot: crate::math::Point3,
        angle0: f64,
        angle1: f64,
    ) -> Result<()>;

    /// Groups meshes into one level-of-detail bucket visible out to
    /// `radius`.
    fn group_by_cutoff(&mut self, meshes: &[Self::MeshId], radius: f64) -> Result<()>;

    /// Places the switch-stand asset in the shape's local frame. The
    /// descriptor carries the asset file, position, heading, and optional
    /// crank rotation; `derail` selects the red-target pose. What the host
    /// animates with those is its own business.
    fn place_switch_stand(&mut self, stand: &SwitchStand, derail: bool) -> Result<()>;

    fn export_shape(&mut self, filename: &str) -> Result<()>;
}

/// Materializes one shape's swept meshes through a host.
///
/// Creates and binds every mesh, applies point-rail keyframes, buckets
/// the meshes by distinct cutoff radius, places the switch stand if the
/// shape names one, then exports. An unplaceable switch stand is logged
/// and skipped; an export failure is the shape's failure.
pub fn materialize_shape<H: SceneHost>(host: &mut H, shape: &Shape, meshes: &[Mesh]) -> Result<()> {
    let mut ids = Vec::with_capacity(meshes.len());
    for mesh in meshes {
        let id = host.create_mesh(mesh)?;
        let material = host.create_material(
            &mesh.texture,
            mesh.mip_map_bias,
            mesh.lighting,
            mesh.transparency,
        )?;
        host.bind_material(id, material)?;
        if let Some(anim) = mesh.animation {
            host.set_pivot_keyframes(id, anim.pivot, anim.angle0, anim.angle1)?;
        }
        ids.push(id);
    }

    for radius in distinct_cutoffs(meshes) {
        let bucket: Vec<H::MeshId> = meshes
            .iter()
            .zip(&ids)
            .filter(|(mesh, _)| mesh.cutoff_radius >= radius)
            .map(|(_, id)| *id)
            .collect();
        host.group_by_cutoff(&bucket, radius)?;
    }

    if let Some(stand) = &shape.switchstand {
        if let Err(err) = host.place_switch_stand(stand, shape.derail.is_some()) {
            warn!(file = %stand.file.display(), %err, "switch stand not placed");
        }
    }

    host.export_shape(&shape.filename)
}

/// Distinct cutoff radii in ascending order. Each bucket contains every
/// mesh visible at that radius, so nearer buckets are supersets of
/// farther ones.
fn distinct_cutoffs(meshes: &[Mesh]) -> Vec<f64> {
    let mut radii: Vec<f64> = meshes.iter().map(|m| m.cutoff_radius).collect();
    radii.sort_by(f64::total_cmp);
    radii.dedup();
    radii
}
