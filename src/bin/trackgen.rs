//! Command-line front end: reads a shape document and a profile document,
//! builds the track meshes, and writes a Wavefront OBJ next to the input.
//!
//! ```text
//! trackgen <shape.json> <profile.json>
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use trackgen::error::ExportError;
use trackgen::host::{materialize_shape, SceneHost};
use trackgen::input::{load_profile, load_shape};
use trackgen::operations::{Lighting, Mesh, Transparency};
use trackgen::pipeline::build_meshes;
use trackgen::shape::SwitchStand;
use trackgen::{math::Point3, Result};

fn main() -> ExitCode {
    // Default: WARN for everything, INFO for trackgen.
    // Override with RUST_LOG env var (e.g. RUST_LOG=trackgen=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("trackgen=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args_os().skip(1);
    let (Some(shape_path), Some(profile_path)) = (args.next(), args.next()) else {
        eprintln!("usage: trackgen <shape.json> <profile.json>");
        return ExitCode::from(2);
    };

    match run(Path::new(&shape_path), Path::new(&profile_path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("trackgen: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(shape_path: &Path, profile_path: &Path) -> Result<()> {
    let shape = load_shape(shape_path)?;
    let profile = load_profile(profile_path)?;
    let meshes = build_meshes(&shape, &profile)?;

    let out_dir = shape_path.parent().unwrap_or_else(|| Path::new("."));
    let mut host = ObjHost::new(out_dir.to_path_buf());
    materialize_shape(&mut host, &shape, &meshes)
}

/// Minimal file-writing host: accumulates meshes and writes one OBJ per
/// shape. Materials, keyframes, and LOD groups become comments since the
/// format cannot carry them.
struct ObjHost {
    out_dir: PathBuf,
    meshes: Vec<Mesh>,
    notes: Vec<String>,
}

impl ObjHost {
    fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            meshes: Vec::new(),
            notes: Vec::new(),
        }
    }
}

impl SceneHost for ObjHost {
    type MeshId = usize;
    type MaterialId = usize;

    fn create_mesh(&mut self, mesh: &Mesh) -> Result<usize> {
        self.meshes.push(mesh.clone());
        Ok(self.meshes.len() - 1)
    }

    fn create_material(
        &mut self,
        texture: &str,
        _mip_map_bias: f64,
        _lighting: Lighting,
        _transparency: Transparency,
    ) -> Result<usize> {
        self.notes.push(format!("material {texture}"));
        Ok(self.notes.len() - 1)
    }

    fn bind_material(&mut self, _mesh: usize, _material: usize) -> Result<()> {
        Ok(())
    }

    fn set_pivot_keyframes(
        &mut self,
        mesh: usize,
        pivot: Point3,
        angle0: f64,
        angle1: f64,
    ) -> Result<()> {
        self.notes.push(format!(
            "anim mesh {mesh} pivot {} {} {} angles {angle0} {angle1}",
            pivot.x, pivot.y, pivot.z
        ));
        Ok(())
    }

    fn group_by_cutoff(&mut self, meshes: &[usize], radius: f64) -> Result<()> {
        self.notes
            .push(format!("group MAIN_{radius:04.0} meshes {meshes:?}"));
        Ok(())
    }

    fn place_switch_stand(&mut self, stand: &SwitchStand, derail: bool) -> Result<()> {
        self.notes.push(format!(
            "switchstand {} at {:?} rot {} derail {derail}",
            stand.file.display(),
            stand.position,
            stand.rotation
        ));
        Ok(())
    }

    fn export_shape(&mut self, filename: &str) -> Result<()> {
        let path = self.out_dir.join(filename).with_extension("obj");
        let write_err = |source| ExportError::Write {
            path: path.clone(),
            source,
        };
        let file = File::create(&path).map_err(write_err)?;
        let mut w = BufWriter::new(file);
        write_obj(&mut w, &self.meshes, &self.notes).map_err(write_err)?;
        Ok(())
    }
}

fn write_obj(w: &mut impl Write, meshes: &[Mesh], notes: &[String]) -> std::io::Result<()> {
    for note in notes {
        writeln!(w, "# {note}")?;
    }
    let mut base = 1_usize;
    for mesh in meshes {
        writeln!(w, "o {}", mesh.name)?;
        for v in &mesh.vertices {
            // OBJ is y-up; internal geometry is z-up.
            writeln!(w, "v {} {} {}", v.x, v.z, v.y)?;
        }
        for uv in &mesh.uvs {
            writeln!(w, "vt {} {}", uv[0], uv[1])?;
        }
        for f in &mesh.faces {
            writeln!(
                w,
                "f {a}/{a} {b}/{b} {c}/{c} {d}/{d}",
                a = base + f[0] as usize,
                b = base + f[1] as usize,
                c = base + f[2] as usize,
                d = base + f[3] as usize
            )?;
        }
        base += mesh.vertices.len();
    }
    Ok(())
}
