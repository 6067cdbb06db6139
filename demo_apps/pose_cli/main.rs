//! Pose CLI
//!
//! Loads a skeleton, mesh and attachment weights, applies a pose read from
//! JSON, and writes the deformed mesh as Wavefront OBJ.
//!
//! ```text
//! pose_cli <skeleton> <mesh> <attachments> [pose.json] [out.obj] [settings.json]
//! ```
//!
//! A pose file is a list of joint rotations in radians:
//!
//! ```json
//! [{ "joint": 1, "euler": [0.0, 0.0, 1.57] }]
//! ```
//!
//! Without a pose the model is written in its bind pose. Without an output
//! path the OBJ goes to stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use glam::Vec3;
use serde::Deserialize;
use smooth_skin::{SkeletalModel, SkinnedMesh, SkinningSettings};

#[derive(Debug, Deserialize)]
struct JointRotation {
    joint: usize,
    euler: Vec3,
}

struct Args {
    skeleton: PathBuf,
    mesh: PathBuf,
    attachments: PathBuf,
    pose: Option<PathBuf>,
    output: Option<PathBuf>,
    settings: Option<PathBuf>,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut args = std::env::args_os().skip(1).map(PathBuf::from);
        let (Some(skeleton), Some(mesh), Some(attachments)) = (args.next(), args.next(), args.next())
        else {
            bail!(
                "usage: pose_cli <skeleton> <mesh> <attachments> [pose.json] [out.obj] [settings.json]"
            );
        };
        let parsed = Self {
            skeleton,
            mesh,
            attachments,
            pose: args.next(),
            output: args.next(),
            settings: args.next(),
        };
        if args.next().is_some() {
            bail!("too many arguments");
        }
        Ok(parsed)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse()?;

    let settings = match &args.settings {
        Some(path) => SkinningSettings::from_json_file(path)
            .with_context(|| format!("reading settings {}", path.display()))?,
        None => SkinningSettings::default(),
    };

    let mut model = SkeletalModel::load(&args.skeleton, &args.mesh, &args.attachments, settings)
        .context("loading model")?;

    if let Some(path) = &args.pose {
        let pose = read_pose(path)?;
        for rotation in &pose {
            if rotation.joint >= model.skeleton().joint_count() {
                bail!(
                    "pose names joint {} but the skeleton has {} joints",
                    rotation.joint,
                    model.skeleton().joint_count()
                );
            }
        }
        let rotations: Vec<_> = pose.iter().map(|r| (r.joint, r.euler)).collect();
        model.apply_pose(&rotations);
        log::info!("Applied {} joint rotations", rotations.len());
    }

    match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_obj(model.mesh(), BufWriter::new(file))?;
            log::info!("Wrote {}", path.display());
        }
        None => write_obj(model.mesh(), BufWriter::new(io::stdout().lock()))?,
    }

    Ok(())
}

fn read_pose(path: &Path) -> anyhow::Result<Vec<JointRotation>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading pose {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing pose {}", path.display()))
}

fn write_obj(mesh: &SkinnedMesh, mut out: impl Write) -> io::Result<()> {
    for v in mesh.current_vertices() {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for n in mesh.face_normals() {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    // OBJ indices are 1-based
    for (i, [a, b, c]) in mesh.faces().iter().enumerate() {
        let n = i + 1;
        writeln!(out, "f {}//{n} {}//{n} {}//{n}", a + 1, b + 1, c + 1)?;
    }
    out.flush()
}
