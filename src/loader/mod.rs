//! Descriptor loading
//!
//! The skeleton and mesh types never parse anything themselves. This module
//! turns text files into plain descriptors which are then handed to
//! [`Skeleton::build`](crate::skeleton::Skeleton::build) and
//! [`SkinnedMesh::new`](crate::mesh::SkinnedMesh::new).
//!
//! Weight validation also lives on this side: the blend routine assumes every
//! vertex's weights already sum to 1, and [`load_attachments`] checks it.

pub mod text;

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SkinError};
use crate::mesh::{Attachments, Face};
use crate::skeleton::JointRecord;

pub use text::{parse_attachments, parse_mesh, parse_skeleton};

/// Ordered joint records; record order is a valid topological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonDescriptor {
    pub joints: Vec<JointRecord>,
}

/// Bind-pose vertices and 0-based triangles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDescriptor {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| SkinError::File {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_skeleton(path: impl AsRef<Path>) -> Result<SkeletonDescriptor> {
    let path = path.as_ref();
    let descriptor = parse_skeleton(&read_text(path)?)?;
    log::info!(
        "Loaded skeleton {}: {} joints",
        path.display(),
        descriptor.joints.len()
    );
    Ok(descriptor)
}

pub fn load_mesh(path: impl AsRef<Path>) -> Result<MeshDescriptor> {
    let path = path.as_ref();
    let descriptor = parse_mesh(&read_text(path)?)?;
    log::info!(
        "Loaded mesh {}: {} vertices, {} faces",
        path.display(),
        descriptor.vertices.len(),
        descriptor.faces.len()
    );
    Ok(descriptor)
}

/// Loads and validates attachment weights for a mesh of `vertex_count`
/// vertices bound to `joint_count` joints.
pub fn load_attachments(
    path: impl AsRef<Path>,
    joint_count: usize,
    vertex_count: usize,
    tolerance: f32,
) -> Result<Attachments> {
    let path = path.as_ref();
    let attachments = parse_attachments(&read_text(path)?, joint_count)?;
    attachments.validate(vertex_count, tolerance)?;
    log::info!(
        "Loaded attachments {}: {} vertices x {} joints",
        path.display(),
        attachments.vertex_count(),
        joint_count
    );
    Ok(attachments)
}
