use glam::Vec3;

use crate::errors::{Result, SkinError};
use crate::skeleton::Skeleton;

use super::attachments::Attachments;
use super::skinning;

/// Triangle as three 0-based vertex indices.
pub type Face = [u32; 3];

/// A triangle mesh bound to a skeleton.
///
/// # Data
///
/// - `bind_vertices` and `faces` are fixed at construction
/// - `attachments` are set once right after, sized to the skeleton
/// - `current_vertices` is always derived, never authored: it starts as a copy
///   of the bind pose and is rewritten by [`SkinnedMesh::update`]
#[derive(Debug, Clone)]
pub struct SkinnedMesh {
    bind_vertices: Vec<Vec3>,
    current_vertices: Vec<Vec3>,
    faces: Vec<Face>,
    attachments: Option<Attachments>,
}

impl SkinnedMesh {
    /// Creates a mesh in its bind pose. Every face index must name a vertex.
    pub fn new(bind_vertices: Vec<Vec3>, faces: Vec<Face>) -> Result<Self> {
        let vertex_count = bind_vertices.len();
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(SkinError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self {
            current_vertices: bind_vertices.clone(),
            bind_vertices,
            faces,
            attachments: None,
        })
    }

    /// Binds the per-vertex weights. The table must have one row per vertex.
    ///
    /// Weight sums are not checked here, see [`Attachments::validate`].
    pub fn attach(&mut self, attachments: Attachments) -> Result<()> {
        if attachments.vertex_count() != self.bind_vertices.len() {
            return Err(SkinError::VertexCountMismatch {
                attachments: attachments.vertex_count(),
                vertices: self.bind_vertices.len(),
            });
        }
        self.attachments = Some(attachments);
        Ok(())
    }

    // ========================================================================
    // Deformation
    // ========================================================================

    /// Recomputes `current_vertices` from the skeleton's cached transforms.
    ///
    /// Reads whatever the skeleton cached at its last
    /// `update_current_transforms`; rotations set after that are not seen.
    ///
    /// # Panics
    ///
    /// - no attachments are bound
    /// - the skeleton has not computed its bind and current transforms
    /// - the attachment width differs from the skeleton's joint count
    /// - a vertex has no nonzero weight
    pub fn update(&mut self, skeleton: &Skeleton, parallel: bool) {
        let attachments = self
            .attachments
            .as_ref()
            .expect("attachments must be bound before deforming the mesh");
        assert!(
            skeleton.is_bind_computed() && skeleton.is_pose_computed(),
            "skeleton transforms must be computed before deforming the mesh"
        );
        assert_eq!(
            attachments.joint_count(),
            skeleton.joint_count(),
            "attachment width does not match the skeleton"
        );

        let joint_matrices = skeleton.joint_matrices();

        #[cfg(feature = "parallel")]
        {
            if parallel {
                skinning::skin_vertices_parallel(
                    &self.bind_vertices,
                    attachments.as_slice(),
                    joint_matrices,
                    &mut self.current_vertices,
                );
                return;
            }
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        skinning::skin_vertices(
            &self.bind_vertices,
            attachments.as_slice(),
            joint_matrices,
            &mut self.current_vertices,
        );
    }

    /// Restores `current_vertices` to the bind pose.
    pub fn reset_to_bind_pose(&mut self) {
        self.current_vertices.copy_from_slice(&self.bind_vertices);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.bind_vertices.len()
    }

    #[inline]
    #[must_use]
    pub fn bind_vertices(&self) -> &[Vec3] {
        &self.bind_vertices
    }

    #[inline]
    #[must_use]
    pub fn current_vertices(&self) -> &[Vec3] {
        &self.current_vertices
    }

    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    #[must_use]
    pub fn attachments(&self) -> Option<&Attachments> {
        self.attachments.as_ref()
    }

    /// Flat per-face normals of the current pose.
    ///
    /// Degenerate faces get a zero normal.
    #[must_use]
    pub fn face_normals(&self) -> Vec<Vec3> {
        self.faces
            .iter()
            .map(|&[a, b, c]| {
                let v0 = self.current_vertices[a as usize];
                let v1 = self.current_vertices[b as usize];
                let v2 = self.current_vertices[c as usize];
                (v1 - v0).cross(v2 - v0).normalize_or_zero()
            })
            .collect()
    }
}
