//! Skeletal model
//!
//! Ties a [`Skeleton`] to a [`SkinnedMesh`] and keeps the call order straight:
//! load skeleton → load mesh and weights → bind transforms once → current
//! transforms → deform. After loading, the pose only advances through
//! [`SkeletalModel::set_joint_rotation`], [`SkeletalModel::update_current_transforms`]
//! and [`SkeletalModel::update_mesh`].
//!
//! ```rust,ignore
//! let mut model = SkeletalModel::load("model1.skel", "model1.obj", "model1.attach", SkinningSettings::default())?;
//! model.set_joint_rotation(3, Vec3::new(0.0, 0.0, 0.5));
//! model.update_current_transforms();
//! model.update_mesh();
//! let vertices = model.mesh().current_vertices();
//! ```

use std::path::Path;

use glam::{Affine3A, Mat3, Vec3};

use crate::errors::{Result, SkinError};
use crate::loader::{self, MeshDescriptor, SkeletonDescriptor};
use crate::mesh::{Attachments, SkinnedMesh};
use crate::settings::SkinningSettings;
use crate::skeleton::{JointIndex, Skeleton};

/// Cross-section of the boxes produced by [`SkeletalModel::bone_transforms`].
pub const BONE_THICKNESS: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct SkeletalModel {
    skeleton: Skeleton,
    mesh: SkinnedMesh,
    settings: SkinningSettings,
}

impl SkeletalModel {
    /// Loads the three descriptor files and brings the model to its bind pose.
    pub fn load(
        skeleton_path: impl AsRef<Path>,
        mesh_path: impl AsRef<Path>,
        attachments_path: impl AsRef<Path>,
        settings: SkinningSettings,
    ) -> Result<Self> {
        let skeleton = loader::load_skeleton(skeleton_path)?;
        let mesh = loader::load_mesh(mesh_path)?;
        let attachments = loader::load_attachments(
            attachments_path,
            skeleton.joints.len(),
            mesh.vertices.len(),
            settings.weight_tolerance,
        )?;
        Self::from_descriptors(&skeleton, mesh, attachments, settings)
    }

    /// Builds a model from in-memory descriptors. Weights are validated
    /// against `settings.weight_tolerance`.
    pub fn from_descriptors(
        skeleton: &SkeletonDescriptor,
        mesh: MeshDescriptor,
        attachments: Attachments,
        settings: SkinningSettings,
    ) -> Result<Self> {
        let mut skeleton = Skeleton::build(&skeleton.joints)?;
        skeleton.set_traversal(settings.traversal, settings.use_parallel_skinning());

        if attachments.joint_count() != skeleton.joint_count() {
            return Err(SkinError::JointCountMismatch {
                weights: attachments.joint_count(),
                joints: skeleton.joint_count(),
            });
        }
        let mut mesh = SkinnedMesh::new(mesh.vertices, mesh.faces)?;
        attachments.validate(mesh.vertex_count(), settings.weight_tolerance)?;
        mesh.attach(attachments)?;

        skeleton.compute_bind_transforms();
        skeleton.update_current_transforms();

        let mut model = Self {
            skeleton,
            mesh,
            settings,
        };
        model.update_mesh();

        log::info!(
            "Skeletal model ready: {} joints, {} vertices, {} faces",
            model.skeleton.joint_count(),
            model.mesh.vertex_count(),
            model.mesh.faces().len()
        );
        Ok(model)
    }

    // ========================================================================
    // Pose
    // ========================================================================

    /// See [`Skeleton::set_joint_rotation`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_joint_rotation(&mut self, index: JointIndex, euler: Vec3) {
        self.skeleton.set_joint_rotation(index, euler);
    }

    pub fn update_current_transforms(&mut self) {
        self.skeleton.update_current_transforms();
    }

    pub fn update_mesh(&mut self) {
        self.mesh
            .update(&self.skeleton, self.settings.use_parallel_skinning());
    }

    /// Sets every listed rotation, then runs both recompute passes.
    ///
    /// # Panics
    ///
    /// Panics if any joint index is out of range.
    pub fn apply_pose(&mut self, rotations: &[(JointIndex, Vec3)]) {
        for &(index, euler) in rotations {
            self.skeleton.set_joint_rotation(index, euler);
        }
        self.update_current_transforms();
        self.update_mesh();
    }

    // ========================================================================
    // Read access for drawing
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self) -> &SkinnedMesh {
        &self.mesh
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &SkinningSettings {
        &self.settings
    }

    /// World position of every joint in the current pose.
    #[must_use]
    pub fn joint_positions(&self) -> Vec<Vec3> {
        self.skeleton
            .joints()
            .iter()
            .map(|joint| Vec3::from(joint.current_joint_to_world().translation))
            .collect()
    }

    /// One transform per bone, mapping a unit cube centred at the origin onto
    /// a thin box from a parent joint to its child. Zero-length bones are
    /// skipped.
    #[must_use]
    pub fn bone_transforms(&self) -> Vec<Affine3A> {
        let mut bones = Vec::with_capacity(self.skeleton.joint_count());

        for joint in self.skeleton.joints() {
            let parent_world = *joint.current_joint_to_world();
            for &child in joint.children() {
                let offset = self.skeleton.joints()[child].offset();
                if let Some(bone) = bone_box(offset) {
                    bones.push(parent_world * bone);
                }
            }
        }

        bones
    }
}

/// Box spanning from the origin to `offset`, in the parent joint's space.
fn bone_box(offset: Vec3) -> Option<Affine3A> {
    let length = offset.length();
    if length <= 0.0 {
        return None;
    }

    let z = offset / length;
    // any axis not parallel to the bone
    let helper = if z.dot(Vec3::Y).abs() > 0.999 { Vec3::X } else { Vec3::Y };
    let y = z.cross(helper).normalize();
    let x = y.cross(z).normalize();

    let rotate_to_child = Affine3A::from_mat3(Mat3::from_cols(x, y, z));
    let scale = Affine3A::from_scale(Vec3::new(BONE_THICKNESS, BONE_THICKNESS, length));
    let shift = Affine3A::from_translation(Vec3::new(0.0, 0.0, 0.5));

    Some(rotate_to_child * scale * shift)
}
