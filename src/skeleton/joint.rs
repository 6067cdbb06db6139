use glam::{Affine3A, Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Index of a joint inside its [`Skeleton`](super::Skeleton).
pub type JointIndex = usize;

/// One entry of a skeleton descriptor.
///
/// Records are consumed in order. `parent` must name an earlier record, or be
/// `None` for the single root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointRecord {
    /// Translation relative to the parent joint.
    pub offset: Vec3,
    /// Parent record, `None` for the root.
    pub parent: Option<JointIndex>,
}

impl JointRecord {
    #[must_use]
    pub fn root(offset: Vec3) -> Self {
        Self {
            offset,
            parent: None,
        }
    }

    #[must_use]
    pub fn child(offset: Vec3, parent: JointIndex) -> Self {
        Self {
            offset,
            parent: Some(parent),
        }
    }
}

/// A node of the skeleton tree.
///
/// # Hierarchy
///
/// Joints live in an arena owned by the skeleton and refer to each other by
/// index. The parent link is an index, the children are an ordered index list.
///
/// # Transforms
///
/// - The local transform is `rotation` + `offset`. Only the rotation can change
///   after construction.
/// - `bind_world_to_joint` is cached once by the bind pass.
/// - `current_joint_to_world` is cached by the current-pose pass and goes stale
///   as soon as any ancestor rotation changes.
#[derive(Debug, Clone)]
pub struct Joint {
    pub(crate) parent: Option<JointIndex>,
    pub(crate) children: Vec<JointIndex>,

    pub(crate) offset: Vec3,
    pub(crate) rotation: Mat3,

    pub(crate) bind_world_to_joint: Affine3A,
    pub(crate) current_joint_to_world: Affine3A,
}

impl Joint {
    pub(crate) fn new(offset: Vec3, parent: Option<JointIndex>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            offset,
            rotation: Mat3::IDENTITY,
            bind_world_to_joint: Affine3A::IDENTITY,
            current_joint_to_world: Affine3A::IDENTITY,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<JointIndex> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[JointIndex] {
        &self.children
    }

    /// Fixed translation relative to the parent.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    /// Joint-to-parent transform for the current pose.
    #[inline]
    #[must_use]
    pub fn local_transform(&self) -> Affine3A {
        Affine3A::from_mat3_translation(self.rotation, self.offset)
    }

    #[inline]
    #[must_use]
    pub fn bind_world_to_joint(&self) -> &Affine3A {
        &self.bind_world_to_joint
    }

    #[inline]
    #[must_use]
    pub fn current_joint_to_world(&self) -> &Affine3A {
        &self.current_joint_to_world
    }
}

/// Builds the rotation `Rz · Ry · Rx` from Euler angles in radians.
///
/// X is applied first, then Y, then Z.
#[must_use]
pub fn euler_rotation(euler: Vec3) -> Mat3 {
    Mat3::from_rotation_z(euler.z) * Mat3::from_rotation_y(euler.y) * Mat3::from_rotation_x(euler.x)
}
