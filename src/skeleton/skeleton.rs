use glam::{Affine3A, Vec3};

use crate::errors::{Result, SkinError};
use crate::settings::TraversalMode;

use super::joint::{Joint, JointIndex, JointRecord, euler_rotation};
use super::transform_system::{
    LevelOrderBatches, build_level_order_batches, propagate_bind, propagate_current,
    propagate_current_batched,
};

/// A joint hierarchy with cached bind-pose and current-pose transforms.
///
/// # Lifecycle
///
/// 1. [`Skeleton::build`] from ordered records
/// 2. [`Skeleton::compute_bind_transforms`] exactly once, before any rotation
/// 3. [`Skeleton::set_joint_rotation`] as often as needed
/// 4. [`Skeleton::update_current_transforms`] after each logical pose change
///
/// Caching is explicit. Rotating a joint does not touch any cached transform
/// until step 4 runs again.
#[derive(Debug, Clone)]
pub struct Skeleton {
    joints: Vec<Joint>,
    root: JointIndex,
    batches: LevelOrderBatches,

    /// `current_joint_to_world * bind_world_to_joint` per joint.
    /// Refreshed together with the current-pose pass.
    joint_matrices: Vec<Affine3A>,

    traversal: TraversalMode,
    parallel: bool,

    bind_computed: bool,
    pose_computed: bool,
}

impl Skeleton {
    /// Builds the joint tree from records in order.
    ///
    /// Every record must reference an earlier record as its parent, except
    /// for exactly one root. This rules out cycles and disconnected forests.
    pub fn build(records: &[JointRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(SkinError::EmptySkeleton);
        }

        let mut joints: Vec<Joint> = Vec::with_capacity(records.len());
        let mut root: Option<JointIndex> = None;

        for (index, record) in records.iter().enumerate() {
            match record.parent {
                None => {
                    if let Some(existing) = root {
                        return Err(SkinError::DuplicateRoot {
                            existing,
                            joint: index,
                        });
                    }
                    root = Some(index);
                }
                Some(parent) if parent >= index => {
                    return Err(SkinError::InvalidParent {
                        joint: index,
                        parent,
                    });
                }
                Some(parent) => joints[parent].children.push(index),
            }
            joints.push(Joint::new(record.offset, record.parent));
        }

        let root = root.ok_or(SkinError::MissingRoot)?;

        let mut batches = LevelOrderBatches::new();
        build_level_order_batches(&joints, root, &mut batches);

        log::debug!(
            "Built skeleton: {} joints, depth {}",
            joints.len(),
            batches.depth()
        );

        Ok(Self {
            joint_matrices: vec![Affine3A::IDENTITY; joints.len()],
            joints,
            root,
            batches,
            traversal: TraversalMode::default(),
            parallel: true,
            bind_computed: false,
            pose_computed: false,
        })
    }

    /// Selects how [`update_current_transforms`](Self::update_current_transforms)
    /// walks the tree. `parallel` only matters for level order with the
    /// `parallel` feature.
    pub fn set_traversal(&mut self, traversal: TraversalMode, parallel: bool) {
        self.traversal = traversal;
        self.parallel = parallel;
    }

    #[inline]
    #[must_use]
    pub fn traversal(&self) -> TraversalMode {
        self.traversal
    }

    // ========================================================================
    // Pose mutation
    // ========================================================================

    /// Replaces the rotation of a joint with `Rz · Ry · Rx` built from
    /// `euler` (radians). The translation is left untouched and no cached
    /// transform is recomputed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_joint_rotation(&mut self, index: JointIndex, euler: Vec3) {
        let count = self.joints.len();
        assert!(
            index < count,
            "joint index {index} out of range for skeleton with {count} joints"
        );
        self.joints[index].rotation = euler_rotation(euler);
    }

    /// Caches the bind-pose world-to-joint transform of every joint.
    ///
    /// Only the first call does any work. The bind pose is the rest pose at
    /// that moment, so it must run before any rotation is applied.
    pub fn compute_bind_transforms(&mut self) {
        if self.bind_computed {
            log::warn!("Bind transforms already computed, ignoring repeated request");
            return;
        }

        propagate_bind(&mut self.joints, self.root);
        self.bind_computed = true;

        log::debug!("Computed bind transforms for {} joints", self.joints.len());
    }

    /// Recomputes the current-pose joint-to-world transform of every joint,
    /// then the per-joint skinning matrices.
    ///
    /// # Panics
    ///
    /// Panics if [`compute_bind_transforms`](Self::compute_bind_transforms)
    /// has not run.
    pub fn update_current_transforms(&mut self) {
        assert!(
            self.bind_computed,
            "compute_bind_transforms must run before update_current_transforms"
        );

        match self.traversal {
            TraversalMode::DepthFirst => propagate_current(&mut self.joints, self.root),
            TraversalMode::LevelOrder => {
                propagate_current_batched(&mut self.joints, &self.batches, self.parallel);
            }
        }

        for (matrix, joint) in self.joint_matrices.iter_mut().zip(&self.joints) {
            *matrix = joint.current_joint_to_world * joint.bind_world_to_joint;
        }
        self.pose_computed = true;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> JointIndex {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[inline]
    #[must_use]
    pub fn joint(&self, index: JointIndex) -> Option<&Joint> {
        self.joints.get(index)
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, index: JointIndex) -> Option<JointIndex> {
        self.joints.get(index).and_then(Joint::parent)
    }

    #[inline]
    #[must_use]
    pub fn children(&self, index: JointIndex) -> &[JointIndex] {
        self.joints.get(index).map(Joint::children).unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn level_batches(&self) -> &LevelOrderBatches {
        &self.batches
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn local_transform(&self, index: JointIndex) -> Affine3A {
        self.joints[index].local_transform()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn bind_world_to_joint(&self, index: JointIndex) -> &Affine3A {
        &self.joints[index].bind_world_to_joint
    }

    /// Joint-to-world transform as of the last
    /// [`update_current_transforms`](Self::update_current_transforms).
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn current_joint_to_world(&self, index: JointIndex) -> &Affine3A {
        &self.joints[index].current_joint_to_world
    }

    /// Skinning matrix per joint: maps a bind-pose point to its posed
    /// position if it were rigidly attached to that joint.
    #[inline]
    #[must_use]
    pub fn joint_matrices(&self) -> &[Affine3A] {
        &self.joint_matrices
    }

    #[inline]
    #[must_use]
    pub fn is_bind_computed(&self) -> bool {
        self.bind_computed
    }

    #[inline]
    #[must_use]
    pub fn is_pose_computed(&self) -> bool {
        self.pose_computed
    }
}
