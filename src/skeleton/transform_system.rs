//! Transform System
//!
//! Propagates the two per-joint transform families down the joint arena.
//! Kept apart from [`Skeleton`](super::Skeleton) so each pass only borrows the
//! joint slice.
//!
//! # Composition order
//!
//! The two passes are not mirror images of each other:
//! - bind:    `bind_world_to_joint = inverse(local) * parent_bind_world_to_joint`
//! - current: `current_joint_to_world = parent_current_joint_to_world * local`
//!
//! Both start from the identity at the root.
//!
//! # Level batching
//!
//! The current pass can also run level by level (BFS order):
//! 1. First level: the root
//! 2. Second level: its children (depend only on level one)
//! 3. ...and so on
//!
//! Joints inside one level never depend on each other, so with the `parallel`
//! feature each level is computed on the rayon pool.

use glam::Affine3A;

use super::joint::{Joint, JointIndex};

/// Level-order batches used for parallel propagation.
#[derive(Debug, Default, Clone)]
pub struct LevelOrderBatches {
    /// `batches[0]` holds the root, `batches[1]` its children, ...
    pub batches: Vec<Vec<JointIndex>>,
}

impl LevelOrderBatches {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }

    #[must_use]
    pub fn total_joints(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.batches.len()
    }
}

/// Groups joints by depth below `root`.
pub fn build_level_order_batches(
    joints: &[Joint],
    root: JointIndex,
    output: &mut LevelOrderBatches,
) {
    output.clear();

    let mut current_level = vec![root];

    while !current_level.is_empty() {
        let mut next_level = Vec::new();
        for &joint in &current_level {
            next_level.extend_from_slice(&joints[joint].children);
        }

        output.batches.push(current_level);
        current_level = next_level;
    }
}

/// Depth-first pass caching `bind_world_to_joint` for every joint.
///
/// Uses an explicit stack instead of recursion so deep chains cannot overflow.
pub fn propagate_bind(joints: &mut [Joint], root: JointIndex) {
    // (joint, parent bind world-to-joint)
    let mut stack: Vec<(JointIndex, Affine3A)> = Vec::with_capacity(64);
    stack.push((root, Affine3A::IDENTITY));

    while let Some((index, parent_bind)) = stack.pop() {
        let joint = &mut joints[index];
        joint.bind_world_to_joint = joint.local_transform().inverse() * parent_bind;

        let bind = joint.bind_world_to_joint;
        for &child in joint.children.iter().rev() {
            stack.push((child, bind));
        }
    }
}

/// Depth-first pass caching `current_joint_to_world` for every joint.
pub fn propagate_current(joints: &mut [Joint], root: JointIndex) {
    // (joint, parent current joint-to-world)
    let mut stack: Vec<(JointIndex, Affine3A)> = Vec::with_capacity(64);
    stack.push((root, Affine3A::IDENTITY));

    while let Some((index, parent_world)) = stack.pop() {
        let joint = &mut joints[index];
        joint.current_joint_to_world = parent_world * joint.local_transform();

        let world = joint.current_joint_to_world;
        for &child in joint.children.iter().rev() {
            stack.push((child, world));
        }
    }
}

/// Level-by-level version of [`propagate_current`].
///
/// `parallel` only has an effect with the `parallel` feature.
pub fn propagate_current_batched(
    joints: &mut [Joint],
    batches: &LevelOrderBatches,
    parallel: bool,
) {
    let mut level_results: Vec<Affine3A> = Vec::new();

    for batch in &batches.batches {
        level_results.clear();
        compute_level(joints, batch, parallel, &mut level_results);

        for (&index, world) in batch.iter().zip(&level_results) {
            joints[index].current_joint_to_world = *world;
        }
    }
}

fn current_world_of(joints: &[Joint], index: JointIndex) -> Affine3A {
    let joint = &joints[index];
    let parent_world = joint
        .parent
        .map_or(Affine3A::IDENTITY, |parent| joints[parent].current_joint_to_world);
    parent_world * joint.local_transform()
}

#[cfg(feature = "parallel")]
fn compute_level(
    joints: &[Joint],
    batch: &[JointIndex],
    parallel: bool,
    out: &mut Vec<Affine3A>,
) {
    use rayon::prelude::*;

    if parallel {
        batch
            .par_iter()
            .map(|&index| current_world_of(joints, index))
            .collect_into_vec(out);
    } else {
        out.extend(batch.iter().map(|&index| current_world_of(joints, index)));
    }
}

#[cfg(not(feature = "parallel"))]
fn compute_level(
    joints: &[Joint],
    batch: &[JointIndex],
    _parallel: bool,
    out: &mut Vec<Affine3A>,
) {
    out.extend(batch.iter().map(|&index| current_world_of(joints, index)));
}
