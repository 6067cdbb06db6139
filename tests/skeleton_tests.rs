//! Skeleton and transform propagation tests
//!
//! Tests for:
//! - Topology validation (duplicate root, forward/self references)
//! - Euler rotation order and translation preservation
//! - Bind-pose world-to-joint transforms
//! - Current-pose joint-to-world transforms and explicit recompute
//! - Depth-first vs level-order propagation

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Mat3, Vec3};
use smooth_skin::skeleton::{JointRecord, Skeleton, euler_rotation};
use smooth_skin::{SkinError, TraversalMode};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

/// root(0,0,0) ─ 1(0,1,0) ─ 2(0,1,0)
fn chain() -> Vec<JointRecord> {
    vec![
        JointRecord::root(Vec3::ZERO),
        JointRecord::child(Vec3::new(0.0, 1.0, 0.0), 0),
        JointRecord::child(Vec3::new(0.0, 1.0, 0.0), 1),
    ]
}

/// root(1,0,0)
/// ├── 1(0,2,0)
/// │   └── 3(0,0,1)
/// └── 2(-1,0,0)
///     └── 4(0,-1,0)
fn branched() -> Vec<JointRecord> {
    vec![
        JointRecord::root(Vec3::new(1.0, 0.0, 0.0)),
        JointRecord::child(Vec3::new(0.0, 2.0, 0.0), 0),
        JointRecord::child(Vec3::new(-1.0, 0.0, 0.0), 0),
        JointRecord::child(Vec3::new(0.0, 0.0, 1.0), 1),
        JointRecord::child(Vec3::new(0.0, -1.0, 0.0), 2),
    ]
}

fn ready(records: &[JointRecord]) -> Skeleton {
    let mut skeleton = Skeleton::build(records).unwrap();
    skeleton.compute_bind_transforms();
    skeleton.update_current_transforms();
    skeleton
}

fn world_position(skeleton: &Skeleton, joint: usize) -> Vec3 {
    skeleton.current_joint_to_world(joint).translation.into()
}

// ============================================================================
// Topology
// ============================================================================

#[test]
fn build_links_parents_and_children() {
    let skeleton = Skeleton::build(&branched()).unwrap();

    assert_eq!(skeleton.joint_count(), 5);
    assert_eq!(skeleton.root(), 0);
    assert_eq!(skeleton.parent(0), None);
    assert_eq!(skeleton.parent(3), Some(1));
    assert_eq!(skeleton.children(0), &[1, 2]);
    assert_eq!(skeleton.children(2), &[4]);
    assert!(skeleton.children(4).is_empty());
}

#[test]
fn build_rejects_empty_descriptor() {
    assert!(matches!(Skeleton::build(&[]), Err(SkinError::EmptySkeleton)));
}

#[test]
fn build_rejects_duplicate_root() {
    let records = vec![
        JointRecord::root(Vec3::ZERO),
        JointRecord::child(Vec3::Y, 0),
        JointRecord::root(Vec3::X),
    ];
    let err = Skeleton::build(&records).unwrap_err();
    assert!(matches!(
        err,
        SkinError::DuplicateRoot {
            existing: 0,
            joint: 2
        }
    ));
}

#[test]
fn build_rejects_forward_reference() {
    let records = vec![
        JointRecord::root(Vec3::ZERO),
        JointRecord::child(Vec3::Y, 2),
        JointRecord::child(Vec3::Y, 0),
    ];
    let err = Skeleton::build(&records).unwrap_err();
    assert!(matches!(
        err,
        SkinError::InvalidParent {
            joint: 1,
            parent: 2
        }
    ));
}

#[test]
fn build_rejects_cycle() {
    // 1 -> 2 -> 1 can only be written with a forward reference
    let records = vec![
        JointRecord::root(Vec3::ZERO),
        JointRecord::child(Vec3::Y, 2),
        JointRecord::child(Vec3::Y, 1),
    ];
    assert!(matches!(
        Skeleton::build(&records),
        Err(SkinError::InvalidParent { .. })
    ));

    let self_parent = vec![JointRecord::root(Vec3::ZERO), JointRecord::child(Vec3::Y, 1)];
    assert!(matches!(
        Skeleton::build(&self_parent),
        Err(SkinError::InvalidParent { joint: 1, parent: 1 })
    ));
}

#[test]
fn build_rejects_rootless_first_record() {
    let records = vec![JointRecord::child(Vec3::Y, 0)];
    assert!(matches!(
        Skeleton::build(&records),
        Err(SkinError::InvalidParent { joint: 0, parent: 0 })
    ));
}

#[test]
fn every_ancestor_chain_reaches_root() {
    let skeleton = Skeleton::build(&branched()).unwrap();

    for joint in 0..skeleton.joint_count() {
        let mut current = joint;
        let mut steps = 0;
        while let Some(parent) = skeleton.parent(current) {
            current = parent;
            steps += 1;
            assert!(steps <= skeleton.joint_count(), "cycle above joint {joint}");
        }
        assert_eq!(current, skeleton.root());
    }
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn euler_rotation_applies_x_then_y_then_z() {
    let rotation = euler_rotation(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));

    // Rx leaves X alone, Rz then takes it to Y
    assert!(vec3_approx(rotation * Vec3::X, Vec3::Y));
    // Rx takes Y to Z, Rz leaves Z alone
    assert!(vec3_approx(rotation * Vec3::Y, Vec3::Z));

    let expected = Mat3::from_rotation_z(0.3) * Mat3::from_rotation_y(-0.2) * Mat3::from_rotation_x(0.9);
    assert!(euler_rotation(Vec3::new(0.9, -0.2, 0.3)).abs_diff_eq(expected, EPSILON));
}

#[test]
fn set_joint_rotation_keeps_translation() {
    let mut skeleton = Skeleton::build(&branched()).unwrap();
    skeleton.set_joint_rotation(1, Vec3::new(0.4, -1.1, 2.0));

    let local = skeleton.local_transform(1);
    assert!(vec3_approx(local.translation.into(), Vec3::new(0.0, 2.0, 0.0)));
    assert!(
        Mat3::from(local.matrix3).abs_diff_eq(euler_rotation(Vec3::new(0.4, -1.1, 2.0)), EPSILON)
    );
}

#[test]
#[should_panic(expected = "out of range")]
fn set_joint_rotation_out_of_range_panics() {
    let mut skeleton = Skeleton::build(&chain()).unwrap();
    skeleton.set_joint_rotation(3, Vec3::ZERO);
}

// ============================================================================
// Bind transforms
// ============================================================================

#[test]
fn bind_transform_maps_rest_position_to_joint_origin() {
    let mut skeleton = Skeleton::build(&branched()).unwrap();
    skeleton.compute_bind_transforms();
    assert!(skeleton.is_bind_computed());

    let rest_positions = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 2.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 2.0, 1.0),
        Vec3::new(0.0, -1.0, 0.0),
    ];
    for (joint, &rest) in rest_positions.iter().enumerate() {
        let local = skeleton.bind_world_to_joint(joint).transform_point3(rest);
        assert!(vec3_approx(local, Vec3::ZERO), "joint {joint}: {local}");
    }
}

#[test]
fn bind_transforms_are_computed_once() {
    let mut skeleton = Skeleton::build(&chain()).unwrap();
    skeleton.compute_bind_transforms();
    let before = *skeleton.bind_world_to_joint(2);

    skeleton.set_joint_rotation(0, Vec3::new(0.0, 0.0, 1.0));
    skeleton.compute_bind_transforms();

    assert_eq!(*skeleton.bind_world_to_joint(2), before);
}

// ============================================================================
// Current transforms
// ============================================================================

#[test]
fn root_rotation_moves_child_by_hand_computed_amount() {
    let records = vec![
        JointRecord::root(Vec3::ZERO),
        JointRecord::child(Vec3::new(0.0, 1.0, 0.0), 0),
    ];
    let mut skeleton = ready(&records);

    skeleton.set_joint_rotation(0, Vec3::new(0.0, 0.0, FRAC_PI_2));
    skeleton.update_current_transforms();

    assert!(vec3_approx(world_position(&skeleton, 0), Vec3::ZERO));
    assert!(vec3_approx(world_position(&skeleton, 1), Vec3::new(-1.0, 0.0, 0.0)));
}

#[test]
fn chain_rotations_accumulate() {
    let mut skeleton = ready(&chain());

    skeleton.set_joint_rotation(0, Vec3::new(0.0, 0.0, FRAC_PI_2));
    skeleton.set_joint_rotation(1, Vec3::new(0.0, 0.0, FRAC_PI_2));
    skeleton.update_current_transforms();

    // joint 1 at (-1,0,0); joint 2 turned 180° in total
    assert!(vec3_approx(world_position(&skeleton, 1), Vec3::new(-1.0, 0.0, 0.0)));
    assert!(vec3_approx(world_position(&skeleton, 2), Vec3::new(-1.0, -1.0, 0.0)));
}

#[test]
fn identity_pose_matches_rest_positions() {
    let skeleton = ready(&branched());

    assert!(vec3_approx(world_position(&skeleton, 3), Vec3::new(1.0, 2.0, 1.0)));
    assert!(vec3_approx(world_position(&skeleton, 4), Vec3::new(0.0, -1.0, 0.0)));
    for matrix in skeleton.joint_matrices() {
        assert!(matrix.abs_diff_eq(glam::Affine3A::IDENTITY, EPSILON));
    }
}

#[test]
fn rotation_without_update_keeps_cached_pose() {
    let mut skeleton = ready(&chain());
    let before = *skeleton.current_joint_to_world(2);

    skeleton.set_joint_rotation(0, Vec3::new(FRAC_PI_4, 0.0, 0.0));
    assert_eq!(*skeleton.current_joint_to_world(2), before);

    skeleton.update_current_transforms();
    assert_ne!(*skeleton.current_joint_to_world(2), before);
}

#[test]
#[should_panic(expected = "compute_bind_transforms")]
fn update_before_bind_panics() {
    let mut skeleton = Skeleton::build(&chain()).unwrap();
    skeleton.update_current_transforms();
}

#[test]
fn level_order_matches_depth_first() {
    let pose = [
        (0, Vec3::new(0.1, 0.2, 0.3)),
        (1, Vec3::new(-0.7, 0.0, 1.2)),
        (2, Vec3::new(0.0, FRAC_PI_2, 0.0)),
        (4, Vec3::new(0.5, -0.5, 0.5)),
    ];

    let mut depth_first = ready(&branched());
    let mut level_order = ready(&branched());
    level_order.set_traversal(TraversalMode::LevelOrder, true);

    for &(joint, euler) in &pose {
        depth_first.set_joint_rotation(joint, euler);
        level_order.set_joint_rotation(joint, euler);
    }
    depth_first.update_current_transforms();
    level_order.update_current_transforms();

    assert_eq!(level_order.level_batches().depth(), 3);
    for joint in 0..depth_first.joint_count() {
        assert!(
            depth_first
                .current_joint_to_world(joint)
                .abs_diff_eq(*level_order.current_joint_to_world(joint), EPSILON),
            "joint {joint} differs"
        );
    }
}

#[test]
fn deep_chain_does_not_overflow() {
    let mut records = vec![JointRecord::root(Vec3::ZERO)];
    for i in 1..50_000 {
        records.push(JointRecord::child(Vec3::new(0.0, 0.001, 0.0), i - 1));
    }
    let skeleton = ready(&records);

    let tip = world_position(&skeleton, records.len() - 1);
    assert!((tip.y - 49.999).abs() < 1e-2);
}
