//! Skeleton module
//!
//! Joint hierarchy and transform propagation:
//! - Joint: arena node with a fixed offset and a mutable rotation
//! - Skeleton: owns the joints, caches bind and current transforms
//! - TransformSystem: the stack-based and level-batched propagation passes

pub mod joint;
#[allow(clippy::module_inception)]
pub mod skeleton;
pub mod transform_system;

pub use joint::{Joint, JointIndex, JointRecord, euler_rotation};
pub use skeleton::Skeleton;
pub use transform_system::LevelOrderBatches;
