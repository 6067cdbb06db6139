//! Smooth Skin
//!
//! A skeleton hierarchy with cached bind-pose and current-pose joint
//! transforms, and a triangle mesh deformed from it by linear blend skinning.
//!
//! - [`skeleton`]: joint arena and transform propagation
//! - [`mesh`]: skinned mesh, attachment weights, blend kernels
//! - [`loader`]: text descriptors for skeletons, meshes and weights
//! - [`model`]: [`SkeletalModel`], the load → bind → pose → deform driver
//! - [`settings`]: runtime configuration

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod errors;
pub mod loader;
pub mod mesh;
pub mod model;
pub mod settings;
pub mod skeleton;

pub use errors::{Result, SkinError};
pub use mesh::{Attachments, Face, SkinnedMesh};
pub use model::SkeletalModel;
pub use settings::{SkinningSettings, TraversalMode};
pub use skeleton::{Joint, JointIndex, JointRecord, Skeleton};
