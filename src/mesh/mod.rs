//! Skinned mesh module
//!
//! - Attachments: flat per-vertex, per-joint weight table
//! - SkinnedMesh: bind vertices, faces and the deformed vertices
//! - skinning: the linear blend kernels (serial and rayon)

pub mod attachments;
pub mod skinned_mesh;
pub mod skinning;

pub use attachments::Attachments;
pub use skinned_mesh::{Face, SkinnedMesh};
