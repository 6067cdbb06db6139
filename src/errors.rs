//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`SkinError`] covers the recoverable failure modes:
//! - Malformed skeleton topology (missing/duplicate root, forward parent references)
//! - Mesh and attachment data that does not line up with the skeleton
//! - Text descriptor parse failures and file I/O
//!
//! Contract violations (out-of-range joint indices, deforming before the
//! transform caches exist) are not represented here. They panic.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, SkinError>`.
//!
//! ```rust,ignore
//! use smooth_skin::errors::{SkinError, Result};
//!
//! fn load_rig() -> Result<()> {
//!     let descriptor = smooth_skin::loader::load_skeleton("model.skel")?;
//!     let _skeleton = smooth_skin::Skeleton::build(&descriptor.joints)?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for skeleton, mesh and attachment construction.
#[derive(Error, Debug)]
pub enum SkinError {
    // ========================================================================
    // Topology Errors
    // ========================================================================
    /// The skeleton descriptor contained no joints.
    #[error("Skeleton has no joints")]
    EmptySkeleton,

    /// No record declared itself as the root.
    #[error("Skeleton has no root joint")]
    MissingRoot,

    /// More than one record declared itself as the root.
    #[error("Duplicate root joint: joint {joint} has no parent, but joint {existing} is already the root")]
    DuplicateRoot {
        /// The root already registered
        existing: usize,
        /// The record that tried to become a second root
        joint: usize,
    },

    /// A record referenced a parent that has not been created yet.
    #[error("Joint {joint} references parent {parent}, which is not an earlier record")]
    InvalidParent {
        /// Index of the offending record
        joint: usize,
        /// The declared parent index
        parent: usize,
    },

    // ========================================================================
    // Mesh & Attachment Errors
    // ========================================================================
    /// A face referenced a vertex that does not exist.
    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Face number
        face: usize,
        /// The offending 0-based vertex index
        index: u32,
        /// Number of bind vertices
        vertex_count: usize,
    },

    /// Number of attachment rows differs from the number of vertices.
    #[error("Attachment count mismatch: {attachments} weight rows for {vertices} vertices")]
    VertexCountMismatch {
        /// Rows of weights
        attachments: usize,
        /// Bind vertices
        vertices: usize,
    },

    /// Attachment row width differs from the number of joints.
    #[error("Attachment width mismatch: {weights} weights per vertex for {joints} joints")]
    JointCountMismatch {
        /// Weights per row
        weights: usize,
        /// Joints in the skeleton
        joints: usize,
    },

    /// A vertex's weights do not sum to one.
    #[error("Weights of vertex {vertex} sum to {sum}, expected 1 (tolerance {tolerance})")]
    WeightSum {
        /// Vertex index
        vertex: usize,
        /// Actual sum
        sum: f32,
        /// Allowed deviation from 1
        tolerance: f32,
    },

    /// A weight is NaN or infinite.
    #[error("Weight of joint {joint} on vertex {vertex} is not finite")]
    NonFiniteWeight {
        /// Vertex index
        vertex: usize,
        /// Joint column
        joint: usize,
    },

    /// A vertex carries weight on the root joint, which never moves it.
    #[error("Vertex {vertex} has root weight {weight}, expected 0")]
    RootWeight {
        /// Vertex index
        vertex: usize,
        /// The root column's value
        weight: f32,
    },

    /// A vertex has no joint with a nonzero weight.
    #[error("Vertex {vertex} is not influenced by any joint")]
    UnweightedVertex {
        /// Vertex index
        vertex: usize,
    },

    // ========================================================================
    // Format & I/O Errors
    // ========================================================================
    /// Text descriptor parsing error.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Failed to read a descriptor file.
    #[error("Failed to read {}: {source}", path.display())]
    File {
        /// The file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// JSON settings decode error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SkinError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        SkinError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Alias for `Result<T, SkinError>`.
pub type Result<T> = std::result::Result<T, SkinError>;
