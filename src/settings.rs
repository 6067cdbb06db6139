//! Skinning Settings
//!
//! Runtime configuration for loading and deforming a skinned model.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use smooth_skin::settings::{SkinningSettings, TraversalMode};
//!
//! // Defaults: depth-first propagation, parallel blend when available
//! let settings = SkinningSettings::default();
//!
//! // Level-order propagation with a looser weight check
//! let settings = SkinningSettings {
//!     traversal: TraversalMode::LevelOrder,
//!     weight_tolerance: 1e-3,
//!     ..Default::default()
//! };
//!
//! // Or from JSON; missing keys fall back to defaults
//! let settings = SkinningSettings::from_json_str(r#"{ "parallel_skinning": false }"#)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SkinError};

/// Default tolerance for the per-vertex weight-sum check.
pub const DEFAULT_WEIGHT_TOLERANCE: f32 = 1e-5;

/// How joint transforms are propagated down the hierarchy.
///
/// Both modes finalise a parent before any of its children and produce
/// identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    /// Explicit-stack depth-first walk from the root.
    #[default]
    DepthFirst,
    /// Breadth-first batches, one level at a time. Joints within a level are
    /// independent and are processed in parallel with the `parallel` feature.
    LevelOrder,
}

/// Settings consumed by [`SkeletalModel`](crate::model::SkeletalModel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinningSettings {
    /// Maximum deviation of a vertex's weight sum from 1.
    pub weight_tolerance: f32,
    /// Propagation strategy for the current-pose pass.
    pub traversal: TraversalMode,
    /// Blend vertices on the rayon pool. Ignored without the `parallel` feature.
    pub parallel_skinning: bool,
}

impl Default for SkinningSettings {
    fn default() -> Self {
        Self {
            weight_tolerance: DEFAULT_WEIGHT_TOLERANCE,
            traversal: TraversalMode::DepthFirst,
            parallel_skinning: true,
        }
    }
}

impl SkinningSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SkinError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Whether the vertex blend should run on the rayon pool.
    #[inline]
    #[must_use]
    pub fn use_parallel_skinning(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel_skinning
    }
}
