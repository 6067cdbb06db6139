use crate::errors::{Result, SkinError};

/// Per-vertex joint weights.
///
/// Stored as one flat array with `joint_count` weights per vertex, so row `v`
/// is `weights[v * joint_count..(v + 1) * joint_count]`. Weight `j` of row `v`
/// is the influence of joint `j` on vertex `v`.
///
/// The root column is 0 by convention; the root is the fixed world anchor.
/// Rows built in code may hold anything, [`Attachments::validate`] rejects a
/// nonzero root weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachments {
    joint_count: usize,
    weights: Vec<f32>,
}

impl Attachments {
    /// Creates an empty table for a skeleton with `joint_count` joints.
    ///
    /// # Panics
    ///
    /// Panics if `joint_count` is zero.
    #[must_use]
    pub fn with_joint_count(joint_count: usize) -> Self {
        assert!(joint_count > 0, "attachments need at least one joint");
        Self {
            joint_count,
            weights: Vec::new(),
        }
    }

    /// Builds a table from full-width rows (one weight per joint, root included).
    pub fn from_rows<R: AsRef<[f32]>>(joint_count: usize, rows: &[R]) -> Result<Self> {
        if joint_count == 0 {
            return Err(SkinError::EmptySkeleton);
        }
        let mut attachments = Self {
            joint_count,
            weights: Vec::with_capacity(rows.len() * joint_count),
        };
        for row in rows {
            attachments.push_vertex(row.as_ref())?;
        }
        Ok(attachments)
    }

    /// Appends the weights of the next vertex.
    pub fn push_vertex(&mut self, weights: &[f32]) -> Result<()> {
        if weights.len() != self.joint_count {
            return Err(SkinError::JointCountMismatch {
                weights: weights.len(),
                joints: self.joint_count,
            });
        }
        self.weights.extend_from_slice(weights);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.weights.len() / self.joint_count
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weights of vertex `vertex`, or `None` if out of range.
    #[inline]
    #[must_use]
    pub fn weights(&self, vertex: usize) -> Option<&[f32]> {
        let start = vertex.checked_mul(self.joint_count)?;
        self.weights.get(start..start + self.joint_count)
    }

    /// All weights, row after row.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }

    /// Iterates the weight rows in vertex order.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f32> {
        self.weights.chunks_exact(self.joint_count)
    }

    /// Checks the table against a mesh of `vertex_count` vertices.
    ///
    /// Every weight must be finite and the root column must be 0. Every vertex
    /// must be influenced by at least one joint and its weights must sum to 1
    /// within `tolerance`. Nothing is normalised.
    pub fn validate(&self, vertex_count: usize, tolerance: f32) -> Result<()> {
        if self.vertex_count() != vertex_count {
            return Err(SkinError::VertexCountMismatch {
                attachments: self.vertex_count(),
                vertices: vertex_count,
            });
        }

        for (vertex, row) in self.rows().enumerate() {
            if let Some(joint) = row.iter().position(|w| !w.is_finite()) {
                return Err(SkinError::NonFiniteWeight { vertex, joint });
            }
            if row[0] != 0.0 {
                return Err(SkinError::RootWeight {
                    vertex,
                    weight: row[0],
                });
            }
            if row.iter().all(|&w| w == 0.0) {
                return Err(SkinError::UnweightedVertex { vertex });
            }
            let sum: f32 = row.iter().sum();
            if (sum - 1.0).abs() > tolerance {
                return Err(SkinError::WeightSum {
                    vertex,
                    sum,
                    tolerance,
                });
            }
        }

        Ok(())
    }
}
