//! Linear blend skinning
//!
//! Each posed vertex is the weighted sum of its bind position carried through
//! every influencing joint:
//!
//! ```text
//! v' = Σ_j  w_j · current_joint_to_world[j] · bind_world_to_joint[j] · v
//! ```
//!
//! The two transforms are pre-multiplied per joint by the skeleton
//! (`Skeleton::joint_matrices`). Zero weights are skipped. Weights are used
//! as given and never renormalised.

use glam::{Affine3A, Vec3};

/// Blends one vertex. Returns `None` if no joint has a nonzero weight.
#[inline]
#[must_use]
pub fn blend_vertex(bind: Vec3, weights: &[f32], joint_matrices: &[Affine3A]) -> Option<Vec3> {
    let mut position = Vec3::ZERO;
    let mut influenced = false;

    for (&weight, matrix) in weights.iter().zip(joint_matrices) {
        if weight == 0.0 {
            continue;
        }
        position += weight * matrix.transform_point3(bind);
        influenced = true;
    }

    influenced.then_some(position)
}

fn blend_into(index: usize, bind: Vec3, weights: &[f32], joint_matrices: &[Affine3A]) -> Vec3 {
    blend_vertex(bind, weights, joint_matrices)
        .unwrap_or_else(|| panic!("vertex {index} has no joint with a nonzero weight"))
}

/// Blends every vertex into `output`.
///
/// `weights` is flat, with `joint_matrices.len()` weights per vertex.
///
/// # Panics
///
/// Panics if a vertex has no nonzero weight.
pub fn skin_vertices(
    bind: &[Vec3],
    weights: &[f32],
    joint_matrices: &[Affine3A],
    output: &mut [Vec3],
) {
    let stride = joint_matrices.len();
    for (index, ((out, &vertex), row)) in output
        .iter_mut()
        .zip(bind)
        .zip(weights.chunks_exact(stride))
        .enumerate()
    {
        *out = blend_into(index, vertex, row, joint_matrices);
    }
}

/// Vertex-parallel version of [`skin_vertices`] on the rayon pool.
///
/// Joint matrices are shared read-only; each task writes only its own vertex.
///
/// # Panics
///
/// Panics if a vertex has no nonzero weight.
#[cfg(feature = "parallel")]
pub fn skin_vertices_parallel(
    bind: &[Vec3],
    weights: &[f32],
    joint_matrices: &[Affine3A],
    output: &mut [Vec3],
) {
    use rayon::prelude::*;

    let stride = joint_matrices.len();
    output
        .par_iter_mut()
        .zip(bind.par_iter())
        .zip(weights.par_chunks_exact(stride))
        .enumerate()
        .for_each(|(index, ((out, &vertex), row))| {
            *out = blend_into(index, vertex, row, joint_matrices);
        });
}
