//! Blending a shape key toward the basis with per-vertex weights.
//!
//! Each vertex is interpolated between its basis position and its shape-key
//! position: `new = basis + (shape - basis) * w`. A weight of 1 keeps the
//! shape key, a weight of 0 returns the vertex to the basis. The
//! interpolation is evaluated as `basis * (1 - w) + shape * w` so that both
//! end points are reproduced exactly.
//!
//! # Example
//!
//! ```
//! use shapekey::algo::blend::{blend_from_vertex_group, BlendOptions};
//! use nalgebra::Point3;
//!
//! let basis = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)];
//! let shape = vec![Point3::new(2.0, 0.0, 0.0), Point3::new(0.0, 4.0, 0.0)];
//! let weights = [0.5, 1.0];
//!
//! let blended = blend_from_vertex_group(&basis, &shape, &weights, &BlendOptions::default()).unwrap();
//! assert_eq!(blended[0], Point3::new(1.0, 0.0, 0.0));
//! assert_eq!(blended[1], shape[1]);
//! ```

use nalgebra::Point3;
use rayon::prelude::*;

use crate::error::{Result, ShapeKeyError};
use crate::mesh::VertexGroup;

/// Weight used for vertices that are not members of the vertex group.
pub const MISSING_WEIGHT: f64 = 0.0;

/// Options for [`blend_from_vertex_group`].
#[derive(Debug, Clone)]
pub struct BlendOptions {
    /// Use `1 - weight` instead of `weight`.
    pub invert: bool,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self {
            invert: false,
            parallel: true,
        }
    }
}

impl BlendOptions {
    /// Set whether weights are inverted.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// One weight per vertex from a vertex group; non-members get [`MISSING_WEIGHT`].
pub fn vertex_group_weights(group: &VertexGroup, num_vertices: usize) -> Vec<f64> {
    group.dense_weights(num_vertices, MISSING_WEIGHT)
}

/// Blend `shape_key` toward `basis` using one weight per vertex.
///
/// Weights are used as given: values outside `[0, 1]` extrapolate past the
/// basis or the shape key. Every vertex is independent, so the parallel and
/// sequential paths produce identical output.
///
/// # Errors
/// Returns [`ShapeKeyError::ShapeMismatch`] if `shape_key` or `weights` is not
/// the same length as `basis`.
pub fn blend_from_vertex_group(
    basis: &[Point3<f64>],
    shape_key: &[Point3<f64>],
    weights: &[f64],
    options: &BlendOptions,
) -> Result<Vec<Point3<f64>>> {
    ShapeKeyError::check_aligned(basis.len(), shape_key.len())?;
    ShapeKeyError::check_aligned(basis.len(), weights.len())?;

    let out_of_range = weights.iter().filter(|w| !(0.0..=1.0).contains(*w)).count();
    if out_of_range > 0 {
        log::warn!("{} vertex weights lie outside [0, 1]; extrapolating", out_of_range);
    }

    let invert = options.invert;
    let blend_one = |i: usize| {
        let w = if invert { 1.0 - weights[i] } else { weights[i] };
        lerp(&basis[i], &shape_key[i], w)
    };

    let blended: Vec<Point3<f64>> = if options.parallel {
        (0..basis.len()).into_par_iter().map(blend_one).collect()
    } else {
        (0..basis.len()).map(blend_one).collect()
    };
    Ok(blended)
}

#[inline]
fn lerp(a: &Point3<f64>, b: &Point3<f64>, t: f64) -> Point3<f64> {
    Point3::from(a.coords * (1.0 - t) + b.coords * t)
}
