//! Per-vertex displacement between the basis and a shape key.
//!
//! The displacement of vertex `i` is `shape_key[i] - basis[i]`; its magnitude
//! is the Euclidean norm of that vector. A vertex is *affected* when its
//! magnitude is strictly greater than a small epsilon, which absorbs
//! floating-point noise left behind by sculpting or export round-trips.
//!
//! # Example
//!
//! ```
//! use shapekey::algo::displacement::{affected_mask, compute_displacements, DEFAULT_EPSILON};
//! use nalgebra::Point3;
//!
//! let basis = vec![Point3::origin(); 3];
//! let shape = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.0, 2.0, 0.0),
//!     Point3::new(0.0, 0.0, 1e-9),
//! ];
//!
//! let displacements = compute_displacements(&basis, &shape).unwrap();
//! assert_eq!(displacements[1].magnitude, 2.0);
//! assert_eq!(affected_mask(&displacements, DEFAULT_EPSILON), vec![false, true, false]);
//! ```

use nalgebra::{Point3, Vector3};

use crate::error::{Result, ShapeKeyError};

/// Magnitude at or below which a vertex counts as not moved.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Displacement of one vertex from the basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    /// `shape_key - basis`.
    pub vector: Vector3<f64>,
    /// Euclidean length of `vector` (always `>= 0`).
    pub magnitude: f64,
}

impl Displacement {
    /// Displacement from `basis` to `shape`.
    #[inline]
    pub fn between(basis: &Point3<f64>, shape: &Point3<f64>) -> Self {
        let vector = shape - basis;
        Self {
            vector,
            magnitude: vector.norm(),
        }
    }

    /// Whether this displacement exceeds `epsilon`.
    #[inline]
    pub fn is_affected(&self, epsilon: f64) -> bool {
        self.magnitude > epsilon
    }
}

/// Compute the displacement of every vertex.
///
/// # Errors
/// Returns [`ShapeKeyError::ShapeMismatch`] if the two sequences differ in length.
pub fn compute_displacements(
    basis: &[Point3<f64>],
    shape_key: &[Point3<f64>],
) -> Result<Vec<Displacement>> {
    ShapeKeyError::check_aligned(basis.len(), shape_key.len())?;

    Ok(basis
        .iter()
        .zip(shape_key)
        .map(|(b, s)| Displacement::between(b, s))
        .collect())
}

/// Boolean mask that is `true` where the displacement exceeds `epsilon`.
pub fn affected_mask(displacements: &[Displacement], epsilon: f64) -> Vec<bool> {
    displacements.iter().map(|d| d.is_affected(epsilon)).collect()
}

/// Summary of the affected vertices of a shape key.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplacementStats {
    /// Number of vertices whose magnitude exceeds epsilon.
    pub affected_count: usize,
    /// Largest magnitude (0 if nothing is affected).
    pub max_magnitude: f64,
    /// Mean magnitude over affected vertices (0 if nothing is affected).
    pub mean_magnitude: f64,
}

impl DisplacementStats {
    /// Summarize `displacements`.
    pub fn from_displacements(displacements: &[Displacement], epsilon: f64) -> Self {
        let mut stats = Self::default();
        let mut sum = 0.0;

        for d in displacements.iter().filter(|d| d.is_affected(epsilon)) {
            stats.affected_count += 1;
            stats.max_magnitude = stats.max_magnitude.max(d.magnitude);
            sum += d.magnitude;
        }

        if stats.affected_count > 0 {
            stats.mean_magnitude = sum / stats.affected_count as f64;
        }
        stats
    }
}
