//! Cleanup of small shape-key movements.
//!
//! Sculpted or imported shape keys often move far more vertices than the
//! artist intended, each by a tiny amount. [`clean_small_movements`] snaps the
//! least-moved vertices back onto the basis, either a fixed fraction of the
//! currently moving vertices ([`CleanupMode::Percentage`]) or every moving
//! vertex under a distance ([`CleanupMode::Threshold`]).
//!
//! Percentage mode only counts vertices that are currently affected (moving
//! further than the epsilon). Running it repeatedly therefore removes the same
//! fraction of what is left each time: 10% of 1000 moving vertices resets 100,
//! the next run resets 90 of the remaining 900, and so on.
//!
//! Threshold mode considers every vertex that is off the basis at all, so it
//! also clears floating-point noise too small to count as affected.
//!
//! # Example
//!
//! ```
//! use shapekey::algo::cleanup::{clean_small_movements, CleanupOptions};
//! use nalgebra::Point3;
//!
//! let basis = vec![Point3::origin(); 4];
//! let shape = vec![
//!     Point3::new(0.001, 0.0, 0.0),
//!     Point3::new(0.5, 0.0, 0.0),
//!     Point3::new(0.002, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//! ];
//!
//! let result = clean_small_movements(&basis, &shape, &CleanupOptions::percentage(50.0)).unwrap();
//! assert_eq!(result.reset_count(), 2);
//! assert_eq!(result.remaining_count, 2);
//! assert_eq!(result.positions[0], basis[0]);
//! assert_eq!(result.positions[2], basis[2]);
//! ```

use std::cmp::Ordering;

use nalgebra::Point3;

use crate::error::{Result, ShapeKeyError};
use crate::mesh::VertexId;

use super::displacement::{compute_displacements, DEFAULT_EPSILON};

/// Default share of moving vertices reset in percentage mode.
pub const DEFAULT_PERCENTAGE: f64 = 10.0;

/// Default distance in threshold mode.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.001;

/// How vertices are chosen for reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupMode {
    /// Reset the least-moved `amount` percent of the moving vertices.
    #[default]
    Percentage,
    /// Reset every displaced vertex whose displacement is at most `amount`.
    Threshold,
}

/// Options for [`clean_small_movements`].
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Selection strategy.
    pub mode: CleanupMode,

    /// Percentage in `[0, 100]` or absolute distance `>= 0`, depending on `mode`.
    pub amount: f64,

    /// Magnitude at or below which a vertex is not considered moving
    /// (percentage mode only).
    pub epsilon: f64,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::percentage(DEFAULT_PERCENTAGE)
    }
}

impl CleanupOptions {
    /// Percentage-mode options.
    pub fn percentage(percentage: f64) -> Self {
        Self {
            mode: CleanupMode::Percentage,
            amount: percentage,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Threshold-mode options.
    pub fn threshold(distance: f64) -> Self {
        Self {
            mode: CleanupMode::Threshold,
            amount: distance,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Set the moving-vertex epsilon.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    fn validate(&self) -> Result<()> {
        match self.mode {
            CleanupMode::Percentage if !(0.0..=100.0).contains(&self.amount) => Err(
                ShapeKeyError::invalid_param("percentage", self.amount, "must be in [0, 100]"),
            ),
            CleanupMode::Threshold if !(self.amount >= 0.0 && self.amount.is_finite()) => Err(
                ShapeKeyError::invalid_param("distance_threshold", self.amount, "must be finite and >= 0"),
            ),
            _ if !(self.epsilon >= 0.0 && self.epsilon.is_finite()) => Err(
                ShapeKeyError::invalid_param("epsilon", self.epsilon, "must be finite and >= 0"),
            ),
            _ => Ok(()),
        }
    }
}

/// Outcome of [`clean_small_movements`].
#[derive(Debug, Clone)]
pub struct CleanupResult {
    /// New shape-key coordinates.
    pub positions: Vec<Point3<f64>>,

    /// Vertices snapped back to the basis, ordered by displacement, smallest first.
    pub reset_vertices: Vec<VertexId>,

    /// Reset candidates before cleanup: affected vertices in percentage mode,
    /// every displaced vertex in threshold mode.
    pub moving_count: usize,

    /// Candidates still moving after cleanup.
    pub remaining_count: usize,

    /// Vertices off the basis by any nonzero distance before cleanup.
    pub displaced_count: usize,
}

impl CleanupResult {
    /// Number of vertices snapped back to the basis.
    #[inline]
    pub fn reset_count(&self) -> usize {
        self.reset_vertices.len()
    }
}

/// Reset the least-moved vertices of a shape key to the basis.
///
/// Reset vertices receive the basis coordinate exactly. In percentage mode the
/// number reset is `floor(moving * amount / 100)`, choosing vertices by
/// ascending magnitude with ties broken by ascending vertex index. In
/// threshold mode every vertex with `0 < magnitude <= amount` is reset, so a
/// threshold of 0 changes nothing. When no vertex is a candidate, nothing
/// changes and `reset_count()` is 0.
///
/// # Errors
/// Returns [`ShapeKeyError::ShapeMismatch`] if the inputs differ in length and
/// [`ShapeKeyError::InvalidParameter`] if `amount` or `epsilon` is out of range.
pub fn clean_small_movements(
    basis: &[Point3<f64>],
    shape_key: &[Point3<f64>],
    options: &CleanupOptions,
) -> Result<CleanupResult> {
    options.validate()?;
    let displacements = compute_displacements(basis, shape_key)?;

    let floor = match options.mode {
        CleanupMode::Percentage => options.epsilon,
        CleanupMode::Threshold => 0.0,
    };
    let displaced_count = displacements.iter().filter(|d| d.is_affected(0.0)).count();

    let mut moving: Vec<(usize, f64)> = displacements
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_affected(floor))
        .map(|(i, d)| (i, d.magnitude))
        .collect();
    moving.sort_by(|a, b| match a.1.total_cmp(&b.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        ord => ord,
    });

    let reset_len = match options.mode {
        CleanupMode::Percentage => {
            let count = (moving.len() as f64 * options.amount / 100.0).floor() as usize;
            count.min(moving.len())
        }
        // `moving` is sorted, so the vertices under the threshold form a prefix.
        CleanupMode::Threshold => moving.partition_point(|&(_, m)| m <= options.amount),
    };

    let mut positions = shape_key.to_vec();
    let reset_vertices: Vec<VertexId> = moving[..reset_len]
        .iter()
        .map(|&(i, _)| {
            positions[i] = basis[i];
            VertexId::new(i)
        })
        .collect();

    log::debug!(
        "cleanup ({:?}, amount={}): reset {} of {} moving vertices",
        options.mode,
        options.amount,
        reset_vertices.len(),
        moving.len()
    );

    Ok(CleanupResult {
        positions,
        moving_count: moving.len(),
        remaining_count: moving.len() - reset_vertices.len(),
        displaced_count,
        reset_vertices,
    })
}
