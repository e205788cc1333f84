//! Small-movement cleanup operator.

use crate::algo::cleanup::{
    clean_small_movements, CleanupMode, CleanupOptions, DEFAULT_DISTANCE_THRESHOLD,
    DEFAULT_PERCENTAGE,
};
use crate::error::Result;
use crate::mesh::ShapeKeyMesh;

use super::{basis_and_active, commit_active_positions, Operator, Report, ToolSettings};

/// Reset vertices with minimal movement back to the basis.
///
/// Can be used iteratively: each run recalculates which vertices are still
/// moving and cleans the configured share of those.
#[derive(Debug, Clone)]
pub struct CleanSmallMovements {
    /// How to choose vertices to reset.
    pub mode: CleanupMode,

    /// Percentage of least-moved vertices to reset (percentage mode).
    pub percentage: f64,

    /// Maximum distance to reset (threshold mode).
    pub distance_threshold: f64,
}

impl Default for CleanSmallMovements {
    fn default() -> Self {
        Self {
            mode: CleanupMode::Percentage,
            percentage: DEFAULT_PERCENTAGE,
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
        }
    }
}

impl CleanSmallMovements {
    /// Percentage-mode cleanup.
    pub fn percentage(percentage: f64) -> Self {
        Self {
            mode: CleanupMode::Percentage,
            percentage,
            ..Self::default()
        }
    }

    /// Threshold-mode cleanup.
    pub fn threshold(distance: f64) -> Self {
        Self {
            mode: CleanupMode::Threshold,
            distance_threshold: distance,
            ..Self::default()
        }
    }

    /// Create the operator from session settings.
    pub fn from_settings(settings: &ToolSettings) -> Self {
        Self {
            mode: settings.cleanup_mode,
            percentage: settings.cleanup_percentage,
            distance_threshold: settings.cleanup_threshold,
        }
    }

    fn options(&self) -> CleanupOptions {
        match self.mode {
            CleanupMode::Percentage => CleanupOptions::percentage(self.percentage),
            CleanupMode::Threshold => CleanupOptions::threshold(self.distance_threshold),
        }
    }
}

impl Operator for CleanSmallMovements {
    fn id(&self) -> &'static str {
        "mesh.blend_to_basis_by_distance"
    }

    fn label(&self) -> &'static str {
        "Clean Up Small Movements"
    }

    fn execute(&self, mesh: &mut ShapeKeyMesh) -> Result<Report> {
        let (basis, active) = basis_and_active(mesh)?;
        let result = clean_small_movements(basis, active, &self.options())?;

        if result.displaced_count == 0 {
            return Ok(Report::info("No vertices to clean - all are at basis"));
        }

        let reset = result.reset_count();
        let remaining = result.remaining_count;
        let moving = result.moving_count;
        commit_active_positions(mesh, result.positions)?;

        let message = match self.mode {
            CleanupMode::Percentage => format!(
                "Reset {} vertices ({:?}% of {} moving) - {} still moving",
                reset, self.percentage, moving, remaining
            ),
            CleanupMode::Threshold => format!(
                "Reset {} vertices moving less than {:?} - {} still moving",
                reset, self.distance_threshold, remaining
            ),
        };
        Ok(Report::info(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapeKeyError;
    use crate::mesh::ObjectMode;
    use crate::ops::run;
    use crate::ops::test_util::strip_mesh;
    use nalgebra::Point3;

    /// A point cloud of 1000 vertices, vertex `i` displaced by `(i + 1) mm`.
    fn ramp_mesh() -> ShapeKeyMesh {
        let basis: Vec<_> = (0..1000).map(|i| Point3::new(0.0, i as f64, 0.0)).collect();
        let shape = basis
            .iter()
            .enumerate()
            .map(|(i, p)| Point3::new((i + 1) as f64 * 0.001, p.y, 0.0))
            .collect();
        let mut mesh = ShapeKeyMesh::new(basis, vec![]).unwrap();
        mesh.add_shape_key("Ramp", shape).unwrap();
        mesh
    }

    #[test]
    fn test_iterative_percentage() {
        let mut mesh = ramp_mesh();
        let op = CleanSmallMovements::percentage(10.0);

        let report = run(&op, &mut mesh).unwrap();
        assert_eq!(report.message, "Reset 100 vertices (10.0% of 1000 moving) - 900 still moving");

        let report = run(&op, &mut mesh).unwrap();
        assert_eq!(report.message, "Reset 90 vertices (10.0% of 900 moving) - 810 still moving");
    }

    #[test]
    fn test_threshold() {
        let mut mesh = strip_mesh();
        let report = run(&CleanSmallMovements::threshold(0.3), &mut mesh).unwrap();
        // Vertex 7 is below the moving epsilon but still off the basis.
        assert_eq!(report.message, "Reset 2 vertices moving less than 0.3 - 1 still moving");

        let key = mesh.active_shape_key().unwrap();
        let basis = &mesh.basis().unwrap().positions;
        assert_eq!(key.positions[5], basis[5]);
        assert_eq!(key.positions[7], basis[7]);
        assert_eq!(key.positions[2].z, 0.5);
    }

    #[test]
    fn test_threshold_clears_noise_only_key() {
        let basis = vec![Point3::origin(); 3];
        let mut mesh = ShapeKeyMesh::new(basis.clone(), vec![vec![0, 1, 2]]).unwrap();
        let mut noisy = basis.clone();
        noisy[0].x = 5e-7;
        mesh.add_shape_key("Noise", noisy).unwrap();

        let report = run(&CleanSmallMovements::threshold(0.001), &mut mesh).unwrap();
        assert_eq!(report.message, "Reset 1 vertices moving less than 0.001 - 0 still moving");
        assert_eq!(mesh.active_shape_key().unwrap().positions, basis);

        let report = run(&CleanSmallMovements::threshold(0.001), &mut mesh).unwrap();
        assert_eq!(report.message, "No vertices to clean - all are at basis");
    }

    #[test]
    fn test_percentage_with_only_noise_is_not_reported_clean() {
        let basis = vec![Point3::origin(); 2];
        let mut mesh = ShapeKeyMesh::new(basis.clone(), vec![]).unwrap();
        let mut noisy = basis;
        noisy[1].y = 1e-8;
        mesh.add_shape_key("Noise", noisy).unwrap();

        let report = run(&CleanSmallMovements::percentage(50.0), &mut mesh).unwrap();
        assert_eq!(report.message, "Reset 0 vertices (50.0% of 0 moving) - 0 still moving");
    }

    #[test]
    fn test_nothing_to_clean() {
        let mut mesh = strip_mesh();
        let basis = mesh.basis().unwrap().positions.clone();
        mesh.set_active_shape_key_positions(basis).unwrap();

        let report = run(&CleanSmallMovements::default(), &mut mesh).unwrap();
        assert_eq!(report.message, "No vertices to clean - all are at basis");
    }

    #[test]
    fn test_invalid_percentage_leaves_mesh_untouched() {
        let mut mesh = strip_mesh();
        let before = mesh.active_shape_key().unwrap().positions.clone();

        let err = run(&CleanSmallMovements::percentage(150.0), &mut mesh).unwrap_err();
        assert!(matches!(err, ShapeKeyError::InvalidParameter { .. }));
        assert_eq!(mesh.active_shape_key().unwrap().positions, before);
    }

    #[test]
    fn test_restores_mode() {
        let mut mesh = strip_mesh();
        mesh.set_mode(ObjectMode::Edit);
        run(&CleanSmallMovements::percentage(50.0), &mut mesh).unwrap();
        assert_eq!(mesh.mode(), ObjectMode::Edit);
    }

    #[test]
    fn test_from_settings() {
        let settings = ToolSettings::default().with_cleanup_threshold(0.02);
        let op = CleanSmallMovements::from_settings(&settings);
        assert_eq!(op.mode, CleanupMode::Threshold);
        assert_eq!(op.distance_threshold, 0.02);
        assert_eq!(op.percentage, 10.0);
    }
}
