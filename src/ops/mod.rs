//! User-facing shape-key operators.
//!
//! Each operator wraps one engine function from [`crate::algo`] with the
//! behavior of an interactive editing command:
//!
//! 1. [`Operator::poll`] checks the mesh is in a state the command applies to.
//! 2. [`Operator::execute`] computes the full result first and only then
//!    writes it into the [`ShapeKeyMesh`], so a failure never leaves partial
//!    edits behind.
//! 3. The command answers with a [`Report`] for the status bar.
//!
//! | Operator | Id |
//! |----------|----|
//! | [`SelectAffectedVertices`] | `mesh.select_shapekey_vertices` |
//! | [`SelectAffectedFaces`] | `mesh.select_shapekey_faces` |
//! | [`BlendFromVertexGroup`] | `mesh.blend_shapekey_from_vgroup` |
//! | [`CleanSmallMovements`] | `mesh.blend_to_basis_by_distance` |
//!
//! # Example
//!
//! ```
//! use shapekey::mesh::ShapeKeyMesh;
//! use shapekey::ops::{self, SelectAffectedVertices, ToolSettings};
//! use nalgebra::Point3;
//!
//! let basis = vec![Point3::origin(); 3];
//! let mut mesh = ShapeKeyMesh::new(basis, vec![vec![0, 1, 2]]).unwrap();
//! mesh.add_shape_key("Lift", vec![
//!     Point3::origin(),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::origin(),
//! ]).unwrap();
//!
//! let op = SelectAffectedVertices::from_settings(&ToolSettings::default());
//! let report = ops::run(&op, &mut mesh).unwrap();
//! assert_eq!(report.message, "Selected 1 affected vertices");
//! ```

mod blend;
mod cleanup;
mod select;
mod settings;

use std::fmt;

use nalgebra::Point3;

use crate::error::{Result, ShapeKeyError};
use crate::mesh::{ObjectMode, ShapeKeyMesh};

pub use blend::BlendFromVertexGroup;
pub use cleanup::CleanSmallMovements;
pub use select::{SelectAffectedFaces, SelectAffectedVertices};
pub use settings::{ToolSettings, DEFAULT_SELECT_THRESHOLD};

/// Severity of a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    /// Informational result.
    Info,
    /// Something worth the user's attention that did not stop the command.
    Warning,
}

/// Status message produced by a finished operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Severity.
    pub level: ReportLevel,
    /// Human-readable message.
    pub message: String,
}

impl Report {
    /// An informational report.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ReportLevel::Info,
            message: message.into(),
        }
    }

    /// A warning report.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ReportLevel::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            ReportLevel::Info => write!(f, "{}", self.message),
            ReportLevel::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// An editing command on a [`ShapeKeyMesh`].
pub trait Operator {
    /// Stable identifier.
    fn id(&self) -> &'static str;

    /// Short display label.
    fn label(&self) -> &'static str;

    /// Check whether the operator can run on `mesh`.
    ///
    /// The default requires a shape-key stack whose active key is not the basis.
    fn poll(&self, mesh: &ShapeKeyMesh) -> Result<()> {
        require_active_shape_key(mesh)
    }

    /// Run the operator. Implementations must not modify `mesh` on error.
    fn execute(&self, mesh: &mut ShapeKeyMesh) -> Result<Report>;
}

/// Poll and execute an operator.
pub fn run(op: &dyn Operator, mesh: &mut ShapeKeyMesh) -> Result<Report> {
    if let Err(err) = op.poll(mesh) {
        log::debug!("{} cannot run: {}", op.id(), err);
        return Err(err);
    }

    let report = op.execute(mesh)?;
    log::info!("{}: {}", op.id(), report.message);
    Ok(report)
}

/// Ensure the mesh has shape keys and the active one is not the basis.
pub fn require_active_shape_key(mesh: &ShapeKeyMesh) -> Result<()> {
    if !mesh.has_shape_keys() {
        return Err(ShapeKeyError::NoShapeKeys);
    }
    if mesh.active_shape_key_index() == 0 {
        return Err(ShapeKeyError::ActiveIsBasis);
    }
    Ok(())
}

/// Basis and active shape-key coordinates, after the standard poll checks.
fn basis_and_active(mesh: &ShapeKeyMesh) -> Result<(&[Point3<f64>], &[Point3<f64>])> {
    require_active_shape_key(mesh)?;
    match (mesh.basis(), mesh.active_shape_key()) {
        (Some(basis), Some(active)) => Ok((&basis.positions, &active.positions)),
        _ => Err(ShapeKeyError::NoShapeKeys),
    }
}

/// Write new active shape-key coordinates from object mode, then restore the
/// mode the mesh was in.
fn commit_active_positions(mesh: &mut ShapeKeyMesh, positions: Vec<Point3<f64>>) -> Result<()> {
    let mode = mesh.mode();
    mesh.set_mode(ObjectMode::Object);
    let written = mesh.set_active_shape_key_positions(positions);
    mesh.set_mode(mode);
    written
}

fn validate_threshold(name: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ShapeKeyError::invalid_param(name, value, "must be finite and >= 0"))
    }
}


#[cfg(test)]
mod tests {
    use super::test_util::strip_mesh;
    use super::*;

    #[test]
    fn test_poll_requires_shape_keys() {
        let mesh = ShapeKeyMesh::new(vec![Point3::origin()], vec![]).unwrap();
        let op = SelectAffectedVertices::default();
        assert!(matches!(op.poll(&mesh), Err(ShapeKeyError::NoShapeKeys)));
    }

    #[test]
    fn test_poll_rejects_basis() {
        let mut mesh = strip_mesh();
        mesh.set_active_shape_key_index(0).unwrap();
        let op = SelectAffectedVertices::default();
        assert!(matches!(op.poll(&mesh), Err(ShapeKeyError::ActiveIsBasis)));
        assert!(matches!(
            run(&op, &mut mesh),
            Err(ShapeKeyError::ActiveIsBasis)
        ));
        assert!(mesh.selected_vertices().is_empty());
    }

    #[test]
    fn test_commit_restores_mode() {
        let mut mesh = strip_mesh();
        mesh.set_mode(ObjectMode::Edit);
        let positions = mesh.positions().to_vec();
        commit_active_positions(&mut mesh, positions.clone()).unwrap();
        assert_eq!(mesh.mode(), ObjectMode::Edit);
        assert_eq!(mesh.active_shape_key().unwrap().positions, positions);
    }

    #[test]
    fn test_report_display() {
        assert_eq!(Report::info("done").to_string(), "done");
        assert_eq!(Report::warning("careful").to_string(), "warning: careful");
    }
}
