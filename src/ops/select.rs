//! Selection operators.

use crate::algo::displacement::compute_displacements;
use crate::algo::select::{select_affected_faces, select_affected_vertices};
use crate::error::Result;
use crate::mesh::{ObjectMode, SelectMode, ShapeKeyMesh};

use super::{basis_and_active, validate_threshold, Operator, Report, ToolSettings};
use super::settings::DEFAULT_SELECT_THRESHOLD;

/// Select all vertices moved by the active shape key.
///
/// Replaces the vertex selection, then leaves the mesh in edit mode with
/// vertex selection.
#[derive(Debug, Clone)]
pub struct SelectAffectedVertices {
    /// Minimum distance a vertex must move to be selected.
    pub threshold: f64,
}

impl Default for SelectAffectedVertices {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SELECT_THRESHOLD,
        }
    }
}

impl SelectAffectedVertices {
    /// Create the operator from session settings.
    pub fn from_settings(settings: &ToolSettings) -> Self {
        Self {
            threshold: settings.select_threshold,
        }
    }
}

impl Operator for SelectAffectedVertices {
    fn id(&self) -> &'static str {
        "mesh.select_shapekey_vertices"
    }

    fn label(&self) -> &'static str {
        "Select Affected Vertices"
    }

    fn execute(&self, mesh: &mut ShapeKeyMesh) -> Result<Report> {
        validate_threshold("threshold", self.threshold)?;
        let (basis, active) = basis_and_active(mesh)?;
        let displacements = compute_displacements(basis, active)?;
        let selected = select_affected_vertices(&displacements, self.threshold);

        mesh.select_vertices(&selected);
        mesh.set_mode(ObjectMode::Edit);
        mesh.set_select_mode(SelectMode::Vertex);

        Ok(Report::info(format!(
            "Selected {} affected vertices",
            selected.len()
        )))
    }
}

/// Select all faces with at least one vertex moved by the active shape key.
///
/// Replaces the face selection, then leaves the mesh in edit mode with face
/// selection.
#[derive(Debug, Clone)]
pub struct SelectAffectedFaces {
    /// Minimum distance a vertex must move to affect its faces.
    pub threshold: f64,
}

impl Default for SelectAffectedFaces {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SELECT_THRESHOLD,
        }
    }
}

impl SelectAffectedFaces {
    /// Create the operator from session settings.
    pub fn from_settings(settings: &ToolSettings) -> Self {
        Self {
            threshold: settings.select_threshold,
        }
    }
}

impl Operator for SelectAffectedFaces {
    fn id(&self) -> &'static str {
        "mesh.select_shapekey_faces"
    }

    fn label(&self) -> &'static str {
        "Select Affected Faces"
    }

    fn execute(&self, mesh: &mut ShapeKeyMesh) -> Result<Report> {
        validate_threshold("threshold", self.threshold)?;
        let (basis, active) = basis_and_active(mesh)?;
        let displacements = compute_displacements(basis, active)?;
        let affected = select_affected_vertices(&displacements, self.threshold);
        let faces = select_affected_faces(&affected, mesh.faces());

        mesh.select_faces(&faces);
        mesh.set_mode(ObjectMode::Edit);
        mesh.set_select_mode(SelectMode::Face);

        Ok(Report::info(format!("Selected {} affected faces", faces.len())))
    }
}
