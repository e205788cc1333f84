//! Vertex-group blend operator.

use crate::algo::blend::{blend_from_vertex_group, vertex_group_weights, BlendOptions};
use crate::error::{Result, ShapeKeyError};
use crate::mesh::ShapeKeyMesh;

use super::{
    basis_and_active, commit_active_positions, require_active_shape_key, Operator, Report,
    ToolSettings,
};

/// Scale the active shape key's influence per vertex by a vertex group.
///
/// Vertices outside the group are treated as weight 0 and return to the
/// basis (or keep the full shape key when inverted).
#[derive(Debug, Clone)]
pub struct BlendFromVertexGroup {
    /// Name of the vertex group supplying the weights.
    pub vertex_group: String,

    /// Use `1 - weight` instead of `weight`.
    pub invert: bool,

    /// Whether to use parallel execution.
    pub parallel: bool,
}

impl BlendFromVertexGroup {
    /// Create the operator for a named group.
    pub fn new(vertex_group: impl Into<String>) -> Self {
        Self {
            vertex_group: vertex_group.into(),
            invert: false,
            parallel: true,
        }
    }

    /// Create the operator from session settings.
    pub fn from_settings(settings: &ToolSettings) -> Self {
        Self {
            vertex_group: settings.vertex_group.clone(),
            invert: settings.invert,
            parallel: settings.parallel,
        }
    }

    /// Set whether the group influence is inverted.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}

impl Operator for BlendFromVertexGroup {
    fn id(&self) -> &'static str {
        "mesh.blend_shapekey_from_vgroup"
    }

    fn label(&self) -> &'static str {
        "Blend from Vertex Group"
    }

    fn poll(&self, mesh: &ShapeKeyMesh) -> Result<()> {
        require_active_shape_key(mesh)?;
        if mesh.vertex_groups().is_empty() {
            return Err(ShapeKeyError::NoVertexGroups);
        }
        Ok(())
    }

    fn execute(&self, mesh: &mut ShapeKeyMesh) -> Result<Report> {
        let group = mesh.vertex_group(&self.vertex_group).ok_or_else(|| {
            ShapeKeyError::VertexGroupNotFound {
                name: self.vertex_group.clone(),
            }
        })?;
        let group_is_empty = group.is_empty();
        let weights = vertex_group_weights(group, mesh.num_vertices());

        let (basis, active) = basis_and_active(mesh)?;
        let options = BlendOptions::default()
            .with_invert(self.invert)
            .with_parallel(self.parallel);
        let blended = blend_from_vertex_group(basis, active, &weights, &options)?;

        let key_name = mesh
            .active_shape_key()
            .map(|k| k.name.clone())
            .unwrap_or_default();
        commit_active_positions(mesh, blended)?;

        let message = format!(
            "Blended shape key '{}' using vertex group '{}'",
            key_name, self.vertex_group
        );
        if group_is_empty {
            Ok(Report::warning(format!(
                "{} (group has no assigned vertices)",
                message
            )))
        } else {
            Ok(Report::info(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{ObjectMode, VertexGroup, VertexId};
    use crate::ops::test_util::strip_mesh;
    use crate::ops::{run, ReportLevel};

    fn mesh_with_group() -> ShapeKeyMesh {
        let mut mesh = strip_mesh();
        let mut group = VertexGroup::new("Left");
        group.assign(VertexId::new(5), 1.0);
        group.assign(VertexId::new(2), 0.5);
        mesh.add_vertex_group(group);
        mesh
    }

    #[test]
    fn test_blend() {
        let mut mesh = mesh_with_group();
        let before = mesh.active_shape_key().unwrap().positions.clone();

        let report = run(&BlendFromVertexGroup::new("Left"), &mut mesh).unwrap();
        assert_eq!(report.message, "Blended shape key 'Lift' using vertex group 'Left'");

        let after = &mesh.active_shape_key().unwrap().positions;
        assert_eq!(after[5], before[5]);
        assert_eq!(after[2].z, 0.25);
        // Vertex 7 is not in the group and goes back to the basis.
        assert_eq!(after[7], mesh.basis().unwrap().positions[7]);
    }

    #[test]
    fn test_blend_inverted() {
        let mut mesh = mesh_with_group();
        let before = mesh.active_shape_key().unwrap().positions.clone();

        run(&BlendFromVertexGroup::new("Left").with_invert(true), &mut mesh).unwrap();

        let after = &mesh.active_shape_key().unwrap().positions;
        assert_eq!(after[5], mesh.basis().unwrap().positions[5]);
        assert_eq!(after[2].z, 0.25);
        assert_eq!(after[7], before[7]);
    }

    #[test]
    fn test_blend_restores_mode() {
        let mut mesh = mesh_with_group();
        mesh.set_mode(ObjectMode::Edit);
        run(&BlendFromVertexGroup::new("Left"), &mut mesh).unwrap();
        assert_eq!(mesh.mode(), ObjectMode::Edit);
    }

    #[test]
    fn test_poll_requires_groups() {
        let mut mesh = strip_mesh();
        assert!(matches!(
            run(&BlendFromVertexGroup::new("Left"), &mut mesh),
            Err(ShapeKeyError::NoVertexGroups)
        ));
    }

    #[test]
    fn test_missing_group_leaves_mesh_untouched() {
        let mut mesh = mesh_with_group();
        let before = mesh.active_shape_key().unwrap().positions.clone();

        let err = run(&BlendFromVertexGroup::new("Right"), &mut mesh).unwrap_err();
        assert_eq!(err.to_string(), "vertex group 'Right' not found");
        assert_eq!(mesh.active_shape_key().unwrap().positions, before);
    }

    #[test]
    fn test_empty_group_warns() {
        let mut mesh = strip_mesh();
        mesh.add_vertex_group(VertexGroup::new("Empty"));
        let report = run(&BlendFromVertexGroup::new("Empty"), &mut mesh).unwrap();
        assert_eq!(report.level, ReportLevel::Warning);
        assert_eq!(
            mesh.active_shape_key().unwrap().positions,
            mesh.basis().unwrap().positions
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = ToolSettings::default()
            .with_vertex_group("Left")
            .with_invert(true)
            .with_parallel(false);
        let op = BlendFromVertexGroup::from_settings(&settings);
        assert_eq!(op.vertex_group, "Left");
        assert!(op.invert);
        assert!(!op.parallel);
    }
}
