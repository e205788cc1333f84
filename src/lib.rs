//! # Shapekey
//!
//! Tools for analysing and cleaning up shape keys (blend shapes, morph targets)
//! on 3D meshes.
//!
//! A shape key is an alternate set of vertex positions on the same topology as
//! its mesh. Every tool here works on the per-vertex *displacement* between the
//! basis and the active shape key.
//!
//! ## Features
//!
//! - **Selection**: select the vertices or faces a shape key actually moves
//! - **Vertex-group blending**: scale a shape key's influence per vertex
//! - **Cleanup**: snap the least-moved vertices back to the basis, by
//!   percentage (repeatable, geometric) or by distance threshold
//! - **File formats**: PLY (with vertex groups) and glTF morph targets
//!
//! ## Quick Start
//!
//! ```
//! use shapekey::prelude::*;
//! use nalgebra::Point3;
//!
//! let basis = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh = ShapeKeyMesh::new(basis.clone(), vec![vec![0, 1, 2, 3]]).unwrap();
//!
//! let mut smile = basis;
//! smile[2].z = 0.2;
//! smile[3].z = 0.0000001; // sculpting noise
//! mesh.add_shape_key("Smile", smile).unwrap();
//!
//! let report = ops::run(&SelectAffectedVertices::default(), &mut mesh).unwrap();
//! assert_eq!(report.message, "Selected 1 affected vertices");
//!
//! let report = ops::run(&CleanSmallMovements::threshold(0.5), &mut mesh).unwrap();
//! assert_eq!(report.message, "Reset 2 vertices moving less than 0.5 - 0 still moving");
//! ```
//!
//! ## Working With Coordinates Directly
//!
//! The engine in [`algo`] takes plain coordinate slices and never touches a
//! mesh:
//!
//! ```
//! use shapekey::algo::cleanup::{clean_small_movements, CleanupOptions};
//! use nalgebra::Point3;
//!
//! let basis = vec![Point3::origin(); 10];
//! let shape: Vec<_> = (0..10).map(|i| Point3::new(0.1 * (i + 1) as f64, 0.0, 0.0)).collect();
//!
//! let result = clean_small_movements(&basis, &shape, &CleanupOptions::percentage(20.0)).unwrap();
//! assert_eq!(result.reset_count(), 2);
//! assert_eq!(result.remaining_count, 8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod ops;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use shapekey::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, ShapeKeyError};
    pub use crate::mesh::{
        FaceId, ObjectMode, SelectMode, ShapeKey, ShapeKeyMesh, VertexGroup, VertexId,
    };
    pub use crate::ops::{
        self, BlendFromVertexGroup, CleanSmallMovements, Operator, Report, SelectAffectedFaces,
        SelectAffectedVertices, ToolSettings,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_full_session() {
        let basis: Vec<_> = (0..20).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        let faces: Vec<Vec<usize>> = (0..19).map(|i| vec![i, i + 1]).collect();
        let mut mesh = ShapeKeyMesh::new(basis.clone(), faces).unwrap();

        let shape: Vec<_> = basis
            .iter()
            .enumerate()
            .map(|(i, p)| Point3::new(p.x, 0.01 * i as f64, 0.0))
            .collect();
        mesh.add_shape_key("Wave", shape).unwrap();
        mesh.add_vertex_group(VertexGroup::from_dense("All", &[1.0; 20]));

        // Vertex 0 has zero displacement.
        let report = ops::run(&SelectAffectedVertices::default(), &mut mesh).unwrap();
        assert_eq!(report.message, "Selected 19 affected vertices");

        // Full weights leave the key as it was.
        let before = mesh.active_shape_key().unwrap().positions.clone();
        ops::run(&BlendFromVertexGroup::new("All"), &mut mesh).unwrap();
        assert_eq!(mesh.active_shape_key().unwrap().positions, before);

        let settings = ToolSettings::default().with_cleanup_percentage(50.0);
        let clean = CleanSmallMovements::from_settings(&settings);
        let report = ops::run(&clean, &mut mesh).unwrap();
        assert_eq!(report.message, "Reset 9 vertices (50.0% of 19 moving) - 10 still moving");

        let report = ops::run(&SelectAffectedFaces::default(), &mut mesh).unwrap();
        // Vertices 10..19 still move; edges 9-10 through 18-19 touch them.
        assert_eq!(report.message, "Selected 10 affected faces");
        assert!(mesh.basis().unwrap().positions == basis);
    }
}
