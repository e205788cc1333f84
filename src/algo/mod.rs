//! Shape-key analysis and editing algorithms.
//!
//! This module contains the pure engine behind the shape-key tools:
//!
//! - **Displacement**: per-vertex basis-to-shape-key vectors and magnitudes
//! - **Selection**: vertices and faces moved by a shape key
//! - **Blending**: vertex-group weighted interpolation toward the basis
//! - **Cleanup**: percentage or threshold reset of small movements
//!
//! Everything here works on plain coordinate slices and returns new data;
//! writing results back into a mesh is the job of [`crate::ops`].

pub mod blend;
pub mod cleanup;
pub mod displacement;
pub mod select;

pub use blend::{blend_from_vertex_group, BlendOptions};
pub use cleanup::{clean_small_movements, CleanupMode, CleanupOptions, CleanupResult};
pub use displacement::{compute_displacements, Displacement, DisplacementStats, DEFAULT_EPSILON};
pub use select::{select_affected_faces, select_affected_vertices};
