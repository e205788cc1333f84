//! Core mesh data structures.
//!
//! This module provides the mesh context that shape-key tools read from and
//! write to.
//!
//! # Overview
//!
//! The primary type is [`ShapeKeyMesh`]: vertex positions, polygon faces, a
//! stack of [`ShapeKey`]s whose first entry is the basis, named
//! [`VertexGroup`]s, and edit-mode selection state.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex (shared by the basis and every shape key)
//! - [`FaceId`] - Identifies a face

mod index;
mod shape_key;
mod shape_key_mesh;

pub use index::{FaceId, VertexId};
pub use shape_key::{ShapeKey, VertexGroup};
pub use shape_key_mesh::{ObjectMode, SelectMode, ShapeKeyMesh, BASIS_NAME};
