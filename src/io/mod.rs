//! Mesh file I/O.
//!
//! This module provides functions for loading and saving shape-key meshes.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | PLY | `.ply` | ✓ | ✓ | Extra scalar vertex properties are vertex groups |
//! | glTF | `.gltf`, `.glb` | ✓ | ✗ | Morph targets are shape keys |
//!
//! Formats that do not carry shape keys can still contribute them: load the
//! basis mesh with [`load`], then add each deformed copy of the same mesh with
//! [`load_positions`] and [`ShapeKeyMesh::add_shape_key`].
//!
//! # Usage
//!
//! ```no_run
//! use shapekey::io::{load, load_positions, save};
//!
//! let mut mesh = load("neutral.ply").unwrap();
//! mesh.add_shape_key("Smile", load_positions("smile.ply").unwrap()).unwrap();
//!
//! // Writes the active shape key.
//! save(&mesh, "smile-clean.ply").unwrap();
//! ```

pub mod gltf;
pub mod ply;

use std::path::Path;

use nalgebra::Point3;

use crate::error::{Result, ShapeKeyError};
use crate::mesh::ShapeKeyMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PLY (Stanford polygon) format.
    Ply,
    /// glTF format.
    Gltf,
    /// glTF binary format.
    Glb,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "ply" => Some(Format::Ply),
            "gltf" => Some(Format::Gltf),
            "glb" => Some(Format::Glb),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| ShapeKeyError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ShapeKeyMesh> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::load(path),
        Format::Gltf | Format::Glb => gltf::load(path),
    }
}

/// Load only the vertex positions of a mesh file, for use as a shape key.
pub fn load_positions<P: AsRef<Path>>(path: P) -> Result<Vec<Point3<f64>>> {
    Ok(load(path)?.positions().to_vec())
}

/// Save a mesh to a file with automatic format detection.
///
/// The active shape key's coordinates are written.
pub fn save<P: AsRef<Path>>(mesh: &ShapeKeyMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::save(mesh, path),
        Format::Gltf | Format::Glb => Err(ShapeKeyError::SaveError {
            path: path.to_path_buf(),
            message: "glTF saving is not yet supported".to_string(),
        }),
    }
}
