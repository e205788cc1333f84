//! Error types for shapekey.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ShapeKeyError`].
pub type Result<T> = std::result::Result<T, ShapeKeyError>;

/// Errors that can occur during shape-key operations.
#[derive(Error, Debug)]
pub enum ShapeKeyError {
    /// Two per-vertex sequences that must be index-aligned have different lengths.
    #[error("shape mismatch: expected {expected} vertices, found {found}")]
    ShapeMismatch {
        /// Length of the reference sequence (usually the basis).
        expected: usize,
        /// Length of the offending sequence.
        found: usize,
    },

    /// The mesh carries no shape keys at all.
    #[error("mesh has no shape keys")]
    NoShapeKeys,

    /// The active shape key is the basis, so there is nothing to compare against.
    #[error("active shape key is the basis; select a shape key (not Basis)")]
    ActiveIsBasis,

    /// A shape key index does not exist.
    #[error("shape key index {index} out of range ({count} shape keys)")]
    ShapeKeyIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of shape keys on the mesh, basis included.
        count: usize,
    },

    /// The mesh has no vertex groups.
    #[error("mesh has no vertex groups")]
    NoVertexGroups,

    /// A named vertex group does not exist.
    #[error("vertex group '{name}' not found")]
    VertexGroupNotFound {
        /// The requested group name.
        name: String,
    },

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl ShapeKeyError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        ShapeKeyError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Check that two per-vertex sequences have the same length.
    pub(crate) fn check_aligned(expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(ShapeKeyError::ShapeMismatch { expected, found })
        }
    }
}
