//! Error types for surflap.
//!
//! Every fallible operation in the crate returns [`Result`], and every failure
//! is one of the [`MeshError`] variants. Geometric failures are detected close
//! to where they happen and are never retried: the computations are
//! deterministic, so running them again on the same mesh cannot succeed.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building meshes and operators.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// A triangle references an invalid vertex index.
    #[error("triangle {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The triangle index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A triangle edge has a non-positive length (coincident vertices).
    #[error("triangle {triangle} is degenerate: edge {edge} has length {length}")]
    DegenerateGeometry {
        /// The triangle index.
        triangle: usize,
        /// Canonical edge slot (0: v1-v0, 1: v2-v0, 2: v2-v1).
        edge: usize,
        /// The offending length.
        length: f64,
    },

    /// Work could not be split into the requested number of chunks.
    #[error("cannot distribute {objects} objects into {groups} groups")]
    InvalidPartition {
        /// Number of objects to distribute.
        objects: usize,
        /// Requested number of groups.
        groups: usize,
    },

    /// A vertex received a zero (or no) area from one of its triangles.
    #[error("vertex {vertex} has area {area} in triangle {triangle} (degenerate or non-manifold mesh)")]
    ZeroArea {
        /// The vertex index.
        vertex: usize,
        /// The triangle index.
        triangle: usize,
        /// The stored area, 0 when the entry is missing.
        area: f64,
    },

    /// The requested mass matrix kind does not exist.
    #[error("unknown mass matrix type '{name}', choose one of: {}", .supported.join(", "))]
    UnknownStrategy {
        /// The requested name.
        name: String,
        /// Names that are accepted.
        supported: Vec<&'static str>,
    },

    /// The requested test function does not exist.
    #[error("unknown function '{name}', choose one of: {}", .supported.join(", "))]
    UnknownFunction {
        /// The requested name.
        name: String,
        /// Names that are accepted.
        supported: Vec<&'static str>,
    },

    /// The mass matrix cannot be inverted.
    #[error("mass matrix is singular at vertex {vertex}")]
    SingularMassMatrix {
        /// First vertex with a non-positive mass.
        vertex: usize,
    },

    /// Operand dimensions disagree.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// The expected dimension, formatted.
        expected: String,
        /// The dimension that was found, formatted.
        found: String,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

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

    /// Error saving data to file.
    #[error("failed to save {path}: {message}")]
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

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a dimension mismatch error from two displayable shapes.
    pub fn dimension_mismatch<E: std::fmt::Debug, F: std::fmt::Debug>(expected: E, found: F) -> Self {
        MeshError::DimensionMismatch {
            expected: format!("{:?}", expected),
            found: format!("{:?}", found),
        }
    }
}
