//! Surface and per-vertex data I/O.
//!
//! # Surfaces
//!
//! | Format | Extension | Notes |
//! |--------|-----------|-------|
//! | Wavefront OBJ | `.obj` | Polygons are triangulated, all objects merged |
//! | STL | `.stl` | Binary and ASCII, vertices welded by position |
//! | PLY | `.ply` | Stanford polygon format, polygons fan-triangulated |
//!
//! # Vertex data
//!
//! [`save_vertex_data`] writes one scalar per vertex:
//!
//! | Extension | Contents |
//! |-----------|----------|
//! | `.ply` | ASCII PLY of the surface with a `double value` vertex property |
//! | `.txt`, `.csv` | One value per line, in vertex order |
//!
//! ```no_run
//! use surflap::algo::mass::{mass_matrix, MassMatrixOptions};
//! use surflap::io::{load, save_vertex_data};
//!
//! let mesh = load("brain.obj").unwrap();
//! let mass = mass_matrix(&mesh, &MassMatrixOptions::default()).unwrap();
//! save_vertex_data("areas.ply", &mesh, mass.diagonal()).unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::DVector;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Supported surface file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
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

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("(none)")
        .to_lowercase()
}

/// Load a surface, choosing the reader from the file extension.
///
/// # Errors
///
/// [`MeshError::UnsupportedFormat`] for unknown extensions, and the reader's
/// errors otherwise.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: extension_of(path),
    })?;

    let mesh = match format {
        Format::Obj => obj::load(path)?,
        Format::Stl => stl::load(path)?,
        Format::Ply => ply::load(path)?,
    };

    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

/// Save one value per vertex of `mesh`, choosing the layout from the file
/// extension (see the [module docs](self)).
///
/// # Errors
///
/// [`MeshError::DimensionMismatch`] if `values` does not have one entry per
/// vertex, [`MeshError::UnsupportedFormat`] for unknown extensions.
pub fn save_vertex_data<P: AsRef<Path>>(path: P, mesh: &TriMesh, values: &DVector<f64>) -> Result<()> {
    let path = path.as_ref();
    if values.len() != mesh.num_vertices() {
        return Err(MeshError::dimension_mismatch(mesh.num_vertices(), values.len()));
    }

    match extension_of(path).as_str() {
        "ply" => ply::save_with_values(path, mesh, values)?,
        "txt" | "csv" => save_values(path, values)?,
        other => {
            return Err(MeshError::UnsupportedFormat {
                extension: other.to_string(),
            })
        }
    }

    log::info!("Saved {} values to {}", values.len(), path.display());
    Ok(())
}

fn save_values(path: &Path, values: &DVector<f64>) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for v in values.iter() {
        writeln!(writer, "{}", v)?;
    }
    writer.flush()?;
    Ok(())
}
