//! Wavefront OBJ format support.
//!
//! Faces are triangulated on load and every object in the file is merged
//! into a single surface. Normals, texture coordinates and materials are
//! ignored.

use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Load a surface from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use surflap::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();

    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut points: Vec<Point3<f64>> = Vec::new();
    let mut triangles: Vec<[usize; 3]> = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let offset = points.len();

        points.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        );
        triangles.extend(mesh.indices.chunks_exact(3).map(|t| {
            [
                offset + t[0] as usize,
                offset + t[1] as usize,
                offset + t[2] as usize,
            ]
        }));
    }

    if triangles.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ file contains no faces".to_string(),
        });
    }

    TriMesh::new(points, triangles)
}
