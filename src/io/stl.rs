//! STL (stereolithography) format support.
//!
//! STL stores every triangle with its own copy of the corner positions. The
//! reader welds corners with bit-identical coordinates back into shared
//! vertices, which is what the mass matrix and Laplacians need to see a
//! connected surface.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Load a surface from an STL file.
///
/// Automatically detects binary vs ASCII format. Triangles that collapse to
/// a segment or point after welding are dropped with a warning.
///
/// # Example
///
/// ```no_run
/// use surflap::io::stl;
///
/// let mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut welded: HashMap<[u32; 3], usize> = HashMap::with_capacity(stl.vertices.len());
    let mut points: Vec<Point3<f64>> = Vec::with_capacity(stl.vertices.len());
    let mut remap: Vec<usize> = Vec::with_capacity(stl.vertices.len());

    for vtx in &stl.vertices {
        let key = [vtx[0].to_bits(), vtx[1].to_bits(), vtx[2].to_bits()];
        let index = *welded.entry(key).or_insert_with(|| {
            points.push(Point3::new(vtx[0] as f64, vtx[1] as f64, vtx[2] as f64));
            points.len() - 1
        });
        remap.push(index);
    }

    let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(stl.faces.len());
    let mut dropped = 0usize;
    for face in &stl.faces {
        let [i0, i1, i2] = face.vertices.map(|v| remap[v]);
        if i0 != i1 && i1 != i2 && i0 != i2 {
            triangles.push([i0, i1, i2]);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        log::warn!("{}: dropped {} collapsed triangles", path.display(), dropped);
    }

    if triangles.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    TriMesh::new(points, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::tests::temp_path;
    use approx::assert_relative_eq;
    use std::io::BufWriter;

    fn triangle(p: [[f32; 3]; 3]) -> stl_io::Triangle {
        stl_io::Triangle {
            normal: stl_io::Normal::new([0.0, 0.0, 1.0]),
            vertices: [
                stl_io::Vertex::new(p[0]),
                stl_io::Vertex::new(p[1]),
                stl_io::Vertex::new(p[2]),
            ],
        }
    }

    fn write(path: &Path, triangles: &[stl_io::Triangle]) {
        let mut writer = BufWriter::new(File::create(path).unwrap());
        stl_io::write_stl(&mut writer, triangles.iter()).unwrap();
    }

    #[test]
    fn test_shared_corners_are_welded() {
        let path = temp_path("square.stl");
        write(
            &path,
            &[
                triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]),
                triangle([[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]),
            ],
        );

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_triangles(), 2);
        assert!(mesh.unreferenced_vertices().is_empty());
        assert_relative_eq!(mesh.surface_area(), 1.0, epsilon = 1e-6);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_collapsed_triangles_are_dropped() {
        let path = temp_path("collapsed.stl");
        write(
            &path,
            &[
                triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
                triangle([[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            ],
        );

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.num_triangles(), 1);

        std::fs::remove_file(&path).ok();
    }
}
