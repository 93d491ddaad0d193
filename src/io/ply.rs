//! PLY (Stanford polygon) format support.
//!
//! Surfaces are read with `ply-rs`. Vertex data is written as ASCII PLY with
//! an extra `value` property so that the surface and the scalar field travel
//! together and can be opened directly in common viewers.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{DVector, Point3};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Load a surface from a PLY file.
///
/// Polygons with more than three corners are fan-triangulated.
///
/// # Example
///
/// ```no_run
/// use surflap::io::ply;
///
/// let mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut points: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let x = get_float_property(vertex, "x").ok_or_else(|| load_error("vertex missing x coordinate"))?;
        let y = get_float_property(vertex, "y").ok_or_else(|| load_error("vertex missing y coordinate"))?;
        let z = get_float_property(vertex, "z").ok_or_else(|| load_error("vertex missing z coordinate"))?;
        points.push(Point3::new(x, y, z));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;

        if indices.len() >= 3 {
            for i in 1..indices.len() - 1 {
                triangles.push([indices[0], indices[i], indices[i + 1]]);
            }
        }
    }

    if triangles.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    TriMesh::new(points, triangles)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save `mesh` as ASCII PLY with one `double value` per vertex.
///
/// The caller checks that `values` has one entry per vertex.
pub(crate) fn save_with_values(path: &Path, mesh: &TriMesh, values: &DVector<f64>) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by surflap")?;
    writeln!(writer, "element vertex {}", mesh.num_vertices())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "property double value")?;
    writeln!(writer, "element face {}", mesh.num_triangles())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for (p, value) in mesh.points().iter().zip(values.iter()) {
        writeln!(writer, "{} {} {} {}", p.x, p.y, p.z, value)?;
    }

    for t in mesh.triangles() {
        writeln!(writer, "3 {} {} {}", t[0], t[1], t[2])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save_vertex_data;
    use crate::io::tests::temp_path;
    use crate::mesh::primitives::flat_grid;

    #[test]
    fn test_vertex_data_round_trip() {
        let mesh = flat_grid(2, 0.5);
        let n = mesh.num_vertices();
        let values = DVector::from_iterator(n, (0..n).map(|v| v as f64 * 0.1));
        let path = temp_path("values.ply");

        save_vertex_data(&path, &mesh, &values).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.points(), mesh.points());
        assert_eq!(loaded.triangles(), mesh.triangles());

        // The value property is readable with the same parser
        let mut reader = BufReader::new(File::open(&path).unwrap());
        let ply = Parser::<DefaultElement>::new().read_ply(&mut reader).unwrap();
        let read: Vec<f64> = ply
            .payload
            .get("vertex")
            .unwrap()
            .iter()
            .map(|v| get_float_property(v, "value").unwrap())
            .collect();
        assert_eq!(read, values.iter().copied().collect::<Vec<_>>());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_polygons_are_fan_triangulated() {
        let path = temp_path("pentagon.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 5\nproperty float x\nproperty float y\n\
             property float z\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n\
             0 0 0\n1 0 0\n1.5 1 0\n0.5 1.5 0\n-0.5 1 0\n5 0 1 2 3 4\n",
        )
        .unwrap();

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.triangles(), &[[0, 1, 2], [0, 2, 3], [0, 3, 4]]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_faces_fails() {
        let path = temp_path("no_faces.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\n\
             property float z\nend_header\n0 0 0\n",
        )
        .unwrap();

        assert!(matches!(load(&path), Err(MeshError::LoadError { .. })));
        std::fs::remove_file(&path).ok();
    }
}
