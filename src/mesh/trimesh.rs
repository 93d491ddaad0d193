//! Indexed triangle mesh.

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};

/// An immutable triangle mesh stored as a point list and a triangle list.
///
/// The index of a point is its vertex id, the index of a triangle is its
/// triangle id. Triangle corners keep the order they were given in, which
/// downstream code relies on.
#[derive(Debug, Clone)]
pub struct TriMesh {
    pub(super) points: Vec<Point3<f64>>,
    pub(super) triangles: Vec<[usize; 3]>,
}

impl TriMesh {
    /// Build a mesh from points and triangles.
    ///
    /// Fails if there are no triangles or if a triangle references a vertex
    /// that does not exist. Geometry is not inspected here.
    ///
    /// # Example
    /// ```
    /// use surflap::mesh::TriMesh;
    /// use nalgebra::Point3;
    ///
    /// let points = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh = TriMesh::new(points, vec![[0, 1, 2]]).unwrap();
    /// assert_eq!(mesh.num_vertices(), 3);
    /// assert_eq!(mesh.num_triangles(), 1);
    /// ```
    pub fn new(points: Vec<Point3<f64>>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        if triangles.is_empty() {
            return Err(MeshError::EmptyMesh);
        }

        for (fi, tri) in triangles.iter().enumerate() {
            for &vi in tri {
                if vi >= points.len() {
                    return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
                }
            }
        }

        Ok(Self { points, triangles })
    }

    /// Vertex positions, indexed by vertex id.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Triangles as vertex id triples, indexed by triangle id.
    #[inline]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Corner positions of triangle `t`, in stored order.
    #[inline]
    pub fn triangle_positions(&self, t: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.triangles[t];
        [self.points[a], self.points[b], self.points[c]]
    }

    /// Unnormalized normal of triangle `t` (length is twice the area).
    pub fn triangle_normal(&self, t: usize) -> Vector3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Area of triangle `t`.
    pub fn triangle_area(&self, t: usize) -> f64 {
        0.5 * self.triangle_normal(t).norm()
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        (0..self.num_triangles()).map(|t| self.triangle_area(t)).sum()
    }

    /// Mean length of the triangle edges.
    ///
    /// Interior edges are counted once per incident triangle.
    pub fn average_edge_length(&self) -> f64 {
        let total: f64 = (0..self.num_triangles())
            .map(|t| {
                let [p0, p1, p2] = self.triangle_positions(t);
                (p1 - p0).norm() + (p2 - p0).norm() + (p2 - p1).norm()
            })
            .sum();
        total / (3 * self.num_triangles()) as f64
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }

    /// Number of triangles with an interior angle above 90 degrees.
    ///
    /// Right angles do not count.
    pub fn obtuse_triangles(&self) -> usize {
        (0..self.num_triangles())
            .filter(|&t| {
                let p = self.triangle_positions(t);
                (0..3).any(|i| {
                    let a = p[(i + 1) % 3] - p[i];
                    let b = p[(i + 2) % 3] - p[i];
                    a.dot(&b) < 0.0
                })
            })
            .count()
    }

    /// Vertices that no triangle references.
    pub fn unreferenced_vertices(&self) -> Vec<usize> {
        let mut used = vec![false; self.num_vertices()];
        for tri in &self.triangles {
            for &v in tri {
                used[v] = true;
            }
        }
        used.iter()
            .enumerate()
            .filter_map(|(v, &u)| (!u).then_some(v))
            .collect()
    }
}
