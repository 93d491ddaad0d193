//! Per-triangle edge vectors and lengths.
//!
//! Edges are computed once per mesh in a fixed canonical order:
//!
//! | Slot | Edge |
//! |------|------|
//! | 0 | `v1 - v0` |
//! | 1 | `v2 - v0` |
//! | 2 | `v2 - v1` |
//!
//! where `v0, v1, v2` are the triangle's corners in stored order. Code that
//! looks edges up by slot (see [`EDGE_SLOTS`]) depends on this order.

use nalgebra::Vector3;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Canonical edge slots around each corner, as `[near_a, near_b, far]`.
///
/// Row `c` lists, for the corner at local position `c`, the two slots of
/// the edges that touch it followed by the slot of the opposite edge.
pub const EDGE_SLOTS: [[usize; 3]; 3] = [
    // corner 0: v1-v0, v2-v0 | opposite v2-v1
    [0, 1, 2],
    // corner 1: v1-v0, v2-v1 | opposite v2-v0
    [0, 2, 1],
    // corner 2: v2-v0, v2-v1 | opposite v1-v0
    [1, 2, 0],
];

/// The three edges of one triangle, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleEdges {
    /// Edge vectors.
    pub vectors: [Vector3<f64>; 3],
    /// Euclidean edge lengths.
    pub lengths: [f64; 3],
}

impl TriangleEdges {
    /// Squared length of the edge in `slot`, taken from the vector so that
    /// axis-aligned edges stay exact.
    #[inline]
    pub fn squared_length(&self, slot: usize) -> f64 {
        self.vectors[slot].norm_squared()
    }

    /// Area of the triangle, from the cross product of its first two edges.
    #[inline]
    pub fn area(&self) -> f64 {
        0.5 * self.vectors[0].cross(&self.vectors[1]).norm()
    }
}

/// Edge data of every triangle of a mesh, indexed by triangle id.
#[derive(Debug, Clone)]
pub struct EdgeGeometry {
    triangles: Vec<TriangleEdges>,
}

impl EdgeGeometry {
    /// Compute the edges of every triangle of `mesh`.
    ///
    /// # Errors
    ///
    /// [`MeshError::DegenerateGeometry`] for the first edge whose length is
    /// not strictly positive (coincident or repeated corners, or non-finite
    /// coordinates).
    pub fn new(mesh: &TriMesh) -> Result<Self> {
        let triangles = (0..mesh.num_triangles())
            .map(|t| {
                let [p0, p1, p2] = mesh.triangle_positions(t);
                let vectors = [p1 - p0, p2 - p0, p2 - p1];
                let lengths = [vectors[0].norm(), vectors[1].norm(), vectors[2].norm()];

                for (edge, &length) in lengths.iter().enumerate() {
                    // Negated so NaN is rejected too
                    if !(length > 0.0) {
                        return Err(MeshError::DegenerateGeometry {
                            triangle: t,
                            edge,
                            length,
                        });
                    }
                }

                Ok(TriangleEdges { vectors, lengths })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { triangles })
    }

    /// Edges of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> &TriangleEdges {
        &self.triangles[t]
    }

    /// Number of triangles covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Check if there are no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_canonical_order() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ];
        let mesh = TriMesh::new(points, vec![[0, 1, 2]]).unwrap();
        let edges = EdgeGeometry::new(&mesh).unwrap();
        let tri = edges.triangle(0);

        assert_eq!(tri.vectors[0], Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(tri.vectors[1], Vector3::new(0.0, 4.0, 0.0));
        assert_eq!(tri.vectors[2], Vector3::new(-3.0, 4.0, 0.0));
        assert_eq!(tri.lengths, [3.0, 4.0, 5.0]);
        assert_relative_eq!(tri.area(), 6.0);
    }

    #[test]
    fn test_edge_slots_match_corners() {
        // Each row names two edges that touch the corner and one that does not
        let corners_of_slot = [[0, 1], [0, 2], [1, 2]];
        for (corner, slots) in EDGE_SLOTS.iter().enumerate() {
            assert!(corners_of_slot[slots[0]].contains(&corner));
            assert!(corners_of_slot[slots[1]].contains(&corner));
            assert!(!corners_of_slot[slots[2]].contains(&corner));
        }
    }

    #[test]
    fn test_coincident_vertices_rejected() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = TriMesh::new(points, vec![[0, 1, 3], [0, 1, 2]]).unwrap();

        match EdgeGeometry::new(&mesh) {
            Err(MeshError::DegenerateGeometry { triangle, edge, length }) => {
                assert_eq!(triangle, 1);
                assert_eq!(edge, 2);
                assert_eq!(length, 0.0);
            }
            other => panic!("expected DegenerateGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_nan_coordinates_rejected() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(f64::NAN, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = TriMesh::new(points, vec![[0, 1, 2]]).unwrap();
        assert!(matches!(
            EdgeGeometry::new(&mesh),
            Err(MeshError::DegenerateGeometry { triangle: 0, edge: 0, .. })
        ));
    }
}
