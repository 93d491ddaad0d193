//! Vertex to triangle incidence.

use super::trimesh::TriMesh;

/// Triangles incident to every vertex, stored in CSR form.
///
/// Built once per mesh and then only read, so it can be shared by any
/// number of workers. Triangle ids of a vertex are in ascending order.
#[derive(Debug, Clone)]
pub struct VertexTriangles {
    offsets: Vec<usize>,
    triangles: Vec<usize>,
}

impl VertexTriangles {
    /// Build the incidence table of `mesh`.
    ///
    /// A vertex listed several times in one triangle gets that triangle once.
    pub fn new(mesh: &TriMesh) -> Self {
        let n = mesh.num_vertices();
        let mut offsets = vec![0usize; n + 1];

        for tri in mesh.triangles() {
            for (k, &v) in tri.iter().enumerate() {
                if !tri[..k].contains(&v) {
                    offsets[v + 1] += 1;
                }
            }
        }
        for v in 0..n {
            offsets[v + 1] += offsets[v];
        }

        let mut cursor = offsets.clone();
        let mut triangles = vec![0usize; offsets[n]];
        for (t, tri) in mesh.triangles().iter().enumerate() {
            for (k, &v) in tri.iter().enumerate() {
                if !tri[..k].contains(&v) {
                    triangles[cursor[v]] = t;
                    cursor[v] += 1;
                }
            }
        }

        Self { offsets, triangles }
    }

    /// Triangles touching vertex `v`. Empty if `v` is not a vertex.
    #[inline]
    pub fn of(&self, v: usize) -> &[usize] {
        if v < self.num_vertices() {
            &self.triangles[self.offsets[v]..self.offsets[v + 1]]
        } else {
            &[]
        }
    }

    /// Number of triangles touching vertex `v`.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.of(v).len()
    }

    /// Number of vertices covered.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.offsets.len() - 1
    }
}
