//! Discrete Laplacians.
//!
//! - [`cotangent_matrix`]: the symmetric cotangent stiffness matrix `L`
//! - [`adjacency_matrix`]: vertex adjacency `A`
//! - [`laplace_beltrami`]: `-M^-1 L` for a chosen mass matrix `M`
//! - [`graph_laplacian`]: `D - A`, the purely combinatorial Laplacian
//!
//! Sign conventions: `L` is negative semi-definite, with positive
//! off-diagonal weights for non-obtuse neighbourhoods. The Laplace-Beltrami
//! operator is negated so that, applied to `f = sin(s y) + cos(s z)` on a flat
//! patch, it returns about `s^2 f`.

use std::collections::HashSet;

use super::mass::{mass_matrix, MassMatrixOptions};
use crate::error::Result;
use crate::mesh::TriMesh;
use crate::sparse::CsrMatrix;

/// Compute the cotangent of the angle at vertex `a` in triangle (a, b, c).
fn cotangent_angle(a: &nalgebra::Point3<f64>, b: &nalgebra::Point3<f64>, c: &nalgebra::Point3<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    let cross_len = ab.cross(&ac).norm();

    // Scale-free degeneracy test
    if cross_len <= f64::EPSILON * ab.norm() * ac.norm() {
        0.0
    } else {
        ab.dot(&ac) / cross_len
    }
}

/// Cotangent matrix of `mesh`.
///
/// For every edge `ij`, `L_ij = 1/2 * sum(cot)` over the angles facing the
/// edge in its one or two triangles; `L_ii = -sum_j L_ij`. Triangles with
/// (near) zero area contribute nothing.
pub fn cotangent_matrix(mesh: &TriMesh) -> CsrMatrix {
    let n = mesh.num_vertices();
    let mut triplets = Vec::with_capacity(mesh.num_triangles() * 12);

    for (t, &[v0, v1, v2]) in mesh.triangles().iter().enumerate() {
        let [p0, p1, p2] = mesh.triangle_positions(t);

        // Each edge is weighted by the angle at the corner across from it
        let cot0 = cotangent_angle(&p0, &p1, &p2);
        let cot1 = cotangent_angle(&p1, &p2, &p0);
        let cot2 = cotangent_angle(&p2, &p0, &p1);

        add_edge(&mut triplets, v1, v2, 0.5 * cot0);
        add_edge(&mut triplets, v2, v0, 0.5 * cot1);
        add_edge(&mut triplets, v0, v1, 0.5 * cot2);
    }

    CsrMatrix::from_triplets(n, n, triplets)
}

/// Add an edge weight: off-diagonal +w, diagonal -w.
fn add_edge(triplets: &mut Vec<(usize, usize, f64)>, i: usize, j: usize, w: f64) {
    triplets.push((i, j, w));
    triplets.push((j, i, w));
    triplets.push((i, i, -w));
    triplets.push((j, j, -w));
}

/// Undirected edges of `mesh` as sorted `(min, max)` pairs.
fn unique_edges(mesh: &TriMesh) -> Vec<(usize, usize)> {
    let mut seen = HashSet::with_capacity(mesh.num_triangles() * 3 / 2);
    for tri in mesh.triangles() {
        for k in 0..3 {
            let (a, b) = (tri[k], tri[(k + 1) % 3]);
            if a != b {
                seen.insert((a.min(b), a.max(b)));
            }
        }
    }
    let mut edges: Vec<_> = seen.into_iter().collect();
    edges.sort_unstable();
    edges
}

/// Symmetric adjacency matrix with a 1 for every mesh edge.
pub fn adjacency_matrix(mesh: &TriMesh) -> CsrMatrix {
    let n = mesh.num_vertices();
    let triplets = unique_edges(mesh)
        .into_iter()
        .flat_map(|(a, b)| [(a, b, 1.0), (b, a, 1.0)])
        .collect();
    CsrMatrix::from_triplets(n, n, triplets)
}

/// Graph Laplacian `D - A`: vertex degree on the diagonal, -1 per edge.
///
/// Rows sum to zero.
pub fn graph_laplacian(mesh: &TriMesh) -> CsrMatrix {
    let n = mesh.num_vertices();
    let adjacency = adjacency_matrix(mesh);
    let degree = adjacency.row_sums();

    let triplets = adjacency
        .iter()
        .map(|(i, j, w)| (i, j, -w))
        .chain((0..n).filter(|&v| degree[v] > 0.0).map(|v| (v, v, degree[v])))
        .collect();
    CsrMatrix::from_triplets(n, n, triplets)
}

/// Laplace-Beltrami operator `-M^-1 L`.
///
/// # Errors
///
/// Any error of [`mass_matrix`], or [`crate::error::MeshError::SingularMassMatrix`]
/// if a vertex has no area (for instance a vertex no triangle uses).
///
/// # Example
///
/// ```
/// use nalgebra::DVector;
/// use surflap::algo::mass::MassMatrixOptions;
/// use surflap::algo::operators::laplace_beltrami;
/// use surflap::mesh::primitives::flat_grid;
///
/// let mesh = flat_grid(4, 1.0);
/// let lbo = laplace_beltrami(&mesh, &MassMatrixOptions::default()).unwrap();
///
/// // Constants are in the kernel
/// let ones = DVector::from_element(mesh.num_vertices(), 1.0);
/// assert!(lbo.mul_vec(&ones).unwrap().amax() < 1e-9);
/// ```
pub fn laplace_beltrami(mesh: &TriMesh, options: &MassMatrixOptions) -> Result<CsrMatrix> {
    let mass = mass_matrix(mesh, options)?;
    let inverse = mass.inverse()?;

    let mut lbo = cotangent_matrix(mesh);
    let factors: Vec<f64> = inverse.iter().map(|m| -m).collect();
    lbo.scale_rows(&factors)?;

    log::debug!(
        "Laplace-Beltrami operator: {} vertices, {} non-zeros",
        lbo.nrows(),
        lbo.nnz()
    );

    Ok(lbo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::mass::MassMatrixKind;
    use crate::error::MeshError;
    use crate::mesh::primitives::{flat_grid, icosphere};
    use approx::assert_relative_eq;
    use nalgebra::{DVector, Point3};

    fn tetrahedron() -> TriMesh {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        TriMesh::new(points, vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]]).unwrap()
    }

    #[test]
    fn test_cotangent_matrix_symmetric_with_zero_rows() {
        let mesh = icosphere(1);
        let l = cotangent_matrix(&mesh);

        for (i, j, w) in l.iter() {
            assert_relative_eq!(l.get(j, i).unwrap(), w, epsilon = 1e-14);
            if i != j {
                // All triangles are acute
                assert!(w > 0.0);
            }
        }
        for s in l.row_sums().iter() {
            assert!(s.abs() < 1e-12);
        }
    }

    #[test]
    fn test_cotangent_weights_on_square() {
        // Unit square split along 0-2: the diagonal faces two right angles
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = TriMesh::new(points, vec![[0, 1, 2], [0, 2, 3]]).unwrap();
        let l = cotangent_matrix(&mesh);

        assert_relative_eq!(l.get(0, 2).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(l.get(0, 1).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(l.get(1, 2).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(l.get(0, 0).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_adjacency_matrix() {
        let a = adjacency_matrix(&tetrahedron());

        // Complete graph on four vertices
        assert_eq!(a.nnz(), 12);
        for i in 0..4 {
            assert_eq!(a.get(i, i), None);
            for j in (0..4).filter(|&j| j != i) {
                assert_eq!(a.get(i, j), Some(1.0));
            }
        }
    }

    #[test]
    fn test_graph_laplacian() {
        let mesh = flat_grid(2, 1.0);
        let g = graph_laplacian(&mesh);

        // Center vertex 4 of the 3x3 grid has 6 neighbours
        assert_eq!(g.get(4, 4), Some(6.0));
        assert_eq!(g.get(4, 0), Some(-1.0));
        // Corner 2 has neighbours 1 and 5 only
        assert_eq!(g.get(2, 2), Some(2.0));
        for s in g.row_sums().iter() {
            assert_eq!(*s, 0.0);
        }
    }

    #[test]
    fn test_laplace_beltrami_of_linear_function_vanishes_inside() {
        let n = 6;
        let mesh = flat_grid(n, 0.5);
        let lbo = laplace_beltrami(&mesh, &MassMatrixOptions::new(MassMatrixKind::Mayer)).unwrap();

        let u = DVector::from_iterator(
            mesh.num_vertices(),
            mesh.points().iter().map(|p| 2.0 * p.x - 3.0 * p.y + 1.0),
        );
        let lu = lbo.mul_vec(&u).unwrap();

        for j in 1..n {
            for i in 1..n {
                assert!(lu[j * (n + 1) + i].abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_laplace_beltrami_of_quadratic_on_grid() {
        // f = x^2 + y^2 has Laplacian 4, so -M^-1 L f is about -4 inside
        let n = 8;
        let mesh = flat_grid(n, 0.25);
        let u = DVector::from_iterator(
            mesh.num_vertices(),
            mesh.points().iter().map(|p| p.x * p.x + p.y * p.y),
        );

        for kind in MassMatrixKind::ALL {
            let lbo = laplace_beltrami(&mesh, &MassMatrixOptions::new(kind)).unwrap();
            let lu = lbo.mul_vec(&u).unwrap();
            let center = (n / 2) * (n + 1) + n / 2;
            assert_relative_eq!(lu[center], -4.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_laplace_beltrami_is_scale_invariant_on_small_grids() {
        let n = 8;
        let center = (n / 2) * (n + 1) + n / 2;

        for spacing in [0.25, 1e-3, 1e-6] {
            let mesh = flat_grid(n, spacing);
            let u = DVector::from_iterator(
                mesh.num_vertices(),
                mesh.points().iter().map(|p| p.x * p.x + p.y * p.y),
            );
            let lbo = laplace_beltrami(&mesh, &MassMatrixOptions::new(MassMatrixKind::Mayer)).unwrap();
            let lu = lbo.mul_vec(&u).unwrap();
            assert_relative_eq!(lu[center], -4.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_cotangent_weights_survive_tiny_triangles() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1e-6, 0.0, 0.0);
        let c = Point3::new(0.0, 1e-6, 0.0);
        assert_relative_eq!(cotangent_angle(&b, &c, &a), 1.0, max_relative = 1e-12);
        assert_relative_eq!(cotangent_angle(&a, &b, &c), 0.0, epsilon = 1e-12);

        // Collinear points still give no weight
        let d = Point3::new(2e-6, 0.0, 0.0);
        assert_eq!(cotangent_angle(&a, &b, &d), 0.0);
    }

    #[test]
    fn test_laplace_beltrami_rejects_isolated_vertex() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 5.0, 5.0),
        ];
        let mesh = TriMesh::new(points, vec![[0, 1, 2]]).unwrap();

        assert!(matches!(
            laplace_beltrami(&mesh, &MassMatrixOptions::default()),
            Err(MeshError::SingularMassMatrix { vertex: 3 })
        ));
    }
}
