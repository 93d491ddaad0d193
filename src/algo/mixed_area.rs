//! Mixed (Meyer) vertex areas.
//!
//! Builds the `n_vertices x n_triangles` matrix whose entry `(v, t)` is the
//! part of triangle `t`'s area that belongs to vertex `v`, following the
//! `A_mixed` construction of Meyer et al.:
//!
//! - Non-obtuse triangle: the Voronoi area of the corner,
//!   `(|near_a|^2 cot(opposite near_a) + |near_b|^2 cot(opposite near_b)) / 8`
//! - Obtuse at the vertex: half the triangle area
//! - Obtuse at another corner: a quarter of the triangle area
//!
//! A right angle counts as non-obtuse.
//!
//! The vertex range is split into [`WorkChunk`]s and every chunk is handled
//! by an independent worker with read-only access to the mesh. A vertex
//! belongs to exactly one chunk, so the partial matrices have disjoint
//! sparsity patterns and their sum does not depend on scheduling.
//!
//! # References
//!
//! - Meyer, M., Desbrun, M., Schröder, P., Barr, A. H. (2003). "Discrete
//!   Differential-Geometry Operators for Triangulated 2-Manifolds."
//!   Visualization and Mathematics III.

use std::f64::consts::FRAC_PI_2;

use rayon::prelude::*;

use super::chunks::{distribute, WorkChunk};
use super::edges::{EdgeGeometry, TriangleEdges, EDGE_SLOTS};
use crate::error::{MeshError, Result};
use crate::mesh::{TriMesh, VertexTriangles};
use crate::sparse::CsrMatrix;

/// Interior angle between two sides, by the law of cosines.
///
/// `numerator` is `a^2 + b^2 - c^2` for the opposite side `c`. The cosine is
/// clamped to `[-1, 1]` before `acos`.
#[inline]
fn interior_angle(a: f64, b: f64, numerator: f64) -> f64 {
    (numerator / (2.0 * a * b)).clamp(-1.0, 1.0).acos()
}

#[inline]
fn cot(angle: f64) -> f64 {
    angle.cos() / angle.sin()
}

/// Area of one triangle that belongs to its corner at local position `corner`.
pub fn corner_area(edges: &TriangleEdges, corner: usize) -> f64 {
    let [near_a, near_b, far] = EDGE_SLOTS[corner];

    let (la, lb, lf) = (edges.lengths[near_a], edges.lengths[near_b], edges.lengths[far]);
    let (la2, lb2, lf2) = (
        edges.squared_length(near_a),
        edges.squared_length(near_b),
        edges.squared_length(far),
    );

    let at_corner = interior_angle(la, lb, la2 + lb2 - lf2);
    let opposite_a = interior_angle(lb, lf, lb2 + lf2 - la2);
    let opposite_b = interior_angle(la, lf, la2 + lf2 - lb2);

    if at_corner > FRAC_PI_2 || opposite_a > FRAC_PI_2 || opposite_b > FRAC_PI_2 {
        let area = edges.area();
        if at_corner > FRAC_PI_2 {
            area / 2.0
        } else {
            area / 4.0
        }
    } else {
        (la2 * cot(opposite_a) + lb2 * cot(opposite_b)) / 8.0
    }
}

/// Mixed areas for the vertices of one chunk.
///
/// Returns an `n_vertices x n_triangles` matrix with entries only in the rows
/// of `chunk`. Vertices without triangles produce no entries.
pub fn mixed_area_worker(
    mesh: &TriMesh,
    incidence: &VertexTriangles,
    edges: &EdgeGeometry,
    chunk: &WorkChunk,
) -> CsrMatrix {
    let triangles = mesh.triangles();
    let mut triplets = Vec::with_capacity(chunk.len() * 6);

    for vertex in chunk.indices() {
        for &t in incidence.of(vertex) {
            if let Some(corner) = triangles[t].iter().position(|&v| v == vertex) {
                triplets.push((vertex, t, corner_area(edges.triangle(t), corner)));
            }
        }
    }

    CsrMatrix::from_triplets(mesh.num_vertices(), mesh.num_triangles(), triplets)
}

/// Mixed areas of every vertex in every incident triangle.
///
/// The vertex range is split into `workers` chunks, run on at most one thread
/// per vertex. When that thread count matches the global rayon pool the
/// global pool is used, otherwise a dedicated pool is built. The partial results
/// are summed in chunk order.
///
/// # Errors
///
/// - [`MeshError::DimensionMismatch`] if `edges` was computed for another mesh
/// - [`MeshError::InvalidPartition`] if `workers` is zero
/// - [`MeshError::ThreadPool`] if the worker pool cannot be started
/// - [`MeshError::ZeroArea`] if any vertex gets a zero, negative, non-finite
///   or missing area from one of its triangles
///
/// # Example
///
/// ```
/// use surflap::algo::edges::EdgeGeometry;
/// use surflap::algo::mixed_area::vertex_triangle_areas;
/// use surflap::mesh::primitives::flat_grid;
///
/// let mesh = flat_grid(4, 1.0);
/// let edges = EdgeGeometry::new(&mesh).unwrap();
/// let areas = vertex_triangle_areas(&mesh, &edges, 2).unwrap();
///
/// let total: f64 = areas.values().iter().sum();
/// assert!((total - 16.0).abs() < 1e-9);
/// ```
pub fn vertex_triangle_areas(mesh: &TriMesh, edges: &EdgeGeometry, workers: usize) -> Result<CsrMatrix> {
    if edges.len() != mesh.num_triangles() {
        return Err(MeshError::dimension_mismatch(mesh.num_triangles(), edges.len()));
    }

    let chunks = distribute(mesh.num_vertices(), workers)?;
    let incidence = VertexTriangles::new(mesh);

    log::debug!(
        "mixed areas: {} vertices, {} triangles, {} chunks",
        mesh.num_vertices(),
        mesh.num_triangles(),
        chunks.len()
    );

    let run = |chunk: &WorkChunk| mixed_area_worker(mesh, &incidence, edges, chunk);

    // Chunks past the vertex count are empty
    let threads = workers.min(mesh.num_vertices());
    let partials: Vec<CsrMatrix> = if threads <= 1 {
        chunks.iter().map(run).collect()
    } else if threads == rayon::current_num_threads() {
        chunks.par_iter().map(run).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        pool.install(|| chunks.par_iter().map(run).collect())
    };

    let mut areas = CsrMatrix::zeros(mesh.num_vertices(), mesh.num_triangles());
    for partial in &partials {
        areas = areas.add(partial)?;
    }

    check_areas(mesh, &areas)?;
    Ok(areas)
}

/// Every stored area must be positive and every triangle corner must have one.
fn check_areas(mesh: &TriMesh, areas: &CsrMatrix) -> Result<()> {
    for (vertex, triangle, area) in areas.iter() {
        // Negated so NaN is rejected too
        if !(area > 0.0) {
            return Err(MeshError::ZeroArea { vertex, triangle, area });
        }
    }

    for (t, tri) in mesh.triangles().iter().enumerate() {
        for &v in tri {
            if areas.get(v, t).is_none() {
                return Err(MeshError::ZeroArea {
                    vertex: v,
                    triangle: t,
                    area: 0.0,
                });
            }
        }
    }

    Ok(())
}
