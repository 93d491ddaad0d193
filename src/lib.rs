//! # surflap
//!
//! Discrete Laplace-Beltrami operators and lumped mass matrices on triangle
//! meshes.
//!
//! surflap loads a triangulated surface, computes per-vertex areas with one
//! of several mass matrix rules, and assembles the cotangent Laplacian and the
//! Laplace-Beltrami operator `-M⁻¹ L` from them. Analytic test functions make
//! it easy to measure how well the discrete operator approximates the smooth
//! one.
//!
//! ## Features
//!
//! - **Mixed (Meyer) areas**: per-vertex, per-triangle areas with the obtuse
//!   triangle rule, computed in parallel over vertex chunks
//! - **Mass matrices**: Voronoi, barycentric and Mayer lumped masses
//! - **Laplacians**: cotangent, Laplace-Beltrami and graph Laplacians in CSR form
//! - **File formats**: OBJ, STL and PLY surfaces; PLY or text vertex data
//!
//! ## Quick Start
//!
//! ```no_run
//! use surflap::prelude::*;
//!
//! let mesh = surflap::io::load("surface.obj").unwrap();
//!
//! let options = EvaluateOptions::default()
//!     .with_speed(2.0)
//!     .with_mass_kind(MassMatrixKind::Mayer)
//!     .with_analytic(true);
//! let result = evaluate(&mesh, &options).unwrap();
//!
//! println!("RMSE: {}", result.error.unwrap().rmse);
//! surflap::io::save_vertex_data("lu.ply", &mesh, &result.lu).unwrap();
//! ```
//!
//! ## Mixed Areas Directly
//!
//! ```
//! use surflap::prelude::*;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = TriMesh::new(points, vec![[0, 1, 2]]).unwrap();
//!
//! let edges = EdgeGeometry::new(&mesh).unwrap();
//! let areas = vertex_triangle_areas(&mesh, &edges, 2).unwrap();
//!
//! // The right-angled corner owns half the triangle
//! assert!((areas.get(0, 0).unwrap() - 0.25).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use surflap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::chunks::{distribute, WorkChunk};
    pub use crate::algo::edges::EdgeGeometry;
    pub use crate::algo::evaluate::{evaluate, EvaluateOptions, Evaluation};
    pub use crate::algo::functions::TestFunction;
    pub use crate::algo::mass::{mass_matrix, MassMatrix, MassMatrixKind, MassMatrixOptions};
    pub use crate::algo::mixed_area::vertex_triangle_areas;
    pub use crate::algo::operators::{cotangent_matrix, graph_laplacian, laplace_beltrami};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{TriMesh, VertexTriangles};
    pub use crate::sparse::CsrMatrix;
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::mesh::primitives::icosphere;

    #[test]
    fn test_sphere_pipeline() {
        // On the unit sphere, sin(s y) + cos(s z) is not an eigenfunction, but
        // the operator must still be finite and the mass must cover the area
        let mesh = icosphere(3);
        let options = EvaluateOptions::default()
            .with_mass_kind(MassMatrixKind::Mayer)
            .with_workers(4)
            .with_graph_laplacian(true)
            .with_analytic(true);

        let result = evaluate(&mesh, &options).unwrap();
        assert!(result.lu.iter().all(|v| v.is_finite()));
        assert!(result.glu.unwrap().iter().all(|v| v.is_finite()));

        let mass = mass_matrix(&mesh, &options.mass).unwrap();
        assert!((mass.total() - mesh.surface_area()).abs() < 1e-10);
    }
}
