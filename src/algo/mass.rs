//! Lumped (diagonal) mass matrices.
//!
//! A mass matrix assigns every vertex the part of the surface area it stands
//! for. Three kinds are available, see [`MassMatrixKind`]:
//!
//! - **Voronoi**: mixed Voronoi areas assembled triangle by triangle
//! - **Barycentric**: one third of every incident triangle
//! - **Mayer**: mixed (Meyer) areas computed per vertex in parallel chunks,
//!   then summed over each vertex's triangles
//!
//! Voronoi and Mayer implement the same rule and agree to rounding error;
//! they differ in how the work is organised.
//!
//! # Example
//!
//! ```
//! use surflap::algo::mass::{mass_matrix, MassMatrixKind, MassMatrixOptions};
//! use surflap::mesh::primitives::flat_grid;
//!
//! let mesh = flat_grid(4, 0.5);
//! let options = MassMatrixOptions::new(MassMatrixKind::Mayer).with_workers(2);
//! let mass = mass_matrix(&mesh, &options).unwrap();
//!
//! assert_eq!(mass.len(), mesh.num_vertices());
//! assert!((mass.total() - 4.0).abs() < 1e-9);
//! ```

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use nalgebra::DVector;

use super::edges::EdgeGeometry;
use super::mixed_area::vertex_triangle_areas;
use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;
use crate::sparse::CsrMatrix;

/// How vertex areas are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MassMatrixKind {
    /// Mixed Voronoi areas, assembled per triangle.
    #[default]
    Voronoi,
    /// A third of every incident triangle's area.
    Barycentric,
    /// Mixed areas after Meyer et al., computed per vertex in parallel.
    Mayer,
}

impl MassMatrixKind {
    /// All kinds, in the order they are listed to users.
    pub const ALL: [MassMatrixKind; 3] = [
        MassMatrixKind::Voronoi,
        MassMatrixKind::Barycentric,
        MassMatrixKind::Mayer,
    ];

    /// The name used on the command line and in error messages.
    pub fn name(self) -> &'static str {
        match self {
            MassMatrixKind::Voronoi => "voronoi",
            MassMatrixKind::Barycentric => "barycentric",
            MassMatrixKind::Mayer => "mayer",
        }
    }

    /// Names of all kinds.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.name()).collect()
    }
}

impl fmt::Display for MassMatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MassMatrixKind {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| MeshError::UnknownStrategy {
                name: s.to_string(),
                supported: Self::names(),
            })
    }
}

/// Options for mass matrix computation.
#[derive(Debug, Clone)]
pub struct MassMatrixOptions {
    /// Which kind of mass matrix to build.
    pub kind: MassMatrixKind,

    /// Number of parallel workers for [`MassMatrixKind::Mayer`]
    /// (default: all rayon threads). `1` runs sequentially.
    pub workers: usize,
}

impl Default for MassMatrixOptions {
    fn default() -> Self {
        Self {
            kind: MassMatrixKind::default(),
            workers: rayon::current_num_threads(),
        }
    }
}

impl MassMatrixOptions {
    /// Default options for the given kind.
    pub fn new(kind: MassMatrixKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Set the mass matrix kind.
    pub fn with_kind(mut self, kind: MassMatrixKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the number of parallel workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Use a single worker.
    pub fn sequential(mut self) -> Self {
        self.workers = 1;
        self
    }
}

/// A diagonal `n x n` mass matrix, stored as its diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct MassMatrix {
    diagonal: DVector<f64>,
}

impl MassMatrix {
    /// Wrap a diagonal.
    pub fn from_diagonal(diagonal: DVector<f64>) -> Self {
        Self { diagonal }
    }

    /// The per-vertex areas.
    #[inline]
    pub fn diagonal(&self) -> &DVector<f64> {
        &self.diagonal
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.diagonal.len()
    }

    /// Check if the matrix has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diagonal.is_empty()
    }

    /// Sum of all vertex areas.
    pub fn total(&self) -> f64 {
        self.diagonal.sum()
    }

    /// Diagonal of the inverse.
    ///
    /// # Errors
    ///
    /// [`MeshError::SingularMassMatrix`] at the first vertex whose area is not
    /// strictly positive.
    pub fn inverse(&self) -> Result<DVector<f64>> {
        if let Some(vertex) = self.diagonal.iter().position(|&m| !(m > 0.0)) {
            return Err(MeshError::SingularMassMatrix { vertex });
        }
        Ok(self.diagonal.map(|m| 1.0 / m))
    }

    /// The matrix in sparse form.
    pub fn to_csr(&self) -> CsrMatrix {
        CsrMatrix::from_diagonal(self.diagonal.as_slice())
    }
}

/// Compute the mass matrix of `mesh`.
///
/// # Errors
///
/// For [`MassMatrixKind::Mayer`], any error of
/// [`EdgeGeometry::new`] or [`vertex_triangle_areas`]; the other kinds
/// cannot fail on a valid [`TriMesh`].
pub fn mass_matrix(mesh: &TriMesh, options: &MassMatrixOptions) -> Result<MassMatrix> {
    log::debug!("building {} mass matrix", options.kind);

    let mass = match options.kind {
        MassMatrixKind::Voronoi => voronoi_mass_matrix(mesh),
        MassMatrixKind::Barycentric => barycentric_mass_matrix(mesh),
        MassMatrixKind::Mayer => mayer_mass_matrix(mesh, options.workers)?,
    };

    let unreferenced = mesh.unreferenced_vertices();
    if !unreferenced.is_empty() {
        log::warn!(
            "{} vertices belong to no triangle and have zero mass",
            unreferenced.len()
        );
    }

    Ok(mass)
}

/// Mixed areas per vertex, computed in `workers` parallel chunks and
/// row-summed into a diagonal.
pub fn mayer_mass_matrix(mesh: &TriMesh, workers: usize) -> Result<MassMatrix> {
    let edges = EdgeGeometry::new(mesh)?;
    let areas = vertex_triangle_areas(mesh, &edges, workers)?;
    Ok(MassMatrix::from_diagonal(areas.row_sums()))
}

/// Mixed Voronoi areas assembled triangle by triangle.
///
/// Works on squared edge lengths only. Triangles with zero area contribute
/// nothing.
pub fn voronoi_mass_matrix(mesh: &TriMesh) -> MassMatrix {
    let mut diagonal = DVector::zeros(mesh.num_vertices());

    for (t, tri) in mesh.triangles().iter().enumerate() {
        let [p0, p1, p2] = mesh.triangle_positions(t);
        // Squared length of the side opposite each corner
        let l2 = [
            (p2 - p1).norm_squared(),
            (p2 - p0).norm_squared(),
            (p1 - p0).norm_squared(),
        ];
        let area = mesh.triangle_area(t);
        if area <= 0.0 {
            continue;
        }

        // Cosine at each corner from the law of cosines
        let cosine = |i: usize| {
            let (j, k) = ((i + 1) % 3, (i + 2) % 3);
            (l2[j] + l2[k] - l2[i]) / (2.0 * (l2[j] * l2[k]).sqrt())
        };
        let angles = [0, 1, 2].map(|i| cosine(i).clamp(-1.0, 1.0).acos());

        let shares = match angles.iter().position(|&a| a > FRAC_PI_2) {
            Some(obtuse) => [0, 1, 2].map(|i| if i == obtuse { area / 2.0 } else { area / 4.0 }),
            None => {
                let cot = angles.map(|a| a.cos() / a.sin());
                // Corner i gets the halves of its two adjacent sides, each
                // weighted by the cotangent of the angle across from it
                [0, 1, 2].map(|i| {
                    let (j, k) = ((i + 1) % 3, (i + 2) % 3);
                    (l2[k] * cot[k] + l2[j] * cot[j]) / 8.0
                })
            }
        };

        for (corner, &v) in tri.iter().enumerate() {
            diagonal[v] += shares[corner];
        }
    }

    MassMatrix::from_diagonal(diagonal)
}

/// One third of every incident triangle's area.
pub fn barycentric_mass_matrix(mesh: &TriMesh) -> MassMatrix {
    let mut diagonal = DVector::zeros(mesh.num_vertices());

    for (t, tri) in mesh.triangles().iter().enumerate() {
        let contribution = mesh.triangle_area(t) / 3.0;
        for &v in tri {
            diagonal[v] += contribution;
        }
    }

    MassMatrix::from_diagonal(diagonal)
}
