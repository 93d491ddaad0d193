//! Applying discrete Laplacians to a test function on a surface.
//!
//! [`evaluate`] samples a [`TestFunction`] at the mesh vertices, applies the
//! Laplace-Beltrami operator (and optionally the graph Laplacian), and, when
//! asked, compares the result with the analytic value.

use nalgebra::DVector;

use super::functions::TestFunction;
use super::mass::{MassMatrixKind, MassMatrixOptions};
use super::operators::{graph_laplacian, laplace_beltrami};
use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Options for [`evaluate`].
#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    /// Function sampled at the vertices.
    pub function: TestFunction,
    /// Speed `s` at which the function oscillates.
    pub speed: f64,
    /// Mass matrix used by the Laplace-Beltrami operator.
    pub mass: MassMatrixOptions,
    /// Also apply the graph Laplacian.
    pub graph_laplacian: bool,
    /// Also compute the analytic Laplacian and the error against it.
    pub analytic: bool,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            function: TestFunction::default(),
            speed: 1.0,
            mass: MassMatrixOptions::default(),
            graph_laplacian: false,
            analytic: false,
        }
    }
}

impl EvaluateOptions {
    /// Set the test function.
    pub fn with_function(mut self, function: TestFunction) -> Self {
        self.function = function;
        self
    }

    /// Set the speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Set the mass matrix kind.
    pub fn with_mass_kind(mut self, kind: MassMatrixKind) -> Self {
        self.mass = self.mass.with_kind(kind);
        self
    }

    /// Set the number of workers for the mass matrix.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.mass = self.mass.with_workers(workers);
        self
    }

    /// Enable the graph Laplacian.
    pub fn with_graph_laplacian(mut self, enabled: bool) -> Self {
        self.graph_laplacian = enabled;
        self
    }

    /// Enable the analytic comparison.
    pub fn with_analytic(mut self, enabled: bool) -> Self {
        self.analytic = enabled;
        self
    }
}

/// Summary of the difference between a discrete and an exact field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    /// Mean absolute error.
    pub mean_abs: f64,
    /// Largest absolute error.
    pub max_abs: f64,
    /// Root mean square error.
    pub rmse: f64,
}

impl ErrorStats {
    /// Compare `computed` against `exact`.
    ///
    /// # Errors
    ///
    /// [`MeshError::DimensionMismatch`] if the lengths differ.
    pub fn between(computed: &DVector<f64>, exact: &DVector<f64>) -> Result<Self> {
        if computed.len() != exact.len() {
            return Err(MeshError::dimension_mismatch(exact.len(), computed.len()));
        }
        if computed.is_empty() {
            return Ok(Self { mean_abs: 0.0, max_abs: 0.0, rmse: 0.0 });
        }

        let diff = computed - exact;
        let n = diff.len() as f64;
        Ok(Self {
            mean_abs: diff.iter().map(|d| d.abs()).sum::<f64>() / n,
            max_abs: diff.amax(),
            rmse: (diff.norm_squared() / n).sqrt(),
        })
    }
}

/// Results of [`evaluate`], one value per vertex in each field.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The sampled function `u`.
    pub u: DVector<f64>,
    /// `-M⁻¹ L u`.
    pub lu: DVector<f64>,
    /// `(D - A) u`, if requested.
    pub glu: Option<DVector<f64>>,
    /// The analytic `-Δu`, if requested.
    pub analytic: Option<DVector<f64>>,
    /// Error of `lu` against `analytic`, if requested.
    pub error: Option<ErrorStats>,
}

/// Sample the test function on `mesh` and apply the Laplacians to it.
///
/// # Errors
///
/// [`MeshError::InvalidParameter`] for a non-finite speed, and any error of
/// [`laplace_beltrami`].
pub fn evaluate(mesh: &TriMesh, options: &EvaluateOptions) -> Result<Evaluation> {
    if !options.speed.is_finite() {
        return Err(MeshError::invalid_param(
            "speed",
            options.speed,
            "must be a finite number",
        ));
    }

    log::info!(
        "Evaluating {} (speed {}) with {} mass matrix on {} vertices",
        options.function,
        options.speed,
        options.mass.kind,
        mesh.num_vertices()
    );

    let u = options.function.evaluate(mesh.points(), options.speed);

    let lbo = laplace_beltrami(mesh, &options.mass)?;
    let lu = lbo.mul_vec(&u)?;

    let glu = if options.graph_laplacian {
        Some(graph_laplacian(mesh).mul_vec(&u)?)
    } else {
        None
    };

    let (analytic, error) = if options.analytic {
        let exact = options.function.analytic_laplacian(mesh.points(), options.speed);
        let stats = ErrorStats::between(&lu, &exact)?;
        log::info!(
            "Error against analytic: mean {:.3e}, max {:.3e}, rmse {:.3e}",
            stats.mean_abs,
            stats.max_abs,
            stats.rmse
        );
        (Some(exact), Some(stats))
    } else {
        (None, None)
    };

    Ok(Evaluation { u, lu, glu, analytic, error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives::flat_grid;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let options = EvaluateOptions::default();
        assert_eq!(options.function, TestFunction::SumSinCos);
        assert_eq!(options.speed, 1.0);
        assert_eq!(options.mass.kind, MassMatrixKind::Voronoi);
        assert!(!options.graph_laplacian);
        assert!(!options.analytic);
    }

    #[test]
    fn test_rejects_non_finite_speed() {
        let mesh = flat_grid(2, 1.0);
        let options = EvaluateOptions::default().with_speed(f64::NAN);
        assert!(matches!(
            evaluate(&mesh, &options),
            Err(MeshError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_optional_outputs() {
        let mesh = flat_grid(3, 0.5);

        let plain = evaluate(&mesh, &EvaluateOptions::default()).unwrap();
        assert_eq!(plain.u.len(), mesh.num_vertices());
        assert_eq!(plain.lu.len(), mesh.num_vertices());
        assert!(plain.glu.is_none());
        assert!(plain.analytic.is_none());
        assert!(plain.error.is_none());

        let full = evaluate(
            &mesh,
            &EvaluateOptions::default()
                .with_graph_laplacian(true)
                .with_analytic(true),
        )
        .unwrap();
        assert_eq!(full.glu.unwrap().len(), mesh.num_vertices());
        assert_eq!(full.analytic.unwrap().len(), mesh.num_vertices());
        assert!(full.error.is_some());
    }

    #[test]
    fn test_converges_on_flat_grid() {
        // In the plane z = 0, sumsincosxy varies in both directions
        let n = 32;
        let mesh = flat_grid(n, 1.0 / n as f64);
        let options = EvaluateOptions::default()
            .with_function(TestFunction::SumSinCosXy)
            .with_speed(2.0)
            .with_mass_kind(MassMatrixKind::Mayer)
            .with_analytic(true);

        let result = evaluate(&mesh, &options).unwrap();
        let exact = result.analytic.unwrap();

        // Interior vertices only; the boundary rows are one-sided
        for j in 1..n {
            for i in 1..n {
                let v = j * (n + 1) + i;
                assert!(
                    (result.lu[v] - exact[v]).abs() < 1e-2,
                    "vertex {}: {} vs {}",
                    v,
                    result.lu[v],
                    exact[v]
                );
            }
        }
    }

    #[test]
    fn test_mass_kinds_agree_inside_uniform_grid() {
        let mesh = flat_grid(6, 0.25);
        let base = EvaluateOptions::default().with_function(TestFunction::SumSinCosXy);

        let voronoi = evaluate(&mesh, &base.clone().with_mass_kind(MassMatrixKind::Voronoi)).unwrap();
        let mayer = evaluate(&mesh, &base.with_mass_kind(MassMatrixKind::Mayer).with_workers(3)).unwrap();
        for v in 0..mesh.num_vertices() {
            assert_relative_eq!(voronoi.lu[v], mayer.lu[v], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_error_stats() {
        let computed = DVector::from_vec(vec![1.0, 2.0, 4.0]);
        let exact = DVector::from_vec(vec![1.0, 3.0, 2.0]);
        let stats = ErrorStats::between(&computed, &exact).unwrap();
        assert_relative_eq!(stats.mean_abs, 1.0);
        assert_relative_eq!(stats.max_abs, 2.0);
        assert_relative_eq!(stats.rmse, (5.0_f64 / 3.0).sqrt());

        let short = DVector::from_vec(vec![1.0]);
        assert!(matches!(
            ErrorStats::between(&short, &exact),
            Err(MeshError::DimensionMismatch { .. })
        ));
    }
}
