//! Analytic test functions for checking discrete Laplacians.
//!
//! Each function is a sum of a sine and a cosine of two coordinates, scaled
//! by a speed `s`. For any such `f`, the ambient Laplacian satisfies
//! `-Δf = s² f`, which is the value `-M⁻¹ L u` should approach.

use std::fmt;
use std::str::FromStr;

use nalgebra::{DVector, Point3};

use crate::error::{MeshError, Result};

/// A named scalar function of vertex positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TestFunction {
    /// `sin(s·y) + cos(s·z)`.
    #[default]
    SumSinCos,
    /// `sin(s·x) + cos(s·y)`.
    SumSinCosXy,
    /// `sin(s·x) + cos(s·z)`.
    SumSinCosXz,
    /// `sin(s·y) + cos(s·z)`, under its explicit axis name.
    SumSinCosYz,
}

impl TestFunction {
    /// Every function, in the order they are listed to users.
    pub const ALL: [TestFunction; 4] = [
        TestFunction::SumSinCos,
        TestFunction::SumSinCosXy,
        TestFunction::SumSinCosXz,
        TestFunction::SumSinCosYz,
    ];

    /// The name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            TestFunction::SumSinCos => "sumsincos",
            TestFunction::SumSinCosXy => "sumsincosxy",
            TestFunction::SumSinCosXz => "sumsincosxz",
            TestFunction::SumSinCosYz => "sumsincosyz",
        }
    }

    /// Names of all functions.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.name()).collect()
    }

    /// Coordinate axes fed to the sine and the cosine.
    fn axes(self) -> (usize, usize) {
        match self {
            TestFunction::SumSinCos | TestFunction::SumSinCosYz => (1, 2),
            TestFunction::SumSinCosXy => (0, 1),
            TestFunction::SumSinCosXz => (0, 2),
        }
    }

    /// Value at a single point.
    #[inline]
    pub fn value(self, p: &Point3<f64>, speed: f64) -> f64 {
        let (a, b) = self.axes();
        (speed * p[a]).sin() + (speed * p[b]).cos()
    }

    /// Values at every point.
    pub fn evaluate(self, points: &[Point3<f64>], speed: f64) -> DVector<f64> {
        DVector::from_iterator(points.len(), points.iter().map(|p| self.value(p, speed)))
    }

    /// Exact `-Δf` at every point, `s² f`.
    pub fn analytic_laplacian(self, points: &[Point3<f64>], speed: f64) -> DVector<f64> {
        self.evaluate(points, speed) * (speed * speed)
    }
}

impl fmt::Display for TestFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestFunction {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| MeshError::UnknownFunction {
                name: s.to_string(),
                supported: Self::names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_names() {
        for f in TestFunction::ALL {
            assert_eq!(f.name().parse::<TestFunction>().unwrap(), f);
        }
        assert!("SumSinCos".parse::<TestFunction>().is_err());
    }

    #[test]
    fn test_unknown_function() {
        let err = "gaussian".parse::<TestFunction>().unwrap_err();
        match &err {
            MeshError::UnknownFunction { name, supported } => {
                assert_eq!(name, "gaussian");
                assert_eq!(supported.len(), 4);
            }
            other => panic!("expected UnknownFunction, got {:?}", other),
        }
        assert!(err.to_string().contains("sumsincosxz"));
    }

    #[test]
    fn test_values() {
        let p = Point3::new(0.3, 0.0, 0.0);
        assert_relative_eq!(TestFunction::SumSinCos.value(&p, 1.0), 1.0);
        assert_relative_eq!(TestFunction::SumSinCosXy.value(&p, 2.0), 0.6_f64.sin() + 1.0);

        let q = Point3::new(0.1, 0.2, 0.3);
        assert_relative_eq!(
            TestFunction::SumSinCos.value(&q, 1.5),
            TestFunction::SumSinCosYz.value(&q, 1.5)
        );
    }

    #[test]
    fn test_analytic_laplacian_scales_with_speed() {
        let points = vec![Point3::new(0.1, 0.2, 0.3), Point3::new(-1.0, 0.5, 2.0)];
        let f = TestFunction::SumSinCosXz;
        let u = f.evaluate(&points, 3.0);
        let lu = f.analytic_laplacian(&points, 3.0);
        for i in 0..points.len() {
            assert_relative_eq!(lu[i], 9.0 * u[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_analytic_laplacian_matches_finite_differences() {
        // -(f(x+h) + f(x-h) - 2 f(x)) / h^2 summed over axes
        let f = TestFunction::SumSinCosXy;
        let s = 0.7;
        let p = Point3::new(0.4, -0.2, 1.1);
        let h = 1e-4;
        let mut lap = 0.0;
        for axis in 0..3 {
            let mut plus = p;
            let mut minus = p;
            plus[axis] += h;
            minus[axis] -= h;
            lap += (f.value(&plus, s) + f.value(&minus, s) - 2.0 * f.value(&p, s)) / (h * h);
        }
        let exact = f.analytic_laplacian(&[p], s)[0];
        assert_relative_eq!(-lap, exact, epsilon = 1e-5);
    }
}
