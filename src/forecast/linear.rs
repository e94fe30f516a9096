//! Ordinary least squares trend of value on year with prediction intervals.

use ndarray::{array, Array1, Array2};

/// Relative eigenvalue cutoff below which a Gram direction is treated as null.
const PINV_RCOND: f64 = 1e-15;

/// Fitted `value = intercept + slope * year` model.
///
/// Years are centered on their mean before the design is built, so the stored
/// coefficients and Gram pseudo-inverse live in centered coordinates. The
/// prediction variance `x0' (X'X)^+ x0` is invariant to that shift.
#[derive(Debug, Clone)]
pub struct LinearFit {
    center: f64,
    coef: Array1<f64>,
    residual_variance: f64,
    gram_pinv: Array2<f64>,
}

impl LinearFit {
    /// Fit by least squares.
    ///
    /// Callers must pass at least two distinct years; shorter input is not
    /// rejected here but yields a degenerate (flat) fit. Near-singular designs
    /// are absorbed by the pseudo-inverse.
    pub fn fit(years: &[f64], values: &[f64]) -> Self {
        let n = years.len().min(values.len());
        let center = if n == 0 {
            0.0
        } else {
            years[..n].iter().sum::<f64>() / n as f64
        };

        let design = Array2::from_shape_fn((n, 2), |(row, col)| {
            if col == 0 {
                1.0
            } else {
                years[row] - center
            }
        });
        let y = Array1::from_iter(values[..n].iter().copied());

        let gram = design.t().dot(&design);
        let gram_pinv = pinv_symmetric(&gram);
        let coef = gram_pinv.dot(&design.t().dot(&y));

        let residuals = &y - &design.dot(&coef);
        let dof = n.saturating_sub(2).max(1) as f64;
        let residual_variance = residuals.mapv(|r| r * r).sum() / dof;

        Self {
            center,
            coef,
            residual_variance,
            gram_pinv,
        }
    }

    /// Residual variance `s^2` with `max(1, n - 2)` degrees of freedom.
    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// Mean of the fitted years.
    pub fn mean_year(&self) -> f64 {
        self.center
    }

    /// Point estimate and prediction standard error at `year`.
    pub fn predict(&self, year: f64) -> (f64, f64) {
        let x0 = array![1.0, year - self.center];
        let estimate = x0.dot(&self.coef);
        let leverage = x0.dot(&self.gram_pinv.dot(&x0));
        let variance = self.residual_variance * (1.0 + leverage);
        (estimate, variance.max(0.0).sqrt())
    }
}

/// Moore-Penrose pseudo-inverse of a symmetric 2x2 matrix via its
/// eigen-decomposition, discarding eigenvalues below `PINV_RCOND * max|λ|`.
pub fn pinv_symmetric(matrix: &Array2<f64>) -> Array2<f64> {
    let (a, b, d) = (matrix[[0, 0]], matrix[[0, 1]], matrix[[1, 1]]);
    let mid = 0.5 * (a + d);
    let radius = (0.5 * (a - d)).hypot(b);
    let lambda_hi = mid + radius;
    let lambda_lo = mid - radius;

    let v_hi = if b == 0.0 {
        if a >= d {
            [1.0, 0.0]
        } else {
            [0.0, 1.0]
        }
    } else {
        let first = [b, lambda_hi - a];
        let second = [lambda_hi - d, b];
        let pick = if first[0].hypot(first[1]) >= second[0].hypot(second[1]) {
            first
        } else {
            second
        };
        let norm = pick[0].hypot(pick[1]);
        [pick[0] / norm, pick[1] / norm]
    };
    let v_lo = [-v_hi[1], v_hi[0]];

    let cutoff = PINV_RCOND * lambda_hi.abs().max(lambda_lo.abs());
    let mut pinv = Array2::<f64>::zeros((2, 2));
    for (lambda, v) in [(lambda_hi, v_hi), (lambda_lo, v_lo)] {
        if lambda.abs() <= cutoff {
            continue;
        }
        for i in 0..2 {
            for j in 0..2 {
                pinv[[i, j]] += v[i] * v[j] / lambda;
            }
        }
    }
    pinv
}
