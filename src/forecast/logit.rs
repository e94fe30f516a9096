//! Logit-linear trend for indicators bounded to the 0-100 percentage range.

use super::linear::LinearFit;

/// Clipping margin in percentage points, keeps log-odds finite.
pub const PERCENT_EPSILON: f64 = 1e-4;

/// Log-odds of a probability.
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Logistic function, evaluated so that large `|z|` never overflows.
pub fn inverse_logit(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Linear trend fitted on the logit of percentage values.
#[derive(Debug, Clone)]
pub struct LogitFit {
    inner: LinearFit,
}

impl LogitFit {
    /// Clip, transform and delegate to [`LinearFit::fit`].
    pub fn fit(years: &[f64], values_pct: &[f64]) -> Self {
        let z: Vec<f64> = values_pct
            .iter()
            .map(|v| {
                let clipped = v.clamp(PERCENT_EPSILON, 100.0 - PERCENT_EPSILON);
                logit(clipped / 100.0)
            })
            .collect();
        Self {
            inner: LinearFit::fit(years, &z),
        }
    }

    /// Percentage estimate and delta-method standard error at `year`.
    pub fn predict(&self, year: f64) -> (f64, f64) {
        let (z, se_z) = self.inner.predict(year);
        // Far extrapolation saturates in f64; hold it inside the fitted band.
        let bound = PERCENT_EPSILON / 100.0;
        let p = inverse_logit(z).clamp(bound, 1.0 - bound);
        let se_p = se_z * p * (1.0 - p);
        (100.0 * p, 100.0 * se_p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logit_round_trips() {
        for p in [0.01, 0.2, 0.5, 0.73, 0.99] {
            assert!((inverse_logit(logit(p)) - p).abs() < 1e-12);
        }
    }

    #[test]
    fn inverse_logit_saturates_without_nan() {
        assert_eq!(inverse_logit(1000.0), 1.0);
        assert_eq!(inverse_logit(-1000.0), 0.0);
    }

    #[test]
    fn zero_and_hundred_are_clipped() {
        let fit = LogitFit::fit(&[2020.0, 2024.0], &[0.0, 100.0]);
        let (estimate, se) = fit.predict(2022.0);
        assert!(estimate.is_finite() && se.is_finite());
        assert!((estimate - 50.0).abs() < 1e-6);
    }
}
