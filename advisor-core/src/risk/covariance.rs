//! Pluggable covariance models for portfolio volatility.
//!
//! The baseline assumes cross-asset independence; a correlation matrix can
//! be injected without touching the risk engine. The substitution is
//! explicit in the type, not a hidden default inside the estimate.

/// Estimate portfolio volatility from weights and per-asset volatilities.
///
/// Both slices are index-aligned with the candidate list. Implementations
/// must be pure and deterministic.
pub trait CovarianceModel: Send + Sync {
    fn portfolio_volatility(&self, weights: &[f64], vols: &[f64]) -> f64;

    fn name(&self) -> &'static str;
}

/// Independence assumption: var = sum((w_i * sigma_i)^2).
///
/// Understates diversified-portfolio volatility when assets co-move; that
/// is the documented baseline, not a guess.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndependentVariance;

impl CovarianceModel for IndependentVariance {
    fn portfolio_volatility(&self, weights: &[f64], vols: &[f64]) -> f64 {
        let var: f64 = weights
            .iter()
            .zip(vols.iter())
            .map(|(w, v)| (w * v).powi(2))
            .sum();
        var.sqrt()
    }

    fn name(&self) -> &'static str {
        "independent"
    }
}

/// Full correlation matrix: var = w' . (D R D) . w where D = diag(sigma).
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    /// Row-major n x n correlation matrix, unit diagonal.
    matrix: Vec<f64>,
    n: usize,
}

impl CorrelationMatrix {
    /// Build from a row-major square matrix. Panics if the length is not a
    /// perfect square — that is a caller bug, not a data condition.
    pub fn new(matrix: Vec<f64>, n: usize) -> Self {
        assert_eq!(matrix.len(), n * n, "correlation matrix must be n x n");
        Self { matrix, n }
    }

    fn corr(&self, i: usize, j: usize) -> f64 {
        self.matrix[i * self.n + j]
    }
}

impl CovarianceModel for CorrelationMatrix {
    fn portfolio_volatility(&self, weights: &[f64], vols: &[f64]) -> f64 {
        assert_eq!(weights.len(), self.n, "weights must match matrix dimension");
        let mut var = 0.0;
        for i in 0..self.n {
            for j in 0..self.n {
                var += weights[i] * weights[j] * vols[i] * vols[j] * self.corr(i, j);
            }
        }
        var.max(0.0).sqrt()
    }

    fn name(&self) -> &'static str {
        "correlation_matrix"
    }
}
