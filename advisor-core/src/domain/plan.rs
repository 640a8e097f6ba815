//! Allocation plan — the final per-asset weights and their diagnostics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One position in the final plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedPosition {
    pub ticker: String,
    pub sector: String,
    /// Final portfolio weight in [0, 1].
    pub weight: f64,
    /// Composite score at selection time, for traceability.
    pub composite_score: f64,
    /// Whether the per-position cap clipped this weight.
    pub position_capped: bool,
    /// Whether a sector-cap trim reduced this weight.
    pub sector_trimmed: bool,
}

/// Bookkeeping produced alongside the plan: how close the engine got to its
/// target and which constraints were binding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationDiagnostics {
    pub target_risk_allocation: f64,
    pub achieved_risk_allocation: f64,
    pub positions_capped: usize,
    pub sectors_trimmed: usize,
    /// Sectors whose cap could not be met after redistribution, with the
    /// residual exposure. Reported, never silently ignored.
    pub unmet_sector_caps: BTreeMap<String, f64>,
    pub notes: Vec<String>,
}

/// Final allocation: ordered positions plus a cash residual.
///
/// Invariant: `sum(weights) + cash_weight == 1` within tolerance, every
/// weight within the regime's position cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Positions ordered by weight descending, ties by ticker.
    pub positions: Vec<PlannedPosition>,
    /// Residual not allocated to risk assets.
    pub cash_weight: f64,
    /// Exposure per sector after all adjustments.
    pub sector_exposure: BTreeMap<String, f64>,
    pub diagnostics: AllocationDiagnostics,
}

impl AllocationPlan {
    pub fn total_risk_weight(&self) -> f64 {
        self.positions.iter().map(|p| p.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_risk_weight_sums_positions() {
        let plan = AllocationPlan {
            positions: vec![
                PlannedPosition {
                    ticker: "A".into(),
                    sector: "x".into(),
                    weight: 0.3,
                    composite_score: 1.0,
                    position_capped: false,
                    sector_trimmed: false,
                },
                PlannedPosition {
                    ticker: "B".into(),
                    sector: "y".into(),
                    weight: 0.2,
                    composite_score: 0.5,
                    position_capped: false,
                    sector_trimmed: false,
                },
            ],
            cash_weight: 0.5,
            sector_exposure: BTreeMap::new(),
            diagnostics: AllocationDiagnostics::default(),
        };
        assert!((plan.total_risk_weight() - 0.5).abs() < 1e-12);
    }
}
