//! Per-regime allocation limits.
//!
//! Fixed data tables, one row per regime. Risk appetite shrinks from
//! risk-on-strong to risk-off-strong: smaller positions, less risk-asset
//! exposure, tighter sector caps, fewer names.

use crate::domain::RegimeLabel;

/// Structural limits the allocation engine enforces for one regime.
#[derive(Debug, Clone, Copy)]
pub struct RegimeLimits {
    /// Hard cap on any single position's weight.
    pub max_position: f64,
    /// Fraction of the portfolio allocated to risk assets; the rest is cash.
    pub target_risk_allocation: f64,
    /// Hard cap on any single sector's total exposure.
    pub max_sector_exposure: f64,
    /// Number of names selected from the top of the ranking.
    pub position_count: usize,
}

impl RegimeLimits {
    pub fn for_regime(regime: RegimeLabel) -> Self {
        match regime {
            RegimeLabel::RiskOnStrong => Self {
                max_position: 0.15,
                target_risk_allocation: 0.98,
                max_sector_exposure: 0.40,
                position_count: 10,
            },
            RegimeLabel::RiskOn => Self {
                max_position: 0.12,
                target_risk_allocation: 0.95,
                max_sector_exposure: 0.35,
                position_count: 10,
            },
            RegimeLabel::Transition => Self {
                max_position: 0.08,
                target_risk_allocation: 0.50,
                max_sector_exposure: 0.20,
                position_count: 8,
            },
            RegimeLabel::RiskOff => Self {
                max_position: 0.05,
                target_risk_allocation: 0.20,
                max_sector_exposure: 0.12,
                position_count: 6,
            },
            RegimeLabel::RiskOffStrong => Self {
                max_position: 0.02,
                target_risk_allocation: 0.05,
                max_sector_exposure: 0.10,
                position_count: 4,
            },
        }
    }
}
