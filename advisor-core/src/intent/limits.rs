//! Base risk parameters per `(objective, horizon)` and the risk-tolerance
//! adjustment applied on top.
//!
//! The table is fixed data: the same prompt always derives the same
//! ceilings. Combinations without a dedicated row fall back to the
//! balanced/medium row.

use crate::domain::{Horizon, Objective, RiskTolerance};
use crate::scoring::Factor;

/// Ceilings and constraints before the risk-tolerance adjustment.
#[derive(Debug, Clone)]
pub struct BaseLimits {
    pub max_volatility: f64,
    pub max_drawdown: f64,
    pub priority_factors: Vec<Factor>,
    pub min_liquidity: f64,
    pub max_concentration: f64,
}

/// Hard caps applied after the tolerance multiplier.
pub const VOLATILITY_CAP: f64 = 0.50;
pub const DRAWDOWN_CAP: f64 = 0.40;

/// Base limits for an objective/horizon pair.
pub fn base_limits(objective: Objective, horizon: Horizon) -> BaseLimits {
    use Factor::{Liquidity, Momentum, Quality, Value, Volatility};
    use Horizon::{Long, Medium, Short};
    use Objective::{Income, Protection, Return, Speculation};

    let (max_volatility, max_drawdown, factors, min_liquidity, max_concentration): (
        f64,
        f64,
        &[Factor],
        f64,
        f64,
    ) = match (objective, horizon) {
        (Return, Short) => (0.40, 0.25, &[Momentum, Volatility], 0.7, 0.25),
        (Return, Medium) => (0.30, 0.20, &[Momentum, Value, Quality], 0.6, 0.20),
        (Return, Long) => (0.25, 0.15, &[Value, Quality, Momentum], 0.5, 0.15),
        (Protection, Short) => (0.10, 0.05, &[Quality, Liquidity], 0.9, 0.10),
        (Protection, Medium) => (0.12, 0.08, &[Quality, Value, Liquidity], 0.8, 0.12),
        (Protection, Long) => (0.15, 0.10, &[Quality, Value], 0.7, 0.10),
        (Income, Medium) => (0.15, 0.10, &[Value, Quality], 0.7, 0.15),
        (Income, Long) => (0.18, 0.12, &[Value, Quality], 0.6, 0.12),
        (Speculation, Short) => (0.50, 0.35, &[Momentum, Volatility], 0.6, 0.30),
        // remaining pairs share the balanced/medium profile
        _ => (0.20, 0.12, &[Momentum, Value, Quality], 0.6, 0.15),
    };

    BaseLimits {
        max_volatility,
        max_drawdown,
        priority_factors: factors.to_vec(),
        min_liquidity,
        max_concentration,
    }
}

/// Ceiling multiplier per stated risk tolerance.
pub fn tolerance_multiplier(tolerance: RiskTolerance) -> f64 {
    match tolerance {
        RiskTolerance::Conservative => 0.7,
        RiskTolerance::Moderate => 1.0,
        RiskTolerance::Aggressive => 1.3,
        RiskTolerance::Speculative => 1.6,
    }
}

/// Apply the tolerance multiplier to the ceilings and nudge the factor
/// priorities: conservative intents lead with quality, aggressive with
/// momentum.
pub fn adjust_for_tolerance(mut limits: BaseLimits, tolerance: RiskTolerance) -> BaseLimits {
    let multiplier = tolerance_multiplier(tolerance);
    limits.max_volatility = (limits.max_volatility * multiplier).min(VOLATILITY_CAP);
    limits.max_drawdown = (limits.max_drawdown * multiplier).min(DRAWDOWN_CAP);

    match tolerance {
        RiskTolerance::Conservative => {
            if !limits.priority_factors.contains(&Factor::Quality) {
                limits.priority_factors.insert(0, Factor::Quality);
            }
        }
        RiskTolerance::Aggressive | RiskTolerance::Speculative => {
            limits.priority_factors.retain(|f| *f != Factor::Momentum);
            limits.priority_factors.insert(0, Factor::Momentum);
        }
        RiskTolerance::Moderate => {}
    }
    limits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggressive_short_return_hits_volatility_cap() {
        let limits = adjust_for_tolerance(
            base_limits(Objective::Return, Horizon::Short),
            RiskTolerance::Aggressive,
        );
        // 0.40 x 1.3 clamps at the cap
        assert_eq!(limits.max_volatility, VOLATILITY_CAP);
        assert!((limits.max_drawdown - 0.325).abs() < 1e-12);
    }

    #[test]
    fn conservative_scales_down() {
        let limits = adjust_for_tolerance(
            base_limits(Objective::Protection, Horizon::Long),
            RiskTolerance::Conservative,
        );
        assert!((limits.max_volatility - 0.105).abs() < 1e-12);
        assert_eq!(limits.priority_factors[0], Factor::Quality);
    }

    #[test]
    fn aggressive_puts_momentum_first() {
        let limits = adjust_for_tolerance(
            base_limits(Objective::Return, Horizon::Long),
            RiskTolerance::Aggressive,
        );
        assert_eq!(limits.priority_factors[0], Factor::Momentum);
        // no duplicate momentum entry
        assert_eq!(
            limits
                .priority_factors
                .iter()
                .filter(|f| **f == Factor::Momentum)
                .count(),
            1
        );
    }

    #[test]
    fn unmapped_pair_falls_back_to_balanced_medium() {
        let fallback = base_limits(Objective::Speculation, Horizon::Long);
        let balanced = base_limits(Objective::Balanced, Horizon::Medium);
        assert_eq!(fallback.max_volatility, balanced.max_volatility);
        assert_eq!(fallback.max_drawdown, balanced.max_drawdown);
    }

    #[test]
    fn every_pair_yields_in_domain_ceilings() {
        for objective in Objective::ALL {
            for horizon in Horizon::ALL {
                for tolerance in RiskTolerance::ALL {
                    let limits = adjust_for_tolerance(base_limits(objective, horizon), tolerance);
                    assert!(limits.max_volatility > 0.0 && limits.max_volatility <= VOLATILITY_CAP);
                    assert!(limits.max_drawdown > 0.0 && limits.max_drawdown <= DRAWDOWN_CAP);
                    assert!((0.0..=1.0).contains(&limits.min_liquidity));
                    assert!((0.0..=1.0).contains(&limits.max_concentration));
                    assert!(!limits.priority_factors.is_empty());
                }
            }
        }
    }
}
