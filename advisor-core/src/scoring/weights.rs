//! Three-layer factor weight resolution.
//!
//! Resolved weights are the product of three lookup tables — objective base,
//! risk-tolerance multiplier, regime multiplier — renormalized to sum to 1.
//! Adding an objective or regime is a table edit, not a code change; the
//! exhaustive matches make a missing entry a compile error rather than a
//! silent default.

use crate::domain::{Objective, RegimeLabel, RiskTolerance};

use super::Factor;

/// Base weight per factor, keyed by objective. Each row sums to 1.0.
pub fn base_weight(objective: Objective, factor: Factor) -> f64 {
    use Factor::*;
    match objective {
        Objective::Return => match factor {
            Momentum => 0.35,
            Value => 0.20,
            Quality => 0.15,
            Volatility => 0.15,
            Liquidity => 0.15,
        },
        Objective::Protection => match factor {
            Momentum => 0.10,
            Value => 0.25,
            Quality => 0.35,
            Volatility => 0.10,
            Liquidity => 0.20,
        },
        Objective::Income => match factor {
            Momentum => 0.15,
            Value => 0.35,
            Quality => 0.30,
            Volatility => 0.10,
            Liquidity => 0.10,
        },
        Objective::Speculation => match factor {
            Momentum => 0.45,
            Value => 0.10,
            Quality => 0.10,
            Volatility => 0.25,
            Liquidity => 0.10,
        },
        Objective::Balanced => match factor {
            Momentum => 0.25,
            Value => 0.25,
            Quality => 0.25,
            Volatility => 0.15,
            Liquidity => 0.10,
        },
    }
}

/// Risk-tolerance multiplier per factor, centered near 1.0.
pub fn tolerance_multiplier(tolerance: RiskTolerance, factor: Factor) -> f64 {
    use Factor::*;
    match tolerance {
        RiskTolerance::Conservative => match factor {
            Momentum => 0.7,
            Value => 1.2,
            Quality => 1.3,
            Volatility => 0.6,
            Liquidity => 1.2,
        },
        RiskTolerance::Moderate => 1.0,
        RiskTolerance::Aggressive => match factor {
            Momentum => 1.3,
            Value => 0.9,
            Quality => 0.8,
            Volatility => 1.2,
            Liquidity => 0.9,
        },
        RiskTolerance::Speculative => match factor {
            Momentum => 1.5,
            Value => 0.7,
            Quality => 0.6,
            Volatility => 1.4,
            Liquidity => 0.7,
        },
    }
}

/// Regime multiplier per factor. Risk-on tilts momentum, risk-off tilts
/// quality and value.
pub fn regime_multiplier(regime: RegimeLabel, factor: Factor) -> f64 {
    use Factor::*;
    match regime {
        RegimeLabel::RiskOnStrong => match factor {
            Momentum => 1.3,
            Value => 0.8,
            Quality => 0.9,
            Volatility => 1.0,
            Liquidity => 1.0,
        },
        RegimeLabel::RiskOn => match factor {
            Momentum => 1.2,
            Value => 0.9,
            Quality => 1.0,
            Volatility => 0.9,
            Liquidity => 1.0,
        },
        RegimeLabel::Transition => match factor {
            Momentum => 1.0,
            Value => 1.0,
            Quality => 1.1,
            Volatility => 0.9,
            Liquidity => 1.0,
        },
        RegimeLabel::RiskOff => match factor {
            Momentum => 0.7,
            Value => 1.1,
            Quality => 1.2,
            Volatility => 0.8,
            Liquidity => 1.1,
        },
        RegimeLabel::RiskOffStrong => match factor {
            Momentum => 0.5,
            Value => 1.2,
            Quality => 1.3,
            Volatility => 0.7,
            Liquidity => 1.2,
        },
    }
}

/// Resolved weights: base x tolerance x regime, renormalized to sum 1.0.
///
/// Indexed by `Factor::ALL` order.
pub fn resolve(
    objective: Objective,
    tolerance: RiskTolerance,
    regime: RegimeLabel,
) -> [f64; Factor::COUNT] {
    let mut weights = [0.0; Factor::COUNT];
    for (i, &factor) in Factor::ALL.iter().enumerate() {
        weights[i] = base_weight(objective, factor)
            * tolerance_multiplier(tolerance, factor)
            * regime_multiplier(regime, factor);
    }
    let total: f64 = weights.iter().sum();
    debug_assert!(total > 0.0, "weight product must be positive");
    for w in &mut weights {
        *w /= total;
    }
    weights
}
