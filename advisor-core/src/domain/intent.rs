//! Structured investment intent — the parsed, validated form of a free-text prompt.
//!
//! An `InvestmentIntent` is immutable once constructed. All numeric ceilings
//! are validated at construction; downstream stages can rely on them being
//! in-domain without re-checking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::Factor;

/// What the investor is trying to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Objective {
    Return,
    Protection,
    Income,
    Speculation,
    Balanced,
}

impl Objective {
    pub const ALL: [Objective; 5] = [
        Objective::Return,
        Objective::Protection,
        Objective::Income,
        Objective::Speculation,
        Objective::Balanced,
    ];
}

/// Investment horizon bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Horizon {
    Short,
    Medium,
    Long,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::Short, Horizon::Medium, Horizon::Long];
}

/// Stated (or inferred) appetite for risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
    Speculative,
}

impl RiskTolerance {
    pub const ALL: [RiskTolerance; 4] = [
        RiskTolerance::Conservative,
        RiskTolerance::Moderate,
        RiskTolerance::Aggressive,
        RiskTolerance::Speculative,
    ];
}

/// Validation failures at intent construction.
///
/// These fire before any scoring work happens — a malformed intent never
/// reaches the pipeline proper.
#[derive(Debug, Error, PartialEq)]
pub enum IntentError {
    #[error("{field} must be within [0, 1], got {value}")]
    CeilingOutOfRange { field: &'static str, value: f64 },

    #[error("contradictory intent: SPECULATION objective with max_volatility = 0")]
    ContradictoryCeilings,

    #[error("min_liquidity must be within [0, 1], got {0}")]
    LiquidityOutOfRange(f64),

    #[error("confidence must be within [0, 1], got {0}")]
    ConfidenceOutOfRange(f64),
}

/// Structured investment intent, produced once per request.
///
/// Immutable value object. Ceilings are either explicit in the prompt or
/// derived deterministically from the `(objective, horizon)` parameter table
/// adjusted by risk tolerance — never invented per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentIntent {
    pub objective: Objective,
    pub horizon: Horizon,
    pub risk_tolerance: RiskTolerance,

    /// Maximum acceptable annualized volatility, in [0, 1].
    pub max_volatility: f64,
    /// Maximum acceptable drawdown, in [0, 1].
    pub max_drawdown: f64,
    /// Maximum weight in any single asset, in [0, 1].
    pub max_concentration: f64,
    /// Explicit return target from the prompt, if any (as a fraction).
    pub target_return: Option<f64>,

    /// Factors to emphasize, in priority order. Subset of the factor set.
    pub priority_factors: Vec<Factor>,
    /// Minimum acceptable liquidity score, in [0, 1].
    pub min_liquidity: f64,

    /// Parser certainty in [0, 1]. Low values mean the prompt was ambiguous
    /// and defaults were applied; callers must be able to see that.
    pub confidence: f64,
}

impl InvestmentIntent {
    /// Validate domain bounds and internal consistency.
    ///
    /// Called by the parser on every constructed intent; also available to
    /// callers that build intents programmatically.
    pub fn validate(&self) -> Result<(), IntentError> {
        for (field, value) in [
            ("max_volatility", self.max_volatility),
            ("max_drawdown", self.max_drawdown),
            ("max_concentration", self.max_concentration),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(IntentError::CeilingOutOfRange { field, value });
            }
        }
        if self.objective == Objective::Speculation && self.max_volatility == 0.0 {
            return Err(IntentError::ContradictoryCeilings);
        }
        if !(0.0..=1.0).contains(&self.min_liquidity) || self.min_liquidity.is_nan() {
            return Err(IntentError::LiquidityOutOfRange(self.min_liquidity));
        }
        if !(0.0..=1.0).contains(&self.confidence) || self.confidence.is_nan() {
            return Err(IntentError::ConfidenceOutOfRange(self.confidence));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_intent() -> InvestmentIntent {
        InvestmentIntent {
            objective: Objective::Balanced,
            horizon: Horizon::Medium,
            risk_tolerance: RiskTolerance::Moderate,
            max_volatility: 0.20,
            max_drawdown: 0.12,
            max_concentration: 0.15,
            target_return: None,
            priority_factors: vec![Factor::Momentum, Factor::Value],
            min_liquidity: 0.6,
            confidence: 0.8,
        }
    }

    #[test]
    fn valid_intent_passes() {
        assert!(valid_intent().validate().is_ok());
    }

    #[test]
    fn out_of_range_ceiling_rejected() {
        let mut intent = valid_intent();
        intent.max_volatility = 1.5;
        assert_eq!(
            intent.validate(),
            Err(IntentError::CeilingOutOfRange {
                field: "max_volatility",
                value: 1.5
            })
        );
    }

    #[test]
    fn nan_ceiling_rejected() {
        let mut intent = valid_intent();
        intent.max_drawdown = f64::NAN;
        assert!(intent.validate().is_err());
    }

    #[test]
    fn speculation_with_zero_volatility_is_contradictory() {
        let mut intent = valid_intent();
        intent.objective = Objective::Speculation;
        intent.max_volatility = 0.0;
        assert_eq!(intent.validate(), Err(IntentError::ContradictoryCeilings));
    }

    #[test]
    fn zero_volatility_alone_is_fine() {
        let mut intent = valid_intent();
        intent.objective = Objective::Protection;
        intent.max_volatility = 0.0;
        assert!(intent.validate().is_ok());
    }

    #[test]
    fn confidence_bounds_enforced() {
        let mut intent = valid_intent();
        intent.confidence = 1.2;
        assert_eq!(
            intent.validate(),
            Err(IntentError::ConfidenceOutOfRange(1.2))
        );
    }
}
