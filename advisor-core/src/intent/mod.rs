//! Intent Parser — free-text prompt to structured `InvestmentIntent`.
//!
//! Deterministic keyword and phrase matching only; no language model. The
//! same prompt always produces the same intent. An empty or unparseable
//! prompt does not fail: it yields a balanced default with low confidence
//! so the caller can tell "confidently balanced" from "defaulted".

pub mod limits;
pub mod vocab;

use crate::domain::{Horizon, InvestmentIntent, IntentError, Objective, RiskTolerance};

use limits::{adjust_for_tolerance, base_limits, DRAWDOWN_CAP, VOLATILITY_CAP};
use vocab::{
    explicit_duration, keyword_hits, numeric_mentions, HORIZON_KEYWORDS, OBJECTIVE_KEYWORDS,
    RISK_KEYWORDS,
};

/// Confidence contributions. Base alone stays below the 0.5 "defaulted"
/// line; a prompt with explicit objective and horizon clears 0.7.
const CONFIDENCE_BASE: f64 = 0.30;
const CONFIDENCE_OBJECTIVE: f64 = 0.25;
const CONFIDENCE_HORIZON: f64 = 0.20;
const CONFIDENCE_RISK: f64 = 0.15;
const CONFIDENCE_NUMERIC: f64 = 0.10;

/// Parse a prompt into a validated intent.
///
/// Detection order: objective, horizon (explicit durations outrank bare
/// keywords), risk tolerance (explicit keywords outrank the
/// objective-derived default), then the ceilings from the parameter table.
/// Explicit numeric ceilings in the prompt override the table, clamped to
/// the domain caps.
pub fn parse(prompt: &str) -> Result<InvestmentIntent, IntentError> {
    let lowered = prompt.to_lowercase();

    let objective = detect_objective(&lowered);
    let (horizon, horizon_explicit) = detect_horizon(&lowered);
    let (risk_tolerance, risk_explicit) = detect_risk_tolerance(&lowered, objective);
    let mentions = numeric_mentions(&lowered);

    let limits = adjust_for_tolerance(base_limits(objective, horizon), risk_tolerance);
    // explicit numeric ceilings in the prompt outrank the table
    let max_volatility = mentions
        .max_volatility
        .map(|v| v.min(VOLATILITY_CAP))
        .unwrap_or(limits.max_volatility);
    let max_drawdown = mentions
        .max_drawdown
        .map(|d| d.min(DRAWDOWN_CAP))
        .unwrap_or(limits.max_drawdown);

    let mut confidence = CONFIDENCE_BASE;
    if objective_keyword_present(&lowered, objective) {
        confidence += CONFIDENCE_OBJECTIVE;
    }
    if horizon_explicit {
        confidence += CONFIDENCE_HORIZON;
    }
    if risk_explicit {
        confidence += CONFIDENCE_RISK;
    }
    if mentions.any() {
        confidence += CONFIDENCE_NUMERIC;
    }
    let confidence = confidence.min(1.0);

    let intent = InvestmentIntent {
        objective,
        horizon,
        risk_tolerance,
        max_volatility,
        max_drawdown,
        max_concentration: limits.max_concentration,
        target_return: mentions.target_return,
        priority_factors: limits.priority_factors,
        min_liquidity: limits.min_liquidity,
        confidence,
    };
    intent.validate()?;
    Ok(intent)
}

/// Most-hit objective vocabulary; balanced default when nothing matches.
/// Ties keep the earlier table entry.
fn detect_objective(prompt: &str) -> Objective {
    let mut best = Objective::Balanced;
    let mut best_hits = 0;
    for (objective, keywords) in OBJECTIVE_KEYWORDS {
        let hits = keyword_hits(prompt, keywords);
        if hits > best_hits {
            best = objective;
            best_hits = hits;
        }
    }
    best
}

fn objective_keyword_present(prompt: &str, objective: Objective) -> bool {
    OBJECTIVE_KEYWORDS
        .iter()
        .find(|(o, _)| *o == objective)
        .map(|(_, keywords)| keyword_hits(prompt, keywords) > 0)
        .unwrap_or(false)
}

/// Horizon with an explicitness flag for the confidence score. An explicit
/// duration ("30 dias") counts double against bare keyword hits.
fn detect_horizon(prompt: &str) -> (Horizon, bool) {
    let duration = explicit_duration(prompt);
    let mut best = Horizon::Medium;
    let mut best_hits = 0;
    for (horizon, keywords) in HORIZON_KEYWORDS {
        let mut hits = keyword_hits(prompt, keywords);
        if duration == Some(horizon) {
            hits += 2;
        }
        if hits > best_hits {
            best = horizon;
            best_hits = hits;
        }
    }
    (best, best_hits > 0)
}

/// Explicit risk keywords win; otherwise the tolerance is inferred from the
/// objective and flagged as implicit.
fn detect_risk_tolerance(prompt: &str, objective: Objective) -> (RiskTolerance, bool) {
    let mut best = None;
    let mut best_hits = 0;
    for (tolerance, keywords) in RISK_KEYWORDS {
        let hits = keyword_hits(prompt, keywords);
        if hits > best_hits {
            best = Some(tolerance);
            best_hits = hits;
        }
    }
    if let Some(tolerance) = best {
        return (tolerance, true);
    }

    let inferred = match objective {
        Objective::Return => RiskTolerance::Aggressive,
        Objective::Protection => RiskTolerance::Conservative,
        Objective::Income => RiskTolerance::Moderate,
        Objective::Speculation => RiskTolerance::Speculative,
        Objective::Balanced => RiskTolerance::Moderate,
    };
    (inferred, false)
}
