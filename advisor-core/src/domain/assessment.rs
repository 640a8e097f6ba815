//! Portfolio risk assessment — the output of the risk gate.
//!
//! The assessment is computed strictly before allocation. `AcceptedAssessment`
//! makes that ordering structural: the allocation engine takes it by value of
//! type, and the only way to obtain one is through an ACCEPT decision.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which risk metric a comparison refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskMetric {
    PortfolioVolatility,
    ExpectedMaxDrawdown,
    Concentration,
}

impl fmt::Display for RiskMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskMetric::PortfolioVolatility => "portfolio_volatility",
            RiskMetric::ExpectedMaxDrawdown => "expected_max_drawdown",
            RiskMetric::Concentration => "concentration",
        };
        f.write_str(s)
    }
}

/// One limit comparison: the metric, what was computed, and the ceiling it
/// was held against (after the tolerance band). Kept numeric so callers can
/// relay the exact comparison, not just prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBreach {
    pub metric: RiskMetric,
    pub computed: f64,
    pub limit: f64,
    /// Effective ceiling after the tolerance band was applied.
    pub effective_limit: f64,
}

impl RiskBreach {
    /// Human-readable form of the comparison.
    pub fn message(&self) -> String {
        format!(
            "{} {:.1}% exceeds limit {:.1}% (effective {:.1}%)",
            self.metric,
            self.computed * 100.0,
            self.limit * 100.0,
            self.effective_limit * 100.0,
        )
    }
}

impl fmt::Display for RiskBreach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Terminal outcome of the risk gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskDecision {
    Accept,
    Reject,
}

/// Full risk assessment of one candidate weighting.
///
/// Immutable once produced. A REJECT decision is a valid pipeline outcome,
/// not an error: `breaches` then holds at least one entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub portfolio_volatility: f64,
    pub expected_max_drawdown: f64,
    pub var_95: f64,
    pub var_99: f64,
    /// Herfindahl-style concentration over candidate weights, in [0, 1].
    pub concentration: f64,
    /// Weight held by the five largest candidate positions.
    pub top_5_weight: f64,

    pub decision: RiskDecision,
    /// Limit violations that caused a REJECT. Empty on ACCEPT.
    pub breaches: Vec<RiskBreach>,
    /// Non-fatal observations (e.g. concentration above the intent's cap).
    pub warnings: Vec<RiskBreach>,

    /// Per-ticker share of total portfolio variance, for the audit trail.
    pub risk_contributions: BTreeMap<String, f64>,
}

impl RiskAssessment {
    pub fn is_accept(&self) -> bool {
        self.decision == RiskDecision::Accept
    }

    /// Rendered reason strings, one per breach, in evaluation order.
    pub fn reasons(&self) -> Vec<String> {
        self.breaches.iter().map(RiskBreach::message).collect()
    }

    /// Convert into the proof-of-acceptance the allocation engine requires.
    ///
    /// Returns the assessment unchanged as an error if the decision was
    /// REJECT, so callers can still surface it.
    pub fn into_accepted(self) -> Result<AcceptedAssessment, RiskAssessment> {
        if self.is_accept() {
            Ok(AcceptedAssessment(self))
        } else {
            Err(self)
        }
    }
}

/// Proof that the risk gate accepted a candidate weighting.
///
/// The inner assessment is private; construction only happens through
/// [`RiskAssessment::into_accepted`]. Allocation cannot be reached without
/// passing the gate.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedAssessment(RiskAssessment);

impl AcceptedAssessment {
    pub fn assessment(&self) -> &RiskAssessment {
        &self.0
    }
}
