//! Market regime types — discrete risk-appetite labels and their audit trail.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Discrete market regime, ordered from maximum to minimum risk appetite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegimeLabel {
    RiskOnStrong,
    RiskOn,
    Transition,
    RiskOff,
    RiskOffStrong,
}

impl RegimeLabel {
    pub const ALL: [RegimeLabel; 5] = [
        RegimeLabel::RiskOnStrong,
        RegimeLabel::RiskOn,
        RegimeLabel::Transition,
        RegimeLabel::RiskOff,
        RegimeLabel::RiskOffStrong,
    ];
}

impl fmt::Display for RegimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RegimeLabel::RiskOnStrong => "RISK_ON_STRONG",
            RegimeLabel::RiskOn => "RISK_ON",
            RegimeLabel::Transition => "TRANSITION",
            RegimeLabel::RiskOff => "RISK_OFF",
            RegimeLabel::RiskOffStrong => "RISK_OFF_STRONG",
        };
        f.write_str(s)
    }
}

/// The five macro indicators consumed by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroIndicator {
    /// Policy-rate / yield-curve trend (falling rates = risk on).
    YieldCurve,
    /// Risk spread proxy, e.g. hard-currency trend (falling = risk on).
    RiskSpread,
    /// Benchmark equity index trend vs long moving averages.
    IndexTrend,
    /// Capital flow proxy (currency / index correlation).
    CapitalFlow,
    /// Liquidity and sentiment proxy (volume and realized vol vs baseline).
    LiquiditySentiment,
}

impl MacroIndicator {
    pub const ALL: [MacroIndicator; 5] = [
        MacroIndicator::YieldCurve,
        MacroIndicator::RiskSpread,
        MacroIndicator::IndexTrend,
        MacroIndicator::CapitalFlow,
        MacroIndicator::LiquiditySentiment,
    ];
}

impl fmt::Display for MacroIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MacroIndicator::YieldCurve => "yield_curve",
            MacroIndicator::RiskSpread => "risk_spread",
            MacroIndicator::IndexTrend => "index_trend",
            MacroIndicator::CapitalFlow => "capital_flow",
            MacroIndicator::LiquiditySentiment => "liquidity_sentiment",
        };
        f.write_str(s)
    }
}

/// Raw indicator readings for one evaluation date, as delivered by the
/// macro provider. `None` means the provider could not produce a reading;
/// the classifier substitutes a neutral score and records the substitution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacroSnapshot {
    pub readings: BTreeMap<MacroIndicator, f64>,
}

impl MacroSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, indicator: MacroIndicator, metric: f64) -> Self {
        self.readings.insert(indicator, metric);
        self
    }

    pub fn get(&self, indicator: MacroIndicator) -> Option<f64> {
        self.readings.get(&indicator).copied()
    }
}

/// Classified regime for one evaluation date.
///
/// Read-only for the remainder of the pipeline run. Component scores and
/// neutral substitutions are retained for auditability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeState {
    pub label: RegimeLabel,
    /// Weighted sum of component scores, bounded by the theoretical range.
    pub score: f64,
    /// Per-indicator integer score in {-2..+2}, keyed for stable ordering.
    pub components: BTreeMap<MacroIndicator, i8>,
    /// Indicators whose reading was missing and scored neutral (0).
    pub substituted: Vec<MacroIndicator>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_serialize_screaming_snake() {
        let json = serde_json::to_string(&RegimeLabel::RiskOnStrong).unwrap();
        assert_eq!(json, "\"RISK_ON_STRONG\"");
        let json = serde_json::to_string(&RegimeLabel::Transition).unwrap();
        assert_eq!(json, "\"TRANSITION\"");
    }

    #[test]
    fn snapshot_builder() {
        let snap = MacroSnapshot::new()
            .with(MacroIndicator::YieldCurve, -0.02)
            .with(MacroIndicator::IndexTrend, 2.0);
        assert_eq!(snap.get(MacroIndicator::YieldCurve), Some(-0.02));
        assert_eq!(snap.get(MacroIndicator::RiskSpread), None);
    }
}
