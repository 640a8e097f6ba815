//! Regime Classifier — macro indicator readings to a discrete risk-appetite label.
//!
//! Stateless: each evaluation date is classified independently from its own
//! snapshot. A missing reading scores neutral (0) and the substitution is
//! recorded on the `RegimeState` so the final rationale can surface it.

pub mod thresholds;

use crate::domain::{MacroIndicator, MacroSnapshot, RegimeLabel, RegimeState};
use std::collections::BTreeMap;

use thresholds::{max_score, scale_for, weight_for, LEAN_FRACTION, STRONG_FRACTION};

/// Classify a macro snapshot into a regime state.
pub fn classify(snapshot: &MacroSnapshot) -> RegimeState {
    let mut components = BTreeMap::new();
    let mut substituted = Vec::new();
    let mut score = 0.0;

    for indicator in MacroIndicator::ALL {
        let component = match snapshot.get(indicator) {
            Some(metric) => scale_for(indicator).score(metric),
            None => {
                substituted.push(indicator);
                0
            }
        };
        components.insert(indicator, component);
        score += f64::from(component) * weight_for(indicator);
    }

    RegimeState {
        label: label_for_score(score),
        score,
        components,
        substituted,
    }
}

/// Pure threshold lookup from weighted score to label.
///
/// A score exactly at a boundary resolves to the more cautious label: the
/// risk-on thresholds are strict, the risk-off thresholds inclusive.
pub fn label_for_score(score: f64) -> RegimeLabel {
    let max = max_score();
    if score > STRONG_FRACTION * max {
        RegimeLabel::RiskOnStrong
    } else if score <= -STRONG_FRACTION * max {
        RegimeLabel::RiskOffStrong
    } else if score <= -LEAN_FRACTION * max {
        RegimeLabel::RiskOff
    } else if score > LEAN_FRACTION * max {
        RegimeLabel::RiskOn
    } else {
        RegimeLabel::Transition
    }
}
