//! Indicator scales, weights, and classification thresholds — all data,
//! no conditionals on regime identity.

use crate::domain::MacroIndicator;

/// Whether a higher raw metric means more or less risk appetite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    RiskOnWhenHigh,
    RiskOnWhenLow,
}

/// Five-bucket scale for one indicator.
///
/// `cuts` are ascending in appetite orientation. A metric exactly at a cut
/// resolves to the lower bucket (less risk appetite) — the same cautious
/// tie-break the classifier applies at the regime thresholds.
#[derive(Debug, Clone, Copy)]
pub struct BucketScale {
    pub direction: Direction,
    pub cuts: [f64; 4],
}

impl BucketScale {
    /// Map a raw metric to an integer score in {-2..+2}.
    pub fn score(&self, metric: f64) -> i8 {
        let m = match self.direction {
            Direction::RiskOnWhenHigh => metric,
            Direction::RiskOnWhenLow => -metric,
        };
        let [c0, c1, c2, c3] = self.cuts;
        if m > c3 {
            2
        } else if m > c2 {
            1
        } else if m > c1 {
            0
        } else if m > c0 {
            -1
        } else {
            -2
        }
    }
}

/// Scale for one indicator's raw reading.
///
/// Readings are the metrics the macro provider computes upstream:
/// - yield curve / risk spread: per-day trend slope of the series
/// - index trend: composite in [-2, +2] (price vs long MA + short-MA slope)
/// - capital flow: currency/index correlation in [-1, +1]
/// - liquidity/sentiment: composite in [-2, +2] (volume and vol vs baseline)
pub fn scale_for(indicator: MacroIndicator) -> BucketScale {
    match indicator {
        // Rates rising = tightening = risk off.
        MacroIndicator::YieldCurve => BucketScale {
            direction: Direction::RiskOnWhenLow,
            cuts: [-0.02, -0.005, 0.005, 0.02],
        },
        // Hard currency rising = capital flight = risk off.
        MacroIndicator::RiskSpread => BucketScale {
            direction: Direction::RiskOnWhenLow,
            cuts: [-0.02, -0.005, 0.005, 0.02],
        },
        MacroIndicator::IndexTrend => BucketScale {
            direction: Direction::RiskOnWhenHigh,
            cuts: [-1.5, -0.5, 0.5, 1.5],
        },
        // Strong negative correlation = inflow = risk on.
        MacroIndicator::CapitalFlow => BucketScale {
            direction: Direction::RiskOnWhenLow,
            cuts: [-0.75, -0.25, 0.25, 0.75],
        },
        MacroIndicator::LiquiditySentiment => BucketScale {
            direction: Direction::RiskOnWhenHigh,
            cuts: [-1.5, -0.5, 0.5, 1.5],
        },
    }
}

/// Fixed indicator weight in the regime score.
pub fn weight_for(indicator: MacroIndicator) -> f64 {
    match indicator {
        MacroIndicator::YieldCurve => 2.5,
        MacroIndicator::RiskSpread => 2.0,
        MacroIndicator::IndexTrend => 2.5,
        MacroIndicator::CapitalFlow => 1.5,
        MacroIndicator::LiquiditySentiment => 1.5,
    }
}

/// Sum of all indicator weights.
pub fn total_weight() -> f64 {
    MacroIndicator::ALL.iter().map(|&i| weight_for(i)).sum()
}

/// Theoretical maximum of the weighted score (all components at +2).
pub fn max_score() -> f64 {
    2.0 * total_weight()
}

/// Classification thresholds as fractions of the theoretical max score.
pub const STRONG_FRACTION: f64 = 0.4;
pub const LEAN_FRACTION: f64 = 0.2;
