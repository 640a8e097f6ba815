//! Dynamic Scoring Engine — per-asset multi-factor scores whose weights
//! depend on both the parsed intent and the prevailing regime.

pub mod engine;
pub mod weights;
pub mod zscore;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use engine::{score_universe, ScoringOutcome};

/// The five scoring factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Momentum,
    Value,
    Quality,
    Volatility,
    Liquidity,
}

impl Factor {
    pub const COUNT: usize = 5;
    pub const ALL: [Factor; Factor::COUNT] = [
        Factor::Momentum,
        Factor::Value,
        Factor::Quality,
        Factor::Volatility,
        Factor::Liquidity,
    ];

    pub fn index(self) -> usize {
        match self {
            Factor::Momentum => 0,
            Factor::Value => 1,
            Factor::Quality => 2,
            Factor::Volatility => 3,
            Factor::Liquidity => 4,
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Factor::Momentum => "momentum",
            Factor::Value => "value",
            Factor::Quality => "quality",
            Factor::Volatility => "volatility",
            Factor::Liquidity => "liquidity",
        };
        f.write_str(s)
    }
}

/// One scored candidate, recomputed on every pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredAsset {
    pub ticker: String,
    pub sector: String,
    /// Per-factor z-scores after the priority boost.
    pub factor_scores: BTreeMap<Factor, f64>,
    /// Weighted sum of factor scores under the resolved weight table.
    pub composite_score: f64,
    /// 1-based rank within the scored universe (1 = best).
    pub rank: usize,
    /// Raw liquidity score carried for deterministic tie-breaking.
    pub liquidity: f64,
    /// True when the asset had less history than the minimum window and was
    /// scored neutrally instead of z-scored.
    pub short_history: bool,
}
