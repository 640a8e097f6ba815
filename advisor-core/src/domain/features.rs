//! Per-asset feature inputs — the contract with the external feature provider.
//!
//! The core consumes these snapshots, never mutates them, and performs no
//! I/O to obtain them: the caller resolves everything before the pipeline
//! starts. Missing values are explicit `Option`s, not sentinels.

use serde::{Deserialize, Serialize};

/// Fundamental ratios for one asset, as of the evaluation date.
///
/// All fields optional: the provider marks missing data explicitly and the
/// scoring engine degrades to a neutral factor score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalRatios {
    /// Price / earnings multiple.
    pub price_earnings: Option<f64>,
    /// Price / book multiple.
    pub price_book: Option<f64>,
    /// Dividend yield as a fraction.
    pub dividend_yield: Option<f64>,
    /// Return on equity as a fraction.
    pub return_on_equity: Option<f64>,
    /// Net margin as a fraction.
    pub net_margin: Option<f64>,
}

/// Raw factor inputs for one candidate asset on one evaluation date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetFeatureSet {
    pub ticker: String,
    pub sector: String,

    /// Trailing total returns over ~3/6/12 month windows, as fractions.
    pub momentum_63d: Option<f64>,
    pub momentum_126d: Option<f64>,
    pub momentum_252d: Option<f64>,

    /// Annualized volatility over ~1/3/6 month windows.
    pub vol_21d: Option<f64>,
    pub vol_63d: Option<f64>,
    pub vol_126d: Option<f64>,

    /// Normalized liquidity score in [0, 1] from the feature provider.
    pub liquidity_score: Option<f64>,

    pub fundamentals: FundamentalRatios,

    /// Trading days of price history behind these features. Assets below
    /// the minimum window are scored neutrally rather than z-scored.
    pub history_days: u32,
}

impl AssetFeatureSet {
    /// Bare feature set with everything missing — useful as a test scaffold.
    pub fn empty(ticker: &str, sector: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            sector: sector.to_string(),
            momentum_63d: None,
            momentum_126d: None,
            momentum_252d: None,
            vol_21d: None,
            vol_63d: None,
            vol_126d: None,
            liquidity_score: None,
            fundamentals: FundamentalRatios::default(),
            history_days: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_metrics() {
        let fs = AssetFeatureSet::empty("PETR4", "energy");
        assert_eq!(fs.ticker, "PETR4");
        assert!(fs.momentum_63d.is_none());
        assert!(fs.fundamentals.return_on_equity.is_none());
        assert_eq!(fs.history_days, 0);
    }

    #[test]
    fn round_trips_through_json() {
        let mut fs = AssetFeatureSet::empty("VALE3", "materials");
        fs.momentum_63d = Some(0.12);
        fs.vol_63d = Some(0.28);
        fs.history_days = 400;
        let json = serde_json::to_string(&fs).unwrap();
        let back: AssetFeatureSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ticker, "VALE3");
        assert_eq!(back.momentum_63d, Some(0.12));
        assert_eq!(back.history_days, 400);
    }
}
