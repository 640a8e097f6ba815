//! Scoring engine: features + intent + regime to a ranked candidate list.
//!
//! Per-asset work is parallelized with rayon; ranking and renormalization
//! are order-independent pure functions over the full candidate set, so
//! execution order never affects the result.

use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::domain::{AssetFeatureSet, InvestmentIntent, RegimeState};

use super::weights;
use super::zscore::zscore_column;
use super::{Factor, ScoredAsset};

/// Minimum trading days of history for an asset to participate in
/// cross-sectional z-scoring. Below this it scores neutral.
pub const MIN_HISTORY_DAYS: u32 = 252;

/// Pre-scoring volatility filter: assets whose own volatility exceeds the
/// intent ceiling by more than this factor are dropped from the universe.
const ASSET_VOL_FILTER_BAND: f64 = 1.5;

/// Boost applied to the intent's top priority factors.
const PRIORITY_BOOST: f64 = 1.2;
const PRIORITY_BOOST_COUNT: usize = 2;

/// Result of scoring one universe.
#[derive(Debug, Clone)]
pub struct ScoringOutcome {
    /// Ranked descending by composite score.
    pub assets: Vec<ScoredAsset>,
    /// Resolved factor weights used, in `Factor::ALL` order.
    pub resolved_weights: [f64; Factor::COUNT],
    /// Tickers dropped by the volatility pre-filter.
    pub dropped_high_volatility: Vec<String>,
    /// Tickers dropped by the minimum-liquidity filter.
    pub dropped_illiquid: Vec<String>,
}

/// Score and rank the candidate universe for one evaluation date.
pub fn score_universe(
    features: &[AssetFeatureSet],
    intent: &InvestmentIntent,
    regime: &RegimeState,
) -> ScoringOutcome {
    let resolved =
        weights::resolve(intent.objective, intent.risk_tolerance, regime.label);

    // Universe filters from the intent: per-asset volatility ceiling and
    // minimum liquidity. Dropped tickers are reported, not silently lost.
    let mut dropped_high_volatility = Vec::new();
    let mut dropped_illiquid = Vec::new();
    let eligible: Vec<&AssetFeatureSet> = features
        .iter()
        .filter(|fs| {
            if let Some(vol) = fs.vol_63d {
                if vol > intent.max_volatility * ASSET_VOL_FILTER_BAND {
                    dropped_high_volatility.push(fs.ticker.clone());
                    return false;
                }
            }
            if fs.liquidity_score.unwrap_or(0.0) < intent.min_liquidity {
                dropped_illiquid.push(fs.ticker.clone());
                return false;
            }
            true
        })
        .collect();

    let columns = raw_columns(&eligible);
    let z: BTreeMap<Factor, Vec<f64>> = columns
        .into_iter()
        .map(|(factor, col)| (factor, zscore_column(&col)))
        .collect();

    let mut assets: Vec<ScoredAsset> = eligible
        .par_iter()
        .enumerate()
        .map(|(i, fs)| {
            let short_history = fs.history_days < MIN_HISTORY_DAYS;
            let mut factor_scores = BTreeMap::new();
            for &factor in &Factor::ALL {
                let mut score = if short_history { 0.0 } else { z[&factor][i] };
                if intent
                    .priority_factors
                    .iter()
                    .take(PRIORITY_BOOST_COUNT)
                    .any(|&p| p == factor)
                {
                    score *= PRIORITY_BOOST;
                }
                factor_scores.insert(factor, score);
            }
            let composite_score = Factor::ALL
                .iter()
                .map(|&f| factor_scores[&f] * resolved[f.index()])
                .sum();
            ScoredAsset {
                ticker: fs.ticker.clone(),
                sector: fs.sector.clone(),
                factor_scores,
                composite_score,
                rank: 0,
                liquidity: fs.liquidity_score.unwrap_or(0.0),
                short_history,
            }
        })
        .collect();

    rank(&mut assets);

    ScoringOutcome {
        assets,
        resolved_weights: resolved,
        dropped_high_volatility,
        dropped_illiquid,
    }
}

/// Sort descending by composite score and assign 1-based ranks.
///
/// Ties break by higher liquidity score, then lexical ticker order, so the
/// ranking is fully deterministic.
fn rank(assets: &mut [ScoredAsset]) {
    assets.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.liquidity
                    .partial_cmp(&a.liquidity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    for (i, asset) in assets.iter_mut().enumerate() {
        asset.rank = i + 1;
    }
}

/// Raw metric per factor per asset, in eligible order. `None` marks a
/// missing metric, which z-scores to neutral. Short-history assets are
/// excluded from every column so they cannot skew the cross-section.
fn raw_columns(eligible: &[&AssetFeatureSet]) -> Vec<(Factor, Vec<Option<f64>>)> {
    let col = |metric: fn(&AssetFeatureSet) -> Option<f64>| -> Vec<Option<f64>> {
        eligible
            .iter()
            .map(|fs| {
                if fs.history_days < MIN_HISTORY_DAYS {
                    None
                } else {
                    metric(fs)
                }
            })
            .collect()
    };
    let momentum = col(momentum_raw);
    let value = col(value_raw);
    let quality = col(quality_raw);
    let volatility = col(volatility_raw);
    let liquidity = col(|fs| fs.liquidity_score);
    vec![
        (Factor::Momentum, momentum),
        (Factor::Value, value),
        (Factor::Quality, quality),
        (Factor::Volatility, volatility),
        (Factor::Liquidity, liquidity),
    ]
}

/// Composite momentum: 0.4/0.3/0.3 over the 3/6/12 month windows.
/// Missing windows contribute zero; all-missing is a missing metric.
fn momentum_raw(fs: &AssetFeatureSet) -> Option<f64> {
    if fs.momentum_63d.is_none() && fs.momentum_126d.is_none() && fs.momentum_252d.is_none() {
        return None;
    }
    Some(
        0.4 * fs.momentum_63d.unwrap_or(0.0)
            + 0.3 * fs.momentum_126d.unwrap_or(0.0)
            + 0.3 * fs.momentum_252d.unwrap_or(0.0),
    )
}

/// Inverse volatility: lower realized vol scores higher. Prefers the 63d
/// window, falling back to the longer then shorter one.
fn volatility_raw(fs: &AssetFeatureSet) -> Option<f64> {
    let vol = fs.vol_63d.or(fs.vol_126d).or(fs.vol_21d)?;
    Some(1.0 / (vol + 1e-3))
}

/// Value composite from inverse multiples and dividend yield.
fn value_raw(fs: &AssetFeatureSet) -> Option<f64> {
    let f = &fs.fundamentals;
    let mut score = 0.0;
    let mut weight = 0.0;
    if let Some(pe) = f.price_earnings.filter(|&v| v != 0.0) {
        score += 0.4 * (1.0 / pe);
        weight += 0.4;
    }
    if let Some(pb) = f.price_book.filter(|&v| v != 0.0) {
        score += 0.3 * (1.0 / pb);
        weight += 0.3;
    }
    if let Some(dy) = f.dividend_yield {
        score += 0.3 * dy;
        weight += 0.3;
    }
    if weight == 0.0 {
        None
    } else {
        Some(score / weight)
    }
}

/// Quality composite: mean of the available profitability ratios.
fn quality_raw(fs: &AssetFeatureSet) -> Option<f64> {
    let f = &fs.fundamentals;
    let parts: Vec<f64> = [f.return_on_equity, f.net_margin]
        .into_iter()
        .flatten()
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.iter().sum::<f64>() / parts.len() as f64)
    }
}
