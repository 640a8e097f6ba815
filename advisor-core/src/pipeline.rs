//! The pipeline — six stages wired strictly in order.
//!
//! Intent, regime, scoring, risk gate, allocation, enrichment. The single
//! branch is at the risk gate: a REJECT skips allocation and the record
//! carries the reasons. Everything is a pure computation over the snapshot
//! inputs; the pipeline performs no I/O and holds no mutable state, so
//! concurrent runs never contend.

use chrono::NaiveDate;
use thiserror::Error;

use crate::allocation;
use crate::config::AdvisorConfig;
use crate::domain::{AssetFeatureSet, IntentError, MacroSnapshot};
use crate::enrich::{enrich, DecisionRecord, EnrichInput};
use crate::intent;
use crate::regime;
use crate::risk::{self, CandidateHolding, CovarianceModel, IndependentVariance};
use crate::scoring;

/// Volatility assumed for a candidate whose feature set carries none.
/// Deliberately high so missing data never flatters the portfolio.
const FALLBACK_VOLATILITY: f64 = 0.30;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The prompt produced a malformed intent. Fails before any scoring.
    #[error("intent validation failed: {0}")]
    Intent(#[from] IntentError),
}

/// Snapshot inputs for one run. All external data is resolved before the
/// pipeline starts.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub evaluation_date: NaiveDate,
    pub prompt: String,
    pub features: Vec<AssetFeatureSet>,
    pub macro_snapshot: MacroSnapshot,
}

/// One configured pipeline. Cheap to construct; reusable across runs.
pub struct Pipeline {
    config: AdvisorConfig,
    covariance: Box<dyn CovarianceModel>,
}

impl Pipeline {
    pub fn new(config: AdvisorConfig) -> Self {
        Self {
            config,
            covariance: Box::new(IndependentVariance),
        }
    }

    /// Swap the covariance model used by the risk gate.
    pub fn with_covariance(mut self, model: Box<dyn CovarianceModel>) -> Self {
        self.covariance = model;
        self
    }

    /// Run the full pipeline over one snapshot.
    ///
    /// A risk REJECT is a successful run: the returned record has
    /// `decision = REJECT`, non-empty reasons, and no allocation. The only
    /// error is a malformed intent.
    pub fn run(&self, input: &PipelineInput) -> Result<DecisionRecord, PipelineError> {
        let parsed = intent::parse(&input.prompt)?;
        let regime_state = regime::classify(&input.macro_snapshot);
        let scoring = scoring::score_universe(&input.features, &parsed, &regime_state);

        let candidates = candidate_weighting(&scoring.assets, &input.features, regime_state.label);
        let assessment = risk::assess(
            &candidates,
            &parsed,
            regime_state.label,
            &self.config.risk,
            self.covariance.as_ref(),
        );

        let (assessment, plan) = match assessment.into_accepted() {
            Ok(proof) => {
                let plan = allocation::allocate(&scoring.assets, regime_state.label, &proof);
                (proof.assessment().clone(), Some(plan))
            }
            Err(rejected) => (rejected, None),
        };

        Ok(enrich(EnrichInput {
            evaluation_date: input.evaluation_date,
            prompt: &input.prompt,
            intent: &parsed,
            regime: &regime_state,
            scoring: &scoring,
            assessment: &assessment,
            plan: plan.as_ref(),
            universe_size: input.features.len(),
        }))
    }
}

/// The candidate weighting the risk gate evaluates: score-proportional over
/// the regime's top-N, scaled to the target risk allocation, before any
/// position cap. This is what allocation would start from, so a rejection
/// here rejects the best the ranking can offer.
fn candidate_weighting(
    ranked: &[crate::scoring::ScoredAsset],
    features: &[AssetFeatureSet],
    label: crate::domain::RegimeLabel,
) -> Vec<CandidateHolding> {
    let limits = allocation::RegimeLimits::for_regime(label);
    let selected = &ranked[..ranked.len().min(limits.position_count)];
    let scores: Vec<f64> = selected.iter().map(|a| a.composite_score).collect();
    let (weights, _) = allocation::proportional_weights(&scores, limits.target_risk_allocation);

    selected
        .iter()
        .zip(weights)
        .map(|(asset, weight)| CandidateHolding {
            ticker: asset.ticker.clone(),
            weight,
            volatility: asset_volatility(features, &asset.ticker),
        })
        .collect()
}

fn asset_volatility(features: &[AssetFeatureSet], ticker: &str) -> f64 {
    features
        .iter()
        .find(|fs| fs.ticker == ticker)
        .and_then(|fs| fs.vol_63d.or(fs.vol_126d).or(fs.vol_21d))
        .unwrap_or(FALLBACK_VOLATILITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MacroIndicator, RiskDecision};

    fn features(n: usize, vol: f64) -> Vec<AssetFeatureSet> {
        let sectors = ["fin", "energy", "retail", "health", "tech"];
        (0..n)
            .map(|i| {
                let mut fs =
                    AssetFeatureSet::empty(&format!("T{i:02}"), sectors[i % sectors.len()]);
                fs.momentum_63d = Some(0.02 + i as f64 * 0.01);
                fs.momentum_126d = Some(0.04 + i as f64 * 0.01);
                fs.vol_63d = Some(vol);
                fs.liquidity_score = Some(0.9);
                fs.history_days = 400;
                fs
            })
            .collect()
    }

    fn input(prompt: &str, vol: f64) -> PipelineInput {
        PipelineInput {
            evaluation_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            prompt: prompt.to_string(),
            features: features(20, vol),
            macro_snapshot: MacroSnapshot::new()
                .with(MacroIndicator::YieldCurve, -0.01)
                .with(MacroIndicator::IndexTrend, 1.0),
        }
    }

    #[test]
    fn calm_market_balanced_intent_allocates() {
        let pipeline = Pipeline::new(AdvisorConfig::default());
        let record = pipeline.run(&input("crescimento equilibrado", 0.18)).unwrap();
        assert_eq!(record.decision, RiskDecision::Accept);
        let allocation = record.allocation.expect("plan");
        assert!(!allocation.rows.is_empty());
        assert!(record.reasons.is_empty());
    }

    #[test]
    fn conservative_intent_with_concentrated_universe_rejects() {
        let pipeline = Pipeline::new(AdvisorConfig::default());
        // two candidates force a concentrated weighting; 12% per-asset vol
        // passes the universe filter but breaches the portfolio ceilings
        let mut concentrated = input("proteger capital, perfil conservador", 0.12);
        concentrated.features.truncate(2);
        let record = pipeline.run(&concentrated).unwrap();
        assert_eq!(record.decision, RiskDecision::Reject);
        assert!(record.allocation.is_none());
        assert!(!record.reasons.is_empty());
    }

    #[test]
    fn empty_universe_still_produces_a_record() {
        let pipeline = Pipeline::new(AdvisorConfig::default());
        let mut empty = input("crescimento equilibrado", 0.2);
        empty.features.clear();
        let record = pipeline.run(&empty).unwrap();
        assert_eq!(record.historical_context.scored_count, 0);
    }

    #[test]
    fn missing_volatility_uses_conservative_fallback() {
        let pipeline = Pipeline::new(AdvisorConfig::default());
        let mut no_vol = input("proteger capital, perfil conservador", 0.2);
        for fs in &mut no_vol.features {
            fs.vol_21d = None;
            fs.vol_63d = None;
            fs.vol_126d = None;
        }
        // 30% assumed vol breaks the conservative ceilings
        let record = pipeline.run(&no_vol).unwrap();
        assert_eq!(record.decision, RiskDecision::Reject);
    }
}
