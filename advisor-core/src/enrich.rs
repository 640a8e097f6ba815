//! Output Enricher — assembles the final decision record.
//!
//! Pure formatting and cross-referencing: every number in the record is
//! copied from an upstream artifact (intent, regime, scores, assessment,
//! plan). Nothing is computed here that could disagree with the stages
//! that produced it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{
    AllocationDiagnostics, AllocationPlan, InvestmentIntent, MacroIndicator, RegimeState,
    RiskAssessment, RiskDecision,
};
use crate::scoring::{Factor, ScoredAsset, ScoringOutcome};

/// One metric compared against its intent ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskComparison {
    pub metric: String,
    pub computed: f64,
    pub limit: f64,
    pub within_limit: bool,
}

/// Sample-size context for the numbers in the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalContext {
    /// Candidates handed to the pipeline before any filtering.
    pub universe_size: usize,
    /// Candidates that survived the filters and were ranked.
    pub scored_count: usize,
    /// Ranked candidates scored neutrally for lack of history.
    pub short_history_count: usize,
    /// Minimum history window used for cross-sectional scoring.
    pub history_window_days: u32,
}

/// A condition under which the recommendation should be abandoned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidationTrigger {
    pub name: String,
    pub trigger: String,
    pub action: String,
}

/// One row of the allocation table, with its per-asset rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRow {
    pub ticker: String,
    pub sector: String,
    pub weight: f64,
    pub composite_score: f64,
    pub rank: usize,
    /// The factors that carried this asset into the selection.
    pub rationale: String,
    pub position_capped: bool,
    pub sector_trimmed: bool,
}

/// Allocation section of the record; absent on rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSection {
    pub rows: Vec<AllocationRow>,
    pub cash_weight: f64,
    pub sector_exposure: BTreeMap<String, f64>,
    pub diagnostics: AllocationDiagnostics,
}

/// The single structured output of a pipeline run.
///
/// Serializable, nested key-value with lists; no transport assumptions.
/// On rejection `allocation` is `None` and `reasons` is non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub evaluation_date: NaiveDate,
    pub prompt: String,
    pub intent: InvestmentIntent,
    pub regime: RegimeState,

    pub decision: RiskDecision,
    pub reasons: Vec<String>,
    pub risk: RiskAssessment,
    pub risk_summary: Vec<RiskComparison>,

    pub allocation: Option<AllocationSection>,
    /// Weighted factor contribution of the final portfolio.
    pub factor_breakdown: BTreeMap<Factor, f64>,
    /// The resolved weight table the scoring engine used.
    pub resolved_weights: BTreeMap<Factor, f64>,

    pub dropped_high_volatility: Vec<String>,
    pub dropped_illiquid: Vec<String>,
    pub historical_context: HistoricalContext,
    pub invalidation_triggers: Vec<InvalidationTrigger>,
    /// Macro indicators whose reading was missing and scored neutral.
    pub macro_substitutions: Vec<MacroIndicator>,

    /// Overall confidence in the recommendation, in [0, 1].
    pub recommendation_confidence: f64,
}

/// Everything the enricher cross-references, borrowed from the pipeline.
pub struct EnrichInput<'a> {
    pub evaluation_date: NaiveDate,
    pub prompt: &'a str,
    pub intent: &'a InvestmentIntent,
    pub regime: &'a RegimeState,
    pub scoring: &'a ScoringOutcome,
    pub assessment: &'a RiskAssessment,
    pub plan: Option<&'a AllocationPlan>,
    pub universe_size: usize,
}

/// Assemble the record. Accepts both outcomes: with a plan on ACCEPT,
/// without one on REJECT.
pub fn enrich(input: EnrichInput<'_>) -> DecisionRecord {
    let assessment = input.assessment;
    let intent = input.intent;

    let risk_summary = vec![
        RiskComparison {
            metric: "portfolio_volatility".to_string(),
            computed: assessment.portfolio_volatility,
            limit: intent.max_volatility,
            within_limit: assessment.portfolio_volatility <= intent.max_volatility,
        },
        RiskComparison {
            metric: "expected_max_drawdown".to_string(),
            computed: assessment.expected_max_drawdown,
            limit: intent.max_drawdown,
            within_limit: assessment.expected_max_drawdown <= intent.max_drawdown,
        },
        RiskComparison {
            metric: "concentration".to_string(),
            computed: assessment.concentration,
            limit: intent.max_concentration,
            within_limit: assessment.concentration <= intent.max_concentration,
        },
    ];

    let allocation = input.plan.map(|plan| AllocationSection {
        rows: plan
            .positions
            .iter()
            .map(|position| {
                let scored = input
                    .scoring
                    .assets
                    .iter()
                    .find(|a| a.ticker == position.ticker);
                AllocationRow {
                    ticker: position.ticker.clone(),
                    sector: position.sector.clone(),
                    weight: position.weight,
                    composite_score: position.composite_score,
                    rank: scored.map(|a| a.rank).unwrap_or(0),
                    rationale: scored.map(asset_rationale).unwrap_or_default(),
                    position_capped: position.position_capped,
                    sector_trimmed: position.sector_trimmed,
                }
            })
            .collect(),
        cash_weight: plan.cash_weight,
        sector_exposure: plan.sector_exposure.clone(),
        diagnostics: plan.diagnostics.clone(),
    });

    let factor_breakdown = factor_breakdown(input.plan, &input.scoring.assets);
    let resolved_weights = Factor::ALL
        .iter()
        .map(|&f| (f, input.scoring.resolved_weights[f.index()]))
        .collect();

    let short_history_count = input
        .scoring
        .assets
        .iter()
        .filter(|a| a.short_history)
        .count();

    DecisionRecord {
        evaluation_date: input.evaluation_date,
        prompt: input.prompt.to_string(),
        intent: intent.clone(),
        regime: input.regime.clone(),
        decision: assessment.decision,
        reasons: assessment.reasons(),
        risk: assessment.clone(),
        risk_summary,
        allocation,
        factor_breakdown,
        resolved_weights,
        dropped_high_volatility: input.scoring.dropped_high_volatility.clone(),
        dropped_illiquid: input.scoring.dropped_illiquid.clone(),
        historical_context: HistoricalContext {
            universe_size: input.universe_size,
            scored_count: input.scoring.assets.len(),
            short_history_count,
            history_window_days: crate::scoring::engine::MIN_HISTORY_DAYS,
        },
        invalidation_triggers: invalidation_triggers(intent),
        macro_substitutions: input.regime.substituted.clone(),
        recommendation_confidence: recommendation_confidence(intent, assessment),
    }
}

/// Name the two strongest factor scores for one asset.
fn asset_rationale(asset: &ScoredAsset) -> String {
    let mut scores: Vec<(&Factor, &f64)> = asset.factor_scores.iter().collect();
    scores.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    scores
        .iter()
        .take(2)
        .map(|(factor, score)| format!("{factor} {score:+.2}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Portfolio-level factor contribution: plan weight times factor score,
/// summed over the held assets. Zeroes when there is no plan.
fn factor_breakdown(
    plan: Option<&AllocationPlan>,
    scored: &[ScoredAsset],
) -> BTreeMap<Factor, f64> {
    let mut breakdown: BTreeMap<Factor, f64> = Factor::ALL.iter().map(|&f| (f, 0.0)).collect();
    let Some(plan) = plan else {
        return breakdown;
    };
    for position in &plan.positions {
        if let Some(asset) = scored.iter().find(|a| a.ticker == position.ticker) {
            for (&factor, &score) in &asset.factor_scores {
                *breakdown.entry(factor).or_insert(0.0) += score * position.weight;
            }
        }
    }
    breakdown
}

/// Exit conditions phrased from the intent's own ceilings.
fn invalidation_triggers(intent: &InvestmentIntent) -> Vec<InvalidationTrigger> {
    vec![
        InvalidationTrigger {
            name: "risk limit breach".to_string(),
            trigger: format!(
                "realized volatility above {:.1}% or drawdown beyond {:.1}%",
                intent.max_volatility * 100.0,
                intent.max_drawdown * 100.0
            ),
            action: "rebalance immediately or exit positions".to_string(),
        },
        InvalidationTrigger {
            name: "regime shift".to_string(),
            trigger: "classification moves to a risk-off label".to_string(),
            action: "re-run the pipeline; expect lower risk-asset allocation".to_string(),
        },
        InvalidationTrigger {
            name: "single-position drawdown".to_string(),
            trigger: "any held asset falls more than 15% from entry".to_string(),
            action: "review the position for exit".to_string(),
        },
        InvalidationTrigger {
            name: "concentration creep".to_string(),
            trigger: format!(
                "any single position grows past {:.1}% of the portfolio",
                intent.max_concentration * 100.0
            ),
            action: "trim back to the cap".to_string(),
        },
    ]
}

/// Coarse confidence in the overall recommendation.
fn recommendation_confidence(intent: &InvestmentIntent, assessment: &RiskAssessment) -> f64 {
    let mut confidence: f64 = 0.5;
    if assessment.decision == RiskDecision::Accept {
        confidence += 0.2;
    }
    if intent.confidence > 0.8 {
        confidence += 0.1;
    }
    if assessment.warnings.is_empty() {
        confidence += 0.1;
    }
    confidence.min(1.0)
}
