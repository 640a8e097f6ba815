//! Allocation Engine — final per-asset weights under regime limits.
//!
//! Entry point requires an [`AcceptedAssessment`]: allocation is
//! unreachable without passing the risk gate first. Weights are
//! score-proportional over the top of the ranking, water-filled against the
//! position cap, then sector-trimmed. Whatever the caps leave unallocated
//! stays in cash and is reported, never hidden.

pub mod limits;

use std::collections::BTreeMap;

use crate::domain::{
    AcceptedAssessment, AllocationDiagnostics, AllocationPlan, PlannedPosition, RegimeLabel,
};
use crate::scoring::ScoredAsset;

pub use limits::RegimeLimits;

const MAX_REDISTRIBUTION_ROUNDS: usize = 20;
/// Gap to the target below which redistribution stops.
const TARGET_EPS: f64 = 1e-3;
const WEIGHT_EPS: f64 = 1e-9;

/// Build the final plan from an accepted ranking.
///
/// `ranked` must be sorted by rank ascending (as produced by the scoring
/// engine). The assessment proof is what makes this callable at all; the
/// plan itself derives only from scores and regime limits.
pub fn allocate(
    ranked: &[ScoredAsset],
    regime: RegimeLabel,
    proof: &AcceptedAssessment,
) -> AllocationPlan {
    debug_assert!(proof.assessment().is_accept());

    let limits = RegimeLimits::for_regime(regime);
    let mut notes = Vec::new();

    let selected: Vec<&ScoredAsset> = ranked.iter().take(limits.position_count).collect();
    if selected.is_empty() {
        notes.push("empty candidate ranking; holding cash only".to_string());
        return AllocationPlan {
            positions: vec![],
            cash_weight: 1.0,
            sector_exposure: BTreeMap::new(),
            diagnostics: AllocationDiagnostics {
                target_risk_allocation: limits.target_risk_allocation,
                achieved_risk_allocation: 0.0,
                notes,
                ..AllocationDiagnostics::default()
            },
        };
    }
    if selected.len() < limits.position_count {
        notes.push(format!(
            "only {} of {} requested positions available",
            selected.len(),
            limits.position_count
        ));
    }

    let mut slots: Vec<Slot> = selected
        .iter()
        .map(|asset| Slot {
            ticker: asset.ticker.clone(),
            sector: asset.sector.clone(),
            composite_score: asset.composite_score,
            weight: 0.0,
            capped: false,
            sector_trimmed: false,
        })
        .collect();

    seed_weights(&mut slots, limits.target_risk_allocation, &mut notes);
    water_fill(&mut slots, limits.max_position, limits.target_risk_allocation);
    let unmet_sector_caps = trim_sectors(&mut slots, &limits);

    let achieved: f64 = slots.iter().map(|s| s.weight).sum();
    let positions_capped = slots.iter().filter(|s| s.capped).count();
    let sectors_trimmed_positions = slots.iter().filter(|s| s.sector_trimmed).count();
    if limits.target_risk_allocation - achieved > 0.02 {
        notes.push(format!(
            "allocation below target: {} positions at cap, {} sector-trimmed",
            positions_capped, sectors_trimmed_positions
        ));
    }

    let mut sector_exposure: BTreeMap<String, f64> = BTreeMap::new();
    for slot in &slots {
        *sector_exposure.entry(slot.sector.clone()).or_insert(0.0) += slot.weight;
    }
    let sectors_trimmed = slots
        .iter()
        .filter(|s| s.sector_trimmed)
        .map(|s| s.sector.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    let mut positions: Vec<PlannedPosition> = slots
        .into_iter()
        .map(|s| PlannedPosition {
            ticker: s.ticker,
            sector: s.sector,
            weight: s.weight,
            composite_score: s.composite_score,
            position_capped: s.capped,
            sector_trimmed: s.sector_trimmed,
        })
        .collect();
    positions.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });

    AllocationPlan {
        cash_weight: (1.0 - achieved).max(0.0),
        positions,
        sector_exposure,
        diagnostics: AllocationDiagnostics {
            target_risk_allocation: limits.target_risk_allocation,
            achieved_risk_allocation: achieved,
            positions_capped,
            sectors_trimmed,
            unmet_sector_caps,
            notes,
        },
    }
}

struct Slot {
    ticker: String,
    sector: String,
    composite_score: f64,
    weight: f64,
    capped: bool,
    sector_trimmed: bool,
}

/// Initial score-proportional weights summing to the target.
fn seed_weights(slots: &mut [Slot], target: f64, notes: &mut Vec<String>) {
    let scores: Vec<f64> = slots.iter().map(|s| s.composite_score).collect();
    let (weights, note) = proportional_weights(&scores, target);
    for (slot, weight) in slots.iter_mut().zip(weights) {
        slot.weight = weight;
    }
    notes.extend(note);
}

/// Score-proportional weights summing to `target`.
///
/// When some scores are non-positive they are shifted by the minimum so the
/// whole selection still receives weight by rank; a pure positive-clip
/// would park most of the target in cash. The note reports the shift.
pub fn proportional_weights(scores: &[f64], target: f64) -> (Vec<f64>, Option<String>) {
    if scores.is_empty() {
        return (vec![], None);
    }
    let positive = scores.iter().filter(|s| **s > 0.0).count();
    let (effective, note): (Vec<f64>, Option<String>) = if positive < scores.len() {
        let min_score = scores.iter().copied().fold(f64::INFINITY, f64::min);
        (
            scores.iter().map(|s| s - min_score + 1e-6).collect(),
            Some(format!(
                "only {}/{} selected assets had a positive score; weights shifted by rank",
                positive,
                scores.len()
            )),
        )
    } else {
        (scores.to_vec(), None)
    };

    let total: f64 = effective.iter().sum();
    if total <= 0.0 {
        // all-equal fallback keeps the target reachable
        let equal = target / scores.len() as f64;
        return (vec![equal; scores.len()], note);
    }
    (effective.iter().map(|e| e / total * target).collect(), note)
}

/// Clip weights to the position cap and redistribute the clipped excess
/// proportionally among uncapped positions until the total reaches the
/// target, every position is at cap, or the round limit is hit.
fn water_fill(slots: &mut [Slot], cap: f64, target: f64) {
    for _ in 0..MAX_REDISTRIBUTION_ROUNDS {
        for slot in slots.iter_mut() {
            if slot.weight > cap {
                slot.weight = cap;
                slot.capped = true;
            }
        }
        let total: f64 = slots.iter().map(|s| s.weight).sum();
        let excess = target - total;
        if excess <= TARGET_EPS {
            return;
        }
        let headroom: f64 = slots
            .iter()
            .filter(|s| s.weight < cap - WEIGHT_EPS)
            .map(|s| s.weight)
            .sum();
        if headroom <= 0.0 {
            return;
        }
        for slot in slots.iter_mut() {
            if slot.weight < cap - WEIGHT_EPS {
                let share = slot.weight / headroom * excess;
                slot.weight = (slot.weight + share).min(cap);
            }
        }
    }
}

/// Scale down any sector over its cap and move the freed weight to
/// positions with both position-cap and sector-cap headroom. Sectors still
/// over cap after the round limit are reported as unmet.
fn trim_sectors(slots: &mut [Slot], limits: &RegimeLimits) -> BTreeMap<String, f64> {
    let cap = limits.max_sector_exposure;

    for _ in 0..MAX_REDISTRIBUTION_ROUNDS {
        let exposure = sector_exposure(slots);
        let Some((sector, over)) = exposure
            .iter()
            .find(|(_, e)| **e > cap + TARGET_EPS)
            .map(|(s, e)| (s.clone(), *e))
        else {
            return BTreeMap::new();
        };

        let factor = cap / over;
        let mut freed = 0.0;
        for slot in slots.iter_mut() {
            if slot.sector == sector {
                freed += slot.weight * (1.0 - factor);
                slot.weight *= factor;
                slot.sector_trimmed = true;
            }
        }

        // receivers: under the position cap, in a sector with room left
        let exposure = sector_exposure(slots);
        let receiver_mass: f64 = slots
            .iter()
            .filter(|s| can_receive(s, &exposure, limits))
            .map(|s| s.weight)
            .sum();
        if receiver_mass <= 0.0 {
            continue; // freed weight stays in cash
        }
        for slot in slots.iter_mut() {
            if can_receive(slot, &exposure, limits) {
                let share = slot.weight / receiver_mass * freed;
                slot.weight = (slot.weight + share).min(limits.max_position);
            }
        }
    }

    sector_exposure(slots)
        .into_iter()
        .filter(|(_, e)| *e > cap + TARGET_EPS)
        .collect()
}

fn sector_exposure(slots: &[Slot]) -> BTreeMap<String, f64> {
    let mut exposure: BTreeMap<String, f64> = BTreeMap::new();
    for slot in slots {
        *exposure.entry(slot.sector.clone()).or_insert(0.0) += slot.weight;
    }
    exposure
}

fn can_receive(slot: &Slot, exposure: &BTreeMap<String, f64>, limits: &RegimeLimits) -> bool {
    slot.weight < limits.max_position - WEIGHT_EPS
        && exposure
            .get(&slot.sector)
            .is_some_and(|e| *e < limits.max_sector_exposure - TARGET_EPS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RiskAssessment, RiskDecision};
    use crate::scoring::ScoredAsset;
    use std::collections::BTreeMap;

    fn proof() -> AcceptedAssessment {
        RiskAssessment {
            portfolio_volatility: 0.15,
            expected_max_drawdown: 0.30,
            var_95: 0.25,
            var_99: 0.35,
            concentration: 0.1,
            top_5_weight: 0.5,
            decision: RiskDecision::Accept,
            breaches: vec![],
            warnings: vec![],
            risk_contributions: BTreeMap::new(),
        }
        .into_accepted()
        .expect("accept")
    }

    fn asset(ticker: &str, sector: &str, score: f64, rank: usize) -> ScoredAsset {
        ScoredAsset {
            ticker: ticker.to_string(),
            sector: sector.to_string(),
            factor_scores: BTreeMap::new(),
            composite_score: score,
            rank,
            liquidity: 0.8,
            short_history: false,
        }
    }

    fn universe(n: usize, sectors: &[&str]) -> Vec<ScoredAsset> {
        (0..n)
            .map(|i| {
                asset(
                    &format!("T{i:02}"),
                    sectors[i % sectors.len()],
                    2.0 - i as f64 * 0.1,
                    i + 1,
                )
            })
            .collect()
    }

    #[test]
    fn weights_conserved_and_capped() {
        let ranked = universe(20, &["fin", "energy", "retail", "health", "tech"]);
        for regime in RegimeLabel::ALL {
            let plan = allocate(&ranked, regime, &proof());
            let limits = RegimeLimits::for_regime(regime);
            let total = plan.total_risk_weight();
            assert!(total <= limits.target_risk_allocation + 1e-6, "{regime}");
            assert!((total + plan.cash_weight - 1.0).abs() < 1e-9, "{regime}");
            for position in &plan.positions {
                assert!(position.weight <= limits.max_position + 1e-9, "{regime}");
            }
        }
    }

    #[test]
    fn higher_score_never_gets_less_weight_within_sector() {
        let ranked = universe(12, &["fin", "energy", "retail"]);
        let plan = allocate(&ranked, RegimeLabel::RiskOn, &proof());
        let by_ticker: BTreeMap<&str, f64> = plan
            .positions
            .iter()
            .map(|p| (p.ticker.as_str(), p.weight))
            .collect();
        // T00 and T03 share a sector; T00 ranks higher
        assert!(by_ticker["T00"] >= by_ticker["T03"] - 1e-9);
    }

    #[test]
    fn sector_cap_enforced() {
        // all ten candidates in one sector: exposure must be trimmed to cap
        let ranked = universe(10, &["fin"]);
        let plan = allocate(&ranked, RegimeLabel::RiskOn, &proof());
        let limits = RegimeLimits::for_regime(RegimeLabel::RiskOn);
        let exposure = plan.sector_exposure.get("fin").copied().unwrap_or(0.0);
        assert!(exposure <= limits.max_sector_exposure + TARGET_EPS);
        assert!(plan.positions.iter().any(|p| p.sector_trimmed));
        assert!(plan.diagnostics.achieved_risk_allocation < limits.target_risk_allocation);
    }

    #[test]
    fn negative_scores_are_rank_shifted_not_zeroed() {
        let mut ranked = universe(8, &["fin", "energy", "retail", "health"]);
        for (i, asset) in ranked.iter_mut().enumerate() {
            asset.composite_score = -0.1 - i as f64 * 0.1;
        }
        let plan = allocate(&ranked, RegimeLabel::Transition, &proof());
        assert!(plan.positions.iter().all(|p| p.weight > 0.0));
        // best-ranked asset still gets the largest weight
        assert_eq!(plan.positions[0].ticker, "T00");
        assert!(plan
            .diagnostics
            .notes
            .iter()
            .any(|n| n.contains("positive score")));
    }

    #[test]
    fn empty_ranking_yields_cash_plan() {
        let plan = allocate(&[], RegimeLabel::Transition, &proof());
        assert!(plan.positions.is_empty());
        assert_eq!(plan.cash_weight, 1.0);
        assert!(!plan.diagnostics.notes.is_empty());
    }

    #[test]
    fn risk_off_strong_is_nearly_all_cash() {
        let ranked = universe(10, &["fin", "energy"]);
        let plan = allocate(&ranked, RegimeLabel::RiskOffStrong, &proof());
        assert!(plan.cash_weight >= 0.94);
        assert!(plan.positions.len() <= 4);
    }

    #[test]
    fn positions_ordered_by_weight_then_ticker() {
        let ranked = universe(10, &["fin", "energy", "retail"]);
        let plan = allocate(&ranked, RegimeLabel::RiskOn, &proof());
        for pair in plan.positions.windows(2) {
            assert!(
                pair[0].weight > pair[1].weight - 1e-12
                    || (pair[0].weight == pair[1].weight && pair[0].ticker < pair[1].ticker)
            );
        }
    }
}
