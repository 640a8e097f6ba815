//! Criterion benchmarks for the pipeline hot paths.
//!
//! 1. Full pipeline run over growing universes
//! 2. Scoring engine alone (the parallel stage)
//! 3. Intent parsing (pure string work)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use advisor_core::config::AdvisorConfig;
use advisor_core::domain::{AssetFeatureSet, MacroIndicator, MacroSnapshot};
use advisor_core::pipeline::{Pipeline, PipelineInput};
use advisor_core::{intent, regime, scoring};
use chrono::NaiveDate;

fn make_universe(n: usize) -> Vec<AssetFeatureSet> {
    let sectors = ["fin", "energy", "retail", "health", "tech"];
    (0..n)
        .map(|i| {
            let mut fs = AssetFeatureSet::empty(&format!("T{i:04}"), sectors[i % sectors.len()]);
            fs.momentum_63d = Some((i as f64 * 0.37).sin() * 0.2);
            fs.momentum_126d = Some((i as f64 * 0.11).cos() * 0.15);
            fs.momentum_252d = Some((i as f64 * 0.05).sin() * 0.25);
            fs.vol_21d = Some(0.18 + (i % 7) as f64 * 0.01);
            fs.vol_63d = Some(0.17 + (i % 11) as f64 * 0.01);
            fs.liquidity_score = Some(0.4 + (i % 6) as f64 * 0.1);
            fs.fundamentals.price_earnings = Some(8.0 + (i % 20) as f64);
            fs.fundamentals.return_on_equity = Some(0.05 + (i % 10) as f64 * 0.02);
            fs.history_days = 500;
            fs
        })
        .collect()
}

fn make_snapshot() -> MacroSnapshot {
    MacroSnapshot::new()
        .with(MacroIndicator::YieldCurve, -0.01)
        .with(MacroIndicator::RiskSpread, 0.002)
        .with(MacroIndicator::IndexTrend, 0.8)
        .with(MacroIndicator::CapitalFlow, -0.3)
        .with(MacroIndicator::LiquiditySentiment, 0.5)
}

fn bench_full_pipeline(c: &mut Criterion) {
    let pipeline = Pipeline::new(AdvisorConfig::default());
    let mut group = c.benchmark_group("pipeline_run");
    for n in [50, 200, 1000] {
        let input = PipelineInput {
            evaluation_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            prompt: "quero alto retorno em 30 dias".to_string(),
            features: make_universe(n),
            macro_snapshot: make_snapshot(),
        };
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| pipeline.run(black_box(input)).expect("run"));
        });
    }
    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let parsed = intent::parse("crescimento com qualidade para longo prazo").expect("intent");
    let state = regime::classify(&make_snapshot());
    let features = make_universe(500);
    c.bench_function("score_universe_500", |b| {
        b.iter(|| scoring::score_universe(black_box(&features), &parsed, &state));
    });
}

fn bench_intent_parse(c: &mut Criterion) {
    c.bench_function("intent_parse", |b| {
        b.iter(|| {
            intent::parse(black_box(
                "especular no curto prazo aceitando alto risco, alvo de 20% em 60 dias",
            ))
        });
    });
}

criterion_group!(benches, bench_full_pipeline, bench_scoring, bench_intent_parse);
criterion_main!(benches);
