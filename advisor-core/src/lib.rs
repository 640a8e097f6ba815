//! Advisor Core — the adaptive quantitative decision pipeline.
//!
//! Converts a natural-language investment intent plus market snapshots into
//! a risk-bounded, explainable recommendation:
//! - Intent parser (deterministic keyword/phrase matching, no LLM)
//! - Regime classifier over five macro indicators
//! - Dynamic multi-factor scoring with intent- and regime-dependent weights
//! - Risk-first gate that rejects before any capital is allocated
//! - Allocation under per-regime position and sector caps
//! - Output enricher producing a single auditable decision record
//!
//! The whole pipeline is pure: no I/O, no clocks, no randomness. Identical
//! inputs fingerprint identically.

pub mod allocation;
pub mod config;
pub mod domain;
pub mod enrich;
pub mod fingerprint;
pub mod intent;
pub mod pipeline;
pub mod regime;
pub mod risk;
pub mod scoring;
