//! Domain types — the value objects passed down the pipeline.

pub mod assessment;
pub mod features;
pub mod intent;
pub mod plan;
pub mod regime;

pub use assessment::{
    AcceptedAssessment, RiskAssessment, RiskBreach, RiskDecision, RiskMetric,
};
pub use features::{AssetFeatureSet, FundamentalRatios};
pub use intent::{Horizon, IntentError, InvestmentIntent, Objective, RiskTolerance};
pub use plan::{AllocationDiagnostics, AllocationPlan, PlannedPosition};
pub use regime::{MacroIndicator, MacroSnapshot, RegimeLabel, RegimeState};
