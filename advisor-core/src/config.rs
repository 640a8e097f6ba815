//! Runtime-tunable parameters, loadable from TOML.
//!
//! Everything here is an estimation-noise knob, not business logic: the
//! decision rules themselves live in the engines. Defaults reproduce the
//! standard configuration; a TOML file can override any subset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::RegimeLabel;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("tolerance_band must be >= 1.0, got {0}")]
    BandTooTight(f64),

    #[error("drawdown multiplier for {regime} must be within [1.5, 3.0], got {value}")]
    DrawdownMultiplierOutOfRange { regime: RegimeLabel, value: f64 },
}

/// Risk-gate tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Multiplier on the intent ceilings that absorbs estimation noise
    /// before a candidate is rejected.
    pub tolerance_band: f64,
    /// Expected-drawdown multiplier per regime (volatility x multiplier).
    pub drawdown_multipliers: DrawdownMultipliers,
    /// Z-values for parametric VaR.
    pub var_z_95: f64,
    pub var_z_99: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawdownMultipliers {
    pub risk_on_strong: f64,
    pub risk_on: f64,
    pub transition: f64,
    pub risk_off: f64,
    pub risk_off_strong: f64,
}

impl Default for DrawdownMultipliers {
    fn default() -> Self {
        Self {
            risk_on_strong: 1.5,
            risk_on: 1.8,
            transition: 2.0,
            risk_off: 2.5,
            risk_off_strong: 3.0,
        }
    }
}

impl DrawdownMultipliers {
    pub fn for_regime(&self, regime: RegimeLabel) -> f64 {
        match regime {
            RegimeLabel::RiskOnStrong => self.risk_on_strong,
            RegimeLabel::RiskOn => self.risk_on,
            RegimeLabel::Transition => self.transition,
            RegimeLabel::RiskOff => self.risk_off,
            RegimeLabel::RiskOffStrong => self.risk_off_strong,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            tolerance_band: 1.2,
            drawdown_multipliers: DrawdownMultipliers::default(),
            var_z_95: 1.645,
            var_z_99: 2.326,
        }
    }
}

/// Top-level configuration for a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub risk: RiskConfig,
}

impl AdvisorConfig {
    /// Parse from TOML and validate bounds.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: AdvisorConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.risk.tolerance_band < 1.0 {
            return Err(ConfigError::BandTooTight(self.risk.tolerance_band));
        }
        for regime in RegimeLabel::ALL {
            let value = self.risk.drawdown_multipliers.for_regime(regime);
            if !(1.5..=3.0).contains(&value) {
                return Err(ConfigError::DrawdownMultiplierOutOfRange { regime, value });
            }
        }
        Ok(())
    }
}
