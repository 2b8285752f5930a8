//! Tunable constants of the PDR heuristic.
//!
//! Every number the classification uses lives here so a deployment can tune
//! behaviour without touching the algorithm, and tests can pin exact values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Criticality;

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("reserve factor for {tier} must not be negative")]
    NegativeReserveFactor { tier: &'static str },

    #[error("reserve factors must not decrease with criticality")]
    NonMonotonicReserveFactors,

    #[error("target multiplier must not be negative")]
    NegativeTargetMultiplier,

    #[error("score bands must satisfy critical > warning > healthy")]
    UnorderedScoreBands,

    #[error("summary_top_n must be at least 1")]
    EmptySummary,
}

/// Safety-reserve multiplier per criticality tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReserveFactors {
    pub low: Decimal,
    pub medium: Decimal,
    pub high: Decimal,
}

impl Default for ReserveFactors {
    fn default() -> Self {
        Self {
            low: Decimal::new(3, 1),
            medium: Decimal::new(5, 1),
            high: Decimal::ONE,
        }
    }
}

impl ReserveFactors {
    pub fn for_criticality(&self, criticality: Criticality) -> Decimal {
        match criticality {
            Criticality::Low => self.low,
            Criticality::Medium => self.medium,
            Criticality::High => self.high,
        }
    }
}

/// Base ranking score for each priority band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBands {
    pub critical: u32,
    pub warning: u32,
    pub healthy: u32,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            critical: 100,
            warning: 60,
            healthy: 30,
        }
    }
}

/// The full policy. Missing fields in a JSON override fall back to defaults.
///
/// | field                  | default          |
/// |------------------------|------------------|
/// | `reserve_factors`      | 0.3 / 0.5 / 1.0  |
/// | `target_multiplier`    | 2.5              |
/// | `aging_threshold_days` | 150              |
/// | `aging_bonus`          | 20               |
/// | `scores`               | 100 / 60 / 30    |
/// | `summary_top_n`        | 10               |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdrPolicy {
    pub reserve_factors: ReserveFactors,
    /// Target stock in months of demand. Applied to demand only, never on
    /// top of the safety reserve.
    pub target_multiplier: Decimal,
    /// Aging strictly above this many days earns the bonus.
    pub aging_threshold_days: i64,
    pub aging_bonus: u32,
    pub scores: ScoreBands,
    pub summary_top_n: usize,
}

impl Default for PdrPolicy {
    fn default() -> Self {
        Self {
            reserve_factors: ReserveFactors::default(),
            target_multiplier: Decimal::new(25, 1),
            aging_threshold_days: 150,
            aging_bonus: 20,
            scores: ScoreBands::default(),
            summary_top_n: 10,
        }
    }
}

impl PdrPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        let factors = &self.reserve_factors;
        for (tier, factor) in [
            ("low", factors.low),
            ("medium", factors.medium),
            ("high", factors.high),
        ] {
            if factor < Decimal::ZERO {
                return Err(PolicyError::NegativeReserveFactor { tier });
            }
        }
        if factors.low > factors.medium || factors.medium > factors.high {
            return Err(PolicyError::NonMonotonicReserveFactors);
        }
        if self.target_multiplier < Decimal::ZERO {
            return Err(PolicyError::NegativeTargetMultiplier);
        }
        let scores = &self.scores;
        if !(scores.critical > scores.warning && scores.warning > scores.healthy) {
            return Err(PolicyError::UnorderedScoreBands);
        }
        if self.summary_top_n == 0 {
            return Err(PolicyError::EmptySummary);
        }
        Ok(())
    }

    pub fn reserve_factor(&self, criticality: Criticality) -> Decimal {
        self.reserve_factors.for_criticality(criticality)
    }
}
