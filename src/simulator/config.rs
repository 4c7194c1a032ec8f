//! Simulation configuration.

use super::bonus::BonusSchedule;
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound applied to each player's realized loss after the normal draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossCap {
    /// Only the lower clamp at zero applies.
    #[default]
    None,
    /// A player never loses more than they wagered.
    Wager,
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of simulated players (population size)
    pub num_players: u32,

    /// Nominal house advantage as a fraction of wager
    pub house_edge: f64,

    /// Fraction of realized loss returned to the player
    pub loseback_rate: f64,

    /// Wager-based promotions, each paying `wager × house_edge × rate`
    pub bonus_schedule: BonusSchedule,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    pub loss_cap: LossCap,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_players: 10_000,
            house_edge: 0.01,
            loseback_rate: 0.02,
            bonus_schedule: BonusSchedule::default(),
            seed: None,
            loss_cap: LossCap::None,
        }
    }
}

impl SimConfig {
    /// Small population with the default economics, for a fast sanity check.
    pub fn quick_check() -> Self {
        Self {
            num_players: 1_000,
            ..Default::default()
        }
    }

    /// House edge only: no wager bonuses and no loseback.
    pub fn without_promotions() -> Self {
        Self {
            loseback_rate: 0.0,
            bonus_schedule: BonusSchedule::new(),
            ..Default::default()
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Check every input. Nothing is clamped; the first bad value is reported.
    pub fn validate(&self) -> Result<()> {
        if self.num_players < 1 {
            return Err(SimError::invalid("num_players", "must be at least 1"));
        }
        check_rate("house_edge", self.house_edge)?;
        check_rate("loseback_rate", self.loseback_rate)?;
        self.bonus_schedule.validate()
    }

    /// Notes for values outside the ranges the interactive form used to allow.
    /// Advisory only: a valid config always runs.
    pub fn recommended_range_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.num_players > 100_000 {
            warnings.push(format!(
                "num_players {} is above the usual 100000 ceiling",
                self.num_players
            ));
        }
        if !(0.001..=0.1).contains(&self.house_edge) {
            warnings.push(format!(
                "house_edge {} is outside the usual 0.001..=0.1 range",
                self.house_edge
            ));
        }
        if self.loseback_rate > 0.2 {
            warnings.push(format!(
                "loseback_rate {} is above the usual 0.2 ceiling",
                self.loseback_rate
            ));
        }
        for (name, rate) in self.bonus_schedule.iter() {
            if rate > 0.2 {
                warnings.push(format!("{name} rate {rate} is above the usual 0.2 ceiling"));
            }
        }

        warnings
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SimError::invalid(name, format!("must be finite (got {value})")));
    }
    if value < 0.0 {
        return Err(SimError::invalid(name, format!("must be >= 0 (got {value})")));
    }
    Ok(())
}
