//! Promotional bonus schedule.
//!
//! Each category pays `wager × house_edge × rate` per player. Loseback is not a
//! category here since it depends on realized loss; see `SimConfig::loseback_rate`.

use crate::error::{Result, SimError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const WEEKLY_BONUS: &str = "Weekly Bonus";
pub const MONTHLY_BONUS: &str = "Monthly Bonus";
pub const RAKEBACK: &str = "Rakeback";

/// Bonus category name → payout rate. Keys are unique; insertion order is kept
/// for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BonusSchedule {
    rates: IndexMap<String, f64>,
}

impl Default for BonusSchedule {
    fn default() -> Self {
        Self::new()
            .with(WEEKLY_BONUS, 0.08)
            .with(MONTHLY_BONUS, 0.05)
            .with(RAKEBACK, 0.10)
    }
}

impl BonusSchedule {
    /// An empty schedule (no promotions).
    pub fn new() -> Self {
        Self {
            rates: IndexMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, rate: f64) -> Self {
        self.insert(name, rate);
        self
    }

    /// Set the rate for a category, returning the previous rate if it existed.
    pub fn insert(&mut self, name: impl Into<String>, rate: f64) -> Option<f64> {
        self.rates.insert(name.into(), rate)
    }

    pub fn rate(&self, name: &str) -> Option<f64> {
        self.rates.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(name, rate)| (name.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Sum of all category rates.
    pub fn total_rate(&self) -> f64 {
        self.rates.values().sum()
    }

    /// Reject negative or non-finite rates.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in self.iter() {
            if !rate.is_finite() || rate < 0.0 {
                return Err(SimError::invalid(
                    "bonus_schedule",
                    format!("rate for `{name}` must be a finite value >= 0 (got {rate})"),
                ));
            }
        }
        Ok(())
    }
}

impl FromIterator<BonusEntry> for BonusSchedule {
    fn from_iter<I: IntoIterator<Item = BonusEntry>>(iter: I) -> Self {
        let mut schedule = Self::new();
        for entry in iter {
            schedule.insert(entry.name, entry.rate);
        }
        schedule
    }
}

/// One `NAME=RATE` pair, as accepted on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusEntry {
    pub name: String,
    pub rate: f64,
}

impl FromStr for BonusEntry {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, rate) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected NAME=RATE, got `{s}`"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("bonus name is empty in `{s}`"));
        }
        let rate = rate
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("bad rate in `{s}`: {e}"))?;
        Ok(Self {
            name: name.to_string(),
            rate,
        })
    }
}
