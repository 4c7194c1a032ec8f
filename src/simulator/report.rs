//! Simulation report generation.

use super::config::SimConfig;
use super::population::Population;
use super::runner::Ledger;
use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header row of the CSV export, in column order.
pub const CSV_HEADER: [&str; 12] = [
    "Total Players",
    "Total Wager",
    "Total Expected Loss",
    "Total Actual Loss",
    "Total Bonuses Paid",
    "Total Expected Profit",
    "Total Actual Profit",
    "Expected RTP",
    "Actual RTP",
    "Profitable Players",
    "Losing Players",
    "Profitable Player Percentage",
];

pub const DEFAULT_CSV_FILE: &str = "casino_simulation_results.csv";

/// Population total paid out by one bonus category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusTotal {
    pub name: String,
    pub paid: f64,
}

/// Aggregated results of one simulation run. Profit is from the house's side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub total_players: u32,
    pub total_wager: f64,
    pub total_expected_loss: f64,
    pub total_actual_loss: f64,
    /// Wager bonuses plus loseback
    pub total_bonuses_paid: f64,
    /// Expected loss minus wager bonuses; loseback depends on realized loss and is excluded
    pub total_expected_profit: f64,
    pub total_actual_profit: f64,
    pub expected_rtp: f64,
    /// NaN when nothing was wagered (serialized as `null` in JSON)
    pub actual_rtp: f64,
    /// Players who came out ahead (house profit on them was negative)
    pub profitable_players: u32,
    pub losing_players: u32,
    pub profitable_player_percentage: f64,

    // Breakdown, not part of the CSV row
    pub bonus_totals: Vec<BonusTotal>,
    /// Σ of `bonus_totals`; with `total_loseback_paid` this makes up `total_bonuses_paid`
    pub total_wager_bonuses_paid: f64,
    pub total_loseback_paid: f64,
    pub seed: Option<u64>,
}

impl SimReport {
    /// Reduce a settled population to population-level totals.
    pub(super) fn from_ledger(
        population: &Population,
        ledger: &Ledger,
        config: &SimConfig,
    ) -> Self {
        let total_players = config.num_players;

        let total_wager: f64 = population.wagers.iter().sum();
        let total_expected_loss: f64 = population.expected_losses.iter().sum();
        let total_actual_loss: f64 = population.actual_losses.iter().sum();
        let total_bonuses_paid: f64 = ledger.total_bonus.iter().sum();
        let total_expected_profit: f64 = ledger.expected_profit.iter().sum();
        let total_actual_profit: f64 = ledger.actual_profit.iter().sum();

        let expected_rtp = 1.0 - config.house_edge;
        let actual_rtp = if total_wager == 0.0 {
            f64::NAN
        } else {
            1.0 - total_actual_profit / total_wager
        };

        let losing_players = ledger.actual_profit.iter().filter(|&&p| p >= 0.0).count() as u32;
        let profitable_players = total_players - losing_players;
        let profitable_player_percentage =
            100.0 * profitable_players as f64 / total_players as f64;

        let bonus_totals = ledger
            .category_totals
            .iter()
            .map(|(name, paid)| BonusTotal {
                name: name.clone(),
                paid: *paid,
            })
            .collect();

        Self {
            total_players,
            total_wager,
            total_expected_loss,
            total_actual_loss,
            total_bonuses_paid,
            total_expected_profit,
            total_actual_profit,
            expected_rtp,
            actual_rtp,
            profitable_players,
            losing_players,
            profitable_player_percentage,
            bonus_totals,
            total_wager_bonuses_paid: ledger.wager_bonus.iter().sum(),
            total_loseback_paid: ledger.loseback.iter().sum(),
            seed: config.seed,
        }
    }

    /// Realized house profit per unit wagered. NaN when nothing was wagered.
    pub fn house_margin(&self) -> f64 {
        if self.total_wager == 0.0 {
            f64::NAN
        } else {
            self.total_actual_profit / self.total_wager
        }
    }

    /// Share of the theoretical edge the house kept after promotions.
    /// NaN when the expected loss is zero.
    pub fn edge_retention(&self) -> f64 {
        if self.total_expected_loss == 0.0 {
            f64::NAN
        } else {
            self.total_actual_profit / self.total_expected_loss
        }
    }

    pub fn csv_header() -> String {
        CSV_HEADER.join(",")
    }

    /// One data row matching [`CSV_HEADER`].
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            self.total_players,
            self.total_wager,
            self.total_expected_loss,
            self.total_actual_loss,
            self.total_bonuses_paid,
            self.total_expected_profit,
            self.total_actual_profit,
            self.expected_rtp,
            self.actual_rtp,
            self.profitable_players,
            self.losing_players,
            self.profitable_player_percentage,
        )
    }

    /// Write header plus this run's row.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", Self::csv_header())?;
        writeln!(writer, "{}", self.to_csv_row())?;
        writer.flush()?;
        Ok(())
    }

    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                 CASINO SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!("Players: {}", self.total_players));
        if let Some(seed) = self.seed {
            report.push_str(&format!("   (seed {})", seed));
        }
        report.push_str("\n\n");

        report.push_str("── VOLUME ───────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Total Wager:           {:>16.2}\n",
            self.total_wager
        ));
        report.push_str(&format!(
            "  Total Expected Loss:   {:>16.2}\n",
            self.total_expected_loss
        ));
        report.push_str(&format!(
            "  Total Actual Loss:     {:>16.2}\n\n",
            self.total_actual_loss
        ));

        report.push_str("── PROMOTIONS ───────────────────────────────────────────────────\n");
        for bonus in &self.bonus_totals {
            report.push_str(&format!("  {:<22} {:>16.2}\n", bonus.name, bonus.paid));
        }
        report.push_str(&format!(
            "  Wager Bonuses:         {:>16.2}\n",
            self.total_wager_bonuses_paid
        ));
        report.push_str(&format!(
            "  {:<22} {:>16.2}\n",
            "Loseback", self.total_loseback_paid
        ));
        report.push_str(&format!(
            "  Total Bonuses Paid:    {:>16.2}\n\n",
            self.total_bonuses_paid
        ));

        report.push_str("── HOUSE PROFIT ─────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Expected Profit:       {:>16.2}\n",
            self.total_expected_profit
        ));
        report.push_str(&format!(
            "  Actual Profit:         {:>16.2}\n",
            self.total_actual_profit
        ));
        report.push_str(&format!(
            "  House Margin:          {:>16}\n\n",
            percent(self.house_margin())
        ));

        report.push_str("── RETURN TO PLAYER ─────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Expected RTP:          {:>16}\n",
            percent(self.expected_rtp)
        ));
        report.push_str(&format!(
            "  Actual RTP:            {:>16}\n\n",
            percent(self.actual_rtp)
        ));

        report.push_str("── PLAYERS ──────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Profitable Players:    {:>16}  ({:.2}%)\n",
            self.profitable_players, self.profitable_player_percentage
        ));
        report.push_str(&format!(
            "  Losing Players:        {:>16}\n\n",
            self.losing_players
        ));

        report.push_str("── ASSESSMENT ───────────────────────────────────────────────────\n");
        let retention = self.edge_retention();
        let rating = if retention.is_nan() {
            "NO EDGE - nothing expected to be won"
        } else if retention < 0.0 {
            "UNPROFITABLE - promotions cost more than the house won"
        } else if retention < 0.25 {
            "THIN - most of the edge is given back"
        } else if retention < 0.6 {
            "HEALTHY - promotions are funded by the edge"
        } else {
            "LEAN PROMOTIONS - room for richer bonuses"
        };
        report.push_str(&format!("  Edge Retained:   {}\n", percent(retention)));
        report.push_str(&format!("  Rating:          {}\n", rating));

        if self.profitable_player_percentage > 50.0 {
            report.push_str("  ⚠️  Most players finish ahead of the house\n");
        }
        if self.total_expected_profit < 0.0 {
            report.push_str("  ⚠️  Wager bonuses alone exceed the theoretical edge\n");
        }

        report.push_str("\n── FORMULAS ─────────────────────────────────────────────────────\n");
        report.push_str("  Expected Loss   = Σ Wager × House Edge\n");
        report.push_str("  Actual Loss     = Σ max(0, Normal(Expected Loss, 0.5 × Expected Loss))\n");
        report.push_str("  Bonuses Paid    = Σ Wager × House Edge × Bonus Rate\n");
        report.push_str("                    + Σ Actual Loss × Loseback\n");
        report.push_str("  Expected Profit = Expected Loss − Σ Wager × House Edge × Bonus Rate\n");
        report.push_str("  Actual Profit   = Actual Loss − Bonuses Paid\n");
        report.push_str("  Expected RTP    = 1 − House Edge\n");
        report.push_str("  Actual RTP      = 1 − Actual Profit / Wager\n");

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }
}

fn percent(fraction: f64) -> String {
    if fraction.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.3}%", fraction * 100.0)
    }
}
