//! Simulation runner: validate, draw the population, price the promotions,
//! reduce to a report.

use super::bonus::BonusSchedule;
use super::config::SimConfig;
use super::population::{PlayerSampler, Population, RandomSampler};
use super::report::SimReport;
use crate::error::Result;
use tracing::{debug, info};

/// Run the full simulation and return a report.
///
/// Parameters are validated before the random stream is created, so a rejected
/// config never consumes randomness. An unseeded config gets a seed drawn from
/// entropy, and the report records it so the run can be replayed.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport> {
    config.validate()?;
    let config = SimConfig {
        seed: Some(config.seed.unwrap_or_else(rand::random)),
        ..config.clone()
    };
    let mut sampler = RandomSampler::new(config.seed);
    Ok(simulate_validated(&config, &mut sampler))
}

/// Run with a caller-supplied draw source.
pub fn simulate_with<S: PlayerSampler + ?Sized>(
    config: &SimConfig,
    sampler: &mut S,
) -> Result<SimReport> {
    config.validate()?;
    Ok(simulate_validated(config, sampler))
}

/// One-shot entry point taking the four economic inputs directly, with an
/// unseeded stream and no loss cap.
pub fn simulate(
    num_players: u32,
    house_edge: f64,
    bonus_schedule: BonusSchedule,
    loseback_rate: f64,
) -> Result<SimReport> {
    run_simulation(&SimConfig {
        num_players,
        house_edge,
        loseback_rate,
        bonus_schedule,
        ..Default::default()
    })
}

fn simulate_validated<S: PlayerSampler + ?Sized>(
    config: &SimConfig,
    sampler: &mut S,
) -> SimReport {
    info!(
        num_players = config.num_players,
        house_edge = config.house_edge,
        loseback_rate = config.loseback_rate,
        bonus_categories = config.bonus_schedule.len(),
        seed = ?config.seed,
        "starting simulation"
    );

    let population = Population::draw(
        config.num_players as usize,
        config.house_edge,
        config.loss_cap,
        sampler,
    );
    debug!(players = population.len(), "population drawn");

    let ledger = Ledger::settle(&population, config);
    let report = SimReport::from_ledger(&population, &ledger, config);

    info!(
        total_wager = report.total_wager,
        total_actual_profit = report.total_actual_profit,
        actual_rtp = report.actual_rtp,
        profitable_players = report.profitable_players,
        "simulation complete"
    );

    report
}

/// Per-player promotion cost and house profit, parallel to the population.
#[derive(Debug, Clone, Default)]
pub(super) struct Ledger {
    /// Σ over categories of `wager × house_edge × rate`
    pub wager_bonus: Vec<f64>,
    pub loseback: Vec<f64>,
    pub total_bonus: Vec<f64>,
    pub actual_profit: Vec<f64>,
    pub expected_profit: Vec<f64>,
    /// Population total per bonus category, in schedule order
    pub category_totals: Vec<(String, f64)>,
}

impl Ledger {
    pub(super) fn settle(population: &Population, config: &SimConfig) -> Self {
        let n = population.len();
        let mut wager_bonus = vec![0.0; n];
        let mut category_totals = Vec::with_capacity(config.bonus_schedule.len());

        for (name, rate) in config.bonus_schedule.iter() {
            let payouts: Vec<f64> = population
                .wagers
                .iter()
                .map(|wager| wager * config.house_edge * rate)
                .collect();
            for (acc, payout) in wager_bonus.iter_mut().zip(&payouts) {
                *acc += payout;
            }
            category_totals.push((name.to_string(), payouts.iter().sum()));
            debug!(category = name, rate, "bonus category priced");
        }

        let loseback: Vec<f64> = population
            .actual_losses
            .iter()
            .map(|loss| loss * config.loseback_rate)
            .collect();

        let total_bonus: Vec<f64> = wager_bonus
            .iter()
            .zip(&loseback)
            .map(|(bonus, loseback)| bonus + loseback)
            .collect();

        let actual_profit: Vec<f64> = population
            .actual_losses
            .iter()
            .zip(&total_bonus)
            .map(|(loss, bonus)| loss - bonus)
            .collect();

        let expected_profit: Vec<f64> = population
            .expected_losses
            .iter()
            .zip(&wager_bonus)
            .map(|(loss, bonus)| loss - bonus)
            .collect();

        Self {
            wager_bonus,
            loseback,
            total_bonus,
            actual_profit,
            expected_profit,
            category_totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::simulator::config::LossCap;

    /// Replays fixed draws, cycling when a sequence is shorter than the population.
    struct ScriptedSampler {
        deposits: Vec<f64>,
        multipliers: Vec<f64>,
        losses: Vec<f64>,
        cursors: [usize; 3],
    }

    impl ScriptedSampler {
        fn new(deposits: Vec<f64>, multipliers: Vec<f64>, losses: Vec<f64>) -> Self {
            Self {
                deposits,
                multipliers,
                losses,
                cursors: [0; 3],
            }
        }

        fn calls(&self) -> usize {
            self.cursors.iter().sum()
        }

        fn next(values: &[f64], cursor: &mut usize) -> f64 {
            let value = values[*cursor % values.len()];
            *cursor += 1;
            value
        }
    }

    impl PlayerSampler for ScriptedSampler {
        fn deposit(&mut self) -> f64 {
            Self::next(&self.deposits, &mut self.cursors[0])
        }

        fn wager_multiplier(&mut self) -> f64 {
            Self::next(&self.multipliers, &mut self.cursors[1])
        }

        fn actual_loss(&mut self, _expected_loss: f64) -> f64 {
            Self::next(&self.losses, &mut self.cursors[2])
        }
    }

    #[test]
    fn test_ledger_two_player_scenario() {
        let config = SimConfig {
            num_players: 2,
            house_edge: 0.01,
            loseback_rate: 0.0,
            bonus_schedule: BonusSchedule::new().with("A", 0.5),
            ..Default::default()
        };
        let mut sampler = ScriptedSampler::new(vec![100.0], vec![10.0], vec![10.0]);
        let population = Population::draw(2, 0.01, LossCap::None, &mut sampler);
        let ledger = Ledger::settle(&population, &config);

        for i in 0..2 {
            assert!((population.wagers[i] - 1000.0).abs() < 1e-9);
            assert!((population.expected_losses[i] - 10.0).abs() < 1e-9);
            assert!((ledger.wager_bonus[i] - 5.0).abs() < 1e-9);
            assert_eq!(ledger.loseback[i], 0.0);
            assert!((ledger.total_bonus[i] - 5.0).abs() < 1e-9);
            assert!((ledger.actual_profit[i] - 5.0).abs() < 1e-9);
            assert!((ledger.expected_profit[i] - 5.0).abs() < 1e-9);
        }
        assert_eq!(ledger.category_totals.len(), 1);
        assert!((ledger.category_totals[0].1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_loseback_counts_in_actual_not_expected_profit() {
        let config = SimConfig {
            num_players: 1,
            house_edge: 0.02,
            loseback_rate: 0.1,
            bonus_schedule: BonusSchedule::new(),
            ..Default::default()
        };
        let mut sampler = ScriptedSampler::new(vec![500.0], vec![100.0], vec![1_500.0]);
        let report = simulate_with(&config, &mut sampler).unwrap();

        // wager 50_000, expected loss 1_000, actual loss 1_500, loseback 150
        assert!((report.total_expected_profit - 1_000.0).abs() < 1e-9);
        assert!((report.total_actual_profit - 1_350.0).abs() < 1e-9);
        assert!((report.total_bonuses_paid - 150.0).abs() < 1e-9);
        assert!((report.total_loseback_paid - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_draws_nothing() {
        let config = SimConfig {
            num_players: 0,
            ..Default::default()
        };
        let mut sampler = ScriptedSampler::new(vec![1.0], vec![10.0], vec![0.0]);
        let result = simulate_with(&config, &mut sampler);

        assert!(matches!(result, Err(SimError::InvalidParameter { .. })));
        assert_eq!(sampler.calls(), 0);
    }

    #[test]
    fn test_player_ahead_when_bonus_exceeds_loss() {
        let config = SimConfig {
            num_players: 2,
            house_edge: 0.01,
            loseback_rate: 0.0,
            bonus_schedule: BonusSchedule::new().with("A", 0.5),
            ..Default::default()
        };
        // second player loses nothing but still collects the wager bonus
        let mut sampler = ScriptedSampler::new(vec![100.0], vec![10.0], vec![10.0, 0.0]);
        let report = simulate_with(&config, &mut sampler).unwrap();

        assert_eq!(report.profitable_players, 1);
        assert_eq!(report.losing_players, 1);
        assert!((report.profitable_player_percentage - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_simulation() {
        let config = SimConfig {
            num_players: 2_000,
            seed: Some(42),
            ..Default::default()
        };

        let report = run_simulation(&config).unwrap();

        assert_eq!(report.total_players, 2_000);
        assert!(report.total_wager > 0.0);
        assert!(report.total_actual_loss >= 0.0);
        assert_eq!(report.seed, Some(42));
    }

    #[test]
    fn test_total_bonus_non_negative_per_player() {
        for seed in 0..10 {
            let config = SimConfig {
                num_players: 3_000,
                house_edge: 0.1,
                seed: Some(seed),
                ..Default::default()
            };
            let mut sampler = RandomSampler::new(config.seed);
            let population = Population::draw(3_000, 0.1, LossCap::None, &mut sampler);
            let ledger = Ledger::settle(&population, &config);

            assert_eq!(ledger.total_bonus.len(), 3_000);
            assert!(ledger.total_bonus.iter().all(|&b| b >= 0.0));
            assert!(ledger.wager_bonus.iter().all(|&b| b >= 0.0));
            assert!(ledger.loseback.iter().all(|&b| b >= 0.0));
        }
    }

    #[test]
    fn test_unseeded_run_records_replayable_seed() {
        let config = SimConfig {
            num_players: 500,
            ..Default::default()
        };
        let first = run_simulation(&config).unwrap();
        let seed = first.seed.expect("unseeded run should record its seed");

        let replay = run_simulation(&SimConfig {
            seed: Some(seed),
            ..config
        })
        .unwrap();
        assert_eq!(first, replay);
    }

    #[test]
    fn test_simulate_entry_point() {
        let report = simulate(10, 0.01, BonusSchedule::default(), 0.02).unwrap();
        assert_eq!(report.total_players, 10);
        assert!(report.seed.is_some());
        assert!(simulate(10, -0.01, BonusSchedule::default(), 0.02).is_err());
    }
}
