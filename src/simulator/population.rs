//! Synthetic player population.
//!
//! Players are never materialized as records. A population is a set of
//! parallel sequences, one element per player, filled stage by stage:
//!
//! - **Deposit**: log-normal, many small deposits and a long tail of large ones
//! - **Wager multiplier**: 10x / 100x / 1000x turnover of the deposit
//! - **Actual loss**: normal around the expected loss, never negative

use super::config::LossCap;
use rand::distributions::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, LogNormal, StandardNormal};

pub const DEPOSIT_LOG_MEAN: f64 = 6.0;
pub const DEPOSIT_LOG_STD_DEV: f64 = 1.0;

pub const WAGER_MULTIPLIERS: [f64; 3] = [10.0, 100.0, 1000.0];
pub const WAGER_MULTIPLIER_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// Actual-loss standard deviation as a fraction of expected loss.
pub const LOSS_STD_DEV_FACTOR: f64 = 0.5;

/// Source of per-player random draws.
///
/// The engine asks for all deposits first, then all multipliers, then one raw
/// loss per player in order. Clamping is applied by the caller, so an
/// implementation returns the unclamped draw.
pub trait PlayerSampler {
    fn deposit(&mut self) -> f64;

    fn wager_multiplier(&mut self) -> f64;

    /// Realized loss for a player whose expected loss is `expected_loss`.
    fn actual_loss(&mut self, expected_loss: f64) -> f64;
}

/// Draws from the fixed distributions using a reproducible ChaCha stream.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: ChaCha8Rng,
    deposit: LogNormal<f64>,
    multiplier: WeightedIndex<f64>,
}

impl RandomSampler {
    /// `Some(seed)` gives a bit-reproducible stream, `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::from_rng(rng)
    }

    pub fn from_rng(rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            deposit: LogNormal::new(DEPOSIT_LOG_MEAN, DEPOSIT_LOG_STD_DEV)
                .expect("deposit log-normal parameters are constant and valid"),
            multiplier: WeightedIndex::new(WAGER_MULTIPLIER_WEIGHTS)
                .expect("multiplier weights are constant and positive"),
        }
    }
}

impl PlayerSampler for RandomSampler {
    fn deposit(&mut self) -> f64 {
        self.deposit.sample(&mut self.rng)
    }

    fn wager_multiplier(&mut self) -> f64 {
        WAGER_MULTIPLIERS[self.multiplier.sample(&mut self.rng)]
    }

    fn actual_loss(&mut self, expected_loss: f64) -> f64 {
        // Same draw as Normal::new(mean, sd).sample(), without a fallible constructor
        // per player; sd is zero when the expected loss is zero.
        let z: f64 = self.rng.sample(StandardNormal);
        expected_loss + LOSS_STD_DEV_FACTOR * expected_loss * z
    }
}

/// Drawn population, one element per player in every sequence.
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub deposits: Vec<f64>,
    pub multipliers: Vec<f64>,
    pub wagers: Vec<f64>,
    pub expected_losses: Vec<f64>,
    pub actual_losses: Vec<f64>,
}

impl Population {
    /// Draw `num_players` players and derive wagers and losses.
    pub fn draw<S: PlayerSampler + ?Sized>(
        num_players: usize,
        house_edge: f64,
        loss_cap: LossCap,
        sampler: &mut S,
    ) -> Self {
        let deposits: Vec<f64> = (0..num_players).map(|_| sampler.deposit()).collect();
        let multipliers: Vec<f64> = (0..num_players)
            .map(|_| sampler.wager_multiplier())
            .collect();

        let wagers: Vec<f64> = deposits
            .iter()
            .zip(&multipliers)
            .map(|(deposit, multiplier)| deposit * multiplier)
            .collect();

        let expected_losses: Vec<f64> = wagers.iter().map(|wager| wager * house_edge).collect();

        let actual_losses: Vec<f64> = expected_losses
            .iter()
            .zip(&wagers)
            .map(|(&expected, &wager)| clamp_loss(sampler.actual_loss(expected), wager, loss_cap))
            .collect();

        Self {
            deposits,
            multipliers,
            wagers,
            expected_losses,
            actual_losses,
        }
    }

    pub fn len(&self) -> usize {
        self.wagers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wagers.is_empty()
    }
}

/// Floor at zero, then apply the configured ceiling.
pub fn clamp_loss(raw: f64, wager: f64, cap: LossCap) -> f64 {
    let loss = raw.max(0.0);
    match cap {
        LossCap::None => loss,
        LossCap::Wager => loss.min(wager),
    }
}
