//! Casino promotion simulator for Monte Carlo analysis.
//!
//! Draw a synthetic player population and price the promotions against it to see:
//! - Total wagering volume and theoretical vs. realized player loss
//! - What each bonus category and the loseback cost the house
//! - Expected vs. actual house profit and return to player
//! - How many players finish ahead
//!
//! One call is one independent pass; nothing is kept between runs.

mod bonus;
mod config;
mod population;
mod report;
mod runner;

pub use bonus::{BonusEntry, BonusSchedule, MONTHLY_BONUS, RAKEBACK, WEEKLY_BONUS};
pub use config::{LossCap, SimConfig};
pub use population::{
    clamp_loss, PlayerSampler, Population, RandomSampler, DEPOSIT_LOG_MEAN, DEPOSIT_LOG_STD_DEV,
    LOSS_STD_DEV_FACTOR, WAGER_MULTIPLIERS, WAGER_MULTIPLIER_WEIGHTS,
};
pub use report::{BonusTotal, SimReport, CSV_HEADER, DEFAULT_CSV_FILE};
pub use runner::{run_simulation, simulate, simulate_with};
