//! Casino Sim - Monte Carlo economics of casino promotions
//!
//! This module exposes the simulation engine for the `simulate` binary, tests
//! and external use.

pub mod build_info;
pub mod error;
pub mod simulator;

pub use error::{Result, SimError};
pub use simulator::{run_simulation, simulate, BonusSchedule, SimConfig, SimReport};
