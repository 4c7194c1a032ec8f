//! Casino promotion simulator CLI.
//!
//! Run a Monte Carlo pass over a synthetic player population to see what the
//! promotion schedule costs the house.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                               # 10000 players, default promotions
//!   cargo run --bin simulate -- -n 500 -e 0.02             # 500 players at a 2% edge
//!   cargo run --bin simulate -- -b "Rakeback=0.15" --seed 42
//!   cargo run --bin simulate -- --csv                      # writes casino_simulation_results.csv

use anyhow::Context;
use casino_sim::build_info;
use casino_sim::simulator::{
    run_simulation, BonusEntry, BonusSchedule, LossCap, SimConfig, DEFAULT_CSV_FILE,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::{warn, Level};

#[derive(Parser, Debug)]
#[command(
    name = "simulate",
    version,
    about = "Monte Carlo simulator for casino promotion economics"
)]
struct Args {
    /// Number of simulated players
    #[arg(short = 'n', long)]
    players: Option<u32>,

    /// House edge as a fraction of wager (0.01 = 1%)
    #[arg(short = 'e', long, allow_negative_numbers = true)]
    house_edge: Option<f64>,

    /// Fraction of realized loss returned to the player
    #[arg(short = 'l', long, allow_negative_numbers = true)]
    loseback: Option<f64>,

    /// Bonus category as NAME=RATE; repeat for several. Replaces the default schedule.
    #[arg(short = 'b', long = "bonus", value_name = "NAME=RATE")]
    bonuses: Vec<BonusEntry>,

    /// Run without any wager-based bonus categories
    #[arg(long, conflicts_with = "bonuses")]
    no_bonuses: bool,

    /// Random seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Never let a player lose more than they wagered
    #[arg(long)]
    cap_loss_at_wager: bool,

    /// JSON config file; command-line flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Quick check with 1000 players
    #[arg(long, conflicts_with = "config")]
    quick: bool,

    /// Save the result row as CSV
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_CSV_FILE)]
    csv: Option<PathBuf>,

    /// Save a timestamped JSON report
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print the CSV row
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&args)?;
    for warning in config.recommended_range_warnings() {
        warn!("{warning}");
    }

    if !args.quiet {
        print_banner(&config);
    }

    let report = run_simulation(&config).context("simulation did not run")?;

    if args.quiet {
        println!("{}", report.to_csv_row());
    } else {
        println!("{}", report.to_text());
    }

    if let Some(path) = &args.csv {
        report
            .save_csv(path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        if !args.quiet {
            println!("CSV saved to: {}", path.display());
        }
    }

    if args.json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        report
            .save_json(&filename)
            .with_context(|| format!("failed to write JSON report to {filename}"))?;
        if !args.quiet {
            println!("JSON report saved to: {}", filename);
        }
    }

    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None if args.quick => SimConfig::quick_check(),
        None => SimConfig::default(),
    };

    if let Some(players) = args.players {
        config.num_players = players;
    }
    if let Some(house_edge) = args.house_edge {
        config.house_edge = house_edge;
    }
    if let Some(loseback) = args.loseback {
        config.loseback_rate = loseback;
    }
    if args.no_bonuses {
        config.bonus_schedule = BonusSchedule::new();
    } else if !args.bonuses.is_empty() {
        config.bonus_schedule = args.bonuses.iter().cloned().collect();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.cap_loss_at_wager {
        config.loss_cap = LossCap::Wager;
    }

    Ok(config)
}

fn print_banner(config: &SimConfig) {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              CASINO PROMOTION SIMULATOR                       ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!("  Build:          {}", build_info::build_label());
    println!();
    println!("Configuration:");
    println!("  Players:        {}", config.num_players);
    println!("  House Edge:     {:.3}%", config.house_edge * 100.0);
    println!("  Loseback:       {:.2}%", config.loseback_rate * 100.0);
    if config.bonus_schedule.is_empty() {
        println!("  Bonuses:        none");
    }
    for (name, rate) in config.bonus_schedule.iter() {
        println!("  {:<15} {:.2}%", format!("{name}:"), rate * 100.0);
    }
    if config.loss_cap == LossCap::Wager {
        println!("  Loss Cap:       wager");
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("simulate").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = build_config(&parse(&[])).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "-n", "250", "-e", "0.02", "-l", "0", "--seed", "9", "--cap-loss-at-wager",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.num_players, 250);
        assert_eq!(config.house_edge, 0.02);
        assert_eq!(config.loseback_rate, 0.0);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.loss_cap, LossCap::Wager);
    }

    #[test]
    fn test_bonus_flags_replace_schedule() {
        let args = parse(&["-b", "VIP=0.1", "--bonus", "Rakeback=0.2"]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.bonus_schedule.len(), 2);
        assert_eq!(config.bonus_schedule.rate("VIP"), Some(0.1));
        assert_eq!(config.bonus_schedule.rate("Weekly Bonus"), None);

        let config = build_config(&parse(&["--no-bonuses"])).unwrap();
        assert!(config.bonus_schedule.is_empty());
    }

    #[test]
    fn test_csv_flag_default_file() {
        let args = parse(&["--csv"]);
        assert_eq!(args.csv, Some(PathBuf::from(DEFAULT_CSV_FILE)));

        let args = parse(&["--csv", "out.csv"]);
        assert_eq!(args.csv, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_bad_bonus_rejected_by_parser() {
        let result = Args::try_parse_from(["simulate", "--bonus", "no-equals-sign"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_edge_reaches_validation() {
        let config = build_config(&parse(&["-e", "-0.01"])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quick_preset() {
        let config = build_config(&parse(&["--quick"])).unwrap();
        assert_eq!(config.num_players, 1_000);
    }
}
