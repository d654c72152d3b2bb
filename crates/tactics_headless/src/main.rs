//! Headless tactics battle runner.
//!
//! Runs battles without graphics. Results are printed as JSON on stdout,
//! logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Run the built-in scenario once
//! cargo run -p tactics_headless -- run
//!
//! # Run a scenario file with a fixed seed and simulated animation latency
//! cargo run -p tactics_headless -- run --scenario scenarios/ambush.ron --seed 7 --latency 5
//!
//! # Show the board after setup
//! cargo run -p tactics_headless -- render --scenario scenarios/ambush.ron
//!
//! # Run a batch of seeds for balance testing
//! cargo run -p tactics_headless -- batch --scenario scenarios/ambush.ron --count 1000
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tactics_headless::{
    ascii::{render_board, AsciiConfig},
    batch::run_batch,
    runner::HeadlessRunner,
    scenario::Scenario,
};

#[derive(Parser)]
#[command(name = "tactics_headless")]
#[command(about = "Headless tactics battle runner for CI and balance testing")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single battle with the autopilot
    Run {
        /// Scenario file to load (built-in skirmish if omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Override the scenario seed
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many turns
        #[arg(long, default_value = "50")]
        max_turns: u32,

        /// Ticks each enemy presentation takes
        #[arg(long, default_value = "0")]
        latency: u32,
    },

    /// Print the board after setup
    Render {
        /// Scenario file to load (built-in skirmish if omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Override the scenario seed
        #[arg(long)]
        seed: Option<u64>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Run many seeds in parallel and summarize outcomes
    Batch {
        /// Scenario file to load (built-in skirmish if omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of battles to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// First seed
        #[arg(long, default_value = "0")]
        seed_start: u64,

        /// Stop each battle after this many turns
        #[arg(long, default_value = "50")]
        max_turns: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for results)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Some(Commands::Run {
            scenario,
            seed,
            max_turns,
            latency,
        }) => cmd_run(scenario, seed, max_turns, latency),
        Some(Commands::Render {
            scenario,
            seed,
            no_color,
        }) => cmd_render(scenario, seed, no_color),
        Some(Commands::Batch {
            scenario,
            count,
            seed_start,
            max_turns,
        }) => cmd_batch(scenario, count, seed_start, max_turns),
        None => cmd_run(None, None, 50, 0),
    }
}

/// Load the scenario or exit with a message.
fn load_scenario(path: Option<PathBuf>, seed: Option<u64>) -> Scenario {
    let scenario = match path {
        Some(path) => match Scenario::load(&path) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "Failed to load scenario");
                eprintln!("FATAL: {e}");
                std::process::exit(1);
            }
        },
        None => Scenario::default(),
    };

    match seed {
        Some(seed) => scenario.with_seed(seed),
        None => scenario,
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("FATAL: Failed to serialize result: {e}");
            std::process::exit(1);
        }
    }
}

/// Run a single battle
fn cmd_run(scenario: Option<PathBuf>, seed: Option<u64>, max_turns: u32, latency: u32) {
    let scenario = load_scenario(scenario, seed);
    let runner = HeadlessRunner::new(scenario)
        .with_max_turns(max_turns)
        .with_latency(latency);

    match runner.run() {
        Ok(summary) => print_json(&summary),
        Err(e) => {
            tracing::error!(error = %e, "Battle failed");
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    }
}

/// Print the board after setup
fn cmd_render(scenario: Option<PathBuf>, seed: Option<u64>, no_color: bool) {
    let scenario = load_scenario(scenario, seed);
    let runner = HeadlessRunner::new(scenario);

    let session = match runner.setup() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    };

    let config = AsciiConfig {
        use_color: !no_color,
        ..AsciiConfig::default()
    };
    print!("{}", render_board(&session, &config));
}

/// Run a batch of seeds
fn cmd_batch(scenario: Option<PathBuf>, count: u32, seed_start: u64, max_turns: u32) {
    let scenario = load_scenario(scenario, None);
    let summary = run_batch(&scenario, count, seed_start, max_turns);

    eprintln!("\n{}", "=".repeat(50));
    eprintln!("BATCH COMPLETE");
    eprintln!("{}", "=".repeat(50));
    eprintln!("Battles played: {}", summary.total_battles);
    if !summary.failures.is_empty() {
        eprintln!("Battles FAILED: {}", summary.failures.len());
    }
    eprintln!("Win rate: {:.1}%", summary.win_rate * 100.0);
    eprintln!("Average turns: {:.1}", summary.avg_turns);

    print_json(&summary);
}
