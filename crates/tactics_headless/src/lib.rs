//! Headless battle runner for CI verification and balance testing.
//!
//! Battles are described by RON [`Scenario`] files. The runner plays the
//! player side with a simple [`Autopilot`] and presents enemy actions through
//! a [`ScriptedHost`] that can simulate animation latency. Results come out as
//! JSON on stdout; logs go to stderr.
//!
//! # Example
//!
//! ```bash
//! # Run the built-in scenario
//! cargo run -p tactics_headless -- run
//!
//! # Run a scenario file with a fixed seed
//! cargo run -p tactics_headless -- run --scenario scenarios/ambush.ron --seed 7
//!
//! # Play 500 seeds in parallel
//! cargo run -p tactics_headless -- batch --scenario scenarios/ambush.ron --count 500
//! ```

pub mod ascii;
pub mod autopilot;
pub mod batch;
pub mod runner;
pub mod scenario;

pub use ascii::{render_board, AsciiConfig};
pub use autopilot::Autopilot;
pub use batch::{run_batch, BatchSummary};
pub use runner::{BattleSummary, HeadlessRunner, ScriptedHost};
pub use scenario::{Scenario, ScenarioError};
