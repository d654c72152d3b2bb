//! Batch runner for balance testing.
//!
//! Plays one scenario across a range of seeds in parallel using rayon and
//! aggregates the outcomes.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use tactics_core::host::BattleOutcome;

use crate::runner::{BattleSummary, HeadlessRunner};
use crate::scenario::Scenario;

/// A seed whose battle could not be run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleFailure {
    /// Seed that failed.
    pub seed: u64,
    /// Error message.
    pub message: String,
}

/// Aggregated results of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Scenario name.
    pub scenario: String,
    /// Battles played to an outcome or turn limit.
    pub total_battles: u32,
    /// Player victories.
    pub victories: u32,
    /// Player defeats.
    pub defeats: u32,
    /// Battles that hit the turn limit.
    pub unfinished: u32,
    /// Victory share of all battles.
    pub win_rate: f64,
    /// Mean turns per battle.
    pub avg_turns: f64,
    /// Shortest battle in turns.
    pub min_turns: u32,
    /// Longest battle in turns.
    pub max_turns: u32,
    /// Battles that errored.
    pub failures: Vec<BattleFailure>,
}

impl BatchSummary {
    /// Calculate the summary from individual battle results.
    #[must_use]
    pub fn from_battles(scenario: &str, battles: &[BattleSummary], failures: Vec<BattleFailure>) -> Self {
        let mut summary = Self {
            scenario: scenario.to_string(),
            failures,
            ..Self::default()
        };
        if battles.is_empty() {
            return summary;
        }

        summary.total_battles = battles.len() as u32;
        summary.min_turns = u32::MAX;
        let mut turn_sum = 0u64;

        for battle in battles {
            match battle.outcome {
                Some(BattleOutcome::Victory) => summary.victories += 1,
                Some(BattleOutcome::Defeat) => summary.defeats += 1,
                None => summary.unfinished += 1,
            }
            turn_sum += u64::from(battle.turns);
            summary.min_turns = summary.min_turns.min(battle.turns);
            summary.max_turns = summary.max_turns.max(battle.turns);
        }

        summary.win_rate = f64::from(summary.victories) / f64::from(summary.total_battles);
        summary.avg_turns = turn_sum as f64 / f64::from(summary.total_battles);
        summary
    }
}

/// Play `count` seeds starting at `seed_start`.
#[must_use]
pub fn run_batch(scenario: &Scenario, count: u32, seed_start: u64, max_turns: u32) -> BatchSummary {
    tracing::info!(
        scenario = %scenario.name,
        count,
        seed_start,
        max_turns,
        "Starting batch"
    );

    let results: Vec<(u64, Result<BattleSummary, String>)> = (0..count)
        .into_par_iter()
        .map(|offset| {
            let seed = seed_start + u64::from(offset);
            let runner = HeadlessRunner::new(scenario.clone().with_seed(seed)).with_max_turns(max_turns);
            (seed, runner.run().map_err(|e| e.to_string()))
        })
        .collect();

    let mut battles = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (seed, result) in results {
        match result {
            Ok(summary) => battles.push(summary),
            Err(message) => {
                tracing::warn!(seed, error = %message, "Battle failed");
                failures.push(BattleFailure { seed, message });
            }
        }
    }

    let summary = BatchSummary::from_battles(&scenario.name, &battles, failures);
    tracing::info!(
        battles = summary.total_battles,
        victories = summary.victories,
        defeats = summary.defeats,
        "Batch finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battle(outcome: Option<BattleOutcome>, turns: u32) -> BattleSummary {
        BattleSummary {
            scenario: "s".to_string(),
            seed: 0,
            outcome,
            turns,
            ticks: 0,
            player_health: 0,
            enemies_spawned: 0,
            survivors: Vec::new(),
            enemy_moves: 0,
            enemy_attacks: 0,
        }
    }

    #[test]
    fn test_summary_counts_outcomes() {
        let battles = [
            battle(Some(BattleOutcome::Victory), 4),
            battle(Some(BattleOutcome::Victory), 6),
            battle(Some(BattleOutcome::Defeat), 8),
            battle(None, 10),
        ];
        let summary = BatchSummary::from_battles("s", &battles, Vec::new());
        assert_eq!(summary.total_battles, 4);
        assert_eq!(summary.victories, 2);
        assert_eq!(summary.defeats, 1);
        assert_eq!(summary.unfinished, 1);
        assert_eq!(summary.min_turns, 4);
        assert_eq!(summary.max_turns, 10);
        assert!((summary.avg_turns - 7.0).abs() < f64::EPSILON);
        assert!((summary.win_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::from_battles("s", &[], Vec::new());
        assert_eq!(summary.total_battles, 0);
        assert_eq!(summary.min_turns, 0);
    }

    #[test]
    fn test_batch_is_reproducible() {
        let scenario = Scenario::default();
        let a = run_batch(&scenario, 6, 100, 30);
        let b = run_batch(&scenario, 6, 100, 30);
        assert_eq!(a, b);
        assert_eq!(a.total_battles, 6);
        assert!(a.failures.is_empty());
    }
}
