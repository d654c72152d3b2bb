//! Determinism testing utilities.
//!
//! A battle built from the same configuration and driven by the same inputs
//! must play out identically: spawn placement and encounter rolls come from a
//! seeded ChaCha RNG, range sets are ordered, and enemies act in roster order.
//! These helpers run a setup several times and compare state hashes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tactics_core::host::BattleHost;
use tactics_core::session::BattleSession;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let mut unique = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Battle is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a setup multiple times and verify the final hashes agree.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `ticks` - Number of steps per run
/// * `setup` - Creates the initial state
/// * `step` - Advances the state by one step
/// * `hash` - Computes the state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();
        for _ in 0..ticks {
            step(&mut state);
        }
        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Hash of everything that decides how a battle continues.
pub fn battle_hash<H: BattleHost>(session: &BattleSession<H>) -> u64 {
    let mut hasher = DefaultHasher::new();
    session.roster().hash(&mut hasher);
    session.phase().hash(&mut hasher);
    session.turn().hash(&mut hasher);
    session.ticks().hash(&mut hasher);
    session.walkable().iter().for_each(|t| t.hash(&mut hasher));
    session.outcome().hash(&mut hasher);
    for tile in session.grid().tiles() {
        tile.occupant().hash(&mut hasher);
    }
    hasher.finish()
}

/// Step two copies of a battle side by side and report the first tick at
/// which their hashes differ.
///
/// Returns `None` when they never diverge.
pub fn find_first_divergence<S, Setup, Step, HashFn>(
    setup: Setup,
    step: Step,
    hash: HashFn,
    ticks: u64,
) -> Option<u64>
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut a = setup();
    let mut b = setup();

    if hash(&a) != hash(&b) {
        return Some(0);
    }

    for tick in 1..=ticks {
        step(&mut a);
        step(&mut b);
        if hash(&a) != hash(&b) {
            return Some(tick);
        }
    }

    None
}

/// Proptest strategies for grids, positions and range parameters.
pub mod strategies {
    use proptest::prelude::*;
    use tactics_core::grid::Position;

    /// Field dimensions from 1x1 up to 12x12.
    pub fn arb_field() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=12, 1u32..=12)
    }

    /// A field together with a position inside it.
    pub fn arb_field_and_position() -> impl Strategy<Value = ((u32, u32), Position)> {
        arb_field().prop_flat_map(|(w, h)| {
            (
                Just((w, h)),
                (0..w as i32, 0..h as i32).prop_map(|(x, y)| Position::new(x, y)),
            )
        })
    }

    /// Movement range, including zero.
    pub fn arb_movement() -> impl Strategy<Value = u32> {
        0u32..8
    }

    /// Attack distance band `(min, max)` with `min <= max`.
    pub fn arb_attack_band() -> impl Strategy<Value = (u32, u32)> {
        (0u32..5).prop_flat_map(|min| (Just(min), min..min + 5))
    }
}
