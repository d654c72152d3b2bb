//! Turn phases.
//!
//! A turn walks through the phases in a fixed order:
//!
//! ```text
//! PlayerToMove -> PlayerMoving -> PlayerToAttack -> PlayerAttacking
//!      ^                                                  |
//!      |                                                  v
//! EnemiesAttacking <-------------------------------- EnemiesMoving
//! ```
//!
//! Any phase may drop into `EndAnimation` once the battle is decided.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One state of the battle's turn machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the player to pick a destination.
    #[default]
    PlayerToMove,
    /// Player movement is being presented.
    PlayerMoving,
    /// Waiting for the player to pick a target or skip.
    PlayerToAttack,
    /// Player attack is being presented.
    PlayerAttacking,
    /// Enemies take their moves one by one.
    EnemiesMoving,
    /// Enemies take their attacks one by one.
    EnemiesAttacking,
    /// Battle is decided; presentation is wrapping up.
    EndAnimation,
}

impl Phase {
    /// The phase that normally follows this one.
    ///
    /// `EndAnimation` is terminal and returns itself.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::PlayerToMove => Self::PlayerMoving,
            Self::PlayerMoving => Self::PlayerToAttack,
            Self::PlayerToAttack => Self::PlayerAttacking,
            Self::PlayerAttacking => Self::EnemiesMoving,
            Self::EnemiesMoving => Self::EnemiesAttacking,
            Self::EnemiesAttacking => Self::PlayerToMove,
            Self::EndAnimation => Self::EndAnimation,
        }
    }

    /// Whether moving from `self` to `to` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        match (self, to) {
            (Self::EndAnimation, _) => false,
            (_, Self::EndAnimation) => true,
            (from, to) => from.next() == to,
        }
    }

    /// Phases whose tick handler contains core logic. The rest wait on the
    /// host's completion callbacks.
    #[must_use]
    pub const fn is_core_driven(self) -> bool {
        matches!(
            self,
            Self::PlayerToMove | Self::EnemiesMoving | Self::EnemiesAttacking
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlayerToMove => "player to move",
            Self::PlayerMoving => "player moving",
            Self::PlayerToAttack => "player to attack",
            Self::PlayerAttacking => "player attacking",
            Self::EnemiesMoving => "enemies moving",
            Self::EnemiesAttacking => "enemies attacking",
            Self::EndAnimation => "end animation",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_phase() {
        assert_eq!(Phase::default(), Phase::PlayerToMove);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let mut phase = Phase::PlayerToMove;
        for _ in 0..6 {
            let next = phase.next();
            assert!(phase.can_transition_to(next));
            phase = next;
        }
        assert_eq!(phase, Phase::PlayerToMove);
    }

    #[test]
    fn test_skipping_phases_is_illegal() {
        assert!(!Phase::PlayerToMove.can_transition_to(Phase::PlayerToAttack));
        assert!(!Phase::EnemiesMoving.can_transition_to(Phase::PlayerToMove));
        assert!(!Phase::PlayerAttacking.can_transition_to(Phase::PlayerAttacking));
    }

    #[test]
    fn test_end_animation_is_terminal() {
        assert!(Phase::EnemiesMoving.can_transition_to(Phase::EndAnimation));
        assert!(!Phase::EndAnimation.can_transition_to(Phase::PlayerToMove));
        assert!(!Phase::EndAnimation.can_transition_to(Phase::EndAnimation));
    }

    #[test]
    fn test_core_driven_phases() {
        let core: Vec<Phase> = [
            Phase::PlayerToMove,
            Phase::PlayerMoving,
            Phase::PlayerToAttack,
            Phase::PlayerAttacking,
            Phase::EnemiesMoving,
            Phase::EnemiesAttacking,
            Phase::EndAnimation,
        ]
        .into_iter()
        .filter(|p| p.is_core_driven())
        .collect();
        assert_eq!(
            core,
            vec![
                Phase::PlayerToMove,
                Phase::EnemiesMoving,
                Phase::EnemiesAttacking
            ]
        );
    }
}
