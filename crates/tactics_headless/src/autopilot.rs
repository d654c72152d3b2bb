//! Scripted player for headless battles.
//!
//! The autopilot walks toward the nearest living enemy, stopping where one is
//! inside its attack band, and attacks the weakest enemy it can reach.

use tactics_core::grid::{Position, TileId};
use tactics_core::host::BattleHost;
use tactics_core::session::BattleSession;

/// Player decision maker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Autopilot;

impl Autopilot {
    /// Pick a destination from the published walkable set.
    ///
    /// Returns `None` if the set is empty or the player is missing.
    #[must_use]
    pub fn choose_move<H: BattleHost>(&self, session: &BattleSession<H>) -> Option<TileId> {
        let player = session.player()?;
        let (min, max) = (player.stats.min_distance, player.stats.max_distance);
        let grid = session.grid();

        let enemies: Vec<Position> = session
            .roster()
            .living_enemies()
            .filter_map(|e| grid.position(e.tile))
            .collect();

        if enemies.is_empty() {
            return Some(player.tile);
        }

        session.walkable().iter().min_by_key(|&tile| {
            let Some(pos) = grid.position(tile) else {
                return (u32::MAX, true, tile.0);
            };
            let best = enemies
                .iter()
                .map(|&e| {
                    let d = pos.manhattan_distance(e);
                    if d < min {
                        min - d
                    } else {
                        d.saturating_sub(max)
                    }
                })
                .min()
                .unwrap_or(u32::MAX);
            (best, tile != player.tile, tile.0)
        })
    }

    /// Pick an attack target from the published attackable set: the enemy
    /// with the least health, or `None` when no enemy is in range.
    #[must_use]
    pub fn choose_attack<H: BattleHost>(&self, session: &BattleSession<H>) -> Option<TileId> {
        session
            .attackable()
            .iter()
            .filter_map(|tile| {
                let occupant = session.grid().occupant(tile)?;
                let enemy = session.roster().enemy(occupant)?;
                enemy.is_alive().then_some((enemy.health, tile))
            })
            .min_by_key(|&(health, tile)| (health, tile.0))
            .map(|(_, tile)| tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::host::NullHost;
    use tactics_test_utils::fixtures::{sentry, BattleBuilder};

    #[test]
    fn test_moves_into_attack_band() {
        let battle = BattleBuilder::new()
            .player_at(0, 0)
            .enemy(sentry(), 5, 0)
            .build_with(NullHost);
        let tile = Autopilot.choose_move(&battle).unwrap();
        let pos = battle.grid().position(tile).unwrap();
        let d = pos.manhattan_distance(Position::new(5, 0));
        assert!(d <= battle.config().player.max_distance, "ended {d} away");
    }

    #[test]
    fn test_stays_when_already_in_band() {
        let battle = BattleBuilder::new()
            .player_at(3, 3)
            .enemy(sentry(), 3, 5)
            .build_with(NullHost);
        let stay = battle.player().unwrap().tile;
        assert_eq!(Autopilot.choose_move(&battle), Some(stay));
    }

    #[test]
    fn test_attacks_weakest_in_range() {
        let mut tough = sentry();
        tough.stats.max_health = 9;
        let mut battle = BattleBuilder::new()
            .player_at(3, 3)
            .enemy(tough, 3, 4)
            .enemy(sentry(), 4, 3)
            .build_with(NullHost);
        let stay = battle.player().unwrap().tile;
        battle.select_move_target(stay).unwrap();
        battle.player_move_finished().unwrap();

        let target = Autopilot.choose_attack(&battle).unwrap();
        assert_eq!(battle.grid().position(target), Some(Position::new(4, 3)));
    }

    #[test]
    fn test_no_attack_without_enemies_in_range() {
        let mut battle = BattleBuilder::new()
            .player_at(0, 0)
            .enemy(sentry(), 7, 7)
            .build_with(NullHost);
        let stay = battle.player().unwrap().tile;
        battle.select_move_target(stay).unwrap();
        battle.player_move_finished().unwrap();
        assert_eq!(Autopilot.choose_attack(&battle), None);
    }
}
