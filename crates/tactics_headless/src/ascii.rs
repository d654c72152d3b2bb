//! ASCII rendering of a battle field.
//!
//! Row `y = height - 1` is printed first so the board reads like a map.
//!
//! | Glyph | Meaning                          |
//! |-------|----------------------------------|
//! | `@`   | player                           |
//! | `A-Z` | enemy (first letter of its name) |
//! | `*`   | walkable this turn               |
//! | `x`   | attackable this turn             |
//! | `.`   | empty                            |

use std::fmt::Write;

use tactics_core::grid::TileStatus;
use tactics_core::host::BattleHost;
use tactics_core::session::BattleSession;
use tactics_core::units::Faction;

/// ASCII rendering configuration.
#[derive(Debug, Clone)]
pub struct AsciiConfig {
    /// Use colored output (ANSI).
    pub use_color: bool,
    /// Append a legend of units and their health.
    pub show_legend: bool,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            show_legend: true,
        }
    }
}

/// ANSI color codes.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BLUE: &str = "\x1b[34m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Render the field, units and current range marks.
pub fn render_board<H: BattleHost>(session: &BattleSession<H>, config: &AsciiConfig) -> String {
    let grid = session.grid();
    let roster = session.roster();
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Turn {} | {} | {}x{}",
        session.turn(),
        session.phase(),
        grid.width(),
        grid.height()
    );

    for y in (0..grid.height() as i32).rev() {
        for x in 0..grid.width() as i32 {
            let Some(id) = grid.tile_at(x, y) else {
                continue;
            };
            let status = grid.status(id);
            let unit = grid.occupant(id).and_then(|u| roster.unit(u));

            let (glyph, color) = match unit {
                Some(u) if u.faction == Faction::Player => ('@', colors::BLUE),
                Some(u) => (
                    u.name
                        .chars()
                        .next()
                        .map_or('E', |c| c.to_ascii_uppercase()),
                    colors::RED,
                ),
                None if status.contains(TileStatus::PLAYER_ATTACKABLE) => ('x', colors::YELLOW),
                None if status.contains(TileStatus::WALKABLE) => ('*', colors::GREEN),
                None => ('.', colors::GRAY),
            };

            if config.use_color {
                let _ = write!(output, "{color}{glyph}{}", colors::RESET);
            } else {
                output.push(glyph);
            }
            if x + 1 < grid.width() as i32 {
                output.push(' ');
            }
        }
        output.push('\n');
    }

    if config.show_legend {
        if let Some(player) = roster.player() {
            let _ = writeln!(
                output,
                "@ player {}/{}",
                player.health, player.stats.max_health
            );
        }
        for enemy in roster.living_enemies() {
            let _ = writeln!(
                output,
                "{} {} {}/{}",
                enemy.id, enemy.name, enemy.health, enemy.stats.max_health
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::host::NullHost;
    use tactics_test_utils::fixtures::{grunt, BattleBuilder};

    fn plain() -> AsciiConfig {
        AsciiConfig {
            use_color: false,
            show_legend: false,
        }
    }

    #[test]
    fn test_render_places_units() {
        let battle = BattleBuilder::new()
            .player_at(0, 0)
            .enemy(grunt(), 7, 7)
            .build_with(NullHost);
        let board = render_board(&battle, &plain());
        let rows: Vec<&str> = board.lines().skip(1).collect();

        assert_eq!(rows.len(), 8);
        assert!(rows[0].ends_with('G'));
        assert!(rows[7].starts_with('@'));
    }

    #[test]
    fn test_render_shows_walkable_marks() {
        let battle = BattleBuilder::new()
            .player_at(0, 0)
            .enemy(grunt(), 7, 7)
            .build_with(NullHost);
        let board = render_board(&battle, &plain());
        let stars = board.chars().filter(|&c| c == '*').count();
        // Origin is covered by the player glyph.
        assert_eq!(stars, battle.walkable().len() - 1);
    }

    #[test]
    fn test_legend_lists_units() {
        let battle = BattleBuilder::new()
            .player_at(0, 0)
            .enemy(grunt(), 7, 7)
            .build_with(NullHost);
        let config = AsciiConfig {
            use_color: false,
            show_legend: true,
        };
        let board = render_board(&battle, &config);
        assert!(board.contains("@ player 20/20"));
        assert!(board.contains("grunt 6/6"));
    }
}
