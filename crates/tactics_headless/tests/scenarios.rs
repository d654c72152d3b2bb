//! Scenario files and end-to-end headless runs.

use std::io::Write;
use std::path::PathBuf;

use tactics_core::host::BattleOutcome;
use tactics_headless::{render_board, AsciiConfig, HeadlessRunner, Scenario, ScenarioError};

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

#[test]
fn test_bundled_scenarios_load() {
    for name in ["ambush.ron", "boss.ron"] {
        let scenario = Scenario::load(scenario_path(name))
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        assert!(!scenario.name.is_empty());
    }
}

#[test]
fn test_boss_scenario_overrides_field() {
    let scenario = Scenario::load(scenario_path("boss.ron")).unwrap();
    assert_eq!(scenario.config.field_width, 10);
    assert_eq!(scenario.config.field_height, 6);
    assert_eq!(scenario.config.seed, 12345);
}

#[test]
fn test_scenario_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"(
            name: "temp",
            config: (seed: 3, end_delay_ticks: 0),
            encounter: Predefined(
                archetype: (name: "rat", stats: (max_health: 1, movement: 1, min_distance: 1, max_distance: 1, damage: 1)),
                count: 2,
            ),
        )"#
    )
    .unwrap();

    let scenario = Scenario::load(file.path()).unwrap();
    let summary = HeadlessRunner::new(scenario).run().unwrap();
    assert_eq!(summary.outcome, Some(BattleOutcome::Victory));
    assert_eq!(summary.enemies_spawned, 2);
    assert!(summary.survivors.is_empty());
}

#[test]
fn test_malformed_file_reports_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "(name: 42)").unwrap();
    assert!(matches!(
        Scenario::load(file.path()),
        Err(ScenarioError::ParseError(_))
    ));
}

#[test]
fn test_ambush_run_is_reproducible() {
    let scenario = Scenario::load(scenario_path("ambush.ron")).unwrap().with_seed(21);
    let a = HeadlessRunner::new(scenario.clone()).run().unwrap();
    let b = HeadlessRunner::new(scenario).run().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.enemies_spawned, 4);
}

#[test]
fn test_render_after_setup() {
    let runner = HeadlessRunner::new(Scenario::load(scenario_path("boss.ron")).unwrap());
    let session = runner.setup().unwrap();
    let board = render_board(
        &session,
        &AsciiConfig {
            use_color: false,
            show_legend: true,
        },
    );
    assert_eq!(board.lines().nth(1).map(str::len), Some(10 * 2 - 1));
    assert!(board.contains('@'));
    assert!(board.contains('G'));
    assert!(board.contains("guardian 40/40"));
}
