//! End-to-end battle flow through the public session API.

use tactics_core::prelude::*;
use tactics_test_utils::fixtures::{
    encounter_from_ron, executioner, grunt, living_enemies, pass_turn, run_enemy_turn, sentry,
    step, BattleBuilder,
};
use tactics_test_utils::host::{HostRequest, RecordingHost};

#[test]
fn test_three_enemies_move_one_per_tick() {
    let mut battle = BattleBuilder::new()
        .enemy(sentry(), 7, 0)
        .enemy(sentry(), 7, 1)
        .enemy(sentry(), 7, 2)
        .build();
    let order = living_enemies(&battle);
    pass_turn(&mut battle).unwrap();
    assert_eq!(battle.phase(), Phase::EnemiesMoving);
    assert_eq!(battle.move_queue().target(), 3);

    step(&mut battle).unwrap();
    assert_eq!(battle.host().enemy_moves(), order[..1]);
    step(&mut battle).unwrap();
    assert_eq!(battle.host().enemy_moves(), order[..2]);
    assert_eq!(battle.phase(), Phase::EnemiesMoving);

    let events = step(&mut battle).unwrap();
    assert_eq!(battle.host().enemy_moves(), order);
    assert_eq!(battle.phase(), Phase::EnemiesAttacking);
    assert!(events.phase_changes.contains(&PhaseChange {
        from: Phase::EnemiesMoving,
        to: Phase::EnemiesAttacking
    }));
}

#[test]
fn test_enemy_turn_order_is_roster_order() {
    let mut battle = BattleBuilder::new()
        .enemy(sentry(), 6, 5)
        .enemy(sentry(), 7, 0)
        .enemy(sentry(), 6, 2)
        .build();
    let order = living_enemies(&battle);
    pass_turn(&mut battle).unwrap();
    run_enemy_turn(&mut battle, 20).unwrap();

    assert_eq!(battle.host().enemy_moves(), order);
    assert_eq!(battle.host().enemy_attacks(), order);
    assert_eq!(battle.phase(), Phase::PlayerToMove);
    assert_eq!(battle.turn(), 2);
}

#[test]
fn test_slow_presentation_gates_queue() {
    let mut battle = BattleBuilder::new()
        .enemy(sentry(), 7, 0)
        .enemy(sentry(), 7, 1)
        .build_with(RecordingHost::with_latency(3));
    pass_turn(&mut battle).unwrap();

    // First enemy starts, nothing else happens until the host reports back.
    battle.tick().unwrap();
    battle.tick().unwrap();
    battle.tick().unwrap();
    assert_eq!(battle.host().enemy_moves().len(), 1);
    assert!(battle.move_queue().is_awaiting());

    while !battle.host_mut().advance() {}
    assert!(!battle.host().is_playing());
    assert!(battle.enemy_action_finished());
    assert!(!battle.enemy_action_finished());

    battle.tick().unwrap();
    assert_eq!(battle.host().enemy_moves().len(), 2);
}

#[test]
fn test_latency_turn_completes() {
    let mut battle = BattleBuilder::new()
        .enemy(sentry(), 7, 0)
        .enemy(sentry(), 7, 3)
        .build_with(RecordingHost::with_latency(2));
    pass_turn(&mut battle).unwrap();
    let ticks = run_enemy_turn(&mut battle, 50).unwrap();

    assert!(ticks > 4, "latency should stretch the turn, took {ticks}");
    assert_eq!(battle.phase(), Phase::PlayerToMove);
    assert_eq!(battle.host().enemy_attacks().len(), 2);
}

#[test]
fn test_enemy_killed_by_player_skips_its_turn() {
    let mut battle = BattleBuilder::new()
        .player_at(3, 3)
        .enemy(sentry(), 4, 3)
        .enemy(sentry(), 7, 7)
        .build();
    let victim = living_enemies(&battle)[0];
    let survivor = living_enemies(&battle)[1];

    let stay = battle.player().unwrap().tile;
    battle.select_move_target(stay).unwrap();
    battle.player_move_finished().unwrap();
    let target = battle.grid().tile_at(4, 3).unwrap();
    battle.select_attack_target(Some(target)).unwrap();
    battle.player_attack_finished().unwrap();

    assert_eq!(battle.move_queue().target(), 1);
    run_enemy_turn(&mut battle, 20).unwrap();

    assert_eq!(battle.host().enemy_moves(), vec![survivor]);
    assert_eq!(battle.host().enemy_attacks(), vec![survivor]);
    assert!(battle.roster().enemy(victim).is_none());
    assert_eq!(battle.phase(), Phase::PlayerToMove);
}

#[test]
fn test_walkable_published_once_per_turn() {
    let mut battle = BattleBuilder::new().enemy(sentry(), 7, 7).build();
    for _ in 0..10 {
        step(&mut battle).unwrap();
    }
    assert_eq!(battle.host().walkable_publications(), 1);

    pass_turn(&mut battle).unwrap();
    run_enemy_turn(&mut battle, 20).unwrap();
    step(&mut battle).unwrap();
    assert_eq!(battle.host().walkable_publications(), 2);
}

#[test]
fn test_published_sets_match_queries() {
    let mut battle = BattleBuilder::new().player_at(3, 3).enemy(sentry(), 7, 7).build();
    let origin = battle.player().unwrap().tile;
    let movement = battle.config().player.movement;
    let expected = compute_walkable(battle.grid(), origin, movement).unwrap();

    let Some(HostRequest::Walkable { tiles, .. }) = battle.host().requests().first() else {
        panic!("expected a walkable publication first");
    };
    assert_eq!(tiles, &expected.iter().collect::<Vec<_>>());

    battle.select_move_target(origin).unwrap();
    battle.player_move_finished().unwrap();
    let stats = battle.config().player;
    let expected = compute_attackable(battle.grid(), origin, stats.min_distance, stats.max_distance).unwrap();
    assert_eq!(battle.attackable(), &expected);
    assert_eq!(expected.len(), 12);
}

#[test]
fn test_grid_marks_follow_phase() {
    let mut battle = BattleBuilder::new().player_at(3, 3).enemy(sentry(), 7, 7).build();
    let walkable_marked = battle
        .grid()
        .tiles()
        .filter(|t| t.status().contains(TileStatus::WALKABLE))
        .count();
    assert_eq!(walkable_marked, battle.walkable().len());

    let origin = battle.player().unwrap().tile;
    battle.select_move_target(origin).unwrap();
    battle.player_move_finished().unwrap();

    let statuses: Vec<TileStatus> = battle.grid().tiles().map(|t| t.status()).collect();
    assert!(statuses.iter().all(|s| !s.contains(TileStatus::WALKABLE)));
    assert_eq!(
        statuses
            .iter()
            .filter(|s| s.contains(TileStatus::PLAYER_ATTACKABLE))
            .count(),
        12
    );
}

#[test]
fn test_input_in_wrong_phase_is_rejected() {
    let mut battle = BattleBuilder::new().enemy(sentry(), 7, 7).build();
    pass_turn(&mut battle).unwrap();

    let tile = battle.grid().tile_at(0, 1).unwrap();
    assert!(matches!(
        battle.select_move_target(tile),
        Err(BattleError::InvalidPhaseTransition {
            from: Phase::EnemiesMoving,
            to: Phase::PlayerMoving
        })
    ));
    assert!(matches!(
        battle.player_attack_finished(),
        Err(BattleError::InvalidPhaseTransition { .. })
    ));
    assert_eq!(battle.phase(), Phase::EnemiesMoving);
}

#[test]
fn test_victory_reported_after_delay() {
    let mut battle = BattleBuilder::new()
        .end_delay(TICK_RATE)
        .player_at(3, 3)
        .enemy(sentry(), 3, 4)
        .build();
    let origin = battle.player().unwrap().tile;
    battle.select_move_target(origin).unwrap();
    battle.player_move_finished().unwrap();
    let target = battle.grid().tile_at(3, 4).unwrap();
    battle.select_attack_target(Some(target)).unwrap();
    battle.player_attack_finished().unwrap();

    assert_eq!(battle.phase(), Phase::EndAnimation);
    assert_eq!(battle.outcome(), Some(BattleOutcome::Victory));

    for _ in 0..TICK_RATE {
        step(&mut battle).unwrap();
        assert!(battle.host().finishes().is_empty());
    }
    let events = step(&mut battle).unwrap();
    assert_eq!(events.battle_end, Some(BattleOutcome::Victory));
    assert_eq!(battle.host().finishes(), vec![BattleOutcome::Victory]);

    for _ in 0..50 {
        step(&mut battle).unwrap();
    }
    assert_eq!(battle.host().finishes().len(), 1);
}

#[test]
fn test_defeat_stops_remaining_attacks() {
    let mut battle = BattleBuilder::new()
        .player_at(3, 3)
        .enemy(executioner(), 3, 4)
        .enemy(executioner(), 4, 3)
        .build();
    pass_turn(&mut battle).unwrap();
    run_enemy_turn(&mut battle, 20).unwrap();

    assert_eq!(battle.outcome(), Some(BattleOutcome::Defeat));
    assert_eq!(battle.host().enemy_attacks().len(), 1);
    assert!(!battle.player().unwrap().is_alive());
    step(&mut battle).unwrap();
    assert_eq!(battle.host().finishes(), vec![BattleOutcome::Defeat]);
}

#[test]
fn test_grunts_close_in_and_attack() {
    let mut battle = BattleBuilder::new()
        .player_at(0, 0)
        .enemy(grunt(), 4, 0)
        .build();
    let grunt_id = living_enemies(&battle)[0];

    pass_turn(&mut battle).unwrap();
    run_enemy_turn(&mut battle, 20).unwrap();
    let tile = battle.roster().enemy(grunt_id).unwrap().tile;
    assert_eq!(battle.grid().position(tile), Some(Position::new(2, 0)));
    assert_eq!(battle.player().unwrap().health, battle.config().player.max_health);

    pass_turn(&mut battle).unwrap();
    run_enemy_turn(&mut battle, 20).unwrap();
    let tile = battle.roster().enemy(grunt_id).unwrap().tile;
    assert_eq!(
        battle.grid().position(tile).unwrap().manhattan_distance(Position::new(0, 0)),
        1
    );
    assert_eq!(
        battle.player().unwrap().health,
        battle.config().player.max_health - grunt().stats.damage
    );
}

#[test]
fn test_start_from_random_pool() {
    let encounter = encounter_from_ron(
        r#"RandomPool([
            (name: "pair", members: [
                (name: "a", stats: (max_health: 3, movement: 1, min_distance: 1, max_distance: 1, damage: 1)),
                (name: "b", stats: (max_health: 3, movement: 1, min_distance: 1, max_distance: 1, damage: 1), script: Hold),
            ]),
        ])"#,
    );
    let battle = BattleSession::start(BattleConfig::default(), &encounter, RecordingHost::new()).unwrap();
    let names: Vec<&str> = battle.roster().enemies().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(battle.host().walkable_publications(), 1);
}

#[test]
fn test_spawn_exhaustion_reports_error() {
    let config = BattleConfig {
        field_width: 3,
        field_height: 1,
        enemy_spawn_width: 1,
        player_spawn_width: 1,
        ..BattleConfig::default()
    };
    let mut battle = BattleSession::new(config, NullHost).unwrap();
    battle.spawn_player().unwrap();
    let position = battle.new_enemy_spawn_position().unwrap();
    assert_eq!(position, Position::new(2, 0));
    assert!(!battle.can_spawn_enemy());
    assert!(matches!(
        battle.new_enemy_spawn_position(),
        Err(BattleError::NoSpawnSpaceAvailable)
    ));
}
