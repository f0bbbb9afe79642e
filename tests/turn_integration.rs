//! Full-turn simulation integration tests

use hex_skirmish::*;

fn simulator(seed: u64) -> TurnSimulator {
    TurnSimulator::new(
        GridConfig::new(10, 10, 24.0, 12.0, 12.0),
        TerrainGrid::flat(10, 10),
        StatTables::demo_roster(),
        seed,
    )
    .unwrap()
}

fn act(unit: UnitId, target: HexCoord, main: f32, sub: f32) -> StepAction {
    StepAction {
        unit,
        target,
        main_angle: main,
        sub_angle: sub,
    }
}

#[test]
fn test_full_match_setup_and_first_turn() {
    let mut sim = simulator(1234);

    // Three-a-side squad: enemies land on the mirrored half of the board.
    let (a0, e0) = sim
        .deploy_pair("attacker", "attacker", HexCoord::new(1, 2), 0.0, 90.0)
        .unwrap();
    let (a1, _) = sim
        .deploy_pair("allrounder", "allrounder", HexCoord::new(1, 4), 0.0, 90.0)
        .unwrap();
    let (a2, _) = sim
        .deploy_pair("sniper", "sniper", HexCoord::new(0, 3), 0.0, 90.0)
        .unwrap();

    assert_eq!(sim.unit(e0).unwrap().position, HexCoord::new(8, 7));
    assert_eq!(sim.units.len(), 6);

    // Advance the allied line one column; enemies hold.
    let steps = vec![vec![
        act(a0, HexCoord::new(2, 2), 0.0, 90.0),
        act(a1, HexCoord::new(2, 4), 0.0, 90.0),
        act(a2, HexCoord::new(1, 3), 0.0, 90.0),
    ]];
    let result = sim.resolve_turn(&steps, &[]);

    assert!(result.winner.is_none());
    assert_eq!(result.step_count, 1);
    // Nobody in weapon reach yet: no combat happened.
    assert!(!result.steps[0]
        .events
        .iter()
        .any(|e| matches!(e, StepEvent::Attacked { .. })));
    assert_eq!(sim.unit(a0).unwrap().position, HexCoord::new(2, 2));
    assert_eq!(sim.turn_number, 1);
}

#[test]
fn test_replay_matches_authoritative_resolution() {
    let scripted = |seed: u64| {
        let mut sim = simulator(seed);
        let (a0, e0) = sim
            .deploy_pair("attacker", "allrounder", HexCoord::new(4, 3), 90.0, 90.0)
            .unwrap();
        // Mirrored enemy sits at (5,6); close the gap over two steps and
        // trade blows.
        let ally_steps = vec![
            vec![act(a0, HexCoord::new(4, 4), 90.0, 90.0)],
            vec![act(a0, HexCoord::new(4, 5), 90.0, 90.0)],
            vec![act(a0, HexCoord::new(4, 5), 90.0, 90.0)],
        ];
        let enemy_steps = vec![
            vec![act(e0, HexCoord::new(5, 5), 270.0, 270.0)],
            vec![act(e0, HexCoord::new(4, 6), 270.0, 270.0)],
            vec![act(e0, HexCoord::new(4, 6), 270.0, 270.0)],
        ];
        sim.resolve_turn(&ally_steps, &enemy_steps)
    };

    // Authoritative pass and replay pass agree step for step.
    let server = scripted(555);
    let client = scripted(555);
    assert_eq!(server, client);
}

#[test]
fn test_blind_side_defeat_ends_match() {
    let mut sim = simulator(42);
    let a0 = sim
        .spawn("attacker", Faction::Ally, HexCoord::new(4, 4), 90.0, 90.0)
        .unwrap();
    // Lone enemy aimed away from the approaching attacker.
    let e0 = sim
        .spawn("sniper", Faction::Enemy, HexCoord::new(4, 6), 0.0, 0.0)
        .unwrap();

    let before = sim.unit(e0).unwrap().hp;
    let steps = vec![
        vec![act(a0, HexCoord::new(4, 5), 90.0, 90.0)],
        vec![act(a0, HexCoord::new(4, 5), 90.0, 90.0)],
    ];
    let result = sim.resolve_turn(&steps, &[]);

    assert_eq!(result.winner, Some(Faction::Ally));
    assert_eq!(result.step_count, 1);
    let report = result.steps[0]
        .reports
        .iter()
        .find(|r| r.unit == e0)
        .unwrap();
    assert!(report.defeated);
    assert_eq!(report.hp, 0);
    assert_eq!(report.hp_delta, -before);
    assert_eq!(report.attackers, vec![a0]);
}

#[test]
fn test_defeated_unit_stays_gone_next_turn() {
    let mut sim = simulator(42);
    let a0 = sim
        .spawn("attacker", Faction::Ally, HexCoord::new(4, 4), 90.0, 90.0)
        .unwrap();
    let a1 = sim
        .spawn("attacker", Faction::Ally, HexCoord::new(0, 0), 0.0, 0.0)
        .unwrap();
    let e0 = sim
        .spawn("sniper", Faction::Enemy, HexCoord::new(4, 5), 0.0, 0.0)
        .unwrap();
    let e1 = sim
        .spawn("sniper", Faction::Enemy, HexCoord::new(9, 9), 0.0, 0.0)
        .unwrap();

    let result = sim.resolve_turn(&[vec![act(a0, HexCoord::new(4, 4), 90.0, 90.0)]], &[]);
    assert!(result.winner.is_none(), "one enemy still standing");
    assert!(sim.unit(e0).unwrap().defeated);

    // The defeated unit's hex is free next turn and it emits no areas.
    let range = sim.reachable_for(a0);
    assert!(range.contains_key(&HexCoord::new(4, 5)));

    let result = sim.resolve_turn(&[vec![act(a1, HexCoord::new(1, 0), 0.0, 0.0)]], &[]);
    assert!(result.winner.is_none());
    let _ = e1;
}

#[test]
fn test_unknown_character_surfaces_but_does_not_crash() {
    let mut sim = simulator(9);
    let a0 = sim
        .spawn("attacker", Faction::Ally, HexCoord::new(4, 4), 90.0, 90.0)
        .unwrap();
    sim.spawn("attacker", Faction::Enemy, HexCoord::new(4, 5), 270.0, 270.0)
        .unwrap();
    // Corrupt the enemy's character id after deployment.
    sim.units[1].character = "vanished".into();

    let result = sim.resolve_turn(&[vec![act(a0, HexCoord::new(4, 4), 90.0, 90.0)]], &[]);

    assert!(result.steps[0]
        .events
        .iter()
        .any(|e| matches!(e, StepEvent::UnknownStats { .. })));
}

#[test]
fn test_healing_visible_in_reports() {
    let mut sim = simulator(9);
    let a0 = sim
        .spawn("attacker", Faction::Ally, HexCoord::new(2, 2), 0.0, 0.0)
        .unwrap();
    sim.spawn("sniper", Faction::Enemy, HexCoord::new(9, 9), 0.0, 0.0)
        .unwrap();
    sim.units[0].hp = 4;

    let result = sim.resolve_turn(&[vec![act(a0, HexCoord::new(3, 2), 0.0, 0.0)]], &[]);

    let report = result.steps[0]
        .reports
        .iter()
        .find(|r| r.unit == a0)
        .unwrap();
    // floor(0.1 * 10) = 1 restored for the completed action.
    assert_eq!(report.hp, 5);
    assert_eq!(report.hp_delta, 1);
}
