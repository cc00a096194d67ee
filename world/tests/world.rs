use bastion_core::{
    AttackerKind, AttackerProfile, BuildKind, CellCoord, Command, Event, GameMode, GameState,
    Occupant, PlacementError, Rejection, RemovalError, SimulationConfig, StructureKind, Tier,
    TimeScale, TrapKind, UpgradeError, Vec2,
};
use bastion_world::{apply, query, World};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn started(config: SimulationConfig) -> World {
    let mut world = World::new(config);
    let _ = run(
        &mut world,
        Command::StartGame {
            mode: GameMode::Relaxed,
        },
    );
    world
}

fn rich() -> SimulationConfig {
    SimulationConfig {
        starting_gold: 10_000,
        ..SimulationConfig::default()
    }
}

fn profile(health: f32) -> AttackerProfile {
    AttackerProfile {
        health,
        speed: 1.0,
        damage: 5.0,
        gold_reward: 5,
    }
}

fn spawn(world: &mut World, kind: AttackerKind, position: Vec2, health: f32) {
    let _ = run(
        world,
        Command::SpawnAttacker {
            kind,
            position,
            profile: profile(health),
        },
    );
}

fn rejection(events: &[Event]) -> Option<Rejection> {
    events.iter().find_map(|event| match event {
        Event::CommandRejected { reason } => Some(*reason),
        _ => None,
    })
}

fn archer() -> BuildKind {
    BuildKind::Structure(StructureKind::Archer)
}

#[test]
fn start_game_opens_first_build_phase() {
    let mut world = World::new(SimulationConfig::default());
    assert_eq!(query::game_state(&world), GameState::Intro);

    let events = run(
        &mut world,
        Command::StartGame {
            mode: GameMode::Timed,
        },
    );

    assert_eq!(query::game_state(&world), GameState::Building);
    assert_eq!(query::game_mode(&world), Some(GameMode::Timed));
    assert_eq!(query::round(&world), 1);
    assert_eq!(query::gold(&world), 150);
    assert!(events.contains(&Event::BuildPhaseStarted { round: 1 }));
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::BaseRegenerated { .. })),
        "a healthy base does not regenerate",
    );
}

#[test]
fn placement_spends_gold_and_occupies_footprint() {
    let mut world = started(SimulationConfig::default());
    let origin = CellCoord::new(6, 6);

    let events = run(
        &mut world,
        Command::Place {
            kind: archer(),
            origin,
        },
    );

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::StructurePlaced { .. })));
    assert_eq!(query::gold(&world), 110);
    assert!(matches!(
        query::occupant(&world, origin),
        Occupant::Structure(_)
    ));
    assert_eq!(query::structure_view(&world).len(), 1);
}

#[test]
fn placement_rejections_leave_world_unchanged() {
    let mut world = started(SimulationConfig::default());

    let cases = [
        (archer(), CellCoord::new(8, 6), PlacementError::Occupied),
        (archer(), CellCoord::new(0, 0), PlacementError::OutOfRange),
        (archer(), CellCoord::new(30, 2), PlacementError::OutOfBounds),
        (
            BuildKind::Structure(StructureKind::Barracks),
            CellCoord::new(4, 4),
            PlacementError::Locked { unlock_round: 10 },
        ),
        (
            BuildKind::Trap(TrapKind::Sticky),
            CellCoord::new(0, 0),
            PlacementError::Locked { unlock_round: 19 },
        ),
    ];

    for (kind, origin, expected) in cases {
        let events = run(&mut world, Command::Place { kind, origin });
        assert_eq!(rejection(&events), Some(Rejection::Placement(expected)));
    }
    assert_eq!(query::gold(&world), 150);
    assert!(query::structure_view(&world).is_empty());
    assert!(query::trap_view(&world).is_empty());
}

#[test]
fn gold_never_goes_negative() {
    let mut world = started(SimulationConfig::default());
    for column in 4..8 {
        let _ = run(
            &mut world,
            Command::Place {
                kind: archer(),
                origin: CellCoord::new(column, 3),
            },
        );
    }

    assert_eq!(query::structure_view(&world).len(), 3);
    assert_eq!(query::gold(&world), 30);
    let events = run(
        &mut world,
        Command::Place {
            kind: archer(),
            origin: CellCoord::new(8, 3),
        },
    );
    assert_eq!(
        rejection(&events),
        Some(Rejection::Placement(PlacementError::InsufficientGold {
            cost: 40,
            available: 30,
        }))
    );
}

#[test]
fn mine_cap_limits_mines_per_round() {
    let mut world = started(rich());
    let mine = BuildKind::Structure(StructureKind::Mine);

    let _ = run(
        &mut world,
        Command::Place {
            kind: mine,
            origin: CellCoord::new(6, 6),
        },
    );
    let events = run(
        &mut world,
        Command::Place {
            kind: mine,
            origin: CellCoord::new(6, 7),
        },
    );

    assert_eq!(query::mine_cap(&world), 1);
    assert_eq!(query::mine_count(&world), 1);
    assert_eq!(
        rejection(&events),
        Some(Rejection::Placement(PlacementError::MineCapReached { cap: 1 }))
    );
}

#[test]
fn traps_may_be_placed_anywhere_on_the_grid() {
    let mut world = started(SimulationConfig::default());
    let events = run(
        &mut world,
        Command::Place {
            kind: BuildKind::Trap(TrapKind::Blast),
            origin: CellCoord::new(0, 13),
        },
    );

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TrapPlaced { .. })));
    assert!(query::is_within_build_range(
        &world,
        BuildKind::Trap(TrapKind::Blast),
        CellCoord::new(0, 0)
    ));
}

#[test]
fn removal_refunds_two_thirds_of_base_cost() {
    let mut world = started(SimulationConfig::default());
    let cell = CellCoord::new(6, 6);
    let _ = run(
        &mut world,
        Command::Place {
            kind: BuildKind::Structure(StructureKind::Turret),
            origin: cell,
        },
    );
    assert_eq!(query::gold(&world), 100);

    let events = run(&mut world, Command::Remove { cell });

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::StructureRemoved { refund: 33, .. })));
    assert_eq!(query::gold(&world), 133);
    assert_eq!(query::occupant(&world, cell), Occupant::Empty);

    let events = run(&mut world, Command::Remove { cell });
    assert_eq!(
        rejection(&events),
        Some(Rejection::Removal(RemovalError::Nothing))
    );
}

#[test]
fn upgrades_are_gated_by_round() {
    let mut world = started(rich());
    let cell = CellCoord::new(6, 6);
    let _ = run(
        &mut world,
        Command::Place {
            kind: archer(),
            origin: cell,
        },
    );

    let events = run(&mut world, Command::Upgrade { cell });

    assert_eq!(
        rejection(&events),
        Some(Rejection::Upgrade(UpgradeError::TierLocked { unlock_round: 14 }))
    );
    let structures = query::structure_view(&world);
    let archer = structures.iter().next().expect("archer placed");
    assert_eq!(archer.tier, Tier::One);
}

#[test]
fn upgrades_apply_tier_overrides() {
    let config = SimulationConfig {
        tier_two_round: 1,
        tier_three_round: 1,
        ..rich()
    };
    let mut world = started(config);
    let cell = CellCoord::new(6, 6);
    let _ = run(
        &mut world,
        Command::Place {
            kind: archer(),
            origin: cell,
        },
    );

    let _ = run(&mut world, Command::Upgrade { cell });
    let _ = run(&mut world, Command::Upgrade { cell });
    let events = run(&mut world, Command::Upgrade { cell });

    let structures = query::structure_view(&world);
    let archer = structures.iter().next().expect("archer placed");
    assert_eq!(archer.tier, Tier::Three);
    assert_eq!(archer.stats.damage, 29.0);
    assert_eq!(archer.stats.fire_rate, 22.0);
    assert_eq!(query::gold(&world), 10_000 - 40 - 60 - 120);
    assert_eq!(
        rejection(&events),
        Some(Rejection::Upgrade(UpgradeError::MaxTier))
    );
}

#[test]
fn mines_cannot_be_upgraded() {
    let config = SimulationConfig {
        tier_two_round: 1,
        ..rich()
    };
    let mut world = started(config);
    let cell = CellCoord::new(6, 6);
    let _ = run(
        &mut world,
        Command::Place {
            kind: BuildKind::Structure(StructureKind::Mine),
            origin: cell,
        },
    );

    assert_eq!(
        query::upgrade_quote(&world, cell),
        Err(UpgradeError::NotUpgradable)
    );
}

#[test]
fn construction_is_refused_during_combat() {
    let mut world = started(SimulationConfig::default());
    let _ = run(&mut world, Command::BeginCombat);
    assert_eq!(query::game_state(&world), GameState::Combat);

    let events = run(
        &mut world,
        Command::Place {
            kind: archer(),
            origin: CellCoord::new(6, 6),
        },
    );

    assert_eq!(
        rejection(&events),
        Some(Rejection::Placement(PlacementError::WrongPhase))
    );
}

#[test]
fn spawning_stops_at_quota() {
    let mut world = started(SimulationConfig::default());
    let events = run(&mut world, Command::BeginCombat);
    assert!(events.contains(&Event::RoundStarted { round: 1, quota: 8 }));

    for _ in 0..12 {
        spawn(&mut world, AttackerKind::Goblin, Vec2::new(-20.0, 0.0), 35.0);
    }

    assert_eq!(query::attacker_view(&world).len(), 8);
    assert_eq!(query::wave(&world).spawned, 8);
    assert_eq!(query::remaining_enemies(&world), 8);
}

#[test]
fn killed_attackers_pay_once_at_cleanup() {
    let mut world = started(SimulationConfig::default());
    let _ = run(&mut world, Command::BeginCombat);
    spawn(&mut world, AttackerKind::Goblin, Vec2::new(100.0, 100.0), 35.0);
    let attacker = query::attacker_view(&world)
        .iter()
        .next()
        .map(|attacker| attacker.id)
        .expect("spawned");

    let _ = run(&mut world, Command::DamageAttacker { attacker, amount: 30.0 });
    let _ = run(&mut world, Command::DamageAttacker { attacker, amount: 30.0 });
    let _ = run(&mut world, Command::DamageAttacker { attacker, amount: 30.0 });
    assert_eq!(query::gold(&world), 150, "gold is only paid at cleanup");
    assert_eq!(query::attacker_view(&world).len(), 1);

    let events = run(&mut world, Command::Cleanup);
    let _ = run(&mut world, Command::Cleanup);

    assert!(events.contains(&Event::AttackerKilled {
        attacker,
        reward: 5
    }));
    assert_eq!(query::gold(&world), 155);
    assert!(query::attacker_view(&world).is_empty());
}

#[test]
fn suicide_attackers_damage_base_once_and_pay_nothing() {
    let mut world = started(SimulationConfig::default());
    let _ = run(&mut world, Command::BeginCombat);
    spawn(&mut world, AttackerKind::Orc, Vec2::new(340.0, 280.0), 60.0);
    let attacker = query::attacker_view(&world)
        .iter()
        .next()
        .map(|attacker| attacker.id)
        .expect("spawned");

    let _ = run(&mut world, Command::StrikeBase { attacker });
    let _ = run(&mut world, Command::StrikeBase { attacker });
    let events = run(&mut world, Command::Cleanup);

    assert_eq!(query::base(&world).health, 95.0);
    assert_eq!(query::gold(&world), 150);
    assert!(events.contains(&Event::AttackerDetonated { attacker }));
}

#[test]
fn bosses_ignore_stuns() {
    let mut world = started(SimulationConfig::default());
    let _ = run(&mut world, Command::BeginCombat);
    spawn(&mut world, AttackerKind::GoblinKing, Vec2::ZERO, 1800.0);
    spawn(&mut world, AttackerKind::Demon, Vec2::ZERO, 170.0);

    let ids: Vec<_> = query::attacker_view(&world)
        .iter()
        .map(|attacker| attacker.id)
        .collect();
    for attacker in &ids {
        let _ = run(
            &mut world,
            Command::StunAttacker {
                attacker: *attacker,
                duration: 24.0,
            },
        );
    }

    let view = query::attacker_view(&world);
    for attacker in view.iter() {
        if attacker.kind.is_boss() {
            assert_eq!(attacker.stun_timer, 0.0);
        } else {
            assert_eq!(attacker.stun_timer, 24.0);
        }
    }
}

/// Counts the ticks on which a stunned goblin refuses to move.
fn frozen_ticks(scale: TimeScale, duration: f32) -> usize {
    let mut world = started(SimulationConfig::default());
    let _ = run(&mut world, Command::BeginCombat);
    let _ = run(&mut world, Command::SetTimeScale { scale });
    spawn(&mut world, AttackerKind::Goblin, Vec2::new(5.0, 5.0), 35.0);
    let attacker = query::attacker_view(&world)
        .iter()
        .next()
        .map(|attacker| attacker.id)
        .expect("spawned");
    let _ = run(&mut world, Command::StunAttacker { attacker, duration });

    let mut frozen = 0;
    for step in 1..=20 {
        let _ = run(&mut world, Command::Tick);
        let before = query::attacker_view(&world).get(attacker).map(|a| a.position);
        let _ = run(
            &mut world,
            Command::MoveAttacker {
                attacker,
                position: Vec2::new(5.0 + step as f32, 5.0),
            },
        );
        if query::attacker_view(&world).get(attacker).map(|a| a.position) == before {
            frozen += 1;
        }
    }
    frozen
}

#[test]
fn stunned_attackers_do_not_move() {
    let mut world = started(SimulationConfig::default());
    let _ = run(&mut world, Command::BeginCombat);
    spawn(&mut world, AttackerKind::Goblin, Vec2::new(5.0, 5.0), 35.0);
    let attacker = query::attacker_view(&world)
        .iter()
        .next()
        .map(|attacker| attacker.id)
        .expect("spawned");

    let _ = run(&mut world, Command::StunAttacker { attacker, duration: 2.0 });
    let _ = run(
        &mut world,
        Command::MoveAttacker {
            attacker,
            position: Vec2::new(50.0, 50.0),
        },
    );

    assert_eq!(
        query::attacker_view(&world).get(attacker).map(|a| a.position),
        Some(Vec2::new(5.0, 5.0))
    );
}

#[test]
fn stun_holds_for_its_full_duration() {
    assert_eq!(frozen_ticks(TimeScale::Normal, 3.0), 3);
    assert_eq!(frozen_ticks(TimeScale::Normal, 12.0), 12);
}

#[test]
fn fast_time_halves_the_stun() {
    assert_eq!(frozen_ticks(TimeScale::Fast, 12.0), 6);
    assert_eq!(frozen_ticks(TimeScale::Fast, 3.0), 2);
}

#[test]
fn base_destruction_ends_the_game() {
    let mut world = started(SimulationConfig::default());
    let _ = run(&mut world, Command::BeginCombat);

    let events = run(&mut world, Command::DamageBase { amount: 250.0 });

    assert_eq!(query::base(&world).health, 0.0);
    assert_eq!(query::game_state(&world), GameState::GameOver);
    assert!(events.contains(&Event::StateChanged {
        from: GameState::Combat,
        to: GameState::GameOver,
    }));

    let tick = query::tick_index(&world);
    let _ = run(&mut world, Command::Tick);
    assert_eq!(query::tick_index(&world), tick, "terminal states halt the clock");
}

#[test]
fn clearing_a_round_regenerates_the_base() {
    let config = SimulationConfig {
        seed: 3,
        ..SimulationConfig::default()
    };
    let mut world = started(config);
    let _ = run(&mut world, Command::BeginCombat);
    let _ = run(&mut world, Command::DamageBase { amount: 50.0 });
    for _ in 0..8 {
        spawn(&mut world, AttackerKind::Goblin, Vec2::ZERO, 1.0);
    }
    let ids: Vec<_> = query::attacker_view(&world)
        .iter()
        .map(|attacker| attacker.id)
        .collect();

    let early = run(&mut world, Command::CompleteRound);
    assert!(early.is_empty(), "round cannot end with attackers alive");

    for attacker in ids {
        let _ = run(&mut world, Command::DamageAttacker { attacker, amount: 5.0 });
    }
    let _ = run(&mut world, Command::Cleanup);
    let events = run(&mut world, Command::CompleteRound);

    assert!(events.contains(&Event::RoundCompleted { round: 1 }));
    assert_eq!(query::round(&world), 2);
    assert_eq!(query::game_state(&world), GameState::Building);
    assert_eq!(query::base(&world).health, 70.0);
    assert_eq!(query::gold(&world), 150 + 8 * 5);
}

#[test]
fn clearing_the_final_round_is_victory() {
    let config = SimulationConfig {
        final_round: 1,
        ..SimulationConfig::default()
    };
    let mut world = started(config);
    let _ = run(&mut world, Command::BeginCombat);
    for _ in 0..8 {
        spawn(&mut world, AttackerKind::Goblin, Vec2::ZERO, 0.5);
    }
    for attacker in query::attacker_view(&world).iter().map(|a| a.id).collect::<Vec<_>>() {
        let _ = run(&mut world, Command::DamageAttacker { attacker, amount: 1.0 });
    }
    let _ = run(&mut world, Command::Cleanup);
    let _ = run(&mut world, Command::CompleteRound);

    assert_eq!(query::game_state(&world), GameState::Victory);
}

#[test]
fn triggered_trap_is_consumed() {
    let mut world = started(rich());
    let cell = CellCoord::new(2, 2);
    let _ = run(
        &mut world,
        Command::Place {
            kind: BuildKind::Trap(TrapKind::Blast),
            origin: cell,
        },
    );
    let trap = query::trap_view(&world)
        .iter()
        .next()
        .map(|trap| trap.id)
        .expect("trap armed");
    let _ = run(&mut world, Command::BeginCombat);

    let events = run(&mut world, Command::TriggerTrap { trap });
    let again = run(&mut world, Command::TriggerTrap { trap });

    assert!(events.contains(&Event::TrapTriggered {
        trap,
        kind: TrapKind::Blast
    }));
    assert!(again.is_empty());
    assert!(query::trap_view(&world).is_empty());
    assert_eq!(query::occupant(&world, cell), Occupant::Empty);
}

#[test]
fn reset_returns_to_intro() {
    let mut world = started(SimulationConfig::default());
    let _ = run(
        &mut world,
        Command::Place {
            kind: archer(),
            origin: CellCoord::new(6, 6),
        },
    );

    let events = run(&mut world, Command::Reset);

    assert_eq!(events, vec![Event::Reset]);
    assert_eq!(query::game_state(&world), GameState::Intro);
    assert_eq!(query::gold(&world), 150);
    assert!(query::structure_view(&world).is_empty());
}

/// Spawns and kills the rest of the quota, then closes the round.
fn sweep_wave(world: &mut World) {
    let wave = query::wave(world);
    for _ in wave.spawned..wave.quota {
        spawn(world, AttackerKind::Goblin, Vec2::ZERO, 1.0);
    }
    let ids: Vec<_> = query::attacker_view(world)
        .iter()
        .map(|attacker| attacker.id)
        .collect();
    for attacker in ids {
        let _ = run(world, Command::DamageAttacker { attacker, amount: 10.0 });
    }
    let _ = run(world, Command::Cleanup);
    let _ = run(world, Command::CompleteRound);
}

#[test]
fn demolishing_barracks_dismisses_its_knights() {
    let mut world = started(rich());
    while query::round(&world) < 10 {
        let _ = run(&mut world, Command::BeginCombat);
        sweep_wave(&mut world);
    }
    let barracks_cell = CellCoord::new(4, 6);
    let _ = run(
        &mut world,
        Command::Place {
            kind: BuildKind::Structure(StructureKind::Barracks),
            origin: barracks_cell,
        },
    );
    let barracks = query::structure_at(&world, barracks_cell).expect("barracks placed");
    let center = query::structure_view(&world)
        .get(barracks)
        .map(|structure| structure.center)
        .expect("barracks in view");

    let _ = run(&mut world, Command::BeginCombat);
    let _ = run(
        &mut world,
        Command::SpawnKnight {
            barracks,
            position: center + Vec2::new(30.0, 0.0),
        },
    );
    assert_eq!(query::knight_view(&world).len(), 1);
    sweep_wave(&mut world);
    assert_eq!(query::game_state(&world), GameState::Building);
    assert_eq!(query::knight_view(&world).len(), 1, "knights outlive the round");

    let gold = query::gold(&world);
    let events = run(
        &mut world,
        Command::Remove {
            cell: CellCoord::new(5, 7),
        },
    );

    assert!(events.contains(&Event::StructureRemoved {
        structure: barracks,
        refund: 233,
    }));
    assert_eq!(query::gold(&world), gold + 233);
    assert!(query::knight_view(&world).is_empty());
    assert!(query::structure_view(&world).is_empty());
}
