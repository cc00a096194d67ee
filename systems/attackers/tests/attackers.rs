use bastion_core::{
    AttackerId, AttackerKind, AttackerSnapshot, AttackerView, BaseSnapshot, CellCoord, CellRect,
    CellRectSize, Command, KnightId, KnightSnapshot, KnightView, StrikeTarget, StructureId,
    TimeScale, Vec2,
};
use bastion_system_attackers::AttackerAi;

const BASE_CENTER: Vec2 = Vec2::new(360.0, 280.0);

fn base() -> BaseSnapshot {
    BaseSnapshot {
        region: CellRect::from_origin_and_size(CellCoord::new(8, 6), CellRectSize::square(2)),
        center: BASE_CENTER,
        health: 100.0,
        max_health: 100.0,
    }
}

fn attacker(kind: AttackerKind, position: Vec2) -> AttackerSnapshot {
    AttackerSnapshot {
        id: AttackerId::default(),
        kind,
        position,
        health: 50.0,
        max_health: 50.0,
        speed: 1.0,
        damage: 5.0,
        gold_reward: 5,
        attack_cooldown: 0.0,
        stun_timer: 0.0,
        stunned: false,
        slow_timer: 0.0,
        slow_percent: 0.0,
    }
}

fn knight(position: Vec2) -> KnightSnapshot {
    KnightSnapshot {
        id: KnightId::default(),
        barracks: StructureId::default(),
        anchor: position,
        leash_range: 200.0,
        position,
        health: 140.0,
        max_health: 140.0,
        damage: 15.0,
        attack_cooldown: 0.0,
    }
}

fn decide(
    scale: TimeScale,
    snapshot: AttackerSnapshot,
    knights: Vec<KnightSnapshot>,
) -> Vec<Command> {
    let mut commands = Vec::new();
    AttackerAi::new().handle(
        scale,
        &AttackerView::from_snapshots(vec![snapshot]),
        &KnightView::from_snapshots(knights),
        &base(),
        &mut commands,
    );
    commands
}

#[test]
fn attackers_walk_toward_the_base() {
    let commands = decide(
        TimeScale::Normal,
        attacker(AttackerKind::Goblin, Vec2::new(0.0, 280.0)),
        Vec::new(),
    );

    assert_eq!(
        commands,
        vec![Command::MoveAttacker {
            attacker: AttackerId::default(),
            position: Vec2::new(1.0, 280.0),
        }]
    );
}

#[test]
fn fast_time_doubles_the_step() {
    let commands = decide(
        TimeScale::Fast,
        attacker(AttackerKind::Goblin, Vec2::new(0.0, 280.0)),
        Vec::new(),
    );

    assert_eq!(
        commands,
        vec![Command::MoveAttacker {
            attacker: AttackerId::default(),
            position: Vec2::new(2.0, 280.0),
        }]
    );
}

#[test]
fn slowed_attackers_lose_a_share_of_their_speed() {
    let mut slowed = attacker(AttackerKind::Demon, Vec2::new(0.0, 280.0));
    slowed.slow_timer = 10.0;
    slowed.slow_percent = 0.6;

    let commands = decide(TimeScale::Normal, slowed, Vec::new());

    let [Command::MoveAttacker { position, .. }] = commands.as_slice() else {
        panic!("expected a single move, got {commands:?}");
    };
    assert!((position.x - 0.4).abs() < 1e-5);
}

#[test]
fn stunned_and_dead_attackers_do_nothing() {
    let mut stunned = attacker(AttackerKind::Goblin, Vec2::new(0.0, 280.0));
    stunned.stun_timer = 3.0;
    stunned.stunned = true;
    assert!(decide(TimeScale::Normal, stunned, Vec::new()).is_empty());

    let mut dead = attacker(AttackerKind::Goblin, Vec2::new(0.0, 280.0));
    dead.health = 0.0;
    assert!(decide(TimeScale::Normal, dead, Vec::new()).is_empty());
}

#[test]
fn suicide_runners_strike_on_arrival() {
    let mut runner = attacker(AttackerKind::Orc, Vec2::new(335.0, 280.0));
    runner.attack_cooldown = 20.0;

    let commands = decide(TimeScale::Normal, runner, Vec::new());

    assert_eq!(
        commands,
        vec![Command::StrikeBase {
            attacker: AttackerId::default()
        }]
    );
}

#[test]
fn persistent_melee_waits_for_cooldown() {
    let mut demon = attacker(AttackerKind::Demon, Vec2::new(335.0, 280.0));
    demon.attack_cooldown = 20.0;
    assert!(decide(TimeScale::Normal, demon, Vec::new()).is_empty());

    demon.attack_cooldown = 0.0;
    assert_eq!(
        decide(TimeScale::Normal, demon, Vec::new()),
        vec![Command::StrikeBase {
            attacker: AttackerId::default()
        }]
    );
}

#[test]
fn bowmen_shoot_from_range() {
    let bowman = attacker(AttackerKind::Bowman, Vec2::new(250.0, 280.0));

    let commands = decide(TimeScale::Normal, bowman, Vec::new());

    assert_eq!(
        commands,
        vec![Command::LaunchMissile {
            attacker: AttackerId::default(),
            target: StrikeTarget::Base,
            velocity: Vec2::new(5.0, 0.0),
        }]
    );
}

#[test]
fn warlocks_outrange_bowmen() {
    let warlock = attacker(AttackerKind::Warlock, Vec2::new(210.0, 280.0));
    let bowman = attacker(AttackerKind::Bowman, Vec2::new(210.0, 280.0));

    assert!(matches!(
        decide(TimeScale::Normal, warlock, Vec::new()).as_slice(),
        [Command::LaunchMissile { .. }]
    ));
    assert!(matches!(
        decide(TimeScale::Normal, bowman, Vec::new()).as_slice(),
        [Command::MoveAttacker { .. }]
    ));
}

#[test]
fn nearby_knights_draw_melee_attackers() {
    let goblin = attacker(AttackerKind::Goblin, Vec2::new(100.0, 100.0));

    let commands = decide(
        TimeScale::Normal,
        goblin,
        vec![knight(Vec2::new(120.0, 100.0))],
    );

    assert_eq!(
        commands,
        vec![Command::StrikeKnight {
            attacker: AttackerId::default(),
            knight: KnightId::default(),
        }]
    );
}

#[test]
fn attackers_close_in_on_knights_before_striking() {
    let goblin = attacker(AttackerKind::Goblin, Vec2::new(100.0, 100.0));

    let commands = decide(
        TimeScale::Normal,
        goblin,
        vec![knight(Vec2::new(135.0, 100.0))],
    );

    assert_eq!(
        commands,
        vec![Command::MoveAttacker {
            attacker: AttackerId::default(),
            position: Vec2::new(101.0, 100.0),
        }]
    );
}

#[test]
fn distant_knights_are_ignored() {
    let goblin = attacker(AttackerKind::Goblin, Vec2::new(0.0, 280.0));

    let commands = decide(
        TimeScale::Normal,
        goblin,
        vec![knight(Vec2::new(45.0, 280.0))],
    );

    assert_eq!(
        commands,
        vec![Command::MoveAttacker {
            attacker: AttackerId::default(),
            position: Vec2::new(1.0, 280.0),
        }]
    );
}

#[test]
fn bosses_ignore_knights() {
    let king = attacker(AttackerKind::GoblinKing, Vec2::new(100.0, 280.0));

    let commands = decide(
        TimeScale::Normal,
        king,
        vec![knight(Vec2::new(110.0, 280.0))],
    );

    assert_eq!(
        commands,
        vec![Command::MoveAttacker {
            attacker: AttackerId::default(),
            position: Vec2::new(101.0, 280.0),
        }]
    );
}
