use bastion_core::{
    BuildKind, CellCoord, Command, Event, GameState, StructureKind, TrapKind,
};
use bastion_system_builder::{Builder, BuilderAction, BuilderMode, Config};

fn archer() -> BuildKind {
    BuildKind::Structure(StructureKind::Archer)
}

/// Builder that has seen the session open the build phase of `round`.
fn building(round: u32) -> Builder {
    let mut builder = Builder::new(Config::new(14));
    let mut commands = Vec::new();
    builder.handle(
        &[
            Event::StateChanged {
                from: GameState::Intro,
                to: GameState::Building,
            },
            Event::BuildPhaseStarted { round },
        ],
        None,
        &mut commands,
    );
    assert!(commands.is_empty());
    builder
}

fn act(builder: &mut Builder, action: BuilderAction) -> Vec<Command> {
    let mut commands = Vec::new();
    builder.handle(&[], Some(action), &mut commands);
    commands
}

#[test]
fn click_places_the_selected_kind() {
    let mut builder = building(1);
    let cell = CellCoord::new(6, 6);

    assert!(
        act(&mut builder, BuilderAction::Click(cell)).is_empty(),
        "nothing is selected yet",
    );
    let _ = act(&mut builder, BuilderAction::Select(archer()));

    assert_eq!(
        act(&mut builder, BuilderAction::Click(cell)),
        vec![Command::Place {
            kind: archer(),
            origin: cell,
        }],
    );
}

#[test]
fn clicks_are_ignored_outside_the_build_phase() {
    let mut builder = building(1);
    let _ = act(&mut builder, BuilderAction::Select(archer()));
    let mut commands = Vec::new();

    builder.handle(
        &[Event::StateChanged {
            from: GameState::Building,
            to: GameState::Combat,
        }],
        Some(BuilderAction::Click(CellCoord::new(6, 6))),
        &mut commands,
    );

    assert!(
        commands.is_empty(),
        "the build menu is closed during combat"
    );
}

#[test]
fn delete_mode_clears_the_selection() {
    let mut builder = building(1);
    let _ = act(&mut builder, BuilderAction::Select(archer()));
    let cell = CellCoord::new(3, 3);

    let _ = act(&mut builder, BuilderAction::DeleteMode(true));

    assert_eq!(builder.selection(), None);
    assert_eq!(builder.mode(), BuilderMode::Delete);
    assert_eq!(
        act(&mut builder, BuilderAction::Click(cell)),
        vec![Command::Remove { cell }],
    );
}

#[test]
fn upgrade_mode_waits_for_the_tier_two_round() {
    let mut builder = building(13);
    let _ = act(&mut builder, BuilderAction::UpgradeMode(true));
    assert_eq!(builder.mode(), BuilderMode::Place);
    assert!(!builder.can_upgrade());

    let mut builder = building(14);
    let _ = act(&mut builder, BuilderAction::UpgradeMode(true));
    assert_eq!(builder.mode(), BuilderMode::Upgrade);
    let cell = CellCoord::new(7, 5);
    assert_eq!(
        act(&mut builder, BuilderAction::Click(cell)),
        vec![Command::Upgrade { cell }],
    );
}

#[test]
fn toggling_one_mode_replaces_the_other() {
    let mut builder = building(14);
    let _ = act(&mut builder, BuilderAction::DeleteMode(true));
    let _ = act(&mut builder, BuilderAction::UpgradeMode(true));
    assert_eq!(builder.mode(), BuilderMode::Upgrade);

    let _ = act(&mut builder, BuilderAction::DeleteMode(false));
    assert_eq!(
        builder.mode(),
        BuilderMode::Upgrade,
        "switching delete off leaves upgrade mode alone",
    );

    let _ = act(
        &mut builder,
        BuilderAction::Select(BuildKind::Trap(TrapKind::Blast)),
    );
    assert_eq!(builder.mode(), BuilderMode::Place);
}

#[test]
fn reset_forgets_selection_and_round() {
    let mut builder = building(20);
    let _ = act(&mut builder, BuilderAction::Select(archer()));
    let mut commands = Vec::new();

    builder.handle(
        &[Event::Reset],
        Some(BuilderAction::Click(CellCoord::new(6, 6))),
        &mut commands,
    );

    assert!(commands.is_empty());
    assert_eq!(builder.selection(), None);
    assert!(!builder.can_upgrade());
}
