#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick scheduler for the Bastion engine.
//!
//! [`Simulation`] owns the authoritative world together with every pure
//! system. Player input enters through its command surface and is validated by
//! the world before anything changes. [`Simulation::advance`] runs one tick:
//! the clock, the wave director, each combat phase in a fixed order against a
//! freshly captured view, and finally the cleanup pass. Presentation layers
//! read the outcome through [`Simulation::snapshot`] between ticks.

use bastion_core::{
    mine_cap, spawn_delay, AttackerView, BaseSnapshot, BuildKind, CellCoord, Command, EffectView,
    Event, GameMode, GameState, KnightView, MissileView, ProjectileView, PuddleView,
    SimulationConfig, StructureView, TimeScale, TrapView, WaveSnapshot,
};
use bastion_system_attackers::AttackerAi;
use bastion_system_ballistics::Ballistics;
use bastion_system_builder::{Builder, BuilderAction, BuilderMode};
use bastion_system_defenses::Defenses;
use bastion_system_hazards::Hazards;
use bastion_system_knights::KnightAi;
use bastion_system_waves::Waves;
use bastion_world::{apply, query, World};
use serde::Serialize;
use tracing::{debug, info};

/// Read-only picture of the session handed to renderers and exporters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    /// Ticks processed since the session was created.
    pub tick: u64,
    /// Phase of the session.
    pub state: GameState,
    /// Mode chosen at start, if any.
    pub mode: Option<GameMode>,
    /// Current round.
    pub round: u32,
    /// Gold in the treasury.
    pub gold: u32,
    /// Active speed.
    pub time_scale: TimeScale,
    /// The base.
    pub base: BaseSnapshot,
    /// The round clock.
    pub wave: WaveSnapshot,
    /// Attackers still to spawn plus those alive.
    pub remaining_enemies: u32,
    /// Mines allowed this round.
    pub mine_cap: u32,
    /// Wave-clock ticks between two spawns this round.
    pub spawn_delay: u32,
    /// Build menu in button order, filtered to what is unlocked.
    pub build_menu: Vec<BuildKind>,
    /// Attackers, including those awaiting cleanup.
    pub attackers: AttackerView,
    /// Structures.
    pub structures: StructureView,
    /// Armed traps.
    pub traps: TrapView,
    /// Tower projectiles in flight.
    pub projectiles: ProjectileView,
    /// Attacker missiles in flight.
    pub missiles: MissileView,
    /// Knights.
    pub knights: KnightView,
    /// Slowing puddles.
    pub puddles: PuddleView,
    /// Cosmetic effects.
    pub effects: EffectView,
}

/// A running session: the world, its systems and the player's build menu.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    waves: Waves,
    attackers: AttackerAi,
    ballistics: Ballistics,
    knights: KnightAi,
    hazards: Hazards,
    defenses: Defenses,
    builder: Builder,
    commands: Vec<Command>,
    events: Vec<Event>,
    /// Leading events that were already buffered when the last tick ended.
    settled: usize,
}

impl Simulation {
    /// Creates a session in the intro using the provided configuration.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let width = config.world_width();
        let height = config.world_height();
        let seed = config.seed;
        Self {
            waves: Waves::new(bastion_system_waves::Config::new(width, height, seed)),
            attackers: AttackerAi::new(),
            ballistics: Ballistics::new(bastion_system_ballistics::Config::new(width, height)),
            knights: KnightAi::new(),
            hazards: Hazards::new(bastion_system_hazards::Config::new(config.cell_length)),
            defenses: Defenses::new(bastion_system_defenses::Config::new(
                seed.wrapping_add(1),
            )),
            builder: Builder::new(bastion_system_builder::Config::new(config.tier_two_round)),
            commands: Vec::new(),
            events: Vec::new(),
            settled: 0,
            world: World::new(config),
        }
    }

    /// Authoritative world, for callers that want to run their own queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Leaves the intro in the provided mode.
    pub fn start(&mut self, mode: GameMode) {
        self.execute(Command::StartGame { mode });
    }

    /// Picks a kind from the build menu.
    pub fn select_structure_type(&mut self, kind: BuildKind) {
        self.input(BuilderAction::Select(kind));
    }

    /// Kind currently picked from the build menu.
    #[must_use]
    pub fn selection(&self) -> Option<BuildKind> {
        self.builder.selection()
    }

    /// What a click on the grid currently does.
    #[must_use]
    pub fn builder_mode(&self) -> BuilderMode {
        self.builder.mode()
    }

    /// Builds the selected kind anchored at `cell`.
    pub fn place_at(&mut self, cell: CellCoord) {
        if let Some(kind) = self.builder.selection() {
            self.execute(Command::Place { kind, origin: cell });
        }
    }

    /// Demolishes whatever covers `cell`.
    pub fn delete_at(&mut self, cell: CellCoord) {
        self.execute(Command::Remove { cell });
    }

    /// Upgrades the structure covering `cell`.
    pub fn upgrade_at(&mut self, cell: CellCoord) {
        self.execute(Command::Upgrade { cell });
    }

    /// Clicks `cell`, acting according to the active builder mode.
    pub fn click(&mut self, cell: CellCoord) {
        self.input(BuilderAction::Click(cell));
    }

    /// Turns delete mode on or off.
    pub fn set_delete_mode(&mut self, enabled: bool) {
        self.input(BuilderAction::DeleteMode(enabled));
    }

    /// Turns upgrade mode on or off, returning whether it is now active.
    ///
    /// Switching it on is refused before the tier-two round.
    pub fn set_upgrade_mode(&mut self, enabled: bool) -> bool {
        self.input(BuilderAction::UpgradeMode(enabled));
        self.builder.mode() == BuilderMode::Upgrade
    }

    /// Ends the build phase early and starts the round.
    pub fn ready_for_combat(&mut self) {
        self.execute(Command::BeginCombat);
    }

    /// Switches to the provided speed.
    pub fn set_time_scale(&mut self, scale: TimeScale) {
        self.execute(Command::SetTimeScale { scale });
    }

    /// Flips between normal and fast speed.
    pub fn toggle_time_scale(&mut self) {
        let scale = query::time_scale(&self.world).toggled();
        self.set_time_scale(scale);
    }

    /// Moves the round by `rounds` and grants `gold`.
    #[cfg(feature = "cheats")]
    pub fn cheat_advance(&mut self, rounds: i32, gold: u32) {
        self.execute(Command::CheatAdvance { rounds, gold });
    }

    /// Discards the session and returns to the intro.
    pub fn reset(&mut self) {
        self.execute(Command::Reset);
    }

    /// Runs one tick.
    ///
    /// Nothing happens in the intro or once the session has ended. Events the
    /// previous tick left undrained are discarded first, so the buffer never
    /// holds more than one tick plus the input received since.
    pub fn advance(&mut self) {
        let state = query::game_state(&self.world);
        if state == GameState::Intro || state.is_terminal() {
            return;
        }
        let _ = self.events.drain(..self.settled.min(self.events.len()));
        self.execute(Command::Tick);

        let mut out = std::mem::take(&mut self.commands);
        self.waves.handle(&query::wave(&self.world), &mut out);
        self.flush(&mut out);

        if query::game_state(&self.world) == GameState::Combat {
            self.combat(&mut out);
        }

        self.execute(Command::Cleanup);
        let remaining = query::attacker_view(&self.world).len();
        self.waves
            .review(&query::wave(&self.world), remaining, &mut out);
        self.flush(&mut out);
        self.commands = out;
        self.settled = self.events.len();

        let after = query::game_state(&self.world);
        if after != state && after.is_terminal() {
            info!(
                ?after,
                round = query::round(&self.world),
                tick = query::tick_index(&self.world),
                "session ended"
            );
        }
    }

    /// Combat phases in order; each reads a view captured after the previous
    /// phase was applied.
    fn combat(&mut self, out: &mut Vec<Command>) {
        let scale = query::time_scale(&self.world);

        self.attackers.handle(
            scale,
            &query::attacker_view(&self.world),
            &query::knight_view(&self.world),
            &query::base(&self.world),
            out,
        );
        self.flush(out);

        self.ballistics.handle_missiles(
            scale,
            &query::missile_view(&self.world),
            &query::knight_view(&self.world),
            &query::base(&self.world),
            out,
        );
        self.flush(out);

        self.knights.handle(
            scale,
            &query::knight_view(&self.world),
            &query::attacker_view(&self.world),
            out,
        );
        self.flush(out);

        self.hazards.handle_puddles(
            &query::puddle_view(&self.world),
            &query::attacker_view(&self.world),
            out,
        );
        self.flush(out);
        self.hazards.handle_traps(
            &query::trap_view(&self.world),
            &query::attacker_view(&self.world),
            out,
        );
        self.flush(out);

        self.defenses.handle(
            scale,
            &query::structure_view(&self.world),
            &query::attacker_view(&self.world),
            out,
        );
        self.flush(out);

        self.ballistics.handle_projectiles(
            scale,
            &query::projectile_view(&self.world),
            &query::attacker_view(&self.world),
            out,
        );
        self.flush(out);
    }

    /// Captures everything a renderer or exporter needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let world = &self.world;
        let round = query::round(world);
        Snapshot {
            tick: query::tick_index(world),
            state: query::game_state(world),
            mode: query::game_mode(world),
            round,
            gold: query::gold(world),
            time_scale: query::time_scale(world),
            base: query::base(world),
            wave: query::wave(world),
            remaining_enemies: query::remaining_enemies(world),
            mine_cap: mine_cap(round),
            spawn_delay: spawn_delay(round),
            build_menu: BuildKind::MENU
                .into_iter()
                .filter(|kind| query::is_unlocked(world, *kind))
                .collect(),
            attackers: query::attacker_view(world),
            structures: query::structure_view(world),
            traps: query::trap_view(world),
            projectiles: query::projectile_view(world),
            missiles: query::missile_view(world),
            knights: query::knight_view(world),
            puddles: query::puddle_view(world),
            effects: query::effect_view(world),
        }
    }

    /// Hands over the events broadcast since the previous call.
    ///
    /// Call once per tick: only the latest tick and the input that followed
    /// it are kept.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.settled = 0;
        std::mem::take(&mut self.events)
    }

    fn input(&mut self, action: BuilderAction) {
        let mut out = std::mem::take(&mut self.commands);
        self.builder.handle(&[], Some(action), &mut out);
        debug!(?action, emitted = out.len(), "builder input");
        self.flush(&mut out);
        self.commands = out;
    }

    fn flush(&mut self, out: &mut Vec<Command>) {
        for command in out.drain(..) {
            self.execute(command);
        }
    }

    /// Applies one command and lets the builder see what it caused.
    fn execute(&mut self, command: Command) {
        let start = self.events.len();
        apply(&mut self.world, command, &mut self.events);
        let mut ignored = Vec::new();
        self.builder
            .handle(self.events.get(start..).unwrap_or_default(), None, &mut ignored);
    }
}
