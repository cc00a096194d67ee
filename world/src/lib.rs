#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Bastion.
//!
//! The world owns every entity, the treasury and the round clock. It is only
//! mutated through [`apply`], which validates each [`Command`] against the
//! current state and reports the outcome as [`Event`]s. Read access goes
//! through the [`query`] module.

mod combat;
mod construction;
mod entities;
mod occupancy;

use bastion_core::{
    AttackerId, CellRect, Command, EffectId, EffectKind, Event, GameMode, GameState, KnightId,
    MissileId, PhaseError, ProjectileId, PuddleId, Rejection, SimulationConfig, StructureId,
    TimeScale, TrapId, Vec2, EFFECT_LIFE,
};
use slotmap::SlotMap;
use tracing::{debug, info};

pub use construction::UpgradeQuote;
use entities::{Attacker, Effect, Knight, Missile, Projectile, Puddle, Structure, Trap};
use occupancy::OccupancyGrid;

/// Represents the authoritative Bastion world state.
#[derive(Debug)]
pub struct World {
    config: SimulationConfig,
    state: GameState,
    mode: Option<GameMode>,
    time_scale: TimeScale,
    round: u32,
    gold: u32,
    base: Base,
    wave: WaveClock,
    tick_index: u64,
    occupancy: OccupancyGrid,
    attackers: SlotMap<AttackerId, Attacker>,
    structures: SlotMap<StructureId, Structure>,
    traps: SlotMap<TrapId, Trap>,
    projectiles: SlotMap<ProjectileId, Projectile>,
    missiles: SlotMap<MissileId, Missile>,
    knights: SlotMap<KnightId, Knight>,
    puddles: SlotMap<PuddleId, Puddle>,
    effects: SlotMap<EffectId, Effect>,
}

#[derive(Clone, Copy, Debug)]
struct Base {
    region: CellRect,
    center: Vec2,
    health: f32,
    max_health: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct WaveClock {
    spawned: u32,
    quota: u32,
    spawn_timer: u32,
    build_timer: u32,
}

impl World {
    /// Creates a world in the intro phase using the provided configuration.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let region = config.base_region();
        let mut occupancy = OccupancyGrid::new(config.columns, config.rows);
        occupancy.fill(region, bastion_core::Occupant::Base);
        let max_health = config.base_max_health as f32;
        Self {
            state: GameState::Intro,
            mode: None,
            time_scale: TimeScale::Normal,
            round: 1,
            gold: config.starting_gold,
            base: Base {
                region,
                center: region.center(config.cell_length),
                health: max_health,
                max_health,
            },
            wave: WaveClock::default(),
            tick_index: 0,
            occupancy,
            attackers: SlotMap::with_key(),
            structures: SlotMap::with_key(),
            traps: SlotMap::with_key(),
            projectiles: SlotMap::with_key(),
            missiles: SlotMap::with_key(),
            knights: SlotMap::with_key(),
            puddles: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            config,
        }
    }

    fn transition(&mut self, to: GameState, out_events: &mut Vec<Event>) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        debug!(?from, ?to, "game state changed");
        out_events.push(Event::StateChanged { from, to });
    }

    fn reject(&self, reason: impl Into<Rejection>, out_events: &mut Vec<Event>) {
        let reason = reason.into();
        debug!(%reason, state = ?self.state, "command rejected");
        out_events.push(Event::CommandRejected { reason });
    }

    fn add_effect(&mut self, kind: EffectKind, position: Vec2) {
        let _ = self.effects.insert(Effect {
            kind,
            position,
            life: EFFECT_LIFE,
        });
    }

    fn start_game(&mut self, mode: GameMode, out_events: &mut Vec<Event>) {
        if self.state != GameState::Intro {
            self.reject(
                PhaseError::Unexpected {
                    expected: GameState::Intro,
                    actual: self.state,
                },
                out_events,
            );
            return;
        }
        self.mode = Some(mode);
        info!(?mode, seed = self.config.seed, "session started");
        out_events.push(Event::GameStarted { mode });
        self.open_build_phase(out_events);
    }

    fn set_time_scale(&mut self, scale: TimeScale, out_events: &mut Vec<Event>) {
        if !matches!(self.state, GameState::Building | GameState::Combat) {
            self.reject(PhaseError::NotRunning { actual: self.state }, out_events);
            return;
        }
        if self.time_scale != scale {
            self.time_scale = scale;
            out_events.push(Event::TimeScaleChanged { scale });
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        info!(round = self.round, "session reset");
        *self = World::new(self.config.clone());
        out_events.push(Event::Reset);
    }

    #[cfg(feature = "cheats")]
    fn cheat_advance(&mut self, rounds: i32, gold: u32, out_events: &mut Vec<Event>) {
        let target = i64::from(self.round) + i64::from(rounds);
        let clamped = target.clamp(1, i64::from(self.config.final_round.max(1)));
        self.round = u32::try_from(clamped).unwrap_or(1);
        self.gold = self.gold.saturating_add(gold);
        info!(round = self.round, gold = self.gold, "cheat applied");
        out_events.push(Event::CheatApplied {
            round: self.round,
            gold: self.gold,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame { mode } => world.start_game(mode, out_events),
        Command::BeginCombat => world.begin_combat(out_events),
        Command::SetTimeScale { scale } => world.set_time_scale(scale, out_events),
        Command::Place { kind, origin } => world.place(kind, origin, out_events),
        Command::Remove { cell } => world.remove(cell, out_events),
        Command::Upgrade { cell } => world.upgrade(cell, out_events),
        Command::Reset => world.reset(out_events),
        #[cfg(feature = "cheats")]
        Command::CheatAdvance { rounds, gold } => world.cheat_advance(rounds, gold, out_events),
        Command::Tick => world.advance_clock(out_events),
        Command::SpawnAttacker {
            kind,
            position,
            profile,
        } => world.spawn_attacker(kind, position, profile, out_events),
        Command::MoveAttacker { attacker, position } => world.move_attacker(attacker, position),
        Command::DamageAttacker { attacker, amount } => world.damage_attacker(attacker, amount),
        Command::StunAttacker { attacker, duration } => world.stun_attacker(attacker, duration),
        Command::SlowAttacker {
            attacker,
            percent,
            duration,
        } => world.slow_attacker(attacker, percent, duration),
        Command::StrikeBase { attacker } => world.strike_base(attacker, out_events),
        Command::StrikeKnight { attacker, knight } => world.strike_knight(attacker, knight),
        Command::LaunchMissile {
            attacker,
            target,
            velocity,
        } => world.launch_missile(attacker, target, velocity, out_events),
        Command::MoveMissile {
            missile,
            position,
            velocity,
        } => world.move_missile(missile, position, velocity),
        Command::ResolveMissile { missile, impact } => world.resolve_missile(missile, impact),
        Command::DamageBase { amount } => world.damage_base(amount, out_events),
        Command::DamageKnight { knight, amount } => world.damage_knight(knight, amount),
        Command::FireProjectile { structure, target } => {
            world.fire_projectile(structure, target, out_events)
        }
        Command::MoveProjectile {
            projectile,
            position,
            velocity,
        } => world.move_projectile(projectile, position, velocity),
        Command::ResolveProjectile { projectile, impact } => {
            world.resolve_projectile(projectile, impact)
        }
        Command::AimBeams { structure, targets } => world.aim_beams(structure, targets),
        Command::CollectIncome { structure } => world.collect_income(structure, out_events),
        Command::SpawnKnight { barracks, position } => {
            world.spawn_knight(barracks, position, out_events)
        }
        Command::MoveKnight { knight, position } => world.move_knight(knight, position),
        Command::KnightStrike { knight, attacker } => world.knight_strike(knight, attacker),
        Command::TriggerTrap { trap } => world.trigger_trap(trap, out_events),
        Command::CompleteRound => world.complete_round(out_events),
        Command::Cleanup => world.cleanup(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bastion_core::{
        AttackerView, BaseSnapshot, BuildKind, CellCoord, CellRect, EffectView, GameMode,
        GameState, KnightView, MissileView, Occupant, PlacementError, ProjectileView,
        PuddleView, SimulationConfig, StructureId, StructureKind, StructureView, TimeScale,
        TrapView, UpgradeError, WaveSnapshot,
    };

    use super::{UpgradeQuote, World};

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Current phase of the session.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Mode chosen when the session started.
    #[must_use]
    pub fn game_mode(world: &World) -> Option<GameMode> {
        world.mode
    }

    /// Current round, starting at one.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.round
    }

    /// Gold in the treasury.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.gold
    }

    /// Active speed multiplier.
    #[must_use]
    pub fn time_scale(world: &World) -> TimeScale {
        world.time_scale
    }

    /// Number of ticks processed since the session was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Snapshot of the base.
    #[must_use]
    pub fn base(world: &World) -> BaseSnapshot {
        BaseSnapshot {
            region: world.base.region,
            center: world.base.center,
            health: world.base.health,
            max_health: world.base.max_health,
        }
    }

    /// Snapshot of the round clock.
    #[must_use]
    pub fn wave(world: &World) -> WaveSnapshot {
        WaveSnapshot {
            state: world.state,
            mode: world.mode,
            round: world.round,
            spawned: world.wave.spawned,
            quota: world.wave.quota,
            spawn_timer: world.wave.spawn_timer,
            build_timer: world.wave.build_timer,
            time_scale: world.time_scale,
        }
    }

    /// Attackers still to be dealt with this round: unspawned plus alive.
    #[must_use]
    pub fn remaining_enemies(world: &World) -> u32 {
        let alive = world.attackers.values().filter(|a| a.is_alive()).count();
        world
            .wave
            .quota
            .saturating_sub(world.wave.spawned)
            .saturating_add(u32::try_from(alive).unwrap_or(u32::MAX))
    }

    /// Captures every attacker, including those awaiting removal.
    #[must_use]
    pub fn attacker_view(world: &World) -> AttackerView {
        AttackerView::from_snapshots(
            world
                .attackers
                .iter()
                .map(|(id, attacker)| attacker.snapshot(id))
                .collect(),
        )
    }

    /// Captures every structure.
    #[must_use]
    pub fn structure_view(world: &World) -> StructureView {
        StructureView::from_snapshots(
            world
                .structures
                .iter()
                .map(|(id, structure)| structure.snapshot(id))
                .collect(),
        )
    }

    /// Captures every armed trap.
    #[must_use]
    pub fn trap_view(world: &World) -> TrapView {
        TrapView::from_snapshots(
            world
                .traps
                .iter()
                .map(|(id, trap)| trap.snapshot(id))
                .collect(),
        )
    }

    /// Captures every tower projectile that has not resolved.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .filter(|(_, projectile)| !projectile.resolved)
                .map(|(id, projectile)| projectile.snapshot(id))
                .collect(),
        )
    }

    /// Captures every attacker missile that has not resolved.
    #[must_use]
    pub fn missile_view(world: &World) -> MissileView {
        MissileView::from_snapshots(
            world
                .missiles
                .iter()
                .filter(|(_, missile)| !missile.resolved)
                .map(|(id, missile)| missile.snapshot(id))
                .collect(),
        )
    }

    /// Captures every knight, including those awaiting removal.
    #[must_use]
    pub fn knight_view(world: &World) -> KnightView {
        KnightView::from_snapshots(
            world
                .knights
                .iter()
                .map(|(id, knight)| knight.snapshot(id))
                .collect(),
        )
    }

    /// Captures every puddle.
    #[must_use]
    pub fn puddle_view(world: &World) -> PuddleView {
        PuddleView::from_snapshots(
            world
                .puddles
                .iter()
                .map(|(id, puddle)| puddle.snapshot(id))
                .collect(),
        )
    }

    /// Captures every cosmetic effect.
    #[must_use]
    pub fn effect_view(world: &World) -> EffectView {
        EffectView::from_snapshots(
            world
                .effects
                .iter()
                .map(|(id, effect)| effect.snapshot(id))
                .collect(),
        )
    }

    /// Reports what covers the provided cell.
    #[must_use]
    pub fn occupant(world: &World, cell: CellCoord) -> Occupant {
        world.occupancy.occupant(cell)
    }

    /// Structure whose footprint covers the provided cell.
    #[must_use]
    pub fn structure_at(world: &World, cell: CellCoord) -> Option<StructureId> {
        match world.occupancy.occupant(cell) {
            Occupant::Structure(id) => Some(id),
            _ => None,
        }
    }

    /// Checks whether a placement would be accepted right now.
    ///
    /// Returns the footprint the placement would cover.
    pub fn can_place(
        world: &World,
        kind: BuildKind,
        origin: CellCoord,
    ) -> Result<CellRect, PlacementError> {
        world.validate_placement(kind, origin)
    }

    /// Reports whether every cell of the footprint lies within build range of the base.
    ///
    /// Traps ignore the build range, so this always holds for them.
    #[must_use]
    pub fn is_within_build_range(world: &World, kind: BuildKind, origin: CellCoord) -> bool {
        kind.is_trap() || world.within_build_range(world.footprint(kind, origin))
    }

    /// Prices the next upgrade of the structure covering the cell.
    pub fn upgrade_quote(world: &World, cell: CellCoord) -> Result<UpgradeQuote, UpgradeError> {
        world.quote_upgrade(cell)
    }

    /// Reports whether the kind may be built during the current round.
    #[must_use]
    pub fn is_unlocked(world: &World, kind: BuildKind) -> bool {
        world.round >= kind.unlock_round()
    }

    /// Number of mines allowed during the current round.
    #[must_use]
    pub fn mine_cap(world: &World) -> u32 {
        bastion_core::mine_cap(world.round)
    }

    /// Number of mines currently standing.
    #[must_use]
    pub fn mine_count(world: &World) -> u32 {
        world.count_structures(StructureKind::Mine)
    }
}
