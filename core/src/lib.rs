#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bastion simulation engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world validates and
//! executes them through its `apply` entry point, and then broadcasts
//! [`Event`] values describing what actually happened. Systems read immutable
//! [`View`]s captured from the world and respond exclusively with new command
//! batches, which keeps every tick deterministic for a given seed.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod kinds;
pub mod rules;
pub mod snapshot;

pub use catalog::*;
pub use config::SimulationConfig;
pub use errors::{PhaseError, PlacementError, Rejection, RemovalError, UpgradeError};
pub use geometry::{CellCoord, CellRect, CellRectSize};
pub use glam::Vec2;
pub use kinds::*;
pub use rules::*;
pub use snapshot::*;

use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Identifier of an attacker.
    pub struct AttackerId;
    /// Identifier of a structure.
    pub struct StructureId;
    /// Identifier of a trap.
    pub struct TrapId;
    /// Identifier of a tower projectile.
    pub struct ProjectileId;
    /// Identifier of an attacker missile.
    pub struct MissileId;
    /// Identifier of a knight.
    pub struct KnightId;
    /// Identifier of a slowing puddle.
    pub struct PuddleId;
    /// Identifier of a cosmetic effect.
    pub struct EffectId;
}

/// Rolled attributes of an attacker about to spawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackerProfile {
    /// Starting and maximum health.
    pub health: f32,
    /// World units walked per tick.
    pub speed: f32,
    /// Damage of one strike or missile.
    pub damage: f32,
    /// Gold paid when killed.
    pub gold_reward: u32,
}

/// What covers a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Occupant {
    /// Nothing.
    Empty,
    /// Part of the base.
    Base,
    /// Part of a structure footprint.
    Structure(StructureId),
    /// An armed trap.
    Trap(TrapId),
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Leaves the intro and opens the first build phase.
    StartGame {
        /// Mode the session runs in.
        mode: GameMode,
    },
    /// Ends the build phase and starts the current round.
    BeginCombat,
    /// Changes the speed multiplier.
    SetTimeScale {
        /// Speed to activate.
        scale: TimeScale,
    },
    /// Builds a structure or trap anchored at the provided cell.
    Place {
        /// What to build.
        kind: BuildKind,
        /// Upper-left cell of the footprint.
        origin: CellCoord,
    },
    /// Demolishes whatever structure or trap covers the cell.
    Remove {
        /// Cell selected for demolition.
        cell: CellCoord,
    },
    /// Upgrades the structure covering the cell by one tier.
    Upgrade {
        /// Cell selected for upgrading.
        cell: CellCoord,
    },
    /// Discards the session and returns to the intro.
    Reset,
    /// Skips rounds and grants gold for testing.
    #[cfg(feature = "cheats")]
    CheatAdvance {
        /// Rounds to move by; negative values go back.
        rounds: i32,
        /// Gold to add.
        gold: u32,
    },
    /// Advances all timers by one tick.
    Tick,
    /// Creates an attacker.
    SpawnAttacker {
        /// Kind of attacker.
        kind: AttackerKind,
        /// Spawn position in world units.
        position: Vec2,
        /// Rolled attributes.
        profile: AttackerProfile,
    },
    /// Moves an attacker.
    MoveAttacker {
        /// Attacker to move.
        attacker: AttackerId,
        /// New position.
        position: Vec2,
    },
    /// Subtracts health from an attacker.
    DamageAttacker {
        /// Victim.
        attacker: AttackerId,
        /// Health removed.
        amount: f32,
    },
    /// Stuns an attacker. Bosses shrug this off.
    StunAttacker {
        /// Victim.
        attacker: AttackerId,
        /// Ticks of stun.
        duration: f32,
    },
    /// Slows an attacker.
    SlowAttacker {
        /// Victim.
        attacker: AttackerId,
        /// Fraction of speed removed.
        percent: f32,
        /// Ticks the slow lingers.
        duration: f32,
    },
    /// Makes a melee attacker hit the base.
    StrikeBase {
        /// Attacker striking.
        attacker: AttackerId,
    },
    /// Makes a melee attacker hit a knight.
    StrikeKnight {
        /// Attacker striking.
        attacker: AttackerId,
        /// Knight being hit.
        knight: KnightId,
    },
    /// Makes a ranged attacker fire a missile.
    LaunchMissile {
        /// Attacker firing.
        attacker: AttackerId,
        /// What the missile is aimed at.
        target: StrikeTarget,
        /// Initial velocity per unscaled tick.
        velocity: Vec2,
    },
    /// Moves a missile.
    MoveMissile {
        /// Missile to move.
        missile: MissileId,
        /// New position.
        position: Vec2,
        /// New velocity per unscaled tick.
        velocity: Vec2,
    },
    /// Retires a missile.
    ResolveMissile {
        /// Missile to retire.
        missile: MissileId,
        /// Whether the missile struck something.
        impact: bool,
    },
    /// Subtracts health from the base.
    DamageBase {
        /// Health removed.
        amount: f32,
    },
    /// Subtracts health from a knight.
    DamageKnight {
        /// Victim.
        knight: KnightId,
        /// Health removed.
        amount: f32,
    },
    /// Makes a tower fire a projectile at an attacker.
    FireProjectile {
        /// Tower firing.
        structure: StructureId,
        /// Attacker the projectile is bound to.
        target: AttackerId,
    },
    /// Moves a tower projectile.
    MoveProjectile {
        /// Projectile to move.
        projectile: ProjectileId,
        /// New position.
        position: Vec2,
        /// New velocity per unscaled tick.
        velocity: Vec2,
    },
    /// Retires a tower projectile.
    ResolveProjectile {
        /// Projectile to retire.
        projectile: ProjectileId,
        /// Whether the projectile struck its target.
        impact: bool,
    },
    /// Points the beams of a fire tower.
    AimBeams {
        /// Fire tower.
        structure: StructureId,
        /// Attackers held by each beam.
        targets: [Option<AttackerId>; 2],
    },
    /// Pays out a mine whose timer has filled.
    CollectIncome {
        /// Mine paying out.
        structure: StructureId,
    },
    /// Trains a knight at a barracks.
    SpawnKnight {
        /// Barracks training the knight.
        barracks: StructureId,
        /// Position the knight appears at.
        position: Vec2,
    },
    /// Moves a knight.
    MoveKnight {
        /// Knight to move.
        knight: KnightId,
        /// New position.
        position: Vec2,
    },
    /// Makes a knight hit an attacker.
    KnightStrike {
        /// Knight striking.
        knight: KnightId,
        /// Attacker being hit.
        attacker: AttackerId,
    },
    /// Sets off a trap, consuming it.
    TriggerTrap {
        /// Trap to set off.
        trap: TrapId,
    },
    /// Ends the current round once it has been cleared.
    CompleteRound,
    /// Removes everything that died or expired during the tick.
    Cleanup,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Number of ticks processed so far.
        tick: u64,
        /// Speed applied to the tick.
        scale: TimeScale,
    },
    /// A session started.
    GameStarted {
        /// Mode chosen.
        mode: GameMode,
    },
    /// The session phase changed.
    StateChanged {
        /// Phase before the change.
        from: GameState,
        /// Phase after the change.
        to: GameState,
    },
    /// A build phase opened.
    BuildPhaseStarted {
        /// Round about to be fought.
        round: u32,
    },
    /// A round began.
    RoundStarted {
        /// Round number.
        round: u32,
        /// Attackers the round will spawn.
        quota: u32,
    },
    /// A round was cleared.
    RoundCompleted {
        /// Round number.
        round: u32,
    },
    /// The speed multiplier changed.
    TimeScaleChanged {
        /// Active speed.
        scale: TimeScale,
    },
    /// The base recovered health.
    BaseRegenerated {
        /// Health recovered.
        amount: f32,
        /// Health after healing.
        health: f32,
    },
    /// The base lost health.
    BaseDamaged {
        /// Health lost.
        amount: f32,
        /// Health left.
        health: f32,
    },
    /// A structure was built.
    StructurePlaced {
        /// New structure.
        structure: StructureId,
        /// Its kind.
        kind: StructureKind,
        /// Cells it covers.
        region: CellRect,
    },
    /// A trap was armed.
    TrapPlaced {
        /// New trap.
        trap: TrapId,
        /// Its kind.
        kind: TrapKind,
        /// Cell it covers.
        cell: CellCoord,
    },
    /// A structure was demolished.
    StructureRemoved {
        /// Demolished structure.
        structure: StructureId,
        /// Gold refunded.
        refund: u32,
    },
    /// A trap was demolished.
    TrapRemoved {
        /// Demolished trap.
        trap: TrapId,
        /// Gold refunded.
        refund: u32,
    },
    /// A structure reached a higher tier.
    StructureUpgraded {
        /// Upgraded structure.
        structure: StructureId,
        /// Tier reached.
        tier: Tier,
        /// Gold spent.
        cost: u32,
    },
    /// A player command was refused and nothing changed.
    CommandRejected {
        /// Why it was refused.
        reason: Rejection,
    },
    /// An attacker appeared.
    AttackerSpawned {
        /// New attacker.
        attacker: AttackerId,
        /// Its kind.
        kind: AttackerKind,
    },
    /// An attacker was killed and paid its bounty.
    AttackerKilled {
        /// Dead attacker.
        attacker: AttackerId,
        /// Gold awarded.
        reward: u32,
    },
    /// A suicide attacker blew itself up at the base.
    AttackerDetonated {
        /// Spent attacker.
        attacker: AttackerId,
    },
    /// A tower fired.
    ProjectileFired {
        /// New projectile.
        projectile: ProjectileId,
        /// Tower that fired it.
        structure: StructureId,
        /// Attacker it is bound to.
        target: AttackerId,
    },
    /// An attacker fired a missile.
    MissileLaunched {
        /// New missile.
        missile: MissileId,
        /// Kind of missile.
        kind: MissileKind,
    },
    /// A mine paid out.
    IncomeCollected {
        /// Mine that paid.
        structure: StructureId,
        /// Gold added.
        amount: u32,
    },
    /// A barracks trained a knight.
    KnightSpawned {
        /// New knight.
        knight: KnightId,
        /// Barracks that trained it.
        barracks: StructureId,
    },
    /// A knight died.
    KnightFell {
        /// Dead knight.
        knight: KnightId,
    },
    /// A trap went off.
    TrapTriggered {
        /// Consumed trap.
        trap: TrapId,
        /// Its kind.
        kind: TrapKind,
    },
    /// Round and gold were altered by a cheat.
    #[cfg(feature = "cheats")]
    CheatApplied {
        /// Round after the cheat.
        round: u32,
        /// Gold after the cheat.
        gold: u32,
    },
    /// The session was discarded.
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_orders_and_finds_by_identifier() {
        let mut arena = slotmap::SlotMap::<TrapId, ()>::with_key();
        let first = arena.insert(());
        let second = arena.insert(());
        let snapshot = |id, column| TrapSnapshot {
            id,
            kind: TrapKind::Blast,
            cell: CellCoord::new(column, 0),
            center: Vec2::ZERO,
        };
        let view = TrapView::from_snapshots(vec![snapshot(second, 2), snapshot(first, 1)]);

        let columns: Vec<u32> = view.iter().map(|trap| trap.cell.column()).collect();
        assert_eq!(columns, vec![1, 2]);
        assert_eq!(view.get(second).map(|trap| trap.cell.column()), Some(2));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn rejections_survive_bincode_round_trip() {
        let reason = Rejection::from(PlacementError::InsufficientGold {
            cost: 40,
            available: 12,
        });
        let bytes = bincode::serialize(&reason).expect("serialize");
        let decoded: Rejection = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(decoded, reason);
        assert_eq!(
            decoded.to_string(),
            "costs 40 gold but only 12 is available"
        );
    }

    #[test]
    fn cell_rect_centre_and_cells() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(2, 3), CellRectSize::square(2));
        let cells: Vec<CellCoord> = rect.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(2, 3),
                CellCoord::new(3, 3),
                CellCoord::new(2, 4),
                CellCoord::new(3, 4),
            ]
        );
        assert_eq!(rect.center(40.0), Vec2::new(120.0, 160.0));
        assert!(rect.contains(CellCoord::new(3, 4)));
        assert!(!rect.contains(CellCoord::new(4, 4)));
    }

    #[test]
    fn negative_points_have_no_cell() {
        assert_eq!(CellCoord::containing(Vec2::new(-1.0, 5.0), 40.0), None);
        assert_eq!(
            CellCoord::containing(Vec2::new(85.0, 41.0), 40.0),
            Some(CellCoord::new(2, 1))
        );
    }

    #[test]
    fn tier_overrides_replace_only_named_fields() {
        let mage = StructureKind::Mage.definition();
        let stats = mage.stats_at(Tier::Three);
        assert_eq!(stats.damage, 29.0);
        assert_eq!(stats.fire_rate, 36.0);
        assert_eq!(stats.stun_duration, 24.0);
        assert_eq!(stats.chain_max, 5);
        assert!(!StructureKind::Mine.definition().is_upgradable());
        assert_eq!(BuildKind::Structure(StructureKind::Barracks).footprint(), 3);
    }
}
