//! Immutable read models handed to systems and adapters.

use glam::Vec2;
use serde::Serialize;

use crate::{
    AttackerClass, AttackerId, AttackerKind, CellCoord, CellRect, CombatStats, EffectId,
    EffectKind, GameMode, GameState, KnightId, MissileId, MissileKind, ProjectileId, PuddleId,
    StrikeTarget, StructureId, StructureKind, Tier, TimeScale, TrapId, TrapKind,
};

/// Snapshot that can be looked up by identifier inside a [`View`].
pub trait Keyed {
    /// Identifier type the snapshot is keyed by.
    type Id: Copy + Ord;

    /// Identifier of the captured entity.
    fn id(&self) -> Self::Id;
}

/// Read-only collection of snapshots ordered by identifier.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct View<S> {
    snapshots: Vec<S>,
}

impl<S: Keyed> View<S> {
    /// Creates a view from the provided snapshots, ordering them by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<S>) -> Self {
        snapshots.sort_by_key(Keyed::id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for `id`.
    #[must_use]
    pub fn get(&self, id: S::Id) -> Option<&S> {
        self.snapshots
            .binary_search_by_key(&id, Keyed::id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, returning the owned snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<S> {
        self.snapshots
    }
}

impl<S> Default for View<S> {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }
}

/// State of one attacker at the time the view was captured.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AttackerSnapshot {
    /// Identifier of the attacker.
    pub id: AttackerId,
    /// Kind of the attacker.
    pub kind: AttackerKind,
    /// Position in world units.
    pub position: Vec2,
    /// Remaining health. Non-positive means the attacker awaits removal.
    pub health: f32,
    /// Health the attacker spawned with.
    pub max_health: f32,
    /// World units walked per tick when unhindered.
    pub speed: f32,
    /// Damage of one strike or missile.
    pub damage: f32,
    /// Gold paid when the attacker is killed.
    pub gold_reward: u32,
    /// Ticks until the attacker may strike again.
    pub attack_cooldown: f32,
    /// Stun ticks left after the current one.
    pub stun_timer: f32,
    /// Whether a stun holds the attacker during the current tick.
    pub stunned: bool,
    /// Ticks the slow lingers.
    pub slow_timer: f32,
    /// Fraction of speed removed while slowed.
    pub slow_percent: f32,
}

impl AttackerSnapshot {
    /// Reports whether the attacker still has health left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Reports whether the attacker is stunned this tick.
    #[must_use]
    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    /// Reports whether the attacker may strike now.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.attack_cooldown <= 0.0
    }

    /// Speed after applying any lingering slow.
    #[must_use]
    pub fn effective_speed(&self) -> f32 {
        if self.slow_timer > 0.0 {
            self.speed * (1.0 - self.slow_percent)
        } else {
            self.speed
        }
    }

    /// Engagement class of the attacker.
    #[must_use]
    pub const fn class(&self) -> AttackerClass {
        self.kind.class()
    }
}

impl Keyed for AttackerSnapshot {
    type Id = AttackerId;

    fn id(&self) -> AttackerId {
        self.id
    }
}

/// State of one structure at the time the view was captured.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StructureSnapshot {
    /// Identifier of the structure.
    pub id: StructureId,
    /// Kind of the structure.
    pub kind: StructureKind,
    /// Current tier.
    pub tier: Tier,
    /// Cells covered by the footprint.
    pub region: CellRect,
    /// Centre of the footprint in world units.
    pub center: Vec2,
    /// Stats of the current tier.
    pub stats: CombatStats,
    /// Ticks until the structure may fire again.
    pub cooldown: f32,
    /// Ticks accumulated toward the next mine payout.
    pub income_timer: f32,
    /// Ticks until the barracks may train another knight.
    pub training_cooldown: f32,
    /// Knights of this barracks that are alive.
    pub live_knights: u32,
    /// Attackers held by fire beams.
    pub beam_targets: [Option<AttackerId>; 2],
}

impl StructureSnapshot {
    /// Targeting range of the structure.
    #[must_use]
    pub const fn range(&self) -> f32 {
        self.kind.definition().range
    }

    /// Reports whether the structure may fire now.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }
}

impl Keyed for StructureSnapshot {
    type Id = StructureId;

    fn id(&self) -> StructureId {
        self.id
    }
}

/// State of one armed trap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrapSnapshot {
    /// Identifier of the trap.
    pub id: TrapId,
    /// Kind of the trap.
    pub kind: TrapKind,
    /// Cell the trap sits in.
    pub cell: CellCoord,
    /// Centre of the trap in world units.
    pub center: Vec2,
}

impl Keyed for TrapSnapshot {
    type Id = TrapId;

    fn id(&self) -> TrapId {
        self.id
    }
}

/// State of one tower projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Kind of structure that fired it.
    pub source: StructureKind,
    /// Position in world units.
    pub position: Vec2,
    /// Velocity per unscaled tick.
    pub velocity: Vec2,
    /// Attacker the projectile is bound to.
    pub target: AttackerId,
    /// Damage dealt on impact.
    pub damage: f32,
    /// Ticks each victim is stunned.
    pub stun_duration: f32,
    /// Victims the impact may chain through.
    pub chain_max: u32,
    /// Maximum hop distance between chained victims.
    pub chain_radius: f32,
}

impl Keyed for ProjectileSnapshot {
    type Id = ProjectileId;

    fn id(&self) -> ProjectileId {
        self.id
    }
}

/// State of one attacker missile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MissileSnapshot {
    /// Identifier of the missile.
    pub id: MissileId,
    /// Kind of missile.
    pub kind: MissileKind,
    /// Position in world units.
    pub position: Vec2,
    /// Velocity per unscaled tick.
    pub velocity: Vec2,
    /// Damage dealt on impact.
    pub damage: f32,
    /// What the missile was aimed at.
    pub target: StrikeTarget,
}

impl Keyed for MissileSnapshot {
    type Id = MissileId;

    fn id(&self) -> MissileId {
        self.id
    }
}

/// State of one knight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct KnightSnapshot {
    /// Identifier of the knight.
    pub id: KnightId,
    /// Barracks that trained the knight.
    pub barracks: StructureId,
    /// Centre of the owning barracks.
    pub anchor: Vec2,
    /// Distance from the anchor the knight may roam.
    pub leash_range: f32,
    /// Position in world units.
    pub position: Vec2,
    /// Remaining health.
    pub health: f32,
    /// Health the knight was trained with.
    pub max_health: f32,
    /// Damage of one strike.
    pub damage: f32,
    /// Ticks until the knight may strike again.
    pub attack_cooldown: f32,
}

impl KnightSnapshot {
    /// Reports whether the knight still has health left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Reports whether the knight may strike now.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.attack_cooldown <= 0.0
    }
}

impl Keyed for KnightSnapshot {
    type Id = KnightId;

    fn id(&self) -> KnightId {
        self.id
    }
}

/// State of one slowing puddle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PuddleSnapshot {
    /// Identifier of the puddle.
    pub id: PuddleId,
    /// Cells covered by the puddle.
    pub region: CellRect,
    /// Ticks the puddle persists.
    pub life: f32,
    /// Fraction of speed removed from attackers inside.
    pub slow_percent: f32,
    /// Ticks the slow lingers after leaving.
    pub debuff_duration: f32,
}

impl Keyed for PuddleSnapshot {
    type Id = PuddleId;

    fn id(&self) -> PuddleId {
        self.id
    }
}

/// State of one cosmetic effect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EffectSnapshot {
    /// Identifier of the effect.
    pub id: EffectId,
    /// Kind of effect.
    pub kind: EffectKind,
    /// Position in world units.
    pub position: Vec2,
    /// Remaining life; the effect is pruned once it reaches zero.
    pub life: f32,
}

impl Keyed for EffectSnapshot {
    type Id = EffectId;

    fn id(&self) -> EffectId {
        self.id
    }
}

/// State of the base.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BaseSnapshot {
    /// Cells covered by the base.
    pub region: CellRect,
    /// Centre of the base in world units.
    pub center: Vec2,
    /// Remaining health.
    pub health: f32,
    /// Health cap.
    pub max_health: f32,
}

/// State of the round clock.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WaveSnapshot {
    /// Phase of the session.
    pub state: GameState,
    /// Mode chosen at start, if any.
    pub mode: Option<GameMode>,
    /// Current round.
    pub round: u32,
    /// Attackers spawned this round.
    pub spawned: u32,
    /// Attackers to spawn this round.
    pub quota: u32,
    /// Unscaled ticks since the last spawn.
    pub spawn_timer: u32,
    /// Unscaled ticks left in a timed build phase.
    pub build_timer: u32,
    /// Active speed.
    pub time_scale: TimeScale,
}

impl WaveSnapshot {
    /// Attackers still to be spawned this round.
    #[must_use]
    pub const fn remaining_to_spawn(&self) -> u32 {
        self.quota.saturating_sub(self.spawned)
    }
}

/// View over attackers.
pub type AttackerView = View<AttackerSnapshot>;
/// View over structures.
pub type StructureView = View<StructureSnapshot>;
/// View over traps.
pub type TrapView = View<TrapSnapshot>;
/// View over tower projectiles.
pub type ProjectileView = View<ProjectileSnapshot>;
/// View over attacker missiles.
pub type MissileView = View<MissileSnapshot>;
/// View over knights.
pub type KnightView = View<KnightSnapshot>;
/// View over puddles.
pub type PuddleView = View<PuddleSnapshot>;
/// View over effects.
pub type EffectView = View<EffectSnapshot>;
