//! Enumerations describing phases, modes and the kinds of entities in play.

use serde::{Deserialize, Serialize};

use crate::{KnightId, MELEE_REACH};

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for the player to pick a mode.
    Intro,
    /// Between rounds; construction is allowed and nothing moves.
    Building,
    /// A round is being fought.
    Combat,
    /// The base fell. Terminal until reset.
    GameOver,
    /// The final round was cleared. Terminal until reset.
    Victory,
}

impl GameState {
    /// Reports whether the state halts all gameplay until a reset.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

/// Session flavour chosen when the game starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Build phases last until the player readies up.
    Relaxed,
    /// Build phases end automatically when the build timer expires.
    Timed,
}

/// Speed multiplier applied to entity-local timers and motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeScale {
    /// One unit of entity time per tick.
    #[default]
    Normal,
    /// Two units of entity time per tick.
    Fast,
}

impl TimeScale {
    /// Multiplier applied to per-tick decrements and movement.
    #[must_use]
    pub const fn factor(self) -> f32 {
        match self {
            Self::Normal => 1.0,
            Self::Fast => 2.0,
        }
    }

    /// Returns the other speed.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Fast,
            Self::Fast => Self::Normal,
        }
    }
}

/// Upgrade level of a structure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// Freshly built.
    #[default]
    One,
    /// First upgrade.
    Two,
    /// Final upgrade.
    Three,
}

impl Tier {
    /// Tier reached by upgrading once more, if any.
    #[must_use]
    pub const fn next(self) -> Option<Tier> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }

    /// Numeric level, starting at one.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

/// Buildings that occupy grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructureKind {
    /// Single-target ranged tower.
    Archer,
    /// Fast-firing short-range tower.
    Turret,
    /// Periodic gold generator.
    Mine,
    /// Chain-lightning tower that stuns.
    Mage,
    /// Continuous damage beams.
    Fire,
    /// Trains knights that guard the area.
    Barracks,
}

/// One-shot ground hazards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrapKind {
    /// Explodes, damaging everything nearby.
    Blast,
    /// Leaves a puddle that slows attackers.
    Sticky,
}

/// Anything the player can construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildKind {
    /// A structure.
    Structure(StructureKind),
    /// A trap.
    Trap(TrapKind),
}

impl BuildKind {
    /// Construction menu in display order.
    pub const MENU: [BuildKind; 8] = [
        BuildKind::Structure(StructureKind::Archer),
        BuildKind::Structure(StructureKind::Turret),
        BuildKind::Structure(StructureKind::Mine),
        BuildKind::Trap(TrapKind::Blast),
        BuildKind::Trap(TrapKind::Sticky),
        BuildKind::Structure(StructureKind::Mage),
        BuildKind::Structure(StructureKind::Fire),
        BuildKind::Structure(StructureKind::Barracks),
    ];

    /// Gold spent to build one.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Structure(kind) => kind.definition().cost,
            Self::Trap(kind) => kind.definition().cost,
        }
    }

    /// Edge length of the square footprint in cells.
    #[must_use]
    pub const fn footprint(self) -> u32 {
        match self {
            Self::Structure(kind) => kind.definition().footprint,
            Self::Trap(_) => 1,
        }
    }

    /// Round from which the kind may be built.
    #[must_use]
    pub const fn unlock_round(self) -> u32 {
        match self {
            Self::Structure(kind) => kind.definition().unlock_round,
            Self::Trap(kind) => kind.definition().unlock_round,
        }
    }

    /// Reports whether the kind is a trap.
    #[must_use]
    pub const fn is_trap(self) -> bool {
        matches!(self, Self::Trap(_))
    }
}

/// How an attacker engages its targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackerClass {
    /// Hits the base once and dies in the process.
    SuicideMelee,
    /// Stays at the base and strikes on a cooldown.
    PersistentMelee,
    /// Shoots arrows from a distance.
    RangedBow,
    /// Hurls fireballs from a distance.
    RangedStaff,
    /// Persistent melee that ignores knights and stuns.
    Boss,
}

/// Every attacker kind that can appear in a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttackerKind {
    /// Weak, fast suicide runner.
    Goblin,
    /// Sturdier suicide runner.
    Orc,
    /// Archer.
    Bowman,
    /// Fireball caster.
    Warlock,
    /// Persistent melee brute.
    Demon,
    /// Slow, heavily armoured melee.
    Troll,
    /// Late-game flying fireball caster.
    Drake,
    /// Boss of round ten.
    GoblinKing,
    /// Boss of round twenty.
    DemonLord,
    /// Boss of round thirty.
    Giant,
}

impl AttackerKind {
    /// Engagement class of the kind.
    #[must_use]
    pub const fn class(self) -> AttackerClass {
        match self {
            Self::Goblin | Self::Orc => AttackerClass::SuicideMelee,
            Self::Demon | Self::Troll => AttackerClass::PersistentMelee,
            Self::Bowman => AttackerClass::RangedBow,
            Self::Warlock | Self::Drake => AttackerClass::RangedStaff,
            Self::GoblinKing | Self::DemonLord | Self::Giant => AttackerClass::Boss,
        }
    }

    /// Reports whether the kind is a boss.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self.class(), AttackerClass::Boss)
    }

    /// Missile fired by ranged kinds.
    #[must_use]
    pub const fn missile(self) -> Option<MissileKind> {
        match self.class() {
            AttackerClass::RangedBow => Some(MissileKind::Arrow),
            AttackerClass::RangedStaff => Some(MissileKind::Fireball),
            _ => None,
        }
    }

    /// Distance from which the kind attacks the base.
    #[must_use]
    pub const fn reach(self) -> f32 {
        match self {
            Self::Bowman | Self::Drake => 120.0,
            Self::Warlock => 160.0,
            _ => MELEE_REACH,
        }
    }
}

/// Projectiles fired by ranged attackers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissileKind {
    /// Fired by bowmen.
    Arrow,
    /// Fired by warlocks and drakes.
    Fireball,
}

impl MissileKind {
    /// Ticks the shooter waits before firing again.
    #[must_use]
    pub const fn cooldown(self) -> f32 {
        match self {
            Self::Arrow => 75.0,
            Self::Fireball => 100.0,
        }
    }
}

/// Recipient of an attacker's strike or missile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeTarget {
    /// The defended base.
    Base,
    /// A knight.
    Knight(KnightId),
}

/// Cosmetic effects left behind by gameplay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// A projectile or blade connected.
    Hit,
    /// An attacker died.
    Death,
    /// A blast trap or a suicide runner exploded.
    Explosion,
    /// A sticky trap burst.
    Goo,
    /// A mine paid out.
    Income,
    /// The base healed.
    Heal,
    /// A knight stepped out of its barracks.
    KnightArrival,
    /// A knight fell.
    KnightDeath,
}
