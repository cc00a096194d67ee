//! Static balance data for structures, traps and knights.

use serde::{Deserialize, Serialize};

use crate::{StructureKind, Tier, TrapKind};

/// Ticks between two mine payouts.
pub const INCOME_INTERVAL: f32 = 300.0;

/// Ticks a barracks waits between training knights.
pub const KNIGHT_TRAINING_COOLDOWN: f32 = 600.0;

/// Distance from the barracks centre at which new knights appear.
pub const KNIGHT_SPAWN_DISTANCE: f32 = 30.0;

/// Fixed attributes shared by every knight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnightTemplate {
    /// World units walked per tick.
    pub speed: f32,
    /// Ticks between two strikes.
    pub attack_speed: f32,
    /// Distance from which a knight can strike.
    pub attack_range: f32,
}

/// Attributes shared by every knight.
pub const KNIGHT: KnightTemplate = KnightTemplate {
    speed: 0.8,
    attack_speed: 45.0,
    attack_range: 25.0,
};

/// Tier-dependent combat numbers of a structure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Damage dealt by a single projectile.
    pub damage: f32,
    /// Ticks between shots.
    pub fire_rate: f32,
    /// Damage per second of each beam.
    pub dps: f32,
    /// Ticks a projectile hit stuns its victim.
    pub stun_duration: f32,
    /// Number of attackers a chain can hit, including the first.
    pub chain_max: u32,
    /// Health of trained knights.
    pub knight_health: f32,
    /// Damage of trained knights.
    pub knight_damage: f32,
    /// Knights a barracks keeps alive at once.
    pub max_knights: u32,
}

impl CombatStats {
    /// Applies a tier's overrides, keeping every value the tier leaves unset.
    #[must_use]
    pub fn overridden(self, overrides: &TierOverrides) -> Self {
        Self {
            damage: overrides.damage.unwrap_or(self.damage),
            fire_rate: overrides.fire_rate.unwrap_or(self.fire_rate),
            dps: overrides.dps.unwrap_or(self.dps),
            stun_duration: overrides.stun_duration.unwrap_or(self.stun_duration),
            chain_max: overrides.chain_max.unwrap_or(self.chain_max),
            knight_health: overrides.knight_health.unwrap_or(self.knight_health),
            knight_damage: overrides.knight_damage.unwrap_or(self.knight_damage),
            max_knights: overrides.max_knights.unwrap_or(self.max_knights),
        }
    }
}

/// Values replaced when a structure reaches a tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierOverrides {
    /// Gold charged for the upgrade.
    pub cost: u32,
    /// Replacement projectile damage.
    pub damage: Option<f32>,
    /// Replacement shot interval.
    pub fire_rate: Option<f32>,
    /// Replacement beam damage per second.
    pub dps: Option<f32>,
    /// Replacement stun duration.
    pub stun_duration: Option<f32>,
    /// Replacement chain length.
    pub chain_max: Option<u32>,
    /// Replacement knight health.
    pub knight_health: Option<f32>,
    /// Replacement knight damage.
    pub knight_damage: Option<f32>,
    /// Replacement knight limit.
    pub max_knights: Option<u32>,
}

impl TierOverrides {
    const fn priced(cost: u32) -> Self {
        Self {
            cost,
            damage: None,
            fire_rate: None,
            dps: None,
            stun_duration: None,
            chain_max: None,
            knight_health: None,
            knight_damage: None,
            max_knights: None,
        }
    }

    const fn shooting(cost: u32, damage: f32, fire_rate: f32) -> Self {
        let mut overrides = Self::priced(cost);
        overrides.damage = Some(damage);
        overrides.fire_rate = Some(fire_rate);
        overrides
    }
}

/// Immutable description of a structure kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureDefinition {
    /// Kind being described.
    pub kind: StructureKind,
    /// Gold spent to build it.
    pub cost: u32,
    /// Edge length of the square footprint in cells.
    pub footprint: u32,
    /// Round from which the kind may be built.
    pub unlock_round: u32,
    /// Targeting range in world units.
    pub range: f32,
    /// Maximum hop distance between chained victims.
    pub chain_radius: f32,
    /// Gold paid by each mine payout.
    pub income: u32,
    /// Distance from its centre a barracks lets knights roam.
    pub leash_range: f32,
    /// Stats of a freshly built structure.
    pub base: CombatStats,
    /// Overrides applied on reaching tier two.
    pub tier_two: Option<TierOverrides>,
    /// Overrides applied on reaching tier three.
    pub tier_three: Option<TierOverrides>,
}

impl StructureDefinition {
    /// Overrides for the provided tier, if the kind supports it.
    #[must_use]
    pub const fn overrides(&self, tier: Tier) -> Option<&TierOverrides> {
        match tier {
            Tier::One => None,
            Tier::Two => self.tier_two.as_ref(),
            Tier::Three => self.tier_three.as_ref(),
        }
    }

    /// Reports whether the kind can be upgraded at all.
    #[must_use]
    pub const fn is_upgradable(&self) -> bool {
        self.tier_two.is_some()
    }

    /// Stats a structure of this kind holds at the provided tier.
    #[must_use]
    pub fn stats_at(&self, tier: Tier) -> CombatStats {
        let mut stats = self.base;
        if tier >= Tier::Two {
            if let Some(overrides) = self.tier_two.as_ref() {
                stats = stats.overridden(overrides);
            }
        }
        if tier >= Tier::Three {
            if let Some(overrides) = self.tier_three.as_ref() {
                stats = stats.overridden(overrides);
            }
        }
        stats
    }
}

const PLAIN: CombatStats = CombatStats {
    damage: 0.0,
    fire_rate: 0.0,
    dps: 0.0,
    stun_duration: 12.0,
    chain_max: 0,
    knight_health: 140.0,
    knight_damage: 15.0,
    max_knights: 0,
};

const ARCHER: StructureDefinition = StructureDefinition {
    kind: StructureKind::Archer,
    cost: 40,
    footprint: 1,
    unlock_round: 1,
    range: 150.0,
    chain_radius: 0.0,
    income: 0,
    leash_range: 0.0,
    base: CombatStats {
        damage: 15.0,
        fire_rate: 30.0,
        ..PLAIN
    },
    tier_two: Some(TierOverrides::shooting(60, 21.0, 25.0)),
    tier_three: Some(TierOverrides::shooting(120, 29.0, 22.0)),
};

const TURRET: StructureDefinition = StructureDefinition {
    kind: StructureKind::Turret,
    cost: 50,
    footprint: 1,
    unlock_round: 1,
    range: 100.0,
    chain_radius: 0.0,
    income: 0,
    leash_range: 0.0,
    base: CombatStats {
        damage: 8.0,
        fire_rate: 16.0,
        ..PLAIN
    },
    tier_two: Some(TierOverrides::shooting(75, 11.0, 13.0)),
    tier_three: Some(TierOverrides::shooting(150, 15.0, 11.0)),
};

const MINE: StructureDefinition = StructureDefinition {
    kind: StructureKind::Mine,
    cost: 40,
    footprint: 1,
    unlock_round: 1,
    range: 0.0,
    chain_radius: 0.0,
    income: 5,
    leash_range: 0.0,
    base: PLAIN,
    tier_two: None,
    tier_three: None,
};

const MAGE: StructureDefinition = StructureDefinition {
    kind: StructureKind::Mage,
    cost: 65,
    footprint: 2,
    unlock_round: 6,
    range: 200.0,
    chain_radius: 120.0,
    income: 0,
    leash_range: 0.0,
    base: CombatStats {
        damage: 15.0,
        fire_rate: 50.0,
        stun_duration: 12.0,
        chain_max: 3,
        ..PLAIN
    },
    tier_two: Some(TierOverrides {
        stun_duration: Some(18.0),
        chain_max: Some(4),
        ..TierOverrides::shooting(100, 21.0, 42.0)
    }),
    tier_three: Some(TierOverrides {
        stun_duration: Some(24.0),
        chain_max: Some(5),
        ..TierOverrides::shooting(200, 29.0, 36.0)
    }),
};

const FIRE: StructureDefinition = StructureDefinition {
    kind: StructureKind::Fire,
    cost: 800,
    footprint: 2,
    unlock_round: 20,
    range: 200.0,
    chain_radius: 0.0,
    income: 0,
    leash_range: 0.0,
    base: CombatStats { dps: 70.0, ..PLAIN },
    tier_two: Some(TierOverrides {
        dps: Some(98.0),
        ..TierOverrides::priced(400)
    }),
    tier_three: Some(TierOverrides {
        dps: Some(137.0),
        ..TierOverrides::priced(800)
    }),
};

const BARRACKS: StructureDefinition = StructureDefinition {
    kind: StructureKind::Barracks,
    cost: 350,
    footprint: 3,
    unlock_round: 10,
    range: 0.0,
    chain_radius: 0.0,
    income: 0,
    leash_range: 200.0,
    base: CombatStats {
        max_knights: 2,
        ..PLAIN
    },
    tier_two: Some(TierOverrides {
        knight_health: Some(196.0),
        knight_damage: Some(21.0),
        max_knights: Some(3),
        ..TierOverrides::priced(200)
    }),
    tier_three: Some(TierOverrides {
        knight_health: Some(274.0),
        knight_damage: Some(29.0),
        max_knights: Some(4),
        ..TierOverrides::priced(400)
    }),
};

impl StructureKind {
    /// Balance data of the kind.
    #[must_use]
    pub const fn definition(self) -> &'static StructureDefinition {
        match self {
            Self::Archer => &ARCHER,
            Self::Turret => &TURRET,
            Self::Mine => &MINE,
            Self::Mage => &MAGE,
            Self::Fire => &FIRE,
            Self::Barracks => &BARRACKS,
        }
    }
}

/// What a trap does once triggered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TrapEffect {
    /// Damages every attacker inside the blast radius.
    Blast {
        /// Damage dealt to each attacker caught in the blast.
        damage: f32,
        /// Radius of the blast around the trap centre.
        radius: f32,
    },
    /// Leaves a slowing puddle behind.
    Sticky {
        /// Fraction of speed removed from slowed attackers.
        slow_percent: f32,
        /// Ticks the puddle persists.
        puddle_life: f32,
        /// Ticks the slow lingers after leaving the puddle.
        debuff_duration: f32,
        /// Edge length of the puddle in cells.
        puddle_size: u32,
    },
}

/// Immutable description of a trap kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrapDefinition {
    /// Kind being described.
    pub kind: TrapKind,
    /// Gold spent to build it.
    pub cost: u32,
    /// Round from which the kind may be built.
    pub unlock_round: u32,
    /// An attacker strictly closer than this sets the trap off.
    pub trigger_radius: f32,
    /// Effect released on trigger.
    pub effect: TrapEffect,
}

const BLAST: TrapDefinition = TrapDefinition {
    kind: TrapKind::Blast,
    cost: 15,
    unlock_round: 1,
    trigger_radius: 42.0,
    effect: TrapEffect::Blast {
        damage: 55.0,
        radius: 85.0,
    },
};

const STICKY: TrapDefinition = TrapDefinition {
    kind: TrapKind::Sticky,
    cost: 25,
    unlock_round: 19,
    trigger_radius: 42.0,
    effect: TrapEffect::Sticky {
        slow_percent: 0.6,
        puddle_life: 600.0,
        debuff_duration: 240.0,
        puddle_size: 2,
    },
};

impl TrapKind {
    /// Balance data of the kind.
    #[must_use]
    pub const fn definition(self) -> &'static TrapDefinition {
        match self {
            Self::Blast => &BLAST,
            Self::Sticky => &STICKY,
        }
    }
}
