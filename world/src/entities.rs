//! Records stored in the world's arenas.

use bastion_core::{
    AttackerId, AttackerKind, AttackerProfile, AttackerSnapshot, CellCoord, CellRect,
    CombatStats, EffectId, EffectKind, EffectSnapshot, KnightId, KnightSnapshot, MissileId,
    MissileKind, MissileSnapshot, ProjectileId, ProjectileSnapshot, PuddleId, PuddleSnapshot,
    StrikeTarget, StructureId, StructureKind, StructureSnapshot, Tier, TrapId, TrapKind,
    TrapSnapshot, Vec2,
};

#[derive(Clone, Debug)]
pub(crate) struct Attacker {
    pub(crate) kind: AttackerKind,
    pub(crate) position: Vec2,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
    pub(crate) gold_reward: u32,
    pub(crate) attack_cooldown: f32,
    pub(crate) stun_timer: f32,
    /// Whether the stun holds the attacker during the current tick.
    pub(crate) stunned: bool,
    pub(crate) slow_timer: f32,
    pub(crate) slow_percent: f32,
    /// Set when a suicide attacker spends itself on the base; forfeits the bounty.
    pub(crate) detonated: bool,
}

impl Attacker {
    pub(crate) fn spawn(kind: AttackerKind, position: Vec2, profile: AttackerProfile) -> Self {
        Self {
            kind,
            position,
            health: profile.health,
            max_health: profile.health,
            speed: profile.speed,
            damage: profile.damage,
            gold_reward: profile.gold_reward,
            attack_cooldown: 0.0,
            stun_timer: 0.0,
            stunned: false,
            slow_timer: 0.0,
            slow_percent: 0.0,
            detonated: false,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub(crate) fn can_act(&self) -> bool {
        self.is_alive() && !self.stunned
    }

    pub(crate) fn snapshot(&self, id: AttackerId) -> AttackerSnapshot {
        AttackerSnapshot {
            id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            damage: self.damage,
            gold_reward: self.gold_reward,
            attack_cooldown: self.attack_cooldown,
            stun_timer: self.stun_timer,
            stunned: self.stunned,
            slow_timer: self.slow_timer,
            slow_percent: self.slow_percent,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Structure {
    pub(crate) kind: StructureKind,
    pub(crate) tier: Tier,
    pub(crate) region: CellRect,
    pub(crate) center: Vec2,
    pub(crate) stats: CombatStats,
    pub(crate) cooldown: f32,
    pub(crate) income_timer: f32,
    pub(crate) training_cooldown: f32,
    pub(crate) live_knights: u32,
    pub(crate) beam_targets: [Option<AttackerId>; 2],
}

impl Structure {
    pub(crate) fn build(kind: StructureKind, region: CellRect, cell_length: f32) -> Self {
        Self {
            kind,
            tier: Tier::One,
            region,
            center: region.center(cell_length),
            stats: kind.definition().base,
            cooldown: 0.0,
            income_timer: 0.0,
            training_cooldown: 0.0,
            live_knights: 0,
            beam_targets: [None; 2],
        }
    }

    pub(crate) fn snapshot(&self, id: StructureId) -> StructureSnapshot {
        StructureSnapshot {
            id,
            kind: self.kind,
            tier: self.tier,
            region: self.region,
            center: self.center,
            stats: self.stats,
            cooldown: self.cooldown,
            income_timer: self.income_timer,
            training_cooldown: self.training_cooldown,
            live_knights: self.live_knights,
            beam_targets: self.beam_targets,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Trap {
    pub(crate) kind: TrapKind,
    pub(crate) cell: CellCoord,
    pub(crate) center: Vec2,
}

impl Trap {
    pub(crate) fn snapshot(&self, id: TrapId) -> TrapSnapshot {
        TrapSnapshot {
            id,
            kind: self.kind,
            cell: self.cell,
            center: self.center,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) source: StructureKind,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) target: AttackerId,
    pub(crate) damage: f32,
    pub(crate) stun_duration: f32,
    pub(crate) chain_max: u32,
    pub(crate) chain_radius: f32,
    pub(crate) resolved: bool,
}

impl Projectile {
    pub(crate) fn snapshot(&self, id: ProjectileId) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id,
            source: self.source,
            position: self.position,
            velocity: self.velocity,
            target: self.target,
            damage: self.damage,
            stun_duration: self.stun_duration,
            chain_max: self.chain_max,
            chain_radius: self.chain_radius,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Missile {
    pub(crate) kind: MissileKind,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) damage: f32,
    pub(crate) target: StrikeTarget,
    pub(crate) resolved: bool,
}

impl Missile {
    pub(crate) fn snapshot(&self, id: MissileId) -> MissileSnapshot {
        MissileSnapshot {
            id,
            kind: self.kind,
            position: self.position,
            velocity: self.velocity,
            damage: self.damage,
            target: self.target,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Knight {
    pub(crate) barracks: StructureId,
    pub(crate) anchor: Vec2,
    pub(crate) leash_range: f32,
    pub(crate) position: Vec2,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) damage: f32,
    pub(crate) attack_cooldown: f32,
}

impl Knight {
    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub(crate) fn snapshot(&self, id: KnightId) -> KnightSnapshot {
        KnightSnapshot {
            id,
            barracks: self.barracks,
            anchor: self.anchor,
            leash_range: self.leash_range,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            damage: self.damage,
            attack_cooldown: self.attack_cooldown,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Puddle {
    pub(crate) region: CellRect,
    pub(crate) life: f32,
    pub(crate) slow_percent: f32,
    pub(crate) debuff_duration: f32,
}

impl Puddle {
    pub(crate) fn snapshot(&self, id: PuddleId) -> PuddleSnapshot {
        PuddleSnapshot {
            id,
            region: self.region,
            life: self.life,
            slow_percent: self.slow_percent,
            debuff_duration: self.debuff_duration,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Effect {
    pub(crate) kind: EffectKind,
    pub(crate) position: Vec2,
    pub(crate) life: f32,
}

impl Effect {
    pub(crate) fn snapshot(&self, id: EffectId) -> EffectSnapshot {
        EffectSnapshot {
            id,
            kind: self.kind,
            position: self.position,
            life: self.life,
        }
    }
}
