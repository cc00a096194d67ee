//! Round clock and combat resolution.

use bastion_core::{
    base_regeneration, round_quota, AttackerClass, AttackerId, AttackerKind, AttackerProfile,
    CellRect, CellRectSize, EffectKind, Event, GameMode, GameState, KnightId, MissileId,
    PhaseError, ProjectileId, StrikeTarget, StructureId, StructureKind, TrapEffect, TrapId,
    Vec2, EFFECT_DECAY, INCOME_INTERVAL, KNIGHT, KNIGHT_TRAINING_COOLDOWN, MELEE_COOLDOWN,
    PROJECTILE_SPEED,
};
use tracing::{debug, info, trace};

use crate::{
    entities::{Attacker, Knight, Missile, Projectile, Puddle},
    World,
};

fn decay(timer: &mut f32, amount: f32) {
    *timer = (*timer - amount).max(0.0);
}

impl World {
    fn in_combat(&self) -> bool {
        self.state == GameState::Combat
    }

    pub(crate) fn advance_clock(&mut self, out_events: &mut Vec<Event>) {
        if !matches!(self.state, GameState::Building | GameState::Combat) {
            return;
        }
        self.tick_index = self.tick_index.saturating_add(1);
        let scale = self.time_scale.factor();

        if self.state == GameState::Building {
            if self.mode == Some(GameMode::Timed) {
                self.wave.build_timer = self.wave.build_timer.saturating_sub(1);
            }
        } else {
            if self.wave.spawned < self.wave.quota {
                self.wave.spawn_timer = self.wave.spawn_timer.saturating_add(1);
            }
            for attacker in self.attackers.values_mut() {
                decay(&mut attacker.attack_cooldown, scale);
                attacker.stunned = attacker.stun_timer > 0.0;
                decay(&mut attacker.stun_timer, scale);
                decay(&mut attacker.slow_timer, scale);
            }
            for structure in self.structures.values_mut() {
                decay(&mut structure.cooldown, scale);
                decay(&mut structure.training_cooldown, scale);
                if structure.kind == StructureKind::Mine {
                    structure.income_timer += scale;
                }
            }
            for knight in self.knights.values_mut() {
                decay(&mut knight.attack_cooldown, scale);
            }
            for puddle in self.puddles.values_mut() {
                decay(&mut puddle.life, scale);
            }
        }
        for effect in self.effects.values_mut() {
            decay(&mut effect.life, EFFECT_DECAY * scale);
        }

        trace!(tick = self.tick_index, state = ?self.state, "tick");
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
            scale: self.time_scale,
        });
    }

    pub(crate) fn open_build_phase(&mut self, out_events: &mut Vec<Event>) {
        let missing = self.base.max_health - self.base.health;
        if missing > 0.0 {
            let amount = (base_regeneration(self.round) as f32).min(missing);
            self.base.health += amount;
            self.add_effect(EffectKind::Heal, self.base.center);
            out_events.push(Event::BaseRegenerated {
                amount,
                health: self.base.health,
            });
        }
        self.wave.build_timer = self.config.build_timer_ticks;
        self.transition(GameState::Building, out_events);
        out_events.push(Event::BuildPhaseStarted { round: self.round });
    }

    pub(crate) fn begin_combat(&mut self, out_events: &mut Vec<Event>) {
        if self.state != GameState::Building {
            self.reject(
                PhaseError::Unexpected {
                    expected: GameState::Building,
                    actual: self.state,
                },
                out_events,
            );
            return;
        }
        let quota = round_quota(self.round);
        self.wave.quota = quota;
        self.wave.spawned = 0;
        self.wave.spawn_timer = 0;
        info!(round = self.round, quota, gold = self.gold, "round started");
        self.transition(GameState::Combat, out_events);
        out_events.push(Event::RoundStarted {
            round: self.round,
            quota,
        });
    }

    pub(crate) fn spawn_attacker(
        &mut self,
        kind: AttackerKind,
        position: Vec2,
        profile: AttackerProfile,
        out_events: &mut Vec<Event>,
    ) {
        if !self.in_combat() || self.wave.spawned >= self.wave.quota {
            return;
        }
        let attacker = self
            .attackers
            .insert(Attacker::spawn(kind, position, profile));
        self.wave.spawned += 1;
        self.wave.spawn_timer = 0;
        trace!(?kind, health = profile.health, "attacker spawned");
        out_events.push(Event::AttackerSpawned { attacker, kind });
    }

    pub(crate) fn move_attacker(&mut self, id: AttackerId, position: Vec2) {
        if !self.in_combat() {
            return;
        }
        if let Some(attacker) = self.attackers.get_mut(id) {
            if attacker.can_act() {
                attacker.position = position;
            }
        }
    }

    pub(crate) fn damage_attacker(&mut self, id: AttackerId, amount: f32) {
        if !self.in_combat() {
            return;
        }
        if let Some(attacker) = self.attackers.get_mut(id) {
            attacker.health -= amount.max(0.0);
        }
    }

    pub(crate) fn stun_attacker(&mut self, id: AttackerId, duration: f32) {
        if !self.in_combat() {
            return;
        }
        if let Some(attacker) = self.attackers.get_mut(id) {
            if !attacker.kind.is_boss() {
                attacker.stun_timer = attacker.stun_timer.max(duration);
                attacker.stunned = attacker.stun_timer > 0.0;
            }
        }
    }

    pub(crate) fn slow_attacker(&mut self, id: AttackerId, percent: f32, duration: f32) {
        if !self.in_combat() {
            return;
        }
        if let Some(attacker) = self.attackers.get_mut(id) {
            attacker.slow_timer = duration.max(0.0);
            attacker.slow_percent = percent.clamp(0.0, 1.0);
        }
    }

    pub(crate) fn strike_base(&mut self, id: AttackerId, out_events: &mut Vec<Event>) {
        if !self.in_combat() {
            return;
        }
        let Some(attacker) = self.attackers.get_mut(id) else {
            return;
        };
        if !attacker.can_act() {
            return;
        }
        let damage = attacker.damage;
        let position = attacker.position;
        match attacker.kind.class() {
            AttackerClass::SuicideMelee => {
                attacker.health = 0.0;
                attacker.detonated = true;
                self.add_effect(EffectKind::Explosion, position);
            }
            AttackerClass::PersistentMelee | AttackerClass::Boss => {
                if attacker.attack_cooldown > 0.0 {
                    return;
                }
                attacker.attack_cooldown = MELEE_COOLDOWN;
            }
            AttackerClass::RangedBow | AttackerClass::RangedStaff => return,
        }
        self.damage_base(damage, out_events);
    }

    pub(crate) fn strike_knight(&mut self, id: AttackerId, knight: KnightId) {
        if !self.in_combat() {
            return;
        }
        let Some(attacker) = self.attackers.get_mut(id) else {
            return;
        };
        if !attacker.can_act()
            || attacker.attack_cooldown > 0.0
            || attacker.kind.missile().is_some()
        {
            return;
        }
        let Some(victim) = self.knights.get_mut(knight) else {
            return;
        };
        attacker.attack_cooldown = MELEE_COOLDOWN;
        victim.health -= attacker.damage;
        let position = victim.position;
        self.add_effect(EffectKind::Hit, position);
    }

    pub(crate) fn launch_missile(
        &mut self,
        id: AttackerId,
        target: StrikeTarget,
        velocity: Vec2,
        out_events: &mut Vec<Event>,
    ) {
        if !self.in_combat() {
            return;
        }
        let Some(attacker) = self.attackers.get_mut(id) else {
            return;
        };
        let Some(kind) = attacker.kind.missile() else {
            return;
        };
        if !attacker.can_act() || attacker.attack_cooldown > 0.0 {
            return;
        }
        attacker.attack_cooldown = kind.cooldown();
        let missile = self.missiles.insert(Missile {
            kind,
            position: attacker.position,
            velocity,
            damage: attacker.damage,
            target,
            resolved: false,
        });
        out_events.push(Event::MissileLaunched { missile, kind });
    }

    pub(crate) fn move_missile(&mut self, id: MissileId, position: Vec2, velocity: Vec2) {
        if !self.in_combat() {
            return;
        }
        if let Some(missile) = self.missiles.get_mut(id) {
            missile.position = position;
            missile.velocity = velocity;
        }
    }

    pub(crate) fn resolve_missile(&mut self, id: MissileId, impact: bool) {
        if !self.in_combat() {
            return;
        }
        let Some(missile) = self.missiles.get_mut(id) else {
            return;
        };
        missile.resolved = true;
        if impact {
            let position = missile.position;
            self.add_effect(EffectKind::Hit, position);
        }
    }

    pub(crate) fn damage_base(&mut self, amount: f32, out_events: &mut Vec<Event>) {
        if !self.in_combat() {
            return;
        }
        let amount = amount.max(0.0);
        self.base.health = (self.base.health - amount).max(0.0);
        out_events.push(Event::BaseDamaged {
            amount,
            health: self.base.health,
        });
        if self.base.health <= 0.0 {
            info!(round = self.round, "base destroyed");
            self.transition(GameState::GameOver, out_events);
        }
    }

    pub(crate) fn damage_knight(&mut self, id: KnightId, amount: f32) {
        if !self.in_combat() {
            return;
        }
        if let Some(knight) = self.knights.get_mut(id) {
            knight.health -= amount.max(0.0);
        }
    }

    pub(crate) fn fire_projectile(
        &mut self,
        id: StructureId,
        target: AttackerId,
        out_events: &mut Vec<Event>,
    ) {
        if !self.in_combat() {
            return;
        }
        let Some(victim) = self.attackers.get(target) else {
            return;
        };
        let aim = victim.position;
        let Some(structure) = self.structures.get_mut(id) else {
            return;
        };
        let definition = structure.kind.definition();
        if structure.cooldown > 0.0 || structure.stats.damage <= 0.0 {
            return;
        }
        structure.cooldown = structure.stats.fire_rate;
        let origin = structure.center;
        let projectile = self.projectiles.insert(Projectile {
            source: structure.kind,
            position: origin,
            velocity: bastion_core::geometry::heading(origin, aim) * PROJECTILE_SPEED,
            target,
            damage: structure.stats.damage,
            stun_duration: structure.stats.stun_duration,
            chain_max: structure.stats.chain_max,
            chain_radius: definition.chain_radius,
            resolved: false,
        });
        out_events.push(Event::ProjectileFired {
            projectile,
            structure: id,
            target,
        });
    }

    pub(crate) fn move_projectile(&mut self, id: ProjectileId, position: Vec2, velocity: Vec2) {
        if !self.in_combat() {
            return;
        }
        if let Some(projectile) = self.projectiles.get_mut(id) {
            projectile.position = position;
            projectile.velocity = velocity;
        }
    }

    pub(crate) fn resolve_projectile(&mut self, id: ProjectileId, impact: bool) {
        if !self.in_combat() {
            return;
        }
        let Some(projectile) = self.projectiles.get_mut(id) else {
            return;
        };
        projectile.resolved = true;
        if impact {
            let position = projectile.position;
            self.add_effect(EffectKind::Hit, position);
        }
    }

    pub(crate) fn aim_beams(&mut self, id: StructureId, targets: [Option<AttackerId>; 2]) {
        if !self.in_combat() {
            return;
        }
        if let Some(structure) = self.structures.get_mut(id) {
            if structure.kind == StructureKind::Fire {
                structure.beam_targets = targets;
            }
        }
    }

    pub(crate) fn collect_income(&mut self, id: StructureId, out_events: &mut Vec<Event>) {
        if !self.in_combat() {
            return;
        }
        let Some(structure) = self.structures.get_mut(id) else {
            return;
        };
        if structure.kind != StructureKind::Mine || structure.income_timer < INCOME_INTERVAL {
            return;
        }
        structure.income_timer = 0.0;
        let amount = structure.kind.definition().income;
        let position = structure.center;
        self.gold = self.gold.saturating_add(amount);
        self.add_effect(EffectKind::Income, position);
        trace!(amount, gold = self.gold, "mine paid out");
        out_events.push(Event::IncomeCollected {
            structure: id,
            amount,
        });
    }

    pub(crate) fn spawn_knight(
        &mut self,
        barracks: StructureId,
        position: Vec2,
        out_events: &mut Vec<Event>,
    ) {
        if !self.in_combat() {
            return;
        }
        let Some(structure) = self.structures.get_mut(barracks) else {
            return;
        };
        if structure.kind != StructureKind::Barracks
            || structure.training_cooldown > 0.0
            || structure.live_knights >= structure.stats.max_knights
        {
            return;
        }
        structure.training_cooldown = KNIGHT_TRAINING_COOLDOWN;
        structure.live_knights += 1;
        let knight = self.knights.insert(Knight {
            barracks,
            anchor: structure.center,
            leash_range: structure.kind.definition().leash_range,
            position,
            health: structure.stats.knight_health,
            max_health: structure.stats.knight_health,
            damage: structure.stats.knight_damage,
            attack_cooldown: 0.0,
        });
        self.add_effect(EffectKind::KnightArrival, position);
        debug!(?barracks, "knight trained");
        out_events.push(Event::KnightSpawned { knight, barracks });
    }

    /// Knights may not step beyond their leash unless the step brings them closer to the anchor.
    pub(crate) fn move_knight(&mut self, id: KnightId, position: Vec2) {
        if !self.in_combat() {
            return;
        }
        let Some(knight) = self.knights.get_mut(id) else {
            return;
        };
        if !knight.is_alive() {
            return;
        }
        let next = position.distance(knight.anchor);
        if next <= knight.leash_range || next < knight.position.distance(knight.anchor) {
            knight.position = position;
        }
    }

    pub(crate) fn knight_strike(&mut self, id: KnightId, target: AttackerId) {
        if !self.in_combat() {
            return;
        }
        let Some(knight) = self.knights.get_mut(id) else {
            return;
        };
        if !knight.is_alive() || knight.attack_cooldown > 0.0 {
            return;
        }
        let Some(attacker) = self.attackers.get_mut(target) else {
            return;
        };
        knight.attack_cooldown = KNIGHT.attack_speed;
        attacker.health -= knight.damage;
        let position = attacker.position;
        self.add_effect(EffectKind::Hit, position);
    }

    pub(crate) fn trigger_trap(&mut self, id: TrapId, out_events: &mut Vec<Event>) {
        if !self.in_combat() {
            return;
        }
        let Some(trap) = self.traps.remove(id) else {
            return;
        };
        self.occupancy.clear(CellRect::from_origin_and_size(
            trap.cell,
            CellRectSize::square(1),
        ));
        match trap.kind.definition().effect {
            TrapEffect::Blast { .. } => self.add_effect(EffectKind::Explosion, trap.center),
            TrapEffect::Sticky {
                slow_percent,
                puddle_life,
                debuff_duration,
                puddle_size,
            } => {
                let _ = self.puddles.insert(Puddle {
                    region: CellRect::from_origin_and_size(
                        trap.cell,
                        CellRectSize::square(puddle_size),
                    ),
                    life: puddle_life,
                    slow_percent,
                    debuff_duration,
                });
                self.add_effect(EffectKind::Goo, trap.center);
            }
        }
        debug!(kind = ?trap.kind, cell = ?trap.cell, "trap triggered");
        out_events.push(Event::TrapTriggered {
            trap: id,
            kind: trap.kind,
        });
    }

    pub(crate) fn complete_round(&mut self, out_events: &mut Vec<Event>) {
        if !self.in_combat()
            || self.wave.spawned < self.wave.quota
            || !self.attackers.is_empty()
        {
            return;
        }
        info!(round = self.round, gold = self.gold, health = self.base.health, "round cleared");
        out_events.push(Event::RoundCompleted { round: self.round });
        self.projectiles.clear();
        self.missiles.clear();
        for structure in self.structures.values_mut() {
            structure.beam_targets = [None; 2];
        }
        if self.round >= self.config.final_round {
            info!(round = self.round, "final round cleared");
            self.transition(GameState::Victory, out_events);
            return;
        }
        self.round += 1;
        self.open_build_phase(out_events);
    }

    pub(crate) fn cleanup(&mut self, out_events: &mut Vec<Event>) {
        let fallen: Vec<AttackerId> = self
            .attackers
            .iter()
            .filter(|(_, attacker)| !attacker.is_alive())
            .map(|(id, _)| id)
            .collect();
        for id in fallen {
            let Some(attacker) = self.attackers.remove(id) else {
                continue;
            };
            if attacker.detonated {
                out_events.push(Event::AttackerDetonated { attacker: id });
            } else {
                self.gold = self.gold.saturating_add(attacker.gold_reward);
                self.add_effect(EffectKind::Death, attacker.position);
                out_events.push(Event::AttackerKilled {
                    attacker: id,
                    reward: attacker.gold_reward,
                });
            }
        }

        let fallen: Vec<KnightId> = self
            .knights
            .iter()
            .filter(|(_, knight)| !knight.is_alive())
            .map(|(id, _)| id)
            .collect();
        for id in fallen {
            let Some(knight) = self.knights.remove(id) else {
                continue;
            };
            if let Some(barracks) = self.structures.get_mut(knight.barracks) {
                barracks.live_knights = barracks.live_knights.saturating_sub(1);
            }
            self.add_effect(EffectKind::KnightDeath, knight.position);
            out_events.push(Event::KnightFell { knight: id });
        }

        let attackers = &self.attackers;
        for structure in self.structures.values_mut() {
            for slot in structure.beam_targets.iter_mut() {
                if slot.is_some_and(|target| !attackers.contains_key(target)) {
                    *slot = None;
                }
            }
        }

        self.projectiles.retain(|_, projectile| !projectile.resolved);
        self.missiles.retain(|_, missile| !missile.resolved);
        self.puddles.retain(|_, puddle| puddle.life > 0.0);
        self.effects.retain(|_, effect| effect.life > 0.0);

        if self.in_combat() && self.base.health <= 0.0 {
            self.transition(GameState::GameOver, out_events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_floors_at_zero() {
        let mut timer = 1.5;
        decay(&mut timer, 2.0);
        assert_eq!(timer, 0.0);
    }
}
