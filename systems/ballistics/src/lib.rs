#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flight and impact of everything that flies: tower projectiles, including
//! the mage's chain lightning, and missiles shot by ranged attackers.

use bastion_core::{
    geometry::{heading, step_toward},
    AttackerId, AttackerSnapshot, AttackerView, BaseSnapshot, Command, KnightView,
    MissileSnapshot, MissileView, ProjectileSnapshot, ProjectileView, StrikeTarget, TimeScale,
    Vec2, MISSILE_BASE_RADIUS, MISSILE_ESCAPE_MARGIN, MISSILE_KNIGHT_RADIUS, MISSILE_SPEED,
    PROJECTILE_IMPACT_RADIUS, PROJECTILE_SPEED,
};

/// Configuration parameters required to construct the ballistics system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    width: f32,
    height: f32,
}

impl Config {
    /// Creates a configuration for a grid of the given size in world units.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pure system that moves projectiles and missiles and settles their impacts.
#[derive(Debug)]
pub struct Ballistics {
    width: f32,
    height: f32,
    struck: Vec<AttackerId>,
}

impl Ballistics {
    /// Creates a new ballistics system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            width: config.width,
            height: config.height,
            struck: Vec::new(),
        }
    }

    /// Advances every tower projectile toward its bound attacker.
    ///
    /// A projectile whose attacker is gone resolves without damage. One that
    /// arrives damages its attacker, or starts a chain when it carries one.
    pub fn handle_projectiles(
        &mut self,
        scale: TimeScale,
        projectiles: &ProjectileView,
        attackers: &AttackerView,
        out: &mut Vec<Command>,
    ) {
        for projectile in projectiles.iter() {
            let Some(target) = attackers
                .get(projectile.target)
                .filter(|attacker| attacker.is_alive())
            else {
                out.push(Command::ResolveProjectile {
                    projectile: projectile.id,
                    impact: false,
                });
                continue;
            };

            let position = step_toward(
                projectile.position,
                target.position,
                PROJECTILE_SPEED * scale.factor(),
            );
            if position.distance(target.position) > PROJECTILE_IMPACT_RADIUS {
                out.push(Command::MoveProjectile {
                    projectile: projectile.id,
                    position,
                    velocity: heading(projectile.position, target.position) * PROJECTILE_SPEED,
                });
                continue;
            }

            if projectile.chain_max > 0 {
                self.chain(projectile, target, attackers, out);
            } else {
                out.push(Command::DamageAttacker {
                    attacker: target.id,
                    amount: projectile.damage,
                });
            }
            out.push(Command::ResolveProjectile {
                projectile: projectile.id,
                impact: true,
            });
        }
    }

    /// Advances every attacker missile and settles the ones that land or
    /// leave the battlefield.
    ///
    /// Missiles home on the base, or on their knight while it lives. A missile
    /// whose knight fell keeps its last heading. Homing is the only part that
    /// depends on the aim: a missile shot at a knight strikes the first live
    /// knight it reaches, and every missile strikes the base on arrival.
    pub fn handle_missiles(
        &mut self,
        scale: TimeScale,
        missiles: &MissileView,
        knights: &KnightView,
        base: &BaseSnapshot,
        out: &mut Vec<Command>,
    ) {
        for missile in missiles.iter() {
            let velocity = match missile.target {
                StrikeTarget::Knight(id) => knights
                    .get(id)
                    .filter(|knight| knight.is_alive())
                    .map_or(missile.velocity, |knight| {
                        heading(missile.position, knight.position) * MISSILE_SPEED
                    }),
                StrikeTarget::Base => heading(missile.position, base.center) * MISSILE_SPEED,
            };
            let position = missile.position + velocity * scale.factor();

            if matches!(missile.target, StrikeTarget::Knight(_)) {
                let struck = knights.iter().find(|knight| {
                    knight.is_alive() && position.distance(knight.position) < MISSILE_KNIGHT_RADIUS
                });
                if let Some(knight) = struck {
                    out.push(Command::DamageKnight {
                        knight: knight.id,
                        amount: missile.damage,
                    });
                    resolve(missile, true, out);
                    continue;
                }
            }
            if position.distance(base.center) < MISSILE_BASE_RADIUS {
                out.push(Command::DamageBase {
                    amount: missile.damage,
                });
                resolve(missile, true, out);
                continue;
            }
            self.fly(missile, position, velocity, out);
        }
    }

    fn fly(
        &self,
        missile: &MissileSnapshot,
        position: Vec2,
        velocity: Vec2,
        out: &mut Vec<Command>,
    ) {
        if self.has_escaped(position) {
            resolve(missile, false, out);
        } else {
            out.push(Command::MoveMissile {
                missile: missile.id,
                position,
                velocity,
            });
        }
    }

    fn has_escaped(&self, position: Vec2) -> bool {
        position.x < -MISSILE_ESCAPE_MARGIN
            || position.y < -MISSILE_ESCAPE_MARGIN
            || position.x > self.width + MISSILE_ESCAPE_MARGIN
            || position.y > self.height + MISSILE_ESCAPE_MARGIN
    }

    /// Jumps from the first victim to the nearest unvisited live attacker
    /// within the chain radius until the chain is exhausted.
    fn chain(
        &mut self,
        projectile: &ProjectileSnapshot,
        first: &AttackerSnapshot,
        attackers: &AttackerView,
        out: &mut Vec<Command>,
    ) {
        self.struck.clear();
        let mut current = first;
        loop {
            self.struck.push(current.id);
            out.push(Command::DamageAttacker {
                attacker: current.id,
                amount: projectile.damage,
            });
            out.push(Command::StunAttacker {
                attacker: current.id,
                duration: projectile.stun_duration,
            });
            if self.struck.len() >= projectile.chain_max as usize {
                break;
            }
            let origin = current.position;
            let next = attackers
                .iter()
                .filter(|attacker| attacker.is_alive() && !self.struck.contains(&attacker.id))
                .map(|attacker| (origin.distance(attacker.position), attacker))
                .filter(|(distance, _)| *distance <= projectile.chain_radius)
                .min_by(|(left, _), (right, _)| left.total_cmp(right))
                .map(|(_, attacker)| attacker);
            match next {
                Some(attacker) => current = attacker,
                None => break,
            }
        }
    }
}

fn resolve(missile: &MissileSnapshot, impact: bool, out: &mut Vec<Command>) {
    out.push(Command::ResolveMissile {
        missile: missile.id,
        impact,
    });
}
