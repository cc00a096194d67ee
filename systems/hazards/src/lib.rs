#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Area hazards: sticky puddles that slow attackers standing in them and
//! traps that go off when an attacker comes near.

use bastion_core::{
    AttackerView, CellCoord, Command, PuddleView, TrapEffect, TrapView,
};

/// Configuration parameters required to construct the hazards system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    cell_length: f32,
}

impl Config {
    /// Creates a configuration for cells of the provided edge length.
    #[must_use]
    pub const fn new(cell_length: f32) -> Self {
        Self { cell_length }
    }
}

/// Pure system that applies puddle slows and sets off traps.
#[derive(Debug)]
pub struct Hazards {
    cell_length: f32,
}

impl Hazards {
    /// Creates a new hazards system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            cell_length: config.cell_length,
        }
    }

    /// Refreshes the slow of every living attacker whose cell lies in a puddle.
    ///
    /// Membership is decided by grid cell, so an attacker only counts as inside
    /// once its centre crosses into a covered cell.
    pub fn handle_puddles(
        &self,
        puddles: &PuddleView,
        attackers: &AttackerView,
        out: &mut Vec<Command>,
    ) {
        if puddles.is_empty() {
            return;
        }
        for attacker in attackers.iter().filter(|attacker| attacker.is_alive()) {
            let Some(cell) = CellCoord::containing(attacker.position, self.cell_length) else {
                continue;
            };
            let puddle = puddles
                .iter()
                .find(|puddle| puddle.life > 0.0 && puddle.region.contains(cell));
            if let Some(puddle) = puddle {
                out.push(Command::SlowAttacker {
                    attacker: attacker.id,
                    percent: puddle.slow_percent,
                    duration: puddle.debuff_duration,
                });
            }
        }
    }

    /// Sets off every trap a living attacker has stepped close to.
    ///
    /// Blast traps also damage every attacker inside the blast radius; the
    /// world consumes the trap when it receives the trigger.
    pub fn handle_traps(&self, traps: &TrapView, attackers: &AttackerView, out: &mut Vec<Command>) {
        for trap in traps.iter() {
            let definition = trap.kind.definition();
            let tripped = attackers.iter().any(|attacker| {
                attacker.is_alive()
                    && attacker.position.distance(trap.center) < definition.trigger_radius
            });
            if !tripped {
                continue;
            }
            if let TrapEffect::Blast { damage, radius } = definition.effect {
                // Attackers already at zero health still take the blast; cleanup pays once.
                for attacker in attackers.iter() {
                    if attacker.position.distance(trap.center) < radius {
                        out.push(Command::DamageAttacker {
                            attacker: attacker.id,
                            amount: damage,
                        });
                    }
                }
            }
            out.push(Command::TriggerTrap { trap: trap.id });
        }
    }
}
