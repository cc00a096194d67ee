#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that operates every structure on the grid: towers pick the
//! nearest attacker and fire, fire towers hold their beams, mines pay out and
//! barracks train knights.

use std::f32::consts::TAU;

use bastion_core::{
    AttackerId, AttackerSnapshot, AttackerView, Command, StructureKind, StructureSnapshot,
    StructureView, Tier, TimeScale, Vec2, INCOME_INTERVAL, KNIGHT_SPAWN_DISTANCE,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Ticks per second; beam damage is quoted per second.
const TICKS_PER_SECOND: f32 = 60.0;

/// Configuration parameters required to construct the defenses system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration whose knight placement follows `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits structure actions.
#[derive(Debug)]
pub struct Defenses {
    rng: ChaCha8Rng,
}

impl Defenses {
    /// Creates a new defenses system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits the action of every structure that has something to do.
    pub fn handle(
        &mut self,
        scale: TimeScale,
        structures: &StructureView,
        attackers: &AttackerView,
        out: &mut Vec<Command>,
    ) {
        for structure in structures.iter() {
            match structure.kind {
                StructureKind::Archer | StructureKind::Turret | StructureKind::Mage => {
                    shoot(structure, attackers, out);
                }
                StructureKind::Fire => burn(structure, attackers, scale, out),
                StructureKind::Mine => {
                    if structure.income_timer >= INCOME_INTERVAL {
                        out.push(Command::CollectIncome {
                            structure: structure.id,
                        });
                    }
                }
                StructureKind::Barracks => self.train(structure, out),
            }
        }
    }

    fn train(&mut self, structure: &StructureSnapshot, out: &mut Vec<Command>) {
        if structure.training_cooldown > 0.0
            || structure.live_knights >= structure.stats.max_knights
        {
            return;
        }
        let angle = self.rng.gen::<f32>() * TAU;
        out.push(Command::SpawnKnight {
            barracks: structure.id,
            position: structure.center + Vec2::from_angle(angle) * KNIGHT_SPAWN_DISTANCE,
        });
    }
}

/// Fires at the nearest attacker strictly inside range once the tower is ready.
fn shoot(structure: &StructureSnapshot, attackers: &AttackerView, out: &mut Vec<Command>) {
    if !structure.is_ready() {
        return;
    }
    let range = structure.range();
    let target = attackers
        .iter()
        .filter(|attacker| attacker.is_alive())
        .map(|attacker| (structure.center.distance(attacker.position), attacker))
        .filter(|(distance, _)| *distance < range)
        .min_by(|(left, _), (right, _)| left.total_cmp(right));
    if let Some((_, attacker)) = target {
        out.push(Command::FireProjectile {
            structure: structure.id,
            target: attacker.id,
        });
    }
}

/// Keeps each beam on its attacker while it lives in range, fills free beams
/// with the nearest unheld attackers and burns whatever is held.
fn burn(
    structure: &StructureSnapshot,
    attackers: &AttackerView,
    scale: TimeScale,
    out: &mut Vec<Command>,
) {
    let range = structure.range();
    let in_range = |attacker: &AttackerSnapshot| {
        attacker.is_alive() && structure.center.distance(attacker.position) <= range
    };
    let beams = if structure.tier == Tier::Three { 2 } else { 1 };

    let mut targets: [Option<AttackerId>; 2] = [None; 2];
    for (slot, held) in targets.iter_mut().zip(structure.beam_targets).take(beams) {
        *slot = held.filter(|id| attackers.get(*id).is_some_and(in_range));
    }
    for index in 0..beams {
        if targets.get(index).is_some_and(Option::is_some) {
            continue;
        }
        let nearest = attackers
            .iter()
            .filter(|attacker| in_range(*attacker) && !targets.contains(&Some(attacker.id)))
            .map(|attacker| (structure.center.distance(attacker.position), attacker.id))
            .min_by(|(left, _), (right, _)| left.total_cmp(right))
            .map(|(_, id)| id);
        if let Some(slot) = targets.get_mut(index) {
            *slot = nearest;
        }
    }

    if targets != structure.beam_targets {
        out.push(Command::AimBeams {
            structure: structure.id,
            targets,
        });
    }
    let amount = structure.stats.dps / TICKS_PER_SECOND * scale.factor();
    for attacker in targets.into_iter().flatten() {
        out.push(Command::DamageAttacker { attacker, amount });
    }
}
