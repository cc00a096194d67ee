#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Attacker behaviour: march on the base, fight knights that get close, and
//! strike or shoot once in reach.

use bastion_core::{
    geometry::{heading, step_toward},
    AttackerClass, AttackerSnapshot, AttackerView, BaseSnapshot, Command, KnightSnapshot,
    KnightView, StrikeTarget, TimeScale, KNIGHT_AWARENESS_RADIUS, KNIGHT_ENGAGE_RADIUS,
    MELEE_REACH, MISSILE_SPEED, Vec2,
};

/// Pure system that decides what every attacker does this tick.
#[derive(Debug, Default)]
pub struct AttackerAi;

impl AttackerAi {
    /// Creates the attacker behaviour system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits one movement, strike or launch command per attacker that can act.
    ///
    /// Dead and stunned attackers are skipped. Non-boss attackers turn on any
    /// knight closer than the engage radius; everyone else heads for the base.
    pub fn handle(
        &mut self,
        scale: TimeScale,
        attackers: &AttackerView,
        knights: &KnightView,
        base: &BaseSnapshot,
        out: &mut Vec<Command>,
    ) {
        for attacker in attackers.iter() {
            if !attacker.is_alive() || attacker.is_stunned() {
                continue;
            }
            if !attacker.kind.is_boss() {
                if let Some(knight) = nearest_knight(attacker, knights) {
                    if attacker.position.distance(knight.position) < KNIGHT_ENGAGE_RADIUS {
                        engage_knight(attacker, knight, scale, out);
                        continue;
                    }
                }
            }
            assault_base(attacker, base, scale, out);
        }
    }
}

fn nearest_knight<'a>(
    attacker: &AttackerSnapshot,
    knights: &'a KnightView,
) -> Option<&'a KnightSnapshot> {
    knights
        .iter()
        .filter(|knight| knight.is_alive())
        .map(|knight| (attacker.position.distance(knight.position), knight))
        .filter(|(distance, _)| *distance < KNIGHT_AWARENESS_RADIUS)
        .min_by(|(left, _), (right, _)| left.total_cmp(right))
        .map(|(_, knight)| knight)
}

fn engage_knight(
    attacker: &AttackerSnapshot,
    knight: &KnightSnapshot,
    scale: TimeScale,
    out: &mut Vec<Command>,
) {
    let distance = attacker.position.distance(knight.position);
    match attacker.kind.missile() {
        None if distance < MELEE_REACH => {
            if attacker.is_ready() {
                out.push(Command::StrikeKnight {
                    attacker: attacker.id,
                    knight: knight.id,
                });
            }
        }
        Some(_) if distance < attacker.kind.reach() => {
            if attacker.is_ready() {
                out.push(Command::LaunchMissile {
                    attacker: attacker.id,
                    target: StrikeTarget::Knight(knight.id),
                    velocity: heading(attacker.position, knight.position) * MISSILE_SPEED,
                });
            }
        }
        _ => advance(attacker, knight.position, scale, out),
    }
}

fn assault_base(
    attacker: &AttackerSnapshot,
    base: &BaseSnapshot,
    scale: TimeScale,
    out: &mut Vec<Command>,
) {
    let distance = attacker.position.distance(base.center);
    if distance > attacker.kind.reach() {
        advance(attacker, base.center, scale, out);
        return;
    }
    match attacker.class() {
        AttackerClass::RangedBow | AttackerClass::RangedStaff => {
            if attacker.is_ready() {
                out.push(Command::LaunchMissile {
                    attacker: attacker.id,
                    target: StrikeTarget::Base,
                    velocity: heading(attacker.position, base.center) * MISSILE_SPEED,
                });
            }
        }
        AttackerClass::SuicideMelee => out.push(Command::StrikeBase {
            attacker: attacker.id,
        }),
        AttackerClass::PersistentMelee | AttackerClass::Boss => {
            if attacker.is_ready() {
                out.push(Command::StrikeBase {
                    attacker: attacker.id,
                });
            }
        }
    }
}

fn advance(attacker: &AttackerSnapshot, goal: Vec2, scale: TimeScale, out: &mut Vec<Command>) {
    let step = attacker.effective_speed() * scale.factor();
    if step <= 0.0 {
        return;
    }
    out.push(Command::MoveAttacker {
        attacker: attacker.id,
        position: step_toward(attacker.position, goal, step),
    });
}
