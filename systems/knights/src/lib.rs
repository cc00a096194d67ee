#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Knight behaviour: guard the barracks, chase attackers that wander inside
//! the leash and walk home once the area is clear.

use bastion_core::{
    geometry::step_toward, AttackerSnapshot, AttackerView, Command, KnightSnapshot, KnightView,
    TimeScale, KNIGHT,
};

/// Pure system that decides what every knight does this tick.
#[derive(Debug, Default)]
pub struct KnightAi;

impl KnightAi {
    /// Creates the knight behaviour system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits at most one strike or move per living knight.
    ///
    /// Pursuit never steps past the leash; a knight whose quarry stands at
    /// the edge of it waits there.
    pub fn handle(
        &mut self,
        scale: TimeScale,
        knights: &KnightView,
        attackers: &AttackerView,
        out: &mut Vec<Command>,
    ) {
        let step = KNIGHT.speed * scale.factor();
        for knight in knights.iter().filter(|knight| knight.is_alive()) {
            match quarry(knight, attackers) {
                Some(attacker) => {
                    if knight.position.distance(attacker.position) <= KNIGHT.attack_range {
                        if knight.is_ready() {
                            out.push(Command::KnightStrike {
                                knight: knight.id,
                                attacker: attacker.id,
                            });
                        }
                    } else {
                        let position = step_toward(knight.position, attacker.position, step);
                        if position.distance(knight.anchor) <= knight.leash_range {
                            out.push(Command::MoveKnight {
                                knight: knight.id,
                                position,
                            });
                        }
                    }
                }
                None => {
                    if knight.position.distance(knight.anchor) > knight.leash_range * 0.5 {
                        out.push(Command::MoveKnight {
                            knight: knight.id,
                            position: step_toward(knight.position, knight.anchor, step),
                        });
                    }
                }
            }
        }
    }
}

/// Nearest living attacker inside the knight's leash.
fn quarry<'a>(
    knight: &KnightSnapshot,
    attackers: &'a AttackerView,
) -> Option<&'a AttackerSnapshot> {
    attackers
        .iter()
        .filter(|attacker| {
            attacker.is_alive() && attacker.position.distance(knight.anchor) <= knight.leash_range
        })
        .map(|attacker| (knight.position.distance(attacker.position), attacker))
        .min_by(|(left, _), (right, _)| left.total_cmp(right))
        .map(|(_, attacker)| attacker)
}
