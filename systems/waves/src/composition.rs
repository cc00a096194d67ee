//! Which attackers a round is made of.

use bastion_core::{boss_for_round, AttackerKind, AttackerProfile};

#[derive(Clone, Copy, Debug)]
struct Template {
    kind: AttackerKind,
    speed: f32,
    damage: f32,
    gold_reward: u32,
}

const fn template(kind: AttackerKind, speed: f32, damage: f32, gold_reward: u32) -> Template {
    Template {
        kind,
        speed,
        damage,
        gold_reward,
    }
}

/// Chosen when the roll exceeds `above` and the round is at least `from_round`.
#[derive(Clone, Copy, Debug)]
struct Pick {
    above: f32,
    from_round: u32,
    template: Template,
}

const fn pick(above: f32, template: Template) -> Pick {
    Pick {
        above,
        from_round: 0,
        template,
    }
}

#[derive(Debug)]
struct Bracket {
    last_round: u32,
    picks: &'static [Pick],
    fallback: Template,
}

const GOBLIN: Template = template(AttackerKind::Goblin, 1.0, 5.0, 5);
const BOWMAN: Template = template(AttackerKind::Bowman, 1.0, 5.0, 5);
const TROLL: Template = template(AttackerKind::Troll, 0.55, 35.0, 20);
const DEMON: Template = template(AttackerKind::Demon, 0.6, 20.0, 15);
const ORC: Template = template(AttackerKind::Orc, 0.9, 5.0, 10);
const WARLOCK: Template = template(AttackerKind::Warlock, 0.8, 10.0, 5);
const SPRINTER: Template = template(AttackerKind::Goblin, 1.3, 5.0, 5);

static BRACKETS: [Bracket; 5] = [
    Bracket {
        last_round: 2,
        picks: &[],
        fallback: GOBLIN,
    },
    Bracket {
        last_round: 4,
        picks: &[
            pick(0.6, template(AttackerKind::Goblin, 1.1, 5.0, 5)),
            pick(0.25, BOWMAN),
        ],
        fallback: template(AttackerKind::Orc, 0.85, 5.0, 10),
    },
    Bracket {
        last_round: 10,
        picks: &[
            pick(0.65, template(AttackerKind::Goblin, 1.2, 5.0, 5)),
            pick(0.4, BOWMAN),
            pick(0.2, ORC),
        ],
        fallback: template(AttackerKind::Warlock, 0.85, 8.0, 5),
    },
    Bracket {
        last_round: 22,
        picks: &[
            Pick {
                above: 0.85,
                from_round: 20,
                template: TROLL,
            },
            pick(0.65, DEMON),
            pick(0.4, ORC),
            pick(0.2, WARLOCK),
            pick(0.05, BOWMAN),
        ],
        fallback: SPRINTER,
    },
    Bracket {
        last_round: u32::MAX,
        picks: &[
            pick(0.82, template(AttackerKind::Drake, 0.75, 17.0, 25)),
            pick(0.72, TROLL),
            pick(0.55, DEMON),
            pick(0.35, ORC),
            pick(0.2, WARLOCK),
            pick(0.05, BOWMAN),
        ],
        fallback: SPRINTER,
    },
];

fn boss_template(kind: AttackerKind) -> Template {
    match kind {
        AttackerKind::DemonLord => template(kind, 0.5, 30.0, 200),
        AttackerKind::Giant => template(kind, 0.4, 40.0, 300),
        _ => template(AttackerKind::GoblinKing, 0.7, 15.0, 100),
    }
}

/// Base health of a goblin in the provided round; most kinds scale from it.
#[must_use]
pub fn goblin_health(round: u32) -> u32 {
    let mut health = 30 + 5 * round;
    if round > 15 {
        health += 8 * (round - 15);
    }
    health
}

/// Starting health of an attacker of `kind` spawned during `round`.
#[must_use]
pub fn health_for(kind: AttackerKind, round: u32) -> f32 {
    let goblin = goblin_health(round);
    let health = match kind {
        AttackerKind::Goblin | AttackerKind::Bowman => goblin,
        AttackerKind::Orc => goblin * 5 / 3,
        AttackerKind::Warlock => (goblin * 7 / 10).max(18),
        AttackerKind::Demon => 150 + 20 * round,
        AttackerKind::Troll => 800,
        AttackerKind::Drake => 600,
        AttackerKind::GoblinKing => 1800,
        AttackerKind::DemonLord => 4500,
        AttackerKind::Giant => 13_000,
    };
    health as f32
}

/// Chooses the next attacker of a round.
///
/// The first spawn of a boss round is always the boss. Otherwise `roll`, a
/// uniform sample from `[0, 1)`, selects a kind from the round's bracket.
#[must_use]
pub fn roll_attacker(round: u32, spawned: u32, roll: f32) -> (AttackerKind, AttackerProfile) {
    let template = match boss_for_round(round) {
        Some(boss) if spawned == 0 => boss_template(boss),
        _ => BRACKETS
            .iter()
            .find(|bracket| round <= bracket.last_round)
            .map_or(GOBLIN, |bracket| {
                bracket
                    .picks
                    .iter()
                    .find(|pick| round >= pick.from_round && roll > pick.above)
                    .map_or(bracket.fallback, |pick| pick.template)
            }),
    };
    let profile = AttackerProfile {
        health: health_for(template.kind, round),
        speed: template.speed,
        damage: template.damage,
        gold_reward: template.gold_reward,
    };
    (template.kind, profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_rounds_are_all_goblins() {
        for roll in [0.0, 0.5, 0.99] {
            let (kind, profile) = roll_attacker(1, 3, roll);
            assert_eq!(kind, AttackerKind::Goblin);
            assert_eq!(profile.health, 35.0);
            assert_eq!(profile.speed, 1.0);
        }
    }

    #[test]
    fn trolls_need_round_twenty() {
        assert_eq!(roll_attacker(19, 1, 0.9).0, AttackerKind::Demon);
        assert_eq!(roll_attacker(21, 1, 0.9).0, AttackerKind::Troll);
    }

    #[test]
    fn boss_leads_only_the_first_spawn() {
        let (kind, profile) = roll_attacker(20, 0, 0.1);
        assert_eq!(kind, AttackerKind::DemonLord);
        assert_eq!(profile.health, 4500.0);
        assert_eq!(profile.gold_reward, 200);
        assert!(!roll_attacker(20, 1, 0.1).0.is_boss());
    }

    #[test]
    fn late_health_scaling() {
        assert_eq!(goblin_health(15), 105);
        assert_eq!(goblin_health(16), 118);
        assert_eq!(health_for(AttackerKind::Orc, 1), 58.0);
        assert_eq!(health_for(AttackerKind::Warlock, 1), 24.0);
        assert_eq!(health_for(AttackerKind::Demon, 12), 390.0);
    }

    #[test]
    fn drakes_appear_after_round_twenty_two() {
        let (kind, profile) = roll_attacker(25, 4, 0.95);
        assert_eq!(kind, AttackerKind::Drake);
        assert_eq!(profile.damage, 17.0);
        assert_eq!(roll_attacker(22, 4, 0.95).0, AttackerKind::Troll);
    }
}
