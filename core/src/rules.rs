//! Round pacing rules and combat tuning constants.

use crate::AttackerKind;

/// Distance at which melee attackers reach the base or a knight.
pub const MELEE_REACH: f32 = 30.0;

/// Ticks a persistent melee attacker waits between strikes.
pub const MELEE_COOLDOWN: f32 = 60.0;

/// Knights closer than this draw non-boss attackers away from the base.
pub const KNIGHT_AWARENESS_RADIUS: f32 = 100.0;

/// Attackers commit to a knight once it is closer than this.
pub const KNIGHT_ENGAGE_RADIUS: f32 = 40.0;

/// World units a tower projectile travels per tick.
pub const PROJECTILE_SPEED: f32 = 6.0;

/// A tower projectile hits once closer than this to its target.
pub const PROJECTILE_IMPACT_RADIUS: f32 = 10.0;

/// World units an attacker missile travels per tick.
pub const MISSILE_SPEED: f32 = 5.0;

/// A missile hits a knight once closer than this.
pub const MISSILE_KNIGHT_RADIUS: f32 = 15.0;

/// A missile hits the base once closer than this to its centre.
pub const MISSILE_BASE_RADIUS: f32 = 35.0;

/// Missiles this far outside the grid are discarded.
pub const MISSILE_ESCAPE_MARGIN: f32 = 60.0;

/// Distance outside the grid edge at which attackers appear.
pub const SPAWN_MARGIN: f32 = 20.0;

/// Starting life of a cosmetic effect.
pub const EFFECT_LIFE: f32 = 255.0;

/// Life an effect loses per unit of scaled time.
pub const EFFECT_DECAY: f32 = 5.0;

/// Health the base recovers at the start of the first build phases.
pub const BASE_REGENERATION: u32 = 20;

/// Lowest amount of health the base recovers between rounds.
pub const MIN_BASE_REGENERATION: u32 = 5;

/// Boss leading the provided round, if it is a boss round.
#[must_use]
pub const fn boss_for_round(round: u32) -> Option<AttackerKind> {
    match round {
        10 => Some(AttackerKind::GoblinKing),
        20 => Some(AttackerKind::DemonLord),
        30 => Some(AttackerKind::Giant),
        _ => None,
    }
}

/// Reports whether the round opens with a boss.
#[must_use]
pub const fn is_boss_round(round: u32) -> bool {
    boss_for_round(round).is_some()
}

/// Number of attackers spawned over the course of a round.
#[must_use]
pub const fn round_quota(round: u32) -> u32 {
    if is_boss_round(round) {
        return 1 + round;
    }
    let mut quota = 5 + 3 * round;
    if round > 13 {
        quota += 18 * (round - 13);
    }
    if round > 20 {
        quota += 10 * (round - 20);
    }
    quota
}

/// Unscaled ticks between two spawns.
#[must_use]
pub const fn spawn_delay(round: u32) -> u32 {
    let shortened = 7 * (round / 3);
    if shortened >= 60 - 12 {
        12
    } else {
        60 - shortened
    }
}

/// Health the base recovers when the build phase of `round` begins.
#[must_use]
pub const fn base_regeneration(round: u32) -> u32 {
    if round <= 5 {
        return BASE_REGENERATION;
    }
    let decline = round - 5;
    if decline >= BASE_REGENERATION - MIN_BASE_REGENERATION {
        MIN_BASE_REGENERATION
    } else {
        BASE_REGENERATION - decline
    }
}

/// Number of mines that may stand during `round`.
#[must_use]
pub const fn mine_cap(round: u32) -> u32 {
    1 + round / 10
}

/// Gold returned for demolishing something that cost `cost`.
#[must_use]
pub const fn refund(cost: u32) -> u32 {
    cost * 2 / 3
}
