#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director: ends timed build phases, spawns each round's
//! attackers at the grid edge and declares rounds cleared.

mod composition;

use bastion_core::{
    spawn_delay, Command, GameMode, GameState, Vec2, WaveSnapshot, SPAWN_MARGIN,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

pub use composition::{goblin_health, health_for, roll_attacker};

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    width: f32,
    height: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration for a grid of the given size in world units.
    #[must_use]
    pub const fn new(width: f32, height: f32, rng_seed: u64) -> Self {
        Self {
            width,
            height,
            rng_seed,
        }
    }
}

/// Pure system that paces rounds.
#[derive(Debug)]
pub struct Waves {
    width: f32,
    height: f32,
    rng: ChaCha8Rng,
}

impl Waves {
    /// Creates a new wave director using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            width: config.width,
            height: config.height,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits the phase change or spawn the round clock calls for.
    ///
    /// Runs at the start of every tick, before any combat system.
    pub fn handle(&mut self, wave: &WaveSnapshot, out: &mut Vec<Command>) {
        match wave.state {
            GameState::Building => {
                if wave.mode == Some(GameMode::Timed) && wave.build_timer == 0 {
                    out.push(Command::BeginCombat);
                }
            }
            GameState::Combat => {
                if wave.spawned >= wave.quota || wave.spawn_timer < spawn_delay(wave.round) {
                    return;
                }
                let roll: f32 = self.rng.gen();
                let (kind, profile) = roll_attacker(wave.round, wave.spawned, roll);
                let position = self.edge_position();
                trace!(?kind, round = wave.round, spawned = wave.spawned, "spawning attacker");
                out.push(Command::SpawnAttacker {
                    kind,
                    position,
                    profile,
                });
            }
            GameState::Intro | GameState::GameOver | GameState::Victory => {}
        }
    }

    /// Declares the round cleared once every attacker spawned and was removed.
    ///
    /// Runs at the end of every tick, after cleanup.
    pub fn review(&self, wave: &WaveSnapshot, attackers_remaining: usize, out: &mut Vec<Command>) {
        if wave.state == GameState::Combat
            && wave.spawned >= wave.quota
            && attackers_remaining == 0
        {
            out.push(Command::CompleteRound);
        }
    }

    fn edge_position(&mut self) -> Vec2 {
        let side = self.rng.gen_range(0..4_u8);
        let along: f32 = self.rng.gen();
        match side {
            0 => Vec2::new(along * self.width, -SPAWN_MARGIN),
            1 => Vec2::new(self.width + SPAWN_MARGIN, along * self.height),
            2 => Vec2::new(along * self.width, self.height + SPAWN_MARGIN),
            _ => Vec2::new(-SPAWN_MARGIN, along * self.height),
        }
    }
}
