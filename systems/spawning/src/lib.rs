#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Probabilistic spawning system responsible for emitting enemy spawn commands.

use rampart_core::{rules, Command, EnemyStats, Event, Field, WorldPoint};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    probability: f64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided per-frame probability and seed.
    ///
    /// The probability is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn new(probability: f64, rng_seed: u64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng_seed,
        }
    }

    /// Configuration using the standard spawn probability.
    #[must_use]
    pub fn with_seed(rng_seed: u64) -> Self {
        Self::new(rules::SPAWN_PROBABILITY, rng_seed)
    }
}

/// Pure system that rolls once per frame for a new enemy.
#[derive(Debug)]
pub struct Spawning {
    probability: f64,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            probability: config.probability,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes frame events and emits spawn commands for the provided field.
    pub fn handle(&mut self, events: &[Event], field: &Field, out: &mut Vec<Command>) {
        for event in events {
            if !matches!(event, Event::TimeAdvanced { .. }) {
                continue;
            }

            if !self.rng.gen_bool(self.probability) {
                continue;
            }

            let position = self.spawn_position(field);
            log::trace!(
                "rolling spawn at ({:.1}, {:.1})",
                position.x(),
                position.y()
            );
            out.push(Command::SpawnEnemy {
                position,
                stats: EnemyStats::BASE,
            });
        }
    }

    fn spawn_position(&mut self, field: &Field) -> WorldPoint {
        let span = field.spawn_span();
        let x = if span > 0.0 {
            self.rng.gen_range(0.0..span)
        } else {
            0.0
        };
        let y = self
            .rng
            .gen_range(rules::SPAWN_BAND_TOP..rules::SPAWN_BAND_BOTTOM);
        WorldPoint::new(x, y)
    }
}
