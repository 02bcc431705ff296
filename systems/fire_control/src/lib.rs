#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that aims every firing lane at the nearest enemy on a fixed cadence.

use std::time::Duration;

use rampart_core::{
    rules, Command, EnemyId, EnemyView, Event, Heading, SessionSnapshot, WorldPoint,
};

/// Configuration parameters required to construct the fire-control system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    interval: Duration,
}

impl Config {
    /// Creates a new configuration firing once per `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(rules::FIRE_INTERVAL)
    }
}

/// Fire-control timer driven by elapsed time rather than frame count.
#[derive(Debug)]
pub struct FireControl {
    interval: Duration,
    accumulator: Duration,
    armed: bool,
}

impl FireControl {
    /// Creates a new armed fire-control system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            interval: config.interval,
            accumulator: Duration::ZERO,
            armed: true,
        }
    }

    /// Reports whether the timer still schedules volleys.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Consumes frame events and immutable views to emit projectile commands.
    ///
    /// Every elapsed interval fires one projectile per lane toward the nearest
    /// enemy. Once the session has an outcome the timer disarms for good.
    pub fn handle(
        &mut self,
        events: &[Event],
        session: &SessionSnapshot,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if !self.armed {
            return;
        }

        let ended = events
            .iter()
            .any(|event| matches!(event, Event::GameEnded { .. }));
        if ended || session.is_over() {
            self.armed = false;
            self.accumulator = Duration::ZERO;
            log::debug!("fire control disarmed");
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { dt, .. } = event {
                self.accumulator = self.accumulator.saturating_add(*dt);
            }
        }

        let ticks = self.resolve_ticks();
        if ticks == 0 || enemies.is_empty() {
            return;
        }

        for _ in 0..ticks {
            self.fire_lanes(session, enemies, out);
        }
    }

    fn resolve_ticks(&mut self) -> usize {
        if self.interval.is_zero() {
            return 0;
        }

        let mut ticks = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            ticks += 1;
        }
        ticks
    }

    fn fire_lanes(&self, session: &SessionSnapshot, enemies: &EnemyView, out: &mut Vec<Command>) {
        let lanes = session.firing_lanes;
        for lane in 0..lanes {
            let origin = session
                .field
                .lane_origin(lane, lanes, session.lane_offset);
            let Some(target) = nearest_enemy(origin, enemies) else {
                continue;
            };

            if let Some(heading) = Heading::toward(origin, target.center) {
                out.push(Command::FireProjectile { origin, heading });
            }
        }
    }
}

fn nearest_enemy(origin: WorldPoint, enemies: &EnemyView) -> Option<BestCandidate> {
    let mut best: Option<BestCandidate> = None;
    for snapshot in enemies.iter() {
        let center = snapshot.center();
        let current = BestCandidate {
            distance_sq: origin.distance_squared(center),
            enemy: snapshot.id,
            center,
        };

        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }
    best
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    enemy: EnemyId,
    center: WorldPoint,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }

        self.enemy < other.enemy
    }
}
