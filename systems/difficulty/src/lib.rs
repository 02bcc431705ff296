#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that escalates the session as score and time grow.
//!
//! Four independent rules run every frame, each behind its own gate:
//! firing-lane growth, power creep, attrition hardening and the one-shot
//! special state window.

use std::time::Duration;

use rampart_core::{rules, Command, SessionSnapshot};

/// Configuration parameters required to construct the difficulty system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    lane_score_step: u32,
    power_creep_interval: Duration,
    hardening_interval: Duration,
    special_state_at: u64,
    special_state_duration: Duration,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// `special_state_at` is the whole elapsed second on which the special
    /// state begins.
    #[must_use]
    pub const fn new(
        lane_score_step: u32,
        power_creep_interval: Duration,
        hardening_interval: Duration,
        special_state_at: u64,
        special_state_duration: Duration,
    ) -> Self {
        Self {
            lane_score_step,
            power_creep_interval,
            hardening_interval,
            special_state_at,
            special_state_duration,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            rules::LANE_SCORE_STEP,
            rules::POWER_CREEP_INTERVAL,
            rules::HARDENING_INTERVAL,
            rules::SPECIAL_STATE_TRIGGER_SECONDS,
            rules::SPECIAL_STATE_DURATION,
        )
    }
}

/// Difficulty scaler tracking the gate of every escalation rule.
#[derive(Debug)]
pub struct Difficulty {
    config: Config,
    lane_checkpoint: u32,
    last_power_creep: Duration,
    last_hardening: Duration,
    special_state_triggered: bool,
}

impl Difficulty {
    /// Creates a new difficulty system with every gate opened at time zero.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            lane_checkpoint: 0,
            last_power_creep: Duration::ZERO,
            last_hardening: Duration::ZERO,
            special_state_triggered: false,
        }
    }

    /// Inspects the session and emits the escalation commands that are due.
    pub fn handle(&mut self, session: &SessionSnapshot, out: &mut Vec<Command>) {
        if session.is_over() {
            return;
        }

        let now = session.clock;
        self.grow_lanes(session.score, out);

        if session.score > rules::POWER_CREEP_SCORE
            && now.saturating_sub(self.last_power_creep) >= self.config.power_creep_interval
        {
            self.last_power_creep = now;
            out.push(Command::EmpowerEnemies {
                damage_bonus: rules::POWER_CREEP_DAMAGE,
                speed_factor: rules::POWER_CREEP_SPEED_FACTOR,
            });
        }

        if now.saturating_sub(self.last_hardening) >= self.config.hardening_interval {
            self.last_hardening = now;
            out.push(Command::FortifyEnemies {
                health_bonus: rules::HARDENING_HEALTH,
            });
        }

        self.schedule_special_state(session, out);
    }

    fn grow_lanes(&mut self, score: u32, out: &mut Vec<Command>) {
        let step = self.config.lane_score_step;
        if step == 0 {
            return;
        }

        if score >= self.lane_checkpoint.saturating_add(step) {
            self.lane_checkpoint = score / step * step;
            out.push(Command::AddFiringLane);
        }
    }

    fn schedule_special_state(&mut self, session: &SessionSnapshot, out: &mut Vec<Command>) {
        match session.special_state_since {
            Some(since) => {
                if session.clock.saturating_sub(since) >= self.config.special_state_duration {
                    log::debug!("special state window elapsed");
                    out.push(Command::EndSpecialState);
                }
            }
            None => {
                if !self.special_state_triggered
                    && session.elapsed_seconds() == self.config.special_state_at
                {
                    self.special_state_triggered = true;
                    log::debug!("special state due at {}s", session.elapsed_seconds());
                    out.push(Command::BeginSpecialState);
                }
            }
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
