#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestrator that sequences the world and systems once per display refresh.

use std::time::Duration;

use glam::Vec2;
use rampart_core::{Command, Event, Field, GameSummary, PlayerAction, WorldPoint};
use rampart_rendering::{
    EnemyPresentation, HudPresentation, LabelPresentation, LanePresentation,
    ProjectilePresentation, RenderingError, Scene,
};
use rampart_system_difficulty::{self as difficulty, Difficulty};
use rampart_system_fire_control::{self as fire_control, FireControl};
use rampart_system_spawning::{self as spawning, Spawning};
use rampart_world::{self as world, query, World};

/// Configuration parameters required to construct a simulation.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    field: Field,
    spawning: spawning::Config,
    fire_control: fire_control::Config,
    difficulty: difficulty::Config,
}

impl Config {
    /// Creates the standard configuration with the provided spawner seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            field: Field::STANDARD,
            spawning: spawning::Config::with_seed(seed),
            fire_control: fire_control::Config::default(),
            difficulty: difficulty::Config::default(),
        }
    }

    /// Replaces the spawner configuration.
    #[must_use]
    pub fn with_spawning(mut self, spawning: spawning::Config) -> Self {
        self.spawning = spawning;
        self
    }

    /// Replaces the fire-control configuration.
    #[must_use]
    pub fn with_fire_control(mut self, fire_control: fire_control::Config) -> Self {
        self.fire_control = fire_control;
        self
    }

    /// Replaces the difficulty configuration.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: difficulty::Config) -> Self {
        self.difficulty = difficulty;
        self
    }
}

/// Owns the session and every system that drives it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    spawning: Spawning,
    fire_control: FireControl,
    difficulty: Difficulty,
    last_frame: Option<Duration>,
}

impl Simulation {
    /// Creates a new simulation using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            world: World::with_field(config.field),
            spawning: Spawning::new(config.spawning),
            fire_control: FireControl::new(config.fire_control),
            difficulty: Difficulty::new(config.difficulty),
            last_frame: None,
        }
    }

    /// Read-only access to the session state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Advances the session by one frame observed at `now`.
    ///
    /// The first frame only establishes the time base. Returns the summary
    /// once the session has ended; later calls return it again without
    /// touching the world.
    pub fn advance(&mut self, now: Duration, actions: &[PlayerAction]) -> Option<GameSummary> {
        if let Some(summary) = query::outcome(&self.world) {
            return Some(summary);
        }

        let dt = self
            .last_frame
            .map_or(Duration::ZERO, |previous| now.saturating_sub(previous));
        self.last_frame = Some(now);

        if !actions.is_empty() {
            log::debug!("frame at {now:?} carries player actions {actions:?}");
        }

        let mut events = Vec::new();
        let mut commands: Vec<Command> = actions.iter().map(|action| action.command()).collect();
        commands.push(Command::Tick { dt });
        self.apply_all(&mut commands, &mut events);

        self.fire_control.handle(
            &events,
            &query::session(&self.world),
            &query::enemy_view(&self.world),
            &mut commands,
        );
        self.apply_all(&mut commands, &mut events);

        self.difficulty
            .handle(&query::session(&self.world), &mut commands);
        self.apply_all(&mut commands, &mut events);

        self.spawning
            .handle(&events, &query::field(&self.world), &mut commands);
        self.apply_all(&mut commands, &mut events);

        commands.push(Command::AdvanceEntities);
        self.apply_all(&mut commands, &mut events);

        query::outcome(&self.world)
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    /// Builds an empty scene sized for the session's field.
    pub fn scene(&self) -> Result<Scene, RenderingError> {
        let field = query::field(&self.world);
        Scene::new(field.width(), field.height(), field.barrier_thickness())
    }

    /// Copies the current session state into the scene descriptor.
    pub fn populate_scene(&self, scene: &mut Scene) {
        let session = query::session(&self.world);
        let lanes = session.firing_lanes;

        scene.lanes.clear();
        scene.lanes.extend((0..lanes).map(|lane| LanePresentation {
            origin: to_vec2(session.field.lane_origin(lane, lanes, session.lane_offset)),
        }));

        scene.enemies.clear();
        scene.enemies.extend(
            query::enemy_view(&self.world)
                .iter()
                .map(|enemy| EnemyPresentation::new(to_vec2(enemy.position))),
        );

        scene.projectiles.clear();
        scene.projectiles.extend(
            query::projectiles(&self.world)
                .iter()
                .map(|projectile| ProjectilePresentation::new(to_vec2(projectile.position))),
        );

        scene.labels.clear();
        scene
            .labels
            .extend(
                query::labels(&self.world)
                    .iter()
                    .map(|label| LabelPresentation {
                        position: to_vec2(label.position),
                        value: label.value,
                        opacity: label.opacity,
                        style: label.style,
                    }),
            );

        scene.hud = HudPresentation {
            score: session.score,
            barrier_health: session.barrier_health,
            elapsed_seconds: session.elapsed_seconds(),
            volley_cooldown: session.volley_cooldown,
            lanes,
        };
    }
}

fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_establishes_time_base() {
        let mut simulation = Simulation::new(Config::new(1));
        assert!(simulation
            .advance(Duration::from_secs(30), &[])
            .is_none());
        assert_eq!(query::session(simulation.world()).clock, Duration::ZERO);

        let _ = simulation.advance(Duration::from_millis(30_016), &[]);
        assert_eq!(
            query::session(simulation.world()).clock,
            Duration::from_millis(16)
        );
    }

    #[test]
    fn scene_matches_the_standard_field() {
        let simulation = Simulation::new(Config::new(1));
        let scene = simulation.scene().expect("standard field is valid");
        assert_eq!(scene.width(), 800.0);
        assert_eq!(scene.height(), 600.0);
    }
}
