#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Rampart.
//!
//! The world owns every enemy, projectile and damage label along with the
//! session counters. It is mutated exclusively through [`apply`]; systems and
//! adapters observe it through the functions in [`query`].

mod combat;
mod entities;

use std::{collections::BTreeMap, time::Duration};

use log::{debug, info, warn};
use rampart_core::{
    rules, Command, EnemyId, EnemyStats, Event, Field, GameOutcome, GameSummary, Heading,
    LabelId, LabelStyle, ProjectileId, WorldPoint,
};

use crate::entities::{DamageLabel, Enemy, Projectile};

/// Stats captured when the special state began, keyed by enemy.
#[derive(Clone, Debug)]
struct SpecialState {
    started_at: Duration,
    snapshot: BTreeMap<EnemyId, EnemyStats>,
}

/// Represents the authoritative Rampart session state.
#[derive(Debug)]
pub struct World {
    field: Field,
    clock: Duration,
    score: u32,
    barrier_health: f32,
    firing_lanes: u32,
    lane_offset: f32,
    volley_cooldown: Duration,
    special_state: Option<SpecialState>,
    outcome: Option<GameSummary>,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    labels: Vec<DamageLabel>,
    next_enemy_id: u32,
    next_projectile_id: u32,
    next_label_id: u32,
}

impl World {
    /// Creates a new session on the standard field.
    #[must_use]
    pub fn new() -> Self {
        Self::with_field(Field::STANDARD)
    }

    /// Creates a new session on the provided field.
    #[must_use]
    pub fn with_field(field: Field) -> Self {
        Self {
            field,
            clock: Duration::ZERO,
            score: 0,
            barrier_health: rules::BARRIER_HEALTH,
            firing_lanes: 1,
            lane_offset: 0.0,
            volley_cooldown: Duration::ZERO,
            special_state: None,
            outcome: None,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            labels: Vec::new(),
            next_enemy_id: 0,
            next_projectile_id: 0,
            next_label_id: 0,
        }
    }

    fn launch_projectile(
        &mut self,
        origin: WorldPoint,
        heading: Heading,
        out_events: &mut Vec<Event>,
    ) {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        self.projectiles.push(Projectile::new(id, origin, heading));
        out_events.push(Event::ProjectileFired {
            projectile: id,
            origin,
            heading,
        });
    }

    fn spawn_label(&mut self, position: WorldPoint, value: f32, style: LabelStyle) {
        let id = LabelId::new(self.next_label_id);
        self.next_label_id = self.next_label_id.wrapping_add(1);
        self.labels
            .push(DamageLabel::new(id, position, value, style, self.clock));
    }

    fn latch_outcome(&mut self, outcome: GameOutcome, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }

        let summary = GameSummary {
            outcome,
            score: self.score,
            elapsed_seconds: self.clock.as_secs(),
        };
        info!(
            "session ended in {outcome:?} with score {} after {}",
            summary.score,
            summary.elapsed_label()
        );
        self.outcome = Some(summary);
        out_events.push(Event::GameEnded { summary });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the session has an outcome every command is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.outcome.is_some() {
        debug!("ignoring {command:?} after the session ended");
        return;
    }

    match command {
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            world.volley_cooldown = world
                .volley_cooldown
                .saturating_sub(rules::VOLLEY_COOLDOWN_STEP);
            out_events.push(Event::TimeAdvanced {
                dt,
                clock: world.clock,
            });
        }
        Command::SpawnEnemy { position, stats } => {
            let id = EnemyId::new(world.next_enemy_id);
            world.next_enemy_id = world.next_enemy_id.wrapping_add(1);
            world.enemies.push(Enemy::new(id, position, stats));
            debug!(
                "spawned enemy {} at ({:.1}, {:.1})",
                id.get(),
                position.x(),
                position.y()
            );
            out_events.push(Event::EnemySpawned { enemy: id, position });
        }
        Command::FireProjectile { origin, heading } => {
            world.launch_projectile(origin, heading, out_events);
        }
        Command::FireVolley => {
            if !world.volley_cooldown.is_zero() {
                warn!(
                    "volley requested with {:.2}s of cooldown left",
                    world.volley_cooldown.as_secs_f32()
                );
                out_events.push(Event::VolleyRejected {
                    remaining: world.volley_cooldown,
                });
                return;
            }

            let field = world.field;
            for origin in field.volley_origins() {
                world.launch_projectile(origin, Heading::UP, out_events);
            }
            world.volley_cooldown = rules::VOLLEY_COOLDOWN;
            debug!("volley released");
            out_events.push(Event::VolleyFired {
                projectiles: rules::VOLLEY_SIZE,
            });
        }
        Command::ShiftLanes { shift } => {
            world.lane_offset += shift.delta();
            out_events.push(Event::LanesShifted {
                offset: world.lane_offset,
            });
        }
        Command::AddFiringLane => {
            world.firing_lanes = world.firing_lanes.saturating_add(1);
            info!("firing lanes increased to {}", world.firing_lanes);
            out_events.push(Event::FiringLanesIncreased {
                lanes: world.firing_lanes,
            });
        }
        Command::EmpowerEnemies {
            damage_bonus,
            speed_factor,
        } => {
            for enemy in &mut world.enemies {
                enemy.stats.damage += damage_bonus;
                enemy.stats.speed *= speed_factor;
            }
            out_events.push(Event::EnemiesEmpowered {
                affected: count(world.enemies.len()),
            });
        }
        Command::FortifyEnemies { health_bonus } => {
            for enemy in &mut world.enemies {
                enemy.stats.health += health_bonus;
            }
            out_events.push(Event::EnemiesFortified {
                affected: count(world.enemies.len()),
            });
        }
        Command::BeginSpecialState => {
            if world.special_state.is_some() {
                return;
            }

            let mut snapshot = BTreeMap::new();
            for enemy in &mut world.enemies {
                let _ = snapshot.insert(enemy.id, enemy.stats);
                enemy.stats = enemy.stats.amplified();
            }
            let affected = count(snapshot.len());
            info!("special state started, {affected} enemies amplified");
            world.special_state = Some(SpecialState {
                started_at: world.clock,
                snapshot,
            });
            out_events.push(Event::SpecialStateStarted { affected });
        }
        Command::EndSpecialState => {
            let Some(state) = world.special_state.take() else {
                return;
            };

            let mut restored = 0;
            for enemy in &mut world.enemies {
                if let Some(stats) = state.snapshot.get(&enemy.id) {
                    enemy.stats = *stats;
                    restored += 1;
                }
            }
            info!("special state ended, {restored} enemies restored");
            out_events.push(Event::SpecialStateEnded { restored });
        }
        Command::AdvanceEntities => combat::resolve_frame(world, out_events),
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use rampart_core::{
        EnemyView, Field, GameSummary, LabelSnapshot, ProjectileSnapshot, SessionSnapshot,
    };

    use super::World;

    /// Dimensions of the field the session is played on.
    #[must_use]
    pub fn field(world: &World) -> Field {
        world.field
    }

    /// Captures the session-wide counters and timers.
    #[must_use]
    pub fn session(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            field: world.field,
            clock: world.clock,
            score: world.score,
            barrier_health: world.barrier_health,
            firing_lanes: world.firing_lanes,
            lane_offset: world.lane_offset,
            volley_cooldown: world.volley_cooldown,
            special_state_since: world.special_state.as_ref().map(|state| state.started_at),
            outcome: world.outcome,
        }
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures every projectile in flight ordered by identifier.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        let mut snapshots: Vec<_> = world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Captures every visible damage label ordered by identifier.
    #[must_use]
    pub fn labels(world: &World) -> Vec<LabelSnapshot> {
        let mut snapshots: Vec<_> = world.labels.iter().map(|label| label.snapshot()).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Terminal summary once the session has ended.
    #[must_use]
    pub fn outcome(world: &World) -> Option<GameSummary> {
        world.outcome
    }
}
