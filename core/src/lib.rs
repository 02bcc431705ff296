#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to. Systems consume event streams, query immutable
//! snapshots such as [`SessionSnapshot`] and [`EnemyView`], and respond
//! exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed gameplay rules shared by the world and every system.
pub mod rules {
    use std::time::Duration;

    use super::EnemyStats;

    /// Width of the playing field in world units.
    pub const FIELD_WIDTH: f32 = 800.0;
    /// Height of the playing field in world units.
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Thickness of the barrier band drawn along the bottom edge.
    pub const BARRIER_THICKNESS: f32 = 30.0;

    /// Horizontal extent of an enemy measured from its position.
    pub const ENEMY_WIDTH: f32 = 30.0;
    /// Vertical extent of an enemy measured from its position.
    pub const ENEMY_HEIGHT: f32 = 50.0;
    /// Stats assigned to every freshly spawned enemy.
    pub const ENEMY_BASE_STATS: EnemyStats = EnemyStats::new(2.0, 10.0, 20.0);
    /// Highest vertical spawn position (inclusive), above the visible field.
    pub const SPAWN_BAND_TOP: f32 = -200.0;
    /// Lowest vertical spawn position (exclusive), above the visible field.
    pub const SPAWN_BAND_BOTTOM: f32 = -50.0;
    /// Probability that a single frame spawns an enemy.
    pub const SPAWN_PROBABILITY: f64 = 0.02;

    /// Distance travelled by a projectile on every frame.
    pub const PROJECTILE_SPEED: f32 = 5.0;
    /// Radius used when drawing projectiles.
    pub const PROJECTILE_RADIUS: f32 = 3.0;
    /// Health removed from an enemy by a single projectile hit.
    pub const HIT_DAMAGE: f32 = 10.0;

    /// Barrier health at the start of a session.
    pub const BARRIER_HEALTH: f32 = 500.0;
    /// Barrier health restored for every kill.
    pub const KILL_HEAL: f32 = 1.0;
    /// Score awarded per kill outside the special state.
    pub const KILL_SCORE: u32 = 1;
    /// Score awarded per kill while the special state is active.
    pub const SPECIAL_KILL_SCORE: u32 = 15;
    /// Score that ends the session in victory.
    pub const VICTORY_SCORE: u32 = 500;

    /// Cadence of the automatic fire-control timer.
    pub const FIRE_INTERVAL: Duration = Duration::from_millis(200);
    /// Number of projectiles released by an area volley.
    pub const VOLLEY_SIZE: u32 = 10;
    /// Cooldown applied after an area volley.
    pub const VOLLEY_COOLDOWN: Duration = Duration::from_secs(5);
    /// Cooldown removed on every render frame, assuming a nominal 60 Hz display.
    pub const VOLLEY_COOLDOWN_STEP: Duration = Duration::from_nanos(16_666_667);
    /// Distance the lane origins move for a single shift input.
    pub const LANE_SHIFT_STEP: f32 = 20.0;

    /// Score distance between successive firing-lane unlocks.
    pub const LANE_SCORE_STEP: u32 = 10;
    /// Score that must be exceeded before power creep starts.
    pub const POWER_CREEP_SCORE: u32 = 40;
    /// Minimum time between two power creep applications.
    pub const POWER_CREEP_INTERVAL: Duration = Duration::from_millis(2_000);
    /// Damage added to every live enemy by power creep.
    pub const POWER_CREEP_DAMAGE: f32 = 1.0;
    /// Speed multiplier applied to every live enemy by power creep.
    pub const POWER_CREEP_SPEED_FACTOR: f32 = 1.001;
    /// Minimum time between two attrition hardening applications.
    pub const HARDENING_INTERVAL: Duration = Duration::from_millis(20_000);
    /// Health added to every live enemy by attrition hardening.
    pub const HARDENING_HEALTH: f32 = 5.0;

    /// Whole elapsed second at which the special state begins.
    pub const SPECIAL_STATE_TRIGGER_SECONDS: u64 = 150;
    /// Length of the special state window.
    pub const SPECIAL_STATE_DURATION: Duration = Duration::from_secs(30);
    /// Health multiplier applied at special state activation.
    pub const SPECIAL_HEALTH_FACTOR: f32 = 10.0;
    /// Speed multiplier applied at special state activation.
    pub const SPECIAL_SPEED_FACTOR: f32 = 6.0;
    /// Damage multiplier applied at special state activation.
    pub const SPECIAL_DAMAGE_FACTOR: f32 = 3.5;

    /// Lifetime of a floating damage label.
    pub const LABEL_DURATION: Duration = Duration::from_millis(1_000);
    /// Upward drift applied to a floating damage label on every update.
    pub const LABEL_DRIFT: f32 = 1.0;
    /// Horizontal distance between the right field edge and barrier labels.
    pub const BARRIER_LABEL_INSET: f32 = 50.0;
    /// Vertical distance between the barrier top and barrier labels.
    pub const BARRIER_LABEL_DROP: f32 = 20.0;
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the session clock by one render frame.
    Tick {
        /// Wall-clock time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Requests that a new enemy enter the field.
    SpawnEnemy {
        /// Upper-left corner of the enemy footprint.
        position: WorldPoint,
        /// Stats assigned to the enemy.
        stats: EnemyStats,
    },
    /// Requests that a projectile be launched from a firing lane.
    FireProjectile {
        /// Point the projectile starts from.
        origin: WorldPoint,
        /// Unit direction of travel.
        heading: Heading,
    },
    /// Requests the cooldown-gated area volley.
    FireVolley,
    /// Moves the lane origins sideways.
    ShiftLanes {
        /// Direction of the shift.
        shift: LaneShift,
    },
    /// Unlocks one additional firing lane.
    AddFiringLane,
    /// Permanently strengthens every live enemy.
    EmpowerEnemies {
        /// Damage added to each enemy.
        damage_bonus: f32,
        /// Multiplier applied to each enemy's speed.
        speed_factor: f32,
    },
    /// Permanently adds health to every live enemy.
    FortifyEnemies {
        /// Health added to each enemy.
        health_bonus: f32,
    },
    /// Activates the special state window.
    BeginSpecialState,
    /// Deactivates the special state window and restores snapshotted stats.
    EndSpecialState,
    /// Moves every entity by one frame and resolves hits and breaches.
    AdvanceEntities,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Wall-clock time consumed by the frame.
        dt: Duration,
        /// Session clock after the frame was applied.
        clock: Duration,
    },
    /// Confirms that an enemy entered the field.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Upper-left corner of the enemy footprint.
        position: WorldPoint,
    },
    /// Confirms that a projectile was launched.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Point the projectile starts from.
        origin: WorldPoint,
        /// Unit direction of travel.
        heading: Heading,
    },
    /// Confirms that the area volley was released.
    VolleyFired {
        /// Number of projectiles created by the volley.
        projectiles: u32,
    },
    /// Reports that an area volley request arrived during its cooldown.
    VolleyRejected {
        /// Cooldown left before the volley is available.
        remaining: Duration,
    },
    /// Confirms that the lane origins moved.
    LanesShifted {
        /// Lateral offset applied to every lane origin.
        offset: f32,
    },
    /// Confirms that a firing lane was unlocked.
    FiringLanesIncreased {
        /// Number of firing lanes after the unlock.
        lanes: u32,
    },
    /// Confirms that power creep was applied.
    EnemiesEmpowered {
        /// Number of live enemies that were strengthened.
        affected: u32,
    },
    /// Confirms that attrition hardening was applied.
    EnemiesFortified {
        /// Number of live enemies that gained health.
        affected: u32,
    },
    /// Announces that the special state began.
    SpecialStateStarted {
        /// Number of enemies captured in the stat snapshot.
        affected: u32,
    },
    /// Announces that the special state ended.
    SpecialStateEnded {
        /// Number of enemies whose stats were restored.
        restored: u32,
    },
    /// Reports that a projectile hit an enemy.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Projectile that landed the hit.
        projectile: ProjectileId,
        /// Health left after the hit.
        remaining_health: f32,
    },
    /// Reports that an enemy was destroyed by a projectile.
    EnemyKilled {
        /// Enemy that was destroyed.
        enemy: EnemyId,
        /// Score awarded for the kill.
        awarded: u32,
        /// Session score after the kill.
        score: u32,
        /// Barrier health after the heal-on-kill.
        barrier_health: f32,
    },
    /// Reports that an enemy reached the barrier.
    BarrierBreached {
        /// Enemy that breached the barrier.
        enemy: EnemyId,
        /// Damage dealt to the barrier.
        damage: f32,
        /// Barrier health after the breach.
        barrier_health: f32,
    },
    /// Announces the terminal outcome of the session.
    GameEnded {
        /// Final outcome, score and elapsed time.
        summary: GameSummary,
    },
}

/// Discrete player inputs delivered by the keyboard source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    /// Release the area volley (space).
    FireVolley,
    /// Shift the firing lanes left (`a`).
    ShiftLeft,
    /// Shift the firing lanes right (`d`).
    ShiftRight,
}

impl PlayerAction {
    /// Translates the action into the world command it requests.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::FireVolley => Command::FireVolley,
            Self::ShiftLeft => Command::ShiftLanes {
                shift: LaneShift::Left,
            },
            Self::ShiftRight => Command::ShiftLanes {
                shift: LaneShift::Right,
            },
        }
    }
}

/// Direction of a lateral lane shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LaneShift {
    /// Toward decreasing x.
    Left,
    /// Toward increasing x.
    Right,
}

impl LaneShift {
    /// Signed offset delta produced by the shift.
    #[must_use]
    pub fn delta(self) -> f32 {
        match self {
            Self::Left => -rules::LANE_SHIFT_STEP,
            Self::Right => rules::LANE_SHIFT_STEP,
        }
    }
}

/// Unique identifier assigned to an enemy when it spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile when it is fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a floating damage label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(u32);

impl LabelId {
    /// Creates a new label identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Point in field coordinates; y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns the point translated by the provided deltas.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Center of an enemy footprint anchored at this point.
    #[must_use]
    pub fn enemy_center(self) -> Self {
        self.offset(rules::ENEMY_WIDTH / 2.0, rules::ENEMY_HEIGHT / 2.0)
    }

    /// Reports whether the point lies strictly inside an enemy footprint anchored at `origin`.
    #[must_use]
    pub fn is_inside_enemy(self, origin: WorldPoint) -> bool {
        self.x > origin.x
            && self.x < origin.x + rules::ENEMY_WIDTH
            && self.y > origin.y
            && self.y < origin.y + rules::ENEMY_HEIGHT
    }
}

/// Unit direction of travel for a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    dx: f32,
    dy: f32,
}

impl Heading {
    /// Straight up the field.
    pub const UP: Self = Self { dx: 0.0, dy: -1.0 };

    /// Normalized direction from `from` toward `to`.
    ///
    /// Returns `None` when both points coincide.
    #[must_use]
    pub fn toward(from: WorldPoint, to: WorldPoint) -> Option<Self> {
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return None;
        }

        Some(Self {
            dx: dx / length,
            dy: dy / length,
        })
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(&self) -> f32 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(&self) -> f32 {
        self.dy
    }
}

/// Dimensions of the playing field and its barrier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    width: f32,
    height: f32,
    barrier_thickness: f32,
}

impl Field {
    /// The field every session is played on.
    pub const STANDARD: Self = Self::new(
        rules::FIELD_WIDTH,
        rules::FIELD_HEIGHT,
        rules::BARRIER_THICKNESS,
    );

    /// Creates a new field description.
    #[must_use]
    pub const fn new(width: f32, height: f32, barrier_thickness: f32) -> Self {
        Self {
            width,
            height,
            barrier_thickness,
        }
    }

    /// Width of the field.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the field.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Thickness of the barrier band.
    #[must_use]
    pub const fn barrier_thickness(&self) -> f32 {
        self.barrier_thickness
    }

    /// Vertical coordinate of the barrier's top edge.
    ///
    /// Firing lanes originate on this line and enemies breach once their
    /// lower edge passes it.
    #[must_use]
    pub fn barrier_top(&self) -> f32 {
        self.height - self.barrier_thickness
    }

    /// Exclusive upper bound for the horizontal spawn position.
    #[must_use]
    pub fn spawn_span(&self) -> f32 {
        (self.width - rules::ENEMY_WIDTH).max(0.0)
    }

    /// Origin of firing lane `lane` when `lanes` lanes are active.
    ///
    /// Lanes are spread evenly across the width, moved by `offset` and then
    /// clamped to the field so a large offset never places a lane outside it.
    #[must_use]
    pub fn lane_origin(&self, lane: u32, lanes: u32, offset: f32) -> WorldPoint {
        let spacing = self.width / (lanes as f32 + 1.0);
        let x = (spacing * (lane as f32 + 1.0) + offset).clamp(0.0, self.width);
        WorldPoint::new(x, self.barrier_top())
    }

    /// Launch points of the area volley, evenly spaced across the width.
    pub fn volley_origins(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        let spacing = self.width / (rules::VOLLEY_SIZE as f32 + 1.0);
        (1..=rules::VOLLEY_SIZE)
            .map(move |slot| WorldPoint::new(slot as f32 * spacing, self.barrier_top()))
    }

    /// Reports whether a projectile at `point` is still in flight.
    ///
    /// Projectiles leave through the top or the sides; the bottom edge is open.
    #[must_use]
    pub fn retains_projectile(&self, point: WorldPoint) -> bool {
        point.x() >= 0.0 && point.x() <= self.width && point.y() >= 0.0
    }

    /// Reports whether an enemy anchored at `position` has breached the barrier.
    #[must_use]
    pub fn is_breached_by(&self, position: WorldPoint) -> bool {
        position.y() + rules::ENEMY_HEIGHT > self.barrier_top()
    }

    /// Anchor point for labels reporting barrier damage.
    #[must_use]
    pub fn barrier_label_anchor(&self) -> WorldPoint {
        WorldPoint::new(
            self.width - rules::BARRIER_LABEL_INSET,
            self.barrier_top() + rules::BARRIER_LABEL_DROP,
        )
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Mutable combat stats carried by an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Vertical distance travelled on every frame.
    pub speed: f32,
    /// Barrier damage dealt on breach.
    pub damage: f32,
    /// Remaining hit points.
    pub health: f32,
}

impl EnemyStats {
    /// Stats assigned to every freshly spawned enemy.
    pub const BASE: Self = rules::ENEMY_BASE_STATS;

    /// Creates a new stat block.
    #[must_use]
    pub const fn new(speed: f32, damage: f32, health: f32) -> Self {
        Self {
            speed,
            damage,
            health,
        }
    }

    /// Stats amplified by the special state multipliers.
    #[must_use]
    pub fn amplified(self) -> Self {
        Self {
            speed: self.speed * rules::SPECIAL_SPEED_FACTOR,
            damage: self.damage * rules::SPECIAL_DAMAGE_FACTOR,
            health: self.health * rules::SPECIAL_HEALTH_FACTOR,
        }
    }
}

/// Styling applied to a floating damage label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelStyle {
    /// Damage dealt to the barrier.
    Barrier,
    /// Damage dealt to an enemy.
    Enemy,
}

/// Terminal outcome of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The score reached the victory threshold.
    Victory,
    /// The barrier health dropped to zero or below.
    Defeat,
}

/// Final report presented when a session ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSummary {
    /// Whether the session was won or lost.
    pub outcome: GameOutcome,
    /// Score at the moment the session ended.
    pub score: u32,
    /// Whole seconds elapsed since the session started.
    pub elapsed_seconds: u64,
}

impl GameSummary {
    /// Elapsed time formatted as `MM:SS`.
    #[must_use]
    pub fn elapsed_label(&self) -> String {
        format_time(self.elapsed_seconds)
    }
}

/// Formats whole seconds as zero-padded `MM:SS`.
#[must_use]
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier assigned at spawn.
    pub id: EnemyId,
    /// Upper-left corner of the enemy footprint.
    pub position: WorldPoint,
    /// Current combat stats.
    pub stats: EnemyStats,
}

impl EnemySnapshot {
    /// Center of the enemy footprint, used for targeting.
    #[must_use]
    pub fn center(&self) -> WorldPoint {
        self.position.enemy_center()
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned when the projectile was fired.
    pub id: ProjectileId,
    /// Current center of the projectile.
    pub position: WorldPoint,
    /// Unit direction of travel.
    pub heading: Heading,
}

/// Immutable representation of a floating damage label used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelSnapshot {
    /// Identifier assigned when the label was created.
    pub id: LabelId,
    /// Baseline position of the text.
    pub position: WorldPoint,
    /// Signed damage value; negative for barrier damage.
    pub value: f32,
    /// Opacity in the range `0.0..=1.0`.
    pub opacity: f32,
    /// Styling to apply when drawing.
    pub style: LabelStyle,
}

/// Session-wide counters and timers exposed to systems and adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSnapshot {
    /// Field the session is played on.
    pub field: Field,
    /// Time elapsed since the session started.
    pub clock: Duration,
    /// Cumulative score.
    pub score: u32,
    /// Remaining barrier health.
    pub barrier_health: f32,
    /// Number of simultaneous firing lanes.
    pub firing_lanes: u32,
    /// Lateral offset applied to lane origins.
    pub lane_offset: f32,
    /// Cooldown left before the area volley is available.
    pub volley_cooldown: Duration,
    /// Clock value at which the active special state began, if any.
    pub special_state_since: Option<Duration>,
    /// Terminal summary once the session has ended.
    pub outcome: Option<GameSummary>,
}

impl SessionSnapshot {
    /// Whole seconds elapsed since the session started.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.as_secs()
    }

    /// Reports whether the session has reached a terminal outcome.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}
