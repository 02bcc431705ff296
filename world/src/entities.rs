//! Entities owned by the world and their per-frame update contract.

use std::time::Duration;

use rampart_core::{
    rules, EnemyId, EnemySnapshot, EnemyStats, Heading, LabelId, LabelSnapshot, LabelStyle,
    ProjectileId, ProjectileSnapshot, WorldPoint,
};

/// Per-frame update shared by every entity the world owns.
pub(crate) trait Advance {
    /// Moves the entity forward by one frame given the current session clock.
    fn advance(&mut self, clock: Duration);
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) position: WorldPoint,
    pub(crate) stats: EnemyStats,
}

impl Enemy {
    pub(crate) fn new(id: EnemyId, position: WorldPoint, stats: EnemyStats) -> Self {
        Self {
            id,
            position,
            stats,
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            stats: self.stats,
        }
    }
}

impl Advance for Enemy {
    fn advance(&mut self, _clock: Duration) {
        self.position = self.position.offset(0.0, self.stats.speed);
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) position: WorldPoint,
    heading: Heading,
}

impl Projectile {
    pub(crate) fn new(id: ProjectileId, origin: WorldPoint, heading: Heading) -> Self {
        Self {
            id,
            position: origin,
            heading,
        }
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            heading: self.heading,
        }
    }
}

impl Advance for Projectile {
    fn advance(&mut self, _clock: Duration) {
        self.position = self.position.offset(
            self.heading.dx() * rules::PROJECTILE_SPEED,
            self.heading.dy() * rules::PROJECTILE_SPEED,
        );
    }
}

/// Floating text reporting a damage value; fades out over its lifetime.
#[derive(Clone, Debug)]
pub(crate) struct DamageLabel {
    id: LabelId,
    position: WorldPoint,
    value: f32,
    style: LabelStyle,
    created_at: Duration,
    opacity: f32,
}

impl DamageLabel {
    pub(crate) fn new(
        id: LabelId,
        position: WorldPoint,
        value: f32,
        style: LabelStyle,
        created_at: Duration,
    ) -> Self {
        Self {
            id,
            position,
            value,
            style,
            created_at,
            opacity: 1.0,
        }
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    pub(crate) fn snapshot(&self) -> LabelSnapshot {
        LabelSnapshot {
            id: self.id,
            position: self.position,
            value: self.value,
            opacity: self.opacity,
            style: self.style,
        }
    }
}

impl Advance for DamageLabel {
    fn advance(&mut self, clock: Duration) {
        let age = clock.saturating_sub(self.created_at);
        if age < rules::LABEL_DURATION {
            self.opacity = 1.0 - age.as_secs_f32() / rules::LABEL_DURATION.as_secs_f32();
            self.position = self.position.offset(0.0, -rules::LABEL_DRIFT);
        } else {
            self.opacity = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_descends_by_its_speed() {
        let mut enemy = Enemy::new(
            EnemyId::new(0),
            WorldPoint::new(10.0, -100.0),
            EnemyStats::new(3.5, 10.0, 20.0),
        );
        enemy.advance(Duration::ZERO);
        assert_eq!(enemy.position, WorldPoint::new(10.0, -96.5));
    }

    #[test]
    fn projectile_moves_along_heading() {
        let mut projectile = Projectile::new(
            ProjectileId::new(0),
            WorldPoint::new(400.0, 570.0),
            Heading::UP,
        );
        projectile.advance(Duration::ZERO);
        assert_eq!(projectile.position, WorldPoint::new(400.0, 565.0));
    }

    #[test]
    fn label_fades_linearly_and_drifts_up() {
        let mut label = DamageLabel::new(
            LabelId::new(0),
            WorldPoint::new(50.0, 50.0),
            10.0,
            LabelStyle::Enemy,
            Duration::from_millis(1_000),
        );

        label.advance(Duration::from_millis(1_250));
        let snapshot = label.snapshot();
        assert!((snapshot.opacity - 0.75).abs() < 1e-6);
        assert_eq!(snapshot.position, WorldPoint::new(50.0, 49.0));
        assert!(label.is_visible());

        label.advance(Duration::from_millis(2_000));
        assert_eq!(label.snapshot().opacity, 0.0);
        assert_eq!(label.snapshot().position, WorldPoint::new(50.0, 49.0));
        assert!(!label.is_visible());
    }
}
