//! Collision and damage resolution for a single frame.
//!
//! Enemies and projectiles are walked back to front so removals never shift
//! an element that still has to be visited.

use rampart_core::{rules, EnemyId, Event, GameOutcome, LabelStyle};

use crate::{
    entities::{Advance, Enemy},
    World,
};

/// Advances every entity by one frame and resolves breaches and hits.
pub(crate) fn resolve_frame(world: &mut World, out_events: &mut Vec<Event>) {
    advance_projectiles(world);
    resolve_enemies(world, out_events);
    advance_labels(world);
}

fn advance_projectiles(world: &mut World) {
    let clock = world.clock;
    let field = world.field;
    for projectile in &mut world.projectiles {
        projectile.advance(clock);
    }
    world
        .projectiles
        .retain(|projectile| field.retains_projectile(projectile.position));
}

fn resolve_enemies(world: &mut World, out_events: &mut Vec<Event>) {
    let clock = world.clock;
    let mut index = world.enemies.len();
    while index > 0 && world.outcome.is_none() {
        index -= 1;
        world.enemies[index].advance(clock);

        if world.field.is_breached_by(world.enemies[index].position) {
            let enemy = world.enemies.remove(index);
            breach(world, &enemy, out_events);
            continue;
        }

        resolve_hits(world, index, out_events);
    }
}

fn breach(world: &mut World, enemy: &Enemy, out_events: &mut Vec<Event>) {
    let damage = enemy.stats.damage;
    world.barrier_health -= damage;
    let anchor = world.field.barrier_label_anchor();
    world.spawn_label(anchor, -damage, LabelStyle::Barrier);
    log::debug!(
        "enemy {} breached the barrier for {damage}, barrier at {}",
        enemy.id.get(),
        world.barrier_health
    );
    out_events.push(Event::BarrierBreached {
        enemy: enemy.id,
        damage,
        barrier_health: world.barrier_health,
    });

    if world.barrier_health <= 0.0 {
        world.latch_outcome(GameOutcome::Defeat, out_events);
    }
}

fn resolve_hits(world: &mut World, enemy_index: usize, out_events: &mut Vec<Event>) {
    let mut projectile_index = world.projectiles.len();
    while projectile_index > 0 {
        projectile_index -= 1;
        let origin = world.enemies[enemy_index].position;
        if !world.projectiles[projectile_index]
            .position
            .is_inside_enemy(origin)
        {
            continue;
        }

        let projectile = world.projectiles[projectile_index].id;
        let enemy = &mut world.enemies[enemy_index];
        enemy.stats.health -= rules::HIT_DAMAGE;
        let enemy_id = enemy.id;
        let remaining_health = enemy.stats.health;
        let center = enemy.position.enemy_center();

        world.spawn_label(center, rules::HIT_DAMAGE, LabelStyle::Enemy);
        out_events.push(Event::EnemyDamaged {
            enemy: enemy_id,
            projectile,
            remaining_health,
        });

        // Only a killing hit spends the projectile.
        if remaining_health <= 0.0 {
            let _ = world.projectiles.remove(projectile_index);
            let _ = world.enemies.remove(enemy_index);
            record_kill(world, enemy_id, out_events);
            break;
        }
    }
}

fn record_kill(world: &mut World, enemy: EnemyId, out_events: &mut Vec<Event>) {
    let awarded = if world.special_state.is_some() {
        rules::SPECIAL_KILL_SCORE
    } else {
        rules::KILL_SCORE
    };
    world.score = world.score.saturating_add(awarded);
    world.barrier_health += rules::KILL_HEAL;
    out_events.push(Event::EnemyKilled {
        enemy,
        awarded,
        score: world.score,
        barrier_health: world.barrier_health,
    });

    if world.score >= rules::VICTORY_SCORE {
        world.latch_outcome(GameOutcome::Victory, out_events);
    }
}

fn advance_labels(world: &mut World) {
    let clock = world.clock;
    for label in &mut world.labels {
        label.advance(clock);
    }
    world.labels.retain(|label| label.is_visible());
}
