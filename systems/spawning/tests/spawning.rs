use std::time::Duration;

use rampart_core::{rules, Command, EnemyStats, Event, Field};
use rampart_system_spawning::{Config, Spawning};
use rampart_world::{self as world, query, World};

fn frames(count: usize) -> Vec<Event> {
    (0..count)
        .map(|index| Event::TimeAdvanced {
            dt: Duration::from_millis(16),
            clock: Duration::from_millis(16 * (index as u64 + 1)),
        })
        .collect()
}

#[test]
fn certain_spawn_emits_one_command_per_frame() {
    let mut spawning = Spawning::new(Config::new(1.0, 0x1234_5678));
    let mut commands = Vec::new();

    spawning.handle(&frames(5), &Field::STANDARD, &mut commands);

    assert_eq!(commands.len(), 5);
    for command in &commands {
        match command {
            Command::SpawnEnemy { stats, .. } => assert_eq!(*stats, EnemyStats::BASE),
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn zero_probability_never_spawns() {
    let mut spawning = Spawning::new(Config::new(0.0, 0x1234_5678));
    let mut commands = Vec::new();

    spawning.handle(&frames(1_000), &Field::STANDARD, &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn spawn_positions_stay_within_the_band() {
    let field = Field::STANDARD;
    let mut spawning = Spawning::new(Config::new(1.0, 0xdead_beef));
    let mut commands = Vec::new();

    spawning.handle(&frames(500), &field, &mut commands);

    for command in commands {
        let position = match command {
            Command::SpawnEnemy { position, .. } => position,
            other => panic!("unexpected command emitted: {other:?}"),
        };
        assert!(position.x() >= 0.0 && position.x() < field.width() - rules::ENEMY_WIDTH);
        assert!(position.y() >= rules::SPAWN_BAND_TOP && position.y() < rules::SPAWN_BAND_BOTTOM);
    }
}

#[test]
fn ignores_events_other_than_time() {
    let mut spawning = Spawning::new(Config::new(1.0, 3));
    let mut commands = Vec::new();

    spawning.handle(
        &[Event::VolleyFired { projectiles: 10 }],
        &Field::STANDARD,
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn standard_probability_spawns_roughly_once_every_fifty_frames() {
    let mut spawning = Spawning::new(Config::with_seed(42));
    let mut commands = Vec::new();

    spawning.handle(&frames(10_000), &Field::STANDARD, &mut commands);

    assert!((120..=280).contains(&commands.len()), "{} spawns", commands.len());
}

#[test]
fn same_seed_reproduces_the_same_session() {
    let run = |seed| {
        let mut world = World::new();
        let mut spawning = Spawning::new(Config::new(0.5, seed));
        for _ in 0..200 {
            let mut events = Vec::new();
            world::apply(
                &mut world,
                Command::Tick {
                    dt: Duration::from_millis(16),
                },
                &mut events,
            );
            let mut commands = Vec::new();
            spawning.handle(&events, &query::field(&world), &mut commands);
            for command in commands {
                world::apply(&mut world, command, &mut events);
            }
        }
        query::enemy_view(&world).into_vec()
    };

    let first = run(99);
    let second = run(99);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}
