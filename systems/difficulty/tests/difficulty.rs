use std::time::Duration;

use proptest::prelude::*;
use rampart_core::{
    rules, Command, EnemyStats, GameOutcome, GameSummary, SessionSnapshot, WorldPoint,
};
use rampart_system_difficulty::Difficulty;
use rampart_world::{self as world, query, World};

fn session_at(clock: Duration, score: u32) -> SessionSnapshot {
    let mut session = query::session(&World::new());
    session.clock = clock;
    session.score = score;
    session
}

fn run(difficulty: &mut Difficulty, session: &SessionSnapshot) -> Vec<Command> {
    let mut out = Vec::new();
    difficulty.handle(session, &mut out);
    out
}

fn empowered(commands: &[Command]) -> bool {
    commands
        .iter()
        .any(|command| matches!(command, Command::EmpowerEnemies { .. }))
}

fn fortified(commands: &[Command]) -> bool {
    commands
        .iter()
        .any(|command| matches!(command, Command::FortifyEnemies { .. }))
}

#[test]
fn power_creep_waits_for_score_and_interval() {
    let mut difficulty = Difficulty::default();

    assert!(!empowered(&run(&mut difficulty, &session_at(Duration::from_secs(5), 40))));
    let commands = run(&mut difficulty, &session_at(Duration::from_secs(5), 41));
    assert!(commands.contains(&Command::EmpowerEnemies {
        damage_bonus: rules::POWER_CREEP_DAMAGE,
        speed_factor: rules::POWER_CREEP_SPEED_FACTOR,
    }));

    assert!(!empowered(&run(
        &mut difficulty,
        &session_at(Duration::from_millis(6_999), 41)
    )));
    assert!(empowered(&run(
        &mut difficulty,
        &session_at(Duration::from_millis(7_000), 41)
    )));
}

#[test]
fn attrition_hardening_runs_every_twenty_seconds_regardless_of_score() {
    let mut difficulty = Difficulty::default();

    assert!(!fortified(&run(
        &mut difficulty,
        &session_at(Duration::from_millis(19_999), 0)
    )));
    assert!(fortified(&run(
        &mut difficulty,
        &session_at(Duration::from_millis(20_000), 0)
    )));
    assert!(!fortified(&run(
        &mut difficulty,
        &session_at(Duration::from_millis(39_000), 0)
    )));
    assert!(fortified(&run(
        &mut difficulty,
        &session_at(Duration::from_millis(40_500), 0)
    )));
}

#[test]
fn finished_session_emits_nothing() {
    let mut difficulty = Difficulty::default();
    let mut session = session_at(Duration::from_secs(150), 90);
    session.outcome = Some(GameSummary {
        outcome: GameOutcome::Victory,
        score: 90,
        elapsed_seconds: 150,
    });

    assert!(run(&mut difficulty, &session).is_empty());
}

#[test]
fn special_state_starts_once_and_restores_after_its_window() {
    let mut world = World::new();
    let mut difficulty = Difficulty::default();
    let stats = EnemyStats::new(0.0, 10.0, 20.0);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(149_500),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            position: WorldPoint::new(100.0, 100.0),
            stats,
        },
        &mut events,
    );

    let mut begins = 0;
    let mut ends = 0;
    let mut amplified_seen = false;
    for _ in 0..70 {
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );
        let session = query::session(&world);
        let commands = run(&mut difficulty, &session);
        for command in commands {
            match command {
                Command::BeginSpecialState => begins += 1,
                Command::EndSpecialState => ends += 1,
                _ => {}
            }
            world::apply(&mut world, command, &mut events);
        }

        let enemy = query::enemy_view(&world).into_vec()[0];
        if query::session(&world).special_state_since.is_some() {
            amplified_seen = true;
            assert!(enemy.stats.health >= stats.health * rules::SPECIAL_HEALTH_FACTOR);
        }
    }

    assert_eq!(begins, 1);
    assert_eq!(ends, 1);
    assert!(amplified_seen);
    let enemy = query::enemy_view(&world).into_vec()[0];
    assert_eq!(enemy.stats.speed, stats.speed);
    assert_eq!(enemy.stats.damage, stats.damage);
    assert!(query::session(&world).special_state_since.is_none());
}

#[test]
fn special_state_is_skipped_when_second_150_is_never_observed() {
    let mut difficulty = Difficulty::default();

    assert!(run(&mut difficulty, &session_at(Duration::from_millis(149_900), 0))
        .iter()
        .all(|command| *command != Command::BeginSpecialState));
    assert!(run(&mut difficulty, &session_at(Duration::from_millis(151_100), 0))
        .iter()
        .all(|command| *command != Command::BeginSpecialState));
}

#[test]
fn lane_checkpoint_snaps_to_the_multiple_of_ten_below_the_score() {
    let mut difficulty = Difficulty::default();
    let lanes_added = |commands: Vec<Command>| {
        commands
            .into_iter()
            .filter(|command| *command == Command::AddFiringLane)
            .count()
    };

    assert_eq!(lanes_added(run(&mut difficulty, &session_at(Duration::ZERO, 15))), 1);
    assert_eq!(lanes_added(run(&mut difficulty, &session_at(Duration::ZERO, 19))), 0);
    assert_eq!(lanes_added(run(&mut difficulty, &session_at(Duration::ZERO, 20))), 1);
    assert_eq!(lanes_added(run(&mut difficulty, &session_at(Duration::ZERO, 30))), 1);
    assert_eq!(lanes_added(run(&mut difficulty, &session_at(Duration::ZERO, 30))), 0);
}

proptest! {
    #[test]
    fn lane_count_tracks_score_monotonically(deltas in prop::collection::vec(0u32..=15, 0..200)) {
        let step = rules::LANE_SCORE_STEP;
        let mut difficulty = Difficulty::default();
        let mut score = 0u32;
        let mut checkpoint = 0u32;
        let mut lanes = 1u32;

        let mut frame = |score: u32, lanes: &mut u32| {
            let before = *lanes;
            let commands = run(&mut difficulty, &session_at(Duration::ZERO, score));
            *lanes += commands
                .iter()
                .filter(|command| **command == Command::AddFiringLane)
                .count() as u32;
            (before, *lanes)
        };

        for delta in deltas {
            score += delta;
            let expected = u32::from(score >= checkpoint + step);
            if expected == 1 {
                checkpoint = score / step * step;
            }

            let (before, after) = frame(score, &mut lanes);
            prop_assert_eq!(after - before, expected);
            prop_assert!(after <= 1 + score / step);
        }

        let settled = lanes;
        let _ = frame(score, &mut lanes);
        prop_assert_eq!(lanes, settled);
    }
}
