use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use image_slider::{
    Direction, Engine, EngineConfig, Gesture, Move, Pace, PieceId, Puzzle, Scrambler,
};

fn quiet_engine(width: usize, height: usize) -> Engine {
    let config = EngineConfig {
        scramble_on_start: false,
        ..EngineConfig::immediate()
    };
    Engine::new(Puzzle::new(width, height).unwrap(), config)
}

fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn three_by_two_right_move_and_back() {
    let engine = quiet_engine(3, 2);
    let mv = Move::new(Direction::Right, 1, 1, 1);

    engine.play(mv, Pace::Animated).unwrap();
    let puzzle = engine.puzzle();
    assert_eq!(puzzle.empty_cell(), (1, 1));
    assert_eq!(
        puzzle.piece_at(2, 1).unwrap().map(|piece| piece.id()),
        Some(PieceId::new(1, 1))
    );
    assert_eq!(engine.history_len(), 1);

    assert_eq!(engine.solve(Pace::Animated), 1);
    let puzzle = engine.puzzle();
    assert_eq!(puzzle.empty_cell(), (2, 1));
    assert_eq!(
        puzzle.piece_at(1, 1).unwrap().map(|piece| piece.id()),
        Some(PieceId::new(1, 1))
    );
    assert_eq!(engine.history_len(), 0);
}

#[test]
fn reset_after_mixed_play_restores_identity() {
    let engine = quiet_engine(5, 4);
    engine.play(Move::new(Direction::Right, 3, 0, 4), Pace::Instant).unwrap();
    engine.play(Move::new(Direction::Down, 0, 0, 3), Pace::Instant).unwrap();
    engine.clear();
    engine.play(Move::new(Direction::Left, 0, 1, 4), Pace::Instant).unwrap();
    assert!(!engine.puzzle().is_solved());

    engine.reset();
    let puzzle = engine.puzzle();
    assert!(puzzle.is_solved());
    assert!(puzzle.pieces().all(|piece| piece.is_home()));
    assert_eq!(engine.history_len(), 0);
}

#[test]
fn scramble_then_solve_with_the_background_thread() {
    let config = EngineConfig {
        scramble_limit: 120,
        ..EngineConfig::immediate()
    };
    let engine = Arc::new(Engine::new(Puzzle::new(6, 5).unwrap(), config));
    let scrambler = Scrambler::spawn(Arc::clone(&engine), Some(42));

    assert!(wait_until(|| !scrambler.is_enabled()));
    assert_eq!(engine.history_len(), 120);
    assert!(!engine.puzzle().is_solved());

    assert_eq!(engine.solve(Pace::Instant), 120);
    assert!(engine.puzzle().is_solved());
    assert_eq!(engine.history_len(), 0);
}

#[test]
fn solve_switches_scrambling_off() {
    let config = EngineConfig {
        scramble_limit: usize::MAX,
        scramble_delay: Duration::from_millis(1),
        ..EngineConfig::immediate()
    };
    let engine = Arc::new(Engine::new(Puzzle::new(4, 4).unwrap(), config));
    let scrambler = Scrambler::spawn(Arc::clone(&engine), Some(1));

    assert!(wait_until(|| engine.history_len() >= 20));
    engine.solve(Pace::Instant);
    assert!(!scrambler.is_enabled());
    assert!(engine.puzzle().is_solved());
    assert_eq!(engine.history_len(), 0);
}

#[test]
fn gestures_and_scrambles_interleave_safely() {
    let config = EngineConfig {
        scramble_limit: 300,
        ..EngineConfig::immediate()
    };
    let engine = Arc::new(Engine::new(Puzzle::new(5, 5).unwrap(), config));
    let scrambler = Scrambler::spawn(Arc::clone(&engine), Some(7));

    let players: Vec<_> = (0..3)
        .map(|player| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..60u32 {
                    let press = (
                        f64::from((i + player) % 5) * 10.0 + 5.0,
                        f64::from(i % 5) * 10.0 + 5.0,
                    );
                    let release = match i % 4 {
                        0 => (press.0 + 20.0, press.1),
                        1 => (press.0, press.1 - 20.0),
                        2 => (press.0 - 20.0, press.1),
                        _ => (press.0, press.1 + 20.0),
                    };
                    let _ = engine.play_gesture(
                        Gesture::new(press, release),
                        (10.0, 10.0),
                        Pace::Instant,
                    );
                }
            })
        })
        .collect();
    for player in players {
        player.join().unwrap();
    }
    assert!(wait_until(|| !scrambler.is_enabled()));
    drop(scrambler);

    engine.puzzle().verify().unwrap();
    engine.solve(Pace::Instant);
    assert!(engine.puzzle().is_solved());
}

#[test]
fn reset_cuts_a_slow_solve_short() {
    let config = EngineConfig {
        scramble_on_start: false,
        frame_interval: Duration::from_millis(20),
        ..EngineConfig::immediate()
    };
    let engine = Arc::new(Engine::new(Puzzle::new(4, 4).unwrap(), config));
    for direction in [Direction::Right, Direction::Down, Direction::Right, Direction::Down] {
        engine.nudge(direction, Pace::Instant).unwrap();
    }
    assert_eq!(engine.history_len(), 4);

    let solver = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.solve(Pace::Animated))
    };
    assert!(wait_until(|| engine.history_len() < 4));
    engine.reset();
    let undone = solver.join().unwrap();

    assert!(undone < 4);
    assert!(engine.puzzle().is_solved());
    assert_eq!(engine.history_len(), 0);
}
