//! Sliding-tile image puzzle engine.
//!
//! A picture is cut into a grid of pieces with one empty cell. Whole runs of
//! pieces slide along a row or column into the empty cell, either from player
//! gestures or from a background scrambler, and the recorded history can be
//! replayed backwards to restore the picture.
//!
//! ```
//! use image_slider::{Direction, Engine, EngineConfig, Move, Pace, Puzzle};
//!
//! let config = EngineConfig { scramble_on_start: false, ..EngineConfig::immediate() };
//! let engine = Engine::new(Puzzle::new(3, 2).unwrap(), config);
//!
//! engine.play(Move::new(Direction::Right, 1, 1, 1), Pace::Instant).unwrap();
//! assert_eq!(engine.empty_cell(), (1, 1));
//!
//! engine.solve(Pace::Instant);
//! assert!(engine.puzzle().is_solved());
//! ```

pub mod animation;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod image_source;
pub mod layout;
pub mod moves;
pub mod puzzle;
pub mod scramble;
pub mod slide;

pub use config::EngineConfig;
pub use engine::{Engine, Frame, Pace, PieceView};
pub use error::{MoveError, PuzzleError, Result};
pub use history::MoveHistory;
pub use moves::{Direction, Gesture, Move};
pub use puzzle::{Piece, PieceId, Puzzle};
pub use scramble::Scrambler;
pub use slide::Slide;
