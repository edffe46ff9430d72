//! The single writer over the puzzle.
//!
//! Gestures, the scrambler and solve replay may call in from different
//! threads. Each move takes the `turn` lock for its whole lifetime (commit
//! plus animation), so transitions never interleave. The `state` lock is only
//! held for the instant of a commit or a frame snapshot, which keeps the
//! renderer responsive while an animation is running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, trace, warn};

use crate::animation::Animation;
use crate::config::EngineConfig;
use crate::error::MoveError;
use crate::history::MoveHistory;
use crate::moves::{Direction, Gesture, Move};
use crate::puzzle::{PieceId, Puzzle};
use crate::slide::{self, Slide};

/// Whether a move is drawn sliding or simply appears in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Instant,
    Animated,
}

/// One piece as the renderer should draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceView {
    pub id: PieceId,
    pub x: usize,
    pub y: usize,
    /// Fractional cell offset from an in-flight slide.
    pub offset: (f32, f32),
}

/// Read-only snapshot handed to the renderer once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub empty: (usize, usize),
    pub pieces: Vec<PieceView>,
    pub history_len: usize,
    pub scrambling: bool,
    pub solved: bool,
}

struct State {
    puzzle: Puzzle,
    history: MoveHistory,
    animation: Option<Animation>,
}

pub struct Engine {
    config: EngineConfig,
    turn: Mutex<()>,
    state: Mutex<State>,
    scrambling: AtomicBool,
    interrupted: AtomicBool,
}

impl Engine {
    pub fn new(puzzle: Puzzle, config: EngineConfig) -> Self {
        info!(
            columns = puzzle.width(),
            rows = puzzle.height(),
            "{}x{}",
            puzzle.width(),
            puzzle.height()
        );
        let scrambling = AtomicBool::new(config.scramble_on_start);
        Self {
            config,
            turn: Mutex::new(()),
            state: Mutex::new(State {
                puzzle,
                history: MoveHistory::new(),
                animation: None,
            }),
            scrambling,
            interrupted: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn puzzle(&self) -> Puzzle {
        self.state().puzzle.clone()
    }

    pub fn history(&self) -> MoveHistory {
        self.state().history.clone()
    }

    pub fn history_len(&self) -> usize {
        self.state().history.len()
    }

    pub fn empty_cell(&self) -> (usize, usize) {
        self.state().puzzle.empty_cell()
    }

    pub fn is_scrambling(&self) -> bool {
        self.scrambling.load(Ordering::SeqCst)
    }

    /// Flip the scramble flag. The scrambler thread must be woken separately
    /// when this turns it on; see `Scrambler::set_enabled`.
    pub fn set_scrambling(&self, on: bool) {
        let was = self.scrambling.swap(on, Ordering::SeqCst);
        if was != on {
            info!(on, "scramble toggled");
        }
    }

    pub fn frame(&self) -> Frame {
        let state = self.state();
        let animation = state.animation.as_ref();
        let pieces = state
            .puzzle
            .pieces()
            .map(|piece| {
                let (x, y) = piece.position();
                PieceView {
                    id: piece.id(),
                    x,
                    y,
                    offset: animation
                        .and_then(|anim| anim.offset_of(piece.id()))
                        .unwrap_or((0.0, 0.0)),
                }
            })
            .collect();
        Frame {
            width: state.puzzle.width(),
            height: state.puzzle.height(),
            empty: state.puzzle.empty_cell(),
            pieces,
            history_len: state.history.len(),
            scrambling: self.is_scrambling(),
            solved: state.puzzle.is_solved(),
        }
    }

    /// Apply a move and record it in the history.
    pub fn play(&self, mv: Move, pace: Pace) -> Result<Slide, MoveError> {
        self.play_with(pace, |_| mv)
    }

    /// Turn a pointer gesture into a move against the empty cell as it is
    /// when this move's turn comes up.
    pub fn play_gesture(
        &self,
        gesture: Gesture,
        piece_size: (f64, f64),
        pace: Pace,
    ) -> Result<Slide, MoveError> {
        self.play_with(pace, |puzzle| {
            gesture.to_move(piece_size, puzzle.empty_cell())
        })
    }

    /// Slide the single piece that borders the empty cell, moving it in
    /// `direction`.
    pub fn nudge(&self, direction: Direction, pace: Pace) -> Result<Slide, MoveError> {
        self.play_with(pace, |puzzle| {
            let (ex, ey) = puzzle.empty_cell();
            let (dx, dy) = direction.as_offset();
            let cell = (ex as i32 - dx, ey as i32 - dy);
            Move::toward_empty(direction, cell, (ex, ey))
        })
    }

    fn play_with<F>(&self, pace: Pace, build: F) -> Result<Slide, MoveError>
    where
        F: FnOnce(&Puzzle) -> Move,
    {
        let turn = self.turn();
        let mv = build(&self.state().puzzle);
        self.step(&turn, mv, pace, true)
    }

    /// One random move, if scrambling is on. Switches scrambling off once
    /// the history reaches the configured limit.
    pub fn scramble_step<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Option<Result<Slide, MoveError>> {
        let turn = self.turn();
        if !self.is_scrambling() {
            return None;
        }

        let mv = {
            let state = self.state();
            Move::random(rng, state.puzzle.size(), state.puzzle.empty_cell())
        };
        let result = self.step(&turn, mv, Pace::Instant, true);

        let recorded = self.history_len();
        if recorded >= self.config.scramble_limit {
            self.scrambling.store(false, Ordering::SeqCst);
            info!(moves = recorded, "scramble limit reached");
        }
        Some(result)
    }

    /// Undo the whole history, newest move first. Scrambling is switched off
    /// first. Each entry leaves the log as it is undone, so an interrupted
    /// solve keeps the history in step with the board.
    pub fn solve(&self, pace: Pace) -> usize {
        self.set_scrambling(false);
        let turn = self.turn();
        info!(moves = self.history_len(), "solving");

        let mut undone = 0;
        while !self.interrupted.load(Ordering::SeqCst) {
            let Some(reversal) = self.state().history.pop_reversal() else {
                break;
            };
            if let Err(err) = self.step(&turn, reversal, pace, false) {
                warn!(%err, %reversal, "history does not match the board; dropping it");
                self.state().history.clear();
                break;
            }
            undone += 1;
            pause(self.config.replay_delay);
        }

        info!(undone, "solve finished");
        undone
    }

    /// Forget the recorded moves without touching the board.
    pub fn clear(&self) {
        self.state().history.clear();
        info!("moves cleared");
    }

    /// Put every piece back home and forget the history. Any running solve
    /// or animation is cut short first.
    pub fn reset(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
        let _turn = self.turn();
        self.interrupted.store(false, Ordering::SeqCst);

        let mut state = self.state();
        state.puzzle.rebuild();
        state.history.clear();
        state.animation = None;
        info!("reset");
    }

    fn step(
        &self,
        _turn: &MutexGuard<'_, ()>,
        mv: Move,
        pace: Pace,
        record: bool,
    ) -> Result<Slide, MoveError> {
        let slide = {
            let mut state = self.state();
            let slide = match slide::apply(&mut state.puzzle, &mv) {
                Ok(slide) => slide,
                Err(err) => {
                    if err.is_near_miss() {
                        debug!(%mv, %err, "move missed the empty cell");
                    } else {
                        trace!(%mv, %err, "move rejected");
                    }
                    return Err(err);
                }
            };
            debug_assert!(state.puzzle.verify().is_ok());

            // Empty runs are logged too; their reversal is just as valid.
            if record {
                state.history.record(mv);
            }
            if pace == Pace::Animated && !slide.is_empty() {
                state.animation = Some(Animation::new(&slide, self.config.animation_frames));
            }
            debug!(%mv, moved = slide.pieces.len(), "move committed");
            slide
        };

        if pace == Pace::Animated && !slide.is_empty() {
            self.run_animation();
        }
        Ok(slide)
    }

    fn run_animation(&self) {
        loop {
            pause(self.config.frame_interval);
            let mut state = self.state();
            let finished = match state.animation.as_mut() {
                Some(animation) => {
                    animation.advance();
                    animation.is_finished()
                }
                None => true,
            };
            if finished || self.interrupted.load(Ordering::SeqCst) {
                state.animation = None;
                return;
            }
        }
    }

    fn turn(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Every commit finishes under the lock, so a poisoned guard still holds
    // a consistent board.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
