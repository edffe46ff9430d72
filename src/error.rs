use std::path::PathBuf;

use thiserror::Error;

use crate::moves::Direction;

pub type Result<T> = std::result::Result<T, PuzzleError>;

/// Fatal errors: bad configuration, unreadable images, or a grid that lost
/// its invariants.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not load image from {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("only local files can be opened, not {0}")]
    RemoteImage(String),

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("piece size must be at least one pixel")]
    InvalidPieceSize,

    #[error("grid needs at least one column and one row, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("grid invariant violated: {0}")]
    Corrupt(String),

    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}

/// Reasons a move is refused. The grid is never touched when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("run length {length} is negative")]
    NegativeLength { length: i32 },

    #[error("run {start}..{end} falls outside 0..{limit}")]
    OutOfBounds { start: i32, end: i32, limit: usize },

    #[error("{direction} run {start}..{end} on line {fixed} does not border the empty cell at ({empty_x}, {empty_y})")]
    NotAdjacent {
        direction: Direction,
        fixed: i32,
        start: i32,
        end: i32,
        empty_x: usize,
        empty_y: usize,
    },
}

impl MoveError {
    /// A structurally valid run that simply was not next to the empty cell.
    #[must_use]
    pub fn is_near_miss(&self) -> bool {
        matches!(self, Self::NotAdjacent { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_adjacency_failures_are_near_misses() {
        let miss = MoveError::NotAdjacent {
            direction: Direction::Left,
            fixed: 0,
            start: 0,
            end: 1,
            empty_x: 2,
            empty_y: 0,
        };
        assert!(miss.is_near_miss());
        assert!(!MoveError::NegativeLength { length: -1 }.is_near_miss());
        assert!(!MoveError::OutOfBounds {
            start: 2,
            end: 5,
            limit: 3
        }
        .is_near_miss());
    }

    #[test]
    fn messages_name_the_offending_cell() {
        let error = PuzzleError::OutOfBounds {
            x: 4,
            y: 1,
            width: 3,
            height: 2,
        };
        assert_eq!(error.to_string(), "cell (4, 1) is outside the 3x2 grid");
    }
}
