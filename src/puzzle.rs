use std::collections::HashSet;
use std::fmt;

use crate::error::{PuzzleError, Result};

/// Identity of a piece: the grid cell it was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    pub x: usize,
    pub y: usize,
}

impl PieceId {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    x: usize,
    y: usize,
}

impl Piece {
    fn at_home(id: PieceId) -> Self {
        Self {
            id,
            x: id.x,
            y: id.y,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn is_home(&self) -> bool {
        self.id.x == self.x && self.id.y == self.y
    }
}

/// The W x H board of pieces with exactly one empty cell.
///
/// `board` is indexed `[y][x]`. The empty cell is cached in `x_pos`/`y_pos`
/// and must always agree with the single `None` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    width: usize,
    height: usize,
    board: Vec<Vec<Option<Piece>>>,
    x_pos: usize,
    y_pos: usize,
}

impl Puzzle {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let mut puzzle = Self {
            width: 0,
            height: 0,
            board: Vec::new(),
            x_pos: 0,
            y_pos: 0,
        };
        puzzle.build(width, height)?;
        Ok(puzzle)
    }

    /// Lay every piece on its own cell and leave the bottom-right cell empty.
    /// History is the caller's business.
    pub fn build(&mut self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(PuzzleError::EmptyGrid { width, height });
        }

        self.lay_out(width, height);
        Ok(())
    }

    pub fn rebuild(&mut self) {
        self.lay_out(self.width, self.height);
    }

    fn lay_out(&mut self, width: usize, height: usize) {
        self.board = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| Some(Piece::at_home(PieceId::new(x, y))))
                    .collect()
            })
            .collect();
        self.board[height - 1][width - 1] = None;
        self.width = width;
        self.height = height;
        self.x_pos = width - 1;
        self.y_pos = height - 1;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn piece_count(&self) -> usize {
        self.width * self.height - 1
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn piece_at(&self, x: usize, y: usize) -> Result<Option<&Piece>> {
        if !self.contains(x, y) {
            return Err(PuzzleError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.board[y][x].as_ref())
    }

    pub fn empty_cell(&self) -> (usize, usize) {
        (self.x_pos, self.y_pos)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.board.iter().flatten().flatten()
    }

    /// Remove the piece from (x, y), leaving the cell unoccupied. Only the
    /// move applier calls this, always paired with `place_piece` and
    /// `mark_empty` inside one commit.
    pub(crate) fn take_piece(&mut self, x: usize, y: usize) -> Option<Piece> {
        self.board[y][x].take()
    }

    pub(crate) fn place_piece(&mut self, mut piece: Piece, x: usize, y: usize) {
        debug_assert!(self.board[y][x].is_none(), "cell ({x}, {y}) is occupied");
        piece.x = x;
        piece.y = y;
        self.board[y][x] = Some(piece);
    }

    pub(crate) fn mark_empty(&mut self, x: usize, y: usize) {
        debug_assert!(self.board[y][x].is_none(), "cell ({x}, {y}) is occupied");
        self.x_pos = x;
        self.y_pos = y;
    }

    pub fn is_solved(&self) -> bool {
        self.empty_cell() == (self.width - 1, self.height - 1) && self.pieces().all(Piece::is_home)
    }

    /// Audit the board: one empty cell matching the cache, every piece
    /// recording its own cell, every identity present exactly once.
    pub fn verify(&self) -> Result<()> {
        let mut empties = Vec::new();
        let mut seen = HashSet::with_capacity(self.piece_count());

        for (y, row) in self.board.iter().enumerate() {
            if row.len() != self.width {
                return Err(PuzzleError::Corrupt(format!(
                    "row {y} has {} cells, expected {}",
                    row.len(),
                    self.width
                )));
            }
            for (x, cell) in row.iter().enumerate() {
                match cell {
                    None => empties.push((x, y)),
                    Some(piece) => {
                        if piece.position() != (x, y) {
                            return Err(PuzzleError::Corrupt(format!(
                                "piece {:?} sits at ({x}, {y}) but records {:?}",
                                piece.id,
                                piece.position()
                            )));
                        }
                        if !self.contains(piece.id.x, piece.id.y) {
                            return Err(PuzzleError::Corrupt(format!(
                                "piece {:?} has no home on the board",
                                piece.id
                            )));
                        }
                        if !seen.insert(piece.id) {
                            return Err(PuzzleError::Corrupt(format!(
                                "piece {:?} appears twice",
                                piece.id
                            )));
                        }
                    }
                }
            }
        }

        if empties != [self.empty_cell()] {
            return Err(PuzzleError::Corrupt(format!(
                "empty cells {:?} disagree with cached {:?}",
                empties,
                self.empty_cell()
            )));
        }
        if seen.len() != self.piece_count() {
            return Err(PuzzleError::Corrupt(format!(
                "{} pieces on the board, expected {}",
                seen.len(),
                self.piece_count()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.board {
            for cell in row {
                match cell {
                    Some(piece) => write!(f, "{:3} ", piece.id.y * self.width + piece.id.x + 1)?,
                    None => write!(f, "{:>3} ", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_puzzle_is_identity_with_empty_bottom_right() {
        let puzzle = Puzzle::new(3, 2).unwrap();
        assert_eq!(puzzle.size(), (3, 2));
        assert_eq!(puzzle.empty_cell(), (2, 1));
        assert_eq!(puzzle.piece_count(), 5);
        assert!(puzzle.is_solved());
        puzzle.verify().unwrap();

        let piece = puzzle.piece_at(1, 1).unwrap().unwrap();
        assert_eq!(piece.id(), PieceId::new(1, 1));
        assert!(piece.is_home());
        assert!(puzzle.piece_at(2, 1).unwrap().is_none());
    }

    #[test]
    fn piece_at_rejects_cells_off_the_board() {
        let puzzle = Puzzle::new(3, 2).unwrap();
        assert!(matches!(
            puzzle.piece_at(3, 0),
            Err(PuzzleError::OutOfBounds { x: 3, y: 0, .. })
        ));
        assert!(puzzle.piece_at(0, 2).is_err());
    }

    #[test]
    fn zero_sized_grid_is_refused() {
        assert!(matches!(
            Puzzle::new(0, 4),
            Err(PuzzleError::EmptyGrid { width: 0, height: 4 })
        ));
    }

    #[test]
    fn single_cell_grid_has_no_pieces() {
        let puzzle = Puzzle::new(1, 1).unwrap();
        assert_eq!(puzzle.piece_count(), 0);
        assert_eq!(puzzle.pieces().count(), 0);
        puzzle.verify().unwrap();
    }

    #[test]
    fn place_piece_updates_recorded_position() {
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        let piece = puzzle.take_piece(1, 0).unwrap();
        puzzle.place_piece(piece, 1, 1);
        puzzle.mark_empty(1, 0);

        let moved = puzzle.piece_at(1, 1).unwrap().unwrap();
        assert_eq!(moved.id(), PieceId::new(1, 0));
        assert_eq!(moved.position(), (1, 1));
        assert!(!moved.is_home());
        assert!(!puzzle.is_solved());
        puzzle.verify().unwrap();
    }

    #[test]
    fn verify_catches_a_stale_empty_cache() {
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        puzzle.x_pos = 0;
        assert!(matches!(puzzle.verify(), Err(PuzzleError::Corrupt(_))));
    }

    #[test]
    fn verify_catches_a_lost_piece() {
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        let _ = puzzle.take_piece(0, 0);
        assert!(puzzle.verify().is_err());
    }

    #[test]
    fn rebuild_restores_identity() {
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        let piece = puzzle.take_piece(0, 1).unwrap();
        puzzle.place_piece(piece, 1, 1);
        puzzle.mark_empty(0, 1);

        puzzle.rebuild();
        assert!(puzzle.is_solved());
        assert_eq!(puzzle, Puzzle::new(2, 2).unwrap());
    }

    #[test]
    fn display_numbers_pieces_by_identity() {
        let puzzle = Puzzle::new(3, 2).unwrap();
        assert_eq!(puzzle.to_string(), "  1   2   3 \n  4   5   . \n");
    }
}
