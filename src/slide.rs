use crate::error::MoveError;
use crate::moves::{Direction, Move};
use crate::puzzle::{PieceId, Puzzle};

/// What a committed move did, for history and the animation overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub direction: Direction,
    pub pieces: Vec<PieceId>,
    /// The empty cell before the move; now occupied unless the run was empty.
    pub filled: (usize, usize),
    pub vacated: (usize, usize),
}

impl Slide {
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

/// Check `mv` against the current board without changing it.
pub fn validate(puzzle: &Puzzle, mv: &Move) -> Result<(), MoveError> {
    if mv.length() < 0 {
        return Err(MoveError::NegativeLength {
            length: mv.length(),
        });
    }

    let (along_limit, across_limit) = axis_limits(puzzle, mv.direction());
    if mv.start() < 0 || mv.end() > along_limit as i32 {
        return Err(MoveError::OutOfBounds {
            start: mv.start(),
            end: mv.end(),
            limit: along_limit,
        });
    }
    if mv.fixed() < 0 || mv.fixed() >= across_limit as i32 {
        return Err(MoveError::OutOfBounds {
            start: mv.fixed(),
            end: mv.fixed().saturating_add(1),
            limit: across_limit,
        });
    }

    let (empty_along, empty_across) = split(mv.direction(), puzzle.empty_cell());
    let borders_empty = match mv.direction() {
        Direction::Left | Direction::Up => mv.start() == empty_along as i32 + 1,
        Direction::Right | Direction::Down => mv.end() == empty_along as i32,
    };
    if mv.fixed() != empty_across as i32 || !borders_empty {
        let (empty_x, empty_y) = puzzle.empty_cell();
        return Err(MoveError::NotAdjacent {
            direction: mv.direction(),
            fixed: mv.fixed(),
            start: mv.start(),
            end: mv.end(),
            empty_x,
            empty_y,
        });
    }
    Ok(())
}

/// Validate and commit `mv`. Every piece in the run shifts one cell toward
/// the old empty cell; the far end of the run becomes the new empty cell.
pub fn apply(puzzle: &mut Puzzle, mv: &Move) -> Result<Slide, MoveError> {
    validate(puzzle, mv)?;

    let direction = mv.direction();
    let fixed = mv.fixed() as usize;
    let run = mv.start() as usize..mv.end() as usize;
    let filled = puzzle.empty_cell();

    // Walk from the end nearest the empty cell so each destination is free.
    let order: Vec<usize> = match direction {
        Direction::Left | Direction::Up => run.clone().collect(),
        Direction::Right | Direction::Down => run.clone().rev().collect(),
    };
    let (step_x, step_y) = direction.as_offset();

    let mut pieces = Vec::with_capacity(order.len());
    for along in order {
        let (x, y) = join(direction, along, fixed);
        let to_x = (x as i32 + step_x) as usize;
        let to_y = (y as i32 + step_y) as usize;
        if let Some(piece) = puzzle.take_piece(x, y) {
            pieces.push(piece.id());
            puzzle.place_piece(piece, to_x, to_y);
        }
    }

    let vacated_along = match direction {
        Direction::Left | Direction::Up => run.end as i32 - 1,
        Direction::Right | Direction::Down => run.start as i32,
    };
    let vacated = join(direction, vacated_along as usize, fixed);
    puzzle.mark_empty(vacated.0, vacated.1);

    Ok(Slide {
        direction,
        pieces,
        filled,
        vacated,
    })
}

fn axis_limits(puzzle: &Puzzle, direction: Direction) -> (usize, usize) {
    if direction.is_horizontal() {
        (puzzle.width(), puzzle.height())
    } else {
        (puzzle.height(), puzzle.width())
    }
}

fn split(direction: Direction, (x, y): (usize, usize)) -> (usize, usize) {
    if direction.is_horizontal() {
        (x, y)
    } else {
        (y, x)
    }
}

fn join(direction: Direction, along: usize, across: usize) -> (usize, usize) {
    if direction.is_horizontal() {
        (along, across)
    } else {
        (across, along)
    }
}
