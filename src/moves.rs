use rand::Rng;
use std::fmt;

/// Direction the pieces travel. The discriminants match the quarter-turn
/// numbering used by `reverse`: adding two flips the direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Right = 0,
    Up = 1,
    Left = 2,
    Down = 3,
}

impl Direction {
    pub fn all() -> [Direction; 4] {
        [Direction::Right, Direction::Up, Direction::Left, Direction::Down]
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Direction::Right),
            1 => Some(Direction::Up),
            2 => Some(Direction::Left),
            3 => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
        }
    }

    /// Row moves slide along x, column moves along y.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }

    /// Unit step of a piece moving this way, in grid cells (y grows downward).
    pub fn as_offset(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
        }
    }

    /// Classify a drag angle in degrees, as returned by `atan2(dy, dx)` in
    /// screen coordinates, into one of four 90° sectors centred on the axes.
    pub fn from_angle(degrees: f64) -> Self {
        if (-45.0..45.0).contains(&degrees) {
            Direction::Right
        } else if (-135.0..-45.0).contains(&degrees) {
            Direction::Up
        } else if degrees >= 135.0 || degrees < -135.0 {
            Direction::Left
        } else {
            Direction::Down
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Right => "Right",
            Direction::Up => "Up",
            Direction::Left => "Left",
            Direction::Down => "Down",
        };
        write!(f, "{}", s)
    }
}

/// A slide of `length` contiguous pieces, starting at `start` along the row
/// (Right/Left) or column (Up/Down) numbered `fixed`, toward the empty cell.
///
/// Fields are signed because gesture-derived moves are not pre-validated;
/// the applier rejects anything that does not fit the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    direction: Direction,
    fixed: i32,
    start: i32,
    length: i32,
}

impl Move {
    pub fn new(direction: Direction, fixed: i32, start: i32, length: i32) -> Self {
        Self {
            direction,
            fixed,
            start,
            length,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn fixed(&self) -> i32 {
        self.fixed
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    /// One past the last index of the run. Saturates at `i32::MAX`.
    pub fn end(&self) -> i32 {
        self.start.saturating_add(self.length)
    }

    /// The move that undoes this one when applied right after it.
    pub fn reverse(&self) -> Self {
        let start = match self.direction {
            Direction::Up | Direction::Left => self.start.saturating_sub(1),
            Direction::Right | Direction::Down => self.start.saturating_add(1),
        };
        Self::new(self.direction.opposite(), self.fixed, start, self.length)
    }

    /// Slide everything between `cell` and the empty cell in `direction`.
    ///
    /// Only the coordinate along the line of motion is taken from the empty
    /// cell; the line itself comes from `cell`, so a press off the empty row
    /// or column produces a move the applier will refuse.
    pub fn toward_empty(direction: Direction, cell: (i32, i32), empty: (usize, usize)) -> Self {
        let (px, py) = cell;
        let (ex, ey) = (empty.0 as i32, empty.1 as i32);
        match direction {
            Direction::Right => Self::new(direction, py, px, ex.saturating_sub(px)),
            Direction::Up => Self::new(direction, px, ey + 1, py.saturating_sub(ey)),
            Direction::Left => Self::new(direction, py, ex + 1, px.saturating_sub(ex)),
            Direction::Down => Self::new(direction, px, py, ey.saturating_sub(py)),
        }
    }

    /// A uniformly chosen direction and run end on the empty cell's side.
    ///
    /// The result always borders the empty cell and fits a `width` x
    /// `height` grid. When there is nothing on the chosen side the run is
    /// empty, which applies as a no-op.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        (width, height): (usize, usize),
        (ex, ey): (usize, usize),
    ) -> Self {
        let direction = Direction::all()[rng.gen_range(0..4)];
        let (ex, ey) = (ex as i32, ey as i32);
        let (width, height) = (width as i32, height as i32);
        match direction {
            Direction::Right => {
                let px = if ex > 0 { rng.gen_range(0..ex) } else { ex };
                Self::new(direction, ey, px, ex - px)
            }
            Direction::Up => {
                let py = if ey + 1 < height {
                    rng.gen_range(ey + 1..height)
                } else {
                    ey
                };
                Self::new(direction, ex, ey + 1, py - ey)
            }
            Direction::Left => {
                let px = if ex + 1 < width {
                    rng.gen_range(ex + 1..width)
                } else {
                    ex
                };
                Self::new(direction, ey, ex + 1, px - ex)
            }
            Direction::Down => {
                let py = if ey > 0 { rng.gen_range(0..ey) } else { ey };
                Self::new(direction, ex, py, ey - py)
            }
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = if self.direction.is_horizontal() { "row" } else { "column" };
        write!(
            f,
            "{} {} {} [{}..{})",
            self.direction,
            line,
            self.fixed,
            self.start,
            self.end()
        )
    }
}

/// A pointer press and release, in the same units as the piece size passed
/// to [`Gesture::to_move`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub press: (f64, f64),
    pub release: (f64, f64),
}

impl Gesture {
    pub fn new(press: (f64, f64), release: (f64, f64)) -> Self {
        Self { press, release }
    }

    pub fn angle(&self) -> f64 {
        let dx = self.release.0 - self.press.0;
        let dy = self.release.1 - self.press.1;
        dy.atan2(dx).to_degrees()
    }

    pub fn direction(&self) -> Direction {
        Direction::from_angle(self.angle())
    }

    /// Grid cell under the press point.
    pub fn cell(&self, piece_size: (f64, f64)) -> (i32, i32) {
        (
            (self.press.0 / piece_size.0).floor() as i32,
            (self.press.1 / piece_size.1).floor() as i32,
        )
    }

    pub fn to_move(&self, piece_size: (f64, f64), empty: (usize, usize)) -> Move {
        Move::toward_empty(self.direction(), self.cell(piece_size), empty)
    }
}
