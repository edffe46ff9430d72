use crate::moves::Direction;
use crate::puzzle::PieceId;
use crate::slide::Slide;

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pieces: Vec<PieceId>,
    direction: Direction,
    frames: u32,
    elapsed: u32,
}

impl Animation {
    pub fn new(slide: &Slide, frames: u32) -> Self {
        Self {
            pieces: slide.pieces.clone(),
            direction: slide.direction,
            frames: frames.max(1),
            elapsed: 0,
        }
    }

    pub fn advance(&mut self) {
        self.elapsed = (self.elapsed + 1).min(self.frames);
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.frames
    }

    pub fn progress(&self) -> f32 {
        self.elapsed as f32 / self.frames as f32
    }

    /// Offset, in cells, to add to the committed position of every moving
    /// piece.
    pub fn offset(&self) -> (f32, f32) {
        let lag = 1.0 - self.progress();
        let (dx, dy) = self.direction.as_offset();
        (-(dx as f32) * lag, -(dy as f32) * lag)
    }

    pub fn offset_of(&self, id: PieceId) -> Option<(f32, f32)> {
        self.pieces.contains(&id).then(|| self.offset())
    }
}
