use crate::error::{PuzzleError, Result};

/// How an image of a given size is cut into pieces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    /// Width of every piece in image pixels; may be fractional.
    pub piece_width: f64,
    pub piece_height: f64,
    pub image_width: u32,
    pub image_height: u32,
}

impl GridLayout {
    /// `ceil(width / piece_size)` columns by `ceil(height / piece_size)`
    /// rows, with the image split evenly across them.
    pub fn for_image(width: u32, height: u32, piece_size: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PuzzleError::EmptyImage { width, height });
        }
        if piece_size == 0 {
            return Err(PuzzleError::InvalidPieceSize);
        }

        let columns = width.div_ceil(piece_size) as usize;
        let rows = height.div_ceil(piece_size) as usize;
        Ok(Self {
            columns,
            rows,
            piece_width: f64::from(width) / columns as f64,
            piece_height: f64::from(height) / rows as f64,
            image_width: width,
            image_height: height,
        })
    }

    pub fn piece_size(&self) -> (f64, f64) {
        (self.piece_width, self.piece_height)
    }

    /// Pixel rectangle `(x, y, w, h)` of the piece cut from cell `(x, y)`,
    /// rounded outward to whole pixels and clipped to the image.
    pub fn source_rect(&self, x: usize, y: usize) -> (u32, u32, u32, u32) {
        let left = ((x as f64 * self.piece_width).floor() as u32).min(self.image_width - 1);
        let top = ((y as f64 * self.piece_height).floor() as u32).min(self.image_height - 1);
        let right = (((x + 1) as f64 * self.piece_width).ceil() as u32).min(self.image_width);
        let bottom = (((y + 1) as f64 * self.piece_height).ceil() as u32).min(self.image_height);
        (
            left,
            top,
            right.saturating_sub(left).max(1),
            bottom.saturating_sub(top).max(1),
        )
    }
}
