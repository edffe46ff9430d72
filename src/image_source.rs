use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::error::{PuzzleError, Result};
use crate::layout::GridLayout;
use crate::puzzle::PieceId;

pub type Rgb = [u8; 3];

#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
}

impl SourceImage {
    /// Open a local path or a `file://` URL.
    pub fn load(location: &str) -> Result<Self> {
        Self::open(local_path(location)?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| PuzzleError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), width = image.width(), height = image.height(), "image loaded");
        Self::from_image(image)
    }

    pub fn from_image(image: DynamicImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PuzzleError::EmptyImage { width, height });
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Resample the pixel region under piece `id` to `cols` x `rows`.
    pub fn sample(&self, layout: &GridLayout, id: PieceId, cols: u32, rows: u32) -> Tile {
        let (x, y, w, h) = layout.source_rect(id.x, id.y);
        let (cols, rows) = (cols.max(1), rows.max(1));
        let region = self
            .image
            .crop_imm(x, y, w, h)
            .resize_exact(cols, rows, FilterType::Triangle)
            .to_rgb8();
        Tile {
            cols,
            rows,
            pixels: region.pixels().map(|pixel| pixel.0).collect(),
        }
    }
}

/// One piece's picture at display resolution, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    cols: u32,
    rows: u32,
    pixels: Vec<Rgb>,
}

impl Tile {
    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn pixel(&self, dx: u32, dy: u32) -> Option<Rgb> {
        if dx >= self.cols || dy >= self.rows {
            return None;
        }
        self.pixels.get((dy * self.cols + dx) as usize).copied()
    }
}

/// Tiles for every cell of the grid, sampled at the same resolution.
#[derive(Debug, Clone)]
pub struct TileSet {
    columns: usize,
    cols: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl TileSet {
    pub fn sample(image: &SourceImage, layout: &GridLayout, cols: u32, rows: u32) -> Self {
        let tiles = (0..layout.rows)
            .flat_map(|y| (0..layout.columns).map(move |x| PieceId::new(x, y)))
            .map(|id| image.sample(layout, id, cols, rows))
            .collect();
        Self {
            columns: layout.columns,
            cols: cols.max(1),
            rows: rows.max(1),
            tiles,
        }
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    pub fn get(&self, id: PieceId) -> Option<&Tile> {
        self.tiles.get(id.y * self.columns + id.x)
    }
}

fn local_path(location: &str) -> Result<PathBuf> {
    if let Some(path) = location.strip_prefix("file://") {
        // `file://localhost/a.png` and `file:///a.png` name the same file.
        let path = path.strip_prefix("localhost").unwrap_or(path);
        return Ok(PathBuf::from(path));
    }
    let is_url = location.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    });
    if is_url {
        return Err(PuzzleError::RemoteImage(location.to_string()));
    }
    Ok(PathBuf::from(location))
}
