use crate::compositing::composite;
use crate::config::SpriteConfig;
use crate::error::{Result, SheetError};
use crate::extract::extract;
use crate::grid::{GridLayout, plan};
use crate::model::{SheetStats, SourceAnimation, Tile};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use tracing::{debug, instrument};

/// Output of a conversion: the RGBA sheet and where each frame landed.
#[derive(Debug, Clone)]
pub struct Spritesheet {
    pub image: RgbaImage,
    pub layout: GridLayout,
    pub tile_width: u32,
    pub tile_height: u32,
    pub margin: u32,
    /// Placed tiles in frame order.
    pub tiles: Vec<Tile>,
    /// Number of frames that were available before the `frame_count` cap.
    pub source_frames: usize,
}

impl Spritesheet {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encodes the sheet as an RGBA PNG in memory.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(self.image.clone())
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| SheetError::Encode(e.to_string()))?;
        Ok(buf.into_inner())
    }

    /// Computes fill statistics for this sheet.
    pub fn stats(&self) -> SheetStats {
        let canvas_area = self.width() as u64 * self.height() as u64;
        let tile_area: u64 = self
            .tiles
            .iter()
            .map(|t| t.rect.w as u64 * t.rect.h as u64)
            .sum();
        let occupancy = if canvas_area > 0 {
            tile_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        SheetStats {
            columns: self.layout.columns,
            rows: self.layout.rows,
            tiles_placed: self.tiles.len(),
            blank_cells: self.layout.capacity().saturating_sub(self.tiles.len() as u64),
            discarded_frames: self.source_frames.saturating_sub(self.tiles.len()),
            canvas_area,
            tile_area,
            occupancy,
        }
    }
}

#[instrument(skip_all)]
/// Converts an encoded animated image into a spritesheet: extract, plan, composite.
///
/// Each call works on its own buffers; nothing is cached or written to disk.
/// Any failure aborts the whole conversion and no partial sheet is produced.
pub fn convert(bytes: &[u8], cfg: &SpriteConfig) -> Result<Spritesheet> {
    cfg.validate()?;
    let animation = extract(bytes)?;
    convert_animation(&animation, cfg)
}

#[instrument(skip_all, fields(frames = animation.len()))]
/// Plans and composites frames that were already extracted.
pub fn convert_animation(animation: &SourceAnimation, cfg: &SpriteConfig) -> Result<Spritesheet> {
    if animation.is_empty() {
        return Err(SheetError::EmptyAnimation);
    }
    let layout = plan(cfg.frame_count)?;
    debug!(
        columns = layout.columns,
        rows = layout.rows,
        "planned grid"
    );
    composite(&animation.frames, layout, cfg)
}
