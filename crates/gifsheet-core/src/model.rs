use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    /// Returns true if the two rectangles share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        self.w > 0
            && self.h > 0
            && r.w > 0
            && r.h > 0
            && self.x <= r.right()
            && r.x <= self.right()
            && self.y <= r.bottom()
            && r.y <= self.bottom()
    }
}

/// One still RGBA image of an animation, at source resolution.
///
/// Frames own their pixels and are never modified; resizing yields a new frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    rgba: RgbaImage,
}

impl Frame {
    /// Wraps an owned RGBA buffer.
    pub fn new(rgba: RgbaImage) -> Self {
        Self { rgba }
    }

    /// Deep-copies a buffer that may be reused by a decoder for the next frame.
    pub fn snapshot(buffer: &RgbaImage) -> Self {
        Self {
            rgba: buffer.clone(),
        }
    }

    /// Converts any decoded image into an RGBA frame.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self {
            rgba: image.to_rgba8(),
        }
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }

    /// Stretches the frame to exactly `w`x`h`. Aspect ratio is not preserved.
    pub fn resized(&self, w: u32, h: u32, filter: FilterType) -> Frame {
        if self.dimensions() == (w, h) {
            return self.clone();
        }
        Frame {
            rgba: imageops::resize(&self.rgba, w, h, filter),
        }
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.rgba
    }
}

/// Decoded input: ordered frames plus the native canvas size.
#[derive(Debug, Clone)]
pub struct SourceAnimation {
    pub frames: Vec<Frame>,
    pub width: u32,
    pub height: u32,
}

impl SourceAnimation {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// A frame placed on the sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tile {
    /// Position of the frame in the source animation (and in the grid, row-major).
    pub index: usize,
    /// Placed rectangle on the sheet (always the tile size).
    pub rect: Rect,
    /// Size of the frame before resizing.
    pub source_size: (u32, u32),
}

/// Sheet-level metadata (common fields used by exporters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetMeta {
    pub app: String,
    pub version: String,
    pub image: String,
    pub format: String,
    pub size: (u32, u32),
    pub tile_size: (u32, u32),
    pub margin: u32,
    pub columns: u32,
    pub rows: u32,
    pub frame_count: usize,
}

/// Statistics about how well the grid is filled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SheetStats {
    pub columns: u32,
    pub rows: u32,
    /// Number of tiles actually pasted.
    pub tiles_placed: usize,
    /// Grid cells left transparent.
    pub blank_cells: u64,
    /// Decoded frames not placed because `frame_count` was smaller.
    pub discarded_frames: usize,
    /// Sheet width * height.
    pub canvas_area: u64,
    /// Sum of placed tile areas.
    pub tile_area: u64,
    /// tile_area / canvas_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl SheetStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Grid: {}x{}, Tiles: {}, Blank cells: {}, Discarded frames: {}, Occupancy: {:.2}%",
            self.columns,
            self.rows,
            self.tiles_placed,
            self.blank_cells,
            self.discarded_frames,
            self.occupancy * 100.0,
        )
    }
}
