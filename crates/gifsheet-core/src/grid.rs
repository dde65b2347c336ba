use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};

/// Near-square grid derived from a frame count.
///
/// `columns = ceil(sqrt(n))`, `rows = ceil(n / columns)`; columns are fixed and rows adapt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
}

impl GridLayout {
    /// Number of cells in the grid.
    pub fn capacity(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Row-major cell of tile `idx` as `(col, row)`.
    pub fn cell(&self, idx: usize) -> (u32, u32) {
        let cols = self.columns.max(1) as usize;
        ((idx % cols) as u32, (idx / cols) as u32)
    }

    /// Sheet size for the given tile size and margin:
    /// `((w + m) * columns - m, (h + m) * rows - m)`.
    ///
    /// Returns `None` for an empty grid; arithmetic is done in `u64` so it cannot overflow.
    pub fn canvas_size(&self, tile_w: u32, tile_h: u32, margin: u32) -> Option<(u64, u64)> {
        if self.columns == 0 || self.rows == 0 {
            return None;
        }
        let m = margin as u64;
        let w = (tile_w as u64 + m) * self.columns as u64 - m;
        let h = (tile_h as u64 + m) * self.rows as u64 - m;
        Some((w, h))
    }
}

/// Plans the grid for `frame_count` tiles.
pub fn plan(frame_count: u32) -> Result<GridLayout> {
    if frame_count == 0 {
        return Err(SheetError::Config("frame_count must be positive".into()));
    }
    let columns = ceil_sqrt(frame_count);
    let rows = frame_count.div_ceil(columns);
    Ok(GridLayout { columns, rows })
}

fn ceil_sqrt(n: u32) -> u32 {
    let r = n.isqrt();
    if r * r == n { r } else { r + 1 }
}
