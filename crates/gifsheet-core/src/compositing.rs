use crate::config::SpriteConfig;
use crate::error::{Result, SheetError};
use crate::grid::GridLayout;
use crate::model::{Frame, Rect, Tile};
use crate::pipeline::Spritesheet;
use image::RgbaImage;
use tracing::{debug, instrument, warn};

/// Largest allowed sheet side in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;
/// Largest allowed sheet area in pixels (1 GiB of RGBA8).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Blit all of `src` into `canvas` with its top-left at (dx, dy).
///
/// Pixels are copied as-is, alpha included, which is exactly alpha-over onto a fully
/// transparent destination. Anything falling outside `canvas` is clipped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        let ty = dy as u64 + yy as u64;
        if ty >= ch as u64 {
            break;
        }
        for xx in 0..sw {
            let tx = dx as u64 + xx as u64;
            if tx >= cw as u64 {
                break;
            }
            canvas.put_pixel(tx as u32, ty as u32, *src.get_pixel(xx, yy));
        }
    }
}

/// Checked sheet size for `layout` and `cfg`.
///
/// Fails when the grid is empty or the result exceeds [`MAX_CANVAS_SIDE`] / [`MAX_CANVAS_PIXELS`].
pub fn sheet_dimensions(layout: &GridLayout, cfg: &SpriteConfig) -> Result<(u32, u32)> {
    let (w, h) = layout
        .canvas_size(cfg.tile_width, cfg.tile_height, cfg.margin)
        .ok_or(SheetError::InvalidCanvas {
            width: layout.columns as u64,
            height: layout.rows as u64,
        })?;
    if w == 0 || h == 0 {
        return Err(SheetError::InvalidCanvas {
            width: w,
            height: h,
        });
    }
    if w > MAX_CANVAS_SIDE as u64 || h > MAX_CANVAS_SIDE as u64 || w * h > MAX_CANVAS_PIXELS {
        return Err(SheetError::CanvasTooLarge {
            width: w,
            height: h,
        });
    }
    Ok((w as u32, h as u32))
}

/// Resizes frames to the tile size and pastes them row-major onto a transparent canvas.
///
/// Places `min(cfg.frame_count, frames.len())` tiles; further frames are ignored and
/// unused cells stay fully transparent. Nothing is returned unless every tile was placed.
#[instrument(skip_all, fields(frames = frames.len(), columns = layout.columns, rows = layout.rows))]
pub fn composite(frames: &[Frame], layout: GridLayout, cfg: &SpriteConfig) -> Result<Spritesheet> {
    cfg.validate()?;
    let (sheet_w, sheet_h) = sheet_dimensions(&layout, cfg)?;

    let to_place = frames.len().min(cfg.frame_count as usize);
    if (to_place as u64) > layout.capacity() {
        return Err(SheetError::LayoutTooSmall {
            capacity: layout.capacity(),
            needed: to_place as u64,
        });
    }
    if frames.len() > to_place {
        warn!(
            decoded = frames.len(),
            used = to_place,
            "dropping frames beyond frame_count"
        );
    }
    if to_place < cfg.frame_count as usize {
        warn!(
            requested = cfg.frame_count,
            available = frames.len(),
            "fewer frames than requested; remaining cells stay blank"
        );
    }

    // Saturation only matters for a single column/row, where the stride is never used.
    let stride_x = cfg.tile_width.saturating_add(cfg.margin);
    let stride_y = cfg.tile_height.saturating_add(cfg.margin);
    let filter = cfg.filter.into();

    let mut canvas = RgbaImage::new(sheet_w, sheet_h);
    let mut tiles = Vec::with_capacity(to_place);
    for (idx, frame) in frames.iter().take(to_place).enumerate() {
        let (col, row) = layout.cell(idx);
        let rect = Rect::new(
            col * stride_x,
            row * stride_y,
            cfg.tile_width,
            cfg.tile_height,
        );
        let resized = frame.resized(cfg.tile_width, cfg.tile_height, filter);
        blit_rgba(resized.rgba(), &mut canvas, rect.x, rect.y);
        tiles.push(Tile {
            index: idx,
            rect,
            source_size: frame.dimensions(),
        });
    }
    debug!(
        width = sheet_w,
        height = sheet_h,
        tiles = tiles.len(),
        "composited sheet"
    );

    Ok(Spritesheet {
        image: canvas,
        layout,
        tile_width: cfg.tile_width,
        tile_height: cfg.tile_height,
        margin: cfg.margin,
        tiles,
        source_frames: frames.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn blit_clips_at_canvas_edge() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([9, 8, 7, 255]));
        let mut canvas = RgbaImage::new(6, 6);
        blit_rgba(&src, &mut canvas, 4, 4);
        assert_eq!(canvas.get_pixel(5, 5)[3], 255);
        assert_eq!(canvas.get_pixel(3, 3)[3], 0);
        assert_eq!(canvas.get_pixel(4, 3)[3], 0);
    }

    #[test]
    fn blit_keeps_source_alpha() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 77]));
        let mut canvas = RgbaImage::new(2, 2);
        blit_rgba(&src, &mut canvas, 0, 0);
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([200, 100, 50, 77]));
    }

    #[test]
    fn sheet_dimensions_rejects_huge_canvas() {
        let layout = GridLayout {
            columns: 100,
            rows: 100,
        };
        let cfg = SpriteConfig::builder().tile_size(1024, 1024).build();
        match sheet_dimensions(&layout, &cfg) {
            Err(SheetError::CanvasTooLarge { .. }) => {}
            other => panic!("expected CanvasTooLarge, got {:?}", other),
        }
    }
}
