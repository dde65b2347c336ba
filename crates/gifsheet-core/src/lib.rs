//! Core library for turning animated images into spritesheets.
//!
//! - Extraction: every frame of a GIF / APNG / WebP (or a single still image) as owned RGBA frames
//! - Planning: near-square grid, `columns = ceil(sqrt(n))`, `rows = ceil(n / columns)`
//! - Compositing: frames stretched to a fixed tile size and pasted row-major with optional margin
//! - Export: in-memory PNG plus serde-serializable tile metadata
//!
//! Quick example:
//! ```ignore
//! use gifsheet_core::{SpriteConfig, convert};
//! # fn main() -> anyhow::Result<()> {
//! let bytes = std::fs::read("walk.gif")?;
//! let cfg = SpriteConfig { tile_width: 64, tile_height: 64, frame_count: 20, margin: 5, ..Default::default() };
//! let sheet = convert(&bytes, &cfg)?;
//! std::fs::write("walk.png", sheet.encode_png()?)?;
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod grid;
pub mod model;
pub mod pipeline;

pub use compositing::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use extract::*;
pub use grid::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `gifsheet_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{ResizeFilter, SpriteConfig, SpriteConfigBuilder};
    pub use crate::error::{ErrorKind, SheetError};
    pub use crate::grid::{GridLayout, plan};
    pub use crate::model::{Frame, Rect, SheetStats, SourceAnimation, Tile};
    pub use crate::{Spritesheet, composite, convert, convert_animation, extract, extract_reader};
}
