use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Resampling filters used when stretching a frame to the tile size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    /// Nearest neighbour (keeps pixel art crisp).
    Nearest,
    /// Linear (bilinear).
    Triangle,
    /// Cubic (Catmull-Rom).
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl FromStr for ResizeFilter {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "triangle" | "bilinear" => Ok(Self::Triangle),
            "catmullrom" | "bicubic" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            _ => Err(()),
        }
    }
}

impl From<ResizeFilter> for FilterType {
    fn from(f: ResizeFilter) -> Self {
        match f {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Per-request spritesheet settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteConfig {
    /// Width of every tile in pixels.
    pub tile_width: u32,
    /// Height of every tile in pixels.
    pub tile_height: u32,
    /// Number of grid cells to plan for; also caps how many frames are placed.
    pub frame_count: u32,
    /// Pixels between adjacent tiles (not around the outer edge).
    pub margin: u32,
    #[serde(default = "default_filter")]
    pub filter: ResizeFilter,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            tile_width: 64,
            tile_height: 64,
            frame_count: 20,
            margin: 5,
            filter: default_filter(),
        }
    }
}

impl SpriteConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if the tile width, tile height or frame count is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SheetError;

        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(SheetError::Config(format!(
                "tile size must be positive, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if self.frame_count == 0 {
            return Err(SheetError::Config("frame_count must be positive".into()));
        }
        Ok(())
    }

    /// Builds a config from signed integers as handed over by a form or command line.
    ///
    /// Nothing is clamped or defaulted: out-of-range values are reported as errors.
    pub fn from_raw(
        tile_width: i64,
        tile_height: i64,
        frame_count: i64,
        margin: i64,
    ) -> crate::error::Result<Self> {
        let cfg = Self {
            tile_width: positive("tile_width", tile_width)?,
            tile_height: positive("tile_height", tile_height)?,
            frame_count: positive("frame_count", frame_count)?,
            margin: non_negative("margin", margin)?,
            filter: default_filter(),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn positive(name: &str, v: i64) -> crate::error::Result<u32> {
    if v <= 0 {
        return Err(crate::error::SheetError::Config(format!(
            "{name} must be positive, got {v}"
        )));
    }
    non_negative(name, v)
}

fn non_negative(name: &str, v: i64) -> crate::error::Result<u32> {
    u32::try_from(v).map_err(|_| {
        crate::error::SheetError::Config(format!("{name} out of range (0..={}), got {v}", u32::MAX))
    })
}

fn default_filter() -> ResizeFilter {
    ResizeFilter::CatmullRom
}

/// Builder for `SpriteConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct SpriteConfigBuilder {
    cfg: SpriteConfig,
}

impl SpriteConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: SpriteConfig::default(),
        }
    }
    pub fn tile_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.tile_width = w;
        self.cfg.tile_height = h;
        self
    }
    pub fn frame_count(mut self, v: u32) -> Self {
        self.cfg.frame_count = v;
        self
    }
    pub fn margin(mut self, v: u32) -> Self {
        self.cfg.margin = v;
        self
    }
    pub fn filter(mut self, v: ResizeFilter) -> Self {
        self.cfg.filter = v;
        self
    }
    pub fn build(self) -> SpriteConfig {
        self.cfg
    }
}

impl SpriteConfig {
    /// Create a fluent builder for `SpriteConfig`.
    pub fn builder() -> SpriteConfigBuilder {
        SpriteConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn filter_aliases_parse() {
        assert_eq!("bicubic".parse::<ResizeFilter>(), Ok(ResizeFilter::CatmullRom));
        assert_eq!("Bilinear".parse::<ResizeFilter>(), Ok(ResizeFilter::Triangle));
        assert_eq!("lanczos".parse::<ResizeFilter>(), Ok(ResizeFilter::Lanczos3));
        assert_eq!("NEAREST".parse::<ResizeFilter>(), Ok(ResizeFilter::Nearest));
        assert!("box".parse::<ResizeFilter>().is_err());
    }

    #[test]
    fn from_raw_rejects_negative_margin() {
        let err = SpriteConfig::from_raw(64, 64, 20, -1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("margin"));
    }

    #[test]
    fn from_raw_rejects_zero_and_overflow() {
        assert!(SpriteConfig::from_raw(0, 64, 20, 0).is_err());
        assert!(SpriteConfig::from_raw(64, -3, 20, 0).is_err());
        assert!(SpriteConfig::from_raw(64, 64, 0, 0).is_err());
        assert!(SpriteConfig::from_raw(i64::from(u32::MAX) + 1, 64, 1, 0).is_err());
    }

    #[test]
    fn from_raw_keeps_values() {
        let cfg = SpriteConfig::from_raw(32, 16, 9, 0).expect("valid");
        assert_eq!((cfg.tile_width, cfg.tile_height), (32, 16));
        assert_eq!(cfg.frame_count, 9);
        assert_eq!(cfg.margin, 0);
    }
}
