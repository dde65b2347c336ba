use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Animation contains no frames")]
    EmptyAnimation,
    #[error("Invalid config: {0}")]
    Config(String),
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidCanvas { width: u64, height: u64 },
    #[error("Canvas too large: {width}x{height}")]
    CanvasTooLarge { width: u64, height: u64 },
    #[error("Grid holds {capacity} cells but {needed} tiles must be placed")]
    LayoutTooSmall { capacity: u64, needed: u64 },
    #[error("Encoding error: {0}")]
    Encode(String),
}

/// Coarse classification of a [`SheetError`], one per user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Config,
    Composition,
    Encode,
    Io,
}

impl SheetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SheetError::Io(_) => ErrorKind::Io,
            SheetError::Decode(_) | SheetError::EmptyAnimation => ErrorKind::Decode,
            SheetError::Config(_) => ErrorKind::Config,
            SheetError::InvalidCanvas { .. }
            | SheetError::CanvasTooLarge { .. }
            | SheetError::LayoutTooSmall { .. } => ErrorKind::Composition,
            SheetError::Encode(_) => ErrorKind::Encode,
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
