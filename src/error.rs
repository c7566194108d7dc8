//! Error type shared by every fallible sprite operation.
//!
//! Operations never leave partial state behind: when one of these is
//! returned, the sprite is exactly as it was before the call.

use thiserror::Error;

use crate::components::animation::AnimationName;

/// Failures reported by sprite, sheet and animation operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpriteError {
    /// Sprite name was empty.
    #[error("sprite name must be a non-empty string")]
    InvalidName,
    /// Width or height was zero.
    #[error("invalid sprite dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: u32, height: u32 },
    /// The host could not construct the display element.
    #[error("element creation failed: {0}")]
    ElementCreation(String),
    /// A node that is not a proper element was used where one is required.
    #[error("'{0}' is not an element node")]
    NotAnElement(String),
    /// Image could not be loaded or decoded.
    #[error("failed to load image '{url}': {reason}")]
    ImageLoad { url: String, reason: String },
    /// A cell dimension resolved to zero.
    #[error("invalid cell size {width}x{height}")]
    InvalidCellSize { width: u32, height: u32 },
    /// Grid computation produced no cells.
    #[error("spritesheet grid is empty ({columns} columns, {rows} rows)")]
    EmptyGrid { columns: u32, rows: u32 },
    /// Grid would hold more cells than a sheet allows.
    #[error("spritesheet grid is too large ({columns} columns, {rows} rows)")]
    GridTooLarge { columns: u32, rows: u32 },
    #[error("spritesheet '{0}' already exists")]
    DuplicateSheet(String),
    #[error("spritesheet '{0}' not found")]
    UnknownSheet(String),
    /// No sheet was named and the sprite has none to fall back on.
    #[error("no spritesheet available")]
    NoSheet,
    #[error("animation '{0}' already exists")]
    DuplicateAnimation(AnimationName),
    #[error("animation '{0}' not found")]
    UnknownAnimation(AnimationName),
    /// Neither an explicit frame list nor an end bound was given.
    #[error("animation '{0}' needs either a frame list or an end frame")]
    MissingFrames(AnimationName),
    #[error("animation '{name}' has start {start} after end {end}")]
    InvalidFrameRange {
        name: AnimationName,
        start: i64,
        end: i64,
    },
    #[error("animation '{0}' speed must be positive")]
    InvalidSpeed(AnimationName),
    #[error("frame {frame} is out of range for a sheet with {frame_count} frames")]
    FrameOutOfRange { frame: i64, frame_count: usize },
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SpriteError>;
