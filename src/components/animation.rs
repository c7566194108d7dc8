//! Named frame sequences played back on a sprite.
//!
//! [`AnimationDef`] is what callers hand to
//! [`add_animation`](crate::systems::animation::add_animation); once validated
//! against a spritesheet it becomes a [`SpriteAnimation`] stored on the sprite.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default milliseconds per frame when a definition does not set one.
pub const DEFAULT_SPEED_MS: u32 = 100;

/// Animation identifier. Animations may be keyed by text or by number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimationName {
    Index(i64),
    Text(String),
}

impl fmt::Display for AnimationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationName::Index(i) => write!(f, "{i}"),
            AnimationName::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AnimationName {
    fn from(value: &str) -> Self {
        AnimationName::Text(value.to_string())
    }
}

impl From<String> for AnimationName {
    fn from(value: String) -> Self {
        AnimationName::Text(value)
    }
}

impl From<&String> for AnimationName {
    fn from(value: &String) -> Self {
        AnimationName::Text(value.clone())
    }
}

impl From<i64> for AnimationName {
    fn from(value: i64) -> Self {
        AnimationName::Index(value)
    }
}

impl From<i32> for AnimationName {
    fn from(value: i32) -> Self {
        AnimationName::Index(i64::from(value))
    }
}

/// Caller-supplied description of an animation.
///
/// Frames come either from the explicit `frames` list or from the inclusive
/// `start..=end` range. Indices are signed so that bad input can be
/// rejected instead of wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDef {
    pub name: AnimationName,
    pub start: i64,
    pub end: Option<i64>,
    pub frames: Option<Vec<i64>>,
    /// Milliseconds per frame.
    pub speed: u32,
    #[serde(rename = "loop")]
    pub looped: bool,
    /// Sheet this animation is bound to. `None` plays on whatever sheet is
    /// current at play time.
    pub spritesheet: Option<String>,
}

impl AnimationDef {
    /// Create a looping definition with the default speed and no frames.
    pub fn new(name: impl Into<AnimationName>) -> Self {
        Self {
            name: name.into(),
            start: 0,
            end: None,
            frames: None,
            speed: DEFAULT_SPEED_MS,
            looped: true,
            spritesheet: None,
        }
    }

    /// Play the inclusive range `start..=end`.
    pub fn with_range(mut self, start: i64, end: i64) -> Self {
        self.start = start;
        self.end = Some(end);
        self
    }

    /// Play an explicit frame list. Takes precedence over the range.
    pub fn with_frames(mut self, frames: impl IntoIterator<Item = i64>) -> Self {
        self.frames = Some(frames.into_iter().collect());
        self
    }

    /// Milliseconds each frame stays on screen.
    pub fn with_speed(mut self, speed_ms: u32) -> Self {
        self.speed = speed_ms;
        self
    }

    /// Wrap to the first frame after the last instead of stopping.
    pub fn with_loop(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// Bind the animation to the sheet `id`.
    pub fn with_spritesheet(mut self, id: impl Into<String>) -> Self {
        self.spritesheet = Some(id.into());
        self
    }
}

/// A registered animation. Only `stopped` changes after registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteAnimation {
    pub name: AnimationName,
    pub start: i64,
    pub end: i64,
    pub frames: Vec<usize>,
    pub speed: u32,
    pub stopped: bool,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub spritesheet: Option<String>,
}
