//! The sprite registry.
//!
//! A [`Sprite`] owns its display element and everything needed to drive it:
//! loaded spritesheets, registered animations, the timers of the animations
//! currently playing, end-of-animation callbacks and the playback log.
//!
//! Sprites are built with [`create_sprite`](crate::systems::lifecycle::create_sprite)
//! and mutated through the functions in [`crate::systems`]. The accessors
//! here are read-only.

use std::fmt;

use log::Level;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::components::animation::{AnimationName, SpriteAnimation};
use crate::components::memory::Memory;
use crate::components::spritesheet::SpriteSheet;
use crate::resources::element::{DisplayElement, VirtualElement};
use crate::resources::logger::{self, SpriteLogger};
use crate::resources::timers::{IntervalTimers, TimerHandle};

pub type CallbackResult = Result<(), Box<dyn std::error::Error>>;

/// Zero-argument end-of-animation callback.
pub type EndCallback = Box<dyn FnMut() -> CallbackResult>;

/// Identifies a registered end callback so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// When end callbacks are notified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallbackPolicy {
    /// Only when a non-looping run reaches its last frame.
    #[default]
    CompletionOnly,
    /// On every transition out of playing: completion, `stop()` and
    /// self-stop after a playback error.
    AnyStop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteOptions {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Enables diagnostics through the `log` crate.
    pub help: bool,
    pub callback_policy: CallbackPolicy,
}

impl SpriteOptions {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            help: false,
            callback_policy: CallbackPolicy::default(),
        }
    }

    pub fn with_help(mut self, help: bool) -> Self {
        self.help = help;
        self
    }

    pub fn with_callback_policy(mut self, policy: CallbackPolicy) -> Self {
        self.callback_policy = policy;
        self
    }
}

/// Timer and cursor of one playing animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActiveInterval {
    pub handle: TimerHandle,
    /// Position in the animation's frame list of the next frame to show.
    pub cursor: usize,
    /// Effective loop flag for this run.
    pub looped: bool,
}

pub(crate) type CallbackSet = SmallVec<[(CallbackId, EndCallback); 2]>;

pub struct Sprite<E: DisplayElement = VirtualElement> {
    pub(crate) name: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) help: bool,
    pub(crate) element: E,
    pub(crate) spritesheets: FxHashMap<String, SpriteSheet>,
    pub(crate) animations: Vec<SpriteAnimation>,
    pub(crate) active_intervals: FxHashMap<AnimationName, ActiveInterval>,
    pub(crate) animation_callbacks: FxHashMap<AnimationName, CallbackSet>,
    pub(crate) memory: Memory,
    pub(crate) current_frame: Option<usize>,
    pub(crate) current_spritesheet_id: Option<String>,
    pub(crate) last_played_animation: Option<AnimationName>,
    pub(crate) timers: IntervalTimers<AnimationName>,
    pub(crate) callback_policy: CallbackPolicy,
    logger: Box<dyn SpriteLogger>,
    next_callback_id: u64,
}

impl<E: DisplayElement> Sprite<E> {
    /// Assemble a sprite around an already configured element.
    pub(crate) fn from_parts(options: SpriteOptions, element: E) -> Self {
        Self {
            logger: logger::for_help_flag(options.help),
            name: options.name,
            width: options.width,
            height: options.height,
            help: options.help,
            element,
            spritesheets: FxHashMap::default(),
            animations: Vec::new(),
            active_intervals: FxHashMap::default(),
            animation_callbacks: FxHashMap::default(),
            memory: Memory::default(),
            current_frame: None,
            current_spritesheet_id: None,
            last_played_animation: None,
            timers: IntervalTimers::new(),
            callback_policy: options.callback_policy,
            next_callback_id: 0,
        }
    }

    /// Replace the diagnostics sink.
    pub fn with_logger(mut self, logger: impl SpriteLogger + 'static) -> Self {
        self.logger = Box::new(logger);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn help(&self) -> bool {
        self.help
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn spritesheets(&self) -> &FxHashMap<String, SpriteSheet> {
        &self.spritesheets
    }

    pub fn animations(&self) -> &[SpriteAnimation] {
        &self.animations
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn current_frame(&self) -> Option<usize> {
        self.current_frame
    }

    pub fn current_spritesheet_id(&self) -> Option<&str> {
        self.current_spritesheet_id.as_deref()
    }

    pub fn last_played_animation(&self) -> Option<&AnimationName> {
        self.last_played_animation.as_ref()
    }

    pub fn callback_policy(&self) -> CallbackPolicy {
        self.callback_policy
    }

    /// Number of animations with a running timer.
    pub fn active_interval_count(&self) -> usize {
        self.active_intervals.len()
    }

    /// Number of end callbacks registered for `name`.
    pub fn callback_count(&self, name: &AnimationName) -> usize {
        self.animation_callbacks.get(name).map_or(0, SmallVec::len)
    }

    /// Total number of end callbacks across all animations.
    pub fn total_callback_count(&self) -> usize {
        self.animation_callbacks.values().map(SmallVec::len).sum()
    }

    /// Sprite clock time in milliseconds.
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    pub(crate) fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    pub(crate) fn animation_index(&self, name: &AnimationName) -> Option<usize> {
        self.animations.iter().position(|a| &a.name == name)
    }

    pub(crate) fn next_callback_id(&mut self) -> CallbackId {
        let id = CallbackId(self.next_callback_id);
        self.next_callback_id += 1;
        id
    }

    pub(crate) fn log(&self, level: Level, message: impl AsRef<str>) {
        self.logger.log(level, &self.name, message.as_ref());
    }
}

impl<E: DisplayElement + fmt::Debug> fmt::Debug for Sprite<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sheets: Vec<&String> = self.spritesheets.keys().collect();
        sheets.sort();
        let playing: Vec<&AnimationName> = self.active_intervals.keys().collect();
        f.debug_struct("Sprite")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("help", &self.help)
            .field("element", &self.element)
            .field("spritesheets", &sheets)
            .field("animations", &self.animations)
            .field("playing", &playing)
            .field("current_frame", &self.current_frame)
            .field("current_spritesheet_id", &self.current_spritesheet_id)
            .finish_non_exhaustive()
    }
}
