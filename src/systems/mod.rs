//! Operations on sprites.
//!
//! Submodules overview:
//! - [`animation`] – animation registration, playback, ticks and end callbacks
//! - [`grid`] – spritesheet grid calculation and cell descriptors
//! - [`lifecycle`] – sprite creation, attachment and teardown
//! - [`sheets`] – adding, removing and resolving spritesheets

pub mod animation;
pub mod grid;
pub mod lifecycle;
pub mod sheets;
