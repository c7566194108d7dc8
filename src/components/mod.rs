//! Sprite data types.
//!
//! Submodules overview:
//! - [`animation`] – animation names, caller definitions and registered animations
//! - [`memory`] – playback history records
//! - [`sprite`] – the sprite registry owning element, sheets, animations and timers
//! - [`spritesheet`] – loaded spritesheet grids and per-cell background descriptors

pub mod animation;
pub mod memory;
pub mod sprite;
pub mod spritesheet;
