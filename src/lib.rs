//! spritedom library.
//!
//! Turns a spritesheet image into a display element that shows single frames
//! or plays frame animations by switching the element's background offset on
//! a recurring timer.
//!
//! # Flow
//!
//! 1. [`create_sprite`](systems::lifecycle::create_sprite) builds a sprite and its element
//! 2. [`add_sheet`](systems::sheets::add_sheet) loads an image and slices it into cells
//! 3. [`add_animation`](systems::animation::add_animation) registers frame sequences
//! 4. [`play`](systems::animation::play) starts a timer; [`update`](systems::animation::update)
//!    advances the sprite clock and runs due ticks
//! 5. [`stop`](systems::animation::stop) / [`destroy`](systems::lifecycle::destroy) tear down

pub mod components;
pub mod error;
pub mod resources;
pub mod systems;

pub use error::{Result, SpriteError};
