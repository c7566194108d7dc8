//! Per-sprite diagnostics.
//!
//! A sprite created with `help = true` reports through [`LogFacadeLogger`],
//! which forwards to the `log` crate. Otherwise it gets [`NoopLogger`].
//! Hosts that want the messages elsewhere install their own
//! [`SpriteLogger`] with [`Sprite::with_logger`](crate::components::sprite::Sprite::with_logger).

use log::Level;

pub trait SpriteLogger {
    fn log(&self, level: Level, sprite: &str, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl SpriteLogger for NoopLogger {
    fn log(&self, _level: Level, _sprite: &str, _message: &str) {}
}

/// Forwards to the `log` facade under the `spritedom` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacadeLogger;

impl SpriteLogger for LogFacadeLogger {
    fn log(&self, level: Level, sprite: &str, message: &str) {
        log::log!(target: "spritedom", level, "[{sprite}] {message}");
    }
}

/// Logger picked for the `help` flag.
pub fn for_help_flag(help: bool) -> Box<dyn SpriteLogger> {
    if help {
        Box::new(LogFacadeLogger)
    } else {
        Box::new(NoopLogger)
    }
}
