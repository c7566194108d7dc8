//! Host-facing collaborators.
//!
//! Overview
//! - `democonfig` – INI-backed settings for the demo binary
//! - `element` – display element and document traits, plus an in-memory implementation
//! - `imageloader` – asynchronous image dimension loading
//! - `logger` – per-sprite diagnostics sink
//! - `timers` – recurring interval timers on a deterministic millisecond clock
pub mod democonfig;
pub mod element;
pub mod imageloader;
pub mod logger;
pub mod timers;
