//! Playback history.
//!
//! Every `play()` appends a [`PlaybackRecord`]; stopping the animation fills
//! in how long it ran. [`crate::systems::lifecycle::get_memory`] hands out
//! copies, never the sprite's own log.

use serde::{Deserialize, Serialize};

use crate::components::animation::AnimationName;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRecord {
    pub name: AnimationName,
    /// Sprite clock time (ms) when playback started.
    pub timestamp: u64,
    /// Milliseconds played; 0 until the animation stops.
    pub length: u64,
    pub looped: bool,
    #[serde(skip)]
    pub(crate) open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    #[serde(rename = "playedAnimations")]
    pub played_animations: Vec<PlaybackRecord>,
}

impl Memory {
    pub(crate) fn record_start(&mut self, name: AnimationName, timestamp: u64, looped: bool) {
        self.played_animations.push(PlaybackRecord {
            name,
            timestamp,
            length: 0,
            looped,
            open: true,
        });
    }

    /// Back-fill the most recent unfinished record for `name`.
    pub(crate) fn record_stop(&mut self, name: &AnimationName, now: u64) {
        if let Some(record) = self
            .played_animations
            .iter_mut()
            .rev()
            .find(|r| r.open && &r.name == name)
        {
            record.length = now.saturating_sub(record.timestamp);
            record.open = false;
        }
    }

    pub fn clear(&mut self) {
        self.played_animations.clear();
    }

    pub fn len(&self) -> usize {
        self.played_animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.played_animations.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_fills_latest_open_record() {
        let mut memory = Memory::default();
        let walk = AnimationName::from("walk");
        memory.record_start(walk.clone(), 0, true);
        memory.record_stop(&walk, 50);
        memory.record_start(walk.clone(), 100, false);
        memory.record_stop(&walk, 250);

        assert_eq!(memory.played_animations[0].length, 50);
        assert_eq!(memory.played_animations[1].length, 150);
    }

    #[test]
    fn test_stop_ignores_other_names() {
        let mut memory = Memory::default();
        memory.record_start("walk".into(), 10, true);
        memory.record_stop(&"run".into(), 90);
        assert_eq!(memory.played_animations[0].length, 0);
        assert!(memory.played_animations[0].open);
    }

    #[test]
    fn test_json_uses_played_animations_key() {
        let mut memory = Memory::default();
        memory.record_start("walk".into(), 0, true);
        let json = memory.to_json().unwrap();
        assert!(json.contains("playedAnimations"));
        assert!(!json.contains("open"));
    }
}
