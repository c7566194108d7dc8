//! Demo configuration.
//!
//! Settings for the `spritedom` binary, loaded from an INI file. Defaults are
//! usable as-is; missing keys keep their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [sprite]
//! name = hero
//! width = 32
//! height = 32
//! help = true
//!
//! [sheet]
//! id = main
//! url = hero.png
//! cell_size = 32
//!
//! [animation]
//! name = walk
//! start = 0
//! end = 7
//! speed = 100
//! loop = true
//!
//! [playback]
//! duration_ms = 1000
//! step_ms = 16
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::animation::{AnimationDef, DEFAULT_SPEED_MS};
use crate::error::{Result, SpriteError};
use crate::systems::grid::SheetOptions;

const DEFAULT_SPRITE_NAME: &str = "sprite";
const DEFAULT_SPRITE_SIZE: u32 = 32;
const DEFAULT_SHEET_ID: &str = "main";
const DEFAULT_SHEET_URL: &str = "spritesheet.png";
const DEFAULT_ANIMATION_NAME: &str = "default";
const DEFAULT_DURATION_MS: u64 = 1000;
const DEFAULT_STEP_MS: u64 = 16;
const DEFAULT_CONFIG_PATH: &str = "./spritedom.ini";

/// Settings for the demo binary, persisted as INI.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Sprite name, also used as the element id.
    pub sprite_name: String,
    /// Sprite width in pixels.
    pub sprite_width: u32,
    /// Sprite height in pixels.
    pub sprite_height: u32,
    /// Enables sprite diagnostics.
    pub help: bool,
    /// Id of the single sheet the demo loads.
    pub sheet_id: String,
    /// Image path, relative to the working directory.
    pub sheet_url: String,
    /// Square cell size; defaults to the sprite size.
    pub cell_size: Option<u32>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
    /// Name of the animation to play.
    pub animation_name: String,
    /// First frame of the animation.
    pub start: i64,
    /// Last frame; `None` plays to the end of the sheet.
    pub end: Option<i64>,
    /// Milliseconds per frame.
    pub speed: u32,
    pub looped: bool,
    /// Total simulated playback time.
    pub duration_ms: u64,
    /// Clock step per simulated host frame.
    pub step_ms: u64,
    /// Where `load_from_file` and `save_to_file` read and write.
    pub config_path: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            sprite_name: DEFAULT_SPRITE_NAME.to_string(),
            sprite_width: DEFAULT_SPRITE_SIZE,
            sprite_height: DEFAULT_SPRITE_SIZE,
            help: true,
            sheet_id: DEFAULT_SHEET_ID.to_string(),
            sheet_url: DEFAULT_SHEET_URL.to_string(),
            cell_size: None,
            columns: None,
            rows: None,
            animation_name: DEFAULT_ANIMATION_NAME.to_string(),
            start: 0,
            end: None,
            speed: DEFAULT_SPEED_MS,
            looped: true,
            duration_ms: DEFAULT_DURATION_MS,
            step_ms: DEFAULT_STEP_MS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration with default values and a custom file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load values from the INI file at `config_path`.
    pub fn load_from_file(&mut self) -> Result<()> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| SpriteError::Config(format!("failed to load config file: {e}")))?;
        self.apply(&config)?;
        info!("Loaded config from {:?}", self.config_path);
        Ok(())
    }

    /// Load values from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<()> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| SpriteError::Config(format!("failed to parse config: {e}")))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<()> {
        // [sprite]
        if let Some(name) = config.get("sprite", "name") {
            self.sprite_name = name;
        }
        if let Some(width) = get_u32(config, "sprite", "width")? {
            self.sprite_width = width;
        }
        if let Some(height) = get_u32(config, "sprite", "height")? {
            self.sprite_height = height;
        }
        if let Some(help) = config.getbool("sprite", "help").map_err(SpriteError::Config)? {
            self.help = help;
        }

        // [sheet]
        if let Some(id) = config.get("sheet", "id") {
            self.sheet_id = id;
        }
        if let Some(url) = config.get("sheet", "url") {
            self.sheet_url = url;
        }
        if let Some(cell_size) = get_u32(config, "sheet", "cell_size")? {
            self.cell_size = Some(cell_size);
        }
        if let Some(columns) = get_u32(config, "sheet", "columns")? {
            self.columns = Some(columns);
        }
        if let Some(rows) = get_u32(config, "sheet", "rows")? {
            self.rows = Some(rows);
        }

        // [animation]
        if let Some(name) = config.get("animation", "name") {
            self.animation_name = name;
        }
        if let Some(start) = config.getint("animation", "start").map_err(SpriteError::Config)? {
            self.start = start;
        }
        if let Some(end) = config.getint("animation", "end").map_err(SpriteError::Config)? {
            self.end = Some(end);
        }
        if let Some(speed) = get_u32(config, "animation", "speed")? {
            self.speed = speed;
        }
        if let Some(looped) = config.getbool("animation", "loop").map_err(SpriteError::Config)? {
            self.looped = looped;
        }

        // [playback]
        if let Some(duration) = config
            .getuint("playback", "duration_ms")
            .map_err(SpriteError::Config)?
        {
            self.duration_ms = duration;
        }
        if let Some(step) = config
            .getuint("playback", "step_ms")
            .map_err(SpriteError::Config)?
        {
            self.step_ms = step;
        }
        Ok(())
    }

    /// Save configuration to the INI file at `config_path`.
    pub fn save_to_file(&self) -> Result<()> {
        let mut config = Ini::new();

        config.set("sprite", "name", Some(self.sprite_name.clone()));
        config.set("sprite", "width", Some(self.sprite_width.to_string()));
        config.set("sprite", "height", Some(self.sprite_height.to_string()));
        config.set("sprite", "help", Some(self.help.to_string()));

        config.set("sheet", "id", Some(self.sheet_id.clone()));
        config.set("sheet", "url", Some(self.sheet_url.clone()));
        if let Some(cell_size) = self.cell_size {
            config.set("sheet", "cell_size", Some(cell_size.to_string()));
        }
        if let Some(columns) = self.columns {
            config.set("sheet", "columns", Some(columns.to_string()));
        }
        if let Some(rows) = self.rows {
            config.set("sheet", "rows", Some(rows.to_string()));
        }

        config.set("animation", "name", Some(self.animation_name.clone()));
        config.set("animation", "start", Some(self.start.to_string()));
        if let Some(end) = self.end {
            config.set("animation", "end", Some(end.to_string()));
        }
        config.set("animation", "speed", Some(self.speed.to_string()));
        config.set("animation", "loop", Some(self.looped.to_string()));

        config.set("playback", "duration_ms", Some(self.duration_ms.to_string()));
        config.set("playback", "step_ms", Some(self.step_ms.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| SpriteError::Config(format!("failed to save config file: {e}")))?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Sheet options for the configured image and grid.
    pub fn sheet_options(&self) -> SheetOptions {
        SheetOptions {
            cell_size: self.cell_size,
            columns: self.columns,
            rows: self.rows,
            ..SheetOptions::new(self.sheet_id.clone(), self.sheet_url.clone())
        }
    }

    /// Animation definition for the configured range. With no end frame the
    /// animation runs through `last_frame`.
    pub fn animation_def(&self, last_frame: i64) -> AnimationDef {
        AnimationDef::new(self.animation_name.clone())
            .with_range(self.start, self.end.unwrap_or(last_frame))
            .with_speed(self.speed)
            .with_loop(self.looped)
            .with_spritesheet(self.sheet_id.clone())
    }
}

fn get_u32(config: &Ini, section: &str, key: &str) -> Result<Option<u32>> {
    match config.getuint(section, key).map_err(SpriteError::Config)? {
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| SpriteError::Config(format!("[{section}] {key} = {value} is too large"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DemoConfig::new();
        assert_eq!(config.sprite_width, 32);
        assert_eq!(config.speed, DEFAULT_SPEED_MS);
        assert!(config.end.is_none());
        assert_eq!(config.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_load_from_str_overrides_present_keys() {
        let mut config = DemoConfig::new();
        config
            .load_from_str(
                "[sprite]\nname = hero\nwidth = 16\n\n[sheet]\ncell_size = 24\n\n[animation]\nend = 5\nloop = false\n",
            )
            .unwrap();
        assert_eq!(config.sprite_name, "hero");
        assert_eq!(config.sprite_width, 16);
        assert_eq!(config.sprite_height, 32);
        assert_eq!(config.cell_size, Some(24));
        assert_eq!(config.end, Some(5));
        assert!(!config.looped);
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let mut config = DemoConfig::new();
        let err = config.load_from_str("[sprite]\nwidth = wide\n").unwrap_err();
        assert!(matches!(err, SpriteError::Config(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join("spritedom-democonfig-test.ini");
        let mut saved = DemoConfig::with_path(&path);
        saved.sprite_name = "ghost".into();
        saved.cell_size = Some(16);
        saved.end = Some(3);
        saved.save_to_file().unwrap();

        let mut loaded = DemoConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_animation_def_falls_back_to_last_frame() {
        let config = DemoConfig::new();
        let def = config.animation_def(7);
        assert_eq!(def.end, Some(7));
        assert_eq!(def.spritesheet.as_deref(), Some("main"));
    }
}
