//! spritedom demo entry point.
//!
//! Loads a spritesheet image from disk, slices it into a grid, registers one
//! animation and plays it headlessly against an in-memory element for a fixed
//! amount of simulated time, logging every background change.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- assets/hero.png --cell-size 32 --end 7
//! cargo run -- --config spritedom.ini --json
//! ```

use std::cell::Cell;
use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use log::info;

use spritedom::components::sprite::SpriteOptions;
use spritedom::resources::democonfig::DemoConfig;
use spritedom::resources::element::{DisplayElement, VirtualDocument, VirtualElement};
use spritedom::resources::imageloader::FileImageLoader;
use spritedom::systems::animation::{
    add_animation, is_playing, on_animation_end, play, stop_all, update,
};
use spritedom::systems::lifecycle::{attach, create_sprite, destroy, get_memory};
use spritedom::systems::sheets::add_sheet;

/// Play a spritesheet animation headlessly.
#[derive(Parser)]
#[command(version, about = "Play a spritesheet animation and log every frame change")]
struct Cli {
    /// Spritesheet image. Overrides `[sheet] url`.
    #[arg(value_name = "IMAGE")]
    image: Option<String>,

    /// INI configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Sprite width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Sprite height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Square cell size; defaults to the sprite size.
    #[arg(long)]
    cell_size: Option<u32>,

    /// First frame of the animation.
    #[arg(long)]
    start: Option<i64>,

    /// Last frame of the animation (default: last cell of the sheet).
    #[arg(long)]
    end: Option<i64>,

    /// Milliseconds per frame.
    #[arg(long)]
    speed: Option<u32>,

    /// Play once instead of looping.
    #[arg(long)]
    once: bool,

    /// Simulated playback time in milliseconds.
    #[arg(long)]
    duration: Option<u64>,

    /// Print the playback log as JSON when done.
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    save_config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Early-exit: write the merged configuration and quit
    if let Some(path) = &cli.save_config {
        let config = DemoConfig {
            config_path: path.clone(),
            ..config
        };
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Configuration written to {}", path.display());
        return;
    }

    if let Err(e) = run(&config, cli.json) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> spritedom::Result<DemoConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = DemoConfig::with_path(path);
            config.load_from_file()?;
            config
        }
        None => DemoConfig::new(),
    };

    if let Some(image) = &cli.image {
        config.sheet_url = image.clone();
    }
    if let Some(width) = cli.width {
        config.sprite_width = width;
    }
    if let Some(height) = cli.height {
        config.sprite_height = height;
    }
    if cli.cell_size.is_some() {
        config.cell_size = cli.cell_size;
    }
    if let Some(start) = cli.start {
        config.start = start;
    }
    if cli.end.is_some() {
        config.end = cli.end;
    }
    if let Some(speed) = cli.speed {
        config.speed = speed;
    }
    if cli.once {
        config.looped = false;
    }
    if let Some(duration) = cli.duration {
        config.duration_ms = duration;
    }
    Ok(config)
}

fn run(config: &DemoConfig, json: bool) -> Result<(), Box<dyn Error>> {
    let mut document = VirtualDocument::new();
    let options = SpriteOptions::new(
        config.sprite_name.clone(),
        config.sprite_width,
        config.sprite_height,
    )
    .with_help(config.help);
    let mut sprite = create_sprite(&mut document, options)?;

    let mut stage = VirtualElement::new("div");
    stage.set_id("stage");
    attach(&mut sprite, &mut stage)?;

    let loader = FileImageLoader::new(".");
    let sheet = pollster::block_on(add_sheet(&mut sprite, &loader, config.sheet_options()))?;
    info!(
        "Sheet '{}': {}x{} cells of {}x{}px",
        sheet.id, sheet.columns, sheet.rows, sheet.width, sheet.height
    );
    let last_frame = sheet.frame_count() as i64 - 1;

    add_animation(&mut sprite, config.animation_def(last_frame))?;

    let completed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&completed);
    on_animation_end(&mut sprite, config.animation_name.as_str(), move || {
        flag.set(true);
        Ok(())
    });

    play(&mut sprite, config.animation_name.as_str(), None)?;

    let step = config.step_ms.max(1);
    let mut elapsed = 0;
    let mut last_background: Option<String> = None;
    while elapsed < config.duration_ms && is_playing(&sprite, config.animation_name.as_str()) {
        let delta = step.min(config.duration_ms - elapsed);
        update(&mut sprite, delta);
        elapsed += delta;

        let background = sprite.element().style("background").map(str::to_string);
        if background != last_background {
            info!(
                "t={}ms frame={:?} background={}",
                sprite.now(),
                sprite.current_frame(),
                background.as_deref().unwrap_or("none")
            );
            last_background = background;
        }
    }
    stop_all(&mut sprite);

    if completed.get() {
        info!("Animation '{}' completed", config.animation_name);
    }

    let memory = get_memory(&sprite);
    if json {
        println!("{}", memory.to_json()?);
    } else {
        for record in &memory.played_animations {
            info!(
                "Played '{}' at {}ms for {}ms (loop: {})",
                record.name, record.timestamp, record.length, record.looped
            );
        }
    }

    destroy(&mut sprite);
    Ok(())
}
