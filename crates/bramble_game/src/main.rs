//! Bramble -- a side-scrolling platformer simulation.
//!
//! Startup loads config, level, sprites and an input replay, each falling
//! back to a built-in version when its file is absent. The session then runs
//! the fixed-step loop until the player is caught, the replay runs out, or
//! Escape is pressed, and the last rendered frame is written out as a PNG.
//!
//! `--fast` runs the replay without wall-clock pacing. `--snapshot <path>`
//! overrides where the final frame is saved.

mod assets;
mod audio;
mod camera;
mod collision;
mod config;
mod enemy;
mod entity;
mod level;
mod player;
mod projectile;
mod render;
mod replay;
mod session;
mod spawner;
mod world;

use std::path::{Path, PathBuf};

use assets::{AssetSource, DiskAssets, MemoryAssets};
use audio::SoundBank;
use config::load_config_or_default;
use level::{load_level_from_path, LevelMap};
use replay::{load_replay_from_path, ReplaySequence};
use session::{Pacing, ReplayInput, Session};
use world::World;

const CONFIG_PATH: &str = "assets/config.json";
const LEVEL_PATH: &str = "assets/levels/world.json";
const IMAGES_PATH: &str = "assets/images";
const REPLAY_PATH: &str = "assets/replays/demo.json";
const DEFAULT_SNAPSHOT_PATH: &str = "bramble_last_frame.png";

struct Options {
    pacing: Pacing,
    snapshot: PathBuf,
}

fn parse_args() -> Options {
    let mut options = Options {
        pacing: Pacing::RealTime,
        snapshot: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fast" => options.pacing = Pacing::AsFastAsPossible,
            "--snapshot" => match args.next() {
                Some(path) => options.snapshot = PathBuf::from(path),
                None => log::warn!("--snapshot needs a path; keeping {DEFAULT_SNAPSHOT_PATH}"),
            },
            other => log::warn!("Ignoring unknown argument '{other}'"),
        }
    }
    options
}

fn load_level(path: &Path) -> Result<LevelMap, String> {
    if !path.exists() {
        log::warn!("Level '{}' not found, using the built-in demo level.", path.display());
        return Ok(LevelMap::demo());
    }
    load_level_from_path(path)
}

fn load_assets(root: &Path, tile_size: u32) -> Box<dyn AssetSource> {
    if root.is_dir() {
        Box::new(DiskAssets::new(root))
    } else {
        log::warn!(
            "Image folder '{}' not found, using placeholder sprites.",
            root.display()
        );
        Box::new(MemoryAssets::placeholder(tile_size))
    }
}

fn load_replay(path: &Path) -> Result<ReplaySequence, String> {
    if !path.exists() {
        log::warn!("Replay '{}' not found, using the built-in demo run.", path.display());
        return Ok(ReplaySequence::demo());
    }
    load_replay_from_path(path)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Bramble starting...");
    let options = parse_args();

    let config_path = PathBuf::from(CONFIG_PATH);
    let config = load_config_or_default(&config_path).unwrap_or_else(|err| {
        panic!("Failed to load config '{}': {}", config_path.display(), err);
    });

    let level_path = PathBuf::from(LEVEL_PATH);
    let level = load_level(&level_path).unwrap_or_else(|err| {
        panic!("Failed to load level '{}': {}", level_path.display(), err);
    });

    let assets = load_assets(Path::new(IMAGES_PATH), config.tile_size);

    let replay_path = PathBuf::from(REPLAY_PATH);
    let replay = load_replay(&replay_path).unwrap_or_else(|err| {
        panic!("Failed to load replay '{}': {}", replay_path.display(), err);
    });
    log::info!("Replay: {} ticks", replay.tick_count());
    let expected_dt = 1.0 / config.framerate as f32;
    if (replay.fixed_dt - expected_dt).abs() > 1e-4 {
        log::warn!(
            "Replay was recorded at dt {:.4}s but the game runs at {:.4}s; ticks are replayed one for one.",
            replay.fixed_dt,
            expected_dt
        );
    }

    let world = World::from_level(config, &level, assets.as_ref(), SoundBank::logged())
        .unwrap_or_else(|err| {
            panic!("Failed to set up level '{}': {}", level.level_id, err);
        });

    let mut session = Session::new(world, options.pacing);
    let summary = session.run(&mut ReplayInput::new(&replay));
    log::info!(
        "{} shots, {} hits, {} bees spawned, {} frames rendered",
        summary.stats.shots,
        summary.stats.hits,
        summary.stats.bees_spawned,
        summary.frames_rendered
    );
    log::info!("{} entities alive at exit", session.world().arena().len());

    match session.canvas().save_png(&options.snapshot) {
        Ok(()) => log::info!("Last frame written to {}", options.snapshot.display()),
        Err(err) => log::error!("{err}"),
    }
}
