//! Headless ChickenDodge demo
//!
//! Runs a fixed number of frames of the dodge scene and logs a summary.
//!
//! ```text
//! dodge_demo [config.toml|config.ron] [frames] [seed]
//! ```

mod scene;

use dodge_engine::foundation::logging;
use dodge_engine::prelude::*;
use thiserror::Error;

use crate::scene::{DodgeScene, SceneError};

const DEFAULT_FRAMES: u32 = 1200;
const DEFAULT_SEED: u64 = 0xC41C_4E45;

#[derive(Debug, Error)]
enum DemoError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("collision error: {0}")]
    Collision(#[from] CollisionError),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("invalid argument '{0}'")]
    Argument(String),
}

fn parse_arg<T: std::str::FromStr>(arg: Option<String>, default: T) -> Result<T, DemoError> {
    match arg {
        Some(raw) => raw.parse().map_err(|_| DemoError::Argument(raw)),
        None => Ok(default),
    }
}

fn run() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => {
            log::info!("Loading collision config from {}", path);
            CollisionConfig::load_from_file(&path)?
        }
        None => CollisionConfig::default(),
    };
    config.validate()?;
    let frames = parse_arg(args.next(), DEFAULT_FRAMES)?;
    let seed = parse_arg(args.next(), DEFAULT_SEED)?;

    log::info!(
        "Broad phase {:?}, {} entries per node, max depth {}",
        config.broad_phase,
        config.quadtree.max_entries_per_node,
        config.quadtree.max_depth
    );

    let mut scene = DodgeScene::new(config, seed)?;
    for _ in 0..frames {
        scene.tick()?;
    }

    let stats = scene.stats();
    let index = scene.world().index();
    log::info!(
        "{} frames: score {}, {} chicken hits, {} pecks, {}/{} chickens left the field",
        stats.frames,
        stats.score,
        stats.player_hits,
        stats.pecks,
        stats.chickens_removed,
        stats.chickens_spawned
    );
    log::info!(
        "Quadtree: {} entries, {} nodes, depth {}, {} leaves",
        index.entry_count(),
        index.node_count(),
        index.depth(),
        index.get_all_leaves().len()
    );

    Ok(())
}

fn main() {
    logging::init_with_filter("info");

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
