mod battle_setup;
mod combatants;
mod hud;
mod menus;
mod roster;
mod worlds;

use std::path::Path;

use engine::{run_loop, LoopConfig, Resources, Services, WorldManager};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use roster::RosterConfig;
use worlds::{GameConfig, LoadingWorld};

/// Path to an external sprite manifest; the built-in one is used otherwise.
const ASSETS_ENV_VAR: &str = "TURNFELL_ASSETS";
/// Path to an external roster file; the built-in one is used otherwise.
const ROSTER_ENV_VAR: &str = "TURNFELL_ROSTER";
/// Caps the number of loop iterations, for headless smoke runs.
const MAX_STEPS_ENV_VAR: &str = "TURNFELL_MAX_STEPS";

const BUILTIN_SPRITES: &str = include_str!("../assets/sprites.json");
const BUILTIN_ROSTERS: &str = include_str!("../assets/rosters.json");

fn main() {
    init_tracing();
    info!("=== Turnfell Startup ===");

    if let Err(err) = run() {
        error!(error = err.as_str(), "startup_failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let resources = load_resources()?;
    let roster = load_roster()?;
    let config = LoopConfig {
        max_iterations: parse_max_iterations_from_env(),
        ..LoopConfig::default()
    };

    let mut services = Services::new(resources);
    let mut manager = WorldManager::new();
    run_loop(
        config,
        &mut services,
        &mut manager,
        Box::new(LoadingWorld::new(GameConfig { roster })),
    );
    Ok(())
}

fn load_resources() -> Result<Resources, String> {
    match std::env::var(ASSETS_ENV_VAR) {
        Ok(path) => Resources::from_manifest_file(Path::new(&path))
            .map_err(|error| format!("load sprite manifest: {error}")),
        Err(_) => Resources::from_manifest_str(BUILTIN_SPRITES)
            .map_err(|error| format!("load built-in sprite manifest: {error}")),
    }
}

fn load_roster() -> Result<RosterConfig, String> {
    match std::env::var(ROSTER_ENV_VAR) {
        Ok(path) => RosterConfig::from_file(Path::new(&path)),
        Err(_) => RosterConfig::from_json(BUILTIN_ROSTERS),
    }
}

fn parse_max_iterations_from_env() -> Option<u64> {
    let raw = std::env::var(MAX_STEPS_ENV_VAR).ok()?;
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        Ok(_) | Err(_) => {
            warn!(
                env_var = MAX_STEPS_ENV_VAR,
                value = raw.as_str(),
                "invalid max-steps env var value; running uncapped"
            );
            None
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
