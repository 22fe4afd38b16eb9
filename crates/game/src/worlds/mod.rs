mod free_roam;
mod loading;
mod main_menu;

pub(crate) use free_roam::FreeRoamWorld;
pub(crate) use loading::LoadingWorld;
pub(crate) use main_menu::MainMenuWorld;

use crate::roster::RosterConfig;

/// Game-wide configuration threaded through world transitions.
#[derive(Debug, Clone)]
pub(crate) struct GameConfig {
    pub(crate) roster: RosterConfig,
}
