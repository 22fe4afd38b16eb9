use engine::{BattleWorld, Combatant, Resources};
use tracing::info;

use crate::combatants::build_combatant;
use crate::worlds::{GameConfig, MainMenuWorld};

/// Builds the battle world from the configured rosters, checking that every
/// referenced sprite made it through loading. On finish the battle hands
/// control back to the main menu.
pub(crate) fn build_battle(
    config: &GameConfig,
    resources: &Resources,
) -> Result<BattleWorld, String> {
    for spec in config.roster.left.iter().chain(config.roster.right.iter()) {
        if let Some(label) = &spec.sprite {
            resources
                .require_sprite(label)
                .map_err(|error| format!("combatant '{}': {error}", spec.name))?;
        }
    }

    let left: Vec<Box<dyn Combatant>> = config.roster.left.iter().map(build_combatant).collect();
    let right: Vec<Box<dyn Combatant>> = config.roster.right.iter().map(build_combatant).collect();
    info!(left = left.len(), right = right.len(), "battle_rosters_built");

    let menu_config = config.clone();
    let battle = BattleWorld::new(left, right)
        .map_err(|error| error.to_string())?
        .on_finish(move |_outcome| Box::new(MainMenuWorld::new(menu_config)));
    Ok(battle)
}
