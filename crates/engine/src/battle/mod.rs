//! Turn-based battle scheduling.

mod combatant;
mod world_battle;

pub use combatant::{
    BattleStats, BattleView, Combatant, CombatantId, CombatantSummary, CombatantTraits, Side,
    TurnAction, TurnProgress,
};
pub use world_battle::{
    BattleError, BattleOutcome, BattleWorld, ROSTER_MAX, ROSTER_MIN,
};
