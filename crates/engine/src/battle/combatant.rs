use crate::app::{DrawSurface, InputSnapshot};
use crate::geometry::Rect;

/// Stable identifier assigned by the battle when a combatant joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombatantId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// The numbers the turn scheduler reads. Speed orders turns within a round;
/// hp reaching zero removes the combatant from play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatantTraits {
    pub speed: i32,
    pub hp: i32,
}

impl Default for CombatantTraits {
    fn default() -> Self {
        Self {
            speed: 1,
            hp: i32::MAX,
        }
    }
}

/// Running tallies kept per combatant for the duration of a battle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BattleStats {
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub kills: u32,
}

/// The effect a finished turn has on the battle. Combatants describe what
/// they want done; the scheduler applies it, so no combatant ever holds a
/// reference to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    Pass,
    Attack { target: CombatantId, damage: i32 },
}

/// Result of polling a combatant whose turn is active. A combatant waiting on
/// input returns `Pending` every step until it can commit to an action; the
/// battle holds at that turn without advancing anyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnProgress {
    Pending,
    Complete(TurnAction),
}

/// What one combatant can see of another while choosing an action.
#[derive(Debug, Clone, Copy)]
pub struct CombatantSummary {
    pub id: CombatantId,
    pub side: Side,
    pub is_enemy: bool,
    pub speed: i32,
    pub hp: i32,
}

/// Read-only view of the battle handed to a combatant taking its turn. Only
/// living combatants appear.
#[derive(Debug, Clone, Default)]
pub struct BattleView {
    living: Vec<CombatantSummary>,
}

impl BattleView {
    pub fn new(living: Vec<CombatantSummary>) -> Self {
        Self { living }
    }

    pub fn living(&self) -> &[CombatantSummary] {
        &self.living
    }

    pub fn first_living_enemy(&self) -> Option<&CombatantSummary> {
        self.living.iter().find(|c| c.is_enemy)
    }

    pub fn first_living_ally(&self) -> Option<&CombatantSummary> {
        self.living.iter().find(|c| !c.is_enemy)
    }

    pub fn first_living_opposing(&self, is_enemy: bool) -> Option<&CombatantSummary> {
        self.living.iter().find(|c| c.is_enemy != is_enemy)
    }
}

/// A participant in a battle. Implementations own their decision logic; the
/// battle owns their traits' consequences.
pub trait Combatant {
    fn name(&self) -> &str;

    /// Enemies count toward the defeat-all victory condition; non-enemies
    /// count toward the defeat condition.
    fn is_enemy(&self) -> bool;

    fn traits(&self) -> &CombatantTraits;

    fn traits_mut(&mut self) -> &mut CombatantTraits;

    /// Polled once per step while this combatant's turn is active.
    fn take_turn(&mut self, view: &BattleView, input: &InputSnapshot) -> TurnProgress;

    /// Draws the combatant on its assigned platform. Default is invisible.
    fn draw(&mut self, _surface: &mut DrawSurface, _platform: Rect) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_traits_are_slow_and_unkillable() {
        let traits = CombatantTraits::default();
        assert_eq!(traits.speed, 1);
        assert_eq!(traits.hp, i32::MAX);
    }

    #[test]
    fn view_finds_first_of_each_side() {
        let view = BattleView::new(vec![
            CombatantSummary {
                id: CombatantId(0),
                side: Side::Left,
                is_enemy: false,
                speed: 5,
                hp: 10,
            },
            CombatantSummary {
                id: CombatantId(1),
                side: Side::Right,
                is_enemy: true,
                speed: 3,
                hp: 8,
            },
        ]);

        assert_eq!(view.first_living_ally().map(|c| c.id), Some(CombatantId(0)));
        assert_eq!(view.first_living_enemy().map(|c| c.id), Some(CombatantId(1)));
        assert_eq!(
            view.first_living_opposing(true).map(|c| c.id),
            Some(CombatantId(0))
        );
    }

    #[test]
    fn empty_view_has_no_targets() {
        let view = BattleView::default();
        assert!(view.first_living_enemy().is_none());
        assert!(view.first_living_ally().is_none());
    }
}
