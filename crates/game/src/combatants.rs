use engine::{
    BattleView, Color, Combatant, CombatantTraits, DrawSurface, InputAction, InputSnapshot, Rect,
    TextAlign, TurnAction, TurnProgress, Vector,
};
use tracing::debug;

use crate::roster::{CombatantKind, CombatantSpec};

const FIGURE_HEIGHT: f32 = 90.0;
const FIGURE_WIDTH: f32 = 70.0;

pub(crate) fn build_combatant(spec: &CombatantSpec) -> Box<dyn Combatant> {
    let traits = CombatantTraits {
        speed: spec.speed,
        hp: spec.hp,
    };
    match spec.kind {
        CombatantKind::Player => Box::new(PlayerCombatant {
            name: spec.name.clone(),
            enemy: spec.enemy,
            traits,
            damage: spec.damage,
            sprite_label: spec.sprite.clone(),
        }),
        CombatantKind::Auto => Box::new(AiCombatant {
            name: spec.name.clone(),
            enemy: spec.enemy,
            traits,
            damage: spec.damage,
            sprite_label: spec.sprite.clone(),
        }),
    }
}

fn figure_rect(platform: Rect) -> Rect {
    let top = platform.top_left + Vector::new((platform.width - FIGURE_WIDTH) / 2.0, -FIGURE_HEIGHT);
    Rect::new(top, FIGURE_WIDTH, FIGURE_HEIGHT)
}

fn draw_figure(surface: &mut DrawSurface, platform: Rect, sprite_label: Option<&str>, name: &str) {
    let figure = figure_rect(platform);
    match sprite_label {
        Some(label) => surface.sprite(label, figure),
        None => surface.fill_rect(figure, Color::GREEN),
    }
    surface.text(
        name,
        platform.center() + Vector::new(0.0, platform.height),
        16.0,
        Color::WHITE,
        TextAlign::Center,
    );
}

/// The player's battle piece. Holds its turn open until the confirm action
/// fires, then attacks the first living opponent.
pub(crate) struct PlayerCombatant {
    name: String,
    enemy: bool,
    traits: CombatantTraits,
    damage: i32,
    sprite_label: Option<String>,
}

impl Combatant for PlayerCombatant {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enemy(&self) -> bool {
        self.enemy
    }

    fn traits(&self) -> &CombatantTraits {
        &self.traits
    }

    fn traits_mut(&mut self) -> &mut CombatantTraits {
        &mut self.traits
    }

    fn take_turn(&mut self, view: &BattleView, input: &InputSnapshot) -> TurnProgress {
        if !input.was_pressed(InputAction::Confirm) {
            return TurnProgress::Pending;
        }
        match view.first_living_opposing(self.enemy) {
            Some(target) => {
                debug!(actor = self.name.as_str(), target = target.id.0, "player_attack");
                TurnProgress::Complete(TurnAction::Attack {
                    target: target.id,
                    damage: self.damage,
                })
            }
            None => TurnProgress::Complete(TurnAction::Pass),
        }
    }

    fn draw(&mut self, surface: &mut DrawSurface, platform: Rect) {
        draw_figure(surface, platform, self.sprite_label.as_deref(), &self.name);
    }
}

/// Script-driven combatant: attacks the first living opponent without waiting
/// on input.
pub(crate) struct AiCombatant {
    name: String,
    enemy: bool,
    traits: CombatantTraits,
    damage: i32,
    sprite_label: Option<String>,
}

impl Combatant for AiCombatant {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enemy(&self) -> bool {
        self.enemy
    }

    fn traits(&self) -> &CombatantTraits {
        &self.traits
    }

    fn traits_mut(&mut self) -> &mut CombatantTraits {
        &mut self.traits
    }

    fn take_turn(&mut self, view: &BattleView, _input: &InputSnapshot) -> TurnProgress {
        match view.first_living_opposing(self.enemy) {
            Some(target) => TurnProgress::Complete(TurnAction::Attack {
                target: target.id,
                damage: self.damage,
            }),
            None => TurnProgress::Complete(TurnAction::Pass),
        }
    }

    fn draw(&mut self, surface: &mut DrawSurface, platform: Rect) {
        draw_figure(surface, platform, self.sprite_label.as_deref(), &self.name);
    }
}
