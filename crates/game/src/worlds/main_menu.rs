use engine::{
    Color, Corner, DrawSurface, InputAction, Key, Rect, TextAlign, Vector, World, WorldCommand,
    WorldContext, CANVAS_SIZE,
};
use tracing::{error, info, warn};

use crate::battle_setup::build_battle;
use crate::hud::VersionDisplay;

use super::{FreeRoamWorld, GameConfig};

const LOGO_SPRITE: &str = "logo";
const MENU_ITEMS: [&str; 3] = ["Free Roam", "Battle", "Quit"];

pub(crate) struct MainMenuWorld {
    config: GameConfig,
    selected: usize,
    has_logo: bool,
    error_text: Option<String>,
}

impl MainMenuWorld {
    pub(crate) fn new(config: GameConfig) -> Self {
        Self {
            config,
            selected: 0,
            has_logo: false,
            error_text: None,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = MENU_ITEMS.len() as isize;
        self.selected = ((self.selected as isize + delta).rem_euclid(len)) as usize;
    }

    fn confirm(&mut self, ctx: &mut WorldContext<'_>) -> WorldCommand {
        match MENU_ITEMS[self.selected] {
            "Free Roam" => {
                WorldCommand::Transition(Box::new(FreeRoamWorld::new(self.config.clone())))
            }
            "Battle" => match build_battle(&self.config, ctx.resources) {
                Ok(battle) => WorldCommand::Transition(Box::new(battle)),
                Err(message) => {
                    error!(error = message.as_str(), "battle_setup_failed");
                    self.error_text = Some(message);
                    WorldCommand::None
                }
            },
            _ => WorldCommand::Quit,
        }
    }
}

impl World for MainMenuWorld {
    fn label(&self) -> &str {
        "main_menu"
    }

    fn enter(&mut self, ctx: &mut WorldContext<'_>) {
        ctx.input.save();
        ctx.input.clear_bindings();
        ctx.input.bind(Key::Up, InputAction::MoveUp);
        ctx.input.bind(Key::W, InputAction::MoveUp);
        ctx.input.bind(Key::Down, InputAction::MoveDown);
        ctx.input.bind(Key::S, InputAction::MoveDown);
        ctx.input.bind(Key::Enter, InputAction::Confirm);
        ctx.input.bind(Key::Space, InputAction::Confirm);
        ctx.input.bind(Key::Escape, InputAction::Quit);

        self.has_logo = match ctx.resources.require_sprite(LOGO_SPRITE) {
            Ok(_) => true,
            Err(error) => {
                warn!(error = %error, "menu_logo_unavailable");
                false
            }
        };
        ctx.ui
            .set_corner(Corner::BottomRight, Box::new(VersionDisplay::new()));
        info!("main_menu_opened");
    }

    fn exit(&mut self, ctx: &mut WorldContext<'_>) {
        ctx.input.restore();
    }

    fn step(&mut self, ctx: &mut WorldContext<'_>, _step_count: u64) -> WorldCommand {
        if ctx.input.was_pressed(InputAction::MoveUp) {
            self.move_selection(-1);
        }
        if ctx.input.was_pressed(InputAction::MoveDown) {
            self.move_selection(1);
        }
        if ctx.input.was_pressed(InputAction::Quit) {
            return WorldCommand::Quit;
        }
        if ctx.input.was_pressed(InputAction::Confirm) {
            return self.confirm(ctx);
        }
        WorldCommand::None
    }

    fn draw(&mut self, surface: &mut DrawSurface) {
        if self.has_logo {
            surface.sprite(
                LOGO_SPRITE,
                Rect::from_center(Vector::new(CANVAS_SIZE / 2.0, 220.0), 480.0, 160.0),
            );
        } else {
            surface.text(
                "Turnfell",
                Vector::new(CANVAS_SIZE / 2.0, 240.0),
                72.0,
                Color::WHITE,
                TextAlign::Center,
            );
        }

        for (index, item) in MENU_ITEMS.iter().enumerate() {
            let at = Vector::new(CANVAS_SIZE / 2.0, 460.0 + index as f32 * 70.0);
            let (text, color) = if index == self.selected {
                (format!("> {item} <"), Color::WHITE)
            } else {
                (item.to_string(), Color::GRAY)
            };
            surface.text(text, at, 32.0, color, TextAlign::Center);
        }

        if let Some(message) = &self.error_text {
            surface.text(
                message.clone(),
                Vector::new(CANVAS_SIZE / 2.0, CANVAS_SIZE - 80.0),
                18.0,
                Color::RED,
                TextAlign::Center,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::{Input, MetricsHandle, Resources, UiOverlay};

    use super::*;
    use crate::roster::RosterConfig;

    struct Harness {
        input: Input,
        resources: Resources,
        ui: UiOverlay,
        metrics: MetricsHandle,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                input: Input::new(),
                resources: Resources::default(),
                ui: UiOverlay::new(),
                metrics: MetricsHandle::default(),
            }
        }

        fn ctx(&mut self) -> WorldContext<'_> {
            WorldContext {
                input: &mut self.input,
                resources: &mut self.resources,
                ui: &mut self.ui,
                metrics: &self.metrics,
            }
        }

        fn press(&mut self, key: Key) {
            self.input.feed_key(key, true);
            self.input.step();
            self.input.feed_key(key, false);
        }
    }

    fn menu() -> MainMenuWorld {
        MainMenuWorld::new(GameConfig {
            roster: RosterConfig::from_json(
                r#"{
                    "left": [ { "name": "Aster", "kind": "player" } ],
                    "right": [ { "name": "Slime", "kind": "auto", "enemy": true } ]
                }"#,
            )
            .expect("roster"),
        })
    }

    #[test]
    fn selection_wraps_both_directions() {
        let mut harness = Harness::new();
        let mut world = menu();
        world.enter(&mut harness.ctx());

        harness.press(Key::Up);
        world.step(&mut harness.ctx(), 0);
        assert_eq!(world.selected, MENU_ITEMS.len() - 1);

        harness.press(Key::Down);
        world.step(&mut harness.ctx(), 1);
        assert_eq!(world.selected, 0);
    }

    #[test]
    fn confirm_on_free_roam_transitions() {
        let mut harness = Harness::new();
        let mut world = menu();
        world.enter(&mut harness.ctx());

        harness.press(Key::Enter);
        match world.step(&mut harness.ctx(), 0) {
            WorldCommand::Transition(next) => assert_eq!(next.label(), "free_roam"),
            _ => panic!("expected transition to free roam"),
        }
    }

    #[test]
    fn battle_with_no_sprites_shows_error_and_stays() {
        let mut harness = Harness::new();
        let mut world = menu();
        // Give the roster a sprite the registry does not have.
        world.config.roster.left[0].sprite = Some("hero".to_string());
        world.enter(&mut harness.ctx());

        harness.press(Key::Down);
        world.step(&mut harness.ctx(), 0);
        harness.press(Key::Enter);
        match world.step(&mut harness.ctx(), 1) {
            WorldCommand::None => {}
            _ => panic!("expected to stay on the menu"),
        }
        assert!(world.error_text.is_some());
    }

    #[test]
    fn quit_item_quits() {
        let mut harness = Harness::new();
        let mut world = menu();
        world.enter(&mut harness.ctx());

        harness.press(Key::Up);
        world.step(&mut harness.ctx(), 0);
        harness.press(Key::Enter);
        match world.step(&mut harness.ctx(), 1) {
            WorldCommand::Quit => {}
            _ => panic!("expected quit"),
        }
    }
}
