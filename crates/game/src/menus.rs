use engine::{
    Color, DrawSurface, InputAction, Key, Menu, Rect, TextAlign, Vector, WorldContext, CANVAS_SIZE,
};
use tracing::info;

/// Modal pause layer opened from free roam. Takes over input while open;
/// cancel closes it and hands the bindings back.
pub(crate) struct PauseMenu {
    alive: bool,
}

impl PauseMenu {
    pub(crate) fn new() -> Self {
        Self { alive: true }
    }
}

impl Menu for PauseMenu {
    fn keep_alive(&self) -> bool {
        self.alive
    }

    fn on_open(&mut self, ctx: &mut WorldContext<'_>) {
        ctx.input.clear_bindings();
        ctx.input.bind(Key::Escape, InputAction::Cancel);
        ctx.input.bind(Key::Enter, InputAction::Cancel);
    }

    fn step(&mut self, ctx: &mut WorldContext<'_>, _step_count: u64) {
        if ctx.input.was_pressed(InputAction::Cancel) {
            self.alive = false;
            info!("pause_menu_closed");
        }
    }

    fn draw(&mut self, surface: &mut DrawSurface) {
        let panel = Rect::from_center(
            Vector::new(CANVAS_SIZE / 2.0, CANVAS_SIZE / 2.0),
            360.0,
            160.0,
        );
        surface.fill_rect(panel, Color::BLACK.with_alpha(210));
        surface.stroke_rect(panel, Color::WHITE, 2.0);
        surface.text(
            "Paused",
            panel.center() + Vector::new(0.0, -20.0),
            32.0,
            Color::WHITE,
            TextAlign::Center,
        );
        surface.text(
            "press escape to resume",
            panel.center() + Vector::new(0.0, 30.0),
            16.0,
            Color::GRAY,
            TextAlign::Center,
        );
    }
}

#[cfg(test)]
mod tests {
    use engine::{Input, MetricsHandle, Resources, UiOverlay};

    use super::*;

    #[test]
    fn cancel_closes_the_menu() {
        let mut input = Input::new();
        let mut resources = Resources::default();
        let mut ui = UiOverlay::new();
        let metrics = MetricsHandle::default();
        let mut menu = PauseMenu::new();

        {
            let mut ctx = WorldContext {
                input: &mut input,
                resources: &mut resources,
                ui: &mut ui,
                metrics: &metrics,
            };
            menu.on_open(&mut ctx);
        }
        assert!(menu.keep_alive());

        input.feed_key(Key::Escape, true);
        input.step();
        let mut ctx = WorldContext {
            input: &mut input,
            resources: &mut resources,
            ui: &mut ui,
            metrics: &metrics,
        };
        menu.step(&mut ctx, 0);
        assert!(!menu.keep_alive());
    }
}
