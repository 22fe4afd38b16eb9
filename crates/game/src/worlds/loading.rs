use engine::{
    Color, DrawSurface, Rect, TextAlign, Vector, World, WorldCommand, WorldContext, CANVAS_SIZE,
};
use tracing::info;

use super::{GameConfig, MainMenuWorld};

/// Sprites admitted per step while the loading screen is up.
const LOAD_BUDGET_PER_STEP: usize = 2;
/// Progress close enough to complete to move on; guards against float
/// accumulation ever leaving the bar a hair short of 1.0.
const COMPLETE_THRESHOLD: f32 = 0.99;

/// First world shown: drains the sprite manifest a few entries per step and
/// hands off to the main menu once everything is in.
pub(crate) struct LoadingWorld {
    config: Option<GameConfig>,
    progress: f32,
}

impl LoadingWorld {
    pub(crate) fn new(config: GameConfig) -> Self {
        Self {
            config: Some(config),
            progress: 0.0,
        }
    }
}

impl World for LoadingWorld {
    fn label(&self) -> &str {
        "loading"
    }

    fn step(&mut self, ctx: &mut WorldContext<'_>, _step_count: u64) -> WorldCommand {
        ctx.resources.poll_load(LOAD_BUDGET_PER_STEP);
        self.progress = ctx.resources.progress();

        if self.progress >= COMPLETE_THRESHOLD {
            let Some(config) = self.config.take() else {
                return WorldCommand::None;
            };
            info!("loading_complete");
            return WorldCommand::Transition(Box::new(MainMenuWorld::new(config)));
        }
        WorldCommand::None
    }

    fn draw(&mut self, surface: &mut DrawSurface) {
        let bar_outline = Rect::from_center(
            Vector::new(CANVAS_SIZE / 2.0, CANVAS_SIZE / 2.0),
            400.0,
            30.0,
        );
        surface.stroke_rect(bar_outline, Color::WHITE, 2.0);
        surface.fill_rect(
            Rect::new(
                bar_outline.top_left,
                bar_outline.width * self.progress.clamp(0.0, 1.0),
                bar_outline.height,
            ),
            Color::WHITE,
        );
        surface.text(
            format!("loading {:.0}%", self.progress * 100.0),
            bar_outline.center() + Vector::new(0.0, 50.0),
            20.0,
            Color::WHITE,
            TextAlign::Center,
        );
    }
}
