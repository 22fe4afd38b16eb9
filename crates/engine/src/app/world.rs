use tracing::{info, warn};

use super::input::Input;
use super::loop_runner::MetricsHandle;
use super::resources::Resources;
use super::surface::DrawSurface;
use super::ui::UiOverlay;

/// Mutable services handed to worlds and menus each step.
pub struct WorldContext<'a> {
    pub input: &'a mut Input,
    pub resources: &'a mut Resources,
    pub ui: &'a mut UiOverlay,
    pub metrics: &'a MetricsHandle,
}

/// What a world wants the manager to do after a step.
pub enum WorldCommand {
    None,
    OpenMenu(Box<dyn Menu>),
    Transition(Box<dyn World>),
    Quit,
}

/// One screen of the game: free roam, a battle, the loading screen. Exactly
/// one world is active at a time; the manager guarantees `exit` runs on the
/// old world before `enter` runs on its replacement.
pub trait World {
    fn label(&self) -> &str;

    fn enter(&mut self, _ctx: &mut WorldContext<'_>) {}

    fn exit(&mut self, _ctx: &mut WorldContext<'_>) {}

    fn step(&mut self, ctx: &mut WorldContext<'_>, step_count: u64) -> WorldCommand;

    fn draw(&mut self, surface: &mut DrawSurface);
}

/// A modal layer stacked on top of the active world. Menus step and draw in
/// stack order and remove themselves by returning `false` from `keep_alive`.
pub trait Menu {
    fn keep_alive(&self) -> bool;

    fn on_open(&mut self, _ctx: &mut WorldContext<'_>) {}

    fn step(&mut self, ctx: &mut WorldContext<'_>, step_count: u64);

    fn draw(&mut self, surface: &mut DrawSurface);
}

/// Owns the active world and the menu stack and drives their lifecycles.
///
/// While any menu is open the world still draws underneath but does not step;
/// input bindings are saved when the first menu opens and restored when the
/// last one closes.
#[derive(Default)]
pub struct WorldManager {
    current: Option<Box<dyn World>>,
    menus: Vec<Box<dyn Menu>>,
}

impl WorldManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_label(&self) -> Option<&str> {
        self.current.as_deref().map(|world| world.label())
    }

    pub fn menu_depth(&self) -> usize {
        self.menus.len()
    }

    /// Swaps the active world: the old world exits exactly once, the UI
    /// overlay and any open menus are cleared, then the new world enters.
    pub fn transition(&mut self, mut next: Box<dyn World>, ctx: &mut WorldContext<'_>) {
        if let Some(mut old) = self.current.take() {
            old.exit(ctx);
            info!(from = old.label(), to = next.label(), "world_transition");
        } else {
            info!(to = next.label(), "world_transition");
        }
        if !self.menus.is_empty() {
            self.menus.clear();
            ctx.input.restore();
        }
        ctx.ui.clear_all();
        next.enter(ctx);
        self.current = Some(next);
    }

    pub fn open_menu(&mut self, mut menu: Box<dyn Menu>, ctx: &mut WorldContext<'_>) {
        if self.menus.is_empty() {
            ctx.input.save();
        }
        menu.on_open(ctx);
        self.menus.push(menu);
        info!(depth = self.menus.len(), "menu_opened");
    }

    /// Advances one simulation step. Returns `true` when the game should quit.
    pub fn step(&mut self, ctx: &mut WorldContext<'_>, step_count: u64) -> bool {
        self.prune_menus(ctx);

        if !self.menus.is_empty() {
            for menu in &mut self.menus {
                menu.step(ctx, step_count);
            }
            self.prune_menus(ctx);
            return false;
        }

        let Some(world) = self.current.as_mut() else {
            warn!("step with no active world");
            return false;
        };
        let command = world.step(ctx, step_count);
        match command {
            WorldCommand::None => false,
            WorldCommand::OpenMenu(menu) => {
                self.open_menu(menu, ctx);
                false
            }
            WorldCommand::Transition(next) => {
                self.transition(next, ctx);
                false
            }
            WorldCommand::Quit => {
                info!(reason = "world_request", "shutdown_requested");
                true
            }
        }
    }

    pub fn draw(&mut self, surface: &mut DrawSurface) {
        if let Some(world) = self.current.as_mut() {
            world.draw(surface);
        }
        for menu in &mut self.menus {
            menu.draw(surface);
        }
    }

    pub fn shutdown(&mut self, ctx: &mut WorldContext<'_>) {
        if !self.menus.is_empty() {
            self.menus.clear();
            ctx.input.restore();
        }
        if let Some(mut world) = self.current.take() {
            world.exit(ctx);
            info!(world = world.label(), "world_shutdown");
        }
    }

    fn prune_menus(&mut self, ctx: &mut WorldContext<'_>) {
        let before = self.menus.len();
        self.menus.retain(|menu| menu.keep_alive());
        if before > 0 && self.menus.is_empty() {
            ctx.input.restore();
        }
    }
}
