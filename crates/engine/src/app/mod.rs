mod input;
mod loop_runner;
mod resources;
mod room;
mod surface;
mod ui;
mod world;

pub use input::{Input, InputAction, InputSnapshot, Key};
pub use loop_runner::{run_loop, LoopConfig, LoopMetrics, MetricsHandle, Services};
pub use resources::{ResourceError, Resources, Sprite, SpriteEntry, SpriteManifest};
pub use room::{Background, DrawItem, Room, RoomEntity};
pub use surface::{Color, DrawOp, DrawSurface, TextAlign, CANVAS_SIZE};
pub use ui::{Corner, TextElement, UiElement, UiOverlay};
pub use world::{Menu, World, WorldCommand, WorldContext, WorldManager};
