pub mod app;
pub mod battle;
pub mod geometry;

pub use app::{
    run_loop, Background, Color, Corner, DrawItem, DrawOp, DrawSurface, Input, InputAction,
    InputSnapshot, Key, LoopConfig, LoopMetrics, Menu, MetricsHandle, ResourceError,
    Resources, Room, RoomEntity, Services, Sprite, SpriteEntry, SpriteManifest, TextAlign,
    TextElement, UiElement, UiOverlay, World, WorldCommand, WorldContext, WorldManager,
    CANVAS_SIZE,
};
pub use battle::{
    BattleError, BattleOutcome, BattleStats, BattleView, BattleWorld, Combatant, CombatantId,
    CombatantSummary, CombatantTraits, Side, TurnAction, TurnProgress, ROSTER_MAX, ROSTER_MIN,
};
pub use geometry::{Line, Orientation, Polygon, Rect, Vector};
