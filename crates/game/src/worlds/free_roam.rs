use engine::{
    Background, Color, Corner, DrawSurface, InputAction, Key, Rect, Room, RoomEntity, TextAlign,
    Vector, World, WorldCommand, WorldContext, CANVAS_SIZE,
};
use tracing::{info, warn};

use crate::battle_setup::build_battle;
use crate::hud::{FpsCounter, VersionDisplay};
use crate::menus::PauseMenu;

use super::GameConfig;

const ROOM_SIZE: f32 = 2000.0;
const PLAYER_SIZE: f32 = 80.0;
const PLAYER_SPEED: f32 = 5.0;
/// Half-extent of the central screen region the player can roam without the
/// camera following.
const CAMERA_DEAD_ZONE: f32 = 150.0;
const PLAYER_LABEL: &str = "player";
/// Steps spent moving before a wandering encounter starts.
const ENCOUNTER_TRAVEL_STEPS: u32 = 600;

/// Overworld exploration: one large room, a player entity, and a camera that
/// trails the player with a dead zone.
pub(crate) struct FreeRoamWorld {
    config: GameConfig,
    room: Room,
    player_pos: Vector,
    camera: Vector,
    travel_steps: u32,
}

impl FreeRoamWorld {
    pub(crate) fn new(config: GameConfig) -> Self {
        let player_pos = Vector::new(ROOM_SIZE / 2.0, ROOM_SIZE / 2.0);
        Self {
            config,
            room: Room::new("overworld"),
            player_pos,
            camera: Vector::new(
                ROOM_SIZE / 2.0 - CANVAS_SIZE / 2.0,
                ROOM_SIZE / 2.0 - CANVAS_SIZE / 2.0,
            ),
            travel_steps: 0,
        }
    }

    fn movement_direction(ctx: &WorldContext<'_>) -> Vector {
        let mut direction = Vector::ZERO;
        if ctx.input.is_held(InputAction::MoveUp) {
            direction.y -= 1.0;
        }
        if ctx.input.is_held(InputAction::MoveDown) {
            direction.y += 1.0;
        }
        if ctx.input.is_held(InputAction::MoveLeft) {
            direction.x -= 1.0;
        }
        if ctx.input.is_held(InputAction::MoveRight) {
            direction.x += 1.0;
        }
        direction.normalize()
    }

    fn follow_camera(&mut self) {
        let view_center = self.camera + Vector::new(CANVAS_SIZE / 2.0, CANVAS_SIZE / 2.0);
        let offset = self.player_pos - view_center;

        if offset.x > CAMERA_DEAD_ZONE {
            self.camera.x += offset.x - CAMERA_DEAD_ZONE;
        } else if offset.x < -CAMERA_DEAD_ZONE {
            self.camera.x += offset.x + CAMERA_DEAD_ZONE;
        }
        if offset.y > CAMERA_DEAD_ZONE {
            self.camera.y += offset.y - CAMERA_DEAD_ZONE;
        } else if offset.y < -CAMERA_DEAD_ZONE {
            self.camera.y += offset.y + CAMERA_DEAD_ZONE;
        }

        let max = ROOM_SIZE - CANVAS_SIZE;
        self.camera.x = self.camera.x.clamp(0.0, max);
        self.camera.y = self.camera.y.clamp(0.0, max);
    }

    fn build_room(&mut self, ctx: &mut WorldContext<'_>) {
        self.room = Room::new("overworld");

        // Scenery only appears when its sprite survived loading.
        let backgrounds: [(&str, Rect); 2] = [
            ("floor", Rect::new(Vector::ZERO, ROOM_SIZE, ROOM_SIZE)),
            ("pond", Rect::new(Vector::new(1300.0, 500.0), 320.0, 220.0)),
        ];
        for (label, placement) in backgrounds {
            if ctx.resources.sprite(label).is_none() {
                warn!(sprite = label, "scenery_sprite_missing");
                continue;
            }
            self.room.add_background(Background {
                sprite_label: label.to_string(),
                placement,
                altitude: 0,
            });
        }

        // Trees are entities so they hit-test like any other occupant; their
        // altitude puts their canopy over the player.
        if ctx.resources.sprite("tree").is_some() {
            let tree_spots = [Vector::new(600.0, 700.0), Vector::new(1500.0, 1200.0)];
            self.room
                .add_entities(tree_spots.into_iter().enumerate().map(|(i, at)| RoomEntity {
                    label: format!("tree_{i}"),
                    sprite_label: "tree".to_string(),
                    placement: Rect::new(at, 140.0, 220.0),
                    altitude: 2,
                }));
        } else {
            warn!(sprite = "tree", "scenery_sprite_missing");
        }

        self.room.add_entity(RoomEntity {
            label: PLAYER_LABEL.to_string(),
            sprite_label: "hero".to_string(),
            placement: Rect::from_center(self.player_pos, PLAYER_SIZE, PLAYER_SIZE),
            altitude: 1,
        });
    }
}

impl World for FreeRoamWorld {
    fn label(&self) -> &str {
        "free_roam"
    }

    fn enter(&mut self, ctx: &mut WorldContext<'_>) {
        ctx.input.save();
        ctx.input.clear_bindings();
        ctx.input.bind(Key::W, InputAction::MoveUp);
        ctx.input.bind(Key::Up, InputAction::MoveUp);
        ctx.input.bind(Key::S, InputAction::MoveDown);
        ctx.input.bind(Key::Down, InputAction::MoveDown);
        ctx.input.bind(Key::A, InputAction::MoveLeft);
        ctx.input.bind(Key::Left, InputAction::MoveLeft);
        ctx.input.bind(Key::D, InputAction::MoveRight);
        ctx.input.bind(Key::Right, InputAction::MoveRight);
        ctx.input.bind(Key::Escape, InputAction::OpenMenu);

        self.build_room(ctx);
        ctx.ui
            .set_corner(Corner::TopRight, Box::new(FpsCounter::new(ctx.metrics.clone())));
        ctx.ui
            .set_corner(Corner::BottomRight, Box::new(VersionDisplay::new()));
        info!(room = self.room.label(), "free_roam_entered");
    }

    fn exit(&mut self, ctx: &mut WorldContext<'_>) {
        ctx.input.restore();
    }

    fn step(&mut self, ctx: &mut WorldContext<'_>, _step_count: u64) -> WorldCommand {
        if ctx.input.was_pressed(InputAction::OpenMenu) {
            return WorldCommand::OpenMenu(Box::new(PauseMenu::new()));
        }

        let direction = Self::movement_direction(ctx);
        if direction != Vector::ZERO {
            let half = PLAYER_SIZE / 2.0;
            self.player_pos = self.player_pos + direction.scale(PLAYER_SPEED);
            self.player_pos.x = self.player_pos.x.clamp(half, ROOM_SIZE - half);
            self.player_pos.y = self.player_pos.y.clamp(half, ROOM_SIZE - half);

            let placement = Rect::from_center(self.player_pos, PLAYER_SIZE, PLAYER_SIZE);
            if let Some(player) = self.room.entity_mut(PLAYER_LABEL) {
                player.placement = placement;
            }
            self.follow_camera();

            self.travel_steps += 1;
            if self.travel_steps >= ENCOUNTER_TRAVEL_STEPS {
                self.travel_steps = 0;
                match build_battle(&self.config, ctx.resources) {
                    Ok(battle) => {
                        info!("wandering_encounter");
                        return WorldCommand::Transition(Box::new(battle));
                    }
                    Err(error) => warn!(error = error.as_str(), "encounter_setup_failed"),
                }
            }
        }
        WorldCommand::None
    }

    fn draw(&mut self, surface: &mut DrawSurface) {
        surface.push_offset(-self.camera);
        self.room.draw(surface);
        surface.pop_offset();

        surface.text(
            "wasd to move, esc to pause",
            Vector::new(CANVAS_SIZE / 2.0, CANVAS_SIZE - 30.0),
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
    }

    fn world() -> FreeRoamWorld {
        FreeRoamWorld::new(GameConfig {
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
    fn held_movement_moves_the_player() {
        let mut harness = Harness::new();
        let mut world = world();
        world.enter(&mut harness.ctx());
        let start = world.player_pos;

        harness.input.feed_key(Key::D, true);
        harness.input.step();
        world.step(&mut harness.ctx(), 0);
        harness.input.step();
        world.step(&mut harness.ctx(), 1);

        assert!((world.player_pos.x - (start.x + 2.0 * PLAYER_SPEED)).abs() < 0.001);
        assert_eq!(world.player_pos.y, start.y);
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut harness = Harness::new();
        let mut world = world();
        world.enter(&mut harness.ctx());
        let start = world.player_pos;

        harness.input.feed_key(Key::D, true);
        harness.input.feed_key(Key::S, true);
        harness.input.step();
        world.step(&mut harness.ctx(), 0);

        let moved = world.player_pos - start;
        assert!((moved.magnitude() - PLAYER_SPEED).abs() < 0.001);
        assert!(moved.x > 0.0 && moved.y > 0.0);
    }

    #[test]
    fn camera_stays_put_inside_dead_zone() {
        let mut harness = Harness::new();
        let mut world = world();
        world.enter(&mut harness.ctx());
        let camera_start = world.camera;

        // A few steps right keeps the player well inside the dead zone.
        harness.input.feed_key(Key::D, true);
        for step in 0..5 {
            harness.input.step();
            world.step(&mut harness.ctx(), step);
        }
        assert_eq!(world.camera, camera_start);
    }

    #[test]
    fn camera_follows_once_player_leaves_dead_zone() {
        let mut harness = Harness::new();
        let mut world = world();
        world.enter(&mut harness.ctx());
        let camera_start = world.camera;

        harness.input.feed_key(Key::D, true);
        let steps_needed = (CAMERA_DEAD_ZONE / PLAYER_SPEED) as u64 + 5;
        for step in 0..steps_needed {
            harness.input.step();
            world.step(&mut harness.ctx(), step);
        }
        assert!(world.camera.x > camera_start.x);
        assert_eq!(world.camera.y, camera_start.y);
    }

    #[test]
    fn long_travel_triggers_an_encounter() {
        let mut harness = Harness::new();
        let mut world = world();
        world.enter(&mut harness.ctx());

        harness.input.feed_key(Key::D, true);
        let mut encountered = false;
        for step in 0..u64::from(ENCOUNTER_TRAVEL_STEPS) + 1 {
            harness.input.step();
            if let WorldCommand::Transition(next) = world.step(&mut harness.ctx(), step) {
                assert_eq!(next.label(), "battle");
                encountered = true;
                break;
            }
        }
        assert!(encountered);
    }

    #[test]
    fn escape_opens_the_pause_menu() {
        let mut harness = Harness::new();
        let mut world = world();
        world.enter(&mut harness.ctx());

        harness.input.feed_key(Key::Escape, true);
        harness.input.step();
        match world.step(&mut harness.ctx(), 0) {
            WorldCommand::OpenMenu(_) => {}
            _ => panic!("expected pause menu"),
        }
    }
}
