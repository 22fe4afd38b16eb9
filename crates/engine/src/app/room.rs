use tracing::debug;

use crate::geometry::{Rect, Vector};

use super::surface::DrawSurface;

/// Static scenery layer. Altitude decides stacking against entities.
#[derive(Debug, Clone)]
pub struct Background {
    pub sprite_label: String,
    pub placement: Rect,
    pub altitude: i32,
}

/// A movable occupant of a room.
#[derive(Debug, Clone)]
pub struct RoomEntity {
    pub label: String,
    pub sprite_label: String,
    pub placement: Rect,
    pub altitude: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawItem {
    Background(usize),
    Entity(usize),
}

/// Composites backgrounds and entities into a single altitude-sorted draw
/// order. Lower altitudes draw first; at equal altitude backgrounds precede
/// entities, and within each group insertion order is preserved. The order is
/// cached and rebuilt lazily after any mutation.
#[derive(Debug, Default)]
pub struct Room {
    label: String,
    backgrounds: Vec<Background>,
    entities: Vec<RoomEntity>,
    draw_order: Option<Vec<DrawItem>>,
}

impl Room {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn add_background(&mut self, background: Background) {
        self.backgrounds.push(background);
        self.draw_order = None;
    }

    pub fn add_entity(&mut self, entity: RoomEntity) {
        self.entities.push(entity);
        self.draw_order = None;
    }

    pub fn add_entities(&mut self, entities: impl IntoIterator<Item = RoomEntity>) {
        self.entities.extend(entities);
        self.draw_order = None;
    }

    pub fn entities(&self) -> &[RoomEntity] {
        &self.entities
    }

    pub fn entity_mut(&mut self, label: &str) -> Option<&mut RoomEntity> {
        // Callers may move or re-layer the entity, so the cache must go.
        self.draw_order = None;
        self.entities.iter_mut().find(|e| e.label == label)
    }

    pub fn remove_entity(&mut self, label: &str) -> Option<RoomEntity> {
        let index = self.entities.iter().position(|e| e.label == label)?;
        self.draw_order = None;
        Some(self.entities.remove(index))
    }

    /// Topmost entity whose placement contains the point, judged by altitude
    /// with later insertion winning ties.
    pub fn entity_at(&self, point: Vector) -> Option<&RoomEntity> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.placement.contains(point))
            .max_by_key(|(index, e)| (e.altitude, *index))
            .map(|(_, e)| e)
    }

    pub fn draw_order(&mut self) -> &[DrawItem] {
        if self.draw_order.is_none() {
            self.draw_order = Some(self.build_draw_order());
            debug!(
                room = self.label.as_str(),
                backgrounds = self.backgrounds.len(),
                entities = self.entities.len(),
                "room_draw_order_rebuilt"
            );
        }
        self.draw_order.as_deref().unwrap_or_default()
    }

    pub fn draw(&mut self, surface: &mut DrawSurface) {
        // Borrow juggling: compute the order first, then walk it against the
        // immutable background/entity slices.
        let order = self.draw_order().to_vec();
        for item in order {
            match item {
                DrawItem::Background(index) => {
                    let background = &self.backgrounds[index];
                    surface.sprite(background.sprite_label.clone(), background.placement);
                }
                DrawItem::Entity(index) => {
                    let entity = &self.entities[index];
                    surface.sprite(entity.sprite_label.clone(), entity.placement);
                }
            }
        }
    }

    fn build_draw_order(&self) -> Vec<DrawItem> {
        let mut items: Vec<(i32, u8, DrawItem)> = Vec::new();
        for (index, background) in self.backgrounds.iter().enumerate() {
            items.push((background.altitude, 0, DrawItem::Background(index)));
        }
        for (index, entity) in self.entities.iter().enumerate() {
            items.push((entity.altitude, 1, DrawItem::Entity(index)));
        }
        // Stable sort keeps insertion order inside each (altitude, kind) tier.
        items.sort_by_key(|(altitude, kind, _)| (*altitude, *kind));
        items.into_iter().map(|(_, _, item)| item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::surface::DrawOp;

    fn background(label: &str, altitude: i32) -> Background {
        Background {
            sprite_label: label.to_string(),
            placement: Rect::new(Vector::ZERO, 100.0, 100.0),
            altitude,
        }
    }

    fn entity(label: &str, altitude: i32) -> RoomEntity {
        RoomEntity {
            label: label.to_string(),
            sprite_label: label.to_string(),
            placement: Rect::new(Vector::new(10.0, 10.0), 20.0, 20.0),
            altitude,
        }
    }

    fn drawn_labels(room: &mut Room) -> Vec<String> {
        let mut surface = DrawSurface::new();
        room.draw(&mut surface);
        surface
            .ops()
            .iter()
            .map(|op| match op {
                DrawOp::Sprite { label, .. } => label.clone(),
                other => panic!("unexpected op {other:?}"),
            })
            .collect()
    }

    #[test]
    fn lower_altitude_draws_first() {
        let mut room = Room::new("test");
        room.add_entity(entity("high", 5));
        room.add_background(background("floor", 0));
        room.add_entity(entity("low", 1));

        assert_eq!(drawn_labels(&mut room), vec!["floor", "low", "high"]);
    }

    #[test]
    fn background_precedes_entity_at_equal_altitude() {
        let mut room = Room::new("test");
        room.add_entity(entity("hero", 2));
        room.add_background(background("bridge", 2));

        assert_eq!(drawn_labels(&mut room), vec!["bridge", "hero"]);
    }

    #[test]
    fn equal_tier_preserves_insertion_order() {
        let mut room = Room::new("test");
        room.add_entity(entity("first", 3));
        room.add_entity(entity("second", 3));
        room.add_entity(entity("third", 3));

        assert_eq!(drawn_labels(&mut room), vec!["first", "second", "third"]);
    }

    #[test]
    fn add_entities_appends_batch_and_invalidates_order() {
        let mut room = Room::new("test");
        room.add_background(background("floor", 0));
        assert_eq!(drawn_labels(&mut room), vec!["floor"]);

        room.add_entities([entity("hero", 1), entity("slime", 2)]);
        assert_eq!(drawn_labels(&mut room), vec!["floor", "hero", "slime"]);
    }

    #[test]
    fn mutation_invalidates_cached_order() {
        let mut room = Room::new("test");
        room.add_entity(entity("hero", 1));
        room.add_background(background("floor", 0));
        assert_eq!(drawn_labels(&mut room), vec!["floor", "hero"]);

        room.add_entity(entity("bird", 10));
        assert_eq!(drawn_labels(&mut room), vec!["floor", "hero", "bird"]);

        if let Some(hero) = room.entity_mut("hero") {
            hero.altitude = 20;
        }
        assert_eq!(drawn_labels(&mut room), vec!["floor", "bird", "hero"]);
    }

    #[test]
    fn entity_at_picks_topmost_hit() {
        let mut room = Room::new("test");
        room.add_entity(entity("under", 1));
        room.add_entity(entity("over", 4));
        room.add_entity(RoomEntity {
            label: "elsewhere".to_string(),
            sprite_label: "elsewhere".to_string(),
            placement: Rect::new(Vector::new(500.0, 500.0), 10.0, 10.0),
            altitude: 99,
        });

        let hit = room.entity_at(Vector::new(15.0, 15.0)).expect("hit");
        assert_eq!(hit.label, "over");
        assert!(room.entity_at(Vector::new(900.0, 900.0)).is_none());
    }

    #[test]
    fn remove_entity_takes_it_out_of_the_order() {
        let mut room = Room::new("test");
        room.add_entity(entity("hero", 1));
        room.add_entity(entity("slime", 2));
        let removed = room.remove_entity("hero").expect("removed");
        assert_eq!(removed.label, "hero");

        assert_eq!(drawn_labels(&mut room), vec!["slime"]);
        assert!(room.remove_entity("hero").is_none());
    }
}
