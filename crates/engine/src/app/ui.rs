use crate::geometry::Vector;

use super::surface::{Color, DrawSurface, TextAlign, CANVAS_SIZE};

const CORNER_MARGIN: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    const fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }

    /// Anchor point in canvas coordinates, inset by the corner margin.
    pub fn anchor(self) -> Vector {
        let far = CANVAS_SIZE - CORNER_MARGIN;
        match self {
            Corner::TopLeft => Vector::new(CORNER_MARGIN, CORNER_MARGIN),
            Corner::TopRight => Vector::new(far, CORNER_MARGIN),
            Corner::BottomLeft => Vector::new(CORNER_MARGIN, far),
            Corner::BottomRight => Vector::new(far, far),
        }
    }
}

/// An overlay widget pinned to one canvas corner.
pub trait UiElement {
    fn step(&mut self, _step_count: u64) {}
    fn draw(&mut self, surface: &mut DrawSurface, anchor: Vector, corner: Corner);
}

/// Four overlay slots drawn on top of whatever world is active. Slots are
/// cleared wholesale on every world transition so no element outlives the
/// world that installed it.
#[derive(Default)]
pub struct UiOverlay {
    corners: [Option<Box<dyn UiElement>>; 4],
}

impl UiOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_corner(&mut self, corner: Corner, element: Box<dyn UiElement>) {
        self.corners[corner.index()] = Some(element);
    }

    pub fn clear_corner(&mut self, corner: Corner) {
        self.corners[corner.index()] = None;
    }

    pub fn clear_all(&mut self) {
        for slot in &mut self.corners {
            *slot = None;
        }
    }

    pub fn has_element(&self, corner: Corner) -> bool {
        self.corners[corner.index()].is_some()
    }

    pub fn step(&mut self, step_count: u64) {
        for slot in self.corners.iter_mut().flatten() {
            slot.step(step_count);
        }
    }

    pub fn draw(&mut self, surface: &mut DrawSurface) {
        for corner in Corner::ALL {
            if let Some(element) = &mut self.corners[corner.index()] {
                element.draw(surface, corner.anchor(), corner);
            }
        }
    }
}

impl std::fmt::Debug for UiOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let occupied: Vec<Corner> = Corner::ALL
            .into_iter()
            .filter(|corner| self.has_element(*corner))
            .collect();
        f.debug_struct("UiOverlay").field("occupied", &occupied).finish()
    }
}

/// Simple static text widget, right-aligned when pinned to a right corner.
#[derive(Debug)]
pub struct TextElement {
    text: String,
    size: f32,
    color: Color,
}

impl TextElement {
    pub fn new(text: impl Into<String>, size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            size,
            color,
        }
    }
}

impl UiElement for TextElement {
    fn draw(&mut self, surface: &mut DrawSurface, anchor: Vector, corner: Corner) {
        let align = match corner {
            Corner::TopLeft | Corner::BottomLeft => TextAlign::Left,
            Corner::TopRight | Corner::BottomRight => TextAlign::Right,
        };
        surface.text(self.text.clone(), anchor, self.size, self.color, align);
    }
}
