use crate::geometry::{Rect, Vector};

/// Side length of the logical square canvas. All placement math targets this
/// coordinate space regardless of any output size.
pub const CANVAS_SIZE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::opaque(0, 0, 0);
    pub const WHITE: Color = Color::opaque(255, 255, 255);
    pub const RED: Color = Color::opaque(214, 40, 40);
    pub const GREEN: Color = Color::opaque(60, 179, 113);
    pub const GRAY: Color = Color::opaque(128, 128, 128);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One recorded drawing command in canvas coordinates, offsets already applied.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Sprite {
        label: String,
        placement: Rect,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f32,
    },
    Text {
        text: String,
        at: Vector,
        size: f32,
        color: Color,
        align: TextAlign,
    },
    PolygonOutline {
        points: Vec<Vector>,
        color: Color,
    },
}

/// Records draw commands for one presentation pass. Worlds and UI elements draw
/// through this instead of touching any output device; a frontend replays the
/// recorded ops however it likes. An offset stack shifts subsequent commands,
/// which is how cameras and anchored UI corners are expressed.
#[derive(Debug, Default)]
pub struct DrawSurface {
    ops: Vec<DrawOp>,
    offset: Vector,
    offset_stack: Vec<Vector>,
}

impl DrawSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.offset = Vector::ZERO;
        self.offset_stack.clear();
    }

    /// Pushes an additional translation applied to every op recorded until the
    /// matching [`pop_offset`](Self::pop_offset).
    pub fn push_offset(&mut self, offset: Vector) {
        self.offset_stack.push(self.offset);
        self.offset = self.offset + offset;
    }

    pub fn pop_offset(&mut self) {
        if let Some(previous) = self.offset_stack.pop() {
            self.offset = previous;
        }
    }

    pub fn sprite(&mut self, label: impl Into<String>, placement: Rect) {
        self.ops.push(DrawOp::Sprite {
            label: label.into(),
            placement: self.shift_rect(placement),
        });
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect {
            rect: self.shift_rect(rect),
            color,
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.ops.push(DrawOp::StrokeRect {
            rect: self.shift_rect(rect),
            color,
            line_width,
        });
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        at: Vector,
        size: f32,
        color: Color,
        align: TextAlign,
    ) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            at: at + self.offset,
            size,
            color,
            align,
        });
    }

    pub fn polygon_outline(&mut self, points: &[Vector], color: Color) {
        self.ops.push(DrawOp::PolygonOutline {
            points: points.iter().map(|p| *p + self.offset).collect(),
            color,
        });
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    fn shift_rect(&self, rect: Rect) -> Rect {
        rect.translated(self.offset)
    }
}
