use std::ops::{Add, Neg, Sub};

/// Immutable 2D value vector. Every operation returns a new vector and never
/// mutates its operands.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

/// Winding of an ordered point triple, by cross-product sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_polar(radius: f32, theta: f32) -> Self {
        Self {
            x: radius * theta.cos(),
            y: radius * theta.sin(),
        }
    }

    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn distance_to(self, other: Vector) -> f32 {
        (self - other).magnitude()
    }

    pub fn midpoint(self, other: Vector) -> Vector {
        Vector::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn dot(self, other: Vector) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn scale(self, factor: f32) -> Vector {
        Vector::new(self.x * factor, self.y * factor)
    }

    pub fn component_mul(self, other: Vector) -> Vector {
        Vector::new(self.x * other.x, self.y * other.y)
    }

    /// Component-wise division. A zero divisor component leaves the matching
    /// component unchanged; this is a guard, not an error.
    pub fn component_div(self, divisor: Vector) -> Vector {
        let x = if divisor.x == 0.0 {
            self.x
        } else {
            self.x / divisor.x
        };
        let y = if divisor.y == 0.0 {
            self.y
        } else {
            self.y / divisor.y
        };
        Vector::new(x, y)
    }

    /// Unit vector in the same direction. The zero vector normalizes to
    /// itself via the zero-divisor guard in [`Vector::component_div`].
    pub fn normalize(self) -> Vector {
        let magnitude = self.magnitude();
        self.component_div(Vector::new(magnitude, magnitude))
    }

    /// Winding of the ordered triple (p, q, r).
    pub fn orientation(p: Vector, q: Vector, r: Vector) -> Orientation {
        let value = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
        if value == 0.0 {
            Orientation::Collinear
        } else if value > 0.0 {
            Orientation::Clockwise
        } else {
            Orientation::CounterClockwise
        }
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}
