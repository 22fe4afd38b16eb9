use super::Vector;

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top_left: Vector,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(top_left: Vector, width: f32, height: f32) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    pub fn from_center(center: Vector, width: f32, height: f32) -> Self {
        Self {
            top_left: center - Vector::new(width / 2.0, height / 2.0),
            width,
            height,
        }
    }

    pub fn center(&self) -> Vector {
        self.top_left + Vector::new(self.width / 2.0, self.height / 2.0)
    }

    /// Point containment, inclusive of all four edges.
    pub fn contains(&self, point: Vector) -> bool {
        let bottom_right = self.top_left + Vector::new(self.width, self.height);
        point.x >= self.top_left.x
            && point.x <= bottom_right.x
            && point.y >= self.top_left.y
            && point.y <= bottom_right.y
    }

    pub fn translated(&self, offset: Vector) -> Rect {
        Rect::new(self.top_left + offset, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_interior_point() {
        let rect = Rect::new(Vector::new(0.0, 0.0), 10.0, 4.0);
        assert!(rect.contains(Vector::new(5.0, 2.0)));
    }

    #[test]
    fn contains_is_inclusive_of_edges_and_corners() {
        let rect = Rect::new(Vector::new(1.0, 1.0), 4.0, 4.0);
        assert!(rect.contains(Vector::new(1.0, 3.0)));
        assert!(rect.contains(Vector::new(5.0, 3.0)));
        assert!(rect.contains(Vector::new(3.0, 1.0)));
        assert!(rect.contains(Vector::new(3.0, 5.0)));
        assert!(rect.contains(Vector::new(1.0, 1.0)));
        assert!(rect.contains(Vector::new(5.0, 5.0)));
    }

    #[test]
    fn rejects_points_outside() {
        let rect = Rect::new(Vector::new(0.0, 0.0), 2.0, 2.0);
        assert!(!rect.contains(Vector::new(2.01, 1.0)));
        assert!(!rect.contains(Vector::new(-0.01, 1.0)));
        assert!(!rect.contains(Vector::new(1.0, 2.01)));
    }

    #[test]
    fn center_and_from_center_round_trip() {
        let rect = Rect::from_center(Vector::new(10.0, 20.0), 6.0, 4.0);
        assert_eq!(rect.top_left, Vector::new(7.0, 18.0));
        assert_eq!(rect.center(), Vector::new(10.0, 20.0));
    }
}
