use super::{Orientation, Vector};

/// Line segment between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub p1: Vector,
    pub p2: Vector,
}

impl Line {
    pub const fn new(p1: Vector, p2: Vector) -> Self {
        Self { p1, p2 }
    }

    /// Whether a point already known to be collinear with this segment lies
    /// within its span. Callers must establish collinearity first.
    pub fn contains_collinear_point(&self, point: Vector) -> bool {
        point.x <= self.p1.x.max(self.p2.x)
            && point.x >= self.p1.x.min(self.p2.x)
            && point.y <= self.p1.y.max(self.p2.y)
            && point.y >= self.p1.y.min(self.p2.y)
    }

    /// Segment intersection: the orientation general case plus the collinear
    /// special cases.
    pub fn intersects(&self, other: &Line) -> bool {
        let o1 = Vector::orientation(self.p1, self.p2, other.p1);
        let o2 = Vector::orientation(self.p1, self.p2, other.p2);
        let o3 = Vector::orientation(other.p1, other.p2, self.p1);
        let o4 = Vector::orientation(other.p1, other.p2, self.p2);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        if o1 == Orientation::Collinear && self.contains_collinear_point(other.p1) {
            return true;
        }
        if o2 == Orientation::Collinear && self.contains_collinear_point(other.p2) {
            return true;
        }
        if o3 == Orientation::Collinear && other.contains_collinear_point(self.p1) {
            return true;
        }
        if o4 == Orientation::Collinear && other.contains_collinear_point(self.p2) {
            return true;
        }

        false
    }
}
