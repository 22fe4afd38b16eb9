use super::{Line, Orientation, Vector};

/// Ordered vertex list. Insertion order is winding order; the polygon is
/// treated as implicitly closed once it has at least three vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    points: Vec<Vector>,
}

impl Polygon {
    pub fn new(points: Vec<Vector>) -> Self {
        Self { points }
    }

    pub fn push_points(&mut self, points: impl IntoIterator<Item = Vector>) {
        self.points.extend(points);
    }

    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    /// Even-odd ray-casting containment against a rightward horizontal ray.
    /// Edges are counted half-open in y, so a vertex that lies exactly on the
    /// ray is crossed by exactly one of its two incident edges. A query point
    /// collinear with an edge resolves by direct segment membership.
    pub fn contains(&self, point: Vector) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut crossings = 0usize;

        for i in 0..n {
            let p1 = self.points[i];
            let p2 = self.points[(i + 1) % n];
            if Vector::orientation(p1, point, p2) == Orientation::Collinear {
                if Line::new(p1, p2).contains_collinear_point(point) {
                    return true;
                }
                continue;
            }
            if (p1.y > point.y) != (p2.y > point.y) {
                let t = (point.y - p1.y) / (p2.y - p1.y);
                let crossing_x = p1.x + t * (p2.x - p1.x);
                if crossing_x > point.x {
                    crossings += 1;
                }
            }
        }

        crossings % 2 == 1
    }
}
