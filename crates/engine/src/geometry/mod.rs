//! Plane geometry value types used for placement and collision boundaries.

mod line;
mod polygon;
mod rect;
mod vector;

pub use line::Line;
pub use polygon::Polygon;
pub use rect::Rect;
pub use vector::{Orientation, Vector};
