//! Line segments, the edges every exact test is built from.

use super::Position;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct LineSegment {
    p1: Position,
    p2: Position,
}

impl LineSegment {
    pub fn new(p1: Position, p2: Position) -> Self {
        Self { p1, p2 }
    }

    pub fn start(&self) -> Position {
        self.p1
    }

    pub fn end(&self) -> Position {
        self.p2
    }

    pub fn closest_point(&self, position: Position) -> Position {
        let direction = self.p2 - self.p1;
        let length_squared = direction.dot(direction);
        if length_squared == 0.0 {
            return self.p1;
        }
        let t = ((position - self.p1).dot(direction) / length_squared).clamp(0.0, 1.0);
        self.p1 + direction * t
    }

    pub fn distance_to(&self, position: Position) -> f64 {
        position.distance(self.closest_point(position))
    }

    /// Check if two segments share at least one point, allowing `tolerance` for touching and
    /// collinear overlap.
    pub fn intersects(&self, other: &LineSegment, tolerance: f64) -> bool {
        let d1 = orientation(other.p1, other.p2, self.p1);
        let d2 = orientation(other.p1, other.p2, self.p2);
        let d3 = orientation(self.p1, self.p2, other.p1);
        let d4 = orientation(self.p1, self.p2, other.p2);

        if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
            // Proper crossing
            return true;
        }

        self.distance_to(other.p1) <= tolerance
            || self.distance_to(other.p2) <= tolerance
            || other.distance_to(self.p1) <= tolerance
            || other.distance_to(self.p2) <= tolerance
    }
}

fn orientation(a: Position, b: Position, c: Position) -> f64 {
    (b - a).cross(c - a)
}
