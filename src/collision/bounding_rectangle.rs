//! Axis-aligned bounding rectangles.

use crate::geometry::Position;

/// An axis-aligned rectangle given by its four corners.
///
/// The corners always form an axis-aligned box: the top corners share their y coordinate, the
/// left corners share their x coordinate, and so on. Size and center are derived once at
/// construction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingRectangle {
    top_left: Position,
    top_right: Position,
    bottom_right: Position,
    bottom_left: Position,
    size: Position,
    center: Position,
}

impl BoundingRectangle {
    pub const ZERO: BoundingRectangle = BoundingRectangle {
        top_left: Position::ZERO,
        top_right: Position::ZERO,
        bottom_right: Position::ZERO,
        bottom_left: Position::ZERO,
        size: Position::ZERO,
        center: Position::ZERO,
    };

    pub fn new(
        top_left: Position,
        top_right: Position,
        bottom_right: Position,
        bottom_left: Position,
    ) -> Self {
        let size = bottom_right - top_left;
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            size,
            center: top_left + size / 2.0,
        }
    }

    /// Constructs a rectangle from its top-left and bottom-right corners.
    ///
    /// The corners are taken as given: if `bottom_right` is not below and to the right of
    /// `top_left`, the resulting size is negative. Use [`BoundingRectangle::enclosing`] for
    /// corners of unknown order.
    pub fn from_two_points(top_left: Position, bottom_right: Position) -> Self {
        let top_right = Position::new(bottom_right.x(), top_left.y());
        let bottom_left = Position::new(top_left.x(), bottom_right.y());
        Self::new(top_left, top_right, bottom_right, bottom_left)
    }

    /// Constructs the rectangle spanned by two opposite corners in any order.
    pub fn enclosing(a: Position, b: Position) -> Self {
        Self::from_two_points(a.min(b), a.max(b))
    }

    /// Smallest rectangle containing every position, or [`BoundingRectangle::ZERO`] if there
    /// are none.
    pub fn from_positions(positions: impl IntoIterator<Item = Position>) -> Self {
        let mut positions = positions.into_iter();
        let Some(first) = positions.next() else {
            return Self::ZERO;
        };
        let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Self::from_two_points(min, max)
    }

    /// Smallest rectangle containing every rectangle, or [`BoundingRectangle::ZERO`] if there
    /// are none.
    pub fn from_rectangles(rectangles: impl IntoIterator<Item = BoundingRectangle>) -> Self {
        rectangles
            .into_iter()
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Self::ZERO)
    }

    pub fn top_left(&self) -> Position {
        self.top_left
    }

    pub fn top_right(&self) -> Position {
        self.top_right
    }

    pub fn bottom_right(&self) -> Position {
        self.bottom_right
    }

    pub fn bottom_left(&self) -> Position {
        self.bottom_left
    }

    pub fn size(&self) -> Position {
        self.size
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn corners(&self) -> [Position; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    pub fn union(&self, other: &BoundingRectangle) -> Self {
        Self::from_two_points(
            self.top_left.min(other.top_left),
            self.bottom_right.max(other.bottom_right),
        )
    }

    pub fn translate(&self, delta: Position) -> Self {
        Self::new(
            self.top_left + delta,
            self.top_right + delta,
            self.bottom_right + delta,
            self.bottom_left + delta,
        )
    }

    /// Expands every side outwards by `margin`.
    pub fn add_margin(&self, margin: f64) -> Self {
        let offset = Position::new(margin, margin);
        Self::from_two_points(self.top_left - offset, self.bottom_right + offset)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x() >= self.top_left.x()
            && position.x() <= self.bottom_right.x()
            && position.y() >= self.top_left.y()
            && position.y() <= self.bottom_right.y()
    }

    /// Check if two rectangles overlap. Touching edges count as overlap.
    pub fn collides_with(&self, other: &BoundingRectangle) -> bool {
        !(self.bottom_right.x() < other.top_left.x()
            || other.bottom_right.x() < self.top_left.x()
            || self.bottom_right.y() < other.top_left.y()
            || other.bottom_right.y() < self.top_left.y())
    }
}
