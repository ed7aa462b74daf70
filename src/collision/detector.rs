//! The collision detector capability.

use super::{BoundingCircle, BoundingRectangle};
use crate::geometry::{Ellipse, Point, PolyLine, Polygon, Primitive};

pub trait HasBoundingVolume {
    fn bounding_rectangle(&self) -> BoundingRectangle;

    fn bounding_circle(&self) -> BoundingCircle;
}

/// Pairwise collision tests between every ordered pair of primitive kinds.
///
/// Each of the sixteen operations is implemented separately, including the mirrored pairs.
/// [`CollisionDetector::collides_with`] dispatches two [`Primitive`]s onto the matching
/// operation. Detectors hold no mutable state.
pub trait CollisionDetector: Send + Sync {
    fn point_with_point(&self, a: &Point, b: &Point) -> bool;
    fn point_with_poly_line(&self, a: &Point, b: &PolyLine) -> bool;
    fn point_with_polygon(&self, a: &Point, b: &Polygon) -> bool;
    fn point_with_ellipse(&self, a: &Point, b: &Ellipse) -> bool;

    fn poly_line_with_point(&self, a: &PolyLine, b: &Point) -> bool;
    fn poly_line_with_poly_line(&self, a: &PolyLine, b: &PolyLine) -> bool;
    fn poly_line_with_polygon(&self, a: &PolyLine, b: &Polygon) -> bool;
    fn poly_line_with_ellipse(&self, a: &PolyLine, b: &Ellipse) -> bool;

    fn polygon_with_point(&self, a: &Polygon, b: &Point) -> bool;
    fn polygon_with_poly_line(&self, a: &Polygon, b: &PolyLine) -> bool;
    fn polygon_with_polygon(&self, a: &Polygon, b: &Polygon) -> bool;
    fn polygon_with_ellipse(&self, a: &Polygon, b: &Ellipse) -> bool;

    fn ellipse_with_point(&self, a: &Ellipse, b: &Point) -> bool;
    fn ellipse_with_poly_line(&self, a: &Ellipse, b: &PolyLine) -> bool;
    fn ellipse_with_polygon(&self, a: &Ellipse, b: &Polygon) -> bool;
    fn ellipse_with_ellipse(&self, a: &Ellipse, b: &Ellipse) -> bool;

    fn collides_with(&self, a: &Primitive, b: &Primitive) -> bool {
        match (a, b) {
            (Primitive::Point(a), Primitive::Point(b)) => self.point_with_point(a, b),
            (Primitive::Point(a), Primitive::PolyLine(b)) => self.point_with_poly_line(a, b),
            (Primitive::Point(a), Primitive::Polygon(b)) => self.point_with_polygon(a, b),
            (Primitive::Point(a), Primitive::Ellipse(b)) => self.point_with_ellipse(a, b),

            (Primitive::PolyLine(a), Primitive::Point(b)) => self.poly_line_with_point(a, b),
            (Primitive::PolyLine(a), Primitive::PolyLine(b)) => self.poly_line_with_poly_line(a, b),
            (Primitive::PolyLine(a), Primitive::Polygon(b)) => self.poly_line_with_polygon(a, b),
            (Primitive::PolyLine(a), Primitive::Ellipse(b)) => self.poly_line_with_ellipse(a, b),

            (Primitive::Polygon(a), Primitive::Point(b)) => self.polygon_with_point(a, b),
            (Primitive::Polygon(a), Primitive::PolyLine(b)) => self.polygon_with_poly_line(a, b),
            (Primitive::Polygon(a), Primitive::Polygon(b)) => self.polygon_with_polygon(a, b),
            (Primitive::Polygon(a), Primitive::Ellipse(b)) => self.polygon_with_ellipse(a, b),

            (Primitive::Ellipse(a), Primitive::Point(b)) => self.ellipse_with_point(a, b),
            (Primitive::Ellipse(a), Primitive::PolyLine(b)) => self.ellipse_with_poly_line(a, b),
            (Primitive::Ellipse(a), Primitive::Polygon(b)) => self.ellipse_with_polygon(a, b),
            (Primitive::Ellipse(a), Primitive::Ellipse(b)) => self.ellipse_with_ellipse(a, b),
        }
    }
}
