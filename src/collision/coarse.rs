//! Coarse detectors comparing bounding volumes instead of exact geometry.
//!
//! Both detectors are conservative: whenever the exact shapes collide, their bounding volumes
//! collide as well. The converse does not hold. A detector built with a tolerance grows the
//! first volume by it, so it stays conservative for a fine pass using the same tolerance.

use super::{BoundingCircle, CollisionDetector, HasBoundingVolume};
use crate::geometry::{Ellipse, Point, PolyLine, Polygon};

/// Implements every pair operation by comparing the bounding volumes with `$overlap`.
macro_rules! bounding_volume_detector {
    ($detector:ident, $overlap:ident) => {
        impl $detector {
            /// Negative tolerances are treated as zero.
            pub fn with_tolerance(tolerance: f64) -> Self {
                Self {
                    tolerance: tolerance.max(0.0),
                }
            }

            pub fn tolerance(&self) -> f64 {
                self.tolerance
            }
        }

        impl CollisionDetector for $detector {
            bounding_volume_detector!(@pairs $overlap;
                point_with_point(Point, Point),
                point_with_poly_line(Point, PolyLine),
                point_with_polygon(Point, Polygon),
                point_with_ellipse(Point, Ellipse),
                poly_line_with_point(PolyLine, Point),
                poly_line_with_poly_line(PolyLine, PolyLine),
                poly_line_with_polygon(PolyLine, Polygon),
                poly_line_with_ellipse(PolyLine, Ellipse),
                polygon_with_point(Polygon, Point),
                polygon_with_poly_line(Polygon, PolyLine),
                polygon_with_polygon(Polygon, Polygon),
                polygon_with_ellipse(Polygon, Ellipse),
                ellipse_with_point(Ellipse, Point),
                ellipse_with_poly_line(Ellipse, PolyLine),
                ellipse_with_polygon(Ellipse, Polygon),
                ellipse_with_ellipse(Ellipse, Ellipse)
            );
        }
    };
    (@pairs $overlap:ident; $($name:ident($a:ty, $b:ty)),*) => {
        $(
            fn $name(&self, a: &$a, b: &$b) -> bool {
                $overlap(a, b, self.tolerance)
            }
        )*
    };
}

fn rectangles_overlap(a: &impl HasBoundingVolume, b: &impl HasBoundingVolume, tolerance: f64) -> bool {
    a.bounding_rectangle()
        .add_margin(tolerance)
        .collides_with(&b.bounding_rectangle())
}

fn circles_overlap(a: &impl HasBoundingVolume, b: &impl HasBoundingVolume, tolerance: f64) -> bool {
    let circle = a.bounding_circle();
    BoundingCircle::with_radius(circle.center(), circle.radius() + tolerance)
        .collides_with(&b.bounding_circle())
}

/// Compares axis-aligned bounding rectangles.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundingRectangleCollisionDetector {
    tolerance: f64,
}

/// Compares minimal enclosing circles.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundingCircleCollisionDetector {
    tolerance: f64,
}

bounding_volume_detector!(BoundingRectangleCollisionDetector, rectangles_overlap);
bounding_volume_detector!(BoundingCircleCollisionDetector, circles_overlap);
