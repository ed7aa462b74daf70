//! The coarse-then-fine detection strategy.

use log::trace;

use super::{
    fine::DEFAULT_TOLERANCE, BoundingCircleCollisionDetector, BoundingRectangleCollisionDetector,
    CollisionDetector, FineCollisionDetector,
};
use crate::geometry::{Ellipse, Point, PolyLine, Polygon};

/// Bounding volume used for the coarse pass.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CoarseVolume {
    #[default]
    Rectangle,
    Circle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    pub coarse: CoarseVolume,
    /// Boundary slack in world units. The coarse volumes are grown by the same amount so the
    /// fine pass sees every pair within reach.
    pub tolerance: f64,
}

impl DetectorConfig {
    pub const fn new(coarse: CoarseVolume, tolerance: f64) -> Self {
        Self { coarse, tolerance }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new(CoarseVolume::Rectangle, DEFAULT_TOLERANCE)
    }
}

/// Runs the exact test only for pairs whose bounding volumes overlap.
///
/// Point–Point is decided by coordinate equality without consulting either detector.
pub struct HybridCollisionDetector {
    coarse: Box<dyn CollisionDetector>,
    fine: Box<dyn CollisionDetector>,
}

impl HybridCollisionDetector {
    pub fn new(coarse: impl CollisionDetector + 'static, fine: impl CollisionDetector + 'static) -> Self {
        Self {
            coarse: Box::new(coarse),
            fine: Box::new(fine),
        }
    }

    pub fn coarse_rectangle() -> Self {
        Self::from_config(&DetectorConfig::new(CoarseVolume::Rectangle, DEFAULT_TOLERANCE))
    }

    pub fn coarse_circle() -> Self {
        Self::from_config(&DetectorConfig::new(CoarseVolume::Circle, DEFAULT_TOLERANCE))
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        let fine = FineCollisionDetector::new(config.tolerance);
        match config.coarse {
            CoarseVolume::Rectangle => Self::new(
                BoundingRectangleCollisionDetector::with_tolerance(config.tolerance),
                fine,
            ),
            CoarseVolume::Circle => Self::new(
                BoundingCircleCollisionDetector::with_tolerance(config.tolerance),
                fine,
            ),
        }
    }

    pub fn coarse(&self) -> &dyn CollisionDetector {
        self.coarse.as_ref()
    }

    pub fn fine(&self) -> &dyn CollisionDetector {
        self.fine.as_ref()
    }

    fn gated(&self, operation: &str, test: impl Fn(&dyn CollisionDetector) -> bool) -> bool {
        if !test(self.coarse.as_ref()) {
            trace!("{operation}: rejected by bounding volumes");
            return false;
        }
        let hit = test(self.fine.as_ref());
        trace!("{operation}: exact test {}", if hit { "hit" } else { "missed" });
        hit
    }
}

impl Default for HybridCollisionDetector {
    fn default() -> Self {
        Self::coarse_rectangle()
    }
}

macro_rules! gated_pairs {
    ($($name:ident($a:ty, $b:ty)),*) => {
        $(
            fn $name(&self, a: &$a, b: &$b) -> bool {
                self.gated(stringify!($name), |detector| detector.$name(a, b))
            }
        )*
    };
}

impl CollisionDetector for HybridCollisionDetector {
    fn point_with_point(&self, a: &Point, b: &Point) -> bool {
        a.position() == b.position()
    }

    gated_pairs!(
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
