//! The collision module answers whether two primitives overlap. Bounding volumes give cheap,
//! conservative answers; the fine detector gives exact ones; the hybrid detector chains both.

mod bounding_circle;
mod bounding_rectangle;
mod coarse;
mod detector;
mod fine;
mod hybrid;

use once_cell::sync::Lazy;

pub use bounding_circle::BoundingCircle;
pub use bounding_rectangle::BoundingRectangle;
pub use coarse::{BoundingCircleCollisionDetector, BoundingRectangleCollisionDetector};
pub use detector::{CollisionDetector, HasBoundingVolume};
pub use fine::{FineCollisionDetector, DEFAULT_TOLERANCE};
pub use hybrid::{CoarseVolume, DetectorConfig, HybridCollisionDetector};

/// Shared rectangle-then-exact detector.
pub static DEFAULT_COLLISION_DETECTOR: Lazy<HybridCollisionDetector> =
    Lazy::new(HybridCollisionDetector::default);
