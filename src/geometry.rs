//! The geometry module defines the shapes collision detection works on: basic value types, the
//! four primitive kinds, and the affine transformations that move and deform them.

mod basis;
mod primitive;
mod segment;
mod transform;

pub use basis::{Angle, Position};
pub use primitive::{Ellipse, GeometryError, Point, PolyLine, Polygon, Primitive, PrimitiveKind};
pub use segment::LineSegment;
pub use transform::{Transform, Transformable};
