//! Exact collision tests between the true shapes.
//!
//! Ellipses are handled in their unit-circle frame: the affine map taking an ellipse onto the
//! unit circle preserves incidence, so segments and polygons stay segments and polygons, and
//! another ellipse stays an ellipse. The frame only decides overlap; near misses are measured
//! again in world units so the tolerance means the same distance for every pair.

use std::f64::consts::TAU;

use super::CollisionDetector;
use crate::geometry::{Ellipse, LineSegment, Point, PolyLine, Polygon, Position, Transform};

/// Default slack, in world units, for shapes lying exactly on a boundary.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

const MAX_BISECTIONS: usize = 256;
const SEARCH_STEPS: usize = 80;
const BOUNDARY_SAMPLES: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FineCollisionDetector {
    tolerance: f64,
}

impl FineCollisionDetector {
    /// Negative tolerances are treated as zero.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn touches_any(&self, position: Position, mut edges: impl Iterator<Item = LineSegment>) -> bool {
        edges.any(|edge| edge.distance_to(position) <= self.tolerance)
    }

    fn polygon_contains(&self, polygon: &Polygon, position: Position) -> bool {
        polygon.contains(position) || self.touches_any(position, polygon.edges())
    }

    fn edges_cross(
        &self,
        mut a: impl Iterator<Item = LineSegment>,
        b: impl Iterator<Item = LineSegment>,
    ) -> bool {
        let b = b.collect::<Vec<_>>();
        a.any(|s| b.iter().any(|t| s.intersects(t, self.tolerance)))
    }

    fn ellipse_contains(&self, ellipse: &Ellipse, position: Position) -> bool {
        match outline(ellipse) {
            Outline::Disk(_) => distance_to_filled(ellipse, position) <= self.tolerance,
            Outline::Segment(axis) => axis.distance_to(position) <= self.tolerance,
        }
    }

    fn segment_reaches_ellipse(&self, segment: &LineSegment, ellipse: &Ellipse) -> bool {
        match outline(ellipse) {
            Outline::Disk(frame) => {
                let mapped = LineSegment::new(frame.apply(segment.start()), frame.apply(segment.end()));
                let reach = mapped.distance_to(Position::ZERO);
                if reach <= 1.0 {
                    return true;
                }
                if !self.within_slack(reach, ellipse) {
                    return false;
                }
                // Distance to a convex set is convex along the segment
                let direction = segment.end() - segment.start();
                let gap = minimize(0.0, 1.0, |t| {
                    distance_to_filled(ellipse, segment.start() + direction * t)
                });
                gap <= self.tolerance
            }
            Outline::Segment(axis) => segment.intersects(&axis, self.tolerance),
        }
    }

    fn ellipses_overlap(&self, a: &Ellipse, b: &Ellipse) -> bool {
        let frame = match (outline(a), outline(b)) {
            (Outline::Segment(axis), _) => return self.segment_reaches_ellipse(&axis, b),
            (_, Outline::Segment(axis)) => return self.segment_reaches_ellipse(&axis, a),
            (Outline::Disk(frame), Outline::Disk(_)) => frame,
        };
        let reach = distance_to_filled(&mapped_ellipse(b, &frame), Position::ZERO);
        if reach <= 1.0 {
            return true;
        }
        self.within_slack(reach, a) && boundary_gap(b, a) <= self.tolerance
    }

    /// Cheap rejection for shapes at `reach` from the origin of the ellipse's unit frame. The
    /// world distance to the ellipse is at least `(reach - 1)` times its minor radius.
    fn within_slack(&self, reach: f64, ellipse: &Ellipse) -> bool {
        let radii = ellipse.radii();
        (reach - 1.0) * radii.x().min(radii.y()) <= self.tolerance
    }
}

impl Default for FineCollisionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

enum Outline {
    Disk(Transform),
    Segment(LineSegment),
}

fn outline(ellipse: &Ellipse) -> Outline {
    match ellipse.unit_frame() {
        Some(frame) => Outline::Disk(frame),
        None => Outline::Segment(ellipse.major_axis()),
    }
}

fn mapped_ellipse(ellipse: &Ellipse, frame: &Transform) -> Ellipse {
    Ellipse::from_linear_map(
        frame.apply(ellipse.position()),
        frame.linear() * ellipse.linear_map(),
    )
}

/// World distance from `position` to the filled ellipse, zero inside.
fn distance_to_filled(ellipse: &Ellipse, position: Position) -> f64 {
    if ellipse.unit_frame().is_none() {
        return ellipse.major_axis().distance_to(position);
    }
    if ellipse.contains(position) {
        return 0.0;
    }

    // Position in the ellipse's own axis-aligned frame
    let local = (position - ellipse.position()).rotate_vector(-ellipse.rotation());
    let radii = ellipse.radii();
    if radii.x() >= radii.y() {
        distance_to_ellipse(radii.x(), radii.y(), local.x().abs(), local.y().abs())
    } else {
        distance_to_ellipse(radii.y(), radii.x(), local.y().abs(), local.x().abs())
    }
}

/// Smallest world distance from the outline of `from` to the filled ellipse `to`.
fn boundary_gap(from: &Ellipse, to: &Ellipse) -> f64 {
    let gap = |t: f64| distance_to_filled(to, boundary_point(from, t));
    let step = TAU / BOUNDARY_SAMPLES as f64;
    let (nearest, _) = (0..BOUNDARY_SAMPLES)
        .map(|i| step * i as f64)
        .map(|t| (t, gap(t)))
        .fold((0.0, f64::INFINITY), |best, sample| {
            if sample.1 < best.1 {
                sample
            } else {
                best
            }
        });
    minimize(nearest - step, nearest + step, gap)
}

fn boundary_point(ellipse: &Ellipse, t: f64) -> Position {
    let radii = ellipse.radii();
    let local = Position::new(radii.x() * t.cos(), radii.y() * t.sin());
    ellipse.position() + local.rotate_vector(ellipse.rotation())
}

/// Ternary search for the minimum of `f` over `[lo, hi]`, where `f` has a single valley.
fn minimize(mut lo: f64, mut hi: f64, f: impl Fn(f64) -> f64) -> f64 {
    let mut best = f(lo).min(f(hi));
    for _ in 0..SEARCH_STEPS {
        let third = (hi - lo) / 3.0;
        let (m0, m1) = (lo + third, hi - third);
        let (f0, f1) = (f(m0), f(m1));
        best = best.min(f0).min(f1);
        if f0 <= f1 {
            hi = m1;
        } else {
            lo = m0;
        }
    }
    best
}

/// Distance from `(y0, y1)` to the ellipse with semi-axes `e0 >= e1 > 0` along x and y, for a
/// point in the first quadrant.
///
/// Eberly, D. (2013). Distance from a point to an ellipse, an ellipsoid, or a hyperellipsoid.
fn distance_to_ellipse(e0: f64, e1: f64, y0: f64, y1: f64) -> f64 {
    if y1 > 0.0 {
        if y0 > 0.0 {
            let z0 = y0 / e0;
            let z1 = y1 / e1;
            let g = z0 * z0 + z1 * z1 - 1.0;
            if g == 0.0 {
                return 0.0;
            }
            let r0 = (e0 / e1).powi(2);
            let s = bisect_root(r0, z0, z1, g);
            let x0 = r0 * y0 / (s + r0);
            let x1 = y1 / (s + 1.0);
            (x0 - y0).hypot(x1 - y1)
        } else {
            (y1 - e1).abs()
        }
    } else {
        let numer0 = e0 * y0;
        let denom0 = e0 * e0 - e1 * e1;
        if numer0 < denom0 {
            let xde0 = numer0 / denom0;
            let x0 = e0 * xde0;
            let x1 = e1 * (1.0 - xde0 * xde0).sqrt();
            (x0 - y0).hypot(x1)
        } else {
            (y0 - e0).abs()
        }
    }
}

fn bisect_root(r0: f64, z0: f64, z1: f64, g: f64) -> f64 {
    let n0 = r0 * z0;
    let mut s0 = z1 - 1.0;
    let mut s1 = if g < 0.0 { 0.0 } else { n0.hypot(z1) - 1.0 };
    let mut s = 0.0;
    for _ in 0..MAX_BISECTIONS {
        s = (s0 + s1) / 2.0;
        if s == s0 || s == s1 {
            break;
        }
        let ratio0 = n0 / (s + r0);
        let ratio1 = z1 / (s + 1.0);
        let g = ratio0 * ratio0 + ratio1 * ratio1 - 1.0;
        if g > 0.0 {
            s0 = s;
        } else if g < 0.0 {
            s1 = s;
        } else {
            break;
        }
    }
    s
}

impl CollisionDetector for FineCollisionDetector {
    fn point_with_point(&self, a: &Point, b: &Point) -> bool {
        a.position() == b.position()
    }

    fn point_with_poly_line(&self, a: &Point, b: &PolyLine) -> bool {
        self.touches_any(a.position(), b.edges())
    }

    fn point_with_polygon(&self, a: &Point, b: &Polygon) -> bool {
        self.polygon_contains(b, a.position())
    }

    fn point_with_ellipse(&self, a: &Point, b: &Ellipse) -> bool {
        self.ellipse_contains(b, a.position())
    }

    fn poly_line_with_point(&self, a: &PolyLine, b: &Point) -> bool {
        self.touches_any(b.position(), a.edges())
    }

    fn poly_line_with_poly_line(&self, a: &PolyLine, b: &PolyLine) -> bool {
        self.edges_cross(a.edges(), b.edges())
    }

    fn poly_line_with_polygon(&self, a: &PolyLine, b: &Polygon) -> bool {
        self.edges_cross(a.edges(), b.edges())
            || a.vertices().iter().any(|v| b.contains(*v))
    }

    fn poly_line_with_ellipse(&self, a: &PolyLine, b: &Ellipse) -> bool {
        a.edges().any(|edge| self.segment_reaches_ellipse(&edge, b))
    }

    fn polygon_with_point(&self, a: &Polygon, b: &Point) -> bool {
        self.polygon_contains(a, b.position())
    }

    fn polygon_with_poly_line(&self, a: &Polygon, b: &PolyLine) -> bool {
        b.vertices().iter().any(|v| a.contains(*v))
            || self.edges_cross(a.edges(), b.edges())
    }

    fn polygon_with_polygon(&self, a: &Polygon, b: &Polygon) -> bool {
        self.edges_cross(a.edges(), b.edges())
            || b.contains(a.vertices()[0])
            || a.contains(b.vertices()[0])
    }

    fn polygon_with_ellipse(&self, a: &Polygon, b: &Ellipse) -> bool {
        self.polygon_contains(a, b.position())
            || a.edges().any(|edge| self.segment_reaches_ellipse(&edge, b))
    }

    fn ellipse_with_point(&self, a: &Ellipse, b: &Point) -> bool {
        self.ellipse_contains(a, b.position())
    }

    fn ellipse_with_poly_line(&self, a: &Ellipse, b: &PolyLine) -> bool {
        b.edges().any(|edge| self.segment_reaches_ellipse(&edge, a))
    }

    fn ellipse_with_polygon(&self, a: &Ellipse, b: &Polygon) -> bool {
        b.edges().any(|edge| self.segment_reaches_ellipse(&edge, a))
            || self.polygon_contains(b, a.position())
    }

    fn ellipse_with_ellipse(&self, a: &Ellipse, b: &Ellipse) -> bool {
        self.ellipses_overlap(a, b)
    }
}
