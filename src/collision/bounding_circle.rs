//! Bounding circles.

use crate::geometry::{GeometryError, Position};

/// A circle enclosing a shape, given by its center and a non-negative radius.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingCircle {
    center: Position,
    radius: f64,
}

impl BoundingCircle {
    pub fn new(center: Position, radius: f64) -> Result<Self, GeometryError> {
        if !center.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }

    /// Caller guarantees `radius >= 0`.
    pub(crate) fn with_radius(center: Position, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn point(center: Position) -> Self {
        Self::with_radius(center, 0.0)
    }

    /// Minimal circle enclosing every position. An empty input yields a zero circle at the
    /// origin.
    pub fn enclosing(positions: &[Position]) -> Self {
        let Some(&first) = positions.first() else {
            return Self::default();
        };

        let mut circle = Self::point(first);
        for (i, &p) in positions.iter().enumerate().skip(1) {
            if circle.encloses(p) {
                continue;
            }
            circle = Self::point(p);
            for (j, &q) in positions[..i].iter().enumerate() {
                if circle.encloses(q) {
                    continue;
                }
                circle = Self::from_diameter(p, q);
                for &r in &positions[..j] {
                    if !circle.encloses(r) {
                        circle = Self::circumscribing(p, q, r);
                    }
                }
            }
        }
        circle
    }

    fn from_diameter(a: Position, b: Position) -> Self {
        Self::with_radius((a + b) / 2.0, a.distance(b) / 2.0)
    }

    fn circumscribing(a: Position, b: Position, c: Position) -> Self {
        let ab = b - a;
        let ac = c - a;
        let d = 2.0 * ab.cross(ac);
        if d.abs() <= f64::EPSILON * (ab.dot(ab) + ac.dot(ac)) {
            // Collinear, the farthest pair spans the circle
            return [
                Self::from_diameter(a, b),
                Self::from_diameter(a, c),
                Self::from_diameter(b, c),
            ]
            .into_iter()
            .max_by(|x, y| x.radius.total_cmp(&y.radius))
            .unwrap_or_else(|| Self::point(a));
        }
        let offset = Position::new(
            (ac.y() * ab.dot(ab) - ab.y() * ac.dot(ac)) / d,
            (ab.x() * ac.dot(ac) - ac.x() * ab.dot(ab)) / d,
        );
        Self::with_radius(a + offset, offset.length())
    }

    // Relative slack so points used to build the circle count as inside it.
    fn encloses(&self, position: Position) -> bool {
        self.center.distance(position) <= self.radius + 1e-9 * (1.0 + self.radius)
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn translate(&self, delta: Position) -> Self {
        Self {
            center: self.center + delta,
            radius: self.radius,
        }
    }

    /// Check if a position lies inside the circle, boundary included.
    pub fn contains(&self, position: Position) -> bool {
        (position - self.center).length() <= self.radius
    }

    /// Check if two circles overlap. Touching circles count as overlap.
    pub fn collides_with(&self, other: &BoundingCircle) -> bool {
        self.center.distance(other.center) <= self.radius + other.radius
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, AbsDiffEq};
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use super::*;

    fn circle(x: f64, y: f64, radius: f64) -> BoundingCircle {
        BoundingCircle::new(Position::new(x, y), radius).unwrap()
    }

    #[rstest]
    #[case::negative(-1.0)]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    fn test_new_rejects_invalid_radius(#[case] radius: f64) {
        assert!(matches!(
            BoundingCircle::new(Position::ZERO, radius),
            Err(GeometryError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_new_rejects_non_finite_center() {
        assert!(matches!(
            BoundingCircle::new(Position::new(f64::NAN, 0.0), 1.0),
            Err(GeometryError::NonFiniteCoordinate)
        ));
    }

    #[rstest]
    #[case::center(Position::new(1.0, 1.0), true)]
    #[case::inside(Position::new(2.0, 1.5), true)]
    #[case::boundary(Position::new(3.0, 1.0), true)]
    #[case::outside(Position::new(3.0, 1.1), false)]
    fn test_contains(#[case] position: Position, #[case] expected: bool) {
        assert_eq!(circle(1.0, 1.0, 2.0).contains(position), expected);
    }

    #[test]
    fn test_translate() {
        let translated = circle(1.0, 2.0, 3.0).translate(Position::new(-1.0, 0.5));
        assert_abs_diff_eq!(translated.center(), Position::new(0.0, 2.5));
        assert_abs_diff_eq!(translated.radius(), 3.0);
    }

    #[test]
    fn test_translation_commutes() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..100 {
            let c = circle(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(0.0..5.0),
            );
            let d1 = Position::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
            let d2 = Position::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
            assert_abs_diff_eq!(c.translate(d1).translate(d2), c.translate(d1 + d2), epsilon = 1e-12);
        }
    }

    #[rstest]
    #[case::overlapping(circle(0.0, 0.0, 1.0), circle(1.0, 0.0, 1.0), true)]
    #[case::touching(circle(0.0, 0.0, 1.0), circle(2.0, 0.0, 1.0), true)]
    #[case::apart(circle(0.0, 0.0, 1.0), circle(3.0, 0.0, 1.0), false)]
    #[case::nested(circle(0.0, 0.0, 5.0), circle(1.0, 1.0, 0.5), true)]
    fn test_collides_with(
        #[case] a: BoundingCircle,
        #[case] b: BoundingCircle,
        #[case] expected: bool,
    ) {
        assert_eq!(a.collides_with(&b), expected);
        assert_eq!(b.collides_with(&a), expected);
    }

    #[rstest]
    #[case::single(vec![Position::new(2.0, 3.0)], circle(2.0, 3.0, 0.0))]
    #[case::pair(vec![Position::new(0.0, 0.0), Position::new(4.0, 0.0)], circle(2.0, 0.0, 2.0))]
    #[case::right_triangle(
        vec![Position::new(0.0, 0.0), Position::new(4.0, 0.0), Position::new(0.0, 3.0)],
        circle(2.0, 1.5, 2.5)
    )]
    #[case::square(
        vec![
            Position::new(0.0, 0.0),
            Position::new(2.0, 0.0),
            Position::new(2.0, 2.0),
            Position::new(0.0, 2.0),
        ],
        circle(1.0, 1.0, 2.0_f64.sqrt())
    )]
    #[case::interior_point_ignored(
        vec![Position::new(-1.0, 0.0), Position::new(0.1, 0.2), Position::new(1.0, 0.0)],
        circle(0.0, 0.0, 1.0)
    )]
    #[case::collinear(
        vec![Position::new(0.0, 0.0), Position::new(1.0, 1.0), Position::new(3.0, 3.0)],
        circle(1.5, 1.5, 4.5_f64.sqrt())
    )]
    fn test_enclosing(#[case] positions: Vec<Position>, #[case] expected: BoundingCircle) {
        assert_abs_diff_eq!(BoundingCircle::enclosing(&positions), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_enclosing_contains_every_position() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let positions = (0..rng.random_range(1..20))
                .map(|_| Position::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0)))
                .collect::<Vec<_>>();
            let enclosing = BoundingCircle::enclosing(&positions);
            for p in &positions {
                assert!(enclosing.center().distance(*p) <= enclosing.radius() + 1e-6);
            }
        }
    }

    impl AbsDiffEq for BoundingCircle {
        type Epsilon = f64;

        fn default_epsilon() -> f64 {
            f64::EPSILON
        }

        fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
            Position::abs_diff_eq(&self.center, &other.center, epsilon)
                && f64::abs_diff_eq(&self.radius, &other.radius, epsilon)
        }
    }
}
