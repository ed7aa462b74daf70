//! The primitive shapes collision detection operates on.

use std::{fmt, slice::Iter};

use nalgebra::{Matrix2, SymmetricEigen};
use thiserror::Error;

use super::{Angle, LineSegment, Position, Transform, Transformable};
use crate::collision::{BoundingCircle, BoundingRectangle, CollisionDetector, HasBoundingVolume};

const DEGENERATE_TOLERANCE: f64 = 1e-9;

#[derive(Error, Debug, PartialEq)]
pub enum GeometryError {
    #[error("{kind} requires at least {required} vertices, got {actual}")]
    TooFewVertices {
        kind: PrimitiveKind,
        required: usize,
        actual: usize,
    },
    #[error("invalid radius {0}")]
    InvalidRadius(f64),
    #[error("coordinates must be finite")]
    NonFiniteCoordinate,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum PrimitiveKind {
    Point,
    PolyLine,
    Polygon,
    Ellipse,
}

impl PrimitiveKind {
    pub fn iter() -> Iter<'static, PrimitiveKind> {
        static KINDS: [PrimitiveKind; 4] = [
            PrimitiveKind::Point,
            PrimitiveKind::PolyLine,
            PrimitiveKind::Polygon,
            PrimitiveKind::Ellipse,
        ];
        KINDS.iter()
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::Point => "point",
            PrimitiveKind::PolyLine => "polyline",
            PrimitiveKind::Polygon => "polygon",
            PrimitiveKind::Ellipse => "ellipse",
        };
        f.write_str(name)
    }
}

fn validated(
    kind: PrimitiveKind,
    vertices: Vec<Position>,
    required: usize,
) -> Result<Vec<Position>, GeometryError> {
    if vertices.len() < required {
        return Err(GeometryError::TooFewVertices {
            kind,
            required,
            actual: vertices.len(),
        });
    }
    if !vertices.iter().all(Position::is_finite) {
        return Err(GeometryError::NonFiniteCoordinate);
    }
    Ok(vertices)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    position: Position,
}

impl Point {
    pub const fn new(position: Position) -> Self {
        Self { position }
    }

    pub const fn at(x: f64, y: f64) -> Self {
        Self::new(Position::new(x, y))
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

/// An open chain of line segments.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyLine {
    vertices: Vec<Position>,
}

impl PolyLine {
    pub fn new(vertices: Vec<Position>) -> Result<Self, GeometryError> {
        Ok(Self {
            vertices: validated(PrimitiveKind::PolyLine, vertices, 2)?,
        })
    }

    pub fn vertices(&self) -> &[Position] {
        &self.vertices
    }

    pub fn edges(&self) -> impl Iterator<Item = LineSegment> + '_ {
        self.vertices
            .windows(2)
            .map(|pair| LineSegment::new(pair[0], pair[1]))
    }
}

/// A closed polygon. The last vertex connects back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Position>,
}

impl Polygon {
    pub fn new(vertices: Vec<Position>) -> Result<Self, GeometryError> {
        Ok(Self {
            vertices: validated(PrimitiveKind::Polygon, vertices, 3)?,
        })
    }

    /// Axis-aligned rectangle, vertices in clockwise screen order starting at the top left.
    pub fn rectangle(top_left: Position, size: Position) -> Result<Self, GeometryError> {
        Self::new(vec![
            top_left,
            top_left + Position::new(size.x(), 0.0),
            top_left + size,
            top_left + Position::new(0.0, size.y()),
        ])
    }

    pub fn vertices(&self) -> &[Position] {
        &self.vertices
    }

    pub fn edges(&self) -> impl Iterator<Item = LineSegment> + '_ {
        let closing = self.vertices.last().copied().zip(self.vertices.first().copied());
        self.vertices
            .windows(2)
            .map(|pair| LineSegment::new(pair[0], pair[1]))
            .chain(closing.map(|(last, first)| LineSegment::new(last, first)))
    }

    /// Even-odd test for the interior. Points exactly on an edge may go either way.
    pub fn contains(&self, position: Position) -> bool {
        let mut inside = false;
        let mut previous = self.vertices[self.vertices.len() - 1];
        for &current in &self.vertices {
            if (current.y() > position.y()) != (previous.y() > position.y()) {
                let x = (previous.x() - current.x()) * (position.y() - current.y())
                    / (previous.y() - current.y())
                    + current.x();
                if position.x() < x {
                    inside = !inside;
                }
            }
            previous = current;
        }
        inside
    }
}

/// An ellipse with semi-axes `radii` rotated by `rotation` around its center `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    position: Position,
    radii: Position,
    rotation: Angle,
}

impl Ellipse {
    pub fn new(position: Position, radii: Position, rotation: Angle) -> Result<Self, GeometryError> {
        if !position.is_finite() || !f64::from(rotation).is_finite() {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        for radius in [radii.x(), radii.y()] {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(GeometryError::InvalidRadius(radius));
            }
        }
        Ok(Self {
            position,
            radii,
            rotation,
        })
    }

    pub fn circle(center: Position, radius: f64) -> Result<Self, GeometryError> {
        Self::new(center, Position::new(radius, radius), Angle::default())
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn radii(&self) -> Position {
        self.radii
    }

    pub fn rotation(&self) -> Angle {
        self.rotation
    }

    /// Linear part of the map taking the unit circle onto this ellipse.
    pub fn linear_map(&self) -> Matrix2<f64> {
        let (sin, cos) = f64::from(self.rotation).sin_cos();
        Matrix2::new(cos, -sin, sin, cos) * Matrix2::new(self.radii.x(), 0.0, 0.0, self.radii.y())
    }

    /// The ellipse `{position + l * u : |u| <= 1}`. Any invertible or singular `l` is accepted,
    /// the axes are recovered from the eigen-decomposition of `l * lᵀ`.
    pub fn from_linear_map(position: Position, l: Matrix2<f64>) -> Self {
        let eigen = SymmetricEigen::new(l * l.transpose());
        let axis = eigen.eigenvectors.column(0);
        Self {
            position,
            radii: Position::new(
                eigen.eigenvalues[0].max(0.0).sqrt(),
                eigen.eigenvalues[1].max(0.0).sqrt(),
            ),
            rotation: Angle::new(axis[1].atan2(axis[0])),
        }
    }

    /// Transform taking this ellipse onto the unit circle at the origin, if it is not
    /// degenerate.
    pub fn unit_frame(&self) -> Option<Transform> {
        let (small, large) = (
            self.radii.x().min(self.radii.y()),
            self.radii.x().max(self.radii.y()),
        );
        if small <= large * DEGENERATE_TOLERANCE {
            return None;
        }
        Transform::from_linear(self.linear_map(), self.position).inverse()
    }

    /// Segment through the center along the longer axis. A degenerate ellipse collapses onto
    /// it.
    pub fn major_axis(&self) -> LineSegment {
        let half = if self.radii.x() >= self.radii.y() {
            Position::new(self.radii.x(), 0.0)
        } else {
            Position::new(0.0, self.radii.y())
        }
        .rotate_vector(self.rotation);
        LineSegment::new(self.position - half, self.position + half)
    }

    pub fn contains(&self, position: Position) -> bool {
        match self.unit_frame() {
            Some(frame) => frame.apply(position).length() <= 1.0,
            None => self.major_axis().distance_to(position) <= DEGENERATE_TOLERANCE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Point(Point),
    PolyLine(PolyLine),
    Polygon(Polygon),
    Ellipse(Ellipse),
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Point(_) => PrimitiveKind::Point,
            Primitive::PolyLine(_) => PrimitiveKind::PolyLine,
            Primitive::Polygon(_) => PrimitiveKind::Polygon,
            Primitive::Ellipse(_) => PrimitiveKind::Ellipse,
        }
    }

    pub fn collides_with(&self, other: &Primitive, detector: &dyn CollisionDetector) -> bool {
        detector.collides_with(self, other)
    }
}

impl From<Point> for Primitive {
    fn from(value: Point) -> Self {
        Primitive::Point(value)
    }
}

impl From<PolyLine> for Primitive {
    fn from(value: PolyLine) -> Self {
        Primitive::PolyLine(value)
    }
}

impl From<Polygon> for Primitive {
    fn from(value: Polygon) -> Self {
        Primitive::Polygon(value)
    }
}

impl From<Ellipse> for Primitive {
    fn from(value: Ellipse) -> Self {
        Primitive::Ellipse(value)
    }
}

impl HasBoundingVolume for Point {
    fn bounding_rectangle(&self) -> BoundingRectangle {
        BoundingRectangle::from_two_points(self.position, self.position)
    }

    fn bounding_circle(&self) -> BoundingCircle {
        BoundingCircle::point(self.position)
    }
}

impl HasBoundingVolume for PolyLine {
    fn bounding_rectangle(&self) -> BoundingRectangle {
        BoundingRectangle::from_positions(self.vertices.iter().copied())
    }

    fn bounding_circle(&self) -> BoundingCircle {
        BoundingCircle::enclosing(&self.vertices)
    }
}

impl HasBoundingVolume for Polygon {
    fn bounding_rectangle(&self) -> BoundingRectangle {
        BoundingRectangle::from_positions(self.vertices.iter().copied())
    }

    fn bounding_circle(&self) -> BoundingCircle {
        BoundingCircle::enclosing(&self.vertices)
    }
}

impl HasBoundingVolume for Ellipse {
    fn bounding_rectangle(&self) -> BoundingRectangle {
        let (sin, cos) = f64::from(self.rotation).sin_cos();
        let (rx, ry) = (self.radii.x(), self.radii.y());
        let half = Position::new(
            (rx * cos).hypot(ry * sin),
            (rx * sin).hypot(ry * cos),
        );
        BoundingRectangle::from_two_points(self.position - half, self.position + half)
    }

    fn bounding_circle(&self) -> BoundingCircle {
        BoundingCircle::with_radius(self.position, self.radii.x().max(self.radii.y()))
    }
}

impl HasBoundingVolume for Primitive {
    fn bounding_rectangle(&self) -> BoundingRectangle {
        match self {
            Primitive::Point(p) => p.bounding_rectangle(),
            Primitive::PolyLine(p) => p.bounding_rectangle(),
            Primitive::Polygon(p) => p.bounding_rectangle(),
            Primitive::Ellipse(p) => p.bounding_rectangle(),
        }
    }

    fn bounding_circle(&self) -> BoundingCircle {
        match self {
            Primitive::Point(p) => p.bounding_circle(),
            Primitive::PolyLine(p) => p.bounding_circle(),
            Primitive::Polygon(p) => p.bounding_circle(),
            Primitive::Ellipse(p) => p.bounding_circle(),
        }
    }
}

impl Transformable for Point {
    fn transform(&mut self, transform: &Transform) {
        self.position = transform.apply(self.position);
    }

    fn translate(&mut self, delta: Position) {
        self.position = self.position + delta;
    }

    fn pivot(&self) -> Position {
        self.position
    }
}

impl Transformable for PolyLine {
    fn transform(&mut self, transform: &Transform) {
        self.vertices
            .iter_mut()
            .for_each(|v| *v = transform.apply(*v));
    }

    fn translate(&mut self, delta: Position) {
        self.vertices.iter_mut().for_each(|v| *v = *v + delta);
    }

    fn pivot(&self) -> Position {
        self.bounding_rectangle().center()
    }
}

impl Transformable for Polygon {
    fn transform(&mut self, transform: &Transform) {
        self.vertices
            .iter_mut()
            .for_each(|v| *v = transform.apply(*v));
    }

    fn translate(&mut self, delta: Position) {
        self.vertices.iter_mut().for_each(|v| *v = *v + delta);
    }

    fn pivot(&self) -> Position {
        self.bounding_rectangle().center()
    }
}

impl Transformable for Ellipse {
    fn transform(&mut self, transform: &Transform) {
        *self = Ellipse::from_linear_map(
            transform.apply(self.position),
            transform.linear() * self.linear_map(),
        );
    }

    fn translate(&mut self, delta: Position) {
        self.position = self.position + delta;
    }

    fn pivot(&self) -> Position {
        self.position
    }
}

impl Transformable for Primitive {
    fn transform(&mut self, transform: &Transform) {
        match self {
            Primitive::Point(p) => p.transform(transform),
            Primitive::PolyLine(p) => p.transform(transform),
            Primitive::Polygon(p) => p.transform(transform),
            Primitive::Ellipse(p) => p.transform(transform),
        }
    }

    fn translate(&mut self, delta: Position) {
        match self {
            Primitive::Point(p) => p.translate(delta),
            Primitive::PolyLine(p) => p.translate(delta),
            Primitive::Polygon(p) => p.translate(delta),
            Primitive::Ellipse(p) => p.translate(delta),
        }
    }

    fn pivot(&self) -> Position {
        match self {
            Primitive::Point(p) => p.pivot(),
            Primitive::PolyLine(p) => p.pivot(),
            Primitive::Polygon(p) => p.pivot(),
            Primitive::Ellipse(p) => p.pivot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::rectangle(Position::new(x, y), Position::new(size, size)).unwrap()
    }

    #[rstest]
    #[case::polyline(PolyLine::new(vec![Position::ZERO]).map(Primitive::from), PrimitiveKind::PolyLine, 2, 1)]
    #[case::polygon(
        Polygon::new(vec![Position::ZERO, Position::new(1.0, 0.0)]).map(Primitive::from),
        PrimitiveKind::Polygon,
        3,
        2
    )]
    fn test_too_few_vertices(
        #[case] result: Result<Primitive, GeometryError>,
        #[case] kind: PrimitiveKind,
        #[case] required: usize,
        #[case] actual: usize,
    ) {
        assert_eq!(
            result,
            Err(GeometryError::TooFewVertices {
                kind,
                required,
                actual
            })
        );
    }

    #[test]
    fn test_error_message() {
        let error = PolyLine::new(vec![]).unwrap_err();
        assert_eq!(error.to_string(), "polyline requires at least 2 vertices, got 0");
    }

    #[test]
    fn test_non_finite_vertices() {
        assert_eq!(
            Polygon::new(vec![Position::ZERO, Position::new(1.0, f64::NAN), Position::new(0.0, 1.0)]),
            Err(GeometryError::NonFiniteCoordinate)
        );
    }

    #[rstest]
    #[case::zero(Position::new(0.0, 1.0))]
    #[case::negative(Position::new(1.0, -2.0))]
    #[case::infinite(Position::new(f64::INFINITY, 1.0))]
    fn test_ellipse_rejects_invalid_radii(#[case] radii: Position) {
        assert!(matches!(
            Ellipse::new(Position::ZERO, radii, Angle::default()),
            Err(GeometryError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_polygon_edges() {
        let polygon = Polygon::new(vec![
            Position::new(0.1, 0.2),
            Position::new(0.3, 0.2),
            Position::new(0.3, 0.4),
        ])
        .unwrap();

        let edges = polygon.edges().collect::<Vec<_>>();
        let expected = vec![
            LineSegment::new(Position::new(0.1, 0.2), Position::new(0.3, 0.2)),
            LineSegment::new(Position::new(0.3, 0.2), Position::new(0.3, 0.4)),
            LineSegment::new(Position::new(0.3, 0.4), Position::new(0.1, 0.2)),
        ];
        assert_eq!(edges.len(), expected.len());
        for (edge, expected) in std::iter::zip(edges, expected) {
            assert_abs_diff_eq!(edge, expected);
        }
    }

    #[test]
    fn test_polyline_edges_are_open() {
        let polyline = PolyLine::new(vec![
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(polyline.edges().count(), 2);
    }

    #[rstest]
    #[case::inside(Position::new(1.0, 1.0), true)]
    #[case::outside(Position::new(3.0, 1.0), false)]
    #[case::notch(Position::new(1.0, 2.5), false)]
    #[case::arm(Position::new(0.25, 3.5), true)]
    fn test_polygon_contains(#[case] position: Position, #[case] expected: bool) {
        // U shape opening downwards
        let polygon = Polygon::new(vec![
            Position::new(0.0, 0.0),
            Position::new(2.0, 0.0),
            Position::new(2.0, 4.0),
            Position::new(1.5, 4.0),
            Position::new(1.5, 2.0),
            Position::new(0.5, 2.0),
            Position::new(0.5, 4.0),
            Position::new(0.0, 4.0),
        ])
        .unwrap();
        assert_eq!(polygon.contains(position), expected);
    }

    #[test]
    fn test_bounding_rectangles() {
        let polyline: Primitive = PolyLine::new(vec![
            Position::new(3.0, -1.0),
            Position::new(-2.0, 4.0),
        ])
        .unwrap()
        .into();
        assert_eq!(
            polyline.bounding_rectangle(),
            BoundingRectangle::from_two_points(Position::new(-2.0, -1.0), Position::new(3.0, 4.0))
        );

        let point: Primitive = Point::at(1.0, 2.0).into();
        assert_eq!(point.bounding_rectangle().size(), Position::ZERO);
        assert_eq!(point.bounding_circle().radius(), 0.0);
    }

    #[rstest]
    #[case::axis_aligned(Angle::new(0.0), Position::new(3.0, 1.0))]
    #[case::quarter_turn(Angle::from_deg(90.0), Position::new(1.0, 3.0))]
    #[case::diagonal(Angle::new(FRAC_PI_4), Position::new(5.0_f64.sqrt(), 5.0_f64.sqrt()))]
    fn test_ellipse_bounding_rectangle(#[case] rotation: Angle, #[case] half: Position) {
        let center = Position::new(10.0, -4.0);
        let ellipse = Ellipse::new(center, Position::new(3.0, 1.0), rotation).unwrap();
        let rectangle = ellipse.bounding_rectangle();
        assert_abs_diff_eq!(rectangle.top_left(), center - half, epsilon = EPSILON);
        assert_abs_diff_eq!(rectangle.bottom_right(), center + half, epsilon = EPSILON);
        assert_abs_diff_eq!(ellipse.bounding_circle().radius(), 3.0);
    }

    #[test]
    fn test_ellipse_contains() {
        let ellipse = Ellipse::new(Position::ZERO, Position::new(2.0, 1.0), Angle::from_deg(90.0)).unwrap();
        assert!(ellipse.contains(Position::new(0.0, 1.9)));
        assert!(ellipse.contains(Position::new(0.9, 0.0)));
        assert!(!ellipse.contains(Position::new(1.5, 0.0)));
    }

    #[test]
    fn test_translate_primitives() {
        let mut polygon: Primitive = square(0.0, 0.0, 1.0).into();
        polygon.translate(Position::new(2.0, 3.0));
        assert_eq!(polygon, Primitive::from(square(2.0, 3.0, 1.0)));

        let mut ellipse = Ellipse::circle(Position::ZERO, 1.0).unwrap();
        ellipse.translate(Position::new(-1.0, 1.0));
        assert_eq!(ellipse.position(), Position::new(-1.0, 1.0));
    }

    #[test]
    fn test_rotate_polygon_about_pivot() {
        let mut polygon = Polygon::rectangle(Position::ZERO, Position::new(4.0, 2.0)).unwrap();
        polygon.rotate(Angle::from_deg(90.0));
        let rectangle = polygon.bounding_rectangle();
        assert_abs_diff_eq!(rectangle.top_left(), Position::new(1.0, -1.0), epsilon = EPSILON);
        assert_abs_diff_eq!(rectangle.bottom_right(), Position::new(3.0, 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_scale_polyline_about_pivot() {
        let mut polyline = PolyLine::new(vec![Position::new(0.0, 0.0), Position::new(2.0, 2.0)]).unwrap();
        polyline.scale(Position::new(2.0, 0.5));
        assert_abs_diff_eq!(polyline.vertices()[0], Position::new(-1.0, 0.5), epsilon = EPSILON);
        assert_abs_diff_eq!(polyline.vertices()[1], Position::new(3.0, 1.5), epsilon = EPSILON);
    }

    #[test]
    fn test_scale_ellipse() {
        let mut ellipse = Ellipse::circle(Position::new(1.0, 1.0), 1.0).unwrap();
        ellipse.scale(Position::new(3.0, 1.0));
        let rectangle = ellipse.bounding_rectangle();
        assert_abs_diff_eq!(rectangle.size(), Position::new(6.0, 2.0), epsilon = EPSILON);
        assert_abs_diff_eq!(ellipse.position(), Position::new(1.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_ellipse_matches_rotated_construction() {
        let mut ellipse = Ellipse::new(Position::ZERO, Position::new(3.0, 1.0), Angle::new(0.0)).unwrap();
        ellipse.rotate(Angle::from_deg(30.0));
        let expected = Ellipse::new(Position::ZERO, Position::new(3.0, 1.0), Angle::from_deg(30.0))
            .unwrap()
            .bounding_rectangle();
        assert_abs_diff_eq!(ellipse.bounding_rectangle(), expected, epsilon = EPSILON);
    }

    #[test]
    fn test_skew_ellipse_stays_inside_skewed_box() {
        let mut ellipse = Ellipse::circle(Position::ZERO, 1.0).unwrap();
        let mut polygon = square(-1.0, -1.0, 2.0);
        ellipse.skew(Position::new(0.5, 0.0));
        polygon.skew(Position::new(0.5, 0.0));
        // Skewing preserves area: the circle's area stays pi.
        let radii = ellipse.radii();
        assert_abs_diff_eq!(radii.x() * radii.y(), 1.0, epsilon = EPSILON);
        let ellipse_box = ellipse.bounding_rectangle();
        let polygon_box = polygon.bounding_rectangle();
        assert!(ellipse_box.top_left().x() >= polygon_box.top_left().x() - EPSILON);
        assert!(ellipse_box.bottom_right().x() <= polygon_box.bottom_right().x() + EPSILON);
    }

    #[test]
    fn test_degenerate_ellipse_has_no_unit_frame() {
        let mut ellipse = Ellipse::circle(Position::ZERO, 1.0).unwrap();
        ellipse.scale(Position::new(1.0, 0.0));
        assert!(ellipse.unit_frame().is_none());
        assert!(ellipse.contains(Position::new(0.5, 0.0)));
        assert!(!ellipse.contains(Position::new(0.0, 0.5)));
    }
}
