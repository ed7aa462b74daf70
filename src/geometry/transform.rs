//! Affine transformations in homogeneous coordinates.

use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};

use super::{Angle, Position};

/// A 2D affine transformation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    matrix: Matrix3<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn translation(delta: Position) -> Self {
        Self {
            matrix: Matrix3::new_translation(&Vector2::new(delta.x(), delta.y())),
        }
    }

    pub fn rotation_about(pivot: Position, angle: Angle) -> Self {
        Self::about(pivot, Matrix3::new_rotation(angle.radians()))
    }

    /// Non-uniform scaling by `factors.x()` along x and `factors.y()` along y.
    pub fn scaling_about(pivot: Position, factors: Position) -> Self {
        Self::about(
            pivot,
            Matrix3::new_nonuniform_scaling(&Vector2::new(factors.x(), factors.y())),
        )
    }

    /// Shear mapping `(x, y)` to `(x + kx * y, ky * x + y)` relative to the pivot.
    pub fn skew_about(pivot: Position, factors: Position) -> Self {
        #[rustfmt::skip]
        let shear = Matrix3::new(
            1.0,          factors.x(), 0.0,
            factors.y(), 1.0,          0.0,
            0.0,          0.0,          1.0,
        );
        Self::about(pivot, shear)
    }

    fn about(pivot: Position, matrix: Matrix3<f64>) -> Self {
        let to_origin = Self::translation(-pivot);
        let back = Self::translation(pivot);
        to_origin.then(&Self { matrix }).then(&back)
    }

    /// Returns the transform that applies `self` first and `next` afterwards.
    pub fn then(&self, next: &Transform) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    pub fn apply(&self, position: Position) -> Position {
        let v = self.matrix * Vector3::new(position.x(), position.y(), 1.0);
        Position::new(v.x, v.y)
    }

    /// Applies only the linear part, as needed for displacements.
    pub fn apply_vector(&self, vector: Position) -> Position {
        let v = self.linear() * Vector2::new(vector.x(), vector.y());
        Position::new(v.x, v.y)
    }

    pub fn linear(&self) -> Matrix2<f64> {
        let m = &self.matrix;
        Matrix2::new(m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)])
    }

    pub(crate) fn from_linear(linear: Matrix2<f64>, translation: Position) -> Self {
        #[rustfmt::skip]
        let matrix = Matrix3::new(
            linear[(0, 0)], linear[(0, 1)], translation.x(),
            linear[(1, 0)], linear[(1, 1)], translation.y(),
            0.0,            0.0,            1.0,
        );
        Self { matrix }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Geometry that can be moved and deformed by affine transformations.
///
/// Rotation, scaling and skewing without an explicit center act around [`Transformable::pivot`].
pub trait Transformable {
    fn transform(&mut self, transform: &Transform);

    fn translate(&mut self, delta: Position) {
        self.transform(&Transform::translation(delta));
    }

    fn pivot(&self) -> Position;

    fn rotate(&mut self, angle: Angle) {
        let pivot = self.pivot();
        self.rotate_about(pivot, angle);
    }

    fn rotate_about(&mut self, center: Position, angle: Angle) {
        self.transform(&Transform::rotation_about(center, angle));
    }

    fn scale(&mut self, factors: Position) {
        self.transform(&Transform::scaling_about(self.pivot(), factors));
    }

    fn skew(&mut self, factors: Position) {
        self.transform(&Transform::skew_about(self.pivot(), factors));
    }
}
