//! Collision detection between 2D primitives and scene graphs built from them.
//!
//! Detectors answer whether two [`geometry::Primitive`]s overlap. The coarse detectors compare
//! bounding volumes, the fine detector compares the exact shapes, and the hybrid detector only
//! runs the exact test once the bounding volumes overlap. [`scene::Component`] trees cache the
//! bounding rectangle of every subtree to skip whole branches during a query.

pub mod collision;
pub mod geometry;
pub mod scene;
