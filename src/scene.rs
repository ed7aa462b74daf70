//! The scene module arranges primitives into a tree of components. Each component caches the
//! bounding rectangle of its subtree, which gates collision queries before any exact test is
//! run.

mod builder;
mod canvas;
mod component;
mod root;

pub use builder::{ComponentBuilder, SceneBuilder};
pub use canvas::{Canvas, Colour, Style, DEFAULT_BORDER_THICKNESS};
pub use component::{Component, ComponentId, DEFAULT_MARGIN};
pub use root::{Scene, SceneError};
