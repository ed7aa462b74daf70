//! Scene graph nodes.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use log::{debug, trace};

use super::{Canvas, Style};
use crate::{
    collision::{BoundingRectangle, CollisionDetector, HasBoundingVolume},
    geometry::{Position, Primitive, Transform, Transformable},
};

pub const DEFAULT_MARGIN: f64 = 0.0;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct ComponentId(u64);

impl ComponentId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the scene graph.
///
/// The bounding rectangle is the union of the own primitive's rectangle and the children's
/// rectangles, expanded by the margin. Empty children contribute nothing, so a placeholder
/// node does not stretch its parent's box toward the origin. It is recomputed after every structural change and
/// transformation. The previous value is kept until the next draw.
#[derive(Debug)]
pub struct Component {
    id: ComponentId,
    primitive: Option<Primitive>,
    children: Vec<Component>,
    margin: f64,
    bounding_rectangle: BoundingRectangle,
    old_bounding_rectangle: BoundingRectangle,
    invalidated: bool,
    collision_detection_enabled: bool,
    is_shown: bool,
    text: Option<String>,
    style: Style,
}

impl Component {
    /// An empty component. It has never been drawn, so it starts invalidated.
    pub fn new() -> Self {
        let mut component = Self {
            id: ComponentId::next(),
            primitive: None,
            children: Vec::new(),
            margin: DEFAULT_MARGIN,
            bounding_rectangle: BoundingRectangle::ZERO,
            old_bounding_rectangle: BoundingRectangle::ZERO,
            invalidated: true,
            collision_detection_enabled: true,
            is_shown: true,
            text: None,
            style: Style::default(),
        };
        component.update_bounding_rectangle();
        component
    }

    /// A component wrapping a single primitive.
    pub fn leaf(primitive: impl Into<Primitive>) -> Self {
        let mut component = Self::new();
        component.primitive = Some(primitive.into());
        component.update_bounding_rectangle();
        component
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn primitive(&self) -> Option<&Primitive> {
        self.primitive.as_ref()
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    /// Callers changing the geometry of children have to call
    /// [`Component::update_bounding_rectangle`] afterwards.
    pub fn children_mut(&mut self) -> &mut Vec<Component> {
        &mut self.children
    }

    pub fn add(&mut self, child: Component) {
        debug!("{}: adding {}", self.id, child.id);
        self.children.push(child);
        self.update_bounding_rectangle();
        self.invalidated = true;
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn set_margin(&mut self, margin: f64) {
        self.margin = margin;
        self.update_bounding_rectangle();
        self.invalidated = true;
    }

    pub fn bounding_rectangle(&self) -> BoundingRectangle {
        self.bounding_rectangle
    }

    /// The bounding rectangle at the time of the last draw.
    pub fn old_bounding_rectangle(&self) -> BoundingRectangle {
        self.old_bounding_rectangle
    }

    /// True when neither this component nor any descendant holds a primitive.
    pub fn is_empty(&self) -> bool {
        self.primitive.is_none() && self.children.iter().all(Component::is_empty)
    }

    pub fn update_bounding_rectangle(&mut self) {
        let own = self.primitive.iter().map(|p| p.bounding_rectangle());
        let children = self
            .children
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| c.bounding_rectangle);
        self.bounding_rectangle =
            BoundingRectangle::from_rectangles(own.chain(children)).add_margin(self.margin);
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn collision_detection_enabled(&self) -> bool {
        self.collision_detection_enabled
    }

    pub fn set_collision_detection_enabled(&mut self, enabled: bool) {
        self.collision_detection_enabled = enabled;
    }

    pub fn is_shown(&self) -> bool {
        self.is_shown
    }

    pub fn set_shown(&mut self, shown: bool) {
        self.is_shown = shown;
        self.invalidated = true;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
        self.invalidated = true;
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
        self.invalidated = true;
    }

    /// Searches this component and its descendants.
    pub fn find(&self, id: ComponentId) -> Option<&Component> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Applies `update` to the descendant `id` and refreshes the bounding rectangles of every
    /// component on the way down to it. Returns false if there is no such descendant.
    pub fn update_descendant(&mut self, id: ComponentId, update: &mut dyn FnMut(&mut Component)) -> bool {
        if self.id == id {
            update(self);
            return true;
        }
        let found = self
            .children
            .iter_mut()
            .any(|c| c.update_descendant(id, update));
        if found {
            self.update_bounding_rectangle();
            self.invalidated = true;
        }
        found
    }

    /// Bounding-rectangle gated test against a primitive. The own primitive is tested before
    /// the children.
    pub fn collides_with_primitive(&self, primitive: &Primitive, detector: &dyn CollisionDetector) -> bool {
        if !self.collision_detection_enabled {
            return false;
        }
        if !self
            .bounding_rectangle
            .collides_with(&primitive.bounding_rectangle())
        {
            trace!("{}: bounding rectangle rejects {}", self.id, primitive.kind());
            return false;
        }
        self.primitive
            .as_ref()
            .is_some_and(|own| detector.collides_with(own, primitive))
            || self
                .children
                .iter()
                .any(|c| c.collides_with_primitive(primitive, detector))
    }

    pub fn collides_with_component(&self, other: &Component, detector: &dyn CollisionDetector) -> bool {
        if !self.collision_detection_enabled || !other.collision_detection_enabled {
            return false;
        }
        if !self.bounding_rectangle.collides_with(&other.bounding_rectangle) {
            trace!("{}: bounding rectangle rejects {}", self.id, other.id);
            return false;
        }
        self.primitive
            .as_ref()
            .is_some_and(|own| other.collides_with_primitive(own, detector))
            || self
                .children
                .iter()
                .any(|c| c.collides_with_component(other, detector))
    }

    /// Snapshots the bounding rectangle, clears the invalidation and paints the subtree unless
    /// hidden.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        self.old_bounding_rectangle = self.bounding_rectangle;
        self.invalidated = false;
        if !self.is_shown {
            return;
        }

        canvas.set_stroke_colour(self.style.border_colour);
        canvas.set_fill_colour(self.style.fill_colour);
        canvas.set_line_width(self.style.border_thickness);
        if let Some(primitive) = &self.primitive {
            canvas.draw_primitive(primitive);
        }
        for child in &mut self.children {
            child.draw(canvas);
        }
        if let Some(text) = &self.text {
            canvas.draw_text(text, self.bounding_rectangle.center());
        }
    }
}

impl Default for Component {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformable for Component {
    fn transform(&mut self, transform: &Transform) {
        if let Some(primitive) = &mut self.primitive {
            primitive.transform(transform);
        }
        for child in &mut self.children {
            child.transform(transform);
        }
        self.update_bounding_rectangle();
        self.invalidated = true;
        debug!("{}: transformed", self.id);
    }

    fn translate(&mut self, delta: Position) {
        if let Some(primitive) = &mut self.primitive {
            primitive.translate(delta);
        }
        for child in &mut self.children {
            child.translate(delta);
        }
        self.update_bounding_rectangle();
        self.invalidated = true;
        debug!("{}: translated by {:?}", self.id, delta);
    }

    fn pivot(&self) -> Position {
        self.bounding_rectangle.center()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        collision::{FineCollisionDetector, HybridCollisionDetector},
        geometry::{Angle, Ellipse},
        scene::Colour,
        tests::{circle, point, square, RecordingCanvas, RecordingDetector},
    };

    const EPSILON: f64 = 1e-9;

    fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> BoundingRectangle {
        BoundingRectangle::from_two_points(Position::new(x0, y0), Position::new(x1, y1))
    }

    fn composite(children: impl IntoIterator<Item = Component>) -> Component {
        let mut component = Component::new();
        children.into_iter().for_each(|c| component.add(c));
        component
    }

    #[test]
    fn test_new_component() {
        let component = Component::new();
        assert_eq!(component.bounding_rectangle(), BoundingRectangle::ZERO);
        assert!(component.is_invalidated());
        assert!(component.collision_detection_enabled());
        assert!(component.is_shown());
        assert_eq!(component.margin(), DEFAULT_MARGIN);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Component::new();
        let b = Component::new();
        assert_ne!(a.id(), b.id());
        assert!(a.id().to_string().starts_with('#'));
    }

    #[test]
    fn test_add_unions_children() {
        let mut component = Component::leaf(Ellipse::circle(Position::new(1.0, 1.0), 1.0).unwrap());
        component.add(Component::leaf(square(4.0, -1.0, 2.0)));
        assert_eq!(component.bounding_rectangle(), rectangle(0.0, -1.0, 6.0, 2.0));
        assert_eq!(component.children().len(), 1);
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::positive(2.0)]
    #[case::fractional(0.25)]
    fn test_margin(#[case] margin: f64) {
        let mut component = composite([
            Component::leaf(square(0.0, 0.0, 1.0)),
            Component::leaf(square(3.0, 2.0, 1.0)),
        ]);
        component.set_margin(margin);
        assert_abs_diff_eq!(
            component.bounding_rectangle(),
            rectangle(-margin, -margin, 4.0 + margin, 3.0 + margin),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_empty_component_with_margin() {
        let mut component = Component::new();
        component.set_margin(1.0);
        assert_eq!(component.bounding_rectangle(), rectangle(-1.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn test_empty_children_do_not_stretch_the_box() {
        let placeholder = composite([Component::new(), Component::new()]);
        assert!(placeholder.is_empty());

        let mut parent = composite([Component::leaf(square(4.0, 4.0, 1.0)), placeholder]);
        assert!(!parent.is_empty());
        assert_eq!(parent.bounding_rectangle(), rectangle(4.0, 4.0, 5.0, 5.0));

        parent.add(Component::new());
        assert_eq!(parent.bounding_rectangle(), rectangle(4.0, 4.0, 5.0, 5.0));
        parent.set_margin(1.0);
        assert_eq!(parent.bounding_rectangle(), rectangle(3.0, 3.0, 6.0, 6.0));
    }

    #[test]
    fn test_invalidation_lifecycle() {
        let mut component = composite([Component::leaf(square(0.0, 0.0, 2.0))]);
        let mut canvas = RecordingCanvas::default();

        component.draw(&mut canvas);
        assert!(!component.is_invalidated());
        assert_eq!(component.old_bounding_rectangle(), component.bounding_rectangle());

        let before = component.bounding_rectangle();
        component.translate(Position::new(3.0, 1.0));
        assert!(component.is_invalidated());
        assert_eq!(component.bounding_rectangle(), rectangle(3.0, 1.0, 5.0, 3.0));
        assert_eq!(component.old_bounding_rectangle(), before);

        component.draw(&mut canvas);
        assert!(!component.is_invalidated());
        assert_eq!(component.old_bounding_rectangle(), rectangle(3.0, 1.0, 5.0, 3.0));
    }

    #[test]
    fn test_rotate_moves_subtree_rigidly() {
        let mut component = composite([
            Component::leaf(square(0.0, 0.0, 1.0)),
            Component::leaf(square(3.0, 0.0, 1.0)),
        ]);
        component.rotate(Angle::from_deg(90.0));

        assert!(component.is_invalidated());
        assert_abs_diff_eq!(component.bounding_rectangle(), rectangle(1.5, -1.5, 2.5, 2.5), epsilon = EPSILON);
        assert_abs_diff_eq!(
            component.children()[0].bounding_rectangle(),
            rectangle(1.5, -1.5, 2.5, -0.5),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_scale_and_skew_keep_box_current() {
        let mut component = composite([Component::leaf(square(0.0, 0.0, 2.0))]);
        component.scale(Position::new(2.0, 1.0));
        assert_abs_diff_eq!(component.bounding_rectangle(), rectangle(-1.0, 0.0, 3.0, 2.0), epsilon = EPSILON);

        component.skew(Position::new(0.5, 0.0));
        assert_abs_diff_eq!(component.bounding_rectangle(), rectangle(-1.5, 0.0, 3.5, 2.0), epsilon = EPSILON);
        assert_abs_diff_eq!(
            component.children()[0].bounding_rectangle(),
            component.bounding_rectangle(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_gate_skips_distant_sibling() {
        let near = Component::leaf(square(0.0, 0.0, 1.0));
        let far = Component::leaf(square(100.0, 100.0, 1.0));
        let (near_box, far_box) = (near.bounding_rectangle(), far.bounding_rectangle());
        let component = composite([near, far]);

        let detector = RecordingDetector::new(FineCollisionDetector::default());
        let calls = detector.calls();

        assert!(component.collides_with_primitive(&point(0.5, 0.5), &detector));
        assert!(!component.collides_with_primitive(&circle(2.0, 2.0, 1.3), &detector));
        assert!(!component.collides_with_primitive(&point(50.0, 50.0), &detector));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|call| call.a == near_box && call.a != far_box));
    }

    #[test]
    fn test_own_primitive_is_tested() {
        let mut component = Component::leaf(Ellipse::circle(Position::ZERO, 1.0).unwrap());
        component.add(Component::leaf(square(5.0, 5.0, 1.0)));
        let detector = HybridCollisionDetector::default();

        assert!(component.collides_with_primitive(&point(0.5, 0.0), &detector));
        assert!(component.collides_with_primitive(&point(5.5, 5.5), &detector));
        assert!(!component.collides_with_primitive(&point(3.0, 3.0), &detector));
    }

    #[test]
    fn test_disabled_component_never_collides() {
        let mut component = composite([Component::leaf(square(0.0, 0.0, 1.0))]);
        let other = composite([Component::leaf(square(0.5, 0.5, 1.0))]);
        let detector = HybridCollisionDetector::default();
        assert!(component.collides_with_component(&other, &detector));

        component.set_collision_detection_enabled(false);
        assert!(!component.collides_with_primitive(&point(0.5, 0.5), &detector));
        assert!(!component.collides_with_component(&other, &detector));
        assert!(!other.collides_with_component(&component, &detector));
    }

    #[rstest]
    #[case::overlapping(Position::new(1.5, 0.0), true)]
    #[case::boxes_touch_shapes_apart(Position::new(1.9, 1.9), false)]
    #[case::apart(Position::new(10.0, 0.0), false)]
    fn test_collides_with_component(#[case] offset: Position, #[case] expected: bool) {
        let a = composite([
            Component::leaf(Ellipse::circle(Position::new(1.0, 1.0), 1.0).unwrap()),
            Component::leaf(square(-5.0, -5.0, 1.0)),
        ]);
        let mut b = composite([Component::leaf(Ellipse::circle(Position::new(1.0, 1.0), 1.0).unwrap())]);
        b.translate(offset);

        let detector = HybridCollisionDetector::default();
        assert_eq!(a.collides_with_component(&b, &detector), expected);
        assert_eq!(b.collides_with_component(&a, &detector), expected);
    }

    #[test]
    fn test_update_descendant_refreshes_ancestors() {
        let leaf = Component::leaf(square(0.0, 0.0, 1.0));
        let leaf_id = leaf.id();
        let mut root = composite([composite([leaf])]);
        root.draw(&mut RecordingCanvas::default());

        assert!(root.update_descendant(leaf_id, &mut |c| c.translate(Position::new(2.0, 0.0))));
        assert_eq!(root.bounding_rectangle(), rectangle(2.0, 0.0, 3.0, 1.0));
        assert_eq!(root.children()[0].bounding_rectangle(), rectangle(2.0, 0.0, 3.0, 1.0));
        assert!(root.is_invalidated());

        let missing = Component::new().id();
        assert!(!root.update_descendant(missing, &mut |c| c.translate(Position::new(2.0, 0.0))));
        assert!(root.find(leaf_id).is_some());
        assert!(root.find(missing).is_none());
    }

    #[test]
    fn test_draw_order() {
        let mut component = composite([
            Component::leaf(square(0.0, 0.0, 2.0)),
            Component::leaf(Ellipse::circle(Position::new(1.0, 1.0), 1.0).unwrap()),
        ]);
        component.set_style(Style::new(Colour::rgb(255, 0, 0), Colour::WHITE, 2));
        component.set_text(Some("label".to_string()));

        let mut canvas = RecordingCanvas::default();
        component.draw(&mut canvas);
        insta::assert_snapshot!(canvas.operations.join("\n"), @r"
        stroke 255,0,0,255
        fill 255,255,255,255
        width 2
        stroke 0,0,0,255
        fill 255,255,255,255
        width 1
        draw polygon
        stroke 0,0,0,255
        fill 255,255,255,255
        width 1
        draw ellipse
        text label at (1, 1)
        ");
    }

    #[test]
    fn test_hidden_component_is_not_painted() {
        let mut component = Component::leaf(square(0.0, 0.0, 1.0));
        component.set_shown(false);
        let mut canvas = RecordingCanvas::default();
        component.draw(&mut canvas);
        assert!(canvas.operations.is_empty());
        assert!(!component.is_invalidated());
    }
}
