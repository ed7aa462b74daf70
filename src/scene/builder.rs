//! Fluent construction of components and scenes.

use super::{Colour, Component, Scene, Style, DEFAULT_MARGIN};
use crate::geometry::{Position, Primitive};

/// Collects the settings of a component. [`ComponentBuilder::build`] hands the component out and
/// resets the builder, so one builder can produce many components.
#[derive(Debug)]
pub struct ComponentBuilder {
    style: Style,
    text: Option<String>,
    margin: f64,
    primitive: Option<Primitive>,
    children: Vec<Component>,
    collision_detection_enabled: bool,
}

impl ComponentBuilder {
    pub fn new() -> Self {
        Self {
            style: Style::default(),
            text: None,
            margin: DEFAULT_MARGIN,
            primitive: None,
            children: Vec::new(),
            collision_detection_enabled: true,
        }
    }

    pub fn border_thickness(&mut self, thickness: u32) -> &mut Self {
        self.style.border_thickness = thickness;
        self
    }

    pub fn border_colour(&mut self, colour: Colour) -> &mut Self {
        self.style.border_colour = colour;
        self
    }

    pub fn fill_colour(&mut self, colour: Colour) -> &mut Self {
        self.style.fill_colour = colour;
        self
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    pub fn margin(&mut self, margin: f64) -> &mut Self {
        self.margin = margin;
        self
    }

    pub fn primitive(&mut self, primitive: impl Into<Primitive>) -> &mut Self {
        self.primitive = Some(primitive.into());
        self
    }

    pub fn child(&mut self, child: Component) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn children(&mut self, children: impl IntoIterator<Item = Component>) -> &mut Self {
        self.children.extend(children);
        self
    }

    pub fn collision_detection(&mut self, enabled: bool) -> &mut Self {
        self.collision_detection_enabled = enabled;
        self
    }

    pub fn build(&mut self) -> Component {
        let settings = std::mem::take(self);
        let mut component = match settings.primitive {
            Some(primitive) => Component::leaf(primitive),
            None => Component::new(),
        };
        component.set_style(settings.style);
        component.set_text(settings.text);
        component.set_collision_detection_enabled(settings.collision_detection_enabled);
        component.children_mut().extend(settings.children);
        component.set_margin(settings.margin);
        component.update_bounding_rectangle();
        component
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ComponentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct SceneBuilder {
    width: f64,
    height: f64,
    components: Vec<Component>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&mut self, width: f64) -> &mut Self {
        self.width = width;
        self
    }

    pub fn height(&mut self, height: f64) -> &mut Self {
        self.height = height;
        self
    }

    pub fn component(&mut self, component: Component) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn components(&mut self, components: impl IntoIterator<Item = Component>) -> &mut Self {
        self.components.extend(components);
        self
    }

    pub fn build(&mut self) -> Scene {
        let settings = std::mem::take(self);
        let mut scene = Scene::new(Position::new(settings.width, settings.height));
        for component in settings.components {
            scene.add(component);
        }
        scene
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
