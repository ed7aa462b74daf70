//! The scene: top-level components and redraw notification.

use log::debug;
use thiserror::Error;

use super::{Canvas, Component, ComponentId};
use crate::{
    collision::CollisionDetector,
    geometry::{Position, Primitive, Transformable},
};

#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error("no component with id {0}")]
    MissingComponent(ComponentId),
}

type RedrawListener = Box<dyn FnMut(ComponentId)>;

/// Ordered top-level components of a drawing area. Listeners registered with
/// [`Scene::on_redraw`] are told about every component changed through the scene.
pub struct Scene {
    size: Position,
    components: Vec<Component>,
    redraw_listeners: Vec<RedrawListener>,
}

impl Scene {
    pub fn new(size: Position) -> Self {
        Self {
            size,
            components: Vec::new(),
            redraw_listeners: Vec::new(),
        }
    }

    pub fn size(&self) -> Position {
        self.size
    }

    pub fn add(&mut self, component: Component) -> ComponentId {
        let id = component.id();
        debug!("scene: adding {id}");
        self.components.push(component);
        id
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn get(&self, id: ComponentId) -> Result<&Component, SceneError> {
        self.components
            .iter()
            .find_map(|c| c.find(id))
            .ok_or(SceneError::MissingComponent(id))
    }

    /// Callers changing geometry through the returned reference have to refresh the bounding
    /// rectangles of its ancestors; [`Scene::update_component`] does that.
    pub fn get_mut(&mut self, id: ComponentId) -> Result<&mut Component, SceneError> {
        self.components
            .iter_mut()
            .find_map(|c| c.find_mut(id))
            .ok_or(SceneError::MissingComponent(id))
    }

    pub fn on_redraw(&mut self, listener: impl FnMut(ComponentId) + 'static) {
        self.redraw_listeners.push(Box::new(listener));
    }

    /// Applies `update` to the component `id`, refreshes its ancestors and notifies the redraw
    /// listeners.
    pub fn update_component(
        &mut self,
        id: ComponentId,
        mut update: impl FnMut(&mut Component),
    ) -> Result<(), SceneError> {
        let found = self
            .components
            .iter_mut()
            .any(|c| c.update_descendant(id, &mut update));
        if !found {
            return Err(SceneError::MissingComponent(id));
        }
        debug!("scene: updated {id}");
        self.redraw_listeners
            .iter_mut()
            .for_each(|listener| listener(id));
        Ok(())
    }

    pub fn translate_component(&mut self, id: ComponentId, delta: Position) -> Result<(), SceneError> {
        self.update_component(id, |c| c.translate(delta))
    }

    /// Ids of the top-level components waiting for a redraw.
    pub fn invalidated(&self) -> Vec<ComponentId> {
        self.components
            .iter()
            .filter(|c| c.is_invalidated())
            .map(Component::id)
            .collect()
    }

    /// Ids of the top-level components colliding with `primitive`.
    pub fn colliding_with(&self, primitive: &Primitive, detector: &dyn CollisionDetector) -> Vec<ComponentId> {
        self.components
            .iter()
            .filter(|c| c.collides_with_primitive(primitive, detector))
            .map(Component::id)
            .collect()
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        debug!("scene: drawing {} components", self.components.len());
        for component in &mut self.components {
            component.draw(canvas);
        }
    }
}
