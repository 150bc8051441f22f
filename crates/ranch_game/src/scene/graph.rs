//! The scene: entity storage, hierarchy and the update walk

use super::component::{Component, ComponentKind, ComponentVariant};
use super::context::{Commands, ComponentContext, FrameView};
use super::entity::Entity;
use crate::error::{GameError, Result};
use rand::rngs::StdRng;
use ranch_core::{Arena, Id};

/// Owns every entity
///
/// Destruction marks entities at once; their storage is reclaimed by
/// [`Scene::sweep`] at the frame boundary.
#[derive(Debug, Default)]
pub struct Scene {
    entities: Arena<Entity>,
    destroyed: Vec<Id>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a root entity
    pub fn spawn(&mut self, entity: Entity) -> Id {
        let id = self.entities.insert(entity);
        if let Some(e) = self.entities.get_mut(id) {
            e.id = Some(id);
        }
        log::trace!("Spawned entity {}", id);
        id
    }

    /// Insert an entity under `parent`
    pub fn spawn_child(&mut self, parent: Id, entity: Entity) -> Result<Id> {
        if !self.is_live(parent) {
            return Err(GameError::EntityNotFound(parent));
        }
        let id = self.spawn(entity);
        self.set_parent(id, parent)?;
        Ok(id)
    }

    /// Re-parent `child`, detaching it from any previous parent
    ///
    /// # Errors
    ///
    /// Fails if either entity is missing or `parent` is `child` or one of
    /// its descendants.
    pub fn set_parent(&mut self, child: Id, parent: Id) -> Result<()> {
        if !self.is_live(child) {
            return Err(GameError::EntityNotFound(child));
        }
        if !self.is_live(parent) {
            return Err(GameError::EntityNotFound(parent));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(GameError::HierarchyCycle { child, parent });
        }

        self.detach_from_parent(child);
        if let Some(p) = self.entities.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.entities.get_mut(child) {
            c.parent = Some(parent);
        }
        Ok(())
    }

    /// Make `child` a root
    pub fn remove_parent(&mut self, child: Id) {
        self.detach_from_parent(child);
    }

    /// Whether `ancestor` is above `id` in the hierarchy
    pub fn is_ancestor(&self, ancestor: Id, id: Id) -> bool {
        let mut current = self.entities.get(id).and_then(|e| e.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.entities.get(p).and_then(|e| e.parent);
        }
        false
    }

    pub fn get(&self, id: Id) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Two distinct entities at once
    pub fn get_pair_mut(&mut self, a: Id, b: Id) -> Option<(&mut Entity, &mut Entity)> {
        self.entities.get_pair_mut(a, b)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.entities.contains(id)
    }

    /// Present and not destroyed
    pub fn is_live(&self, id: Id) -> bool {
        self.entities.get(id).map_or(false, |e| !e.destroyed)
    }

    pub fn component<T: ComponentVariant>(&self, id: Id) -> Option<&T> {
        self.entities.get(id)?.components.get::<T>()
    }

    pub fn component_mut<T: ComponentVariant>(&mut self, id: Id) -> Option<&mut T> {
        self.entities.get_mut(id)?.components.get_mut::<T>()
    }

    /// Attach a component, firing its attach hook
    ///
    /// A second component of the same kind is logged and dropped; the
    /// entity keeps the first.
    pub fn add_component<T: ComponentVariant>(&mut self, id: Id, component: T) -> Result<()> {
        let entity = self
            .entities
            .get_mut(id)
            .filter(|e| !e.destroyed)
            .ok_or(GameError::EntityNotFound(id))?;

        if entity.components.has_kind(T::KIND) {
            log::warn!("Entity {} already has a {} component", id, T::KIND);
            return Err(GameError::DuplicateComponent(T::KIND));
        }

        let mut component = component.wrap();
        component.on_attach(id);
        entity
            .components
            .insert(component)
            .map_err(|_| GameError::DuplicateComponent(T::KIND))
    }

    /// Detach a component, firing its detach hook
    pub fn remove_component(&mut self, id: Id, kind: ComponentKind) -> Option<Component> {
        let mut component = self.entities.get_mut(id)?.components.remove(kind)?;
        component.on_detach(id);
        Some(component)
    }

    /// Destroy `id` and its descendants
    ///
    /// Idempotent. Fires every component's destroy hook, detaches `id` from
    /// its parent and returns every entity newly marked, so the caller can
    /// release their colliders at once.
    pub fn destroy(&mut self, id: Id) -> Vec<Id> {
        if !self.is_live(id) {
            return Vec::new();
        }
        self.detach_from_parent(id);

        let mut marked = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(entity) = self.entities.get_mut(next) else {
                continue;
            };
            if entity.destroyed {
                continue;
            }
            entity.destroyed = true;
            entity.active = false;
            for component in entity.components.iter_mut() {
                component.on_destroy(next);
            }
            stack.extend(entity.children.iter().copied());
            marked.push(next);
        }

        log::debug!("Destroyed entity {} ({} total)", id, marked.len());
        self.destroyed.extend(marked.iter().copied());
        marked
    }

    /// Reclaim storage of destroyed entities
    pub fn sweep(&mut self) -> usize {
        let count = self.destroyed.len();
        for id in self.destroyed.drain(..) {
            self.entities.remove(id);
        }
        count
    }

    /// Remove everything, including pending destroys
    pub fn clear(&mut self) {
        self.entities.clear();
        self.destroyed.clear();
    }

    /// Root entities in slot order
    pub fn roots(&self) -> Vec<Id> {
        self.entities
            .iter()
            .filter(|(_, e)| e.parent.is_none() && !e.destroyed)
            .map(|(id, _)| id)
            .collect()
    }

    /// Entities that are not destroyed
    pub fn iter(&self) -> impl Iterator<Item = (Id, &Entity)> {
        self.entities.iter().filter(|(_, e)| !e.destroyed)
    }

    /// Ids of live entities carrying a `T`
    pub fn ids_with<T: ComponentVariant>(&self) -> Vec<Id> {
        self.iter()
            .filter(|(_, e)| e.components.has::<T>())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Id> {
        self.iter().find(|(_, e)| e.name == name).map(|(id, _)| id)
    }

    /// Entities that are not destroyed
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Update every root subtree: integrate, then components, then children
    pub fn update(&mut self, frame: &FrameView<'_>, rng: &mut StdRng, commands: &mut Commands) {
        let dt_secs = frame.time.delta_ms / 1000.0;
        for root in self.roots() {
            self.update_entity(root, dt_secs, frame, rng, commands);
        }
    }

    fn update_entity(
        &mut self,
        id: Id,
        dt_secs: f32,
        frame: &FrameView<'_>,
        rng: &mut StdRng,
        commands: &mut Commands,
    ) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        if !entity.is_live() {
            return;
        }

        if !entity.is_static {
            entity.body.integrate(dt_secs);
        }

        for kind in entity.components.kinds() {
            let Some(mut component) = entity.components.take(kind) else {
                continue;
            };
            let mut ctx = ComponentContext {
                owner: id,
                body: &mut entity.body,
                collider: entity.collider,
                siblings: &mut entity.components,
                frame,
                rng: &mut *rng,
                commands: &mut *commands,
            };
            component.update(&mut ctx);
            entity.components.put_back(component);
        }

        let children = entity.children.clone();
        for child in children {
            self.update_entity(child, dt_secs, frame, rng, commands);
        }
    }

    fn detach_from_parent(&mut self, child: Id) {
        let Some(parent) = self.entities.get_mut(child).and_then(|c| c.parent.take()) else {
            return;
        };
        if let Some(p) = self.entities.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
    }
}
