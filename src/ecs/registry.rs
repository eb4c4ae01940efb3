use super::components::{Name, Tags};
use super::Entity;

/// Every live entity, with its name and tags.
///
/// Wraps a `hecs::World`; each entity is spawned as `(Name, Tags, T)` where
/// `T` is its simulation component. Iteration order is whatever hecs gives.
pub struct EntityRegistry {
    world: hecs::World,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            world: hecs::World::new(),
        }
    }

    pub fn spawn<T>(&mut self, name: impl Into<String>, tags: &[&str], entity: T) -> hecs::Entity
    where
        T: Entity + hecs::Component,
    {
        let name = name.into();
        let id = self.world.spawn((Name(name.clone()), Tags::new(tags), entity));
        log::debug!("spawned {name} ({id:?})");
        id
    }

    /// Returns false if the entity was already gone.
    pub fn despawn(&mut self, entity: hecs::Entity) -> bool {
        self.world.despawn(entity).is_ok()
    }

    pub fn contains(&self, entity: hecs::Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    /// First entity with this name.
    pub fn find(&self, name: &str) -> Option<hecs::Entity> {
        self.world
            .query::<&Name>()
            .iter()
            .find(|(_, n)| n.0 == name)
            .map(|(entity, _)| entity)
    }

    pub fn find_all_with_tag(&self, tag: &str) -> Vec<hecs::Entity> {
        self.world
            .query::<&Tags>()
            .iter()
            .filter(|(_, tags)| tags.has(tag))
            .map(|(entity, _)| entity)
            .collect()
    }

    pub fn all(&self) -> Vec<hecs::Entity> {
        self.world.iter().map(|e| e.entity()).collect()
    }

    pub fn name(&self, entity: hecs::Entity) -> Option<String> {
        self.get::<Name>(entity).map(|n| n.0.clone())
    }

    pub fn has_tag(&self, entity: hecs::Entity, tag: &str) -> bool {
        self.get::<Tags>(entity).is_some_and(|t| t.has(tag))
    }

    pub fn get<T: hecs::Component>(&self, entity: hecs::Entity) -> Option<hecs::Ref<'_, T>> {
        self.world.get::<&T>(entity).ok()
    }

    pub fn get_mut<T: hecs::Component>(
        &mut self,
        entity: hecs::Entity,
    ) -> Option<hecs::RefMut<'_, T>> {
        self.world.get::<&mut T>(entity).ok()
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }
}
