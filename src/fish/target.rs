use std::fmt;
use std::sync::Arc;

use glam::Vec2;

use crate::spatial::SpatialIndex;

/// Something a fish can chase. Resolved to a point once per tick.
#[derive(Clone)]
pub enum TrackTarget {
    Fixed(Vec2),
    /// Another entity; its position is read from this tick's snapshot.
    Entity(hecs::Entity),
    /// Anything that can produce a point on demand, e.g. a pointer or lure.
    Dynamic(Arc<dyn Fn() -> Vec2 + Send + Sync>),
}

impl TrackTarget {
    pub fn dynamic(f: impl Fn() -> Vec2 + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(f))
    }

    /// Where the target is now. `None` once an entity target no longer exists.
    /// Disposed entities still resolve.
    pub fn resolve(&self, index: &SpatialIndex) -> Option<Vec2> {
        match self {
            TrackTarget::Fixed(point) => Some(*point),
            TrackTarget::Entity(entity) => index.get(*entity).map(|s| s.pos),
            TrackTarget::Dynamic(f) => Some(f()),
        }
    }

    pub fn entity(&self) -> Option<hecs::Entity> {
        match self {
            TrackTarget::Entity(entity) => Some(*entity),
            _ => None,
        }
    }
}

impl fmt::Debug for TrackTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackTarget::Fixed(point) => f.debug_tuple("Fixed").field(point).finish(),
            TrackTarget::Entity(entity) => f.debug_tuple("Entity").field(entity).finish(),
            TrackTarget::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
