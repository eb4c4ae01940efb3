use crate::ecs::EntityRegistry;
use crate::fish::Fish;
use crate::plant::Plant;
use crate::spatial::SpatialIndex;

/// Rebuild the spatial index and snapshot cache from current positions.
pub fn rebuild(registry: &EntityRegistry, index: &mut SpatialIndex) {
    index.clear();
    index.add_all::<Plant>(registry);
    index.add_all::<Fish>(registry);
}
