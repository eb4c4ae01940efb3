use crate::ecs::{Entity, EntityRegistry};
use crate::fish::Fish;
use crate::plant::Plant;

/// Despawn everything disposed this tick. Returns how many went.
pub fn despawn_disposed(registry: &mut EntityRegistry) -> usize {
    let mut doomed = disposed::<Plant>(registry);
    doomed.extend(disposed::<Fish>(registry));
    for &entity in &doomed {
        if registry.despawn(entity) {
            log::debug!("despawned {entity:?}");
        }
    }
    doomed.len()
}

fn disposed<T: Entity + hecs::Component>(registry: &EntityRegistry) -> Vec<hecs::Entity> {
    registry
        .world()
        .query::<&T>()
        .iter()
        .filter(|(_, e)| e.is_disposed())
        .map(|(entity, _)| entity)
        .collect()
}
