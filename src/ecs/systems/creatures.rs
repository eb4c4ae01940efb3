use crate::ecs::Entity;
use crate::fish::behavior::Bite;
use crate::fish::Fish;
use crate::spatial::SpatialIndex;

/// Sense, behave and move every live fish against this tick's snapshot.
/// Bites are queued rather than applied so no fish sees another's meal
/// mid-tick.
pub fn update(
    world: &mut hecs::World,
    index: &SpatialIndex,
    dt: f32,
    rng: &mut fastrand::Rng,
    bites: &mut Vec<Bite>,
) {
    for (entity, fish) in world.query_mut::<&mut Fish>() {
        if fish.is_disposed() {
            continue;
        }
        fish.update(Some(entity), dt, index, rng, bites);
    }
}
