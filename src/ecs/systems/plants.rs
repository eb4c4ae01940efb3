use crate::plant::Plant;

/// Growth, bounce decay and wiggle for every plant, dead or alive.
pub fn update(world: &mut hecs::World, dt: f32) {
    for (_entity, plant) in world.query_mut::<&mut Plant>() {
        plant.update(dt);
    }
}
