use crate::ecs::Entity;
use crate::fish::behavior::Bite;
use crate::plant::Plant;

/// Apply queued bites in the order they were taken. Bites on plants that
/// have since died or gone are dropped. Returns how many landed.
pub fn apply(world: &mut hecs::World, bites: &mut Vec<Bite>) -> usize {
    let mut landed = 0;
    for bite in bites.drain(..) {
        let Ok(mut plant) = world.get::<&mut Plant>(bite.plant) else {
            log::trace!("{:?} bit {:?}, which is gone", bite.by, bite.plant);
            continue;
        };
        if plant.is_disposed() {
            continue;
        }
        plant.eat();
        landed += 1;
    }
    landed
}
