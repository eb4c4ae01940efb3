pub mod cleanup;
pub mod creatures;
pub mod feeding;
pub mod plants;
pub mod spatial;

use crate::debug::timer::{SystemTimers, TickPhase};
use crate::ecs::EntityRegistry;
use crate::fish::behavior::Bite;
use crate::spatial::SpatialIndex;

/// What happened during one tick, beyond the entities themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub bites: usize,
    pub despawned: usize,
}

/// Run all simulation systems for one fixed tick.
pub fn tick(
    registry: &mut EntityRegistry,
    index: &mut SpatialIndex,
    dt: f32,
    rng: &mut fastrand::Rng,
    bites: &mut Vec<Bite>,
    timers: &mut SystemTimers,
) -> TickReport {
    // 1. Plants grow, settle and wiggle
    timers.begin();
    plants::update(registry.world_mut(), dt);
    timers.end(TickPhase::Plants);

    // 2. Rebuild spatial index + snapshot cache
    timers.begin();
    spatial::rebuild(registry, index);
    timers.end(TickPhase::Spatial);

    // 3. Fish behave and move, queueing bites
    timers.begin();
    creatures::update(registry.world_mut(), index, dt, rng, bites);
    timers.end(TickPhase::Creatures);

    // 4. Apply bites
    timers.begin();
    let bites = feeding::apply(registry.world_mut(), bites);
    timers.end(TickPhase::Feeding);

    // 5. Drop whatever died
    timers.begin();
    let despawned = cleanup::despawn_disposed(registry);
    timers.end(TickPhase::Cleanup);

    TickReport { bites, despawned }
}
