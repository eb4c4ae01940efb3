use std::fmt;

use glam::Vec2;
use thiserror::Error;

use crate::chain::ChainError;
use crate::config::{ConfigError, SimConfig};
use crate::debug::timer::SystemTimers;
use crate::ecs::systems::{self, TickReport};
use crate::ecs::{Entity, EntityRegistry, RenderState};
use crate::fish::behavior::{BehaviorName, Bite, EnterArgs};
use crate::fish::target::TrackTarget;
use crate::fish::{self, Fish};
use crate::plant::{self, Plant};
use crate::spatial::SpatialIndex;
use crate::state::StateError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not build fish: {0}")]
    Chain(#[from] ChainError),
}

/// Head counts after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub tick_count: u64,
    pub fish: usize,
    pub plants: usize,
    /// Fish per behavior, indexed like [`BehaviorName::ALL`].
    pub behaviors: [usize; 4],
}

impl SimStats {
    pub fn count(&self, behavior: BehaviorName) -> usize {
        BehaviorName::ALL
            .iter()
            .position(|&b| b == behavior)
            .map_or(0, |i| self.behaviors[i])
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} | fish {} (", self.tick_count, self.fish)?;
        for (i, name) in BehaviorName::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", name.label(), self.behaviors[i])?;
        }
        write!(f, ") | plants {}", self.plants)
    }
}

/// One tank: every entity plus everything a tick needs.
pub struct Simulation {
    config: SimConfig,
    registry: EntityRegistry,
    index: SpatialIndex,
    rng: fastrand::Rng,
    seed: u64,
    bites: Vec<Bite>,
    timers: SystemTimers,
    tick_count: u64,
}

impl Simulation {
    /// An empty tank. Nothing is spawned until [`Simulation::populate`] or
    /// the spawn helpers are called.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let seed = config.world.seed.unwrap_or_else(|| fastrand::u64(..));
        log::debug!("simulation seed {seed}");

        let cell_size = config.fish.vision_distance.max(1.0);
        Ok(Self {
            config,
            registry: EntityRegistry::new(),
            index: SpatialIndex::new(cell_size, config.world.spatial_table_size.max(1)),
            rng: fastrand::Rng::with_seed(seed),
            seed,
            bites: Vec::new(),
            timers: SystemTimers::new(),
            tick_count: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn timers(&self) -> &SystemTimers {
        &self.timers
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn spawn_fish(&mut self, position: Vec2) -> Result<hecs::Entity, SimError> {
        Ok(fish::spawn_fish(
            &mut self.registry,
            position,
            self.config.fish,
            &mut self.rng,
        )?)
    }

    pub fn spawn_plant(&mut self, position: Vec2) -> hecs::Entity {
        plant::spawn_plant(&mut self.registry, position, self.config.plant, &mut self.rng)
    }

    /// Scatter the configured number of plants and fish across the tank.
    pub fn populate(&mut self) -> Result<(), SimError> {
        let world = self.config.world;
        for _ in 0..world.plant_count {
            let pos = self.random_point();
            self.spawn_plant(pos);
        }
        for _ in 0..world.fish_count {
            let pos = self.random_point();
            self.spawn_fish(pos)?;
        }
        log::info!(
            "populated {}x{} tank with {} fish and {} plants",
            world.width,
            world.height,
            world.fish_count,
            world.plant_count,
        );
        Ok(())
    }

    fn random_point(&mut self) -> Vec2 {
        let world = &self.config.world;
        Vec2::new(self.rng.f32() * world.width, self.rng.f32() * world.height)
    }

    /// Force a fish into `behavior` between ticks. Returns `Ok(false)` if
    /// `entity` isn't a fish.
    pub fn change_behavior(
        &mut self,
        entity: hecs::Entity,
        behavior: BehaviorName,
        args: EnterArgs,
    ) -> Result<bool, StateError> {
        let Some(mut fish) = self.registry.get_mut::<Fish>(entity) else {
            return Ok(false);
        };
        fish.set_behavior(behavior, args, Some(entity), &self.index, &mut self.rng)?;
        Ok(true)
    }

    /// Point a fish at `target` and send it rushing there.
    pub fn lure(&mut self, entity: hecs::Entity, target: TrackTarget) -> Result<bool, StateError> {
        match self.registry.get_mut::<Fish>(entity) {
            Some(mut fish) => fish.set_track_towards(Some(target)),
            None => return Ok(false),
        }
        self.change_behavior(entity, BehaviorName::Rush, EnterArgs::None)
    }

    /// Advance by `dt` milliseconds. Negative time is treated as none.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let dt = dt.max(0.0);
        let report = systems::tick(
            &mut self.registry,
            &mut self.index,
            dt,
            &mut self.rng,
            &mut self.bites,
            &mut self.timers,
        );
        self.tick_count += 1;
        if report.despawned > 0 {
            log::debug!("tick {}: {} entities gone", self.tick_count, report.despawned);
        }
        report
    }

    /// What to draw: plants first, then fish.
    pub fn render_states(&self) -> Vec<(hecs::Entity, RenderState)> {
        let world = self.registry.world();
        let mut out = Vec::with_capacity(self.registry.len());
        out.extend(
            world
                .query::<&Plant>()
                .iter()
                .map(|(entity, p)| (entity, p.render_state())),
        );
        out.extend(
            world
                .query::<&Fish>()
                .iter()
                .map(|(entity, f)| (entity, f.render_state())),
        );
        out
    }

    pub fn stats(&self) -> SimStats {
        let world = self.registry.world();
        let mut stats = SimStats {
            tick_count: self.tick_count,
            ..SimStats::default()
        };
        for (_, fish) in world.query::<&Fish>().iter() {
            stats.fish += 1;
            if let Some(i) = fish
                .behavior()
                .and_then(|b| BehaviorName::ALL.iter().position(|&n| n == b))
            {
                stats.behaviors[i] += 1;
            }
        }
        stats.plants = world
            .query::<&Plant>()
            .iter()
            .filter(|(_, p)| !p.is_disposed())
            .count();
        stats
    }
}
