use glam::Vec2;

use crate::config::PlantConfig;
use crate::ecs::components::{TAG_FOOD, TAG_PLANT};
use crate::ecs::{Entity, EntityRegistry, RenderState};

/// A clump of weed. Shrinks when bitten, slowly grows back, and dies once
/// it has been nibbled down to `dead_size`.
#[derive(Debug, Clone)]
pub struct Plant {
    position: Vec2,
    initial_size: f32,
    size: f32,
    bounce: f32,
    /// Wiggles per second.
    wiggle_frequency: f32,
    wiggle_phase: f32,
    /// Milliseconds alive.
    lifetime: f32,
    last_resize: f32,
    grow_interval: f32,
    scale: f32,
    disposed: bool,
    config: PlantConfig,
}

impl Plant {
    pub fn new(position: Vec2, config: PlantConfig, rng: &mut fastrand::Rng) -> Self {
        let size = lerp(config.min_size, config.max_size, rng.f32());
        let grow_interval = lerp(config.min_grow_interval, config.max_grow_interval, rng.f32());
        let mut plant = Self::with_size(position, size, grow_interval, config);
        plant.wiggle_frequency =
            lerp(config.min_wiggle_frequency, config.max_wiggle_frequency, rng.f32());
        plant.wiggle_phase = rng.f32() * std::f32::consts::PI;
        plant.refresh_scale();
        plant
    }

    /// A plant with fixed size and growth rate and no wiggle phase.
    pub fn with_size(position: Vec2, size: f32, grow_interval: f32, config: PlantConfig) -> Self {
        let mut plant = Self {
            position,
            initial_size: size,
            size,
            bounce: 0.0,
            wiggle_frequency: config.min_wiggle_frequency,
            wiggle_phase: 0.0,
            lifetime: 0.0,
            last_resize: 0.0,
            grow_interval,
            scale: 1.0,
            disposed: size <= config.dead_size,
            config,
        };
        plant.refresh_scale();
        plant
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn initial_size(&self) -> f32 {
        self.initial_size
    }

    pub fn bounce(&self) -> f32 {
        self.bounce
    }

    /// Visual scale from the last update.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Take one bite. Does nothing once the plant is dead.
    pub fn eat(&mut self) {
        if self.disposed {
            return;
        }
        self.last_resize = self.lifetime;
        self.size -= 1.0;
        if self.size <= self.config.dead_size {
            log::debug!("plant at {} eaten", self.position);
            self.dispose();
            return;
        }

        if self.bounce <= 0.0 {
            self.bounce = self.config.bounce_effect;
        }
    }

    fn grow(&mut self) {
        self.last_resize = self.lifetime;
        if self.size < self.initial_size {
            self.size = (self.size + 1.0).min(self.initial_size);
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.lifetime += dt;

        if !self.disposed && self.lifetime > self.last_resize + self.grow_interval {
            self.grow();
        }

        if self.bounce > 0.0 {
            self.bounce = (self.bounce - self.config.bounce_decay * dt / 1000.0).max(0.0);
        }

        self.refresh_scale();
    }

    fn refresh_scale(&mut self) {
        let wiggle = self.config.wiggle_effect
            * (self.wiggle_frequency * self.lifetime / 1000.0 + self.wiggle_phase).sin();
        self.scale = (self.size / self.initial_size + self.bounce + wiggle).max(0.0);
    }
}

fn lerp(min: f32, max: f32, t: f32) -> f32 {
    min + (max - min) * t
}

impl Entity for Plant {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn render_state(&self) -> RenderState {
        RenderState::Plant {
            position: self.position,
            scale: self.scale,
        }
    }
}

/// Spawn a randomly sized plant and register it as food.
pub fn spawn_plant(
    registry: &mut EntityRegistry,
    position: Vec2,
    config: PlantConfig,
    rng: &mut fastrand::Rng,
) -> hecs::Entity {
    let plant = Plant::new(position, config, rng);
    let name = format!("plant-{}", registry.len());
    registry.spawn(name, &[TAG_PLANT, TAG_FOOD], plant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant(size: f32) -> Plant {
        Plant::with_size(Vec2::ZERO, size, 500.0, PlantConfig::default())
    }

    #[test]
    fn eaten_down_to_dead_size_then_ignored() {
        let mut p = plant(12.0);
        p.eat();
        assert_eq!(p.size(), 11.0);
        assert!(!p.is_disposed());

        p.eat();
        assert_eq!(p.size(), 10.0);
        assert!(p.is_disposed());

        p.eat();
        assert_eq!(p.size(), 10.0);
        assert!(p.is_disposed());
    }

    #[test]
    fn bite_bounces_once_until_settled() {
        let mut p = plant(30.0);
        p.eat();
        assert_eq!(p.bounce(), 0.15);
        p.update(100.0);
        let settling = p.bounce();
        assert!(settling < 0.15);

        p.eat();
        assert_eq!(p.bounce(), settling);

        p.update(1_000.0);
        assert_eq!(p.bounce(), 0.0);
    }

    #[test]
    fn regrows_towards_initial_size_only() {
        let mut p = plant(30.0);
        p.eat();
        p.eat();
        assert_eq!(p.size(), 28.0);

        // Undisturbed for a while: one step per grow interval.
        p.update(501.0);
        assert_eq!(p.size(), 29.0);
        for _ in 0..40 {
            p.update(100.0);
        }
        assert_eq!(p.size(), 30.0);
    }

    #[test]
    fn bites_hold_off_growth() {
        let mut p = plant(30.0);
        p.eat();
        for _ in 0..10 {
            p.update(100.0);
            p.eat();
        }
        assert_eq!(p.size(), 19.0);
    }

    #[test]
    fn dead_plants_do_not_grow_back() {
        let mut p = plant(11.0);
        p.eat();
        assert!(p.is_disposed());
        p.update(5_000.0);
        assert_eq!(p.size(), 10.0);
    }

    #[test]
    fn random_plants_stay_in_bounds() {
        let mut rng = fastrand::Rng::with_seed(11);
        let config = PlantConfig::default();
        for _ in 0..100 {
            let mut p = Plant::new(Vec2::ZERO, config, &mut rng);
            assert!((config.min_size..=config.max_size).contains(&p.size()));
            for _ in 0..50 {
                p.update(37.0);
                if rng.bool() {
                    p.eat();
                }
                assert!(p.size() <= p.initial_size());
                assert!(p.scale() >= 0.0);
            }
        }
    }

    #[test]
    fn spawned_plant_is_food() {
        let mut rng = fastrand::Rng::with_seed(12);
        let mut registry = EntityRegistry::new();
        let id = spawn_plant(&mut registry, Vec2::new(4.0, 4.0), PlantConfig::default(), &mut rng);
        assert!(registry.has_tag(id, TAG_FOOD));
        assert!(registry.has_tag(id, TAG_PLANT));
        assert_eq!(registry.get::<Plant>(id).map(|p| p.position()), Some(Vec2::new(4.0, 4.0)));
    }
}
