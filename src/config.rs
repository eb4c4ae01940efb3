//! Tunables. All times are milliseconds; rates quoted "per second" are
//! scaled by `dt / 1000` where they're applied.

use std::f32::consts::PI;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::EnergyRange;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    pub energy: EnergyRange,
    /// Length of the random wander offset picked on enter.
    pub step: f32,
    /// How far from the start point before coasting to a stop.
    pub max_distance: f32,
    /// Re-pick a direction once velocity drops below this fraction of max.
    pub stall_fraction: f32,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            energy: EnergyRange::new(1_000.0, 5_000.0),
            step: 10.0,
            max_distance: 10.0,
            stall_fraction: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RushConfig {
    pub energy: EnergyRange,
    /// Inside this radius the fish slows and homes in directly.
    pub slow_radius: f32,
    /// Close enough to feed.
    pub stop_radius: f32,
    /// Per-enter aim offset so pursuers spread out. Keep below `slow_radius`.
    pub noise_offset_radius: f32,
    /// Velocity floor as a fraction of max velocity.
    pub min_velocity_fraction: f32,
}

impl Default for RushConfig {
    fn default() -> Self {
        Self {
            energy: EnergyRange::new(3_000.0, 10_000.0),
            slow_radius: 150.0,
            stop_radius: 10.0,
            noise_offset_radius: 100.0,
            min_velocity_fraction: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub energy: EnergyRange,
    /// Fraction of velocity and angular velocity lost per second.
    pub decay: f32,
    pub bite_interval: f32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            energy: EnergyRange::new(2_000.0, 5_000.0),
            decay: 0.8,
            bite_interval: 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleeConfig {
    pub energy: EnergyRange,
    /// How far ahead along the flee direction to aim each tick.
    pub lead_distance: f32,
}

impl Default for FleeConfig {
    fn default() -> Self {
        Self {
            energy: EnergyRange::new(1_000.0, 3_000.0),
            lead_distance: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    pub joint_count: usize,
    pub joint_distance: f32,
    /// Max bend between neighbouring spine segments.
    pub spine_angle_limit_deg: f32,
    /// Pixels per millisecond.
    pub max_velocity: f32,
    /// Radians per millisecond.
    pub max_angular_velocity: f32,
    /// Fraction of velocity lost per second.
    pub velocity_friction: f32,
    /// Fraction of angular velocity lost per second.
    pub angular_friction: f32,
    pub vision_distance: f32,
    pub vision_fov_deg: f32,
    /// Spine joint swung by the idle tail wiggle.
    pub wiggle_joint: usize,
    /// Wiggle amplitude as a fraction of the spine angle limit.
    pub wiggle_amplitude: f32,
    pub wiggle_frequency: f32,
    pub explore: ExploreConfig,
    pub rush: RushConfig,
    pub feed: FeedConfig,
    pub flee: FleeConfig,
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            joint_count: 10,
            joint_distance: 10.0,
            spine_angle_limit_deg: 22.0,
            max_velocity: 200.0 / 1000.0,
            max_angular_velocity: 1.5 * PI / 1000.0,
            velocity_friction: 0.4,
            angular_friction: 0.7,
            vision_distance: 300.0,
            vision_fov_deg: 120.0,
            wiggle_joint: 5,
            wiggle_amplitude: 1.0 / (20.0 * PI),
            wiggle_frequency: 150.0,
            explore: ExploreConfig::default(),
            rush: RushConfig::default(),
            feed: FeedConfig::default(),
            flee: FleeConfig::default(),
        }
    }
}

impl FishConfig {
    pub fn spine_angle_limit(&self) -> f32 {
        self.spine_angle_limit_deg.to_radians()
    }

    /// Half the field of view, in radians.
    pub fn half_fov(&self) -> f32 {
        self.vision_fov_deg.to_radians() * 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub min_size: f32,
    pub max_size: f32,
    /// At or below this size the plant is dead.
    pub dead_size: f32,
    pub min_grow_interval: f32,
    pub max_grow_interval: f32,
    /// Pulse added to the visual scale on each bite.
    pub bounce_effect: f32,
    /// Bounce lost per second.
    pub bounce_decay: f32,
    pub wiggle_effect: f32,
    /// Wiggles per second.
    pub min_wiggle_frequency: f32,
    pub max_wiggle_frequency: f32,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            min_size: 20.0,
            max_size: 50.0,
            dead_size: 10.0,
            min_grow_interval: 500.0,
            max_grow_interval: 1_000.0,
            bounce_effect: 0.15,
            bounce_decay: 0.5,
            wiggle_effect: 0.05,
            min_wiggle_frequency: 1.0,
            max_wiggle_frequency: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub fish_count: usize,
    pub plant_count: usize,
    /// Fixed seed for reproducible runs; random when absent.
    pub seed: Option<u64>,
    /// Spatial hash table size.
    pub spatial_table_size: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            fish_count: 3,
            plant_count: 8,
            seed: None,
            spatial_table_size: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub fish: FishConfig,
    pub plant: PlantConfig,
}

impl SimConfig {
    /// Read and validate a TOML config. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: SimConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fish = &self.fish;
        let plant = &self.plant;

        if fish.joint_count == 0 {
            return invalid("fish.joint_count must be at least 1");
        }
        if fish.joint_distance <= 0.0 {
            return invalid("fish.joint_distance must be positive");
        }
        if fish.max_velocity < 0.0 || fish.max_angular_velocity < 0.0 {
            return invalid("fish velocity caps must not be negative");
        }
        if fish.velocity_friction < 0.0 || fish.angular_friction < 0.0 {
            return invalid("fish friction rates must not be negative");
        }
        if fish.spine_angle_limit_deg < 0.0 {
            return invalid("fish.spine_angle_limit_deg must not be negative");
        }
        if fish.vision_distance < 0.0 || fish.vision_fov_deg < 0.0 {
            return invalid("fish vision must not be negative");
        }
        for (name, range) in [
            ("explore", fish.explore.energy),
            ("rush", fish.rush.energy),
            ("feed", fish.feed.energy),
            ("flee", fish.flee.energy),
        ] {
            if !range.is_valid() {
                return invalid(&format!("fish.{name}.energy must satisfy 0 <= min <= max"));
            }
        }
        if fish.explore.step < 0.0 || fish.explore.max_distance < 0.0 {
            return invalid("fish.explore distances must not be negative");
        }
        if fish.rush.slow_radius <= 0.0 {
            return invalid("fish.rush.slow_radius must be positive");
        }
        if fish.rush.stop_radius < 0.0 || fish.rush.stop_radius > fish.rush.slow_radius {
            return invalid("fish.rush.stop_radius must be within [0, slow_radius]");
        }
        if fish.rush.noise_offset_radius < 0.0 || fish.rush.min_velocity_fraction < 0.0 {
            return invalid("fish.rush noise and velocity floor must not be negative");
        }
        if fish.feed.decay < 0.0 {
            return invalid("fish.feed.decay must not be negative");
        }
        if fish.feed.bite_interval <= 0.0 {
            return invalid("fish.feed.bite_interval must be positive");
        }
        if plant.min_size > plant.max_size {
            return invalid("plant.min_size must not exceed max_size");
        }
        if plant.dead_size >= plant.min_size {
            return invalid("plant.dead_size must be below min_size");
        }
        if plant.bounce_effect < 0.0 || plant.bounce_decay < 0.0 {
            return invalid("plant bounce must not be negative");
        }
        if plant.min_grow_interval > plant.max_grow_interval {
            return invalid("plant.min_grow_interval must not exceed max_grow_interval");
        }
        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return invalid("world size must be positive");
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg.to_string()))
}
