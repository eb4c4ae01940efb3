use glam::Vec2;

use crate::config::FishConfig;
use crate::math::{Angle, VectorExt};

use super::target::TrackTarget;

/// Clamp `value` to `[-max, max]`, keeping its sign. A negative `max` is
/// treated as zero.
pub fn clamp_signed(value: f32, max: f32) -> f32 {
    let max = max.max(0.0);
    value.clamp(-max, max)
}

/// Where a fish is, where it's going and how fast.
#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec2,
    pub angle: Angle,
    /// Pixels per millisecond.
    pub velocity: f32,
    /// Radians per millisecond.
    pub angular_velocity: f32,
    /// Seconds alive.
    pub lifetime: f32,
    pub track_towards: Option<TrackTarget>,
    pub config: FishConfig,
}

impl Body {
    pub fn new(position: Vec2, config: FishConfig) -> Self {
        Self {
            position,
            angle: Angle::ZERO,
            velocity: 0.0,
            angular_velocity: 0.0,
            lifetime: 0.0,
            track_towards: None,
            config,
        }
    }

    pub fn max_velocity(&self) -> f32 {
        self.config.max_velocity
    }

    pub fn max_angular_velocity(&self) -> f32 {
        self.config.max_angular_velocity
    }

    /// Set the rates that would reach `target` in one tick of `dt`.
    /// Caps are left to [`Body::apply_constraints`].
    pub fn rush_to(&mut self, target: Vec2, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let displacement = target - self.position;
        if displacement == Vec2::ZERO {
            self.velocity = 0.0;
            self.angular_velocity = 0.0;
            return;
        }
        self.velocity = displacement.length() / dt;
        let turn = displacement.heading().difference(self.angle);
        self.angular_velocity = turn.radians() / dt;
    }

    pub fn apply_constraints(&mut self) {
        self.velocity = self.velocity.clamp(0.0, self.config.max_velocity.max(0.0));
        self.angular_velocity = clamp_signed(self.angular_velocity, self.config.max_angular_velocity);
    }

    /// Percent-per-second decay, separate rates for linear and angular.
    pub fn apply_friction(&mut self, dt: f32) {
        let seconds = dt / 1000.0;
        self.velocity *= (1.0 - seconds * self.config.velocity_friction).max(0.0);
        self.angular_velocity *= (1.0 - seconds * self.config.angular_friction).max(0.0);
    }

    /// Where this tick's motion would carry the head.
    pub fn displacement(&self, dt: f32) -> Vec2 {
        let heading = Angle::from_radians(self.angle.radians() + self.angular_velocity * dt);
        Vec2::from_heading(heading, self.velocity * dt)
    }

    /// Inside the vision cone: closer than the vision distance and within
    /// half the field of view either side of the heading.
    pub fn is_point_in_sight(&self, point: Vec2) -> bool {
        let offset = point - self.position;
        if offset.length() >= self.config.vision_distance {
            return false;
        }
        let off_axis = offset.heading().difference(self.angle).radians().abs();
        off_axis < self.config.half_fov()
    }
}
