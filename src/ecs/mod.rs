pub mod components;
pub mod registry;
pub mod systems;

use glam::Vec2;

use crate::math::Angle;

pub use registry::EntityRegistry;

/// What the renderer needs from an entity after a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    Creature {
        position: Vec2,
        angle: Angle,
        /// Head to tail.
        joints: Vec<Vec2>,
    },
    Plant {
        position: Vec2,
        scale: f32,
    },
}

/// Capabilities every simulated entity shares.
pub trait Entity {
    fn position(&self) -> Vec2;

    /// Disposed entities still report a position but are never picked as
    /// new targets and get despawned at the end of the tick.
    fn is_disposed(&self) -> bool;

    fn dispose(&mut self);

    fn render_state(&self) -> RenderState;
}
