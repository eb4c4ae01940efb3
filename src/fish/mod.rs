pub mod behavior;
pub mod body;
pub mod target;

use glam::Vec2;

use crate::chain::{Chain, ChainError};
use crate::config::FishConfig;
use crate::ecs::components::{TAG_CREATURE, TAG_FISH};
use crate::ecs::{Entity, EntityRegistry, RenderState};
use crate::math::Angle;
use crate::spatial::SpatialIndex;
use crate::state::{StateError, StateMachine};

use self::behavior::{fish_brain, BehaviorName, Bite, EnterArgs, FishBehavior, FishContext};
use self::body::Body;
use self::target::TrackTarget;

/// A fish: a jointed spine dragged around by a behavior-driven head.
///
/// Simplified from https://github.com/argonautcode/animal-proc-anim
pub struct Fish {
    body: Body,
    spine: Chain,
    brain: StateMachine<BehaviorName, FishBehavior>,
    disposed: bool,
}

impl Fish {
    /// Build a fish at `position` and start it exploring.
    pub fn new(
        position: Vec2,
        config: FishConfig,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, ChainError> {
        let spine = Chain::with_limit_radians(
            position,
            config.joint_count,
            config.joint_distance,
            config.spine_angle_limit(),
        )?;
        let mut fish = Self {
            body: Body::new(position, config),
            spine,
            brain: fish_brain(&config),
            disposed: false,
        };

        let idle = SpatialIndex::new(1.0, 1);
        if let Err(e) = fish.set_behavior(BehaviorName::Explore, EnterArgs::None, None, &idle, rng) {
            log::warn!("new fish could not start exploring: {e}");
        }
        Ok(fish)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn spine(&self) -> &Chain {
        &self.spine
    }

    pub fn behavior(&self) -> Option<BehaviorName> {
        self.brain.current()
    }

    pub fn brain(&self) -> &StateMachine<BehaviorName, FishBehavior> {
        &self.brain
    }

    pub fn track_towards(&self) -> Option<&TrackTarget> {
        self.body.track_towards.as_ref()
    }

    pub fn set_track_towards(&mut self, target: Option<TrackTarget>) {
        self.body.track_towards = target;
    }

    /// Teleport the head (and the spine's head joint) without simulating.
    pub fn set_position(&mut self, position: Vec2, angle: Angle) {
        self.spine.set_head(position, angle);
        self.body.position = position;
        self.body.angle = angle;
    }

    /// Switch behavior outside the tick, e.g. from a driver or a test.
    pub fn set_behavior(
        &mut self,
        name: BehaviorName,
        args: EnterArgs,
        me: Option<hecs::Entity>,
        index: &SpatialIndex,
        rng: &mut fastrand::Rng,
    ) -> Result<(), StateError> {
        let mut bites = Vec::new();
        let mut ctx = FishContext {
            body: &mut self.body,
            me,
            index,
            bites: &mut bites,
        };
        self.brain.change(name, args, &mut ctx, rng)
    }

    /// One tick: sense, behave, clamp, wiggle, move.
    pub fn update(
        &mut self,
        me: Option<hecs::Entity>,
        dt: f32,
        index: &SpatialIndex,
        rng: &mut fastrand::Rng,
        bites: &mut Vec<Bite>,
    ) {
        self.body.lifetime += dt / 1000.0;

        let mut ctx = FishContext {
            body: &mut self.body,
            me,
            index,
            bites,
        };

        // No re-sensing once in flight.
        if self.brain.current() != Some(BehaviorName::Flee) {
            if let Some(threat) = ctx.nearest_rival() {
                log::debug!("{me:?} spotted a rival at {threat}, fleeing");
                if let Err(e) =
                    self.brain
                        .change(BehaviorName::Flee, EnterArgs::Threat(threat), &mut ctx, rng)
                {
                    log::warn!("{me:?} could not flee: {e}");
                }
            }
        }

        self.brain.update(&mut ctx, dt, rng);

        self.body.apply_constraints();
        self.wiggle();
        self.apply_physics(dt);
    }

    /// Swing the mid-body joint, harder and faster the quicker the fish swims.
    fn wiggle(&mut self) {
        let cfg = &self.body.config;
        if cfg.max_velocity <= 0.0 {
            return;
        }
        let speed = self.body.velocity / cfg.max_velocity;
        let phase = self.body.velocity * cfg.wiggle_frequency * self.body.lifetime;
        let amount = speed * speed * self.spine.angle_limit() * cfg.wiggle_amplitude * phase.sin();
        self.spine.bend(cfg.wiggle_joint, Angle::from_radians(amount));
    }

    fn apply_physics(&mut self, dt: f32) {
        let target = self.body.position + self.body.displacement(dt);
        self.spine.resolve(target);
        self.body.position = self.spine.head();
        self.body.angle = self.spine.heading();
        self.body.apply_friction(dt);
    }
}

impl Entity for Fish {
    fn position(&self) -> Vec2 {
        self.body.position
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn render_state(&self) -> RenderState {
        RenderState::Creature {
            position: self.body.position,
            angle: self.body.angle,
            joints: self.spine.joints().to_vec(),
        }
    }
}

/// Spawn a fish facing a random direction and register it.
pub fn spawn_fish(
    registry: &mut EntityRegistry,
    position: Vec2,
    config: FishConfig,
    rng: &mut fastrand::Rng,
) -> Result<hecs::Entity, ChainError> {
    let mut fish = Fish::new(position, config, rng)?;
    let heading = Angle::from_radians(rng.f32() * std::f32::consts::TAU);
    fish.set_position(position, heading);

    let name = generate_fish_name(rng, registry.len());
    Ok(registry.spawn(name, &[TAG_FISH, TAG_CREATURE], fish))
}

/// Generate a procedural fish name from name parts.
fn generate_fish_name(rng: &mut fastrand::Rng, serial: usize) -> String {
    const PREFIXES: &[&str] = &[
        "", "", "", "", "Sir ", "Lady ", "Captain ", "Little ", "Big ", "Old ",
    ];
    const NAMES: &[&str] = &[
        "Bubbles", "Finn", "Koi", "Nemo", "Goldie", "Splash", "Marlin", "Dory",
        "Gill", "Pebble", "Coral", "Minnow", "Ripple", "Squirt", "Puddle", "Kelp",
    ];
    const SUFFIXES: &[&str] = &["", "", "", " Jr.", " the Swift", " McScales"];
    format!(
        "{}{}{} #{serial}",
        PREFIXES[rng.usize(0..PREFIXES.len())],
        NAMES[rng.usize(0..NAMES.len())],
        SUFFIXES[rng.usize(0..SUFFIXES.len())],
    )
}
