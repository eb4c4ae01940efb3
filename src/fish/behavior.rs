use glam::Vec2;

use crate::config::FishConfig;
use crate::math::VectorExt;
use crate::spatial::SpatialIndex;
use crate::state::{Energized, Energy, State, StateMachine, Transition};

use super::body::{clamp_signed, Body};
use super::target::TrackTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorName {
    /// Wandering in a random direction.
    Explore,
    /// Zooming towards a target.
    Rush,
    /// Nibbling the target.
    Feed,
    /// Running from a rival.
    Flee,
}

impl BehaviorName {
    pub const ALL: [BehaviorName; 4] = [Self::Explore, Self::Rush, Self::Feed, Self::Flee];

    pub fn label(self) -> &'static str {
        match self {
            Self::Explore => "Explore",
            Self::Rush => "Rush",
            Self::Feed => "Feed",
            Self::Flee => "Flee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EnterArgs {
    #[default]
    None,
    /// Something edible to feed on.
    Food(hecs::Entity),
    /// Where the threat was when it was spotted.
    Threat(Vec2),
}

pub type FishTransition = Transition<BehaviorName, EnterArgs>;

/// One bite taken out of a plant, applied after every fish has moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bite {
    pub by: Option<hecs::Entity>,
    pub plant: hecs::Entity,
}

/// Everything a behavior touches during one tick.
pub struct FishContext<'a> {
    pub body: &'a mut Body,
    pub me: Option<hecs::Entity>,
    pub index: &'a SpatialIndex,
    pub bites: &'a mut Vec<Bite>,
}

impl FishContext<'_> {
    /// Live food inside the vision cone, one picked at random.
    pub fn find_food(&self, rng: &mut fastrand::Rng) -> Option<hecs::Entity> {
        let candidates: Vec<hecs::Entity> = self
            .index
            .within(self.body.position, self.body.config.vision_distance)
            .into_iter()
            .filter(|s| s.food && !s.disposed && Some(s.entity) != self.me)
            .filter(|s| self.body.is_point_in_sight(s.pos))
            .map(|s| s.entity)
            .collect();

        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.usize(..candidates.len())])
        }
    }

    /// Position of the closest other creature in sight.
    pub fn nearest_rival(&self) -> Option<Vec2> {
        let here = self.body.position;
        self.index
            .within(here, self.body.config.vision_distance)
            .into_iter()
            .filter(|s| s.creature && !s.disposed && Some(s.entity) != self.me)
            .filter(|s| self.body.is_point_in_sight(s.pos))
            .map(|s| s.pos)
            .min_by(|a, b| a.distance_squared(here).total_cmp(&b.distance_squared(here)))
    }

    /// Food that still exists and hasn't been eaten up.
    pub fn is_consumable(&self, entity: hecs::Entity) -> bool {
        self.index
            .get(entity)
            .is_some_and(|s| s.food && !s.disposed)
    }

    fn bite(&mut self, plant: hecs::Entity) {
        self.bites.push(Bite { by: self.me, plant });
    }
}

fn random_direction(rng: &mut fastrand::Rng) -> Vec2 {
    let angle = rng.f32() * std::f32::consts::TAU;
    Vec2::new(angle.cos(), angle.sin())
}

// ---------------------------------------------------------------------------
// Explore
// ---------------------------------------------------------------------------

/// Random walk around the spot where exploring started, always on the
/// lookout for food.
#[derive(Debug, Clone)]
pub struct Explore {
    energy: Energy,
    start: Vec2,
    direction: Vec2,
}

impl Explore {
    pub fn new(config: &FishConfig) -> Self {
        Self {
            energy: Energy::new(config.explore.energy),
            start: Vec2::ZERO,
            direction: Vec2::ZERO,
        }
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }
}

impl<'a> State<FishContext<'a>> for Explore {
    type Name = BehaviorName;
    type Args = EnterArgs;

    fn enter(&mut self, ctx: &mut FishContext<'a>, _args: EnterArgs, rng: &mut fastrand::Rng) {
        let step = ctx.body.config.explore.step;
        self.direction =
            Vec2::new(rng.f32() - 0.5, rng.f32() - 0.5).normalize_or_zero() * step;
        self.start = ctx.body.position;
        self.energy.refill(rng);
    }

    fn update(
        &mut self,
        ctx: &mut FishContext<'a>,
        dt: f32,
        rng: &mut fastrand::Rng,
    ) -> Option<FishTransition> {
        if let Some(food) = ctx.find_food(rng) {
            log::trace!("{:?} spotted food {food:?}", ctx.me);
            ctx.body.track_towards = Some(TrackTarget::Entity(food));
            return Some(Transition::to(BehaviorName::Rush));
        }

        let cfg = ctx.body.config;
        let wandered = ctx.body.position.distance(self.start);
        if wandered > cfg.explore.max_distance {
            // Coast to a near stop, then pick a new direction.
            if ctx.body.velocity < cfg.max_velocity * cfg.explore.stall_fraction {
                return Some(Transition::to(BehaviorName::Explore));
            }
        } else if dt > 0.0 {
            // Rush but... slowish!
            let body = &mut *ctx.body;
            body.rush_to(self.start + self.direction, dt);
            body.velocity = body.velocity.min(cfg.max_velocity) / 2.0;
            body.angular_velocity =
                clamp_signed(body.angular_velocity, cfg.max_angular_velocity) / 2.0;
        }

        self.spend_energy(ctx, dt)
    }
}

impl<'a> Energized<FishContext<'a>> for Explore {
    fn energy_mut(&mut self) -> &mut Energy {
        &mut self.energy
    }

    fn tired(&mut self, _ctx: &mut FishContext<'a>) -> Option<FishTransition> {
        Some(Transition::to(BehaviorName::Explore))
    }
}

// ---------------------------------------------------------------------------
// Rush
// ---------------------------------------------------------------------------

/// Home in on `track_towards`, slowing inside the slow radius and switching
/// to Feed once within the stop radius.
#[derive(Debug, Clone)]
pub struct Rush {
    energy: Energy,
    noise_offset: Vec2,
    min_velocity: f32,
}

impl Rush {
    pub fn new(config: &FishConfig) -> Self {
        Self {
            energy: Energy::new(config.rush.energy),
            noise_offset: Vec2::ZERO,
            min_velocity: 0.0,
        }
    }

    pub fn noise_offset(&self) -> Vec2 {
        self.noise_offset
    }
}

impl<'a> State<FishContext<'a>> for Rush {
    type Name = BehaviorName;
    type Args = EnterArgs;

    fn enter(&mut self, ctx: &mut FishContext<'a>, _args: EnterArgs, rng: &mut fastrand::Rng) {
        let cfg = ctx.body.config;
        self.min_velocity = cfg.max_velocity * cfg.rush.min_velocity_fraction;
        self.noise_offset = random_direction(rng) * cfg.rush.noise_offset_radius;
        self.energy.refill(rng);
    }

    fn update(
        &mut self,
        ctx: &mut FishContext<'a>,
        dt: f32,
        _rng: &mut fastrand::Rng,
    ) -> Option<FishTransition> {
        // No target, just explore randomly!
        let Some(target) = ctx.body.track_towards.clone() else {
            return Some(Transition::to(BehaviorName::Explore));
        };

        let lost = target
            .entity()
            .is_some_and(|e| ctx.index.get(e).map_or(true, |s| s.disposed));
        let Some(mut track) = target.resolve(ctx.index).filter(|_| !lost) else {
            log::trace!("{:?} lost its target", ctx.me);
            ctx.body.track_towards = None;
            return Some(Transition::to(BehaviorName::Explore));
        };

        let cfg = ctx.body.config.rush;
        let distance = track.distance(ctx.body.position);
        if distance < cfg.stop_radius {
            let args = match target.entity() {
                Some(e) if ctx.is_consumable(e) => EnterArgs::Food(e),
                _ => EnterArgs::None,
            };
            return Some(Transition {
                to: BehaviorName::Feed,
                args,
            });
        }

        // A paused tick leaves the rates alone.
        if dt <= 0.0 {
            return self.spend_energy(ctx, dt);
        }

        // Spread out so not every pursuer converges on one point.
        if distance > cfg.slow_radius {
            track += self.noise_offset;
        }

        let max_velocity = ctx.body.max_velocity();
        let body = &mut *ctx.body;
        body.rush_to(track, dt);
        if distance <= cfg.slow_radius {
            body.velocity = body.velocity.min(max_velocity) * (distance / cfg.slow_radius);
        }
        // Keep the fishy moving.
        if body.velocity < self.min_velocity {
            body.velocity = self.min_velocity;
        }

        self.spend_energy(ctx, dt)
    }
}

impl<'a> Energized<FishContext<'a>> for Rush {
    fn energy_mut(&mut self) -> &mut Energy {
        &mut self.energy
    }

    fn tired(&mut self, _ctx: &mut FishContext<'a>) -> Option<FishTransition> {
        Some(Transition::to(BehaviorName::Explore))
    }
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

/// Slow right down and bite the food at a steady rhythm until it's gone or
/// the fish loses interest.
#[derive(Debug, Clone)]
pub struct Feed {
    energy: Energy,
    food: Option<hecs::Entity>,
    since_bite: f32,
}

impl Feed {
    pub fn new(config: &FishConfig) -> Self {
        Self {
            energy: Energy::new(config.feed.energy),
            food: None,
            since_bite: 0.0,
        }
    }

    pub fn food(&self) -> Option<hecs::Entity> {
        self.food
    }
}

impl<'a> State<FishContext<'a>> for Feed {
    type Name = BehaviorName;
    type Args = EnterArgs;

    fn enter(&mut self, _ctx: &mut FishContext<'a>, args: EnterArgs, rng: &mut fastrand::Rng) {
        self.food = match args {
            EnterArgs::Food(entity) => Some(entity),
            _ => None,
        };
        self.since_bite = 0.0;
        self.energy.refill(rng);
    }

    fn update(
        &mut self,
        ctx: &mut FishContext<'a>,
        dt: f32,
        _rng: &mut fastrand::Rng,
    ) -> Option<FishTransition> {
        let cfg = ctx.body.config.feed;
        let keep = (1.0 - dt / 1000.0 * cfg.decay).max(0.0);
        ctx.body.velocity *= keep;
        ctx.body.angular_velocity *= keep;

        if let Some(food) = self.food {
            if !ctx.is_consumable(food) {
                log::debug!("{:?} finished eating {food:?}", ctx.me);
                ctx.body.track_towards = None;
                return Some(Transition::to(BehaviorName::Explore));
            }
            self.since_bite += dt;
            if self.since_bite >= cfg.bite_interval {
                self.since_bite -= cfg.bite_interval;
                ctx.bite(food);
            }
        }

        self.spend_energy(ctx, dt)
    }

    fn exit(&mut self, _ctx: &mut FishContext<'a>) {
        self.food = None;
    }
}

impl<'a> Energized<FishContext<'a>> for Feed {
    fn energy_mut(&mut self) -> &mut Energy {
        &mut self.energy
    }

    fn tired(&mut self, _ctx: &mut FishContext<'a>) -> Option<FishTransition> {
        Some(Transition::to(BehaviorName::Explore))
    }
}

// ---------------------------------------------------------------------------
// Flee
// ---------------------------------------------------------------------------

/// Swim straight away from where the threat was. The direction is fixed on
/// enter; nothing is re-sensed until the flight ends.
#[derive(Debug, Clone)]
pub struct Flee {
    energy: Energy,
    direction: Vec2,
}

impl Flee {
    pub fn new(config: &FishConfig) -> Self {
        Self {
            energy: Energy::new(config.flee.energy),
            direction: Vec2::ZERO,
        }
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }
}

impl<'a> State<FishContext<'a>> for Flee {
    type Name = BehaviorName;
    type Args = EnterArgs;

    fn enter(&mut self, ctx: &mut FishContext<'a>, args: EnterArgs, rng: &mut fastrand::Rng) {
        let away = match args {
            EnterArgs::Threat(threat) => (ctx.body.position - threat).normalize_or_zero(),
            _ => Vec2::ZERO,
        };
        // Threat right on top of us: keep going the way we face.
        self.direction = if away == Vec2::ZERO {
            ctx.body.angle.to_unit()
        } else {
            away
        };
        self.energy.refill(rng);
    }

    fn update(
        &mut self,
        ctx: &mut FishContext<'a>,
        dt: f32,
        _rng: &mut fastrand::Rng,
    ) -> Option<FishTransition> {
        let lead = ctx.body.config.flee.lead_distance;
        let aim = ctx.body.position + self.direction * lead;
        ctx.body.rush_to(aim, dt);
        self.spend_energy(ctx, dt)
    }
}

impl<'a> Energized<FishContext<'a>> for Flee {
    fn energy_mut(&mut self) -> &mut Energy {
        &mut self.energy
    }

    fn tired(&mut self, ctx: &mut FishContext<'a>) -> Option<FishTransition> {
        ctx.body.track_towards = None;
        Some(Transition::to(BehaviorName::Explore))
    }
}

// ---------------------------------------------------------------------------
// Closed set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum FishBehavior {
    Explore(Explore),
    Rush(Rush),
    Feed(Feed),
    Flee(Flee),
}

impl FishBehavior {
    pub fn name(&self) -> BehaviorName {
        match self {
            FishBehavior::Explore(_) => BehaviorName::Explore,
            FishBehavior::Rush(_) => BehaviorName::Rush,
            FishBehavior::Feed(_) => BehaviorName::Feed,
            FishBehavior::Flee(_) => BehaviorName::Flee,
        }
    }

    pub fn energy(&self) -> f32 {
        match self {
            FishBehavior::Explore(s) => s.energy.remaining(),
            FishBehavior::Rush(s) => s.energy.remaining(),
            FishBehavior::Feed(s) => s.energy.remaining(),
            FishBehavior::Flee(s) => s.energy.remaining(),
        }
    }
}

impl<'a> State<FishContext<'a>> for FishBehavior {
    type Name = BehaviorName;
    type Args = EnterArgs;

    fn enter(&mut self, ctx: &mut FishContext<'a>, args: EnterArgs, rng: &mut fastrand::Rng) {
        match self {
            FishBehavior::Explore(s) => s.enter(ctx, args, rng),
            FishBehavior::Rush(s) => s.enter(ctx, args, rng),
            FishBehavior::Feed(s) => s.enter(ctx, args, rng),
            FishBehavior::Flee(s) => s.enter(ctx, args, rng),
        }
    }

    fn update(
        &mut self,
        ctx: &mut FishContext<'a>,
        dt: f32,
        rng: &mut fastrand::Rng,
    ) -> Option<FishTransition> {
        match self {
            FishBehavior::Explore(s) => s.update(ctx, dt, rng),
            FishBehavior::Rush(s) => s.update(ctx, dt, rng),
            FishBehavior::Feed(s) => s.update(ctx, dt, rng),
            FishBehavior::Flee(s) => s.update(ctx, dt, rng),
        }
    }

    fn exit(&mut self, ctx: &mut FishContext<'a>) {
        match self {
            FishBehavior::Explore(s) => s.exit(ctx),
            FishBehavior::Rush(s) => s.exit(ctx),
            FishBehavior::Feed(s) => s.exit(ctx),
            FishBehavior::Flee(s) => s.exit(ctx),
        }
    }
}

/// A machine with all four behaviors registered and nothing entered yet.
pub fn fish_brain(config: &FishConfig) -> StateMachine<BehaviorName, FishBehavior> {
    [
        (BehaviorName::Explore, FishBehavior::Explore(Explore::new(config))),
        (BehaviorName::Rush, FishBehavior::Rush(Rush::new(config))),
        (BehaviorName::Feed, FishBehavior::Feed(Feed::new(config))),
        (BehaviorName::Flee, FishBehavior::Flee(Flee::new(config))),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Angle;
    use crate::state::EnergyRange;

    const EPS: f32 = 1e-6;

    fn body() -> Body {
        Body::new(Vec2::ZERO, FishConfig::default())
    }

    fn tick<S>(
        state: &mut S,
        body: &mut Body,
        index: &SpatialIndex,
        dt: f32,
        rng: &mut fastrand::Rng,
    ) -> Option<BehaviorName>
    where
        for<'a> S: State<FishContext<'a>, Name = BehaviorName, Args = EnterArgs>,
    {
        let mut bites = Vec::new();
        let mut ctx = FishContext {
            body,
            me: None,
            index,
            bites: &mut bites,
        };
        state.update(&mut ctx, dt, rng).map(|t| t.to)
    }

    fn enter<S>(state: &mut S, body: &mut Body, args: EnterArgs, rng: &mut fastrand::Rng)
    where
        for<'a> S: State<FishContext<'a>, Name = BehaviorName, Args = EnterArgs>,
    {
        let index = SpatialIndex::new(64.0, 16);
        let mut bites = Vec::new();
        let mut ctx = FishContext {
            body,
            me: None,
            index: &index,
            bites: &mut bites,
        };
        state.enter(&mut ctx, args, rng);
    }

    fn rushing_at(target: Vec2, rng: &mut fastrand::Rng) -> (Rush, Body) {
        let mut b = body();
        b.track_towards = Some(TrackTarget::Fixed(target));
        let mut rush = Rush::new(&b.config);
        enter(&mut rush, &mut b, EnterArgs::None, rng);
        (rush, b)
    }

    #[test]
    fn explore_paused_tick_keeps_rates() {
        let mut rng = fastrand::Rng::with_seed(1);
        let index = SpatialIndex::new(64.0, 16);
        let mut b = body();
        let mut explore = Explore::new(&b.config);
        enter(&mut explore, &mut b, EnterArgs::None, &mut rng);

        b.velocity = 0.1;
        b.angular_velocity = 0.002;
        for _ in 0..5 {
            assert_eq!(tick(&mut explore, &mut b, &index, 0.0, &mut rng), None);
        }
        assert_eq!(b.velocity, 0.1);
        assert_eq!(b.angular_velocity, 0.002);
    }

    #[test]
    fn explore_wanders_at_half_speed() {
        let mut rng = fastrand::Rng::with_seed(2);
        let index = SpatialIndex::new(64.0, 16);
        let mut b = body();
        let mut explore = Explore::new(&b.config);
        enter(&mut explore, &mut b, EnterArgs::None, &mut rng);
        assert!((explore.direction().length() - b.config.explore.step).abs() < 1e-4);

        tick(&mut explore, &mut b, &index, 16.0, &mut rng);
        assert!((b.velocity - b.config.max_velocity / 2.0).abs() < EPS);
        assert!(b.angular_velocity.abs() <= b.config.max_angular_velocity / 2.0 + EPS);
    }

    #[test]
    fn explore_coasts_past_max_distance_then_picks_again() {
        let mut rng = fastrand::Rng::with_seed(3);
        let index = SpatialIndex::new(64.0, 16);
        let mut b = body();
        let mut explore = Explore::new(&b.config);
        enter(&mut explore, &mut b, EnterArgs::None, &mut rng);

        b.position = Vec2::new(b.config.explore.max_distance + 40.0, 0.0);
        b.velocity = 0.1;
        assert_eq!(tick(&mut explore, &mut b, &index, 16.0, &mut rng), None);
        assert_eq!(b.velocity, 0.1);

        b.velocity = b.config.max_velocity * b.config.explore.stall_fraction / 2.0;
        assert_eq!(
            tick(&mut explore, &mut b, &index, 16.0, &mut rng),
            Some(BehaviorName::Explore)
        );
    }

    #[test]
    fn explore_tired_starts_over() {
        let mut rng = fastrand::Rng::with_seed(4);
        let index = SpatialIndex::new(64.0, 16);
        let mut b = body();
        b.config.explore.energy = EnergyRange::new(10.0, 10.0);
        let mut explore = Explore::new(&b.config);
        enter(&mut explore, &mut b, EnterArgs::None, &mut rng);

        assert_eq!(
            tick(&mut explore, &mut b, &index, 20.0, &mut rng),
            Some(BehaviorName::Explore)
        );
    }

    #[test]
    fn rush_paused_tick_keeps_rates() {
        let mut rng = fastrand::Rng::with_seed(5);
        let index = SpatialIndex::new(64.0, 16);
        let (mut rush, mut b) = rushing_at(Vec2::new(50.0, 0.0), &mut rng);

        b.velocity = 0.15;
        b.angular_velocity = -0.001;
        assert_eq!(tick(&mut rush, &mut b, &index, 0.0, &mut rng), None);
        assert_eq!(b.velocity, 0.15);
        assert_eq!(b.angular_velocity, -0.001);
    }

    #[test]
    fn rush_slows_in_proportion_inside_slow_radius() {
        let mut rng = fastrand::Rng::with_seed(6);
        let index = SpatialIndex::new(64.0, 16);
        let (mut rush, mut b) = rushing_at(Vec2::new(100.0, 0.0), &mut rng);

        tick(&mut rush, &mut b, &index, 16.0, &mut rng);
        let expected = b.config.max_velocity * (100.0 / b.config.rush.slow_radius);
        assert!((b.velocity - expected).abs() < EPS, "{}", b.velocity);
    }

    #[test]
    fn rush_never_drops_below_min_velocity() {
        let mut rng = fastrand::Rng::with_seed(7);
        let index = SpatialIndex::new(64.0, 16);
        let (mut rush, mut b) = rushing_at(Vec2::new(20.0, 0.0), &mut rng);

        tick(&mut rush, &mut b, &index, 16.0, &mut rng);
        let floor = b.config.max_velocity * b.config.rush.min_velocity_fraction;
        assert_eq!(b.velocity, floor);
    }

    #[test]
    fn rush_noise_only_applies_far_out() {
        let mut rng = fastrand::Rng::with_seed(8);
        let index = SpatialIndex::new(64.0, 16);

        // Close: aim straight at the target.
        let (mut rush, mut b) = rushing_at(Vec2::new(100.0, 0.0), &mut rng);
        tick(&mut rush, &mut b, &index, 16.0, &mut rng);
        assert!(b.angular_velocity.abs() < EPS);

        // Far: aim at the target plus this pursuit's offset.
        let far = Vec2::new(1_000.0, 0.0);
        let (mut rush, mut b) = rushing_at(far, &mut rng);
        let noise = rush.noise_offset();
        assert!((noise.length() - b.config.rush.noise_offset_radius).abs() < 1e-3);

        tick(&mut rush, &mut b, &index, 16.0, &mut rng);
        let turn = (far + noise).heading().difference(Angle::ZERO).radians() / 16.0;
        assert!((b.angular_velocity - turn).abs() < EPS);
    }

    #[test]
    fn flee_runs_away_then_tires_into_explore() {
        let mut rng = fastrand::Rng::with_seed(9);
        let index = SpatialIndex::new(64.0, 16);
        let mut b = body();
        b.config.flee.energy = EnergyRange::new(30.0, 30.0);
        b.track_towards = Some(TrackTarget::Fixed(Vec2::new(5.0, 5.0)));
        let mut flee = Flee::new(&b.config);
        enter(&mut flee, &mut b, EnterArgs::Threat(Vec2::new(0.0, -20.0)), &mut rng);
        assert!((flee.direction() - Vec2::new(0.0, 1.0)).length() < 1e-5);

        assert_eq!(tick(&mut flee, &mut b, &index, 16.0, &mut rng), None);
        assert!(b.velocity > 0.0);
        assert!(b.angular_velocity > 0.0);
        assert!(b.track_towards.is_some());

        assert_eq!(
            tick(&mut flee, &mut b, &index, 16.0, &mut rng),
            Some(BehaviorName::Explore)
        );
        assert!(b.track_towards.is_none());
    }
}
