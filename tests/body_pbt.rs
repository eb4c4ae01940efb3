use fishbowl::config::{FishConfig, PlantConfig};
use fishbowl::ecs::Entity;
use fishbowl::fish::body::Body;
use fishbowl::math::Angle;
use fishbowl::plant::Plant;
use fishbowl::state::{Energy, EnergyRange};
use glam::Vec2;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn constraints_bound_any_rates(
        velocity in -1_000.0f32..1_000.0,
        angular in -1_000.0f32..1_000.0,
    ) {
        let mut body = Body::new(Vec2::ZERO, FishConfig::default());
        body.velocity = velocity;
        body.angular_velocity = angular;
        body.apply_constraints();
        prop_assert!(body.velocity >= 0.0 && body.velocity <= body.max_velocity());
        prop_assert!(body.angular_velocity.abs() <= body.max_angular_velocity());
        if angular != 0.0 && body.angular_velocity != 0.0 {
            prop_assert_eq!(angular.signum(), body.angular_velocity.signum());
        }
    }

    #[test]
    fn rush_to_never_divides_by_zero(
        x in -500.0f32..500.0,
        y in -500.0f32..500.0,
        heading in -360.0f32..360.0,
        dt in prop_oneof![Just(0.0f32), 0.01f32..100.0],
    ) {
        let mut body = Body::new(Vec2::new(1.0, 2.0), FishConfig::default());
        body.angle = Angle::from_degrees(heading);
        body.rush_to(Vec2::new(x, y), dt);
        prop_assert!(body.velocity.is_finite() && body.velocity >= 0.0);
        prop_assert!(body.angular_velocity.is_finite());
    }

    #[test]
    fn energy_only_goes_down_and_tires_once(
        min in 0.0f32..500.0,
        extra in 0.0f32..500.0,
        ticks in prop::collection::vec(0.0f32..100.0, 1..200),
        seed in any::<u64>(),
    ) {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut energy = Energy::new(EnergyRange::new(min, min + extra));
        energy.refill(&mut rng);

        let mut tired = 0;
        let mut last = energy.remaining();
        for dt in ticks {
            if energy.drain(dt) {
                tired += 1;
            }
            prop_assert!(energy.remaining() <= last);
            last = energy.remaining();
        }
        prop_assert!(tired <= 1);
        prop_assert_eq!(tired == 1, energy.remaining() < 0.0);
    }

    #[test]
    fn plants_never_outgrow_themselves(
        seed in any::<u64>(),
        events in prop::collection::vec((0.0f32..400.0, any::<bool>()), 1..200),
    ) {
        let mut rng = fastrand::Rng::with_seed(seed);
        let config = PlantConfig::default();
        let mut plant = Plant::new(Vec2::ZERO, config, &mut rng);

        let mut was_disposed = false;
        for (dt, bite) in events {
            plant.update(dt);
            if bite {
                let before = plant.size();
                plant.eat();
                if was_disposed {
                    prop_assert_eq!(plant.size(), before);
                }
            }
            prop_assert!(plant.size() <= plant.initial_size());
            prop_assert!(plant.scale() >= 0.0);
            if was_disposed {
                prop_assert!(plant.is_disposed());
            }
            was_disposed = plant.is_disposed();
        }
    }
}
