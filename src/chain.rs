use std::f32::consts::PI;

use glam::Vec2;
use thiserror::Error;

use crate::math::{Angle, VectorExt};

#[derive(Debug, Error, PartialEq)]
pub enum ChainError {
    #[error("a chain needs at least one joint")]
    NoJoints,
}

/// Keep `point` within `constraint` of `anchor`.
pub fn constrain_distance(point: Vec2, anchor: Vec2, constraint: f32) -> Vec2 {
    let offset = point - anchor;
    if offset.length() <= constraint {
        point
    } else {
        anchor + offset.normalize_or_zero() * constraint
    }
}

/// Keep `angle` within `limit` radians of `anchor`, turning the short way.
/// Past the limit the result is `anchor ± limit` on the side `angle` was on.
pub fn constrain_angle(angle: Angle, anchor: Angle, limit: f32) -> Angle {
    let diff = angle.difference(anchor).radians();
    if diff.abs() <= limit {
        angle
    } else {
        Angle::from_radians(anchor.radians() + diff.signum() * limit)
    }
}

/// A kinematic spine: joints head-to-tail with a heading per joint.
///
/// After [`Chain::resolve`], adjacent joints sit exactly `joint_distance`
/// apart and adjacent angles differ by at most `angle_limit`.
#[derive(Debug, Clone)]
pub struct Chain {
    joints: Vec<Vec2>,
    angles: Vec<Angle>,
    joint_distance: f32,
    /// Radians, in `[0, π]`.
    angle_limit: f32,
}

impl Chain {
    /// Lay `joint_count` joints out straight down (+y) from `origin`.
    ///
    /// `angle_limit` is a bend magnitude, not a heading: its sign is dropped
    /// and anything of 180° or more leaves the joints free.
    pub fn new(
        origin: Vec2,
        joint_count: usize,
        joint_distance: f32,
        angle_limit: Angle,
    ) -> Result<Self, ChainError> {
        Self::with_limit_radians(
            origin,
            joint_count,
            joint_distance,
            angle_limit.unwrapped_radians().abs(),
        )
    }

    /// Like [`Chain::new`] but with a raw radian limit; anything `>= π`
    /// leaves the joints unconstrained in angle.
    pub fn with_limit_radians(
        origin: Vec2,
        joint_count: usize,
        joint_distance: f32,
        angle_limit: f32,
    ) -> Result<Self, ChainError> {
        if joint_count == 0 {
            return Err(ChainError::NoJoints);
        }

        let joints = (0..joint_count)
            .map(|i| origin + Vec2::new(0.0, joint_distance * i as f32))
            .collect();

        Ok(Self {
            joints,
            angles: vec![Angle::ZERO; joint_count],
            joint_distance,
            angle_limit: angle_limit.clamp(0.0, PI),
        })
    }

    pub fn joints(&self) -> &[Vec2] {
        &self.joints
    }

    pub fn angles(&self) -> &[Angle] {
        &self.angles
    }

    pub fn joint_distance(&self) -> f32 {
        self.joint_distance
    }

    pub fn angle_limit(&self) -> f32 {
        self.angle_limit
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn head(&self) -> Vec2 {
        self.joints[0]
    }

    pub fn heading(&self) -> Angle {
        self.angles[0]
    }

    /// Teleport the head without touching the rest of the body.
    pub fn set_head(&mut self, position: Vec2, angle: Angle) {
        self.joints[0] = position;
        self.angles[0] = angle;
    }

    /// Rotate joint `index` about its predecessor. Out-of-range indices and
    /// the head are ignored.
    pub fn bend(&mut self, index: usize, angle: Angle) {
        if index == 0 || index >= self.joints.len() {
            return;
        }
        let pivot = self.joints[index - 1];
        self.joints[index] = self.joints[index].rotated_about(pivot, angle);
    }

    /// Move the head to `target` and drag the body after it.
    ///
    /// Single forward pass: each joint points back at its freshly placed
    /// predecessor, clamped to `angle_limit` from the predecessor's angle.
    pub fn resolve(&mut self, target: Vec2) {
        let head_step = target - self.joints[0];
        if head_step != Vec2::ZERO {
            self.angles[0] = head_step.heading();
        }
        self.joints[0] = target;

        for i in 1..self.joints.len() {
            let towards_prev = self.joints[i - 1] - self.joints[i];
            let raw = if towards_prev == Vec2::ZERO {
                self.angles[i - 1]
            } else {
                towards_prev.heading()
            };
            self.angles[i] = constrain_angle(raw, self.angles[i - 1], self.angle_limit);
            self.joints[i] =
                self.joints[i - 1] - Vec2::from_heading(self.angles[i], self.joint_distance);
        }
    }

    /// Two-pass distance relaxation: pin the head to `target` and walk
    /// forward, then pin the tail to `anchor` and walk back. Only distance is
    /// constrained; angles are refreshed from the resulting shape.
    pub fn resolve_fabrik(&mut self, target: Vec2, anchor: Vec2) {
        let last = self.joints.len() - 1;

        self.joints[0] = target;
        for i in 1..=last {
            self.joints[i] =
                constrain_distance(self.joints[i], self.joints[i - 1], self.joint_distance);
        }

        self.joints[last] = anchor;
        for i in (0..last).rev() {
            self.joints[i] =
                constrain_distance(self.joints[i], self.joints[i + 1], self.joint_distance);
        }

        for i in 1..=last {
            let towards_prev = self.joints[i - 1] - self.joints[i];
            if towards_prev != Vec2::ZERO {
                self.angles[i] = towards_prev.heading();
            }
        }
        if last > 0 {
            self.angles[0] = self.angles[1];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn assert_constraints(chain: &Chain) {
        for i in 1..chain.len() {
            let d = chain.joints()[i].distance(chain.joints()[i - 1]);
            assert!(
                (d - chain.joint_distance()).abs() < EPS,
                "joint {i} sits {d} from its predecessor"
            );
            let bend = chain.angles()[i].difference(chain.angles()[i - 1]).radians();
            assert!(
                bend.abs() <= chain.angle_limit() + EPS,
                "joint {i} bends {bend} rad"
            );
        }
    }

    #[test]
    fn zero_joints_is_rejected() {
        let err = Chain::new(Vec2::ZERO, 0, 10.0, Angle::from_degrees(30.0)).unwrap_err();
        assert_eq!(err, ChainError::NoJoints);
    }

    #[test]
    fn wide_limits_saturate_at_half_turn() {
        let wide = Chain::new(Vec2::ZERO, 3, 10.0, Angle::from_degrees(200.0)).unwrap();
        assert_eq!(wide.angle_limit(), PI);
        let negative = Chain::new(Vec2::ZERO, 3, 10.0, Angle::from_degrees(-30.0)).unwrap();
        assert!((negative.angle_limit() - 30f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn new_chain_hangs_straight_down() {
        let chain = Chain::new(Vec2::new(1.0, 2.0), 3, 10.0, Angle::from_degrees(30.0)).unwrap();
        assert_eq!(chain.joints(), &[
            Vec2::new(1.0, 2.0),
            Vec2::new(1.0, 12.0),
            Vec2::new(1.0, 22.0)
        ]);
    }

    #[test]
    fn three_joint_scenario() {
        let mut chain = Chain::new(Vec2::ZERO, 3, 10.0, Angle::from_degrees(30.0)).unwrap();
        chain.resolve(Vec2::new(10.0, 0.0));

        assert_eq!(chain.head(), Vec2::new(10.0, 0.0));
        assert!(chain.heading().radians().abs() < EPS);

        // Raw bend at joint 1 is -45°, clamped to -30°.
        let expected_1 = Vec2::new(10.0, 0.0)
            - Vec2::from_heading(Angle::from_degrees(-30.0), 10.0);
        assert!(chain.joints()[1].distance(expected_1) < EPS);
        assert!((chain.angles()[1].degrees() - 330.0).abs() < 1e-2);
        // Joint 2 is clamped another 30° further round.
        assert!((chain.angles()[2].degrees() - 300.0).abs() < 1e-2);
        assert_constraints(&chain);
    }

    #[test]
    fn clamp_never_goes_the_long_way_round() {
        let anchor = Angle::from_degrees(170.0);
        let angle = Angle::from_degrees(-150.0); // 40° past the anchor, across ±180
        let limited = constrain_angle(angle, anchor, 20f32.to_radians());
        assert!((limited.degrees() - 190.0).abs() < 1e-2);
    }

    #[test]
    fn clamp_leaves_small_bends_alone() {
        let anchor = Angle::from_degrees(10.0);
        let angle = Angle::from_degrees(25.0);
        let limited = constrain_angle(angle, anchor, 20f32.to_radians());
        assert_eq!(limited, angle);
    }

    #[test]
    fn standing_still_keeps_heading() {
        let mut chain = Chain::new(Vec2::ZERO, 4, 5.0, Angle::from_degrees(22.0)).unwrap();
        chain.resolve(Vec2::new(0.0, -5.0));
        let heading = chain.heading();
        chain.resolve(chain.head());
        assert_eq!(chain.heading(), heading);
        assert_constraints(&chain);
    }

    #[test]
    fn long_walk_keeps_constraints() {
        let mut chain = Chain::new(Vec2::ZERO, 10, 10.0, Angle::from_degrees(22.0)).unwrap();
        let mut rng = fastrand::Rng::with_seed(7);
        let mut head = Vec2::ZERO;
        for _ in 0..500 {
            head += Vec2::new(rng.f32() * 8.0 - 4.0, rng.f32() * 8.0 - 4.0);
            chain.resolve(head);
            assert_constraints(&chain);
        }
    }

    #[test]
    fn single_joint_chain_just_moves() {
        let mut chain = Chain::new(Vec2::ZERO, 1, 10.0, Angle::from_degrees(22.0)).unwrap();
        chain.resolve(Vec2::new(3.0, 4.0));
        assert_eq!(chain.joints(), &[Vec2::new(3.0, 4.0)]);
    }

    #[test]
    fn bend_keeps_distance_to_predecessor() {
        let mut chain = Chain::new(Vec2::ZERO, 6, 10.0, Angle::from_degrees(22.0)).unwrap();
        chain.bend(3, Angle::from_degrees(15.0));
        assert!((chain.joints()[3].distance(chain.joints()[2]) - 10.0).abs() < EPS);
        chain.bend(0, Angle::from_degrees(15.0));
        assert_eq!(chain.head(), Vec2::ZERO);
    }

    #[test]
    fn fabrik_respects_spacing_when_reachable() {
        let mut chain = Chain::new(Vec2::ZERO, 5, 10.0, Angle::from_degrees(180.0)).unwrap();
        chain.resolve_fabrik(Vec2::new(5.0, 0.0), Vec2::new(5.0, 35.0));
        assert_eq!(chain.joints()[4], Vec2::new(5.0, 35.0));
        for i in 1..chain.len() {
            let d = chain.joints()[i].distance(chain.joints()[i - 1]);
            assert!(d <= 10.0 + EPS);
        }
    }

    #[test]
    fn constrain_distance_pulls_in_far_points() {
        let p = constrain_distance(Vec2::new(30.0, 0.0), Vec2::new(10.0, 0.0), 5.0);
        assert_eq!(p, Vec2::new(15.0, 0.0));
        let q = constrain_distance(Vec2::new(12.0, 0.0), Vec2::new(10.0, 0.0), 5.0);
        assert_eq!(q, Vec2::new(12.0, 0.0));
    }
}
