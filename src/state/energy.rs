use serde::{Deserialize, Serialize};

use super::{State, Transition};

/// Bounds for an energy draw, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyRange {
    pub min: f32,
    pub max: f32,
}

impl EnergyRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min >= 0.0 && self.min <= self.max
    }

    pub fn sample(&self, rng: &mut fastrand::Rng) -> f32 {
        self.min + rng.f32() * (self.max - self.min)
    }
}

/// Randomized countdown. Refilled on every enter, drained by elapsed time.
#[derive(Debug, Clone)]
pub struct Energy {
    range: EnergyRange,
    remaining: f32,
    depleted: bool,
}

impl Energy {
    pub fn new(range: EnergyRange) -> Self {
        Self {
            range,
            remaining: 0.0,
            depleted: false,
        }
    }

    pub fn range(&self) -> EnergyRange {
        self.range
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_depleted(&self) -> bool {
        self.depleted
    }

    pub fn refill(&mut self, rng: &mut fastrand::Rng) {
        self.remaining = self.range.sample(rng);
        self.depleted = false;
    }

    /// Spend `dt`. True only on the call that takes the countdown below zero.
    pub fn drain(&mut self, dt: f32) -> bool {
        self.remaining -= dt.max(0.0);
        if self.remaining < 0.0 && !self.depleted {
            self.depleted = true;
            return true;
        }
        false
    }
}

/// A state that runs on an [`Energy`] budget and decides for itself where
/// to go once it's spent.
pub trait Energized<C>: State<C> {
    fn energy_mut(&mut self) -> &mut Energy;

    /// Called once when the budget runs out.
    fn tired(&mut self, ctx: &mut C) -> Option<Transition<Self::Name, Self::Args>>;

    fn spend_energy(
        &mut self,
        ctx: &mut C,
        dt: f32,
    ) -> Option<Transition<Self::Name, Self::Args>> {
        if self.energy_mut().drain(dt) {
            self.tired(ctx)
        } else {
            None
        }
    }
}
