pub mod energy;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

pub use energy::{Energized, Energy, EnergyRange};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("no state registered as {0}")]
    Unregistered(String),
    #[error("cannot replace or remove {0} while it is the current state")]
    Active(String),
}

/// A requested move to another state, with the arguments its `enter` gets.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<N, A> {
    pub to: N,
    pub args: A,
}

impl<N, A: Default> Transition<N, A> {
    pub fn to(name: N) -> Self {
        Self {
            to: name,
            args: A::default(),
        }
    }
}

/// Hooks for one state. `C` is whatever the state works on during a tick.
pub trait State<C> {
    type Name: Copy + Eq + Hash + Debug;
    type Args;

    fn enter(&mut self, _ctx: &mut C, _args: Self::Args, _rng: &mut fastrand::Rng) {}

    /// Returning a transition hands control to that state this same tick.
    fn update(
        &mut self,
        ctx: &mut C,
        dt: f32,
        rng: &mut fastrand::Rng,
    ) -> Option<Transition<Self::Name, Self::Args>>;

    fn exit(&mut self, _ctx: &mut C) {}
}

/// Named states with exactly one (or no) current state.
///
/// `change` always exits the old state before entering the new one. Asking
/// for a name that was never added is an error and leaves the current state
/// running.
#[derive(Debug, Clone)]
pub struct StateMachine<N, S> {
    states: HashMap<N, S>,
    current: Option<N>,
}

impl<N, S> Default for StateMachine<N, S> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
        }
    }
}

impl<N: Copy + Eq + Hash, S> FromIterator<(N, S)> for StateMachine<N, S> {
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
            current: None,
        }
    }
}

impl<N: Copy + Eq + Hash + Debug, S> StateMachine<N, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a state. The current state can't be swapped
    /// out from under itself.
    pub fn add(&mut self, name: N, state: S) -> Result<(), StateError> {
        if self.current == Some(name) {
            return Err(StateError::Active(format!("{name:?}")));
        }
        self.states.insert(name, state);
        Ok(())
    }

    pub fn remove(&mut self, name: N) -> Result<Option<S>, StateError> {
        if self.current == Some(name) {
            return Err(StateError::Active(format!("{name:?}")));
        }
        Ok(self.states.remove(&name))
    }

    pub fn current(&self) -> Option<N> {
        self.current
    }

    pub fn get(&self, name: N) -> Option<&S> {
        self.states.get(&name)
    }

    pub fn current_state(&self) -> Option<&S> {
        self.current.and_then(|name| self.states.get(&name))
    }

    pub fn change<C>(
        &mut self,
        name: N,
        args: S::Args,
        ctx: &mut C,
        rng: &mut fastrand::Rng,
    ) -> Result<(), StateError>
    where
        S: State<C, Name = N>,
    {
        if !self.states.contains_key(&name) {
            return Err(StateError::Unregistered(format!("{name:?}")));
        }

        if let Some(old) = self.current.take() {
            if let Some(state) = self.states.get_mut(&old) {
                state.exit(ctx);
            }
            log::trace!("state {old:?} -> {name:?}");
        }

        self.current = Some(name);
        if let Some(state) = self.states.get_mut(&name) {
            state.enter(ctx, args, rng);
        }
        Ok(())
    }

    /// Tick the current state. No current state is a valid idle machine.
    pub fn update<C>(&mut self, ctx: &mut C, dt: f32, rng: &mut fastrand::Rng)
    where
        S: State<C, Name = N>,
    {
        let Some(name) = self.current else {
            return;
        };
        let Some(state) = self.states.get_mut(&name) else {
            return;
        };

        if let Some(Transition { to, args }) = state.update(ctx, dt, rng) {
            if let Err(e) = self.change(to, args, ctx, rng) {
                log::warn!("{name:?} asked for a bad transition: {e}");
            }
        }
    }
}
