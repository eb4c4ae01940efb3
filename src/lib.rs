//! A tank of procedurally animated fish that wander, chase food, nibble
//! plants and scatter from each other, advanced one fixed tick at a time.

pub mod chain;
pub mod config;
pub mod debug;
pub mod ecs;
pub mod fish;
pub mod math;
pub mod plant;
pub mod simulation;
pub mod spatial;
pub mod state;

pub use config::SimConfig;
pub use simulation::{SimError, SimStats, Simulation};
