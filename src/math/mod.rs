pub mod angle;
pub mod vector;

pub use angle::Angle;
pub use vector::{Vector, VectorExt};
