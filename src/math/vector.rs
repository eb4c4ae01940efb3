use glam::Vec2;

use super::angle::Angle;

/// 2D point or direction. Arithmetic, `length`, `distance` and
/// `normalize_or_zero` come straight from glam; a zero-length vector
/// normalises to the zero vector.
pub type Vector = Vec2;

/// Angle-aware helpers glam doesn't provide.
pub trait VectorExt {
    /// Direction of this vector measured from the +x axis.
    /// The zero vector reports a heading of zero.
    fn heading(self) -> Angle;

    /// Vector of `length` pointing along `angle`.
    fn from_heading(angle: Angle, length: f32) -> Self;

    /// Rotate about the origin.
    fn rotated(self, angle: Angle) -> Self;

    /// Rotate about `pivot`.
    fn rotated_about(self, pivot: Self, angle: Angle) -> Self;
}

impl VectorExt for Vec2 {
    fn heading(self) -> Angle {
        Angle::from_radians(self.y.atan2(self.x))
    }

    fn from_heading(angle: Angle, length: f32) -> Self {
        angle.to_unit() * length
    }

    fn rotated(self, angle: Angle) -> Self {
        angle.to_unit().rotate(self)
    }

    fn rotated_about(self, pivot: Self, angle: Angle) -> Self {
        pivot + (self - pivot).rotated(angle)
    }
}
