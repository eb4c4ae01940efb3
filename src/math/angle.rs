use std::f32::consts::{PI, TAU};
use std::fmt;

/// An orientation in the plane.
///
/// Stored as a single raw value in degrees. Reads normalise on the way out:
/// [`Angle::degrees`] lands in `[0, 360)` and [`Angle::radians`] in `(-π, π]`,
/// both derived from the same stored value so they always agree.
///
/// The only ways to build one are [`Angle::from_degrees`],
/// [`Angle::from_radians`] and [`Angle::ZERO`].
#[derive(Clone, Copy)]
pub struct Angle {
    raw_degrees: f32,
}

impl Angle {
    pub const ZERO: Angle = Angle { raw_degrees: 0.0 };

    pub fn from_degrees(degrees: f32) -> Self {
        Self {
            raw_degrees: degrees,
        }
    }

    pub fn from_radians(radians: f32) -> Self {
        Self {
            raw_degrees: radians.to_degrees(),
        }
    }

    /// Degrees in `[0, 360)`.
    pub fn degrees(self) -> f32 {
        let d = self.raw_degrees.rem_euclid(360.0);
        // rem_euclid can round up to the modulus itself.
        if d >= 360.0 {
            0.0
        } else {
            d
        }
    }

    /// Radians in `(-π, π]`.
    pub fn radians(self) -> f32 {
        normalise_radians(self.raw_degrees.to_radians())
    }

    /// Radians exactly as built, with no wrapping. For magnitudes such as
    /// turn limits, where 200° must not read back as 160°.
    pub fn unwrapped_radians(self) -> f32 {
        self.raw_degrees.to_radians()
    }

    /// Signed shortest rotation from `anchor` to `self`, in `(-π, π]`.
    pub fn difference(self, anchor: Angle) -> Angle {
        Angle::from_radians(normalise_radians(self.radians() - anchor.radians()))
    }

    /// Unit direction vector for this heading.
    pub fn to_unit(self) -> glam::Vec2 {
        let (sin, cos) = self.radians().sin_cos();
        glam::Vec2::new(cos, sin)
    }
}

/// Wrap any radian value into `(-π, π]`.
pub fn normalise_radians(radians: f32) -> f32 {
    let shifted = (radians - PI).rem_euclid(TAU);
    let wrapped = shifted - TAU + PI;
    // Rounding near the seam can land on -π itself.
    if shifted == 0.0 || shifted >= TAU || wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}

/// Two angles are equal when they point the same way.
impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        self.degrees() == other.degrees()
    }
}

impl fmt::Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Angle({:.3}°)", self.degrees())
    }
}

impl std::ops::Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle::from_degrees(self.raw_degrees + rhs.raw_degrees)
    }
}

impl std::ops::Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle::from_degrees(self.raw_degrees - rhs.raw_degrees)
    }
}

impl std::ops::Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::from_degrees(-self.raw_degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn degrees_wrap_into_range() {
        assert!((Angle::from_degrees(370.0).degrees() - 10.0).abs() < EPS);
        assert!((Angle::from_degrees(-30.0).degrees() - 330.0).abs() < EPS);
        assert_eq!(Angle::from_degrees(360.0).degrees(), 0.0);
        assert_eq!(Angle::from_degrees(-720.0).degrees(), 0.0);
    }

    #[test]
    fn radians_wrap_into_half_open_range() {
        assert!((Angle::from_radians(-PI).radians() - PI).abs() < EPS);
        assert!((Angle::from_radians(3.0 * PI).radians() - PI).abs() < EPS);
        assert!((Angle::from_degrees(270.0).radians() + PI / 2.0).abs() < EPS);
        assert!(Angle::from_radians(PI).radians() > 0.0);
    }

    #[test]
    fn degrees_and_radians_agree() {
        for raw in [-725.0f32, -181.0, -90.0, 0.0, 45.0, 179.0, 181.0, 359.9, 1000.0] {
            let a = Angle::from_degrees(raw);
            let back = Angle::from_radians(a.radians());
            assert!((back.degrees() - a.degrees()).abs() < 1e-2, "raw {raw}");
        }
    }

    #[test]
    fn equality_ignores_whole_turns() {
        assert_eq!(Angle::from_degrees(0.0), Angle::from_degrees(360.0));
        assert_eq!(Angle::from_degrees(-90.0), Angle::from_degrees(270.0));
        assert_eq!(Angle::ZERO, Angle::from_degrees(-720.0));
        assert_ne!(Angle::from_degrees(10.0), Angle::from_degrees(20.0));
    }

    #[test]
    fn unwrapped_radians_keep_full_magnitude() {
        let a = Angle::from_degrees(200.0);
        assert!((a.unwrapped_radians() - 200f32.to_radians()).abs() < EPS);
        assert!(a.radians() < 0.0);
    }

    #[test]
    fn difference_takes_short_way_round() {
        let a = Angle::from_degrees(10.0);
        let b = Angle::from_degrees(350.0);
        assert!((a.difference(b).degrees() - 20.0).abs() < 1e-3);
        assert!((b.difference(a).radians() + 20f32.to_radians()).abs() < EPS);
    }

    #[test]
    fn difference_of_opposites_is_positive_pi() {
        let d = Angle::from_degrees(0.0).difference(Angle::from_degrees(180.0));
        assert!((d.radians() - PI).abs() < EPS);
    }

    #[test]
    fn unit_vector_points_along_heading() {
        let v = Angle::from_degrees(90.0).to_unit();
        assert!(v.x.abs() < EPS);
        assert!((v.y - 1.0).abs() < EPS);
    }
}
