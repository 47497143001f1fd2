//! 26.6 fixed-point arithmetic used throughout hinting and rasterization.
//!
//! Six fractional bits give 1/64 pixel precision, which is what the hint
//! engine and the blitters both need for sub-pixel stem placement without
//! paying for floating point in the hot path.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct F26Dot6(i32);

impl F26Dot6 {
    pub const FRAC_BITS: u32 = 6;
    pub const FRAC_MASK: i32 = (1 << Self::FRAC_BITS) - 1;
    pub const ONE: F26Dot6 = F26Dot6(1 << Self::FRAC_BITS);
    pub const ZERO: F26Dot6 = F26Dot6(0);
    pub const HALF: F26Dot6 = F26Dot6(1 << (Self::FRAC_BITS - 1));

    #[inline]
    pub const fn from_int(x: i32) -> Self {
        F26Dot6(x << Self::FRAC_BITS)
    }

    #[inline]
    pub fn from_float(x: f64) -> Self {
        F26Dot6((x * 64.0).round() as i32)
    }

    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Round to the nearest whole pixel, ties away from zero.
    #[inline]
    pub const fn to_int_round(self) -> i32 {
        if self.0 >= 0 {
            (self.0 + Self::HALF.0) >> Self::FRAC_BITS
        } else {
            -(((-self.0) + Self::HALF.0) >> Self::FRAC_BITS)
        }
    }

    #[inline]
    pub const fn frac(self) -> i32 {
        self.0 & Self::FRAC_MASK
    }

    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64 / 64.0
    }

    #[inline]
    pub const fn mul(self, other: F26Dot6) -> F26Dot6 {
        F26Dot6(((self.0 as i64 * other.0 as i64) >> Self::FRAC_BITS) as i32)
    }

    #[inline]
    pub const fn div(self, other: F26Dot6) -> F26Dot6 {
        F26Dot6((((self.0 as i64) << Self::FRAC_BITS) / other.0 as i64) as i32)
    }

    #[inline]
    pub const fn abs(self) -> F26Dot6 {
        F26Dot6(self.0.abs())
    }

    #[inline]
    pub const fn floor(self) -> F26Dot6 {
        F26Dot6(self.0 & !Self::FRAC_MASK)
    }

    #[inline]
    pub const fn ceil(self) -> F26Dot6 {
        if self.0 & Self::FRAC_MASK == 0 {
            self
        } else {
            F26Dot6((self.0 & !Self::FRAC_MASK) + Self::ONE.0)
        }
    }

    /// Nearest pixel boundary, used by the hint engine's point-hinting pass.
    #[inline]
    pub const fn round_to_pixel(self) -> F26Dot6 {
        F26Dot6::from_int(self.to_int_round())
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        F26Dot6(raw)
    }
}

impl Add for F26Dot6 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        F26Dot6(self.0 + other.0)
    }
}

impl Sub for F26Dot6 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        F26Dot6(self.0 - other.0)
    }
}

impl AddAssign for F26Dot6 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl SubAssign for F26Dot6 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for F26Dot6 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        F26Dot6(-self.0)
    }
}

impl From<i32> for F26Dot6 {
    #[inline]
    fn from(x: i32) -> Self {
        Self::from_int(x)
    }
}

impl From<f64> for F26Dot6 {
    #[inline]
    fn from(x: f64) -> Self {
        Self::from_float(x)
    }
}

impl From<F26Dot6> for f64 {
    #[inline]
    fn from(x: F26Dot6) -> f64 {
        x.to_float()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants() {
        assert_eq!(F26Dot6::ZERO.raw(), 0);
        assert_eq!(F26Dot6::ONE.raw(), 64);
        assert_eq!(F26Dot6::HALF.raw(), 32);
    }

    #[test]
    fn from_int_and_back() {
        assert_eq!(F26Dot6::from_int(5).to_int(), 5);
        assert_eq!(F26Dot6::from_int(-3).raw(), -192);
    }

    #[test]
    fn round_ties_away_from_zero() {
        assert_eq!(F26Dot6::from_float(5.5).to_int_round(), 6);
        assert_eq!(F26Dot6::from_float(-5.5).to_int_round(), -6);
    }

    #[test]
    fn floor_and_ceil() {
        assert_eq!(F26Dot6::from_float(5.25).floor().to_int(), 5);
        assert_eq!(F26Dot6::from_float(5.25).ceil().to_int(), 6);
        assert_eq!(F26Dot6::from_float(-3.25).floor().to_int(), -4);
    }

    #[test]
    fn mul_div_roundtrip() {
        let a = F26Dot6::from_int(3);
        let b = F26Dot6::from_int(4);
        assert_eq!(a.mul(b).to_int(), 12);
        assert_eq!(a.mul(b).div(b).to_int(), 3);
    }

    #[test]
    fn round_to_pixel_snaps() {
        let p = F26Dot6::from_float(10.6);
        assert_eq!(p.round_to_pixel(), F26Dot6::from_int(11));
    }
}
