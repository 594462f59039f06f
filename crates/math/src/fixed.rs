use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Signed fixed-point value with 8 fractional bits (`256 == 1.0`).
///
/// Arithmetic saturates instead of wrapping. Products are formed in `i64`
/// and brought back to scale through [`Fixed::descale`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Fixed(i32);

impl Fixed {
    pub const SHIFT: u32 = 8;
    pub const SCALE: i32 = 1 << Self::SHIFT;
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(Self::SCALE);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    pub fn from_int(value: i32) -> Self {
        Self(value.saturating_mul(Self::SCALE))
    }

    /// Integer part, rounding toward negative infinity.
    pub fn to_int(self) -> i32 {
        self.0 >> Self::SHIFT
    }

    /// Drop the fractional bits of a wide accumulator, or `None` if the
    /// result does not fit in `i32`.
    pub fn checked_descale(acc: i64) -> Option<i32> {
        i32::try_from(acc >> Self::SHIFT).ok()
    }

    /// Drop the fractional bits of a wide accumulator, saturating at the
    /// `i32` bounds.
    pub fn descale(acc: i64) -> i32 {
        match Self::checked_descale(acc) {
            Some(v) => v,
            None => {
                tracing::debug!(acc, "fixed-point accumulator saturated");
                if acc < 0 { i32::MIN } else { i32::MAX }
            }
        }
    }
}

impl Add for Fixed {
    type Output = Fixed;

    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Fixed {
        Fixed(self.0.saturating_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(Fixed::descale(self.0 as i64 * rhs.0 as i64))
    }
}
