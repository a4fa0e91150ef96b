//! Per-type arithmetic used by the elementwise and reduction engines.
//!
//! Integer arithmetic wraps on overflow. Integer division or remainder by
//! zero is reported as an error instead of panicking; float division follows
//! IEEE 754.

use std::cmp::Ordering;

use crate::dtype::Element;
use crate::error::{Result, TensorError};

/// Arithmetic and comparison capability of a numeric element type.
pub trait Numeric: Element + PartialOrd {
    /// True for the integer kinds; selects the lossless path in [`Numeric::cast`].
    const INTEGRAL: bool;

    /// Additive identity.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// Most negative value (`-inf` for floats). Identity of `max`.
    fn min_value() -> Self;

    /// Most positive value (`+inf` for floats). Identity of `min`.
    fn max_value() -> Self;

    fn add(self, rhs: Self) -> Self;

    fn sub(self, rhs: Self) -> Self;

    fn mul(self, rhs: Self) -> Self;

    /// Division; integer division by zero is an `InvalidArgument` error.
    fn div(self, rhs: Self) -> Result<Self>;

    /// Remainder with the sign of the dividend.
    fn rem(self, rhs: Self) -> Result<Self>;

    fn to_f64(self) -> f64;

    fn from_f64(value: f64) -> Self;

    fn to_i64(self) -> i64;

    fn from_i64(value: i64) -> Self;

    /// Converts to another numeric kind with `as` semantics (integer
    /// narrowing wraps, float to integer saturates).
    fn cast<U: Numeric>(self) -> U {
        if Self::INTEGRAL {
            U::from_i64(self.to_i64())
        } else {
            U::from_f64(self.to_f64())
        }
    }

    /// Total order used by `compare`; NaN compares equal to everything.
    fn compare(self, other: Self) -> Ordering {
        self.partial_cmp(&other).unwrap_or(Ordering::Equal)
    }

    /// `true` for any non-zero value.
    fn boolean_value(self) -> bool {
        self != Self::zero()
    }

    fn maximum(self, other: Self) -> Self {
        if self >= other {
            self
        } else {
            other
        }
    }

    fn minimum(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// Square root computed in `f64` and cast back.
    fn sqrt(self) -> Self {
        Self::from_f64(self.to_f64().sqrt())
    }

    /// `self` raised to `exp`, computed in `f64` and cast back.
    fn pow(self, exp: Self) -> Self {
        Self::from_f64(self.to_f64().powf(exp.to_f64()))
    }
}

/// Bitwise capability, available for the integer kinds only.
pub trait Integral: Numeric {
    fn bit_and(self, rhs: Self) -> Self;

    fn bit_or(self, rhs: Self) -> Self;

    fn bit_xor(self, rhs: Self) -> Self;

    fn bit_not(self) -> Self;

    /// Left shift; the shift amount is masked to the type's bit width.
    fn shift_left(self, rhs: Self) -> Self;

    /// Arithmetic right shift; the shift amount is masked to the type's bit width.
    fn shift_right(self, rhs: Self) -> Self;
}

macro_rules! impl_integral {
    ($($t:ty),+) => {
        $(
            impl Numeric for $t {
                const INTEGRAL: bool = true;

                fn zero() -> Self {
                    0
                }

                fn one() -> Self {
                    1
                }

                fn min_value() -> Self {
                    <$t>::MIN
                }

                fn max_value() -> Self {
                    <$t>::MAX
                }

                fn add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                fn sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                fn mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                fn div(self, rhs: Self) -> Result<Self> {
                    if rhs == 0 {
                        return Err(TensorError::InvalidArgument(format!(
                            "{} division by zero",
                            stringify!($t)
                        )));
                    }
                    Ok(self.wrapping_div(rhs))
                }

                fn rem(self, rhs: Self) -> Result<Self> {
                    if rhs == 0 {
                        return Err(TensorError::InvalidArgument(format!(
                            "{} remainder by zero",
                            stringify!($t)
                        )));
                    }
                    Ok(self.wrapping_rem(rhs))
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                fn to_i64(self) -> i64 {
                    self as i64
                }

                fn from_i64(value: i64) -> Self {
                    value as $t
                }
            }

            impl Integral for $t {
                fn bit_and(self, rhs: Self) -> Self {
                    self & rhs
                }

                fn bit_or(self, rhs: Self) -> Self {
                    self | rhs
                }

                fn bit_xor(self, rhs: Self) -> Self {
                    self ^ rhs
                }

                fn bit_not(self) -> Self {
                    !self
                }

                fn shift_left(self, rhs: Self) -> Self {
                    self.wrapping_shl(rhs as u32)
                }

                fn shift_right(self, rhs: Self) -> Self {
                    self.wrapping_shr(rhs as u32)
                }
            }
        )+
    };
}

macro_rules! impl_float {
    ($($t:ty),+) => {
        $(
            impl Numeric for $t {
                const INTEGRAL: bool = false;

                fn zero() -> Self {
                    0.0
                }

                fn one() -> Self {
                    1.0
                }

                fn min_value() -> Self {
                    <$t>::NEG_INFINITY
                }

                fn max_value() -> Self {
                    <$t>::INFINITY
                }

                fn add(self, rhs: Self) -> Self {
                    self + rhs
                }

                fn sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                fn mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                fn div(self, rhs: Self) -> Result<Self> {
                    Ok(self / rhs)
                }

                fn rem(self, rhs: Self) -> Result<Self> {
                    Ok(self % rhs)
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                fn to_i64(self) -> i64 {
                    self as i64
                }

                fn from_i64(value: i64) -> Self {
                    value as $t
                }
            }
        )+
    };
}

impl_integral!(i8, i16, i32, i64);
impl_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities() {
        assert_eq!(<i32 as Numeric>::zero(), 0);
        assert_eq!(<i8 as Numeric>::one(), 1);
        assert_eq!(<i16 as Numeric>::min_value(), i16::MIN);
        assert_eq!(<f64 as Numeric>::min_value(), f64::NEG_INFINITY);
        assert_eq!(<f32 as Numeric>::max_value(), f32::INFINITY);
    }

    #[test]
    fn test_integer_arithmetic_wraps() {
        assert_eq!(Numeric::add(i8::MAX, 1), i8::MIN);
        assert_eq!(Numeric::mul(i16::MAX, 2), -2);
        assert_eq!(Numeric::div(i32::MIN, -1).unwrap(), i32::MIN);
    }

    #[test]
    fn test_integer_division_by_zero() {
        let err = Numeric::div(7i64, 0).unwrap_err();
        assert!(matches!(err, TensorError::InvalidArgument(_)));
        assert!(Numeric::rem(7i8, 0).is_err());
        assert!(Numeric::div(1.0f32, 0.0).unwrap().is_infinite());
    }

    #[test]
    fn test_rem_follows_dividend_sign() {
        assert_eq!(Numeric::rem(-7i32, 3).unwrap(), -1);
        assert_eq!(Numeric::rem(7.5f64, 2.0).unwrap(), 1.5);
    }

    #[test]
    fn test_cast() {
        assert_eq!(300i32.cast::<i8>(), 44);
        assert_eq!(2.9f64.cast::<i32>(), 2);
        assert_eq!((-1i64).cast::<f32>(), -1.0);
        assert_eq!(i64::MAX.cast::<i64>(), i64::MAX);
    }

    #[test]
    fn test_compare_and_boolean_value() {
        assert_eq!(1i32.compare(2), Ordering::Less);
        assert_eq!(2.0f32.compare(2.0), Ordering::Equal);
        assert!(5i8.boolean_value());
        assert!(!0.0f64.boolean_value());
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(0b1100i32.bit_and(0b1010), 0b1000);
        assert_eq!(0b1100i16.bit_or(0b1010), 0b1110);
        assert_eq!(0b1100i64.bit_xor(0b1010), 0b0110);
        assert_eq!(0i8.bit_not(), -1);
        assert_eq!(1i32.shift_left(4), 16);
        assert_eq!((-16i32).shift_right(2), -4);
    }

    #[test]
    fn test_sqrt_and_pow() {
        assert_eq!(Numeric::sqrt(16i32), 4);
        assert_eq!(Numeric::pow(2i64, 10), 1024);
        approx::assert_relative_eq!(Numeric::sqrt(2.0f64), std::f64::consts::SQRT_2);
    }
}
