//! Traits that govern the real datatype underneath every quaternion
//!
//! The quaternion, vector, matrix and tensor algebras in this crate never look at the
//! concrete number type. Everything they need is expressed through the small traits in
//! this module, gathered together by [RealField].
//!
//! [RealField] comes implemented for `f32`, `f64`, `half::f16` (feature `f16`)
//! and the arbitrary-precision [HighPrec](crate::high_prec::HighPrec).

use crate::high_prec::HighPrec;
use crate::rounding::{self, RoundingMode};
use core::fmt::{Debug, Display};
use core::ops::{Add, Div, Mul, Neg, Sub};
use core::str::FromStr;

/// A real datatype whose absolute value can be taken.
pub trait Abs {
    /// Computes the absolute value of a scalar.
    fn abs(self) -> Self;
}

/// A real datatype which is closed under addition and multiplication.
///
/// see <https://en.wikipedia.org/wiki/Ring_(mathematics)>
///
/// Unlike a plain `Copy` float, `Ring` only asks for `Clone`
/// so that heap-backed numbers such as [HighPrec](crate::high_prec::HighPrec) qualify.
pub trait Ring:
    Clone
    + Neg<Output = Self>
    + Abs
    + Add<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Default
    + PartialEq
{
    /// The additive identity
    fn zero() -> Self {
        Self::default()
    }

    /// The multiplicative identity
    fn one() -> Self {
        Self::from_integer(1)
    }

    /// Construct an integer scalar
    fn from_integer(i: isize) -> Self;
}

/// A real datatype which can represent fractional values such as ½.
pub trait Rational: Ring {
    /// Construct a rational scalar
    /// from an integer numerator and integer denominator
    fn from_fraction(numerator: isize, denominator: isize) -> Self;

    /// A scalar value that when multiplied by 2 equals [one](Ring::one)
    fn one_half() -> Self {
        Self::from_fraction(1, 2)
    }

    /// A scalar value that when multiplied by 3 equals [one](Ring::one)
    fn one_third() -> Self {
        Self::from_fraction(1, 3)
    }
}

/// A real datatype closed under division.
///
/// ## Division by `0`
///
/// This must not panic. Floating point types return ±infinity or NaN,
/// and [HighPrec](crate::high_prec::HighPrec) has explicit states for the same.
pub trait Field: Rational + Div<Self, Output = Self> {
    fn recip(self) -> Self {
        Self::one() / self
    }
}

/// Well-known real constants
pub trait Constants {
    /// Ratio of a circle's circumference to its diameter
    fn pi() -> Self;
    /// Euler's number
    fn e() -> Self;
    /// The Euler–Mascheroni constant
    fn gamma() -> Self;
    /// The golden ratio
    fn phi() -> Self;
}

/// A real datatype which is closed under the square root function.
///
/// The square root of a negative number is NaN.
pub trait Sqrt {
    fn sqrt(self) -> Self;
}

/// Circular functions (in radians) and the normalized sinc family built on them.
pub trait Trig: Field + Constants {
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn acos(self) -> Self;

    /// Computes sin(x) / x, which is `1` at `0`
    fn sinc(self) -> Self {
        if self == Self::zero() {
            Self::one()
        } else {
            self.clone().sin() / self
        }
    }

    /// Computes sinc(πx)
    fn sincpi(self) -> Self {
        (Self::pi() * self).sinc()
    }
}

/// Hyperbolic functions and the hyperbolic sinc family built on them.
pub trait Hyperbolic: Field + Constants {
    fn sinh(self) -> Self;
    fn cosh(self) -> Self;

    /// Computes sinh(x) / x, which is `1` at `0`
    fn sinch(self) -> Self {
        if self == Self::zero() {
            Self::one()
        } else {
            self.clone().sinh() / self
        }
    }

    /// Computes sinch(πx)
    fn sinchpi(self) -> Self {
        (Self::pi() * self).sinch()
    }
}

/// The natural exponential and logarithm
pub trait ExpLog {
    fn exp(self) -> Self;
    /// Natural logarithm. `ln(0)` is negative infinity, negative inputs give NaN.
    fn ln(self) -> Self;
}

/// Everything the quaternion kernel needs from its component type.
///
/// Any numeric backend implementing this can be substituted
/// without changing the quaternion, vector, matrix or tensor code.
pub trait RealField:
    Field
    + Sqrt
    + Trig
    + Hyperbolic
    + ExpLog
    + Constants
    + PartialOrd
    + Debug
    + Display
    + FromStr
{
    /// The gap between one and the next representable value
    fn epsilon() -> Self;

    fn nan() -> Self;

    /// Positive infinity
    fn infinity() -> Self;

    fn is_nan(&self) -> bool;

    /// True for either infinity. NaN is not infinite.
    fn is_infinite(&self) -> bool;

    /// Largest integer value less than or equal to `self`
    fn floor(self) -> Self;

    /// Smallest integer value greater than or equal to `self`
    fn ceil(self) -> Self;

    fn from_f64(value: f64) -> Self;

    fn to_f64(&self) -> f64;

    /// Convert from an arbitrary-precision decimal of any precision
    fn from_decimal<const D: usize>(value: &HighPrec<D>) -> Self;

    /// The larger of two values, preferring `self` when either is NaN
    fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    /// Round to an integer multiple of `delta`
    fn round(self, mode: RoundingMode, delta: &Self) -> Self {
        rounding::round(mode, delta, self)
    }
}

macro_rules! impl_for_float {
    ($type:ident) => {
        impl Abs for $type {
            fn abs(self) -> $type {
                <$type>::abs(self)
            }
        }

        impl Ring for $type {
            fn from_integer(i: isize) -> $type {
                i as $type
            }
        }

        impl Rational for $type {
            fn from_fraction(numerator: isize, denominator: isize) -> $type {
                numerator as $type / denominator as $type
            }
        }

        impl Field for $type {
            fn recip(self) -> $type {
                <$type>::recip(self)
            }
        }

        impl Constants for $type {
            fn pi() -> $type {
                core::$type::consts::PI
            }
            fn e() -> $type {
                core::$type::consts::E
            }
            fn gamma() -> $type {
                0.577_215_664_901_532_9
            }
            fn phi() -> $type {
                1.618_033_988_749_895
            }
        }

        impl Sqrt for $type {
            fn sqrt(self) -> $type {
                <$type>::sqrt(self)
            }
        }

        impl Trig for $type {
            fn sin(self) -> $type {
                <$type>::sin(self)
            }
            fn cos(self) -> $type {
                <$type>::cos(self)
            }
            fn acos(self) -> $type {
                <$type>::acos(self)
            }
        }

        impl Hyperbolic for $type {
            fn sinh(self) -> $type {
                <$type>::sinh(self)
            }
            fn cosh(self) -> $type {
                <$type>::cosh(self)
            }
        }

        impl ExpLog for $type {
            fn exp(self) -> $type {
                <$type>::exp(self)
            }
            fn ln(self) -> $type {
                <$type>::ln(self)
            }
        }

        impl RealField for $type {
            fn epsilon() -> $type {
                <$type>::EPSILON
            }
            fn nan() -> $type {
                <$type>::NAN
            }
            fn infinity() -> $type {
                <$type>::INFINITY
            }
            fn is_nan(&self) -> bool {
                <$type>::is_nan(*self)
            }
            fn is_infinite(&self) -> bool {
                <$type>::is_infinite(*self)
            }
            fn floor(self) -> $type {
                <$type>::floor(self)
            }
            fn ceil(self) -> $type {
                <$type>::ceil(self)
            }
            fn from_f64(value: f64) -> $type {
                value as $type
            }
            fn to_f64(&self) -> f64 {
                *self as f64
            }
            fn from_decimal<const D: usize>(value: &HighPrec<D>) -> $type {
                value.to_f64() as $type
            }
        }
    };
}

impl_for_float!(f32);
impl_for_float!(f64);

#[cfg(feature = "f16")]
mod half_impl {
    use super::*;
    use half::f16;

    // Transcendentals go through f32
    fn via_f32(x: f16, f: impl Fn(f32) -> f32) -> f16 {
        f16::from_f32(f(x.to_f32()))
    }

    impl Abs for f16 {
        fn abs(self) -> f16 {
            via_f32(self, f32::abs)
        }
    }

    impl Ring for f16 {
        fn from_integer(i: isize) -> f16 {
            f16::from_f32(i as f32)
        }
    }

    impl Rational for f16 {
        fn from_fraction(numerator: isize, denominator: isize) -> f16 {
            f16::from_f32(numerator as f32 / denominator as f32)
        }
    }

    impl Field for f16 {}

    impl Constants for f16 {
        fn pi() -> f16 {
            f16::PI
        }
        fn e() -> f16 {
            f16::E
        }
        fn gamma() -> f16 {
            f16::from_f32(0.577_215_7)
        }
        fn phi() -> f16 {
            f16::from_f32(1.618_034)
        }
    }

    impl Sqrt for f16 {
        fn sqrt(self) -> f16 {
            via_f32(self, f32::sqrt)
        }
    }

    impl Trig for f16 {
        fn sin(self) -> f16 {
            via_f32(self, f32::sin)
        }
        fn cos(self) -> f16 {
            via_f32(self, f32::cos)
        }
        fn acos(self) -> f16 {
            via_f32(self, f32::acos)
        }
    }

    impl Hyperbolic for f16 {
        fn sinh(self) -> f16 {
            via_f32(self, f32::sinh)
        }
        fn cosh(self) -> f16 {
            via_f32(self, f32::cosh)
        }
    }

    impl ExpLog for f16 {
        fn exp(self) -> f16 {
            via_f32(self, f32::exp)
        }
        fn ln(self) -> f16 {
            via_f32(self, f32::ln)
        }
    }

    impl RealField for f16 {
        fn epsilon() -> f16 {
            f16::EPSILON
        }
        fn nan() -> f16 {
            f16::NAN
        }
        fn infinity() -> f16 {
            f16::INFINITY
        }
        fn is_nan(&self) -> bool {
            f16::is_nan(*self)
        }
        fn is_infinite(&self) -> bool {
            f16::is_infinite(*self)
        }
        fn floor(self) -> f16 {
            via_f32(self, f32::floor)
        }
        fn ceil(self) -> f16 {
            via_f32(self, f32::ceil)
        }
        fn from_f64(value: f64) -> f16 {
            f16::from_f64(value)
        }
        fn to_f64(&self) -> f64 {
            f16::to_f64(*self)
        }
        fn from_decimal<const D: usize>(value: &HighPrec<D>) -> f16 {
            f16::from_f64(value.to_f64())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sinc_family_at_zero() {
        assert_eq!(0f64.sinc(), 1.);
        assert_eq!(0f64.sinch(), 1.);
        assert_eq!(0f64.sincpi(), 1.);
        assert_eq!(0f64.sinchpi(), 1.);
    }

    #[test]
    fn sincpi_vanishes_at_integers() {
        assert!(1f64.sincpi().abs() < 1e-15);
        assert!(2f64.sincpi().abs() < 1e-15);
    }

    #[test]
    fn sinch_matches_definition() {
        let x = 0.75f64;
        assert!((x.sinch() - x.sinh() / x).abs() < 1e-15);
    }

    #[cfg(feature = "f16")]
    #[test]
    fn half_precision_backend() {
        let x = half::f16::from_f32(4.0);
        assert_eq!(RealField::to_f64(&Sqrt::sqrt(x)), 2.0);
        assert!(RealField::is_nan(&<half::f16 as RealField>::nan()));
    }
}
