//! Operations shared by every algebra in the crate
//!
//! Quaternions, vectors, matrices and tensors all answer the same questions
//! (is it zero? is it close to that other one?) and support the same family of
//! scaling and rounding operations. Each family is one trait here.
//!
//! Operations that produce a value of the same type follow the output-parameter
//! convention: they read `self` and write into `out`, overwriting whatever was there.
//! For the containers, `out` is resized to match.

use crate::high_prec::HighPrec;
use crate::quaternion::Quaternion;
use crate::rounding::RoundingMode;
use crate::scalar::RealField;

/// Classification of special values
pub trait Predicates {
    /// Every component is exactly zero
    fn is_zero(&self) -> bool;

    /// Some component is NaN
    fn is_nan(&self) -> bool;

    /// Some component is infinite and none is NaN
    ///
    /// ```
    /// use qalg::quaternion::Quaternion;
    /// use qalg::ops::*;
    ///
    /// let q = Quaternion::new(f64::INFINITY, f64::NAN, 0., 0.);
    /// assert!(q.is_nan());
    /// assert!(!q.is_infinite());
    /// ```
    fn is_infinite(&self) -> bool;
}

/// Approximate equality
///
/// Two values are within a tolerance when every pair of corresponding real components
/// differ by no more than the tolerance. Two NaN components are considered within any
/// tolerance of each other, as are two infinities of the same sign.
/// Values of different shapes are never within tolerance.
pub trait Within<F> {
    fn within(&self, tolerance: &F, other: &Self) -> bool;
}

/// The Euclidean norm over all real components
pub trait Norm<F> {
    fn norm(&self) -> F;
}

/// Round each real component independently
pub trait RoundComponents<F> {
    fn round_into(&self, mode: RoundingMode, delta: &F, out: &mut Self);
}

/// Conjugate each quaternion
pub trait Conjugate {
    fn conjugate_into(&self, out: &mut Self);
}

/// Additive inverse
pub trait Negate {
    fn negate_into(&self, out: &mut Self);
}

/// The scaling family
///
/// Only the two scaling primitives must be provided:
/// left multiplication by a quaternion, and multiplication of every real component by a real.
/// Everything else is built from those.
pub trait ScaleBy<F: RealField>: Clone {
    /// Left-multiply every quaternion by `factor`
    fn scale_into(&self, factor: &Quaternion<F>, out: &mut Self);

    /// Multiply every real component by `factor`
    fn scale_components_into(&self, factor: &F, out: &mut Self);

    fn scale_by_rational_into(&self, numerator: isize, denominator: isize, out: &mut Self) {
        self.scale_components_into(&F::from_fraction(numerator, denominator), out)
    }

    fn scale_by_double_into(&self, factor: f64, out: &mut Self) {
        self.scale_components_into(&F::from_f64(factor), out)
    }

    fn scale_by_high_prec_into<const D: usize>(&self, factor: &HighPrec<D>, out: &mut Self) {
        self.scale_components_into(&F::from_decimal(factor), out)
    }

    /// Double `times` times
    fn scale_by_two_into(&self, times: usize, out: &mut Self) {
        repeat_scale(self, &F::from_integer(2), times, out)
    }

    /// Halve `times` times
    fn scale_by_one_half_into(&self, times: usize, out: &mut Self) {
        repeat_scale(self, &F::one_half(), times, out)
    }
}

fn repeat_scale<F: RealField, T: ScaleBy<F>>(a: &T, factor: &F, times: usize, out: &mut T) {
    *out = a.clone();
    for _ in 0..times {
        let tmp = out.clone();
        tmp.scale_components_into(factor, out);
    }
}

/// Componentwise closeness of two reals, as used by [Within]
pub(crate) fn real_within<F: RealField>(tolerance: &F, a: &F, b: &F) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    let diff = a.clone() - b.clone();
    !(diff.abs() > tolerance.clone())
}

/// Overflow-safe Euclidean norm of a list of non-negative magnitudes:
/// the largest magnitude is factored out before squaring.
pub(crate) fn scaled_hypot<'a, F: RealField + 'a>(
    magnitudes: impl Iterator<Item = &'a F> + Clone,
) -> F {
    let mut max = F::zero();
    for m in magnitudes.clone() {
        if m.is_nan() {
            return F::nan();
        }
        if m.is_infinite() {
            return F::infinity();
        }
        let m = m.clone().abs();
        if m > max {
            max = m;
        }
    }
    if max == F::zero() {
        return F::zero();
    }
    let mut sum = F::zero();
    for m in magnitudes {
        let ratio = m.clone() / max.clone();
        sum = sum + ratio.clone() * ratio;
    }
    max * sum.sqrt()
}
