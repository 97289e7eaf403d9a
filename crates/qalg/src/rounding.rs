//! Rounding of real values to a multiple of a step size

use crate::scalar::RealField;

/// How to choose between the two neighbouring multiples of the step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Towards positive infinity
    Ceiling,
    /// Towards negative infinity
    Floor,
    /// Towards zero (truncation)
    TowardsZero,
    /// Away from zero
    AwayFromZero,
    /// Nearest, ties towards positive infinity
    HalfUp,
    /// Nearest, ties towards negative infinity
    HalfDown,
    /// Nearest, ties to the even multiple
    HalfEven,
    /// Nearest, ties to the odd multiple
    HalfOdd,
}

fn is_even<F: RealField>(x: &F) -> bool {
    let half = x.clone() * F::one_half();
    half.clone().floor() == half
}

/// Round `value` to an integer multiple of `delta`.
///
/// NaN or infinite values come back unchanged, as does everything when `delta` is not
/// a positive finite number.
pub fn round<F: RealField>(mode: RoundingMode, delta: &F, value: F) -> F {
    if value.is_nan() || value.is_infinite() {
        return value;
    }
    if delta.is_nan() || delta.is_infinite() || !(*delta > F::zero()) {
        return value;
    }

    let q = value / delta.clone();
    let lo = q.clone().floor();
    let hi = q.clone().ceil();
    let frac = q.clone() - lo.clone();
    let half = F::one_half();

    let n = if lo == hi {
        lo
    } else {
        match mode {
            RoundingMode::Ceiling => hi,
            RoundingMode::Floor => lo,
            RoundingMode::TowardsZero => {
                if q < F::zero() {
                    hi
                } else {
                    lo
                }
            }
            RoundingMode::AwayFromZero => {
                if q < F::zero() {
                    lo
                } else {
                    hi
                }
            }
            _ if frac < half => lo,
            _ if frac > half => hi,
            RoundingMode::HalfUp => hi,
            RoundingMode::HalfDown => lo,
            RoundingMode::HalfEven => {
                if is_even(&lo) {
                    lo
                } else {
                    hi
                }
            }
            RoundingMode::HalfOdd => {
                if is_even(&lo) {
                    hi
                } else {
                    lo
                }
            }
        }
    };
    n * delta.clone()
}
