//! Arbitrary-precision decimal reals
//!
//! [HighPrec] is a decimal fixed-point number with `DIGITS` fractional digits,
//! backed by a [BigInt] mantissa. The integer part is unbounded.
//!
//! Like IEEE floats, it has explicit NaN and ±infinity states,
//! so that dividing by zero or taking the logarithm of zero
//! produces a value rather than a panic.
//!
//! Transcendental functions are evaluated with [GUARD_DIGITS] extra digits
//! and rounded back, so results are normally correct to the last digit or two.

use crate::error::AlgebraError;
use crate::scalar::*;
use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};
use core::str::FromStr;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Extra digits carried through transcendental evaluations
pub const GUARD_DIGITS: usize = 12;

/// Beyond this magnitude `exp()` saturates to infinity (or zero)
const MAX_EXP_ARGUMENT: i64 = 10_000;

const GAMMA_DIGITS: &str = "0.5772156649015328606065120900824024310421593359399235988057672348848677267776646709369470632917467495";

#[derive(Clone, Debug)]
enum Repr {
    Finite(BigInt),
    NaN,
    PosInf,
    NegInf,
}

/// A decimal real number with `DIGITS` digits after the decimal point
#[derive(Clone)]
pub struct HighPrec<const DIGITS: usize = 50> {
    repr: Repr,
}

fn pow10(n: usize) -> BigInt {
    BigInt::from(10u32).pow(n as u32)
}

/// a / b rounded half away from zero
fn round_div(a: &BigInt, b: &BigInt) -> BigInt {
    let negative = a.is_negative() != b.is_negative();
    let (a, b) = (a.abs(), b.abs());
    let q = (a + (&b >> 1usize)) / b;
    if negative {
        -q
    } else {
        q
    }
}

fn floor_div(a: &BigInt, b: &BigInt) -> BigInt {
    // b > 0
    if a.is_negative() {
        -((-a + b - BigInt::one()) / b)
    } else {
        a / b
    }
}

/// x · 2^k, rounding when k is negative
fn shift(x: &BigInt, k: i64) -> BigInt {
    if k >= 0 {
        x << (k as usize)
    } else {
        round_div(x, &(BigInt::one() << ((-k) as usize)))
    }
}

/// Fixed-point kernels on mantissas at a common scale
mod fixed {
    use super::*;

    pub fn mul(a: &BigInt, b: &BigInt, s: &BigInt) -> BigInt {
        round_div(&(a * b), s)
    }

    pub fn div(a: &BigInt, b: &BigInt, s: &BigInt) -> BigInt {
        round_div(&(a * s), b)
    }

    pub fn sqrt(x: &BigInt, s: &BigInt) -> BigInt {
        (x * s).sqrt()
    }

    /// e^x for |x| below MAX_EXP_ARGUMENT
    pub fn exp(x: &BigInt, s: &BigInt) -> BigInt {
        if x.is_negative() {
            return div(s, &exp(&-x, s), s);
        }
        let limit: BigInt = s >> 4usize;
        let mut r = x.clone();
        let mut halvings = 0;
        while r > limit {
            r = round_div(&r, &BigInt::from(2));
            halvings += 1;
        }

        let mut sum = s.clone();
        let mut term = s.clone();
        let mut k: u32 = 1;
        loop {
            term = round_div(&(&term * &r), &(s * BigInt::from(k)));
            if term.is_zero() {
                break;
            }
            sum += &term;
            k += 1;
        }

        for _ in 0..halvings {
            sum = mul(&sum, &sum, s);
        }
        sum
    }

    /// atanh(z) for |z| well below one
    fn atanh(z: &BigInt, s: &BigInt) -> BigInt {
        let z2 = mul(z, z, s);
        let mut sum = z.clone();
        let mut power = z.clone();
        let mut n: u32 = 1;
        loop {
            power = mul(&power, &z2, s);
            n += 2;
            let term = &power / BigInt::from(n);
            if term.is_zero() {
                break;
            }
            sum += term;
        }
        sum
    }

    pub fn ln2(s: &BigInt) -> BigInt {
        atanh(&(s / BigInt::from(3)), s) * 2
    }

    /// ln(x) for x > 0
    pub fn ln(x: &BigInt, s: &BigInt) -> BigInt {
        // Bring x into (s/2, s] by a power of two
        let mut k: i64 = x.bits() as i64 - s.bits() as i64;
        let mut m = shift(x, -k);
        while &m > s {
            k += 1;
            m = shift(x, -k);
        }
        while &m * 2 <= *s {
            k -= 1;
            m = shift(x, -k);
        }
        let z = div(&(&m - s), &(&m + s), s);
        atanh(&z, s) * 2 + ln2(s) * k
    }

    /// atan(1/n) for integer n > 1
    fn atan_inv(n: u32, s: &BigInt) -> BigInt {
        let n2 = BigInt::from(n) * n;
        let mut power = s / BigInt::from(n);
        let mut sum = power.clone();
        let mut k: u32 = 1;
        let mut negative = true;
        loop {
            power = &power / &n2;
            k += 2;
            let term = &power / BigInt::from(k);
            if term.is_zero() {
                break;
            }
            if negative {
                sum -= term;
            } else {
                sum += term;
            }
            negative = !negative;
        }
        sum
    }

    pub fn pi(s: &BigInt) -> BigInt {
        atan_inv(5, s) * 16 - atan_inv(239, s) * 4
    }

    pub fn atan(y: &BigInt, s: &BigInt) -> BigInt {
        if y.is_negative() {
            return -atan(&-y, s);
        }
        if y > s {
            return (pi(s) >> 1usize) - atan(&div(s, y, s), s);
        }
        let limit = s / BigInt::from(10);
        let mut y = y.clone();
        let mut doublings = 0usize;
        while y > limit {
            let hyp = sqrt(&(s + mul(&y, &y, s)), s);
            y = div(&y, &(s + hyp), s);
            doublings += 1;
        }

        let y2 = mul(&y, &y, s);
        let mut sum = y.clone();
        let mut power = y;
        let mut k: u32 = 1;
        let mut negative = true;
        loop {
            power = mul(&power, &y2, s);
            k += 2;
            let term = &power / BigInt::from(k);
            if term.is_zero() {
                break;
            }
            if negative {
                sum -= term;
            } else {
                sum += term;
            }
            negative = !negative;
        }
        sum << doublings
    }

    /// Reduce an angle into [-π, π]
    fn reduce_angle(x: &BigInt, s: &BigInt) -> BigInt {
        let two_pi = pi(s) * 2;
        let turns = round_div(x, &two_pi);
        x - turns * two_pi
    }

    pub fn sin(x: &BigInt, s: &BigInt) -> BigInt {
        let r = reduce_angle(x, s);
        let r2 = mul(&r, &r, s);
        let mut sum = r.clone();
        let mut term = r;
        let mut k: u32 = 1;
        loop {
            term = -round_div(&(&term * &r2), &(s * BigInt::from((k + 1) * (k + 2))));
            if term.is_zero() {
                break;
            }
            sum += &term;
            k += 2;
        }
        sum
    }

    pub fn cos(x: &BigInt, s: &BigInt) -> BigInt {
        let r = reduce_angle(x, s);
        let r2 = mul(&r, &r, s);
        let mut sum = s.clone();
        let mut term = s.clone();
        let mut k: u32 = 0;
        loop {
            term = -round_div(&(&term * &r2), &(s * BigInt::from((k + 1) * (k + 2))));
            if term.is_zero() {
                break;
            }
            sum += &term;
            k += 2;
        }
        sum
    }
}

impl<const DIGITS: usize> HighPrec<DIGITS> {
    fn finite(mantissa: BigInt) -> Self {
        HighPrec {
            repr: Repr::Finite(mantissa),
        }
    }

    fn scale() -> BigInt {
        pow10(DIGITS)
    }

    fn work_scale() -> BigInt {
        pow10(DIGITS + GUARD_DIGITS)
    }

    fn widen(m: &BigInt) -> BigInt {
        m * pow10(GUARD_DIGITS)
    }

    fn narrow(m: &BigInt) -> Self {
        Self::finite(round_div(m, &pow10(GUARD_DIGITS)))
    }

    /// The number of fractional decimal digits
    pub const fn digits() -> usize {
        DIGITS
    }

    /// Build from an integer mantissa `m`, representing `m · 10^-DIGITS`
    pub fn from_mantissa(mantissa: BigInt) -> Self {
        Self::finite(mantissa)
    }

    /// The integer mantissa, or `None` for NaN and infinities
    pub fn mantissa(&self) -> Option<&BigInt> {
        match &self.repr {
            Repr::Finite(m) => Some(m),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match &self.repr {
            Repr::NaN => f64::NAN,
            Repr::PosInf => f64::INFINITY,
            Repr::NegInf => f64::NEG_INFINITY,
            Repr::Finite(m) => {
                if let (Some(m), true) = (m.to_i64(), DIGITS <= 22) {
                    if m.unsigned_abs() < (1u64 << 53) {
                        return m as f64 / 10f64.powi(DIGITS as i32);
                    }
                }
                self.to_string().parse::<f64>().unwrap_or(f64::NAN)
            }
        }
    }

    fn signed_infinity(negative: bool) -> Self {
        HighPrec {
            repr: if negative { Repr::NegInf } else { Repr::PosInf },
        }
    }

    /// Apply a function at working precision to a finite value
    fn at_work<G: FnOnce(&BigInt, &BigInt) -> BigInt>(m: &BigInt, g: G) -> Self {
        Self::narrow(&g(&Self::widen(m), &Self::work_scale()))
    }

    fn work_constant<G: FnOnce(&BigInt) -> BigInt>(g: G) -> Self {
        Self::narrow(&g(&Self::work_scale()))
    }

    fn is_negative(&self) -> bool {
        match &self.repr {
            Repr::Finite(m) => m.is_negative(),
            Repr::NegInf => true,
            _ => false,
        }
    }
}

impl<const DIGITS: usize> Default for HighPrec<DIGITS> {
    fn default() -> Self {
        Self::finite(BigInt::zero())
    }
}

impl<const DIGITS: usize> PartialEq for HighPrec<DIGITS> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Finite(a), Repr::Finite(b)) => a == b,
            (Repr::PosInf, Repr::PosInf) | (Repr::NegInf, Repr::NegInf) => true,
            _ => false,
        }
    }
}

impl<const DIGITS: usize> PartialOrd for HighPrec<DIGITS> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let rank = |r: &Repr| match r {
            Repr::NegInf => Some(0),
            Repr::Finite(_) => Some(1),
            Repr::PosInf => Some(2),
            Repr::NaN => None,
        };
        match (&self.repr, &other.repr) {
            (Repr::Finite(a), Repr::Finite(b)) => Some(a.cmp(b)),
            (a, b) => Some(rank(a)?.cmp(&rank(b)?)),
        }
    }
}

impl<const DIGITS: usize> Neg for HighPrec<DIGITS> {
    type Output = Self;
    fn neg(self) -> Self {
        let repr = match self.repr {
            Repr::Finite(m) => Repr::Finite(-m),
            Repr::PosInf => Repr::NegInf,
            Repr::NegInf => Repr::PosInf,
            Repr::NaN => Repr::NaN,
        };
        HighPrec { repr }
    }
}

impl<const DIGITS: usize> Add for HighPrec<DIGITS> {
    type Output = Self;
    fn add(self, r: Self) -> Self {
        let repr = match (self.repr, r.repr) {
            (Repr::Finite(a), Repr::Finite(b)) => Repr::Finite(a + b),
            (Repr::NaN, _) | (_, Repr::NaN) => Repr::NaN,
            (Repr::PosInf, Repr::NegInf) | (Repr::NegInf, Repr::PosInf) => Repr::NaN,
            (Repr::PosInf, _) | (_, Repr::PosInf) => Repr::PosInf,
            (Repr::NegInf, _) | (_, Repr::NegInf) => Repr::NegInf,
        };
        HighPrec { repr }
    }
}

impl<const DIGITS: usize> Sub for HighPrec<DIGITS> {
    type Output = Self;
    fn sub(self, r: Self) -> Self {
        self + -r
    }
}

impl<const DIGITS: usize> Mul for HighPrec<DIGITS> {
    type Output = Self;
    fn mul(self, r: Self) -> Self {
        let negative = self.is_negative() != r.is_negative();
        match (self.repr, r.repr) {
            (Repr::Finite(a), Repr::Finite(b)) => Self::finite(fixed::mul(&a, &b, &Self::scale())),
            (Repr::NaN, _) | (_, Repr::NaN) => Self::nan(),
            (Repr::Finite(m), _) | (_, Repr::Finite(m)) if m.is_zero() => Self::nan(),
            _ => Self::signed_infinity(negative),
        }
    }
}

impl<const DIGITS: usize> Div for HighPrec<DIGITS> {
    type Output = Self;
    fn div(self, r: Self) -> Self {
        let negative = self.is_negative() != r.is_negative();
        match (self.repr, r.repr) {
            (Repr::NaN, _) | (_, Repr::NaN) => Self::nan(),
            (Repr::Finite(a), Repr::Finite(b)) => {
                if b.is_zero() {
                    if a.is_zero() {
                        Self::nan()
                    } else {
                        Self::signed_infinity(a.is_negative())
                    }
                } else {
                    Self::finite(fixed::div(&a, &b, &Self::scale()))
                }
            }
            (Repr::Finite(_), _) => Self::zero(),
            (_, Repr::Finite(_)) => Self::signed_infinity(negative),
            _ => Self::nan(),
        }
    }
}

impl<const DIGITS: usize> fmt::Display for HighPrec<DIGITS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = match &self.repr {
            Repr::NaN => return write!(f, "NaN"),
            Repr::PosInf => return write!(f, "Infinity"),
            Repr::NegInf => return write!(f, "-Infinity"),
            Repr::Finite(m) => m,
        };
        let digits = m.abs().to_string();
        let sign = if m.is_negative() { "-" } else { "" };
        let padded = if digits.len() <= DIGITS {
            format!("{}{}", "0".repeat(DIGITS + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - DIGITS);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            write!(f, "{}{}", sign, int_part)
        } else {
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        }
    }
}

impl<const DIGITS: usize> fmt::Debug for HighPrec<DIGITS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<const DIGITS: usize> FromStr for HighPrec<DIGITS> {
    type Err = AlgebraError;

    fn from_str(s: &str) -> Result<Self, AlgebraError> {
        let s = s.trim();
        match s {
            "NaN" | "nan" => return Ok(Self::nan()),
            "Infinity" | "+Infinity" | "inf" | "+inf" => return Ok(Self::infinity()),
            "-Infinity" | "-inf" => return Ok(-Self::infinity()),
            _ => {}
        }

        let err = |position: usize, reason: &str| AlgebraError::Parse {
            position,
            reason: reason.to_owned(),
        };

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let offset = s.len() - body.len();

        let (number, exponent) = match body.find(['e', 'E']) {
            Some(ix) => {
                let exponent = body[ix + 1..]
                    .parse::<i64>()
                    .map_err(|_| err(offset + ix + 1, "bad exponent"))?;
                (&body[..ix], exponent)
            }
            None => (body, 0),
        };

        let (int_part, frac_part) = match number.find('.') {
            Some(ix) => (&number[..ix], &number[ix + 1..]),
            None => (number, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err(offset, "expected digits"));
        }
        if let Some(ix) = int_part
            .bytes()
            .chain(frac_part.bytes())
            .position(|c| !c.is_ascii_digit())
        {
            return Err(err(offset + ix, "expected a digit"));
        }

        let all_digits = format!("{}{}", int_part, frac_part);
        let digits = if all_digits.is_empty() {
            BigInt::zero()
        } else {
            all_digits
                .parse::<BigInt>()
                .map_err(|_| err(offset, "expected digits"))?
        };

        // value = digits · 10^(exponent - frac_len); mantissa = value · 10^DIGITS
        let shift = exponent - frac_part.len() as i64 + DIGITS as i64;
        let mantissa = if shift >= 0 {
            digits * pow10(shift as usize)
        } else {
            round_div(&digits, &pow10((-shift) as usize))
        };
        Ok(Self::finite(if negative { -mantissa } else { mantissa }))
    }
}

impl<const DIGITS: usize> Abs for HighPrec<DIGITS> {
    fn abs(self) -> Self {
        if self.is_negative() {
            -self
        } else {
            self
        }
    }
}

impl<const DIGITS: usize> Ring for HighPrec<DIGITS> {
    fn from_integer(i: isize) -> Self {
        Self::finite(BigInt::from(i) * Self::scale())
    }
}

impl<const DIGITS: usize> Rational for HighPrec<DIGITS> {
    fn from_fraction(numerator: isize, denominator: isize) -> Self {
        Self::from_integer(numerator) / Self::from_integer(denominator)
    }
}

impl<const DIGITS: usize> Field for HighPrec<DIGITS> {}

impl<const DIGITS: usize> Constants for HighPrec<DIGITS> {
    fn pi() -> Self {
        Self::work_constant(fixed::pi)
    }

    fn e() -> Self {
        Self::work_constant(|s| fixed::exp(s, s))
    }

    fn gamma() -> Self {
        GAMMA_DIGITS.parse().unwrap_or_else(|_| Self::nan())
    }

    fn phi() -> Self {
        Self::work_constant(|s| {
            let root5 = fixed::sqrt(&(s * 5), s);
            (s + root5) / 2
        })
    }
}

impl<const DIGITS: usize> Sqrt for HighPrec<DIGITS> {
    fn sqrt(self) -> Self {
        match &self.repr {
            Repr::Finite(m) if m.is_negative() => Self::nan(),
            Repr::Finite(m) => Self::at_work(m, fixed::sqrt),
            Repr::PosInf => self,
            _ => Self::nan(),
        }
    }
}

impl<const DIGITS: usize> Trig for HighPrec<DIGITS> {
    fn sin(self) -> Self {
        match &self.repr {
            Repr::Finite(m) => Self::at_work(m, fixed::sin),
            _ => Self::nan(),
        }
    }

    fn cos(self) -> Self {
        match &self.repr {
            Repr::Finite(m) => Self::at_work(m, fixed::cos),
            _ => Self::nan(),
        }
    }

    fn acos(self) -> Self {
        let m = match &self.repr {
            Repr::Finite(m) => m,
            _ => return Self::nan(),
        };
        let one = Self::scale();
        if m.abs() > one {
            return Self::nan();
        }
        Self::at_work(m, |x, s| {
            let pi = fixed::pi(s);
            if x == s {
                BigInt::zero()
            } else if -x == *s {
                pi
            } else {
                let opposite = fixed::sqrt(&(s - fixed::mul(x, x, s)), s);
                (pi >> 1usize) - fixed::atan(&fixed::div(x, &opposite, s), s)
            }
        })
    }
}

impl<const DIGITS: usize> Hyperbolic for HighPrec<DIGITS> {
    fn sinh(self) -> Self {
        match &self.repr {
            Repr::Finite(_) => {
                let e = self.clone().exp();
                let ei = (-self).exp();
                (e - ei) * Self::one_half()
            }
            _ => self,
        }
    }

    fn cosh(self) -> Self {
        match &self.repr {
            Repr::Finite(_) => {
                let e = self.clone().exp();
                let ei = (-self).exp();
                (e + ei) * Self::one_half()
            }
            Repr::NaN => self,
            _ => Self::infinity(),
        }
    }
}

impl<const DIGITS: usize> ExpLog for HighPrec<DIGITS> {
    fn exp(self) -> Self {
        let m = match &self.repr {
            Repr::Finite(m) => m,
            Repr::PosInf => return self,
            Repr::NegInf => return Self::zero(),
            Repr::NaN => return self,
        };
        let limit = BigInt::from(MAX_EXP_ARGUMENT) * Self::scale();
        if *m > limit {
            Self::infinity()
        } else if *m < -limit {
            Self::zero()
        } else {
            Self::at_work(m, fixed::exp)
        }
    }

    fn ln(self) -> Self {
        match &self.repr {
            Repr::Finite(m) if m.is_zero() => -Self::infinity(),
            Repr::Finite(m) if m.is_negative() => Self::nan(),
            Repr::Finite(m) => Self::at_work(m, fixed::ln),
            Repr::PosInf => self,
            _ => Self::nan(),
        }
    }
}

impl<const DIGITS: usize> RealField for HighPrec<DIGITS> {
    fn epsilon() -> Self {
        Self::finite(BigInt::one())
    }

    fn nan() -> Self {
        HighPrec { repr: Repr::NaN }
    }

    fn infinity() -> Self {
        HighPrec { repr: Repr::PosInf }
    }

    fn is_nan(&self) -> bool {
        matches!(self.repr, Repr::NaN)
    }

    fn is_infinite(&self) -> bool {
        matches!(self.repr, Repr::PosInf | Repr::NegInf)
    }

    fn floor(self) -> Self {
        match &self.repr {
            Repr::Finite(m) => {
                let s = Self::scale();
                Self::finite(floor_div(m, &s) * s)
            }
            _ => self,
        }
    }

    fn ceil(self) -> Self {
        -(-self).floor()
    }

    fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Self::nan()
        } else if value.is_infinite() {
            Self::signed_infinity(value < 0.)
        } else {
            format!("{:e}", value).parse().unwrap_or_else(|_| Self::nan())
        }
    }

    fn to_f64(&self) -> f64 {
        HighPrec::to_f64(self)
    }

    fn from_decimal<const D: usize>(value: &HighPrec<D>) -> Self {
        match &value.repr {
            Repr::Finite(m) => Self::finite(if DIGITS >= D {
                m * pow10(DIGITS - D)
            } else {
                round_div(m, &pow10(D - DIGITS))
            }),
            Repr::NaN => Self::nan(),
            Repr::PosInf => Self::infinity(),
            Repr::NegInf => -Self::infinity(),
        }
    }
}
