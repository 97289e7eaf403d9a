//! Quaternion numbers over any [RealField]
//!
//! A [Quaternion] is `r + i𝐢 + j𝐣 + k𝐤` where 𝐢² = 𝐣² = 𝐤² = 𝐢𝐣𝐤 = -1.
//! Multiplication is associative but not commutative.
//!
//! All functions here are total: inputs with NaN or infinite components,
//! or a zero divisor, produce NaN or infinite components rather than panicking.
//!
//! Values are immutable by convention. Arithmetic is available through
//! the standard operators on owned values and on references,
//! and the `*Assign` operators update a value in place.
//! `+=`, `-=`, `*=` and `/=` are the output-parameter forms of add, subtract,
//! multiply and divide: the target is the output, and it may also be an operand.
//! The unary operations have `_into` forms through the [ops](crate::ops) traits.
//!
//! ```
//! use qalg::quaternion::Quaternion;
//!
//! let a = Quaternion::new(1., 2., 3., 4.);
//! let b = Quaternion::new(5., 6., 7., 8.);
//! assert_eq!(&a * &b, Quaternion::new(-60., 12., 30., 24.));
//!
//! let mut c = a.clone();
//! c *= &b; // c = c · b
//! assert_eq!(c, Quaternion::new(-60., 12., 30., 24.));
//! ```

use crate::error::AlgebraError;
use crate::ops::*;
use crate::rounding::RoundingMode;
use crate::scalar::*;
use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::str::FromStr;
use qalg_macros::cayley_dickson;

/// A quaternion with components of type `F`
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Quaternion<F> {
    /// The real part
    pub r: F,
    /// The coefficient on 𝐢
    pub i: F,
    /// The coefficient on 𝐣
    pub j: F,
    /// The coefficient on 𝐤
    pub k: F,
}

cayley_dickson! {
    impl<F: RealField> Quaternion<F> {
        fn hamilton_product(r, i, j, k);
    }
}

impl<F> Quaternion<F> {
    pub const fn new(r: F, i: F, j: F, k: F) -> Quaternion<F> {
        Quaternion { r, i, j, k }
    }

    /// The four components in `r, i, j, k` order
    pub fn components(&self) -> [&F; 4] {
        [&self.r, &self.i, &self.j, &self.k]
    }
}

impl<F: RealField> Quaternion<F> {
    pub fn from_real(r: F) -> Quaternion<F> {
        Quaternion::new(r, F::zero(), F::zero(), F::zero())
    }

    pub fn zero() -> Quaternion<F> {
        Quaternion::from_real(F::zero())
    }

    /// The multiplicative identity
    pub fn unity() -> Quaternion<F> {
        Quaternion::from_real(F::one())
    }

    /// The imaginary unit 𝐢
    pub fn unit_i() -> Quaternion<F> {
        Quaternion::new(F::zero(), F::one(), F::zero(), F::zero())
    }

    /// The imaginary unit 𝐣
    pub fn unit_j() -> Quaternion<F> {
        Quaternion::new(F::zero(), F::zero(), F::one(), F::zero())
    }

    /// The imaginary unit 𝐤
    pub fn unit_k() -> Quaternion<F> {
        Quaternion::new(F::zero(), F::zero(), F::zero(), F::one())
    }

    pub fn pi() -> Quaternion<F> {
        Quaternion::from_real(F::pi())
    }

    pub fn e() -> Quaternion<F> {
        Quaternion::from_real(F::e())
    }

    /// The Euler–Mascheroni constant
    pub fn gamma() -> Quaternion<F> {
        Quaternion::from_real(F::gamma())
    }

    /// The golden ratio
    pub fn phi() -> Quaternion<F> {
        Quaternion::from_real(F::phi())
    }

    /// All components NaN
    pub fn nan() -> Quaternion<F> {
        Quaternion::new(F::nan(), F::nan(), F::nan(), F::nan())
    }

    /// Positive infinity in every component
    pub fn infinite() -> Quaternion<F> {
        Quaternion::new(F::infinity(), F::infinity(), F::infinity(), F::infinity())
    }

    /// The real part as a quaternion
    pub fn real(&self) -> Quaternion<F> {
        Quaternion::from_real(self.r.clone())
    }

    /// The quaternion with its real part set to zero
    pub fn unreal(&self) -> Quaternion<F> {
        Quaternion::new(F::zero(), self.i.clone(), self.j.clone(), self.k.clone())
    }

    pub fn is_unity(&self) -> bool {
        self.r == F::one() && self.i == F::zero() && self.j == F::zero() && self.k == F::zero()
    }

    fn map(&self, f: impl Fn(F) -> F) -> Quaternion<F> {
        Quaternion::new(
            f(self.r.clone()),
            f(self.i.clone()),
            f(self.j.clone()),
            f(self.k.clone()),
        )
    }

    /// Multiply each component by a real, without a quaternion product
    pub fn scale_components(&self, factor: &F) -> Quaternion<F> {
        self.map(|c| c * factor.clone())
    }

    /// (r, -i, -j, -k)
    pub fn conjugate(&self) -> Quaternion<F> {
        Quaternion::new(
            self.r.clone(),
            -self.i.clone(),
            -self.j.clone(),
            -self.k.clone(),
        )
    }

    /// Euclidean length of the four components.
    ///
    /// The largest component is factored out before squaring,
    /// so this does not overflow for large finite components.
    pub fn norm(&self) -> F {
        scaled_hypot(self.components().into_iter())
    }

    /// The multiplicative inverse: conjugate scaled by 1 / norm²
    ///
    /// Inverting zero gives infinite or NaN components.
    pub fn invert(&self) -> Quaternion<F> {
        let n = self.norm();
        let scale = (n.clone() * n).recip();
        self.conjugate().scale_components(&scale)
    }

    /// a · b⁻¹
    pub fn divide(&self, b: &Quaternion<F>) -> Quaternion<F> {
        Quaternion::hamilton_product(self, &b.invert())
    }

    /// e^a
    pub fn exp(&self) -> Quaternion<F> {
        let u = self.r.clone().exp();
        let z = self.unreal().norm();
        let w = z.clone().sinc();
        let uw = u.clone() * w;
        Quaternion::new(
            u * z.cos(),
            uw.clone() * self.i.clone(),
            uw.clone() * self.j.clone(),
            uw * self.k.clone(),
        )
    }

    /// The principal natural logarithm
    ///
    /// The real part is ln|a|. The unreal part points along the unreal part of `a`
    /// with length acos(r / |a|), which is in [0, π].
    /// A quaternion with no unreal part gets no unreal part,
    /// so the logarithm of a negative real is real-valued (ln|a|).
    pub fn ln(&self) -> Quaternion<F> {
        let n = self.norm();
        let theta = (self.r.clone() / n.clone()).acos();
        let v = self.unreal().norm();
        let direction = if v == F::zero() {
            F::zero()
        } else {
            theta / v
        };
        Quaternion::new(
            n.ln(),
            self.i.clone() * direction.clone(),
            self.j.clone() * direction.clone(),
            self.k.clone() * direction,
        )
    }

    /// A logarithm whose unreal components are `(c · r/|a|) · acos(r/|a|)`
    ///
    /// This weights the unreal part by the cosine of the angle instead of normalizing it
    /// by its own length, so `exp()` only inverts it for real-valued quaternions.
    /// It reproduces results computed by earlier quaternion libraries using that formula.
    /// Prefer [ln](Quaternion::ln).
    pub fn ln_cosine_weighted(&self) -> Quaternion<F> {
        let n = self.norm();
        let multiplier = self.r.clone() / n.clone();
        let theta = multiplier.clone().acos();
        Quaternion::new(
            n.ln(),
            (self.i.clone() * multiplier.clone()) * theta.clone(),
            (self.j.clone() * multiplier.clone()) * theta.clone(),
            (self.k.clone() * multiplier) * theta,
        )
    }

    /// a^b = exp(b · ln(a))
    pub fn pow(&self, b: &Quaternion<F>) -> Quaternion<F> {
        if self.is_zero() && b.r > F::zero() {
            return Quaternion::zero();
        }
        Quaternion::hamilton_product(b, &self.ln()).exp()
    }

    pub fn sqrt(&self) -> Quaternion<F> {
        self.pow(&Quaternion::from_real(F::one_half()))
    }

    pub fn cbrt(&self) -> Quaternion<F> {
        self.pow(&Quaternion::from_real(F::one_third()))
    }

    /// Integer power by repeated squaring.
    ///
    /// `a^0` is unity, and negative powers invert first.
    pub fn power(&self, n: i64) -> Quaternion<F> {
        let mut base = if n < 0 { self.invert() } else { self.clone() };
        let mut e = n.unsigned_abs();
        let mut result = Quaternion::unity();
        while e > 0 {
            if e & 1 == 1 {
                result = Quaternion::hamilton_product(&result, &base);
            }
            e >>= 1;
            if e > 0 {
                base = Quaternion::hamilton_product(&base, &base);
            }
        }
        result
    }

    /// (e^a - e^-a) / 2 and (e^a + e^-a) / 2, sharing the exponentials
    pub fn sinh_and_cosh(&self) -> (Quaternion<F>, Quaternion<F>) {
        let half = F::one_half();
        let tmp1 = self.exp();
        let tmp2 = (-self).exp();
        let s = (&tmp1 - &tmp2).scale_components(&half);
        let c = (&tmp1 + &tmp2).scale_components(&half);
        (s, c)
    }

    pub fn sinh(&self) -> Quaternion<F> {
        self.sinh_and_cosh().0
    }

    pub fn cosh(&self) -> Quaternion<F> {
        self.sinh_and_cosh().1
    }

    pub fn tanh(&self) -> Quaternion<F> {
        let (s, c) = self.sinh_and_cosh();
        s.divide(&c)
    }

    /// sin(a) and cos(a) from one evaluation of the shared real functions
    pub fn sin_and_cos(&self) -> (Quaternion<F>, Quaternion<F>) {
        let z = self.unreal().norm();
        let sh = z.clone().sinch();
        let cos_r = self.r.clone().cos();
        let sin_r = self.r.clone().sin();
        let cosh_z = z.cosh();

        let ws = cos_r.clone() * sh.clone();
        let wc = -sin_r.clone() * sh;
        let s = Quaternion::new(
            sin_r * cosh_z.clone(),
            ws.clone() * self.i.clone(),
            ws.clone() * self.j.clone(),
            ws * self.k.clone(),
        );
        let c = Quaternion::new(
            cos_r * cosh_z,
            wc.clone() * self.i.clone(),
            wc.clone() * self.j.clone(),
            wc * self.k.clone(),
        );
        (s, c)
    }

    pub fn sin(&self) -> Quaternion<F> {
        self.sin_and_cos().0
    }

    pub fn cos(&self) -> Quaternion<F> {
        self.sin_and_cos().1
    }

    pub fn tan(&self) -> Quaternion<F> {
        let (s, c) = self.sin_and_cos();
        s.divide(&c)
    }

    /// sin(a) · a⁻¹, which is unity at zero
    pub fn sinc(&self) -> Quaternion<F> {
        if self.is_zero() {
            return Quaternion::unity();
        }
        self.sin().divide(self)
    }

    /// sinh(a) · a⁻¹, which is unity at zero
    pub fn sinch(&self) -> Quaternion<F> {
        if self.is_zero() {
            return Quaternion::unity();
        }
        self.sinh().divide(self)
    }

    /// sinc(πa)
    pub fn sincpi(&self) -> Quaternion<F> {
        self.scale_components(&F::pi()).sinc()
    }

    /// sinch(πa)
    pub fn sinchpi(&self) -> Quaternion<F> {
        self.scale_components(&F::pi()).sinch()
    }

    pub fn round(&self, mode: RoundingMode, delta: &F) -> Quaternion<F> {
        self.map(|c| c.round(mode, delta))
    }
}

impl<F: RealField> Predicates for Quaternion<F> {
    fn is_zero(&self) -> bool {
        self.components().into_iter().all(|c| *c == F::zero())
    }

    fn is_nan(&self) -> bool {
        self.components().into_iter().any(|c| c.is_nan())
    }

    fn is_infinite(&self) -> bool {
        !Predicates::is_nan(self) && self.components().into_iter().any(|c| c.is_infinite())
    }
}

impl<F: RealField> Within<F> for Quaternion<F> {
    fn within(&self, tolerance: &F, other: &Quaternion<F>) -> bool {
        self.components()
            .into_iter()
            .zip(other.components())
            .all(|(a, b)| real_within(tolerance, a, b))
    }
}

impl<F: RealField> Norm<F> for Quaternion<F> {
    fn norm(&self) -> F {
        Quaternion::norm(self)
    }
}

impl<F: RealField> RoundComponents<F> for Quaternion<F> {
    fn round_into(&self, mode: RoundingMode, delta: &F, out: &mut Quaternion<F>) {
        *out = self.round(mode, delta);
    }
}

impl<F: RealField> Conjugate for Quaternion<F> {
    fn conjugate_into(&self, out: &mut Quaternion<F>) {
        *out = self.conjugate();
    }
}

impl<F: RealField> Negate for Quaternion<F> {
    fn negate_into(&self, out: &mut Quaternion<F>) {
        *out = -self;
    }
}

impl<F: RealField> ScaleBy<F> for Quaternion<F> {
    fn scale_into(&self, factor: &Quaternion<F>, out: &mut Quaternion<F>) {
        *out = Quaternion::hamilton_product(factor, self);
    }

    fn scale_components_into(&self, factor: &F, out: &mut Quaternion<F>) {
        *out = self.scale_components(factor);
    }
}

macro_rules! impl_binary_op {
    ($op_trait:ident, $op_fn:ident, $assign_trait:ident, $assign_fn:ident, |$a:ident, $b:ident| $body:expr) => {
        impl<'a, F: RealField> $op_trait<&'a Quaternion<F>> for &'a Quaternion<F> {
            type Output = Quaternion<F>;
            fn $op_fn(self, r: &'a Quaternion<F>) -> Quaternion<F> {
                let ($a, $b) = (self, r);
                $body
            }
        }

        impl<F: RealField> $op_trait<Quaternion<F>> for Quaternion<F> {
            type Output = Quaternion<F>;
            fn $op_fn(self, r: Quaternion<F>) -> Quaternion<F> {
                (&self).$op_fn(&r)
            }
        }

        impl<'a, F: RealField> $assign_trait<&'a Quaternion<F>> for Quaternion<F> {
            fn $assign_fn(&mut self, r: &'a Quaternion<F>) {
                *self = (&*self).$op_fn(r);
            }
        }

        impl<F: RealField> $assign_trait<Quaternion<F>> for Quaternion<F> {
            fn $assign_fn(&mut self, r: Quaternion<F>) {
                *self = (&*self).$op_fn(&r);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, |a, b| Quaternion::new(
    a.r.clone() + b.r.clone(),
    a.i.clone() + b.i.clone(),
    a.j.clone() + b.j.clone(),
    a.k.clone() + b.k.clone(),
));
impl_binary_op!(Sub, sub, SubAssign, sub_assign, |a, b| Quaternion::new(
    a.r.clone() - b.r.clone(),
    a.i.clone() - b.i.clone(),
    a.j.clone() - b.j.clone(),
    a.k.clone() - b.k.clone(),
));
impl_binary_op!(Mul, mul, MulAssign, mul_assign, |a, b| Quaternion::hamilton_product(a, b));
impl_binary_op!(Div, div, DivAssign, div_assign, |a, b| a.divide(b));

impl<F: RealField> Neg for &Quaternion<F> {
    type Output = Quaternion<F>;
    fn neg(self) -> Quaternion<F> {
        self.map(|c| -c)
    }
}

impl<F: RealField> Neg for Quaternion<F> {
    type Output = Quaternion<F>;
    fn neg(self) -> Quaternion<F> {
        -&self
    }
}

impl<F: RealField> From<F> for Quaternion<F> {
    fn from(r: F) -> Quaternion<F> {
        Quaternion::from_real(r)
    }
}

impl<F: fmt::Display> fmt::Display for Quaternion<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{},{},{}}}", self.r, self.i, self.j, self.k)
    }
}

impl<F: RealField> FromStr for Quaternion<F> {
    type Err = AlgebraError;

    /// Accepts `{r,i,j,k}`, or a single real for a real-valued quaternion
    fn from_str(s: &str) -> Result<Quaternion<F>, AlgebraError> {
        crate::parse::parse_quaternion(s)
    }
}
