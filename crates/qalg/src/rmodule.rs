//! Vectors of quaternions
//!
//! An [RModule] is an ordered, fixed-length sequence of quaternions.
//! Operations write into a caller-supplied output, which is resized to fit.
//! Products that only make sense for a particular length
//! (the cross product needs 3, the perp-dot product 2) report an error otherwise.

use crate::error::{AlgebraError, Result};
use crate::matrix::Matrix;
use crate::ops::*;
use crate::parse::{parse_nested, write_nested};
use crate::quaternion::Quaternion;
use crate::rounding::RoundingMode;
use crate::scalar::RealField;
use core::fmt;
use core::str::FromStr;
use log::trace;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RModule<F> {
    elements: Vec<Quaternion<F>>,
}

impl<F: RealField> RModule<F> {
    /// A vector of `len` zeros
    pub fn new(len: usize) -> RModule<F> {
        RModule {
            elements: vec![Quaternion::zero(); len],
        }
    }

    pub fn from_elements(elements: Vec<Quaternion<F>>) -> RModule<F> {
        RModule { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Quaternion<F>] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Result<Quaternion<F>> {
        self.elements
            .get(index)
            .cloned()
            .ok_or(AlgebraError::IndexOutOfRange {
                op: "get",
                index,
                limit: self.len(),
            })
    }

    pub fn set(&mut self, index: usize, value: &Quaternion<F>) -> Result<()> {
        let limit = self.len();
        let slot = self
            .elements
            .get_mut(index)
            .ok_or(AlgebraError::IndexOutOfRange {
                op: "set",
                index,
                limit,
            })?;
        *slot = value.clone();
        Ok(())
    }

    /// Change the length, keeping the overlapping prefix and zero-filling any growth
    pub fn reshape(&mut self, len: usize) {
        if len != self.len() {
            trace!("reshape vector {} -> {}", self.len(), len);
            self.elements.resize(len, Quaternion::zero());
        }
    }

    fn check_same_len(&self, op: &'static str, b: &RModule<F>) -> Result<()> {
        if self.len() == b.len() {
            Ok(())
        } else {
            Err(AlgebraError::shape(op, &[self.len()], &[b.len()]))
        }
    }

    fn check_len(&self, op: &'static str, len: usize) -> Result<()> {
        if self.len() == len {
            Ok(())
        } else {
            Err(AlgebraError::invalid(
                op,
                format!("needs length {}, got {}", len, self.len()),
            ))
        }
    }

    fn map_into(&self, out: &mut RModule<F>, f: impl Fn(&Quaternion<F>) -> Quaternion<F>) {
        out.reshape(self.len());
        for (o, a) in out.elements.iter_mut().zip(&self.elements) {
            *o = f(a);
        }
    }

    fn zip_into(
        &self,
        op: &'static str,
        b: &RModule<F>,
        out: &mut RModule<F>,
        f: impl Fn(&Quaternion<F>, &Quaternion<F>) -> Quaternion<F>,
    ) -> Result<()> {
        self.check_same_len(op, b)?;
        out.reshape(self.len());
        for ((o, a), b) in out.elements.iter_mut().zip(&self.elements).zip(&b.elements) {
            *o = f(a, b);
        }
        Ok(())
    }

    pub fn add(&self, b: &RModule<F>, out: &mut RModule<F>) -> Result<()> {
        self.zip_into("add", b, out, |a, b| a + b)
    }

    pub fn subtract(&self, b: &RModule<F>, out: &mut RModule<F>) -> Result<()> {
        self.zip_into("subtract", b, out, |a, b| a - b)
    }

    pub fn multiply_elements(&self, b: &RModule<F>, out: &mut RModule<F>) -> Result<()> {
        self.zip_into("multiply_elements", b, out, |a, b| a * b)
    }

    pub fn divide_elements(&self, b: &RModule<F>, out: &mut RModule<F>) -> Result<()> {
        self.zip_into("divide_elements", b, out, |a, b| a / b)
    }

    pub fn add_scalar(&self, s: &Quaternion<F>, out: &mut RModule<F>) {
        self.map_into(out, |a| a + s)
    }

    pub fn subtract_scalar(&self, s: &Quaternion<F>, out: &mut RModule<F>) {
        self.map_into(out, |a| a - s)
    }

    /// Right-multiply every element by `s`
    pub fn multiply_by_scalar(&self, s: &Quaternion<F>, out: &mut RModule<F>) {
        self.map_into(out, |a| a * s)
    }

    /// Right-multiply every element by `s⁻¹`
    pub fn divide_by_scalar(&self, s: &Quaternion<F>, out: &mut RModule<F>) {
        let inv = s.invert();
        self.map_into(out, |a| a * &inv)
    }

    /// The 3-D cross product, with quaternion products taken left operand first
    pub fn cross_product(&self, b: &RModule<F>, out: &mut RModule<F>) -> Result<()> {
        self.check_len("cross_product", 3)?;
        b.check_len("cross_product", 3)?;
        let (a, b) = (&self.elements, &b.elements);
        let c0 = &(&a[1] * &b[2]) - &(&a[2] * &b[1]);
        let c1 = &(&a[2] * &b[0]) - &(&a[0] * &b[2]);
        let c2 = &(&a[0] * &b[1]) - &(&a[1] * &b[0]);
        out.reshape(3);
        out.elements[0] = c0;
        out.elements[1] = c1;
        out.elements[2] = c2;
        Ok(())
    }

    /// Σ aᵢ·bᵢ, accumulated from the first element to the last
    pub fn dot_product(&self, b: &RModule<F>) -> Result<Quaternion<F>> {
        self.check_same_len("dot_product", b)?;
        let mut sum = Quaternion::zero();
        for (a, b) in self.elements.iter().zip(&b.elements) {
            sum += a * b;
        }
        Ok(sum)
    }

    /// a₀·b₁ - a₁·b₀ for 2-vectors
    pub fn perp_dot_product(&self, b: &RModule<F>) -> Result<Quaternion<F>> {
        self.check_len("perp_dot_product", 2)?;
        b.check_len("perp_dot_product", 2)?;
        let (a, b) = (&self.elements, &b.elements);
        Ok(&(&a[0] * &b[1]) - &(&a[1] * &b[0]))
    }

    /// a × (b × c)
    pub fn vector_triple_product(
        &self,
        b: &RModule<F>,
        c: &RModule<F>,
        out: &mut RModule<F>,
    ) -> Result<()> {
        let mut bc = RModule::new(3);
        b.cross_product(c, &mut bc)?;
        self.cross_product(&bc, out)
    }

    /// a · (b × c)
    pub fn scalar_triple_product(&self, b: &RModule<F>, c: &RModule<F>) -> Result<Quaternion<F>> {
        let mut bc = RModule::new(3);
        b.cross_product(c, &mut bc)?;
        self.check_len("scalar_triple_product", 3)?;
        self.dot_product(&bc)
    }

    /// The outer product: `out[i][j] = aᵢ·bⱼ`
    pub fn direct_product(&self, b: &RModule<F>, out: &mut Matrix<F>) {
        out.reshape(self.len(), b.len());
        for (i, a) in self.elements.iter().enumerate() {
            for (j, b) in b.elements.iter().enumerate() {
                out.put(i, j, a * b);
            }
        }
    }
}

impl<F: RealField> Predicates for RModule<F> {
    fn is_zero(&self) -> bool {
        self.elements.iter().all(|q| q.is_zero())
    }

    fn is_nan(&self) -> bool {
        self.elements.iter().any(|q| q.is_nan())
    }

    fn is_infinite(&self) -> bool {
        !Predicates::is_nan(self) && self.elements.iter().any(|q| q.is_infinite())
    }
}

impl<F: RealField> Within<F> for RModule<F> {
    fn within(&self, tolerance: &F, other: &RModule<F>) -> bool {
        self.len() == other.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| a.within(tolerance, b))
    }
}

impl<F: RealField> Norm<F> for RModule<F> {
    /// Euclidean norm over the norms of the elements
    fn norm(&self) -> F {
        let norms: Vec<F> = self.elements.iter().map(|q| q.norm()).collect();
        scaled_hypot(norms.iter())
    }
}

impl<F: RealField> RoundComponents<F> for RModule<F> {
    fn round_into(&self, mode: RoundingMode, delta: &F, out: &mut RModule<F>) {
        self.map_into(out, |a| a.round(mode, delta))
    }
}

impl<F: RealField> Conjugate for RModule<F> {
    fn conjugate_into(&self, out: &mut RModule<F>) {
        self.map_into(out, |a| a.conjugate())
    }
}

impl<F: RealField> Negate for RModule<F> {
    fn negate_into(&self, out: &mut RModule<F>) {
        self.map_into(out, |a| -a)
    }
}

impl<F: RealField> ScaleBy<F> for RModule<F> {
    fn scale_into(&self, factor: &Quaternion<F>, out: &mut RModule<F>) {
        self.map_into(out, |a| factor * a)
    }

    fn scale_components_into(&self, factor: &F, out: &mut RModule<F>) {
        self.map_into(out, |a| a.scale_components(factor))
    }
}

impl<F: RealField> fmt::Display for RModule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nested(f, &[self.len()], &self.elements)
    }
}

impl<F: RealField> FromStr for RModule<F> {
    type Err = AlgebraError;

    fn from_str(s: &str) -> Result<RModule<F>> {
        let tree = parse_nested::<F>(s)?;
        let shape = tree.shape()?;
        if shape.len() != 1 {
            return Err(AlgebraError::Parse {
                position: 0,
                reason: format!("expected a flat list, found {} axes", shape.len()),
            });
        }
        let mut elements = Vec::with_capacity(shape[0]);
        tree.flatten(&mut elements);
        Ok(RModule { elements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> RModule<f64> {
        s.parse().unwrap()
    }

    #[test]
    fn reshape_keeps_prefix() {
        let mut a = v("[1, 2, 3]");
        a.reshape(2);
        assert_eq!(a, v("[1, 2]"));
        a.reshape(4);
        assert_eq!(a, v("[1, 2, 0, 0]"));
    }

    #[test]
    fn mismatched_lengths() {
        let mut out = RModule::new(0);
        let err = v("[1, 2]").add(&v("[1]"), &mut out).unwrap_err();
        assert_eq!(err, AlgebraError::shape("add", &[2], &[1]));
        assert!(v("[1, 2]").cross_product(&v("[1, 2]"), &mut out).is_err());
    }

    #[test]
    fn cross_product_of_basis() {
        let mut out = RModule::new(0);
        v("[1, 0, 0]").cross_product(&v("[0, 1, 0]"), &mut out).unwrap();
        assert_eq!(out, v("[0, 0, 1]"));
    }

    #[test]
    fn cross_product_keeps_operand_order() {
        // With quaternion entries, (𝐢, 0, 0) × (0, 𝐣, 0) has 𝐢𝐣 = 𝐤 in the last slot
        let a = v("[{0,1,0,0}, 0, 0]");
        let b = v("[0, {0,0,1,0}, 0]");
        let mut out = RModule::new(0);
        a.cross_product(&b, &mut out).unwrap();
        assert_eq!(out.get(2).unwrap(), Quaternion::unit_k());
        b.cross_product(&a, &mut out).unwrap();
        assert_eq!(out.get(2).unwrap(), Quaternion::unit_k());
    }

    #[test]
    fn dot_and_triple_products() {
        let a = v("[1, 2, 3]");
        let b = v("[4, 5, 6]");
        let c = v("[7, 8, 10]");
        assert_eq!(a.dot_product(&b).unwrap(), Quaternion::from_real(32.));
        assert_eq!(
            v("[1, 2]").perp_dot_product(&v("[3, 4]")).unwrap(),
            Quaternion::from_real(-2.)
        );
        assert_eq!(
            a.scalar_triple_product(&b, &c).unwrap(),
            Quaternion::from_real(-3.)
        );

        let mut out = RModule::new(0);
        a.vector_triple_product(&b, &c, &mut out).unwrap();
        // b(a·c) - c(a·b)
        assert_eq!(out, v("[-12, 9, -2]"));
    }

    #[test]
    fn direct_product_shape() {
        let mut m = Matrix::new(0, 0);
        v("[1, 2]").direct_product(&v("[3, 4, 5]"), &mut m);
        assert_eq!(m, "[[3, 4, 5], [6, 8, 10]]".parse().unwrap());
    }

    #[test]
    fn norm_over_elements() {
        assert_eq!(v("[{3,0,0,0}, {0,0,4,0}]").norm(), 5.);
        assert_eq!(RModule::<f64>::new(3).norm(), 0.);
    }

    #[test]
    fn display_round_trip() {
        let a = v("[{1,2,3,4}, 5]");
        assert_eq!(a.to_string(), "[{1,2,3,4},{5,0,0,0}]");
        assert_eq!(v(&a.to_string()), a);
        assert!("[[1]]".parse::<RModule<f64>>().is_err());
    }
}
