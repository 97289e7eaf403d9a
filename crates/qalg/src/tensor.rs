//! Cartesian tensors of quaternions
//!
//! A [CartesianTensor] has rank R and a single dimension D shared by every axis,
//! so it holds D^R quaternions (one, for rank 0).
//! Elements are stored row-major: the last index varies fastest.
//!
//! With the identity metric there is no distinction between upper and lower indices.
//! Lowering an index copies the tensor, and raising one is rejected.

use crate::error::{AlgebraError, Result};
use crate::ops::*;
use crate::parse::{parse_nested, write_nested};
use crate::quaternion::Quaternion;
use crate::rounding::RoundingMode;
use crate::scalar::RealField;
use core::fmt;
use core::str::FromStr;
use log::trace;

#[derive(Clone, Debug, PartialEq)]
pub struct CartesianTensor<F> {
    rank: usize,
    dimension: usize,
    /// Linear offset of a unit step along each axis
    multipliers: Vec<usize>,
    elements: Vec<Quaternion<F>>,
}

fn multipliers(rank: usize, dimension: usize) -> Vec<usize> {
    let mut m = vec![1; rank];
    for axis in (0..rank.saturating_sub(1)).rev() {
        m[axis] = m[axis + 1] * dimension;
    }
    m
}

impl<F: RealField> CartesianTensor<F> {
    /// A zero tensor of the given rank and dimension
    pub fn new(rank: usize, dimension: usize) -> CartesianTensor<F> {
        CartesianTensor {
            rank,
            dimension,
            multipliers: multipliers(rank, dimension),
            elements: vec![Quaternion::zero(); dimension.pow(rank as u32)],
        }
    }

    /// A rank-0 tensor holding `value`
    pub fn scalar(value: Quaternion<F>) -> CartesianTensor<F> {
        let mut t = CartesianTensor::new(0, 1);
        t.elements[0] = value;
        t
    }

    /// The generalized Kronecker delta: unity where every index is equal, zero elsewhere
    pub fn unity(rank: usize, dimension: usize) -> CartesianTensor<F> {
        let mut t = CartesianTensor::new(rank, dimension);
        let step: usize = t.multipliers.iter().sum();
        for d in 0..dimension {
            t.elements[d * step] = Quaternion::unity();
        }
        if rank == 0 {
            t.elements[0] = Quaternion::unity();
        }
        t
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Row-major elements
    pub fn elements(&self) -> &[Quaternion<F>] {
        &self.elements
    }

    /// Reinitialize to a zero tensor of a new rank and dimension
    pub fn reshape(&mut self, rank: usize, dimension: usize) {
        if rank != self.rank || dimension != self.dimension {
            trace!(
                "reshape tensor rank {} dim {} -> rank {} dim {}",
                self.rank,
                self.dimension,
                rank,
                dimension
            );
        }
        *self = CartesianTensor::new(rank, dimension);
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.dimension; self.rank]
    }

    fn offset(&self, op: &'static str, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank {
            return Err(AlgebraError::shape(op, &self.shape(), &[index.len()]));
        }
        let mut offset = 0;
        for (&i, &m) in index.iter().zip(&self.multipliers) {
            if i >= self.dimension {
                return Err(AlgebraError::IndexOutOfRange {
                    op,
                    index: i,
                    limit: self.dimension,
                });
            }
            offset += i * m;
        }
        Ok(offset)
    }

    fn index_of(&self, mut offset: usize) -> Vec<usize> {
        self.multipliers
            .iter()
            .map(|&m| {
                let i = offset / m;
                offset %= m;
                i
            })
            .collect()
    }

    pub fn get(&self, index: &[usize]) -> Result<Quaternion<F>> {
        let n = self.offset("get", index)?;
        Ok(self.elements[n].clone())
    }

    pub fn set(&mut self, index: &[usize], value: &Quaternion<F>) -> Result<()> {
        let n = self.offset("set", index)?;
        self.elements[n] = value.clone();
        Ok(())
    }

    fn check_same_shape(&self, op: &'static str, b: &CartesianTensor<F>) -> Result<()> {
        if self.rank == b.rank && self.dimension == b.dimension {
            Ok(())
        } else {
            Err(AlgebraError::shape(op, &self.shape(), &b.shape()))
        }
    }

    fn check_axis(&self, op: &'static str, axis: usize, rank: usize) -> Result<()> {
        if axis < rank {
            Ok(())
        } else {
            Err(AlgebraError::IndexOutOfRange {
                op,
                index: axis,
                limit: rank,
            })
        }
    }

    fn map_into(
        &self,
        out: &mut CartesianTensor<F>,
        f: impl Fn(&Quaternion<F>) -> Quaternion<F>,
    ) {
        if out.rank != self.rank || out.dimension != self.dimension {
            out.reshape(self.rank, self.dimension);
        }
        for (o, a) in out.elements.iter_mut().zip(&self.elements) {
            *o = f(a);
        }
    }

    fn zip_into(
        &self,
        op: &'static str,
        b: &CartesianTensor<F>,
        out: &mut CartesianTensor<F>,
        f: impl Fn(&Quaternion<F>, &Quaternion<F>) -> Quaternion<F>,
    ) -> Result<()> {
        self.check_same_shape(op, b)?;
        if out.rank != self.rank || out.dimension != self.dimension {
            out.reshape(self.rank, self.dimension);
        }
        for ((o, a), b) in out.elements.iter_mut().zip(&self.elements).zip(&b.elements) {
            *o = f(a, b);
        }
        Ok(())
    }

    pub fn add(&self, b: &CartesianTensor<F>, out: &mut CartesianTensor<F>) -> Result<()> {
        self.zip_into("add", b, out, |a, b| a + b)
    }

    pub fn subtract(&self, b: &CartesianTensor<F>, out: &mut CartesianTensor<F>) -> Result<()> {
        self.zip_into("subtract", b, out, |a, b| a - b)
    }

    pub fn multiply_elements(
        &self,
        b: &CartesianTensor<F>,
        out: &mut CartesianTensor<F>,
    ) -> Result<()> {
        self.zip_into("multiply_elements", b, out, |a, b| a * b)
    }

    pub fn divide_elements(
        &self,
        b: &CartesianTensor<F>,
        out: &mut CartesianTensor<F>,
    ) -> Result<()> {
        self.zip_into("divide_elements", b, out, |a, b| a / b)
    }

    fn outer(&self, b: &CartesianTensor<F>) -> Result<CartesianTensor<F>> {
        let dimension = if self.rank == 0 {
            b.dimension
        } else if b.rank == 0 || self.dimension == b.dimension {
            self.dimension
        } else {
            return Err(AlgebraError::shape(
                "outer_product",
                &self.shape(),
                &b.shape(),
            ));
        };
        let mut t = CartesianTensor::new(self.rank + b.rank, dimension);
        let stride = b.elements.len();
        for (i, a) in self.elements.iter().enumerate() {
            for (j, b) in b.elements.iter().enumerate() {
                t.elements[i * stride + j] = a * b;
            }
        }
        Ok(t)
    }

    /// The tensor product, of rank `rank(a) + rank(b)`.
    ///
    /// Rank-0 operands combine with tensors of any dimension;
    /// otherwise the dimensions must agree.
    pub fn outer_product(&self, b: &CartesianTensor<F>, out: &mut CartesianTensor<F>) -> Result<()> {
        *out = self.outer(b)?;
        Ok(())
    }

    /// Tensor multiplication, which for Cartesian tensors is the outer product
    pub fn multiply(&self, b: &CartesianTensor<F>, out: &mut CartesianTensor<F>) -> Result<()> {
        self.outer_product(b, out)
    }

    fn contracted(&self, i: usize, j: usize) -> Result<CartesianTensor<F>> {
        self.check_axis("contract", i, self.rank)?;
        self.check_axis("contract", j, self.rank)?;
        if i == j {
            return Err(AlgebraError::invalid(
                "contract",
                format!("cannot contract axis {} with itself", i),
            ));
        }
        let mut t = CartesianTensor::new(self.rank - 2, self.dimension);
        let diagonal_step = self.multipliers[i] + self.multipliers[j];
        for n in 0..t.elements.len() {
            let mut index = t.index_of(n);
            // Reinsert the contracted axes, lower position first
            let (lo, hi) = if i < j { (i, j) } else { (j, i) };
            index.insert(lo, 0);
            index.insert(hi, 0);
            let base: usize = index
                .iter()
                .zip(&self.multipliers)
                .map(|(&x, &m)| x * m)
                .sum();
            let mut sum = Quaternion::zero();
            for d in 0..self.dimension {
                sum += &self.elements[base + d * diagonal_step];
            }
            t.elements[n] = sum;
        }
        Ok(t)
    }

    /// Sum over the diagonal of axes `i` and `j`, giving a tensor of rank two less
    pub fn contract(&self, i: usize, j: usize, out: &mut CartesianTensor<F>) -> Result<()> {
        *out = self.contracted(i, j)?;
        Ok(())
    }

    /// The outer product with `b`, contracted over axis `a_index` of self
    /// and axis `b_index` of `b`
    pub fn inner_product(
        &self,
        a_index: usize,
        b: &CartesianTensor<F>,
        b_index: usize,
        out: &mut CartesianTensor<F>,
    ) -> Result<()> {
        self.check_axis("inner_product", a_index, self.rank)?;
        b.check_axis("inner_product", b_index, b.rank)?;
        *out = self.outer(b)?.contracted(a_index, self.rank + b_index)?;
        Ok(())
    }

    /// Always fails: a Cartesian tensor has no metric to raise an index with
    pub fn raise_index(&self, _index: usize, _out: &mut CartesianTensor<F>) -> Result<()> {
        Err(AlgebraError::Unsupported(
            "raising an index of a Cartesian tensor",
        ))
    }

    /// Lowering with the identity metric copies the tensor
    pub fn lower_index(&self, index: usize, out: &mut CartesianTensor<F>) -> Result<()> {
        self.check_axis("lower_index", index, self.rank)?;
        out.clone_from(self);
        Ok(())
    }

    /// The n-fold outer product of self with itself.
    /// The zeroth power is the rank-0 unity.
    pub fn power(&self, n: i64, out: &mut CartesianTensor<F>) -> Result<()> {
        if n < 0 {
            return Err(AlgebraError::invalid(
                "power",
                format!("negative exponent {}", n),
            ));
        }
        let mut result = CartesianTensor::unity(0, self.dimension);
        let mut base = self.clone();
        let mut e = n as u64;
        while e > 0 {
            if e & 1 == 1 {
                result = result.outer(&base)?;
            }
            e >>= 1;
            if e > 0 {
                base = base.outer(&base)?;
            }
        }
        *out = result;
        Ok(())
    }

    /// The partial derivative along `index` of the output.
    ///
    /// A tensor value does not vary over space, so this is the zero tensor
    /// of rank one more than self.
    pub fn comma_derivative(&self, index: usize, out: &mut CartesianTensor<F>) -> Result<()> {
        self.check_axis("comma_derivative", index, self.rank + 1)?;
        out.reshape(self.rank + 1, self.dimension);
        Ok(())
    }

    /// The covariant derivative, equal to the partial derivative
    /// since Cartesian coordinates have vanishing Christoffel symbols
    pub fn semicolon_derivative(&self, index: usize, out: &mut CartesianTensor<F>) -> Result<()> {
        self.check_axis("semicolon_derivative", index, self.rank + 1)?;
        self.comma_derivative(index, out)
    }
}

impl<F: RealField> Predicates for CartesianTensor<F> {
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

impl<F: RealField> Within<F> for CartesianTensor<F> {
    fn within(&self, tolerance: &F, other: &CartesianTensor<F>) -> bool {
        self.rank == other.rank
            && self.dimension == other.dimension
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| a.within(tolerance, b))
    }
}

impl<F: RealField> Norm<F> for CartesianTensor<F> {
    fn norm(&self) -> F {
        let norms: Vec<F> = self.elements.iter().map(|q| q.norm()).collect();
        scaled_hypot(norms.iter())
    }
}

impl<F: RealField> RoundComponents<F> for CartesianTensor<F> {
    fn round_into(&self, mode: RoundingMode, delta: &F, out: &mut CartesianTensor<F>) {
        self.map_into(out, |a| a.round(mode, delta))
    }
}

impl<F: RealField> Conjugate for CartesianTensor<F> {
    fn conjugate_into(&self, out: &mut CartesianTensor<F>) {
        self.map_into(out, |a| a.conjugate())
    }
}

impl<F: RealField> Negate for CartesianTensor<F> {
    fn negate_into(&self, out: &mut CartesianTensor<F>) {
        self.map_into(out, |a| -a)
    }
}

impl<F: RealField> ScaleBy<F> for CartesianTensor<F> {
    fn scale_into(&self, factor: &Quaternion<F>, out: &mut CartesianTensor<F>) {
        self.map_into(out, |a| factor * a)
    }

    fn scale_components_into(&self, factor: &F, out: &mut CartesianTensor<F>) {
        self.map_into(out, |a| a.scale_components(factor))
    }
}

impl<F: RealField> fmt::Display for CartesianTensor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nested(f, &self.shape(), &self.elements)
    }
}

impl<F: RealField> FromStr for CartesianTensor<F> {
    type Err = AlgebraError;

    /// Nested lists whose lengths all agree. A bare quaternion is a rank-0 tensor.
    fn from_str(s: &str) -> Result<CartesianTensor<F>> {
        let tree = parse_nested::<F>(s)?;
        let shape = tree.shape()?;
        let dimension = shape.first().copied().unwrap_or(1);
        if shape.iter().any(|&d| d != dimension) {
            return Err(AlgebraError::Parse {
                position: 0,
                reason: format!("axis lengths {:?} differ", shape),
            });
        }
        let mut t = CartesianTensor::new(shape.len(), dimension);
        t.elements.clear();
        tree.flatten(&mut t.elements);
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> CartesianTensor<f64> {
        s.parse().unwrap()
    }

    #[test]
    fn row_major_indexing() {
        let a = t("[[1, 2, 3], [4, 5, 6], [7, 8, 9]]");
        assert_eq!(a.rank(), 2);
        assert_eq!(a.dimension(), 3);
        assert_eq!(a.get(&[1, 2]).unwrap(), Quaternion::from_real(6.));
        assert!(a.get(&[3, 0]).is_err());
        assert!(a.get(&[0]).is_err());
    }

    #[test]
    fn unequal_axes_are_rejected() {
        assert!("[[1, 2, 3], [4, 5, 6]]".parse::<CartesianTensor<f64>>().is_err());
        assert!("[[1, 2], [3]]".parse::<CartesianTensor<f64>>().is_err());
    }

    #[test]
    fn rank_zero() {
        let s = t("{1,2,3,4}");
        assert_eq!(s.rank(), 0);
        assert_eq!(s.get(&[]).unwrap(), Quaternion::new(1., 2., 3., 4.));
        assert_eq!(s.to_string(), "{1,2,3,4}");
    }

    #[test]
    fn outer_product_rank_adds() {
        let a = t("[1, 2]");
        let b = t("[[0, 1], [{0,1,0,0}, 0]]");
        let mut out = CartesianTensor::new(0, 0);
        a.outer_product(&b, &mut out).unwrap();
        assert_eq!(out.rank(), 3);
        assert_eq!(out.get(&[1, 1, 0]).unwrap(), Quaternion::new(0., 2., 0., 0.));

        let s = CartesianTensor::scalar(Quaternion::from_real(3.));
        s.multiply(&t("[1, 2, 3]"), &mut out).unwrap();
        assert_eq!(out, t("[3, 6, 9]"));

        assert!(a.outer_product(&t("[1, 2, 3]"), &mut out).is_err());
    }

    #[test]
    fn contract_unity_gives_dimension() {
        let u = CartesianTensor::<f64>::unity(2, 4);
        let mut out = CartesianTensor::new(0, 0);
        u.contract(0, 1, &mut out).unwrap();
        assert_eq!(out.rank(), 0);
        assert_eq!(out.get(&[]).unwrap(), Quaternion::from_real(4.));
    }

    #[test]
    fn contract_checks_axes() {
        let a = t("[[1, 2], [3, 4]]");
        let mut out = CartesianTensor::new(0, 0);
        assert!(a.contract(0, 0, &mut out).is_err());
        assert!(a.contract(0, 2, &mut out).is_err());
        a.contract(1, 0, &mut out).unwrap();
        assert_eq!(out.get(&[]).unwrap(), Quaternion::from_real(5.));
    }

    #[test]
    fn contract_middle_axes() {
        // rank 3, contract axes 0 and 2: out[j] = Σ_d a[d][j][d]
        let a = t("[[[1, 2], [3, 4]], [[5, 6], [7, 8]]]");
        let mut out = CartesianTensor::new(0, 0);
        a.contract(0, 2, &mut out).unwrap();
        assert_eq!(out, t("[7, 11]"));
    }

    #[test]
    fn inner_product_is_matrix_product() {
        let a = t("[[1, 2], [3, 4]]");
        let b = t("[[5, 6], [7, 8]]");
        let mut out = CartesianTensor::new(0, 0);
        a.inner_product(1, &b, 0, &mut out).unwrap();
        assert_eq!(out, t("[[19, 22], [43, 50]]"));
        assert!(a.inner_product(2, &b, 0, &mut out).is_err());
    }

    #[test]
    fn index_raising_and_lowering() {
        let a = t("[1, 2]");
        let mut out = CartesianTensor::new(0, 0);
        assert_eq!(
            a.raise_index(0, &mut out),
            Err(AlgebraError::Unsupported("raising an index of a Cartesian tensor"))
        );
        a.lower_index(0, &mut out).unwrap();
        assert_eq!(out, a);
        assert!(a.lower_index(1, &mut out).is_err());
    }

    #[test]
    fn tensor_power() {
        let a = t("[1, 2]");
        let mut out = CartesianTensor::new(0, 0);
        a.power(3, &mut out).unwrap();
        assert_eq!(out.rank(), 3);
        assert_eq!(out.get(&[1, 1, 1]).unwrap(), Quaternion::from_real(8.));
        assert_eq!(out.get(&[0, 1, 1]).unwrap(), Quaternion::from_real(4.));
        a.power(0, &mut out).unwrap();
        assert_eq!(out.rank(), 0);
        assert!(out.get(&[]).unwrap().is_unity());
        assert!(a.power(-1, &mut out).is_err());
    }

    #[test]
    fn derivatives_of_constant_tensors() {
        let a = t("[1, 2, 3]");
        let mut out = CartesianTensor::new(0, 0);
        a.comma_derivative(1, &mut out).unwrap();
        assert_eq!(out.rank(), 2);
        assert_eq!(out.dimension(), 3);
        assert!(out.is_zero());
        a.semicolon_derivative(0, &mut out).unwrap();
        assert!(out.is_zero());
        assert!(a.comma_derivative(2, &mut out).is_err());
    }

    #[test]
    fn element_wise_and_norm() {
        let a = t("[[1, 2], [3, 4]]");
        let mut out = CartesianTensor::new(0, 0);
        a.add(&a, &mut out).unwrap();
        assert_eq!(out, t("[[2, 4], [6, 8]]"));
        assert!(a.add(&t("[1, 2]"), &mut out).is_err());
        a.scale_by_one_half_into(1, &mut out);
        assert_eq!(out, t("[[0.5, 1], [1.5, 2]]"));
        assert_eq!(t("[3, {0,0,0,4}]").norm(), 5.);
    }
}
