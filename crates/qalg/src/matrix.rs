//! Matrices of quaternions
//!
//! A [Matrix] is a row-major grid of quaternions.
//! Square matrices form a ring with unity under [Matrix::multiply],
//! which is not commutative even for 1×1 matrices since quaternion multiplication is not.
//!
//! The transcendental functions are truncated Taylor series evaluated in the matrix ring,
//! with the fixed term counts in [taylor].
//! They are accurate for matrices of small spectral norm only;
//! nothing checks convergence.

use crate::error::{AlgebraError, Result};
use crate::ops::*;
use crate::parse::{parse_nested, write_nested};
use crate::quaternion::Quaternion;
use crate::rounding::RoundingMode;
use crate::scalar::RealField;
use core::fmt;
use core::str::FromStr;
use log::{debug, trace, warn};

/// Term counts for the matrix transcendentals
pub mod taylor {
    /// Terms of Σ Aⁿ/n!, counting the identity
    pub const EXP_TERMS: usize = 35;
    pub const SIN_TERMS: usize = 18;
    pub const COS_TERMS: usize = 18;
    pub const SINH_TERMS: usize = 18;
    pub const COSH_TERMS: usize = 18;
    /// Terms of Σ (-1)ⁿ⁺¹ (A - I)ⁿ / n
    pub const LOG_TERMS: usize = 8;
}

/// Upper bound on power iterations in [Matrix::spectral_norm]
pub const SPECTRAL_NORM_MAX_ITERATIONS: usize = 256;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matrix<F> {
    rows: usize,
    cols: usize,
    elements: Vec<Quaternion<F>>,
}

impl<F: RealField> Matrix<F> {
    /// A `rows`×`cols` matrix of zeros
    pub fn new(rows: usize, cols: usize) -> Matrix<F> {
        Matrix {
            rows,
            cols,
            elements: vec![Quaternion::zero(); rows * cols],
        }
    }

    /// Build from row-major elements
    pub fn from_elements(
        rows: usize,
        cols: usize,
        elements: Vec<Quaternion<F>>,
    ) -> Result<Matrix<F>> {
        if elements.len() != rows * cols {
            return Err(AlgebraError::shape(
                "from_elements",
                &[rows, cols],
                &[elements.len()],
            ));
        }
        Ok(Matrix {
            rows,
            cols,
            elements,
        })
    }

    /// The n×n identity
    pub fn unity(n: usize) -> Matrix<F> {
        Matrix::constant_diagonal(n, &Quaternion::unity())
    }

    /// `value` on the diagonal, zero elsewhere
    pub fn constant_diagonal(n: usize, value: &Quaternion<F>) -> Matrix<F> {
        let mut m = Matrix::new(n, n);
        for i in 0..n {
            m.put(i, i, value.clone());
        }
        m
    }

    pub fn pi(n: usize) -> Matrix<F> {
        Matrix::constant_diagonal(n, &Quaternion::pi())
    }

    pub fn e(n: usize) -> Matrix<F> {
        Matrix::constant_diagonal(n, &Quaternion::e())
    }

    pub fn phi(n: usize) -> Matrix<F> {
        Matrix::constant_diagonal(n, &Quaternion::phi())
    }

    pub fn gamma(n: usize) -> Matrix<F> {
        Matrix::constant_diagonal(n, &Quaternion::gamma())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major elements
    pub fn elements(&self) -> &[Quaternion<F>] {
        &self.elements
    }

    fn check_index(&self, op: &'static str, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows {
            return Err(AlgebraError::IndexOutOfRange {
                op,
                index: row,
                limit: self.rows,
            });
        }
        if col >= self.cols {
            return Err(AlgebraError::IndexOutOfRange {
                op,
                index: col,
                limit: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Quaternion<F>> {
        let n = self.check_index("get", row, col)?;
        Ok(self.elements[n].clone())
    }

    pub fn set(&mut self, row: usize, col: usize, value: &Quaternion<F>) -> Result<()> {
        let n = self.check_index("set", row, col)?;
        self.elements[n] = value.clone();
        Ok(())
    }

    fn at(&self, row: usize, col: usize) -> &Quaternion<F> {
        &self.elements[row * self.cols + col]
    }

    pub(crate) fn put(&mut self, row: usize, col: usize, value: Quaternion<F>) {
        let cols = self.cols;
        self.elements[row * cols + col] = value;
    }

    /// Change the shape, keeping the overlapping top-left block and zero-filling the rest
    pub fn reshape(&mut self, rows: usize, cols: usize) {
        if rows == self.rows && cols == self.cols {
            return;
        }
        trace!(
            "reshape matrix {}x{} -> {}x{}",
            self.rows,
            self.cols,
            rows,
            cols
        );
        let mut elements = vec![Quaternion::zero(); rows * cols];
        for r in 0..rows.min(self.rows) {
            for c in 0..cols.min(self.cols) {
                elements[r * cols + c] = self.at(r, c).clone();
            }
        }
        self.rows = rows;
        self.cols = cols;
        self.elements = elements;
    }

    fn check_same_shape(&self, op: &'static str, b: &Matrix<F>) -> Result<()> {
        if self.rows == b.rows && self.cols == b.cols {
            Ok(())
        } else {
            Err(AlgebraError::shape(op, &[self.rows, self.cols], &[b.rows, b.cols]))
        }
    }

    fn check_square(&self, op: &'static str) -> Result<()> {
        if self.is_square() {
            Ok(())
        } else {
            Err(AlgebraError::invalid(
                op,
                format!("needs a square matrix, got {}x{}", self.rows, self.cols),
            ))
        }
    }

    fn map_into(&self, out: &mut Matrix<F>, f: impl Fn(&Quaternion<F>) -> Quaternion<F>) {
        out.reshape(self.rows, self.cols);
        for (o, a) in out.elements.iter_mut().zip(&self.elements) {
            *o = f(a);
        }
    }

    fn zip_into(
        &self,
        op: &'static str,
        b: &Matrix<F>,
        out: &mut Matrix<F>,
        f: impl Fn(&Quaternion<F>, &Quaternion<F>) -> Quaternion<F>,
    ) -> Result<()> {
        self.check_same_shape(op, b)?;
        out.reshape(self.rows, self.cols);
        for ((o, a), b) in out.elements.iter_mut().zip(&self.elements).zip(&b.elements) {
            *o = f(a, b);
        }
        Ok(())
    }

    pub fn add(&self, b: &Matrix<F>, out: &mut Matrix<F>) -> Result<()> {
        self.zip_into("add", b, out, |a, b| a + b)
    }

    pub fn subtract(&self, b: &Matrix<F>, out: &mut Matrix<F>) -> Result<()> {
        self.zip_into("subtract", b, out, |a, b| a - b)
    }

    // Shapes are checked by the caller
    fn product(&self, b: &Matrix<F>) -> Matrix<F> {
        let mut out = Matrix::new(self.rows, b.cols);
        for r in 0..self.rows {
            for c in 0..b.cols {
                let mut sum = Quaternion::zero();
                for k in 0..self.cols {
                    sum += self.at(r, k) * b.at(k, c);
                }
                out.put(r, c, sum);
            }
        }
        out
    }

    /// The matrix product self · b
    pub fn multiply(&self, b: &Matrix<F>, out: &mut Matrix<F>) -> Result<()> {
        if self.cols != b.rows {
            return Err(AlgebraError::shape(
                "multiply",
                &[self.rows, self.cols],
                &[b.rows, b.cols],
            ));
        }
        *out = self.product(b);
        Ok(())
    }

    fn integer_power(&self, n: i64) -> Matrix<F> {
        let mut base = if n < 0 {
            self.inverse()
        } else {
            self.clone()
        };
        let mut e = n.unsigned_abs();
        let mut result = Matrix::unity(self.rows);
        while e > 0 {
            if e & 1 == 1 {
                result = result.product(&base);
            }
            e >>= 1;
            if e > 0 {
                base = base.product(&base);
            }
        }
        result
    }

    /// selfⁿ by repeated squaring. Negative powers invert first; the zeroth power is unity.
    pub fn power(&self, n: i64, out: &mut Matrix<F>) -> Result<()> {
        self.check_square("power")?;
        *out = self.integer_power(n);
        Ok(())
    }

    pub fn transpose(&self, out: &mut Matrix<F>) {
        let mut t = Matrix::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t.put(c, r, self.at(r, c).clone());
            }
        }
        *out = t;
    }

    /// The transpose with every element conjugated
    pub fn conjugate_transpose(&self, out: &mut Matrix<F>) {
        let mut t = Matrix::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t.put(c, r, self.at(r, c).conjugate());
            }
        }
        *out = t;
    }

    pub fn is_unity(&self) -> bool {
        self.is_square()
            && (0..self.rows).all(|r| {
                (0..self.cols).all(|c| {
                    let a = self.at(r, c);
                    if r == c {
                        a.is_unity()
                    } else {
                        a.is_zero()
                    }
                })
            })
    }

    fn has_unreal_entries(&self) -> bool {
        self.elements.iter().any(|q| !q.unreal().is_zero())
    }

    /// The determinant.
    ///
    /// Matrices up to 3×3 are expanded along the first row,
    /// larger ones are reduced by Gaussian elimination with the pivot of largest norm.
    /// When the entries commute with each other (real-valued quaternions, say)
    /// this is the usual determinant and det(A·B) = det(A)·det(B).
    /// For general quaternion entries it is the ordered product of the
    /// elimination pivots, which depends on row order and is not multiplicative.
    pub fn det(&self) -> Result<Quaternion<F>> {
        self.check_square("det")?;
        if self.has_unreal_entries() {
            warn!(
                "determinant of a {}x{} matrix with non-commuting entries",
                self.rows, self.cols
            );
        }
        let a = |r, c| self.at(r, c);
        Ok(match self.rows {
            0 => Quaternion::unity(),
            1 => a(0, 0).clone(),
            2 => &(a(0, 0) * a(1, 1)) - &(a(0, 1) * a(1, 0)),
            3 => {
                let m0 = &(a(1, 1) * a(2, 2)) - &(a(1, 2) * a(2, 1));
                let m1 = &(a(1, 0) * a(2, 2)) - &(a(1, 2) * a(2, 0));
                let m2 = &(a(1, 0) * a(2, 1)) - &(a(1, 1) * a(2, 0));
                &(&(a(0, 0) * &m0) - &(a(0, 1) * &m1)) + &(a(0, 2) * &m2)
            }
            _ => self.eliminated_det(),
        })
    }

    fn pivot_row(&self, col: usize, from: usize) -> usize {
        let mut best = from;
        let mut best_norm = self.at(from, col).norm();
        for r in from + 1..self.rows {
            let n = self.at(r, col).norm();
            if n > best_norm {
                best = r;
                best_norm = n;
            }
        }
        best
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.cols {
            self.elements.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    fn eliminated_det(&self) -> Quaternion<F> {
        let n = self.rows;
        let mut work = self.clone();
        let mut det = Quaternion::unity();
        let mut negate = false;
        for col in 0..n {
            let p = work.pivot_row(col, col);
            if work.at(p, col).is_zero() {
                return Quaternion::zero();
            }
            if p != col {
                work.swap_rows(p, col);
                negate = !negate;
            }
            let pivot = work.at(col, col).clone();
            let pivot_inv = pivot.invert();
            for r in col + 1..n {
                let factor = work.at(r, col) * &pivot_inv;
                for c in col..n {
                    let v = work.at(r, c) - &(&factor * work.at(col, c));
                    work.put(r, c, v);
                }
            }
            det *= &pivot;
        }
        if negate {
            -det
        } else {
            det
        }
    }

    // Gauss–Jordan by row operations, each a left multiplication,
    // so the result is a two-sided inverse over the quaternions too.
    fn inverse(&self) -> Matrix<F> {
        let n = self.rows;
        let mut work = self.clone();
        let mut inv = Matrix::unity(n);
        for col in 0..n {
            let p = work.pivot_row(col, col);
            work.swap_rows(p, col);
            inv.swap_rows(p, col);

            let pivot_inv = work.at(col, col).invert();
            for c in 0..n {
                work.put(col, c, &pivot_inv * work.at(col, c));
                inv.put(col, c, &pivot_inv * inv.at(col, c));
            }
            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = work.at(r, col).clone();
                if factor.is_zero() {
                    continue;
                }
                for c in 0..n {
                    let w = work.at(r, c) - &(&factor * work.at(col, c));
                    work.put(r, c, w);
                    let v = inv.at(r, c) - &(&factor * inv.at(col, c));
                    inv.put(r, c, v);
                }
            }
        }
        inv
    }

    /// The multiplicative inverse.
    /// A singular matrix gives NaN or infinite entries, not an error.
    pub fn invert(&self, out: &mut Matrix<F>) -> Result<()> {
        self.check_square("invert")?;
        *out = self.inverse();
        Ok(())
    }

    /// self · b⁻¹
    pub fn divide(&self, b: &Matrix<F>, out: &mut Matrix<F>) -> Result<()> {
        b.check_square("divide")?;
        if self.cols != b.rows {
            return Err(AlgebraError::shape(
                "divide",
                &[self.rows, self.cols],
                &[b.rows, b.cols],
            ));
        }
        *out = self.product(&b.inverse());
        Ok(())
    }

    fn apply(&self, v: &[Quaternion<F>]) -> Vec<Quaternion<F>> {
        (0..self.rows)
            .map(|r| {
                let mut sum = Quaternion::zero();
                for (c, x) in v.iter().enumerate() {
                    sum += self.at(r, c) * x;
                }
                sum
            })
            .collect()
    }

    fn vector_norm(v: &[Quaternion<F>]) -> F {
        let norms: Vec<F> = v.iter().map(|q| q.norm()).collect();
        scaled_hypot(norms.iter())
    }

    /// The largest singular value, estimated by power iteration on Aᴴ·A
    ///
    /// The iteration starts from each nonzero column of Aᴴ·A in turn and keeps the largest
    /// estimate. Some column always has a component along the dominant singular vector.
    pub fn spectral_norm(&self) -> F {
        if self.is_nan() {
            return F::nan();
        }
        if self.is_infinite() {
            return F::infinity();
        }
        if self.elements.is_empty() || self.is_zero() {
            return F::zero();
        }
        let mut adjoint = Matrix::new(0, 0);
        self.conjugate_transpose(&mut adjoint);
        let gram = adjoint.product(self);

        let mut largest = F::zero();
        for col in 0..gram.cols {
            let start: Vec<Quaternion<F>> =
                (0..gram.rows).map(|row| gram.at(row, col).clone()).collect();
            if start.iter().all(|q| q.is_zero()) {
                continue;
            }
            let estimate = gram.dominant_eigenvalue(start);
            debug!("spectral norm: column {} gives {}", col, estimate);
            largest = largest.max(estimate);
        }
        largest.sqrt()
    }

    /// Power iteration on a Hermitian matrix from the start vector `v`
    fn dominant_eigenvalue(&self, mut v: Vec<Quaternion<F>>) -> F {
        let mut estimate = F::zero();
        for iteration in 0..SPECTRAL_NORM_MAX_ITERATIONS {
            let w = self.apply(&v);
            let length = Matrix::vector_norm(&w);
            if length == F::zero() {
                debug!("spectral norm: start vector annihilated after {}", iteration);
                break;
            }
            let previous = estimate;
            estimate = length.clone() / Matrix::vector_norm(&v);
            let scale = length.recip();
            v = w.iter().map(|q| q.scale_components(&scale)).collect();

            let diff = (estimate.clone() - previous).abs();
            if !(diff > F::epsilon() * estimate.clone()) {
                debug!("spectral norm converged after {} iterations", iteration + 1);
                break;
            }
        }
        estimate
    }

    fn check_taylor(&self, op: &'static str) -> Result<()> {
        self.check_square(op)?;
        debug!("{} of {}x{} matrix by Taylor series", op, self.rows, self.cols);
        Ok(())
    }

    /// Σ over `terms` of `tₖ`, where t₀ = `first` and tₖ = tₖ₋₁ · `step` · `coefficient(k)`
    fn series(
        first: Matrix<F>,
        step: &Matrix<F>,
        terms: usize,
        coefficient: impl Fn(usize) -> F,
    ) -> Matrix<F> {
        let mut term = first.clone();
        let mut sum = first;
        for k in 1..terms {
            term = term.product(step);
            let scaled = term.clone();
            scaled.scale_components_into(&coefficient(k), &mut term);
            for (s, t) in sum.elements.iter_mut().zip(&term.elements) {
                *s += t;
            }
        }
        sum
    }

    fn integer(k: usize) -> F {
        F::from_integer(k as isize)
    }

    pub fn exp(&self, out: &mut Matrix<F>) -> Result<()> {
        self.check_taylor("exp")?;
        *out = Matrix::series(Matrix::unity(self.rows), self, taylor::EXP_TERMS, |k| {
            Matrix::<F>::integer(k).recip()
        });
        Ok(())
    }

    /// The logarithm as a series about the identity, for matrices near unity
    pub fn log(&self, out: &mut Matrix<F>) -> Result<()> {
        self.check_taylor("log")?;
        let mut x = Matrix::new(0, 0);
        self.subtract(&Matrix::unity(self.rows), &mut x)?;
        let mut power = x.clone();
        let mut sum = x.clone();
        for k in 2..=taylor::LOG_TERMS {
            power = power.product(&x);
            let mut sign = Matrix::<F>::integer(k).recip();
            if k % 2 == 0 {
                sign = -sign;
            }
            for (s, t) in sum.elements.iter_mut().zip(&power.elements) {
                *s += t.scale_components(&sign);
            }
        }
        *out = sum;
        Ok(())
    }

    fn odd_series(&self, terms: usize, alternating: bool) -> Matrix<F> {
        let square = self.product(self);
        Matrix::series(self.clone(), &square, terms, |k| {
            let c = Matrix::<F>::integer(2 * k * (2 * k + 1)).recip();
            if alternating {
                -c
            } else {
                c
            }
        })
    }

    fn even_series(&self, terms: usize, alternating: bool) -> Matrix<F> {
        let square = self.product(self);
        Matrix::series(Matrix::unity(self.rows), &square, terms, |k| {
            let c = Matrix::<F>::integer((2 * k - 1) * 2 * k).recip();
            if alternating {
                -c
            } else {
                c
            }
        })
    }

    pub fn sin(&self, out: &mut Matrix<F>) -> Result<()> {
        self.check_taylor("sin")?;
        *out = self.odd_series(taylor::SIN_TERMS, true);
        Ok(())
    }

    pub fn cos(&self, out: &mut Matrix<F>) -> Result<()> {
        self.check_taylor("cos")?;
        *out = self.even_series(taylor::COS_TERMS, true);
        Ok(())
    }

    pub fn sinh(&self, out: &mut Matrix<F>) -> Result<()> {
        self.check_taylor("sinh")?;
        *out = self.odd_series(taylor::SINH_TERMS, false);
        Ok(())
    }

    pub fn cosh(&self, out: &mut Matrix<F>) -> Result<()> {
        self.check_taylor("cosh")?;
        *out = self.even_series(taylor::COSH_TERMS, false);
        Ok(())
    }

    /// sin(A) · cos(A)⁻¹
    pub fn tan(&self, out: &mut Matrix<F>) -> Result<()> {
        self.check_taylor("tan")?;
        let s = self.odd_series(taylor::SIN_TERMS, true);
        let c = self.even_series(taylor::COS_TERMS, true);
        *out = s.product(&c.inverse());
        Ok(())
    }

    /// sinh(A) · cosh(A)⁻¹
    pub fn tanh(&self, out: &mut Matrix<F>) -> Result<()> {
        self.check_taylor("tanh")?;
        let s = self.odd_series(taylor::SINH_TERMS, false);
        let c = self.even_series(taylor::COSH_TERMS, false);
        *out = s.product(&c.inverse());
        Ok(())
    }

    /// The Kronecker product: block (i, j) of the result is `aᵢⱼ · b`
    pub fn direct_product(&self, b: &Matrix<F>, out: &mut Matrix<F>) {
        let mut k = Matrix::new(self.rows * b.rows, self.cols * b.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                let a = self.at(i, j);
                for r in 0..b.rows {
                    for c in 0..b.cols {
                        k.put(i * b.rows + r, j * b.cols + c, a * b.at(r, c));
                    }
                }
            }
        }
        *out = k;
    }
}

impl<F: RealField> Predicates for Matrix<F> {
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

impl<F: RealField> Within<F> for Matrix<F> {
    fn within(&self, tolerance: &F, other: &Matrix<F>) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| a.within(tolerance, b))
    }
}

impl<F: RealField> Norm<F> for Matrix<F> {
    /// The Frobenius norm. See [Matrix::spectral_norm] for the operator norm.
    fn norm(&self) -> F {
        Matrix::vector_norm(&self.elements)
    }
}

impl<F: RealField> RoundComponents<F> for Matrix<F> {
    fn round_into(&self, mode: RoundingMode, delta: &F, out: &mut Matrix<F>) {
        self.map_into(out, |a| a.round(mode, delta))
    }
}

impl<F: RealField> Conjugate for Matrix<F> {
    fn conjugate_into(&self, out: &mut Matrix<F>) {
        self.map_into(out, |a| a.conjugate())
    }
}

impl<F: RealField> Negate for Matrix<F> {
    fn negate_into(&self, out: &mut Matrix<F>) {
        self.map_into(out, |a| -a)
    }
}

impl<F: RealField> ScaleBy<F> for Matrix<F> {
    fn scale_into(&self, factor: &Quaternion<F>, out: &mut Matrix<F>) {
        self.map_into(out, |a| factor * a)
    }

    fn scale_components_into(&self, factor: &F, out: &mut Matrix<F>) {
        self.map_into(out, |a| a.scale_components(factor))
    }
}

impl<F: RealField> fmt::Display for Matrix<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows == 0 {
            return write!(f, "[]");
        }
        write_nested(f, &[self.rows, self.cols], &self.elements)
    }
}

impl<F: RealField> FromStr for Matrix<F> {
    type Err = AlgebraError;

    /// Rows of equal length: `[[a, b], [c, d]]`
    fn from_str(s: &str) -> Result<Matrix<F>> {
        let tree = parse_nested::<F>(s)?;
        let (rows, cols) = match tree.shape()?[..] {
            [0] => (0, 0),
            [rows, cols] => (rows, cols),
            ref other => {
                return Err(AlgebraError::Parse {
                    position: 0,
                    reason: format!("expected rows of elements, found {} axes", other.len()),
                })
            }
        };
        let mut elements = Vec::with_capacity(rows * cols);
        tree.flatten(&mut elements);
        Ok(Matrix {
            rows,
            cols,
            elements,
        })
    }
}
