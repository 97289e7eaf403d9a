//! qalg is a library for quaternion algebra over arbitrary real number types.
//!
//! The [quaternion] module provides the number type itself,
//! with arithmetic and the transcendental functions (exp, ln, pow, the trigonometric and
//! hyperbolic families, and the normalized sinc variants).
//! On top of it sit three containers:
//! [vectors](rmodule::RModule), [matrices](matrix::Matrix) and
//! [Cartesian tensors](tensor::CartesianTensor) of quaternions.
//!
//! qalg is generic over the [scalar] datatype. Anything implementing
//! [RealField](scalar::RealField) can be used for the components:
//! `f32`, `f64`, `half::f16` (with the `f16` feature),
//! or the arbitrary-precision decimal [HighPrec](high_prec::HighPrec).
//!
//! ```
//! use qalg::high_prec::HighPrec;
//! use qalg::ops::Within;
//! use qalg::quaternion::Quaternion;
//!
//! let a: Quaternion<HighPrec<40>> = "{1,2,3,4}".parse().unwrap();
//! let tolerance: HighPrec<40> = "1e-30".parse().unwrap();
//! assert!(a.ln().exp().within(&tolerance, &a));
//! ```
//!
//! Numeric edge cases never panic and are never errors:
//! dividing by zero or taking the logarithm of zero gives NaN or infinite components,
//! which can be detected with [Predicates](ops::Predicates).
//! Container operations do return an [error](error::AlgebraError) when the shapes
//! of their operands do not fit together.
//!
//! Container operations write into a caller-supplied output, which is resized as needed,
//! so a loop can reuse its buffers:
//!
//! ```
//! use qalg::matrix::Matrix;
//!
//! let a: Matrix<f64> = "[[0, 1], [-1, 0]]".parse().unwrap();
//! let mut out = Matrix::new(0, 0);
//! a.power(4, &mut out).unwrap();
//! assert!(out.is_unity());
//! ```

/// Generate the product of a hypercomplex number from its list of components
///
/// The components are listed in basis order: real part first.
/// The count must be a power of two.
/// Two components give the complex numbers, four the quaternions, eight the octonions.
/// The generated function computes each output component as a sum of products in
/// ascending order of the left operand's component.
///
/// ```
/// use qalg::cayley_dickson;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Octonion {
///     e0: f64, e1: f64, e2: f64, e3: f64,
///     e4: f64, e5: f64, e6: f64, e7: f64,
/// }
///
/// cayley_dickson! {
///     impl Octonion {
///         fn product(e0, e1, e2, e3, e4, e5, e6, e7);
///     }
/// }
///
/// let unit = |n: usize| {
///     let mut c = [0.; 8];
///     c[n] = 1.;
///     let [e0, e1, e2, e3, e4, e5, e6, e7] = c;
///     Octonion { e0, e1, e2, e3, e4, e5, e6, e7 }
/// };
///
/// // Every imaginary unit squares to -1
/// for n in 1..8 {
///     assert_eq!(Octonion::product(&unit(n), &unit(n)).e0, -1.);
/// }
/// ```
pub use qalg_macros::cayley_dickson;

pub mod error;
pub mod high_prec;
pub mod matrix;
pub mod ops;
mod parse;
pub mod quaternion;
pub mod rmodule;
pub mod rounding;
pub mod scalar;
pub mod tensor;

mod test;
