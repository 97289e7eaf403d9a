#![cfg(test)]

use crate::high_prec::HighPrec;
use crate::matrix::Matrix;
use crate::ops::*;
use crate::quaternion::Quaternion;
use crate::scalar::RealField;
use crate::tensor::CartesianTensor;

macro_rules! assert_close {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                assert!(
                    left_val.is_close(right_val),
                    "{:?} !~= {:?}",
                    left_val,
                    right_val
                );
            }
        }
    };
}

trait IsClose {
    fn is_close(&self, rhs: &Self) -> bool;
}

impl IsClose for f64 {
    fn is_close(&self, rhs: &f64) -> bool {
        (self - rhs).abs() < 1e-9
    }
}

impl IsClose for f32 {
    fn is_close(&self, rhs: &f32) -> bool {
        (self - rhs).abs() < 1e-4
    }
}

impl IsClose for Quaternion<f64> {
    fn is_close(&self, rhs: &Self) -> bool {
        self.within(&1e-9, rhs)
    }
}

impl IsClose for Quaternion<f32> {
    fn is_close(&self, rhs: &Self) -> bool {
        self.within(&1e-4, rhs)
    }
}

impl IsClose for Quaternion<HighPrec<40>> {
    fn is_close(&self, rhs: &Self) -> bool {
        self.within(&HighPrec::from_f64(1e-30), rhs)
    }
}

impl IsClose for Matrix<f64> {
    fn is_close(&self, rhs: &Self) -> bool {
        self.within(&1e-9, rhs)
    }
}

fn q(r: f64, i: f64, j: f64, k: f64) -> Quaternion<f64> {
    Quaternion::new(r, i, j, k)
}

#[test]
fn test_unit_products() {
    let i = Quaternion::<f64>::unit_i();
    let j = Quaternion::<f64>::unit_j();
    let k = Quaternion::<f64>::unit_k();
    let minus_one = -Quaternion::<f64>::unity();

    assert_eq!(&i * &j, k);
    assert_eq!(&j * &k, i);
    assert_eq!(&k * &i, j);
    assert_eq!(&j * &i, -&k);
    assert_eq!(&i * &i, minus_one);
    assert_eq!(&j * &j, minus_one);
    assert_eq!(&k * &k, minus_one);
}

#[test]
fn test_hamilton_product_regression() {
    let a = q(1., 2., 3., 4.);
    let b = q(5., 6., 7., 8.);
    assert_eq!(&a * &b, q(-60., 12., 30., 24.));
    assert_eq!(&b * &a, q(-60., 20., 14., 32.));

    // Same result at every precision
    let a32 = Quaternion::<f32>::new(1., 2., 3., 4.);
    let b32 = Quaternion::<f32>::new(5., 6., 7., 8.);
    assert_eq!(&a32 * &b32, Quaternion::new(-60., 12., 30., 24.));
    let ah: Quaternion<HighPrec> = "{1,2,3,4}".parse().unwrap();
    let bh: Quaternion<HighPrec> = "{5,6,7,8}".parse().unwrap();
    assert_eq!((&ah * &bh).to_string(), "{-60,12,30,24}");
}

#[test]
fn test_norm() {
    assert_eq!(q(3., 4., 0., 0.).norm(), 5.);
    assert_eq!(Quaternion::<f64>::zero().norm(), 0.);
    // No overflow for large components
    assert_close!(q(3e300, 4e300, 0., 0.).norm() / 1e300, 5.);
    assert!(Quaternion::<f64>::nan().norm().is_nan());
}

#[test]
fn test_conjugate_norm_identity() {
    for a in [q(1., 2., 3., 4.), q(-0.5, 0., 7., 1e-3), q(0., 0., 0., 2.)] {
        let n = a.norm();
        assert_close!(&a * &a.conjugate(), Quaternion::from_real(n * n));
    }
}

#[test]
fn test_invert() {
    let a = q(1., -2., 0.5, 4.);
    assert_close!(&a * &a.invert(), Quaternion::unity());
    assert_close!(&a.invert() * &a, Quaternion::unity());
    assert_close!(&a / &a, Quaternion::unity());

    let inv_zero = Quaternion::<f64>::zero().invert();
    assert!(inv_zero.is_nan() || inv_zero.is_infinite());
}

#[test]
fn test_exp_ln_round_trip() {
    for a in [
        q(1., 2., 3., 4.),
        q(-3., 0.1, -0.2, 0.3),
        q(0.25, 0., 0., -1.),
        q(2., 0., 0., 0.),
    ] {
        assert_close!(a.ln().exp(), a);
    }
    // Within the principal branch the other direction holds too
    let small = q(0.3, 0.4, -0.5, 0.6);
    assert_close!(small.exp().ln(), small);
}

#[test]
fn test_exp_of_pure_unreal() {
    // e^(𝐢π) = -1
    let a = Quaternion::<f64>::unit_i().scale_components(&core::f64::consts::PI);
    assert_close!(a.exp(), -Quaternion::unity());
    assert_close!(Quaternion::<f64>::zero().exp(), Quaternion::unity());
}

#[test]
fn test_ln_cosine_weighted() {
    // Agrees with ln on real-valued input
    let a = q(2., 0., 0., 0.);
    assert_close!(a.ln_cosine_weighted(), a.ln());
    // Unreal parts scaled by r/|a| times acos(r/|a|)
    let b = q(1., 1., 0., 0.);
    let m = 1. / 2f64.sqrt();
    assert_close!(
        b.ln_cosine_weighted(),
        q(2f64.sqrt().ln(), m * m.acos(), 0., 0.)
    );
}

#[test]
fn test_principal_and_cosine_weighted_logarithms_differ() {
    let a = q(1., 1., 0., 0.);
    let m = 1. / 2f64.sqrt();
    assert_close!(a.ln().i, core::f64::consts::FRAC_PI_4);
    assert_close!(a.ln_cosine_weighted().i, m * m.acos());
    assert_close!(a.ln().exp(), a);
    assert!(!a.ln_cosine_weighted().exp().within(&1e-3, &a));
    // pow goes through the principal logarithm
    let b = q(0.5, 0., 0.25, 0.);
    assert_close!(a.pow(&b), (&b * &a.ln()).exp());
}

#[test]
fn test_logarithm_of_zero() {
    let l = Quaternion::<f64>::zero().ln();
    assert_eq!(l.r, f64::NEG_INFINITY);
    assert!(l.is_infinite());
    assert!(Quaternion::<f64>::zero().ln_cosine_weighted().is_nan());

    let h = Quaternion::<HighPrec<40>>::zero().ln();
    assert_eq!(h.r, -HighPrec::infinity());
    assert!(h.is_infinite());
}

#[test]
fn test_transcendentals_of_infinite_components() {
    let a = q(0., f64::INFINITY, 0., 0.);
    assert!(a.exp().is_nan());
    assert!(a.sin().is_nan());
    assert!(a.cos().is_nan());
    assert_eq!(q(f64::NEG_INFINITY, 0., 0., 0.).exp(), Quaternion::zero());
    assert_eq!(q(f64::INFINITY, 0., 0., 0.).exp().r, f64::INFINITY);
}

#[test]
fn test_high_precision_invert_zero() {
    let inv = Quaternion::<HighPrec<40>>::zero().invert();
    assert!(inv.is_nan());
    let quotient = Quaternion::<HighPrec<40>>::unity().divide(&Quaternion::zero());
    assert!(quotient.is_nan() || quotient.is_infinite());
}

#[test]
fn test_pow_and_roots() {
    let a = q(1., 2., 3., 4.);
    assert_close!(a.sqrt() * a.sqrt(), a);
    let c = a.cbrt();
    assert_close!(&(&c * &c) * &c, a);
    assert_close!(a.pow(&Quaternion::from_real(3.)), a.power(3));
    assert_eq!(Quaternion::<f64>::zero().pow(&q(2., 0., 0., 0.)), Quaternion::zero());
    assert_eq!(Quaternion::<f64>::zero().sqrt(), Quaternion::zero());
}

#[test]
fn test_integer_power() {
    let a = q(0.5, 1., -1., 2.);
    assert_eq!(a.power(0), Quaternion::unity());
    assert_eq!(a.power(1), a);
    assert_close!(a.power(5), &(&(&(&a * &a) * &a) * &a) * &a);
    assert_close!(a.power(-2), (&a * &a).invert());
}

#[test]
fn test_sin_cos_identity() {
    for a in [q(0.7, 0., 0., 0.), q(-2., 0., 0., 0.), q(0.3, 0.2, -0.1, 0.4)] {
        let (s, c) = a.sin_and_cos();
        assert_close!(&(&s * &s) + &(&c * &c), Quaternion::unity());
    }
    let (s, c) = q(0.7, 0., 0., 0.).sin_and_cos();
    assert_close!(s.r, 0.7f64.sin());
    assert_close!(c.r, 0.7f64.cos());
}

#[test]
fn test_hyperbolic_identity() {
    let a = q(0.3, 0.2, -0.1, 0.4);
    let (s, c) = a.sinh_and_cosh();
    assert_close!(&(&c * &c) - &(&s * &s), Quaternion::unity());
    assert_close!(a.tanh(), s.divide(&c));
    assert_close!(a.tan(), a.sin().divide(&a.cos()));
}

#[test]
fn test_sinc_family() {
    assert_eq!(Quaternion::<f64>::zero().sinc(), Quaternion::unity());
    assert_eq!(Quaternion::<f64>::zero().sinchpi(), Quaternion::unity());
    let a = q(0.5, 0., 0., 0.);
    assert_close!(a.sinc().r, 0.5f64.sin() / 0.5);
    assert_close!(a.sinch().r, 0.5f64.sinh() / 0.5);
    assert_close!(q(1., 0., 0., 0.).sincpi().r, 0.);
}

#[test]
fn test_nan_takes_precedence() {
    let a = q(f64::INFINITY, f64::NAN, 0., 0.);
    assert!(a.is_nan());
    assert!(!a.is_infinite());
    let b = q(0., f64::NEG_INFINITY, 0., 0.);
    assert!(b.is_infinite());
    assert!(!b.is_nan());
    assert!(Quaternion::<f64>::nan().is_nan());
    assert!(Quaternion::<f64>::infinite().is_infinite());
}

#[test]
fn test_within() {
    let a = q(1., 2., 3., 4.);
    assert!(a.within(&0.1, &q(1.05, 2., 3., 3.95)));
    assert!(!a.within(&0.01, &q(1.05, 2., 3., 3.95)));
    assert!(Quaternion::<f64>::nan().within(&0., &Quaternion::nan()));
    assert!(!Quaternion::<f64>::infinite().within(&1e300, &-Quaternion::infinite()));
}

#[test]
fn test_scale_family() {
    let a = q(1., 2., 3., 4.);
    let mut out = Quaternion::zero();
    a.scale_by_two_into(3, &mut out);
    assert_eq!(out, q(8., 16., 24., 32.));
    a.scale_by_one_half_into(1, &mut out);
    assert_eq!(out, q(0.5, 1., 1.5, 2.));
    a.scale_by_rational_into(3, 2, &mut out);
    assert_eq!(out, q(1.5, 3., 4.5, 6.));
    a.scale_by_high_prec_into(&"0.25".parse::<HighPrec>().unwrap(), &mut out);
    assert_close!(out, q(0.25, 0.5, 0.75, 1.));
    a.scale_into(&Quaternion::unit_i(), &mut out);
    assert_eq!(out, &Quaternion::unit_i() * &a);
}

#[test]
fn test_aliased_update() {
    let mut a = q(1., 2., 3., 4.);
    let b = q(5., 6., 7., 8.);
    a *= &b;
    assert_eq!(a, q(-60., 12., 30., 24.));
    let mut c = q(1., 2., 3., 4.);
    let c_copy = c.clone();
    c *= c_copy;
    assert_eq!(c, q(1., 2., 3., 4.).power(2));
}

#[test]
fn test_in_place_forms_at_high_precision() {
    let a: Quaternion<HighPrec<40>> = "{1,2,3,4}".parse().unwrap();
    let b: Quaternion<HighPrec<40>> = "{5,6,7,8}".parse().unwrap();
    let mut out = a.clone();
    out *= &b;
    assert_eq!(out.to_string(), "{-60,12,30,24}");
    out /= &b;
    assert_close!(out, a);
    out += &b;
    out -= &a;
    assert_close!(out, b);
    let square = out.clone();
    out *= square;
    assert_close!(out, b.power(2));

    let mut conjugate = Quaternion::zero();
    a.conjugate_into(&mut conjugate);
    assert_eq!(conjugate.to_string(), "{1,-2,-3,-4}");
}

#[test]
fn test_high_precision_kernel() {
    let a: Quaternion<HighPrec<40>> = "{0.5,-1,0.25,2}".parse().unwrap();
    assert_close!(&a * &a.invert(), Quaternion::unity());
    assert_close!(a.ln().exp(), a);
    let (s, c) = a.sin_and_cos();
    assert_close!(&(&s * &s) + &(&c * &c), Quaternion::unity());
}

#[test]
fn test_f32_kernel() {
    let a = Quaternion::<f32>::new(0.5, -1., 0.25, 2.);
    assert_close!(&a * &a.invert(), Quaternion::unity());
    assert_close!(a.ln().exp(), a);
    assert_close!(a.norm(), 2.3048861);
}

#[test]
fn test_determinant_multiplicative_for_real_entries() {
    let a: Matrix<f64> = "[[2, 1, 0, 1], [1, 3, 1, 0], [0, 1, 4, 1], [1, 0, 1, 5]]"
        .parse()
        .unwrap();
    let b: Matrix<f64> = "[[1, 2, 0, 0], [0, 1, 2, 0], [3, 0, 1, 0], [0, 0, 1, 2]]"
        .parse()
        .unwrap();
    let mut ab = Matrix::new(0, 0);
    a.multiply(&b, &mut ab).unwrap();
    let det_a = a.det().unwrap();
    let det_b = b.det().unwrap();
    assert_close!(ab.det().unwrap(), &det_a * &det_b);

    let small_a: Matrix<f64> = "[[2, 1, 0], [1, 3, 1], [0, 1, 4]]".parse().unwrap();
    let small_b: Matrix<f64> = "[[1, 2, 0], [0, 1, 2], [3, 0, 1]]".parse().unwrap();
    small_a.multiply(&small_b, &mut ab).unwrap();
    assert_close!(
        ab.det().unwrap(),
        &small_a.det().unwrap() * &small_b.det().unwrap()
    );
}

#[test]
fn test_matrix_exp_log() {
    let a: Matrix<f64> = "[[0.1, 0.05], [0, -0.1]]".parse().unwrap();
    let mut e = Matrix::new(0, 0);
    a.exp(&mut e).unwrap();
    let mut back = Matrix::new(0, 0);
    e.log(&mut back).unwrap();
    // Eight terms about the identity leave an error of order 0.1⁹
    assert!(back.within(&1e-8, &a));
}

#[test]
fn test_unity_contracts_to_dimension() {
    for dimension in 1..5 {
        let u = CartesianTensor::<f64>::unity(2, dimension);
        let mut out = CartesianTensor::new(0, 0);
        u.contract(0, 1, &mut out).unwrap();
        assert_eq!(out.rank(), 0);
        assert_eq!(
            out.get(&[]).unwrap(),
            Quaternion::from_real(dimension as f64)
        );
    }
}

#[test]
fn test_contraction_rank_law() {
    let a = CartesianTensor::<f64>::unity(4, 3);
    let mut out = CartesianTensor::new(0, 0);
    for (i, j) in [(0, 1), (1, 3), (3, 0), (2, 1)] {
        a.contract(i, j, &mut out).unwrap();
        assert_eq!(out.rank(), 2);
        assert_eq!(out.dimension(), 3);
    }
    // δ_abcd contracted over any pair is δ_ab
    assert_eq!(out, CartesianTensor::unity(2, 3));
}
