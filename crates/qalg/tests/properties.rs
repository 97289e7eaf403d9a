//! Algebraic identities checked over random inputs

use proptest::prelude::*;
use qalg::matrix::Matrix;
use qalg::ops::*;
use qalg::quaternion::Quaternion;
use qalg::rmodule::RModule;
use qalg::tensor::CartesianTensor;

fn component() -> impl Strategy<Value = f64> {
    -10.0f64..10.0
}

fn quaternion() -> impl Strategy<Value = Quaternion<f64>> {
    (component(), component(), component(), component())
        .prop_map(|(r, i, j, k)| Quaternion::new(r, i, j, k))
}

fn nonzero_quaternion() -> impl Strategy<Value = Quaternion<f64>> {
    quaternion().prop_filter("too close to zero", |q| q.norm() > 1e-3)
}

fn real_vector(len: usize) -> impl Strategy<Value = RModule<f64>> {
    prop::collection::vec(component(), len)
        .prop_map(|v| RModule::from_elements(v.into_iter().map(Quaternion::from_real).collect()))
}

fn real_matrix(n: usize) -> impl Strategy<Value = Matrix<f64>> {
    prop::collection::vec(component(), n * n).prop_map(move |v| {
        Matrix::from_elements(n, n, v.into_iter().map(Quaternion::from_real).collect()).unwrap()
    })
}

fn close(a: &Quaternion<f64>, b: &Quaternion<f64>, scale: f64) -> bool {
    a.within(&(1e-9 * (1. + scale)), b)
}

proptest! {
    #[test]
    fn test_conjugate_gives_squared_norm(a in quaternion()) {
        let n = a.norm();
        prop_assert!(close(&(&a * &a.conjugate()), &Quaternion::from_real(n * n), n * n));
    }

    #[test]
    fn test_multiplication_associative(a in quaternion(), b in quaternion(), c in quaternion()) {
        let scale = a.norm() * b.norm() * c.norm();
        prop_assert!(close(&(&(&a * &b) * &c), &(&a * &(&b * &c)), scale));
    }

    #[test]
    fn test_norm_multiplicative(a in quaternion(), b in quaternion()) {
        let lhs = (&a * &b).norm();
        let rhs = a.norm() * b.norm();
        prop_assert!((lhs - rhs).abs() <= 1e-9 * (1. + rhs));
    }

    #[test]
    fn test_invert_round_trip(a in nonzero_quaternion()) {
        prop_assert!(close(&(&a * &a.invert()), &Quaternion::unity(), 1e3));
        prop_assert!(close(&(&a.invert() * &a), &Quaternion::unity(), 1e3));
    }

    #[test]
    fn test_exp_ln_round_trip(a in nonzero_quaternion()) {
        prop_assert!(close(&a.ln().exp(), &a, a.norm() * 1e3));
    }

    #[test]
    fn test_cross_product_orthogonal(a in real_vector(3), b in real_vector(3)) {
        let mut c = RModule::new(0);
        a.cross_product(&b, &mut c).unwrap();
        let scale = a.norm() * a.norm() * b.norm();
        prop_assert!(close(&a.dot_product(&c).unwrap(), &Quaternion::zero(), scale));
        prop_assert!(close(&b.dot_product(&c).unwrap(), &Quaternion::zero(), scale));
    }

    #[test]
    fn test_determinant_multiplicative(a in real_matrix(4), b in real_matrix(4)) {
        let mut ab = Matrix::new(0, 0);
        a.multiply(&b, &mut ab).unwrap();
        let lhs = ab.det().unwrap();
        let rhs = &a.det().unwrap() * &b.det().unwrap();
        let scale = a.norm().powi(4) * b.norm().powi(4);
        prop_assert!(close(&lhs, &rhs, scale));
    }

    #[test]
    fn test_contraction_lowers_rank_by_two(rank in 2usize..5, dimension in 1usize..4, seed in component()) {
        let mut t = CartesianTensor::<f64>::new(rank, dimension);
        for n in 0..dimension.pow(rank as u32) {
            let mut index = vec![0; rank];
            let mut rest = n;
            for axis in (0..rank).rev() {
                index[axis] = rest % dimension;
                rest /= dimension;
            }
            t.set(&index, &Quaternion::from_real(seed + n as f64)).unwrap();
        }
        let mut out = CartesianTensor::new(0, 0);
        t.contract(0, rank - 1, &mut out).unwrap();
        prop_assert_eq!(out.rank(), rank - 2);
        prop_assert_eq!(out.dimension(), dimension);
    }
}
