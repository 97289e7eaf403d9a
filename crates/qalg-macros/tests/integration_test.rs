use core::ops::{Add, Mul, Sub};
use qalg_macros::cayley_dickson;

#[derive(Clone, Debug, PartialEq)]
struct Complex<T> {
    re: T,
    im: T,
}

cayley_dickson! {
    impl<T: Clone + Add<Output = T> + Sub<Output = T> + Mul<Output = T>> Complex<T> {
        fn product(re, im);
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Quat {
    w: i64,
    x: i64,
    y: i64,
    z: i64,
}

cayley_dickson! {
    impl Quat {
        pub fn product(w, x, y, z);
    }
}

#[test]
fn test_complex() {
    let a = Complex { re: 1, im: 2 };
    let b = Complex { re: 3, im: 4 };
    assert_eq!(Complex::product(&a, &b), Complex { re: -5, im: 10 });
}

#[test]
fn test_hamilton() {
    let a = Quat {
        w: 1,
        x: 2,
        y: 3,
        z: 4,
    };
    let b = Quat {
        w: 5,
        x: 6,
        y: 7,
        z: 8,
    };
    assert_eq!(
        Quat::product(&a, &b),
        Quat {
            w: -60,
            x: 12,
            y: 30,
            z: 24
        }
    );
}
