//! qalg demo: a tour of the quaternion kernel and the containers built on it

use log::info;
use qalg::error::AlgebraError;
use qalg::high_prec::HighPrec;
use qalg::matrix::Matrix;
use qalg::ops::*;
use qalg::quaternion::Quaternion;
use qalg::rmodule::RModule;
use qalg::tensor::CartesianTensor;

/// Rotate the pure quaternion `v` by `angle` radians about the unit axis `axis`
fn rotate(v: &Quaternion<f64>, axis: &Quaternion<f64>, angle: f64) -> Quaternion<f64> {
    let half_turn = axis.scale_components(&(angle / 2.));
    let rotor = half_turn.exp();
    &(&rotor * v) * &rotor.conjugate()
}

fn quaternions() -> Result<(), AlgebraError> {
    let a = Quaternion::new(1., 2., 3., 4.);
    let b = Quaternion::new(5., 6., 7., 8.);
    info!("{} · {} = {}", a, b, &a * &b);
    info!("{} · {} = {}", b, a, &b * &a);
    info!("|{}| = {}", a, a.norm());

    let v = Quaternion::unit_i();
    let rotated = rotate(&v, &Quaternion::unit_k(), std::f64::consts::FRAC_PI_2);
    info!("𝐢 rotated a quarter turn about 𝐤: {}", rotated);

    let precise: Quaternion<HighPrec<60>> = "{1,2,3,4}".parse()?;
    info!("ln {} = {}", precise, precise.ln());
    info!("exp(ln {}) = {}", precise, precise.ln().exp());
    Ok(())
}

fn vectors() -> Result<(), AlgebraError> {
    let a: RModule<f64> = "[1, 2, 3]".parse()?;
    let b: RModule<f64> = "[{0,1,0,0}, 0, 1]".parse()?;
    let mut c = RModule::new(0);
    a.cross_product(&b, &mut c)?;
    info!("{} × {} = {}", a, b, c);
    info!("{} · {} = {}", a, b, a.dot_product(&b)?);
    Ok(())
}

fn matrices() -> Result<(), AlgebraError> {
    let a: Matrix<f64> = "[[0, {0,0.5,0,0}], [{0,-0.5,0,0}, 0]]".parse()?;
    let mut out = Matrix::new(0, 0);
    a.exp(&mut out)?;
    info!("exp {} = {}", a, out);
    info!("spectral norm {}", a.spectral_norm());

    let real: Matrix<f64> = "[[4, 1, 0], [1, 3, 1], [0, 1, 2]]".parse()?;
    info!("det {} = {}", real, real.det()?);
    real.invert(&mut out)?;
    info!("inverse {}", out);
    Ok(())
}

fn tensors() -> Result<(), AlgebraError> {
    let delta = CartesianTensor::<f64>::unity(2, 3);
    let mut trace = CartesianTensor::new(0, 0);
    delta.contract(0, 1, &mut trace)?;
    info!("trace of {} = {}", delta, trace);

    let v: CartesianTensor<f64> = "[1, {0,0,1,0}, 2]".parse()?;
    let mut square = CartesianTensor::new(0, 0);
    v.power(2, &mut square)?;
    info!("{} ⊗ {} = {}", v, v, square);
    Ok(())
}

fn main() -> Result<(), AlgebraError> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init(); // Set RUST_LOG=trace to see output reshapes

    quaternions()?;
    vectors()?;
    matrices()?;
    tensors()?;

    let broken = Quaternion::<f64>::zero().invert();
    info!(
        "inverting zero gives {} (nan: {}, infinite: {})",
        broken,
        broken.is_nan(),
        broken.is_infinite()
    );
    Ok(())
}
