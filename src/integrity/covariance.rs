//! Clock and ephemeris covariance (MT28) δUDRE
use nalgebra::{Matrix4, Vector4};

use crate::{message::ClockEphemerisCovariance, prelude::Vector3};

impl ClockEphemerisCovariance {
    /// Scale factor 2^(scale_exponent - 5)
    pub fn scale_factor(&self) -> f64 {
        2.0_f64.powi(self.scale_exponent as i32 - 5)
    }

    /// Scaled upper triangular Cholesky factor R
    pub fn cholesky_factor(&self) -> Matrix4<f64> {
        let [e11, e22, e33, e44, e12, e13, e14, e23, e24, e34] = self.elements;
        #[rustfmt::skip]
        let e = Matrix4::new(
            e11, e12, e13, e14,
            0.0, e22, e23, e24,
            0.0, 0.0, e33, e34,
            0.0, 0.0, 0.0, e44,
        );
        e * self.scale_factor()
    }

    /// Covariance matrix C = RᵀR
    pub fn covariance(&self) -> Matrix4<f64> {
        let r = self.cholesky_factor();
        r.transpose() * r
    }

    /// Location specific δUDRE, for this line of sight
    /// (unit vector pointing from the user to the satellite).
    pub fn delta_udre(&self, line_of_sight: &Vector3<f64>, c_covariance_m: f64) -> f64 {
        let los = line_of_sight.normalize();
        let i = Vector4::new(los[0], los[1], los[2], 1.0);
        let quadratic = (i.transpose() * self.covariance() * i)[(0, 0)];
        quadratic.max(0.0).sqrt() + c_covariance_m * self.scale_factor()
    }
}
