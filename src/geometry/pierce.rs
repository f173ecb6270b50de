use std::f64::consts::{FRAC_PI_2, PI};

use crate::{
    constants::SBAS_EARTH_RADIUS_M,
    error::Unavailable,
    geometry::{azimuth_elevation, ecef_to_geodetic},
    iono::normalize_longitude,
    prelude::Vector3,
};

/// Ionospheric Pierce Point: intersection of the line of sight
/// with the ionospheric thin shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiercePoint {
    /// Latitude (°)
    pub lat_deg: f64,
    /// Longitude (°), within ]-180°, 180°]
    pub lon_deg: f64,
    /// Obliquity factor Fpp, converting vertical delays to slant delays
    pub obliquity: f64,
    /// Satellite elevation (°)
    pub elevation_deg: f64,
    /// Satellite azimuth (°)
    pub azimuth_deg: f64,
}

impl PiercePoint {
    /// Computes the [PiercePoint] of the line of sight defined by the satellite
    /// elevation and azimuth (°), for a receiver located at `rx_lat_deg`,
    /// `rx_lon_deg`, through a shell located `shell_height_m` above the surface.
    pub fn new(
        rx_lat_deg: f64,
        rx_lon_deg: f64,
        elevation_deg: f64,
        azimuth_deg: f64,
        shell_height_m: f64,
    ) -> Result<Self, Unavailable> {
        if elevation_deg < 0.0 {
            return Err(Unavailable::BelowHorizon);
        }

        let (phi_u, lambda_u) = (rx_lat_deg.to_radians(), rx_lon_deg.to_radians());
        let (elev, azim) = (elevation_deg.to_radians(), azimuth_deg.to_radians());

        let fract = SBAS_EARTH_RADIUS_M / (SBAS_EARTH_RADIUS_M + shell_height_m);

        let psi = FRAC_PI_2 - elev - (fract * elev.cos()).asin();

        let phi_pp = (phi_u.sin() * psi.cos() + phi_u.cos() * psi.sin() * azim.cos()).asin();

        let arc = (psi.sin() * azim.sin() / phi_pp.cos()).clamp(-1.0, 1.0).asin();

        let crosses_pole = (rx_lat_deg > 70.0
            && psi.tan() * azim.cos() > (FRAC_PI_2 - phi_u).tan())
            || (rx_lat_deg < -70.0 && -psi.tan() * azim.cos() > (FRAC_PI_2 + phi_u).tan());

        let lambda_pp = if crosses_pole {
            lambda_u + PI - arc
        } else {
            lambda_u + arc
        };

        let obliquity = (1.0 - (fract * elev.cos()).powi(2)).sqrt().recip();

        Ok(Self {
            lat_deg: phi_pp.to_degrees(),
            lon_deg: normalize_longitude(lambda_pp.to_degrees()),
            obliquity,
            elevation_deg,
            azimuth_deg,
        })
    }

    /// Computes the [PiercePoint] from the receiver and satellite ECEF positions (m)
    pub fn from_ecef(
        rx_ecef_m: &Vector3<f64>,
        sv_ecef_m: &Vector3<f64>,
        shell_height_m: f64,
    ) -> Result<Self, Unavailable> {
        let rx = ecef_to_geodetic(rx_ecef_m);
        let (azimuth_deg, elevation_deg) = azimuth_elevation(rx_ecef_m, sv_ecef_m);
        Self::new(rx[0], rx[1], elevation_deg, azimuth_deg, shell_height_m)
    }

    /// Converts a vertical delay (m) to a slant delay (m)
    pub fn slant_delay_m(&self, vertical_delay_m: f64) -> f64 {
        self.obliquity * vertical_delay_m
    }

    /// Converts a vertical delay variance (m²) to a slant delay variance (m²)
    pub fn slant_variance_m2(&self, vertical_variance_m2: f64) -> f64 {
        self.obliquity.powi(2) * vertical_variance_m2
    }
}

#[cfg(test)]
mod test {
    use super::PiercePoint;
    use crate::{
        constants::{EARTH_SEMI_MAJOR_AXIS_WGS84_M, SBAS_IONO_SHELL_HEIGHT_M},
        error::Unavailable,
        prelude::Vector3,
    };

    #[test]
    fn zenith_pierce_point() {
        let pp = PiercePoint::new(43.6, 1.44, 90.0, 0.0, SBAS_IONO_SHELL_HEIGHT_M).unwrap();
        assert!((pp.lat_deg - 43.6).abs() < 1E-9);
        assert!((pp.lon_deg - 1.44).abs() < 1E-9);
        assert!((pp.obliquity - 1.0).abs() < 1E-9);
        assert_eq!(pp.slant_delay_m(2.0), pp.obliquity * 2.0);
    }

    #[test]
    fn low_elevation_pierce_point() {
        // looking north: longitude is preserved
        let pp = PiercePoint::new(0.0, 10.0, 10.0, 0.0, SBAS_IONO_SHELL_HEIGHT_M).unwrap();
        assert!(pp.lat_deg > 5.0 && pp.lat_deg < 20.0, "{:?}", pp);
        assert!((pp.lon_deg - 10.0).abs() < 1E-9);
        assert!(pp.obliquity > 2.5 && pp.obliquity < 3.5, "{:?}", pp);
        assert!(pp.slant_variance_m2(1.0) > pp.slant_delay_m(1.0));

        // looking west, across the antimeridian
        let pp = PiercePoint::new(0.0, -179.0, 10.0, 270.0, SBAS_IONO_SHELL_HEIGHT_M).unwrap();
        assert!(pp.lon_deg > 0.0 && pp.lon_deg < 180.0, "{:?}", pp);
        assert!(pp.lat_deg.abs() < 1E-9);

        assert_eq!(
            PiercePoint::new(0.0, 0.0, -1.0, 0.0, SBAS_IONO_SHELL_HEIGHT_M),
            Err(Unavailable::BelowHorizon)
        );
    }

    #[test]
    fn polar_pierce_point() {
        // looking north from close to the pole, across it
        let pp = PiercePoint::new(89.0, 0.0, 30.0, 0.0, SBAS_IONO_SHELL_HEIGHT_M).unwrap();
        assert!(pp.lat_deg > 80.0);
        assert!((pp.lon_deg - 180.0).abs() < 1E-6, "{:?}", pp);
    }

    #[test]
    fn ecef_pierce_point() {
        let rx = Vector3::new(EARTH_SEMI_MAJOR_AXIS_WGS84_M, 0.0, 0.0);
        let sv = Vector3::new(26_000_000.0, 0.0, 0.0);

        let pp = PiercePoint::from_ecef(&rx, &sv, SBAS_IONO_SHELL_HEIGHT_M).unwrap();
        assert!((pp.elevation_deg - 90.0).abs() < 1E-6);
        assert!(pp.lat_deg.abs() < 1E-3);
        assert!(pp.lon_deg.abs() < 1E-3);
        assert!((pp.obliquity - 1.0).abs() < 1E-6);

        let sv = Vector3::new(-26_000_000.0, 0.0, 0.0);
        assert_eq!(
            PiercePoint::from_ecef(&rx, &sv, SBAS_IONO_SHELL_HEIGHT_M),
            Err(Unavailable::BelowHorizon)
        );
    }
}
