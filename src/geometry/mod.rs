//! Receiver and satellite geometry
use map_3d::{ecef2geodetic, Ellipsoid};

use crate::prelude::Vector3;

mod pierce;
mod region;

pub use pierce::PiercePoint;
pub use region::RegionMembership;

/// Converts ECEF coordinates (m) to geodetic
/// (latitude in degrees, longitude in degrees, altitude in meters)
pub fn ecef_to_geodetic(ecef_m: &Vector3<f64>) -> Vector3<f64> {
    let (lat_rad, lon_rad, alt_m) =
        ecef2geodetic(ecef_m[0], ecef_m[1], ecef_m[2], Ellipsoid::WGS84);
    Vector3::new(lat_rad.to_degrees(), lon_rad.to_degrees(), alt_m)
}

/// Unit line of sight vector, from the receiver to the satellite (ECEF)
pub fn line_of_sight(rx_ecef_m: &Vector3<f64>, sv_ecef_m: &Vector3<f64>) -> Vector3<f64> {
    (sv_ecef_m - rx_ecef_m).normalize()
}

/// Satellite (azimuth, elevation) in degrees, as seen from the receiver.
/// Azimuth is counted clockwise from north, within [0, 360[.
pub fn azimuth_elevation(rx_ecef_m: &Vector3<f64>, sv_ecef_m: &Vector3<f64>) -> (f64, f64) {
    let geodetic = ecef_to_geodetic(rx_ecef_m);
    let (lat, lon) = (geodetic[0].to_radians(), geodetic[1].to_radians());

    let los = line_of_sight(rx_ecef_m, sv_ecef_m);

    let east = Vector3::new(-lon.sin(), lon.cos(), 0.0);
    let north = Vector3::new(-lat.sin() * lon.cos(), -lat.sin() * lon.sin(), lat.cos());
    let up = Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin());

    let (e, n, u) = (los.dot(&east), los.dot(&north), los.dot(&up));

    let elevation = u.clamp(-1.0, 1.0).asin().to_degrees();
    let azimuth = e.atan2(n).to_degrees().rem_euclid(360.0);

    (azimuth, elevation)
}
