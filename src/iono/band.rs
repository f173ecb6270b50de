//! Ionospheric Grid Point (IGP) bands.
//!
//! Bands 0 to 8 cover 40° of longitude each, from 180°W eastwards.
//! Their IGPs are numbered column by column, south to north. Bands 9 (north)
//! and 10 (south) cover the 60° to 85° latitude rings, numbered ring by ring.
use crate::constants::NUM_IGP_BANDS;

/// Number of IGPs a band may designate, at most
pub const MAX_IGPS_PER_BAND: usize = 201;

/// Longitude spacing between the 85° IGPs of the regular bands
pub const REGULAR_85_SPACING_DEG: f64 = 90.0;

/// Westmost 85°N IGP of the regular bands
pub const REGULAR_85N_ORIGIN_DEG: f64 = -180.0;

/// Westmost 85°S IGP of the regular bands
pub const REGULAR_85S_ORIGIN_DEG: f64 = -140.0;

/// IGP within its band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IgpLocation {
    /// Band (0..=10)
    pub band: u8,
    /// 1 based IGP number within the band
    pub igp: u8,
}

/// Every band designation of one grid coordinate. Coordinates of the
/// 60°-85° rings may be designated by a regular band and a polar band.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Regular band (0..=8) designation
    pub regular: Option<IgpLocation>,
    /// Polar band (9 or 10) designation
    pub polar: Option<IgpLocation>,
}

impl GridPosition {
    /// True if this coordinate is not a grid point
    pub fn is_none(&self) -> bool {
        self.regular.is_none() && self.polar.is_none()
    }

    /// Designations, regular band first
    pub fn locations(&self) -> impl Iterator<Item = IgpLocation> {
        self.regular.into_iter().chain(self.polar)
    }
}

/// Wraps a longitude into ]-180°, 180°]
pub fn normalize_longitude(lon_deg: f64) -> f64 {
    let lon = lon_deg.rem_euclid(360.0);
    if lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

/// Wraps a longitude into [-180°, 180°[
fn western_longitude(lon_deg: f64) -> f64 {
    let lon = normalize_longitude(lon_deg);
    if lon == 180.0 {
        -180.0
    } else {
        lon
    }
}

fn same_coordinate(a: f64, b: f64) -> bool {
    (a - b).abs() < 1.0E-6
}

/// Latitudes of one regular band column, south to north
fn regular_column(lon_deg: f64) -> Vec<f64> {
    let lon = lon_deg as i32;
    if lon.rem_euclid(10) != 0 {
        return (-11..=11).map(|k| k as f64 * 5.0).collect();
    }

    let mut lats = Vec::with_capacity(28);

    if (lon + 140).rem_euclid(90) == 0 {
        lats.push(-85.0);
    }

    lats.push(-75.0);
    lats.push(-65.0);
    lats.extend((-11..=11).map(|k| k as f64 * 5.0));
    lats.push(65.0);
    lats.push(75.0);

    if (lon + 180).rem_euclid(90) == 0 {
        lats.push(85.0);
    }

    lats
}

/// Ring of a polar band: (|latitude|, first longitude, spacing)
fn polar_rings(band: u8) -> [(f64, f64, f64); 5] {
    let origin = if band == 9 { -180.0 } else { -170.0 };
    [
        (60.0, -180.0, 5.0),
        (65.0, origin, 10.0),
        (70.0, origin, 10.0),
        (75.0, origin, 10.0),
        (85.0, origin, 30.0),
    ]
}

/// Coordinates (latitude, longitude in ]-180°, 180°]) of every IGP
/// of this band, in IGP number order. Empty for invalid bands.
pub fn band_coordinates(band: u8) -> Vec<(f64, f64)> {
    match band {
        0..=8 => {
            let west = -180.0 + 40.0 * band as f64;
            (0..8)
                .flat_map(|col| {
                    let lon = west + 5.0 * col as f64;
                    regular_column(lon)
                        .into_iter()
                        .map(move |lat| (lat, normalize_longitude(lon)))
                })
                .collect()
        },
        9 | 10 => {
            let sign = if band == 9 { 1.0 } else { -1.0 };
            polar_rings(band)
                .into_iter()
                .flat_map(|(lat, origin, spacing)| {
                    let count = (360.0 / spacing) as usize;
                    (0..count).map(move |k| {
                        (
                            sign * lat,
                            normalize_longitude(origin + spacing * k as f64),
                        )
                    })
                })
                .collect()
        },
        _ => Vec::new(),
    }
}

/// Coordinates of this IGP (1 based number) within this band
pub fn igp_coordinates(band: u8, igp: u8) -> Option<(f64, f64)> {
    if igp == 0 {
        return None;
    }
    band_coordinates(band).get(igp as usize - 1).copied()
}

/// Number of IGPs defined in this band
pub fn band_size(band: u8) -> usize {
    band_coordinates(band).len()
}

fn find_in_band(band: u8, lat_deg: f64, lon_deg: f64) -> Option<IgpLocation> {
    let lon = normalize_longitude(lon_deg);
    band_coordinates(band)
        .iter()
        .position(|(lat, l)| same_coordinate(*lat, lat_deg) && same_coordinate(*l, lon))
        .map(|index| IgpLocation {
            band,
            igp: (index + 1) as u8,
        })
}

/// Locates the grid point at this coordinate.
/// Coordinates off the grid raster return [GridPosition::is_none].
/// No band holds a grid point beyond 85° of latitude: the polar bands stop
/// at the 85° ring, so these coordinates return [GridPosition::is_none] too.
/// Polar interpolation reads the 85° ring instead.
pub fn locate_igp(lat_deg: f64, lon_deg: f64) -> GridPosition {
    let mut position = GridPosition::default();

    if lat_deg.abs() > 85.0 {
        return position;
    }

    let lon = western_longitude(lon_deg);
    let band = ((lon + 180.0) / 40.0).floor().clamp(0.0, 8.0) as u8;

    position.regular = find_in_band(band, lat_deg, lon);

    if lat_deg.abs() >= 60.0 {
        let polar = if lat_deg > 0.0 { 9 } else { 10 };
        position.polar = find_in_band(polar, lat_deg, lon);
    }

    position
}

/// True for valid band numbers
pub fn is_valid_band(band: u8) -> bool {
    (band as usize) < NUM_IGP_BANDS
}
