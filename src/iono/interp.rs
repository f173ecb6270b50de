use itertools::Itertools;
use log::debug;

use crate::{
    error::Unavailable,
    iono::band::{
        normalize_longitude, REGULAR_85N_ORIGIN_DEG, REGULAR_85S_ORIGIN_DEG,
        REGULAR_85_SPACING_DEG,
    },
};

/// IGP at one corner of the interpolation cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// IGP1
    NorthEast,
    /// IGP2
    NorthWest,
    /// IGP3
    SouthWest,
    /// IGP4
    SouthEast,
}

impl Corner {
    pub const ALL: [Self; 4] = [
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthWest,
        Self::SouthEast,
    ];

    /// 1 based IGP number within the cell
    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::NorthEast => 0,
            Self::NorthWest => 1,
            Self::SouthWest => 2,
            Self::SouthEast => 3,
        }
    }
}

impl std::fmt::Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "IGP{}", self.number())
    }
}

/// Interpolation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Four IGPs
    Square,
    /// Three IGPs, this corner is missing
    Triangle(Corner),
}

/// Vertical delay and variance of one IGP
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IgpSample {
    /// Vertical delay (m)
    pub vertical_delay_m: f64,
    /// σ² (m²), already degraded
    pub variance_m2: f64,
}

impl IgpSample {
    pub fn new(vertical_delay_m: f64, variance_m2: f64) -> Self {
        Self {
            vertical_delay_m,
            variance_m2,
        }
    }
}

/// Provides the live IGP values the interpolation relies on
pub trait GridSource {
    /// Live value of the IGP at this coordinate, if any
    fn igp_sample(&self, lat_deg: f64, lon_deg: f64) -> Option<IgpSample>;
}

impl<F: Fn(f64, f64) -> Option<IgpSample>> GridSource for F {
    fn igp_sample(&self, lat_deg: f64, lon_deg: f64) -> Option<IgpSample> {
        self(lat_deg, lon_deg)
    }
}

/// Interpolation cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// (latitude, longitude) of IGP1 to IGP4, in degrees
    pub corners: [(f64, f64); 4],
    /// Normalized longitude (planar) or warped longitude (polar) coordinate
    pub x: f64,
    /// Normalized latitude coordinate
    pub y: f64,
}

/// Interpolated vertical delay at the pierce point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridInterpolation {
    pub mode: InterpolationMode,
    pub cell: GridCell,
    /// Weight of IGP1 to IGP4 (0 for the missing corner)
    pub weights: [f64; 4],
    /// Vertical delay (m)
    pub vertical_delay_m: f64,
    /// σ²(UIVE) in m²
    pub variance_m2: f64,
}

/// Selects the interpolation scheme from the corners availability
pub fn square_or_triangle(available: [bool; 4]) -> Result<InterpolationMode, Unavailable> {
    let missing = Corner::ALL
        .iter()
        .filter(|corner| !available[corner.index()])
        .collect::<Vec<_>>();

    match missing.as_slice() {
        [] => Ok(InterpolationMode::Square),
        [corner] => Ok(InterpolationMode::Triangle(**corner)),
        _ => Err(Unavailable::InsufficientIgps),
    }
}

/// Weights of IGP1 to IGP4 at normalized coordinates (x, y).
/// In triangle mode, the missing corner weight is folded into its neighbors;
/// a negative weight means the point lies outside the triangle.
pub fn interpolation_weights(
    mode: InterpolationMode,
    x: f64,
    y: f64,
) -> Result<[f64; 4], Unavailable> {
    let weights = match mode {
        InterpolationMode::Square => [
            x * y,
            (1.0 - x) * y,
            (1.0 - x) * (1.0 - y),
            x * (1.0 - y),
        ],
        InterpolationMode::Triangle(Corner::NorthEast) => [0.0, y, 1.0 - x - y, x],
        InterpolationMode::Triangle(Corner::NorthWest) => [y, 0.0, 1.0 - x, x - y],
        InterpolationMode::Triangle(Corner::SouthWest) => [x + y - 1.0, 1.0 - x, 0.0, 1.0 - y],
        InterpolationMode::Triangle(Corner::SouthEast) => [x, y - x, 1.0 - y, 0.0],
    };

    if weights.iter().any(|w| *w < 0.0) {
        Err(Unavailable::OutsideTriangle)
    } else {
        Ok(weights)
    }
}

/// Interpolates the corner samples of this cell
pub fn interpolate(
    cell: GridCell,
    samples: [Option<IgpSample>; 4],
) -> Result<GridInterpolation, Unavailable> {
    let mode = square_or_triangle(samples.map(|s| s.is_some()))?;
    let weights = interpolation_weights(mode, cell.x, cell.y)?;

    let (vertical_delay_m, variance_m2) = samples
        .iter()
        .zip(weights.iter())
        .filter_map(|(sample, w)| sample.map(|s| (s, *w)))
        .fold((0.0, 0.0), |(delay, var), (s, w)| {
            (delay + w * s.vertical_delay_m, var + w * s.variance_m2)
        });

    Ok(GridInterpolation {
        mode,
        cell,
        weights,
        vertical_delay_m,
        variance_m2,
    })
}

/// Planar cell candidate
#[derive(Debug, Clone, Copy)]
struct CellSpacing {
    dlat: f64,
    dlon: f64,
    /// Latitude of one row of this raster
    lat_origin: f64,
    /// 85° corners are interpolated from the 90° spaced IGPs
    virtual_85: bool,
}

impl CellSpacing {
    const SQUARE_5: Self = Self {
        dlat: 5.0,
        dlon: 5.0,
        lat_origin: 0.0,
        virtual_85: false,
    };

    const RECT_5X10: Self = Self {
        dlat: 5.0,
        dlon: 10.0,
        lat_origin: 0.0,
        virtual_85: false,
    };

    const SQUARE_10: Self = Self {
        dlat: 10.0,
        dlon: 10.0,
        lat_origin: 5.0,
        virtual_85: false,
    };

    const SQUARE_10_VIRTUAL_85: Self = Self {
        dlat: 10.0,
        dlon: 10.0,
        lat_origin: 5.0,
        virtual_85: true,
    };

    /// Cell candidates, by order of preference
    fn candidates(lat_deg: f64) -> Vec<Self> {
        let abs_lat = lat_deg.abs();
        if abs_lat <= 60.0 {
            vec![Self::SQUARE_5, Self::SQUARE_10]
        } else if abs_lat <= 75.0 {
            vec![Self::RECT_5X10, Self::SQUARE_10]
        } else {
            vec![Self::SQUARE_10_VIRTUAL_85]
        }
    }

    /// Cell holding this point, such as lat1 < lat <= lat2
    /// and lon1 <= lon < lon2.
    fn cell(&self, lat_deg: f64, lon_deg: f64) -> GridCell {
        let mut lat2 =
            self.lat_origin + ((lat_deg - self.lat_origin) / self.dlat).ceil() * self.dlat;
        let mut lat1 = lat2 - self.dlat;

        // southmost row
        if lat1 < -85.0 {
            lat1 += self.dlat;
            lat2 += self.dlat;
        }

        let lon = normalize_longitude(lon_deg);
        let lon1 = (lon / self.dlon).floor() * self.dlon;
        let lon2 = lon1 + self.dlon;

        GridCell {
            corners: [
                (lat2, normalize_longitude(lon2)),
                (lat2, normalize_longitude(lon1)),
                (lat1, normalize_longitude(lon1)),
                (lat1, normalize_longitude(lon2)),
            ],
            x: (lon - lon1) / self.dlon,
            y: (lat_deg - lat1) / self.dlat,
        }
    }
}

/// 85° IGP value, linearly interpolated from the surrounding
/// 90° spaced IGPs of the regular bands.
fn virtual_85_sample<G: GridSource>(grid: &G, lat_deg: f64, lon_deg: f64) -> Option<IgpSample> {
    let origin = if lat_deg > 0.0 {
        REGULAR_85N_ORIGIN_DEG
    } else {
        REGULAR_85S_ORIGIN_DEG
    };

    let offset = (lon_deg - origin).rem_euclid(360.0);
    let west = origin + (offset / REGULAR_85_SPACING_DEG).floor() * REGULAR_85_SPACING_DEG;
    let fraction = (offset - (west - origin)) / REGULAR_85_SPACING_DEG;

    let west_sample = grid.igp_sample(lat_deg, normalize_longitude(west))?;

    if fraction == 0.0 {
        return Some(west_sample);
    }

    let east = normalize_longitude(west + REGULAR_85_SPACING_DEG);
    let east_sample = grid.igp_sample(lat_deg, east)?;

    Some(IgpSample {
        vertical_delay_m: (1.0 - fraction) * west_sample.vertical_delay_m
            + fraction * east_sample.vertical_delay_m,
        variance_m2: (1.0 - fraction) * west_sample.variance_m2
            + fraction * east_sample.variance_m2,
    })
}

/// Polar cell (|latitude| > 85°): the four 85° IGPs,
/// starting with the nearest one to the west (IGP3).
fn polar_cell(lat_deg: f64, lon_deg: f64) -> GridCell {
    let (origin, row) = if lat_deg > 0.0 {
        (REGULAR_85N_ORIGIN_DEG, 85.0)
    } else {
        (REGULAR_85S_ORIGIN_DEG, -85.0)
    };

    let offset = (lon_deg - origin).rem_euclid(360.0);
    let lon1 = origin + (offset / REGULAR_85_SPACING_DEG).floor() * REGULAR_85_SPACING_DEG;

    let y = (lat_deg.abs() - 85.0) / 10.0;
    let x = (offset - (lon1 - origin)) / REGULAR_85_SPACING_DEG * (1.0 - 2.0 * y) + y;

    GridCell {
        corners: [
            (row, normalize_longitude(lon1 + 180.0)),
            (row, normalize_longitude(lon1 + 270.0)),
            (row, normalize_longitude(lon1)),
            (row, normalize_longitude(lon1 + REGULAR_85_SPACING_DEG)),
        ],
        x,
        y,
    }
}

/// Interpolates the vertical delay at this pierce point
pub fn interpolate_grid<G: GridSource>(
    grid: &G,
    lat_deg: f64,
    lon_deg: f64,
) -> Result<GridInterpolation, Unavailable> {
    if lat_deg.abs() > 85.0 {
        let cell = polar_cell(lat_deg, lon_deg);
        let samples = cell.corners.map(|(lat, lon)| grid.igp_sample(lat, lon));

        if samples.iter().any(|s| s.is_none()) {
            return Err(Unavailable::InsufficientIgps);
        }

        return interpolate(cell, samples);
    }

    let mut outside_triangle = false;

    for spacing in CellSpacing::candidates(lat_deg) {
        let cell = spacing.cell(lat_deg, lon_deg);

        let samples = cell.corners.map(|(lat, lon)| {
            if spacing.virtual_85 && lat.abs() == 85.0 {
                virtual_85_sample(grid, lat, lon)
            } else {
                grid.igp_sample(lat, lon)
            }
        });

        match interpolate(cell, samples) {
            Ok(interpolation) => return Ok(interpolation),
            Err(e) => {
                debug!(
                    "({:.3}°, {:.3}°) - {}x{} cell [{}] rejected: {}",
                    lat_deg,
                    lon_deg,
                    spacing.dlat,
                    spacing.dlon,
                    cell.corners
                        .iter()
                        .map(|(lat, lon)| format!("({}, {})", lat, lon))
                        .join(", "),
                    e
                );
                outside_triangle |= e == Unavailable::OutsideTriangle;
            },
        }
    }

    if outside_triangle {
        Err(Unavailable::OutsideTriangle)
    } else {
        Err(Unavailable::InsufficientIgps)
    }
}
