//! Ionospheric grid: IGP bands and vertical delay interpolation
mod band;
mod interp;

pub use band::{
    band_coordinates, band_size, igp_coordinates, is_valid_band, locate_igp,
    normalize_longitude, GridPosition, IgpLocation, MAX_IGPS_PER_BAND,
};

pub use interp::{
    interpolate, interpolate_grid, interpolation_weights, square_or_triangle, Corner,
    GridCell, GridInterpolation, GridSource, IgpSample, InterpolationMode,
};
