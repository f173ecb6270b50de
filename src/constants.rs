/// WGS84 Earth Frame Ellipsoid semi-major axis (m)
pub const EARTH_SEMI_MAJOR_AXIS_WGS84_M: f64 = 6378137.0_f64;

/// Earth radius used by the SBAS pierce point model (m)
pub const SBAS_EARTH_RADIUS_M: f64 = 6378136.3;

/// Height of the SBAS ionospheric thin shell (m)
pub const SBAS_IONO_SHELL_HEIGHT_M: f64 = 350.0E3;

/// Nominal SBAS message period (s)
pub const SBAS_MESSAGE_PERIOD_S: f64 = 1.0;

/// Number of satellites a PRN mask may designate
pub const MAX_MASK_SATELLITES: usize = 51;

/// Number of PRN masks (IODP) we keep track of
pub const MAX_MASK_SLOTS: usize = 5;

/// Depth of the fast correction history, per satellite
pub const MAX_FAST_CORRECTIONS: usize = 4;

/// Fast corrections per MT2-5 message
pub const FAST_CORRECTIONS_PER_BLOCK: usize = 13;

/// Fast corrections per MT24 message
pub const MIXED_FAST_CORRECTIONS_PER_BLOCK: usize = 6;

/// IGP delays per MT26 block
pub const IGPS_PER_IONO_BLOCK: usize = 15;

/// Number of IGP bands (9 regular, 2 polar)
pub const NUM_IGP_BANDS: usize = 11;
