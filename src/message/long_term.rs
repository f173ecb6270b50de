use super::FastCorrection;

/// Rate terms of a long-term correction (velocity code 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongTermRates {
    /// Satellite velocity error (m/s) in ECEF
    pub ddx_m_s: f64,
    pub ddy_m_s: f64,
    pub ddz_m_s: f64,
    /// Satellite clock drift error (s/s)
    pub daf1_s_s: f64,
    /// Time of applicability (seconds of day)
    pub t0_s: f64,
}

/// Long-term correction of one satellite (half of MT25, or MT24)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongTermCorrection {
    /// Position within the PRN mask (1..=51), 0 means no data
    pub mask_number: u8,
    /// Issue Of Data Ephemeris this correction applies to
    pub iode: u8,
    /// Satellite position error (m) in ECEF
    pub dx_m: f64,
    pub dy_m: f64,
    pub dz_m: f64,
    /// Satellite clock offset error (s)
    pub daf0_s: f64,
    /// Present for velocity code 1
    pub rates: Option<LongTermRates>,
}

impl LongTermCorrection {
    /// Velocity code (0 or 1)
    pub fn velocity_code(&self) -> u8 {
        u8::from(self.rates.is_some())
    }
}

/// Long-term corrections (MT25), up to 4 satellites
#[derive(Debug, Clone, PartialEq)]
pub struct LongTermCorrections {
    /// Issue Of Data PRN
    pub iodp: u8,
    pub corrections: Vec<LongTermCorrection>,
}

/// Mixed fast and long-term corrections (MT24): 6 fast corrections
/// starting at mask position `13 * block` and one long-term half message.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedCorrections {
    pub block: u8,
    pub iodf: u8,
    pub iodp: u8,
    pub fast: Vec<FastCorrection>,
    pub long_term: Vec<LongTermCorrection>,
}

impl MixedCorrections {
    /// Mask position of the first fast correction
    pub fn mask_offset(&self) -> usize {
        self.block as usize * crate::constants::FAST_CORRECTIONS_PER_BLOCK
    }
}

/// Clock and ephemeris covariance of one satellite (MT28)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockEphemerisCovariance {
    /// Position within the PRN mask (1..=51)
    pub mask_number: u8,
    /// Scale exponent (0..=7)
    pub scale_exponent: u8,
    /// Cholesky factor elements, in broadcast order:
    /// E11, E22, E33, E44, E12, E13, E14, E23, E24, E34
    pub elements: [f64; 10],
}

/// Clock and ephemeris covariance matrix message (MT28)
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMessage {
    pub iodp: u8,
    pub entries: Vec<ClockEphemerisCovariance>,
}
