/// Ionospheric Grid Point mask (MT18), for one band
#[derive(Debug, Clone, PartialEq)]
pub struct IgpMask {
    /// Number of bands being broadcast
    pub num_bands: u8,
    /// Band (0..=10)
    pub band: u8,
    /// Issue Of Data Ionosphere (0..=3)
    pub iodi: u8,
    /// Designated IGPs (1 based IGP numbers within that band), in ascending order
    pub igps: Vec<u8>,
}

/// Vertical delay of one IGP
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IgpDelay {
    /// Vertical delay (m)
    pub vertical_delay_m: f64,
    /// Grid Ionospheric Vertical Error Indicator (0..=15)
    pub givei: u8,
}

impl IgpDelay {
    pub fn new(vertical_delay_m: f64, givei: u8) -> Self {
        Self {
            vertical_delay_m,
            givei,
        }
    }
}

/// Ionospheric delays (MT26): block `k` of a band holds the delays
/// of the designated IGPs `15k` to `15k+14` (in mask order).
#[derive(Debug, Clone, PartialEq)]
pub struct IonoDelays {
    pub band: u8,
    /// Block (0..=13)
    pub block: u8,
    pub iodi: u8,
    /// Up to 15 delays
    pub delays: Vec<IgpDelay>,
}

impl IonoDelays {
    /// Position (within the band mask) of the first delay
    pub fn mask_offset(&self) -> usize {
        self.block as usize * crate::constants::IGPS_PER_IONO_BLOCK
    }
}
