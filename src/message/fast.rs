/// One fast correction, as broadcast in MT2-5 and MT24
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastCorrection {
    /// Pseudo range correction (m)
    pub prc_m: f64,
    /// User Differential Range Error Indicator (0..=15)
    pub udrei: u8,
}

impl FastCorrection {
    pub fn new(prc_m: f64, udrei: u8) -> Self {
        Self { prc_m, udrei }
    }
}

/// Fast corrections (MT2-5). Block `j` (message type `j+2`)
/// covers mask positions `13j` to `13j+12`.
#[derive(Debug, Clone, PartialEq)]
pub struct FastCorrections {
    /// Block (0..=3)
    pub block: u8,
    /// Issue Of Data Fast correction (0..=3), 3 marks an alarm condition
    pub iodf: u8,
    /// Issue Of Data PRN this message refers to
    pub iodp: u8,
    /// Up to 13 corrections, in mask order
    pub corrections: Vec<FastCorrection>,
}

impl FastCorrections {
    /// Mask position of the first correction
    pub fn mask_offset(&self) -> usize {
        self.block as usize * crate::constants::FAST_CORRECTIONS_PER_BLOCK
    }
}

/// Integrity information (MT6): refreshes the UDREIs of the
/// 51 mask positions, for the fast corrections of matching IODF.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityInfo {
    /// IODF of blocks MT2 to MT5
    pub iodf: [u8; 4],
    /// UDREIs in mask order
    pub udrei: Vec<u8>,
}

/// Fast correction degradation factors (MT7)
#[derive(Debug, Clone, PartialEq)]
pub struct FastDegradation {
    /// System latency (s)
    pub system_latency_s: u8,
    /// Issue Of Data PRN
    pub iodp: u8,
    /// Degradation factor indicator (0..=15), in mask order
    pub ai: Vec<u8>,
}
