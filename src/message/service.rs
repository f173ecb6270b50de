/// Service region shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionShape {
    /// Three corners: (lat1, lon1), (lat1, lon2), (lat2, lon2)
    Triangle,
    /// Four corners
    Quadrangle,
}

/// Service region, as defined by two broadcast coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceRegion {
    pub lat1_deg: f64,
    pub lon1_deg: f64,
    pub lat2_deg: f64,
    pub lon2_deg: f64,
    pub shape: RegionShape,
}

impl ServiceRegion {
    pub fn new(
        lat1_deg: f64,
        lon1_deg: f64,
        lat2_deg: f64,
        lon2_deg: f64,
        shape: RegionShape,
    ) -> Self {
        Self {
            lat1_deg,
            lon1_deg,
            lat2_deg,
            lon2_deg,
            shape,
        }
    }
}

/// SBAS service message (MT27)
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceMessage {
    /// Issue Of Data Service (0..=7)
    pub iods: u8,
    /// Number of service messages forming the complete set
    pub num_messages: u8,
    /// Number of this message within the set (1 based)
    pub message_number: u8,
    /// Priority code (0..=3)
    pub priority: u8,
    /// δUDRE indicator that applies inside these regions
    pub delta_udre_inside: u8,
    /// δUDRE indicator that applies outside all regions
    pub delta_udre_outside: u8,
    pub regions: Vec<ServiceRegion>,
}
