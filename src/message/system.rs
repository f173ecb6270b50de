/// GEO navigation message (MT9)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoNavigation {
    /// Time of applicability (seconds of day)
    pub t0_s: f64,
    /// User Range Accuracy indicator
    pub ura: u8,
    /// ECEF position (m)
    pub position_m: (f64, f64, f64),
    /// ECEF velocity (m/s)
    pub velocity_m_s: (f64, f64, f64),
    /// ECEF acceleration (m/s²)
    pub acceleration_m_s2: (f64, f64, f64),
    /// Clock offset (s)
    pub agf0_s: f64,
    /// Clock drift (s/s)
    pub agf1_s_s: f64,
}

/// SBAS network time, UTC parameters (MT12)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkTime {
    pub a1_s_s: f64,
    pub a0_s: f64,
    pub t0t_s: u32,
    pub wn_t: u8,
    pub delta_t_ls_s: i8,
    pub utc_standard: u8,
}

/// One GEO almanac (MT17)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoAlmanac {
    pub data_id: u8,
    /// GEO PRN number (120..=158)
    pub prn: u8,
    pub health: u8,
    /// ECEF position (m)
    pub position_m: (f64, f64, f64),
    /// ECEF velocity (m/s)
    pub velocity_m_s: (f64, f64, f64),
    /// Time of applicability (seconds of day)
    pub t0_s: f64,
}

/// GEO almanacs (MT17), up to 3 GEOs
#[derive(Debug, Clone, PartialEq)]
pub struct GeoAlmanacs {
    pub entries: Vec<GeoAlmanac>,
}

/// Degradation parameters (MT10)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegradationParameters {
    /// Range rate correction degradation (m)
    pub b_rrc_m: f64,
    /// Long-term correction, least significant bit degradation (m)
    pub c_ltc_lsb_m: f64,
    /// Long-term correction velocity degradation, velocity code 1 (m/s)
    pub c_ltc_v1_m_s: f64,
    /// Long-term correction update interval, velocity code 1 (s)
    pub i_ltc_v1_s: f64,
    /// Long-term correction degradation, velocity code 0 (m)
    pub c_ltc_v0_m: f64,
    /// Long-term correction update interval, velocity code 0 (s)
    pub i_ltc_v0_s: f64,
    pub c_geo_lsb_m: f64,
    pub c_geo_v_m_s: f64,
    pub i_geo_s: f64,
    /// En route degradation (m)
    pub c_er_m: f64,
    /// Ionospheric step degradation (m)
    pub c_iono_step_m: f64,
    /// Ionospheric update interval (s)
    pub i_iono_s: f64,
    /// Ionospheric ramp degradation (m/s)
    pub c_iono_ramp_m_s: f64,
    /// Root sum square of the UDRE degradation terms
    pub rss_udre: bool,
    /// Root sum square of the GIVE degradation terms
    pub rss_iono: bool,
    /// Covariance degradation (m)
    pub c_covariance_m: f64,
}
