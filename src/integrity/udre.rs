//! UDRE, δUDRE and GIVE look up tables
use crate::message::DegradationParameters;

/// UDREI: satellite is "Not Monitored"
pub const UDREI_NOT_MONITORED: u8 = 14;

/// UDREI: satellite is "Do Not Use"
pub const UDREI_DO_NOT_USE: u8 = 15;

/// GIVEI: IGP is "Not Monitored"
pub const GIVEI_NOT_MONITORED: u8 = 15;

/// σ²(UDRE) in m², indexed by UDREI
const UDRE_VARIANCE_M2: [f64; 14] = [
    0.0520, 0.0924, 0.1444, 0.2830, 0.4678, 0.8315, 1.2992, 1.8709, 2.5465, 3.3260, 5.1968,
    20.7870, 230.9661, 2078.695,
];

/// σ²(GIVE) in m², indexed by GIVEI
const GIVE_VARIANCE_M2: [f64; 15] = [
    0.0084, 0.0333, 0.0749, 0.1331, 0.2079, 0.2994, 0.4075, 0.5322, 0.6735, 0.8315, 1.1974,
    1.8709, 3.3260, 20.7870, 187.0826,
];

/// δUDRE, indexed by the MT27 δUDRE indicator
const DELTA_UDRE: [f64; 16] = [
    1.0, 1.1, 1.25, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 20.0, 30.0, 40.0, 50.0, 100.0,
];

/// True if this UDREI forbids any use of the satellite
pub fn udrei_forbids_use(udrei: u8) -> bool {
    udrei >= UDREI_NOT_MONITORED
}

/// σ²(UDRE) in m², None for "Not Monitored" and "Do Not Use"
pub fn udre_variance_m2(udrei: u8) -> Option<f64> {
    UDRE_VARIANCE_M2.get(udrei as usize).copied()
}

/// σ²(GIVE) in m², None for "Not Monitored"
pub fn give_variance_m2(givei: u8) -> Option<f64> {
    GIVE_VARIANCE_M2.get(givei as usize).copied()
}

/// δUDRE factor of this MT27 indicator
pub fn delta_udre(indicator: u8) -> f64 {
    DELTA_UDRE
        .get(indicator as usize)
        .copied()
        .unwrap_or(DELTA_UDRE[15])
}

/// σ² of one IGP (m²): GIVE variance degraded by the
/// ionospheric step and ramp terms of MT10, `elapsed_s` after reception.
pub fn iono_grid_variance_m2(
    givei: u8,
    elapsed_s: f64,
    degradation: Option<&DegradationParameters>,
) -> Option<f64> {
    let sigma2_give = give_variance_m2(givei)?;

    let Some(params) = degradation else {
        return Some(sigma2_give);
    };

    let eps_iono = params.eps_iono(elapsed_s);

    if params.rss_iono {
        Some(sigma2_give + eps_iono.powi(2))
    } else {
        Some((sigma2_give.sqrt() + eps_iono).powi(2))
    }
}
