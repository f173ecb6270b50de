//! Version and time out engine: message time outs, integrity
//! indicators, degradation models and "Do Not Use" alarms.
mod alarm;
mod covariance;
mod degradation;
mod timeout;
mod udre;

pub use alarm::{AlarmState, GeoAlarm};
pub use degradation::{
    DegradationFactor, FltBudget, RangeRateBasis, DEFAULT_DEGRADATION_INDICATOR,
};
pub use timeout::{EntryState, Timeout, TimeoutEntry, TimeoutTable};
pub use udre::{
    delta_udre, give_variance_m2, iono_grid_variance_m2, udre_variance_m2, udrei_forbids_use,
    GIVEI_NOT_MONITORED, UDREI_DO_NOT_USE, UDREI_NOT_MONITORED,
};

#[cfg(test)]
pub(crate) use degradation::test::test_parameters;
