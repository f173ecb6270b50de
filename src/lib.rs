#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

pub mod codec;
pub mod constants;
pub mod geometry;
pub mod integrity;
pub mod iono;
pub mod message;

// private modules
mod cfg;
mod error;
mod store;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, NavigationMode, TimeoutOverride};
    pub use crate::codec::{
        binary_to_hex, bits_from_str, bits_to_string, check_crc24q, crc24q, crc24q_parity,
        hex_to_binary, twos_complement, LetterCase,
    };
    pub use crate::error::{Error, Unavailable};
    pub use crate::geometry::{PiercePoint, RegionMembership};
    pub use crate::integrity::{
        AlarmState, DegradationFactor, EntryState, FltBudget, GeoAlarm, Timeout, TimeoutTable,
    };
    pub use crate::iono::{GridInterpolation, IgpSample, InterpolationMode};
    pub use crate::message::{Message, MessageType, PrnMask};
    pub use crate::store::{
        ApplyOutcome, BandGrid, CorrectionDatabase, Discard, Exclusion, FastCorrectionCell,
        FastCorrectionSentinel, FastHistory, GeoModeSwitch, GeoRecord, IonoCorrection, IonoGrid,
        LineOfSight, LiveFastCorrection, LiveLongTermCorrection, MaskSlot,
        SatelliteCorrection, SatelliteCorrections, Slot, Stamped,
    };
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}
