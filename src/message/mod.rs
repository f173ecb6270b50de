//! Decoded SBAS messages, as handed over by the frame decoder.
//! Each [Message] variant owns exactly the fields its type carries.
use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod fast;
mod iono;
mod long_term;
mod mask;
mod service;
mod system;

pub use fast::{FastCorrection, FastCorrections, FastDegradation, IntegrityInfo};
pub use iono::{IgpDelay, IgpMask, IonoDelays};
pub use long_term::{
    ClockEphemerisCovariance, CovarianceMessage, LongTermCorrection, LongTermCorrections,
    LongTermRates, MixedCorrections,
};
pub use mask::{sv_from_mask_number, PrnMask};
pub use service::{RegionShape, ServiceMessage, ServiceRegion};
pub use system::{DegradationParameters, GeoAlmanac, GeoAlmanacs, GeoNavigation, NetworkTime};

/// SBAS message types this engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MessageType {
    /// MT0
    DoNotUse,
    /// MT1
    PrnMask,
    /// MT2 to MT5
    FastCorrections,
    /// MT6
    Integrity,
    /// MT7
    FastDegradation,
    /// MT9
    GeoNavigation,
    /// MT10
    DegradationParameters,
    /// MT12
    NetworkTime,
    /// MT17
    Almanac,
    /// MT18
    IgpMask,
    /// MT24
    MixedCorrections,
    /// MT25
    LongTermCorrections,
    /// MT26
    IonoDelays,
    /// MT27
    ServiceMessage,
    /// MT28
    ClockEphemerisCovariance,
}

impl MessageType {
    /// All supported [MessageType]s
    pub const ALL: [Self; 15] = [
        Self::DoNotUse,
        Self::PrnMask,
        Self::FastCorrections,
        Self::Integrity,
        Self::FastDegradation,
        Self::GeoNavigation,
        Self::DegradationParameters,
        Self::NetworkTime,
        Self::Almanac,
        Self::IgpMask,
        Self::MixedCorrections,
        Self::LongTermCorrections,
        Self::IonoDelays,
        Self::ServiceMessage,
        Self::ClockEphemerisCovariance,
    ];

    /// Identifies [MessageType] from the 6 bit message identifier
    pub fn from_number(number: u8) -> Result<Self, Error> {
        match number {
            0 => Ok(Self::DoNotUse),
            1 => Ok(Self::PrnMask),
            2..=5 => Ok(Self::FastCorrections),
            6 => Ok(Self::Integrity),
            7 => Ok(Self::FastDegradation),
            9 => Ok(Self::GeoNavigation),
            10 => Ok(Self::DegradationParameters),
            12 => Ok(Self::NetworkTime),
            17 => Ok(Self::Almanac),
            18 => Ok(Self::IgpMask),
            24 => Ok(Self::MixedCorrections),
            25 => Ok(Self::LongTermCorrections),
            26 => Ok(Self::IonoDelays),
            27 => Ok(Self::ServiceMessage),
            28 => Ok(Self::ClockEphemerisCovariance),
            n => Err(Error::UnknownMessageType(n)),
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::DoNotUse => write!(f, "MT0"),
            Self::PrnMask => write!(f, "MT1"),
            Self::FastCorrections => write!(f, "MT2-5"),
            Self::Integrity => write!(f, "MT6"),
            Self::FastDegradation => write!(f, "MT7"),
            Self::GeoNavigation => write!(f, "MT9"),
            Self::DegradationParameters => write!(f, "MT10"),
            Self::NetworkTime => write!(f, "MT12"),
            Self::Almanac => write!(f, "MT17"),
            Self::IgpMask => write!(f, "MT18"),
            Self::MixedCorrections => write!(f, "MT24"),
            Self::LongTermCorrections => write!(f, "MT25"),
            Self::IonoDelays => write!(f, "MT26"),
            Self::ServiceMessage => write!(f, "MT27"),
            Self::ClockEphemerisCovariance => write!(f, "MT28"),
        }
    }
}

/// Decoded SBAS message
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// "Do Not Use" alarm
    DoNotUse,
    PrnMask(PrnMask),
    FastCorrections(FastCorrections),
    Integrity(IntegrityInfo),
    FastDegradation(FastDegradation),
    GeoNavigation(GeoNavigation),
    DegradationParameters(DegradationParameters),
    NetworkTime(NetworkTime),
    Almanac(GeoAlmanacs),
    IgpMask(IgpMask),
    MixedCorrections(MixedCorrections),
    LongTermCorrections(LongTermCorrections),
    IonoDelays(IonoDelays),
    ServiceMessage(ServiceMessage),
    ClockEphemerisCovariance(CovarianceMessage),
}

impl Message {
    /// [MessageType] of this [Message]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::DoNotUse => MessageType::DoNotUse,
            Self::PrnMask(_) => MessageType::PrnMask,
            Self::FastCorrections(_) => MessageType::FastCorrections,
            Self::Integrity(_) => MessageType::Integrity,
            Self::FastDegradation(_) => MessageType::FastDegradation,
            Self::GeoNavigation(_) => MessageType::GeoNavigation,
            Self::DegradationParameters(_) => MessageType::DegradationParameters,
            Self::NetworkTime(_) => MessageType::NetworkTime,
            Self::Almanac(_) => MessageType::Almanac,
            Self::IgpMask(_) => MessageType::IgpMask,
            Self::MixedCorrections(_) => MessageType::MixedCorrections,
            Self::LongTermCorrections(_) => MessageType::LongTermCorrections,
            Self::IonoDelays(_) => MessageType::IonoDelays,
            Self::ServiceMessage(_) => MessageType::ServiceMessage,
            Self::ClockEphemerisCovariance(_) => MessageType::ClockEphemerisCovariance,
        }
    }
}

/// Satellite designated by a PRN mask, as referenced
/// by other messages: 1 based position within the mask.
pub(crate) fn mask_position(mask_number: u8) -> Option<usize> {
    if mask_number == 0 {
        None
    } else {
        Some(mask_number as usize - 1)
    }
}
