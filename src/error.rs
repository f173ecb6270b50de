use thiserror::Error;

use crate::{message::MessageType, prelude::SV};

/// Fatal errors. Anything that merely makes a correction unusable
/// is reported through [crate::prelude::Unavailable] instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Failed to allocate the per-message storage sized
    /// from the message's own count field. The message is discarded
    /// and the current run should be aborted.
    #[error("{0}: failed to allocate storage for {1} entries")]
    Allocation(MessageType, usize),

    /// [crate::prelude::CorrectionDatabase] was sized for fewer GEOs
    /// than the stream actually carries.
    #[error("cannot track {0}: all {1} GEO slots are in use")]
    TooManyGeos(SV, usize),

    /// Binary text may only contain '0' and '1'
    #[error("invalid binary digit '{0}'")]
    InvalidBinaryDigit(char),

    #[error("invalid hexadecimal digit '{0}'")]
    InvalidHexDigit(char),

    #[error("empty bit string")]
    EmptyBitString,

    /// Two's complement decoding is limited to 64 bits
    #[error("bit width {0} is not supported")]
    BitWidth(usize),

    #[error("unknown navigation mode")]
    UnknownNavigationMode,

    #[error("unknown message type {0}")]
    UnknownMessageType(u8),
}

/// Reasons why a correction cannot be provided at this time.
/// None of them is fatal: the engine keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unavailable {
    #[error("{0} is not tracked")]
    UnknownGeo(SV),

    #[error("{0} is alarmed (Do Not Use)")]
    GeoAlarm(SV),

    #[error("no live PRN mask")]
    NoMask,

    #[error("{0} is not designated by any live PRN mask")]
    NotInMask(SV),

    #[error("{0}: no live fast correction")]
    NoFastCorrection(SV),

    #[error("{0}: no live long-term correction")]
    NoLongTermCorrection(SV),

    /// Excluded by the SBAS (UDREI "Not Monitored" or "Do Not Use")
    /// or by the user.
    #[error("{0} is excluded")]
    Excluded(SV),

    /// Degradation parameters (MT10) are required in PA mode
    #[error("missing degradation parameters")]
    MissingDegradationParameters,

    #[error("not enough live IGPs surrounding the pierce point")]
    InsufficientIgps,

    #[error("pierce point lies outside the interpolation triangle")]
    OutsideTriangle,

    /// Service region spanning less than 1° in latitude or longitude
    #[error("degenerate service region")]
    Degenerate,

    /// Satellite below the horizon
    #[error("negative elevation")]
    BelowHorizon,
}
