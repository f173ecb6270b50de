use std::collections::HashMap;

use log::debug;

use crate::{
    cfg::{Config, NavigationMode},
    message::MessageType,
    prelude::{Duration, Epoch},
};

/// Message time out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Time outs do not apply to this message type
    NotApplicable,
    /// This data never times out
    Never,
    /// Data is valid for this many seconds after reception
    Seconds(u32),
}

impl Timeout {
    /// Returns true if data received `elapsed` ago has timed out
    pub fn has_expired(&self, elapsed: Duration) -> bool {
        match self {
            Self::NotApplicable | Self::Never => false,
            Self::Seconds(s) => elapsed > Duration::from_seconds(*s as f64),
        }
    }

    /// Returns this time out as a [Duration], when one applies
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Seconds(s) => Some(Duration::from_seconds(*s as f64)),
            _ => None,
        }
    }
}

/// Life cycle of any stored correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Within its time out: usable
    Live,
    /// Timed out: ignored by all queries, not purged yet
    Stale,
    /// Purged (or never received)
    Purged,
}

impl EntryState {
    /// State of an entry received at `received_at`, observed at `now`
    pub(crate) fn of(timeout: Timeout, received_at: Epoch, now: Epoch) -> Self {
        if timeout.has_expired(now - received_at) {
            Self::Stale
        } else {
            Self::Live
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

/// Time outs of one [MessageType]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutEntry {
    /// Time out in [NavigationMode::PrecisionApproach]
    pub precision_approach: Timeout,
    /// Time out in [NavigationMode::NonPrecisionApproach]
    pub non_precision_approach: Timeout,
    /// Maximal update interval
    pub update_interval: Timeout,
}

impl TimeoutEntry {
    const fn new(npa_s: u32, pa_s: u32, update_s: u32) -> Self {
        Self {
            precision_approach: Timeout::Seconds(pa_s),
            non_precision_approach: Timeout::Seconds(npa_s),
            update_interval: Timeout::Seconds(update_s),
        }
    }

    const fn never(update_s: u32) -> Self {
        Self {
            precision_approach: Timeout::Never,
            non_precision_approach: Timeout::Never,
            update_interval: Timeout::Seconds(update_s),
        }
    }

    const fn not_applicable() -> Self {
        Self {
            precision_approach: Timeout::NotApplicable,
            non_precision_approach: Timeout::NotApplicable,
            update_interval: Timeout::NotApplicable,
        }
    }
}

/// Message time out table. Built once from [Config],
/// then shared read-only by every GEO record.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutTable {
    entries: HashMap<MessageType, TimeoutEntry>,
}

impl Default for TimeoutTable {
    fn default() -> Self {
        Self::mops()
    }
}

impl TimeoutTable {
    /// MOPS time outs (NPA, PA, max. update interval).
    /// The fast corrections and integrity entries hold the UDREI
    /// time out: the fast corrections themselves time out
    /// according to their degradation factor (MT7).
    pub fn mops() -> Self {
        let entries = [
            (MessageType::DoNotUse, TimeoutEntry::not_applicable()),
            (MessageType::PrnMask, TimeoutEntry::new(600, 600, 120)),
            (MessageType::FastCorrections, TimeoutEntry::new(18, 12, 6)),
            (MessageType::Integrity, TimeoutEntry::new(18, 12, 6)),
            (MessageType::FastDegradation, TimeoutEntry::new(360, 240, 120)),
            (MessageType::GeoNavigation, TimeoutEntry::new(360, 240, 120)),
            (
                MessageType::DegradationParameters,
                TimeoutEntry::new(360, 240, 120),
            ),
            (MessageType::NetworkTime, TimeoutEntry::never(300)),
            (MessageType::Almanac, TimeoutEntry::never(300)),
            (MessageType::IgpMask, TimeoutEntry::new(1200, 1200, 300)),
            (MessageType::MixedCorrections, TimeoutEntry::new(18, 12, 6)),
            (
                MessageType::LongTermCorrections,
                TimeoutEntry::new(360, 240, 120),
            ),
            (MessageType::IonoDelays, TimeoutEntry::new(600, 600, 300)),
            (
                MessageType::ServiceMessage,
                TimeoutEntry::new(86400, 86400, 300),
            ),
            (
                MessageType::ClockEphemerisCovariance,
                TimeoutEntry::new(360, 240, 120),
            ),
        ];

        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Builds the [TimeoutTable] described by [Config]:
    /// MOPS values, with the operator overrides applied.
    pub fn from_config(cfg: &Config) -> Self {
        let mut table = Self::mops();

        for customized in cfg.timeouts.iter() {
            let entry = table
                .entries
                .entry(customized.message)
                .or_insert(TimeoutEntry::not_applicable());

            if let Some(pa_s) = customized.precision_approach_s {
                entry.precision_approach = Timeout::Seconds(pa_s);
            }
            if let Some(npa_s) = customized.non_precision_approach_s {
                entry.non_precision_approach = Timeout::Seconds(npa_s);
            }
            if let Some(update_s) = customized.update_interval_s {
                entry.update_interval = Timeout::Seconds(update_s);
            }

            debug!("{} time out customized: {:?}", customized.message, entry);
        }

        table
    }

    /// [TimeoutEntry] of this [MessageType]
    pub fn entry(&self, message: MessageType) -> TimeoutEntry {
        self.entries
            .get(&message)
            .copied()
            .unwrap_or(TimeoutEntry::not_applicable())
    }

    /// [Timeout] of this [MessageType] in given [NavigationMode]
    pub fn timeout(&self, message: MessageType, mode: NavigationMode) -> Timeout {
        let entry = self.entry(message);
        match mode {
            NavigationMode::PrecisionApproach => entry.precision_approach,
            NavigationMode::NonPrecisionApproach => entry.non_precision_approach,
        }
    }

    /// Maximal update interval of this [MessageType]
    pub fn update_interval(&self, message: MessageType) -> Timeout {
        self.entry(message).update_interval
    }

    /// [EntryState] of data of this [MessageType] received at `received_at`
    pub fn state(
        &self,
        message: MessageType,
        mode: NavigationMode,
        received_at: Epoch,
        now: Epoch,
    ) -> EntryState {
        EntryState::of(self.timeout(message, mode), received_at, now)
    }

    /// True if data of this [MessageType] received at `received_at` is still live
    pub fn is_live(
        &self,
        message: MessageType,
        mode: NavigationMode,
        received_at: Epoch,
        now: Epoch,
    ) -> bool {
        self.state(message, mode, received_at, now).is_live()
    }
}
