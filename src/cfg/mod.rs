#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{SBAS_IONO_SHELL_HEIGHT_M, SBAS_MESSAGE_PERIOD_S},
    message::MessageType,
    prelude::SV,
};

mod mode;
pub use mode::NavigationMode;

fn default_max_geos() -> usize {
    4
}

fn default_alarm_cooldown() -> f64 {
    60.0
}

fn default_max_missed_messages() -> usize {
    4
}

fn default_message_period() -> f64 {
    SBAS_MESSAGE_PERIOD_S
}

fn default_shell_height() -> f64 {
    SBAS_IONO_SHELL_HEIGHT_M
}

fn default_min_usable_satellites() -> usize {
    4
}

/// Operator defined message time out, replacing the MOPS default value.
/// Overrides apply to every GEO we track.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeoutOverride {
    /// [MessageType] this override applies to
    pub message: MessageType,
    /// Time out (s) in [NavigationMode::PrecisionApproach]
    #[cfg_attr(feature = "serde", serde(default))]
    pub precision_approach_s: Option<u32>,
    /// Time out (s) in [NavigationMode::NonPrecisionApproach]
    #[cfg_attr(feature = "serde", serde(default))]
    pub non_precision_approach_s: Option<u32>,
    /// Maximal update interval (s)
    #[cfg_attr(feature = "serde", serde(default))]
    pub update_interval_s: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// [NavigationMode] selects the time out table.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: NavigationMode,

    /// User forced NPA operation. When set, we operate in
    /// [NavigationMode::NonPrecisionApproach] whatever [Self::mode] says,
    /// and the UDREI time out is no longer enforced: UDREIs remain valid
    /// as long as the fast correction they came with.
    #[cfg_attr(feature = "serde", serde(default))]
    pub force_npa: bool,

    /// Maximal number of GEOs we track simultaneously
    /// (the mixed aggregate does not count).
    #[cfg_attr(feature = "serde", serde(default = "default_max_geos"))]
    pub max_geos: usize,

    /// Delay (s) during which a GEO that broadcast a "Do Not Use"
    /// message is considered unusable.
    #[cfg_attr(feature = "serde", serde(default = "default_alarm_cooldown"))]
    pub alarm_cooldown_s: f64,

    /// Number of consecutive lost messages that cause all fast corrections
    /// of that GEO to be purged.
    #[cfg_attr(feature = "serde", serde(default = "default_max_missed_messages"))]
    pub max_missed_messages: usize,

    /// Nominal message period (s), used to detect lost messages
    /// from reception gaps.
    #[cfg_attr(feature = "serde", serde(default = "default_message_period"))]
    pub message_period_s: f64,

    /// Height of the ionospheric thin shell (m)
    #[cfg_attr(feature = "serde", serde(default = "default_shell_height"))]
    pub iono_shell_height_m: f64,

    /// Time out overrides
    #[cfg_attr(feature = "serde", serde(default))]
    pub timeouts: Vec<TimeoutOverride>,

    /// Satellites the user does not want to use, whatever the SBAS says.
    #[cfg_attr(feature = "serde", serde(default))]
    pub excluded_satellites: Vec<SV>,

    /// Switch to another GEO when the current one leaves
    /// too few usable satellites.
    #[cfg_attr(feature = "serde", serde(default))]
    pub geo_switching: bool,

    /// Fall back from PA to NPA when no other GEO can be selected
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode_switching: bool,

    /// Minimal number of usable satellites (a navigation solution requires 4)
    #[cfg_attr(feature = "serde", serde(default = "default_min_usable_satellites"))]
    pub min_usable_satellites: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: NavigationMode::default(),
            force_npa: false,
            max_geos: default_max_geos(),
            alarm_cooldown_s: default_alarm_cooldown(),
            max_missed_messages: default_max_missed_messages(),
            message_period_s: default_message_period(),
            iono_shell_height_m: default_shell_height(),
            timeouts: Vec::new(),
            excluded_satellites: Vec::new(),
            geo_switching: false,
            mode_switching: false,
            min_usable_satellites: default_min_usable_satellites(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with desired [NavigationMode]
    pub fn with_navigation_mode(&self, mode: NavigationMode) -> Self {
        let mut s = self.clone();
        s.mode = mode;
        s
    }

    /// Copies and returns [Config] with forced NPA operations
    pub fn with_forced_npa(&self, forced: bool) -> Self {
        let mut s = self.clone();
        s.force_npa = forced;
        s
    }

    /// Copies and returns [Config] with one more [TimeoutOverride]
    pub fn with_timeout_override(&self, timeout: TimeoutOverride) -> Self {
        let mut s = self.clone();
        s.timeouts.push(timeout);
        s
    }

    /// Copies and returns [Config] with this satellite excluded
    pub fn with_excluded_satellite(&self, sv: SV) -> Self {
        let mut s = self.clone();
        s.excluded_satellites.push(sv);
        s
    }

    /// Copies and returns [Config] tracking up to `max_geos` GEOs
    pub fn with_max_geos(&self, max_geos: usize) -> Self {
        let mut s = self.clone();
        s.max_geos = max_geos;
        s
    }

    /// Copies and returns [Config] with GEO switching enabled or disabled
    pub fn with_geo_switching(&self, enabled: bool) -> Self {
        let mut s = self.clone();
        s.geo_switching = enabled;
        s
    }

    /// Copies and returns [Config] with PA to NPA fall back enabled or disabled
    pub fn with_mode_switching(&self, enabled: bool) -> Self {
        let mut s = self.clone();
        s.mode_switching = enabled;
        s
    }

    /// [NavigationMode] actually in use, once the user override applies
    pub fn effective_mode(&self) -> NavigationMode {
        if self.force_npa {
            NavigationMode::NonPrecisionApproach
        } else {
            self.mode
        }
    }
}
