use log::debug;

use crate::prelude::{Duration, Epoch, SV};

/// GEO that broadcast a "Do Not Use" message (MT0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoAlarm {
    pub geo: SV,
    /// Start of the cool down period
    pub since: Epoch,
}

/// "Do Not Use" alarm state. The latest alarmed GEO is the primary one.
/// A GEO it displaced while still cooling down is deferred, and its cool
/// down restarts at displacement time. Deferred GEOs are kept until their
/// own cool down ends, however many GEOs alarm in the meantime.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmState {
    cooldown: Duration,
    primary: Option<GeoAlarm>,
    /// Most recently deferred last
    deferred: Vec<GeoAlarm>,
}

impl AlarmState {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            primary: None,
            deferred: Vec::new(),
        }
    }

    /// Active alarm, if any
    pub fn primary(&self) -> Option<GeoAlarm> {
        self.primary
    }

    /// Displaced alarms, most recently deferred last
    pub fn deferred(&self) -> &[GeoAlarm] {
        &self.deferred
    }

    fn is_cooling_down(&self, alarm: &GeoAlarm, now: Epoch) -> bool {
        now - alarm.since <= self.cooldown
    }

    /// Raises (or refreshes) the alarm of this GEO
    pub fn raise(&mut self, geo: SV, t: Epoch) {
        self.deferred.retain(|alarm| alarm.geo != geo);

        if let Some(primary) = self.primary {
            if primary.geo != geo {
                if self.is_cooling_down(&primary, t) {
                    debug!("{} - {} alarm deferred by {} alarm", t, primary.geo, geo);
                    self.deferred.push(GeoAlarm {
                        geo: primary.geo,
                        since: t,
                    });
                } else {
                    debug!("{} - {} alarm expired", t, primary.geo);
                }
            }
        }

        self.primary = Some(GeoAlarm { geo, since: t });
    }

    /// Expires the alarms whose cool down ended at `now`.
    /// Returns the GEOs that are no longer alarmed.
    pub fn expire(&mut self, now: Epoch) -> Vec<SV> {
        let mut released = Vec::new();

        let cooldown = self.cooldown;
        self.deferred.retain(|alarm| {
            if now - alarm.since > cooldown {
                released.push(alarm.geo);
                false
            } else {
                true
            }
        });

        if let Some(primary) = self.primary {
            if !self.is_cooling_down(&primary, now) {
                released.push(primary.geo);
                self.primary = self.deferred.pop();
            }
        }

        for geo in released.iter() {
            debug!("{} - {} alarm expired", now, geo);
        }

        released
    }

    /// True if this GEO is currently alarmed
    pub fn is_alarmed(&self, geo: SV, now: Epoch) -> bool {
        self.primary
            .iter()
            .chain(self.deferred.iter())
            .any(|alarm| alarm.geo == geo && self.is_cooling_down(alarm, now))
    }

    /// Clears all alarms
    pub fn reset(&mut self) {
        self.primary = None;
        self.deferred.clear();
    }
}
