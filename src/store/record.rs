use std::collections::{HashMap, VecDeque};

use log::{debug, warn};

use crate::{
    cfg::{Config, NavigationMode},
    constants::{FAST_CORRECTIONS_PER_BLOCK, MAX_MASK_SLOTS, MIXED_FAST_CORRECTIONS_PER_BLOCK},
    error::{Error, Unavailable},
    integrity::{
        delta_udre, udrei_forbids_use, EntryState, TimeoutTable, UDREI_NOT_MONITORED,
    },
    message::{
        mask_position, ClockEphemerisCovariance, DegradationParameters, FastCorrection,
        FastDegradation, GeoAlmanacs, GeoNavigation, IntegrityInfo, LongTermCorrection, Message,
        MessageType, NetworkTime, PrnMask, ServiceMessage,
    },
    prelude::{Epoch, SV},
    store::{
        allocate, ApplyOutcome, Discard, IonoGrid, LiveFastCorrection, LiveLongTermCorrection,
        MaskSlot, Stamped,
    },
};

/// Reason why a satellite must not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Broadcast UDREI "Not Monitored" (14) or "Do Not Use" (15)
    Udrei(u8),
    /// Excluded by the user
    User,
}

/// Time, mode and time out table a query is answered with
#[derive(Debug, Clone, Copy)]
pub(crate) struct QueryContext<'a> {
    pub table: &'a TimeoutTable,
    pub mode: NavigationMode,
    /// UDREI time out is not enforced
    pub force_npa: bool,
    pub now: Epoch,
}

impl QueryContext<'_> {
    pub fn is_live(&self, message: MessageType, received_at: Epoch) -> bool {
        self.table.is_live(message, self.mode, received_at, self.now)
    }
}

/// Everything we know from one GEO (or from all of them, for the aggregate record)
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRecord {
    /// Source GEO, None for the aggregate record
    pub geo: Option<SV>,
    /// PRN masks, most recent last
    masks: VecDeque<MaskSlot>,
    /// IODP of the latest fast corrections
    fast_iodp: Option<u8>,
    exclusions: HashMap<SV, Exclusion>,
    degradation: Option<Stamped<DegradationParameters>>,
    geo_navigation: Option<Stamped<GeoNavigation>>,
    network_time: Option<Stamped<NetworkTime>>,
    almanacs: Option<Stamped<GeoAlmanacs>>,
    iono: IonoGrid,
    service: Vec<Stamped<ServiceMessage>>,
    last_reception: Option<Epoch>,
    missed_messages: usize,
    counters: HashMap<MessageType, usize>,
    /// Latest reception, per message type
    last_received: HashMap<MessageType, Epoch>,
}

impl GeoRecord {
    /// Builds an empty [GeoRecord]
    pub(crate) fn new(geo: Option<SV>, cfg: &Config) -> Self {
        Self {
            geo,
            masks: VecDeque::with_capacity(MAX_MASK_SLOTS),
            fast_iodp: None,
            exclusions: cfg
                .excluded_satellites
                .iter()
                .map(|sv| (*sv, Exclusion::User))
                .collect(),
            degradation: None,
            geo_navigation: None,
            network_time: None,
            almanacs: None,
            iono: IonoGrid::default(),
            service: Vec::new(),
            last_reception: None,
            missed_messages: 0,
            counters: HashMap::new(),
            last_received: HashMap::new(),
        }
    }

    /// Full reset
    pub(crate) fn reset(&mut self, cfg: &Config) {
        *self = Self::new(self.geo, cfg);
    }

    /// Clears everything but the almanacs, the message counters
    /// and the user exclusions.
    pub(crate) fn clear(&mut self) {
        self.masks.clear();
        self.fast_iodp = None;
        self.exclusions.retain(|_, cause| *cause == Exclusion::User);
        self.degradation = None;
        self.geo_navigation = None;
        self.network_time = None;
        self.iono.clear();
        self.service.clear();
        self.missed_messages = 0;
    }

    /// PRN masks, most recent last
    pub fn masks(&self) -> impl DoubleEndedIterator<Item = &MaskSlot> {
        self.masks.iter()
    }

    /// Mask slot of this IODP
    pub fn mask(&self, iodp: u8) -> Option<&MaskSlot> {
        self.masks.iter().find(|slot| slot.iodp == iodp)
    }

    fn mask_index(&self, iodp: u8) -> Option<usize> {
        self.masks.iter().position(|slot| slot.iodp == iodp)
    }

    /// IODP of the latest fast corrections
    pub fn fast_iodp(&self) -> Option<u8> {
        self.fast_iodp
    }

    /// Mask the latest fast corrections refer to,
    /// or the latest mask when none were received.
    fn active_mask_index(&self) -> Option<usize> {
        self.fast_iodp
            .and_then(|iodp| self.mask_index(iodp))
            .or_else(|| self.masks.len().checked_sub(1))
    }

    pub fn exclusion(&self, sv: SV) -> Option<Exclusion> {
        self.exclusions.get(&sv).copied()
    }

    pub fn almanacs(&self) -> Option<&Stamped<GeoAlmanacs>> {
        self.almanacs.as_ref()
    }

    pub fn geo_navigation(&self) -> Option<&Stamped<GeoNavigation>> {
        self.geo_navigation.as_ref()
    }

    pub fn network_time(&self) -> Option<&Stamped<NetworkTime>> {
        self.network_time.as_ref()
    }

    pub fn iono(&self) -> &IonoGrid {
        &self.iono
    }

    /// Number of messages of this type received so far
    pub fn received(&self, message: MessageType) -> usize {
        self.counters.get(&message).copied().unwrap_or(0)
    }

    /// Latest reception of this message type
    pub fn last_received(&self, message: MessageType) -> Option<Epoch> {
        self.last_received.get(&message).copied()
    }

    fn count(&mut self, message: MessageType, t: Epoch) {
        *self.counters.entry(message).or_insert(0) += 1;
        self.last_received.insert(message, t);
    }

    /// Consecutive messages lost so far
    pub fn missed_messages(&self) -> usize {
        self.missed_messages
    }

    /// Applies one message received at `t`
    pub(crate) fn apply(
        &mut self,
        message: &Message,
        t: Epoch,
        cfg: &Config,
    ) -> Result<ApplyOutcome, Error> {
        self.count(message.message_type(), t);
        self.detect_losses(t, cfg);

        let discarded = match message {
            Message::DoNotUse => {
                self.clear();
                None
            },
            Message::PrnMask(mask) => {
                self.apply_mask(mask, t)?;
                None
            },
            Message::FastCorrections(fc) => {
                self.apply_fast(fc.iodp, fc.iodf, fc.mask_offset(), &fc.corrections, t)
            },
            Message::Integrity(info) => self.apply_integrity(info, t),
            Message::FastDegradation(deg) => self.apply_degradation_factors(deg, t)?,
            Message::GeoNavigation(nav) => {
                self.geo_navigation = Some(Stamped::new(*nav, t));
                None
            },
            Message::DegradationParameters(params) => {
                self.degradation = Some(Stamped::new(*params, t));
                None
            },
            Message::NetworkTime(time) => {
                self.network_time = Some(Stamped::new(*time, t));
                None
            },
            Message::Almanac(almanacs) => {
                let entries = allocate(MessageType::Almanac, &almanacs.entries)?;
                self.almanacs = Some(Stamped::new(GeoAlmanacs { entries }, t));
                None
            },
            Message::IgpMask(mask) => self.iono.apply_mask(mask, t)?,
            Message::MixedCorrections(mixed) => {
                let fast = &mixed.fast[..mixed.fast.len().min(MIXED_FAST_CORRECTIONS_PER_BLOCK)];
                self.apply_fast(mixed.iodp, mixed.iodf, mixed.mask_offset(), fast, t)
                    .or_else(|| self.apply_long_term(mixed.iodp, &mixed.long_term, t))
            },
            Message::LongTermCorrections(ltc) => {
                self.apply_long_term(ltc.iodp, &ltc.corrections, t)
            },
            Message::IonoDelays(delays) => self.iono.apply_delays(delays, t),
            Message::ServiceMessage(service) => {
                self.apply_service(service, t)?;
                None
            },
            Message::ClockEphemerisCovariance(cov) => {
                self.apply_covariance(cov.iodp, &cov.entries, t)
            },
        };

        match discarded {
            Some(reason) => {
                warn!(
                    "{} - {} discarded ({}): {}",
                    t,
                    message.message_type(),
                    self.name(),
                    reason
                );
                Ok(ApplyOutcome::Discarded(reason))
            },
            None => {
                debug!("{} - {} stored ({})", t, message.message_type(), self.name());
                Ok(ApplyOutcome::Stored)
            },
        }
    }

    fn name(&self) -> String {
        match self.geo {
            Some(geo) => geo.to_string(),
            None => "aggregate".to_string(),
        }
    }

    /// Counts the messages lost since the previous reception
    fn detect_losses(&mut self, t: Epoch, cfg: &Config) {
        if self.geo.is_some() {
            if let Some(last) = self.last_reception {
                let elapsed_s = (t - last).to_seconds();
                let gap = (elapsed_s / cfg.message_period_s).round() as i64 - 1;
                let gap = gap.max(0) as usize;

                // already purged when the losses were reported
                if gap >= cfg.max_missed_messages && self.missed_messages < cfg.max_missed_messages
                {
                    warn!("{} - {}: {} messages lost", t, self.name(), gap);
                    self.purge_fast_corrections(t);
                }
            }
        }

        self.missed_messages = 0;
        self.last_reception = Some(t);
    }

    /// Reports one lost message
    pub(crate) fn message_lost(&mut self, t: Epoch, cfg: &Config) {
        self.missed_messages += 1;
        if self.missed_messages == cfg.max_missed_messages {
            warn!(
                "{} - {}: {} consecutive messages lost",
                t,
                self.name(),
                self.missed_messages
            );
            self.purge_fast_corrections(t);
        }
    }

    /// Purges every fast correction. Satellites of the active
    /// mask are declared "Not Monitored".
    pub(crate) fn purge_fast_corrections(&mut self, t: Epoch) {
        for slot in self.masks.iter_mut() {
            for sat in slot.satellites.iter_mut() {
                sat.fast.purge();
            }
        }

        if let Some(index) = self.fast_iodp.and_then(|iodp| self.mask_index(iodp)) {
            for sat in self.masks[index].satellites.iter_mut() {
                sat.udrei = Some(Stamped::new(UDREI_NOT_MONITORED, t));
            }
        }
    }

    fn apply_mask(&mut self, mask: &PrnMask, t: Epoch) -> Result<(), Error> {
        match self.mask_index(mask.iodp) {
            Some(index) => {
                let slot = &mut self.masks[index];
                let same = slot.satellites.len() == mask.satellites.len()
                    && slot
                        .satellites
                        .iter()
                        .zip(mask.satellites.iter())
                        .all(|(sat, sv)| sat.sv == *sv);

                if same {
                    slot.received_at = t;
                } else {
                    warn!(
                        "{} - {}: IODP={} content changed",
                        t,
                        self.name(),
                        mask.iodp
                    );
                    self.masks[index] = MaskSlot::new(mask, t)?;
                }
            },
            None => {
                let slot = MaskSlot::new(mask, t)?;
                if self.masks.len() == MAX_MASK_SLOTS {
                    self.masks.pop_front();
                }
                self.masks.push_back(slot);
                debug!("{} - {}: new mask IODP={}", t, self.name(), mask.iodp);
            },
        }
        Ok(())
    }

    fn apply_fast(
        &mut self,
        iodp: u8,
        iodf: u8,
        offset: usize,
        corrections: &[FastCorrection],
        t: Epoch,
    ) -> Option<Discard> {
        let Some(index) = self.mask_index(iodp) else {
            return Some(Discard::UnknownIodp(iodp));
        };

        for (i, fc) in corrections.iter().enumerate() {
            let Some(sv) = self.masks[index].at(offset + i).map(|sat| sat.sv) else {
                break;
            };

            if udrei_forbids_use(fc.udrei) {
                self.escalate(sv, fc.udrei);
                continue;
            }

            self.deescalate(sv);

            if let Some(sat) = self.masks[index].at_mut(offset + i) {
                sat.fast.update(fc.prc_m, fc.udrei, iodf, t);
                sat.udrei = Some(Stamped::new(fc.udrei, t));
            }
        }

        self.fast_iodp = Some(iodp);
        None
    }

    fn apply_integrity(&mut self, info: &IntegrityInfo, t: Epoch) -> Option<Discard> {
        let Some(index) = self.active_mask_index() else {
            return Some(Discard::NoMask);
        };

        let updates = self.masks[index]
            .satellites
            .iter()
            .zip(info.udrei.iter())
            .enumerate()
            .filter_map(|(position, (sat, udrei))| {
                let iodf = *info.iodf.get(position / FAST_CORRECTIONS_PER_BLOCK)?;
                let latest_iodf = sat.fast.latest().map(|cell| cell.iodf);
                if iodf == 3 || latest_iodf == Some(iodf) {
                    Some((position, sat.sv, *udrei))
                } else {
                    debug!(
                        "{} - {}: MT6 IODF={} does not match {:?}",
                        t, sat.sv, iodf, latest_iodf
                    );
                    None
                }
            })
            .collect::<Vec<_>>();

        for (position, sv, udrei) in updates {
            if udrei_forbids_use(udrei) {
                self.escalate(sv, udrei);
            } else {
                self.deescalate(sv);
                if let Some(sat) = self.masks[index].at_mut(position) {
                    sat.fast.set_udrei(udrei);
                    sat.udrei = Some(Stamped::new(udrei, t));
                }
            }
        }

        None
    }

    fn apply_degradation_factors(
        &mut self,
        deg: &FastDegradation,
        t: Epoch,
    ) -> Result<Option<Discard>, Error> {
        let Some(index) = self.mask_index(deg.iodp) else {
            return Ok(Some(Discard::UnknownIodp(deg.iodp)));
        };

        let ai = allocate(MessageType::FastDegradation, &deg.ai)?;

        self.masks[index].degradation = Some(Stamped::new(
            FastDegradation {
                system_latency_s: deg.system_latency_s,
                iodp: deg.iodp,
                ai,
            },
            t,
        ));

        Ok(None)
    }

    fn apply_long_term(
        &mut self,
        iodp: u8,
        corrections: &[LongTermCorrection],
        t: Epoch,
    ) -> Option<Discard> {
        let Some(index) = self.mask_index(iodp) else {
            return Some(Discard::UnknownIodp(iodp));
        };

        for ltc in corrections.iter() {
            let Some(position) = mask_position(ltc.mask_number) else {
                continue;
            };

            match self.masks[index].at_mut(position) {
                Some(sat) => {
                    sat.long_term = Some(Stamped::new(*ltc, t));
                },
                None => {
                    warn!(
                        "{} - {}: mask number {} out of IODP={} mask",
                        t,
                        self.name(),
                        ltc.mask_number,
                        iodp
                    );
                },
            }
        }

        None
    }

    fn apply_covariance(
        &mut self,
        iodp: u8,
        entries: &[ClockEphemerisCovariance],
        t: Epoch,
    ) -> Option<Discard> {
        let Some(index) = self.mask_index(iodp) else {
            return Some(Discard::UnknownIodp(iodp));
        };

        for cov in entries.iter() {
            if let Some(sat) = mask_position(cov.mask_number)
                .and_then(|position| self.masks[index].at_mut(position))
            {
                sat.covariance = Some(Stamped::new(*cov, t));
            }
        }

        None
    }

    fn apply_service(&mut self, service: &ServiceMessage, t: Epoch) -> Result<(), Error> {
        let regions = allocate(MessageType::ServiceMessage, &service.regions)?;

        // new issue of data: previous set is obsolete
        self.service.retain(|prev| {
            prev.value.iods == service.iods && prev.value.message_number != service.message_number
        });

        self.service.push(Stamped::new(
            ServiceMessage {
                regions,
                ..service.clone()
            },
            t,
        ));

        Ok(())
    }

    /// UDREI "Not Monitored" or "Do Not Use": the satellite is purged
    /// from every mask and excluded.
    fn escalate(&mut self, sv: SV, udrei: u8) {
        for slot in self.masks.iter_mut() {
            if let Some(sat) = slot.satellite_mut(sv) {
                sat.purge();
            }
        }

        if self.exclusions.get(&sv) != Some(&Exclusion::User)
            && self.exclusions.insert(sv, Exclusion::Udrei(udrei)).is_none()
        {
            warn!("{}: {} excluded (UDREI={})", self.name(), sv, udrei);
        }
    }

    /// Valid UDREI: lifts a UDREI exclusion, never a user exclusion
    fn deescalate(&mut self, sv: SV) {
        if matches!(self.exclusions.get(&sv), Some(Exclusion::Udrei(_))) {
            self.exclusions.remove(&sv);
            debug!("{}: {} no longer excluded", self.name(), sv);
        }
    }

    /// Drops the timed out data
    pub(crate) fn expire(&mut self, ctx: &QueryContext) {
        self.masks
            .retain(|slot| ctx.is_live(MessageType::PrnMask, slot.received_at));

        for slot in self.masks.iter_mut() {
            if let Some(deg) = &slot.degradation {
                if !ctx.is_live(MessageType::FastDegradation, deg.received_at) {
                    slot.degradation = None;
                }
            }

            for position in 0..slot.satellites.len() {
                let factor = slot.degradation_factor(position);
                let sat = &mut slot.satellites[position];

                if let Some(latest) = sat.fast.latest() {
                    if factor
                        .timeout(ctx.mode)
                        .has_expired(ctx.now - latest.received_at)
                    {
                        sat.fast.purge();
                    }
                }

                if !ctx.force_npa {
                    if let Some(udrei) = &sat.udrei {
                        if !ctx.is_live(MessageType::FastCorrections, udrei.received_at) {
                            sat.udrei = None;
                        }
                    }
                }

                if let Some(ltc) = &sat.long_term {
                    if !ctx.is_live(MessageType::LongTermCorrections, ltc.received_at) {
                        sat.long_term = None;
                    }
                }

                if let Some(cov) = &sat.covariance {
                    if !ctx.is_live(MessageType::ClockEphemerisCovariance, cov.received_at) {
                        sat.covariance = None;
                    }
                }
            }
        }

        if let Some(params) = &self.degradation {
            if !ctx.is_live(MessageType::DegradationParameters, params.received_at) {
                self.degradation = None;
            }
        }

        if let Some(nav) = &self.geo_navigation {
            if !ctx.is_live(MessageType::GeoNavigation, nav.received_at) {
                self.geo_navigation = None;
            }
        }

        self.service
            .retain(|service| ctx.is_live(MessageType::ServiceMessage, service.received_at));

        self.iono.expire(ctx.table, ctx.mode, ctx.now);
    }

    /// Live degradation parameters (MT10)
    pub(crate) fn degradation_parameters(
        &self,
        ctx: &QueryContext,
    ) -> Option<&DegradationParameters> {
        self.degradation
            .as_ref()
            .filter(|params| ctx.is_live(MessageType::DegradationParameters, params.received_at))
            .map(|params| &params.value)
    }

    /// The two most recent live masks, most recent first
    fn live_masks<'a>(
        &'a self,
        ctx: &'a QueryContext<'a>,
    ) -> impl Iterator<Item = &'a MaskSlot> + 'a {
        self.masks
            .iter()
            .rev()
            .filter(move |slot| ctx.is_live(MessageType::PrnMask, slot.received_at))
            .take(2)
    }

    /// Latest fast correction at this mask position, with the UDREI and
    /// degradation factor it would be served with. Fails with the
    /// [EntryState] of that correction when it cannot be served.
    fn fast_entry(
        slot: &MaskSlot,
        position: usize,
        ctx: &QueryContext,
    ) -> Result<LiveFastCorrection, EntryState> {
        let sat = &slot.satellites[position];

        let cell = sat.fast.latest().ok_or(EntryState::Purged)?;

        let degradation = match &slot.degradation {
            Some(deg) if ctx.is_live(MessageType::FastDegradation, deg.received_at) => {
                slot.degradation_factor(position)
            },
            _ => Default::default(),
        };

        if degradation
            .timeout(ctx.mode)
            .has_expired(ctx.now - cell.received_at)
        {
            return Err(EntryState::Stale);
        }

        let udrei = match &sat.udrei {
            Some(udrei)
                if ctx.force_npa
                    || ctx.is_live(MessageType::FastCorrections, udrei.received_at) =>
            {
                udrei.value
            },
            None if ctx.force_npa => cell.udrei,
            _ => return Err(EntryState::Stale),
        };

        Ok(LiveFastCorrection {
            sv: sat.sv,
            iodp: slot.iodp,
            cell: *cell,
            udrei,
            degradation,
            system_latency_s: slot.system_latency_s(),
        })
    }

    /// True when at least one PRN mask is live
    pub(crate) fn has_live_mask(&self, ctx: &QueryContext) -> bool {
        self.live_masks(ctx).next().is_some()
    }

    /// Most recent live fast correction of this satellite, in the
    /// current mask, else in the previous one.
    pub(crate) fn fast_correction(
        &self,
        sv: SV,
        ctx: &QueryContext,
    ) -> Result<LiveFastCorrection, Unavailable> {
        if self.exclusions.contains_key(&sv) {
            return Err(Unavailable::Excluded(sv));
        }

        let mut designated = false;

        for slot in self.live_masks(ctx) {
            let Some(position) = slot.position(sv) else {
                continue;
            };

            designated = true;

            let Ok(fast) = Self::fast_entry(slot, position, ctx) else {
                continue;
            };

            if udrei_forbids_use(fast.udrei) {
                return Err(Unavailable::Excluded(sv));
            }

            return Ok(fast);
        }

        if designated {
            Err(Unavailable::NoFastCorrection(sv))
        } else if self.masks.is_empty() {
            Err(Unavailable::NoMask)
        } else {
            Err(Unavailable::NotInMask(sv))
        }
    }

    /// [EntryState] of the fast correction of this satellite, following
    /// the rules of [Self::fast_correction]: [EntryState::Live] when one
    /// would be served, [EntryState::Stale] when the latest one timed out.
    pub(crate) fn fast_correction_state(&self, sv: SV, ctx: &QueryContext) -> EntryState {
        let mut state = EntryState::Purged;

        for slot in self.live_masks(ctx) {
            let Some(position) = slot.position(sv) else {
                continue;
            };

            match Self::fast_entry(slot, position, ctx) {
                Ok(_) => return EntryState::Live,
                Err(EntryState::Stale) => state = EntryState::Stale,
                Err(_) => {},
            }
        }

        state
    }

    /// Live long-term correction of this satellite, in the
    /// current mask, else in the previous one.
    pub(crate) fn long_term_correction(
        &self,
        sv: SV,
        ctx: &QueryContext,
    ) -> Result<LiveLongTermCorrection, Unavailable> {
        if self.exclusions.contains_key(&sv) {
            return Err(Unavailable::Excluded(sv));
        }

        self.live_masks(ctx)
            .filter_map(|slot| {
                let ltc = slot.satellite(sv)?.long_term.as_ref()?;
                if ctx.is_live(MessageType::LongTermCorrections, ltc.received_at) {
                    Some(LiveLongTermCorrection::new(sv, slot.iodp, ltc, ctx.now))
                } else {
                    None
                }
            })
            .next()
            .ok_or(Unavailable::NoLongTermCorrection(sv))
    }

    /// Live covariance (MT28) of this satellite, within this mask
    pub(crate) fn covariance(
        &self,
        sv: SV,
        iodp: u8,
        ctx: &QueryContext,
    ) -> Option<&ClockEphemerisCovariance> {
        self.mask(iodp)?
            .satellite(sv)?
            .covariance
            .as_ref()
            .filter(|cov| ctx.is_live(MessageType::ClockEphemerisCovariance, cov.received_at))
            .map(|cov| &cov.value)
    }

    /// δUDRE (MT27) that applies at this user location. Inside a region, the
    /// highest priority message applies. Outside every region, the outside
    /// indicator of the highest priority message applies.
    pub(crate) fn service_delta_udre(
        &self,
        lat_deg: f64,
        lon_deg: f64,
        ctx: &QueryContext,
    ) -> Option<f64> {
        let live = self
            .service
            .iter()
            .filter(|service| ctx.is_live(MessageType::ServiceMessage, service.received_at))
            .map(|service| &service.value)
            .collect::<Vec<_>>();

        let inside = live
            .iter()
            .filter(|service| {
                service
                    .regions
                    .iter()
                    .any(|region| region.contains(lat_deg, lon_deg))
            })
            .max_by_key(|service| service.priority);

        match inside {
            Some(service) => Some(delta_udre(service.delta_udre_inside)),
            None => live
                .iter()
                .max_by_key(|service| service.priority)
                .map(|service| delta_udre(service.delta_udre_outside)),
        }
    }
}
