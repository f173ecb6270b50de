//! Correction state store: one record per GEO plus the aggregate record
use log::{debug, error, warn};

use crate::{
    cfg::{Config, NavigationMode},
    error::{Error, Unavailable},
    geometry::{ecef_to_geodetic, line_of_sight, PiercePoint},
    integrity::{
        udre_variance_m2, AlarmState, DegradationFactor, EntryState, FltBudget, TimeoutTable,
    },
    iono::{interpolate_grid, GridInterpolation},
    message::{LongTermCorrection, Message, MessageType},
    prelude::{Duration, Epoch, TimeScale, Vector3, SV},
};

mod iono;
mod mask;
mod record;

pub use iono::{BandGrid, IonoGrid};
pub use mask::{
    FastCorrectionCell, FastCorrectionSentinel, FastHistory, MaskSlot, SatelliteCorrections,
};
pub use record::{Exclusion, GeoRecord};

use iono::GridView;
use record::QueryContext;

/// Data tagged with its reception time
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub value: T,
    pub received_at: Epoch,
}

impl<T> Stamped<T> {
    pub fn new(value: T, received_at: Epoch) -> Self {
        Self { value, received_at }
    }
}

/// Copies the variable length content of a message into storage we own,
/// reserved from the message's own entry count.
pub(crate) fn allocate<T: Clone>(message: MessageType, items: &[T]) -> Result<Vec<T>, Error> {
    let mut storage = Vec::new();
    storage.try_reserve_exact(items.len()).map_err(|_| {
        error!("{}: failed to allocate {} entries", message, items.len());
        Error::Allocation(message, items.len())
    })?;
    storage.extend_from_slice(items);
    Ok(storage)
}

/// Record being addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Aggregate of every GEO ("mixed" record)
    Aggregate,
    /// Record of this GEO
    Geo(SV),
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Aggregate => write!(f, "aggregate"),
            Self::Geo(geo) => write!(f, "{}", geo),
        }
    }
}

/// Reason why a message was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// Source GEO is alarmed
    GeoAlarm(SV),
    /// No mask with this IODP
    UnknownIodp(u8),
    /// No mask at all
    NoMask,
    /// IGP band does not exist
    InvalidBand(u8),
    /// No IGP mask for this band
    NoIgpMask(u8),
    /// IODI does not match the band mask
    IodiMismatch { band: u8, expected: u8, received: u8 },
}

impl std::fmt::Display for Discard {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::GeoAlarm(geo) => write!(f, "{} is alarmed", geo),
            Self::UnknownIodp(iodp) => write!(f, "unknown IODP={}", iodp),
            Self::NoMask => write!(f, "no PRN mask"),
            Self::InvalidBand(band) => write!(f, "invalid IGP band {}", band),
            Self::NoIgpMask(band) => write!(f, "no IGP mask for band {}", band),
            Self::IodiMismatch {
                band,
                expected,
                received,
            } => write!(
                f,
                "band {}: IODI={} does not match IODI={}",
                band, received, expected
            ),
        }
    }
}

/// What happened to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Stored,
    Discarded(Discard),
}

impl ApplyOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored)
    }
}

/// Outcome of [CorrectionDatabase::switch_geo_or_mode]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoModeSwitch {
    /// Keep on using the current GEO, in the current mode
    Keep,
    /// Use corrections from this GEO from now on
    Geo(SV),
    /// Fell back to [NavigationMode::NonPrecisionApproach]
    NonPrecisionApproach,
}

/// Live fast correction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveFastCorrection {
    pub sv: SV,
    /// IODP of the mask it was filed under
    pub iodp: u8,
    pub cell: FastCorrectionCell,
    /// Latest UDREI
    pub udrei: u8,
    pub degradation: DegradationFactor,
    /// System latency (s)
    pub system_latency_s: f64,
}

impl LiveFastCorrection {
    /// PRC (m) at `t`, range rate correction applied
    pub fn prc_at(&self, t: Epoch) -> f64 {
        self.cell.prc_at(t)
    }

    /// Time elapsed since the time of applicability (s)
    pub fn age_s(&self, t: Epoch) -> f64 {
        (t - self.cell.received_at).to_seconds()
    }
}

/// GPST seconds of day
fn seconds_of_day(t: Epoch) -> f64 {
    t.to_duration_in_time_scale(TimeScale::GPST)
        .to_seconds()
        .rem_euclid(86_400.0)
}

/// Live long-term correction, evaluated at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveLongTermCorrection {
    pub sv: SV,
    pub iodp: u8,
    pub correction: LongTermCorrection,
    pub received_at: Epoch,
    /// t - t0 (s), 0 for velocity code 0
    pub dt_s: f64,
    /// Satellite position correction (m, ECEF)
    pub position_m: Vector3<f64>,
    /// Satellite clock correction (s)
    pub clock_s: f64,
}

impl LiveLongTermCorrection {
    pub(crate) fn new(
        sv: SV,
        iodp: u8,
        stamped: &Stamped<LongTermCorrection>,
        now: Epoch,
    ) -> Self {
        let ltc = &stamped.value;
        let mut position_m = Vector3::new(ltc.dx_m, ltc.dy_m, ltc.dz_m);
        let mut clock_s = ltc.daf0_s;
        let mut dt_s = 0.0;

        if let Some(rates) = &ltc.rates {
            dt_s = seconds_of_day(now) - rates.t0_s;
            if dt_s > 43_200.0 {
                dt_s -= 86_400.0;
            } else if dt_s < -43_200.0 {
                dt_s += 86_400.0;
            }
            position_m += Vector3::new(rates.ddx_m_s, rates.ddy_m_s, rates.ddz_m_s) * dt_s;
            clock_s += rates.daf1_s_s * dt_s;
        }

        Self {
            sv,
            iodp,
            correction: *ltc,
            received_at: stamped.received_at,
            dt_s,
            position_m,
            clock_s,
        }
    }
}

/// User location and line of sight toward one satellite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOfSight {
    pub user_lat_deg: f64,
    pub user_lon_deg: f64,
    /// Unit vector from the user to the satellite (ECEF)
    pub unit_vector: Vector3<f64>,
}

impl LineOfSight {
    /// Builds [LineOfSight] from user and satellite ECEF positions (m)
    pub fn from_ecef(rx_ecef_m: &Vector3<f64>, sv_ecef_m: &Vector3<f64>) -> Self {
        let geodetic = ecef_to_geodetic(rx_ecef_m);
        Self {
            user_lat_deg: geodetic[0],
            user_lon_deg: geodetic[1],
            unit_vector: line_of_sight(rx_ecef_m, sv_ecef_m),
        }
    }
}

/// Complete correction of one satellite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatelliteCorrection {
    pub sv: SV,
    pub fast: LiveFastCorrection,
    pub long_term: LiveLongTermCorrection,
    /// Fast pseudo range correction (m) at the requested instant
    pub range_correction_m: f64,
    /// Terms of the residual error model
    pub budget: FltBudget,
    /// σ²(flt) in m²
    pub variance_m2: f64,
}

/// Ionospheric correction along one line of sight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IonoCorrection {
    pub pierce_point: PiercePoint,
    pub interpolation: GridInterpolation,
    /// Slant delay (m)
    pub slant_delay_m: f64,
    /// σ²(UIRE) in m²
    pub slant_variance_m2: f64,
}

impl IonoCorrection {
    /// Vertical delay (m) at the pierce point
    pub fn vertical_delay_m(&self) -> f64 {
        self.interpolation.vertical_delay_m
    }

    /// σ²(UIVE) in m²
    pub fn vertical_variance_m2(&self) -> f64 {
        self.interpolation.variance_m2
    }
}

/// Correction database: one [GeoRecord] per tracked GEO,
/// plus the aggregate record every message is mirrored to.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionDatabase {
    cfg: Config,
    /// Built once, shared by every record
    table: TimeoutTable,
    aggregate: GeoRecord,
    geos: Vec<GeoRecord>,
    alarms: AlarmState,
}

impl CorrectionDatabase {
    /// Builds a new [CorrectionDatabase] for this [Config]
    pub fn new(cfg: Config) -> Self {
        let table = TimeoutTable::from_config(&cfg);
        Self {
            table,
            aggregate: GeoRecord::new(None, &cfg),
            geos: Vec::with_capacity(cfg.max_geos),
            alarms: AlarmState::new(Duration::from_seconds(cfg.alarm_cooldown_s)),
            cfg,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn timeouts(&self) -> &TimeoutTable {
        &self.table
    }

    pub fn alarms(&self) -> &AlarmState {
        &self.alarms
    }

    /// [NavigationMode] in use
    pub fn mode(&self) -> NavigationMode {
        self.cfg.effective_mode()
    }

    /// Selects another [NavigationMode]. Stored data is untouched,
    /// only the time out table being consulted changes.
    pub fn set_mode(&mut self, mode: NavigationMode) {
        debug!("navigation mode: {}", mode);
        self.cfg.mode = mode;
    }

    /// Forces (or releases) NPA operations
    pub fn set_forced_npa(&mut self, forced: bool) {
        self.cfg.force_npa = forced;
    }

    /// [GeoRecord] of this [Slot]
    pub fn record(&self, slot: Slot) -> Option<&GeoRecord> {
        match slot {
            Slot::Aggregate => Some(&self.aggregate),
            Slot::Geo(geo) => self.geos.iter().find(|rec| rec.geo == Some(geo)),
        }
    }

    /// Tracked GEOs
    pub fn geos(&self) -> impl Iterator<Item = SV> + '_ {
        self.geos.iter().filter_map(|rec| rec.geo)
    }

    fn geo_index(&self, geo: SV) -> Option<usize> {
        self.geos.iter().position(|rec| rec.geo == Some(geo))
    }

    fn geo_index_or_insert(&mut self, geo: SV) -> Result<usize, Error> {
        if let Some(index) = self.geo_index(geo) {
            return Ok(index);
        }

        if self.geos.len() == self.cfg.max_geos {
            error!("cannot track {}: {} GEOs already tracked", geo, self.cfg.max_geos);
            return Err(Error::TooManyGeos(geo, self.cfg.max_geos));
        }

        debug!("now tracking {}", geo);
        self.geos.push(GeoRecord::new(Some(geo), &self.cfg));
        Ok(self.geos.len() - 1)
    }

    fn context(&self, t: Epoch) -> QueryContext<'_> {
        QueryContext {
            table: &self.table,
            mode: self.cfg.effective_mode(),
            force_npa: self.cfg.force_npa,
            now: t,
        }
    }

    /// Applies one message, received from this GEO at `t`, to the GEO
    /// record and then to the aggregate record.
    pub fn apply_message(
        &mut self,
        geo: SV,
        message: &Message,
        t: Epoch,
    ) -> Result<ApplyOutcome, Error> {
        let index = self.geo_index_or_insert(geo)?;

        if let Message::DoNotUse = message {
            error!("{} - {} alarm (Do Not Use)", t, geo);
            self.alarms.raise(geo, t);
            self.geos[index].apply(message, t, &self.cfg)?;
            self.clear_aggregate_and_source(geo);
            return Ok(ApplyOutcome::Stored);
        }

        if self.alarms.is_alarmed(geo, t) {
            debug!("{} - {} from alarmed {}", t, message.message_type(), geo);
            return Ok(ApplyOutcome::Discarded(Discard::GeoAlarm(geo)));
        }

        let outcome = self.geos[index].apply(message, t, &self.cfg)?;

        if outcome.is_stored() {
            self.mirror_to_aggregate(message, t)?;
        }

        Ok(outcome)
    }

    /// Applies a message to the aggregate record
    pub fn mirror_to_aggregate(
        &mut self,
        message: &Message,
        t: Epoch,
    ) -> Result<ApplyOutcome, Error> {
        self.aggregate.apply(message, t, &self.cfg)
    }

    /// Clears the aggregate record and the record of the GEO
    /// that caused it. Almanacs, counters and user exclusions survive.
    pub fn clear_aggregate_and_source(&mut self, geo: SV) {
        self.aggregate.clear();
        if let Some(index) = self.geo_index(geo) {
            self.geos[index].clear();
        }
    }

    /// Decides what to do when the SBAS discarded `num_discarded` of the
    /// `num_satellites` satellites in view, using corrections from `current`.
    /// When fewer than [Config::min_usable_satellites] remain, we select the
    /// next tracked GEO that is not alarmed and has a live PRN mask. If there
    /// is none, we fall back from PA to NPA. Both options are opt-in.
    pub fn switch_geo_or_mode(
        &mut self,
        current: Slot,
        num_satellites: usize,
        num_discarded: usize,
        t: Epoch,
    ) -> GeoModeSwitch {
        let usable = num_satellites.saturating_sub(num_discarded);

        if num_discarded == 0 || usable >= self.cfg.min_usable_satellites {
            return GeoModeSwitch::Keep;
        }

        if self.cfg.geo_switching {
            if let Slot::Geo(current) = current {
                let ctx = self.context(t);

                let start = self.geo_index(current).map(|i| i + 1).unwrap_or(0);
                let count = self.geos.len();

                let candidate = (0..count)
                    .map(|offset| &self.geos[(start + offset) % count])
                    .filter_map(|record| record.geo.map(|geo| (geo, record)))
                    .find(|(geo, record)| {
                        *geo != current
                            && !self.alarms.is_alarmed(*geo, t)
                            && record.has_live_mask(&ctx)
                    })
                    .map(|(geo, _)| geo);

                if let Some(geo) = candidate {
                    warn!(
                        "{} - {}/{} satellites discarded: switching from {} to {}",
                        t, num_discarded, num_satellites, current, geo
                    );
                    return GeoModeSwitch::Geo(geo);
                }
            }
        }

        if self.cfg.mode_switching && self.mode().is_precision_approach() {
            warn!(
                "{} - {}/{} satellites discarded: falling back to NPA",
                t, num_discarded, num_satellites
            );
            self.cfg.mode = NavigationMode::NonPrecisionApproach;
            return GeoModeSwitch::NonPrecisionApproach;
        }

        GeoModeSwitch::Keep
    }

    /// True when this message type was not received within its maximal
    /// update interval. Message types without update interval are never overdue.
    pub fn is_overdue(&self, slot: Slot, message: MessageType, t: Epoch) -> bool {
        let Some(interval) = self.table.update_interval(message).duration() else {
            return false;
        };

        match self.record(slot).and_then(|record| record.last_received(message)) {
            Some(last) => t - last > interval,
            None => true,
        }
    }

    /// Reports one lost message from this GEO
    pub fn message_lost(&mut self, geo: SV, t: Epoch) {
        if let Some(index) = self.geo_index(geo) {
            self.geos[index].message_lost(t, &self.cfg);
        }
    }

    /// Epoch tick: expires alarms and drops timed out data.
    /// Must run on every epoch, decimated epochs included.
    pub fn process_epoch(&mut self, t: Epoch) {
        self.alarms.expire(t);

        let ctx = QueryContext {
            table: &self.table,
            mode: self.cfg.effective_mode(),
            force_npa: self.cfg.force_npa,
            now: t,
        };

        self.aggregate.expire(&ctx);
        for record in self.geos.iter_mut() {
            record.expire(&ctx);
        }
    }

    /// Full reset, at stream start
    pub fn reset(&mut self) {
        self.aggregate.reset(&self.cfg);
        for record in self.geos.iter_mut() {
            record.reset(&self.cfg);
        }
        self.alarms.reset();
    }

    fn usable_record(&self, slot: Slot, t: Epoch) -> Result<&GeoRecord, Unavailable> {
        if let Slot::Geo(geo) = slot {
            if self.alarms.is_alarmed(geo, t) {
                return Err(Unavailable::GeoAlarm(geo));
            }
        }

        self.record(slot).ok_or(match slot {
            Slot::Geo(geo) => Unavailable::UnknownGeo(geo),
            Slot::Aggregate => Unavailable::NoMask,
        })
    }

    /// Most recent live fast correction of this satellite
    pub fn fast_correction(
        &self,
        slot: Slot,
        sv: SV,
        t: Epoch,
    ) -> Result<LiveFastCorrection, Unavailable> {
        self.usable_record(slot, t)?
            .fast_correction(sv, &self.context(t))
    }

    /// [EntryState] of the latest fast correction of this satellite.
    /// Only [EntryState::Live] data is served by [Self::fast_correction].
    pub fn fast_correction_state(&self, slot: Slot, sv: SV, t: Epoch) -> EntryState {
        match self.record(slot) {
            Some(record) => record.fast_correction_state(sv, &self.context(t)),
            None => EntryState::Purged,
        }
    }

    /// Live long-term correction of this satellite, evaluated at `t`
    pub fn long_term_correction(
        &self,
        slot: Slot,
        sv: SV,
        t: Epoch,
    ) -> Result<LiveLongTermCorrection, Unavailable> {
        self.usable_record(slot, t)?
            .long_term_correction(sv, &self.context(t))
    }

    /// Fast and long-term corrections of this satellite, with their σ²(flt)
    pub fn satellite_correction(
        &self,
        slot: Slot,
        sv: SV,
        t: Epoch,
        los: &LineOfSight,
    ) -> Result<SatelliteCorrection, Unavailable> {
        let record = self.usable_record(slot, t)?;
        let ctx = self.context(t);

        let fast = record.fast_correction(sv, &ctx)?;
        let long_term = record.long_term_correction(sv, &ctx)?;

        let sigma2_udre = udre_variance_m2(fast.udrei).ok_or(Unavailable::Excluded(sv))?;

        let params = record.degradation_parameters(&ctx);

        if params.is_none() && ctx.mode.is_precision_approach() {
            return Err(Unavailable::MissingDegradationParameters);
        }

        let age_s = fast.age_s(t);

        let delta_udre = match record.covariance(sv, fast.iodp, &ctx) {
            Some(cov) => cov.delta_udre(
                &los.unit_vector,
                params.map(|p| p.c_covariance_m).unwrap_or(0.0),
            ),
            None => record
                .service_delta_udre(los.user_lat_deg, los.user_lon_deg, &ctx)
                .unwrap_or(1.0),
        };

        let mut budget = FltBudget {
            sigma_udre_m: sigma2_udre.sqrt(),
            delta_udre,
            ..Default::default()
        };

        if let Some(params) = params {
            budget.eps_fc_m = fast.degradation.eps_fc(age_s, fast.system_latency_s);

            budget.eps_rrc_m =
                params.eps_rrc(fast.cell.rrc_basis, &fast.degradation, ctx.mode, age_s);

            budget.eps_ltc_m = if long_term.correction.velocity_code() == 1 {
                params.eps_ltc_v1(long_term.dt_s)
            } else {
                params.eps_ltc_v0((t - long_term.received_at).to_seconds())
            };

            if !ctx.mode.is_precision_approach() {
                let fast_stale_in_pa = fast
                    .degradation
                    .timeout(NavigationMode::PrecisionApproach)
                    .has_expired(t - fast.cell.received_at);

                let long_term_stale_in_pa = !self.table.is_live(
                    MessageType::LongTermCorrections,
                    NavigationMode::PrecisionApproach,
                    long_term.received_at,
                    t,
                );

                if fast_stale_in_pa || long_term_stale_in_pa {
                    budget.eps_er_m = params.c_er_m;
                }
            }
        }

        let variance_m2 = budget.variance_m2(params.is_some_and(|p| p.rss_udre));

        Ok(SatelliteCorrection {
            sv,
            range_correction_m: fast.prc_at(t),
            fast,
            long_term,
            budget,
            variance_m2,
        })
    }

    /// [PiercePoint] of this line of sight, through the configured shell
    pub fn pierce_point(
        &self,
        rx_ecef_m: &Vector3<f64>,
        sv_ecef_m: &Vector3<f64>,
    ) -> Result<PiercePoint, Unavailable> {
        PiercePoint::from_ecef(rx_ecef_m, sv_ecef_m, self.cfg.iono_shell_height_m)
    }

    /// Ionospheric correction at this pierce point
    pub fn iono_correction(
        &self,
        slot: Slot,
        pierce_point: &PiercePoint,
        t: Epoch,
    ) -> Result<IonoCorrection, Unavailable> {
        let record = self.usable_record(slot, t)?;
        let ctx = self.context(t);

        let degradation = record.degradation_parameters(&ctx);

        if degradation.is_none() && ctx.mode.is_precision_approach() {
            return Err(Unavailable::MissingDegradationParameters);
        }

        let view = GridView {
            grid: record.iono(),
            table: &self.table,
            mode: ctx.mode,
            now: t,
            degradation,
        };

        let interpolation = interpolate_grid(&view, pierce_point.lat_deg, pierce_point.lon_deg)?;

        Ok(IonoCorrection {
            pierce_point: *pierce_point,
            slant_delay_m: pierce_point.slant_delay_m(interpolation.vertical_delay_m),
            slant_variance_m2: pierce_point.slant_variance_m2(interpolation.variance_m2),
            interpolation,
        })
    }
}
