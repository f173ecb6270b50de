//! Corrections filed under one PRN mask (IODP)
use crate::{
    constants::MAX_FAST_CORRECTIONS,
    error::Error,
    integrity::{DegradationFactor, RangeRateBasis},
    message::{ClockEphemerisCovariance, FastDegradation, LongTermCorrection, MessageType, PrnMask},
    prelude::{Epoch, SV},
    store::{allocate, Stamped},
};

/// One fast correction, as stored in the history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastCorrectionCell {
    /// Pseudo range correction (m)
    pub prc_m: f64,
    pub udrei: u8,
    pub iodf: u8,
    /// Reception time, time of applicability of this correction
    pub received_at: Epoch,
    /// Range rate correction (m/s), when it could be derived
    /// from the previous correction
    pub rrc_m_s: Option<f64>,
    /// Corrections the range rate was derived from
    pub rrc_basis: Option<RangeRateBasis>,
}

/// Sentinel values a purged fast correction reads as
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastCorrectionSentinel {
    pub prc_m: f64,
    pub udrei: i8,
    pub iodf: i8,
}

impl FastCorrectionCell {
    /// Values of a purged (or never received) cell
    pub fn sentinel() -> FastCorrectionSentinel {
        FastCorrectionSentinel {
            prc_m: 9999.0,
            udrei: -1,
            iodf: -1,
        }
    }

    /// PRC (m) propagated to `t` using the range rate correction
    pub fn prc_at(&self, t: Epoch) -> f64 {
        let dt = (t - self.received_at).to_seconds();
        self.prc_m + self.rrc_m_s.unwrap_or(0.0) * dt
    }
}

/// Ring buffer of the most recent fast corrections of one satellite
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FastHistory {
    cells: [Option<FastCorrectionCell>; MAX_FAST_CORRECTIONS],
    len: usize,
    /// Next write position
    position: usize,
}

/// What a fast correction did to the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FastUpdate {
    /// New IODF: new entry
    Pushed,
    /// Same IODF: UDREI refreshed only
    Refreshed,
}

impl FastHistory {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Next write position in the ring
    pub fn position(&self) -> usize {
        self.position
    }

    fn index(&self, age: usize) -> Option<usize> {
        if age >= self.len {
            None
        } else {
            Some((self.position + MAX_FAST_CORRECTIONS - 1 - age) % MAX_FAST_CORRECTIONS)
        }
    }

    /// Most recent correction
    pub fn latest(&self) -> Option<&FastCorrectionCell> {
        self.index(0).and_then(|i| self.cells[i].as_ref())
    }

    /// Correction received before the most recent one
    pub fn previous(&self) -> Option<&FastCorrectionCell> {
        self.index(1).and_then(|i| self.cells[i].as_ref())
    }

    /// Corrections, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &FastCorrectionCell> {
        (0..self.len)
            .filter_map(|age| self.index(age))
            .filter_map(|i| self.cells[i].as_ref())
    }

    /// Stores a new fast correction. A correction that repeats the latest
    /// IODF (other than 3) only refreshes the UDREI.
    pub(crate) fn update(&mut self, prc_m: f64, udrei: u8, iodf: u8, t: Epoch) -> FastUpdate {
        let (rrc_m_s, rrc_basis) = match self.latest_mut() {
            Some(latest) if latest.iodf == iodf && iodf != 3 => {
                latest.udrei = udrei;
                return FastUpdate::Refreshed;
            },
            Some(latest) => {
                let dt_s = (t - latest.received_at).to_seconds();
                if dt_s > 0.0 {
                    (
                        Some((prc_m - latest.prc_m) / dt_s),
                        Some(RangeRateBasis {
                            iodf,
                            previous_iodf: latest.iodf,
                            dt_s,
                        }),
                    )
                } else {
                    (None, None)
                }
            },
            None => (None, None),
        };

        self.cells[self.position] = Some(FastCorrectionCell {
            prc_m,
            udrei,
            iodf,
            received_at: t,
            rrc_m_s,
            rrc_basis,
        });

        self.position = (self.position + 1) % MAX_FAST_CORRECTIONS;
        self.len = (self.len + 1).min(MAX_FAST_CORRECTIONS);

        FastUpdate::Pushed
    }

    fn latest_mut(&mut self) -> Option<&mut FastCorrectionCell> {
        let index = self.index(0)?;
        self.cells[index].as_mut()
    }

    /// Refreshes the UDREI of the most recent correction
    pub(crate) fn set_udrei(&mut self, udrei: u8) {
        if let Some(latest) = self.latest_mut() {
            latest.udrei = udrei;
        }
    }

    /// Purges the whole history
    pub(crate) fn purge(&mut self) {
        self.cells = [None; MAX_FAST_CORRECTIONS];
        self.len = 0;
        self.position = 0;
    }
}

/// Corrections of one satellite of the mask
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteCorrections {
    pub sv: SV,
    pub fast: FastHistory,
    /// Latest UDREI (MT2-5, MT24 or MT6)
    pub udrei: Option<Stamped<u8>>,
    pub long_term: Option<Stamped<LongTermCorrection>>,
    pub covariance: Option<Stamped<ClockEphemerisCovariance>>,
}

impl SatelliteCorrections {
    fn new(sv: SV) -> Self {
        Self {
            sv,
            fast: FastHistory::default(),
            udrei: None,
            long_term: None,
            covariance: None,
        }
    }

    /// Purges fast and long-term data
    pub(crate) fn purge(&mut self) {
        self.fast.purge();
        self.udrei = None;
        self.long_term = None;
    }
}

/// Corrections filed under one PRN mask
#[derive(Debug, Clone, PartialEq)]
pub struct MaskSlot {
    pub iodp: u8,
    /// Latest reception of this mask
    pub received_at: Epoch,
    pub satellites: Vec<SatelliteCorrections>,
    /// Degradation factors (MT7) for this mask
    pub degradation: Option<Stamped<FastDegradation>>,
}

impl MaskSlot {
    pub(crate) fn new(mask: &PrnMask, t: Epoch) -> Result<Self, Error> {
        let designated = allocate(MessageType::PrnMask, &mask.satellites)?;
        Ok(Self {
            iodp: mask.iodp,
            received_at: t,
            satellites: designated.into_iter().map(SatelliteCorrections::new).collect(),
            degradation: None,
        })
    }

    /// Corrections at this mask position
    pub fn at(&self, position: usize) -> Option<&SatelliteCorrections> {
        self.satellites.get(position)
    }

    pub(crate) fn at_mut(&mut self, position: usize) -> Option<&mut SatelliteCorrections> {
        self.satellites.get_mut(position)
    }

    /// Corrections of this satellite
    pub fn satellite(&self, sv: SV) -> Option<&SatelliteCorrections> {
        self.satellites.iter().find(|sat| sat.sv == sv)
    }

    pub(crate) fn satellite_mut(&mut self, sv: SV) -> Option<&mut SatelliteCorrections> {
        self.satellites.iter_mut().find(|sat| sat.sv == sv)
    }

    /// Mask position of this satellite
    pub fn position(&self, sv: SV) -> Option<usize> {
        self.satellites.iter().position(|sat| sat.sv == sv)
    }

    /// Degradation factor of the satellite at this mask position.
    /// The most stringent factor applies when MT7 is missing.
    pub fn degradation_factor(&self, position: usize) -> DegradationFactor {
        self.degradation
            .as_ref()
            .and_then(|deg| deg.value.ai.get(position))
            .map(|ai| DegradationFactor::from_indicator(*ai))
            .unwrap_or_default()
    }

    /// System latency (s), 0 when MT7 is missing
    pub fn system_latency_s(&self) -> f64 {
        self.degradation
            .as_ref()
            .map(|deg| deg.value.system_latency_s as f64)
            .unwrap_or(0.0)
    }
}
