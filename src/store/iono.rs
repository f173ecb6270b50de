//! Ionospheric grid state of one GEO record
use log::debug;

use crate::{
    cfg::NavigationMode,
    constants::NUM_IGP_BANDS,
    error::Error,
    integrity::{iono_grid_variance_m2, TimeoutTable},
    iono::{locate_igp, GridSource, IgpSample},
    message::{DegradationParameters, IgpDelay, IgpMask, IonoDelays, MessageType},
    prelude::Epoch,
    store::{allocate, Discard, Stamped},
};

/// IGP mask and delays of one band
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BandGrid {
    pub mask: Option<Stamped<IgpMask>>,
    /// Delays, in mask order
    delays: Vec<Option<Stamped<IgpDelay>>>,
}

impl BandGrid {
    /// Delay of the IGP at this mask position
    pub fn delay(&self, position: usize) -> Option<&Stamped<IgpDelay>> {
        self.delays.get(position).and_then(|d| d.as_ref())
    }

    /// Number of IGPs with a delay
    pub fn num_delays(&self) -> usize {
        self.delays.iter().flatten().count()
    }
}

/// Ionospheric grid: IGP masks (MT18) and delays (MT26), per band
#[derive(Debug, Clone, PartialEq)]
pub struct IonoGrid {
    bands: Vec<BandGrid>,
}

impl Default for IonoGrid {
    fn default() -> Self {
        Self {
            bands: vec![BandGrid::default(); NUM_IGP_BANDS],
        }
    }
}

impl IonoGrid {
    pub fn band(&self, band: u8) -> Option<&BandGrid> {
        self.bands.get(band as usize)
    }

    /// Stores an IGP mask. A new IODI invalidates the delays of that band.
    pub(crate) fn apply_mask(
        &mut self,
        mask: &IgpMask,
        t: Epoch,
    ) -> Result<Option<Discard>, Error> {
        let Some(grid) = self.bands.get_mut(mask.band as usize) else {
            return Ok(Some(Discard::InvalidBand(mask.band)));
        };

        let igps = allocate(MessageType::IgpMask, &mask.igps)?;

        let same_issue = grid
            .mask
            .as_ref()
            .is_some_and(|prev| prev.value.iodi == mask.iodi && prev.value.igps == igps);

        if !same_issue {
            let mut delays = Vec::new();
            delays
                .try_reserve_exact(igps.len())
                .map_err(|_| Error::Allocation(MessageType::IgpMask, igps.len()))?;
            delays.resize(igps.len(), None);
            grid.delays = delays;
            debug!("{} - band {} IODI={}: new IGP mask", t, mask.band, mask.iodi);
        }

        grid.mask = Some(Stamped::new(
            IgpMask {
                num_bands: mask.num_bands,
                band: mask.band,
                iodi: mask.iodi,
                igps,
            },
            t,
        ));

        Ok(None)
    }

    /// Stores IGP delays, that must refer to the current mask of that band
    pub(crate) fn apply_delays(&mut self, delays: &IonoDelays, t: Epoch) -> Option<Discard> {
        let Some(grid) = self.bands.get_mut(delays.band as usize) else {
            return Some(Discard::InvalidBand(delays.band));
        };

        let Some(mask) = &grid.mask else {
            return Some(Discard::NoIgpMask(delays.band));
        };

        if mask.value.iodi != delays.iodi {
            return Some(Discard::IodiMismatch {
                band: delays.band,
                expected: mask.value.iodi,
                received: delays.iodi,
            });
        }

        let offset = delays.mask_offset();

        for (i, delay) in delays.delays.iter().enumerate() {
            if let Some(cell) = grid.delays.get_mut(offset + i) {
                *cell = Some(Stamped::new(*delay, t));
            }
        }

        None
    }

    /// Drops the masks and delays that timed out
    pub(crate) fn expire(&mut self, table: &TimeoutTable, mode: NavigationMode, now: Epoch) {
        for grid in self.bands.iter_mut() {
            if let Some(mask) = &grid.mask {
                if !table.is_live(MessageType::IgpMask, mode, mask.received_at, now) {
                    grid.mask = None;
                    grid.delays.clear();
                }
            }
            for delay in grid.delays.iter_mut() {
                let expired = delay.as_ref().is_some_and(|stamped| {
                    !table.is_live(MessageType::IonoDelays, mode, stamped.received_at, now)
                });
                if expired {
                    *delay = None;
                }
            }
        }
    }

    /// Live, monitored value of this IGP, in the first band
    /// (regular, then polar) that provides one.
    fn sample(&self, lat_deg: f64, lon_deg: f64, view: &GridView) -> Option<IgpSample> {
        locate_igp(lat_deg, lon_deg)
            .locations()
            .find_map(|location| {
                let grid = self.band(location.band)?;
                let mask = grid.mask.as_ref()?;

                if !view.is_live(MessageType::IgpMask, mask.received_at) {
                    return None;
                }

                let position = mask.value.igps.iter().position(|igp| *igp == location.igp)?;
                let delay = grid.delay(position)?;

                if !view.is_live(MessageType::IonoDelays, delay.received_at) {
                    return None;
                }

                let elapsed_s = (view.now - delay.received_at).to_seconds();
                let variance_m2 =
                    iono_grid_variance_m2(delay.value.givei, elapsed_s, view.degradation)?;

                Some(IgpSample::new(delay.value.vertical_delay_m, variance_m2))
            })
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

/// [IonoGrid] as seen at one instant, in one navigation mode
pub(crate) struct GridView<'a> {
    pub grid: &'a IonoGrid,
    pub table: &'a TimeoutTable,
    pub mode: NavigationMode,
    pub now: Epoch,
    pub degradation: Option<&'a DegradationParameters>,
}

impl GridView<'_> {
    fn is_live(&self, message: MessageType, received_at: Epoch) -> bool {
        self.table.is_live(message, self.mode, received_at, self.now)
    }
}

impl GridSource for GridView<'_> {
    fn igp_sample(&self, lat_deg: f64, lon_deg: f64) -> Option<IgpSample> {
        self.grid.sample(lat_deg, lon_deg, self)
    }
}
