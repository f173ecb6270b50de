mod alarm;
mod codec;
mod corrections;
mod timeouts;

use log::LevelFilter;
use std::{str::FromStr, sync::Once};

use crate::{
    message::{FastCorrection, FastCorrections, IgpDelay, IgpMask, IonoDelays, Message, PrnMask},
    prelude::{Constellation, Epoch, SV},
};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

pub fn t0() -> Epoch {
    Epoch::from_str("2020-06-25T00:00:00 GPST").unwrap()
}

pub fn gps(prn: u8) -> SV {
    SV::new(Constellation::GPS, prn)
}

pub fn geo(prn: u8) -> SV {
    SV::new(Constellation::SBAS, prn)
}

/// MT1 designating GPS PRN 1 to `n`
pub fn gps_mask(iodp: u8, n: u8) -> Message {
    Message::PrnMask(PrnMask::new(iodp, (1..=n).map(gps).collect()))
}

/// MT2 (first block) with these (PRC, UDREI) pairs
pub fn fast_corrections(iodp: u8, iodf: u8, corrections: &[(f64, u8)]) -> Message {
    Message::FastCorrections(FastCorrections {
        block: 0,
        iodf,
        iodp,
        corrections: corrections
            .iter()
            .map(|(prc_m, udrei)| FastCorrection::new(*prc_m, *udrei))
            .collect(),
    })
}

/// MT18 designating every IGP of this band
pub fn full_igp_mask(band: u8, iodi: u8) -> Message {
    Message::IgpMask(IgpMask {
        num_bands: 1,
        band,
        iodi,
        igps: (1..=201).collect(),
    })
}

/// MT26 messages providing the same delay to every IGP of this band
pub fn uniform_iono_delays(band: u8, iodi: u8, delay_m: f64, givei: u8) -> Vec<Message> {
    (0..14)
        .map(|block| {
            Message::IonoDelays(IonoDelays {
                band,
                block,
                iodi,
                delays: vec![IgpDelay::new(delay_m, givei); 15],
            })
        })
        .collect()
}
