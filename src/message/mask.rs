use crate::{
    constants::MAX_MASK_SATELLITES,
    prelude::{Constellation, SV},
};

/// PRN Mask (MT1): designates up to 51 satellites.
/// Every correction message refers to satellites
/// through their position in this mask.
#[derive(Debug, Clone, PartialEq)]
pub struct PrnMask {
    /// Issue Of Data PRN (0..=3)
    pub iodp: u8,
    /// Designated satellites, in mask order
    pub satellites: Vec<SV>,
}

impl PrnMask {
    /// Builds a new [PrnMask]. Satellites past the 51st are dropped.
    pub fn new(iodp: u8, mut satellites: Vec<SV>) -> Self {
        satellites.truncate(MAX_MASK_SATELLITES);
        Self {
            iodp: iodp & 0x03,
            satellites,
        }
    }

    /// Builds a [PrnMask] from the raw 210 bit mask content, expressed
    /// as the list of PRN numbers whose bit is set (1..=210).
    /// Spare and unknown numbers are dropped.
    pub fn from_mask_numbers(iodp: u8, numbers: &[u8]) -> Self {
        let satellites = numbers
            .iter()
            .filter_map(|n| sv_from_mask_number(*n))
            .collect();
        Self::new(iodp, satellites)
    }

    /// Position of this satellite within the mask
    pub fn position(&self, sv: SV) -> Option<usize> {
        self.satellites.iter().position(|s| *s == sv)
    }
}

/// Converts a PRN mask number into a satellite:
/// 1-37 GPS, 38-61 Glonass (slot + 37), 120-158 SBAS.
pub fn sv_from_mask_number(number: u8) -> Option<SV> {
    match number {
        1..=37 => Some(SV::new(Constellation::GPS, number)),
        38..=61 => Some(SV::new(Constellation::Glonass, number - 37)),
        120..=158 => Some(SV::new(Constellation::SBAS, number - 100)),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::{sv_from_mask_number, PrnMask};
    use crate::prelude::{Constellation, SV};

    #[test]
    fn mask_numbers() {
        assert_eq!(sv_from_mask_number(1), Some(SV::new(Constellation::GPS, 1)));
        assert_eq!(sv_from_mask_number(37), Some(SV::new(Constellation::GPS, 37)));
        assert_eq!(
            sv_from_mask_number(38),
            Some(SV::new(Constellation::Glonass, 1))
        );
        assert_eq!(
            sv_from_mask_number(123),
            Some(SV::new(Constellation::SBAS, 23))
        );
        assert_eq!(sv_from_mask_number(0), None);
        assert_eq!(sv_from_mask_number(100), None);
        assert_eq!(sv_from_mask_number(200), None);

        let mask = PrnMask::from_mask_numbers(5, &[3, 12, 62, 40]);
        assert_eq!(mask.iodp, 1);
        assert_eq!(mask.satellites.len(), 3);
        assert_eq!(mask.position(SV::new(Constellation::Glonass, 3)), Some(2));
        assert_eq!(mask.position(SV::new(Constellation::GPS, 4)), None);
    }
}
