//! Bit level primitives used while a raw SBAS frame is being decoded.
//! Bits are handled MSB first, either as `bool` slices or as text made
//! of '0' and '1'.
use crate::error::Error;

/// CRC-24Q generator polynomial (25 bits)
pub const CRC24Q_POLYNOMIAL: u32 = 0x0186_4CFB;

/// Data bits of one SBAS frame: preamble, message type and payload
pub const FRAME_DATA_BITS: usize = 226;

/// Parity bits of one SBAS frame
pub const FRAME_PARITY_BITS: usize = 24;

/// Total SBAS frame length
pub const FRAME_BITS: usize = FRAME_DATA_BITS + FRAME_PARITY_BITS;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Letter case used when emitting hexadecimal text
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum LetterCase {
    #[default]
    Upper,
    Lower,
}

/// Runs `bits` through the CRC-24Q register, one bit at a time.
/// The buffer must already be zero padded to its fixed length:
/// this does not check the semantic message length.
/// Running a complete frame (data followed by its parity) returns 0.
pub fn crc24q(bits: &[bool]) -> u32 {
    let mut crc = 0_u32;
    for bit in bits {
        crc <<= 1;
        if *bit {
            crc |= 1;
        }
        if crc & 0x0100_0000 > 0 {
            crc ^= CRC24Q_POLYNOMIAL;
        }
    }
    crc & 0x00FF_FFFF
}

/// Computes the 24 parity bits of `data`
pub fn crc24q_parity(data: &[bool]) -> u32 {
    let mut padded = Vec::with_capacity(data.len() + FRAME_PARITY_BITS);
    padded.extend_from_slice(data);
    padded.resize(data.len() + FRAME_PARITY_BITS, false);
    crc24q(&padded)
}

/// Returns true when `frame` (data and parity) passes the parity check
pub fn check_crc24q(frame: &[bool]) -> bool {
    frame.len() > FRAME_PARITY_BITS && crc24q(frame) == 0
}

/// Parses text made of '0' and '1'
pub fn bits_from_str(s: &str) -> Result<Vec<bool>, Error> {
    s.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            c => Err(Error::InvalidBinaryDigit(c)),
        })
        .collect()
}

/// Formats bits as '0' and '1' text
pub fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

/// Transcodes binary text to hexadecimal text. Input that is not a
/// multiple of 4 bits is zero padded on the right.
pub fn binary_to_hex(bits: &str, case: LetterCase) -> Result<String, Error> {
    let bits = bits_from_str(bits)?;
    let mut hex = String::with_capacity(bits.len().div_ceil(4));

    for nibble in bits.chunks(4) {
        let value = (0..4).fold(0_u32, |acc, i| {
            (acc << 1) | u32::from(nibble.get(i).copied().unwrap_or(false))
        });

        let digit = HEX_DIGITS[value as usize] as char;

        hex.push(match case {
            LetterCase::Upper => digit,
            LetterCase::Lower => digit.to_ascii_lowercase(),
        });
    }

    Ok(hex)
}

/// Transcodes hexadecimal text (any letter case) to binary text
pub fn hex_to_binary(hex: &str) -> Result<String, Error> {
    let mut bits = String::with_capacity(hex.len() * 4);
    for c in hex.chars() {
        let value = c.to_digit(16).ok_or(Error::InvalidHexDigit(c))?;
        bits.push_str(&format!("{:04b}", value));
    }
    Ok(bits)
}

/// Decodes a two's complement number. The sign bit is the first character,
/// `bits` must be exactly the field width: no sign extension takes place.
pub fn twos_complement(bits: &str) -> Result<i64, Error> {
    let bits = bits_from_str(bits)?;

    let (sign, magnitude) = bits.split_first().ok_or(Error::EmptyBitString)?;

    if bits.len() > 64 {
        return Err(Error::BitWidth(bits.len()));
    }

    let value = magnitude
        .iter()
        .fold(0_u64, |acc, b| (acc << 1) | u64::from(*b));

    if *sign {
        let width = magnitude.len();
        let mask = if width == 0 { 0 } else { u64::MAX >> (64 - width) };
        let complement = !value & mask;
        Ok(-((complement as i128) + 1) as i64)
    } else {
        Ok(value as i64)
    }
}
