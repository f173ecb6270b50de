use rand::{prelude::*, rngs::SmallRng, SeedableRng};

use crate::{
    codec::{FRAME_BITS, FRAME_DATA_BITS, FRAME_PARITY_BITS},
    prelude::{
        binary_to_hex, bits_to_string, check_crc24q, crc24q_parity, hex_to_binary, LetterCase,
    },
    tests::init_logger,
};

fn random_frame(rng: &mut SmallRng) -> Vec<bool> {
    let mut frame = (0..FRAME_DATA_BITS)
        .map(|_| rng.random_bool(0.5))
        .collect::<Vec<_>>();

    let parity = crc24q_parity(&frame);

    for i in (0..FRAME_PARITY_BITS).rev() {
        frame.push((parity >> i) & 0x01 > 0);
    }

    frame
}

#[test]
fn crc24q_bit_flips() {
    init_logger();

    let mut rng = SmallRng::seed_from_u64(0x5BA5);

    for _ in 0..100 {
        let mut frame = random_frame(&mut rng);
        assert_eq!(frame.len(), FRAME_BITS);
        assert!(check_crc24q(&frame));

        let bit = rng.random_range(0..FRAME_BITS);
        frame[bit] = !frame[bit];
        assert!(!check_crc24q(&frame), "bit #{} flip not detected", bit);

        // burst errors up to 24 bits are always detected
        frame[bit] = !frame[bit];
        let start = rng.random_range(0..FRAME_BITS - FRAME_PARITY_BITS);
        let len = rng.random_range(1..=FRAME_PARITY_BITS);
        frame[start] = !frame[start];
        if len > 1 {
            let end = start + len - 1;
            frame[end] = !frame[end];
        }
        assert!(!check_crc24q(&frame), "burst [{}; {}] not detected", start, len);
    }
}

#[test]
fn frame_hex_transcoding() {
    init_logger();

    let mut rng = SmallRng::seed_from_u64(0);
    let frame = random_frame(&mut rng);

    let bits = bits_to_string(&frame);
    let hex = binary_to_hex(&bits, LetterCase::Lower).unwrap();

    // 250 bits: last nibble is padded
    assert_eq!(hex.len(), 63);

    let back = hex_to_binary(&hex).unwrap();
    assert_eq!(&back[..FRAME_BITS], bits);
    assert_eq!(&back[FRAME_BITS..], "00");
}
