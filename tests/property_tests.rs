//! Property-based tests for the Genesis decoders
//!
//! These tests use randomized inputs to check that decoding never panics and
//! that each format's structural guarantees hold across a wide range of
//! streams.

mod common;

use common::{kosinski_encode, nemesis_bitstream_len, nemesis_stream};
use genesis_decomp::{
    dcm, decompress, enigma, kosinski, nemesis, saxman, ByteSource, DecodeOptions, Format,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_decoding_never_panics(data in prop::collection::vec(any::<u8>(), 0..1000)) {
        // Random bytes are rarely a valid stream, but every failure must be an error
        let options = DecodeOptions::default().with_max_output(0x4000);
        for format in Format::ALL {
            let _ = decompress(format, &data, &options);
        }
    }
}

proptest! {
    #[test]
    fn test_decoding_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let options = DecodeOptions::default().with_max_output(0x4000);
        for format in Format::ALL {
            let first = decompress(format, &data, &options);
            let second = decompress(format, &data, &options);
            prop_assert_eq!(format!("{:?}", first), format!("{:?}", second));
        }
    }
}

proptest! {
    #[test]
    fn test_dcm_doubles_length(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        prop_assert_eq!(dcm::decompress(&data).len(), data.len() * 2);
    }
}

proptest! {
    #[test]
    fn test_kosinski_round_trip(data in prop::collection::vec(0u8..8, 0..2048)) {
        // A small alphabet produces plenty of copies of every kind
        let stream = kosinski_encode(&data);
        prop_assert_eq!(kosinski::decompress(&stream).unwrap(), data);
    }
}

proptest! {
    #[test]
    fn test_kosinski_bounded_never_overruns(
        data in prop::collection::vec(any::<u8>(), 0..512),
        size in 0usize..256
    ) {
        let mut buf = vec![0u8; size];
        let outcome = kosinski::decompress_into(&mut ByteSource::new(&data), &mut buf);

        prop_assert!(outcome.written <= size);
        prop_assert!(outcome.consumed <= data.len());
        prop_assert_eq!(outcome.success, outcome.error.is_none());
    }
}

proptest! {
    #[test]
    fn test_kosinski_bounded_matches_unbounded(
        data in prop::collection::vec(0u8..4, 0..1024),
        slack in 0usize..64
    ) {
        let stream = kosinski_encode(&data);
        let mut buf = vec![0u8; data.len() + slack];
        let outcome = kosinski::decompress_into(&mut ByteSource::new(&stream), &mut buf);

        prop_assert!(outcome.success);
        prop_assert_eq!(&buf[..outcome.written], &data[..]);
    }
}

fn nemesis_entries() -> impl Strategy<Value = [(u8, u8); 6]> {
    prop::array::uniform6((0u8..16, 1u8..=8))
}

proptest! {
    #[test]
    fn test_nemesis_length_is_tile_count_times_32(
        tiles in 1u16..8,
        xor in any::<bool>(),
        entries in nemesis_entries(),
        seed in prop::collection::vec(any::<u8>(), 1..64)
    ) {
        let bitstream: Vec<u8> = seed
            .iter()
            .cycle()
            .take(nemesis_bitstream_len(tiles))
            .copied()
            .collect();
        let stream = nemesis_stream(tiles, xor, entries, &bitstream);

        prop_assert_eq!(nemesis::tile_count(&stream).unwrap(), tiles);
        let out = nemesis::decompress(&stream).unwrap();
        prop_assert_eq!(out.len(), tiles as usize * 32);
    }
}

proptest! {
    #[test]
    fn test_enigma_art_tile_is_additive(
        data in prop::collection::vec(any::<u8>(), 0..256),
        art_tile in any::<u16>()
    ) {
        let plain = enigma::decompress_words(&data, &DecodeOptions::default());
        let biased = enigma::decompress_words(&data, &DecodeOptions::default().with_art_tile(art_tile));

        match (plain, biased) {
            (Ok(plain), Ok(biased)) => {
                let expected: Vec<u16> = plain.iter().map(|w| w.wrapping_add(art_tile)).collect();
                prop_assert_eq!(biased, expected);
            }
            (Err(_), Err(_)) => {}
            (plain, biased) => prop_assert!(false, "{:?} vs {:?}", plain, biased),
        }
    }
}

proptest! {
    #[test]
    fn test_saxman_never_reads_past_declared_size(
        payload in prop::collection::vec(any::<u8>(), 0..512),
        trailing in prop::collection::vec(any::<u8>(), 0..32)
    ) {
        let mut stream = (payload.len() as u16).to_le_bytes().to_vec();
        stream.extend_from_slice(&payload);
        let expected = saxman::decompress(&stream);

        stream.extend_from_slice(&trailing);
        prop_assert_eq!(saxman::decompress(&stream), expected);
    }
}
