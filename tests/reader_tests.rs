//! DecodeReader over files and in-memory sources

mod common;

use common::kosinski_encode;
use genesis_decomp::{DecodeOptions, DecodeReader, Format};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use tempfile::tempdir;

#[test]
fn test_read_kosinski_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("level.kos");

    let original: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8 ^ (i / 97) as u8).collect();
    std::fs::write(&path, kosinski_encode(&original))?;

    let mut reader = DecodeReader::new(BufReader::new(File::open(&path)?), Format::Kosinski);
    let mut output = Vec::new();
    reader.read_to_end(&mut output)?;

    assert_eq!(output, original);
    Ok(())
}

#[test]
fn test_chunked_reads_match_whole_decode() {
    let stream = [0x00, 0x01, 0x8A, 0x71, 0x00, 0x83, 0x72, 0x02, 0xFF, 0x49, 0x20];
    let whole = genesis_decomp::nemesis::decompress(&stream).unwrap();

    let mut reader = DecodeReader::new(Cursor::new(stream), Format::Nemesis);
    let mut chunked = Vec::new();
    let mut buf = [0u8; 5];
    loop {
        let n = reader.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        chunked.extend_from_slice(&buf[..n]);
    }

    assert_eq!(chunked, whole);
}

#[test]
fn test_output_ceiling_surfaces_as_invalid_data() {
    let stream = kosinski_encode(&[0x11; 300]);
    let options = DecodeOptions::default().with_max_output(200);
    let mut reader = DecodeReader::with_options(Cursor::new(stream), Format::Kosinski, options);

    let err = reader.read_to_end(&mut Vec::new()).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    assert!(err.to_string().contains("200"));
}

#[test]
fn test_into_inner_returns_source() {
    let reader = DecodeReader::new(Cursor::new(vec![0x21]), Format::Dcm);
    assert_eq!(reader.format(), Format::Dcm);
    assert_eq!(reader.into_inner().into_inner(), vec![0x21]);
}
