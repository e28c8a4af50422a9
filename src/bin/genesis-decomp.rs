//! genesis-decomp - Command-line interface for the Genesis decoders
//!
//! A command-line tool for decompressing Kosinski, Nemesis, Saxman, Enigma and
//! DCM data, either from standalone files or from offsets inside a ROM image.

use clap::{Parser, Subcommand};
use genesis_decomp::{
    decompress_with_stats, enigma, kosinski, nemesis, ByteSource, DecodeOptions, Format,
    DEFAULT_MAX_OUTPUT,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "genesis-decomp")]
#[command(about = "A CLI tool for Sega Genesis compression formats")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompress a single stream
    Decompress {
        /// Compression format (kosinski, nemesis, saxman, enigma, dcm)
        format: Format,

        /// Input file (compressed stream or ROM image)
        input: PathBuf,

        /// Output decompressed file
        output: PathBuf,

        /// Start offset of the stream in the input (decimal or 0x-prefixed hex)
        #[arg(short, long, value_parser = parse_number, default_value = "0")]
        offset: usize,

        /// Enigma art tile bias
        #[arg(short, long, value_parser = parse_number, default_value = "0")]
        art_tile: usize,

        /// Output ceiling in bytes
        #[arg(long, value_parser = parse_number, default_value_t = DEFAULT_MAX_OUTPUT)]
        max_output: usize,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Get information about a compressed stream
    Info {
        /// Compression format
        format: Format,

        /// Compressed file or ROM image to analyze
        input: PathBuf,

        /// Start offset of the stream in the input
        #[arg(short, long, value_parser = parse_number, default_value = "0")]
        offset: usize,
    },

    /// Decompress several streams of one format from a ROM image
    Extract {
        /// Compression format
        format: Format,

        /// ROM image
        rom: PathBuf,

        /// Directory receiving one file per offset
        out_dir: PathBuf,

        /// Stream offsets, comma-separated or repeated
        #[arg(short, long, value_parser = parse_number, value_delimiter = ',', required = true)]
        offset: Vec<usize>,

        /// Enigma art tile bias
        #[arg(short, long, value_parser = parse_number, default_value = "0")]
        art_tile: usize,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a decimal or `0x`-prefixed hexadecimal number
fn parse_number(s: &str) -> Result<usize, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", s, e))
}

fn art_tile(value: usize) -> Result<u16, Box<dyn std::error::Error>> {
    u16::try_from(value)
        .map_err(|_| format!("art tile {:#x} does not fit in 16 bits", value).into())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Decompress {
            format,
            input,
            output,
            offset,
            art_tile: tile,
            max_output,
            force,
        } => art_tile(tile).and_then(|tile| {
            let options = DecodeOptions::new()
                .with_max_output(max_output)
                .with_art_tile(tile);
            decompress_file(
                format, &input, &output, offset, &options, force, cli.verbose, cli.quiet,
            )
        }),
        Commands::Info {
            format,
            input,
            offset,
        } => show_stream_info(format, &input, offset, cli.verbose),
        Commands::Extract {
            format,
            rom,
            out_dir,
            offset,
            art_tile: tile,
            force,
        } => art_tile(tile).and_then(|tile| {
            let options = DecodeOptions::new().with_art_tile(tile);
            extract_streams(format, &rom, &out_dir, &offset, &options, force, cli.quiet)
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn check_paths(
    input: &Path,
    output: &Path,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn decompress_file(
    format: Format,
    input: &Path,
    output: &Path,
    offset: usize,
    options: &DecodeOptions,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    check_paths(input, output, force)?;

    if verbose {
        println!(
            "Decompressing {} stream at {:#x} in '{}' to '{}'",
            format,
            offset,
            input.display(),
            output.display()
        );
    }

    let start_time = Instant::now();
    let data = fs::read(input)?;

    let (decompressed, stats) = decompress_with_stats(format, &data, offset, options)
        .map_err(|e| format!("Decompression failed: {}", e))?;

    fs::write(output, &decompressed)?;

    if !quiet {
        println!("✓ Decompression successful!");
        println!("  Input:  {} bytes", stats.input_bytes);
        println!("  Output: {} bytes", stats.output_bytes);
        println!("  Ratio:  {:.1}%", stats.ratio());
        println!("  Time:   {:.2?}", start_time.elapsed());
    }

    Ok(())
}

fn show_stream_info(
    format: Format,
    input: &Path,
    offset: usize,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let data = fs::read(input)?;
    let stream = data.get(offset..).ok_or_else(|| {
        format!(
            "Offset {:#x} is past the end of '{}' ({} bytes)",
            offset,
            input.display(),
            data.len()
        )
    })?;

    println!("{} Stream Information:", format);
    println!("  File:   {}", input.display());
    println!("  Offset: {:#x}", offset);

    match format {
        Format::Nemesis => {
            if let Ok(header) = nemesis::NemesisHeader::read(&mut ByteSource::new(stream)) {
                println!("  Tiles:  {}", header.tile_count);
                println!("  XOR mode: {}", header.xor_mode);
                println!("  Expected Size: {} bytes", header.output_size());
            }
        }
        Format::Enigma => {
            if let Ok(header) = enigma::EnigmaHeader::read(&mut ByteSource::new(stream)) {
                println!("  Packet Length: {} bits", header.packet_length);
                println!("  Flag Mask: {:#07b}", header.flag_mask);
                println!("  Incrementing Value: {:#06x}", header.incrementing_value);
                println!("  Common Value: {:#06x}", header.common_value);
            }
        }
        Format::Saxman if stream.len() >= 2 => {
            println!("  Header: {:02x} {:02x}", stream[0], stream[1]);
        }
        Format::Kosinski => {
            println!("  Window: {} bytes", kosinski::FULL_WINDOW);
        }
        _ => {}
    }

    if verbose && !stream.is_empty() {
        let head: Vec<String> = stream
            .iter()
            .take(8)
            .map(|b| format!("{:02x}", b))
            .collect();
        println!("  Header bytes: {}", head.join(" "));
    }

    match decompress_with_stats(format, &data, offset, &DecodeOptions::default()) {
        Ok((_, stats)) => {
            println!("  Compressed Size: {} bytes", stats.input_bytes);
            println!("  Decompressed Size: {} bytes", stats.output_bytes);
            println!("  Compression Ratio: {:.1}%", stats.ratio());
            println!("  Status: ✓ Valid {} stream", format);
        }
        Err(e) => {
            println!("  Status: ✗ Invalid or corrupted {} stream", format);
            if verbose {
                println!("  Error: {}", e);
            }
        }
    }

    Ok(())
}

fn extract_streams(
    format: Format,
    rom: &Path,
    out_dir: &Path,
    offsets: &[usize],
    options: &DecodeOptions,
    force: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !rom.exists() {
        return Err(format!("ROM file '{}' does not exist", rom.display()).into());
    }
    fs::create_dir_all(out_dir)?;

    let data = fs::read(rom)?;

    let progress = if !quiet {
        let pb = ProgressBar::new(offsets.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        pb.set_message("Extracting...");
        Some(pb)
    } else {
        None
    };

    let mut failures = 0;
    for &offset in offsets {
        let output = out_dir.join(format!("{:06x}.{}", offset, format.name()));

        if output.exists() && !force {
            return Err(format!(
                "Output file '{}' already exists. Use --force to overwrite",
                output.display()
            )
            .into());
        }

        match decompress_with_stats(format, &data, offset, options) {
            Ok((decompressed, _)) => fs::write(&output, &decompressed)?,
            Err(e) => {
                failures += 1;
                log::error!("{} at {:#x}: {}", format, offset, e);
            }
        }

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(ref pb) = progress {
        pb.finish_with_message("Extraction complete");
    }

    if failures > 0 {
        return Err(format!("{} of {} streams failed to decode", failures, offsets.len()).into());
    }

    if !quiet {
        println!(
            "✓ Extracted {} {} streams to '{}'",
            offsets.len(),
            format,
            out_dir.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1234").unwrap(), 1234);
        assert_eq!(parse_number("0x7F000").unwrap(), 0x7F000);
        assert_eq!(parse_number("0XfF").unwrap(), 0xFF);
        assert!(parse_number("0xZZ").is_err());
    }

    #[test]
    fn test_decompress_at_offset() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let rom_path = dir.path().join("rom.bin");
        let output_path = dir.path().join("out.bin");

        let mut rom = vec![0xFF; 4];
        rom.extend_from_slice(&[0x57, 0x00, 0x41, 0x42, 0x43, 0xFD, 0xF9, 0x00, 0xF0, 0x00]);
        fs::write(&rom_path, &rom)?;

        decompress_file(
            Format::Kosinski,
            &rom_path,
            &output_path,
            4,
            &DecodeOptions::default(),
            false,
            false,
            true,
        )?;
        assert_eq!(fs::read(&output_path)?, b"ABCABC");

        // Refuses to overwrite without --force
        assert!(decompress_file(
            Format::Kosinski,
            &rom_path,
            &output_path,
            4,
            &DecodeOptions::default(),
            false,
            false,
            true,
        )
        .is_err());

        Ok(())
    }

    #[test]
    fn test_extract() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let rom_path = dir.path().join("rom.bin");
        let out_dir = dir.path().join("sounds");

        let mut rom = vec![0x00, 0x21];
        rom.extend_from_slice(&[0x77]);
        fs::write(&rom_path, &rom)?;

        extract_streams(
            Format::Dcm,
            &rom_path,
            &out_dir,
            &[0, 2],
            &DecodeOptions::default(),
            false,
            true,
        )?;

        assert_eq!(fs::read(out_dir.join("000000.dcm"))?.len(), 6);
        assert_eq!(fs::read(out_dir.join("000002.dcm"))?, vec![0xC0, 0xFF]);

        Ok(())
    }
}
