//! CLI test harness for `dist-core`: loads two files, optionally reinterprets
//! them as `u16`/`u32` elements, and reports the edit distance and elapsed
//! time. Grounded in the original repository's `levenshteinFileExpect` /
//! `FileMappedString` harness, kept outside the core crate so `dist-core`
//! never pulls in `clap` or filesystem APIs.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::info;

/// Compute the edit distance between two files.
#[derive(Parser)]
#[clap(author, about, disable_version_flag(true))]
struct Cli {
    /// First input file.
    a: PathBuf,

    /// Second input file.
    b: PathBuf,

    /// Element width in bytes: 1 for raw bytes, 2 or 4 to reinterpret the
    /// file as little-endian u16/u32 elements (a trailing partial element is
    /// dropped).
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..))]
    width: u8,

    /// Run the distance computation this many times and report total elapsed
    /// time (for micro-benchmarking without a separate harness).
    #[clap(long, default_value_t = 1)]
    repeat: u32,

    /// Bypass SIMD dispatch and always use the scalar driver.
    #[clap(long)]
    force_scalar: bool,

    /// Increase verbosity. Pass multiple times for more.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity. Pass multiple times for less.
    #[clap(short, long, action = clap::ArgAction::Count)]
    quiet: u8,
}

fn main() {
    let args = Cli::parse();

    let level = match args.verbose as i8 - args.quiet as i8 {
        i8::MIN..=-1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let raw_a = std::fs::read(&args.a)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", args.a.display()));
    let raw_b = std::fs::read(&args.b)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", args.b.display()));

    info!(
        "loaded {} bytes from {} and {} bytes from {}, width={}",
        raw_a.len(),
        args.a.display(),
        raw_b.len(),
        args.b.display(),
        args.width
    );

    let start = Instant::now();
    let mut d = 0u64;
    for _ in 0..args.repeat {
        d = match args.width {
            1 => run(&raw_a, &raw_b, args.force_scalar),
            2 => run(&reinterpret_u16(&raw_a), &reinterpret_u16(&raw_b), args.force_scalar),
            4 => run(&reinterpret_u32(&raw_a), &reinterpret_u32(&raw_b), args.force_scalar),
            w => panic!("unsupported --width {w}, must be 1, 2 or 4"),
        };
    }
    let elapsed = start.elapsed();

    println!("distance: {d}");
    println!(
        "elapsed: {elapsed:?} ({:?}/iteration over {} iterations)",
        elapsed / args.repeat.max(1),
        args.repeat
    );
}

fn run<E: PartialEq + Copy + 'static>(a: &[E], b: &[E], force_scalar: bool) -> u64 {
    if force_scalar {
        dist_core::distance_scalar_only(a, b)
    } else {
        dist_core::distance(a, b)
    }
}

/// Reinterprets `bytes` as little-endian `u16` elements, dropping a trailing
/// odd byte if present.
fn reinterpret_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect()
}

/// Reinterprets `bytes` as little-endian `u32` elements, dropping a trailing
/// partial element if present. Mirrors `levenshteinFileExpect<uint32_t>` in
/// the original C++ harness, which reinterprets the same byte files as
/// 32-bit elements.
fn reinterpret_u32(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
