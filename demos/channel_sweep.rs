// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Sweep the distortion channel over a synthetic stego image and report
//! which settings still decode.
//!
//! ```text
//! cargo run --example channel_sweep
//! cargo run --example channel_sweep -- settings.toml
//! RUST_LOG=debug cargo run --example channel_sweep
//! ```
//!
//! With a TOML file argument, only those settings are applied.

use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;
use veil_core::{decode, encode, DistortionSettings, DistortionSimulator, PixelBuffer, StegoError};

const MESSAGE: &str = "The quick brown fox jumps over the lazy dog";
const KEY: &str = "sweep-key";
const SEED: u64 = 0x5EED;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut cover = PixelBuffer::from_fn(256, 192, |x, y| {
        [(x % 256) as u8, ((x + y) / 2) as u8, (255 - y.min(255)) as u8, 255]
    });
    let report = encode(&mut cover, MESSAGE, KEY)?;
    log::info!(
        "embedded {} coded bits into {} available",
        report.coded_bits,
        report.capacity_bits
    );

    let sim = DistortionSimulator::new();
    let runs: Vec<(String, DistortionSettings)> = match std::env::args().nth(1) {
        Some(path) => {
            let settings = DistortionSettings::from_toml_str(&std::fs::read_to_string(&path)?)?;
            vec![(path, settings)]
        }
        None => sweep(),
    };

    for (label, settings) in runs {
        let distorted = sim.apply_seeded(&cover, &settings, SEED)?;
        let outcome = match decode(&distorted, KEY) {
            Ok(d) if d.text() == MESSAGE => format!("intact ({} corrected)", d.corrected_bits),
            Ok(d) => format!("garbled ({} corrected)", d.corrected_bits),
            Err(e @ StegoError::CorruptHeader { .. }) => format!("lost: {e}"),
            Err(e) => format!("failed: {e}"),
        };
        println!("{label:<28} {outcome}");
    }
    Ok(())
}

fn sweep() -> Vec<(String, DistortionSettings)> {
    let mut runs = vec![("passthrough".to_string(), DistortionSettings::passthrough())];
    for quality in (50..=95u8).step_by(15) {
        runs.push((
            format!("jpeg q{quality}"),
            DistortionSettings { recompression_quality: quality, ..Default::default() },
        ));
    }
    for level in 1..=5u8 {
        runs.push((
            format!("noise {level}"),
            DistortionSettings { noise_level: level, ..DistortionSettings::passthrough() },
        ));
    }
    for scale in [0.95, 0.85, 0.75] {
        runs.push((
            format!("resize {scale:.2}"),
            DistortionSettings { resize_scale: scale, ..DistortionSettings::passthrough() },
        ));
    }
    runs
}
