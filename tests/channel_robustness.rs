// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Decode behaviour after the distortion channel.
//!
//! Plain LSB embedding is fragile: any stage that rewrites pixel values is
//! expected to break decoding. These tests pin down that the failure is a
//! classified error or garbled text, never a panic, and that the identity
//! settings keep the payload intact.

use veil_core::{decode, encode, DistortionSettings, DistortionSimulator, PixelBuffer, ResizeFilter};

const MESSAGE: &str = "robustness probe";

fn stego_image() -> PixelBuffer {
    let mut image = PixelBuffer::from_fn(96, 64, |x, y| {
        [(40 + x) as u8, (60 + 2 * y) as u8, ((x * y) % 200) as u8, 255]
    });
    encode(&mut image, MESSAGE, "channel-key").unwrap();
    image
}

fn assert_decodes_or_classified(image: &PixelBuffer, label: &str) {
    match decode(image, "channel-key") {
        Ok(decoded) => log::debug!("{label}: decoded {:?}", decoded.text()),
        Err(e) => assert!(e.is_corruption(), "{label}: unexpected error {e}"),
    }
}

#[test]
fn passthrough_channel_keeps_payload() {
    let image = stego_image();
    let out = DistortionSimulator::new()
        .apply_seeded(&image, &DistortionSettings::passthrough(), 7)
        .unwrap();
    assert_eq!(out, image);
    let decoded = decode(&out, "channel-key").unwrap();
    assert_eq!(decoded.text(), MESSAGE);
    assert_eq!(decoded.corrected_bits, 0);
}

#[test]
fn recompression_at_every_quality_is_survivable_or_classified() {
    let image = stego_image();
    let sim = DistortionSimulator::new();
    for quality in (50..=95).step_by(5) {
        let settings = DistortionSettings { recompression_quality: quality as u8, ..Default::default() };
        let out = sim.apply_seeded(&image, &settings, 0).unwrap();
        assert_eq!((out.width(), out.height()), (96, 64));
        assert_decodes_or_classified(&out, &format!("QF{quality}"));
    }
}

#[test]
fn noise_levels_are_survivable_or_classified() {
    let image = stego_image();
    let sim = DistortionSimulator::new();
    for level in 1..=5 {
        let settings = DistortionSettings { noise_level: level, ..DistortionSettings::passthrough() };
        let out = sim.apply_seeded(&image, &settings, u64::from(level)).unwrap();
        assert_ne!(out, image, "noise level {level} should perturb pixels");
        assert_decodes_or_classified(&out, &format!("noise {level}"));
    }
}

#[test]
fn resize_shrinks_and_breaks_alignment() {
    let image = stego_image();
    let sim = DistortionSimulator::new();
    for filter in [ResizeFilter::Nearest, ResizeFilter::Bilinear] {
        let settings = DistortionSettings {
            resize_scale: 0.75,
            resize_filter: filter,
            ..DistortionSettings::passthrough()
        };
        let out = sim.apply_seeded(&image, &settings, 0).unwrap();
        assert_eq!((out.width(), out.height()), (72, 48));
        assert_decodes_or_classified(&out, &format!("resize {filter:?}"));
    }
}

#[test]
fn seeds_control_noise() {
    let image = stego_image();
    let sim = DistortionSimulator::new();
    let settings = DistortionSettings { noise_level: 3, recompression_quality: 80, ..Default::default() };
    let a = sim.apply_seeded(&image, &settings, 11).unwrap();
    let b = sim.apply_seeded(&image, &settings, 11).unwrap();
    let c = sim.apply_seeded(&image, &settings, 12).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn combined_worst_case_does_not_panic() {
    let image = stego_image();
    let settings = DistortionSettings {
        recompress: true,
        recompression_quality: 50,
        noise_level: 5,
        resize_scale: 0.75,
        resize_filter: ResizeFilter::Bilinear,
    };
    let out = DistortionSimulator::new().apply_seeded(&image, &settings, 99).unwrap();
    assert_decodes_or_classified(&out, "worst case");
}

#[test]
fn channel_does_not_modify_input() {
    let image = stego_image();
    let before = image.clone();
    let settings = DistortionSettings { noise_level: 2, ..Default::default() };
    DistortionSimulator::new().apply_seeded(&image, &settings, 1).unwrap();
    assert_eq!(image, before);
}
