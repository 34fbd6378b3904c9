// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Additive noise stage.
//!
//! Each pixel receives one offset drawn uniformly from
//! `[-level * 12.5, level * 12.5)` (zero mean, span `level * 25`), applied
//! equally to R, G and B, then rounded and clamped to [0, 255]. Alpha is
//! left alone. The random source is injected so runs are reproducible.

use rand::Rng;

use crate::raster::{PixelBuffer, CHANNELS, COLOR_CHANNELS};

/// Span of the offset distribution per noise level.
pub const NOISE_SPAN_PER_LEVEL: f64 = 25.0;

/// Perturb the color channels of `buf` in place.
///
/// Level 0 draws nothing from `rng` and leaves the buffer unchanged.
pub fn add_noise<R: Rng + ?Sized>(buf: &mut PixelBuffer, level: u8, rng: &mut R) {
    if level == 0 {
        return;
    }
    let span = level as f64 * NOISE_SPAN_PER_LEVEL;
    for px in buf.as_raw_mut().chunks_exact_mut(CHANNELS) {
        let offset = (rng.gen::<f64>() - 0.5) * span;
        for v in px.iter_mut().take(COLOR_CHANNELS) {
            *v = (*v as f64 + offset).round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn level_zero_is_identity() {
        let mut buf = PixelBuffer::filled(4, 4, [10, 20, 30, 255]);
        let before = buf.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        add_noise(&mut buf, 0, &mut rng);
        assert_eq!(buf, before);
    }

    #[test]
    fn same_seed_same_noise() {
        let base = PixelBuffer::filled(8, 8, [128, 128, 128, 255]);
        let mut a = base.clone();
        let mut b = base.clone();
        add_noise(&mut a, 3, &mut ChaCha20Rng::seed_from_u64(7));
        add_noise(&mut b, 3, &mut ChaCha20Rng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_ne!(a, base);
    }

    #[test]
    fn offsets_are_bounded_and_shared_across_channels() {
        let mut buf = PixelBuffer::filled(16, 16, [128, 128, 128, 200]);
        add_noise(&mut buf, 5, &mut ChaCha20Rng::seed_from_u64(3));
        for px in buf.as_raw().chunks_exact(4) {
            let d = px[0] as i32 - 128;
            assert!(d.abs() <= 63, "offset {d} exceeds level-5 half span");
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 200);
        }
    }

    #[test]
    fn clamps_at_extremes() {
        let mut buf = PixelBuffer::from_fn(32, 1, |x, _| if x % 2 == 0 { [0, 0, 0, 255] } else { [255, 255, 255, 255] });
        add_noise(&mut buf, 5, &mut ChaCha20Rng::seed_from_u64(11));
        // No wraparound: dark pixels stay dark, bright pixels stay bright.
        for (x, px) in buf.as_raw().chunks_exact(4).enumerate() {
            if x % 2 == 0 {
                assert!(px[0] <= 63);
            } else {
                assert!(px[0] >= 192);
            }
        }
    }
}
