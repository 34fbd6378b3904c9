// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Lossy channel simulation.
//!
//! Models what can happen to a stego image between encoder and decoder, so
//! decode robustness can be measured. Stages run in a fixed order:
//!
//! 1. **Resize** to `floor(scale × dims)`. The image is not scaled back, so
//!    the decoder sees the smaller buffer; every pixel is recomputed from its
//!    neighbours and the LSB plane is effectively lost unless `scale == 1.0`.
//! 2. **Additive noise**, one uniform zero-mean offset per pixel.
//! 3. **Recompression** through a [`Recompressor`]. Quality 95 is the least
//!    lossy setting, not a lossless one; set `recompress = false` to bypass.
//!
//! The simulator is not part of the encode/decode contract.

pub mod error;
pub mod noise;
pub mod recompress;

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::raster::resample::{resize, scaled_dimensions, ResizeFilter};
use crate::raster::PixelBuffer;

pub use error::ChannelError;
pub use recompress::{JpegRequantizer, Recompressor};

/// Accepted recompression qualities (UI step 5).
pub const QUALITY_RANGE: RangeInclusive<u8> = 50..=95;

/// Accepted noise levels (UI step 1).
pub const NOISE_RANGE: RangeInclusive<u8> = 0..=5;

/// Accepted resize scales (UI step 0.05).
pub const SCALE_RANGE: RangeInclusive<f64> = 0.75..=1.0;

/// Channel configuration. Pure data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortionSettings {
    /// Whether the recompression stage runs at all.
    pub recompress: bool,
    /// Recompression quality, 50..=95.
    pub recompression_quality: u8,
    /// Noise level, 0..=5. The offset span is `noise_level * 25`.
    pub noise_level: u8,
    /// Resize factor, 0.75..=1.0.
    pub resize_scale: f64,
    /// Interpolation used by the resize stage.
    pub resize_filter: ResizeFilter,
}

impl Default for DistortionSettings {
    fn default() -> Self {
        Self {
            recompress: true,
            recompression_quality: 95,
            noise_level: 0,
            resize_scale: 1.0,
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl DistortionSettings {
    /// Settings under which the channel is the identity.
    pub fn passthrough() -> Self {
        Self { recompress: false, ..Self::default() }
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ChannelError> {
        if !QUALITY_RANGE.contains(&self.recompression_quality) {
            return Err(ChannelError::QualityOutOfRange(self.recompression_quality));
        }
        if !NOISE_RANGE.contains(&self.noise_level) {
            return Err(ChannelError::NoiseOutOfRange(self.noise_level));
        }
        if !SCALE_RANGE.contains(&self.resize_scale) {
            return Err(ChannelError::ScaleOutOfRange(self.resize_scale));
        }
        Ok(())
    }

    /// Parse and validate settings from TOML.
    ///
    /// ```toml
    /// recompression_quality = 80
    /// noise_level = 1
    /// resize_scale = 1.0
    /// resize_filter = "nearest"
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, ChannelError> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// True if applying these settings cannot change a buffer.
    pub fn is_passthrough(&self) -> bool {
        !self.recompress && self.noise_level == 0 && self.resize_scale == 1.0
    }
}

/// Applies [`DistortionSettings`] to pixel buffers.
#[derive(Debug, Clone, Default)]
pub struct DistortionSimulator<C = JpegRequantizer> {
    recompressor: C,
}

impl DistortionSimulator<JpegRequantizer> {
    /// Simulator using the built-in JPEG requantizer.
    pub fn new() -> Self {
        Self { recompressor: JpegRequantizer }
    }
}

impl<C: Recompressor> DistortionSimulator<C> {
    /// Simulator using a caller-supplied recompression hook.
    pub fn with_recompressor(recompressor: C) -> Self {
        Self { recompressor }
    }

    /// Run `src` through the channel, drawing noise from `rng`.
    ///
    /// Returns a new buffer; `src` is not modified. The output may be smaller
    /// than the input when `resize_scale < 1.0`.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        src: &PixelBuffer,
        settings: &DistortionSettings,
        rng: &mut R,
    ) -> Result<PixelBuffer, ChannelError> {
        settings.validate()?;
        if src.pixel_count() == 0 {
            return Ok(src.clone());
        }

        let (w, h) = scaled_dimensions(src.width(), src.height(), settings.resize_scale);
        let mut buf = resize(src, w, h, settings.resize_filter);
        if (w, h) != (src.width(), src.height()) {
            log::debug!("resized {}x{} -> {w}x{h}", src.width(), src.height());
        }

        noise::add_noise(&mut buf, settings.noise_level, rng);

        if settings.recompress {
            buf = self.recompressor.recompress(&buf, settings.recompression_quality)?;
            log::debug!("recompressed at quality {}", settings.recompression_quality);
        }

        Ok(buf)
    }

    /// [`apply`](Self::apply) with a ChaCha20 generator seeded from `seed`.
    pub fn apply_seeded(
        &self,
        src: &PixelBuffer,
        settings: &DistortionSettings,
        seed: u64,
    ) -> Result<PixelBuffer, ChannelError> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        self.apply(src, settings, &mut rng)
    }
}
