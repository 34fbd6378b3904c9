// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Raw RGBA8 pixel buffers and the image-decoder boundary.
//!
//! The codec never parses image files. An external collaborator turns file
//! bytes into a [`PixelBuffer`] (see [`ImageDecoder`]) and re-encodes the
//! result afterwards. The DCT and resampling helpers used by the distortion
//! channel live in the submodules.

pub mod dct;
pub mod resample;

use crate::stego::error::StegoError;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Color channels that carry payload bits (alpha is skipped).
pub const COLOR_CHANNELS: usize = 3;

/// Row-major RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap existing RGBA data.
    ///
    /// # Errors
    /// [`StegoError::InvalidBuffer`] if `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, StegoError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|p| p.checked_mul(CHANNELS));
        if expected != Some(data.len()) {
            return Err(StegoError::InvalidBuffer { width, height, len: data.len() });
        }
        Ok(Self { width, height, data })
    }

    /// A buffer filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self { width, height, data }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    /// RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Raw row-major RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Raw mutable access.
    ///
    /// Each 4-byte chunk is one pixel; used by parallel processing
    /// (Rayon `par_chunks_mut`).
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Set every alpha value to 255.
    pub fn force_opaque(&mut self) {
        for px in self.data.chunks_exact_mut(CHANNELS) {
            px[3] = 255;
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width, "x {x} >= {}", self.width);
        debug_assert!(y < self.height, "y {y} >= {}", self.height);
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

/// External image decoder (PNG, JPEG, canvas readback, ...).
pub trait ImageDecoder {
    /// Decode file bytes into an RGBA8 buffer.
    fn decode_rgba(&self, bytes: &[u8]) -> Result<PixelBuffer, Box<dyn std::error::Error + Send + Sync>>;
}

/// Run an external decoder and classify its failure as [`StegoError::ImageLoad`].
///
/// Failures are surfaced once; there is no retry.
pub fn load_pixels(decoder: &dyn ImageDecoder, bytes: &[u8]) -> Result<PixelBuffer, StegoError> {
    decoder.decode_rgba(bytes).map_err(|e| {
        log::warn!("image decoder failed on {} bytes: {e}", bytes.len());
        StegoError::ImageLoad(e.to_string())
    })
}
