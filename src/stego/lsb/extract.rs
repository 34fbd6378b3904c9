// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! LSB extraction, the counterpart to [`super::embed`].

use crate::raster::{PixelBuffer, CHANNELS, COLOR_CHANNELS};
use crate::stego::capacity::capacity_bits;
use crate::stego::error::StegoError;

#[cfg(feature = "parallel")]
use super::PIXELS_PER_TASK;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Read `count` coded bits starting at coded-bit offset `start`.
///
/// # Errors
/// [`StegoError::TruncatedExtraction`] if the buffer ends before
/// `start + count` bits.
pub fn extract_bits(buf: &PixelBuffer, start: usize, count: usize) -> Result<Vec<u8>, StegoError> {
    let available = capacity_bits(buf);
    let end = start.saturating_add(count);
    if end > available {
        return Err(StegoError::TruncatedExtraction { required: end, available });
    }

    let data = buf.as_raw();
    let read_bit = |k: usize| data[(k / COLOR_CHANNELS) * CHANNELS + k % COLOR_CHANNELS] & 1;

    #[cfg(feature = "parallel")]
    let bits: Vec<u8> = (start..end)
        .into_par_iter()
        .with_min_len(PIXELS_PER_TASK * COLOR_CHANNELS)
        .map(read_bit)
        .collect();
    #[cfg(not(feature = "parallel"))]
    let bits: Vec<u8> = (start..end).map(read_bit).collect();

    Ok(bits)
}
