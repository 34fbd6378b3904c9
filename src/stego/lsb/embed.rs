// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! LSB embedding.

use crate::raster::{PixelBuffer, CHANNELS, COLOR_CHANNELS};
use crate::stego::capacity::capacity_bits;
use crate::stego::error::StegoError;

use super::PIXELS_PER_TASK;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Write `bits` into the R, G, B least-significant bits of `buf`.
///
/// The alpha plane is normalized to 255 across the whole buffer first, so
/// later stages see a consistent alpha channel. Pixels past the end of the
/// bitstream keep their color values.
///
/// # Errors
/// [`StegoError::InsufficientCapacity`] if `bits` does not fit. The buffer is
/// left untouched in that case.
pub fn embed_bits(buf: &mut PixelBuffer, bits: &[u8]) -> Result<(), StegoError> {
    let available = capacity_bits(buf);
    if bits.len() > available {
        return Err(StegoError::InsufficientCapacity { required: bits.len(), available });
    }

    buf.force_opaque();

    let process_range = |(task, chunk): (usize, &mut [u8])| {
        let first_bit = task * PIXELS_PER_TASK * COLOR_CHANNELS;
        for (p, px) in chunk.chunks_exact_mut(CHANNELS).enumerate() {
            let base = first_bit + p * COLOR_CHANNELS;
            for c in 0..COLOR_CHANNELS {
                if let Some(&bit) = bits.get(base + c) {
                    px[c] = (px[c] & 0xFE) | (bit & 1);
                }
            }
        }
    };

    let data = buf.as_raw_mut();
    #[cfg(feature = "parallel")]
    data.par_chunks_mut(PIXELS_PER_TASK * CHANNELS).enumerate().for_each(process_range);
    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(PIXELS_PER_TASK * CHANNELS).enumerate().for_each(process_range);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_rgb_lsbs_in_order() {
        let mut buf = PixelBuffer::filled(2, 1, [0x10, 0x11, 0x12, 0x00]);
        embed_bits(&mut buf, &[1, 1, 0, 1]).unwrap();
        assert_eq!(buf.as_raw(), &[0x11, 0x11, 0x12, 0xFF, 0x11, 0x11, 0x12, 0xFF]);
    }

    #[test]
    fn only_lsb_changes() {
        let mut buf = PixelBuffer::from_fn(5, 5, |x, y| [(x * 50) as u8, (y * 50) as u8, 0xAB, 255]);
        let before = buf.clone();
        let bits: Vec<u8> = (0..75).map(|i| (i % 2) as u8).collect();
        embed_bits(&mut buf, &bits).unwrap();
        for (a, b) in before.as_raw().iter().zip(buf.as_raw()) {
            assert_eq!(a & 0xFE, b & 0xFE);
        }
    }

    #[test]
    fn alpha_forced_everywhere() {
        let mut buf = PixelBuffer::filled(3, 3, [9, 9, 9, 17]);
        embed_bits(&mut buf, &[1]).unwrap();
        assert!(buf.as_raw().chunks_exact(4).all(|px| px[3] == 255));
        // Pixels past the payload keep their colors.
        assert_eq!(buf.pixel(2, 2), [9, 9, 9, 255]);
    }

    #[test]
    fn exact_capacity_fits() {
        let mut buf = PixelBuffer::filled(2, 2, [0, 0, 0, 255]);
        embed_bits(&mut buf, &[1; 12]).unwrap();
        assert!(buf.as_raw().chunks_exact(4).all(|px| px[..3] == [1, 1, 1]));
    }

    #[test]
    fn over_capacity_leaves_buffer_untouched() {
        let mut buf = PixelBuffer::filled(2, 2, [0, 0, 0, 7]);
        let before = buf.clone();
        match embed_bits(&mut buf, &[1; 13]) {
            Err(StegoError::InsufficientCapacity { required: 13, available: 12 }) => {}
            other => panic!("expected InsufficientCapacity, got {other:?}"),
        }
        assert_eq!(buf, before);
    }

    #[test]
    fn spans_multiple_tasks() {
        // More than one PIXELS_PER_TASK range.
        let w = 100u32;
        let h = 50u32;
        let mut buf = PixelBuffer::filled(w, h, [0, 0, 0, 255]);
        let n = (w * h) as usize * 3;
        let bits: Vec<u8> = (0..n).map(|i| ((i * 7) % 3 == 0) as u8).collect();
        embed_bits(&mut buf, &bits).unwrap();
        for (i, &bit) in bits.iter().enumerate() {
            assert_eq!(buf.as_raw()[(i / 3) * 4 + i % 3], bit, "bit {i}");
        }
    }
}
