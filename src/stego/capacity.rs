// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Capacity arithmetic.
//!
//! Each pixel carries one payload bit in each of R, G and B, so a buffer of
//! `n` pixels holds `3n` coded bits. A frame of `f` bits costs `3f` coded
//! bits after repetition coding.

use crate::raster::{PixelBuffer, COLOR_CHANNELS};
use crate::stego::frame::FrameFormat;
use crate::stego::repetition::REPETITION;

/// Embeddable coded bits in `buf`.
pub fn capacity_bits(buf: &PixelBuffer) -> usize {
    buf.pixel_count() * COLOR_CHANNELS
}

/// Coded bits needed to embed a message of `message_len` bytes.
pub fn required_coded_bits(message_len: usize, format: FrameFormat) -> usize {
    format.frame_bits(message_len * 8) * REPETITION
}

/// Largest message (in bytes) that fits in `buf`.
///
/// Returns 0 if the buffer cannot hold even the header region plus one byte.
pub fn max_message_len(buf: &PixelBuffer, format: FrameFormat) -> usize {
    let frame_bits = capacity_bits(buf) / REPETITION;
    let overhead = format.header_bits() + format.trailer_bits();
    frame_bits.saturating_sub(overhead) / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_64x64() {
        let buf = PixelBuffer::filled(64, 64, [0, 0, 0, 255]);
        assert_eq!(capacity_bits(&buf), 12_288);
    }

    #[test]
    fn two_byte_message_costs_144_bits() {
        assert_eq!(required_coded_bits(2, FrameFormat::Plain), 96 + 48);
    }

    #[test]
    fn max_message_len_is_tight() {
        for (w, h) in [(1u32, 1u32), (4, 4), (11, 13), (64, 64)] {
            let buf = PixelBuffer::filled(w, h, [0, 0, 0, 255]);
            for format in [FrameFormat::Plain, FrameFormat::Checked] {
                let max = max_message_len(&buf, format);
                if max > 0 {
                    assert!(required_coded_bits(max, format) <= capacity_bits(&buf));
                }
                assert!(required_coded_bits(max + 1, format) > capacity_bits(&buf));
            }
        }
    }

    #[test]
    fn tiny_buffer_holds_nothing() {
        // 32 pixels = 96 coded bits: exactly the header, no room for a body byte.
        let buf = PixelBuffer::filled(32, 1, [0, 0, 0, 255]);
        assert_eq!(max_message_len(&buf, FrameFormat::Plain), 0);
    }
}
