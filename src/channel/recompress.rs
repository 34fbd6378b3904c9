// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Lossy recompression stage.
//!
//! [`Recompressor`] is the pluggable hook: any quality-parameterized, lossy
//! buffer-to-buffer transform will do (a real JPEG encoder/decoder pair, a
//! platform codec, a closure in a test). [`JpegRequantizer`] is the built-in
//! model of a baseline 4:4:4 JPEG round trip:
//!
//! 1. RGB → YCbCr (BT.601 full range).
//! 2. Per 8×8 block of each plane: forward DCT, quantize with the
//!    quality-scaled luminance or chrominance table, dequantize, IDCT.
//! 3. YCbCr → RGB, rounded and clamped. Alpha becomes 255.
//!
//! Partial edge blocks are padded by replicating the last row/column, as
//! encoders do.

use crate::channel::error::ChannelError;
use crate::raster::dct::{requantize_block, scaled_quant_table, CHROMA_QT_BASE, LUMA_QT_BASE};
use crate::raster::{PixelBuffer, CHANNELS};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A quality-parameterized lossy transform.
pub trait Recompressor {
    fn recompress(&self, buf: &PixelBuffer, quality: u8) -> Result<PixelBuffer, ChannelError>;
}

impl<F> Recompressor for F
where
    F: Fn(&PixelBuffer, u8) -> Result<PixelBuffer, ChannelError>,
{
    fn recompress(&self, buf: &PixelBuffer, quality: u8) -> Result<PixelBuffer, ChannelError> {
        self(buf, quality)
    }
}

/// Pixel-domain model of a JPEG encode/decode round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegRequantizer;

impl Recompressor for JpegRequantizer {
    fn recompress(&self, buf: &PixelBuffer, quality: u8) -> Result<PixelBuffer, ChannelError> {
        let w = buf.width() as usize;
        let h = buf.height() as usize;
        if w == 0 || h == 0 {
            return Ok(buf.clone());
        }

        let (mut y, mut cb, mut cr) = split_ycbcr(buf);
        let luma_qt = scaled_quant_table(&LUMA_QT_BASE, quality);
        let chroma_qt = scaled_quant_table(&CHROMA_QT_BASE, quality);
        requantize_plane(&mut y, w, &luma_qt);
        requantize_plane(&mut cb, w, &chroma_qt);
        requantize_plane(&mut cr, w, &chroma_qt);

        let mut data = Vec::with_capacity(w * h * CHANNELS);
        for i in 0..w * h {
            data.extend_from_slice(&ycbcr_to_rgb(y[i], cb[i], cr[i]));
            data.push(255);
        }
        PixelBuffer::new(buf.width(), buf.height(), data).map_err(|e| ChannelError::Recompression(e.to_string()))
    }
}

fn split_ycbcr(buf: &PixelBuffer) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = buf.pixel_count();
    let mut y = Vec::with_capacity(n);
    let mut cb = Vec::with_capacity(n);
    let mut cr = Vec::with_capacity(n);
    for px in buf.as_raw().chunks_exact(CHANNELS) {
        let (r, g, b) = (px[0] as f64, px[1] as f64, px[2] as f64);
        y.push(0.299 * r + 0.587 * g + 0.114 * b);
        cb.push(128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b);
        cr.push(128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b);
    }
    (y, cb, cr)
}

fn ycbcr_to_rgb(y: f64, cb: f64, cr: f64) -> [u8; 3] {
    let cb = cb - 128.0;
    let cr = cr - 128.0;
    let to_u8 = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    [
        to_u8(y + 1.402 * cr),
        to_u8(y - 0.344_136 * cb - 0.714_136 * cr),
        to_u8(y + 1.772 * cb),
    ]
}

/// Requantize one plane of width `w` block by block.
///
/// Each band of 8 rows is independent, so bands run on Rayon workers.
fn requantize_plane(plane: &mut [f64], w: usize, qt: &[u16; 64]) {
    let blocks_wide = (w + 7) / 8;

    let process_band = |band: &mut [f64]| {
        let rows = band.len() / w;
        for bc in 0..blocks_wide {
            let mut block = [0.0f64; 64];
            for r in 0..8 {
                let y = r.min(rows - 1);
                for c in 0..8 {
                    let x = (bc * 8 + c).min(w - 1);
                    block[r * 8 + c] = band[y * w + x];
                }
            }
            let out = requantize_block(&block, qt);
            for r in 0..rows.min(8) {
                for c in 0..8 {
                    let x = bc * 8 + c;
                    if x < w {
                        band[r * w + x] = out[r * 8 + c];
                    }
                }
            }
        }
    };

    #[cfg(feature = "parallel")]
    plane.par_chunks_mut(w * 8).for_each(process_band);
    #[cfg(not(feature = "parallel"))]
    plane.chunks_mut(w * 8).for_each(process_band);
}
