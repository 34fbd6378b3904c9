// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! RGBA resampling for the resize stage of the distortion channel.
//!
//! Each output pixel center is mapped back into source coordinates and
//! sampled with either nearest-neighbour or bilinear interpolation. Source
//! coordinates outside the image clamp to the nearest edge pixel.

use serde::{Deserialize, Serialize};

use super::{PixelBuffer, CHANNELS};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Interpolation used when resizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Bilinear,
}

/// Output dimensions for a uniform `scale`: `floor(dim * scale)`, at least 1.
/// A zero dimension stays zero.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let scale_dim = |d: u32| if d == 0 { 0 } else { ((d as f64 * scale).floor() as u32).max(1) };
    (scale_dim(width), scale_dim(height))
}

/// Resample `src` to `dst_w × dst_h`.
///
/// Same-size requests return an exact copy. An empty source has nothing to
/// sample, so the output is opaque black.
pub fn resize(src: &PixelBuffer, dst_w: u32, dst_h: u32, filter: ResizeFilter) -> PixelBuffer {
    if dst_w == src.width() && dst_h == src.height() {
        return src.clone();
    }
    if src.pixel_count() == 0 {
        return PixelBuffer::filled(dst_w, dst_h, [0, 0, 0, 255]);
    }

    let sx = src.width() as f64 / dst_w as f64;
    let sy = src.height() as f64 / dst_h as f64;
    let row_len = dst_w as usize * CHANNELS;
    let mut data = vec![0u8; row_len * dst_h as usize];

    let fill_row = |(dy, row): (usize, &mut [u8])| {
        // Map the destination pixel center back into source space.
        let fy = (dy as f64 + 0.5) * sy - 0.5;
        for (dx, out) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let fx = (dx as f64 + 0.5) * sx - 0.5;
            let px = match filter {
                ResizeFilter::Nearest => nearest_sample(src, fx, fy),
                ResizeFilter::Bilinear => bilinear_sample(src, fx, fy),
            };
            out.copy_from_slice(&px);
        }
    };

    #[cfg(feature = "parallel")]
    data.par_chunks_mut(row_len).enumerate().for_each(fill_row);
    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(row_len).enumerate().for_each(fill_row);

    PixelBuffer { width: dst_w, height: dst_h, data }
}

fn clamp_coord(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}

fn nearest_sample(src: &PixelBuffer, x: f64, y: f64) -> [u8; 4] {
    let px = clamp_coord((x + 0.5).floor() as i64, src.width());
    let py = clamp_coord((y + 0.5).floor() as i64, src.height());
    src.pixel(px, py)
}

/// Sample a pixel using bilinear interpolation over the four neighbours.
fn bilinear_sample(src: &PixelBuffer, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let get = |px: i64, py: i64| src.pixel(clamp_coord(px, src.width()), clamp_coord(py, src.height()));

    let v00 = get(x0, y0);
    let v10 = get(x0 + 1, y0);
    let v01 = get(x0, y0 + 1);
    let v11 = get(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..CHANNELS {
        let v = v00[c] as f64 * (1.0 - fx) * (1.0 - fy)
            + v10[c] as f64 * fx * (1.0 - fy)
            + v01[c] as f64 * (1.0 - fx) * fy
            + v11[c] as f64 * fx * fy;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| [(x * 10) as u8, (y * 10) as u8, 77, 255])
    }

    #[test]
    fn dimensions_floor_and_floor_at_one() {
        assert_eq!(scaled_dimensions(64, 64, 0.75), (48, 48));
        assert_eq!(scaled_dimensions(10, 7, 0.8), (8, 5));
        assert_eq!(scaled_dimensions(1, 1, 0.75), (1, 1));
        assert_eq!(scaled_dimensions(33, 20, 1.0), (33, 20));
        assert_eq!(scaled_dimensions(0, 4, 0.75), (0, 3));
        assert_eq!(scaled_dimensions(0, 0, 0.75), (0, 0));
    }

    #[test]
    fn empty_source_does_not_sample() {
        let empty = PixelBuffer::filled(0, 4, [0, 0, 0, 255]);
        let out = resize(&empty, 0, 3, ResizeFilter::Bilinear);
        assert_eq!((out.width(), out.height(), out.pixel_count()), (0, 3, 0));

        let grown = resize(&empty, 2, 2, ResizeFilter::Nearest);
        assert!(grown.as_raw().chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn identity_is_exact_copy() {
        let src = gradient(9, 5);
        assert_eq!(resize(&src, 9, 5, ResizeFilter::Bilinear), src);
    }

    #[test]
    fn nearest_downscale_picks_source_pixels() {
        let src = gradient(8, 8);
        let out = resize(&src, 4, 4, ResizeFilter::Nearest);
        assert_eq!(out.width(), 4);
        for y in 0..4 {
            for x in 0..4 {
                let p = out.pixel(x, y);
                assert_eq!(p[0] % 10, 0);
                assert_eq!(p[1] % 10, 0);
                assert_eq!(p[2], 77);
            }
        }
    }

    #[test]
    fn bilinear_flat_region_stays_flat() {
        let src = PixelBuffer::filled(16, 16, [40, 80, 120, 255]);
        let out = resize(&src, 12, 12, ResizeFilter::Bilinear);
        assert!(out.as_raw().chunks_exact(4).all(|p| p == [40, 80, 120, 255]));
    }

    #[test]
    fn bilinear_interpolates_between_neighbours() {
        let src = gradient(16, 16);
        let out = resize(&src, 12, 12, ResizeFilter::Bilinear);
        // Red grows monotonically along x.
        for x in 1..12 {
            assert!(out.pixel(x, 6)[0] >= out.pixel(x - 1, 6)[0]);
        }
    }
}
