// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! 8×8 block requantization and JPEG quantization tables.
//!
//! [`requantize_block`] is the lossy core of a baseline JPEG round trip:
//! orthonormal 2-D DCT, divide by the quantization table, round, multiply
//! back, inverse DCT. The transform is written as `B · S · Bᵀ` with a cached
//! 8×8 basis matrix `B`, whose inverse is simply `Bᵀ · F · B`.

use std::sync::OnceLock;

/// Samples per 8×8 block.
pub const BLOCK_LEN: usize = 64;

/// Standard JPEG luminance quantization table (Table K.1 of the JPEG spec).
pub const LUMA_QT_BASE: [u16; 64] = [
    16, 11, 10, 16,  24,  40,  51,  61,
    12, 12, 14, 19,  26,  58,  60,  55,
    14, 13, 16, 24,  40,  57,  69,  56,
    14, 17, 22, 29,  51,  87,  80,  62,
    18, 22, 37, 56,  68, 109, 103,  77,
    24, 35, 55, 64,  81, 104, 113,  92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103,  99,
];

/// Standard JPEG chrominance quantization table (Table K.2 of the JPEG spec).
pub const CHROMA_QT_BASE: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// Compute a quantization table for a quality factor (1-100).
///
/// Uses the standard libjpeg scaling formula:
/// - QF >= 50: scale = 200 - 2 * QF
/// - QF <  50: scale = 5000 / QF
pub fn scaled_quant_table(base: &[u16; 64], quality: u8) -> [u16; 64] {
    let qf = quality.clamp(1, 100) as u32;
    let scale = if qf >= 50 { 200 - 2 * qf } else { 5000 / qf };
    let mut qt = [0u16; 64];
    for i in 0..BLOCK_LEN {
        let val = (base[i] as u32 * scale + 50) / 100;
        qt[i] = val.clamp(1, 255) as u16;
    }
    qt
}

static BASIS: OnceLock<[f64; BLOCK_LEN]> = OnceLock::new();

/// Row-major orthonormal DCT-II basis: `B[u][x] = c(u) cos((2x + 1) uπ / 16)`.
fn basis() -> &'static [f64; BLOCK_LEN] {
    BASIS.get_or_init(|| {
        core::array::from_fn(|i| {
            let (u, x) = (i / 8, i % 8);
            let scale = if u == 0 { (1.0f64 / 8.0).sqrt() } else { 0.5 };
            scale * (((2 * x + 1) * u) as f64 * std::f64::consts::PI / 16.0).cos()
        })
    })
}

/// `a · b` for 8×8 matrices, with either operand optionally transposed.
fn matmul(a: &[f64; BLOCK_LEN], a_t: bool, b: &[f64; BLOCK_LEN], b_t: bool) -> [f64; BLOCK_LEN] {
    let at = |r: usize, c: usize| if a_t { a[c * 8 + r] } else { a[r * 8 + c] };
    let bt = |r: usize, c: usize| if b_t { b[c * 8 + r] } else { b[r * 8 + c] };
    core::array::from_fn(|i| {
        let (r, c) = (i / 8, i % 8);
        (0..8).map(|k| at(r, k) * bt(k, c)).sum()
    })
}

fn forward(samples: &[f64; BLOCK_LEN]) -> [f64; BLOCK_LEN] {
    let b = basis();
    matmul(&matmul(b, false, samples, false), false, b, true)
}

fn inverse(coeffs: &[f64; BLOCK_LEN]) -> [f64; BLOCK_LEN] {
    let b = basis();
    matmul(&matmul(b, true, coeffs, false), false, b, false)
}

/// Quantize and reconstruct one block of 0..255 samples (row-major).
///
/// Output is unclamped; callers round and clamp when converting back to
/// pixels.
pub fn requantize_block(samples: &[f64; BLOCK_LEN], qt: &[u16; BLOCK_LEN]) -> [f64; BLOCK_LEN] {
    let shifted = samples.map(|v| v - 128.0);
    let mut coeffs = forward(&shifted);
    for (c, &q) in coeffs.iter_mut().zip(qt) {
        let q = q as f64;
        *c = (*c / q).round() * q;
    }
    inverse(&coeffs).map(|v| v + 128.0)
}
