// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Least-significant-bit embedding in RGBA pixel buffers.
//!
//! Coded bit `k` lives in the LSB of channel `k % 3` (R, G, B) of pixel
//! `k / 3`, pixels in row-major order. Alpha never carries data. This
//! ordering is the wire format: embedder and extractor must agree on it bit
//! for bit.
//!
//! Because every bit's position is a pure function of its index, both sides
//! split the buffer into independent pixel ranges and process them on Rayon
//! workers when the `parallel` feature is enabled.

pub mod embed;
pub mod extract;

pub use embed::embed_bits;
pub use extract::extract_bits;

/// Pixels handled per parallel task.
pub(crate) const PIXELS_PER_TASK: usize = 4096;
