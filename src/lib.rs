// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # veil-core
//!
//! Least-significant-bit steganography for RGBA pixel buffers. A text
//! message is XOR-enciphered with a key, framed behind a 32-bit length
//! header, protected with a 3× repetition code, and written into the low bit
//! of every R, G and B channel in row-major pixel order.
//!
//! The crate also ships a [`DistortionSimulator`] that pushes a stego image
//! through resize, noise and JPEG-style requantization, so decode robustness
//! can be measured without a real lossy pipeline.
//!
//! Image files are out of scope: callers decode files to a [`PixelBuffer`]
//! themselves (see [`ImageDecoder`]) and re-encode the result losslessly.
//!
//! # Quick start
//!
//! ```rust
//! use veil_core::{decode, encode, PixelBuffer};
//!
//! let mut image = PixelBuffer::filled(64, 64, [120, 130, 140, 255]);
//! encode(&mut image, "HI", "K").unwrap();
//! let decoded = decode(&image, "K").unwrap();
//! assert_eq!(decoded.text(), "HI");
//! assert_eq!(decoded.corrected_bits, 0);
//! ```

pub mod channel;
pub mod raster;
pub mod stego;

pub use channel::{ChannelError, DistortionSettings, DistortionSimulator, JpegRequantizer, Recompressor};
pub use raster::resample::ResizeFilter;
pub use raster::{load_pixels, ImageDecoder, PixelBuffer};
pub use stego::{
    capacity_bits, decode, decode_bytes, decode_with, encode, encode_bytes, encode_with, max_message_len,
    required_coded_bits, DecodeResult, EncodeReport, FrameFormat, StegoError, StegoOptions,
};
