// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Steganographic encoding and decoding.
//!
//! The codec is a fixed chain of small stages:
//!
//! - [`cipher`]: repeating-key XOR over the message bytes.
//! - [`frame`]: bit conversion and the 32-bit length header (optionally
//!   wrapped in a magic/version prefix and CRC-32 trailer).
//! - [`repetition`]: 3× repetition code with majority-vote decoding.
//! - [`lsb`]: one coded bit per R, G, B channel of each pixel.
//!
//! [`encode`] and [`decode`] wire them together. Capacity is checked before
//! the buffer is touched, and every decode failure is classified as a
//! [`StegoError`] rather than returning a partial message.

pub mod error;
pub mod cipher;
pub mod frame;
pub mod repetition;
pub mod capacity;
pub mod lsb;
mod pipeline;

pub use error::StegoError;
pub use frame::FrameFormat;
pub use pipeline::{
    decode, decode_bytes, decode_with, encode, encode_bytes, encode_with, DecodeResult, EncodeReport,
    StegoOptions,
};
pub use capacity::{capacity_bits, max_message_len, required_coded_bits};
