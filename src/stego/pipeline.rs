// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Encode/decode pipeline.
//!
//! Encode: XOR cipher → frame (header + body) → 3× repetition → LSB embed.
//!
//! Decode runs in two phases because the body length is unknown until the
//! header is read:
//! 1. Extract and majority-decode the header region, then validate the
//!    declared length against the buffer capacity.
//! 2. Extract and majority-decode the body, then decrypt.
//!
//! Both directions are pure functions of their arguments; nothing survives
//! between calls.

use serde::{Deserialize, Serialize};

use crate::raster::PixelBuffer;
use crate::stego::capacity::capacity_bits;
use crate::stego::cipher;
use crate::stego::error::StegoError;
use crate::stego::frame::{self, Frame, FrameFormat};
use crate::stego::lsb::{embed_bits, extract_bits};
use crate::stego::repetition::{repetition_decode, repetition_encode, REPETITION};

/// Codec options shared by encoder and decoder. Both sides must agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoOptions {
    /// Frame layout; [`FrameFormat::Plain`] unless both sides opt in.
    pub format: FrameFormat,
}

/// Summary of a successful encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    /// Value written to the length header (body length in bits).
    pub body_bits: u32,
    /// Coded bits spent on the header region.
    pub header_coded_bits: usize,
    /// Total coded bits embedded (header region + body + trailer).
    pub coded_bits: usize,
    /// Embeddable bits in the buffer.
    pub capacity_bits: usize,
}

/// A successfully recovered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    /// Decrypted message bytes.
    pub bytes: Vec<u8>,
    /// Repetition groups (header and body) that needed a majority vote.
    pub corrected_bits: usize,
}

impl DecodeResult {
    /// The message as single-byte text (one character per byte).
    pub fn text(&self) -> String {
        frame::bytes_to_latin1(&self.bytes)
    }

    /// The message interpreted as UTF-8, for callers that framed UTF-8 bytes.
    pub fn utf8(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }
}

/// Hide `message` in `buf` using `key` and the default (plain) frame.
///
/// Both `message` and `key` must consist of characters in U+0000..U+00FF.
///
/// # Errors
/// - [`StegoError::UnsupportedCharacter`] for a character above U+00FF.
/// - [`StegoError::EmptyMessage`] if `message` is empty.
/// - [`StegoError::InsufficientCapacity`] if the coded frame does not fit.
///
/// On error the buffer is unchanged.
pub fn encode(buf: &mut PixelBuffer, message: &str, key: &str) -> Result<EncodeReport, StegoError> {
    encode_with(buf, message, key, &StegoOptions::default())
}

/// [`encode`] with explicit options.
pub fn encode_with(
    buf: &mut PixelBuffer,
    message: &str,
    key: &str,
    options: &StegoOptions,
) -> Result<EncodeReport, StegoError> {
    let message = frame::latin1_to_bytes(message)?;
    let key = frame::latin1_to_bytes(key)?;
    encode_bytes(buf, &message, &key, options)
}

/// Hide raw message bytes in `buf`.
pub fn encode_bytes(
    buf: &mut PixelBuffer,
    message: &[u8],
    key: &[u8],
    options: &StegoOptions,
) -> Result<EncodeReport, StegoError> {
    if key.is_empty() {
        log::debug!("empty key: cipher stage is a no-op");
    }
    let ciphertext = cipher::encrypt(message, key);
    let frame = Frame::new(ciphertext, options.format)?;

    let mut coded = repetition_encode(&frame.header_bits());
    let header_coded_bits = coded.len();
    coded.extend(repetition_encode(&frame.payload_bits()));

    let capacity = capacity_bits(buf);
    embed_bits(buf, &coded)?;

    log::debug!(
        "embedded {} body bits as {} coded bits ({:.1}% of {} capacity, {:?} frame)",
        frame.body_bits(),
        coded.len(),
        100.0 * coded.len() as f64 / capacity.max(1) as f64,
        capacity,
        options.format,
    );

    Ok(EncodeReport {
        body_bits: frame.body_bits(),
        header_coded_bits,
        coded_bits: coded.len(),
        capacity_bits: capacity,
    })
}

/// Recover a message from `buf` using `key` and the default (plain) frame.
///
/// A wrong key is not detected here: it yields either
/// [`StegoError::CorruptHeader`] or a successful decode of scrambled text.
///
/// # Errors
/// - [`StegoError::UnsupportedCharacter`] if `key` has a character above U+00FF.
/// - [`StegoError::TruncatedExtraction`] if the buffer is smaller than the
///   header region.
/// - [`StegoError::CorruptHeader`] if the declared length is zero, not
///   byte-aligned, or larger than the buffer can hold.
pub fn decode(buf: &PixelBuffer, key: &str) -> Result<DecodeResult, StegoError> {
    decode_with(buf, key, &StegoOptions::default())
}

/// [`decode`] with explicit options.
pub fn decode_with(buf: &PixelBuffer, key: &str, options: &StegoOptions) -> Result<DecodeResult, StegoError> {
    let key = frame::latin1_to_bytes(key)?;
    decode_bytes(buf, &key, options)
}

/// Recover raw message bytes from `buf`.
pub fn decode_bytes(buf: &PixelBuffer, key: &[u8], options: &StegoOptions) -> Result<DecodeResult, StegoError> {
    let format = options.format;
    let capacity = capacity_bits(buf);

    // Phase 1: header region.
    let header_coded_bits = format.header_bits() * REPETITION;
    let coded_header = extract_bits(buf, 0, header_coded_bits)?;
    let (header_bits, header_stats) = repetition_decode(&coded_header);
    let body_bits = frame::parse_header_region(&header_bits, format)?;
    log::trace!("header declares {body_bits} body bits ({} corrected)", header_stats.corrected);

    let payload_bits = validate_body_length(body_bits, header_coded_bits, capacity, format)?;

    // Phase 2: body (+ trailer).
    let coded_payload = extract_bits(buf, header_coded_bits, payload_bits * REPETITION)?;
    let (payload, body_stats) = repetition_decode(&coded_payload);
    let ciphertext = frame::parse_payload(&payload, body_bits as usize, format)?;
    let bytes = cipher::decrypt(&ciphertext, key);

    let stats = header_stats.merge(body_stats);
    log::debug!(
        "decoded {} bytes, {} of {} repetition groups corrected",
        bytes.len(),
        stats.corrected,
        stats.groups,
    );

    Ok(DecodeResult { bytes, corrected_bits: stats.corrected })
}

/// Check a decoded length field and return the uncoded bits still to read
/// (body + trailer).
fn validate_body_length(
    body_bits: u32,
    header_coded_bits: usize,
    capacity: usize,
    format: FrameFormat,
) -> Result<usize, StegoError> {
    if body_bits == 0 {
        return Err(StegoError::CorruptHeader { body_bits, reason: "length is zero" });
    }
    if body_bits % 8 != 0 {
        return Err(StegoError::CorruptHeader { body_bits, reason: "length is not byte-aligned" });
    }
    let payload_bits = (body_bits as usize).saturating_add(format.trailer_bits());
    let required = payload_bits
        .checked_mul(REPETITION)
        .and_then(|b| b.checked_add(header_coded_bits));
    match required {
        Some(r) if r <= capacity => Ok(payload_bits),
        _ => Err(StegoError::CorruptHeader { body_bits, reason: "length exceeds image capacity" }),
    }
}
