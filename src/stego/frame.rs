// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Payload frame construction and parsing.
//!
//! The frame is the bitstream that wraps the ciphertext before repetition
//! coding and embedding. Two layouts exist:
//!
//! ```text
//! Plain (default, versionless):
//! [32 bits] body length in bits (big-endian u32)
//! [N bits ] body (ciphertext, MSB first per byte)
//!
//! Checked:
//! [16 bits] magic "VL"
//! [ 8 bits] version (0x01)
//! [32 bits] body length in bits (big-endian u32)
//! [N bits ] body
//! [32 bits] CRC-32 of the body bytes
//! ```
//!
//! The body length is always a multiple of 8. Everything above the body is
//! the "header region" read in the first extraction phase.

use serde::{Deserialize, Serialize};

use crate::stego::error::StegoError;

/// Width of the big-endian length field.
pub const LENGTH_BITS: usize = 32;

/// Magic bytes of a checked frame.
pub const CHECKED_MAGIC: [u8; 2] = *b"VL";

/// Current checked-frame version.
pub const CHECKED_VERSION: u8 = 0x01;

/// Magic + version, in bits.
const CHECKED_PREFIX_BITS: usize = 24;

/// CRC-32 trailer, in bits.
const CHECKED_TRAILER_BITS: usize = 32;

/// Wire layout of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    /// Bare 32-bit length header followed by the body.
    #[default]
    Plain,
    /// Magic/version prefix and a CRC-32 trailer around the plain layout.
    Checked,
}

impl FrameFormat {
    /// Bits read in the first extraction phase (prefix + length field).
    pub fn header_bits(self) -> usize {
        match self {
            Self::Plain => LENGTH_BITS,
            Self::Checked => CHECKED_PREFIX_BITS + LENGTH_BITS,
        }
    }

    /// Bits that follow the body.
    pub fn trailer_bits(self) -> usize {
        match self {
            Self::Plain => 0,
            Self::Checked => CHECKED_TRAILER_BITS,
        }
    }

    /// Total uncoded frame length for a body of `body_bits`.
    pub fn frame_bits(self, body_bits: usize) -> usize {
        self.header_bits() + body_bits + self.trailer_bits()
    }
}

/// A built frame: ciphertext body plus its layout.
#[derive(Debug, Clone)]
pub struct Frame {
    format: FrameFormat,
    body: Vec<u8>,
}

impl Frame {
    /// Wrap a ciphertext body.
    ///
    /// # Errors
    /// - [`StegoError::EmptyMessage`] if `body` is empty (a zero length
    ///   header is indistinguishable from an empty cover).
    /// - [`StegoError::MessageTooLarge`] if the bit length overflows `u32`.
    pub fn new(body: Vec<u8>, format: FrameFormat) -> Result<Self, StegoError> {
        if body.is_empty() {
            return Err(StegoError::EmptyMessage);
        }
        if body.len() > (u32::MAX / 8) as usize {
            return Err(StegoError::MessageTooLarge);
        }
        Ok(Self { format, body })
    }

    /// Body length in bits; the value carried in the length field.
    pub fn body_bits(&self) -> u32 {
        (self.body.len() * 8) as u32
    }

    /// Header region bits (prefix, if any, then the length field).
    pub fn header_bits(&self) -> Vec<u8> {
        let mut bits = Vec::with_capacity(self.format.header_bits());
        if self.format == FrameFormat::Checked {
            bits.extend(bytes_to_bits(&CHECKED_MAGIC));
            bits.extend(bytes_to_bits(&[CHECKED_VERSION]));
        }
        bits.extend(build_header(self.body_bits()));
        bits
    }

    /// Body bits followed by the trailer, if any.
    pub fn payload_bits(&self) -> Vec<u8> {
        let mut bits = bytes_to_bits(&self.body);
        if self.format == FrameFormat::Checked {
            let crc = crc32fast::hash(&self.body);
            bits.extend(bytes_to_bits(&crc.to_be_bytes()));
        }
        bits
    }
}

/// Encode a body bit length as a 32-bit big-endian bitstream.
pub fn build_header(body_bits: u32) -> Vec<u8> {
    bytes_to_bits(&body_bits.to_be_bytes())
}

/// Parse the first 32 bits of `bits` as a big-endian length.
/// Missing bits are treated as zero.
pub fn parse_header(bits: &[u8]) -> u32 {
    (0..LENGTH_BITS).fold(0u32, |acc, i| {
        let bit = bits.get(i).copied().unwrap_or(0) & 1;
        (acc << 1) | bit as u32
    })
}

/// Parse the header region of a frame and return the declared body length.
///
/// For checked frames the magic and version are verified first. Range
/// validation of the length is left to the extractor, which knows the
/// buffer capacity.
pub fn parse_header_region(bits: &[u8], format: FrameFormat) -> Result<u32, StegoError> {
    match format {
        FrameFormat::Plain => Ok(parse_header(bits)),
        FrameFormat::Checked => {
            let prefix = bits_to_bytes(&bits[..CHECKED_PREFIX_BITS.min(bits.len())]);
            if prefix.len() < 3 || prefix[..2] != CHECKED_MAGIC {
                return Err(StegoError::CorruptHeader { body_bits: 0, reason: "frame magic mismatch" });
            }
            if prefix[2] != CHECKED_VERSION {
                return Err(StegoError::CorruptHeader { body_bits: 0, reason: "unsupported frame version" });
            }
            Ok(parse_header(&bits[CHECKED_PREFIX_BITS..]))
        }
    }
}

/// Turn the extracted body (+ trailer) bits back into body bytes.
///
/// For checked frames the CRC-32 trailer is verified against the body.
pub fn parse_payload(bits: &[u8], body_bits: usize, format: FrameFormat) -> Result<Vec<u8>, StegoError> {
    let split = body_bits.min(bits.len());
    let body = bits_to_bytes(&bits[..split]);
    if format == FrameFormat::Checked {
        let trailer = bits_to_bytes(&bits[split..]);
        let stored = match trailer.get(..4) {
            Some(t) => u32::from_be_bytes([t[0], t[1], t[2], t[3]]),
            None => {
                return Err(StegoError::TruncatedExtraction {
                    required: body_bits + CHECKED_TRAILER_BITS,
                    available: bits.len(),
                })
            }
        };
        let computed = crc32fast::hash(&body);
        if stored != computed {
            return Err(StegoError::IntegrityMismatch { stored, computed });
        }
    }
    Ok(body)
}

/// Convert single-byte text to bytes, one byte per character.
///
/// Returns [`StegoError::UnsupportedCharacter`] for any character above
/// U+00FF; such a character would need more than 8 bits and shift every
/// following byte boundary.
pub fn latin1_to_bytes(text: &str) -> Result<Vec<u8>, StegoError> {
    text.chars()
        .enumerate()
        .map(|(index, ch)| u8::try_from(ch).map_err(|_| StegoError::UnsupportedCharacter { ch, index }))
        .collect()
}

/// Map bytes back to text, one character per byte.
pub fn bytes_to_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Single-byte text to bits (8 per character, MSB first).
pub fn text_to_bits(text: &str) -> Result<Vec<u8>, StegoError> {
    Ok(bytes_to_bits(&latin1_to_bytes(text)?))
}

/// Bits to single-byte text. A trailing group shorter than 8 bits is dropped.
pub fn bits_to_text(bits: &[u8]) -> String {
    bytes_to_latin1(&bits_to_bytes(bits))
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
/// A trailing group shorter than 8 bits is discarded, not padded.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | (bit & 1)))
        .collect()
}
