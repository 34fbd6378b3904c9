// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers every failure mode from buffer intake through
//! capacity checks, header validation and body extraction. Every variant is
//! terminal for the call that produced it: there is no partial result.

use core::fmt;

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug)]
pub enum StegoError {
    /// The coded payload needs more bits than the buffer can carry.
    /// Raised before the buffer is touched.
    InsufficientCapacity {
        /// Coded bits the frame needs.
        required: usize,
        /// Embeddable bits in the buffer (3 per pixel).
        available: usize,
    },
    /// The decoded header is not a plausible frame length (or, for checked
    /// frames, the magic/version prefix does not match). Typical causes: a
    /// cover image that carries no payload, or a channel that destroyed the
    /// header region.
    CorruptHeader {
        /// Decoded body length in bits (0 if the prefix was already invalid).
        body_bits: u32,
        /// Human-readable reason.
        reason: &'static str,
    },
    /// Fewer bits are present than the validated frame requires.
    TruncatedExtraction {
        /// Coded bits the extraction needs.
        required: usize,
        /// Coded bits actually present.
        available: usize,
    },
    /// CRC-32 over the body did not match (checked frames only).
    IntegrityMismatch {
        /// CRC carried in the frame trailer.
        stored: u32,
        /// CRC recomputed over the extracted body.
        computed: u32,
    },
    /// A message or key character lies outside the single-byte range.
    UnsupportedCharacter {
        /// The offending character.
        ch: char,
        /// Its character index in the input.
        index: usize,
    },
    /// Nothing to embed.
    EmptyMessage,
    /// The message body does not fit the 32-bit length header.
    MessageTooLarge,
    /// Pixel data length does not match `width * height * 4`.
    InvalidBuffer {
        width: u32,
        height: u32,
        len: usize,
    },
    /// The external image decoder failed to produce a pixel buffer.
    ImageLoad(String),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientCapacity { required, available } => write!(
                f,
                "message too long: needs {required} bits, capacity is {available}"
            ),
            Self::CorruptHeader { body_bits, reason } => write!(
                f,
                "invalid message length detected ({body_bits}): {reason}; data is likely corrupt or the key is incorrect"
            ),
            Self::TruncatedExtraction { required, available } => write!(
                f,
                "could not extract full message: needs {required} bits, only {available} present"
            ),
            Self::IntegrityMismatch { stored, computed } => write!(
                f,
                "body checksum mismatch (stored {stored:08x}, computed {computed:08x})"
            ),
            Self::UnsupportedCharacter { ch, index } => write!(
                f,
                "character {ch:?} at index {index} is outside the single-byte range (U+0000..U+00FF)"
            ),
            Self::EmptyMessage => write!(f, "message is empty"),
            Self::MessageTooLarge => write!(f, "message exceeds the 32-bit length header"),
            Self::InvalidBuffer { width, height, len } => write!(
                f,
                "pixel data length {len} does not match {width}x{height} RGBA"
            ),
            Self::ImageLoad(msg) => write!(f, "failed to load image: {msg}"),
        }
    }
}

impl std::error::Error for StegoError {}

impl StegoError {
    /// True for failures that indicate the image does not carry a readable
    /// payload for this key (as opposed to a caller-side problem such as
    /// exceeding capacity).
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::CorruptHeader { .. } | Self::TruncatedExtraction { .. } | Self::IntegrityMismatch { .. }
        )
    }
}
