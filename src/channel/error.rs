// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the distortion channel.

use core::fmt;

/// Errors from configuring or running the distortion channel.
#[derive(Debug)]
pub enum ChannelError {
    /// Recompression quality outside 50..=95.
    QualityOutOfRange(u8),
    /// Noise level outside 0..=5.
    NoiseOutOfRange(u8),
    /// Resize scale outside 0.75..=1.0 (or not finite).
    ScaleOutOfRange(f64),
    /// Settings could not be parsed.
    Config(String),
    /// A pluggable recompressor failed.
    Recompression(String),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QualityOutOfRange(q) => write!(f, "recompression quality {q} outside 50..=95"),
            Self::NoiseOutOfRange(n) => write!(f, "noise level {n} outside 0..=5"),
            Self::ScaleOutOfRange(s) => write!(f, "resize scale {s} outside 0.75..=1.0"),
            Self::Config(msg) => write!(f, "invalid distortion settings: {msg}"),
            Self::Recompression(msg) => write!(f, "recompression failed: {msg}"),
        }
    }
}

impl std::error::Error for ChannelError {}

impl From<toml::de::Error> for ChannelError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
