// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Repetition coding with hard majority voting.
//!
//! Every frame bit is written as [`REPETITION`] consecutive copies. On
//! extraction each non-overlapping group of copies is resolved by majority,
//! which corrects any single flipped copy per group. Two flipped copies in
//! the same group decode silently to the wrong value; the code has no way to
//! tell that case apart from a clean group.

/// Copies per source bit. Odd, so a majority always exists.
pub const REPETITION: usize = 3;

/// Stats from repetition decode for channel quality measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepetitionStats {
    /// Groups that were not unanimous but still resolved by majority.
    pub corrected: usize,
    /// Groups decoded.
    pub groups: usize,
}

impl RepetitionStats {
    /// Fold another decode's counters into this one.
    pub fn merge(self, other: RepetitionStats) -> RepetitionStats {
        RepetitionStats {
            corrected: self.corrected + other.corrected,
            groups: self.groups + other.groups,
        }
    }
}

/// Lay out [`REPETITION`] consecutive copies of each bit.
///
/// Output length is exactly `REPETITION * bits.len()`.
pub fn repetition_encode(bits: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(bits.len() * REPETITION);
    for &bit in bits {
        output.extend(std::iter::repeat(bit & 1).take(REPETITION));
    }
    output
}

/// Majority vote over consecutive groups of [`REPETITION`] copies.
///
/// A group decodes to 1 if more than half of its copies are 1. Trailing
/// copies that do not fill a whole group are dropped.
pub fn repetition_decode(coded: &[u8]) -> (Vec<u8>, RepetitionStats) {
    let mut voted = Vec::with_capacity(coded.len() / REPETITION);
    let mut stats = RepetitionStats::default();

    for group in coded.chunks_exact(REPETITION) {
        let ones = group.iter().filter(|&&b| b & 1 == 1).count();
        let bit = if ones * 2 > REPETITION { 1 } else { 0 };
        // Unanimous groups have 0 or REPETITION ones; anything else had a
        // minority copy outvoted.
        if ones != 0 && ones != REPETITION {
            stats.corrected += 1;
        }
        stats.groups += 1;
        voted.push(bit);
    }

    (voted, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_triples_each_bit() {
        assert_eq!(repetition_encode(&[1, 0, 1]), vec![1, 1, 1, 0, 0, 0, 1, 1, 1]);
        assert!(repetition_encode(&[]).is_empty());
    }

    #[test]
    fn encode_decode_no_noise() {
        let bits = vec![0, 1, 1, 0, 1, 0, 0, 1];
        let coded = repetition_encode(&bits);
        assert_eq!(coded.len(), 3 * bits.len());
        let (decoded, stats) = repetition_decode(&coded);
        assert_eq!(decoded, bits);
        assert_eq!(stats.corrected, 0);
        assert_eq!(stats.groups, 8);
    }

    #[test]
    fn single_flip_corrected_and_counted() {
        for bit in [0u8, 1] {
            for pos in 0..3 {
                let mut coded = repetition_encode(&[bit]);
                coded[pos] ^= 1;
                let (decoded, stats) = repetition_decode(&coded);
                assert_eq!(decoded, vec![bit], "bit={bit} flipped copy {pos}");
                assert_eq!(stats.corrected, 1);
            }
        }
    }

    #[test]
    fn double_flip_decodes_wrong_silently() {
        let mut coded = repetition_encode(&[1]);
        coded[0] = 0;
        coded[2] = 0;
        let (decoded, stats) = repetition_decode(&coded);
        assert_eq!(decoded, vec![0]);
        // Still counted as a correction: the decoder cannot see the difference.
        assert_eq!(stats.corrected, 1);
    }

    #[test]
    fn triple_flip_is_invisible() {
        let (decoded, stats) = repetition_decode(&[0, 0, 0]);
        assert_eq!(decoded, vec![0]);
        assert_eq!(stats.corrected, 0);
    }

    #[test]
    fn trailing_partial_group_dropped() {
        let (decoded, stats) = repetition_decode(&[1, 1, 1, 0, 1]);
        assert_eq!(decoded, vec![1]);
        assert_eq!(stats.groups, 1);
    }

    #[test]
    fn stats_merge() {
        let a = RepetitionStats { corrected: 2, groups: 32 };
        let b = RepetitionStats { corrected: 1, groups: 16 };
        assert_eq!(a.merge(b), RepetitionStats { corrected: 3, groups: 48 });
    }
}
