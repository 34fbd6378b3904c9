// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Repeating-key XOR stream cipher.
//!
//! Byte `i` of the input is XORed with byte `i mod key.len()` of the key.
//! The transform is its own inverse, so [`apply_xor`] serves for both
//! directions. It provides obfuscation only: a wrong key yields a different
//! but structurally plausible output, and corruption is only noticed
//! downstream by header validation (or by the checked frame's CRC).
//!
//! An empty key is an explicit no-op, not an error.

/// XOR `data` with a repeating `key`, returning a new buffer.
pub fn apply_xor(data: &[u8], key: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    apply_xor_in_place(&mut out, key);
    out
}

/// XOR `data` with a repeating `key` in place.
pub fn apply_xor_in_place(data: &mut [u8], key: &[u8]) {
    if key.is_empty() {
        return;
    }
    for (b, &k) in data.iter_mut().zip(key.iter().cycle()) {
        *b ^= k;
    }
}

/// Encrypt a plaintext message.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Vec<u8> {
    apply_xor(plaintext, key)
}

/// Decrypt a ciphertext. Identical to [`encrypt`].
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> Vec<u8> {
    apply_xor(ciphertext, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_inverse() {
        let msg = b"Secret message";
        let key = b"password123";
        let ct = encrypt(msg, key);
        assert_ne!(ct.as_slice(), msg.as_slice());
        assert_eq!(decrypt(&ct, key), msg);
    }

    #[test]
    fn key_repeats() {
        // "HI" ^ "K": 0x48^0x4B = 0x03, 0x49^0x4B = 0x02
        assert_eq!(encrypt(b"HI", b"K"), vec![0x03, 0x02]);
    }

    #[test]
    fn empty_key_is_noop() {
        assert_eq!(encrypt(b"plain", b""), b"plain");
        let mut buf = *b"plain";
        apply_xor_in_place(&mut buf, b"");
        assert_eq!(&buf, b"plain");
    }

    #[test]
    fn in_place_matches_copy() {
        let msg = b"The quick brown fox";
        let key = b"\x01\xFF\x7E";
        let mut buf = msg.to_vec();
        apply_xor_in_place(&mut buf, key);
        assert_eq!(buf, apply_xor(msg, key));
    }

    #[test]
    fn wrong_key_scrambles_without_error() {
        let ct = encrypt(b"attack at dawn", b"right");
        let pt = decrypt(&ct, b"wrong");
        assert_eq!(pt.len(), 14);
        assert_ne!(pt, b"attack at dawn");
    }
}
