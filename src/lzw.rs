//! LZW dictionary coding with fixed 16-bit codes.
//!
//! Codes `0..=255` stand for single bytes. New strings get codes from 256
//! upward in the order they are first seen. Once the highest permitted code
//! has been handed out the dictionary freezes and coding continues with the
//! entries it already has. The dictionary lives only for one call.
//!
//! On the wire every code is two bytes, little-endian.

use std::collections::HashMap;

use log::debug;

use crate::error::{CompressionError, Result};
use crate::traits::{Compressor, Decompressor};

/// Bits per code in the serialized stream.
pub const CODE_WIDTH: u32 = u16::BITS;

const FIRST_FREE_CODE: u32 = 256;

#[derive(Debug, Clone, Copy)]
pub struct Lzw {
    max_code: u16,
}

impl Default for Lzw {
    fn default() -> Self {
        Self::new()
    }
}

impl Lzw {
    #[must_use]
    pub const fn new() -> Self {
        Self { max_code: u16::MAX }
    }

    /// Caps the dictionary at `max_code`. The wire format keeps 16-bit codes.
    #[must_use]
    pub const fn with_max_code(mut self, max_code: u16) -> Self {
        self.max_code = max_code;
        self
    }

    #[must_use]
    pub const fn max_code(&self) -> u16 {
        self.max_code
    }

    fn can_assign(self, next_code: u32) -> bool {
        next_code <= u32::from(self.max_code)
    }

    /// Encodes `input` as a sequence of dictionary codes.
    #[must_use]
    pub fn encode(&self, input: &[u8]) -> Vec<u16> {
        // A string is keyed by the code of its prefix and its last byte.
        let mut dictionary: HashMap<(u16, u8), u16> = HashMap::new();
        let mut next_code = FIRST_FREE_CODE;
        let mut codes = Vec::new();
        let mut current: Option<u16> = None;

        for &byte in input {
            let Some(prefix) = current else {
                current = Some(u16::from(byte));
                continue;
            };

            if let Some(&code) = dictionary.get(&(prefix, byte)) {
                current = Some(code);
                continue;
            }

            codes.push(prefix);
            if self.can_assign(next_code)
                && let Ok(code) = u16::try_from(next_code)
            {
                dictionary.insert((prefix, byte), code);
                next_code += 1;
                if !self.can_assign(next_code) {
                    debug!("lzw: dictionary full at code {code}");
                }
            }
            current = Some(u16::from(byte));
        }

        if let Some(code) = current {
            codes.push(code);
        }

        debug!("lzw: {} bytes -> {} codes", input.len(), codes.len());
        codes
    }

    /// Rebuilds the bytes for a code sequence produced by [`Lzw::encode`]
    /// with the same `max_code`.
    ///
    /// # Errors
    ///
    /// Returns [`CompressionError::InvalidLzwCode`] for a code that is not in
    /// the dictionary and is not the code about to be assigned.
    pub fn decode(&self, codes: &[u16]) -> Result<Vec<u8>> {
        let mut dictionary: Vec<Vec<u8>> = (0..=u8::MAX).map(|byte| vec![byte]).collect();
        let mut next_code = FIRST_FREE_CODE;
        let mut output = Vec::new();
        let mut previous: Vec<u8> = Vec::new();

        for &code in codes {
            let current = if let Some(entry) = dictionary.get(usize::from(code)) {
                entry.clone()
            } else if u32::from(code) == next_code
                && self.can_assign(next_code)
                && let Some(&first) = previous.first()
            {
                // The encoder defined this code on the step that emitted it.
                let mut entry = previous.clone();
                entry.push(first);
                entry
            } else {
                return Err(CompressionError::InvalidLzwCode { code, next_code });
            };

            output.extend_from_slice(&current);

            if !previous.is_empty() && self.can_assign(next_code) {
                let mut entry = std::mem::take(&mut previous);
                entry.push(current[0]);
                dictionary.push(entry);
                next_code += 1;
            }
            previous = current;
        }

        Ok(output)
    }
}

/// Serializes codes as little-endian 16-bit values.
#[must_use]
pub fn codes_to_bytes(codes: &[u16]) -> Vec<u8> {
    codes.iter().flat_map(|code| code.to_le_bytes()).collect()
}

/// Parses a little-endian 16-bit code stream.
///
/// # Errors
///
/// Returns [`CompressionError::MalformedLzwStream`] if `bytes` has odd length.
pub fn bytes_to_codes(bytes: &[u8]) -> Result<Vec<u16>> {
    let pairs = bytes.chunks_exact(2);
    if !pairs.remainder().is_empty() {
        return Err(CompressionError::MalformedLzwStream { len: bytes.len() });
    }
    Ok(pairs
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

impl Compressor for Lzw {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(codes_to_bytes(&self.encode(input)))
    }

    fn name(&self) -> &'static str {
        "LZW"
    }
}

impl Decompressor for Lzw {
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.decode(&bytes_to_codes(input)?)
    }

    fn name(&self) -> &'static str {
        "LZW"
    }
}
