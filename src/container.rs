//! On-disk layout of a Huffman-compressed buffer.
//!
//! ```text
//! [bit_length: u64 LE][tree_size: u64 LE][tree bytes][packed payload]
//! ```

use crate::error::{CompressionError, Result};
use crate::huffman::HuffmanEncoding;
use crate::tree;

/// Bytes taken by the two length fields.
pub const HEADER_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanContainer {
    /// Number of meaningful bits in `payload`.
    pub bit_length: u64,
    pub tree_bytes: Vec<u8>,
    pub payload: Vec<u8>,
}

impl HuffmanContainer {
    #[must_use]
    pub fn from_encoding(encoding: &HuffmanEncoding) -> Self {
        Self {
            bit_length: encoding.bit_length,
            tree_bytes: tree::serialize(Some(&encoding.tree)),
            payload: encoding.payload.clone(),
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut output =
            Vec::with_capacity(HEADER_LEN + self.tree_bytes.len() + self.payload.len());
        output.extend_from_slice(&self.bit_length.to_le_bytes());
        output.extend_from_slice(&(self.tree_bytes.len() as u64).to_le_bytes());
        output.extend_from_slice(&self.tree_bytes);
        output.extend_from_slice(&self.payload);
        output
    }

    /// Splits a container into its parts without interpreting the tree.
    ///
    /// # Errors
    ///
    /// Returns [`CompressionError::MalformedContainer`] if the header is
    /// short or the declared tree size runs past the end of `input`.
    pub fn parse(input: &[u8]) -> Result<Self> {
        if input.len() < HEADER_LEN {
            return Err(malformed(format!(
                "header needs {HEADER_LEN} bytes, got {}",
                input.len()
            )));
        }

        let bit_length = read_u64(input, 0)?;
        let declared_tree_size = read_u64(input, 8)?;

        let remaining = input.len() - HEADER_LEN;
        let tree_end = usize::try_from(declared_tree_size)
            .ok()
            .and_then(|size| HEADER_LEN.checked_add(size))
            .filter(|&end| end <= input.len())
            .ok_or_else(|| {
                malformed(format!(
                    "tree size {declared_tree_size} exceeds {remaining} remaining bytes"
                ))
            })?;

        Ok(Self {
            bit_length,
            tree_bytes: input[HEADER_LEN..tree_end].to_vec(),
            payload: input[tree_end..].to_vec(),
        })
    }
}

fn read_u64(input: &[u8], offset: usize) -> Result<u64> {
    input
        .get(offset..offset + 8)
        .and_then(|field| <[u8; 8]>::try_from(field).ok())
        .map(u64::from_le_bytes)
        .ok_or_else(|| {
            malformed(format!("missing length field at offset {offset}"))
        })
}

pub const fn malformed(message: String) -> CompressionError {
    CompressionError::MalformedContainer(message)
}
