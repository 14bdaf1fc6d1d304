use std::fmt;
use std::str::FromStr;

use crate::error::{CompressionError, Result};
use crate::traits::{Compressor, Decompressor};
use crate::{Huffman, Lzw, Rle};

/// Selects one of the bundled codecs by name, with default settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Rle,
    Huffman,
    Lzw,
}

impl Algorithm {
    pub const ALL: [Self; 3] = [Self::Rle, Self::Huffman, Self::Lzw];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rle => "rle",
            Self::Huffman => "huffman",
            Self::Lzw => "lzw",
        }
    }

    /// # Errors
    ///
    /// Propagates the selected codec's error.
    pub fn compress(self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Rle => Rle::new().compress(input),
            Self::Huffman => Huffman::new().compress(input),
            Self::Lzw => Lzw::new().compress(input),
        }
    }

    /// # Errors
    ///
    /// Propagates the selected codec's error.
    pub fn decompress(self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Rle => Rle::new().decompress(input),
            Self::Huffman => Huffman::new().decompress(input),
            Self::Lzw => Lzw::new().decompress(input),
        }
    }
}

impl FromStr for Algorithm {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                CompressionError::UnknownAlgorithm(s.to_string())
            })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
