use thiserror::Error;

/// Failures reported by the codecs. Compression never fails; every variant
/// describes input handed to a decompressor that no compressor produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    /// A serialized Huffman tree has an unknown marker or ends early.
    #[error("Corrupted tree data: {0}")]
    CorruptedTreeData(String),

    /// An LZW code that is neither in the dictionary nor the next code to be assigned.
    #[error("Invalid LZW code {code} (next assignable code is {next_code})")]
    InvalidLzwCode { code: u16, next_code: u32 },

    /// Header lengths of a Huffman container disagree with the buffer.
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// An RLE stream with an unpaired trailing count byte.
    #[error("Malformed RLE stream: odd length {len}")]
    MalformedRleStream { len: usize },

    /// An LZW stream whose length is not a whole number of 2-byte codes.
    #[error("Malformed LZW stream: odd length {len}")]
    MalformedLzwStream { len: usize },

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

pub type Result<T> = std::result::Result<T, CompressionError>;
