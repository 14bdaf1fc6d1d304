use crate::error::Result;

/// A whole-buffer compressor.
pub trait Compressor {
    /// Compresses `input` into this codec's on-disk format.
    ///
    /// # Errors
    ///
    /// None of the bundled codecs fail on compression; the `Result` keeps the
    /// signature symmetric with [`Decompressor::decompress`].
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Returns the name of this compression algorithm.
    fn name(&self) -> &'static str;
}

/// A whole-buffer decompressor.
pub trait Decompressor {
    /// Reconstructs the original bytes from this codec's on-disk format.
    ///
    /// # Errors
    ///
    /// Returns `CompressionError` when `input` is not something the matching
    /// compressor could have produced. No partial output is returned.
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Returns the name of this decompression algorithm.
    fn name(&self) -> &'static str;
}

/// Trait combining both compression and decompression capabilities.
pub trait Codec: Compressor + Decompressor {}

impl<T: Compressor + Decompressor> Codec for T {}
