use log::debug;

use crate::error::{CompressionError, Result};
use crate::traits::{Compressor, Decompressor};

const MAX_RUN_LENGTH: u8 = 255;

/// What [`Rle`] does with a stream whose last count byte has no value byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TrailingByte {
    /// Fail with [`CompressionError::MalformedRleStream`].
    #[default]
    Reject,
    /// Ignore the unpaired byte and decode the complete pairs.
    Drop,
}

/// Run-length codec over `(count, value)` byte pairs.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rle {
    trailing_byte: TrailingByte,
}

impl Rle {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trailing_byte: TrailingByte::Reject,
        }
    }

    #[must_use]
    pub const fn with_trailing_byte(mut self, policy: TrailingByte) -> Self {
        self.trailing_byte = policy;
        self
    }

    #[must_use]
    pub const fn trailing_byte(&self) -> TrailingByte {
        self.trailing_byte
    }
}

impl Compressor for Rle {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let mut output = Vec::with_capacity(input.len());
        let mut i = 0;

        while i < input.len() {
            let current_byte = input[i];
            let mut run_length: u8 = 1;

            while i + usize::from(run_length) < input.len()
                && input[i + usize::from(run_length)] == current_byte
                && run_length < MAX_RUN_LENGTH
            {
                run_length += 1;
            }

            output.push(run_length);
            output.push(current_byte);
            i += usize::from(run_length);
        }

        debug!("rle: {} bytes -> {} runs", input.len(), output.len() / 2);
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "RLE"
    }
}

impl Decompressor for Rle {
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let pairs = input.chunks_exact(2);
        if !pairs.remainder().is_empty() {
            match self.trailing_byte {
                TrailingByte::Reject => {
                    return Err(CompressionError::MalformedRleStream { len: input.len() });
                }
                TrailingByte::Drop => debug!("rle: dropping unpaired trailing byte"),
            }
        }

        let total: usize = pairs.clone().map(|pair| usize::from(pair[0])).sum();
        let mut output = Vec::with_capacity(total);
        for pair in pairs {
            output.extend(std::iter::repeat_n(pair[1], usize::from(pair[0])));
        }

        Ok(output)
    }

    fn name(&self) -> &'static str {
        "RLE"
    }
}
