//! Lossless whole-buffer codecs.
//!
//! This library provides implementations of:
//! - RLE (Run-Length Encoding) over `(count, value)` byte pairs
//! - Huffman coding with a self-describing on-disk container
//! - LZW dictionary coding with 16-bit codes
//!
//! Every codec is a small stateless value implementing [`Compressor`] and
//! [`Decompressor`]; calls on different buffers may run on any thread.
//!
//! # Example
//!
//! ```
//! use bytecodec::{Compressor, Decompressor, Huffman, Lzw, Rle};
//!
//! let data = b"aaabbbcccaaabbbccc";
//!
//! let rle = Rle::new();
//! let compressed = rle.compress(data).unwrap();
//! assert_eq!(rle.decompress(&compressed).unwrap(), data);
//!
//! let huffman = Huffman::new();
//! let compressed = huffman.compress(data).unwrap();
//! assert_eq!(huffman.decompress(&compressed).unwrap(), data);
//!
//! let lzw = Lzw::new();
//! let compressed = lzw.compress(data).unwrap();
//! assert_eq!(lzw.decompress(&compressed).unwrap(), data);
//! ```

mod algorithm;
pub mod bitio;
mod container;
mod error;
mod huffman;
pub mod lzw;
mod rle;
mod traits;
pub mod tree;

pub use algorithm::Algorithm;
pub use container::{HEADER_LEN, HuffmanContainer};
pub use error::{CompressionError, Result};
pub use huffman::{Huffman, HuffmanEncoding};
pub use lzw::Lzw;
pub use rle::{Rle, TrailingByte};
pub use traits::{Codec, Compressor, Decompressor};
pub use tree::{CodeTable, FrequencyTable, HuffmanTree, Node};
