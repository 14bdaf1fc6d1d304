use log::{debug, trace};

use crate::bitio;
use crate::container::{HuffmanContainer, malformed};
use crate::error::Result;
use crate::traits::{Compressor, Decompressor};
use crate::tree::{self, FrequencyTable, HuffmanTree, Node};

/// Output of [`Huffman::encode`] before it is laid out as a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanEncoding {
    /// Exact number of code bits; the payload is zero-padded past this.
    pub bit_length: u64,
    pub tree: HuffmanTree,
    pub payload: Vec<u8>,
}

/// Huffman codec. `compress` produces a self-describing container holding
/// the bit length, the serialized tree and the packed codes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Huffman;

impl Huffman {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encodes `input`, or returns `None` for an empty buffer.
    #[must_use]
    pub fn encode(&self, input: &[u8]) -> Option<HuffmanEncoding> {
        if input.is_empty() {
            return None;
        }

        let frequencies = FrequencyTable::from_bytes(input);
        // A non-empty buffer always yields a tree with a code for each of its bytes.
        let tree = HuffmanTree::build(&frequencies)?;
        let codes = tree.code_table();
        let bit_length = codes.encoded_bits(&frequencies);

        let mut bits = Vec::with_capacity(usize::try_from(bit_length).unwrap_or_default());
        for &byte in input {
            bits.extend_from_slice(codes.code(byte));
        }

        debug!(
            "huffman: {} bytes, {} symbols, {bit_length} bits",
            input.len(),
            codes.len()
        );

        Some(HuffmanEncoding {
            bit_length,
            tree,
            payload: bitio::pack(&bits),
        })
    }

    /// Decodes `bit_length` bits of `payload` against `tree`.
    ///
    /// A single-leaf tree carries one `0` bit per symbol, so its symbol is
    /// repeated `bit_length` times without walking the tree. For any other
    /// tree a `bit_length` of zero decodes every bit of the payload.
    ///
    /// # Errors
    ///
    /// Returns `MalformedContainer` when the payload holds fewer than
    /// `bit_length` bits or the bits stop partway through a code.
    pub fn decode(&self, tree: &HuffmanTree, payload: &[u8], bit_length: u64) -> Result<Vec<u8>> {
        let bit_length = usize::try_from(bit_length).map_err(|_| {
            malformed(format!("bit length {bit_length} is not addressable"))
        })?;
        if payload.len() < bit_length.div_ceil(8) {
            return Err(malformed(format!(
                "payload has {} bytes, bit length {bit_length} needs {}",
                payload.len(),
                bit_length.div_ceil(8)
            )));
        }

        if let Some(byte) = tree.single_symbol() {
            trace!("huffman: single-symbol tree, repeating {byte:#04x} {bit_length} times");
            return Ok(vec![byte; bit_length]);
        }

        let root = tree.root();
        let mut current = root;
        let mut output = Vec::new();

        for bit in bitio::unpack(payload, bit_length) {
            current = tree
                .step(current, bit)
                .ok_or_else(|| malformed("walked past a leaf".to_string()))?;
            if let Node::Leaf(byte) = tree.node(current) {
                output.push(byte);
                current = root;
            }
        }

        if current != root {
            return Err(malformed("bit stream ends inside a code".to_string()));
        }

        Ok(output)
    }
}

impl Compressor for Huffman {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(self
            .encode(input)
            .map(|encoding| HuffmanContainer::from_encoding(&encoding).to_bytes())
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "Huffman"
    }
}

impl Decompressor for Huffman {
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let container = HuffmanContainer::parse(input)?;
        match tree::deserialize(&container.tree_bytes)? {
            Some(tree) => self.decode(&tree, &container.payload, container.bit_length),
            None if container.bit_length == 0 => Ok(Vec::new()),
            None => Err(malformed(format!(
                "empty tree with bit length {}",
                container.bit_length
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "Huffman"
    }
}
