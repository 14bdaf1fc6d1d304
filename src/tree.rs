//! Huffman tree construction, code derivation and the marker-byte tree format.
//!
//! Nodes live in an arena and refer to their children by index. Frequencies
//! are only used while building; the finished tree holds symbols and shape.
//!
//! Serialized form, pre-order:
//!
//! | marker | meaning                                         |
//! |--------|-------------------------------------------------|
//! | `0`    | no tree (only valid as the entire stream)       |
//! | `1`    | leaf, followed by its byte value                |
//! | `2`    | internal node, followed by left then right       |

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{CompressionError, Result};

const NULL_MARKER: u8 = 0;
const LEAF_MARKER: u8 = 1;
const INTERNAL_MARKER: u8 = 2;

/// Occurrence count of every byte value in one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[usize::from(byte)] += 1;
        }
        Self { counts }
    }

    #[must_use]
    pub fn get(&self, byte: u8) -> u64 {
        self.counts[usize::from(byte)]
    }

    /// Bytes that occur at least once, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=u8::MAX)
            .zip(self.counts.iter().copied())
            .filter(|&(_, count)| count > 0)
    }

    #[must_use]
    pub fn distinct(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf(u8),
    Internal { left: usize, right: usize },
}

/// An immutable Huffman tree. A tree built from a single distinct byte is a
/// lone [`Node::Leaf`] root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Builds the tree for `frequencies`, or `None` when no byte occurs.
    ///
    /// Ties are broken canonically: nodes are keyed by `(frequency, arena
    /// index)`. Leaves enter the arena in ascending byte order and merged
    /// nodes are appended as they are created, so at equal frequency leaves
    /// come out by byte value and before any merged node, and merged nodes
    /// come out oldest first. The first node extracted becomes the left child.
    #[must_use]
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let mut nodes = Vec::with_capacity(frequencies.distinct() * 2);
        let mut heap = BinaryHeap::new();

        for (byte, count) in frequencies.iter() {
            heap.push(Reverse((count, nodes.len())));
            nodes.push(Node::Leaf(byte));
        }

        while heap.len() > 1 {
            let Reverse((left_count, left)) = heap.pop()?;
            let Reverse((right_count, right)) = heap.pop()?;
            heap.push(Reverse((left_count + right_count, nodes.len())));
            nodes.push(Node::Internal { left, right });
        }

        let Reverse((_, root)) = heap.pop()?;
        Some(Self { nodes, root })
    }

    #[must_use]
    pub const fn root(&self) -> usize {
        self.root
    }

    /// # Panics
    ///
    /// Panics if `index` was not obtained from this tree.
    #[must_use]
    pub fn node(&self, index: usize) -> Node {
        self.nodes[index]
    }

    /// Follows one edge from an internal node: `false` goes left, `true` right.
    /// Returns `None` for a leaf.
    #[must_use]
    pub fn step(&self, index: usize, bit: bool) -> Option<usize> {
        match self.nodes.get(index)? {
            Node::Leaf(_) => None,
            Node::Internal { left, right } => Some(if bit { *right } else { *left }),
        }
    }

    /// The symbol of a single-leaf tree.
    #[must_use]
    pub fn single_symbol(&self) -> Option<u8> {
        match self.node(self.root) {
            Node::Leaf(byte) => Some(byte),
            Node::Internal { .. } => None,
        }
    }

    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Derives every leaf's code with an explicit stack, so skewed trees do
    /// not recurse. A single-leaf tree gets the code `0`.
    #[must_use]
    pub fn code_table(&self) -> CodeTable {
        let mut codes = vec![Vec::new(); 256];

        if let Some(byte) = self.single_symbol() {
            codes[usize::from(byte)] = vec![false];
            return CodeTable { codes };
        }

        let mut stack = vec![(self.root, Vec::new())];
        while let Some((index, prefix)) = stack.pop() {
            match self.node(index) {
                Node::Leaf(byte) => codes[usize::from(byte)] = prefix,
                Node::Internal { left, right } => {
                    let mut right_prefix = prefix.clone();
                    right_prefix.push(true);
                    stack.push((right, right_prefix));

                    let mut left_prefix = prefix;
                    left_prefix.push(false);
                    stack.push((left, left_prefix));
                }
            }
        }

        CodeTable { codes }
    }

    /// Pre-order marker encoding of this tree.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.nodes.len() * 2);
        let mut stack = vec![self.root];

        while let Some(index) = stack.pop() {
            match self.node(index) {
                Node::Leaf(byte) => {
                    output.push(LEAF_MARKER);
                    output.push(byte);
                }
                Node::Internal { left, right } => {
                    output.push(INTERNAL_MARKER);
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        output
    }
}

/// Bit code of each byte value present in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Vec<bool>>,
}

impl CodeTable {
    #[must_use]
    pub fn get(&self, byte: u8) -> Option<&[bool]> {
        let code = &self.codes[usize::from(byte)];
        if code.is_empty() {
            None
        } else {
            Some(code)
        }
    }

    /// Code for `byte`, empty when the byte is not in the tree.
    #[must_use]
    pub fn code(&self, byte: u8) -> &[bool] {
        &self.codes[usize::from(byte)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &[bool])> + '_ {
        (0..=u8::MAX)
            .zip(self.codes.iter())
            .filter(|(_, code)| !code.is_empty())
            .map(|(byte, code)| (byte, code.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Vec::is_empty)
    }

    /// Total encoded size in bits of a buffer with these frequencies.
    #[must_use]
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(byte, code)| frequencies.get(byte) * code.len() as u64)
            .sum()
    }
}

/// Serializes an optional tree; `None` becomes the single null marker.
#[must_use]
pub fn serialize(tree: Option<&HuffmanTree>) -> Vec<u8> {
    tree.map_or_else(|| vec![NULL_MARKER], HuffmanTree::to_bytes)
}

/// Parses a tree written by [`serialize`]. The whole slice must be consumed.
///
/// # Errors
///
/// Returns [`CompressionError::CorruptedTreeData`] on an unknown marker, a
/// null marker below the root, a leaf without its byte, missing children, or
/// bytes left over after the tree.
pub fn deserialize(bytes: &[u8]) -> Result<Option<HuffmanTree>> {
    if bytes.first() == Some(&NULL_MARKER) {
        if bytes.len() > 1 {
            return Err(corrupted(format!(
                "{} trailing bytes after empty tree",
                bytes.len() - 1
            )));
        }
        return Ok(None);
    }

    let mut nodes = Vec::new();
    // Internal nodes still waiting for children, with the left child once read.
    let mut pending: Vec<(usize, Option<usize>)> = Vec::new();
    let mut pos = 0;

    loop {
        let offset = pos;
        let marker = next_byte(bytes, &mut pos, "node marker")?;
        let index = nodes.len();

        match marker {
            LEAF_MARKER => {
                let byte = next_byte(bytes, &mut pos, "leaf value")?;
                nodes.push(Node::Leaf(byte));
            }
            INTERNAL_MARKER => {
                nodes.push(Node::Internal { left: 0, right: 0 });
                pending.push((index, None));
                continue;
            }
            NULL_MARKER => {
                return Err(corrupted(format!("null child at offset {offset}")));
            }
            other => {
                return Err(corrupted(format!(
                    "invalid marker {other} at offset {offset}"
                )));
            }
        }

        let mut completed = index;
        loop {
            let Some(top) = pending.last_mut() else {
                if pos != bytes.len() {
                    return Err(corrupted(format!(
                        "{} trailing bytes after tree",
                        bytes.len() - pos
                    )));
                }
                return Ok(Some(HuffmanTree {
                    nodes,
                    root: completed,
                }));
            };

            match top.1 {
                None => {
                    top.1 = Some(completed);
                    break;
                }
                Some(left) => {
                    let parent = top.0;
                    pending.pop();
                    nodes[parent] = Node::Internal {
                        left,
                        right: completed,
                    };
                    completed = parent;
                }
            }
        }
    }
}

fn next_byte(bytes: &[u8], pos: &mut usize, what: &str) -> Result<u8> {
    let byte = *bytes
        .get(*pos)
        .ok_or_else(|| {
            corrupted(format!("data ends before {what} at offset {pos}"))
        })?;
    *pos += 1;
    Ok(byte)
}

const fn corrupted(message: String) -> CompressionError {
    CompressionError::CorruptedTreeData(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(data: &[u8]) -> HuffmanTree {
        HuffmanTree::build(&FrequencyTable::from_bytes(data)).unwrap()
    }

    #[test]
    fn test_frequency_table() {
        let freq = FrequencyTable::from_bytes(b"aabbc");
        assert_eq!(freq.get(b'a'), 2);
        assert_eq!(freq.get(b'b'), 2);
        assert_eq!(freq.get(b'c'), 1);
        assert_eq!(freq.get(b'z'), 0);
        assert_eq!(freq.distinct(), 3);
    }

    #[test]
    fn test_frequency_table_empty() {
        let freq = FrequencyTable::from_bytes(&[]);
        assert!(freq.is_empty());
        assert_eq!(freq.iter().count(), 0);
    }

    #[test]
    fn test_build_empty() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&[]));
        assert!(tree.is_none());
    }

    #[test]
    fn test_build_single_symbol_is_leaf() {
        let tree = tree_for(&[0x41; 10]);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.node(tree.root()), Node::Leaf(0x41));
        assert_eq!(tree.single_symbol(), Some(0x41));
        assert_eq!(tree.step(tree.root(), false), None);
    }

    #[test]
    fn test_build_two_symbols() {
        let tree = tree_for(b"aaab");
        assert_eq!(tree.node_count(), 3);
        // 'b' is rarer, so it is extracted first and becomes the left child.
        assert_eq!(tree.to_bytes(), vec![2, 1, b'b', 1, b'a']);
    }

    #[test]
    fn test_tie_break_by_byte_value() {
        let tree = tree_for(b"cba");
        // a and b merge first (lowest byte values), then c joins that node:
        // c has frequency 1 and the merged node 2.
        assert_eq!(tree.to_bytes(), vec![2, 1, b'c', 2, 1, b'a', 1, b'b']);
    }

    #[test]
    fn test_tie_break_leaves_before_merged() {
        // a and b merge into weight 2. c and d also weigh 2 but are leaves,
        // so they pair up next and the {a, b} node is merged last.
        let tree = tree_for(b"abccdd");
        let codes = tree.code_table();
        assert_eq!(codes.get(b'a'), Some([false, false].as_slice()));
        assert_eq!(codes.get(b'b'), Some([false, true].as_slice()));
        assert_eq!(codes.get(b'c'), Some([true, false].as_slice()));
        assert_eq!(codes.get(b'd'), Some([true, true].as_slice()));
    }

    #[test]
    fn test_build_is_deterministic() {
        let data = b"the quick brown fox jumps over the lazy dog";
        assert_eq!(tree_for(data).to_bytes(), tree_for(data).to_bytes());
    }

    #[test]
    fn test_code_table_single_symbol() {
        let codes = tree_for(&[7; 3]).code_table();
        assert_eq!(codes.get(7), Some([false].as_slice()));
        assert_eq!(codes.code(7), &[false]);
        assert!(codes.code(8).is_empty());
        assert_eq!(codes.len(), 1);
    }

    #[test]
    fn test_code_table_frequent_symbol_shorter() {
        let codes = tree_for(b"aaaabbc").code_table();
        let a = codes.get(b'a').unwrap().len();
        let b = codes.get(b'b').unwrap().len();
        let c = codes.get(b'c').unwrap().len();
        assert!(a < b);
        assert_eq!(b, c);
        assert!(codes.get(b'x').is_none());
    }

    #[test]
    fn test_code_table_is_prefix_free() {
        let codes = tree_for(b"abracadabra alakazam").code_table();
        let all: Vec<&[bool]> = codes.iter().map(|(_, code)| code).collect();
        for (i, x) in all.iter().enumerate() {
            for (j, y) in all.iter().enumerate() {
                if i != j {
                    assert!(!y.starts_with(x));
                }
            }
        }
    }

    #[test]
    fn test_skewed_tree_codes() {
        // Fibonacci-like weights give the deepest possible tree.
        let mut data = Vec::new();
        let mut weights = (1u64, 1u64);
        for byte in 0..20u8 {
            for _ in 0..weights.0 {
                data.push(byte);
            }
            weights = (weights.1, weights.0 + weights.1);
        }
        let codes = tree_for(&data).code_table();
        assert_eq!(codes.len(), 20);
        assert_eq!(codes.iter().map(|(_, code)| code.len()).max(), Some(19));
    }

    #[test]
    fn test_encoded_bits() {
        let data = b"aaaabbc";
        let freq = FrequencyTable::from_bytes(data);
        let codes = tree_for(data).code_table();
        assert_eq!(codes.encoded_bits(&freq), 4 + 2 * 2 + 2);
    }

    #[test]
    fn test_serialize_empty_tree() {
        assert_eq!(serialize(None), vec![0]);
        assert_eq!(deserialize(&[0]).unwrap(), None);
    }

    #[test]
    fn test_serialize_deserialize_tree() {
        let tree = tree_for(b"hello world");
        let bytes = serialize(Some(&tree));
        let restored = deserialize(&bytes).unwrap().unwrap();
        assert_eq!(restored.to_bytes(), bytes);
        assert_eq!(restored.code_table(), tree.code_table());
    }

    #[test]
    fn test_deserialize_single_leaf() {
        let tree = deserialize(&[1, 0x41]).unwrap().unwrap();
        assert_eq!(tree.single_symbol(), Some(0x41));
    }

    #[test]
    fn test_deserialize_empty_input() {
        assert!(matches!(
            deserialize(&[]),
            Err(CompressionError::CorruptedTreeData(_))
        ));
    }

    #[test]
    fn test_deserialize_invalid_marker() {
        let result = deserialize(&[2, 1, b'a', 7]);
        assert!(matches!(
            result,
            Err(CompressionError::CorruptedTreeData(msg)) if msg.contains("marker 7")
        ));
    }

    #[test]
    fn test_deserialize_truncated_leaf() {
        assert!(matches!(
            deserialize(&[1]),
            Err(CompressionError::CorruptedTreeData(_))
        ));
    }

    #[test]
    fn test_deserialize_missing_right_child() {
        assert!(matches!(
            deserialize(&[2, 1, b'a']),
            Err(CompressionError::CorruptedTreeData(_))
        ));
    }

    #[test]
    fn test_deserialize_null_child() {
        assert!(matches!(
            deserialize(&[2, 0, 1, b'a']),
            Err(CompressionError::CorruptedTreeData(_))
        ));
    }

    #[test]
    fn test_deserialize_trailing_bytes() {
        assert!(matches!(
            deserialize(&[1, b'a', 1]),
            Err(CompressionError::CorruptedTreeData(_))
        ));
        assert!(matches!(
            deserialize(&[0, 0]),
            Err(CompressionError::CorruptedTreeData(_))
        ));
    }

    #[test]
    fn test_deserialize_deep_tree_without_recursion() {
        let mut bytes = Vec::new();
        let depth = 100_000;
        for _ in 0..depth {
            bytes.extend_from_slice(&[2, 1, 0x00]);
        }
        bytes.extend_from_slice(&[1, 0xFF]);
        let tree = deserialize(&bytes).unwrap().unwrap();
        assert_eq!(tree.node_count(), depth * 2 + 1);
    }
}
