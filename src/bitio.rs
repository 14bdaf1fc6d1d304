//! MSB-first bit packing shared by the Huffman codec.

/// Packs bits into bytes, most significant bit first, zero-padding the last byte.
///
/// The output is `bits.len().div_ceil(8)` bytes long.
#[must_use]
pub fn pack(bits: &[bool]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bits.len().div_ceil(8));
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            if bit {
                byte |= 1 << (7 - i);
            }
        }
        bytes.push(byte);
    }
    bytes
}

/// Expands bytes into bits (MSB first) and keeps the first `original_bit_length`.
///
/// An `original_bit_length` of zero, or one larger than `bytes.len() * 8`,
/// keeps every bit.
#[must_use]
pub fn unpack(bytes: &[u8], original_bit_length: usize) -> Vec<bool> {
    let available = bytes.len().saturating_mul(8);
    let keep = if original_bit_length == 0 || original_bit_length > available {
        available
    } else {
        original_bit_length
    };

    let mut bits = Vec::with_capacity(keep);
    for &byte in bytes {
        for i in 0..8 {
            if bits.len() == keep {
                return bits;
            }
            bits.push((byte >> (7 - i)) & 1 == 1);
        }
    }
    bits
}
