//! Byte shuffle applied to sparse blocks of fully encrypted entries
//!
//! Blocks that fall between cipher positions in a fully encrypted entry are
//! mostly stored as-is. Every so often one of them is shuffled instead: the
//! first seven bytes are permuted and the last byte goes through a small
//! substitution.

use crate::des::BLOCK_SIZE;

/// Swap a handful of byte values pairwise; everything else maps to itself.
///
/// The mapping is an involution, so the same function encodes and decodes.
pub const fn substitute(byte: u8) -> u8 {
    match byte {
        0x00 => 0x2b,
        0x2b => 0x00,
        0x01 => 0x68,
        0x68 => 0x01,
        0x48 => 0x77,
        0x77 => 0x48,
        0x60 => 0xff,
        0xff => 0x60,
        0x6c => 0x80,
        0x80 => 0x6c,
        0xb9 => 0xc0,
        0xc0 => 0xb9,
        0xeb => 0xfe,
        0xfe => 0xeb,
        other => other,
    }
}

/// Undo the shuffle on one block in place.
pub fn shuffle_decode(block: &mut [u8; BLOCK_SIZE]) {
    let b = *block;
    *block = [b[3], b[4], b[6], b[0], b[1], b[2], b[5], substitute(b[7])];
}

/// Apply the shuffle to one block in place. Inverse of [`shuffle_decode`].
pub fn shuffle_encode(block: &mut [u8; BLOCK_SIZE]) {
    let b = *block;
    *block = [b[3], b[4], b[5], b[0], b[1], b[6], b[2], substitute(b[7])];
}
