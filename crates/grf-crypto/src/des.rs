//! Single-round DES variant used by GRF archives.
//!
//! The transform works on independent 8-byte blocks with no chaining and no
//! key schedule:
//!
//! 1. initial permutation of the 64 input bits
//! 2. one Feistel round: the right half is expanded, pushed through four
//!    substitution tables and transposed, then `XORed` into the left half
//! 3. final permutation (the inverse of step 1)
//!
//! Because the round only touches the left half as a function of the
//! untouched right half, and the final permutation undoes the initial one,
//! applying the transform twice yields the original block. Decryption and
//! encryption are the same operation.
//!
//! ## Security Warning
//!
//! One round with fixed tables and no key provides no confidentiality. This
//! module exists only to read archives that were obfuscated with it.
//!
//! ## Usage
//!
//! ```rust
//! use grf_crypto::des::{decrypt_block, encrypt_block};
//!
//! let mut block = *b"GRFblock";
//! encrypt_block(&mut block);
//! assert_ne!(&block, b"GRFblock");
//!
//! decrypt_block(&mut block);
//! assert_eq!(&block, b"GRFblock");
//! ```

/// Size of a cipher block in bytes
pub const BLOCK_SIZE: usize = 8;

/// Bit masks for MSB-first bit numbering within a byte
const MASK: [u8; 8] = [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01];

/// Initial permutation (1-indexed source bit for each output bit)
const INITIAL_PERMUTATION: [u8; 64] = [
    58, 50, 42, 34, 26, 18, 10, 2, //
    60, 52, 44, 36, 28, 20, 12, 4, //
    62, 54, 46, 38, 30, 22, 14, 6, //
    64, 56, 48, 40, 32, 24, 16, 8, //
    57, 49, 41, 33, 25, 17, 9, 1, //
    59, 51, 43, 35, 27, 19, 11, 3, //
    61, 53, 45, 37, 29, 21, 13, 5, //
    63, 55, 47, 39, 31, 23, 15, 7, //
];

/// Final permutation, inverse of [`INITIAL_PERMUTATION`]
const FINAL_PERMUTATION: [u8; 64] = [
    40, 8, 48, 16, 56, 24, 64, 32, //
    39, 7, 47, 15, 55, 23, 63, 31, //
    38, 6, 46, 14, 54, 22, 62, 30, //
    37, 5, 45, 13, 53, 21, 61, 29, //
    36, 4, 44, 12, 52, 20, 60, 28, //
    35, 3, 43, 11, 51, 19, 59, 27, //
    34, 2, 42, 10, 50, 18, 58, 26, //
    33, 1, 41, 9, 49, 17, 57, 25, //
];

/// Transposition applied to the 32 substituted bits
const TRANSPOSITION: [u8; 32] = [
    16, 7, 20, 21, //
    29, 12, 28, 17, //
    1, 15, 23, 26, //
    5, 18, 31, 10, //
    2, 8, 24, 14, //
    32, 27, 3, 9, //
    19, 13, 30, 6, //
    22, 11, 4, 25, //
];

/// Substitution tables, one per output byte of the round function.
///
/// These are not the classic DES S-boxes. Each table is indexed by a 6-bit
/// group; the even group contributes the high nibble and the odd group the
/// low nibble of the output byte.
const SUBSTITUTION_BOXES: [[u8; 64]; 4] = [
    [
        0xef, 0x03, 0x41, 0xfd, 0xd8, 0x74, 0x1e, 0x47, 0x26, 0xef, 0xfb, 0x22, 0xb3, 0xd8, 0x84,
        0x1e, 0x39, 0xac, 0xa7, 0x60, 0x62, 0xc1, 0xcd, 0xba, 0x5c, 0x96, 0x90, 0x59, 0x05, 0x3b,
        0x7a, 0x85, 0x40, 0xfd, 0x1e, 0xc8, 0xe7, 0x8a, 0x8b, 0x21, 0xda, 0x43, 0x64, 0x9f, 0x2d,
        0x14, 0xb1, 0x72, 0xf5, 0x5b, 0xc8, 0xb6, 0x9c, 0x37, 0x76, 0xec, 0x39, 0xa0, 0xa3, 0x05,
        0x52, 0x6e, 0x0f, 0xd9,
    ],
    [
        0xa7, 0xdd, 0x0d, 0x78, 0x9e, 0x0b, 0xe3, 0x95, 0x60, 0x36, 0x36, 0x4f, 0xf9, 0x60, 0x5a,
        0xa3, 0x11, 0x24, 0xd2, 0x87, 0xc8, 0x52, 0x75, 0xec, 0xbb, 0xc1, 0x4c, 0xba, 0x24, 0xfe,
        0x8f, 0x19, 0xda, 0x13, 0x66, 0xaf, 0x49, 0xd0, 0x90, 0x06, 0x8c, 0x6a, 0xfb, 0x91, 0x37,
        0x8d, 0x0d, 0x78, 0xbf, 0x49, 0x11, 0xf4, 0x23, 0xe5, 0xce, 0x3b, 0x55, 0xbc, 0xa2, 0x57,
        0xe8, 0x22, 0x74, 0xce,
    ],
    [
        0x2c, 0xea, 0xc1, 0xbf, 0x4a, 0x24, 0x1f, 0xc2, 0x79, 0x47, 0xa2, 0x7c, 0xb6, 0xd9, 0x68,
        0x15, 0x80, 0x56, 0x5d, 0x01, 0x33, 0xfd, 0xf4, 0xae, 0xde, 0x30, 0x07, 0x9b, 0xe5, 0x83,
        0x9b, 0x68, 0x49, 0xb4, 0x2e, 0x83, 0x1f, 0xc2, 0xb5, 0x7c, 0xa2, 0x19, 0xd8, 0xe5, 0x7c,
        0x2f, 0x83, 0xda, 0xf7, 0x6b, 0x90, 0xfe, 0xc4, 0x01, 0x5a, 0x97, 0x61, 0xa6, 0x3d, 0x40,
        0x0b, 0x58, 0xe6, 0x3d,
    ],
    [
        0x4d, 0xd1, 0xb2, 0x0f, 0x28, 0xbd, 0xe4, 0x78, 0xf6, 0x4a, 0x0f, 0x93, 0x8b, 0x17, 0xd1,
        0xa4, 0x3a, 0xec, 0xc9, 0x35, 0x93, 0x56, 0x7e, 0xcb, 0x55, 0x20, 0xa0, 0xfe, 0x6c, 0x89,
        0x17, 0x62, 0x17, 0x62, 0x4b, 0xb1, 0xb4, 0xde, 0xd1, 0x87, 0xc9, 0x14, 0x3c, 0x4a, 0x7e,
        0xa8, 0xe2, 0x7d, 0xa0, 0x9f, 0xf6, 0x5c, 0x6a, 0x09, 0x8d, 0xf0, 0x0f, 0xe3, 0x53, 0x25,
        0x95, 0x36, 0x28, 0xcb,
    ],
];

/// Reorder the bits of `input` so that output bit `i` is input bit `table[i] - 1`.
fn permute<const N: usize, const M: usize>(input: &[u8; N], table: &[u8; M]) -> [u8; N] {
    let mut out = [0u8; N];
    for (i, &source) in table.iter().enumerate() {
        let j = usize::from(source - 1);
        if input[j >> 3] & MASK[j & 7] != 0 {
            out[i >> 3] |= MASK[i & 7];
        }
    }
    out
}

/// Apply the initial bit permutation in place.
pub fn initial_permutation(block: &mut [u8; BLOCK_SIZE]) {
    *block = permute(block, &INITIAL_PERMUTATION);
}

/// Apply the final bit permutation in place.
pub fn final_permutation(block: &mut [u8; BLOCK_SIZE]) {
    *block = permute(block, &FINAL_PERMUTATION);
}

/// Expand the right half (bytes 4..8) into eight 6-bit groups.
///
/// Each output byte holds one group in its low six bits; the first and last
/// groups wrap around the 32-bit half.
fn expansion(block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
    let [_, _, _, _, r0, r1, r2, r3] = *block;
    [
        ((r3 << 5) | (r0 >> 3)) & 0x3f,
        ((r0 << 1) | (r1 >> 7)) & 0x3f,
        ((r0 << 5) | (r1 >> 3)) & 0x3f,
        ((r1 << 1) | (r2 >> 7)) & 0x3f,
        ((r1 << 5) | (r2 >> 3)) & 0x3f,
        ((r2 << 1) | (r3 >> 7)) & 0x3f,
        ((r2 << 5) | (r3 >> 3)) & 0x3f,
        ((r3 << 1) | (r0 >> 7)) & 0x3f,
    ]
}

/// Compress eight 6-bit groups back to four bytes.
fn substitution(groups: &[u8; BLOCK_SIZE]) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (i, table) in SUBSTITUTION_BOXES.iter().enumerate() {
        let high = table[usize::from(groups[i * 2])] & 0xf0;
        let low = table[usize::from(groups[i * 2 + 1])] & 0x0f;
        out[i] = high | low;
    }
    out
}

/// The round function: mixes the right half into the left half.
///
/// Bytes 4..8 are left untouched.
pub fn round(block: &mut [u8; BLOCK_SIZE]) {
    let mixed: [u8; 4] = permute(&substitution(&expansion(block)), &TRANSPOSITION);
    for (left, m) in block[..4].iter_mut().zip(mixed) {
        *left ^= m;
    }
}

/// Decrypt one block in place.
pub fn decrypt_block(block: &mut [u8; BLOCK_SIZE]) {
    initial_permutation(block);
    round(block);
    final_permutation(block);
}

/// Encrypt one block in place.
///
/// The transform is its own inverse, so this is the same operation as
/// [`decrypt_block`].
pub fn encrypt_block(block: &mut [u8; BLOCK_SIZE]) {
    decrypt_block(block);
}
