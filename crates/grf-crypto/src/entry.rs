//! Per-entry decode schedule
//!
//! An archive entry's stored bytes are processed in 8-byte blocks. Which
//! transform a block receives depends on the entry's encryption mode and, for
//! fully encrypted entries, on the block position and the number of decimal
//! digits in the entry's compressed size.
//!
//! ```text
//! HeaderOnly: C C C ... C (20 blocks) . . . . . . . . .
//! Full:       C C C ... C (20 blocks) then C every `cycle` blocks,
//!             S on every 7th block between them, . elsewhere
//! ```
//!
//! Most of a large compressed entry is therefore left as raw deflate output;
//! only a sparse, position-dependent subset of blocks is scrambled.

use crate::des::{BLOCK_SIZE, decrypt_block, encrypt_block};
use crate::shuffle::{shuffle_decode, shuffle_encode};

/// Number of leading blocks that are always run through the block cipher
pub const HEADER_BLOCKS: usize = 20;

/// Non-cipher blocks between two shuffled blocks
const SHUFFLE_INTERVAL: u32 = 7;

/// How an entry's stored bytes were obfuscated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecodeMode {
    /// Stored bytes are not obfuscated
    #[default]
    None,
    /// Only the leading [`HEADER_BLOCKS`] blocks are enciphered
    HeaderOnly,
    /// Leading blocks plus a cyclic subset of the rest, with shuffling
    Full,
}

/// Transform selected for a single block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    /// Run the block cipher
    Cipher,
    /// Run the byte shuffle
    Shuffle,
    /// Leave the block untouched
    Keep,
}

/// Number of decimal digits in `value`. Zero has one digit.
pub const fn digit_count(mut value: u32) -> u32 {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

/// Stride between forced cipher blocks for a fully encrypted entry.
///
/// | digits | 1-2 | 3 | 4 | 5  | 6  | 7  | 8  | 9  | 10 |
/// |--------|-----|---|---|----|----|----|----|----|----|
/// | cycle  | 1   | 4 | 5 | 14 | 15 | 22 | 23 | 24 | 25 |
pub const fn cycle_for(pack_size: u32) -> usize {
    let digits = digit_count(pack_size) as usize;
    if digits < 3 {
        1
    } else if digits < 5 {
        digits + 1
    } else if digits < 7 {
        digits + 9
    } else {
        digits + 15
    }
}

/// Block actions for a fully encrypted entry of `block_count` blocks.
pub fn full_schedule(block_count: usize, pack_size: u32) -> impl Iterator<Item = BlockAction> {
    let cycle = cycle_for(pack_size);
    let mut counter = 0u32;

    (0..block_count).map(move |i| {
        if i < HEADER_BLOCKS || i % cycle == 0 {
            return BlockAction::Cipher;
        }

        let action = if counter == SHUFFLE_INTERVAL {
            counter = 0;
            BlockAction::Shuffle
        } else {
            BlockAction::Keep
        };
        counter += 1;
        action
    })
}

/// Number of whole blocks within the first `length_aligned` bytes of a buffer of `len` bytes.
fn block_count(len: usize, length_aligned: u32) -> usize {
    len.min(usize::try_from(length_aligned).unwrap_or(usize::MAX)) / BLOCK_SIZE
}

/// Whole blocks of `data` within the first `length_aligned` bytes.
fn blocks_mut(
    data: &mut [u8],
    length_aligned: u32,
) -> impl Iterator<Item = &mut [u8; BLOCK_SIZE]> {
    let usable = block_count(data.len(), length_aligned) * BLOCK_SIZE;

    data[..usable]
        .chunks_exact_mut(BLOCK_SIZE)
        .filter_map(|chunk| <&mut [u8; BLOCK_SIZE]>::try_from(chunk).ok())
}

/// Decode an entry whose leading blocks were enciphered.
pub fn decode_header(data: &mut [u8], length_aligned: u32) {
    for block in blocks_mut(data, length_aligned).take(HEADER_BLOCKS) {
        decrypt_block(block);
    }
}

/// Encode the leading blocks of an entry. Inverse of [`decode_header`].
pub fn encode_header(data: &mut [u8], length_aligned: u32) {
    for block in blocks_mut(data, length_aligned).take(HEADER_BLOCKS) {
        encrypt_block(block);
    }
}

/// Decode a fully encrypted entry.
///
/// `pack_size` is the entry's compressed size; it selects the cipher cycle.
pub fn decode_full(data: &mut [u8], length_aligned: u32, pack_size: u32) {
    let mut ciphered = 0usize;
    let mut shuffled = 0usize;
    let count = block_count(data.len(), length_aligned);

    for (block, action) in blocks_mut(data, length_aligned).zip(full_schedule(count, pack_size)) {
        match action {
            BlockAction::Cipher => {
                decrypt_block(block);
                ciphered += 1;
            }
            BlockAction::Shuffle => {
                shuffle_decode(block);
                shuffled += 1;
            }
            BlockAction::Keep => {}
        }
    }

    tracing::trace!(
        pack_size,
        cycle = cycle_for(pack_size),
        ciphered,
        shuffled,
        "decoded fully encrypted entry"
    );
}

/// Encode a fully encrypted entry. Inverse of [`decode_full`].
pub fn encode_full(data: &mut [u8], length_aligned: u32, pack_size: u32) {
    let count = block_count(data.len(), length_aligned);

    for (block, action) in blocks_mut(data, length_aligned).zip(full_schedule(count, pack_size)) {
        match action {
            BlockAction::Cipher => encrypt_block(block),
            BlockAction::Shuffle => shuffle_encode(block),
            BlockAction::Keep => {}
        }
    }
}

/// Decode entry data in place according to `mode`.
pub fn decode(data: &mut [u8], mode: DecodeMode, length_aligned: u32, pack_size: u32) {
    match mode {
        DecodeMode::None => {}
        DecodeMode::HeaderOnly => decode_header(data, length_aligned),
        DecodeMode::Full => decode_full(data, length_aligned, pack_size),
    }
}

/// Encode entry data in place according to `mode`. Inverse of [`decode`].
pub fn encode(data: &mut [u8], mode: DecodeMode, length_aligned: u32, pack_size: u32) {
    match mode {
        DecodeMode::None => {}
        DecodeMode::HeaderOnly => encode_header(data, length_aligned),
        DecodeMode::Full => encode_full(data, length_aligned, pack_size),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Deterministic, block-distinct sample data
    fn sample(blocks: usize) -> Vec<u8> {
        (0..blocks * BLOCK_SIZE)
            .map(|i| (i.wrapping_mul(31) ^ (i >> 3)) as u8)
            .collect()
    }

    fn block_at(data: &[u8], index: usize) -> [u8; BLOCK_SIZE] {
        data[index * BLOCK_SIZE..(index + 1) * BLOCK_SIZE]
            .try_into()
            .unwrap()
    }

    fn schedule_string(blocks: usize, pack_size: u32) -> String {
        full_schedule(blocks, pack_size)
            .map(|action| match action {
                BlockAction::Cipher => 'C',
                BlockAction::Shuffle => 'S',
                BlockAction::Keep => 'K',
            })
            .collect()
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(99), 2);
        assert_eq!(digit_count(100), 3);
        assert_eq!(digit_count(123_456), 6);
        assert_eq!(digit_count(u32::MAX), 10);
    }

    #[test]
    fn test_cycle_boundaries() {
        assert_eq!(cycle_for(0), 1);
        assert_eq!(cycle_for(99), 1);
        assert_eq!(cycle_for(100), 4);
        assert_eq!(cycle_for(9_999), 5);
        assert_eq!(cycle_for(10_000), 14);
        assert_eq!(cycle_for(999_999), 15);
        assert_eq!(cycle_for(1_000_000), 22);
        assert_eq!(cycle_for(u32::MAX), 25);
    }

    #[test]
    fn test_full_schedule_layout() {
        let header = "C".repeat(HEADER_BLOCKS);

        assert_eq!(
            schedule_string(64, 100),
            format!("{header}CKKKCKKKCKSKCKKKCKKSCKKKCKKKCSKKCKKKCKSKCKKK")
        );
        assert_eq!(
            schedule_string(64, 10_000),
            format!("{header}KKKKKKKSCKKKKKKSKKKKKKCSKKKKKKSKKKKKCKSKKKKK")
        );
        assert_eq!(
            schedule_string(64, 1_000_000),
            format!("{header}KKCKKKKKSKKKKKKSKKKKKKSKCKKKKKSKKKKKKSKKKKKK")
        );
        assert_eq!(schedule_string(64, 50), "C".repeat(64));
    }

    #[test]
    fn test_header_mode_leaves_tail_untouched() {
        let original = sample(32);
        let mut data = original.clone();
        decode_header(&mut data, 32 * 8);

        for i in 0..32 {
            let mut expected = block_at(&original, i);
            if i < HEADER_BLOCKS {
                decrypt_block(&mut expected);
            }
            assert_eq!(block_at(&data, i), expected, "block {i}");
        }
    }

    #[test]
    fn test_header_mode_short_entry() {
        let original = sample(3);
        let mut data = original.clone();
        decode_header(&mut data, 3 * 8);

        for i in 0..3 {
            let mut expected = block_at(&original, i);
            decrypt_block(&mut expected);
            assert_eq!(block_at(&data, i), expected);
        }
    }

    #[test]
    fn test_full_mode_cipher_positions_across_digit_boundaries() {
        // Sizes on both sides of the 2->3, 4->5 and 6->7 digit boundaries
        for pack_size in [99, 100, 9_999, 10_000, 999_999, 1_000_000] {
            let blocks = 96;
            let cycle = cycle_for(pack_size);
            let original = sample(blocks);
            let mut data = original.clone();
            decode_full(&mut data, (blocks * 8) as u32, pack_size);

            for i in 0..blocks {
                let mut ciphered = block_at(&original, i);
                decrypt_block(&mut ciphered);
                let should_cipher = i < HEADER_BLOCKS || i % cycle == 0;
                assert_eq!(
                    block_at(&data, i) == ciphered,
                    should_cipher,
                    "pack_size {pack_size}, block {i}"
                );
            }
        }
    }

    #[test]
    fn test_full_mode_shuffle_positions() {
        let original = sample(40);
        let mut data = original.clone();
        decode_full(&mut data, 40 * 8, 100);

        let mut expected = block_at(&original, 30);
        shuffle_decode(&mut expected);
        assert_eq!(block_at(&data, 30), expected);
        assert_eq!(block_at(&data, 29), block_at(&original, 29));
        assert_eq!(block_at(&data, 31), block_at(&original, 31));
    }

    #[test]
    fn test_length_aligned_bounds_iteration() {
        // Buffer holds more than length_aligned; trailing bytes must stay put
        let original = sample(4);
        let mut data = original.clone();
        decode_full(&mut data, 16, 10);
        assert_eq!(&data[16..], &original[16..]);

        // length_aligned larger than the buffer is clamped to whole blocks
        let mut short = original[..12].to_vec();
        decode_header(&mut short, 64);
        assert_eq!(&short[8..], &original[8..12]);
    }

    #[test]
    fn test_none_mode_is_noop() {
        let original = sample(4);
        let mut data = original.clone();
        decode(&mut data, DecodeMode::None, 32, 32);
        assert_eq!(data, original);
    }

    proptest! {
        #[test]
        fn prop_encode_decode_round_trip(
            blocks in 0usize..200,
            pack_size in any::<u32>(),
            full in any::<bool>(),
        ) {
            let mode = if full { DecodeMode::Full } else { DecodeMode::HeaderOnly };
            let original = sample(blocks);
            let mut data = original.clone();
            let length_aligned = (blocks * BLOCK_SIZE) as u32;

            encode(&mut data, mode, length_aligned, pack_size);
            decode(&mut data, mode, length_aligned, pack_size);
            prop_assert_eq!(data, original);
        }
    }
}
