//! Cryptographic transforms for GRF game archives
//!
//! GRF archives obfuscate the stored bytes of some entries with a cut-down
//! DES variant. This crate provides the primitives needed to undo that:
//!
//! - **Block cipher**: one DES-style round over independent 8-byte blocks
//!   ([`des`])
//! - **Shuffle**: a byte permutation plus small substitution applied to a
//!   sparse subset of blocks ([`shuffle`])
//! - **Entry schedule**: which block of an entry gets which transform
//!   ([`entry`])
//!
//! None of this is real encryption. The cipher runs a single round and uses
//! no key; it only stops casual inspection of archive contents.
//!
//! # Examples
//!
//! ## Decoding a single block
//!
//! ```
//! use grf_crypto::des;
//!
//! let mut block = [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef];
//! des::decrypt_block(&mut block);
//! des::encrypt_block(&mut block);
//! assert_eq!(block, [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
//! ```
//!
//! ## Decoding entry data
//!
//! ```
//! use grf_crypto::{DecodeMode, decode, encode};
//!
//! let original: Vec<u8> = (0..=255u8).cycle().take(512).collect();
//! let mut data = original.clone();
//!
//! encode(&mut data, DecodeMode::Full, 512, 500);
//! assert_ne!(data, original);
//!
//! decode(&mut data, DecodeMode::Full, 512, 500);
//! assert_eq!(data, original);
//! ```

#![warn(missing_docs)]

pub mod des;
pub mod entry;
pub mod shuffle;

pub use des::{BLOCK_SIZE, decrypt_block, encrypt_block};
pub use entry::{
    BlockAction, DecodeMode, HEADER_BLOCKS, cycle_for, decode, decode_full, decode_header,
    digit_count, encode, encode_full, encode_header, full_schedule,
};
pub use shuffle::{shuffle_decode, shuffle_encode, substitute};
