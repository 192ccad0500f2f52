//! GRF header structure and validation
//!
//! The header is a fixed 46-byte little-endian structure:
//! - 15-byte signature "Master of Magic"
//! - 15-byte key (carried, never used)
//! - 4-byte directory offset, relative to the end of the header
//! - 4-byte reserved skip count
//! - 4-byte raw entry count
//! - 4-byte format version

use crate::error::{GrfError, GrfResult};
use binrw::BinRead;
use std::io::Cursor;

/// Size of the fixed header region; every stored offset is relative to it
pub const HEADER_SIZE: u64 = 46;

/// Required signature
pub const GRF_SIGNATURE: [u8; 15] = *b"Master of Magic";

/// Only supported format version
pub const GRF_VERSION: u32 = 0x200;

/// Directory slots reserved by the format and excluded from the entry count
pub const RESERVED_ENTRIES: u32 = 7;

/// GRF file header (46 bytes, little-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct GrfHeader {
    /// File signature, must be [`GRF_SIGNATURE`]
    pub signature: [u8; 15],

    /// Reserved key bytes
    pub key: [u8; 15],

    /// Offset of the directory table, relative to [`HEADER_SIZE`]
    pub directory_offset: u32,

    /// Reserved count subtracted from the raw entry count
    pub reserved_skip: u32,

    /// Entry count as stored, before removing reserved slots
    pub raw_entry_count: u32,

    /// Format version, must be [`GRF_VERSION`]
    pub version: u32,
}

impl GrfHeader {
    /// Parse a header from the first [`HEADER_SIZE`] bytes of an archive.
    pub fn parse(data: &[u8]) -> GrfResult<Self> {
        Self::read(&mut Cursor::new(data))
            .map_err(|e| GrfError::header(format!("truncated header: {e}")))
    }

    /// Validate the header against an archive of `archive_len` bytes.
    pub fn validate(&self, archive_len: u64) -> GrfResult<()> {
        if self.signature != GRF_SIGNATURE {
            return Err(GrfError::header(format!(
                "incorrect signature {:?}, expected {:?}",
                String::from_utf8_lossy(&self.signature),
                String::from_utf8_lossy(&GRF_SIGNATURE)
            )));
        }

        if self.version != GRF_VERSION {
            return Err(GrfError::header(format!(
                "unsupported version {:#x}, expected {:#x}",
                self.version, GRF_VERSION
            )));
        }

        // Directory size pair must fit inside the archive
        let table_end = self.directory_position() + 8;
        if table_end > archive_len {
            return Err(GrfError::header(format!(
                "directory offset {} out of bounds for archive of {} bytes",
                self.directory_offset, archive_len
            )));
        }

        self.entry_count()?;
        Ok(())
    }

    /// Number of entries recorded in the directory.
    ///
    /// `raw_entry_count - (reserved_skip + 7)`
    pub fn entry_count(&self) -> GrfResult<u32> {
        self.reserved_skip
            .checked_add(RESERVED_ENTRIES)
            .and_then(|reserved| self.raw_entry_count.checked_sub(reserved))
            .ok_or_else(|| {
                GrfError::header(format!(
                    "entry count {} smaller than reserved slots {} + {}",
                    self.raw_entry_count, self.reserved_skip, RESERVED_ENTRIES
                ))
            })
    }

    /// Absolute position of the directory table.
    pub fn directory_position(&self) -> u64 {
        u64::from(self.directory_offset) + HEADER_SIZE
    }
}
