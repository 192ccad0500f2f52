//! Directory entries and their flags

use crate::error::{GrfError, GrfResult};
use crate::header::HEADER_SIZE;
use binrw::{BinRead, NullString};
use grf_crypto::DecodeMode;
use std::fmt;
use std::io::Cursor;

/// Fixed bytes following the filename in each directory record
pub const RECORD_FIXED_SIZE: usize = 17;

/// Entry flags byte
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EntryFlags {
    /// Raw flag value
    pub value: u8,
}

impl EntryFlags {
    /// Regular file; entries without it are directory placeholders
    pub const FILE: u8 = 0x01;

    /// Fully encrypted: header blocks plus a sparse cipher/shuffle schedule
    pub const ENCRYPT_MIXED: u8 = 0x02;

    /// Only the first 20 blocks are encrypted
    pub const ENCRYPT_HEADER: u8 = 0x04;

    /// Create flags from raw value
    pub const fn new(value: u8) -> Self {
        Self { value }
    }

    /// Check if flag is set
    pub const fn has(&self, flag: u8) -> bool {
        (self.value & flag) != 0
    }

    /// Check if the entry is a regular file
    pub const fn is_file(&self) -> bool {
        self.has(Self::FILE)
    }

    /// Decode path selected by these flags. Full mode wins over header mode.
    pub const fn decode_mode(&self) -> DecodeMode {
        if self.has(Self::ENCRYPT_MIXED) {
            DecodeMode::Full
        } else if self.has(Self::ENCRYPT_HEADER) {
            DecodeMode::HeaderOnly
        } else {
            DecodeMode::None
        }
    }
}

impl fmt::Display for EntryFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.has(Self::FILE) {
            names.push("file");
        }
        if self.has(Self::ENCRYPT_MIXED) {
            names.push("mixed");
        }
        if self.has(Self::ENCRYPT_HEADER) {
            names.push("header");
        }

        if names.is_empty() {
            write!(f, "{:#04x}", self.value)
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// On-disk directory record
#[derive(BinRead)]
#[br(little)]
struct EntryRecord {
    name: NullString,
    pack_size: u32,
    length_aligned: u32,
    real_size: u32,
    flags: EntryFlags,
    offset: u32,
}

/// One file or directory placeholder recorded in the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: Vec<u8>,
    key: Vec<u8>,
    /// Stored size, compressed if compressed
    pub pack_size: u32,
    /// Stored size rounded up to the cipher block size
    pub length_aligned: u32,
    /// Size after decompression
    pub real_size: u32,
    /// Entry flags
    pub flags: EntryFlags,
    /// Data offset relative to the end of the header
    pub offset: u32,
}

impl Entry {
    /// Create an entry; the lookup key is the ASCII-lowercased name.
    pub fn new(
        name: impl Into<Vec<u8>>,
        pack_size: u32,
        length_aligned: u32,
        real_size: u32,
        flags: EntryFlags,
        offset: u32,
    ) -> Self {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        Self {
            name,
            key,
            pack_size,
            length_aligned,
            real_size,
            flags,
            offset,
        }
    }

    /// Filename bytes as stored
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Lowercased filename used for lookup and ordering
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Filename rendered one character per byte
    ///
    /// Names are not UTF-8 in practice (usually a legacy Korean code page),
    /// so each byte maps to the code point with the same value.
    pub fn display_name(&self) -> String {
        self.name.iter().map(|&b| char::from(b)).collect()
    }

    /// Check if the entry is a regular file
    pub const fn is_file(&self) -> bool {
        self.flags.is_file()
    }

    /// Decode path for this entry's data
    pub const fn decode_mode(&self) -> DecodeMode {
        self.flags.decode_mode()
    }

    /// Stored without compression
    pub const fn is_stored(&self) -> bool {
        self.real_size == self.pack_size
    }

    /// Absolute position of the entry data in the archive
    pub fn data_offset(&self) -> u64 {
        u64::from(self.offset) + HEADER_SIZE
    }

    /// Absolute `[start, end)` range of the stored entry data
    pub fn data_range(&self) -> (u64, u64) {
        let start = self.data_offset();
        (start, start + u64::from(self.length_aligned))
    }
}

impl EntryRecord {
    fn into_entry(self) -> Entry {
        Entry::new(
            self.name.0,
            self.pack_size,
            self.length_aligned,
            self.real_size,
            self.flags,
            self.offset,
        )
    }
}

/// Parse exactly `count` records from an inflated directory table.
///
/// Trailing bytes after the last record are ignored.
pub fn parse_entries(data: &[u8], count: u32) -> GrfResult<Vec<Entry>> {
    // Smallest record is an empty name plus its terminator
    let max_records = data.len() / (RECORD_FIXED_SIZE + 1);
    let mut entries = Vec::with_capacity((count as usize).min(max_records));
    let mut cursor = Cursor::new(data);

    for index in 0..count {
        let position = cursor.position();
        let record = EntryRecord::read(&mut cursor).map_err(|e| {
            GrfError::directory(format!(
                "entry {index} of {count} at offset {position}: {e}"
            ))
        })?;
        entries.push(record.into_entry());
    }

    Ok(entries)
}
