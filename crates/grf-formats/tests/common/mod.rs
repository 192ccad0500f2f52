//! Synthetic GRF archive builder shared by integration tests

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::ZlibEncoder;
use grf_crypto::DecodeMode;
use grf_formats::{EntryFlags, GRF_SIGNATURE, GRF_VERSION};
use std::io::Write;

/// One entry to be written into a synthetic archive
#[derive(Debug, Clone)]
pub struct EntrySpec {
    pub name: Vec<u8>,
    pub stored: Vec<u8>,
    pub pack_size: u32,
    pub length_aligned: u32,
    pub real_size: u32,
    pub flags: u8,
}

/// Builds archive bytes in the on-disk layout: header, entry data, directory
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    pub signature: [u8; 15],
    pub version: u32,
    pub reserved_skip: u32,
    /// Added to the recorded entry count, to claim more entries than exist
    pub extra_entries: u32,
    entries: Vec<EntrySpec>,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("deflate should succeed");
    encoder.finish().expect("deflate should succeed")
}

/// Deterministic bytes that do not compress well
pub fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

/// Text that compresses well
pub fn text(len: usize) -> Vec<u8> {
    b"The quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn align(len: usize) -> usize {
    len.div_ceil(8) * 8
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            signature: GRF_SIGNATURE,
            version: GRF_VERSION,
            reserved_skip: 0,
            extra_entries: 0,
            entries: Vec::new(),
        }
    }

    /// Stored, unencrypted file
    pub fn stored(self, name: &str, contents: &[u8]) -> Self {
        self.encoded(name, contents, false, DecodeMode::None)
    }

    /// Deflated, unencrypted file
    pub fn compressed(self, name: &str, contents: &[u8]) -> Self {
        self.encoded(name, contents, true, DecodeMode::None)
    }

    /// File optionally deflated, then enciphered with `mode`
    pub fn encoded(
        mut self,
        name: &str,
        contents: &[u8],
        compress: bool,
        mode: DecodeMode,
    ) -> Self {
        let packed = if compress {
            deflate(contents)
        } else {
            contents.to_vec()
        };
        assert!(
            !compress || packed.len() != contents.len(),
            "compressed fixture must differ in size from its contents"
        );

        let pack_size = packed.len() as u32;
        let length_aligned = align(packed.len()) as u32;
        let mut stored = packed;
        stored.resize(length_aligned as usize, 0);
        grf_crypto::encode(&mut stored, mode, length_aligned, pack_size);

        let flags = EntryFlags::FILE
            | match mode {
                DecodeMode::None => 0,
                DecodeMode::HeaderOnly => EntryFlags::ENCRYPT_HEADER,
                DecodeMode::Full => EntryFlags::ENCRYPT_MIXED,
            };

        self.entries.push(EntrySpec {
            name: name.as_bytes().to_vec(),
            stored,
            pack_size,
            length_aligned,
            real_size: contents.len() as u32,
            flags,
        });
        self
    }

    /// Directory placeholder without the FILE flag
    pub fn directory(mut self, name: &str) -> Self {
        self.entries.push(EntrySpec {
            name: name.as_bytes().to_vec(),
            stored: Vec::new(),
            pack_size: 0,
            length_aligned: 0,
            real_size: 0,
            flags: 0,
        });
        self
    }

    /// Entry written exactly as given
    pub fn raw(mut self, spec: EntrySpec) -> Self {
        self.entries.push(spec);
        self
    }

    /// Inflated directory table
    pub fn table(&self, offsets: &[u32]) -> Vec<u8> {
        let mut table = Vec::new();
        for (entry, offset) in self.entries.iter().zip(offsets) {
            table.extend_from_slice(&entry.name);
            table.push(0);
            table.extend_from_slice(&entry.pack_size.to_le_bytes());
            table.extend_from_slice(&entry.length_aligned.to_le_bytes());
            table.extend_from_slice(&entry.real_size.to_le_bytes());
            table.push(entry.flags);
            table.extend_from_slice(&offset.to_le_bytes());
        }
        table
    }

    pub fn build(&self) -> Vec<u8> {
        let mut region = Vec::new();
        let mut offsets = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            offsets.push(region.len() as u32);
            region.extend_from_slice(&entry.stored);
        }

        let table = self.table(&offsets);
        let blob = deflate(&table);
        let raw_entry_count =
            self.entries.len() as u32 + self.reserved_skip + 7 + self.extra_entries;

        let mut data = Vec::new();
        data.extend_from_slice(&self.signature);
        data.extend_from_slice(&[0u8; 15]);
        data.extend_from_slice(&(region.len() as u32).to_le_bytes());
        data.extend_from_slice(&self.reserved_skip.to_le_bytes());
        data.extend_from_slice(&raw_entry_count.to_le_bytes());
        data.extend_from_slice(&self.version.to_le_bytes());
        data.extend_from_slice(&region);
        data.extend_from_slice(&(blob.len() as u32).to_le_bytes());
        data.extend_from_slice(&(table.len() as u32).to_le_bytes());
        data.extend_from_slice(&blob);
        data
    }
}
