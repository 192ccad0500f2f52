//! Archive handle: header, index and entry decoding

use crate::compression::{MAX_ENTRY_SIZE, inflate};
use crate::entry::Entry;
use crate::error::{GrfError, GrfResult};
use crate::header::{GrfHeader, HEADER_SIZE};
use crate::index::ArchiveIndex;
use crate::source::{ByteSource, FileSource, MmapSource};
use crate::table::read_directory;
use grf_crypto::{BLOCK_SIZE, DecodeMode};
use std::path::Path;
use tracing::{debug, warn};

/// Open GRF archive
///
/// The header and index are read once by [`Grf::open`] and never change
/// afterwards. Entry reads only take `&self`, so a handle over a `Sync`
/// source can serve concurrent [`Grf::get_file`] calls.
#[derive(Debug)]
pub struct Grf<S> {
    source: S,
    header: GrfHeader,
    index: ArchiveIndex,
}

impl Grf<MmapSource> {
    /// Open a memory-mapped archive.
    pub fn open_path(path: impl AsRef<Path>) -> GrfResult<Self> {
        Self::open(MmapSource::open(path)?)
    }
}

impl Grf<FileSource> {
    /// Open an archive read through a shared file handle.
    pub fn open_file(path: impl AsRef<Path>) -> GrfResult<Self> {
        Self::open(FileSource::open(path)?)
    }
}

impl<S: ByteSource> Grf<S> {
    /// Validate the header and build the entry index.
    ///
    /// Any failure is returned before a handle exists.
    pub fn open(source: S) -> GrfResult<Self> {
        let archive_len = source.len();
        if archive_len < HEADER_SIZE {
            return Err(GrfError::header(format!(
                "archive of {archive_len} bytes is shorter than the {HEADER_SIZE}-byte header"
            )));
        }

        let header = GrfHeader::parse(&source.read_range(0, HEADER_SIZE)?)?;
        header.validate(archive_len)?;
        let entry_count = header.entry_count()?;

        let table = read_directory(&source, &header)?;
        let index = ArchiveIndex::build(&table, entry_count)?;

        debug!(
            "Opened GRF archive: {} bytes, {} entries, directory at {}",
            archive_len,
            index.len(),
            header.directory_position()
        );

        Ok(Self {
            source,
            header,
            index,
        })
    }

    /// Parsed archive header
    pub fn header(&self) -> &GrfHeader {
        &self.header
    }

    /// Sorted entry index
    pub fn index(&self) -> &ArchiveIndex {
        &self.index
    }

    /// All entries sorted by lowercased name
    pub fn entries(&self) -> &[Entry] {
        self.index.entries()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Underlying byte source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Position in [`entries`](Self::entries) of `path`, ignoring ASCII case.
    pub fn search(&self, path: &str) -> Option<usize> {
        self.index.search(&path.as_bytes().to_ascii_lowercase())
    }

    /// Entry for `path`, ignoring ASCII case.
    pub fn entry(&self, path: &str) -> Option<&Entry> {
        self.index.find(path.as_bytes())
    }

    /// Read and decode the file stored under `path`.
    ///
    /// Lookup ignores ASCII case. Encrypted blocks are decoded according to
    /// the entry flags, then the data is inflated unless it was stored
    /// uncompressed.
    pub fn get_file(&self, path: &str) -> GrfResult<Vec<u8>> {
        let entry = self
            .entry(path)
            .ok_or_else(|| GrfError::FileNotFound(path.to_string()))?;

        if !entry.is_file() {
            return Err(GrfError::NotAFile(path.to_string()));
        }

        self.read_entry(entry)
    }

    /// Read and decode the data of an entry from this archive.
    pub fn read_entry(&self, entry: &Entry) -> GrfResult<Vec<u8>> {
        let path = entry.display_name();
        let (start, end) = entry.data_range();
        if end > self.source.len() {
            return Err(GrfError::decode(
                path,
                format!(
                    "data range {start}..{end} out of bounds for archive of {} bytes",
                    self.source.len()
                ),
            ));
        }

        let mut data = self.source.read_range(start, end)?.into_owned();

        let mode = entry.decode_mode();
        if mode != DecodeMode::None && entry.length_aligned as usize % BLOCK_SIZE != 0 {
            warn!(
                "{}: length_aligned {} is not a multiple of {}",
                path, entry.length_aligned, BLOCK_SIZE
            );
        }

        debug!(
            "Decoding {}: mode {:?}, pack_size {}, real_size {}",
            path, mode, entry.pack_size, entry.real_size
        );
        grf_crypto::decode(&mut data, mode, entry.length_aligned, entry.pack_size);

        let real_size = entry.real_size as usize;
        if entry.is_stored() {
            if data.len() < real_size {
                return Err(GrfError::decode(
                    path,
                    format!(
                        "stored data is {} bytes, expected {real_size}",
                        data.len()
                    ),
                ));
            }
            data.truncate(real_size);
            return Ok(data);
        }

        let packed = data.get(..entry.pack_size as usize).unwrap_or(&data[..]);
        let inflated = inflate(packed, real_size, MAX_ENTRY_SIZE)
            .map_err(|e| GrfError::decode(path.clone(), format!("inflate failed: {e}")))?;

        if inflated.len() != real_size {
            return Err(GrfError::decode(
                path,
                format!(
                    "inflated to {} bytes, expected {real_size}",
                    inflated.len()
                ),
            ));
        }

        Ok(inflated)
    }
}
