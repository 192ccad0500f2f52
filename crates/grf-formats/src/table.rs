//! Compressed directory table

use crate::compression::{MAX_DIRECTORY_SIZE, inflate};
use crate::error::{GrfError, GrfResult};
use crate::header::GrfHeader;
use crate::source::ByteSource;
use binrw::BinRead;
use std::io::Cursor;
use tracing::{debug, warn};

/// Size of the [`DirectoryTableMeta`] record
pub const TABLE_META_SIZE: u64 = 8;

/// Size pair stored right before the compressed directory blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectoryTableMeta {
    /// Size of the zlib blob that follows
    pub compressed_size: u32,
    /// Declared size of the inflated directory
    pub decompressed_size: u32,
}

impl DirectoryTableMeta {
    /// Parse the size pair from its 8 bytes.
    pub fn parse(data: &[u8]) -> GrfResult<Self> {
        Self::read(&mut Cursor::new(data))
            .map_err(|e| GrfError::directory(format!("truncated table sizes: {e}")))
    }
}

/// Read and inflate the directory table described by `header`.
pub fn read_directory<S: ByteSource + ?Sized>(
    source: &S,
    header: &GrfHeader,
) -> GrfResult<Vec<u8>> {
    let position = header.directory_position();
    let meta_bytes = source.read_range(position, position + TABLE_META_SIZE)?;
    let meta = DirectoryTableMeta::parse(&meta_bytes)?;

    let blob_start = position + TABLE_META_SIZE;
    let blob_end = blob_start + u64::from(meta.compressed_size);
    if blob_end > source.len() {
        return Err(GrfError::directory(format!(
            "compressed table of {} bytes at {} runs past end of archive ({} bytes)",
            meta.compressed_size,
            blob_start,
            source.len()
        )));
    }

    debug!(
        "Reading directory table at {}: {} bytes compressed, {} declared",
        blob_start, meta.compressed_size, meta.decompressed_size
    );

    let blob = source.read_range(blob_start, blob_end)?;
    let table = inflate(&blob, meta.decompressed_size as usize, MAX_DIRECTORY_SIZE)
        .map_err(|e| GrfError::directory(format!("failed to inflate table: {e}")))?;

    if table.len() != meta.decompressed_size as usize {
        warn!(
            "Directory table inflated to {} bytes, header declares {}",
            table.len(),
            meta.decompressed_size
        );
    }

    Ok(table)
}
