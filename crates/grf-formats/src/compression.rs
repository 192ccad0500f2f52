//! zlib inflate for the directory blob and compressed entries

use flate2::read::ZlibDecoder;
use std::io::{self, Read};

/// Maximum inflated size of the directory table (1 GB)
///
/// Limits decompression output to prevent denial of service via
/// compression bombs in a crafted directory blob.
pub const MAX_DIRECTORY_SIZE: usize = 1024 * 1024 * 1024;

/// Maximum inflated size of a single entry (1 GB)
pub const MAX_ENTRY_SIZE: usize = 1024 * 1024 * 1024;

/// Upfront allocation is bounded to this multiple of the compressed input
const PREALLOC_RATIO: usize = 16;

/// Inflate a zlib stream, failing once the output grows past `limit` bytes.
///
/// `size_hint` is the size recorded in the archive and is not trusted. It
/// only sizes the initial allocation, capped at `limit` and at
/// `PREALLOC_RATIO` times the compressed length. Output beyond that grows
/// chunk by chunk as it is actually produced.
pub fn inflate(data: &[u8], size_hint: usize, limit: usize) -> io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let capacity = size_hint
        .min(data.len().saturating_mul(PREALLOC_RATIO))
        .min(limit);
    let mut inflated = Vec::with_capacity(capacity);

    // Read in chunks to enforce size limit
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = decoder.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }

        if inflated.len() + bytes_read > limit {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("inflated size exceeds limit of {limit} bytes"),
            ));
        }

        inflated.extend_from_slice(&buffer[..bytes_read]);
    }

    Ok(inflated)
}
