//! Random-access byte sources backing an archive handle
//!
//! A [`ByteSource`] only has to report its total length and serve bounded
//! range reads. Memory-mapped and in-memory sources hand out borrowed slices;
//! [`FileSource`] seeks and reads under a lock and returns owned buffers.

use memmap2::{Mmap, MmapOptions};
use parking_lot::Mutex;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Length-aware random-access reader.
pub trait ByteSource: Send + Sync {
    /// Total number of bytes available.
    fn len(&self) -> u64;

    /// Read the bytes in `[start, end)`.
    ///
    /// Ranges reaching past [`len`](Self::len) fail with
    /// [`io::ErrorKind::UnexpectedEof`].
    fn read_range(&self, start: u64, end: u64) -> io::Result<Cow<'_, [u8]>>;

    /// Whether the source holds no bytes at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn out_of_bounds(start: u64, end: u64, len: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("range {start}..{end} out of bounds for source of {len} bytes"),
    )
}

fn slice_range(data: &[u8], start: u64, end: u64) -> io::Result<&[u8]> {
    let len = data.len() as u64;
    if start > end || end > len {
        return Err(out_of_bounds(start, end, len));
    }
    // Both bounds fit in usize because they are at most data.len()
    Ok(&data[start as usize..end as usize])
}

impl ByteSource for &[u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_range(&self, start: u64, end: u64) -> io::Result<Cow<'_, [u8]>> {
        slice_range(self, start, end).map(Cow::Borrowed)
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> u64 {
        self.as_slice().len() as u64
    }

    fn read_range(&self, start: u64, end: u64) -> io::Result<Cow<'_, [u8]>> {
        slice_range(self, start, end).map(Cow::Borrowed)
    }
}

impl ByteSource for Arc<[u8]> {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_range(&self, start: u64, end: u64) -> io::Result<Cow<'_, [u8]>> {
        slice_range(self, start, end).map(Cow::Borrowed)
    }
}

/// Read-only memory map of an archive file
#[derive(Debug)]
pub struct MmapSource {
    path: PathBuf,
    mmap: Mmap,
}

impl MmapSource {
    /// Map the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        #[allow(unsafe_code)]
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        debug!("Mapped {} ({} bytes)", path.display(), mmap.len());
        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    /// Path of the mapped file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for MmapSource {
    fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    fn read_range(&self, start: u64, end: u64) -> io::Result<Cow<'_, [u8]>> {
        slice_range(&self.mmap, start, end).map(Cow::Borrowed)
    }
}

/// Archive file read through seek + read
///
/// The file cursor is shared, so each range read holds the lock for its
/// seek and read.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: Mutex<File>,
    len: u64,
}

impl FileSource {
    /// Open the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        debug!("Opened {} ({} bytes)", path.display(), len);
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            len,
        })
    }

    /// Path of the opened file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_range(&self, start: u64, end: u64) -> io::Result<Cow<'_, [u8]>> {
        if start > end || end > self.len {
            return Err(out_of_bounds(start, end, self.len));
        }

        let size = usize::try_from(end - start)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "range too large"))?;
        let mut buffer = vec![0u8; size];

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(&mut buffer)?;

        Ok(Cow::Owned(buffer))
    }
}
