//! Reader for GRF game resource archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Format-specific terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! A GRF archive is a single file made of a fixed 46-byte header, a data
//! region holding every entry's bytes, and a zlib-compressed directory that
//! lists the entries.
//!
//! ```text
//! +-------------------+ 0
//! | header (46 bytes) |
//! +-------------------+ 46
//! | entry data ...    | entry.offset + 46
//! +-------------------+ directory_offset + 46
//! | compressed size   |
//! | inflated size     |
//! | zlib directory    |
//! +-------------------+
//! ```
//!
//! Entry data may be partially enciphered (see [`grf_crypto`]) and is
//! usually deflated as well. [`Grf::get_file`] undoes both.
//!
//! # Example
//!
//! ```no_run
//! use grf_formats::Grf;
//!
//! let grf = Grf::open_path("data.grf")?;
//! for entry in grf.entries().iter().filter(|e| e.is_file()).take(10) {
//!     println!("{} ({} bytes)", entry.display_name(), entry.real_size);
//! }
//!
//! let bytes = grf.get_file("data\\clientinfo.xml")?;
//! # Ok::<(), grf_formats::GrfError>(())
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod compression;
pub mod entry;
pub mod error;
pub mod header;
pub mod index;
pub mod source;
pub mod table;

pub use archive::Grf;
pub use compression::{MAX_DIRECTORY_SIZE, MAX_ENTRY_SIZE};
pub use entry::{Entry, EntryFlags};
pub use error::{GrfError, GrfResult};
pub use grf_crypto::DecodeMode;
pub use header::{GRF_SIGNATURE, GRF_VERSION, GrfHeader, HEADER_SIZE};
pub use index::ArchiveIndex;
pub use source::{ByteSource, FileSource, MmapSource};
pub use table::DirectoryTableMeta;
