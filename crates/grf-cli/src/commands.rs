//! Subcommand implementations
//!
//! Every command writes its report to a caller-supplied writer so output can
//! be captured in tests.

use crate::config::{CliConfig, Command, SourceKind};
use anyhow::{Context, Result, bail};
use grf_formats::{ByteSource, Entry, EntryFlags, Grf};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Convert a user-supplied path to the archive's backslash separators.
pub fn archive_path(path: &str) -> String {
    path.replace('/', "\\")
}

/// Destination of an entry below `root`.
///
/// Components come from the raw name bytes. On Unix they are written as
/// is, so EUC-KR names reach the filesystem unchanged. Elsewhere each
/// byte becomes the code point of the same value.
///
/// Returns `None` for names that would escape `root`.
pub fn output_path(root: &Path, entry: &Entry) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    let mut components = 0;

    for component in entry.name().split(|&b| b == b'\\' || b == b'/') {
        match component {
            b"" | b"." => {}
            b".." => return None,
            part if part.contains(&b':') => return None,
            part => {
                path.push(path_component(part));
                components += 1;
            }
        }
    }

    (components > 0).then_some(path)
}

#[cfg(unix)]
fn path_component(bytes: &[u8]) -> &std::ffi::OsStr {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::OsStr::from_bytes(bytes)
}

#[cfg(not(unix))]
fn path_component(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Open the configured archive and run the configured command.
pub fn run(config: &CliConfig, out: &mut dyn Write) -> Result<()> {
    let archive = &config.archive;
    match config.source {
        SourceKind::Mmap => {
            let grf = Grf::open_path(archive)
                .with_context(|| format!("Failed to open {}", archive.display()))?;
            execute(&grf, &config.command, out)
        }
        SourceKind::File => {
            let grf = Grf::open_file(archive)
                .with_context(|| format!("Failed to open {}", archive.display()))?;
            execute(&grf, &config.command, out)
        }
    }
}

/// Run `command` against an open archive.
pub fn execute<S: ByteSource>(grf: &Grf<S>, command: &Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Info => info_command(grf, out),
        Command::List { filter, long, all } => {
            list_command(grf, filter.as_deref(), *long, *all, out)
        }
        Command::Extract { paths, output } => extract_command(grf, paths, output, out),
        Command::Cat { path } => cat_command(grf, path, out),
    }
}

fn info_command<S: ByteSource>(grf: &Grf<S>, out: &mut dyn Write) -> Result<()> {
    let header = grf.header();
    let files: Vec<&Entry> = grf.entries().iter().filter(|e| e.is_file()).collect();
    let packed: u64 = files.iter().map(|e| u64::from(e.pack_size)).sum();
    let real: u64 = files.iter().map(|e| u64::from(e.real_size)).sum();
    let stored = files.iter().filter(|e| e.is_stored()).count();
    let encrypted = files
        .iter()
        .filter(|e| e.flags.has(EntryFlags::ENCRYPT_MIXED | EntryFlags::ENCRYPT_HEADER))
        .count();

    writeln!(out, "Signature:        {}", String::from_utf8_lossy(&header.signature))?;
    writeln!(out, "Version:          {:#x}", header.version)?;
    writeln!(out, "Archive size:     {} bytes", grf.source().len())?;
    writeln!(out, "Directory offset: {}", header.directory_position())?;
    writeln!(out, "Entries:          {}", grf.len())?;
    writeln!(out, "Files:            {}", files.len())?;
    writeln!(out, "Directories:      {}", grf.len() - files.len())?;
    writeln!(out, "Stored files:     {stored}")?;
    writeln!(out, "Encrypted files:  {encrypted}")?;
    writeln!(out, "Packed size:      {packed} bytes")?;
    writeln!(out, "Real size:        {real} bytes")?;
    Ok(())
}

fn matches_filter(entry: &Entry, needle: &[u8]) -> bool {
    needle.is_empty() || entry.key().windows(needle.len()).any(|window| window == needle)
}

fn list_command<S: ByteSource>(
    grf: &Grf<S>,
    filter: Option<&str>,
    long: bool,
    all: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let needle = archive_path(filter.unwrap_or_default()).to_ascii_lowercase();

    let mut listed = 0usize;
    for entry in grf.entries() {
        if !(all || entry.is_file()) || !matches_filter(entry, needle.as_bytes()) {
            continue;
        }

        if long {
            writeln!(
                out,
                "{:<12} {:>10} {:>10}  {}",
                entry.flags.to_string(),
                entry.pack_size,
                entry.real_size,
                entry.display_name()
            )?;
        } else {
            writeln!(out, "{}", entry.display_name())?;
        }
        listed += 1;
    }

    debug!("Listed {} of {} entries", listed, grf.len());
    Ok(())
}

fn extract_command<S: ByteSource>(
    grf: &Grf<S>,
    paths: &[String],
    output: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let entries: Vec<&Entry> = if paths.is_empty() {
        grf.entries().iter().filter(|e| e.is_file()).collect()
    } else {
        let mut selected = Vec::with_capacity(paths.len());
        for path in paths {
            let name = archive_path(path);
            match grf.entry(&name) {
                Some(entry) if entry.is_file() => selected.push(entry),
                Some(_) => bail!("{path} is a directory entry"),
                None => bail!("{path} not found in archive"),
            }
        }
        selected
    };

    let mut extracted = 0usize;
    for entry in entries {
        let Some(destination) = output_path(output, entry) else {
            warn!("Skipping unsafe entry name {}", entry.display_name());
            continue;
        };

        let data = grf
            .read_entry(entry)
            .with_context(|| format!("Failed to read {}", entry.display_name()))?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&destination, &data)
            .with_context(|| format!("Failed to write {}", destination.display()))?;

        info!("Extracted {} ({} bytes)", entry.display_name(), data.len());
        extracted += 1;
    }

    writeln!(out, "Extracted {extracted} file(s) to {}", output.display())?;
    Ok(())
}

fn cat_command<S: ByteSource>(grf: &Grf<S>, path: &str, out: &mut dyn Write) -> Result<()> {
    let data = grf
        .get_file(&archive_path(path))
        .with_context(|| format!("Failed to read {path}"))?;
    out.write_all(&data)?;
    out.flush()?;
    Ok(())
}
