//! In-memory archive assembly

use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::FileOptions;

use crate::pipeline::{
    config::GrabConfig,
    error::Result,
    progress::{ProgressCallback, ProgressEvent},
};

/// Bundle downloaded tracks into a single store-only zip archive
///
/// Entries are written in track order under
/// `<entry_prefix><n>.<entry_extension>` (1-based) with a fixed
/// modification time, so the output is byte-identical across runs for
/// identical inputs. Runs only after every download has joined; there is
/// no incremental archive writing.
pub fn assemble_archive(
    config: &GrabConfig,
    tracks: &[Vec<u8>],
    progress_callback: Option<ProgressCallback>,
) -> Result<Vec<u8>> {
    if let Some(ref callback) = progress_callback {
        callback(ProgressEvent::ArchiveStarted {
            entries: tracks.len(),
        });
    }

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .last_modified_time(zip::DateTime::default());

    for (index, bytes) in tracks.iter().enumerate() {
        zip.start_file(entry_name(config, index), options)?;
        zip.write_all(bytes)?;
    }

    let archive = zip.finish()?.into_inner();
    debug!(
        "Archive assembled: {} entries, {} bytes",
        tracks.len(),
        archive.len()
    );

    if let Some(ref callback) = progress_callback {
        callback(ProgressEvent::ArchiveComplete {
            bytes: archive.len() as u64,
        });
    }

    Ok(archive)
}

/// Archive entry name for the 1-based track sequence
pub fn entry_name(config: &GrabConfig, index: usize) -> String {
    format!(
        "{}{}.{}",
        config.entry_prefix,
        index + 1,
        config.entry_extension
    )
}
