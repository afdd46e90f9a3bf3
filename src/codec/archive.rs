use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use flate2::{Compression, GzBuilder};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Strongest Deflate level.
pub const BEST: u32 = 9;

/// Packs `entries` into a Deflate zip archive at `level` (0-9).
pub fn zip(entries: &[(&str, &[u8])], level: u32) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(level.min(BEST) as i32));

    for (name, data) in entries {
        writer
            .start_file(*name, options)
            .with_context(|| format!("Failed to create {} in ZIP", name))?;
        writer
            .write_all(data)
            .with_context(|| format!("Failed to write {} to ZIP", name))?;
    }

    let cursor = writer.finish().context("Failed to finalize ZIP")?;
    Ok(cursor.into_inner())
}

/// Single-member gzip stream whose header records `name`.
pub fn gzip(name: &str, data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = GzBuilder::new()
        .filename(name)
        .write(Vec::new(), Compression::new(level.min(BEST)));
    encoder.write_all(data).context("Compression write error")?;
    encoder.finish().context("Compression finish error")
}
