//! Container formats (docx, xlsx, ...) are already deflated internally, so
//! wrapping them only trims a little. Unknown files get the same treatment.

use std::path::Path;

use anyhow::Result;

use crate::artifact::{CompressedArtifact, SourceArtifact};
use crate::codec::archive;

fn entry_name(source: &SourceArtifact) -> &str {
    Path::new(&source.file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("file")
}

fn wrapped_extension(source: &SourceArtifact, suffix: &str) -> String {
    match source.extension() {
        Some(ext) => format!("{}.{}", ext, suffix),
        None => suffix.to_string(),
    }
}

/// Office documents: single-entry zip at the strongest Deflate level.
pub fn document(source: &SourceArtifact) -> Result<CompressedArtifact> {
    let data = archive::zip(&[(entry_name(source), source.data.as_slice())], archive::BEST)?;
    Ok(CompressedArtifact::new(
        data,
        Some(wrapped_extension(source, "zip")),
    ))
}

/// Anything unrecognized: gzip with the original name in the header.
pub fn generic(source: &SourceArtifact) -> Result<CompressedArtifact> {
    let data = archive::gzip(entry_name(source), &source.data, archive::BEST)?;
    Ok(CompressedArtifact::new(
        data,
        Some(wrapped_extension(source, "gz")),
    ))
}
