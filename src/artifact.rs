//! Request-scoped input/output blobs and the temp workspace they live in.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::classify::{self, FileKind};
use crate::codec::imaging;

/// The uploaded file. Never mutated.
#[derive(Debug)]
pub struct SourceArtifact {
    pub file_name: String,
    pub kind: FileKind,
    pub data: Vec<u8>,
    /// Width and height from the image header. `None` for non-images and
    /// for images whose header cannot be read.
    pub dimensions: Option<(u32, u32)>,
}

impl SourceArtifact {
    pub fn new(file_name: &str, data: Vec<u8>) -> Self {
        let kind = classify::classify(file_name);
        let dimensions = match kind {
            FileKind::Image => imaging::dimensions(&data),
            _ => None,
        };
        Self {
            file_name: file_name.to_string(),
            kind,
            data,
            dimensions,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn extension(&self) -> Option<String> {
        classify::extension(&self.file_name)
    }

    /// File name without its extension, falling back to "file".
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("file")
    }

    /// Byte-for-byte copy of the input, used whenever compression gives up.
    pub fn copy(&self) -> CompressedArtifact {
        CompressedArtifact::new(self.data.clone(), self.extension())
    }
}

/// One encoded output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedArtifact {
    pub data: Vec<u8>,
    /// Extension of the produced format, without the dot.
    pub extension: Option<String>,
}

impl CompressedArtifact {
    pub fn new(data: Vec<u8>, extension: Option<String>) -> Self {
        Self { data, extension }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Per-request scratch directory. Removed when dropped, on every exit path.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    source: PathBuf,
}

impl Workspace {
    /// Creates the directory and writes the source bytes into it.
    pub fn create(root: Option<&Path>, source: &SourceArtifact) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("file-compressor-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let ext = source.extension().unwrap_or_else(|| "bin".to_string());
        let path = dir.path().join(format!("input.{}", ext));
        fs::write(&path, &source.data)?;
        Ok(Self { dir, source: path })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// On-disk copy of the source artifact.
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// A fresh, empty subdirectory for one codec call.
    pub fn scratch(&self, name: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}
