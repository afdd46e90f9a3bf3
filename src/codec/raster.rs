use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use image::DynamicImage;

/// Renders every page of a PDF to a bitmap.
pub trait Rasterizer: Send + Sync {
    /// `out_dir` is an empty scratch directory the implementation may use.
    fn rasterize(&self, pdf: &Path, dpi: u32, out_dir: &Path) -> Result<Vec<DynamicImage>>;
}

/// Rasterizer backed by poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct Pdftoppm {
    program: PathBuf,
}

impl Pdftoppm {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Rasterizer for Pdftoppm {
    fn rasterize(&self, pdf: &Path, dpi: u32, out_dir: &Path) -> Result<Vec<DynamicImage>> {
        let prefix = out_dir.join("page");
        let output = Command::new(&self.program)
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(&prefix)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Failed to execute {}", self.program.display()))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            bail!("pdftoppm error: {}", error.trim());
        }

        // pdftoppm zero-pads page numbers, so name order is page order.
        let mut files: Vec<PathBuf> = fs::read_dir(out_dir)
            .context("Failed to list rasterized pages")?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("png"))
            .collect();
        files.sort();

        if files.is_empty() {
            bail!("pdftoppm produced no pages");
        }

        files
            .iter()
            .map(|path| {
                image::open(path)
                    .with_context(|| format!("Failed to read rasterized page {}", path.display()))
            })
            .collect()
    }
}
