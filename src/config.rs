//! Pipeline configuration and startup capability probing.

use std::path::PathBuf;
use std::process::{Command, Stdio};

/// 50 MiB, the upload ceiling of the hosted service.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Knobs of the size-convergence loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergencePolicy {
    /// Quality points removed per iteration.
    pub step: u8,
    /// Quality is never lowered below this.
    pub floor_quality: u8,
    /// Hard ceiling on re-encode attempts.
    pub max_iterations: u32,
}

impl ConvergencePolicy {
    pub const IMAGE: ConvergencePolicy = ConvergencePolicy {
        step: 15,
        floor_quality: 5,
        max_iterations: 5,
    };

    /// Next quality to try. Never above `current`.
    pub fn next_quality(&self, current: u8) -> u8 {
        current.saturating_sub(self.step).max(self.floor_quality).min(current)
    }
}

impl Default for ConvergencePolicy {
    fn default() -> Self {
        Self::IMAGE
    }
}

#[derive(Debug, Clone)]
pub struct CompressorConfig {
    /// Inputs above this size are rejected before any work is done.
    pub max_input_bytes: u64,
    /// When false, files that classify as generic are rejected.
    pub allow_generic: bool,
    pub convergence: ConvergencePolicy,
    /// Program used to rasterize PDF pages.
    pub pdftoppm: PathBuf,
    /// Parent directory for per-request workspaces (system temp dir if unset).
    pub temp_root: Option<PathBuf>,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            allow_generic: true,
            convergence: ConvergencePolicy::default(),
            pdftoppm: PathBuf::from("pdftoppm"),
            temp_root: None,
        }
    }
}

/// Optional codec capabilities, probed once when the compressor is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub rasterize: bool,
}

impl Capabilities {
    pub fn probe(config: &CompressorConfig) -> Self {
        let rasterize = Command::new(&config.pdftoppm)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

        if !rasterize {
            log::warn!(
                "{} not available, PDF raster fallback disabled",
                config.pdftoppm.display()
            );
        }
        Self { rasterize }
    }
}
