//! Adaptive file compressor.
//!
//! Picks a strategy from the file extension (PDF, image, office document,
//! plain text, anything else), runs it once, and for images keeps lowering
//! JPEG quality until a byte budget is met or nothing more can be gained.
//! PDFs escalate from a lossless rewrite to page rasterization when a target
//! is missed. Whatever happens, the caller gets an artifact back: a failed
//! strategy yields a copy of the input.

pub mod artifact;
pub mod classify;
pub mod codec;
pub mod config;
pub mod converge;
pub mod error;
pub mod observer;
pub mod profile;
pub mod report;
pub mod strategy;

use std::sync::Arc;

use artifact::{SourceArtifact, Workspace};
use classify::FileKind;
use codec::Codecs;
use observer::{Event, LogObserver, Observer};
use strategy::Context;

pub use config::{Capabilities, CompressorConfig, ConvergencePolicy};
pub use error::{CompressionError, Result};
pub use profile::{CompressionProfile, Level, Mode};
pub use report::{format_file_size, CompressionOutcome};

/// Entry point. Immutable once built, so one instance can serve concurrent
/// requests; every call owns its own workspace and parameters.
pub struct Compressor {
    config: CompressorConfig,
    capabilities: Capabilities,
    codecs: Codecs,
    observer: Arc<dyn Observer>,
}

impl Compressor {
    /// Uses the system codecs and probes for `pdftoppm` once.
    pub fn new(config: CompressorConfig) -> Self {
        let capabilities = Capabilities::probe(&config);
        let codecs = Codecs::system(&config);
        Self::with_codecs(config, codecs, capabilities)
    }

    pub fn with_codecs(config: CompressorConfig, codecs: Codecs, capabilities: Capabilities) -> Self {
        Self {
            config,
            capabilities,
            codecs,
            observer: Arc::new(LogObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Compresses one file.
    ///
    /// Fails only on precondition violations (size limit, unsupported type
    /// when generic fallback is off) or when the temp workspace cannot be
    /// created. Codec failures come back as `degraded` copies of the input.
    pub fn compress(
        &self,
        data: Vec<u8>,
        file_name: &str,
        profile: &CompressionProfile,
    ) -> Result<CompressionOutcome> {
        let size = data.len() as u64;
        if size > self.config.max_input_bytes {
            return Err(CompressionError::SizeLimitExceeded {
                size,
                limit: self.config.max_input_bytes,
            });
        }

        let source = SourceArtifact::new(file_name, data);
        if source.kind == FileKind::Generic && !self.config.allow_generic {
            return Err(CompressionError::UnsupportedType {
                file_name: file_name.to_string(),
            });
        }

        self.observer.record(&Event::Started {
            file_name: source.file_name.clone(),
            kind: source.kind,
            size,
            dimensions: source.dimensions,
        });

        let workspace = Workspace::create(self.config.temp_root.as_deref(), &source)?;

        let strategy = strategy::select(source.kind, source.extension().as_deref(), profile);
        self.observer.record(&Event::StrategySelected {
            strategy: strategy.to_string(),
            converges: strategy.converges() && profile.target_size.is_some(),
        });

        let ctx = Context {
            config: &self.config,
            capabilities: self.capabilities,
            codecs: &self.codecs,
            observer: self.observer.as_ref(),
            workspace: &workspace,
            profile,
        };
        let attempt = strategy.compress(&source, &ctx);

        let file_name = match &attempt.artifact.extension {
            Some(ext) => format!("compressed_{}.{}", source.stem(), ext),
            None => format!("compressed_{}", source.stem()),
        };
        let outcome = CompressionOutcome {
            original_size: size,
            compressed_size: attempt.artifact.size(),
            data: attempt.artifact.data,
            file_name,
            strategy: strategy.name(),
            degraded: attempt.degraded,
        };
        self.observer.record(&Event::Finished {
            original_size: outcome.original_size,
            compressed_size: outcome.compressed_size,
        });

        Ok(outcome)
    }
}
