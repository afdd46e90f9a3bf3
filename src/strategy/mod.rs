//! Strategy selection and dispatch.
//!
//! Every file goes through exactly one [`Strategy`]. The selector is a pure
//! function of the classified kind, the extension and the profile; the
//! strategy then produces a single artifact. Codec failures never escape a
//! strategy: the caller gets an exact copy of the input instead.

pub mod archive;
pub mod image;
pub mod pdf;
pub mod text;

use std::fmt;

use crate::artifact::{CompressedArtifact, SourceArtifact, Workspace};
use crate::classify::FileKind;
use crate::codec::Codecs;
use crate::config::{Capabilities, CompressorConfig};
use crate::error::CompressionError;
use crate::observer::{Event, Observer};
use crate::profile::CompressionProfile;

pub use self::image::{ImageParameters, TargetFormat};
pub use self::pdf::RasterParameters;
pub use self::text::TextMode;

/// Everything a strategy may use while handling one request.
pub struct Context<'a> {
    pub config: &'a CompressorConfig,
    pub capabilities: Capabilities,
    pub codecs: &'a Codecs,
    pub observer: &'a dyn Observer,
    pub workspace: &'a Workspace,
    pub profile: &'a CompressionProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Pdf(RasterParameters),
    Image(ImageParameters),
    Document,
    Text(TextMode),
    Generic,
}

/// Output of a strategy run.
#[derive(Debug)]
pub struct Attempt {
    pub artifact: CompressedArtifact,
    /// True when the artifact is a copy of the input because compression failed.
    pub degraded: bool,
}

/// Picks the strategy for a file and derives its starting parameters.
pub fn select(kind: FileKind, extension: Option<&str>, profile: &CompressionProfile) -> Strategy {
    let level = profile.level;
    match kind {
        FileKind::Pdf => Strategy::Pdf(RasterParameters {
            dpi: level.raster_dpi(),
            quality: level.raster_quality(),
            max_width: level.raster_max_width(),
        }),
        FileKind::Image => Strategy::Image(ImageParameters {
            quality: level.image_quality(),
            max_dimension: level.image_max_dimension(),
            format: TargetFormat::for_extension(extension),
        }),
        FileKind::Document => Strategy::Document,
        FileKind::Text => Strategy::Text(TextMode::for_level(level)),
        FileKind::Generic => Strategy::Generic,
    }
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Pdf(_) => "pdf",
            Strategy::Image(_) => "image",
            Strategy::Document => "document",
            Strategy::Text(_) => "text",
            Strategy::Generic => "generic",
        }
    }

    /// Whether the size-convergence engine may run after the first pass.
    pub fn converges(&self) -> bool {
        matches!(self, Strategy::Image(_))
    }

    /// Lossy strategies must not hand back something bigger than the input.
    fn never_grows(&self) -> bool {
        matches!(self, Strategy::Pdf(_) | Strategy::Image(_))
    }

    pub fn compress(&self, source: &SourceArtifact, ctx: &Context<'_>) -> Attempt {
        let result = match self {
            Strategy::Pdf(params) => self::pdf::compress(source, params, ctx),
            Strategy::Image(params) => self::image::compress(source, params, ctx),
            Strategy::Document => self::archive::document(source),
            Strategy::Text(mode) => self::text::compress(source, *mode),
            Strategy::Generic => self::archive::generic(source),
        };

        match result {
            Ok(artifact) if self.never_grows() && artifact.size() >= source.size() => {
                ctx.observer.record(&Event::Unchanged {
                    reason: format!(
                        "{} output ({} bytes) is not smaller than the input",
                        self.name(),
                        artifact.size()
                    ),
                });
                Attempt {
                    artifact: source.copy(),
                    degraded: false,
                }
            }
            Ok(artifact) => Attempt {
                artifact,
                degraded: false,
            },
            Err(e) => {
                let err = CompressionError::codec(e);
                ctx.observer.record(&Event::Unchanged {
                    reason: err.to_string(),
                });
                Attempt {
                    artifact: source.copy(),
                    degraded: true,
                }
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Pdf(p) => write!(
                f,
                "pdf (raster fallback: {} dpi, q={}, max width {})",
                p.dpi, p.quality, p.max_width
            ),
            Strategy::Image(p) => write!(
                f,
                "image ({:?}, q={}, max dimension {})",
                p.format, p.quality, p.max_dimension
            ),
            Strategy::Text(mode) => write!(f, "text ({:?})", mode),
            other => f.write_str(other.name()),
        }
    }
}
