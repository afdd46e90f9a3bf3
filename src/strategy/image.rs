//! Standalone image strategy.
//!
//! First pass: decode, shrink to the level's bounding box, flatten to 8-bit
//! RGB (or gray) and encode at the level's quality. With a target size the
//! result is handed to the convergence engine, which re-encodes the retained
//! downscaled bitmap, never the previous JPEG, so artifacts do not compound.

use anyhow::Result;
use image::{DynamicImage, GenericImageView};

use super::Context;
use crate::artifact::{CompressedArtifact, SourceArtifact};
use crate::codec::imaging;
use crate::converge::{self, Reencode};
use crate::observer::Event;
use crate::profile::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Jpeg,
    /// Lossless; only used for PNG inputs.
    Png,
}

impl TargetFormat {
    pub fn for_extension(extension: Option<&str>) -> Self {
        match extension {
            Some("png") => TargetFormat::Png,
            _ => TargetFormat::Jpeg,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageParameters {
    pub quality: u8,
    pub max_dimension: u32,
    pub format: TargetFormat,
}

/// JPEG re-encoder over an in-memory bitmap.
struct JpegReencoder<'a> {
    image: &'a DynamicImage,
}

impl Reencode for JpegReencoder<'_> {
    fn reencode(&self, quality: u8) -> Result<CompressedArtifact> {
        let data = imaging::encode_jpeg(self.image, quality)?;
        Ok(CompressedArtifact::new(
            data,
            Some(TargetFormat::Jpeg.extension().to_string()),
        ))
    }
}

fn encode(img: &DynamicImage, params: &ImageParameters) -> Result<CompressedArtifact> {
    let data = match params.format {
        TargetFormat::Jpeg => imaging::encode_jpeg(img, params.quality)?,
        TargetFormat::Png => imaging::encode_png(img)?,
    };
    Ok(CompressedArtifact::new(
        data,
        Some(params.format.extension().to_string()),
    ))
}

pub fn compress(
    source: &SourceArtifact,
    params: &ImageParameters,
    ctx: &Context<'_>,
) -> Result<CompressedArtifact> {
    let img = imaging::decode(&source.data)?;
    let original = img.dimensions();

    let img = imaging::fit_within(img, params.max_dimension);
    if img.dimensions() != original {
        ctx.observer.record(&Event::ImageResized {
            from: original,
            to: img.dimensions(),
        });
    }
    let img = imaging::flatten(img);

    let first = encode(&img, params)?;
    ctx.observer.record(&Event::FirstPass {
        quality: match params.format {
            TargetFormat::Jpeg => Some(params.quality),
            TargetFormat::Png => None,
        },
        size: first.size(),
    });

    let target = match ctx.profile.target_bytes() {
        Some(target) if first.size() > target => target,
        _ => return Ok(first),
    };

    if params.format == TargetFormat::Png && ctx.profile.mode == Mode::Quality {
        log::info!("Keeping lossless PNG in quality mode; target size ignored");
        return Ok(first);
    }

    let encoder = JpegReencoder { image: &img };

    // A lossless first pass never tried the level's JPEG quality; do that
    // before stepping down.
    let first = match params.format {
        TargetFormat::Jpeg => first,
        TargetFormat::Png => {
            let baseline = encoder.reencode(params.quality)?;
            ctx.observer.record(&Event::FirstPass {
                quality: Some(params.quality),
                size: baseline.size(),
            });
            if baseline.size() <= target {
                return Ok(baseline);
            }
            if baseline.size() < first.size() {
                baseline
            } else {
                first
            }
        }
    };

    let result = converge::converge(
        &encoder,
        first,
        params.quality,
        target,
        &ctx.config.convergence,
        ctx.observer,
    );
    Ok(result.best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_format_for_extension() {
        assert_eq!(TargetFormat::for_extension(Some("png")), TargetFormat::Png);
        assert_eq!(TargetFormat::for_extension(Some("jpeg")), TargetFormat::Jpeg);
        assert_eq!(TargetFormat::for_extension(Some("bmp")), TargetFormat::Jpeg);
        assert_eq!(TargetFormat::for_extension(None), TargetFormat::Jpeg);
    }

    #[test]
    fn test_reencoder_produces_jpeg() {
        let img = DynamicImage::new_rgb8(64, 64);
        let artifact = JpegReencoder { image: &img }.reencode(30).unwrap();
        assert_eq!(artifact.extension.as_deref(), Some("jpg"));
        assert_eq!(
            image::guess_format(&artifact.data).unwrap(),
            image::ImageFormat::Jpeg
        );
    }
}
