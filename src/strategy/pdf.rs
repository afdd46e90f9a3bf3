//! PDF strategy.
//!
//! Three states, tried in order:
//!
//! * `Direct`: re-serialize the page tree with `lopdf`. Cheap and lossless,
//!   but rarely a large saving.
//! * `Raster`: render every page at a low DPI, JPEG it and rebuild the PDF
//!   from the images. Entered when `Direct` fails or misses the target, and
//!   only if a rasterizer was found at startup. One pass at the level's
//!   parameters; there is no per-page convergence.
//! * `Fallback`: give up. The caller returns the original bytes, flagged as
//!   degraded. A `Direct` output that missed the target is discarded.

use anyhow::{anyhow, Context as _, Result};
use image::{DynamicImage, GenericImageView};

use super::Context;
use crate::artifact::{CompressedArtifact, SourceArtifact};
use crate::codec::{imaging, RasterPage};
use crate::observer::Event;

const POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterParameters {
    pub dpi: u32,
    pub quality: u8,
    pub max_width: u32,
}

enum State {
    Direct,
    Raster(Option<CompressedArtifact>),
    Fallback,
}

fn pdf_artifact(data: Vec<u8>) -> CompressedArtifact {
    CompressedArtifact::new(data, Some("pdf".to_string()))
}

pub fn compress(
    source: &SourceArtifact,
    params: &RasterParameters,
    ctx: &Context<'_>,
) -> Result<CompressedArtifact> {
    let target = ctx.profile.target_bytes();
    let mut state = State::Direct;

    loop {
        state = match state {
            State::Direct => match ctx.codecs.pdf.rewrite(&source.data) {
                Ok(rewritten) => {
                    let direct = pdf_artifact(rewritten.data);
                    ctx.observer.record(&Event::PdfDirect {
                        pages: rewritten.pages,
                        size: direct.size(),
                    });
                    match target {
                        Some(target) if direct.size() > target => State::Raster(Some(direct)),
                        _ => return Ok(direct),
                    }
                }
                Err(e) => {
                    ctx.observer.record(&Event::CodecFailed {
                        stage: "pdf rewrite",
                        error: format!("{:#}", e),
                    });
                    State::Raster(None)
                }
            },
            State::Raster(direct) if !ctx.capabilities.rasterize => {
                log::info!(
                    "Rasterizer unavailable, discarding direct output ({:?} bytes)",
                    direct.as_ref().map(CompressedArtifact::size)
                );
                State::Fallback
            }
            State::Raster(direct) => match rasterize(params, ctx) {
                Ok(raster) => {
                    return Ok(match direct {
                        Some(direct) if direct.size() <= raster.size() => direct,
                        _ => raster,
                    });
                }
                Err(e) => {
                    ctx.observer.record(&Event::CodecFailed {
                        stage: "pdf raster",
                        error: format!("{:#}", e),
                    });
                    State::Fallback
                }
            },
            State::Fallback => return Err(anyhow!("No PDF codec path succeeded")),
        };
    }
}

fn rasterize(params: &RasterParameters, ctx: &Context<'_>) -> Result<CompressedArtifact> {
    let scratch = ctx
        .workspace
        .scratch("pages")
        .context("Failed to create raster scratch directory")?;
    let images = ctx
        .codecs
        .rasterizer
        .rasterize(ctx.workspace.source_path(), params.dpi, &scratch)?;
    if images.is_empty() {
        return Err(anyhow!("Rasterizer returned no pages"));
    }

    let mut pages = Vec::with_capacity(images.len());
    for img in images {
        pages.push(encode_page(img, params)?);
    }

    let data = ctx.codecs.pdf.assemble(&pages)?;
    let artifact = pdf_artifact(data);
    ctx.observer.record(&Event::PdfRaster {
        dpi: params.dpi,
        quality: params.quality,
        max_width: params.max_width,
        pages: pages.len(),
        size: artifact.size(),
    });
    Ok(artifact)
}

/// Same treatment as a standalone image: shrink, drop alpha, JPEG.
/// The physical page size comes from the render, before shrinking.
fn encode_page(img: DynamicImage, params: &RasterParameters) -> Result<RasterPage> {
    let (w, h) = img.dimensions();
    let scale = POINTS_PER_INCH / params.dpi.max(1) as f32;

    let img = imaging::fit_width(img, params.max_width);
    let img = DynamicImage::ImageRgb8(img.to_rgb8());
    let jpeg = imaging::encode_jpeg(&img, params.quality)?;

    Ok(RasterPage {
        jpeg,
        width: img.width(),
        height: img.height(),
        width_pt: w as f32 * scale,
        height_pt: h as f32 * scale,
    })
}
