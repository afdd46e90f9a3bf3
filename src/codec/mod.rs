//! Adapters over the image, PDF, rasterizer and archive libraries.

pub mod archive;
pub mod imaging;
pub mod pdf;
pub mod raster;

use crate::config::CompressorConfig;

pub use pdf::{LopdfCodec, PdfCodec, RasterPage, RewrittenPdf};
pub use raster::{Pdftoppm, Rasterizer};

/// The swappable codec backends used by the PDF strategy.
pub struct Codecs {
    pub pdf: Box<dyn PdfCodec>,
    pub rasterizer: Box<dyn Rasterizer>,
}

impl Codecs {
    /// `lopdf` for PDF structure and `pdftoppm` for rendering.
    pub fn system(config: &CompressorConfig) -> Self {
        Self {
            pdf: Box::new(LopdfCodec),
            rasterizer: Box::new(Pdftoppm::new(config.pdftoppm.clone())),
        }
    }
}
