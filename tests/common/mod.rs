#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use file_compressor_rust::codec::imaging;
use file_compressor_rust::codec::{Codecs, LopdfCodec, PdfCodec, RasterPage, Rasterizer, RewrittenPdf};
use file_compressor_rust::observer::{Event, RecordingObserver};
use file_compressor_rust::{Capabilities, Compressor, CompressorConfig};
use image::{DynamicImage, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Deterministic white noise; compresses badly, which is the point.
pub fn noisy_image(width: u32, height: u32) -> DynamicImage {
    let mut state: u32 = 0x1234_5678;
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let b = state.to_le_bytes();
        Rgb([b[0], b[1], b[2]])
    }))
}

pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

pub fn jpeg(img: &DynamicImage, quality: u8) -> Vec<u8> {
    imaging::encode_jpeg(img, quality).unwrap()
}

/// A text-only PDF with `pages` pages.
pub fn text_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24i64.into()]),
                Operation::new("Td", vec![100i64.into(), 600i64.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {} of the report", i + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0i64.into(), 0i64.into(), 612i64.into(), 792i64.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Records the DPI of every call and returns blank letter-size pages.
#[derive(Clone, Default)]
pub struct CountingRasterizer {
    pub calls: Arc<Mutex<Vec<u32>>>,
    pub pages: usize,
    pub fail: bool,
}

impl CountingRasterizer {
    pub fn new(pages: usize) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

impl Rasterizer for CountingRasterizer {
    fn rasterize(&self, pdf: &Path, dpi: u32, _out_dir: &Path) -> Result<Vec<DynamicImage>> {
        self.calls.lock().unwrap().push(dpi);
        assert!(pdf.exists(), "source should be materialized in the workspace");
        if self.fail {
            bail!("rasterizer crashed");
        }
        // 8.5x11 inches at the requested dpi
        let (w, h) = (dpi * 17 / 2, dpi * 11);
        Ok((0..self.pages)
            .map(|_| DynamicImage::new_rgb8(w, h))
            .collect())
    }
}

/// Direct path with a canned output; assembly goes through lopdf.
pub struct FixedRewrite {
    pub output: Option<Vec<u8>>,
    pub pages: usize,
}

impl PdfCodec for FixedRewrite {
    fn rewrite(&self, _input: &[u8]) -> Result<RewrittenPdf> {
        match &self.output {
            Some(data) => Ok(RewrittenPdf {
                data: data.clone(),
                pages: self.pages,
            }),
            None => bail!("cannot parse PDF"),
        }
    }

    fn assemble(&self, pages: &[RasterPage]) -> Result<Vec<u8>> {
        LopdfCodec.assemble(pages)
    }
}

pub fn compressor(
    pdf: Box<dyn PdfCodec>,
    rasterizer: Box<dyn Rasterizer>,
    rasterize: bool,
    config: CompressorConfig,
) -> (Compressor, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::new());
    let compressor = Compressor::with_codecs(
        config,
        Codecs { pdf, rasterizer },
        Capabilities { rasterize },
    )
    .with_observer(observer.clone());
    (compressor, observer)
}

/// Compressor with lopdf and a rasterizer that is never expected to run.
pub fn plain_compressor() -> (Compressor, Arc<RecordingObserver>) {
    compressor(
        Box::new(LopdfCodec),
        Box::new(CountingRasterizer::failing()),
        false,
        CompressorConfig::default(),
    )
}

pub fn convergence_steps(events: &[Event]) -> Vec<(u8, u64, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::ConvergenceStep {
                quality,
                size,
                accepted,
                ..
            } => Some((*quality, *size, *accepted)),
            _ => None,
        })
        .collect()
}
