use anyhow::{anyhow, bail, Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Result of re-serializing a PDF.
#[derive(Debug)]
pub struct RewrittenPdf {
    pub data: Vec<u8>,
    pub pages: usize,
}

/// One JPEG-encoded page ready to be placed into a new PDF.
#[derive(Debug, Clone)]
pub struct RasterPage {
    pub jpeg: Vec<u8>,
    /// Pixel size of the encoded JPEG.
    pub width: u32,
    pub height: u32,
    /// Physical page size in points (1/72 inch).
    pub width_pt: f32,
    pub height_pt: f32,
}

pub trait PdfCodec: Send + Sync {
    /// Reads the page tree and writes it back out without touching page
    /// content, dropping whatever the pages do not reference.
    fn rewrite(&self, input: &[u8]) -> Result<RewrittenPdf>;

    /// Builds a PDF with one full-page image per entry.
    fn assemble(&self, pages: &[RasterPage]) -> Result<Vec<u8>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfCodec;

impl PdfCodec for LopdfCodec {
    fn rewrite(&self, input: &[u8]) -> Result<RewrittenPdf> {
        let doc = Document::load_mem(input).context("Failed to load PDF")?;
        rewrite_document(doc)
    }

    fn assemble(&self, pages: &[RasterPage]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(anyhow!("No pages to assemble"));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

        for page in pages {
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => page.width as i64,
                    "Height" => page.height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8i64,
                    "Filter" => "DCTDecode",
                },
                page.jpeg.clone(),
            ));

            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            page.width_pt.into(),
                            0i64.into(),
                            0i64.into(),
                            page.height_pt.into(),
                            0i64.into(),
                            0i64.into(),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().context("Failed to encode page content")?,
            ));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    0i64.into(),
                    0i64.into(),
                    page.width_pt.into(),
                    page.height_pt.into(),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        "Im0" => image_id,
                    },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .context("Failed to save assembled PDF")?;
        Ok(buffer)
    }
}

/// Re-serializes a loaded document. Encrypted files get one try with the
/// empty password; if that fails they are rewritten as they are.
fn rewrite_document(mut doc: Document) -> Result<RewrittenPdf> {
    if doc.is_encrypted() {
        if let Err(e) = doc.decrypt(b"") {
            log::warn!("Failed to decrypt with empty password: {:?}", e);
        }
    }

    let pages = doc.get_pages().len();
    if pages == 0 {
        bail!("PDF has no pages");
    }

    doc.prune_objects();
    doc.delete_zero_length_streams();
    doc.renumber_objects();
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).context("Failed to save PDF")?;
    Ok(RewrittenPdf {
        data: buffer,
        pages,
    })
}
