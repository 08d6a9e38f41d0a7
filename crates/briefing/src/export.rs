//! PNG encoding and single-page PDF export.

use std::{fs, io::Cursor, path::Path};

use image::{ImageFormat, RgbImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BriefingError, Result};

/// A4 landscape in PDF points
pub const A4_LANDSCAPE: (f32, f32) = (841.89, 595.28);
pub const DEFAULT_MARGIN: f32 = 20.0;
#[cfg(feature = "pdf")]
const JPEG_QUALITY: u8 = 92;

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Print page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: A4_LANDSCAPE.0,
            height: A4_LANDSCAPE.1,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Where the image lands on the page, in points from the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageLayout {
    /// Largest aspect-preserving box inside the margins, centred
    pub fn fit(&self, image_w: u32, image_h: u32) -> Placement {
        let avail_w = (self.width - 2.0 * self.margin).max(1.0);
        let avail_h = (self.height - 2.0 * self.margin).max(1.0);
        let scale = (avail_w / image_w.max(1) as f32).min(avail_h / image_h.max(1) as f32);
        let width = image_w as f32 * scale;
        let height = image_h as f32 * scale;
        Placement {
            x: (self.width - width) / 2.0,
            y: (self.height - height) / 2.0,
            width,
            height,
        }
    }
}

/// Whether this build can write PDFs
pub const fn pdf_available() -> bool {
    cfg!(feature = "pdf")
}

#[cfg(feature = "pdf")]
pub fn export_pdf(image: &RgbImage, page: &PageLayout) -> Result<Vec<u8>> {
    use image::codecs::jpeg::JpegEncoder;
    use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(image)?;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);
    let image_name = Name(b"Im1");

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut pdf_page = pdf.page(page_id);
    pdf_page.media_box(Rect::new(0.0, 0.0, page.width, page.height));
    pdf_page.parent(page_tree_id);
    pdf_page.contents(content_id);
    pdf_page.resources().x_objects().pair(image_name, image_id);
    pdf_page.finish();

    let mut xobject = pdf.image_xobject(image_id, &jpeg);
    xobject.filter(Filter::DctDecode);
    xobject.width(image.width() as i32);
    xobject.height(image.height() as i32);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
    xobject.finish();

    let placement = page.fit(image.width(), image.height());
    let mut content = Content::new();
    content.save_state();
    content.transform([placement.width, 0.0, 0.0, placement.height, placement.x, placement.y]);
    content.x_object(image_name);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    Ok(pdf.finish())
}

#[cfg(not(feature = "pdf"))]
pub fn export_pdf(_image: &RgbImage, _page: &PageLayout) -> Result<Vec<u8>> {
    Err(BriefingError::PdfUnavailable)
}

/// Encoded outputs of one render. `pdf` is `None` when the backend is missing.
#[derive(Debug, Clone, Default)]
pub struct Exports {
    pub png: Vec<u8>,
    pub pdf: Option<Vec<u8>>,
    pub notices: Vec<String>,
}

impl Exports {
    /// Encode the PNG and, when available, the PDF
    pub fn encode(image: &RgbImage, page: &PageLayout) -> Result<Self> {
        let png = encode_png(image)?;
        let mut notices = Vec::new();
        let pdf = match export_pdf(image, page) {
            Ok(bytes) => Some(bytes),
            Err(BriefingError::PdfUnavailable) => {
                let notice =
                    "PDF export unavailable in this build; only PNG was produced".to_string();
                warn!("{notice}");
                notices.push(notice);
                None
            }
            Err(err) => return Err(err),
        };
        info!(
            png_bytes = png.len(),
            pdf_bytes = pdf.as_ref().map_or(0, Vec::len),
            "exports encoded"
        );
        Ok(Self { png, pdf, notices })
    }

    /// Write `<stem>.png` and, if present, `<stem>.pdf` into `dir`.
    /// Returns the written paths.
    pub fn save<P: AsRef<Path>>(&self, dir: P, stem: &str) -> Result<Vec<std::path::PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();

        let png_path = dir.join(format!("{stem}.png"));
        fs::write(&png_path, &self.png)?;
        written.push(png_path);

        if let Some(pdf) = &self.pdf {
            let pdf_path = dir.join(format!("{stem}.pdf"));
            fs::write(&pdf_path, pdf)?;
            written.push(pdf_path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn canvas() -> RgbImage {
        RgbImage::from_pixel(1920, 1080, Rgb([11, 18, 33]))
    }

    #[test]
    fn test_fit_preserves_aspect() {
        let page = PageLayout::default();
        let p = page.fit(1920, 1080);
        assert!((p.width / p.height - 1920.0 / 1080.0).abs() < 1e-3);
        assert!((p.width - (A4_LANDSCAPE.0 - 40.0)).abs() < 1e-3);
        assert!(p.height <= A4_LANDSCAPE.1 - 40.0);
        assert!((p.x - 20.0).abs() < 1e-3);
        assert!((p.y * 2.0 + p.height - A4_LANDSCAPE.1).abs() < 1e-3);

        // a tall image is limited by height and letterboxed horizontally
        let tall = page.fit(500, 1000);
        assert!((tall.height - (A4_LANDSCAPE.1 - 40.0)).abs() < 1e-3);
        assert!(tall.x > 20.0);
    }

    #[test]
    fn test_png_roundtrip_dimensions() {
        let png = encode_png(&canvas()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1920, 1080));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_pdf_single_page() {
        let pdf = export_pdf(&canvas(), &PageLayout::default()).unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.starts_with("%PDF"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/DCTDecode"));
        assert!(text.contains("/Width 1920"));
        assert!(text.contains("/Height 1080"));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_exports_with_pdf() {
        let exports = Exports::encode(&canvas(), &PageLayout::default()).unwrap();
        assert!(exports.pdf.is_some());
        assert!(exports.notices.is_empty());
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn test_exports_without_pdf() {
        let exports = Exports::encode(&canvas(), &PageLayout::default()).unwrap();
        assert!(exports.pdf.is_none());
        assert_eq!(exports.notices.len(), 1);
        assert!(!pdf_available());
    }

    #[test]
    fn test_save_writes_files() {
        let dir = std::env::temp_dir().join(format!("briefing-export-{}", std::process::id()));
        let exports = Exports {
            png: vec![1, 2, 3],
            pdf: None,
            notices: Vec::new(),
        };
        let written = exports.save(&dir, "briefing").unwrap();
        assert_eq!(written, vec![dir.join("briefing.png")]);
        assert_eq!(std::fs::read(&written[0]).unwrap(), vec![1, 2, 3]);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
