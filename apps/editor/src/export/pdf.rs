//! Rasterized PDF export.
//!
//! The preview is captured as one tall bitmap, scaled to the A4 page width, and sliced
//! across as many pages as its height needs. Each page draws the same image XObject,
//! shifted up by one page height per page, so page k shows the k-th page-height band.

use std::io::Write;

use bytes::Bytes;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};
use tracing::info;

use super::raster::{Bitmap, Rasterizer};
use super::{Artifact, ExportError};
use crate::render::PreviewTree;

pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;

const PT_PER_MM: f64 = 72.0 / 25.4;
const SLIVER_MM: f64 = 1e-6;
const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Placement of the full image on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice {
    /// 1-based.
    pub page_number: usize,
    /// Top edge of the image relative to the page top; zero or negative.
    pub y_offset_mm: f64,
    /// Band of the image visible on this page, in image millimetres.
    pub visible_from_mm: f64,
    pub visible_to_mm: f64,
}

/// Slices an image of `image_height_mm` into pages of `page_height_mm`.
///
/// Always at least one page; an image that fits is placed once at offset zero.
pub fn plan_pages(image_height_mm: f64, page_height_mm: f64) -> Vec<PageSlice> {
    let image_height_mm = image_height_mm.max(0.0);
    let mut slices = Vec::new();
    let mut index = 0usize;
    loop {
        let top = page_height_mm * index as f64;
        if index > 0 && top >= image_height_mm - SLIVER_MM {
            break;
        }
        slices.push(PageSlice {
            page_number: index + 1,
            y_offset_mm: -top,
            visible_from_mm: top,
            visible_to_mm: (top + page_height_mm).min(image_height_mm),
        });
        index += 1;
    }
    slices
}

/// Height of `bitmap` in millimetres once scaled to `page_width_mm`.
pub fn image_height_mm(bitmap: &Bitmap, page_width_mm: f64) -> f64 {
    if bitmap.width == 0 {
        return 0.0;
    }
    bitmap.height as f64 * page_width_mm / bitmap.width as f64
}

/// `<resume name>.pdf`, falling back to `resume.pdf`.
pub fn pdf_filename(resume_name: &str) -> String {
    let name = resume_name.trim();
    if name.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{name}.pdf")
    }
}

/// Packs `bitmap` into a paginated A4 portrait PDF.
pub fn pack_pdf(bitmap: &Bitmap) -> Result<Vec<u8>, ExportError> {
    let img_w_mm = A4_WIDTH_MM;
    let img_h_mm = image_height_mm(bitmap, img_w_mm);
    let slices = plan_pages(img_h_mm, A4_HEIGHT_MM);

    let compressed = deflate(&bitmap.pixels)?;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let image_id = Ref::new(3);
    let mut next_id = 4;

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);

    let mut image = pdf.image_xobject(image_id, &compressed);
    image.filter(Filter::FlateDecode);
    image.width(bitmap.width as i32);
    image.height(bitmap.height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let page_w_pt = (A4_WIDTH_MM * PT_PER_MM) as f32;
    let page_h_pt = (A4_HEIGHT_MM * PT_PER_MM) as f32;
    let mut page_ids = Vec::with_capacity(slices.len());

    for slice in &slices {
        let page_id = Ref::new(next_id);
        let content_id = Ref::new(next_id + 1);
        next_id += 2;
        page_ids.push(page_id);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, page_w_pt, page_h_pt));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().x_objects().pair(IMAGE_NAME, image_id);
        page.finish();

        // PDF space is bottom-up; the image bottom sits (offset + height) below the page top.
        let bottom_pt = ((A4_HEIGHT_MM - (slice.y_offset_mm + img_h_mm)) * PT_PER_MM) as f32;
        let mut content = Content::new();
        content.save_state();
        content.transform([
            (img_w_mm * PT_PER_MM) as f32,
            0.0,
            0.0,
            (img_h_mm * PT_PER_MM) as f32,
            0.0,
            bottom_pt,
        ]);
        content.x_object(IMAGE_NAME);
        content.restore_state();
        pdf.stream(content_id, &content.finish());
    }

    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    Ok(pdf.finish())
}

fn deflate(raw: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(raw)
        .map_err(|e| ExportError::Encode(format!("deflate: {e}")))?;
    encoder
        .finish()
        .map_err(|e| ExportError::Encode(format!("deflate: {e}")))
}

/// Rasterizes the preview and returns the finished PDF download.
pub async fn export_pdf(
    preview: &PreviewTree,
    rasterizer: &dyn Rasterizer,
    scale: f32,
    resume_name: &str,
) -> Result<Artifact, ExportError> {
    let bitmap = rasterizer.rasterize(preview, preview.anchor, scale).await?;

    let pages = plan_pages(image_height_mm(&bitmap, A4_WIDTH_MM), A4_HEIGHT_MM).len();
    let bytes = tokio::task::spawn_blocking(move || pack_pdf(&bitmap))
        .await
        .map_err(|e| ExportError::Task(e.to_string()))??;

    info!(resume_name, pages, size = bytes.len(), "PDF export complete");
    Ok(Artifact {
        filename: pdf_filename(resume_name),
        mime: "application/pdf",
        bytes: Bytes::from(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::raster::{LayoutRasterizer, RasterError};
    use crate::models::resume::ResumeDocument;
    use crate::models::template::Rgb;
    use crate::render::render;
    use async_trait::async_trait;

    fn count_pages(pdf: &[u8]) -> usize {
        let haystack = String::from_utf8_lossy(pdf);
        haystack.matches("/Type /Page").count() - haystack.matches("/Type /Pages").count()
    }

    #[test]
    fn test_short_image_single_page() {
        let slices = plan_pages(150.0, A4_HEIGHT_MM);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].y_offset_mm, 0.0);
        assert_eq!(slices[0].visible_to_mm, 150.0);
    }

    #[test]
    fn test_exact_page_height_single_page() {
        assert_eq!(plan_pages(297.0, 297.0).len(), 1);
        assert_eq!(plan_pages(594.0, 297.0).len(), 2);
        assert_eq!(plan_pages(0.0, 297.0).len(), 1);
    }

    #[test]
    fn test_page_offsets() {
        let slices = plan_pages(700.0, 297.0);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[1].y_offset_mm, -297.0);
        assert_eq!(slices[2].y_offset_mm, -594.0);
        assert_eq!(slices[2].visible_from_mm, 594.0);
        assert_eq!(slices[2].visible_to_mm, 700.0);
    }

    #[test]
    fn test_page_count_matches_ceil() {
        for h in [1.0, 296.9, 297.1, 593.0, 1000.0, 2970.0] {
            let expected = (h / 297.0_f64).ceil().max(1.0) as usize;
            assert_eq!(plan_pages(h, 297.0).len(), expected, "height {h}");
        }
    }

    #[test]
    fn test_filename() {
        assert_eq!(pdf_filename("Software Engineer Resume"), "Software Engineer Resume.pdf");
        assert_eq!(pdf_filename("  "), "resume.pdf");
    }

    #[test]
    fn test_pack_pdf_page_count() {
        // 100 x 400 px scales to 210 x 840 mm.
        let tall = Bitmap::filled(100, 400, Rgb(255, 255, 255));
        let pdf = pack_pdf(&tall).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(count_pages(&pdf), 3);

        let short = Bitmap::filled(100, 100, Rgb(0, 0, 0));
        assert_eq!(count_pages(&pack_pdf(&short).unwrap()), 1);
    }

    #[tokio::test]
    async fn test_export_pdf_seed() {
        let preview = render(&ResumeDocument::seed());
        let artifact = export_pdf(&preview, &LayoutRasterizer::default(), 1.0, "My Resume")
            .await
            .unwrap();
        assert_eq!(artifact.filename, "My Resume.pdf");
        assert_eq!(artifact.mime, "application/pdf");
        assert!(count_pages(&artifact.bytes) >= 1);
    }

    struct BrokenRasterizer;

    #[async_trait]
    impl Rasterizer for BrokenRasterizer {
        async fn rasterize(&self, _: &PreviewTree, _: &str, _: f32) -> Result<Bitmap, RasterError> {
            Err(RasterError::Failed("canvas lost".into()))
        }
    }

    #[tokio::test]
    async fn test_rasterizer_failure_surfaces() {
        let preview = render(&ResumeDocument::seed());
        let err = export_pdf(&preview, &BrokenRasterizer, 2.0, "x").await.unwrap_err();
        assert!(matches!(err, ExportError::Rasterize(_)));
    }
}
