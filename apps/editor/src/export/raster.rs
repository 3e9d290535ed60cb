//! Rasterization port and the built-in layout rasterizer.
//!
//! A browser front end rasterizes the real DOM node; the server uses `LayoutRasterizer`,
//! which lays the preview tree out with the static font metrics and paints each word as
//! a solid glyph block. Page geometry is faithful, glyph shapes are not.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::layout::{get_metrics, wrap_text, FontMetricTable};
use crate::models::template::Rgb;
use crate::render::{PreviewBlock, PreviewTree};

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Anchor '{0}' not found in preview")]
    AnchorNotFound(String),

    #[error("Invalid scale factor {0}")]
    InvalidScale(f32),

    #[error("Rasterization failed: {0}")]
    Failed(String),
}

/// Packed 8-bit RGB pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&[color.0, color.1, color.2]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Rgb(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }

    /// Fills the rectangle, clipped to the bitmap.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let x0 = x.max(0.0).floor() as u32;
        let y0 = y.max(0.0).floor() as u32;
        let x1 = ((x + w).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((y + h).ceil().max(0.0) as u32).min(self.height);
        for row in y0..y1 {
            for col in x0..x1 {
                let i = (row as usize * self.width as usize + col as usize) * 3;
                self.pixels[i..i + 3].copy_from_slice(&[color.0, color.1, color.2]);
            }
        }
    }
}

#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Captures the subtree identified by `anchor` at `scale` × CSS pixel density.
    async fn rasterize(
        &self,
        preview: &PreviewTree,
        anchor: &str,
        scale: f32,
    ) -> Result<Bitmap, RasterError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Layout rasterizer
// ────────────────────────────────────────────────────────────────────────────

/// Upper bound on a single bitmap, whatever the page count and scale.
pub const MAX_BITMAP_BYTES: usize = 128 * 1024 * 1024;

/// CSS-pixel geometry of the preview card (A4 at 96 dpi).
#[derive(Debug, Clone)]
pub struct LayoutRasterizer {
    pub width_px: f32,
    pub padding_px: f32,
    pub line_height: f32,
    /// Content taller than this many A4 pages fails instead of being painted.
    pub max_pages: u32,
}

impl Default for LayoutRasterizer {
    fn default() -> Self {
        Self {
            width_px: 794.0,
            padding_px: 48.0,
            line_height: 1.4,
            max_pages: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

/// One styled run of text before wrapping.
#[derive(Debug, Clone)]
struct Run {
    text: String,
    size_px: f32,
    color: Rgb,
    align: Align,
    space_before_px: f32,
    rule_below: bool,
}

const WHITE: Rgb = Rgb(255, 255, 255);
const A4_ASPECT: f32 = 297.0 / 210.0;
const RULE: Rgb = Rgb(229, 231, 235);

#[async_trait]
impl Rasterizer for LayoutRasterizer {
    async fn rasterize(
        &self,
        preview: &PreviewTree,
        anchor: &str,
        scale: f32,
    ) -> Result<Bitmap, RasterError> {
        if preview.anchor != anchor {
            return Err(RasterError::AnchorNotFound(anchor.to_string()));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RasterError::InvalidScale(scale));
        }

        // Painting is CPU-bound; keep it off the async workers.
        let geometry = self.clone();
        let preview = preview.clone();
        let bitmap = tokio::task::spawn_blocking(move || geometry.paint(&preview, scale))
            .await
            .map_err(|e| RasterError::Failed(format!("paint task failed: {e}")))??;

        debug!(
            width = bitmap.width,
            height = bitmap.height,
            "Preview rasterized"
        );
        Ok(bitmap)
    }
}

impl LayoutRasterizer {
    /// Tallest content, in CSS pixels, that will be painted.
    pub fn max_height_px(&self) -> f32 {
        self.width_px * A4_ASPECT * self.max_pages as f32
    }

    fn paint(&self, preview: &PreviewTree, scale: f32) -> Result<Bitmap, RasterError> {
        let metrics = get_metrics(preview.style.font);
        let runs = collect_runs(preview);
        let content_width = self.width_px - 2.0 * self.padding_px;
        let max_height = self.max_height_px();

        // Pass 1: wrap and measure.
        let mut laid_out = Vec::with_capacity(runs.len());
        let mut height = self.padding_px;
        for run in runs {
            let lines = wrap_text(&run.text, metrics, content_width / run.size_px);
            height += run.space_before_px
                + lines.len() as f32 * run.size_px * self.line_height
                + if run.rule_below { 4.0 } else { 0.0 };
            if height + self.padding_px > max_height {
                return Err(RasterError::Failed(format!(
                    "content exceeds {} pages",
                    self.max_pages
                )));
            }
            laid_out.push((run, lines));
        }
        height += self.padding_px;

        let width_px = (self.width_px * scale).round().max(1.0) as u32;
        let height_px = (height * scale).round().max(1.0) as u32;
        let bytes = (width_px as usize)
            .checked_mul(height_px as usize)
            .and_then(|n| n.checked_mul(3))
            .filter(|&n| n <= MAX_BITMAP_BYTES)
            .ok_or_else(|| {
                RasterError::Failed(format!("{width_px}x{height_px} bitmap exceeds size limit"))
            })?;
        debug!(width_px, height_px, bytes, "Painting preview");
        let mut bitmap = Bitmap::filled(width_px, height_px, WHITE);

        // Pass 2: paint.
        let mut y = self.padding_px;
        for (run, lines) in laid_out {
            y += run.space_before_px;
            let line_advance = run.size_px * self.line_height;
            for line in &lines {
                let line_width = line.width_em * run.size_px;
                let x = match run.align {
                    Align::Left => self.padding_px,
                    Align::Center => self.padding_px + (content_width - line_width).max(0.0) / 2.0,
                };
                paint_line(&mut bitmap, &line.text, metrics, &run, x, y, scale, line_advance);
                y += line_advance;
            }
            if run.rule_below {
                bitmap.fill_rect(
                    self.padding_px * scale,
                    (y + 1.0) * scale,
                    content_width * scale,
                    scale.max(1.0),
                    RULE,
                );
                y += 4.0;
            }
        }
        Ok(bitmap)
    }
}

#[allow(clippy::too_many_arguments)]
fn paint_line(
    bitmap: &mut Bitmap,
    text: &str,
    metrics: &FontMetricTable,
    run: &Run,
    x: f32,
    y: f32,
    scale: f32,
    line_advance: f32,
) {
    // Glyph block covers the x-height band, vertically centred in the line box.
    let glyph_h = run.size_px * 0.55;
    let top = y + (line_advance - glyph_h) / 2.0;
    let mut cursor = x;
    for word in text.split(' ') {
        let word_w = metrics.measure_str(word) * run.size_px;
        if word_w > 0.0 {
            bitmap.fill_rect(cursor * scale, top * scale, word_w * scale, glyph_h * scale, run.color);
        }
        cursor += word_w + metrics.space_width * run.size_px;
    }
}

fn collect_runs(preview: &PreviewTree) -> Vec<Run> {
    let style = &preview.style;
    let mut runs = Vec::new();
    let mut push = |text: &str, size_px: f32, color: Rgb, align: Align, space: f32, rule: bool| {
        runs.push(Run {
            text: text.to_string(),
            size_px,
            color,
            align,
            space_before_px: space,
            rule_below: rule,
        })
    };

    let header = &preview.header;
    push(&header.full_name, 28.0, style.text, Align::Center, 0.0, false);
    push(&header.title, 18.0, style.muted, Align::Center, 4.0, false);
    let contact_count = header.contact_lines.len();
    for (i, line) in header.contact_lines.iter().enumerate() {
        push(line, 13.0, style.muted, Align::Center, 2.0, i + 1 == contact_count);
    }

    for section in &preview.sections {
        push(section.heading, 18.0, style.accent, Align::Left, 20.0, false);
        for block in &section.blocks {
            match block {
                PreviewBlock::Paragraph { text } => {
                    push(text, 13.0, style.text, Align::Left, 4.0, false)
                }
                PreviewBlock::Chips { items } => {
                    push(&items.join("   "), 13.0, style.text, Align::Left, 4.0, false)
                }
                PreviewBlock::Entry(entry) => {
                    push(&entry.title, 14.0, style.text, Align::Left, 10.0, false);
                    if let Some(subtitle) = &entry.subtitle {
                        push(subtitle, 13.0, style.muted, Align::Left, 0.0, false);
                    }
                    if let Some(dates) = &entry.dates {
                        push(dates, 13.0, style.muted, Align::Left, 0.0, false);
                    }
                    if let Some(body) = &entry.body {
                        push(body, 13.0, style.text, Align::Left, 4.0, false);
                    }
                    if !entry.tags.is_empty() {
                        push(&entry.tags.join(", "), 12.0, style.muted, Align::Left, 2.0, false);
                    }
                    if let Some(link) = &entry.link {
                        push(link, 13.0, style.accent, Align::Left, 2.0, false);
                    }
                }
            }
        }
    }
    runs
}
