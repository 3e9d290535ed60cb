// Text measurement for the rasterized export path.
// Static font metrics + greedy wrap; no font files are loaded.

pub mod font_metrics;
pub mod wrap;

pub use font_metrics::{get_metrics, FontFamily, FontMetricTable};
pub use wrap::wrap_text;
