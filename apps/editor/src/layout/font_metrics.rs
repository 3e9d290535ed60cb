//! Static glyph-width tables for the template font families.
//!
//! Widths are in em units and cover printable ASCII (0x20..=0x7E); anything else measures
//! as the family's average width. Good enough to lay out a preview for rasterization, not
//! a substitute for real shaping.

use serde::{Deserialize, Serialize};

/// Font families used by the template catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    Inter,
    EbGaramond,
    Lato,
    Oswald,
    ComputerModern,
}

/// Per-family metrics. Glyph widths are the shared sans-serif base scaled by `scale`.
pub struct FontMetricTable {
    pub family: FontFamily,
    scale: f32,
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Advance width of `s` in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    pub fn char_width(&self, c: char) -> f32 {
        match (c as usize).checked_sub(0x20) {
            Some(i) if i < BASE_WIDTHS.len() => BASE_WIDTHS[i] * self.scale,
            _ => self.average_char_width,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Base widths (printable ASCII, 0x20..=0x7E)
// ────────────────────────────────────────────────────────────────────────────

#[rustfmt::skip]
const BASE_WIDTHS: [f32; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22,
    0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
    // digits
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    // : ; < = > ? @
    0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
    // A-Z
    0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25,
    0.39, 0.61, 0.53, 0.78, 0.67, 0.72, 0.56, 0.72, 0.61,
    0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
    // [ \ ] ^ _ `
    0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
    // a-z
    0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22,
    0.22, 0.53, 0.22, 0.83, 0.56, 0.56, 0.56, 0.56, 0.33,
    0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
    // { | } ~
    0.33, 0.26, 0.33, 0.59,
];

const BASE_AVERAGE: f32 = 0.52;

macro_rules! scaled_table {
    ($family:expr, $scale:expr) => {
        FontMetricTable {
            family: $family,
            scale: $scale,
            average_char_width: BASE_AVERAGE * $scale,
            space_width: BASE_WIDTHS[0] * $scale,
        }
    };
}

static INTER: FontMetricTable = scaled_table!(FontFamily::Inter, 1.0);
static EB_GARAMOND: FontMetricTable = scaled_table!(FontFamily::EbGaramond, 0.855);
static LATO: FontMetricTable = scaled_table!(FontFamily::Lato, 1.05);
static OSWALD: FontMetricTable = scaled_table!(FontFamily::Oswald, 0.68);
static COMPUTER_MODERN: FontMetricTable = scaled_table!(FontFamily::ComputerModern, 0.9);

pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Inter => &INTER,
        FontFamily::EbGaramond => &EB_GARAMOND,
        FontFamily::Lato => &LATO,
        FontFamily::Oswald => &OSWALD,
        FontFamily::ComputerModern => &COMPUTER_MODERN,
    }
}
