//! Template catalogue: the fixed set of visual skins a resume can be rendered with.
//!
//! A template only changes styling (accent colour, font family). It never changes
//! which fields are shown or their values.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::FontFamily;

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("Unknown template id '{0}'")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Modern,
    Executive,
    Creative,
    Minimal,
    #[serde(alias = "tech-pro")]
    Tech,
    Corporate,
    Startup,
    Academic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateCategory {
    Professional,
    Executive,
    Creative,
    Minimal,
    Academic,
}

/// 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Visual skin copied onto the preview tree by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStyle {
    pub template_id: TemplateId,
    pub accent: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub font: FontFamily,
}

/// Catalogue entry listed by the template picker.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
    pub category: TemplateCategory,
    pub is_pro: bool,
}

impl TemplateId {
    pub const ALL: [TemplateId; 8] = [
        TemplateId::Modern,
        TemplateId::Executive,
        TemplateId::Creative,
        TemplateId::Minimal,
        TemplateId::Tech,
        TemplateId::Corporate,
        TemplateId::Startup,
        TemplateId::Academic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Executive => "executive",
            TemplateId::Creative => "creative",
            TemplateId::Minimal => "minimal",
            TemplateId::Tech => "tech",
            TemplateId::Corporate => "corporate",
            TemplateId::Startup => "startup",
            TemplateId::Academic => "academic",
        }
    }

    pub fn info(&self) -> TemplateInfo {
        let (name, category, is_pro) = match self {
            TemplateId::Modern => ("Modern", TemplateCategory::Professional, false),
            TemplateId::Executive => ("Executive", TemplateCategory::Executive, true),
            TemplateId::Creative => ("Creative", TemplateCategory::Creative, true),
            TemplateId::Minimal => ("Minimal", TemplateCategory::Minimal, false),
            TemplateId::Tech => ("Tech Pro", TemplateCategory::Professional, false),
            TemplateId::Corporate => ("Corporate", TemplateCategory::Executive, true),
            TemplateId::Startup => ("Startup", TemplateCategory::Creative, false),
            TemplateId::Academic => ("Academic", TemplateCategory::Academic, false),
        };
        TemplateInfo {
            id: *self,
            name,
            category,
            is_pro,
        }
    }

    pub fn style(&self) -> TemplateStyle {
        // Accents follow the picker swatches.
        let (accent, font) = match self {
            TemplateId::Modern => (Rgb(37, 99, 235), FontFamily::Inter),
            TemplateId::Executive => (Rgb(31, 41, 55), FontFamily::EbGaramond),
            TemplateId::Creative => (Rgb(168, 85, 247), FontFamily::Oswald),
            TemplateId::Minimal => (Rgb(16, 185, 129), FontFamily::Lato),
            TemplateId::Tech => (Rgb(6, 182, 212), FontFamily::Inter),
            TemplateId::Corporate => (Rgb(51, 65, 85), FontFamily::ComputerModern),
            TemplateId::Startup => (Rgb(249, 115, 22), FontFamily::Lato),
            TemplateId::Academic => (Rgb(99, 102, 241), FontFamily::EbGaramond),
        };
        TemplateStyle {
            template_id: *self,
            accent,
            text: Rgb(17, 24, 39),
            muted: Rgb(75, 85, 99),
            font,
        }
    }
}

impl FromStr for TemplateId {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "modern" => Ok(TemplateId::Modern),
            "executive" => Ok(TemplateId::Executive),
            "creative" => Ok(TemplateId::Creative),
            "minimal" => Ok(TemplateId::Minimal),
            "tech" | "tech-pro" => Ok(TemplateId::Tech),
            "corporate" => Ok(TemplateId::Corporate),
            "startup" => Ok(TemplateId::Startup),
            "academic" => Ok(TemplateId::Academic),
            other => Err(TemplateError::Unknown(other.to_string())),
        }
    }
}

pub fn catalogue() -> Vec<TemplateInfo> {
    TemplateId::ALL.iter().map(TemplateId::info).collect()
}
