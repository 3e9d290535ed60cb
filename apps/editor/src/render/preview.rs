//! Live preview renderer: a pure function from the document to a display tree.
//!
//! Runs on every mutation, so it must stay cheap and deterministic. Text is carried
//! verbatim: no re-flow, no markup interpretation. A section with nothing to show is
//! left out entirely.

use serde::Serialize;

use crate::models::resume::ResumeDocument;
use crate::models::template::TemplateStyle;

/// DOM anchor the rasterized export looks for.
pub const PREVIEW_ANCHOR: &str = "resume-preview";

const SEPARATOR: &str = " • ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

impl SectionKind {
    pub fn heading(&self) -> &'static str {
        match self {
            SectionKind::Summary => "Professional Summary",
            SectionKind::Experience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Projects => "Projects",
            SectionKind::Certifications => "Certifications",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewHeader {
    pub full_name: String,
    pub title: String,
    pub contact_lines: Vec<String>,
}

/// One entry inside a section (a job, a degree, a project, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewEntry {
    pub title: String,
    pub subtitle: Option<String>,
    pub dates: Option<String>,
    /// Rendered with whitespace preserved (`white-space: pre-line`).
    pub body: Option<String>,
    pub tags: Vec<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewBlock {
    Paragraph { text: String },
    Entry(PreviewEntry),
    Chips { items: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewSection {
    pub kind: SectionKind,
    pub heading: &'static str,
    pub blocks: Vec<PreviewBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewTree {
    pub anchor: &'static str,
    pub style: TemplateStyle,
    pub header: PreviewHeader,
    pub sections: Vec<PreviewSection>,
}

impl PreviewTree {
    pub fn section(&self, kind: SectionKind) -> Option<&PreviewSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Render
// ────────────────────────────────────────────────────────────────────────────

pub fn render(doc: &ResumeDocument) -> PreviewTree {
    let mut sections = Vec::new();

    if !is_blank(&doc.summary) {
        sections.push(section(
            SectionKind::Summary,
            vec![PreviewBlock::Paragraph {
                text: doc.summary.clone(),
            }],
        ));
    }

    if !doc.experience.is_empty() {
        let blocks = doc
            .experience
            .iter()
            .map(|exp| {
                PreviewBlock::Entry(PreviewEntry {
                    title: exp.title.clone(),
                    subtitle: join_present(&[&exp.company, &exp.location]),
                    dates: date_range(&exp.start_date, &exp.end_date),
                    body: non_blank(&exp.description),
                    tags: Vec::new(),
                    link: None,
                })
            })
            .collect();
        sections.push(section(SectionKind::Experience, blocks));
    }

    if !doc.education.is_empty() {
        let blocks = doc
            .education
            .iter()
            .map(|edu| {
                let gpa = if is_blank(&edu.gpa) {
                    String::new()
                } else {
                    format!("GPA: {}", edu.gpa)
                };
                PreviewBlock::Entry(PreviewEntry {
                    title: edu.degree.clone(),
                    subtitle: join_present(&[&edu.school, &edu.location]),
                    dates: join_present(&[&edu.graduation_date, &gpa]),
                    body: None,
                    tags: Vec::new(),
                    link: None,
                })
            })
            .collect();
        sections.push(section(SectionKind::Education, blocks));
    }

    if !doc.skills.is_empty() {
        sections.push(section(
            SectionKind::Skills,
            vec![PreviewBlock::Chips {
                items: doc.skills.clone(),
            }],
        ));
    }

    if !doc.projects.is_empty() {
        let blocks = doc
            .projects
            .iter()
            .map(|project| {
                PreviewBlock::Entry(PreviewEntry {
                    title: project.name.clone(),
                    subtitle: None,
                    dates: None,
                    body: non_blank(&project.description),
                    tags: project
                        .technologies
                        .iter()
                        .filter(|t| !is_blank(t))
                        .cloned()
                        .collect(),
                    link: non_blank(&project.link),
                })
            })
            .collect();
        sections.push(section(SectionKind::Projects, blocks));
    }

    if !doc.certifications.is_empty() {
        let blocks = doc
            .certifications
            .iter()
            .map(|cert| {
                PreviewBlock::Entry(PreviewEntry {
                    title: cert.name.clone(),
                    subtitle: join_present(&[&cert.issuer, &cert.date]),
                    dates: None,
                    body: None,
                    tags: Vec::new(),
                    link: None,
                })
            })
            .collect();
        sections.push(section(SectionKind::Certifications, blocks));
    }

    PreviewTree {
        anchor: PREVIEW_ANCHOR,
        style: doc.template_id.style(),
        header: render_header(doc),
        sections,
    }
}

fn render_header(doc: &ResumeDocument) -> PreviewHeader {
    let info = &doc.personal_info;
    let contact_lines = [
        join_present(&[&info.email, &info.phone]),
        non_blank(&info.location),
        join_present(&[&info.linkedin, &info.website]),
    ]
    .into_iter()
    .flatten()
    .collect();

    PreviewHeader {
        full_name: info.full_name.clone(),
        title: info.title.clone(),
        contact_lines,
    }
}

fn section(kind: SectionKind, blocks: Vec<PreviewBlock>) -> PreviewSection {
    PreviewSection {
        kind,
        heading: kind.heading(),
        blocks,
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn non_blank(s: &str) -> Option<String> {
    (!is_blank(s)).then(|| s.to_string())
}

fn join_present(parts: &[&str]) -> Option<String> {
    let present: Vec<&str> = parts.iter().copied().filter(|p| !is_blank(p)).collect();
    (!present.is_empty()).then(|| present.join(SEPARATOR))
}

fn date_range(start: &str, end: &str) -> Option<String> {
    match (is_blank(start), is_blank(end)) {
        (true, true) => None,
        _ => Some(format!("{start} - {end}")),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ExperienceEntry, ItemId};
    use crate::models::template::TemplateId;

    #[test]
    fn test_seed_renders_every_section_in_order() {
        let tree = render(&ResumeDocument::seed());
        let kinds: Vec<SectionKind> = tree.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills,
                SectionKind::Projects,
                SectionKind::Certifications,
            ]
        );
        assert_eq!(tree.anchor, "resume-preview");
    }

    #[test]
    fn test_blank_summary_omits_heading() {
        let mut doc = ResumeDocument::seed();
        doc.summary = String::new();
        assert!(render(&doc).section(SectionKind::Summary).is_none());

        doc.summary = "   \n ".to_string();
        assert!(render(&doc).section(SectionKind::Summary).is_none());

        doc.summary = "x".to_string();
        let tree = render(&doc);
        let summary = tree.section(SectionKind::Summary).unwrap();
        assert_eq!(summary.heading, "Professional Summary");
    }

    #[test]
    fn test_empty_collections_omitted() {
        let doc = ResumeDocument::default();
        let tree = render(&doc);
        assert!(tree.sections.is_empty());
        assert!(tree.header.contact_lines.is_empty());
    }

    #[test]
    fn test_description_kept_verbatim() {
        let doc = ResumeDocument::seed();
        let tree = render(&doc);
        let section = tree.section(SectionKind::Experience).unwrap();
        let PreviewBlock::Entry(entry) = &section.blocks[0] else {
            panic!("expected entry block");
        };
        assert_eq!(entry.body.as_deref(), Some(doc.experience[0].description.as_str()));
        assert_eq!(entry.subtitle.as_deref(), Some("Tech Corp • San Francisco, CA"));
        assert_eq!(entry.dates.as_deref(), Some("2022 - Present"));
    }

    #[test]
    fn test_blank_new_entry_still_rendered() {
        let mut doc = ResumeDocument::default();
        doc.experience.push(ExperienceEntry::empty(ItemId(7)));
        let tree = render(&doc);
        let section = tree.section(SectionKind::Experience).unwrap();
        assert_eq!(section.blocks.len(), 1);
    }

    #[test]
    fn test_education_line_includes_gpa_only_when_set() {
        let mut doc = ResumeDocument::seed();
        let tree = render(&doc);
        let PreviewBlock::Entry(entry) = &tree.section(SectionKind::Education).unwrap().blocks[0]
        else {
            panic!("expected entry block");
        };
        assert_eq!(entry.dates.as_deref(), Some("2020 • GPA: 3.8"));

        doc.education[0].gpa.clear();
        let tree = render(&doc);
        let PreviewBlock::Entry(entry) = &tree.section(SectionKind::Education).unwrap().blocks[0]
        else {
            panic!("expected entry block");
        };
        assert_eq!(entry.dates.as_deref(), Some("2020"));
    }

    #[test]
    fn test_header_contact_lines() {
        let tree = render(&ResumeDocument::seed());
        assert_eq!(
            tree.header.contact_lines,
            vec![
                "john.doe@email.com • (555) 123-4567",
                "San Francisco, CA",
                "linkedin.com/in/johndoe • johndoe.dev",
            ]
        );
    }

    #[test]
    fn test_template_changes_style_not_content() {
        let mut doc = ResumeDocument::seed();
        let modern = render(&doc);
        doc.template_id = TemplateId::Creative;
        let creative = render(&doc);
        assert_ne!(modern.style, creative.style);
        assert_eq!(modern.header, creative.header);
        assert_eq!(modern.sections, creative.sections);
    }

    #[test]
    fn test_render_is_deterministic() {
        let doc = ResumeDocument::seed();
        assert_eq!(render(&doc), render(&doc));
    }
}
