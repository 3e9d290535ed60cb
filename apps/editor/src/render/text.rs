use crate::render::preview::{PreviewBlock, PreviewTree};

/// Flattens a preview into plain text, one display line per line.
///
/// Used as the resume text for match analysis and by the layout rasterizer.
pub fn to_plain_text(tree: &PreviewTree) -> String {
    let mut out: Vec<String> = Vec::new();
    if !tree.header.full_name.trim().is_empty() {
        out.push(tree.header.full_name.clone());
    }
    if !tree.header.title.trim().is_empty() {
        out.push(tree.header.title.clone());
    }
    out.extend(tree.header.contact_lines.iter().cloned());

    for section in &tree.sections {
        out.push(String::new());
        out.push(section.heading.to_string());
        for block in &section.blocks {
            match block {
                PreviewBlock::Paragraph { text } => out.push(text.clone()),
                PreviewBlock::Chips { items } => out.push(items.join(", ")),
                PreviewBlock::Entry(entry) => {
                    out.push(entry.title.clone());
                    out.extend(entry.subtitle.iter().cloned());
                    out.extend(entry.dates.iter().cloned());
                    out.extend(entry.body.iter().cloned());
                    if !entry.tags.is_empty() {
                        out.push(entry.tags.join(", "));
                    }
                    out.extend(entry.link.iter().cloned());
                }
            }
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeDocument;
    use crate::render::preview::render;

    #[test]
    fn test_plain_text_contains_headings_and_fields() {
        let text = to_plain_text(&render(&ResumeDocument::seed()));
        assert!(text.starts_with("John Doe\nSenior Software Engineer"));
        assert!(text.contains("Work Experience"));
        assert!(text.contains("• Mentored 3 junior developers"));
        assert!(text.contains("JavaScript, React, Node.js"));
    }

    #[test]
    fn test_plain_text_of_empty_document() {
        assert_eq!(to_plain_text(&render(&ResumeDocument::default())), "");
    }
}
