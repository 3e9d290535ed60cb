//! Structured RTF export.
//!
//! Serializes the document fields straight into minimal RTF without going through the
//! preview renderer. Text fidelity over layout: every non-empty field is written as
//! escaped literal text so a reader recovers it exactly.

use bytes::Bytes;
use tracing::info;

use super::Artifact;
use crate::models::resume::ResumeDocument;
use crate::render::SectionKind;

const HEADER: &str = "{\\rtf1\\ansi\\deff0 {\\fonttbl {\\f0 Times New Roman;}}\n";

/// Renders `doc` as an RTF download.
pub fn export_word(doc: &ResumeDocument) -> Artifact {
    let body = to_rtf(doc);
    let filename = word_filename(&doc.personal_info.full_name);
    info!(filename = %filename, size = body.len(), "Word export complete");
    Artifact {
        filename,
        mime: "application/rtf",
        bytes: Bytes::from(body),
    }
}

/// Full name with whitespace runs collapsed to `_`, or `Resume` when blank.
pub fn word_filename(full_name: &str) -> String {
    let stem = full_name.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() {
        "Resume.rtf".to_string()
    } else {
        format!("{stem}.rtf")
    }
}

pub fn to_rtf(doc: &ResumeDocument) -> String {
    let info = &doc.personal_info;
    let mut out = String::from(HEADER);

    let name = if info.full_name.trim().is_empty() {
        "Resume"
    } else {
        info.full_name.as_str()
    };
    out.push_str("\\f0\\fs24 ");
    out.push_str(&escape(name));
    out.push_str("\\par\n\\fs18 ");
    out.push_str(&escape(&info.title));
    out.push_str("\\par\n\\par\n");
    para(&mut out, &join_present(&[&info.email, &info.phone, &info.location]));
    para(&mut out, &join_present(&[&info.linkedin, &info.website]));
    out.push_str("\\par\n");

    if !is_blank(&doc.summary) {
        heading(&mut out, SectionKind::Summary);
        para(&mut out, &doc.summary);
        out.push_str("\\par\n");
    }

    if !doc.experience.is_empty() {
        heading(&mut out, SectionKind::Experience);
        for exp in &doc.experience {
            let headline = match (is_blank(&exp.title), is_blank(&exp.company)) {
                (false, false) => format!("{} at {}", exp.title, exp.company),
                (false, true) => exp.title.clone(),
                (true, false) => exp.company.clone(),
                (true, true) => String::new(),
            };
            para(&mut out, &headline);
            para(&mut out, &join_present(&[&exp.location, &date_range(&exp.start_date, &exp.end_date)]));
            para(&mut out, &exp.description);
            out.push_str("\\par\n");
        }
    }

    if !doc.education.is_empty() {
        heading(&mut out, SectionKind::Education);
        for edu in &doc.education {
            para(&mut out, &edu.degree);
            para(&mut out, &join_present(&[&edu.school, &edu.location]));
            let gpa = if is_blank(&edu.gpa) {
                String::new()
            } else {
                format!("GPA: {}", edu.gpa)
            };
            para(&mut out, &join_present(&[&edu.graduation_date, &gpa]));
            out.push_str("\\par\n");
        }
    }

    if !doc.skills.is_empty() {
        heading(&mut out, SectionKind::Skills);
        para(&mut out, &doc.skills.join(", "));
        out.push_str("\\par\n");
    }

    if !doc.projects.is_empty() {
        heading(&mut out, SectionKind::Projects);
        for project in &doc.projects {
            para(&mut out, &project.name);
            para(&mut out, &project.description);
            if !project.technologies.is_empty() {
                para(
                    &mut out,
                    &format!("Technologies: {}", project.technologies.join(", ")),
                );
            }
            para(&mut out, &project.link);
            out.push_str("\\par\n");
        }
    }

    if !doc.certifications.is_empty() {
        heading(&mut out, SectionKind::Certifications);
        for cert in &doc.certifications {
            para(&mut out, &cert.name);
            para(&mut out, &join_present(&[&cert.issuer, &cert.date]));
            out.push_str("\\par\n");
        }
    }

    out.push('}');
    out
}

fn heading(out: &mut String, kind: SectionKind) {
    out.push_str(kind.heading());
    out.push_str("\\par\n");
}

/// Writes `text` as one paragraph; blank text writes nothing.
fn para(out: &mut String, text: &str) {
    if is_blank(text) {
        return;
    }
    out.push_str(&escape(text));
    out.push_str("\\par\n");
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn join_present(parts: &[&str]) -> String {
    parts
        .iter()
        .copied()
        .filter(|p| !is_blank(p))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn date_range(start: &str, end: &str) -> String {
    if is_blank(start) && is_blank(end) {
        String::new()
    } else {
        format!("{start} - {end}")
    }
}

/// Escapes RTF control characters and encodes non-ASCII as `\uN?` (UTF-16 units, signed).
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\line "),
            '\r' => {}
            '\t' => out.push_str("\\tab "),
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{CertificationEntry, ItemId, ProjectEntry};

    /// Minimal RTF reader: recovers the text content, skipping the font table.
    fn read_back(rtf: &str) -> String {
        let mut text = String::new();
        let mut chars = rtf.chars().peekable();
        let mut depth = 0usize;
        let mut skip_depth: Option<usize> = None;
        let mut pending_high: Option<u16> = None;

        while let Some(c) = chars.next() {
            match c {
                '{' => depth += 1,
                '}' => {
                    if skip_depth == Some(depth) {
                        skip_depth = None;
                    }
                    depth -= 1;
                }
                '\\' => {
                    let Some(&next) = chars.peek() else { break };
                    if matches!(next, '\\' | '{' | '}') {
                        chars.next();
                        if skip_depth.is_none() {
                            text.push(next);
                        }
                        continue;
                    }
                    let mut word = String::new();
                    while let Some(&ch) = chars.peek() {
                        if ch.is_ascii_alphabetic() {
                            word.push(ch);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    let mut arg = String::new();
                    while let Some(&ch) = chars.peek() {
                        if ch == '-' || ch.is_ascii_digit() {
                            arg.push(ch);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if chars.peek() == Some(&' ') {
                        chars.next();
                    }
                    if word == "fonttbl" {
                        skip_depth = Some(depth);
                    }
                    if skip_depth.is_some() {
                        continue;
                    }
                    match word.as_str() {
                        "par" | "line" => text.push('\n'),
                        "tab" => text.push('\t'),
                        "u" => {
                            let unit = arg.parse::<i16>().unwrap() as u16;
                            // Skip the `?` fallback character.
                            chars.next();
                            if let Some(high) = pending_high.take() {
                                text.extend(char::decode_utf16([high, unit]).map(|r| r.unwrap()));
                            } else if (0xD800..0xDC00).contains(&unit) {
                                pending_high = Some(unit);
                            } else {
                                text.extend(char::decode_utf16([unit]).map(|r| r.unwrap()));
                            }
                        }
                        _ => {}
                    }
                }
                '\n' => {}
                c if skip_depth.is_none() => text.push(c),
                _ => {}
            }
        }
        text
    }

    #[test]
    fn test_header_and_name() {
        let rtf = to_rtf(&ResumeDocument::seed());
        assert!(rtf.starts_with("{\\rtf1\\ansi\\deff0 {\\fonttbl {\\f0 Times New Roman;}}"));
        assert!(rtf.contains("\\f0\\fs24 John Doe\\par"));
        assert!(rtf.contains("\\fs18 Senior Software Engineer\\par"));
        assert!(rtf.ends_with('}'));
    }

    #[test]
    fn test_literal_fields_round_trip() {
        let doc = ResumeDocument::seed();
        let rtf = to_rtf(&doc);
        assert!(rtf.contains(&doc.personal_info.full_name));
        assert!(rtf.contains(&doc.personal_info.email));

        // Bullet lines survive byte-for-byte between the escaped bullet glyphs.
        assert!(rtf.contains("Led development of microservices architecture serving 1M+ users"));

        let text = read_back(&rtf);
        for exp in &doc.experience {
            assert!(text.contains(&exp.description), "missing: {}", exp.description);
        }
        assert!(text.contains(&doc.summary));
        assert!(text.contains("john.doe@email.com | (555) 123-4567 | San Francisco, CA"));
    }

    #[test]
    fn test_every_personal_field_round_trips() {
        let doc = ResumeDocument::seed();
        let info = &doc.personal_info;
        let text = read_back(&to_rtf(&doc));
        for field in [
            &info.full_name,
            &info.title,
            &info.email,
            &info.phone,
            &info.location,
            &info.linkedin,
            &info.website,
        ] {
            assert!(!field.is_empty());
            assert!(text.contains(field.as_str()), "missing: {field}");
        }
        assert!(text.contains("linkedin.com/in/johndoe | johndoe.dev"));
    }

    #[test]
    fn test_blank_contact_fields_leave_no_separators() {
        let mut doc = ResumeDocument::seed();
        doc.personal_info.phone.clear();
        doc.personal_info.location.clear();
        doc.personal_info.linkedin.clear();
        doc.personal_info.website.clear();
        let header = |doc: &ResumeDocument| {
            let rtf = to_rtf(doc);
            let end = rtf.find("Professional Summary").unwrap();
            rtf[..end].to_string()
        };

        let top = header(&doc);
        assert!(top.contains("\\par\njohn.doe@email.com\\par\n"));
        assert!(!top.contains('|'));

        doc.personal_info.email.clear();
        let top = header(&doc);
        assert!(!top.contains('|'));
        assert!(top.ends_with("Senior Software Engineer\\par\n\\par\n\\par\n"));
    }

    #[test]
    fn test_plain_ascii_description_is_verbatim() {
        let mut doc = ResumeDocument::seed();
        doc.experience[0].description = "Cut p99 latency by 40 percent".into();
        assert!(to_rtf(&doc).contains("Cut p99 latency by 40 percent"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape("a{b}c\\d"), "a\\{b\\}c\\\\d");
        assert_eq!(escape("one\ntwo"), "one\\line two");
        assert_eq!(escape("•"), "\\u8226?");
        assert_eq!(escape("é"), "\\u233?");
        // Astral plane characters become a surrogate pair of negative signed units.
        assert_eq!(escape("😀"), "\\u-10179?\\u-8704?");
    }

    #[test]
    fn test_special_characters_read_back() {
        let mut doc = ResumeDocument::seed();
        doc.summary = "C++ {templates} \\ naïve café 😀\nsecond line".into();
        assert!(read_back(&to_rtf(&doc)).contains(&doc.summary));
    }

    #[test]
    fn test_empty_sections_omitted() {
        let mut doc = ResumeDocument::seed();
        doc.summary = "   ".into();
        doc.experience.clear();
        doc.projects.clear();
        let rtf = to_rtf(&doc);
        assert!(!rtf.contains("Professional Summary"));
        assert!(!rtf.contains("Work Experience"));
        assert!(rtf.contains("Skills\\par"));
        assert!(!rtf.contains("Projects\\par"));
    }

    #[test]
    fn test_projects_and_certifications_written() {
        let mut doc = ResumeDocument::seed();
        doc.projects.push(ProjectEntry {
            technologies: vec!["Rust".into(), "Axum".into()],
            name: "Resume Builder".into(),
            ..ProjectEntry::empty(ItemId(7))
        });
        doc.certifications.push(CertificationEntry {
            name: "AWS Solutions Architect".into(),
            issuer: "Amazon".into(),
            ..CertificationEntry::empty(ItemId(8))
        });
        let text = read_back(&to_rtf(&doc));
        assert!(text.contains("Resume Builder"));
        assert!(text.contains("Technologies: Rust, Axum"));
        assert!(text.contains("AWS Solutions Architect\nAmazon"));
    }

    #[test]
    fn test_filename() {
        assert_eq!(word_filename("John  Q\tDoe"), "John_Q_Doe.rtf");
        assert_eq!(word_filename(" "), "Resume.rtf");
        let artifact = export_word(&ResumeDocument::seed());
        assert_eq!(artifact.filename, "John_Doe.rtf");
        assert_eq!(artifact.mime, "application/rtf");
    }
}
