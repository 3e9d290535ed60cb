//! Greedy word wrap over the static metric tables.
//!
//! Explicit line breaks in the source text are hard breaks: each source line is wrapped on
//! its own and blank source lines survive as blank output lines, so bullet lists keep
//! their shape.

use crate::layout::font_metrics::FontMetricTable;

/// One laid-out line and its advance width in em.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub width_em: f32,
}

/// Wraps `text` to `max_width_em`. A single word wider than the line is left overlong
/// rather than broken mid-word.
pub fn wrap_text(text: &str, metrics: &FontMetricTable, max_width_em: f32) -> Vec<WrappedLine> {
    let mut out = Vec::new();
    for source_line in text.split('\n') {
        wrap_source_line(source_line.trim_end_matches('\r'), metrics, max_width_em, &mut out);
    }
    out
}

fn wrap_source_line(
    line: &str,
    metrics: &FontMetricTable,
    max_width_em: f32,
    out: &mut Vec<WrappedLine>,
) {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        out.push(WrappedLine {
            text: String::new(),
            width_em: 0.0,
        });
        return;
    }

    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in words {
        let word_w = metrics.measure_str(word);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + metrics.space_width + word_w > max_width_em {
            out.push(WrappedLine {
                text: std::mem::take(&mut current),
                width_em: current_width,
            });
            current.push_str(word);
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += metrics.space_width + word_w;
        }
    }
    out.push(WrappedLine {
        text: current,
        width_em: current_width,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{get_metrics, FontFamily};

    #[test]
    fn test_short_text_single_line() {
        let lines = wrap_text("Tech Corp", get_metrics(FontFamily::Inter), 40.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Tech Corp");
    }

    #[test]
    fn test_long_text_wraps_without_losing_words() {
        let text = "word ".repeat(40);
        let lines = wrap_text(text.trim(), get_metrics(FontFamily::Inter), 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.width_em <= 10.0));
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.text.split(' ')).collect();
        assert_eq!(rejoined.len(), 40);
    }

    #[test]
    fn test_hard_breaks_preserved() {
        let text = "• first\n• second\n\n• third";
        let lines = wrap_text(text, get_metrics(FontFamily::Inter), 40.0);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["• first", "• second", "", "• third"]);
    }

    #[test]
    fn test_overlong_word_kept_whole() {
        let lines = wrap_text("Supercalifragilistic", get_metrics(FontFamily::Inter), 2.0);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].width_em > 2.0);
    }
}
