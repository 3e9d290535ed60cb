//! Match Scoring: deterministic keyword overlap between a job description and resume text.
//!
//! Algorithm:
//! 1. Extract keywords from the job description: lowercase tokens, stop words and numbers
//!    dropped, weighted by frequency, top `MAX_KEYWORDS` kept.
//! 2. For each keyword:
//!    - whole-token match in the resume → strength 1.0
//!    - substring match in the resume → strength 0.6
//!    - no match → strength 0.0
//! 3. score = Σ(strength × frequency) / Σ(frequency) × 100
//! 4. Classify: matched (≥0.8), partial (0.4–0.79), missing (<0.4)

use std::collections::{HashMap, HashSet};

use serde::Serialize;

const MAX_KEYWORDS: usize = 25;

const STOP_WORDS: &[&str] = &[
    "a", "about", "across", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "company", "do", "for", "from", "have", "help", "in",
    "including", "into", "is", "it", "its", "join", "looking", "may", "more", "must", "new",
    "of", "on", "or", "our", "plus", "role", "should", "that", "the", "their", "this", "to",
    "us", "we", "well", "what", "who", "will", "with", "within", "work", "working", "you",
    "your", "years", "year", "experience", "ability", "strong", "skills", "team", "teams",
    "required", "preferred", "responsibilities", "requirements", "candidate", "ideal",
    "etc", "such", "using", "use", "other", "both", "able",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub strength: f32,
}

/// Local half of an ATS analysis.
#[derive(Debug, Clone, Serialize)]
pub struct MatchScore {
    /// 0 – 100
    pub score: u32,
    pub matched: Vec<KeywordMatch>,
    pub partial: Vec<KeywordMatch>,
    pub missing: Vec<String>,
    pub recommendation: String,
}

impl MatchScore {
    /// Keywords the resume already covers, strongest first.
    pub fn strengths(&self) -> Vec<String> {
        self.matched
            .iter()
            .chain(self.partial.iter())
            .map(|m| m.keyword.clone())
            .collect()
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '(' | ')' | '"' | '!' | '?'))
        .map(|raw| {
            raw.trim_matches(|c: char| matches!(c, '.' | '-' | '/' | '\'' | '*' | '•'))
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
}

fn is_keyword(token: &str) -> bool {
    token.chars().count() >= 2
        && token.chars().any(|c| c.is_alphabetic())
        && !STOP_WORDS.contains(&token)
}

/// Keyword inventory of a job description, most frequent first, ties in order of appearance.
pub fn extract_keywords(job_description: &str) -> Vec<KeywordEntry> {
    let mut counts: HashMap<String, (u32, usize)> = HashMap::new();
    for (position, token) in tokens(job_description).filter(|t| is_keyword(t)).enumerate() {
        counts.entry(token).or_insert((0, position)).0 += 1;
    }

    let mut entries: Vec<(String, u32, usize)> = counts
        .into_iter()
        .map(|(keyword, (frequency, first))| (keyword, frequency, first))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    entries
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(keyword, frequency, _)| KeywordEntry { keyword, frequency })
        .collect()
}

pub fn score_match(job_description: &str, resume_text: &str) -> MatchScore {
    let keywords = extract_keywords(job_description);

    if keywords.is_empty() {
        return MatchScore {
            score: 0,
            matched: vec![],
            partial: vec![],
            missing: vec![],
            recommendation: "No keywords found in the job description, cannot score the match."
                .to_string(),
        };
    }

    let resume_lower = resume_text.to_lowercase();
    let resume_tokens: HashSet<String> = tokens(resume_text).collect();

    let mut matched = Vec::new();
    let mut partial = Vec::new();
    let mut missing = Vec::new();
    let mut total_weight = 0.0_f32;
    let mut total_score = 0.0_f32;

    for entry in &keywords {
        let strength = if resume_tokens.contains(&entry.keyword) {
            1.0
        } else if resume_lower.contains(&entry.keyword) {
            0.6
        } else {
            0.0
        };
        total_weight += entry.frequency as f32;
        total_score += strength * entry.frequency as f32;

        let keyword_match = KeywordMatch {
            keyword: entry.keyword.clone(),
            strength,
        };
        if strength >= 0.8 {
            matched.push(keyword_match);
        } else if strength >= 0.4 {
            partial.push(keyword_match);
        } else {
            missing.push(entry.keyword.clone());
        }
    }

    let score = ((total_score / total_weight) * 100.0).round().clamp(0.0, 100.0) as u32;
    let recommendation = build_recommendation(score, &missing);

    MatchScore {
        score,
        matched,
        partial,
        missing,
        recommendation,
    }
}

fn build_recommendation(score: u32, missing: &[String]) -> String {
    let top: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();

    if score >= 80 {
        "Strong match. Your resume covers the key requirements of this posting.".to_string()
    } else if score >= 60 {
        format!(
            "Moderate match ({score}/100). Consider working in: {}.",
            top.join(", ")
        )
    } else {
        format!(
            "Low match ({score}/100). Significant gaps: {}. Tailor your experience and skills to the posting.",
            top.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "We are looking for a Senior Engineer with React, Node.js and AWS. \
        You will build React components, design AWS infrastructure and run CI/CD pipelines. \
        Kubernetes is a plus.";

    #[test]
    fn test_extract_keywords_frequency_order() {
        let keywords = extract_keywords(JD);
        assert_eq!(keywords[0].keyword, "react");
        assert_eq!(keywords[0].frequency, 2);
        assert_eq!(keywords[1].keyword, "aws");
        assert!(keywords.iter().any(|k| k.keyword == "node.js"));
        assert!(keywords.iter().any(|k| k.keyword == "ci/cd"));
        assert!(!keywords.iter().any(|k| k.keyword == "the" || k.keyword == "with"));
    }

    #[test]
    fn test_numbers_and_single_chars_dropped() {
        let keywords = extract_keywords("5 years, 3+ x C");
        assert!(keywords.is_empty(), "{keywords:?}");
    }

    #[test]
    fn test_full_coverage_scores_100() {
        let report = score_match("React AWS Docker", "Built apps in React on AWS using Docker.");
        assert_eq!(report.score, 100);
        assert_eq!(report.matched.len(), 3);
        assert!(report.missing.is_empty());
        assert!(report.recommendation.starts_with("Strong match"));
    }

    #[test]
    fn test_missing_keywords_reported() {
        let report = score_match(JD, "Senior engineer. React, Node.js, AWS.");
        assert!(report.missing.contains(&"kubernetes".to_string()));
        assert!(report.missing.contains(&"ci/cd".to_string()));
        assert!(report.score > 0 && report.score < 100);
        assert!(report.strengths().contains(&"react".to_string()));
    }

    #[test]
    fn test_substring_match_is_partial() {
        let report = score_match("postgres", "Tuned PostgreSQL clusters");
        assert_eq!(report.partial.len(), 1);
        assert_eq!(report.score, 60);
    }

    #[test]
    fn test_empty_description_scores_zero() {
        let report = score_match("the and of", "anything");
        assert_eq!(report.score, 0);
        assert!(report.matched.is_empty());
    }

    #[test]
    fn test_score_bounded() {
        let report = score_match(JD, JD);
        assert!(report.score <= 100);
        assert_eq!(report.score, 100);
    }
}
