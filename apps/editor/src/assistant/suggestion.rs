//! AI suggestions and the staleness check applied when one is accepted.
//!
//! A suggestion remembers which field it was computed for and the text it was computed
//! from. It is only written back if that field still exists and still holds that text;
//! anything else means the user moved on and the suggestion is dropped.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::document::mutation::ItemPatch;
use crate::document::{DocumentModel, Mutation, Section};
use crate::models::resume::{ItemId, ResumeDocument};

/// Field an improvement is aimed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuggestionTarget {
    Summary,
    /// Description of an experience or project entry.
    Description { section: Section, id: ItemId },
}

impl SuggestionTarget {
    /// Section label passed to the improve prompt.
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionTarget::Summary => "professional summary",
            SuggestionTarget::Description {
                section: Section::Experience,
                ..
            } => "work experience",
            SuggestionTarget::Description {
                section: Section::Projects,
                ..
            } => "project",
            SuggestionTarget::Description { .. } => "resume",
        }
    }

    /// Current text at the target, or `None` if the target no longer exists.
    pub fn current_text<'a>(&self, doc: &'a ResumeDocument) -> Option<&'a str> {
        match self {
            SuggestionTarget::Summary => Some(doc.summary.as_str()),
            SuggestionTarget::Description {
                section: Section::Experience,
                id,
            } => doc
                .experience
                .iter()
                .find(|e| e.id == *id)
                .map(|e| e.description.as_str()),
            SuggestionTarget::Description {
                section: Section::Projects,
                id,
            } => doc
                .projects
                .iter()
                .find(|p| p.id == *id)
                .map(|p| p.description.as_str()),
            SuggestionTarget::Description { .. } => None,
        }
    }

    fn write(&self, text: String) -> Mutation {
        match self {
            SuggestionTarget::Summary => Mutation::SetField {
                path: crate::document::mutation::FieldPath::Summary,
                value: text,
            },
            SuggestionTarget::Description { section, id } => Mutation::UpdateItem {
                section: *section,
                id: *id,
                patch: ItemPatch {
                    description: Some(text),
                    ..ItemPatch::default()
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub id: Uuid,
    pub target: SuggestionTarget,
    pub source_text: String,
    /// Full assistant reply, shown to the user.
    pub reply: String,
    /// Text that replaces the target on accept.
    pub replacement: String,
}

impl Suggestion {
    pub fn new(target: SuggestionTarget, source_text: String, reply: String) -> Self {
        let replacement = replacement_text(&reply);
        Self {
            id: Uuid::new_v4(),
            target,
            source_text,
            reply,
            replacement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AcceptOutcome {
    Applied { revision: u64 },
    Stale { reason: StaleReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    TargetRemoved,
    TextChanged,
}

/// Applies `suggestion` against the then-current document, or discards it as stale.
pub fn accept(model: &mut DocumentModel, suggestion: &Suggestion) -> AcceptOutcome {
    let stale = match suggestion.target.current_text(model.read()) {
        None => Some(StaleReason::TargetRemoved),
        Some(current) if current != suggestion.source_text => Some(StaleReason::TextChanged),
        Some(_) => None,
    };
    if let Some(reason) = stale {
        debug!(suggestion = %suggestion.id, ?reason, "Discarding stale suggestion");
        return AcceptOutcome::Stale { reason };
    }

    let outcome = model.apply(suggestion.target.write(suggestion.replacement.clone()));
    if outcome.is_applied() {
        AcceptOutcome::Applied {
            revision: model.revision(),
        }
    } else {
        AcceptOutcome::Stale {
            reason: StaleReason::TargetRemoved,
        }
    }
}

/// The `• ` bullet lines of a reply, or the whole trimmed reply when it has none.
pub fn replacement_text(reply: &str) -> String {
    let bullets: Vec<&str> = reply
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("• "))
        .collect();
    if bullets.is_empty() {
        reply.trim().to_string()
    } else {
        bullets.join("\n")
    }
}
