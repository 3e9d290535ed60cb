//! Typed mutation entry point for the resume document.
//!
//! Every editor widget talks to the document through `DocumentModel::apply`. Mutations
//! are synchronous and total: bad input (blank skill, unknown section, missing id) is
//! skipped and reported back as a `MutationSkip`, never raised as an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::document::ids::mint_item_id;
use crate::models::resume::{
    CertificationEntry, EducationEntry, ExperienceEntry, ItemId, ProjectEntry, ResumeDocument,
};
use crate::models::template::TemplateId;

// ────────────────────────────────────────────────────────────────────────────
// Addressing
// ────────────────────────────────────────────────────────────────────────────

/// Repeated sections addressable by `addItem` / `updateItem` / `removeItem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Experience,
    Education,
    Projects,
    Certifications,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalField {
    FullName,
    Email,
    Phone,
    Location,
    Linkedin,
    Website,
    Title,
}

/// Dotted path to a scalar leaf, e.g. `personalInfo.email` or `summary`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldPath {
    PersonalInfo(PersonalField),
    Summary,
    Unknown(String),
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        FieldPath::parse(&raw)
    }
}

impl FieldPath {
    pub fn parse(raw: &str) -> Self {
        let field = match raw {
            "summary" => return FieldPath::Summary,
            "personalInfo.fullName" => PersonalField::FullName,
            "personalInfo.email" => PersonalField::Email,
            "personalInfo.phone" => PersonalField::Phone,
            "personalInfo.location" => PersonalField::Location,
            "personalInfo.linkedin" => PersonalField::Linkedin,
            "personalInfo.website" => PersonalField::Website,
            "personalInfo.title" => PersonalField::Title,
            other => return FieldPath::Unknown(other.to_string()),
        };
        FieldPath::PersonalInfo(field)
    }
}

/// Partial update for one entry. Only fields that exist on the target section are
/// applied; the rest are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub degree: Option<String>,
    pub school: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
    pub name: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub link: Option<String>,
    pub issuer: Option<String>,
    pub date: Option<String>,
}

/// The closed set of document mutations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    SetField { path: FieldPath, value: String },
    AddItem { section: Section },
    UpdateItem { section: Section, id: ItemId, patch: ItemPatch },
    RemoveItem { section: Section, id: ItemId },
    AddSkill { value: String },
    RemoveSkill { value: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Outcomes
// ────────────────────────────────────────────────────────────────────────────

/// Why a mutation left the document untouched. Informational only.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MutationSkip {
    #[error("No {section:?} entry with id {id}")]
    NotFound { section: Section, id: ItemId },

    #[error("Input skipped: {detail}")]
    ValidationSkipped { detail: String },

    #[error("Unknown section")]
    UnknownSection,

    #[error("Unknown field path '{path}'")]
    UnknownField { path: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MutationOutcome {
    Applied,
    Added { id: ItemId },
    Skipped { skip: MutationSkip },
}

impl MutationOutcome {
    fn skipped(skip: MutationSkip) -> Self {
        debug!(%skip, "Mutation skipped");
        MutationOutcome::Skipped { skip }
    }

    pub fn is_applied(&self) -> bool {
        !matches!(self, MutationOutcome::Skipped { .. })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document model
// ────────────────────────────────────────────────────────────────────────────

/// Single-writer owner of the resume document for one editing session.
///
/// `revision` increases on every applied mutation so readers (preview, AI suggestions)
/// can tell whether what they computed from is still current.
#[derive(Debug, Clone)]
pub struct DocumentModel {
    doc: ResumeDocument,
    revision: u64,
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new(ResumeDocument::seed())
    }
}

impl DocumentModel {
    pub fn new(doc: ResumeDocument) -> Self {
        Self { doc, revision: 0 }
    }

    pub fn read(&self) -> &ResumeDocument {
        &self.doc
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Swaps in a whole document, e.g. after a load from the persistence port.
    pub fn replace(&mut self, doc: ResumeDocument) {
        self.doc = doc;
        self.revision += 1;
    }

    pub fn set_template(&mut self, template_id: TemplateId) {
        if self.doc.template_id != template_id {
            self.doc.template_id = template_id;
            self.revision += 1;
        }
    }

    pub fn apply(&mut self, mutation: Mutation) -> MutationOutcome {
        let outcome = match mutation {
            Mutation::SetField { path, value } => self.set_field(path, value),
            Mutation::AddItem { section } => self.add_item(section),
            Mutation::UpdateItem { section, id, patch } => self.update_item(section, id, patch),
            Mutation::RemoveItem { section, id } => self.remove_item(section, id),
            Mutation::AddSkill { value } => self.add_skill(&value),
            Mutation::RemoveSkill { value } => self.remove_skill(&value),
        };
        if outcome.is_applied() {
            self.revision += 1;
        }
        outcome
    }

    fn set_field(&mut self, path: FieldPath, value: String) -> MutationOutcome {
        let info = &mut self.doc.personal_info;
        let slot = match path {
            FieldPath::Summary => &mut self.doc.summary,
            FieldPath::PersonalInfo(field) => match field {
                PersonalField::FullName => &mut info.full_name,
                PersonalField::Email => &mut info.email,
                PersonalField::Phone => &mut info.phone,
                PersonalField::Location => &mut info.location,
                PersonalField::Linkedin => &mut info.linkedin,
                PersonalField::Website => &mut info.website,
                PersonalField::Title => &mut info.title,
            },
            FieldPath::Unknown(path) => {
                return MutationOutcome::skipped(MutationSkip::UnknownField { path })
            }
        };
        *slot = value;
        MutationOutcome::Applied
    }

    fn add_item(&mut self, section: Section) -> MutationOutcome {
        let doc = &mut self.doc;
        let id = match section {
            Section::Experience => {
                let id = mint_item_id(|id| doc.experience.iter().any(|e| e.id == id));
                doc.experience.push(ExperienceEntry::empty(id));
                id
            }
            Section::Education => {
                let id = mint_item_id(|id| doc.education.iter().any(|e| e.id == id));
                doc.education.push(EducationEntry::empty(id));
                id
            }
            Section::Projects => {
                let id = mint_item_id(|id| doc.projects.iter().any(|e| e.id == id));
                doc.projects.push(ProjectEntry::empty(id));
                id
            }
            Section::Certifications => {
                let id = mint_item_id(|id| doc.certifications.iter().any(|e| e.id == id));
                doc.certifications.push(CertificationEntry::empty(id));
                id
            }
            Section::Unknown => return MutationOutcome::skipped(MutationSkip::UnknownSection),
        };
        MutationOutcome::Added { id }
    }

    fn update_item(&mut self, section: Section, id: ItemId, patch: ItemPatch) -> MutationOutcome {
        let doc = &mut self.doc;
        let found = match section {
            Section::Experience => doc
                .experience
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| patch_experience(e, patch)),
            Section::Education => doc
                .education
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| patch_education(e, patch)),
            Section::Projects => doc
                .projects
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| patch_project(e, patch)),
            Section::Certifications => doc
                .certifications
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| patch_certification(e, patch)),
            Section::Unknown => return MutationOutcome::skipped(MutationSkip::UnknownSection),
        };
        match found {
            Some(()) => MutationOutcome::Applied,
            None => MutationOutcome::skipped(MutationSkip::NotFound { section, id }),
        }
    }

    fn remove_item(&mut self, section: Section, id: ItemId) -> MutationOutcome {
        let doc = &mut self.doc;
        let removed = match section {
            Section::Experience => remove_by_id(&mut doc.experience, id, |e| e.id),
            Section::Education => remove_by_id(&mut doc.education, id, |e| e.id),
            Section::Projects => remove_by_id(&mut doc.projects, id, |e| e.id),
            Section::Certifications => remove_by_id(&mut doc.certifications, id, |e| e.id),
            Section::Unknown => return MutationOutcome::skipped(MutationSkip::UnknownSection),
        };
        if removed {
            MutationOutcome::Applied
        } else {
            MutationOutcome::skipped(MutationSkip::NotFound { section, id })
        }
    }

    fn add_skill(&mut self, value: &str) -> MutationOutcome {
        let skill = value.trim();
        if skill.is_empty() {
            return MutationOutcome::skipped(MutationSkip::ValidationSkipped {
                detail: "empty skill".to_string(),
            });
        }
        if self.doc.skills.iter().any(|s| s == skill) {
            return MutationOutcome::skipped(MutationSkip::ValidationSkipped {
                detail: format!("duplicate skill '{skill}'"),
            });
        }
        self.doc.skills.push(skill.to_string());
        MutationOutcome::Applied
    }

    fn remove_skill(&mut self, value: &str) -> MutationOutcome {
        let before = self.doc.skills.len();
        self.doc.skills.retain(|s| s != value);
        if self.doc.skills.len() == before {
            MutationOutcome::skipped(MutationSkip::ValidationSkipped {
                detail: format!("skill '{value}' not present"),
            })
        } else {
            MutationOutcome::Applied
        }
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, id: ItemId, key: impl Fn(&T) -> ItemId) -> bool {
    let before = items.len();
    items.retain(|item| key(item) != id);
    items.len() != before
}

fn patch_experience(entry: &mut ExperienceEntry, patch: ItemPatch) {
    set_if(&mut entry.title, patch.title);
    set_if(&mut entry.company, patch.company);
    set_if(&mut entry.location, patch.location);
    set_if(&mut entry.start_date, patch.start_date);
    set_if(&mut entry.end_date, patch.end_date);
    set_if(&mut entry.description, patch.description);
}

fn patch_education(entry: &mut EducationEntry, patch: ItemPatch) {
    set_if(&mut entry.degree, patch.degree);
    set_if(&mut entry.school, patch.school);
    set_if(&mut entry.location, patch.location);
    set_if(&mut entry.graduation_date, patch.graduation_date);
    set_if(&mut entry.gpa, patch.gpa);
}

fn patch_project(entry: &mut ProjectEntry, patch: ItemPatch) {
    set_if(&mut entry.name, patch.name);
    set_if(&mut entry.description, patch.description);
    set_if(&mut entry.link, patch.link);
    if let Some(technologies) = patch.technologies {
        entry.technologies = technologies;
    }
}

fn patch_certification(entry: &mut CertificationEntry, patch: ItemPatch) {
    set_if(&mut entry.name, patch.name);
    set_if(&mut entry.issuer, patch.issuer);
    set_if(&mut entry.date, patch.date);
}

fn set_if(slot: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *slot = v;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn model() -> DocumentModel {
        DocumentModel::new(ResumeDocument::seed())
    }

    fn two_experience_model() -> DocumentModel {
        let mut doc = ResumeDocument::seed();
        let mut second = ExperienceEntry::empty(ItemId(2));
        second.title = "Software Engineer".to_string();
        second.company = "StartupXYZ".to_string();
        doc.experience.push(second);
        DocumentModel::new(doc)
    }

    #[test]
    fn test_set_personal_field() {
        let mut m = model();
        let outcome = m.apply(Mutation::SetField {
            path: FieldPath::parse("personalInfo.email"),
            value: "jd@example.com".to_string(),
        });
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(m.read().personal_info.email, "jd@example.com");
    }

    #[test]
    fn test_set_summary_to_blank() {
        let mut m = model();
        m.apply(Mutation::SetField {
            path: FieldPath::Summary,
            value: String::new(),
        });
        assert_eq!(m.read().summary, "");
    }

    #[test]
    fn test_unknown_field_path_is_ignored() {
        let mut m = model();
        let before = m.read().clone();
        let outcome = m.apply(Mutation::SetField {
            path: FieldPath::parse("personalInfo.shoeSize"),
            value: "42".to_string(),
        });
        assert!(matches!(
            outcome,
            MutationOutcome::Skipped {
                skip: MutationSkip::UnknownField { .. }
            }
        ));
        assert_eq!(m.read(), &before);
        assert_eq!(m.revision(), 0);
    }

    #[test]
    fn test_add_experience_appends_blank_entry() {
        let mut m = two_experience_model();
        let existing = m.read().experience.clone();

        let outcome = m.apply(Mutation::AddItem {
            section: Section::Experience,
        });
        let MutationOutcome::Added { id } = outcome else {
            panic!("expected Added");
        };

        let experience = &m.read().experience;
        assert_eq!(experience.len(), 3);
        assert_eq!(&experience[..2], &existing[..]);
        assert_eq!(experience[2], ExperienceEntry::empty(id));
        assert!(existing.iter().all(|e| e.id != id));
    }

    #[test]
    fn test_added_ids_unique_in_every_section() {
        let mut m = model();
        for section in [
            Section::Experience,
            Section::Education,
            Section::Projects,
            Section::Certifications,
        ] {
            for _ in 0..5 {
                m.apply(Mutation::AddItem { section });
            }
        }
        let doc = m.read();
        let unique = |ids: Vec<ItemId>| ids.iter().collect::<HashSet<_>>().len() == ids.len();
        assert!(unique(doc.experience.iter().map(|e| e.id).collect()));
        assert!(unique(doc.education.iter().map(|e| e.id).collect()));
        assert!(unique(doc.projects.iter().map(|e| e.id).collect()));
        assert!(unique(doc.certifications.iter().map(|e| e.id).collect()));
    }

    #[test]
    fn test_update_item_merges_patch() {
        let mut m = model();
        let outcome = m.apply(Mutation::UpdateItem {
            section: Section::Experience,
            id: ItemId(1),
            patch: ItemPatch {
                company: Some("Acme".to_string()),
                degree: Some("ignored on experience".to_string()),
                ..Default::default()
            },
        });
        assert_eq!(outcome, MutationOutcome::Applied);
        let entry = &m.read().experience[0];
        assert_eq!(entry.company, "Acme");
        assert_eq!(entry.title, "Senior Software Engineer");
    }

    #[test]
    fn test_update_missing_id_reports_not_found() {
        let mut m = model();
        let before = m.read().clone();
        let outcome = m.apply(Mutation::UpdateItem {
            section: Section::Education,
            id: ItemId(999),
            patch: ItemPatch::default(),
        });
        assert_eq!(
            outcome,
            MutationOutcome::Skipped {
                skip: MutationSkip::NotFound {
                    section: Section::Education,
                    id: ItemId(999)
                }
            }
        );
        assert_eq!(m.read(), &before);
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let mut m = model();
        let first = m.apply(Mutation::RemoveItem {
            section: Section::Projects,
            id: ItemId(1),
        });
        assert_eq!(first, MutationOutcome::Applied);
        let after_first = m.read().clone();

        let second = m.apply(Mutation::RemoveItem {
            section: Section::Projects,
            id: ItemId(1),
        });
        assert!(!second.is_applied());
        assert_eq!(m.read(), &after_first);
    }

    #[test]
    fn test_removed_id_never_reissued() {
        let mut m = model();
        let MutationOutcome::Added { id } = m.apply(Mutation::AddItem {
            section: Section::Certifications,
        }) else {
            panic!("expected Added");
        };
        m.apply(Mutation::RemoveItem {
            section: Section::Certifications,
            id,
        });
        let MutationOutcome::Added { id: next } = m.apply(Mutation::AddItem {
            section: Section::Certifications,
        }) else {
            panic!("expected Added");
        };
        assert_ne!(id, next);
    }

    #[test]
    fn test_add_skill_trims_and_dedupes() {
        let mut m = model();
        assert!(m
            .apply(Mutation::AddSkill {
                value: "  Rust ".to_string()
            })
            .is_applied());
        let once = m.read().skills.clone();
        assert!(!m
            .apply(Mutation::AddSkill {
                value: "Rust".to_string()
            })
            .is_applied());
        assert_eq!(m.read().skills, once);
        assert_eq!(once.last().map(String::as_str), Some("Rust"));
    }

    #[test]
    fn test_add_skill_is_case_sensitive() {
        let mut m = model();
        assert!(m
            .apply(Mutation::AddSkill {
                value: "python".to_string()
            })
            .is_applied());
        assert_eq!(m.read().skills.len(), 9);
    }

    #[test]
    fn test_blank_skill_ignored() {
        let mut m = model();
        let outcome = m.apply(Mutation::AddSkill {
            value: "   ".to_string(),
        });
        assert!(matches!(
            outcome,
            MutationOutcome::Skipped {
                skip: MutationSkip::ValidationSkipped { .. }
            }
        ));
        assert_eq!(m.read().skills.len(), 8);
    }

    #[test]
    fn test_remove_skill_keeps_order() {
        let mut m = model();
        m.apply(Mutation::RemoveSkill {
            value: "Python".to_string(),
        });
        assert_eq!(
            m.read().skills,
            vec!["JavaScript", "React", "Node.js", "AWS", "Docker", "PostgreSQL", "Git"]
        );
    }

    #[test]
    fn test_unknown_section_from_json_is_ignored() {
        let mutation: Mutation =
            serde_json::from_str(r#"{"op": "addItem", "section": "hobbies"}"#).unwrap();
        let mut m = model();
        assert_eq!(
            m.apply(mutation),
            MutationOutcome::Skipped {
                skip: MutationSkip::UnknownSection
            }
        );
    }

    #[test]
    fn test_mutation_json_shape() {
        let mutation: Mutation = serde_json::from_str(
            r#"{"op": "updateItem", "section": "experience", "id": 1,
                "patch": {"startDate": "2021", "description": "• Shipped"}}"#,
        )
        .unwrap();
        let mut m = model();
        m.apply(mutation);
        assert_eq!(m.read().experience[0].start_date, "2021");
        assert_eq!(m.read().experience[0].description, "• Shipped");
    }

    #[test]
    fn test_revision_tracks_applied_mutations() {
        let mut m = model();
        m.apply(Mutation::AddSkill {
            value: "Go".to_string(),
        });
        m.apply(Mutation::AddSkill {
            value: "Go".to_string(),
        });
        assert_eq!(m.revision(), 1);
        m.set_template(TemplateId::Academic);
        assert_eq!(m.revision(), 2);
        assert_eq!(m.read().template_id, TemplateId::Academic);
    }
}
