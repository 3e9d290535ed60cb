use serde::{Deserialize, Serialize};

use crate::models::template::TemplateId;

/// Stable key of an entry inside a repeated section.
///
/// Minted from a monotonic clock value when the entry is created and never reused,
/// even after the entry is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document sections
// ────────────────────────────────────────────────────────────────────────────

/// Contact block shown at the top of the resume. No format validation is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    /// Free text; bullet lists are newline-separated `• ` lines.
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: ItemId,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub graduation_date: String,
    #[serde(default)]
    pub gpa: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationEntry {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date: String,
}

impl ExperienceEntry {
    pub fn empty(id: ItemId) -> Self {
        Self {
            id,
            title: String::new(),
            company: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            description: String::new(),
        }
    }
}

impl EducationEntry {
    pub fn empty(id: ItemId) -> Self {
        Self {
            id,
            degree: String::new(),
            school: String::new(),
            location: String::new(),
            graduation_date: String::new(),
            gpa: String::new(),
        }
    }
}

impl ProjectEntry {
    pub fn empty(id: ItemId) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            technologies: Vec::new(),
            link: String::new(),
        }
    }
}

impl CertificationEntry {
    pub fn empty(id: ItemId) -> Self {
        Self {
            id,
            name: String::new(),
            issuer: String::new(),
            date: String::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Root record
// ────────────────────────────────────────────────────────────────────────────

/// The canonical resume record edited during a session.
///
/// Serialises to the plain nested-record form (`personalInfo`, `startDate`, ...) used by
/// the persistence port and the HTTP API. Every section is always present; missing
/// sections in an incoming record deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub template_id: TemplateId,
}

impl ResumeDocument {
    /// The example resume every editing session starts from.
    pub fn seed() -> Self {
        Self {
            personal_info: PersonalInfo {
                full_name: "John Doe".to_string(),
                email: "john.doe@email.com".to_string(),
                phone: "(555) 123-4567".to_string(),
                location: "San Francisco, CA".to_string(),
                linkedin: "linkedin.com/in/johndoe".to_string(),
                website: "johndoe.dev".to_string(),
                title: "Senior Software Engineer".to_string(),
            },
            summary: "Experienced software engineer with 5+ years of expertise in full-stack \
                development, specializing in React, Node.js, and cloud technologies. Proven \
                track record of delivering scalable solutions and leading cross-functional teams."
                .to_string(),
            experience: vec![ExperienceEntry {
                id: ItemId(1),
                title: "Senior Software Engineer".to_string(),
                company: "Tech Corp".to_string(),
                location: "San Francisco, CA".to_string(),
                start_date: "2022".to_string(),
                end_date: "Present".to_string(),
                description: "• Led development of microservices architecture serving 1M+ users\n\
                    • Improved application performance by 40% through optimization\n\
                    • Mentored 3 junior developers and conducted code reviews"
                    .to_string(),
            }],
            education: vec![EducationEntry {
                id: ItemId(1),
                degree: "Bachelor of Science in Computer Science".to_string(),
                school: "University of California, Berkeley".to_string(),
                location: "Berkeley, CA".to_string(),
                graduation_date: "2020".to_string(),
                gpa: "3.8".to_string(),
            }],
            skills: [
                "JavaScript",
                "React",
                "Node.js",
                "Python",
                "AWS",
                "Docker",
                "PostgreSQL",
                "Git",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            projects: vec![ProjectEntry {
                id: ItemId(1),
                name: "E-commerce Platform".to_string(),
                description: "Built a full-stack e-commerce platform using React, Node.js, and MongoDB"
                    .to_string(),
                technologies: vec![
                    "React".to_string(),
                    "Node.js".to_string(),
                    "MongoDB".to_string(),
                ],
                link: "https://github.com/johndoe/ecommerce".to_string(),
            }],
            certifications: vec![CertificationEntry {
                id: ItemId(1),
                name: "AWS Certified Solutions Architect".to_string(),
                issuer: "Amazon Web Services".to_string(),
                date: "2023".to_string(),
            }],
            template_id: TemplateId::default(),
        }
    }
}
