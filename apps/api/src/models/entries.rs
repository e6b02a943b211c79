use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overwrites `slot` when the patch carries a value for it.
fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: Uuid,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub gpa: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub id: Uuid,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageLevel {
    Beginner,
    Intermediate,
    Advanced,
    Native,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LanguageLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    pub id: Uuid,
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSection {
    pub id: Uuid,
    pub title: String,
    pub items: Vec<String>,
}

impl Experience {
    /// A current position has no end date; any stale value is dropped.
    pub fn normalize(&mut self) {
        if self.current {
            self.end_date.clear();
        }
    }

    pub fn apply(&mut self, patch: ExperiencePatch) {
        merge(&mut self.company, patch.company);
        merge(&mut self.position, patch.position);
        merge(&mut self.start_date, patch.start_date);
        merge(&mut self.end_date, patch.end_date);
        merge(&mut self.current, patch.current);
        merge(&mut self.description, patch.description);
        merge(&mut self.location, patch.location);
        self.normalize();
    }
}

impl Education {
    pub fn normalize(&mut self) {
        if self.current {
            self.end_date.clear();
        }
    }

    pub fn apply(&mut self, patch: EducationPatch) {
        merge(&mut self.institution, patch.institution);
        merge(&mut self.degree, patch.degree);
        merge(&mut self.field, patch.field);
        merge(&mut self.start_date, patch.start_date);
        merge(&mut self.end_date, patch.end_date);
        merge(&mut self.current, patch.current);
        merge(&mut self.gpa, patch.gpa);
        merge(&mut self.description, patch.description);
        self.normalize();
    }
}

impl Project {
    pub fn apply(&mut self, patch: ProjectPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.description, patch.description);
        merge(&mut self.technologies, patch.technologies);
        merge(&mut self.url, patch.url);
        merge(&mut self.start_date, patch.start_date);
        merge(&mut self.end_date, patch.end_date);
    }
}

impl Certification {
    pub fn apply(&mut self, patch: CertificationPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.issuer, patch.issuer);
        merge(&mut self.date, patch.date);
        merge(&mut self.url, patch.url);
    }
}

impl Language {
    pub fn apply(&mut self, patch: LanguagePatch) {
        merge(&mut self.name, patch.name);
        if patch.level.is_some() {
            self.level = patch.level;
        }
    }
}

impl SocialLink {
    pub fn apply(&mut self, patch: SocialLinkPatch) {
        merge(&mut self.platform, patch.platform);
        merge(&mut self.url, patch.url);
    }
}

impl CustomSection {
    pub fn apply(&mut self, patch: CustomSectionPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.items, patch.items);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Partial updates. `None` leaves the stored field untouched
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationPatch {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub gpa: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationPatch {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguagePatch {
    pub name: Option<String>,
    pub level: Option<LanguageLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinkPatch {
    pub platform: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSectionPatch {
    pub title: Option<String>,
    pub items: Option<Vec<String>>,
}
