use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::entries::{
    Certification, CertificationPatch, CustomSection, CustomSectionPatch, Education,
    EducationPatch, Experience, ExperiencePatch, Language, LanguagePatch, Project, ProjectPatch,
    SocialLink, SocialLinkPatch,
};
use crate::templates;

pub const DEFAULT_TITLE: &str = "Untitled Resume";
pub const DEFAULT_PALETTE: &str = "blue";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    pub title: String,
    pub template_id: String,
    pub palette: String,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            template_id: templates::DEFAULT_TEMPLATE_ID.to_string(),
            palette: DEFAULT_PALETTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub photo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaPatch {
    pub title: Option<String>,
    pub template_id: Option<String>,
    pub palette: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub photo: Option<String>,
}

impl Meta {
    pub fn apply(&mut self, patch: MetaPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(template_id) = patch.template_id {
            self.template_id = template_id;
        }
        if let Some(palette) = patch.palette {
            self.palette = palette;
        }
        self.normalize();
    }

    /// Rewrites an unknown template id to the default template.
    pub fn normalize(&mut self) {
        let resolved = templates::resolve(&self.template_id);
        if resolved.id != self.template_id {
            self.template_id = resolved.id.to_string();
        }
    }
}

impl PersonalInfo {
    pub fn apply(&mut self, patch: PersonalPatch) {
        let PersonalPatch {
            first_name,
            last_name,
            title,
            email,
            phone,
            location,
            website,
            photo,
        } = patch;
        for (slot, value) in [
            (&mut self.first_name, first_name),
            (&mut self.last_name, last_name),
            (&mut self.title, title),
            (&mut self.email, email),
            (&mut self.phone, phone),
            (&mut self.location, location),
            (&mut self.website, website),
            (&mut self.photo, photo),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Named top-level collections of a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Experience,
    Education,
    Projects,
    Certifications,
    Languages,
    SocialLinks,
    CustomSections,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Experience,
        Section::Education,
        Section::Projects,
        Section::Certifications,
        Section::Languages,
        Section::SocialLinks,
        Section::CustomSections,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Projects => "projects",
            Section::Certifications => "certifications",
            Section::Languages => "languages",
            Section::SocialLinks => "socialLinks",
            Section::CustomSections => "customSections",
        }
    }
}

/// An entry about to be appended; the variant names its section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "camelCase")]
pub enum NewEntry {
    Experience(Experience),
    Education(Education),
    Projects(Project),
    Certifications(Certification),
    Languages(Language),
    SocialLinks(SocialLink),
    CustomSections(CustomSection),
}

impl NewEntry {
    pub fn section(&self) -> Section {
        match self {
            NewEntry::Experience(_) => Section::Experience,
            NewEntry::Education(_) => Section::Education,
            NewEntry::Projects(_) => Section::Projects,
            NewEntry::Certifications(_) => Section::Certifications,
            NewEntry::Languages(_) => Section::Languages,
            NewEntry::SocialLinks(_) => Section::SocialLinks,
            NewEntry::CustomSections(_) => Section::CustomSections,
        }
    }
}

impl From<Experience> for NewEntry {
    fn from(entry: Experience) -> Self {
        NewEntry::Experience(entry)
    }
}

impl From<Education> for NewEntry {
    fn from(entry: Education) -> Self {
        NewEntry::Education(entry)
    }
}

impl From<Project> for NewEntry {
    fn from(entry: Project) -> Self {
        NewEntry::Projects(entry)
    }
}

impl From<Certification> for NewEntry {
    fn from(entry: Certification) -> Self {
        NewEntry::Certifications(entry)
    }
}

impl From<Language> for NewEntry {
    fn from(entry: Language) -> Self {
        NewEntry::Languages(entry)
    }
}

impl From<SocialLink> for NewEntry {
    fn from(entry: SocialLink) -> Self {
        NewEntry::SocialLinks(entry)
    }
}

impl From<CustomSection> for NewEntry {
    fn from(entry: CustomSection) -> Self {
        NewEntry::CustomSections(entry)
    }
}

/// A shallow patch for one entry; the variant names its section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "camelCase")]
pub enum EntryPatch {
    Experience(ExperiencePatch),
    Education(EducationPatch),
    Projects(ProjectPatch),
    Certifications(CertificationPatch),
    Languages(LanguagePatch),
    SocialLinks(SocialLinkPatch),
    CustomSections(CustomSectionPatch),
}

impl EntryPatch {
    pub fn section(&self) -> Section {
        match self {
            EntryPatch::Experience(_) => Section::Experience,
            EntryPatch::Education(_) => Section::Education,
            EntryPatch::Projects(_) => Section::Projects,
            EntryPatch::Certifications(_) => Section::Certifications,
            EntryPatch::Languages(_) => Section::Languages,
            EntryPatch::SocialLinks(_) => Section::SocialLinks,
            EntryPatch::CustomSections(_) => Section::CustomSections,
        }
    }
}

/// Wholesale replacement of one top-level field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Meta(Meta),
    Personal(PersonalInfo),
    Summary(Option<String>),
    Skills(Vec<String>),
}

/// One resume. Serialized in the camelCase wire shape shared by the
/// client and the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub meta: Meta,
    pub personal: PersonalInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<Language>,
    pub social_links: Vec<SocialLink>,
    pub custom_sections: Vec<CustomSection>,
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> bool {
    if index < items.len() {
        items.remove(index);
        true
    } else {
        false
    }
}

impl ResumeDocument {
    /// Enforces the document invariants: a known template id, no end date
    /// on current positions, and an identity on every entry.
    pub fn normalize(&mut self) {
        self.meta.normalize();
        self.experience.iter_mut().for_each(Experience::normalize);
        self.education.iter_mut().for_each(Education::normalize);
        self.assign_missing_ids();
    }

    fn assign_missing_ids(&mut self) {
        let ids = self
            .experience
            .iter_mut()
            .map(|e| &mut e.id)
            .chain(self.education.iter_mut().map(|e| &mut e.id))
            .chain(self.projects.iter_mut().map(|e| &mut e.id))
            .chain(self.certifications.iter_mut().map(|e| &mut e.id))
            .chain(self.languages.iter_mut().map(|e| &mut e.id))
            .chain(self.social_links.iter_mut().map(|e| &mut e.id))
            .chain(self.custom_sections.iter_mut().map(|e| &mut e.id));
        for id in ids.filter(|id| id.is_nil()) {
            *id = Uuid::new_v4();
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn entry_count(&self, section: Section) -> usize {
        match section {
            Section::Experience => self.experience.len(),
            Section::Education => self.education.len(),
            Section::Projects => self.projects.len(),
            Section::Certifications => self.certifications.len(),
            Section::Languages => self.languages.len(),
            Section::SocialLinks => self.social_links.len(),
            Section::CustomSections => self.custom_sections.len(),
        }
    }

    pub fn replace_field(&mut self, value: FieldValue) {
        match value {
            FieldValue::Meta(mut meta) => {
                meta.normalize();
                self.meta = meta;
            }
            FieldValue::Personal(personal) => self.personal = personal,
            FieldValue::Summary(summary) => self.summary = summary,
            FieldValue::Skills(skills) => {
                self.skills.clear();
                for skill in skills {
                    self.add_skill(&skill);
                }
            }
        }
    }

    /// Appends `entry` under the given identity, overriding any id it carried.
    pub fn push_entry(&mut self, entry: NewEntry, id: Uuid) {
        match entry {
            NewEntry::Experience(mut e) => {
                e.id = id;
                e.normalize();
                self.experience.push(e);
            }
            NewEntry::Education(mut e) => {
                e.id = id;
                e.normalize();
                self.education.push(e);
            }
            NewEntry::Projects(mut e) => {
                e.id = id;
                self.projects.push(e);
            }
            NewEntry::Certifications(mut e) => {
                e.id = id;
                self.certifications.push(e);
            }
            NewEntry::Languages(mut e) => {
                e.id = id;
                self.languages.push(e);
            }
            NewEntry::SocialLinks(mut e) => {
                e.id = id;
                self.social_links.push(e);
            }
            NewEntry::CustomSections(mut e) => {
                e.id = id;
                self.custom_sections.push(e);
            }
        }
    }

    /// Merges `patch` into the entry at `index`. Returns false, leaving the
    /// document untouched, when the index is out of bounds.
    pub fn patch_entry(&mut self, index: usize, patch: EntryPatch) -> bool {
        match patch {
            EntryPatch::Experience(p) => self.experience.get_mut(index).map(|e| e.apply(p)),
            EntryPatch::Education(p) => self.education.get_mut(index).map(|e| e.apply(p)),
            EntryPatch::Projects(p) => self.projects.get_mut(index).map(|e| e.apply(p)),
            EntryPatch::Certifications(p) => self.certifications.get_mut(index).map(|e| e.apply(p)),
            EntryPatch::Languages(p) => self.languages.get_mut(index).map(|e| e.apply(p)),
            EntryPatch::SocialLinks(p) => self.social_links.get_mut(index).map(|e| e.apply(p)),
            EntryPatch::CustomSections(p) => {
                self.custom_sections.get_mut(index).map(|e| e.apply(p))
            }
        }
        .is_some()
    }

    pub fn remove_entry(&mut self, section: Section, index: usize) -> bool {
        match section {
            Section::Experience => remove_at(&mut self.experience, index),
            Section::Education => remove_at(&mut self.education, index),
            Section::Projects => remove_at(&mut self.projects, index),
            Section::Certifications => remove_at(&mut self.certifications, index),
            Section::Languages => remove_at(&mut self.languages, index),
            Section::SocialLinks => remove_at(&mut self.social_links, index),
            Section::CustomSections => remove_at(&mut self.custom_sections, index),
        }
    }

    /// Appends a trimmed skill unless it is blank or already present.
    pub fn add_skill(&mut self, value: &str) -> bool {
        let skill = value.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, index: usize) -> bool {
        remove_at(&mut self.skills, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(company: &str) -> Experience {
        Experience {
            company: company.to_string(),
            position: "Engineer".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_document_defaults() {
        let doc = ResumeDocument::default();
        assert_eq!(doc.meta.title, "Untitled Resume");
        assert_eq!(doc.meta.template_id, "modern");
        assert_eq!(doc.meta.palette, "blue");
        assert!(doc.experience.is_empty() && doc.skills.is_empty());
        assert_eq!(doc.summary, None);
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let mut doc = ResumeDocument::default();
        doc.personal.first_name = "Ada".to_string();
        doc.push_entry(
            SocialLink {
                platform: "GitHub".to_string(),
                url: "https://github.com/ada".to_string(),
                ..Default::default()
            }
            .into(),
            Uuid::new_v4(),
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["meta"]["templateId"], "modern");
        assert_eq!(value["personal"]["firstName"], "Ada");
        assert_eq!(value["socialLinks"][0]["platform"], "GitHub");
        assert!(value.get("customSections").is_some());
        assert!(value.get("summary").is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults_and_ignores_user_id() {
        let doc: ResumeDocument = serde_json::from_value(json!({
            "userId": "someone-else",
            "meta": { "title": "Backend CV" },
            "skills": ["Rust"]
        }))
        .unwrap();
        assert_eq!(doc.meta.title, "Backend CV");
        assert_eq!(doc.meta.template_id, "modern");
        assert_eq!(doc.skills, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_normalize_unknown_template_falls_back() {
        let mut doc = ResumeDocument::default();
        doc.meta.template_id = "creative".to_string();
        doc.experience.push(Experience {
            current: true,
            end_date: "2024-01".to_string(),
            ..job("Acme")
        });
        doc.normalize();
        assert_eq!(doc.meta.template_id, "modern");
        assert!(doc.experience[0].end_date.is_empty());
    }

    #[test]
    fn test_normalize_gives_entries_without_ids_their_own() {
        let mut doc: ResumeDocument = serde_json::from_value(json!({
            "experience": [{ "company": "A" }, { "company": "B" }],
            "languages": [{ "name": "Welsh" }]
        }))
        .unwrap();
        let kept = Uuid::new_v4();
        doc.projects.push(Project {
            id: kept,
            ..Default::default()
        });
        doc.normalize();

        let (a, b) = (doc.experience[0].id, doc.experience[1].id);
        assert!(!a.is_nil() && !b.is_nil());
        assert_ne!(a, b);
        assert!(!doc.languages[0].id.is_nil());
        assert_eq!(doc.projects[0].id, kept);

        // Already-assigned ids are stable across repeated normalization.
        doc.normalize();
        assert_eq!(doc.experience[0].id, a);
    }

    #[test]
    fn test_meta_patch_keeps_known_template() {
        let mut meta = Meta::default();
        meta.apply(MetaPatch {
            template_id: Some("classic".to_string()),
            ..Default::default()
        });
        assert_eq!(meta.template_id, "classic");
        meta.apply(MetaPatch {
            template_id: Some("neon".to_string()),
            ..Default::default()
        });
        assert_eq!(meta.template_id, "modern");
    }

    #[test]
    fn test_push_entry_overrides_carried_id() {
        let mut doc = ResumeDocument::default();
        let id = Uuid::new_v4();
        let carried = Experience {
            id: Uuid::new_v4(),
            ..job("Acme")
        };
        doc.push_entry(carried.into(), id);
        assert_eq!(doc.experience[0].id, id);
    }

    #[test]
    fn test_patch_entry_out_of_bounds_is_noop() {
        let mut doc = ResumeDocument::default();
        doc.push_entry(job("Acme").into(), Uuid::new_v4());
        let before = doc.clone();
        let applied = doc.patch_entry(
            3,
            EntryPatch::Experience(ExperiencePatch {
                company: Some("Globex".to_string()),
                ..Default::default()
            }),
        );
        assert!(!applied);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_remove_entry_shifts_following() {
        let mut doc = ResumeDocument::default();
        for name in ["A", "B", "C"] {
            doc.push_entry(job(name).into(), Uuid::new_v4());
        }
        assert!(doc.remove_entry(Section::Experience, 1));
        let names: Vec<_> = doc.experience.iter().map(|e| e.company.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(!doc.remove_entry(Section::Experience, 2));
        assert_eq!(doc.entry_count(Section::Experience), 2);
    }

    #[test]
    fn test_replace_skills_dedupes() {
        let mut doc = ResumeDocument::default();
        doc.replace_field(FieldValue::Skills(vec![
            "Rust".to_string(),
            " Rust ".to_string(),
            "".to_string(),
            "SQL".to_string(),
        ]));
        assert_eq!(doc.skills, vec!["Rust".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn test_tagged_entry_wire_format() {
        let entry: NewEntry = serde_json::from_value(json!({
            "section": "customSections",
            "title": "Volunteering",
            "items": ["Food bank"]
        }))
        .unwrap();
        assert_eq!(entry.section(), Section::CustomSections);
        assert_eq!(Section::CustomSections.as_str(), "customSections");
    }
}
