//! Field-level form rules, checked before an edit reaches the document store.
//!
//! The store itself accepts anything well-typed; these checks decide whether
//! a form step may submit its values.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::entries::{
    Certification, CustomSection, Education, Experience, Language, Project, SocialLink,
};
use crate::models::resume::{Meta, NewEntry, PersonalInfo, ResumeDocument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Error)]
#[error("Validation failed: {}", summary(.0))]
pub struct ValidationFailed(pub Vec<FieldError>);

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationReport {
    pub fn into_result(self) -> Result<(), ValidationFailed> {
        if self.passed {
            Ok(())
        } else {
            Err(ValidationFailed(self.errors))
        }
    }
}

/// Collects failures for one form.
#[derive(Default)]
struct Checker {
    prefix: String,
    errors: Vec<FieldError>,
}

impl Checker {
    fn scoped(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, field: &str, message: &str) {
        let field = if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.prefix)
        };
        self.errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    fn required(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.fail(field, message);
        }
    }

    /// Empty is allowed; anything else must parse as an absolute URL.
    fn optional_url(&mut self, field: &str, value: &str) {
        if !value.is_empty() && !is_valid_url(value) {
            self.fail(field, "Invalid URL");
        }
    }

    fn finish(self) -> ValidationReport {
        ValidationReport {
            passed: self.errors.is_empty(),
            errors: self.errors,
        }
    }

    fn absorb(&mut self, report: ValidationReport) {
        self.errors.extend(report.errors);
    }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Digits with an optional leading `+`, ignoring spaces, dashes and parens.
pub fn is_valid_phone(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    let mut chars = digits.chars();
    match chars.next() {
        Some(first) if ('1'..='9').contains(&first) => {
            digits.len() <= 16 && chars.all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

pub fn validate_meta(meta: &Meta) -> ValidationReport {
    let mut check = Checker::scoped("meta");
    check.required("title", &meta.title, "Resume title is required");
    check.finish()
}

pub fn validate_personal(personal: &PersonalInfo) -> ValidationReport {
    let mut check = Checker::scoped("personal");
    check.required("firstName", &personal.first_name, "First name is required");
    check.required("lastName", &personal.last_name, "Last name is required");
    if !is_valid_email(&personal.email) {
        check.fail("email", "Invalid email address");
    }
    if !personal.phone.is_empty() && !is_valid_phone(&personal.phone) {
        check.fail("phone", "Invalid phone number");
    }
    check.optional_url("website", &personal.website);
    check.finish()
}

pub fn validate_experience(entry: &Experience) -> ValidationReport {
    let mut check = Checker::scoped("experience");
    check.required("company", &entry.company, "Company name is required");
    check.required("position", &entry.position, "Position is required");
    check.required("startDate", &entry.start_date, "Start date is required");
    check.finish()
}

pub fn validate_education(entry: &Education) -> ValidationReport {
    let mut check = Checker::scoped("education");
    check.required("institution", &entry.institution, "Institution is required");
    check.required("degree", &entry.degree, "Degree is required");
    check.required("startDate", &entry.start_date, "Start date is required");
    check.finish()
}

pub fn validate_project(entry: &Project) -> ValidationReport {
    let mut check = Checker::scoped("projects");
    check.required("name", &entry.name, "Project name is required");
    check.optional_url("url", &entry.url);
    check.finish()
}

pub fn validate_certification(entry: &Certification) -> ValidationReport {
    let mut check = Checker::scoped("certifications");
    check.required("name", &entry.name, "Certification name is required");
    check.required("issuer", &entry.issuer, "Issuer is required");
    check.optional_url("url", &entry.url);
    check.finish()
}

pub fn validate_language(entry: &Language) -> ValidationReport {
    let mut check = Checker::scoped("languages");
    check.required("name", &entry.name, "Language name is required");
    if entry.level.is_none() {
        check.fail("level", "Proficiency level is required");
    }
    check.finish()
}

pub fn validate_social_link(entry: &SocialLink) -> ValidationReport {
    let mut check = Checker::scoped("socialLinks");
    check.required("platform", &entry.platform, "Platform is required");
    if !is_valid_url(&entry.url) {
        check.fail("url", "Invalid URL");
    }
    check.finish()
}

pub fn validate_custom_section(entry: &CustomSection) -> ValidationReport {
    let mut check = Checker::scoped("customSections");
    check.required("title", &entry.title, "Section title is required");
    check.finish()
}

pub fn validate_entry(entry: &NewEntry) -> ValidationReport {
    match entry {
        NewEntry::Experience(e) => validate_experience(e),
        NewEntry::Education(e) => validate_education(e),
        NewEntry::Projects(e) => validate_project(e),
        NewEntry::Certifications(e) => validate_certification(e),
        NewEntry::Languages(e) => validate_language(e),
        NewEntry::SocialLinks(e) => validate_social_link(e),
        NewEntry::CustomSections(e) => validate_custom_section(e),
    }
}

/// Validates a whole resume, collecting every failure.
pub fn validate_document(doc: &ResumeDocument) -> ValidationReport {
    let mut check = Checker::default();
    check.absorb(validate_meta(&doc.meta));
    check.absorb(validate_personal(&doc.personal));
    doc.experience
        .iter()
        .for_each(|e| check.absorb(validate_experience(e)));
    doc.education
        .iter()
        .for_each(|e| check.absorb(validate_education(e)));
    doc.projects
        .iter()
        .for_each(|e| check.absorb(validate_project(e)));
    doc.certifications
        .iter()
        .for_each(|e| check.absorb(validate_certification(e)));
    doc.languages
        .iter()
        .for_each(|e| check.absorb(validate_language(e)));
    doc.social_links
        .iter()
        .for_each(|e| check.absorb(validate_social_link(e)));
    doc.custom_sections
        .iter()
        .for_each(|e| check.absorb(validate_custom_section(e)));
    check.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entries::LanguageLevel;

    fn personal() -> PersonalInfo {
        PersonalInfo {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.io"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_rules() {
        assert!(is_valid_phone("+1 (555) 123-4567"));
        assert!(is_valid_phone("4915112345678"));
        assert!(!is_valid_phone("0123"));
        assert!(!is_valid_phone("555-CALL-NOW"));
    }

    #[test]
    fn test_personal_passes() {
        let report = validate_personal(&personal());
        assert!(report.passed, "{:?}", report.errors);
    }

    #[test]
    fn test_personal_reports_each_field() {
        let report = validate_personal(&PersonalInfo {
            website: "not a url".to_string(),
            ..Default::default()
        });
        assert!(!report.passed);
        let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "personal.firstName",
                "personal.lastName",
                "personal.email",
                "personal.website"
            ]
        );
    }

    #[test]
    fn test_entry_rules() {
        assert!(!validate_entry(&Experience::default().into()).passed);
        assert!(validate_entry(
            &Language {
                name: "German".to_string(),
                level: Some(LanguageLevel::Advanced),
                ..Default::default()
            }
            .into()
        )
        .passed);
        assert!(!validate_entry(
            &SocialLink {
                platform: "GitHub".to_string(),
                url: "github".to_string(),
                ..Default::default()
            }
            .into()
        )
        .passed);
    }

    #[test]
    fn test_document_collects_nested_failures() {
        let mut doc = ResumeDocument {
            personal: personal(),
            ..Default::default()
        };
        assert!(validate_document(&doc).passed);

        doc.meta.title.clear();
        doc.education.push(Education::default());
        let err = validate_document(&doc).into_result().unwrap_err();
        assert_eq!(err.0.len(), 4);
        assert!(err.to_string().contains("meta.title"));
    }
}
