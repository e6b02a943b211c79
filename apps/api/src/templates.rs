//! Template registry.
//!
//! Rendering lives outside this crate; here we only know which template ids
//! exist, their display metadata, and that anything unknown renders as
//! `modern`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::resume::PersonalInfo;

pub const DEFAULT_TEMPLATE_ID: &str = "modern";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateMeta {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub thumbnail: &'static str,
    pub category: &'static str,
}

const TEMPLATES: &[TemplateMeta] = &[
    TemplateMeta {
        id: "modern",
        name: "Modern",
        description: "Clean, professional design with modern typography",
        thumbnail: "/templates/modern-preview.png",
        category: "Professional",
    },
    TemplateMeta {
        id: "classic",
        name: "Classic",
        description: "Traditional, formal design suitable for conservative industries",
        thumbnail: "/templates/classic-preview.png",
        category: "Traditional",
    },
];

pub fn available_templates() -> &'static [TemplateMeta] {
    TEMPLATES
}

pub fn is_known(template_id: &str) -> bool {
    TEMPLATES.iter().any(|t| t.id == template_id)
}

/// Looks up a template, falling back to `modern` for unknown ids.
pub fn resolve(template_id: &str) -> &'static TemplateMeta {
    TEMPLATES
        .iter()
        .find(|t| t.id == template_id)
        .unwrap_or(&TEMPLATES[0])
}

/// File name offered for a printed/PDF export, e.g.
/// `Ada_Lovelace_Modern_2024-03-01.pdf`.
pub fn export_filename(personal: &PersonalInfo, template_id: &str, date: NaiveDate) -> String {
    let first = personal.first_name.trim();
    let last = personal.last_name.trim();
    let name = if !first.is_empty() && !last.is_empty() {
        format!("{first}_{last}")
    } else {
        "Resume".to_string()
    };
    format!(
        "{name}_{}_{}.pdf",
        resolve(template_id).name,
        date.format("%Y-%m-%d")
    )
}
