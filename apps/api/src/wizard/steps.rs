use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
}

pub const STEP_COUNT: usize = WizardStep::ALL.len();

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Personal,
        WizardStep::Summary,
        WizardStep::Experience,
        WizardStep::Education,
        WizardStep::Skills,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Personal => "Personal Info",
            WizardStep::Summary => "Summary",
            WizardStep::Experience => "Experience",
            WizardStep::Education => "Education",
            WizardStep::Skills => "Skills",
        }
    }

    pub fn is_complete(self, doc: &ResumeDocument) -> bool {
        match self {
            WizardStep::Personal => {
                let p = &doc.personal;
                !p.first_name.is_empty() && !p.last_name.is_empty() && !p.email.is_empty()
            }
            WizardStep::Summary => doc.summary.as_deref().is_some_and(|s| !s.is_empty()),
            WizardStep::Experience => !doc.experience.is_empty(),
            WizardStep::Education => !doc.education.is_empty(),
            WizardStep::Skills => !doc.skills.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Complete,
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    pub step: WizardStep,
    pub title: String,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub percentage: u8,
    pub completed_steps: usize,
    pub steps: Vec<StepProgress>,
}

pub fn step_status(step: WizardStep, doc: &ResumeDocument) -> StepStatus {
    if step.is_complete(doc) {
        StepStatus::Complete
    } else {
        StepStatus::Incomplete
    }
}

pub fn completed_steps(doc: &ResumeDocument) -> usize {
    WizardStep::ALL
        .iter()
        .filter(|step| step.is_complete(doc))
        .count()
}

/// round(100 × complete / total).
pub fn completion_percentage(doc: &ResumeDocument) -> u8 {
    let ratio = completed_steps(doc) as f64 / STEP_COUNT as f64;
    (ratio * 100.0).round() as u8
}

pub fn completion_report(doc: &ResumeDocument) -> CompletionReport {
    let steps = WizardStep::ALL
        .iter()
        .map(|&step| StepProgress {
            step,
            title: step.title().to_string(),
            status: step_status(step, doc),
        })
        .collect();
    CompletionReport {
        percentage: completion_percentage(doc),
        completed_steps: completed_steps(doc),
        steps,
    }
}

/// Clamps a requested step index into `[0, STEP_COUNT - 1]`.
pub fn clamp_step(index: usize) -> usize {
    index.min(STEP_COUNT - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entries::Education;

    #[test]
    fn test_empty_document_is_zero_percent() {
        let doc = ResumeDocument::default();
        assert_eq!(completed_steps(&doc), 0);
        assert_eq!(completion_percentage(&doc), 0);
    }

    #[test]
    fn test_personal_only_is_twenty_percent() {
        let mut doc = ResumeDocument::default();
        doc.personal.first_name = "Ada".to_string();
        doc.personal.last_name = "Lovelace".to_string();
        doc.personal.email = "ada@example.com".to_string();
        assert_eq!(completion_percentage(&doc), 20);

        let report = completion_report(&doc);
        assert_eq!(report.completed_steps, 1);
        assert_eq!(report.steps[0].status, StepStatus::Complete);
        assert!(report.steps[1..]
            .iter()
            .all(|p| p.status == StepStatus::Incomplete));
    }

    #[test]
    fn test_partial_personal_is_incomplete() {
        let mut doc = ResumeDocument::default();
        doc.personal.first_name = "Ada".to_string();
        doc.personal.email = "ada@example.com".to_string();
        assert_eq!(
            step_status(WizardStep::Personal, &doc),
            StepStatus::Incomplete
        );
    }

    #[test]
    fn test_empty_summary_is_incomplete() {
        let mut doc = ResumeDocument {
            summary: Some(String::new()),
            ..Default::default()
        };
        assert!(!WizardStep::Summary.is_complete(&doc));
        doc.summary = Some("Systems programmer".to_string());
        assert!(WizardStep::Summary.is_complete(&doc));
    }

    #[test]
    fn test_all_steps_complete() {
        let mut doc = ResumeDocument::default();
        doc.personal.first_name = "Ada".to_string();
        doc.personal.last_name = "Lovelace".to_string();
        doc.personal.email = "ada@example.com".to_string();
        doc.summary = Some("Analyst".to_string());
        doc.experience.push(Default::default());
        doc.education.push(Education::default());
        doc.skills.push("Mathematics".to_string());
        assert_eq!(completion_percentage(&doc), 100);
    }

    #[test]
    fn test_step_indices() {
        assert_eq!(STEP_COUNT, 5);
        assert_eq!(WizardStep::Skills.index(), 4);
        assert_eq!(WizardStep::from_index(1), Some(WizardStep::Summary));
        assert_eq!(WizardStep::from_index(5), None);
        assert_eq!(clamp_step(42), 4);
    }
}
