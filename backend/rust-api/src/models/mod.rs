use serde::Serialize;
use std::fmt;
use validator::ValidationError;

/// What a proxy endpoint produces. Used for public error text and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    Quiz,
    StudyPlan,
}

impl Artifact {
    pub fn as_label(&self) -> &'static str {
        match self {
            Artifact::Quiz => "quiz",
            Artifact::StudyPlan => "study_plan",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Quiz => f.write_str("quiz"),
            Artifact::StudyPlan => f.write_str("study plan"),
        }
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn no_blank_entries(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|value| value.trim().is_empty()) {
        let mut err = ValidationError::new("blank_entry");
        err.message = Some("entries must not be blank".into());
        return Err(err);
    }
    Ok(())
}

pub mod completion;
pub mod quiz;
pub mod study_plan;
