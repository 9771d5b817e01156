use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use super::{no_blank_entries, not_blank};

/// POST /functions/v1/generate-study-plan body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_range"))]
pub struct StudyPlanRequest {
    #[validate(custom(function = "not_blank"))]
    pub grade: String,

    #[validate(custom(function = "not_blank"))]
    pub target_exam: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[validate(custom(function = "no_blank_entries"))]
    pub weak_subjects: Vec<String>,
}

fn validate_date_range(req: &StudyPlanRequest) -> Result<(), ValidationError> {
    if req.end_date < req.start_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("endDate must not be before startDate".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlanItem {
    pub date: NaiveDate,
    pub subject: String,
    pub title: String,
    pub description: String,
    /// Minutes
    #[serde(deserialize_with = "deserialize_minutes")]
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub title: String,
    pub description: String,
    pub items: Vec<StudyPlanItem>,
}

impl StudyPlan {
    pub fn check(&self, start: NaiveDate, end: NaiveDate) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("study plan has no title".to_string());
        }

        for (idx, item) in self.items.iter().enumerate() {
            let number = idx + 1;
            if item.date < start || item.date > end {
                return Err(format!(
                    "item {} is dated {} outside {}..={}",
                    number, item.date, start, end
                ));
            }
            if item.subject.trim().is_empty() || item.title.trim().is_empty() {
                return Err(format!("item {} is missing subject or title", number));
            }
            if item.duration == 0 {
                return Err(format!("item {} has zero duration", number));
            }
        }

        Ok(())
    }
}

// The tool schema advertises a JSON number, so models occasionally send `90.0`.
fn deserialize_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.fract() != 0.0 || raw < 0.0 || raw > f64::from(u32::MAX) {
        return Err(serde::de::Error::custom(format!(
            "duration must be a whole number of minutes, got {}",
            raw
        )));
    }
    Ok(raw as u32)
}
