use serde_json::json;
use validator::Validate;

use crate::{
    error::ProxyError,
    metrics,
    models::{
        completion::{PromptPair, ToolSpec},
        study_plan::{StudyPlan, StudyPlanRequest},
        Artifact,
    },
    services::{completion_client::CompletionClient, generation::generate_structured, AppState},
};

const SYSTEM_PROMPT: &str = "You are an expert educational AI that creates personalized study plans for students.
Create a comprehensive study plan with specific daily tasks, resources to review, and time allocations.
Focus on the exam-specific weightages and prioritize weak subjects.";

pub const TOOL_NAME: &str = "create_study_plan";

pub struct StudyPlanService<'a> {
    client: &'a CompletionClient,
}

impl<'a> StudyPlanService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            client: &state.completion,
        }
    }

    pub async fn generate(&self, req: StudyPlanRequest) -> Result<StudyPlan, ProxyError> {
        self.generate_inner(req).await.inspect_err(|e| {
            metrics::record_generation_failure(Artifact::StudyPlan, e.kind());
        })
    }

    async fn generate_inner(&self, req: StudyPlanRequest) -> Result<StudyPlan, ProxyError> {
        req.validate()?;

        tracing::info!(
            grade = %req.grade,
            target_exam = %req.target_exam,
            start_date = %req.start_date,
            end_date = %req.end_date,
            weak_subjects = req.weak_subjects.len(),
            "Generating study plan"
        );

        let plan: StudyPlan = generate_structured(
            self.client,
            Artifact::StudyPlan,
            build_prompts(&req),
            &tool_spec(),
        )
        .await?;

        plan.check(req.start_date, req.end_date)
            .map_err(|detail| ProxyError::invalid_result(Artifact::StudyPlan, detail))?;

        tracing::info!(items = plan.items.len(), "Study plan generated");
        Ok(plan)
    }
}

fn weak_subjects_phrase(subjects: &[String]) -> String {
    if subjects.is_empty() {
        "None specified".to_string()
    } else {
        subjects.join(", ")
    }
}

pub fn build_prompts(req: &StudyPlanRequest) -> PromptPair {
    let user = format!(
        r#"Create a detailed study plan for:
- Grade: {grade}
- Target Exam: {exam}
- Duration: {start} to {end}
- Weak Subjects: {subjects}

Generate a study plan with:
1. Weekly breakdown of topics to cover
2. Daily study tasks (2-3 hours per day)
3. Practice session recommendations
4. Mock test schedule
5. Revision sessions

Every item date must fall between {start} and {end} inclusive.

Return the response as a JSON object with this structure:
{{
  "title": "Study Plan Title",
  "description": "Brief overview",
  "items": [
    {{
      "date": "YYYY-MM-DD",
      "subject": "Subject Name",
      "title": "Task Title",
      "description": "Detailed description",
      "duration": 90
    }}
  ]
}}"#,
        grade = req.grade,
        exam = req.target_exam,
        start = req.start_date,
        end = req.end_date,
        subjects = weak_subjects_phrase(&req.weak_subjects),
    );

    PromptPair {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

pub fn tool_spec() -> ToolSpec {
    ToolSpec {
        name: TOOL_NAME,
        description: "Create a structured study plan",
        parameters: json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "description": { "type": "string" },
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "date": { "type": "string", "format": "date" },
                            "subject": { "type": "string" },
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "duration": { "type": "integer", "minimum": 1 }
                        },
                        "required": ["date", "subject", "title", "description", "duration"]
                    }
                }
            },
            "required": ["title", "description", "items"]
        }),
    }
}
