use serde_json::json;
use validator::Validate;

use crate::{
    error::ProxyError,
    metrics,
    models::{
        completion::{PromptPair, ToolSpec},
        quiz::{Quiz, QuizGenerationRequest},
        Artifact,
    },
    services::{completion_client::CompletionClient, generation::generate_structured, AppState},
};

const SYSTEM_PROMPT: &str = "You are an expert quiz creator for educational content.
Generate high-quality multiple-choice questions appropriate for the given grade level and subject.
Each question should have 4 options (A, B, C, D) with exactly one correct answer and a clear explanation.";

pub const TOOL_NAME: &str = "create_quiz";

pub struct QuizService<'a> {
    client: &'a CompletionClient,
}

impl<'a> QuizService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            client: &state.completion,
        }
    }

    pub async fn generate(&self, req: QuizGenerationRequest) -> Result<Quiz, ProxyError> {
        self.generate_inner(req).await.inspect_err(|e| {
            metrics::record_generation_failure(Artifact::Quiz, e.kind());
        })
    }

    async fn generate_inner(&self, req: QuizGenerationRequest) -> Result<Quiz, ProxyError> {
        req.validate()?;

        tracing::info!(
            subject = %req.subject,
            grade = %req.grade,
            difficulty = %req.difficulty,
            num_questions = req.num_questions,
            "Generating quiz"
        );

        let quiz: Quiz =
            generate_structured(self.client, Artifact::Quiz, build_prompts(&req), &tool_spec())
                .await?;

        quiz.check()
            .map_err(|detail| ProxyError::invalid_result(Artifact::Quiz, detail))?;

        if quiz.questions.len() != req.num_questions as usize {
            tracing::warn!(
                requested = req.num_questions,
                received = quiz.questions.len(),
                "Quiz question count differs from request"
            );
        }

        tracing::info!(questions = quiz.questions.len(), "Quiz generated");
        Ok(quiz)
    }
}

pub fn build_prompts(req: &QuizGenerationRequest) -> PromptPair {
    let user = format!(
        r#"Create {count} {difficulty} difficulty multiple-choice questions for:
- Subject: {subject}
- Grade: {grade}

Return as a JSON object with this structure:
{{
  "questions": [
    {{
      "question": "Question text",
      "options": {{
        "A": "Option A text",
        "B": "Option B text",
        "C": "Option C text",
        "D": "Option D text"
      }},
      "correctAnswer": "A",
      "explanation": "Why this answer is correct"
    }}
  ]
}}"#,
        count = req.num_questions,
        difficulty = req.difficulty,
        subject = req.subject,
        grade = req.grade,
    );

    PromptPair {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

pub fn tool_spec() -> ToolSpec {
    ToolSpec {
        name: TOOL_NAME,
        description: "Create a quiz with multiple choice questions",
        parameters: json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": { "type": "string" },
                            "options": {
                                "type": "object",
                                "properties": {
                                    "A": { "type": "string" },
                                    "B": { "type": "string" },
                                    "C": { "type": "string" },
                                    "D": { "type": "string" }
                                },
                                "required": ["A", "B", "C", "D"]
                            },
                            "correctAnswer": {
                                "type": "string",
                                "enum": ["A", "B", "C", "D"]
                            },
                            "explanation": { "type": "string" }
                        },
                        "required": ["question", "options", "correctAnswer", "explanation"]
                    }
                }
            },
            "required": ["questions"]
        }),
    }
}
