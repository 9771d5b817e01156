use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::not_blank;

pub const MAX_QUESTIONS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("easy"),
            Difficulty::Medium => f.write_str("medium"),
            Difficulty::Hard => f.write_str("hard"),
        }
    }
}

/// POST /functions/v1/generate-quiz body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizGenerationRequest {
    #[validate(custom(function = "not_blank"))]
    pub subject: String,

    pub difficulty: Difficulty,

    #[validate(range(
        min = 1,
        max = 50,
        message = "numQuestions must be between 1 and 50"
    ))]
    pub num_questions: u32,

    #[validate(custom(function = "not_blank"))]
    pub grade: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLabel {
    A,
    B,
    C,
    D,
}

impl AnswerLabel {
    pub const ALL: [AnswerLabel; 4] = [
        AnswerLabel::A,
        AnswerLabel::B,
        AnswerLabel::C,
        AnswerLabel::D,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl QuizOptions {
    pub fn get(&self, label: AnswerLabel) -> &str {
        match label {
            AnswerLabel::A => &self.a,
            AnswerLabel::B => &self.b,
            AnswerLabel::C => &self.c,
            AnswerLabel::D => &self.d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: QuizOptions,
    pub correct_answer: AnswerLabel,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// Checks what the tool schema cannot express: no blank text anywhere and
    /// at least one question. Label membership is already guaranteed by
    /// `AnswerLabel` + all four options being required.
    pub fn check(&self) -> Result<(), String> {
        if self.questions.is_empty() {
            return Err("quiz contains no questions".to_string());
        }

        for (idx, question) in self.questions.iter().enumerate() {
            let number = idx + 1;
            if question.question.trim().is_empty() {
                return Err(format!("question {} has no text", number));
            }
            if question.explanation.trim().is_empty() {
                return Err(format!("question {} has no explanation", number));
            }
            if let Some(label) = AnswerLabel::ALL
                .iter()
                .find(|label| question.options.get(**label).trim().is_empty())
            {
                return Err(format!("question {} has blank option {:?}", number, label));
            }
        }

        Ok(())
    }
}
