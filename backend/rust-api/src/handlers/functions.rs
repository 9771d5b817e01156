use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    error::ProxyError,
    extractors::AppJson,
    models::{
        quiz::{Quiz, QuizGenerationRequest},
        study_plan::{StudyPlan, StudyPlanRequest},
    },
    services::{quiz_service::QuizService, study_plan_service::StudyPlanService, AppState},
};

/// POST /functions/v1/generate-quiz
pub async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<QuizGenerationRequest>,
) -> Result<Json<Quiz>, ProxyError> {
    let service = QuizService::new(&state);
    let quiz = service.generate(req).await?;
    Ok(Json(quiz))
}

/// POST /functions/v1/generate-study-plan
pub async fn generate_study_plan(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<StudyPlanRequest>,
) -> Result<Json<StudyPlan>, ProxyError> {
    let service = StudyPlanService::new(&state);
    let plan = service.generate(req).await?;
    Ok(Json(plan))
}
