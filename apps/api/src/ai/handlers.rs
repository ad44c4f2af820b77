use axum::{extract::State, Extension, Json};

use crate::ai::{
    self, AnalyzeJobRequest, AnalyzeJobResponse, GenerateCoverLetterRequest,
    GenerateCoverLetterResponse, GenerateCvRequest, GenerateCvResponse,
};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::state::AppState;

fn require_llm(state: &AppState) -> Result<&LlmClient, AppError> {
    state
        .llm
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("AI service not available".to_string()))
}

/// POST /api/ai/analyze-job
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AnalyzeJobRequest>,
) -> Result<Json<AnalyzeJobResponse>, AppError> {
    let llm = require_llm(&state)?;
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description is required".to_string(),
        ));
    }
    let analysis = ai::analyze_job(&state.db, llm, &user.user_id, &req.job_description).await?;
    Ok(Json(AnalyzeJobResponse { analysis }))
}

/// POST /api/ai/generate-cv
pub async fn handle_generate_cv(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<GenerateCvRequest>,
) -> Result<Json<GenerateCvResponse>, AppError> {
    let llm = require_llm(&state)?;
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description is required".to_string(),
        ));
    }
    let response = ai::generate_cv(
        &state.db,
        llm,
        &user.user_id,
        state.config.free_generations_limit,
        req,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/ai/generate-cover-letter
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<GenerateCoverLetterRequest>,
) -> Result<Json<GenerateCoverLetterResponse>, AppError> {
    let llm = require_llm(&state)?;
    if req.job_title.trim().is_empty() || req.company_name.trim().is_empty() {
        return Err(AppError::Validation(
            "job_title and company_name are required".to_string(),
        ));
    }
    let response = ai::generate_cover_letter(
        &state.db,
        llm,
        &user.user_id,
        state.config.free_generations_limit,
        req,
    )
    .await?;
    Ok(Json(response))
}
