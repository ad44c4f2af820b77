use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use cvforge_core::resume::{JsonResume, SectionId};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::profile;
use crate::profile::ProfileResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub resume_data: Option<JsonResume>,
}

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, AppError> {
    let response = profile::get_profile(&state.db, &user.user_id).await?;
    Ok(Json(response))
}

/// PUT /api/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let resume = req
        .resume_data
        .ok_or_else(|| AppError::Validation("resume_data is required".to_string()))?;
    let response = profile::upsert_profile(&state.db, &user.user_id, resume).await?;
    Ok(Json(response))
}

/// PATCH /api/profile/:section
pub async fn handle_update_section(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(section): Path<String>,
    Json(data): Json<Value>,
) -> Result<Json<ProfileResponse>, AppError> {
    let section: SectionId = section
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid section: {section}")))?;
    let response = profile::update_section(&state.db, &user.user_id, section, data).await?;
    Ok(Json(response))
}

/// DELETE /api/profile
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    profile::delete_profile(&state.db, &user.user_id).await?;
    Ok(Json(json!({ "message": "profile deleted successfully" })))
}
