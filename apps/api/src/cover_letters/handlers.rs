use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::cover_letters::{
    self, CoverLetterResponse, CreateCoverLetterInput, UpdateCoverLetterInput,
};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/cover-letters
pub async fn handle_list_cover_letters(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let letters = cover_letters::list_cover_letters(&state.db, &user.user_id).await?;
    Ok(Json(json!({ "cover_letters": letters })))
}

/// GET /api/cover-letters/:id
pub async fn handle_get_cover_letter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let letter = cover_letters::get_cover_letter(&state.db, &user.user_id, id).await?;
    Ok(Json(letter))
}

/// POST /api/cover-letters
pub async fn handle_create_cover_letter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateCoverLetterInput>,
) -> Result<(StatusCode, Json<CoverLetterResponse>), AppError> {
    let letter = cover_letters::create_cover_letter(&state.db, &user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(letter)))
}

/// PUT /api/cover-letters/:id
pub async fn handle_update_cover_letter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCoverLetterInput>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let letter = cover_letters::update_cover_letter(&state.db, &user.user_id, id, input).await?;
    Ok(Json(letter))
}

/// DELETE /api/cover-letters/:id
pub async fn handle_delete_cover_letter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    cover_letters::delete_cover_letter(&state.db, &user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
