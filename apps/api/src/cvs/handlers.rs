use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use cvforge_core::render::{render, ThemeId};
use cvforge_core::resume::SectionId;

use crate::auth::AuthUser;
use crate::cvs::{self, CreateCvInput, CvListResponse, CvResponse, UpdateCvInput};
use crate::errors::AppError;
use crate::profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// GET /api/cvs?page&page_size
pub async fn handle_list_cvs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CvListResponse>, AppError> {
    let response = cvs::list_cvs(&state.db, &user.user_id, query.page, query.page_size).await?;
    Ok(Json(response))
}

/// GET /api/cvs/:id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CvResponse>, AppError> {
    let response = cvs::get_cv(&state.db, &user.user_id, id).await?;
    Ok(Json(response))
}

/// POST /api/cvs
pub async fn handle_create_cv(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateCvInput>,
) -> Result<(StatusCode, Json<CvResponse>), AppError> {
    let response = cvs::create_cv(&state.db, &user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/cvs/:id
pub async fn handle_update_cv(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCvInput>,
) -> Result<Json<CvResponse>, AppError> {
    let response = cvs::update_cv(&state.db, &user.user_id, id, input).await?;
    Ok(Json(response))
}

/// DELETE /api/cvs/:id
pub async fn handle_delete_cv(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    cvs::delete_cv(&state.db, &user.user_id, id).await?;
    Ok(Json(json!({ "message": "cv deleted successfully" })))
}

/// POST /api/cvs/:id/duplicate
pub async fn handle_duplicate_cv(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<CvResponse>), AppError> {
    let response = cvs::duplicate_cv(&state.db, &user.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize)]
pub struct RenderQuery {
    pub theme: Option<String>,
    /// Comma-separated section ids to drop from the rendered output.
    pub hide: Option<String>,
}

/// GET /api/cvs/:id/render?theme=&hide=
pub async fn handle_render_cv(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<RenderQuery>,
) -> Result<Html<String>, AppError> {
    let row = cvs::fetch_row(&state.db, &user.user_id, id).await?;

    let theme = match query.theme.as_deref().filter(|t| !t.is_empty()) {
        Some(raw) => raw
            .parse::<ThemeId>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
        None => row
            .template_id
            .as_deref()
            .and_then(|t| t.parse::<ThemeId>().ok())
            .unwrap_or_default(),
    };

    let mut hidden = Vec::new();
    if let Some(hide) = query.hide.as_deref() {
        for part in hide.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let section: SectionId = part
                .parse()
                .map_err(|_| AppError::Validation(format!("invalid section: {part}")))?;
            hidden.push(section);
        }
    }

    let resume = profile::parse_resume(row.cv_data)?;
    let resume = resume.with_sections_hidden(&hidden);
    Ok(Html(render(&resume, theme)))
}
