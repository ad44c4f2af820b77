//! Master profile storage: one JSON-Resume document per user.

pub mod handlers;

use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use cvforge_core::resume::{JsonResume, SectionId};
use cvforge_core::validate::validate_resume;

use crate::errors::AppError;
use crate::models::ProfileRow;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub resume_data: JsonResume,
    pub completion: u8,
}

impl ProfileResponse {
    fn new(user_id: String, resume_data: JsonResume) -> Self {
        let completion = resume_data.completion_percent();
        Self {
            user_id,
            resume_data,
            completion,
        }
    }
}

/// Fetches the stored profile row, if any.
pub async fn fetch_row(db: &PgPool, user_id: &str) -> Result<Option<ProfileRow>, AppError> {
    let row: Option<ProfileRow> =
        sqlx::query_as("SELECT * FROM master_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;
    Ok(row)
}

/// Returns the stored resume, or an empty one when no profile exists yet.
/// A brand-new user sees an editable empty document, never a 404.
pub async fn get_profile(db: &PgPool, user_id: &str) -> Result<ProfileResponse, AppError> {
    let resume = match fetch_row(db, user_id).await? {
        Some(row) => parse_resume(row.resume_data)?,
        None => JsonResume::empty(),
    };
    Ok(ProfileResponse::new(user_id.to_string(), resume))
}

/// Replaces the whole profile document. Last writer wins.
pub async fn upsert_profile(
    db: &PgPool,
    user_id: &str,
    resume: JsonResume,
) -> Result<ProfileResponse, AppError> {
    validate_resume(&resume).map_err(|e| AppError::Validation(e.to_string()))?;

    let data = serde_json::to_value(&resume)
        .map_err(|e| AppError::Validation(format!("invalid resume document: {e}")))?;
    let row: ProfileRow = sqlx::query_as(
        r#"
        INSERT INTO master_profiles (user_id, resume_data)
        VALUES ($1, $2)
        ON CONFLICT (user_id)
        DO UPDATE SET resume_data = EXCLUDED.resume_data, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&data)
    .fetch_one(db)
    .await?;

    Ok(ProfileResponse::new(row.user_id, parse_resume(row.resume_data)?))
}

/// Patches one named section of the profile, leaving the rest untouched.
/// Starts from an empty resume when the user has no profile yet.
pub async fn update_section(
    db: &PgPool,
    user_id: &str,
    section: SectionId,
    data: Value,
) -> Result<ProfileResponse, AppError> {
    let mut resume = match fetch_row(db, user_id).await? {
        Some(row) => parse_resume(row.resume_data)?,
        None => JsonResume::empty(),
    };

    resume
        .apply_section(section, data)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    upsert_profile(db, user_id, resume).await
}

pub async fn delete_profile(db: &PgPool, user_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM master_profiles WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}

pub(crate) fn parse_resume(data: Value) -> Result<JsonResume, AppError> {
    serde_json::from_value(data)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored resume is corrupt: {e}")))
}
