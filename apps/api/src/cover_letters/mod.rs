//! Cover letter storage.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::CoverLetterRow;

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub id: Uuid,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_id: Option<Uuid>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CoverLetterRow> for CoverLetterResponse {
    fn from(row: CoverLetterRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            cv_id: row.cv_id,
            content: row.content,
            job_title: row.job_title,
            company_name: row.company_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCoverLetterInput {
    pub content: String,
    #[serde(default)]
    pub cv_id: Option<Uuid>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCoverLetterInput {
    pub content: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

pub async fn list_cover_letters(
    db: &PgPool,
    user_id: &str,
) -> Result<Vec<CoverLetterResponse>, AppError> {
    let rows: Vec<CoverLetterRow> =
        sqlx::query_as("SELECT * FROM cover_letters WHERE user_id = $1 ORDER BY updated_at DESC")
            .bind(user_id)
            .fetch_all(db)
            .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get_cover_letter(
    db: &PgPool,
    user_id: &str,
    id: Uuid,
) -> Result<CoverLetterResponse, AppError> {
    let row: Option<CoverLetterRow> =
        sqlx::query_as("SELECT * FROM cover_letters WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(db)
            .await?;
    row.map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("cover letter {id} not found")))
}

pub async fn create_cover_letter(
    db: &PgPool,
    user_id: &str,
    input: CreateCoverLetterInput,
) -> Result<CoverLetterResponse, AppError> {
    if input.content.trim().is_empty() {
        return Err(AppError::Validation("content is required".to_string()));
    }

    let row: CoverLetterRow = sqlx::query_as(
        r#"
        INSERT INTO cover_letters (user_id, cv_id, content, job_title, company_name)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&input.cv_id)
    .bind(&input.content)
    .bind(&input.job_title)
    .bind(&input.company_name)
    .fetch_one(db)
    .await?;

    Ok(row.into())
}

/// Replaces the letter content; title and company update only when supplied.
pub async fn update_cover_letter(
    db: &PgPool,
    user_id: &str,
    id: Uuid,
    input: UpdateCoverLetterInput,
) -> Result<CoverLetterResponse, AppError> {
    if input.content.trim().is_empty() {
        return Err(AppError::Validation("content is required".to_string()));
    }

    let row: Option<CoverLetterRow> = sqlx::query_as(
        r#"
        UPDATE cover_letters
        SET content      = $3,
            job_title    = COALESCE($4, job_title),
            company_name = COALESCE($5, company_name),
            updated_at   = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&input.content)
    .bind(&input.job_title)
    .bind(&input.company_name)
    .fetch_optional(db)
    .await?;

    row.map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("cover letter {id} not found")))
}

pub async fn delete_cover_letter(db: &PgPool, user_id: &str, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM cover_letters WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("cover letter {id} not found")));
    }
    Ok(())
}
