//! Generated CV storage and listing.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use cvforge_core::resume::JsonResume;

use crate::ai::JobAnalysis;
use crate::errors::AppError;
use crate::models::CvRow;
use crate::profile;

pub const DEFAULT_TEMPLATE: &str = "professional";

#[derive(Debug, Serialize)]
pub struct CvResponse {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub cv_data: JsonResume,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_suggestions: Option<JobAnalysis>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List entries carry metadata only, never the full document.
#[derive(Debug, Serialize)]
pub struct CvListItem {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CvListResponse {
    pub cvs: Vec<CvListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCvInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCvInput {
    pub name: Option<String>,
    pub cv_data: Option<JsonResume>,
    pub template_id: Option<String>,
}

/// Clamps pagination parameters: page >= 1, 1 <= page_size <= 100 (default 10).
pub fn clamp_pagination(page: Option<i64>, page_size: Option<i64>) -> (i64, i64) {
    let page = page.filter(|p| *p >= 1).unwrap_or(1);
    let page_size = page_size.filter(|s| (1..=100).contains(s)).unwrap_or(10);
    (page, page_size)
}

pub async fn list_cvs(
    db: &PgPool,
    user_id: &str,
    page: Option<i64>,
    page_size: Option<i64>,
) -> Result<CvListResponse, AppError> {
    let (page, page_size) = clamp_pagination(page, page_size);

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM generated_cvs WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await?;

    let rows: Vec<CvRow> = sqlx::query_as(
        "SELECT * FROM generated_cvs WHERE user_id = $1 \
         ORDER BY updated_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(page_size)
    .bind((page - 1) * page_size)
    .fetch_all(db)
    .await?;

    let cvs = rows
        .into_iter()
        .map(|row| CvListItem {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            template_id: row.template_id.unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
            job_title: row.job_title,
            company_name: row.company_name,
            match_score: row.match_score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .collect();

    Ok(CvListResponse {
        cvs,
        total,
        page,
        page_size,
        total_pages: (total + page_size - 1) / page_size,
    })
}

pub async fn fetch_row(db: &PgPool, user_id: &str, id: Uuid) -> Result<CvRow, AppError> {
    let row: Option<CvRow> =
        sqlx::query_as("SELECT * FROM generated_cvs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(db)
            .await?;
    row.ok_or_else(|| AppError::NotFound(format!("cv {id} not found")))
}

pub async fn get_cv(db: &PgPool, user_id: &str, id: Uuid) -> Result<CvResponse, AppError> {
    let row = fetch_row(db, user_id, id).await?;
    row_to_response(row)
}

/// Creates a CV seeded from the master profile, or from an empty resume when
/// the user has no profile yet.
pub async fn create_cv(
    db: &PgPool,
    user_id: &str,
    input: CreateCvInput,
) -> Result<CvResponse, AppError> {
    let name = input
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Untitled CV".to_string());
    let template_id = input
        .template_id
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

    let cv_data = match profile::fetch_row(db, user_id).await? {
        Some(row) => row.resume_data,
        None => serde_json::to_value(JsonResume::empty())
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?,
    };

    let row: CvRow = sqlx::query_as(
        r#"
        INSERT INTO generated_cvs (user_id, name, cv_data, template_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&name)
    .bind(&cv_data)
    .bind(&template_id)
    .fetch_one(db)
    .await?;

    row_to_response(row)
}

/// Partial update: absent fields keep their stored values via COALESCE.
pub async fn update_cv(
    db: &PgPool,
    user_id: &str,
    id: Uuid,
    input: UpdateCvInput,
) -> Result<CvResponse, AppError> {
    let cv_data = match &input.cv_data {
        Some(resume) => Some(
            serde_json::to_value(resume)
                .map_err(|e| AppError::Validation(format!("invalid cv data: {e}")))?,
        ),
        None => None,
    };

    let row: Option<CvRow> = sqlx::query_as(
        r#"
        UPDATE generated_cvs
        SET name        = COALESCE($3, name),
            cv_data     = COALESCE($4, cv_data),
            template_id = COALESCE($5, template_id),
            updated_at  = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&input.name)
    .bind(&cv_data)
    .bind(&input.template_id)
    .fetch_optional(db)
    .await?;

    let row = row.ok_or_else(|| AppError::NotFound(format!("cv {id} not found")))?;
    row_to_response(row)
}

pub async fn delete_cv(db: &PgPool, user_id: &str, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM generated_cvs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("cv {id} not found")));
    }
    Ok(())
}

/// Clones a CV under "<name> (Copy)". Match score and AI suggestions are
/// reset: they describe the original's job analysis, not the copy's.
pub async fn duplicate_cv(db: &PgPool, user_id: &str, id: Uuid) -> Result<CvResponse, AppError> {
    let original = fetch_row(db, user_id, id).await?;

    let row: CvRow = sqlx::query_as(
        r#"
        INSERT INTO generated_cvs
            (user_id, name, cv_data, template_id, job_url, job_title, company_name, job_description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(format!("{} (Copy)", original.name))
    .bind(&original.cv_data)
    .bind(&original.template_id)
    .bind(&original.job_url)
    .bind(&original.job_title)
    .bind(&original.company_name)
    .bind(&original.job_description)
    .fetch_one(db)
    .await?;

    row_to_response(row)
}

pub(crate) fn row_to_response(row: CvRow) -> Result<CvResponse, AppError> {
    let cv_data = profile::parse_resume(row.cv_data)?;

    // Suggestions are only surfaced when the stored analysis says something.
    let ai_suggestions = row
        .ai_suggestions
        .and_then(|v| serde_json::from_value::<JobAnalysis>(v).ok())
        .filter(|a| a.match_score > 0 || !a.suggestions.is_empty());

    Ok(CvResponse {
        id: row.id,
        user_id: row.user_id,
        name: row.name,
        cv_data,
        template_id: row.template_id.unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
        job_url: row.job_url,
        job_title: row.job_title,
        company_name: row.company_name,
        job_description: row.job_description,
        match_score: row.match_score,
        ai_suggestions,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(clamp_pagination(None, None), (1, 10));
    }

    #[test]
    fn test_pagination_clamps_out_of_range() {
        assert_eq!(clamp_pagination(Some(0), Some(0)), (1, 10));
        assert_eq!(clamp_pagination(Some(-3), Some(1000)), (1, 10));
        assert_eq!(clamp_pagination(Some(4), Some(100)), (4, 100));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let pages = |total: i64, size: i64| (total + size - 1) / size;
        assert_eq!(pages(0, 10), 0);
        assert_eq!(pages(10, 10), 1);
        assert_eq!(pages(11, 10), 2);
    }
}
