//! Generation credit accounting: a free allowance plus purchasable credits.

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use sqlx::PgPool;
use tracing::warn;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::CreditsRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub user_id: String,
    pub free_generations_used: i32,
    pub free_generations_limit: i32,
    pub free_generations_remaining: i32,
    pub paid_credits: i32,
    pub total_generations: i32,
    pub remaining: i32,
}

impl From<CreditsRow> for CreditsResponse {
    fn from(row: CreditsRow) -> Self {
        let free_remaining = row.free_remaining();
        let remaining = row.remaining();
        Self {
            user_id: row.user_id,
            free_generations_used: row.free_generations_used,
            free_generations_limit: row.free_generations_limit,
            free_generations_remaining: free_remaining,
            paid_credits: row.paid_credits,
            total_generations: row.total_generations,
            remaining,
        }
    }
}

/// Fetches the user's credit row, creating it with the configured free
/// allowance on first touch.
pub async fn get_or_create(
    db: &PgPool,
    user_id: &str,
    free_limit: i32,
) -> Result<CreditsRow, AppError> {
    let row: CreditsRow = sqlx::query_as(
        r#"
        INSERT INTO user_credits (user_id, free_generations_limit)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(free_limit)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Returns the credit row if the user can afford one generation.
pub async fn check_credits(
    db: &PgPool,
    user_id: &str,
    free_limit: i32,
) -> Result<CreditsRow, AppError> {
    let row = get_or_create(db, user_id, free_limit).await?;
    if row.remaining() <= 0 {
        return Err(AppError::OutOfCredits);
    }
    Ok(row)
}

/// Consumes one generation: free allowance first, then paid credits.
/// Failure here is logged and swallowed by callers since the generated
/// artifact is already persisted.
pub async fn increment_used(db: &PgPool, user_id: &str) -> Result<CreditsRow, AppError> {
    let row: CreditsRow = sqlx::query_as(
        r#"
        UPDATE user_credits
        SET free_generations_used = CASE
                WHEN free_generations_used < free_generations_limit
                THEN free_generations_used + 1
                ELSE free_generations_used
            END,
            paid_credits = CASE
                WHEN free_generations_used >= free_generations_limit
                THEN GREATEST(paid_credits - 1, 0)
                ELSE paid_credits
            END,
            total_generations = total_generations + 1,
            updated_at = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Best-effort variant used after a successful generation.
pub async fn increment_used_logged(db: &PgPool, user_id: &str, before: &CreditsRow) -> i32 {
    match increment_used(db, user_id).await {
        Ok(row) => row.remaining(),
        Err(e) => {
            warn!("failed to increment credits for user {user_id}: {e}");
            (before.remaining() - 1).max(0)
        }
    }
}

/// GET /api/credits
pub async fn handle_get_credits(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CreditsResponse>, AppError> {
    let row = get_or_create(
        &state.db,
        &user.user_id,
        state.config.free_generations_limit,
    )
    .await?;
    Ok(Json(row.into()))
}
