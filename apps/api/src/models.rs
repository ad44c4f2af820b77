//! Database row types shared across feature modules.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: String,
    pub resume_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CvRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub cv_data: Value,
    pub template_id: Option<String>,
    pub job_url: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
    pub match_score: Option<i32>,
    pub ai_suggestions: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CoverLetterRow {
    pub id: Uuid,
    pub user_id: String,
    pub cv_id: Option<Uuid>,
    pub content: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CreditsRow {
    pub id: Uuid,
    pub user_id: String,
    pub free_generations_used: i32,
    pub free_generations_limit: i32,
    pub paid_credits: i32,
    pub total_generations: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreditsRow {
    /// Free credits never go negative even when the limit was lowered after use.
    pub fn free_remaining(&self) -> i32 {
        (self.free_generations_limit - self.free_generations_used).max(0)
    }

    pub fn remaining(&self) -> i32 {
        self.free_remaining() + self.paid_credits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credits(used: i32, limit: i32, paid: i32) -> CreditsRow {
        CreditsRow {
            id: Uuid::nil(),
            user_id: "user_1".to_string(),
            free_generations_used: used,
            free_generations_limit: limit,
            paid_credits: paid,
            total_generations: used,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_remaining_combines_free_and_paid() {
        assert_eq!(credits(1, 3, 5).remaining(), 7);
    }

    #[test]
    fn test_overused_free_clamps_to_zero() {
        assert_eq!(credits(10, 3, 2).free_remaining(), 0);
        assert_eq!(credits(10, 3, 2).remaining(), 2);
    }
}
