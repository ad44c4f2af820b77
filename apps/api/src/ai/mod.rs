//! AI-assisted job analysis, CV tailoring and cover letter generation.
//!
//! The model is an opaque collaborator: this module owns the request and
//! response contracts, credit gating, and persistence of generated
//! artifacts, and nothing else about what the model does internally.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use cvforge_core::resume::JsonResume;

use crate::credits;
use crate::errors::AppError;
use crate::llm_client::prompts::{
    build_cover_letter_prompt, build_cv_tailoring_prompt, build_job_analysis_prompt,
    COVER_LETTER_SYSTEM, JSON_ONLY_SYSTEM,
};
use crate::llm_client::{LlmClient, LlmError, TokenBudget};
use crate::models::{CoverLetterRow, CvRow};

/// Structured result of analyzing a job description against a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub match_score: i32,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub relevant_experiences: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub keywords_to_include: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJobResponse {
    pub analysis: JobAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCvRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub cv_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_url: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedCvData {
    pub id: Uuid,
    pub name: String,
    pub resume_data: JsonResume,
    pub match_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct GenerateCvResponse {
    pub cv: GeneratedCvData,
    pub analysis: JobAnalysis,
    pub credits_remaining: i32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCoverLetterRequest {
    #[serde(default)]
    pub cv_id: Option<Uuid>,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedCoverLetterData {
    pub id: Uuid,
    pub content: String,
    pub job_title: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct GenerateCoverLetterResponse {
    pub cover_letter: GeneratedCoverLetterData,
    pub credits_remaining: i32,
}

fn llm_err(e: LlmError) -> AppError {
    AppError::Llm(e.to_string())
}

/// Loads the user's profile as pretty JSON for prompting. A missing profile
/// or one without even a name is a validation error, not a 404: the fix is
/// on the caller's side.
async fn profile_json(db: &PgPool, user_id: &str) -> Result<String, AppError> {
    let row = crate::profile::fetch_row(db, user_id)
        .await?
        .ok_or_else(profile_incomplete)?;
    let resume = crate::profile::parse_resume(row.resume_data)?;

    let has_name = resume
        .basics
        .as_ref()
        .map(|b| !b.name.trim().is_empty())
        .unwrap_or(false);
    if !has_name {
        return Err(profile_incomplete());
    }

    serde_json::to_string_pretty(&resume).map_err(|e| AppError::Internal(anyhow::anyhow!(e)))
}

fn profile_incomplete() -> AppError {
    AppError::Validation("please complete your profile before using AI features".to_string())
}

pub async fn analyze_job(
    db: &PgPool,
    llm: &LlmClient,
    user_id: &str,
    job_description: &str,
) -> Result<JobAnalysis, AppError> {
    let profile = profile_json(db, user_id).await?;
    let prompt = build_job_analysis_prompt(&profile, job_description);
    llm.call_json(&prompt, JSON_ONLY_SYSTEM, TokenBudget::Analysis, "job analysis")
        .await
        .map_err(llm_err)
}

/// Analyzes the job, tailors the resume, persists the result as a new CV
/// and consumes one credit.
pub async fn generate_cv(
    db: &PgPool,
    llm: &LlmClient,
    user_id: &str,
    free_limit: i32,
    req: GenerateCvRequest,
) -> Result<GenerateCvResponse, AppError> {
    let before = credits::check_credits(db, user_id, free_limit).await?;
    let profile = profile_json(db, user_id).await?;

    let analysis: JobAnalysis = llm
        .call_json(
            &build_job_analysis_prompt(&profile, &req.job_description),
            JSON_ONLY_SYSTEM,
            TokenBudget::Analysis,
            "job analysis",
        )
        .await
        .map_err(llm_err)?;

    let analysis_json = serde_json::to_string(&analysis)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    let tailored: JsonResume = llm
        .call_json(
            &build_cv_tailoring_prompt(&profile, &req.job_description, &analysis_json),
            JSON_ONLY_SYSTEM,
            TokenBudget::FullResume,
            "tailored resume",
        )
        .await
        .map_err(llm_err)?;

    let name = if !req.cv_name.trim().is_empty() {
        req.cv_name.clone()
    } else if !req.job_title.trim().is_empty() {
        format!("{} CV", req.job_title)
    } else {
        "Tailored CV".to_string()
    };

    let cv_data = serde_json::to_value(&tailored)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    let suggestions: Value = serde_json::to_value(&analysis)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let row: CvRow = sqlx::query_as(
        r#"
        INSERT INTO generated_cvs
            (user_id, name, cv_data, template_id, job_url, job_title,
             company_name, job_description, match_score, ai_suggestions)
        VALUES ($1, $2, $3, 'professional', $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&name)
    .bind(&cv_data)
    .bind(blank_to_null(&req.job_url))
    .bind(blank_to_null(&req.job_title))
    .bind(blank_to_null(&req.company_name))
    .bind(&req.job_description)
    .bind(analysis.match_score)
    .bind(&suggestions)
    .fetch_one(db)
    .await?;

    let credits_remaining = credits::increment_used_logged(db, user_id, &before).await;

    Ok(GenerateCvResponse {
        cv: GeneratedCvData {
            id: row.id,
            name: row.name,
            resume_data: tailored,
            match_score: analysis.match_score,
            job_title: row.job_title,
            company: row.company_name,
            created_at: row.created_at,
        },
        analysis,
        credits_remaining,
    })
}

/// Generates and persists a cover letter. A linked CV, when given, supplies
/// the job description and the tailored summary.
pub async fn generate_cover_letter(
    db: &PgPool,
    llm: &LlmClient,
    user_id: &str,
    free_limit: i32,
    req: GenerateCoverLetterRequest,
) -> Result<GenerateCoverLetterResponse, AppError> {
    let before = credits::check_credits(db, user_id, free_limit).await?;
    let profile = profile_json(db, user_id).await?;

    let mut job_description = req.job_description.trim().to_string();
    let mut cv_summary = String::new();
    let mut linked_cv: Option<Uuid> = None;

    if let Some(cv_id) = req.cv_id {
        // Best effort: a dangling cv_id degrades to an unlinked letter.
        if let Ok(row) = crate::cvs::fetch_row(db, user_id, cv_id).await {
            if job_description.is_empty() {
                if let Some(jd) = &row.job_description {
                    job_description = jd.clone();
                }
            }
            if let Ok(resume) = crate::profile::parse_resume(row.cv_data) {
                if let Some(summary) = resume.basics.and_then(|b| b.summary) {
                    cv_summary = summary;
                }
            }
            linked_cv = Some(row.id);
        }
    }

    if job_description.is_empty() {
        job_description = format!("Position: {} at {}", req.job_title, req.company_name);
    }

    let content = llm
        .call_text(
            &build_cover_letter_prompt(
                &profile,
                &req.job_title,
                &req.company_name,
                &job_description,
                &cv_summary,
            ),
            COVER_LETTER_SYSTEM,
            TokenBudget::Letter,
        )
        .await
        .map_err(llm_err)?;

    let row: CoverLetterRow = sqlx::query_as(
        r#"
        INSERT INTO cover_letters (user_id, cv_id, content, job_title, company_name)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&linked_cv)
    .bind(&content)
    .bind(&req.job_title)
    .bind(&req.company_name)
    .fetch_one(db)
    .await?;

    let credits_remaining = credits::increment_used_logged(db, user_id, &before).await;

    Ok(GenerateCoverLetterResponse {
        cover_letter: GeneratedCoverLetterData {
            id: row.id,
            content,
            job_title: req.job_title,
            company_name: req.company_name,
            cv_id: linked_cv,
            created_at: row.created_at,
        },
        credits_remaining,
    })
}

fn blank_to_null(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_tolerates_missing_arrays() {
        let analysis: JobAnalysis = serde_json::from_str(r#"{"match_score": 70}"#).unwrap();
        assert_eq!(analysis.match_score, 70);
        assert!(analysis.matching_skills.is_empty());
        assert!(analysis.keywords_to_include.is_empty());
    }

    #[test]
    fn test_blank_to_null() {
        assert_eq!(blank_to_null("  "), None);
        assert_eq!(blank_to_null("Acme"), Some("Acme"));
    }
}
