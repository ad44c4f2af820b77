//! Wire types mirroring the API's response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cvforge_core::resume::JsonResume;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub resume_data: JsonResume,
    pub completion: u8,
}

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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cv {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub cv_data: JsonResume,
    pub template_id: String,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub match_score: Option<i32>,
    #[serde(default)]
    pub ai_suggestions: Option<JobAnalysis>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvListItem {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub template_id: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub match_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvList {
    pub cvs: Vec<CvListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetter {
    pub id: Uuid,
    pub user_id: String,
    #[serde(default)]
    pub cv_id: Option<Uuid>,
    pub content: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetterList {
    pub cover_letters: Vec<CoverLetter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    pub user_id: String,
    pub free_generations_used: i32,
    pub free_generations_limit: i32,
    pub free_generations_remaining: i32,
    pub paid_credits: i32,
    pub total_generations: i32,
    pub remaining: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeJobResponse {
    pub analysis: JobAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCv {
    pub id: Uuid,
    pub name: String,
    pub resume_data: JsonResume,
    pub match_score: i32,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateCvResponse {
    pub cv: GeneratedCv,
    pub analysis: JobAnalysis,
    pub credits_remaining: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCoverLetter {
    pub id: Uuid,
    pub content: String,
    pub job_title: String,
    pub company_name: String,
    #[serde(default)]
    pub cv_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateCoverLetterResponse {
    pub cover_letter: GeneratedCoverLetter,
    pub credits_remaining: i32,
}

// ─── Request bodies ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateCvRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCvRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_data: Option<JsonResume>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCoverLetterRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateCoverLetterRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeJobRequest {
    pub job_description: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateCvRequest {
    pub job_description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cv_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub job_title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub company_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub job_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateCoverLetterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_id: Option<Uuid>,
    pub job_title: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub job_description: String,
}
