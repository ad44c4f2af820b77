//! HTTP layer: every call resolves to a tri-state `ApiResponse`.
//!
//! Callers must check `error` before trusting `data`. Transport failures
//! surface as status 0; a 401 is replaced by a fixed message instead of
//! whatever the server sent.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use cvforge_core::resume::{JsonResume, SectionId};
use cvforge_core::render::ThemeId;

use crate::types::*;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized - please sign in again";

/// Supplies the bearer token for each request. Injected at construction so
/// the identity provider is an explicit dependency, not ambient state.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// `None` means "not signed in": the request goes out unauthenticated.
    async fn token(&self) -> Option<String>;
}

/// Fixed-token provider for tests and server-to-server use.
pub struct StaticTokenProvider(pub Option<String>);

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Tri-state request result: `data` xor `error`, plus the HTTP status
/// (0 when the request never produced a response).
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: u16,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, status: u16) -> Self {
        Self {
            data: Some(data),
            error: None,
            status,
        }
    }

    pub fn err(error: impl Into<String>, status: u16) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Transport failures are the only retryable class of error.
    pub fn is_transport_failure(&self) -> bool {
        self.status == 0
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{method} {url}");
        let mut request = self.http.request(method, &url);
        if let Some(token) = self.tokens.token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> ApiResponse<T> {
        let response = match self.send(method, path, body).await {
            Ok(r) => r,
            Err(e) => return ApiResponse::err(e.to_string(), 0),
        };
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            return ApiResponse::err(UNAUTHORIZED_MESSAGE, status.as_u16());
        }
        if !status.is_success() {
            return ApiResponse::err(extract_error_message(&text), status.as_u16());
        }
        match serde_json::from_str(&text) {
            Ok(data) => ApiResponse::ok(data, status.as_u16()),
            Err(e) => ApiResponse::err(format!("failed to parse response: {e}"), status.as_u16()),
        }
    }

    /// For endpoints whose success body is empty or irrelevant.
    async fn request_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> ApiResponse<()> {
        let response = match self.send(method, path, body).await {
            Ok(r) => r,
            Err(e) => return ApiResponse::err(e.to_string(), 0),
        };
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return ApiResponse::err(UNAUTHORIZED_MESSAGE, status.as_u16());
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return ApiResponse::err(extract_error_message(&text), status.as_u16());
        }
        ApiResponse::ok((), status.as_u16())
    }

    const NO_BODY: Option<&'static ()> = None;

    // ── Profile ─────────────────────────────────────────────────────────

    pub async fn get_profile(&self) -> ApiResponse<Profile> {
        self.request(Method::GET, "/api/profile", Self::NO_BODY).await
    }

    pub async fn update_profile(&self, resume: &JsonResume) -> ApiResponse<Profile> {
        let body = serde_json::json!({ "resume_data": resume });
        self.request(Method::PUT, "/api/profile", Some(&body)).await
    }

    pub async fn update_profile_section(
        &self,
        section: SectionId,
        data: &serde_json::Value,
    ) -> ApiResponse<Profile> {
        self.request(
            Method::PATCH,
            &format!("/api/profile/{section}"),
            Some(data),
        )
        .await
    }

    pub async fn delete_profile(&self) -> ApiResponse<()> {
        self.request_unit(Method::DELETE, "/api/profile", Self::NO_BODY)
            .await
    }

    // ── CVs ─────────────────────────────────────────────────────────────

    pub async fn list_cvs(&self, page: Option<i64>, page_size: Option<i64>) -> ApiResponse<CvList> {
        let mut path = "/api/cvs".to_string();
        let mut sep = '?';
        if let Some(page) = page {
            path.push_str(&format!("{sep}page={page}"));
            sep = '&';
        }
        if let Some(page_size) = page_size {
            path.push_str(&format!("{sep}page_size={page_size}"));
        }
        self.request(Method::GET, &path, Self::NO_BODY).await
    }

    pub async fn get_cv(&self, id: Uuid) -> ApiResponse<Cv> {
        self.request(Method::GET, &format!("/api/cvs/{id}"), Self::NO_BODY)
            .await
    }

    pub async fn create_cv(&self, req: &CreateCvRequest) -> ApiResponse<Cv> {
        self.request(Method::POST, "/api/cvs", Some(req)).await
    }

    pub async fn update_cv(&self, id: Uuid, req: &UpdateCvRequest) -> ApiResponse<Cv> {
        self.request(Method::PUT, &format!("/api/cvs/{id}"), Some(req))
            .await
    }

    pub async fn delete_cv(&self, id: Uuid) -> ApiResponse<()> {
        self.request_unit(Method::DELETE, &format!("/api/cvs/{id}"), Self::NO_BODY)
            .await
    }

    pub async fn duplicate_cv(&self, id: Uuid) -> ApiResponse<Cv> {
        self.request(
            Method::POST,
            &format!("/api/cvs/{id}/duplicate"),
            Self::NO_BODY,
        )
        .await
    }

    /// Fetches server-rendered HTML for a CV.
    pub async fn render_cv(
        &self,
        id: Uuid,
        theme: Option<ThemeId>,
        hide: &[SectionId],
    ) -> ApiResponse<String> {
        let mut path = format!("/api/cvs/{id}/render");
        let mut sep = '?';
        if let Some(theme) = theme {
            path.push_str(&format!("{sep}theme={theme}"));
            sep = '&';
        }
        if !hide.is_empty() {
            let list = hide
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(",");
            path.push_str(&format!("{sep}hide={list}"));
        }

        let response = match self.send(Method::GET, &path, Self::NO_BODY).await {
            Ok(r) => r,
            Err(e) => return ApiResponse::err(e.to_string(), 0),
        };
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            return ApiResponse::err(UNAUTHORIZED_MESSAGE, status.as_u16());
        }
        if !status.is_success() {
            return ApiResponse::err(extract_error_message(&text), status.as_u16());
        }
        ApiResponse::ok(text, status.as_u16())
    }

    // ── Cover letters ───────────────────────────────────────────────────

    pub async fn list_cover_letters(&self) -> ApiResponse<CoverLetterList> {
        self.request(Method::GET, "/api/cover-letters", Self::NO_BODY)
            .await
    }

    pub async fn get_cover_letter(&self, id: Uuid) -> ApiResponse<CoverLetter> {
        self.request(
            Method::GET,
            &format!("/api/cover-letters/{id}"),
            Self::NO_BODY,
        )
        .await
    }

    pub async fn create_cover_letter(
        &self,
        req: &CreateCoverLetterRequest,
    ) -> ApiResponse<CoverLetter> {
        self.request(Method::POST, "/api/cover-letters", Some(req))
            .await
    }

    pub async fn update_cover_letter(
        &self,
        id: Uuid,
        req: &UpdateCoverLetterRequest,
    ) -> ApiResponse<CoverLetter> {
        self.request(Method::PUT, &format!("/api/cover-letters/{id}"), Some(req))
            .await
    }

    pub async fn delete_cover_letter(&self, id: Uuid) -> ApiResponse<()> {
        self.request_unit(
            Method::DELETE,
            &format!("/api/cover-letters/{id}"),
            Self::NO_BODY,
        )
        .await
    }

    // ── Credits and AI ──────────────────────────────────────────────────

    pub async fn get_credits(&self) -> ApiResponse<Credits> {
        self.request(Method::GET, "/api/credits", Self::NO_BODY).await
    }

    pub async fn analyze_job(&self, req: &AnalyzeJobRequest) -> ApiResponse<AnalyzeJobResponse> {
        self.request(Method::POST, "/api/ai/analyze-job", Some(req))
            .await
    }

    pub async fn generate_cv(&self, req: &GenerateCvRequest) -> ApiResponse<GenerateCvResponse> {
        self.request(Method::POST, "/api/ai/generate-cv", Some(req))
            .await
    }

    pub async fn generate_cover_letter(
        &self,
        req: &GenerateCoverLetterRequest,
    ) -> ApiResponse<GenerateCoverLetterResponse> {
        self.request(Method::POST, "/api/ai/generate-cover-letter", Some(req))
            .await
    }
}

/// Pulls a human-readable message out of an error body. The API wraps
/// errors as `{"error": {"code", "message"}}`; other services may use
/// `{"message"}` or a bare string.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value
            .pointer("/error/message")
            .or_else(|| value.get("message"))
            .or_else(|| value.get("error"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        "request failed".to_string()
    } else {
        body.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_envelope() {
        let body = r#"{"error":{"code":"NOT_FOUND","message":"cv abc not found"}}"#;
        assert_eq!(extract_error_message(body), "cv abc not found");
    }

    #[test]
    fn test_extract_error_message_flat_and_fallback() {
        assert_eq!(extract_error_message(r#"{"message":"nope"}"#), "nope");
        assert_eq!(extract_error_message(r#"{"error":"bad"}"#), "bad");
        assert_eq!(extract_error_message("garbage"), "garbage");
        assert_eq!(extract_error_message(""), "request failed");
    }

    #[test]
    fn test_response_states() {
        let ok: ApiResponse<u8> = ApiResponse::ok(1, 200);
        assert!(ok.is_ok() && !ok.is_transport_failure());

        let err: ApiResponse<u8> = ApiResponse::err("boom", 500);
        assert!(!err.is_ok() && !err.is_transport_failure());

        let transport: ApiResponse<u8> = ApiResponse::err("connection refused", 0);
        assert!(transport.is_transport_failure());
    }
}
