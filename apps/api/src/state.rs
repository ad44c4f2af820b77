use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Absent when no API key is configured; AI routes answer 503.
    pub llm: Option<LlmClient>,
    pub config: Config,
    /// Injected token verifier so auth is an explicit dependency.
    pub verifier: Arc<dyn TokenVerifier>,
}
