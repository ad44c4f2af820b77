pub mod health;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::ai::handlers as ai_handlers;
use crate::auth::require_auth;
use crate::cover_letters::handlers as cover_letter_handlers;
use crate::credits;
use crate::cvs::handlers as cv_handlers;
use crate::profile::handlers as profile_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        // Master profile
        .route(
            "/api/profile",
            get(profile_handlers::handle_get_profile)
                .put(profile_handlers::handle_update_profile)
                .delete(profile_handlers::handle_delete_profile),
        )
        .route(
            "/api/profile/:section",
            patch(profile_handlers::handle_update_section),
        )
        // Generated CVs
        .route(
            "/api/cvs",
            get(cv_handlers::handle_list_cvs).post(cv_handlers::handle_create_cv),
        )
        .route(
            "/api/cvs/:id",
            get(cv_handlers::handle_get_cv)
                .put(cv_handlers::handle_update_cv)
                .delete(cv_handlers::handle_delete_cv),
        )
        .route("/api/cvs/:id/duplicate", post(cv_handlers::handle_duplicate_cv))
        .route("/api/cvs/:id/render", get(cv_handlers::handle_render_cv))
        // Cover letters
        .route(
            "/api/cover-letters",
            get(cover_letter_handlers::handle_list_cover_letters)
                .post(cover_letter_handlers::handle_create_cover_letter),
        )
        .route(
            "/api/cover-letters/:id",
            get(cover_letter_handlers::handle_get_cover_letter)
                .put(cover_letter_handlers::handle_update_cover_letter)
                .delete(cover_letter_handlers::handle_delete_cover_letter),
        )
        // Credits
        .route("/api/credits", get(credits::handle_get_credits))
        // AI
        .route("/api/ai/analyze-job", post(ai_handlers::handle_analyze_job))
        .route("/api/ai/generate-cv", post(ai_handlers::handle_generate_cv))
        .route(
            "/api/ai/generate-cover-letter",
            post(ai_handlers::handle_generate_cover_letter),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/health", get(health::health_handler))
        .merge(protected)
        .with_state(state)
}
