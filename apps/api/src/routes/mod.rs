pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create).get(resumes::handle_list),
        )
        .route("/api/v1/resumes/stats", get(resumes::handle_stats))
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get)
                .patch(resumes::handle_update)
                .delete(resumes::handle_delete),
        )
        .route(
            "/api/v1/resumes/:id/duplicate",
            post(resumes::handle_duplicate),
        )
        // Tailoring API
        .route("/api/v1/tailor", post(tailoring::handle_tailor))
        .route("/api/v1/cover-letter", post(tailoring::handle_cover_letter))
        .with_state(state)
}
