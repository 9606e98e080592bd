use std::sync::Arc;

use crate::resumes::ResumeRepository;
use crate::tailoring::TailoringService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres in production, in-memory for tests and `STORAGE=memory`.
    pub resumes: Arc<dyn ResumeRepository>,
    pub tailor: Arc<dyn TailoringService>,
}
