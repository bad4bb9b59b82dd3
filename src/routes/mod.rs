// Route exports
pub mod matches;
pub mod users;

use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{CacheManager, PostgresClient, ProfileStore};
use actix_web::{http::StatusCode, web, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub postgres: Option<Arc<PostgresClient>>,
    pub cache: Option<Arc<CacheManager>>,
    pub matcher: Matcher,
    pub max_limit: usize,
    pub history_limit: usize,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(users::configure),
    );
}

pub(crate) fn error_response(
    status: StatusCode,
    error: &str,
    message: impl ToString,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}
