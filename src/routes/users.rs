use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use crate::models::{ProfileDocument, ProfileSavedResponse};
use crate::routes::{error_response, AppState};

/// Configure profile document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/users", web::get().to(list_users))
        .route("/users/{user_id}", web::get().to(get_user))
        .route("/users/{user_id}", web::post().to(save_user));
}

/// GET /api/v1/users/{user_id}
async fn get_user(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    match state.profiles.get_profile(&user_id).await {
        Ok(Some(doc)) => HttpResponse::Ok().json(doc),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "User not found",
            format!("No profile for user {}", user_id),
        ),
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch profile", e)
        }
    }
}

/// Create or replace a user's profile document
///
/// POST /api/v1/users/{user_id}
///
/// The document is stored as given; incomplete documents are accepted here
/// and rejected only when scored.
async fn save_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ProfileDocument>,
) -> impl Responder {
    let user_id = path.into_inner();
    let mut doc = body.into_inner();

    if doc.spotify_id.is_none() {
        doc.spotify_id = Some(user_id.clone());
    }
    doc.last_updated = Some(chrono::Utc::now());

    if let Err(e) = state.profiles.put_profile(&user_id, &doc).await {
        tracing::error!("Failed to save profile for {}: {}", user_id, e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save profile", e);
    }

    // Cached pair results for this user are stale now
    if let Some(cache) = &state.cache {
        if let Err(e) = cache.invalidate_user(&user_id).await {
            tracing::warn!("Failed to invalidate cached matches for {}: {}", user_id, e);
        }
    }

    tracing::info!("Saved profile for user {}", user_id);

    HttpResponse::Ok().json(ProfileSavedResponse {
        message: "User profile updated successfully".to_string(),
        user_id,
    })
}

/// GET /api/v1/users
async fn list_users(state: web::Data<AppState>) -> impl Responder {
    match state.profiles.list_profiles().await {
        Ok(profiles) => {
            let body: Vec<serde_json::Value> = profiles
                .into_iter()
                .map(|(user_id, doc)| serde_json::json!({ "userId": user_id, "profile": doc }))
                .collect();
            HttpResponse::Ok().json(body)
        }
        Err(e) => {
            tracing::error!("Failed to list profiles: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list profiles", e)
        }
    }
}
