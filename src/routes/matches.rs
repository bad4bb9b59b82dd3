use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    HealthResponse, MatchCandidate, MatchRequest, MatchResponse, MatchResult, MusicProfile,
    RankMatchesRequest, RankMatchesResponse,
};
use crate::routes::{error_response, AppState};
use crate::services::CacheKey;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match", web::post().to(match_users))
        .route("/matches/rank", web::post().to(rank_matches))
        .route("/matches/history", web::get().to(get_match_history));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = match &state.postgres {
        Some(postgres) => postgres.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Pairwise match endpoint
///
/// POST /api/v1/match
///
/// Request body:
/// ```json
/// {
///   "user1_spotify_id": "string",
///   "user2_spotify_id": "string"
/// }
/// ```
///
/// The score is direction-dependent: overlaps are normalized by user 1's
/// list sizes.
async fn match_users(
    state: web::Data<AppState>,
    req: web::Json<MatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let user1_id = &req.user1_spotify_id;
    let user2_id = &req.user2_spotify_id;
    let scorer = state.matcher.scorer();
    let cache_key = CacheKey::pair_match(&scorer.fingerprint(), user1_id, user2_id);

    let cached = match &state.cache {
        Some(cache) => match cache.get::<MatchResult>(&cache_key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!("Cache lookup failed for {}: {}", cache_key, e);
                None
            }
        },
        None => None,
    };

    let result = match cached {
        Some(result) => {
            tracing::debug!("Serving cached match {} -> {}", user1_id, user2_id);
            result
        }
        None => {
            let result = match score_pair(&state, user1_id, user2_id).await {
                Ok(result) => result,
                Err(response) => return response,
            };

            if let Some(cache) = &state.cache {
                if let Err(e) = cache.set(&cache_key, &result).await {
                    tracing::warn!("Failed to cache match {}: {}", cache_key, e);
                }
            }

            result
        }
    };

    tracing::info!(
        "Matched {} -> {}: {:.1} ({})",
        user1_id,
        user2_id,
        result.score,
        result.strength
    );

    // Every answered request lands in history; a failed write does not fail it
    if let Some(postgres) = &state.postgres {
        if let Err(e) = postgres.record_match(user1_id, user2_id, &result).await {
            tracing::warn!("Failed to record match {} -> {}: {}", user1_id, user2_id, e);
        }
    }

    HttpResponse::Ok().json(MatchResponse::from(result))
}

/// Fetch both documents and score them, mapping failures to error responses
async fn score_pair(
    state: &AppState,
    user1_id: &str,
    user2_id: &str,
) -> Result<MatchResult, HttpResponse> {
    let (doc1, doc2) = match tokio::try_join!(
        state.profiles.get_profile(user1_id),
        state.profiles.get_profile(user2_id),
    ) {
        Ok((Some(doc1), Some(doc2))) => (doc1, doc2),
        Ok(_) => {
            return Err(error_response(
                StatusCode::NOT_FOUND,
                "User not found",
                "One or both users not found",
            ));
        }
        Err(e) => {
            tracing::error!("Failed to fetch profiles for {} / {}: {}", user1_id, user2_id, e);
            return Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch user profiles",
                e,
            ));
        }
    };

    state
        .matcher
        .scorer()
        .score_documents(&doc1, &doc2)
        .map_err(|e| {
            tracing::info!("Cannot score {} -> {}: {}", user1_id, user2_id, e);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, "Profile incomplete", e)
        })
}

/// Rank all stored users against one user
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 20
/// }
/// ```
async fn rank_matches(
    state: web::Data<AppState>,
    req: web::Json<RankMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let user_id = &req.user_id;
    let limit = (req.limit as usize).min(state.max_limit);

    tracing::info!("Ranking matches for user: {}, limit: {}", user_id, limit);

    let seeker = match state.profiles.get_profile(user_id).await {
        Ok(Some(doc)) => match MusicProfile::try_from(&doc) {
            Ok(profile) => profile,
            Err(e) => {
                return error_response(StatusCode::UNPROCESSABLE_ENTITY, "Profile incomplete", e);
            }
        },
        Ok(None) => {
            return error_response(
                StatusCode::NOT_FOUND,
                "User not found",
                format!("No profile for user {}", user_id),
            );
        }
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch user profile",
                e,
            );
        }
    };

    let documents = match state.profiles.list_profiles().await {
        Ok(documents) => documents,
        Err(e) => {
            tracing::error!("Failed to list profiles: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list profiles",
                e,
            );
        }
    };

    let candidates: Vec<MatchCandidate> = documents
        .into_iter()
        .filter_map(|(candidate_id, doc)| match MusicProfile::try_from(&doc) {
            Ok(profile) => Some(MatchCandidate {
                user_id: candidate_id,
                username: doc.username,
                profile,
            }),
            Err(e) => {
                tracing::debug!("Skipping candidate {}: {}", candidate_id, e);
                None
            }
        })
        .collect();

    let result = state.matcher.rank(user_id, &seeker, candidates, limit);

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates)",
        result.matches.len(),
        user_id,
        result.total_candidates
    );

    HttpResponse::Ok().json(RankMatchesResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
    })
}

/// Get persisted match results for a user
///
/// GET /api/v1/matches/history?userId={userId}
async fn get_match_history(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let user_id = match query.get("userId") {
        Some(id) if !id.is_empty() => id,
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Missing userId parameter",
                "userId query parameter is required",
            );
        }
    };

    let postgres = match &state.postgres {
        Some(postgres) => postgres,
        None => {
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Match history disabled",
                "No database is configured",
            );
        }
    };

    match postgres.get_match_history(user_id, state.history_limit).await {
        Ok(history) => HttpResponse::Ok().json(serde_json::json!({
            "userId": user_id,
            "matches": history,
            "count": history.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch match history for {}: {}", user_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch match history",
                e,
            )
        }
    }
}
