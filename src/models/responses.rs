use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchResult, MatchStrength, RankedMatch};

/// Response for the pairwise match endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub match_score: f64,
    pub match_strength: MatchStrength,
    pub compatibility_reasons: Vec<String>,
    pub shared_artists: Vec<String>,
    pub shared_genres: Vec<String>,
    pub shared_tracks: Vec<String>,
}

impl From<MatchResult> for MatchResponse {
    fn from(result: MatchResult) -> Self {
        Self {
            match_score: result.score,
            match_strength: result.strength,
            compatibility_reasons: result.compatibility_reasons,
            shared_artists: result.shared_artists,
            shared_genres: result.shared_genres,
            shared_tracks: result.shared_tracks,
        }
    }
}

/// Response for the rank endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankMatchesResponse {
    pub matches: Vec<RankedMatch>,
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Profile write acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSavedResponse {
    pub message: String,
    pub user_id: String,
}
