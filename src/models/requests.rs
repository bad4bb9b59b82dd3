use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to score two stored users against each other
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user1SpotifyId")]
    pub user1_spotify_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "user2SpotifyId")]
    pub user2_spotify_id: String,
}

/// Request to rank all stored users against one user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1))]
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_request_defaults() {
        let req: RankMatchesRequest = serde_json::from_str(r#"{"userId": "user_pop_1"}"#).unwrap();
        assert_eq!(req.limit, 20);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_match_request_rejects_empty_ids() {
        let req = MatchRequest {
            user1_spotify_id: String::new(),
            user2_spotify_id: "match_1".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
