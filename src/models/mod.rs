// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AudioFeatures, MatchCandidate, MatchResult, MatchStrength, MatchThresholds, MatchWeights,
    MusicProfile, ProfileDocument, RankedMatch, ScoringConfigError, ScoringError,
};
pub use requests::{MatchRequest, RankMatchesRequest};
pub use responses::{
    ErrorResponse, HealthResponse, MatchResponse, ProfileSavedResponse, RankMatchesResponse,
};
