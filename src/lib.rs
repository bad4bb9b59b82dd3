//! Flirtify Match - music-taste compatibility service for the Flirtify app
//!
//! This library provides the compatibility scoring engine that pairs users
//! by their top artists, tracks, genres and audio features, plus the thin
//! service layer (document store, match history, cache, HTTP routes) around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{score, score_documents, CompatibilityScorer, Matcher};
pub use models::{
    AudioFeatures, MatchResult, MatchStrength, MatchThresholds, MatchWeights, MusicProfile,
    ProfileDocument, ScoringError,
};
