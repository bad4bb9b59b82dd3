// Unit tests for Flirtify Match scoring

use flirtify_match::core::{compatibility_reasons, cosine_similarity, normalized_overlap, shared_items};
use flirtify_match::{
    score, AudioFeatures, CompatibilityScorer, MatchStrength, MatchThresholds, MatchWeights,
    MusicProfile, ProfileDocument, ScoringError,
};
use proptest::prelude::*;

fn profile(artists: &[&str], tracks: &[&str], genres: &[&str], audio: Option<[f64; 3]>) -> MusicProfile {
    MusicProfile::new(
        artists.iter().copied(),
        tracks.iter().copied(),
        genres.iter().copied(),
        audio.map(|[d, e, v]| AudioFeatures::new(d, e, v)),
    )
}

fn default_score(p1: &MusicProfile, p2: &MusicProfile) -> flirtify_match::MatchResult {
    score(p1, p2, &MatchWeights::default(), &MatchThresholds::default())
}

#[test]
fn test_cosine_identical_vectors() {
    let a = AudioFeatures::new(0.8, 0.7, 0.6);
    assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
}

#[test]
fn test_cosine_zero_vector() {
    let a = AudioFeatures::new(0.8, 0.7, 0.6);
    let zero = AudioFeatures::new(0.0, 0.0, 0.0);
    assert_eq!(cosine_similarity(&a, &zero), 0.0);
}

#[test]
fn test_shared_items_keep_first_order() {
    let ours = vec!["pop".to_string(), "dance pop".to_string(), "pop rock".to_string()];
    let theirs = vec!["pop rock".to_string(), "pop".to_string()];
    assert_eq!(shared_items(&ours, &theirs), vec!["pop", "pop rock"]);
}

#[test]
fn test_normalized_overlap_empty_list() {
    assert_eq!(normalized_overlap(0, 0), 0.0);
    assert_eq!(normalized_overlap(1, 4), 0.25);
}

#[test]
fn test_determinism() {
    let a = profile(
        &["Taylor Swift", "Ed Sheeran", "Ariana Grande"],
        &["Shake It Off", "Shape of You", "7 Rings"],
        &["pop", "dance pop", "pop rock"],
        Some([0.8, 0.7, 0.6]),
    );
    let b = profile(
        &["Ariana Grande", "Doja Cat", "Taylor Swift"],
        &["7 Rings", "Say So", "Levitating"],
        &["pop", "dance pop", "r&b"],
        Some([0.85, 0.75, 0.7]),
    );

    let first = default_score(&a, &b);
    for _ in 0..10 {
        assert_eq!(default_score(&a, &b), first);
    }
}

#[test]
fn test_empty_overlap_scores_zero() {
    let a = profile(&["Drake"], &["God's Plan"], &["rap"], None);
    let b = profile(&["Adele"], &["Hello"], &["soul"], None);

    let result = default_score(&a, &b);

    assert_eq!(result.score, 0.0);
    assert_eq!(result.strength, MatchStrength::NoMatch);
    assert!(result.shared_artists.is_empty());
    assert!(result.shared_tracks.is_empty());
    assert!(result.shared_genres.is_empty());
    assert!(result.compatibility_reasons.is_empty());
}

#[test]
fn test_self_match_is_perfect() {
    let a = profile(
        &["Taylor Swift", "Ed Sheeran"],
        &["Shake It Off"],
        &["pop"],
        Some([0.8, 0.7, 0.6]),
    );

    let result = default_score(&a, &a);

    assert_eq!(result.score, 100.0);
    assert_eq!(result.strength, MatchStrength::Perfect);
}

#[test]
fn test_score_is_direction_dependent() {
    let a = profile(&["X", "Y"], &["T"], &["G"], Some([0.5, 0.5, 0.5]));
    let b = profile(&["X", "Y", "Z", "W"], &["T"], &["G"], Some([0.5, 0.5, 0.5]));

    let forward = default_score(&a, &b);
    let backward = default_score(&b, &a);

    assert_eq!(forward.score, 100.0);
    // (17.5 + 20 + 35 + 10) * 1.2
    assert!((backward.score - 99.0).abs() < 1e-6, "got {}", backward.score);
    assert_eq!(forward.strength, MatchStrength::Perfect);
    assert_eq!(backward.strength, MatchStrength::Perfect);
}

#[test]
fn test_reason_ordering() {
    let a = profile(&["Drake", "Adele", "Sade"], &["Hotline Bling"], &["rap"], None);
    let b = profile(&["Adele", "Drake"], &["Hotline Bling"], &["soul"], None);

    let result = default_score(&a, &b);

    assert_eq!(
        result.compatibility_reasons,
        vec![
            "You both love Drake, Adele".to_string(),
            "You both have Hotline Bling on repeat".to_string(),
        ]
    );
}

#[test]
fn test_reasons_name_at_most_two_items() {
    let shared = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let reasons = compatibility_reasons(&shared, &[], &[], 0.0);
    assert_eq!(reasons, vec!["You both love a, b".to_string()]);
}

#[test]
fn test_audio_reason_only_with_positive_similarity() {
    let a = profile(&["A"], &["T"], &["G"], Some([0.8, 0.7, 0.6]));
    let b = profile(&["B"], &["U"], &["H"], Some([0.75, 0.8, 0.65]));

    let result = default_score(&a, &b);

    assert_eq!(result.compatibility_reasons.len(), 1);
    assert!(result.compatibility_reasons[0].contains("emotional vibe"));
    assert!(result.score > 11.0 && result.score <= 12.0);
}

#[test]
fn test_malformed_document_missing_genres() {
    let doc = ProfileDocument {
        top_artists: Some(vec!["Drake".to_string()]),
        top_tracks: Some(vec!["God's Plan".to_string()]),
        top_genres: None,
        ..Default::default()
    };

    let scorer = CompatibilityScorer::with_defaults();
    let err = scorer.score_documents(&doc, &doc).unwrap_err();

    assert_eq!(err, ScoringError::MalformedProfile { field: "genres" });
}

#[test]
fn test_malformed_audio_features() {
    let doc: ProfileDocument = serde_json::from_value(serde_json::json!({
        "top_artists": ["Drake"],
        "top_tracks": ["God's Plan"],
        "top_genres": ["rap"],
        "audio_features": {"danceability": 0.5}
    }))
    .unwrap();

    assert_eq!(
        MusicProfile::try_from(&doc).unwrap_err(),
        ScoringError::MalformedProfile { field: "audio_features" }
    );
}

#[test]
fn test_genres_alias_accepted() {
    let doc: ProfileDocument = serde_json::from_value(serde_json::json!({
        "top_artists": ["Drake"],
        "top_tracks": ["God's Plan"],
        "genres": ["rap"],
        "audio_features": [0.5, 0.6, 0.7]
    }))
    .unwrap();

    let profile = MusicProfile::try_from(&doc).unwrap();
    assert_eq!(profile.genres(), ["rap".to_string()]);
    assert!(profile.audio_features().is_some());
}

#[test]
fn test_duplicate_entries_collapse() {
    let a = profile(&["Drake", "Drake"], &["T"], &["G"], None);
    let b = profile(&["Drake"], &["T"], &["G"], None);

    assert_eq!(a.artists().len(), 1);
    assert_eq!(default_score(&a, &b).shared_artists, vec!["Drake".to_string()]);
}

#[test]
fn test_threshold_boundaries() {
    let thresholds = MatchThresholds::default();
    assert_eq!(thresholds.classify(80.0), MatchStrength::Perfect);
    assert_eq!(thresholds.classify(79.99), MatchStrength::Strong);
    assert_eq!(thresholds.classify(60.0), MatchStrength::Strong);
    assert_eq!(thresholds.classify(40.0), MatchStrength::Moderate);
    assert_eq!(thresholds.classify(20.0), MatchStrength::Weak);
    assert_eq!(thresholds.classify(19.99), MatchStrength::NoMatch);
}

fn name_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,2}", 0..6)
}

fn audio() -> impl Strategy<Value = Option<AudioFeatures>> {
    prop::option::of((-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0).prop_map(|(d, e, v)| AudioFeatures::new(d, e, v)))
}

fn arb_profile() -> impl Strategy<Value = MusicProfile> {
    (name_list(), name_list(), name_list(), audio())
        .prop_map(|(artists, tracks, genres, audio)| MusicProfile::new(artists, tracks, genres, audio))
}

proptest! {
    #[test]
    fn prop_score_in_range(a in arb_profile(), b in arb_profile()) {
        let result = default_score(&a, &b);
        prop_assert!(result.score >= 0.0 && result.score <= 100.0);
        prop_assert!(!result.score.is_nan());
    }

    #[test]
    fn prop_strength_matches_thresholds(a in arb_profile(), b in arb_profile()) {
        let result = default_score(&a, &b);
        let expected = MatchThresholds::default().classify(result.score);
        prop_assert_eq!(result.strength, expected);

        let band_ok = match result.strength {
            MatchStrength::Perfect => result.score >= 80.0,
            MatchStrength::Strong => result.score >= 60.0 && result.score < 80.0,
            MatchStrength::Moderate => result.score >= 40.0 && result.score < 60.0,
            MatchStrength::Weak => result.score >= 20.0 && result.score < 40.0,
            MatchStrength::NoMatch => result.score < 20.0,
        };
        prop_assert!(band_ok);
    }

    #[test]
    fn prop_shared_items_belong_to_both(a in arb_profile(), b in arb_profile()) {
        let result = default_score(&a, &b);
        for artist in &result.shared_artists {
            prop_assert!(a.artists().contains(artist) && b.artists().contains(artist));
        }
        prop_assert!(result.compatibility_reasons.len() <= 4);
    }
}
