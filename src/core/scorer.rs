use crate::core::{
    overlap::{normalized_overlap, shared_items},
    reasons::compatibility_reasons,
    similarity::cosine_similarity,
};
use crate::models::{
    MatchResult, MatchThresholds, MatchWeights, MusicProfile, ProfileDocument, ScoringConfigError,
    ScoringError,
};

/// Multiplier applied to the raw weighted total before clamping
///
/// Normalized sub-scores rarely reach their full weight, so the raw total
/// is lifted by this factor. Tunable through `CompatibilityScorer::with_boost`.
pub const DEFAULT_SCORE_BOOST: f64 = 1.2;

/// Upper bound of the final score
pub const MAX_SCORE: f64 = 100.0;

/// Weighted per-category contributions before boosting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub artist: f64,
    pub track: f64,
    pub genre: f64,
    pub audio: f64,
}

impl ScoreBreakdown {
    pub fn raw_total(&self) -> f64 {
        self.artist + self.track + self.genre + self.audio
    }
}

/// Items found in both profiles, in the first profile's order
struct SharedLists {
    artists: Vec<String>,
    tracks: Vec<String>,
    genres: Vec<String>,
}

/// Pairwise music-taste compatibility scorer
///
/// Scoring formula:
/// raw = (
///     |artists1 ∩ artists2| / max(|artists1|, 1) * artist_match +
///     |tracks1 ∩ tracks2|   / max(|tracks1|, 1)  * track_match +
///     |genres1 ∩ genres2|   / max(|genres1|, 1)  * genre_match +
///     cosine(audio1, audio2)                     * audio_match
/// )
/// score = clamp(raw * boost, 0, 100)
///
/// Overlaps are normalized by the first profile's set sizes, so
/// `score(a, b)` and `score(b, a)` differ when the sets differ in size.
/// Stateless apart from its configuration; safe to share across threads.
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    weights: MatchWeights,
    thresholds: MatchThresholds,
    boost: f64,
}

impl CompatibilityScorer {
    pub fn new(
        weights: MatchWeights,
        thresholds: MatchThresholds,
    ) -> Result<Self, ScoringConfigError> {
        weights.validate()?;
        thresholds.validate()?;

        Ok(Self {
            weights,
            thresholds,
            boost: DEFAULT_SCORE_BOOST,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            weights: MatchWeights::default(),
            thresholds: MatchThresholds::default(),
            boost: DEFAULT_SCORE_BOOST,
        }
    }

    pub fn with_boost(mut self, boost: f64) -> Result<Self, ScoringConfigError> {
        if !boost.is_finite() || boost <= 0.0 {
            return Err(ScoringConfigError::InvalidBoost(boost));
        }
        self.boost = boost;
        Ok(self)
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    pub fn boost(&self) -> f64 {
        self.boost
    }

    /// Compact, colon-free description of the configuration
    ///
    /// Two scorers with equal fingerprints produce equal results, so it is
    /// safe to use as part of a cache key.
    pub fn fingerprint(&self) -> String {
        let w = &self.weights;
        let t = &self.thresholds;
        format!(
            "w{}/{}/{}/{}-t{}/{}/{}/{}-b{}",
            w.artist_match,
            w.track_match,
            w.genre_match,
            w.audio_match,
            t.perfect,
            t.strong,
            t.moderate,
            t.weak,
            self.boost
        )
    }

    /// Weighted contributions of each category for `profile1` against `profile2`
    pub fn breakdown(&self, profile1: &MusicProfile, profile2: &MusicProfile) -> ScoreBreakdown {
        self.evaluate(profile1, profile2).1
    }

    /// Score `profile1` against `profile2`
    pub fn score(&self, profile1: &MusicProfile, profile2: &MusicProfile) -> MatchResult {
        let (shared, breakdown) = self.evaluate(profile1, profile2);

        let score = self.finalize(breakdown.raw_total());
        let strength = self.thresholds.classify(score);
        let compatibility_reasons =
            compatibility_reasons(&shared.artists, &shared.genres, &shared.tracks, breakdown.audio);

        MatchResult {
            score,
            strength,
            shared_artists: shared.artists,
            shared_tracks: shared.tracks,
            shared_genres: shared.genres,
            compatibility_reasons,
        }
    }

    /// Validate two stored documents and score them
    pub fn score_documents(
        &self,
        doc1: &ProfileDocument,
        doc2: &ProfileDocument,
    ) -> Result<MatchResult, ScoringError> {
        let profile1 = MusicProfile::try_from(doc1)?;
        let profile2 = MusicProfile::try_from(doc2)?;

        Ok(self.score(&profile1, &profile2))
    }

    fn evaluate(&self, profile1: &MusicProfile, profile2: &MusicProfile) -> (SharedLists, ScoreBreakdown) {
        let shared = SharedLists {
            artists: shared_items(profile1.artists(), profile2.artists()),
            tracks: shared_items(profile1.tracks(), profile2.tracks()),
            genres: shared_items(profile1.genres(), profile2.genres()),
        };

        let breakdown = ScoreBreakdown {
            artist: normalized_overlap(shared.artists.len(), profile1.artists().len())
                * self.weights.artist_match,
            track: normalized_overlap(shared.tracks.len(), profile1.tracks().len())
                * self.weights.track_match,
            genre: normalized_overlap(shared.genres.len(), profile1.genres().len())
                * self.weights.genre_match,
            audio: self.audio_score(profile1, profile2),
        };

        (shared, breakdown)
    }

    #[inline]
    fn audio_score(&self, profile1: &MusicProfile, profile2: &MusicProfile) -> f64 {
        match (profile1.audio_features(), profile2.audio_features()) {
            (Some(a), Some(b)) => cosine_similarity(a, b) * self.weights.audio_match,
            _ => 0.0,
        }
    }

    #[inline]
    fn finalize(&self, raw_total: f64) -> f64 {
        let boosted = raw_total * self.boost;
        if boosted.is_nan() {
            return 0.0;
        }
        boosted.clamp(0.0, MAX_SCORE)
    }
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Score two profiles with explicit weights and thresholds and the default boost
///
/// Weights and thresholds are used as given; validate them first when they
/// come from untrusted configuration.
pub fn score(
    profile1: &MusicProfile,
    profile2: &MusicProfile,
    weights: &MatchWeights,
    thresholds: &MatchThresholds,
) -> MatchResult {
    CompatibilityScorer {
        weights: *weights,
        thresholds: *thresholds,
        boost: DEFAULT_SCORE_BOOST,
    }
    .score(profile1, profile2)
}

/// Document-level variant of [`score`]; reports `MalformedProfile` for
/// documents missing a required list
pub fn score_documents(
    doc1: &ProfileDocument,
    doc2: &ProfileDocument,
    weights: &MatchWeights,
    thresholds: &MatchThresholds,
) -> Result<MatchResult, ScoringError> {
    let profile1 = MusicProfile::try_from(doc1)?;
    let profile2 = MusicProfile::try_from(doc2)?;

    Ok(score(&profile1, &profile2, weights, thresholds))
}
