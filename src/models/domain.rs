use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Errors raised while turning stored profile data into scorer input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Malformed profile: missing or invalid field `{field}`")]
    MalformedProfile { field: &'static str },
}

/// Errors raised when a scoring configuration is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringConfigError {
    #[error("Invalid weight for {name}: {value} (must be finite and non-negative)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error(
        "Thresholds must be strictly ascending within [0, 100]: \
         weak={weak}, moderate={moderate}, strong={strong}, perfect={perfect}"
    )]
    InvalidThresholds {
        weak: f64,
        moderate: f64,
        strong: f64,
        perfect: f64,
    },

    #[error("Score boost must be finite and positive, got {0}")]
    InvalidBoost(f64),
}

/// Provider audio descriptors averaged over a user's top tracks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
}

impl AudioFeatures {
    pub fn new(danceability: f64, energy: f64, valence: f64) -> Self {
        Self {
            danceability,
            energy,
            valence,
        }
    }

    /// Components in `(danceability, energy, valence)` order
    #[inline]
    pub fn as_array(&self) -> [f64; 3] {
        [self.danceability, self.energy, self.valence]
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|c| c.is_finite())
    }
}

/// Normalized snapshot of one user's music taste
///
/// The three name lists behave as sets: duplicates are dropped on
/// construction and the first-seen order (the provider's ranking) is kept
/// for display. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicProfile {
    artists: Vec<String>,
    tracks: Vec<String>,
    genres: Vec<String>,
    audio_features: Option<AudioFeatures>,
}

impl MusicProfile {
    pub fn new<A, T, G>(
        artists: A,
        tracks: T,
        genres: G,
        audio_features: Option<AudioFeatures>,
    ) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            artists: dedup_preserving_order(artists),
            tracks: dedup_preserving_order(tracks),
            genres: dedup_preserving_order(genres),
            audio_features,
        }
    }

    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    pub fn tracks(&self) -> &[String] {
        &self.tracks
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn audio_features(&self) -> Option<&AudioFeatures> {
        self.audio_features.as_ref()
    }
}

fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(Into::into)
        .filter(|item: &String| seen.insert(item.clone()))
        .collect()
}

/// Profile record as kept in the document store
///
/// Every field is optional because documents are written by several
/// collaborators over time. Use `MusicProfile::try_from` to validate one
/// before scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_artists: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_tracks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_genres: Option<Vec<String>>,
    /// Written by the profile editor; `top_genres` wins when both are present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_features: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

impl TryFrom<&ProfileDocument> for MusicProfile {
    type Error = ScoringError;

    fn try_from(doc: &ProfileDocument) -> Result<Self, Self::Error> {
        let artists = doc
            .top_artists
            .as_ref()
            .ok_or(ScoringError::MalformedProfile { field: "artists" })?;
        let tracks = doc
            .top_tracks
            .as_ref()
            .ok_or(ScoringError::MalformedProfile { field: "tracks" })?;
        let genres = doc
            .top_genres
            .as_ref()
            .or(doc.genres.as_ref())
            .ok_or(ScoringError::MalformedProfile { field: "genres" })?;
        let audio_features = parse_audio_features(doc.audio_features.as_ref())?;

        Ok(MusicProfile::new(
            artists.iter().cloned(),
            tracks.iter().cloned(),
            genres.iter().cloned(),
            audio_features,
        ))
    }
}

/// Accepts `null`, an empty array/object, `{danceability, energy, valence}`
/// or a three-element array
fn parse_audio_features(value: Option<&Value>) -> Result<Option<AudioFeatures>, ScoringError> {
    let malformed = || ScoringError::MalformedProfile {
        field: "audio_features",
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) if items.is_empty() => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(Value::Array(items)) => {
            if items.len() != 3 {
                return Err(malformed());
            }
            let components: Vec<f64> = items
                .iter()
                .map(Value::as_f64)
                .collect::<Option<_>>()
                .ok_or_else(malformed)?;
            Ok(Some(AudioFeatures::new(
                components[0],
                components[1],
                components[2],
            )))
        }
        Some(Value::Object(map)) => {
            let component = |key: &str| map.get(key).and_then(Value::as_f64).ok_or_else(malformed);
            Ok(Some(AudioFeatures::new(
                component("danceability")?,
                component("energy")?,
                component("valence")?,
            )))
        }
        Some(_) => Err(malformed()),
    }
}

/// Per-category weights; their sum is the highest raw score before boosting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub artist_match: f64,
    pub track_match: f64,
    pub genre_match: f64,
    pub audio_match: f64,
}

impl MatchWeights {
    pub fn total(&self) -> f64 {
        self.artist_match + self.track_match + self.genre_match + self.audio_match
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let named = [
            ("artist_match", self.artist_match),
            ("track_match", self.track_match),
            ("genre_match", self.genre_match),
            ("audio_match", self.audio_match),
        ];

        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringConfigError::InvalidWeight { name, value });
            }
        }

        Ok(())
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            artist_match: 35.0,
            track_match: 20.0,
            genre_match: 35.0,
            audio_match: 10.0,
        }
    }
}

/// Lower cut points of the strength bands on the 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchThresholds {
    pub perfect: f64,
    pub strong: f64,
    pub moderate: f64,
    pub weak: f64,
}

impl MatchThresholds {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let ascending = 0.0 <= self.weak
            && self.weak < self.moderate
            && self.moderate < self.strong
            && self.strong < self.perfect
            && self.perfect <= 100.0;

        if ascending {
            Ok(())
        } else {
            Err(ScoringConfigError::InvalidThresholds {
                weak: self.weak,
                moderate: self.moderate,
                strong: self.strong,
                perfect: self.perfect,
            })
        }
    }

    /// Band lookup; a score equal to a cut point belongs to the higher band
    pub fn classify(&self, score: f64) -> MatchStrength {
        if score >= self.perfect {
            MatchStrength::Perfect
        } else if score >= self.strong {
            MatchStrength::Strong
        } else if score >= self.moderate {
            MatchStrength::Moderate
        } else if score >= self.weak {
            MatchStrength::Weak
        } else {
            MatchStrength::NoMatch
        }
    }
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            perfect: 80.0,
            strong: 60.0,
            moderate: 40.0,
            weak: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStrength {
    Perfect,
    Strong,
    Moderate,
    Weak,
    NoMatch,
}

impl MatchStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrength::Perfect => "PERFECT",
            MatchStrength::Strong => "STRONG",
            MatchStrength::Moderate => "MODERATE",
            MatchStrength::Weak => "WEAK",
            MatchStrength::NoMatch => "NO_MATCH",
        }
    }
}

impl fmt::Display for MatchStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring one profile against another
///
/// The `shared_*` lists carry no ordering guarantee for callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    pub strength: MatchStrength,
    pub shared_artists: Vec<String>,
    pub shared_tracks: Vec<String>,
    pub shared_genres: Vec<String>,
    pub compatibility_reasons: Vec<String>,
}

/// A stored user eligible for ranking
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub user_id: String,
    pub username: Option<String>,
    pub profile: MusicProfile,
}

/// Ranked match entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    #[serde(rename = "matchStrength")]
    pub match_strength: MatchStrength,
    #[serde(rename = "sharedArtists")]
    pub shared_artists: Vec<String>,
    #[serde(rename = "sharedTracks")]
    pub shared_tracks: Vec<String>,
    #[serde(rename = "sharedGenres")]
    pub shared_genres: Vec<String>,
    #[serde(rename = "compatibilityReasons")]
    pub compatibility_reasons: Vec<String>,
}
