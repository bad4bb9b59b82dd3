use crate::core::{CompatibilityScorer, DEFAULT_SCORE_BOOST};
use crate::models::{MatchThresholds, MatchWeights, ScoringConfigError};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
///
/// `appwrite`, `database` and `cache` are optional: without them the
/// service keeps profiles in memory, skips match history and runs uncached.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub appwrite: Option<AppwriteSettings>,
    #[serde(default)]
    pub collection: CollectionSettings,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub cache: Option<CacheSettings>,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_music_profiles_collection")]
    pub music_profiles: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            music_profiles: default_music_profiles_collection(),
        }
    }
}

fn default_music_profiles_collection() -> String { "music_profiles".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    #[serde(default)]
    pub min_score: f64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_limit: default_max_limit(),
            min_score: 0.0,
            history_limit: default_history_limit(),
        }
    }
}

fn default_max_limit() -> u16 { 100 }
fn default_history_limit() -> usize { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default = "default_boost")]
    pub boost: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            thresholds: ThresholdsConfig::default(),
            boost: default_boost(),
        }
    }
}

impl ScoringSettings {
    /// Build a validated scorer from these settings
    pub fn build_scorer(&self) -> Result<CompatibilityScorer, ScoringConfigError> {
        let weights = MatchWeights {
            artist_match: self.weights.artist_match,
            track_match: self.weights.track_match,
            genre_match: self.weights.genre_match,
            audio_match: self.weights.audio_match,
        };
        let thresholds = MatchThresholds {
            perfect: self.thresholds.perfect,
            strong: self.thresholds.strong,
            moderate: self.thresholds.moderate,
            weak: self.thresholds.weak,
        };

        CompatibilityScorer::new(weights, thresholds)?.with_boost(self.boost)
    }
}

fn default_boost() -> f64 { DEFAULT_SCORE_BOOST }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_artist_weight")]
    pub artist_match: f64,
    #[serde(default = "default_track_weight")]
    pub track_match: f64,
    #[serde(default = "default_genre_weight")]
    pub genre_match: f64,
    #[serde(default = "default_audio_weight")]
    pub audio_match: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            artist_match: default_artist_weight(),
            track_match: default_track_weight(),
            genre_match: default_genre_weight(),
            audio_match: default_audio_weight(),
        }
    }
}

fn default_artist_weight() -> f64 { 35.0 }
fn default_track_weight() -> f64 { 20.0 }
fn default_genre_weight() -> f64 { 35.0 }
fn default_audio_weight() -> f64 { 10.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_perfect_threshold")]
    pub perfect: f64,
    #[serde(default = "default_strong_threshold")]
    pub strong: f64,
    #[serde(default = "default_moderate_threshold")]
    pub moderate: f64,
    #[serde(default = "default_weak_threshold")]
    pub weak: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            perfect: default_perfect_threshold(),
            strong: default_strong_threshold(),
            moderate: default_moderate_threshold(),
            weak: default_weak_threshold(),
        }
    }
}

fn default_perfect_threshold() -> f64 { 80.0 }
fn default_strong_threshold() -> f64 { 60.0 }
fn default_moderate_threshold() -> f64 { 40.0 }
fn default_weak_threshold() -> f64 { 20.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FLIRTIFY__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FLIRTIFY__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("FLIRTIFY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FLIRTIFY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional un-prefixed variables on top of the loaded config
///
/// `DATABASE_URL` sets `database.url`; `APPWRITE_ENDPOINT`, `APPWRITE_API_KEY`,
/// `APPWRITE_PROJECT_ID` and `APPWRITE_DATABASE_ID` fill the `appwrite` section.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("APPWRITE_ENDPOINT", "appwrite.endpoint"),
        ("APPWRITE_API_KEY", "appwrite.api_key"),
        ("APPWRITE_PROJECT_ID", "appwrite.project_id"),
        ("APPWRITE_DATABASE_ID", "appwrite.database_id"),
        ("REDIS_URL", "cache.redis_url"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
