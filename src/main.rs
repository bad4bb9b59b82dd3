use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use flirtify_match::config::{LoggingSettings, Settings};
use flirtify_match::core::Matcher;
use flirtify_match::routes::{self, AppState};
use flirtify_match::services::{
    AppwriteClient, AppwriteCollections, CacheManager, InMemoryProfileStore, PostgresClient,
    ProfileStore,
};
use std::sync::Arc;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// LOG_LEVEL / LOG_FORMAT override the configured logging section
fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging);

    info!("Starting Flirtify match service...");

    let profiles: Arc<dyn ProfileStore> = match &settings.appwrite {
        Some(appwrite) => {
            let client = AppwriteClient::new(
                appwrite.endpoint.clone(),
                appwrite.api_key.clone(),
                appwrite.project_id.clone(),
                appwrite.database_id.clone(),
                AppwriteCollections {
                    music_profiles: settings.collection.music_profiles.clone(),
                },
            )
            .map_err(|e| startup_error("Failed to create Appwrite client", e))?;
            info!("Appwrite profile store initialized");
            Arc::new(client)
        }
        None => {
            warn!("No Appwrite settings, keeping profiles in memory");
            Arc::new(InMemoryProfileStore::new())
        }
    };

    // Cache is optional - the service works without it
    let cache = match &settings.cache {
        Some(cache_settings) => {
            let ttl = cache_settings.ttl_secs.unwrap_or(300);
            let l1_size = cache_settings.l1_cache_size.unwrap_or(1000);

            match CacheManager::new(&cache_settings.redis_url, l1_size, ttl).await {
                Ok(cache) => {
                    info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_size, ttl);
                    Some(Arc::new(cache))
                }
                Err(e) => {
                    error!("Failed to connect to Redis ({}), running without cache", e);
                    None
                }
            }
        }
        None => None,
    };

    let postgres = match &settings.database {
        Some(db) => {
            let client = PostgresClient::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;
            info!("PostgreSQL match history initialized");
            Some(Arc::new(client))
        }
        None => {
            warn!("No database settings, match history disabled");
            None
        }
    };

    let scorer = settings
        .scoring
        .build_scorer()
        .map_err(|e| startup_error("Invalid scoring configuration", e))?;

    info!(
        "Scorer initialized with weights: {:?}, thresholds: {:?}, boost: {}",
        scorer.weights(),
        scorer.thresholds(),
        scorer.boost()
    );

    let app_state = AppState {
        profiles,
        postgres,
        cache,
        matcher: Matcher::new(scorer, settings.matching.min_score),
        max_limit: settings.matching.max_limit as usize,
        history_limit: settings.matching.history_limit,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
