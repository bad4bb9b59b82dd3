use crate::models::ProfileDocument;
use crate::services::store::{ProfileStore, ProfileStoreError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Documents fetched per list request
const PAGE_SIZE: usize = 100;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Handles all communication with the Appwrite document store:
/// - Fetching a user's music profile document
/// - Creating or replacing profile documents
/// - Listing every stored profile for ranking
///
/// Documents are keyed by user id.
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub music_profiles: String,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collections.music_profiles
        )
    }

    fn document_url(&self, user_id: &str) -> String {
        format!("{}/{}", self.documents_url(), urlencoding::encode(user_id))
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
    }

    /// Fetch one page of profile documents
    async fn list_page(&self, offset: usize) -> Result<(Vec<Value>, u64), AppwriteError> {
        let queries = [
            json!({"method": "limit", "values": [PAGE_SIZE]}).to_string(),
            json!({"method": "offset", "values": [offset]}).to_string(),
        ];

        let response = self
            .authorized(self.client.get(self.documents_url()))
            .query(&[("queries[]", &queries[0]), ("queries[]", &queries[1])])
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(AppwriteError::Unauthorized),
            status if !status.is_success() => {
                return Err(AppwriteError::ApiError(format!(
                    "Failed to list profiles: {}",
                    status
                )));
            }
            _ => {}
        }

        let json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .cloned()
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        Ok((documents, total))
    }
}

/// Split an Appwrite document into its id and profile payload
fn parse_document(doc: &Value) -> Result<(String, ProfileDocument), AppwriteError> {
    let id = doc
        .get("$id")
        .and_then(|id| id.as_str())
        .ok_or_else(|| AppwriteError::InvalidResponse("Document without $id".into()))?
        .to_string();

    let data = doc.get("data").unwrap_or(doc);

    let profile = serde_json::from_value(data.clone()).map_err(|e| {
        AppwriteError::InvalidResponse(format!("Failed to parse profile {}: {}", id, e))
    })?;

    Ok((id, profile))
}

#[async_trait]
impl ProfileStore for AppwriteClient {
    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileDocument>, ProfileStoreError> {
        tracing::debug!("Fetching profile for user: {}", user_id);

        let response = self
            .authorized(self.client.get(self.document_url(user_id)))
            .send()
            .await
            .map_err(AppwriteError::from)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::UNAUTHORIZED => return Err(AppwriteError::Unauthorized.into()),
            status if !status.is_success() => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Failed to fetch profile for {}: {} - {}", user_id, status, body);
                return Err(AppwriteError::ApiError(format!("Failed to fetch profile: {}", status)).into());
            }
            _ => {}
        }

        let json: Value = response.json().await.map_err(AppwriteError::from)?;
        let (_, profile) = parse_document(&json)?;

        Ok(Some(profile))
    }

    async fn put_profile(
        &self,
        user_id: &str,
        profile: &ProfileDocument,
    ) -> Result<(), ProfileStoreError> {
        let payload = json!({ "data": profile });

        let response = self
            .authorized(self.client.put(self.document_url(user_id)))
            .json(&payload)
            .send()
            .await
            .map_err(AppwriteError::from)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(AppwriteError::Unauthorized.into()),
            status if !status.is_success() => {
                return Err(AppwriteError::ApiError(format!("Failed to save profile: {}", status)).into());
            }
            _ => {}
        }

        tracing::debug!("Saved profile document for user: {}", user_id);

        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<(String, ProfileDocument)>, ProfileStoreError> {
        let mut profiles = Vec::new();
        let mut offset = 0;

        loop {
            let (documents, total) = self.list_page(offset).await?;
            let fetched = documents.len();

            for doc in &documents {
                match parse_document(doc) {
                    Ok(entry) => profiles.push(entry),
                    Err(e) => tracing::warn!("Skipping unreadable profile document: {}", e),
                }
            }

            offset += fetched;
            if fetched < PAGE_SIZE || offset as u64 >= total {
                break;
            }
        }

        tracing::debug!("Listed {} profile documents", profiles.len());

        Ok(profiles)
    }
}
