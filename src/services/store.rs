use crate::models::ProfileDocument;
use crate::services::appwrite::AppwriteError;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error(transparent)]
    Appwrite(#[from] AppwriteError),
}

/// Storage for music profile documents, keyed by user id
///
/// A missing user is `Ok(None)`, never an error.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileDocument>, ProfileStoreError>;

    /// Create or replace the document for `user_id`
    async fn put_profile(
        &self,
        user_id: &str,
        profile: &ProfileDocument,
    ) -> Result<(), ProfileStoreError>;

    /// All stored documents as `(user_id, document)` pairs
    async fn list_profiles(&self) -> Result<Vec<(String, ProfileDocument)>, ProfileStoreError>;
}

/// Process-local store used when no document store is configured
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, ProfileDocument>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileDocument>, ProfileStoreError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn put_profile(
        &self,
        user_id: &str,
        profile: &ProfileDocument,
    ) -> Result<(), ProfileStoreError> {
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<(String, ProfileDocument)>, ProfileStoreError> {
        let mut profiles: Vec<(String, ProfileDocument)> = self
            .profiles
            .read()
            .await
            .iter()
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect();
        profiles.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = InMemoryProfileStore::new();
        assert!(store.get_profile("user_pop_1").await.unwrap().is_none());

        let doc = ProfileDocument {
            username: Some("Pop Fan".to_string()),
            top_artists: Some(vec!["Taylor Swift".to_string()]),
            ..ProfileDocument::default()
        };
        store.put_profile("user_pop_1", &doc).await.unwrap();
        store.put_profile("match_1", &ProfileDocument::default()).await.unwrap();

        assert_eq!(store.get_profile("user_pop_1").await.unwrap(), Some(doc));

        let ids: Vec<String> = store
            .list_profiles()
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["match_1", "user_pop_1"]);
    }
}
