// Service exports
pub mod appwrite;
pub mod cache;
pub mod postgres;
pub mod store;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use postgres::{MatchRecord, PostgresClient, PostgresError};
pub use store::{InMemoryProfileStore, ProfileStore, ProfileStoreError};
