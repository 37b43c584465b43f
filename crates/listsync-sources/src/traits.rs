use async_trait::async_trait;
use listsync_models::{ImdbItem, ImdbList, TraktItem, TraktList};
use crate::error::SourceError;

/// Read-only access to the catalog whose lists and ratings are authoritative
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn authenticate(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    async fn user_id(&self) -> Result<String, SourceError>;
    async fn watchlist_id(&self) -> Result<String, SourceError>;

    /// Ids of every list the user owns, in page order
    async fn list_ids(&self, user_id: &str) -> Result<Vec<String>, SourceError>;

    /// Fails with [`SourceError::NotFound`] when the list does not exist
    async fn list(&self, list_id: &str) -> Result<ImdbList, SourceError>;

    async fn ratings(&self, user_id: &str) -> Result<Vec<ImdbItem>, SourceError>;
}

/// Read/write access to the tracker kept in sync with the catalog
#[async_trait]
pub trait TrackerDestination: Send + Sync {
    fn destination_name(&self) -> &str;

    async fn authenticate(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    async fn user_id(&self) -> Result<String, SourceError>;

    // Custom lists
    /// Fails with [`SourceError::NotFound`] when no list has this slug
    async fn list_items(&self, user_id: &str, list_id: &str) -> Result<Vec<TraktItem>, SourceError>;
    /// Returns the created list; its slug is the id for every later call
    async fn create_list(&self, user_id: &str, name: &str) -> Result<TraktList, SourceError>;
    async fn add_list_items(&self, user_id: &str, list_id: &str, items: &[TraktItem]) -> Result<(), SourceError>;
    async fn remove_list_items(&self, user_id: &str, list_id: &str, items: &[TraktItem]) -> Result<(), SourceError>;
    async fn lists(&self, user_id: &str) -> Result<Vec<TraktList>, SourceError>;
    async fn delete_list(&self, user_id: &str, list_id: &str) -> Result<(), SourceError>;

    // Watchlist
    async fn watchlist_items(&self) -> Result<Vec<TraktItem>, SourceError>;
    async fn add_watchlist_items(&self, items: &[TraktItem]) -> Result<(), SourceError>;
    async fn remove_watchlist_items(&self, items: &[TraktItem]) -> Result<(), SourceError>;

    // Ratings
    async fn ratings(&self) -> Result<Vec<TraktItem>, SourceError>;
    async fn add_ratings(&self, items: &[TraktItem]) -> Result<(), SourceError>;
    async fn remove_ratings(&self, items: &[TraktItem]) -> Result<(), SourceError>;

    // Watch history, one item at a time
    async fn history(&self, item: &TraktItem) -> Result<Vec<TraktItem>, SourceError>;
    async fn add_history(&self, item: &TraktItem) -> Result<(), SourceError>;
    async fn remove_history(&self, item: &TraktItem) -> Result<(), SourceError>;
}
