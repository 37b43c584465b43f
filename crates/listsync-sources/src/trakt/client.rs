use async_trait::async_trait;
use chrono::{Duration, Utc};
use listsync_config::CredentialStore;
use listsync_models::{TraktItem, TraktList};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use crate::error::SourceError;
use crate::http::check_response;
use crate::traits::TrackerDestination;
use crate::trakt::api::{self, TraktEntry};
use crate::trakt::auth;

const TRAKT_API_URL: &str = "https://api.trakt.tv";

#[derive(Debug, Deserialize)]
struct UserProfile {
    ids: UserIds,
}

#[derive(Debug, Deserialize)]
struct UserIds {
    slug: String,
}

pub struct TraktClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    credentials_file: PathBuf,
    access_token: Option<String>,
}

impl TraktClient {
    pub fn new(client_id: String, client_secret: String, credentials_file: PathBuf) -> Self {
        Self {
            client: auth::create_trakt_client(),
            base_url: TRAKT_API_URL.to_string(),
            client_id,
            client_secret,
            credentials_file,
            access_token: None,
        }
    }

    async fn authenticate_with_store(&mut self) -> anyhow::Result<()> {
        let mut cred_store = CredentialStore::new(self.credentials_file.clone());
        cred_store.load()?;

        if let Some(saved_token) = cred_store.get_trakt_access_token() {
            let still_valid = cred_store
                .get_trakt_token_expires()
                .map(|expires_at| expires_at > Utc::now() + Duration::minutes(5))
                .unwrap_or(true);
            if still_valid {
                self.access_token = Some(saved_token.clone());
                match self.user_id().await {
                    Ok(_) => {
                        info!("Using saved Trakt access token");
                        return Ok(());
                    }
                    Err(e) => info!(error = %e, "Saved Trakt token rejected, re-authenticating"),
                }
            } else {
                info!("Trakt access token expired or expiring soon, refreshing");
            }
        }

        let refresh_token = cred_store.get_trakt_refresh_token().map(|s| s.as_str());
        let token_info = auth::authenticate(&self.client_id, &self.client_secret, refresh_token).await?;
        self.access_token = Some(token_info.access_token.clone());

        cred_store.set_trakt_access_token(token_info.access_token);
        cred_store.set_trakt_refresh_token(token_info.refresh_token);
        cred_store.set_trakt_token_expires(token_info.expires_at);
        cred_store.save()?;

        info!("Authenticated to Trakt");
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, SourceError> {
        let access_token = self
            .access_token
            .as_deref()
            .ok_or_else(|| SourceError::Unauthorized("not authenticated to Trakt".to_string()))?;

        Ok(self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", access_token))
            .header("trakt-api-version", "2")
            .header("trakt-api-key", &self.client_id)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json"))
    }

    /// Send once, and once more after the advertised delay if rate limited
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, SourceError> {
        let retry = request.try_clone();
        let result = check_response(request.send().await?, what).await;

        match (result, retry) {
            (Err(SourceError::RateLimited { retry_after_secs }), Some(retry)) => {
                warn!(what, retry_after_secs, "Trakt rate limit hit, waiting before retrying");
                tokio::time::sleep(std::time::Duration::from_secs(retry_after_secs)).await;
                check_response(retry.send().await?, what).await
            }
            (result, _) => result,
        }
    }

    async fn get_items(&self, path: &str, what: &str) -> Result<Vec<TraktItem>, SourceError> {
        let response = self.send(self.request(Method::GET, path)?, what).await?;
        let entries: Vec<TraktEntry> = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("{}: {}", what, e)))?;
        let items: Vec<TraktItem> = entries.into_iter().map(TraktItem::from).collect();
        debug!(what, items = items.len(), "Fetched Trakt items");
        Ok(items)
    }

    async fn post_items(&self, path: &str, items: &[TraktItem], what: &str) -> Result<(), SourceError> {
        let request = self.request(Method::POST, path)?.json(&api::sync_payload(items));
        self.send(request, what).await?;
        debug!(what, items = items.len(), "Posted Trakt items");
        Ok(())
    }
}

fn history_path(item: &TraktItem) -> Result<String, SourceError> {
    match (item.kind(), item.imdb_id()) {
        (Some(kind), Some(imdb_id)) => Ok(format!("/sync/history/{}/{}", kind.plural(), imdb_id)),
        _ => Err(SourceError::Other(anyhow::anyhow!(
            "cannot look up history for an item without kind and IMDb id: {:?}",
            item
        ))),
    }
}

#[async_trait]
impl TrackerDestination for TraktClient {
    fn destination_name(&self) -> &str {
        "trakt"
    }

    async fn authenticate(&mut self) -> Result<(), SourceError> {
        self.authenticate_with_store().await.map_err(SourceError::Other)
    }

    async fn user_id(&self) -> Result<String, SourceError> {
        let response = self.send(self.request(Method::GET, "/users/me")?, "Trakt user").await?;
        let profile: UserProfile = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Trakt user: {}", e)))?;
        Ok(urlencoding::encode(&profile.ids.slug).to_string())
    }

    async fn list_items(&self, user_id: &str, list_id: &str) -> Result<Vec<TraktItem>, SourceError> {
        let path = format!("/users/{}/lists/{}/items", user_id, list_id);
        self.get_items(&path, &format!("Trakt list {}", list_id)).await
    }

    async fn create_list(&self, user_id: &str, name: &str) -> Result<TraktList, SourceError> {
        let path = format!("/users/{}/lists", user_id);
        let payload = serde_json::json!({
            "name": name,
            "privacy": "private"
        });
        let what = format!("create Trakt list {}", name);
        let request = self.request(Method::POST, &path)?.json(&payload);
        let created: TraktList = self
            .send(request, &what)
            .await?
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("{}: {}", what, e)))?;
        debug!(name, slug = %created.ids.slug, "Created Trakt list");
        Ok(created)
    }

    async fn add_list_items(&self, user_id: &str, list_id: &str, items: &[TraktItem]) -> Result<(), SourceError> {
        let path = format!("/users/{}/lists/{}/items", user_id, list_id);
        self.post_items(&path, items, &format!("add to Trakt list {}", list_id)).await
    }

    async fn remove_list_items(&self, user_id: &str, list_id: &str, items: &[TraktItem]) -> Result<(), SourceError> {
        let path = format!("/users/{}/lists/{}/items/remove", user_id, list_id);
        self.post_items(&path, items, &format!("remove from Trakt list {}", list_id)).await
    }

    async fn lists(&self, user_id: &str) -> Result<Vec<TraktList>, SourceError> {
        let path = format!("/users/{}/lists", user_id);
        let response = self.send(self.request(Method::GET, &path)?, "Trakt lists").await?;
        response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Trakt lists: {}", e)))
    }

    async fn delete_list(&self, user_id: &str, list_id: &str) -> Result<(), SourceError> {
        let path = format!("/users/{}/lists/{}", user_id, list_id);
        self.send(self.request(Method::DELETE, &path)?, &format!("delete Trakt list {}", list_id))
            .await?;
        Ok(())
    }

    async fn watchlist_items(&self) -> Result<Vec<TraktItem>, SourceError> {
        self.get_items("/sync/watchlist", "Trakt watchlist").await
    }

    async fn add_watchlist_items(&self, items: &[TraktItem]) -> Result<(), SourceError> {
        self.post_items("/sync/watchlist", items, "add to Trakt watchlist").await
    }

    async fn remove_watchlist_items(&self, items: &[TraktItem]) -> Result<(), SourceError> {
        self.post_items("/sync/watchlist/remove", items, "remove from Trakt watchlist").await
    }

    async fn ratings(&self) -> Result<Vec<TraktItem>, SourceError> {
        self.get_items("/sync/ratings", "Trakt ratings").await
    }

    async fn add_ratings(&self, items: &[TraktItem]) -> Result<(), SourceError> {
        self.post_items("/sync/ratings", items, "add Trakt ratings").await
    }

    async fn remove_ratings(&self, items: &[TraktItem]) -> Result<(), SourceError> {
        self.post_items("/sync/ratings/remove", items, "remove Trakt ratings").await
    }

    async fn history(&self, item: &TraktItem) -> Result<Vec<TraktItem>, SourceError> {
        let path = history_path(item)?;
        self.get_items(&path, "Trakt history").await
    }

    async fn add_history(&self, item: &TraktItem) -> Result<(), SourceError> {
        self.post_items("/sync/history", std::slice::from_ref(item), "add Trakt history").await
    }

    async fn remove_history(&self, item: &TraktItem) -> Result<(), SourceError> {
        self.post_items("/sync/history/remove", std::slice::from_ref(item), "remove Trakt history").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listsync_models::{TraktIds, TraktItemSpec};

    #[test]
    fn test_history_path_uses_plural_kind() {
        let item = TraktItem::Episode(TraktItemSpec {
            ids: TraktIds::imdb("tt0959621"),
            ..TraktItemSpec::default()
        });
        assert_eq!(history_path(&item).unwrap(), "/sync/history/episodes/tt0959621");
    }

    #[test]
    fn test_history_path_rejects_unsupported_item() {
        let item = TraktItem::Unsupported {
            kind: "person".to_string(),
        };
        assert!(history_path(&item).is_err());
    }

    #[tokio::test]
    async fn test_requests_require_a_token() {
        let client = TraktClient::new("id".to_string(), "secret".to_string(), PathBuf::from("unused.toml"));
        let err = client.watchlist_items().await.unwrap_err();
        assert!(matches!(err, SourceError::Unauthorized(_)));
    }
}
