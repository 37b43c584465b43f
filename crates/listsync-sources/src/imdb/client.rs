use async_trait::async_trait;
use listsync_models::{ImdbItem, ImdbList};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_DISPOSITION, COOKIE};
use reqwest::Client;
use std::sync::LazyLock;
use tracing::{debug, info};
use crate::error::SourceError;
use crate::http::check_response;
use crate::imdb::parser;
use crate::traits::CatalogSource;

const IMDB_BASE_URL: &str = "https://www.imdb.com";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Cookie-authenticated IMDb client.
///
/// Account pages are scraped for user, watchlist and list ids; list contents
/// and ratings come from the CSV exports.
pub struct ImdbClient {
    client: Client,
    base_url: String,
}

impl ImdbClient {
    pub fn new(cookie_at_main: &str, cookie_ubid_main: &str) -> Result<Self, SourceError> {
        let cookie = format!("at-main={}; ubid-main={}", cookie_at_main.trim(), cookie_ubid_main.trim());
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&cookie)
                .map_err(|e| SourceError::Other(anyhow::anyhow!("invalid IMDb cookie: {}", e)))?,
        );
        headers.insert("Accept-Language", HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: IMDB_BASE_URL.to_string(),
        })
    }

    async fn get(&self, path: &str, what: &str) -> Result<reqwest::Response, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "IMDb request");
        let response = self.client.get(&url).send().await?;
        check_response(response, what).await
    }
}

#[async_trait]
impl CatalogSource for ImdbClient {
    fn source_name(&self) -> &str {
        "imdb"
    }

    async fn user_id(&self) -> Result<String, SourceError> {
        // /profile redirects to /user/ur…/
        let response = self.get("/profile", "IMDb profile").await?;
        if let Some(id) = find_user_id(response.url().path()) {
            return Ok(id);
        }
        let body = response.text().await?;
        find_user_id(&body).ok_or_else(|| {
            SourceError::Unauthorized("IMDb user id not found, check the session cookies".to_string())
        })
    }

    async fn watchlist_id(&self) -> Result<String, SourceError> {
        let body = self.get("/watchlist", "IMDb watchlist").await?.text().await?;
        find_list_ids(&body)
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::Parse("IMDb watchlist id not found".to_string()))
    }

    async fn list_ids(&self, user_id: &str) -> Result<Vec<String>, SourceError> {
        let path = format!("/user/{}/lists", user_id);
        let body = self.get(&path, "IMDb lists").await?.text().await?;
        let ids = find_list_ids(&body);
        info!(user_id, lists = ids.len(), "Discovered IMDb lists");
        Ok(ids)
    }

    async fn list(&self, list_id: &str) -> Result<ImdbList, SourceError> {
        let path = format!("/list/{}/export", list_id);
        let response = self.get(&path, &format!("IMDb list {}", list_id)).await?;
        let name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_name)
            .unwrap_or_else(|| list_id.to_string());
        let body = response.bytes().await?;
        let items = parser::parse_list_csv(body.as_ref())?;

        debug!(list_id, name = %name, items = items.len(), "Fetched IMDb list");
        Ok(ImdbList {
            id: list_id.to_string(),
            name,
            items,
        })
    }

    async fn ratings(&self, user_id: &str) -> Result<Vec<ImdbItem>, SourceError> {
        let path = format!("/user/{}/ratings/export", user_id);
        let body = self.get(&path, "IMDb ratings").await?.bytes().await?;
        let ratings = parser::parse_ratings_csv(body.as_ref())?;
        info!(user_id, ratings = ratings.len(), "Fetched IMDb ratings");
        Ok(ratings)
    }
}

static USER_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ur\d+").expect("USER_ID_REGEX is a valid regex pattern"));

static LIST_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ls\d{6,}").expect("LIST_ID_REGEX is a valid regex pattern"));

fn find_user_id(haystack: &str) -> Option<String> {
    USER_ID_REGEX.find(haystack).map(|m| m.as_str().to_string())
}

/// Every `ls…` id linked from a page, first occurrence order, no repeats
fn find_list_ids(html: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for m in LIST_ID_REGEX.find_iter(html) {
        if !ids.iter().any(|id| id == m.as_str()) {
            ids.push(m.as_str().to_string());
        }
    }
    ids
}

/// Display name from `attachment; filename="My List.csv"`
fn attachment_name(header: &str) -> Option<String> {
    let raw = header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?;
    let name = raw.trim_matches('"');
    let name = name.strip_suffix(".csv").unwrap_or(name).trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_user_id_in_redirect_path() {
        assert_eq!(find_user_id("/user/ur12345678/"), Some("ur12345678".to_string()));
        assert_eq!(find_user_id("/registration/signin"), None);
    }

    #[test]
    fn test_find_list_ids_dedups_in_order() {
        let html = r#"
            <a href="/list/ls000000002/">Second</a>
            <a href="/list/ls000000001/">First</a>
            <a href="/list/ls000000002/?ref_=x">Second again</a>
            <span>ls12</span>
        "#;
        assert_eq!(find_list_ids(html), vec!["ls000000002", "ls000000001"]);
    }

    #[test]
    fn test_attachment_name() {
        assert_eq!(
            attachment_name(r#"attachment; filename="Date Night.csv""#),
            Some("Date Night".to_string())
        );
        assert_eq!(attachment_name("attachment; filename=Plain.csv"), Some("Plain".to_string()));
        assert_eq!(attachment_name("attachment"), None);
        assert_eq!(attachment_name(r#"attachment; filename=".csv""#), None);
    }
}
