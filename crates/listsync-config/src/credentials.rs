use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

const TRAKT_ACCESS_TOKEN: &str = "trakt_access_token";
const TRAKT_REFRESH_TOKEN: &str = "trakt_refresh_token";
const TRAKT_TOKEN_EXPIRES: &str = "trakt_token_expires";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Flat key/value store persisted as TOML next to the config file
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_trakt_access_token(&self) -> Option<&String> {
        self.get(TRAKT_ACCESS_TOKEN)
    }

    pub fn set_trakt_access_token(&mut self, token: String) {
        self.set(TRAKT_ACCESS_TOKEN.to_string(), token);
    }

    pub fn get_trakt_refresh_token(&self) -> Option<&String> {
        self.get(TRAKT_REFRESH_TOKEN)
    }

    pub fn set_trakt_refresh_token(&mut self, token: String) {
        self.set(TRAKT_REFRESH_TOKEN.to_string(), token);
    }

    /// Expiry is stored as RFC 3339; an unparseable value reads as absent
    pub fn get_trakt_token_expires(&self) -> Option<DateTime<Utc>> {
        self.get(TRAKT_TOKEN_EXPIRES)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn set_trakt_token_expires(&mut self, expires_at: DateTime<Utc>) {
        self.set(TRAKT_TOKEN_EXPIRES.to_string(), expires_at.to_rfc3339());
    }

    /// Drop every stored Trakt token
    pub fn clear_trakt(&mut self) {
        self.remove(TRAKT_ACCESS_TOKEN);
        self.remove(TRAKT_REFRESH_TOKEN);
        self.remove(TRAKT_TOKEN_EXPIRES);
    }
}
