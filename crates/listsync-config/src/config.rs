use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::selection::ListSelection;

const PLACEHOLDER_CLIENT_ID: &str = "YOUR_CLIENT_ID";
const PLACEHOLDER_CLIENT_SECRET: &str = "YOUR_CLIENT_SECRET";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub imdb: ImdbConfig,
    pub trakt: TraktConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub scheduler: Option<SchedulerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImdbConfig {
    /// Value of the `at-main` session cookie
    pub cookie_at_main: String,
    /// Value of the `ubid-main` session cookie
    pub cookie_ubid_main: String,
    #[serde(default)]
    pub lists: ListSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_schedule")]
    pub schedule: String,
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

fn default_true() -> bool {
    true
}

fn default_schedule() -> String {
    "0 0 */12 * * *".to_string() // Every 12 hours (sec min hour day month weekday)
}

pub fn default_scheduler_config() -> SchedulerConfig {
    SchedulerConfig {
        schedule: default_schedule(),
        run_on_startup: default_true(),
    }
}

impl Config {
    /// Template written by `listsync config init`
    pub fn template() -> Self {
        Self {
            imdb: ImdbConfig {
                cookie_at_main: String::new(),
                cookie_ubid_main: String::new(),
                lists: ListSelection::All,
            },
            trakt: TraktConfig {
                client_id: PLACEHOLDER_CLIENT_ID.to_string(),
                client_secret: PLACEHOLDER_CLIENT_SECRET.to_string(),
            },
            sync: SyncConfig::default(),
            scheduler: Some(default_scheduler_config()),
        }
    }

    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.imdb.cookie_at_main.trim().is_empty() {
            return Err(anyhow::anyhow!("imdb.cookie_at_main is not configured"));
        }
        if self.imdb.cookie_ubid_main.trim().is_empty() {
            return Err(anyhow::anyhow!("imdb.cookie_ubid_main is not configured"));
        }
        if !self.is_trakt_configured() {
            return Err(anyhow::anyhow!("trakt.client_id and trakt.client_secret must be configured"));
        }
        Ok(())
    }

    pub fn is_trakt_configured(&self) -> bool {
        !self.trakt.client_id.is_empty()
            && self.trakt.client_id != PLACEHOLDER_CLIENT_ID
            && !self.trakt.client_secret.is_empty()
            && self.trakt.client_secret != PLACEHOLDER_CLIENT_SECRET
    }

    /// List selection after applying the `IMDB_LIST_IDS` override, if present
    pub fn list_selection(&self, env_override: Option<&str>) -> ListSelection {
        match env_override {
            Some(raw) if !raw.trim().is_empty() => ListSelection::parse(raw),
            _ => self.imdb.lists.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn configured() -> Config {
        Config {
            imdb: ImdbConfig {
                cookie_at_main: "at-cookie".to_string(),
                cookie_ubid_main: "ubid-cookie".to_string(),
                lists: ListSelection::parse("ls001,ls002"),
            },
            trakt: TraktConfig {
                client_id: "real_id".to_string(),
                client_secret: "real_secret".to_string(),
            },
            sync: SyncConfig::default(),
            scheduler: None,
        }
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        configured().save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.trakt.client_id, "real_id");
        assert_eq!(loaded.imdb.cookie_at_main, "at-cookie");
        assert_eq!(
            loaded.imdb.lists,
            ListSelection::Ids(vec!["ls001".to_string(), "ls002".to_string()])
        );
        assert!(!loaded.sync.dry_run);
    }

    #[test]
    fn test_lists_default_to_all() {
        let toml = r#"
[imdb]
cookie_at_main = "a"
cookie_ubid_main = "b"

[trakt]
client_id = "id"
client_secret = "secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.imdb.lists, ListSelection::All);
        assert!(config.scheduler.is_none());
    }

    #[test]
    fn test_config_validate() {
        assert!(Config::template().validate().is_err());
        assert!(!Config::template().is_trakt_configured());

        let config = configured();
        assert!(config.validate().is_ok());

        let mut missing_cookie = configured();
        missing_cookie.imdb.cookie_ubid_main = " ".to_string();
        assert!(missing_cookie.validate().is_err());
    }

    #[test]
    fn test_env_override_wins_over_file() {
        let config = configured();
        assert_eq!(config.list_selection(Some("all")), ListSelection::All);
        assert_eq!(config.list_selection(Some("  ")), config.imdb.lists);
        assert_eq!(config.list_selection(None), config.imdb.lists);
    }
}
