pub mod clear;
pub mod config;
pub mod daemon;
pub mod sync;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use listsync_config::{Config, ListSelection, PathManager, BASE_PATH_ENV, IMDB_LIST_IDS_ENV};
use listsync_core::{SyncOptions, SyncOrchestrator};
use listsync_sources::{ImdbClient, TraktClient};

/// Load and validate the config file, pointing at `config init` when it is missing
pub fn load_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    if !config_file.exists() {
        return Err(eyre!(
            "No configuration found at {}. Run `listsync config init` to create one (or set {}).",
            config_file.display(),
            BASE_PATH_ENV
        ));
    }
    let config = Config::load_from_file(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate()
        .map_err(|e| eyre!("Configuration validation failed: {}", e))?;
    Ok(config)
}

/// Options for a pass: flags first, then `IMDB_LIST_IDS`, then the config file
pub fn sync_options(config: &Config, lists: Option<&str>, dry_run: bool) -> SyncOptions {
    let lists = match lists {
        Some(raw) => ListSelection::parse(raw),
        None => config.list_selection(std::env::var(IMDB_LIST_IDS_ENV).ok().as_deref()),
    };
    SyncOptions {
        lists,
        dry_run: dry_run || config.sync.dry_run,
    }
}

pub fn build_orchestrator(config: &Config, paths: &PathManager, options: SyncOptions) -> Result<SyncOrchestrator> {
    let imdb = ImdbClient::new(&config.imdb.cookie_at_main, &config.imdb.cookie_ubid_main)
        .map_err(|e| eyre!("Failed to create IMDb client: {}", e))?;
    let trakt = TraktClient::new(
        config.trakt.client_id.clone(),
        config.trakt.client_secret.clone(),
        paths.credentials_file(),
    );
    Ok(SyncOrchestrator::new(Box::new(imdb), Box::new(trakt)).with_options(options))
}
