pub mod config;
pub mod credentials;
pub mod paths;
pub mod selection;

pub use config::{Config, ImdbConfig, SchedulerConfig, SyncConfig, TraktConfig, default_scheduler_config};
pub use credentials::CredentialStore;
pub use paths::{PathManager, BASE_PATH_ENV};
pub use selection::{ListSelection, IMDB_LIST_IDS_ENV};
