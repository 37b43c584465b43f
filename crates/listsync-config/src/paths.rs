use anyhow::Result;
use std::path::{Path, PathBuf};

/// Overrides the directory holding config, credentials and logs
pub const BASE_PATH_ENV: &str = "LISTSYNC_BASE_PATH";

pub struct PathManager {
    config_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("listsync");
        Ok(Self::from_base(base_dir))
    }

    pub fn from_base(base: PathBuf) -> Self {
        Self {
            log_dir: base.join("logs"),
            config_dir: base,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn daemon_log_file(&self) -> PathBuf {
        self.log_dir.join("listsync.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Ok(base) = std::env::var(BASE_PATH_ENV) {
            return Self::from_base(PathBuf::from(base));
        }
        // Platform config dir (e.g. ~/.config/listsync on Linux), else the working directory
        Self::new().unwrap_or_else(|_| Self::from_base(PathBuf::from(".listsync")))
    }
}
