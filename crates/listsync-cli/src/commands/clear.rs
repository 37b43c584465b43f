use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use listsync_config::{CredentialStore, PathManager};

pub fn run_clear(credentials: bool, output: &Output) -> Result<()> {
    if !credentials {
        output.warn("No clear option specified. Use --credentials");
        return Ok(());
    }

    let paths = PathManager::default();
    let credentials_file = paths.credentials_file();
    if !credentials_file.exists() {
        output.info("No credentials file found to clear");
        return Ok(());
    }

    let mut store = CredentialStore::new(credentials_file.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    store.clear_trakt();
    store
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", credentials_file.display(), e))?;

    output.success(format!("Cleared Trakt tokens from {}", credentials_file.display()));
    Ok(())
}
