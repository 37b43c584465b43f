use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use listsync_config::{default_scheduler_config, Config, CredentialStore, PathManager};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    match cmd {
        ConfigCommands::Show { full } => show_config(&paths, full, output),
        ConfigCommands::Path => {
            let config_file = paths.config_file();
            if output.is_human() {
                output.info(config_file.display().to_string());
            } else {
                output.json(&json!({ "config_file": config_file.display().to_string() }));
            }
            Ok(())
        }
        ConfigCommands::Init { force } => init_config(&paths, force, output),
    }
}

fn init_config(paths: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        return Err(eyre!(
            "{} already exists. Use --force to overwrite it.",
            config_file.display()
        ));
    }
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create {}: {}", paths.config_dir().display(), e))?;
    Config::template()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;

    output.success(format!("Wrote configuration template to {}", config_file.display()));
    output.info("Fill in the IMDb cookies (at-main, ubid-main) and your Trakt API application credentials.");
    Ok(())
}

fn show_config(paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if !config_file.exists() {
        output.warn(format!(
            "No configuration at {}. Run `listsync config init` first.",
            config_file.display()
        ));
        return Ok(());
    }
    let config = Config::load_from_file(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let secret = |value: &str| if full { value.to_string() } else { mask_string(value) };
    let scheduler = config.scheduler.clone().unwrap_or_else(default_scheduler_config);

    let mut credentials = CredentialStore::new(paths.credentials_file());
    let trakt_token = credentials.load().is_ok() && credentials.get_trakt_access_token().is_some();
    let token_expires = credentials.get_trakt_token_expires().map(|at| at.to_rfc3339());

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "imdb": {
                "cookie_at_main": secret(&config.imdb.cookie_at_main),
                "cookie_ubid_main": secret(&config.imdb.cookie_ubid_main),
                "lists": config.imdb.lists.to_string(),
            },
            "trakt": {
                "client_id": secret(&config.trakt.client_id),
                "client_secret": secret(&config.trakt.client_secret),
                "authorized": trakt_token,
                "token_expires": token_expires,
            },
            "sync": { "dry_run": config.sync.dry_run },
            "scheduler": {
                "schedule": scheduler.schedule,
                "run_on_startup": scheduler.run_on_startup,
            },
        }));
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Config File").add_attribute(Attribute::Bold),
        Cell::new(config_file.display().to_string()),
    ]);

    section(&mut table, "IMDb");
    table.add_row(vec![Cell::new("at-main cookie"), Cell::new(secret(&config.imdb.cookie_at_main))]);
    table.add_row(vec![Cell::new("ubid-main cookie"), Cell::new(secret(&config.imdb.cookie_ubid_main))]);
    table.add_row(vec![Cell::new("Lists"), Cell::new(config.imdb.lists.to_string())]);

    section(&mut table, "Trakt");
    table.add_row(vec![Cell::new("Client ID"), Cell::new(secret(&config.trakt.client_id))]);
    table.add_row(vec![Cell::new("Client Secret"), Cell::new(secret(&config.trakt.client_secret))]);
    let authorized = if trakt_token {
        format!("{} (expires {})", "✓".green(), token_expires.unwrap_or_else(|| "unknown".to_string()))
    } else {
        "✗".red().to_string()
    };
    table.add_row(vec![Cell::new("Authorized"), Cell::new(authorized)]);

    section(&mut table, "Sync");
    table.add_row(vec![Cell::new("Dry run"), Cell::new(config.sync.dry_run)]);
    table.add_row(vec![Cell::new("Schedule"), Cell::new(&scheduler.schedule)]);
    table.add_row(vec![Cell::new("Run on startup"), Cell::new(scheduler.run_on_startup)]);

    output.block(table);
    if !config.is_trakt_configured() {
        output.warn("Trakt client credentials are still placeholders");
    }
    Ok(())
}

fn section(table: &mut Table, title: &str) {
    table.add_row(vec![Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)]);
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_CLIENT_ID" || s == "YOUR_CLIENT_SECRET" {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
