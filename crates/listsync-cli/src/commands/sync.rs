use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use listsync_config::{CredentialStore, PathManager};
use listsync_core::SyncResult;
use std::io::IsTerminal;
use std::time::Duration;

pub async fn run_sync(lists: Option<String>, dry_run: bool, output: &Output) -> Result<()> {
    tracing::debug!("Sync command started");

    let paths = PathManager::default();
    let config = super::load_config(&paths)?;
    let options = super::sync_options(&config, lists.as_deref(), dry_run);
    let mut orchestrator = super::build_orchestrator(&config, &paths, options)?;

    // The Trakt authorization prompt needs a clean terminal, so only spin once a token is stored
    let spinner = if output.is_human() && !output.is_quiet() && has_trakt_token(&paths) && is_interactive() {
        Some(spinner("Syncing IMDb → Trakt..."))
    } else {
        None
    };

    let result = orchestrator.sync().await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    let result = result.map_err(|e| eyre!("Sync failed: {:#}", e))?;

    if output.is_human() {
        output.block(summary_table(&result));
        let verb = if result.dry_run { "Dry run finished" } else { "Sync completed" };
        output.success(format!(
            "{}: {} change(s) in {:.1}s",
            verb,
            result.changes(),
            result.duration.as_secs_f64()
        ));
    } else {
        let json = serde_json::to_value(&result).map_err(|e| eyre!("Failed to serialize result: {}", e))?;
        output.json(&json);
    }

    Ok(())
}

fn has_trakt_token(paths: &PathManager) -> bool {
    let mut store = CredentialStore::new(paths.credentials_file());
    store.load().is_ok() && store.get_trakt_access_token().is_some()
}

fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn summary_table(result: &SyncResult) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("List").add_attribute(Attribute::Bold),
        Cell::new("Added").add_attribute(Attribute::Bold),
        Cell::new("Removed").add_attribute(Attribute::Bold),
        Cell::new("Note").add_attribute(Attribute::Bold),
    ]);

    for list in &result.lists {
        let note = if list.watchlist {
            "watchlist"
        } else if list.created {
            "created"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(&list.name),
            Cell::new(list.added).fg(Color::Green),
            Cell::new(list.removed).fg(Color::Red),
            Cell::new(note),
        ]);
    }
    for name in &result.lists_deleted {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(""),
            Cell::new(""),
            Cell::new("deleted").fg(Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("ratings").add_attribute(Attribute::Italic),
        Cell::new(result.ratings_added).fg(Color::Green),
        Cell::new(result.ratings_removed).fg(Color::Red),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("history").add_attribute(Attribute::Italic),
        Cell::new(result.history_added).fg(Color::Green),
        Cell::new(result.history_removed).fg(Color::Red),
        Cell::new(""),
    ]);
    if result.dry_run {
        table.add_row(vec![
            Cell::new("dry run: nothing was written").fg(Color::Yellow),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use listsync_core::ListReport;

    #[test]
    fn test_summary_table_lists_every_pair() {
        let result = SyncResult {
            lists: vec![
                ListReport {
                    name: "Horror".to_string(),
                    imdb_list_id: "ls001".to_string(),
                    created: true,
                    added: 3,
                    ..ListReport::default()
                },
                ListReport {
                    name: "watchlist".to_string(),
                    imdb_list_id: "ls999".to_string(),
                    watchlist: true,
                    removed: 1,
                    ..ListReport::default()
                },
            ],
            lists_deleted: vec!["Old".to_string()],
            ratings_added: 2,
            ..SyncResult::default()
        };

        let rendered = summary_table(&result).to_string();
        for expected in ["Horror", "created", "watchlist", "Old", "deleted", "ratings", "history"] {
            assert!(rendered.contains(expected), "missing {}", expected);
        }
        assert!(!rendered.contains("dry run"));
    }
}
