use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, config, daemon, sync};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "listsync")]
#[command(about = "Keep Trakt lists, watchlist and ratings in step with IMDb")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one full sync pass
    #[command(long_about = "Synchronize the selected IMDb lists, the watchlist and ratings into Trakt. Trakt lists with no IMDb counterpart are deleted at the end of the list phase.")]
    Sync {
        /// Comma-separated IMDb list ids, or 'all' (overrides IMDB_LIST_IDS and the config file)
        #[arg(long, value_name = "IDS")]
        lists: Option<String>,

        /// Report what would change without writing to Trakt
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Run sync passes on a cron schedule
    #[command(long_about = "Run in the foreground and sync on the configured schedule. A failed pass is logged and the next scheduled pass still runs.")]
    Daemon {
        /// Cron schedule with seconds (e.g. '0 0 */6 * * *')
        #[arg(long, value_name = "SCHEDULE")]
        schedule: Option<String>,

        /// Skip the sync pass on startup
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_sync: bool,

        /// Write logs to a daily-rotated file (defaults to the log directory when no path is given)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        log_file: Option<Option<PathBuf>>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear stored state
    Clear {
        /// Remove stored Trakt tokens
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (secrets masked)
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Print the configuration file path
    Path,
    /// Write a configuration template
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Daemon { log_file: Some(path), .. } => Some(daemon::log_file_path(path.clone())?),
        _ => None,
    };
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Sync { lists, dry_run } => sync::run_sync(lists, dry_run, &output).await,
        Commands::Daemon {
            schedule,
            no_startup_sync,
            ..
        } => daemon::run_daemon(schedule, no_startup_sync, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output),
        Commands::Clear { credentials } => clear::run_clear(credentials, &output),
    }
}
