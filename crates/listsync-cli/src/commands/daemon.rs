use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use listsync_config::{default_scheduler_config, PathManager};
use listsync_core::SyncOrchestrator;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// `--log-file` with no value logs to the default daemon log
pub fn log_file_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => {
            let paths = PathManager::default();
            paths
                .ensure_directories()
                .map_err(|e| eyre!("Failed to create {}: {}", paths.log_dir().display(), e))?;
            Ok(paths.daemon_log_file())
        }
    }
}

/// One scheduled pass. Failures are logged, never propagated, so later passes still run.
async fn run_pass(orchestrator: &Mutex<SyncOrchestrator>, trigger: &str) {
    let mut orchestrator = orchestrator.lock().await;
    info!(operation = "scheduled_sync_start", trigger, "Starting sync");
    match orchestrator.sync().await {
        Ok(result) => info!(
            operation = "scheduled_sync_complete",
            trigger,
            changes = result.changes(),
            duration_ms = result.duration.as_millis() as u64,
            "Sync completed"
        ),
        Err(e) => {
            let message = format!("{:#}", e);
            error!(operation = "scheduled_sync_error", trigger, error = %message, "Sync failed");
        }
    }
}

pub async fn run_daemon(schedule_override: Option<String>, no_startup_sync: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config = super::load_config(&paths)?;

    let scheduler_config = config.scheduler.clone().unwrap_or_else(default_scheduler_config);
    let schedule = schedule_override.unwrap_or(scheduler_config.schedule);
    let run_on_startup = scheduler_config.run_on_startup && !no_startup_sync;

    let options = super::sync_options(&config, None, false);
    let orchestrator = Arc::new(Mutex::new(super::build_orchestrator(&config, &paths, options)?));

    if run_on_startup {
        info!(operation = "scheduler_startup", "Running initial sync on startup");
        run_pass(&orchestrator, "startup").await;
    }

    let mut scheduler = JobScheduler::new()
        .await
        .map_err(|e| eyre!("Failed to create scheduler: {}", e))?;
    let job_orchestrator = Arc::clone(&orchestrator);
    let job = Job::new_async(schedule.as_str(), move |_uuid, _scheduler| {
        let orchestrator = Arc::clone(&job_orchestrator);
        Box::pin(async move {
            run_pass(&orchestrator, "schedule").await;
        })
    })
    .map_err(|e| eyre!("Invalid schedule '{}': {}", schedule, e))?;
    scheduler
        .add(job)
        .await
        .map_err(|e| eyre!("Failed to schedule sync: {}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| eyre!("Failed to start scheduler: {}", e))?;

    info!(operation = "scheduler_started", schedule = %schedule, "Scheduler started");
    output.info(format!("Daemon running on schedule '{}'. Press Ctrl-C to stop.", schedule));

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| eyre!("Failed to listen for shutdown signal: {}", e))?;

    info!(operation = "scheduler_shutdown", "Shutting down");
    scheduler
        .shutdown()
        .await
        .map_err(|e| eyre!("Failed to stop scheduler: {}", e))?;
    Ok(())
}
