use anyhow::Context;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use video_workbench::AppConfig;
use video_workbench::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting video workbench...");

    let config = AppConfig::new().context("Failed to load configuration")?;
    let state = app::create_app(config).context("Failed to build video store")?;

    let script_id = state.config.script_id.context("VIDEO_SCRIPT_ID is required")?;
    let project_id = state.config.project_id.context("VIDEO_PROJECT_ID is required")?;
    info!(
        "Watching script {} of project {}, polling every {:?}",
        script_id, project_id, state.config.poll_interval
    );

    let videos = state.videos.clone();

    if let Err(e) = videos.set_current_script(script_id, project_id).await {
        error!("Initial load for script {} incomplete: {}", script_id, e);
    }

    let mut changes = videos.subscribe();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    log_summary(&videos);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                log_summary(&videos);
            }
        }
    }

    info!("Shutting down...");
    videos.cleanup();
    Ok(())
}

fn log_summary(videos: &video_workbench::VideoStore) {
    let snapshot = videos.snapshot();
    info!(
        configs = snapshot.current_configs().len(),
        results = snapshot.video_results.len(),
        pending = snapshot.pending_result_ids().len(),
        polling = videos.is_polling(),
        "Video store updated"
    );
}
