// ABOUTME: Entry point for the gridlaunch binary.
// ABOUTME: Initializes tracing, loads configuration from the environment, and opens the launcher stores.

use gridlaunch_app::{Launcher, LauncherConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "gridlaunch=info,gridlaunch_store=info,gridlaunch_app=info",
                )
            }),
        )
        .init();

    tracing::info!("gridlaunch starting up");

    let config = LauncherConfig::from_env()?;
    let launcher = Launcher::open(&config)?;

    let buttons = launcher.buttons();
    tracing::info!(count = buttons.len(), "button board ready");
    for button in buttons {
        tracing::debug!(
            id = %button.id,
            label = %button.label,
            x = button.x,
            y = button.y,
            "button"
        );
    }

    launcher.flush().await;
    Ok(())
}
