//! Application lifecycle hooks.

use tokio::signal;
use tracing::{error, info};

use crate::config::Settings;

pub fn on_startup(settings: &Settings) {
    info!(
        project = %settings.app.project_name,
        environment = %settings.app.environment,
        version = %settings.app.version,
        address = %settings.app.bind_address(),
        "Starting application"
    );
}

pub fn on_shutdown(settings: &Settings) {
    info!(project = %settings.app.project_name, "Application stopped");
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
