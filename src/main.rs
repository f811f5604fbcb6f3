use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use appbase::config::Settings;
use appbase::events::{on_shutdown, on_startup, shutdown_signal};
use appbase::router::init_router;
use appbase::state::AppState;
use appbase_observability::init_logging;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "appbase", version, about = "Base API server")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let settings = Settings::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let _guard = init_logging(&settings.log);

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(settings.app.workers.max(1))
        .enable_all()
        .build()
        .context("building Tokio runtime")?
        .block_on(serve(settings))
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let address = settings.app.bind_address();
    let state = AppState::from_settings(settings)?;
    on_startup(&state.settings);

    let app = init_router(state.clone(), Vec::new());

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(address = %address, docs = %state.settings.app.docs_url, "Server running");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    on_shutdown(&state.settings);
    Ok(())
}
