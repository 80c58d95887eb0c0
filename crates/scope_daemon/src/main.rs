//! HTTP daemon for the GHG scope emissions service.
//!
//! Loads the factor content at startup, then serves the record CRUD and
//! dashboard summary API. State is in-memory; persistence sits behind
//! the gateway in front of this service.

mod routes;
mod state;
mod store;
mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use state::AppState;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scope_daemon", about = "GHG scope emissions service")]
struct Args {
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,
    #[arg(long, default_value = "./content")]
    content_dir: String,
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let content =
        scope_content::load_content(&args.content_dir).context("loading factor content")?;
    scope_content::validate_content(&content);
    tracing::info!(
        version = %content.content_version,
        fuel_rows = content.table.len(),
        "factor content loaded"
    );

    let state = AppState::new(content);
    let app = routes::make_router_with_cors(state, &args.cors_origin);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    tracing::info!("listening on {}", args.bind);
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
