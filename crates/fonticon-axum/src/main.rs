use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use fonticon::{Config, FontIconBackend};
use fonticon_axum::picker_router;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the font icon picker endpoints")]
struct Args {
    /// Path to KDL config file; Font Awesome 4.7.0 defaults when omitted
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short = 'b', long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_env_filter(EnvFilter::from_env("FONTICON_LOG"))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let backend = Arc::new(config.into_backend()?);

    // fetch in the background so the first picker query finds a warm cache
    let warming = backend.clone();
    tokio::spawn(async move {
        match warming.warm().await {
            Ok(()) => tracing::info!(key = %warming.cache_key(), "icon catalog warmed"),
            Err(e) => tracing::warn!(error = %e, "icon catalog warm-up failed"),
        }
    });

    let app = picker_router(backend).layer(tower_http::trace::TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .into_diagnostic()?;
    tracing::info!(addr = %args.bind, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
