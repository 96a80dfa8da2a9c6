use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uploader_gateway::{api, cli, config, jobs, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "uploader_gateway=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut cfg = config::load()?;
    let args = cli::Cli::parse();

    if let Some(cli::Commands::Serve { port: Some(port) }) = args.command {
        cfg.port = port;
    }

    let result = run_server(cfg).await;
    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

async fn run_server(cfg: config::Config) -> anyhow::Result<()> {
    let port = cfg.port;
    let sweep_interval = cfg.sweep_interval;

    tracing::info!("Token authority at {}", cfg.authority_url);
    let state = Arc::new(AppState::new(cfg)?);

    if let Some(every) = sweep_interval {
        jobs::sweep::spawn(state.sessions.clone(), every);
        tracing::info!("Expired token sweep started (every {:?})", every);
    }

    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on port {}.", port);
    axum::serve(listener, app).await?;

    Ok(())
}
