use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_api::{
    AppState, build_router,
    clock::SystemClock,
    config::Args,
    seed,
    store::{MemoryStore, PortfolioStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so clap sees those values as environment
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn PortfolioStore> = Arc::new(MemoryStore::new());
    if let Some(path) = &args.seed_file {
        seed::seed_if_empty(store.as_ref(), path).await?;
    }

    let state = AppState::new(&args, store, Arc::new(SystemClock));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(args.bind_addr()).await?;
    info!("Portfolio API listening on {}", listener.local_addr()?);
    info!("Cache TTL: {} seconds", args.cache_ttl);
    info!(
        "Rate limits: {} general / {} contact requests per {} seconds",
        args.rate_limit, args.contact_rate_limit, args.rate_window
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // no signal handler, serve until killed
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
