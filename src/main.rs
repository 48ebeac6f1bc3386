mod auth;
mod config;
mod database;
mod entities;
mod router;
mod routes;
mod supabase;
mod util;

use config::Config;
use database::setup_database;
use router::{create_router, shutdown_signal, AppState};
use supabase::Supabase;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = setup_database(&config.database_url).await?;

    let supabase = Supabase::new(config.supabase_url, config.supabase_anon_key);
    let app = create_router(AppState { db, supabase });

    let listener = TcpListener::bind("0.0.0.0:8000").await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
