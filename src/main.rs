use pandaai_backend::{
    config::Config, database::pool::create_pool, routes::build_router, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = config.server_address.parse()?;

    let pool = create_pool(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    if config.openrouter_api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY not set, the study coach runs in test mode");
    }

    let app_state = AppState::new(pool, config)?;
    let app = build_router(app_state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
