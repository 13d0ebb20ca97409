use groupchat_api::{app, config, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and friends
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groupchat_api=debug,tower_http=debug".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting groupchat-api in {:?} mode", config.environment);

    // Best effort: the server still comes up when the database is down,
    // and /health reports degraded until it recovers.
    if let Err(e) = database::prepare().await {
        tracing::error!("Database preparation failed: {:#}", e);
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app()).await?;

    Ok(())
}
