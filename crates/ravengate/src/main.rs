//! Server binary: config from the environment, tracing to stderr.

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::EnvFilter;

use ravengate::RavengateServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://ravengate.db".to_string());
    let bind_addr = std::env::var("RAVENGATE_BIND")
        .unwrap_or_else(|_| "0.0.0.0:54001".to_string());

    let pool = SqlitePoolOptions::new().connect(&database_url).await?;
    let server = RavengateServer::builder()
        .bind(&bind_addr)
        .build(pool)
        .await?;

    tracing::info!(addr = %server.local_addr()?, "ravengate listening");
    server.run().await?;
    Ok(())
}
