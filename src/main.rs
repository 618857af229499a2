use movies_api::config::Config;
use movies_api::database::{self, SqliteMovieRepository};
use movies_api::http::{AppState, HttpServer, HttpServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,movies_api=debug,sqlx=warn")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = database::establish_pool(config.db_path()).await?;
    let state = AppState::new(SqliteMovieRepository::new(pool));
    let server_config = HttpServerConfig::new(config.server_port());
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
