use keylift_api::Server;
use keylift_core::{KeyliftError, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> keylift_core::Result<()> {
    let settings = Settings::load_default()
        .map_err(|e| KeyliftError::Config(format!("failed to load settings: {:#}", e)))?;
    settings
        .validate()
        .map_err(|e| KeyliftError::Config(format!("invalid settings: {:#}", e)))?;

    let default_filter = format!(
        "keylift_api={level},keylift_engine={level},tower_http=debug",
        level = settings.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server = Server::new(settings)?;
    server.run().await
}
