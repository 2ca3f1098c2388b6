use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elephant_live::config::RelayConfig;
use elephant_live::relay::{self, RelayState};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "elephant_live=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Elephant Live relay...");

    let config = RelayConfig::from_env();
    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.bind, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on http://{}", config.bind);

    if let Err(e) = relay::serve(listener, RelayState::new(&config)).await {
        tracing::error!("Relay stopped: {}", e);
        std::process::exit(1);
    }
}
