use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod clock;
mod config;
mod expiry;
mod forecast;
mod routes;
mod utils;

use cache::AstroCache;
use clock::SystemClock;
use config::Config;
use forecast::weatherstack::WeatherstackClient;
use routes::{cors_layer, create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astro_cache_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize weatherstack client
    let weather_client = Arc::new(WeatherstackClient::new(&config)?);

    // One cache for the whole process, shared by every request
    let astro_cache = Arc::new(AstroCache::new(weather_client, Arc::new(SystemClock)));

    let state = AppState { astro_cache };

    let app = create_router(state)
        .layer(cors_layer(&config.cors_allowed_origin)?)
        .layer(TraceLayer::new_for_http());

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server starting on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
