use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use hostelfinder::api::AppState;
use hostelfinder::{GeocodingClient, HostelConfig, HostelSearchService, OverpassClient, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = HostelConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    match config.logging.format.as_str() {
        "json" => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!("Starting hostel finder v{}", hostelfinder::VERSION);
    tracing::debug!(
        "Client backend base URL: {}",
        config.client.backend_base_url
    );

    let geocoder = Arc::new(GeocodingClient::new(&config.upstream)?);
    let pois = Arc::new(OverpassClient::new(&config.upstream)?);
    let search = Arc::new(HostelSearchService::new(geocoder, pois));

    web::run(
        AppState { search },
        config.server.port,
        &config.server.static_dir,
    )
    .await
}
