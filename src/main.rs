use dealdive_api::app::create_app;
use dealdive_api::backend::BackendClient;
use dealdive_api::config::{load_config, save_default_config};
use dealdive_api::constants::CONFIG_PATH;
use dealdive_api::logging::{init_logging, install_panic_hook};
use dealdive_api::utils::geocoding::{CachedGeocoder, NominatimGeocoder};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--init-config") {
        match save_default_config(&CONFIG_PATH) {
            Ok(_) => {
                println!("Default configuration saved to {:?}", *CONFIG_PATH);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Failed to save default configuration: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    init_logging();
    install_panic_hook();

    // Load configuration
    let config = Arc::new(load_config(&CONFIG_PATH));

    let backend = match BackendClient::new(&config.backend) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create backend client: {}", e);
            std::process::exit(1);
        }
    };

    let geocoder = match NominatimGeocoder::new(&config.geocoding) {
        Ok(provider) => Arc::new(CachedGeocoder::new(
            provider,
            config.geocoding.cache_capacity,
        )),
        Err(e) => {
            error!("Failed to create geocoding client: {}", e);
            std::process::exit(1);
        }
    };

    // Create the application
    let app = create_app(Arc::clone(&config), backend, geocoder);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(
        "Starting Deal Dive API on {} (backend {})",
        addr, config.backend.base_url
    );

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
}
