use std::sync::Arc;

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use appointment_cell::repository::AppointmentRepository;
use appointment_cell::services::MutationService;
use shared_config::AppConfig;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting waitdesk console");

    // Load configuration
    let config = AppConfig::from_env();

    let repository = Arc::new(AppointmentRepository::new());
    let service = MutationService::new(&config, Arc::clone(&repository));

    // Startup fetch-all; a failure is reported once and leaves the cache
    // empty until the operator reloads.
    match service.fetch_all().await {
        Ok(count) => info!("Loaded {} appointments from {}", count, config.backend_url),
        Err(err) => {
            error!("{err}");
            eprintln!("Could not load appointments from {}: {err}", config.backend_url);
        }
    }

    commands::run(&service).await;
}
