use std::env;
use tracing::warn;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            backend_url: env::var("BACKEND_URL").unwrap_or_else(|_| {
                warn!("BACKEND_URL not set, using {}", DEFAULT_BACKEND_URL);
                DEFAULT_BACKEND_URL.to_string()
            }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - BACKEND_URL is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.backend_url.is_empty()
    }
}
