use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub entity_store_url: String,
    pub entity_store_api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            entity_store_url: env::var("ENTITY_STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("ENTITY_STORE_URL not set, using empty value");
                    String::new()
                }),
            entity_store_api_key: env::var("ENTITY_STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("ENTITY_STORE_API_KEY not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.entity_store_url.is_empty()
            && !self.entity_store_api_key.is_empty()
    }
}
