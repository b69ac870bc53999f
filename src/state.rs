use crate::config::AppConfig;
use crate::errors::ConfigError;
use crate::flash::FlashSigner;
use crate::storage::FitnessStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FitnessStore>,
    pub flash: FlashSigner,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn FitnessStore>) -> Result<Self, ConfigError> {
        Ok(Self {
            store,
            flash: FlashSigner::new(&config.secret_key)?,
        })
    }
}
