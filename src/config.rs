//! Run configuration.
//!
//! The window and the country set are static. Only the output directory can
//! be overridden, through the environment (or a `.env` file).

use std::path::PathBuf;
use std::time::Duration;

use crate::data::http::REQUEST_TIMEOUT;
use crate::domain::{CountryRegistry, ObservationWindow};
use crate::error::AppError;

pub const OUTPUT_DIR_VAR: &str = "SOVEREIGN_PANELS_OUTPUT_DIR";
pub const DEFAULT_OUTPUT_DIR: &str = "data/processed";

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub window: ObservationWindow,
    pub registry: CountryRegistry,
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            window: ObservationWindow::default(),
            registry: CountryRegistry::eu_uk(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl PanelConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(dir) = lookup(OUTPUT_DIR_VAR) {
            let dir = dir.trim();
            if dir.is_empty() {
                return Err(AppError::config(format!("{OUTPUT_DIR_VAR} is set but empty.")));
            }
            config.output_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}
