//! Service configuration.
//!
//! Everything comes from `ODIN_CRAWLER__`-prefixed environment variables
//! (optionally seeded from a `.env` file), with `__` separating nested
//! sections:
//!
//! ```text
//! ODIN_CRAWLER__SERVER__PORT=8000             -> server.port
//! ODIN_CRAWLER__PAYMENT__RAZORPAY__KEY_ID=... -> payment.razorpay.key_id
//! ODIN_CRAWLER__TRIAL__PERIOD_DAYS=3          -> trial.period_days
//! ```

mod database;
mod error;
mod payment;
mod scraper;
mod server;
mod trial;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::{PaymentConfig, PaypalSettings, RazorpaySettings};
pub use scraper::ScraperSettings;
pub use server::{Environment, ServerConfig};
pub use trial::TrialConfig;

use serde::Deserialize;

/// Root configuration. `database` and `payment` have no defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub payment: PaymentConfig,
    #[serde(default)]
    pub trial: TrialConfig,
    #[serde(default)]
    pub scraper: ScraperSettings,
}

impl AppConfig {
    /// Reads `.env` when present, then the process environment.
    ///
    /// # Errors
    ///
    /// `ConfigError::LoadError` when a required section is absent or a
    /// value does not parse into its field type.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let source = config::Environment::default()
            .prefix("ODIN_CRAWLER")
            .separator("__");

        let config = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Checks every section, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        self.trial.validate()?;
        self.scraper.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
