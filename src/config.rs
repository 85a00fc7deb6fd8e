//! Configuration management for the Elidune lending core

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;

use crate::models::LoanPolicy;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoansConfig {
    pub loan_period_days: u32,
    pub loan_limit: usize,
    pub fine_limit: Decimal,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SweepConfig {
    pub interval_secs: u64,
    pub seed_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub loans: LoansConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables with prefix ELIDUNE_, e.g. ELIDUNE_LOANS__LOAN_LIMIT
            .add_source(
                Environment::with_prefix("ELIDUNE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("sweep.seed_file", env::var("SEED_FILE").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Lending thresholds consumed by members and the loan factory
    pub fn loan_policy(&self) -> LoanPolicy {
        LoanPolicy {
            loan_period_days: self.loans.loan_period_days,
            loan_limit: self.loans.loan_limit,
            fine_limit: self.loans.fine_limit,
        }
    }
}

impl Default for LoansConfig {
    fn default() -> Self {
        let policy = LoanPolicy::default();
        Self {
            loan_period_days: policy.loan_period_days,
            loan_limit: policy.loan_limit,
            fine_limit: policy.fine_limit,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: 24 * 60 * 60,
            seed_file: None,
        }
    }
}
