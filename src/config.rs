//! Run configuration from the environment
//!
//! Expected environment variables (all optional):
//! - ETL_TABLE_NAME: table written to the database (defaults to `DisasterCategories`)
//! - ETL_JOIN_POLICY: `inner`, `left` or `report` (defaults to `report`)
//!
//! Command line flags take precedence over these values.

use crate::storage::DEFAULT_TABLE_NAME;
use crate::transform::JoinPolicy;
use clap::ValueEnum;
use eyre::{Result, eyre};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub table_name: String,
    pub join_policy: JoinPolicy,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            join_policy: JoinPolicy::default(),
        }
    }
}

impl EtlConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(table_name) = std::env::var("ETL_TABLE_NAME") {
            let table_name = table_name.trim();
            if table_name.is_empty() {
                return Err(eyre!("ETL_TABLE_NAME is set but empty"));
            }
            config.table_name = table_name.to_string();
        }

        if let Ok(policy) = std::env::var("ETL_JOIN_POLICY") {
            config.join_policy = JoinPolicy::from_str(policy.trim(), true)
                .map_err(|e| eyre!("Invalid ETL_JOIN_POLICY: {}", e))?;
        }

        Ok(config)
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, table_name: Option<String>, policy: Option<JoinPolicy>) -> Self {
        if let Some(table_name) = table_name {
            self.table_name = table_name;
        }
        if let Some(policy) = policy {
            self.join_policy = policy;
        }
        self
    }
}
