//! Bookkeeping configuration

use serde::Deserialize;

use crate::accounting::AccountingMethod;
use crate::error::CoreError;

/// Environment variable prefix, e.g. `BOOKS_SEPARATOR=/`
pub const ENV_PREFIX: &str = "BOOKS";

/// Defaults applied when building templates, queries and ledgers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookkeepingConfig {
    /// Separator between account number segments
    pub separator: String,
    /// Placeholder character used when rendering a template mask
    pub mask_fill: char,
    /// Token splitting a filter lookup from its operator (`code__in`)
    pub filter_token: String,
    /// Case-insensitive, type-coercing filter matching
    pub fuzzy_match: bool,
    /// AND (true) or OR (false) semantics for multiple predicates
    pub match_all: bool,
    /// Accounting method recorded on new ledgers
    pub accounting_method: AccountingMethod,
    /// Log level used when no `RUST_LOG` filter is set
    pub log_level: String,
}

impl Default for BookkeepingConfig {
    fn default() -> Self {
        Self {
            separator: "-".to_string(),
            mask_fill: 'X',
            filter_token: "__".to_string(),
            fuzzy_match: true,
            match_all: true,
            accounting_method: AccountingMethod::Cash,
            log_level: "info".to_string(),
        }
    }
}

impl BookkeepingConfig {
    /// Loads configuration from `BOOKS_*` environment variables
    ///
    /// Missing variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if a variable is present but
    /// malformed, or if the resulting configuration is invalid.
    pub fn from_env() -> Result<Self, CoreError> {
        let config: Self = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the separator and filter token are usable
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.separator.is_empty() {
            return Err(CoreError::validation("separator must not be empty"));
        }
        if self.filter_token.is_empty() {
            return Err(CoreError::validation("filter token must not be empty"));
        }
        Ok(())
    }
}
