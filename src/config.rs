//! Search configuration, loadable from TOML.
//!
//! ```
//! use ship_balance::config::SearchConfig;
//! use ship_balance::heuristic::Heuristic;
//!
//! let config = SearchConfig::from_toml_str(r#"
//!     heuristic = "zero"
//!     max_expansions = 250000
//! "#).unwrap();
//!
//! assert_eq!(config.heuristic, Heuristic::Zero);
//! assert!(!config.key_includes_crane);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BalanceError;
use crate::heuristic::Heuristic;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub heuristic: Heuristic,

    /// Treat states that differ only in crane position as distinct.
    pub key_includes_crane: bool,

    /// Stop after this many node expansions. Unbounded when absent.
    pub max_expansions: Option<u64>,
}

impl SearchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, BalanceError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BalanceError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| BalanceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}
