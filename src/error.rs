use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("slot [{row},{col}] lies outside the grid")]
    SlotOutOfBounds { row: usize, col: usize },

    #[error("manifest contains no usable slot lines")]
    EmptyManifest,

    #[error("manifest names more than {max} distinct containers")]
    TooManyContainers { max: usize },
}
