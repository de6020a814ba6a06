//! Marshaller settings, optionally read from a `propmap.toml` file:
//!
//! ```toml
//! [marshaller]
//! comment = "Customer directory"
//! timestamp = false
//! ```

use std::path::Path;

use propmap_codec::StoreOptions;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PropmapResult;

/// Comment written by [`Marshaller::marshal_default`](crate::Marshaller::marshal_default)
/// unless configured otherwise.
pub const DEFAULT_COMMENT: &str = "Properties serialized by propmap";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropmapConfig {
    #[serde(default = "default_comment")]
    pub comment: String,
    /// Write the `#<timestamp>` line after the comment.
    #[serde(default = "default_timestamp")]
    pub timestamp: bool,
}

fn default_comment() -> String {
    DEFAULT_COMMENT.to_string()
}

fn default_timestamp() -> bool {
    true
}

impl Default for PropmapConfig {
    fn default() -> Self {
        Self {
            comment: default_comment(),
            timestamp: default_timestamp(),
        }
    }
}

/// On-disk layout: settings live under a `[marshaller]` table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    marshaller: Option<PropmapConfig>,
}

impl PropmapConfig {
    /// Loads settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> PropmapResult<Self> {
        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        info!("Loaded propmap config from {:?}", path);
        Ok(config)
    }

    /// Parses settings from TOML text.
    pub fn from_toml(contents: &str) -> PropmapResult<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.marshaller.unwrap_or_default())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            timestamp: self.timestamp,
        }
    }
}
