//! # World Configuration
//!
//! Settings shared by every zone of a world, loaded once at startup from
//! TOML. Every field has a default, so an empty file is a valid config.
//!
//! ```toml
//! master_seed = 1337
//! persistence = "immediate"
//! chunk_dir = "data/chunks"
//! cell_size = 1.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};

/// When edits reach disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistMode {
    /// Every successful edit rewrites the zone file before returning.
    #[default]
    Immediate,
    /// Edits mark the zone dirty; `flush()` writes it.
    Deferred,
}

/// World-level settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Master seed every zone seed is derived from.
    pub master_seed: u32,
    /// Edit persistence policy.
    pub persistence: PersistMode,
    /// Directory the chunk library loads templates from.
    pub chunk_dir: Option<PathBuf>,
    /// World units per grid cell.
    pub cell_size: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            master_seed: 0x7E55_E2A0,
            persistence: PersistMode::Immediate,
            chunk_dir: None,
            cell_size: 1.0,
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] if the TOML is malformed or a
    /// field has the wrong type.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(text)?;
        if config.cell_size.is_finite() && config.cell_size > 0.0 {
            Ok(config)
        } else {
            tracing::warn!("cell_size {} is not positive, using 1.0", config.cell_size);
            Ok(Self { cell_size: 1.0, ..config })
        }
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> WorldResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| WorldError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
