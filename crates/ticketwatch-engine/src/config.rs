//! Tracker configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all) is
//! a valid configuration:
//!
//! ```toml
//! data_dir = "user_data"
//! default_partition = "default"
//! id_fields = ["id", "ticket_id"]
//! ignored_fields = ["received_at"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use ticketwatch_core::errors::{ExError, ExErrorKind};
use ticketwatch_core::ChangeDetector;
use ticketwatch_core_types::schema::{DEFAULT_ID_FIELDS, RECORD_RECEIVED_AT};

pub const DEFAULT_DATA_DIR: &str = "user_data";
pub const DEFAULT_PARTITION: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Directory holding one `<partition>.json` file per partition
    pub data_dir: PathBuf,
    /// Partition used when the caller names none
    pub default_partition: String,
    /// Candidate id fields, tried in order
    pub id_fields: Vec<String>,
    /// Fields never reported as changed
    pub ignored_fields: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            default_partition: DEFAULT_PARTITION.to_string(),
            id_fields: DEFAULT_ID_FIELDS.iter().map(|f| f.to_string()).collect(),
            ignored_fields: vec![RECORD_RECEIVED_AT.to_string()],
        }
    }
}

impl TrackerConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// `Config` if the text is not valid TOML, names an unknown key, or
    /// leaves `id_fields` empty.
    pub fn from_toml_str(text: &str) -> Result<Self, ExError> {
        let config: TrackerConfig = toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_message(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Builder-style override of the data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Builder-style override of the default partition
    pub fn with_default_partition(mut self, partition: impl Into<String>) -> Self {
        self.default_partition = partition.into();
        self
    }

    /// Detector ignoring the configured fields.
    ///
    /// `received_at` is always ignored since the tracker stamps it on every
    /// receive.
    pub fn detector(&self) -> ChangeDetector {
        ChangeDetector::with_ignored_fields(self.ignored_fields.iter().cloned())
            .ignoring(RECORD_RECEIVED_AT)
    }

    fn validate(&self) -> Result<(), ExError> {
        if self.id_fields.is_empty() {
            return Err(ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_message("id_fields must name at least one field"));
        }
        Ok(())
    }
}
