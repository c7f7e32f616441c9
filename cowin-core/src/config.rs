//! The JSON configuration file: where to look, for how many weeks, and what to keep.

use std::io::Error as IoError;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;

use crate::filter::FilterSpec;
use crate::model::LocationQuery;

#[derive(thiserror::Error, Debug)]
/// Errors that make a configuration unusable.
pub enum ConfigError {
    /// The platform has no user configuration directory.
    #[error("Could not determine the user configuration directory")]
    NoConfigDir,
    /// No file exists at the resolved path.
    #[error("No file found at '{0}'")]
    NotFound(PathBuf),
    /// The file exists but could not be read.
    #[error("Could not open file '{path}': {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: IoError,
    },
    /// The file is not a valid configuration document.
    #[error("Could not decode config file '{path}': {source}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying decode failure.
        source: JsonError,
    },
    /// The document has no `locations` object.
    #[error("\"locations\" key not found in config")]
    MissingLocations,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Locations to query; every list is optional.
pub struct Locations {
    /// PIN codes to query.
    #[serde(default)]
    pub pincodes: Vec<String>,
    /// District identifiers to query.
    #[serde(default)]
    pub district_ids: Vec<i64>,
    /// Individual center identifiers to query.
    #[serde(default)]
    pub center_ids: Vec<i64>,
}

impl Locations {
    /// All lookups in query order: PIN codes, then districts, then centers.
    #[must_use]
    pub fn queries(&self) -> Vec<LocationQuery> {
        let pincodes = self.pincodes.iter().cloned().map(LocationQuery::Pincode);
        let districts = self.district_ids.iter().copied().map(LocationQuery::District);
        let centers = self.center_ids.iter().copied().map(LocationQuery::Center);

        pincodes.chain(districts).chain(centers).collect()
    }

    /// Check if nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pincodes.is_empty() && self.district_ids.is_empty() && self.center_ids.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Parsed configuration file.
pub struct Config {
    /// Locations to query; required for a run.
    #[serde(default)]
    pub locations: Option<Locations>,
    /// Number of consecutive weeks to check, starting today.
    #[serde(default)]
    pub weeks: Option<i64>,
    /// Criteria applied to the merged result.
    #[serde(default)]
    pub filters: Option<FilterSpec>,
}

impl Config {
    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, JsonError> {
        serde_json::from_str(text)
    }

    /// Weeks to check, never less than one.
    #[must_use]
    pub fn weeks_to_check(&self) -> u32 {
        self.weeks
            .map_or(1, |weeks| u32::try_from(weeks.max(1)).unwrap_or(u32::MAX))
    }

    /// The configured locations.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingLocations`] when the `locations` key is absent.
    pub fn locations(&self) -> Result<&Locations, ConfigError> {
        self.locations.as_ref().ok_or(ConfigError::MissingLocations)
    }
}
