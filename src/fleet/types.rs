//! Common types for fleet scoring

use serde::Deserialize;

/// Separator between the OS and supervisor parts of a [`VersionKey`]
pub const KEY_DELIMITER: char = '%';

/// A device as returned by the fleet API, limited to the selected fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DeviceRecord {
    #[serde(default)]
    pub supervisor_version: Option<String>,
    #[serde(default)]
    pub os_version: Option<String>,
}

impl DeviceRecord {
    pub fn new(os_version: Option<&str>, supervisor_version: Option<&str>) -> Self {
        Self {
            supervisor_version: supervisor_version.map(str::to_string),
            os_version: os_version.map(str::to_string),
        }
    }
}

/// OS/supervisor version pair held as a single `os%supervisor` string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionKey(String);

impl VersionKey {
    /// Both parts come from normalized versions or fixed tokens, neither
    /// of which can contain [`KEY_DELIMITER`].
    pub fn new(os: &str, supervisor: &str) -> Self {
        Self(format!("{os}{KEY_DELIMITER}{supervisor}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the key back into `(os, supervisor)`
    pub fn split(&self) -> (&str, &str) {
        self.0
            .split_once(KEY_DELIMITER)
            .unwrap_or((self.0.as_str(), ""))
    }
}

/// Number of devices sharing one OS/supervisor version pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetGroup {
    pub os: String,
    pub supervisor: String,
    pub count: usize,
}

impl FleetGroup {
    pub fn new(os: &str, supervisor: &str, count: usize) -> Self {
        Self {
            os: os.to_string(),
            supervisor: supervisor.to_string(),
            count,
        }
    }
}
