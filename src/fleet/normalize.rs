//! Version key derivation for a single device

use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Version};

use crate::fleet::error::VersionError;
use crate::fleet::types::{DeviceRecord, VersionKey};

/// OS part used when the reported OS version cannot be parsed
pub const UNKNOWN_OS: &str = "Unknown";

/// OS part used for devices that predate OS version reporting
pub const PRE_RELEASE_OS: &str = "1.0.0-pre";

/// Locates `MAJOR.MINOR.PATCH[-pre][+build]` inside decorated strings
/// such as `balenaOS 2.29.2+rev1 (prod)` or `v10.3.7`.
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9A-Za-z.])v?(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)")
        .expect("version pattern is valid")
});

/// Parse a reported version string into a semver::Version.
///
/// Build metadata is dropped so that `2.0.0+rev1` and `2.0.0+rev2` are the
/// same version.
///
/// Examples:
/// - "2.0.0" -> Version(2, 0, 0)
/// - "balenaOS 2.29.2+rev1 (prod)" -> Version(2, 29, 2)
/// - "v10.3.7-beta.1" -> Version(10, 3, 7, pre: beta.1)
/// - "bad" -> None
pub fn parse_version(version: &str) -> Option<Version> {
    let captured = VERSION_RE.captures(version)?.get(1)?;
    let mut parsed = Version::parse(captured.as_str()).ok()?;
    parsed.build = BuildMetadata::EMPTY;
    Some(parsed)
}

/// Canonical OS part of a device's version key
pub fn normalize_os(os_version: Option<&str>) -> String {
    match os_version {
        Some(version) => parse_version(version)
            .map(|v| v.to_string())
            .unwrap_or_else(|| UNKNOWN_OS.to_string()),
        None => PRE_RELEASE_OS.to_string(),
    }
}

/// Canonical supervisor part of a device's version key
pub fn normalize_supervisor(supervisor_version: Option<&str>) -> Result<String, VersionError> {
    let version = supervisor_version.ok_or(VersionError::MissingSupervisor)?;
    parse_version(version)
        .map(|v| v.to_string())
        .ok_or_else(|| VersionError::InvalidSupervisor(version.to_string()))
}

/// Derive the grouping key of a device.
///
/// Records without a supervisor version must be filtered out first.
pub fn version_key(device: &DeviceRecord) -> Result<VersionKey, VersionError> {
    let os = normalize_os(device.os_version.as_deref());
    let supervisor = normalize_supervisor(device.supervisor_version.as_deref())?;
    Ok(VersionKey::new(&os, &supervisor))
}
