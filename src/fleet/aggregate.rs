//! Counting devices per version key

use indexmap::IndexMap;
use tracing::debug;

use crate::fleet::error::VersionError;
use crate::fleet::normalize::{UNKNOWN_OS, version_key};
use crate::fleet::types::{DeviceRecord, FleetGroup, VersionKey};

/// Count devices per OS/supervisor version pair
///
/// Steps:
/// - Devices without a supervisor version are dropped
/// - Remaining devices are counted per version key (first-seen order)
/// - Groups with an unparseable OS version are dropped after counting
pub fn aggregate(devices: &[DeviceRecord]) -> Result<Vec<FleetGroup>, VersionError> {
    let mut counts: IndexMap<VersionKey, usize> = IndexMap::new();

    for device in devices.iter().filter(|d| d.supervisor_version.is_some()) {
        *counts.entry(version_key(device)?).or_default() += 1;
    }

    let groups: Vec<FleetGroup> = counts
        .iter()
        .map(|(key, &count)| {
            let (os, supervisor) = key.split();
            FleetGroup::new(os, supervisor, count)
        })
        .filter(|group| group.os != UNKNOWN_OS)
        .collect();

    debug!(
        "Aggregated {} devices into {} version keys, {} reported",
        devices.len(),
        counts.len(),
        groups.len()
    );

    Ok(groups)
}
