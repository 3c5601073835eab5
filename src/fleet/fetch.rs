//! Device source trait, device filter and the retrying fetch

#[cfg(test)]
use mockall::automock;

use chrono::{DateTime, Duration, NaiveTime, SecondsFormat, TimeZone, Utc};
use tracing::{debug, info, warn};

use crate::config::RECENT_WINDOW_DAYS;
use crate::fleet::error::FetchError;
use crate::fleet::types::DeviceRecord;

/// Fields requested for every device
pub const SELECTED_FIELDS: [&str; 2] = ["supervisor_version", "os_version"];

/// Selects devices that are on the VPN now or were seen on it recently
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFilter {
    /// Earliest accepted `last_vpn_event`
    pub seen_since: DateTime<Utc>,
}

impl DeviceFilter {
    /// Filter for devices seen since the start of the day
    /// [`RECENT_WINDOW_DAYS`] days before `now`, in `now`'s time zone.
    pub fn recently_connected<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let window_start = now.clone() - Duration::days(RECENT_WINDOW_DAYS);
        let midnight = window_start.date_naive().and_time(NaiveTime::MIN);
        let seen_since = now
            .timezone()
            .from_local_datetime(&midnight)
            .earliest()
            .map(|start| start.with_timezone(&Utc))
            .unwrap_or_else(|| window_start.with_timezone(&Utc));

        Self { seen_since }
    }

    /// OData `$filter` expression
    pub fn odata_filter(&self) -> String {
        format!(
            "(is_connected_to_vpn eq true) or (last_vpn_event ge '{}')",
            self.seen_since.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }

    /// OData `$select` expression
    pub fn odata_select(&self) -> String {
        SELECTED_FIELDS.join(",")
    }
}

/// Trait for listing the devices of a fleet
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DeviceSource: Send + Sync {
    /// Fetches every device matching `filter`
    ///
    /// # Returns
    /// * `Ok(Vec<DeviceRecord>)` - All matching devices, projected to the selected fields
    /// * `Err(FetchError)` - If the request fails
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<DeviceRecord>, FetchError>;
}

/// Fetch all devices, retrying failed attempts immediately.
///
/// At most `max_attempts` calls are made (at least one). When every attempt
/// fails, the error of the last attempt is returned as is.
pub async fn fetch_all<S: DeviceSource + ?Sized>(
    source: &S,
    max_attempts: u32,
    filter: &DeviceFilter,
) -> Result<Vec<DeviceRecord>, FetchError> {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        debug!("Listing devices, attempt {}/{}", attempt, max_attempts);

        match source.list_devices(filter).await {
            Ok(devices) => {
                info!("Fetched {} devices", devices.len());
                return Ok(devices);
            }
            Err(e) if attempt >= max_attempts => {
                warn!("Giving up after {} attempts: {}", attempt, e);
                return Err(e);
            }
            Err(e) => {
                warn!("Attempt {}/{} failed: {}", attempt, max_attempts, e);
                attempt += 1;
            }
        }
    }
}
