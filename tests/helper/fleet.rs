//! Fleet API and sink test utilities

use std::io;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use mockito::{Matcher, Mock, ServerGuard};

use fleetscore::fleet::fetch::DeviceFilter;
use fleetscore::fleet::sink::LineSink;

/// Sink keeping every written line, shareable with the test body
#[derive(Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LineSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

/// Filter for a fixed point in time, so request queries are predictable
pub fn recent_filter() -> DeviceFilter {
    DeviceFilter::recently_connected(&Utc.with_ymd_and_hms(2024, 3, 29, 15, 42, 7).unwrap())
}

/// Mock the device listing endpoint for [`recent_filter`]
pub fn mock_device_list(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("GET", "/v6/device")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("$select".into(), "supervisor_version,os_version".into()),
            Matcher::UrlEncoded(
                "$filter".into(),
                "(is_connected_to_vpn eq true) or (last_vpn_event ge '2024-03-01T00:00:00.000Z')"
                    .into(),
            ),
        ]))
        .match_header("authorization", "Bearer test-token")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
}
