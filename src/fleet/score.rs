//! The scoring pipeline: fetch, aggregate and report in one call

use tracing::info;

use crate::fleet::aggregate::aggregate;
use crate::fleet::error::ScoreError;
use crate::fleet::fetch::{DeviceFilter, DeviceSource, fetch_all};
use crate::fleet::report::report;
use crate::fleet::sink::LineSink;

/// Fetch the devices matching `filter`, count them per version pair and
/// write the sorted report to `sink`.
///
/// Nothing is written unless fetching and aggregation both succeed.
pub async fn score_fleet<S: DeviceSource + ?Sized>(
    source: &S,
    max_attempts: u32,
    filter: &DeviceFilter,
    sink: &mut dyn LineSink,
) -> Result<Vec<String>, ScoreError> {
    let devices = fetch_all(source, max_attempts, filter).await?;
    let groups = aggregate(&devices)?;
    let lines = report(groups, sink)?;

    info!("Reported {} version groups", lines.len());

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::error::FetchError;
    use crate::fleet::fetch::MockDeviceSource;
    use crate::fleet::sink::WriterSink;
    use crate::fleet::types::DeviceRecord;
    use chrono::Utc;

    fn filter() -> DeviceFilter {
        DeviceFilter::recently_connected(&Utc::now())
    }

    #[tokio::test]
    async fn score_fleet_reports_sample_fleet() {
        let mut source = MockDeviceSource::new();
        source.expect_list_devices().times(1).returning(|_| {
            Ok(vec![
                DeviceRecord::new(Some("2.0.0"), Some("10.0.0")),
                DeviceRecord::new(Some("2.0.0"), Some("10.0.0")),
                DeviceRecord::new(None, Some("9.0.0")),
                DeviceRecord::new(Some("bad"), Some("9.0.0")),
                DeviceRecord::new(Some("1.0.0"), None),
            ])
        });
        let mut sink = WriterSink::new("buffer", Vec::new());

        let lines = score_fleet(&source, 5, &filter(), &mut sink).await.unwrap();

        assert_eq!(lines, vec!["2.0.0\t10.0.0\t2", "1.0.0-pre\t9.0.0\t1"]);
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "2.0.0\t10.0.0\t2\n1.0.0-pre\t9.0.0\t1\n"
        );
    }

    #[tokio::test]
    async fn score_fleet_writes_nothing_when_fetch_fails() {
        let mut source = MockDeviceSource::new();
        source
            .expect_list_devices()
            .times(3)
            .returning(|_| Err(FetchError::Unauthorized));
        let mut sink = WriterSink::new("buffer", Vec::new());

        let result = score_fleet(&source, 3, &filter(), &mut sink).await;

        assert!(matches!(result, Err(ScoreError::Fetch(FetchError::Unauthorized))));
        assert!(sink.into_inner().is_empty());
    }

    #[tokio::test]
    async fn score_fleet_writes_nothing_when_a_supervisor_version_is_invalid() {
        let mut source = MockDeviceSource::new();
        source.expect_list_devices().times(1).returning(|_| {
            Ok(vec![
                DeviceRecord::new(Some("2.0.0"), Some("10.0.0")),
                DeviceRecord::new(Some("2.0.0"), Some("garbage")),
            ])
        });
        let mut sink = WriterSink::new("buffer", Vec::new());

        let result = score_fleet(&source, 5, &filter(), &mut sink).await;

        assert!(matches!(result, Err(ScoreError::Version(_))));
        assert!(sink.into_inner().is_empty());
    }
}
