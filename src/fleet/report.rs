//! Ordering and rendering of fleet groups

use std::cmp::Ordering;

use crate::fleet::error::SinkError;
use crate::fleet::normalize::parse_version;
use crate::fleet::sink::LineSink;
use crate::fleet::types::FleetGroup;

/// Compare two version strings by semver precedence.
///
/// Unparseable versions sort below parseable ones and compare by text
/// among themselves.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Sort groups newest OS first, newest supervisor first within an OS
pub fn sort_groups(mut groups: Vec<FleetGroup>) -> Vec<FleetGroup> {
    groups.sort_by(|a, b| {
        compare_versions(&a.os, &b.os).then_with(|| compare_versions(&a.supervisor, &b.supervisor))
    });
    groups.reverse();
    groups
}

/// Render one group as `os<TAB>supervisor<TAB>count`
pub fn render_line(group: &FleetGroup) -> String {
    format!("{}\t{}\t{}", group.os, group.supervisor, group.count)
}

/// Sort, render and write the report.
///
/// Every line is rendered before the first is written. Returns the lines in
/// output order.
pub fn report(groups: Vec<FleetGroup>, sink: &mut dyn LineSink) -> Result<Vec<String>, SinkError> {
    let lines: Vec<String> = sort_groups(groups).iter().map(render_line).collect();

    for line in &lines {
        sink.write_line(line).map_err(|source| SinkError::Write {
            line: line.clone(),
            source,
        })?;
    }

    Ok(lines)
}
