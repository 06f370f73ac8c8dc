//! Turns raw position records into a time-ordered sample sequence.
//!
//! Every record either becomes a [`Sample`] or is dropped with a
//! [`DropReason`]. A dropped record never fails the whole load.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::algo::time::DedupTimestamps;
use crate::algo::SortChronologically;
use crate::model::Sample;

pub mod datetime;
pub mod gpx;

pub use datetime::parse_timestamp;
pub use gpx::{parse_gpx_file, parse_gpx_str, read_gpx_records};

/// a position record as found in the source, nothing parsed yet
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub time: Option<String>,
}

impl RawRecord {
    pub fn new(latitude: &str, longitude: &str, time: Option<&str>) -> Self {
        Self {
            latitude: Some(latitude.to_string()),
            longitude: Some(longitude.to_string()),
            time: time.map(ToString::to_string),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingTimestamp,
    InvalidTimestamp,
    MissingCoordinate,
    InvalidCoordinate,
    CoordinateOutOfRange,
}

#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize)]
#[error("dropped record #{index}: {reason:?}")]
pub struct UnparseableSample {
    /// position of the record in the source
    pub index: usize,
    pub reason: DropReason,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// chronologically sorted, unique timestamps
    pub samples: Vec<Sample>,
    pub dropped: Vec<UnparseableSample>,

    /// samples removed because an earlier one had the same timestamp
    pub duplicates: usize,
}

impl LoadReport {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn parse_coordinate(value: Option<&str>, limit: f64) -> Result<f64, DropReason> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(DropReason::MissingCoordinate)?;
    let parsed: f64 = value.parse().map_err(|_| DropReason::InvalidCoordinate)?;
    if !parsed.is_finite() {
        return Err(DropReason::InvalidCoordinate);
    }
    if parsed.abs() > limit {
        return Err(DropReason::CoordinateOutOfRange);
    }
    Ok(parsed)
}

fn parse_fields(record: &RawRecord) -> Result<Sample, DropReason> {
    let latitude = parse_coordinate(record.latitude.as_deref(), 90.0)?;
    let longitude = parse_coordinate(record.longitude.as_deref(), 180.0)?;
    let time = record
        .time
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(DropReason::MissingTimestamp)?;
    let timestamp = parse_timestamp(time).ok_or(DropReason::InvalidTimestamp)?;
    Ok(Sample::new(latitude, longitude, timestamp))
}

/// parse a single record, `index` is only used for reporting
pub fn parse_record(index: usize, record: &RawRecord) -> Result<Sample, UnparseableSample> {
    parse_fields(record).map_err(|reason| UnparseableSample { index, reason })
}

/// Parse all records into a chronologically ordered sample sequence.
///
/// Records sharing a timestamp keep the first occurrence in source order.
pub fn load<I>(records: I) -> LoadReport
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut report = LoadReport::default();
    for (index, record) in records.into_iter().enumerate() {
        match parse_record(index, &record) {
            Ok(sample) => report.samples.push(sample),
            Err(unparseable) => {
                debug!("{}: {:?}", unparseable, record);
                report.dropped.push(unparseable);
            }
        }
    }

    report.samples.sort_chronologically();
    report.duplicates = report.samples.dedup_timestamps();

    if !report.dropped.is_empty() || report.duplicates > 0 {
        warn!(
            "kept {} samples, dropped {} unparseable and {} duplicate timestamps",
            report.samples.len(),
            report.dropped.len(),
            report.duplicates
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::{load, parse_record, DropReason, RawRecord};
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_valid_record() {
        let sample = parse_record(0, &RawRecord::new("45.5", "-6.25", Some("2024-04-20T07:00:00Z")))
            .unwrap();
        assert_eq!(sample.latitude(), 45.5);
        assert_eq!(sample.longitude(), -6.25);
        assert_eq!(
            sample.timestamp,
            Utc.with_ymd_and_hms(2024, 4, 20, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn drop_reasons() {
        let cases = vec![
            (RawRecord::new("1", "2", None), DropReason::MissingTimestamp),
            (RawRecord::new("1", "2", Some("  ")), DropReason::MissingTimestamp),
            (RawRecord::new("1", "2", Some("noon")), DropReason::InvalidTimestamp),
            (
                RawRecord {
                    latitude: None,
                    ..RawRecord::new("1", "2", Some("2024-04-20T07:00:00Z"))
                },
                DropReason::MissingCoordinate,
            ),
            (
                RawRecord::new("north", "2", Some("2024-04-20T07:00:00Z")),
                DropReason::InvalidCoordinate,
            ),
            (
                RawRecord::new("NaN", "2", Some("2024-04-20T07:00:00Z")),
                DropReason::InvalidCoordinate,
            ),
            (
                RawRecord::new("91", "2", Some("2024-04-20T07:00:00Z")),
                DropReason::CoordinateOutOfRange,
            ),
            (
                RawRecord::new("1", "-180.5", Some("2024-04-20T07:00:00Z")),
                DropReason::CoordinateOutOfRange,
            ),
        ];
        for (index, (record, reason)) in cases.into_iter().enumerate() {
            let err = parse_record(index, &record).unwrap_err();
            assert_eq!(err.reason, reason, "{:?}", record);
            assert_eq!(err.index, index);
        }
    }

    #[test]
    fn corrupt_points_do_not_fail_the_load() {
        let report = load(vec![
            RawRecord::new("0", "0", Some("2024-04-20T07:00:00Z")),
            RawRecord::new("0", "0.001", Some("not a time")),
            RawRecord::new("0", "0.002", None),
            RawRecord::new("0", "0.003", Some("2024-04-20T07:00:10Z")),
        ]);
        assert_eq!(report.samples.len(), 2);
        assert_eq!(report.dropped.len(), 2);
        assert_eq!(report.dropped[0].index, 1);
        assert_eq!(report.dropped[1].index, 2);
        assert_eq!(report.samples[1].longitude(), 0.003);
    }

    #[test]
    fn sorted_and_duplicates_keep_first() {
        let report = load(vec![
            RawRecord::new("0", "3", Some("2024-04-20T07:00:20Z")),
            RawRecord::new("0", "1", Some("2024-04-20T07:00:10Z")),
            RawRecord::new("0", "2", Some("2024-04-20T07:00:10Z")),
            RawRecord::new("0", "0", Some("2024-04-20T07:00:00Z")),
        ]);
        let lons: Vec<f64> = report.samples.iter().map(|s| s.longitude()).collect();
        assert_eq!(lons, vec![0.0, 1.0, 3.0]);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn empty_source() {
        let report = load(Vec::new());
        assert!(report.is_empty());
        assert!(report.dropped.is_empty());
    }
}
