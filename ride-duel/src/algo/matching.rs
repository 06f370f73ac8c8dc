//! Nearest-neighbour searches used to correlate the two tracks.
//!
//! Both searches break ties towards the earliest index, so repeated queries
//! always hit the same sample.

use chrono::{DateTime, Duration, Utc};
use geo_types::Point;
use ordered_float::OrderedFloat;

use crate::algo::PointInTime;
use crate::model::{DerivedSample, Track};
use crate::params::DistanceModel;

fn abs_diff(a: DateTime<Utc>, b: DateTime<Utc>) -> Duration {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Point closest in time to `t`.
///
/// `time_ordered` selects a binary search, otherwise all points are scanned.
pub fn nearest_in_time<PIT>(points: &[PIT], t: DateTime<Utc>, time_ordered: bool) -> Option<&PIT>
where
    PIT: PointInTime,
{
    if time_ordered {
        nearest_in_time_sorted(points, t)
    } else {
        points
            .iter()
            .min_by_key(|pit| abs_diff(pit.timestamp(), t))
    }
}

fn nearest_in_time_sorted<PIT>(points: &[PIT], t: DateTime<Utc>) -> Option<&PIT>
where
    PIT: PointInTime,
{
    // first point at or after t
    let after_idx = points.partition_point(|pit| pit.timestamp() < t);
    if after_idx == 0 {
        return points.first();
    }

    // earliest point sharing the timestamp of the last point before t
    let before_ts = points[after_idx - 1].timestamp();
    let before_idx = points.partition_point(|pit| pit.timestamp() < before_ts);

    match points.get(after_idx) {
        Some(after) if abs_diff(after.timestamp(), t) < t - before_ts => Some(after),
        _ => Some(&points[before_idx]),
    }
}

/// Point closest to `target` on the earth surface, scanning all points.
pub fn nearest_in_space<'a, PIT>(
    points: &'a [PIT],
    target: &Point<f64>,
    model: DistanceModel,
) -> Option<&'a PIT>
where
    PIT: PointInTime,
{
    // TODO: an rstar index over the points once tracks reach the 100k range
    points
        .iter()
        .min_by_key(|pit| OrderedFloat(model.meters(&pit.point(), target)))
}

/// sample of `track` whose timestamp is closest to `t`
pub fn match_by_time(track: &Track, t: DateTime<Utc>) -> Option<&DerivedSample> {
    nearest_in_time(track.points(), t, track.is_time_ordered())
}

/// sample of `track` physically closest to `latitude`/`longitude`
pub fn match_by_position(
    track: &Track,
    latitude: f64,
    longitude: f64,
    model: DistanceModel,
) -> Option<&DerivedSample> {
    nearest_in_space(track.points(), &Point::new(longitude, latitude), model)
}
