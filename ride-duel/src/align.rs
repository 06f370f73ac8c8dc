//! Who is ahead, and by how much.
//!
//! A query time locates rider A on their own clock. Rider B is then located
//! by position, at the sample closest to where A is, independent of B's
//! clock. The difference between both timestamps is the time gap.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::algo::matching::{match_by_position, match_by_time};
use crate::error::{DuelError, Result};
use crate::model::{AlignmentResult, DerivedSample, Track};
use crate::params::{DistanceModel, Params};

/// one step of the playback timeline
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TimelineEntry {
    pub time: DateTime<Utc>,
    #[serde(flatten)]
    pub result: AlignmentResult,
}

/// Compares two immutable tracks. Every query is independent.
#[derive(Clone, Copy, Debug)]
pub struct Aligner<'a> {
    a: &'a Track,
    b: &'a Track,
    model: DistanceModel,
}

impl<'a> Aligner<'a> {
    pub fn new(a: &'a Track, b: &'a Track, params: &Params) -> Self {
        Self {
            a,
            b,
            model: params.distance_model,
        }
    }

    pub fn track_a(&self) -> &'a Track {
        self.a
    }

    pub fn track_b(&self) -> &'a Track {
        self.b
    }

    /// Alignment for the playback time `t`.
    ///
    /// `None` when either track is empty.
    pub fn align_at(&self, t: DateTime<Utc>) -> Option<AlignmentResult> {
        let fa = match_by_time(self.a, t)?;
        self.align_sample(fa)
    }

    /// Alignment for a sample of track A.
    pub fn align_sample(&self, fa: &DerivedSample) -> Option<AlignmentResult> {
        let fb = match_by_position(self.b, fa.latitude(), fa.longitude(), self.model)?;
        let gap = fa.sample.timestamp - fb.sample.timestamp;
        Some(AlignmentResult {
            a: *fa,
            b: *fb,
            time_gap_seconds: gap.num_milliseconds() as f64 / 1000.0,
            match_distance_m: self.model.meters(&fa.sample.point, &fb.sample.point),
            distance_gap_km: fa.cumulative_km - fb.cumulative_km,
        })
    }

    /// earliest and latest timestamp over both tracks
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let timestamps = || {
            self.a
                .points()
                .iter()
                .chain(self.b.points().iter())
                .map(|p| p.sample.timestamp)
        };
        Some((timestamps().min()?, timestamps().max()?))
    }

    /// Evaluate the alignment every `period` over the span of both tracks,
    /// as a playback driver stepping through time would.
    pub fn timeline(&self, period: Duration) -> Result<Vec<TimelineEntry>> {
        if period <= Duration::zero() {
            return Err(DuelError::InvalidParameter(format!(
                "timeline period must be positive, got {}",
                period
            )));
        }
        let mut entries = Vec::new();
        let (start, end) = match self.time_span() {
            Some(span) => span,
            None => return Ok(entries),
        };

        // stops early once the next step is past the representable range
        let mut next = Some(start);
        while let Some(t) = next.filter(|t| *t <= end) {
            if let Some(result) = self.align_at(t) {
                entries.push(TimelineEntry { time: t, result });
            }
            next = t.checked_add_signed(period);
        }
        debug!("timeline from {} to {}: {} entries", start, end, entries.len());
        Ok(entries)
    }
}

/// `Params::period_secs` as a duration, millisecond resolution
pub fn period_of(params: &Params) -> Result<Duration> {
    params.validate()?;
    let period = Duration::milliseconds((params.period_secs * 1000.0).round() as i64);
    if period <= Duration::zero() {
        return Err(DuelError::InvalidParameter(format!(
            "period_secs {} is below a millisecond",
            params.period_secs
        )));
    }
    Ok(period)
}
