use chrono::{DateTime, Utc};
use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics};

use crate::algo::speed::elapsed_seconds;
use crate::model::{RiderLabel, Track};

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TrackSummary {
    pub rider: RiderLabel,
    pub point_count: usize,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub duration_seconds: f64,
    pub total_km: f64,

    /// total distance over total duration
    pub average_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub speed_kmh_pc_50: f64,
    pub speed_kmh_pc_90: f64,
}

impl TrackSummary {
    pub fn of(track: &Track) -> Self {
        let (first, last) = match (track.first(), track.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Self {
                    rider: track.label().clone(),
                    point_count: 0,
                    start: None,
                    end: None,
                    duration_seconds: 0.0,
                    total_km: 0.0,
                    average_speed_kmh: 0.0,
                    max_speed_kmh: 0.0,
                    speed_kmh_pc_50: 0.0,
                    speed_kmh_pc_90: 0.0,
                }
            }
        };

        let duration_seconds = elapsed_seconds(first, last).max(0.0);
        let average_speed_kmh = if duration_seconds > 0.0 {
            last.cumulative_km / (duration_seconds / 3600.0)
        } else {
            0.0
        };

        // the first sample has no speed of its own
        let mut speeds = Data::new(
            track
                .points()
                .iter()
                .skip(1)
                .map(|p| p.speed_kmh)
                .collect::<Vec<_>>(),
        );
        let (max_speed_kmh, speed_kmh_pc_50, speed_kmh_pc_90) = if track.len() > 1 {
            (
                speeds.percentile(100),
                speeds.percentile(50),
                speeds.percentile(90),
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        Self {
            rider: track.label().clone(),
            point_count: track.len(),
            start: Some(first.sample.timestamp),
            end: Some(last.sample.timestamp),
            duration_seconds,
            total_km: last.cumulative_km,
            average_speed_kmh,
            max_speed_kmh,
            speed_kmh_pc_50,
            speed_kmh_pc_90,
        }
    }
}
