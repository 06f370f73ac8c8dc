//! Per-sample speed and cumulative distance.

use tracing::trace;
use uom::si::f64::Length;
use uom::si::length::{kilometer, meter};
use uom::si::velocity::kilometer_per_hour;

use crate::algo::speed::{elapsed_seconds, velocity};
use crate::model::{DerivedSample, RiderLabel, Sample, Track};
use crate::params::Params;

/// Derive speed and cumulative distance for each sample, in order.
///
/// The first sample gets zero speed and zero distance. A pair of samples
/// whose clock does not advance gets zero speed but its distance still
/// counts towards the total.
pub fn derive(label: RiderLabel, samples: &[Sample], params: &Params) -> Track {
    let model = params.distance_model;
    let points = samples
        .iter()
        .scan(None::<(&Sample, Length)>, |state, sample| {
            let (speed_kmh, total) = match *state {
                None => (0.0, Length::new::<meter>(0.0)),
                Some((previous, total)) => {
                    let leg = model.length(&previous.point, &sample.point);
                    let dt = elapsed_seconds(previous, sample);
                    if dt <= 0.0 {
                        trace!(
                            "clock anomaly at {}: {}s after previous sample",
                            sample.timestamp,
                            dt
                        );
                    }
                    (velocity(leg, dt).get::<kilometer_per_hour>(), total + leg)
                }
            };
            *state = Some((sample, total));
            Some(DerivedSample {
                sample: *sample,
                speed_kmh: params.round(speed_kmh),
                cumulative_km: params.round(total.get::<kilometer>()),
            })
        })
        .collect();
    Track::new(label, points)
}

#[cfg(test)]
mod tests {
    use super::derive;
    use crate::loader::{load, RawRecord};
    use crate::model::{RiderLabel, Sample};
    use crate::params::{DistanceModel, Params};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uom::si::f64::Length;
    use uom::si::length::{kilometer, meter};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    fn label() -> RiderLabel {
        RiderLabel::new("A")
    }

    #[test]
    fn thousandth_degree_in_ten_seconds() {
        let samples = vec![Sample::new(0.0, 0.0, t(0)), Sample::new(0.0, 0.001, t(10))];
        let track = derive(label(), &samples, &Params::default());
        let points = track.points();
        assert_eq!(points[0].speed_kmh, 0.0);
        assert_eq!(points[0].cumulative_km, 0.0);
        assert_eq!(points[1].cumulative_km, 0.11);
        assert_eq!(points[1].speed_kmh, 40.03);
    }

    #[test]
    fn degenerate_tracks() {
        let empty = derive(label(), &[], &Params::default());
        assert!(empty.is_empty());

        let single = derive(label(), &[Sample::new(10.0, 10.0, t(0))], &Params::default());
        assert_eq!(single.len(), 1);
        assert_eq!(single.points()[0].speed_kmh, 0.0);
        assert_eq!(single.points()[0].cumulative_km, 0.0);
    }

    #[test]
    fn clock_anomaly_keeps_distance() {
        let samples = vec![
            Sample::new(0.0, 0.0, t(0)),
            Sample::new(0.0, 0.01, t(0)),
            Sample::new(0.0, 0.02, t(-5)),
            Sample::new(0.0, 0.03, t(60)),
        ];
        let track = derive(label(), &samples, &Params::default());
        let points = track.points();
        assert_eq!(points[1].speed_kmh, 0.0);
        assert_eq!(points[2].speed_kmh, 0.0);
        assert!(points[3].speed_kmh > 0.0);
        assert_eq!(points[1].cumulative_km, 1.11);
        assert_eq!(points[2].cumulative_km, 2.22);
        assert_eq!(points[3].cumulative_km, 3.34);
    }

    #[test]
    fn cumulative_is_monotonic() {
        let samples: Vec<_> = (0..200)
            .map(|i| {
                let i = i as f64;
                Sample::new(45.0 + (i * 0.37).sin() * 0.01, 6.0 + i * 0.0003, t(i as i64 * 3))
            })
            .collect();
        let track = derive(label(), &samples, &Params::default());
        assert_eq!(track.len(), samples.len());
        for window in track.points().windows(2) {
            assert!(window[1].cumulative_km >= window[0].cumulative_km);
            assert!(window[1].speed_kmh >= 0.0);
        }
    }

    #[test]
    fn last_cumulative_matches_total_distance() {
        let report = load(
            (0..50)
                .map(|i| {
                    RawRecord::new(
                        &format!("{}", 48.0 + i as f64 * 0.0007),
                        &format!("{}", 2.0 + (i % 7) as f64 * 0.0004),
                        Some(&format!("2024-04-20T07:{:02}:{:02}Z", i / 60, i % 60)),
                    )
                })
                .collect::<Vec<_>>(),
        );
        for model in [DistanceModel::Haversine, DistanceModel::Geodesic] {
            let params = Params {
                distance_model: model,
                ..Default::default()
            };
            let track = derive(label(), &report.samples, &params);
            let total_km = report
                .samples
                .windows(2)
                .map(|window| model.length(&window[0].point, &window[1].point))
                .fold(Length::new::<meter>(0.0), |total, leg| total + leg)
                .get::<kilometer>();
            let last = track.last().unwrap().cumulative_km;
            assert!((last - total_km).abs() <= 0.005, "{} vs {}", last, total_km);
        }
    }

    #[test]
    fn precision_is_configurable() {
        let samples = vec![Sample::new(0.0, 0.0, t(0)), Sample::new(0.0, 0.001, t(10))];
        let params = Params {
            precision: 4,
            ..Default::default()
        };
        let track = derive(label(), &samples, &params);
        assert_eq!(track.points()[1].cumulative_km, 0.1112);
    }
}
