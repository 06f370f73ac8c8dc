use crate::algo::PointInTime;
use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

fn point_ser<S>(point: &Point<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut state = serializer.serialize_struct("coord", 2)?;
    state.serialize_field("lon", &point.0.x)?;
    state.serialize_field("lat", &point.0.y)?;
    state.end()
}

/// one recorded position of a track
#[derive(PartialEq, Serialize, Clone, Copy, Debug)]
pub struct Sample {
    /// x = longitude, y = latitude
    #[serde(serialize_with = "point_ser")]
    pub point: Point<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            point: Point::new(longitude, latitude),
            timestamp,
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.point.y()
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.point.x()
    }
}

impl PointInTime for Sample {
    #[inline]
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[inline]
    fn point(&self) -> Point<f64> {
        self.point
    }
}

/// a sample with the metrics derived from its predecessors
#[derive(PartialEq, Serialize, Clone, Copy, Debug)]
pub struct DerivedSample {
    #[serde(flatten)]
    pub sample: Sample,

    /// speed from the previous sample, 0 for the first one
    pub speed_kmh: f64,

    /// distance covered since the first sample
    pub cumulative_km: f64,
}

impl DerivedSample {
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.sample.latitude()
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.sample.longitude()
    }
}

impl PointInTime for DerivedSample {
    #[inline]
    fn timestamp(&self) -> DateTime<Utc> {
        self.sample.timestamp
    }

    #[inline]
    fn point(&self) -> Point<f64> {
        self.sample.point
    }
}

/// presentation identity of a rider
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RiderLabel {
    pub name: String,
    pub color: Option<String>,
}

impl RiderLabel {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    pub fn with_color<S: Into<String>>(mut self, color: S) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// The derived samples of one rider. Immutable once constructed.
#[derive(Serialize, Clone, Debug)]
pub struct Track {
    label: RiderLabel,
    points: Vec<DerivedSample>,

    #[serde(skip)]
    time_ordered: bool,
}

impl Track {
    pub fn new(label: RiderLabel, points: Vec<DerivedSample>) -> Self {
        let time_ordered = points
            .windows(2)
            .all(|window| window[0].timestamp() <= window[1].timestamp());
        Self {
            label,
            points,
            time_ordered,
        }
    }

    pub fn label(&self) -> &RiderLabel {
        &self.label
    }

    pub fn points(&self) -> &[DerivedSample] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// true when the timestamps never decrease along the track
    pub fn is_time_ordered(&self) -> bool {
        self.time_ordered
    }

    pub fn first(&self) -> Option<&DerivedSample> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&DerivedSample> {
        self.points.last()
    }
}

/// Where both riders are for one query time.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AlignmentResult {
    /// sample of A closest in time to the query
    pub a: DerivedSample,

    /// sample of B closest in space to `a`
    pub b: DerivedSample,

    /// `a.timestamp - b.timestamp`; positive when A reached the spot after B
    pub time_gap_seconds: f64,

    /// distance between `a` and `b` in meters
    pub match_distance_m: f64,

    /// `a.cumulative_km - b.cumulative_km`
    pub distance_gap_km: f64,
}

impl AlignmentResult {
    pub fn speed_a_kmh(&self) -> f64 {
        self.a.speed_kmh
    }

    pub fn speed_b_kmh(&self) -> f64 {
        self.b.speed_kmh
    }

    pub fn cumulative_a_km(&self) -> f64 {
        self.a.cumulative_km
    }

    pub fn cumulative_b_km(&self) -> f64 {
        self.b.cumulative_km
    }

    /// true when A is behind B at the matched spot
    pub fn a_is_behind(&self) -> bool {
        self.time_gap_seconds > 0.0
    }
}
