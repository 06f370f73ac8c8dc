use chrono::{DateTime, Utc};
use geo_types::Point;

pub mod distance;
pub mod matching;
pub mod speed;
pub mod time;

pub use matching::{match_by_position, match_by_time};
pub use time::SortChronologically;

pub trait PointInTime {
    fn timestamp(&self) -> DateTime<Utc>;
    fn point(&self) -> Point<f64>;
}
