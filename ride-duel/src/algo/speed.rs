use uom::si::f64::{Length, Time, Velocity};
use uom::si::time::second;
use uom::si::velocity::meter_per_second;

use crate::algo::PointInTime;

/// seconds elapsed from `tp1` to `tp2`, negative when the clock went backwards
pub fn elapsed_seconds<CIP>(tp1: &CIP, tp2: &CIP) -> f64
where
    CIP: PointInTime,
{
    (tp2.timestamp() - tp1.timestamp()).num_milliseconds() as f64 / 1000.0
}

/// `distance / dt`, zero when `dt` is zero or negative
pub fn velocity(distance: Length, dt_seconds: f64) -> Velocity {
    if dt_seconds > 0.0 {
        distance / Time::new::<second>(dt_seconds)
    } else {
        Velocity::new::<meter_per_second>(0.0)
    }
}
