use serde::{Deserialize, Serialize};

use crate::error::{DuelError, Result};

/// Earth model used for every distance of a run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistanceModel {
    /// sphere with the mean earth radius
    Haversine,
    /// WGS-84 ellipsoid
    Geodesic,
}

impl Default for DistanceModel {
    fn default() -> Self {
        DistanceModel::Haversine
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Params {
    pub distance_model: DistanceModel,

    /// number of decimals kept for `speed_kmh` and `cumulative_km`
    pub precision: u32,

    /// step of the gap timeline
    pub period_secs: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            distance_model: DistanceModel::default(),
            precision: 2,
            period_secs: 1.0,
        }
    }
}

impl Params {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let params: Params = serde_json::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.period_secs.is_finite() && self.period_secs > 0.0) {
            return Err(DuelError::InvalidParameter(format!(
                "period_secs must be positive, got {}",
                self.period_secs
            )));
        }
        if self.precision > 9 {
            return Err(DuelError::InvalidParameter(format!(
                "precision must be at most 9 decimals, got {}",
                self.precision
            )));
        }
        Ok(())
    }

    /// round `value` to `self.precision` decimals
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.precision as i32);
        (value * factor).round() / factor
    }
}

#[cfg(test)]
mod tests {
    use super::{DistanceModel, Params};

    #[test]
    fn partial_json_keeps_defaults() {
        let params = Params::from_json_str(r#"{"distance_model": "geodesic"}"#).unwrap();
        assert_eq!(params.distance_model, DistanceModel::Geodesic);
        assert_eq!(params.precision, 2);
        assert_eq!(params.period_secs, 1.0);
    }

    #[test]
    fn rejects_non_positive_period() {
        assert!(Params::from_json_str(r#"{"period_secs": 0}"#).is_err());
        assert!(Params::from_json_str(r#"{"period_secs": -3.0}"#).is_err());
    }

    #[test]
    fn rounding() {
        let params = Params::default();
        assert_eq!(params.round(40.0307), 40.03);
        assert_eq!(params.round(0.111195), 0.11);

        let params = Params {
            precision: 0,
            ..Default::default()
        };
        assert_eq!(params.round(12.6), 13.0);
    }
}
