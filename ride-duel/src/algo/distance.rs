use geo::prelude::{GeodesicDistance, HaversineDistance};
use geo_types::Point;
use uom::si::f64::Length;
use uom::si::length::meter;

use crate::params::DistanceModel;

impl DistanceModel {
    /// surface distance between two lon/lat points
    pub fn length(&self, p1: &Point<f64>, p2: &Point<f64>) -> Length {
        Length::new::<meter>(self.meters(p1, p2))
    }

    pub fn meters(&self, p1: &Point<f64>, p2: &Point<f64>) -> f64 {
        match self {
            DistanceModel::Haversine => p1.haversine_distance(p2),
            DistanceModel::Geodesic => p1.geodesic_distance(p2),
        }
    }
}
