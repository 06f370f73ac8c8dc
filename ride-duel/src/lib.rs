//! Side-by-side comparison of two GPS tracks of the same ride.
//!
//! Load a track per rider, derive speed and distance for every sample,
//! then ask an [`Aligner`] where both riders are at any moment.

pub mod algo;
pub mod align;
pub mod derive;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod params;
pub mod summary;

pub use align::{Aligner, TimelineEntry};
pub use derive::derive;
pub use error::{DuelError, Result};
pub use loader::{load, LoadReport, RawRecord};
pub use model::{AlignmentResult, DerivedSample, RiderLabel, Sample, Track};
pub use params::{DistanceModel, Params};
pub use summary::TrackSummary;
