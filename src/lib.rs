use thiserror::Error;

/// Detection-side input types fed in by an upstream detector.
pub mod detection;

/// The prelude contains the most frequently used crate entities.
pub mod prelude;

/// Multi-object tracking, line crossing counts and tracking statistics.
pub mod tracker;

/// Shared geometric primitives.
pub mod utils;

/// Plausibility and movement-coherence validation of detections.
pub mod validation;

/// Inclusion/exclusion polygon zones over detection centers.
pub mod zones;

#[derive(Error, Debug, Clone)]
pub enum Errors {
    #[error("Bounding box corners must satisfy x1 < x2 and y1 < y2.")]
    DegenerateBBox,
    #[error("Confidence must lie within 0.0..=1.0, got {0}.")]
    ConfidenceOutOfRange(f32),
    #[error("Frame numbers must strictly increase: last processed {last}, received {received}.")]
    NonMonotonicFrame { last: u64, received: u64 },
}

pub(crate) const EPS: f32 = 0.00001;
