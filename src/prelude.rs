/// Frequently used imports
///
pub use crate::detection::{Detection, ObjectClass};
pub use crate::tracker::crossing::{CountingLine, CrossingCounts, LineOrientation};
pub use crate::tracker::multi::MultiObjectTracker;
pub use crate::tracker::stats::{ClassStats, TrackingStatistics};
pub use crate::tracker::track::TrackSnapshot;
pub use crate::tracker::{
    AssignmentSolver, CardinalDirection, CrossingPolicy, TrackerOptions,
};
pub use crate::utils::bbox::{BoundingBox, FrameSize};
pub use crate::validation::coherence::MovementCoherenceFilter;
pub use crate::validation::context::{assess, ContextVerdict, ImplausibleReason};
pub use crate::zones::{Zone, ZoneKind, ZoneOverlay, ZoneRecord, ZoneSet, ZoneSetStats};
