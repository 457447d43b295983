/// Cost matrix construction and assignment solvers
pub mod assignment;

/// Counting lines and crossing direction classification
pub mod crossing;

/// The multi-object tracker itself
pub mod multi;

/// Read-side aggregation over the track table
pub mod stats;

/// Persistent track state and its public snapshot
pub mod track;

use crate::tracker::crossing::CountingLine;
use crate::utils::bbox::FrameSize;
use nalgebra::Point2;
use std::fmt;

/// Default maximal center distance in px for a detection to be associated
/// with a track.
pub const DEFAULT_MAX_DISTANCE: f32 = 100.0;

/// Default minimal number of tracked frames for a retired track to count as
/// completed.
pub const DEFAULT_MIN_TRACK_LENGTH: usize = 5;

/// Default number of consecutive unmatched frames before a track retires.
pub const DEFAULT_MAX_FRAMES_LOST: usize = 10;

/// Default number of frames an inactive track stays queryable before it is
/// dropped from the table.
pub const DEFAULT_PURGE_AFTER_FRAMES: u64 = 100;

/// Compass label used for crossing counters and entry/exit edges.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

impl CardinalDirection {
    /// The frame edge closest to `center`. Ties resolve in the order
    /// north, south, west, east.
    ///
    pub fn nearest_edge(center: &Point2<f32>, frame: &FrameSize) -> Self {
        [
            (CardinalDirection::North, center.y),
            (CardinalDirection::South, frame.height - center.y),
            (CardinalDirection::West, center.x),
            (CardinalDirection::East, frame.width - center.x),
        ]
        .into_iter()
        .min_by(|l, r| l.1.total_cmp(&r.1))
        .map(|(direction, _)| direction)
        .unwrap_or(CardinalDirection::North)
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardinalDirection::North => "north",
            CardinalDirection::South => "south",
            CardinalDirection::East => "east",
            CardinalDirection::West => "west",
        };
        write!(f, "{name}")
    }
}

/// How matched (track, detection) pairs are selected from the cost matrix.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignmentSolver {
    /// Repeated global minimum selection with row/column invalidation.
    /// Deterministic and fast, but not a globally optimal matching.
    #[default]
    Greedy,
    /// Minimum-cost bipartite matching (Kuhn-Munkres) over the same gated
    /// matrix.
    Hungarian,
}

/// When a line crossing increments the counters.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossingPolicy {
    /// Only the very first crossing of any line is counted per track.
    #[default]
    FirstCrossingOnly,
    /// Each line is counted once per track.
    PerLine,
}

/// Tracker configuration, a fluent builder consumed at construction time.
///
/// ```
/// use trackway::tracker::TrackerOptions;
/// use trackway::utils::bbox::FrameSize;
///
/// let opts = TrackerOptions::new()
///     .max_distance(80.0)
///     .max_frames_lost(5)
///     .frame_size(FrameSize::new(1280.0, 720.0))
///     .default_counting_lines();
/// ```
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    pub(crate) max_distance: f32,
    pub(crate) min_track_length: usize,
    pub(crate) max_frames_lost: usize,
    pub(crate) purge_after_frames: u64,
    pub(crate) frame_size: FrameSize,
    pub(crate) counting_lines: Vec<CountingLine>,
    pub(crate) solver: AssignmentSolver,
    pub(crate) crossing_policy: CrossingPolicy,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            min_track_length: DEFAULT_MIN_TRACK_LENGTH,
            max_frames_lost: DEFAULT_MAX_FRAMES_LOST,
            purge_after_frames: DEFAULT_PURGE_AFTER_FRAMES,
            frame_size: FrameSize::default(),
            counting_lines: Vec::default(),
            solver: AssignmentSolver::default(),
            crossing_policy: CrossingPolicy::default(),
        }
    }
}

impl TrackerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximal center distance for association.
    ///
    /// # Parameters
    /// * `max_distance` - distance in px, must be positive
    ///
    pub fn max_distance(mut self, max_distance: f32) -> Self {
        assert!(max_distance > 0.0, "max distance must be positive");
        self.max_distance = max_distance;
        self
    }

    /// Sets the minimal lifetime in frames for a track to be counted as
    /// completed at retirement.
    ///
    pub fn min_track_length(mut self, min_track_length: usize) -> Self {
        assert!(
            min_track_length > 0,
            "minimal track length must be positive"
        );
        self.min_track_length = min_track_length;
        self
    }

    /// Sets the number of consecutive unmatched frames after which a track
    /// retires.
    ///
    pub fn max_frames_lost(mut self, max_frames_lost: usize) -> Self {
        assert!(max_frames_lost > 0, "max frames lost must be positive");
        self.max_frames_lost = max_frames_lost;
        self
    }

    /// Sets how long an inactive track stays queryable before removal.
    ///
    pub fn purge_after_frames(mut self, purge_after_frames: u64) -> Self {
        self.purge_after_frames = purge_after_frames;
        self
    }

    /// Sets the frame dimensions used by the entry/exit edge heuristic.
    ///
    pub fn frame_size(mut self, frame_size: FrameSize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Adds a counting line. Lines are checked in the order they were
    /// added.
    ///
    pub fn counting_line(mut self, line: CountingLine) -> Self {
        self.counting_lines.push(line);
        self
    }

    /// Adds the two default center lines: a horizontal one counting
    /// north/south movement and a vertical one counting east/west movement.
    ///
    pub fn default_counting_lines(mut self) -> Self {
        let frame = self.frame_size;
        self.counting_lines.push(CountingLine::center_horizontal(&frame));
        self.counting_lines.push(CountingLine::center_vertical(&frame));
        self
    }

    pub fn solver(mut self, solver: AssignmentSolver) -> Self {
        self.solver = solver;
        self
    }

    pub fn crossing_policy(mut self, crossing_policy: CrossingPolicy) -> Self {
        self.crossing_policy = crossing_policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::tracker::{CardinalDirection, TrackerOptions};
    use crate::utils::bbox::FrameSize;
    use nalgebra::Point2;

    #[test]
    fn nearest_edge_selection() {
        let frame = FrameSize::new(1920.0, 1080.0);
        assert_eq!(
            CardinalDirection::nearest_edge(&Point2::new(960.0, 10.0), &frame),
            CardinalDirection::North
        );
        assert_eq!(
            CardinalDirection::nearest_edge(&Point2::new(960.0, 1070.0), &frame),
            CardinalDirection::South
        );
        assert_eq!(
            CardinalDirection::nearest_edge(&Point2::new(5.0, 540.0), &frame),
            CardinalDirection::West
        );
        assert_eq!(
            CardinalDirection::nearest_edge(&Point2::new(1915.0, 540.0), &frame),
            CardinalDirection::East
        );
    }

    #[test]
    fn nearest_edge_tie_prefers_north() {
        let frame = FrameSize::new(100.0, 100.0);
        // equidistant from every edge
        assert_eq!(
            CardinalDirection::nearest_edge(&Point2::new(50.0, 50.0), &frame),
            CardinalDirection::North
        );
    }

    #[test]
    fn default_lines_follow_frame_size() {
        let opts = TrackerOptions::new()
            .frame_size(FrameSize::new(640.0, 480.0))
            .default_counting_lines();
        assert_eq!(opts.counting_lines.len(), 2);
    }

    #[test]
    #[should_panic]
    fn zero_max_distance_panics() {
        let _ = TrackerOptions::new().max_distance(0.0);
    }
}
