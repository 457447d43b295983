use crate::detection::Detection;
use crate::tracker::assignment::{build_cost_matrix, solve_greedy, solve_hungarian};
use crate::tracker::crossing::CrossingCounts;
use crate::tracker::stats::TrackingStatistics;
use crate::tracker::track::{Track, TrackSnapshot};
use crate::tracker::{AssignmentSolver, CardinalDirection, CrossingPolicy, TrackerOptions};
use crate::Errors;
use anyhow::Result;
use log::{debug, info};
use std::collections::HashMap;

/// Identity-stable tracker over per-frame detection lists.
///
/// One logical caller feeds detections in strictly increasing frame order;
/// every call is a single transaction over the track table. The tracker
/// owns all track state and hands out plain snapshots.
///
/// ```
/// use trackway::detection::{Detection, ObjectClass};
/// use trackway::tracker::multi::MultiObjectTracker;
/// use trackway::tracker::TrackerOptions;
/// use trackway::utils::bbox::BoundingBox;
///
/// let mut tracker = MultiObjectTracker::new(TrackerOptions::new());
/// let bbox = BoundingBox::new(100.0, 600.0, 220.0, 660.0).unwrap();
/// let det = Detection::new(bbox, ObjectClass::Car, 0.9).unwrap();
/// let tracks = tracker.update(&[det], 1).unwrap();
/// assert_eq!(tracks.len(), 1);
/// ```
#[derive(Debug)]
pub struct MultiObjectTracker {
    pub(crate) opts: TrackerOptions,
    pub(crate) tracks: HashMap<u64, Track>,
    track_id: u64,
    last_frame: Option<u64>,
    pub(crate) total_tracks_created: usize,
    pub(crate) total_tracks_completed: usize,
    pub(crate) crossing_counts: CrossingCounts,
}

impl MultiObjectTracker {
    pub fn new(opts: TrackerOptions) -> Self {
        Self {
            opts,
            tracks: HashMap::default(),
            track_id: 0,
            last_frame: None,
            total_tracks_created: 0,
            total_tracks_completed: 0,
            crossing_counts: CrossingCounts::default(),
        }
    }

    fn gen_track_id(&mut self) -> u64 {
        self.track_id += 1;
        self.track_id
    }

    /// Runs one tracking step and returns snapshots of the tracks active
    /// afterwards, ordered by id.
    ///
    /// Fails with [`Errors::NonMonotonicFrame`] before touching any state
    /// when `frame` does not strictly increase. An empty detection list is
    /// a normal step: every active track simply ages towards retirement.
    ///
    pub fn update(&mut self, detections: &[Detection], frame: u64) -> Result<Vec<TrackSnapshot>> {
        if let Some(last) = self.last_frame {
            if frame <= last {
                return Err(Errors::NonMonotonicFrame {
                    last,
                    received: frame,
                }
                .into());
            }
        }
        self.last_frame = Some(frame);

        let (associations, unmatched_detections, unmatched_tracks) = self.associate(detections);

        for (track_id, det_idx) in associations {
            self.apply_match(track_id, &detections[det_idx], frame);
        }
        for det_idx in unmatched_detections {
            self.spawn_track(&detections[det_idx], frame);
        }
        for track_id in unmatched_tracks {
            self.age_track(track_id);
        }
        self.purge_expired(frame);

        let active = self.active_tracks();
        debug!("frame {frame}: {} active tracks", active.len());
        Ok(active)
    }

    /// Class-gated nearest-center association between active tracks and the
    /// detections of the current frame.
    ///
    fn associate(&self, detections: &[Detection]) -> (Vec<(u64, usize)>, Vec<usize>, Vec<u64>) {
        let mut track_ids = self
            .tracks
            .iter()
            .filter_map(|(id, track)| track.is_active.then_some(*id))
            .collect::<Vec<_>>();
        // keep row order independent of hash iteration order
        track_ids.sort_unstable();

        if track_ids.is_empty() {
            return (
                Vec::default(),
                (0..detections.len()).collect(),
                Vec::default(),
            );
        }
        if detections.is_empty() {
            return (Vec::default(), Vec::default(), track_ids);
        }

        let track_refs = track_ids
            .iter()
            .map(|id| {
                let track = &self.tracks[id];
                (track.center, track.object_class)
            })
            .collect::<Vec<_>>();

        let rows = track_ids.len();
        let cols = detections.len();
        let costs = build_cost_matrix(&track_refs, detections, self.opts.max_distance);
        let pairs = match self.opts.solver {
            AssignmentSolver::Greedy => solve_greedy(costs, rows, cols),
            AssignmentSolver::Hungarian => {
                solve_hungarian(&costs, rows, cols, self.opts.max_distance)
            }
        };

        let mut matched_rows = vec![false; rows];
        let mut matched_cols = vec![false; cols];
        let mut associations = Vec::with_capacity(pairs.len());
        for (row, col) in pairs {
            matched_rows[row] = true;
            matched_cols[col] = true;
            associations.push((track_ids[row], col));
        }

        let unmatched_detections = (0..cols).filter(|col| !matched_cols[*col]).collect();
        let unmatched_tracks = track_ids
            .iter()
            .enumerate()
            .filter_map(|(row, id)| (!matched_rows[row]).then_some(*id))
            .collect();

        (associations, unmatched_detections, unmatched_tracks)
    }

    fn apply_match(&mut self, track_id: u64, detection: &Detection, frame: u64) {
        let Some(track) = self.tracks.get_mut(&track_id) else {
            return;
        };
        let old_center = track.apply(detection, frame);

        for (idx, line) in self.opts.counting_lines.iter().enumerate() {
            if let Some(direction) = line.crossed_by(&old_center, &track.center) {
                let counts = match self.opts.crossing_policy {
                    CrossingPolicy::FirstCrossingOnly => !track.has_crossed,
                    CrossingPolicy::PerLine => !track.crossed_lines.contains(&idx),
                };
                if counts {
                    track.has_crossed = true;
                    track.crossed_lines.push(idx);
                    self.crossing_counts.bump(direction);
                    info!(
                        "track {} ({}) crossed line {} heading {}",
                        track.id,
                        track.object_class,
                        line.name(),
                        direction
                    );
                }
            }
        }
    }

    fn spawn_track(&mut self, detection: &Detection, frame: u64) {
        let id = self.gen_track_id();
        let entry = CardinalDirection::nearest_edge(&detection.center(), &self.opts.frame_size);
        self.tracks
            .insert(id, Track::new(id, detection, frame, entry));
        self.total_tracks_created += 1;
        debug!("new track {id} ({})", detection.object_class());
    }

    fn age_track(&mut self, track_id: u64) {
        let max_frames_lost = self.opts.max_frames_lost;
        let min_track_length = self.opts.min_track_length;
        let frame_size = self.opts.frame_size;

        let Some(track) = self.tracks.get_mut(&track_id) else {
            return;
        };
        track.frames_lost += 1;

        if track.frames_lost >= max_frames_lost {
            track.is_active = false;
            track.exit_point = Some(CardinalDirection::nearest_edge(&track.center, &frame_size));
            if track.frames_tracked >= min_track_length {
                self.total_tracks_completed += 1;
            }
            debug!(
                "track {track_id} retired after {} lost frames",
                track.frames_lost
            );
        }
    }

    fn purge_expired(&mut self, frame: u64) {
        let grace = self.opts.purge_after_frames;
        self.tracks.retain(|id, track| {
            let keep = track.is_active || frame - track.last_seen_frame <= grace;
            if !keep {
                debug!("track {id} dropped from the table");
            }
            keep
        });
    }

    /// Snapshots of all currently active tracks, ordered by id.
    ///
    pub fn active_tracks(&self) -> Vec<TrackSnapshot> {
        let mut snapshots = self
            .tracks
            .values()
            .filter(|track| track.is_active)
            .map(TrackSnapshot::from)
            .collect::<Vec<_>>();
        snapshots.sort_unstable_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Looks a single track up, including inactive ones still inside the
    /// purge grace period.
    ///
    pub fn track(&self, id: u64) -> Option<TrackSnapshot> {
        self.tracks.get(&id).map(TrackSnapshot::from)
    }

    pub fn crossing_counts(&self) -> CrossingCounts {
        self.crossing_counts
    }

    pub fn statistics(&self) -> TrackingStatistics {
        TrackingStatistics::collect(self)
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.opts
    }

    /// Drops all tracks and counters and starts the id sequence over. The
    /// configuration, counting lines included, survives.
    ///
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.track_id = 0;
        self.last_frame = None;
        self.total_tracks_created = 0;
        self.total_tracks_completed = 0;
        self.crossing_counts = CrossingCounts::default();
        info!("tracker reset");
    }
}
