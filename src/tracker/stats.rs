use crate::detection::ObjectClass;
use crate::tracker::crossing::CrossingCounts;
use crate::tracker::multi::MultiObjectTracker;
use std::collections::HashMap;

/// Per-class slice of the tracking picture.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassStats {
    pub active: usize,
    pub completed: usize,
    pub total: usize,
}

/// Aggregate view over one tracker, cheap enough to compute every frame.
///
/// `completed_tracks` and `mean_track_length` cover the completed tracks
/// still resident in the table; `total_tracks_created` and
/// `total_tracks_completed` are lifetime counters that survive purging.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackingStatistics {
    pub active_tracks: usize,
    pub completed_tracks: usize,
    pub total_tracks_created: usize,
    pub total_tracks_completed: usize,
    pub crossing_counts: CrossingCounts,
    pub class_statistics: HashMap<ObjectClass, ClassStats>,
    pub mean_track_length: f32,
}

impl TrackingStatistics {
    pub(crate) fn collect(tracker: &MultiObjectTracker) -> Self {
        let min_track_length = tracker.opts.min_track_length;

        let mut active_tracks = 0;
        let mut completed_tracks = 0;
        let mut completed_length_sum = 0usize;
        let mut class_statistics: HashMap<ObjectClass, ClassStats> = HashMap::default();

        for track in tracker.tracks.values() {
            if track.is_active {
                active_tracks += 1;
                let entry = class_statistics.entry(track.object_class).or_default();
                entry.active += 1;
                entry.total += 1;
            } else if track.frames_tracked >= min_track_length {
                completed_tracks += 1;
                completed_length_sum += track.frames_tracked;
                let entry = class_statistics.entry(track.object_class).or_default();
                entry.completed += 1;
                entry.total += 1;
            }
        }

        let mean_track_length = if completed_tracks > 0 {
            completed_length_sum as f32 / completed_tracks as f32
        } else {
            0.0
        };

        Self {
            active_tracks,
            completed_tracks,
            total_tracks_created: tracker.total_tracks_created,
            total_tracks_completed: tracker.total_tracks_completed,
            crossing_counts: tracker.crossing_counts,
            class_statistics,
            mean_track_length,
        }
    }
}
