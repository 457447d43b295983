use crate::detection::{Detection, ObjectClass};
use crate::tracker::CardinalDirection;
use crate::utils::bbox::BoundingBox;
use nalgebra::{Point2, Vector2};
use std::collections::VecDeque;

/// Length of the per-track ring buffers of centers, confidences and frame
/// indices.
pub const HISTORY_LENGTH: usize = 30;

const HEADING_DEADZONE: f32 = 0.1;

/// Internal state of one tracked object.
///
/// Owned exclusively by the tracker; the outside world only ever sees
/// [`TrackSnapshot`] copies.
///
#[derive(Debug, Clone)]
pub(crate) struct Track {
    /// unique id, never reused within a session
    pub(crate) id: u64,
    /// fixed at creation, a track never changes class
    pub(crate) object_class: ObjectClass,
    pub(crate) bbox: BoundingBox,
    pub(crate) center: Point2<f32>,
    pub(crate) confidence: f32,
    /// recent centers, oldest first
    pub(crate) positions: VecDeque<Point2<f32>>,
    /// confidences aligned with `positions`
    pub(crate) confidences: VecDeque<f32>,
    /// frame indices aligned with `positions`
    pub(crate) frame_history: VecDeque<u64>,
    pub(crate) first_seen_frame: u64,
    pub(crate) last_seen_frame: u64,
    pub(crate) frames_tracked: usize,
    pub(crate) frames_lost: usize,
    /// raw center delta of the last association
    pub(crate) velocity: Vector2<f32>,
    /// degrees, refreshed only outside the movement dead-zone
    pub(crate) heading: f32,
    pub(crate) is_active: bool,
    pub(crate) has_crossed: bool,
    /// indices of counting lines already counted for this track
    pub(crate) crossed_lines: Vec<usize>,
    pub(crate) entry_point: Option<CardinalDirection>,
    pub(crate) exit_point: Option<CardinalDirection>,
}

impl Track {
    pub(crate) fn new(
        id: u64,
        detection: &Detection,
        frame: u64,
        entry_point: CardinalDirection,
    ) -> Self {
        let mut track = Self {
            id,
            object_class: detection.object_class(),
            bbox: *detection.bbox(),
            center: detection.center(),
            confidence: detection.confidence(),
            positions: VecDeque::default(),
            confidences: VecDeque::default(),
            frame_history: VecDeque::default(),
            first_seen_frame: frame,
            last_seen_frame: frame,
            frames_tracked: 1,
            frames_lost: 0,
            velocity: Vector2::zeros(),
            heading: 0.0,
            is_active: true,
            has_crossed: false,
            crossed_lines: Vec::default(),
            entry_point: Some(entry_point),
            exit_point: None,
        };
        track.update_history(detection.center(), detection.confidence(), frame);
        track
    }

    /// Applies an associated detection and returns the previous center for
    /// the crossing check of the caller.
    ///
    pub(crate) fn apply(&mut self, detection: &Detection, frame: u64) -> Point2<f32> {
        self.bbox = *detection.bbox();
        self.confidence = detection.confidence();

        let old_center = self.center;
        self.center = detection.center();
        self.update_history(self.center, self.confidence, frame);

        self.velocity = self.center - old_center;
        if self.velocity.x.abs() > HEADING_DEADZONE || self.velocity.y.abs() > HEADING_DEADZONE {
            self.heading = self.velocity.y.atan2(self.velocity.x).to_degrees();
        }

        self.last_seen_frame = frame;
        self.frames_tracked += 1;
        self.frames_lost = 0;

        old_center
    }

    fn update_history(&mut self, position: Point2<f32>, confidence: f32, frame: u64) {
        self.positions.push_back(position);
        self.confidences.push_back(confidence);
        self.frame_history.push_back(frame);
        if self.positions.len() > HISTORY_LENGTH {
            self.positions.pop_front();
            self.confidences.pop_front();
            self.frame_history.pop_front();
        }
    }
}

/// Plain-data view of a track returned to the caller.
///
#[derive(Debug, Clone)]
pub struct TrackSnapshot {
    /// id of the track
    pub id: u64,
    /// class fixed at track creation
    pub object_class: ObjectClass,
    /// last observed box
    pub bbox: BoundingBox,
    /// last observed center
    pub center: Point2<f32>,
    /// last observed confidence
    pub confidence: f32,
    /// center delta of the last association
    pub velocity: Vector2<f32>,
    /// heading in degrees
    pub heading: f32,
    /// number of frames with a successful association
    pub frames_tracked: usize,
    /// consecutive unmatched frames so far
    pub frames_lost: usize,
    pub first_seen_frame: u64,
    pub last_seen_frame: u64,
    pub is_active: bool,
    /// whether any counting line was ever crossed
    pub has_crossed: bool,
    pub entry_point: Option<CardinalDirection>,
    pub exit_point: Option<CardinalDirection>,
}

impl From<&Track> for TrackSnapshot {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            object_class: track.object_class,
            bbox: track.bbox,
            center: track.center,
            confidence: track.confidence,
            velocity: track.velocity,
            heading: track.heading,
            frames_tracked: track.frames_tracked,
            frames_lost: track.frames_lost,
            first_seen_frame: track.first_seen_frame,
            last_seen_frame: track.last_seen_frame,
            is_active: track.is_active,
            has_crossed: track.has_crossed,
            entry_point: track.entry_point,
            exit_point: track.exit_point,
        }
    }
}
