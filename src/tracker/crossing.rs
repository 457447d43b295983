use crate::tracker::CardinalDirection;
use crate::utils::bbox::FrameSize;
use crate::zones::geometry::segments_intersect;
use crate::EPS;
use nalgebra::Point2;

/// Which movement component a line counts.
///
/// The tag names the crossing, not the line geometry: a geometrically
/// horizontal line detects vertical movement and therefore carries
/// [`LineOrientation::VerticalCrossing`].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrientation {
    /// Crossings are classified north/south from the sign of the vertical
    /// movement.
    VerticalCrossing,
    /// Crossings are classified east/west from the sign of the horizontal
    /// movement.
    HorizontalCrossing,
}

/// A named segment objects are counted against.
///
#[derive(Debug, Clone)]
pub struct CountingLine {
    name: String,
    start: Point2<f32>,
    end: Point2<f32>,
    orientation: LineOrientation,
}

impl CountingLine {
    /// # Parameters
    /// * `name` - label reported in logs
    /// * `start`, `end` - segment endpoints, must be distinct
    /// * `orientation` - which compass pair a crossing yields
    ///
    pub fn new(
        name: impl Into<String>,
        start: Point2<f32>,
        end: Point2<f32>,
        orientation: LineOrientation,
    ) -> Self {
        assert!(
            (end - start).norm() > EPS,
            "counting line endpoints must be distinct"
        );
        Self {
            name: name.into(),
            start,
            end,
            orientation,
        }
    }

    /// Horizontal line across the frame center, counting north/south
    /// movement.
    ///
    pub fn center_horizontal(frame: &FrameSize) -> Self {
        let center_y = frame.height / 2.0;
        Self::new(
            "horizontal",
            Point2::new(0.0, center_y),
            Point2::new(frame.width, center_y),
            LineOrientation::VerticalCrossing,
        )
    }

    /// Vertical line across the frame center, counting east/west movement.
    ///
    pub fn center_vertical(frame: &FrameSize) -> Self {
        let center_x = frame.width / 2.0;
        Self::new(
            "vertical",
            Point2::new(center_x, 0.0),
            Point2::new(center_x, frame.height),
            LineOrientation::HorizontalCrossing,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn orientation(&self) -> LineOrientation {
        self.orientation
    }

    /// Classifies the movement `old -> new` against this line. `None` when
    /// the movement segment does not intersect it.
    ///
    pub fn crossed_by(
        &self,
        old: &Point2<f32>,
        new: &Point2<f32>,
    ) -> Option<CardinalDirection> {
        if !segments_intersect(old, new, &self.start, &self.end) {
            return None;
        }
        Some(match self.orientation {
            LineOrientation::VerticalCrossing => {
                if new.y < old.y {
                    CardinalDirection::North
                } else {
                    CardinalDirection::South
                }
            }
            LineOrientation::HorizontalCrossing => {
                if new.x > old.x {
                    CardinalDirection::East
                } else {
                    CardinalDirection::West
                }
            }
        })
    }
}

/// Cumulative crossing counters per compass direction.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrossingCounts {
    pub north: u64,
    pub south: u64,
    pub east: u64,
    pub west: u64,
}

impl CrossingCounts {
    pub(crate) fn bump(&mut self, direction: CardinalDirection) {
        match direction {
            CardinalDirection::North => self.north += 1,
            CardinalDirection::South => self.south += 1,
            CardinalDirection::East => self.east += 1,
            CardinalDirection::West => self.west += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.north + self.south + self.east + self.west
    }
}
