use crate::Errors;
use anyhow::Result;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box kept in the corner format (x1, y1, x2, y2).
///
/// The box is validated on construction: both extents must be strictly
/// positive, so width/height related math downstream never divides by zero.
///
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct BoundingBox {
    _x1: f32,
    _y1: f32,
    _x2: f32,
    _y2: f32,
}

impl BoundingBox {
    /// Constructor. Fails with [`Errors::DegenerateBBox`] unless
    /// `x1 < x2` and `y1 < y2`, which also rejects NaN coordinates.
    ///
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self> {
        if !(x1 < x2 && y1 < y2) {
            return Err(Errors::DegenerateBBox.into());
        }
        Ok(Self {
            _x1: x1,
            _y1: y1,
            _x2: x2,
            _y2: y2,
        })
    }

    pub fn x1(&self) -> f32 {
        self._x1
    }

    pub fn y1(&self) -> f32 {
        self._y1
    }

    pub fn x2(&self) -> f32 {
        self._x2
    }

    pub fn y2(&self) -> f32 {
        self._y2
    }

    pub fn width(&self) -> f32 {
        self._x2 - self._x1
    }

    pub fn height(&self) -> f32 {
        self._y2 - self._y1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            (self._x1 + self._x2) / 2.0,
            (self._y1 + self._y2) / 2.0,
        )
    }

    /// Width over height. Wide objects (vehicles seen from the side) score
    /// above 1.0.
    ///
    pub fn aspect_ratio(&self) -> f32 {
        self.width() / self.height()
    }

    /// Height over width. Upright objects (pedestrians) score above 1.0.
    ///
    pub fn vertical_aspect_ratio(&self) -> f32 {
        self.height() / self.width()
    }

    /// Allows comparing boxes in tests and deduplication code.
    ///
    pub fn almost_same(&self, other: &Self, eps: f32) -> bool {
        (self._x1 - other._x1).abs() < eps
            && (self._y1 - other._y1).abs() < eps
            && (self._x2 - other._x2).abs() < eps
            && (self._y2 - other._y2).abs() < eps
    }
}

/// Pixel dimensions of the frames the detections are expressed in.
///
/// Used by the contextual validator and by the entry/exit edge heuristic of
/// the tracker. The default matches a FullHD camera.
///
#[derive(Clone, Debug, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f32,
    pub height: f32,
}

impl FrameSize {
    pub fn new(width: f32, height: f32) -> Self {
        assert!(
            width > 0.0 && height > 0.0,
            "frame dimensions must be positive"
        );
        Self { width, height }
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::bbox::{BoundingBox, FrameSize};
    use crate::EPS;

    #[test]
    fn valid_box() {
        let bb = BoundingBox::new(10.0, 20.0, 50.0, 100.0).unwrap();
        assert!((bb.width() - 40.0).abs() < EPS);
        assert!((bb.height() - 80.0).abs() < EPS);
        assert!((bb.area() - 3200.0).abs() < EPS);
        let c = bb.center();
        assert!((c.x - 30.0).abs() < EPS);
        assert!((c.y - 60.0).abs() < EPS);
        assert!((bb.aspect_ratio() - 0.5).abs() < EPS);
        assert!((bb.vertical_aspect_ratio() - 2.0).abs() < EPS);
    }

    #[test]
    fn degenerate_boxes_rejected() {
        assert!(BoundingBox::new(10.0, 10.0, 10.0, 20.0).is_err());
        assert!(BoundingBox::new(10.0, 10.0, 20.0, 10.0).is_err());
        assert!(BoundingBox::new(30.0, 10.0, 20.0, 40.0).is_err());
    }

    #[test]
    fn nan_coordinates_rejected() {
        assert!(BoundingBox::new(f32::NAN, 10.0, 20.0, 40.0).is_err());
        assert!(BoundingBox::new(10.0, f32::NAN, 20.0, 40.0).is_err());
        assert!(BoundingBox::new(10.0, 10.0, f32::NAN, 40.0).is_err());
        assert!(BoundingBox::new(10.0, 10.0, 20.0, f32::NAN).is_err());
    }

    #[test]
    fn almost_same() {
        let bb = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let close = BoundingBox::new(0.000001, 0.0, 10.0, 10.000001).unwrap();
        let far = BoundingBox::new(1.0, 0.0, 10.0, 10.0).unwrap();
        assert!(bb.almost_same(&close, EPS));
        assert!(!bb.almost_same(&far, EPS));
    }

    #[test]
    fn frame_size_default() {
        let f = FrameSize::default();
        assert!((f.width - 1920.0).abs() < EPS);
        assert!((f.height - 1080.0).abs() < EPS);
    }

    #[test]
    #[should_panic]
    fn frame_size_zero_panics() {
        let _ = FrameSize::new(0.0, 1080.0);
    }
}
