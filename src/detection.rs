use crate::utils::bbox::BoundingBox;
use crate::Errors;
use anyhow::Result;
use nalgebra::Point2;
use std::fmt;

/// Object category as reported by the upstream detector.
///
/// The discriminants cover the traffic-relevant subset of the COCO label
/// space. Anything the detector reports outside of that subset is preserved
/// verbatim in [`ObjectClass::Other`] so the tracker can still keep identity
/// for it.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    Person,
    Bicycle,
    Car,
    Motorcycle,
    Bus,
    Truck,
    Other(i64),
}

impl ObjectClass {
    /// Maps a raw COCO class id onto the enum.
    ///
    pub fn from_coco(class_id: i64) -> Self {
        match class_id {
            0 => ObjectClass::Person,
            1 => ObjectClass::Bicycle,
            2 => ObjectClass::Car,
            3 => ObjectClass::Motorcycle,
            5 => ObjectClass::Bus,
            7 => ObjectClass::Truck,
            other => ObjectClass::Other(other),
        }
    }

    /// Classes the contextual validator treats as large road vehicles.
    ///
    pub fn is_vehicle(&self) -> bool {
        matches!(
            self,
            ObjectClass::Car | ObjectClass::Bus | ObjectClass::Truck
        )
    }

    pub fn name(&self) -> String {
        match self {
            ObjectClass::Person => "person".to_owned(),
            ObjectClass::Bicycle => "bicycle".to_owned(),
            ObjectClass::Car => "car".to_owned(),
            ObjectClass::Motorcycle => "motorcycle".to_owned(),
            ObjectClass::Bus => "bus".to_owned(),
            ObjectClass::Truck => "truck".to_owned(),
            ObjectClass::Other(id) => format!("class_{id}"),
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single detector output for one frame.
///
/// Detections are transient: they exist for the duration of one tracker
/// update call and carry no identity. Confidence is validated into
/// `0.0..=1.0` on construction.
///
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    _bbox: BoundingBox,
    _object_class: ObjectClass,
    _confidence: f32,
}

impl Detection {
    /// Constructor. Fails with [`Errors::ConfidenceOutOfRange`] when the
    /// confidence lies outside of `0.0..=1.0`.
    ///
    pub fn new(bbox: BoundingBox, object_class: ObjectClass, confidence: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Errors::ConfidenceOutOfRange(confidence).into());
        }
        Ok(Self {
            _bbox: bbox,
            _object_class: object_class,
            _confidence: confidence,
        })
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self._bbox
    }

    pub fn object_class(&self) -> ObjectClass {
        self._object_class
    }

    pub fn confidence(&self) -> f32 {
        self._confidence
    }

    pub fn center(&self) -> Point2<f32> {
        self._bbox.center()
    }
}
