use crate::detection::{Detection, ObjectClass};
use crate::utils::bbox::FrameSize;
use log::debug;

const VEHICLE_MIN_ASPECT: f32 = 0.8;
const VEHICLE_MAX_ASPECT: f32 = 4.0;
const PERSON_MIN_ASPECT: f32 = 1.2;
const PERSON_MAX_ASPECT: f32 = 4.0;
const VEHICLE_SKY_FRACTION: f32 = 0.4;

/// Why a detection was judged implausible.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplausibleReason {
    /// A road vehicle detected in the upper part of the frame.
    TooHighForVehicle,
    /// Vehicle width/height ratio outside of the expected range.
    VehicleAspectRatio,
    /// Person height/width ratio outside of the expected range.
    PersonAspectRatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextVerdict {
    Plausible,
    Implausible(ImplausibleReason),
}

impl ContextVerdict {
    pub fn is_plausible(&self) -> bool {
        matches!(self, ContextVerdict::Plausible)
    }
}

/// Single-shot plausibility check dispatched on the detection class.
///
/// Road vehicles are expected in the lower part of the frame (a ground
/// plane heuristic) and within a sane width/height range; persons must be
/// upright. Every other class passes. Stateless and infallible.
///
pub fn assess(detection: &Detection, frame: &FrameSize) -> ContextVerdict {
    let verdict = match detection.object_class() {
        class if class.is_vehicle() => {
            if detection.center().y < frame.height * VEHICLE_SKY_FRACTION {
                ContextVerdict::Implausible(ImplausibleReason::TooHighForVehicle)
            } else {
                let aspect = detection.bbox().aspect_ratio();
                if !(VEHICLE_MIN_ASPECT..=VEHICLE_MAX_ASPECT).contains(&aspect) {
                    ContextVerdict::Implausible(ImplausibleReason::VehicleAspectRatio)
                } else {
                    ContextVerdict::Plausible
                }
            }
        }
        ObjectClass::Person => {
            let aspect = detection.bbox().vertical_aspect_ratio();
            if !(PERSON_MIN_ASPECT..=PERSON_MAX_ASPECT).contains(&aspect) {
                ContextVerdict::Implausible(ImplausibleReason::PersonAspectRatio)
            } else {
                ContextVerdict::Plausible
            }
        }
        _ => ContextVerdict::Plausible,
    };

    if let ContextVerdict::Implausible(reason) = verdict {
        debug!(
            "{} detection at ({:.1}, {:.1}) implausible: {:?}",
            detection.object_class(),
            detection.center().x,
            detection.center().y,
            reason
        );
    }
    verdict
}

/// Boolean shortcut over [`assess`].
///
pub fn is_plausible(detection: &Detection, frame: &FrameSize) -> bool {
    assess(detection, frame).is_plausible()
}
