/// Ray casting and segment intersection primitives
pub mod geometry;

use crate::detection::Detection;
use crate::utils::bbox::FrameSize;
use crate::zones::geometry::polygon_contains;
use geo::{CoordsIter, LineString, Polygon};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Role a zone plays when detections are filtered.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Inclusion,
    Exclusion,
}

/// A named polygon region of the frame.
///
/// Zones are produced by an external configuration step and consumed
/// read-only here. A polygon with fewer than 3 vertices makes the zone
/// inert rather than invalid.
///
#[derive(Debug, Clone)]
pub struct Zone {
    name: String,
    kind: ZoneKind,
    polygon: Polygon<f64>,
    active: bool,
}

impl Zone {
    pub fn new(name: impl Into<String>, kind: ZoneKind, points: &[(f64, f64)]) -> Self {
        Self {
            name: name.into(),
            kind,
            polygon: Polygon::new(LineString::from(points.to_vec()), vec![]),
            active: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ZoneKind {
        self.kind
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Active and backed by a usable polygon. The exterior ring carries a
    /// closing duplicate coordinate, hence the threshold of 4.
    ///
    pub fn effective(&self) -> bool {
        self.active && self.polygon.exterior_coords_iter().count() >= 4
    }

    pub fn contains(&self, center: &Point2<f32>) -> bool {
        polygon_contains(center.x as f64, center.y as f64, &self.polygon)
    }
}

/// Persisted form of a single zone, one record per zone.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub name: String,
    pub kind: ZoneKind,
    pub polygon: Vec<[f64; 2]>,
    pub active: bool,
}

impl From<&Zone> for ZoneRecord {
    fn from(zone: &Zone) -> Self {
        let mut polygon = zone
            .polygon
            .exterior_coords_iter()
            .map(|c| [c.x, c.y])
            .collect::<Vec<_>>();
        polygon.pop();
        Self {
            name: zone.name.clone(),
            kind: zone.kind,
            polygon,
            active: zone.active,
        }
    }
}

impl From<&ZoneRecord> for Zone {
    fn from(record: &ZoneRecord) -> Self {
        let points = record
            .polygon
            .iter()
            .map(|p| (p[0], p[1]))
            .collect::<Vec<_>>();
        let mut zone = Zone::new(record.name.clone(), record.kind, &points);
        zone.active = record.active;
        zone
    }
}

/// The zone bundle as the external configuration layer stores it, together
/// with the frame dimensions the polygon coordinates are expressed in.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneOverlay {
    pub frame_size: FrameSize,
    pub zones: Vec<ZoneRecord>,
}

/// Summary counts over a zone set, total and active per kind.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneSetStats {
    pub inclusion_zones: usize,
    pub exclusion_zones: usize,
    pub active_inclusion_zones: usize,
    pub active_exclusion_zones: usize,
}

/// The set of zones detections are filtered against.
///
#[derive(Debug, Clone, Default)]
pub struct ZoneSet {
    zones: Vec<Zone>,
}

impl ZoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_overlay(overlay: &ZoneOverlay) -> Self {
        Self {
            zones: overlay.zones.iter().map(Zone::from).collect(),
        }
    }

    pub fn to_overlay(&self, frame_size: FrameSize) -> ZoneOverlay {
        ZoneOverlay {
            frame_size,
            zones: self.zones.iter().map(ZoneRecord::from).collect(),
        }
    }

    pub fn add_zone(&mut self, zone: Zone) {
        self.zones.push(zone);
    }

    pub fn add_inclusion_zone(&mut self, name: impl Into<String>, points: &[(f64, f64)]) {
        self.zones.push(Zone::new(name, ZoneKind::Inclusion, points));
    }

    pub fn add_exclusion_zone(&mut self, name: impl Into<String>, points: &[(f64, f64)]) {
        self.zones.push(Zone::new(name, ZoneKind::Exclusion, points));
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Drops detections whose center falls in an effective exclusion zone,
    /// then requires membership in an inclusion zone when at least one
    /// effective inclusion zone exists. Exclusion is checked first and
    /// short-circuits per detection. Zones are never mutated.
    ///
    pub fn filter(&self, detections: &[Detection]) -> Vec<Detection> {
        let require_inclusion = self
            .zones
            .iter()
            .any(|z| z.kind == ZoneKind::Inclusion && z.effective());

        detections
            .iter()
            .filter(|det| {
                let center = det.center();
                if let Some(zone) = self
                    .zones
                    .iter()
                    .find(|z| z.kind == ZoneKind::Exclusion && z.effective() && z.contains(&center))
                {
                    debug!(
                        "detection at ({:.1}, {:.1}) dropped by exclusion zone {}",
                        center.x,
                        center.y,
                        zone.name()
                    );
                    return false;
                }
                if require_inclusion
                    && !self
                        .zones
                        .iter()
                        .any(|z| z.kind == ZoneKind::Inclusion && z.effective() && z.contains(&center))
                {
                    debug!(
                        "detection at ({:.1}, {:.1}) outside of all inclusion zones",
                        center.x, center.y
                    );
                    return false;
                }
                true
            })
            .copied()
            .collect()
    }

    pub fn stats(&self) -> ZoneSetStats {
        let mut stats = ZoneSetStats::default();
        for zone in &self.zones {
            match zone.kind {
                ZoneKind::Inclusion => {
                    stats.inclusion_zones += 1;
                    if zone.active {
                        stats.active_inclusion_zones += 1;
                    }
                }
                ZoneKind::Exclusion => {
                    stats.exclusion_zones += 1;
                    if zone.active {
                        stats.active_exclusion_zones += 1;
                    }
                }
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use crate::detection::{Detection, ObjectClass};
    use crate::utils::bbox::{BoundingBox, FrameSize};
    use crate::zones::{Zone, ZoneKind, ZoneOverlay, ZoneSet};

    fn det(cx: f32, cy: f32) -> Detection {
        let bbox = BoundingBox::new(cx - 20.0, cy - 20.0, cx + 20.0, cy + 20.0).unwrap();
        Detection::new(bbox, ObjectClass::Car, 0.9).unwrap()
    }

    #[test]
    fn no_zones_pass_everything() {
        let zones = ZoneSet::new();
        let dets = vec![det(50.0, 100.0), det(400.0, 100.0)];
        assert_eq!(zones.filter(&dets).len(), 2);
    }

    #[test]
    fn exclusion_zone_drops_left_band() {
        // left 15% of a 640x480 frame
        let mut zones = ZoneSet::new();
        zones.add_exclusion_zone(
            "left_trees",
            &[(0.0, 0.0), (96.0, 0.0), (96.0, 480.0), (0.0, 480.0)],
        );

        let dets = vec![det(50.0, 100.0), det(400.0, 100.0)];
        let kept = zones.filter(&dets);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].center().x, 400.0);
    }

    #[test]
    fn inclusion_zone_required_when_present() {
        let mut zones = ZoneSet::new();
        zones.add_inclusion_zone(
            "roadway",
            &[(200.0, 0.0), (600.0, 0.0), (600.0, 480.0), (200.0, 480.0)],
        );

        let dets = vec![det(50.0, 100.0), det(400.0, 100.0)];
        let kept = zones.filter(&dets);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].center().x, 400.0);
    }

    #[test]
    fn exclusion_beats_inclusion() {
        let mut zones = ZoneSet::new();
        zones.add_inclusion_zone(
            "everything",
            &[(0.0, 0.0), (640.0, 0.0), (640.0, 480.0), (0.0, 480.0)],
        );
        zones.add_exclusion_zone(
            "left_band",
            &[(0.0, 0.0), (96.0, 0.0), (96.0, 480.0), (0.0, 480.0)],
        );

        let dets = vec![det(50.0, 100.0), det(400.0, 100.0)];
        let kept = zones.filter(&dets);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].center().x, 400.0);
    }

    #[test]
    fn inactive_zone_is_ignored() {
        let mut zones = ZoneSet::new();
        let mut zone = Zone::new(
            "left_band",
            ZoneKind::Exclusion,
            &[(0.0, 0.0), (96.0, 0.0), (96.0, 480.0), (0.0, 480.0)],
        );
        zone.set_active(false);
        zones.add_zone(zone);

        let dets = vec![det(50.0, 100.0)];
        assert_eq!(zones.filter(&dets).len(), 1);
    }

    #[test]
    fn degenerate_inclusion_zone_does_not_gate() {
        let mut zones = ZoneSet::new();
        zones.add_inclusion_zone("broken", &[(0.0, 0.0), (10.0, 10.0)]);

        let dets = vec![det(400.0, 100.0)];
        assert_eq!(zones.filter(&dets).len(), 1);
    }

    #[test]
    fn stats_track_active_zones_per_kind() {
        let mut zones = ZoneSet::new();
        zones.add_inclusion_zone(
            "road",
            &[(200.0, 0.0), (600.0, 0.0), (600.0, 480.0), (200.0, 480.0)],
        );
        zones.add_exclusion_zone("trees", &[(0.0, 0.0), (96.0, 0.0), (96.0, 480.0)]);
        let mut dormant = Zone::new(
            "old_road",
            ZoneKind::Inclusion,
            &[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)],
        );
        dormant.set_active(false);
        zones.add_zone(dormant);

        let stats = zones.stats();
        assert_eq!(stats.inclusion_zones, 2);
        assert_eq!(stats.exclusion_zones, 1);
        assert_eq!(stats.active_inclusion_zones, 1);
        assert_eq!(stats.active_exclusion_zones, 1);
    }

    #[test]
    fn overlay_round_trip() {
        let mut zones = ZoneSet::new();
        zones.add_exclusion_zone("trees", &[(0.0, 0.0), (96.0, 0.0), (96.0, 480.0)]);
        zones.add_inclusion_zone(
            "road",
            &[(200.0, 0.0), (600.0, 0.0), (600.0, 480.0), (200.0, 480.0)],
        );

        let overlay = zones.to_overlay(FrameSize::new(640.0, 480.0));
        let serialized = serde_json::to_string(&overlay).unwrap();
        let parsed: ZoneOverlay = serde_json::from_str(&serialized).unwrap();
        let restored = ZoneSet::from_overlay(&parsed);

        assert_eq!(restored.zones().len(), 2);
        assert_eq!(restored.zones()[0].name(), "trees");
        assert_eq!(restored.zones()[0].kind(), ZoneKind::Exclusion);
        assert_eq!(restored.zones()[1].kind(), ZoneKind::Inclusion);

        let stats = restored.stats();
        assert_eq!(stats.inclusion_zones, 1);
        assert_eq!(stats.exclusion_zones, 1);
        assert_eq!(stats.active_inclusion_zones, 1);
        assert_eq!(stats.active_exclusion_zones, 1);
    }

    #[test]
    fn external_json_shape_parses() {
        let raw = r#"{
            "frame_size": {"width": 640.0, "height": 480.0},
            "zones": [
                {"name": "trees", "kind": "exclusion",
                 "polygon": [[0.0, 0.0], [96.0, 0.0], [96.0, 480.0], [0.0, 480.0]],
                 "active": true}
            ]
        }"#;
        let overlay: ZoneOverlay = serde_json::from_str(raw).unwrap();
        let zones = ZoneSet::from_overlay(&overlay);
        assert_eq!(zones.filter(&[det(50.0, 100.0)]).len(), 0);
    }
}
