use image::GrayImage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Single-channel intensity raster (0-255). Treated as immutable once loaded.
pub type Raster = GrayImage;

/// Vessel candidate: a bright speck on a dark water tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Vessel {
    pub x: f32,
    pub y: f32,
}

/// Storage tank candidate: a bright, generally light tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Tank {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Pier candidate: a bright horizontal band spanning the raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pier {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Pier {
    /// Vertical centre line of the band
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// One detection of any category, in raster pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Detection {
    Vessel(Vessel),
    Tank(Tank),
    Pier(Pier),
}

/// The three detection lists produced for one raster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectionSet {
    pub vessels: Vec<Vessel>,
    pub tanks: Vec<Tank>,
    pub piers: Vec<Pier>,
}

impl DetectionSet {
    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            vessels: self.vessels.len(),
            tanks: self.tanks.len(),
            piers: self.piers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty() && self.tanks.is_empty() && self.piers.is_empty()
    }

    /// Flatten into tagged detections (vessels, then tanks, then piers)
    pub fn iter(&self) -> impl Iterator<Item = Detection> + '_ {
        self.vessels
            .iter()
            .copied()
            .map(Detection::Vessel)
            .chain(self.tanks.iter().copied().map(Detection::Tank))
            .chain(self.piers.iter().copied().map(Detection::Pier))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryCounts {
    pub vessels: usize,
    pub tanks: usize,
    pub piers: usize,
}

/// Display-only vessel tags. Both lists index into `DetectionSet::vessels`
/// and never share an index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VesselTags {
    /// Dark share drawn for this run; `dark.len() == floor(vessels * dark_ratio)`
    pub dark_ratio: f32,
    /// Vessels flagged as not broadcasting AIS
    pub dark: Vec<usize>,
    /// Vessels flagged as under way
    pub moving: Vec<usize>,
}

impl VesselTags {
    pub fn is_dark(&self, index: usize) -> bool {
        self.dark.contains(&index)
    }

    pub fn is_moving(&self, index: usize) -> bool {
        self.moving.contains(&index)
    }
}

/// Output of one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectionReport {
    /// Sampled detections, each list within its cap
    pub detections: DetectionSet,
    pub tags: VesselTags,
    /// Candidate counts before capping
    pub raw_counts: CategoryCounts,
    pub image_width: u32,
    pub image_height: u32,
    pub seed: u64,
}

impl DetectionReport {
    /// Percentage of kept vessels tagged dark (0 when there are no vessels)
    pub fn dark_share_pct(&self) -> f32 {
        let total = self.detections.vessels.len();
        if total == 0 {
            return 0.0;
        }
        self.tags.dark.len() as f32 * 100.0 / total as f32
    }

    /// Percentage of piers with at least one vessel centred within
    /// `proximity` pixels of the pier centre line.
    pub fn pier_occupancy_pct(&self, proximity: f32) -> f32 {
        let piers = &self.detections.piers;
        if piers.is_empty() {
            return 0.0;
        }
        let occupied = piers
            .iter()
            .filter(|pier| {
                self.detections.vessels.iter().any(|v| {
                    (v.y - pier.center_y()).abs() <= proximity && v.x >= pier.x0 && v.x <= pier.x1
                })
            })
            .count();
        occupied as f32 * 100.0 / piers.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(vessels: Vec<Vessel>, piers: Vec<Pier>, dark: Vec<usize>) -> DetectionReport {
        let detections = DetectionSet {
            vessels,
            tanks: Vec::new(),
            piers,
        };
        DetectionReport {
            raw_counts: detections.counts(),
            detections,
            tags: VesselTags { dark_ratio: 0.25, dark, moving: Vec::new() },
            image_width: 200,
            image_height: 200,
            seed: 0,
        }
    }

    #[test]
    fn test_dark_share_handles_no_vessels() {
        let r = report(Vec::new(), Vec::new(), Vec::new());
        assert_eq!(r.dark_share_pct(), 0.0);
    }

    #[test]
    fn test_dark_share_percentage() {
        let vessels = vec![Vessel { x: 1.0, y: 1.0 }; 4];
        let r = report(vessels, Vec::new(), vec![2]);
        assert_eq!(r.dark_share_pct(), 25.0);
    }

    #[test]
    fn test_pier_occupancy() {
        let piers = vec![
            Pier { x0: 12.0, y0: 48.0, x1: 188.0, y1: 52.0 },
            Pier { x0: 12.0, y0: 148.0, x1: 188.0, y1: 152.0 },
        ];
        let vessels = vec![Vessel { x: 100.0, y: 60.0 }];
        let r = report(vessels, piers, Vec::new());
        assert_eq!(r.pier_occupancy_pct(12.0), 50.0);
        assert_eq!(r.pier_occupancy_pct(5.0), 0.0);
    }

    #[test]
    fn test_detection_iter_order() {
        let set = DetectionSet {
            vessels: vec![Vessel { x: 1.0, y: 2.0 }],
            tanks: vec![Tank { x: 3.0, y: 4.0, radius: 3.0 }],
            piers: vec![Pier { x0: 0.0, y0: 0.0, x1: 1.0, y1: 1.0 }],
        };
        let kinds: Vec<_> = set.iter().collect();
        assert!(matches!(kinds[0], Detection::Vessel(_)));
        assert!(matches!(kinds[1], Detection::Tank(_)));
        assert!(matches!(kinds[2], Detection::Pier(_)));
        assert_eq!(set.counts(), CategoryCounts { vessels: 1, tanks: 1, piers: 1 });
    }
}
