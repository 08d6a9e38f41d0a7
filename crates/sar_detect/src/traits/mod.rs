use rand::RngCore;

use crate::{
    params::{Caps, TaggingParams},
    types::{DetectionSet, Pier, Raster, Tank, Vessel, VesselTags},
};

/// Trait for per-tile classification of a raster
pub trait TileClassifier: Send + Sync {
    /// Classify every tile, returning vessel and tank candidates in scan order
    fn classify_tiles(&self, raster: &Raster) -> (Vec<Vessel>, Vec<Tank>);
}

/// Trait for horizontal band scanning (pier-like linear structures)
pub trait BandScanner: Send + Sync {
    fn scan_bands(&self, raster: &Raster) -> Vec<Pier>;
}

/// Trait for capping detection lists
pub trait DetectionSampler: Send + Sync {
    /// Reduce each category to at most its cap
    fn sample(&self, detections: DetectionSet, caps: &Caps, rng: &mut dyn RngCore) -> DetectionSet;
}

/// Trait for display-only vessel tagging
pub trait VesselTagger: Send + Sync {
    fn tag(&self, vessel_count: usize, params: &TaggingParams, rng: &mut dyn RngCore) -> VesselTags;
}
