pub mod builder;

use rand::{rngs::StdRng, RngCore, SeedableRng};
use tracing::{debug, info};

use crate::{
    error::{DetectError, Result},
    params::{Caps, TaggingParams},
    traits::{BandScanner, DetectionSampler, TileClassifier, VesselTagger},
    types::{DetectionReport, DetectionSet, Raster},
};

/// Raster -> tiles -> detections, with capping and vessel tagging.
///
/// Every run owns its own seeded generator, so concurrent or repeated runs
/// never disturb each other.
pub struct Pipeline {
    tile_classifier: Box<dyn TileClassifier>,
    band_scanner: Box<dyn BandScanner>,
    sampler: Box<dyn DetectionSampler>,
    tagger: Box<dyn VesselTagger>,
    caps: Caps,
    tagging: TaggingParams,
    seed: u64,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(
        tile_classifier: Box<dyn TileClassifier>,
        band_scanner: Box<dyn BandScanner>,
        sampler: Box<dyn DetectionSampler>,
        tagger: Box<dyn VesselTagger>,
        caps: Caps,
        tagging: TaggingParams,
        seed: u64,
    ) -> Self {
        Self {
            tile_classifier,
            band_scanner,
            sampler,
            tagger,
            caps,
            tagging,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run the pipeline with a generator seeded from the configured seed
    pub fn process(&self, raster: &Raster) -> Result<DetectionReport> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.process_with_rng(raster, &mut rng)
    }

    /// Run the pipeline drawing from a caller-supplied generator
    pub fn process_with_rng(
        &self,
        raster: &Raster,
        rng: &mut dyn RngCore,
    ) -> Result<DetectionReport> {
        let (width, height) = raster.dimensions();
        if width == 0 || height == 0 {
            return Err(DetectError::EmptyRaster { width, height });
        }

        // Step 1: tile classification and band scan
        let (vessels, tanks) = self.tile_classifier.classify_tiles(raster);
        let piers = self.band_scanner.scan_bands(raster);
        let raw = DetectionSet { vessels, tanks, piers };
        let raw_counts = raw.counts();
        debug!(?raw_counts, width, height, "classified raster");

        // Step 2: cap each category
        let detections = self.sampler.sample(raw, &self.caps, rng);

        // Step 3: display-only vessel tags
        let tags = self.tagger.tag(detections.vessels.len(), &self.tagging, rng);

        info!(
            vessels = detections.vessels.len(),
            tanks = detections.tanks.len(),
            piers = detections.piers.len(),
            dark = tags.dark.len(),
            moving = tags.moving.len(),
            "detection run complete"
        );

        Ok(DetectionReport {
            detections,
            tags,
            raw_counts,
            image_width: width,
            image_height: height,
            seed: self.seed,
        })
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: caps vessels={} tanks={} piers={}, moving cap {}, seed {}",
            self.caps.vessels, self.caps.tanks, self.caps.piers, self.tagging.moving_cap, self.seed
        )
    }
}
