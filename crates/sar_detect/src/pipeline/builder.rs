use crate::{
    algorithms::{
        HorizontalBandScanner, RandomVesselTagger, ThresholdTileClassifier, UniformSampler,
    },
    error::Result,
    params::{Caps, DetectionParams, TaggingParams},
    pipeline::Pipeline,
    presets::DetectionPreset,
    traits::{BandScanner, DetectionSampler, TileClassifier, VesselTagger},
};

/// Builder for detection pipelines with a fluent API
pub struct PipelineBuilder {
    params: DetectionParams,
    tile_classifier: Option<Box<dyn TileClassifier>>,
    band_scanner: Option<Box<dyn BandScanner>>,
    sampler: Option<Box<dyn DetectionSampler>>,
    tagger: Option<Box<dyn VesselTagger>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::from_params(DetectionParams::default())
    }

    /// Start from explicit parameters
    pub fn from_params(params: DetectionParams) -> Self {
        Self {
            params,
            tile_classifier: None,
            band_scanner: None,
            sampler: None,
            tagger: None,
        }
    }

    /// Start from a named preset
    pub fn from_preset(preset: DetectionPreset) -> Self {
        Self::from_params(preset.params())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = seed;
        self
    }

    pub fn with_caps(mut self, caps: Caps) -> Self {
        self.params.caps = caps;
        self
    }

    pub fn with_tagging(mut self, tagging: TaggingParams) -> Self {
        self.params.tagging = tagging;
        self
    }

    /// Set the tile classifier (replaces the threshold classifier)
    pub fn set_tile_classifier<C>(mut self, classifier: C) -> Self
    where
        C: TileClassifier + 'static,
    {
        self.tile_classifier = Some(Box::new(classifier));
        self
    }

    pub fn set_band_scanner<B>(mut self, scanner: B) -> Self
    where
        B: BandScanner + 'static,
    {
        self.band_scanner = Some(Box::new(scanner));
        self
    }

    pub fn set_sampler<S>(mut self, sampler: S) -> Self
    where
        S: DetectionSampler + 'static,
    {
        self.sampler = Some(Box::new(sampler));
        self
    }

    pub fn set_tagger<T>(mut self, tagger: T) -> Self
    where
        T: VesselTagger + 'static,
    {
        self.tagger = Some(Box::new(tagger));
        self
    }

    /// Build the pipeline, filling unset stages with the threshold defaults
    pub fn build(self) -> Result<Pipeline> {
        self.params.validate()?;
        let params = self.params;

        let tile_classifier = self
            .tile_classifier
            .unwrap_or_else(|| Box::new(ThresholdTileClassifier::from_params(&params)));
        let band_scanner = self
            .band_scanner
            .unwrap_or_else(|| Box::new(HorizontalBandScanner::from_params(&params)));
        let sampler = self.sampler.unwrap_or_else(|| Box::new(UniformSampler));
        let tagger = self.tagger.unwrap_or_else(|| Box::new(RandomVesselTagger));

        Ok(Pipeline::new(
            tile_classifier,
            band_scanner,
            sampler,
            tagger,
            params.caps,
            params.tagging,
            params.seed,
        ))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
