use briefing::{
    compose_dashboard, generated_stamp, BriefingError, ComposeSettings, Composition,
    DashboardSpec, Exports, FixedKpiValues, OverlayComposer, PageLayout, PortSeries,
    TextRenderer,
};
use sar_detect::{
    load_raster, DetectError, DetectionParams, DetectionPreset, DetectionReport,
    PipelineBuilder, RasterOrigin, RasterSource,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    DetectError(#[from] DetectError),
    #[error(transparent)]
    BriefingError(#[from] BriefingError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Full briefing configuration, loadable from TOML or JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct BriefingConfig {
    /// Source raster; a synthetic placeholder is used when absent or unreadable
    pub input: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Named threshold set; replaces `detection` except for its seed
    pub preset: Option<DetectionPreset>,
    pub detection: DetectionParams,
    /// Seed of the synthetic port series; defaults to the detection seed
    pub series_seed: Option<u64>,
    pub display: ComposeSettings,
    /// Show `fixed_kpis` in the KPI bar instead of the computed values
    pub lock_kpis: bool,
    pub fixed_kpis: FixedKpiValues,
    pub font: Option<PathBuf>,
    pub page: PageLayout,
    pub dashboard: DashboardSpec,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            input: None,
            output_dir: PathBuf::from("out"),
            preset: None,
            detection: DetectionParams::default(),
            series_seed: None,
            display: ComposeSettings::default(),
            lock_kpis: false,
            fixed_kpis: FixedKpiValues::default(),
            font: None,
            page: PageLayout::default(),
            dashboard: DashboardSpec::default(),
        }
    }
}

impl BriefingConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, AtlasError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, AtlasError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, AtlasError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AtlasError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AtlasError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(AtlasError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String, AtlasError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json(&self) -> Result<String, AtlasError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Effective detection parameters after applying the preset
    pub fn detection_params(&self) -> DetectionParams {
        match self.preset {
            Some(preset) => preset.params().with_seed(self.detection.seed),
            None => self.detection.clone(),
        }
    }

    /// The fixed KPI values, only when the lock is on
    pub fn override_kpis(&self) -> Option<&FixedKpiValues> {
        self.lock_kpis.then_some(&self.fixed_kpis)
    }

    pub fn series_seed(&self) -> u64 {
        self.series_seed.unwrap_or(self.detection.seed)
    }

    pub fn raster_source(&self) -> RasterSource {
        match &self.input {
            Some(path) => RasterSource::Path(path.clone()),
            None => RasterSource::Missing,
        }
    }
}

/// Everything one `render` run produced
pub struct RenderOutput {
    pub report: DetectionReport,
    pub composition: Composition,
    pub exports: Exports,
    pub origin: RasterOrigin,
    /// Non-fatal degradations (placeholder raster, missing font, no PDF)
    pub notices: Vec<String>,
}

impl RenderOutput {
    /// Write `briefing.png`, `briefing.pdf` (when available) and `detections.geojson`
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>, AtlasError> {
        let dir = dir.as_ref();
        let mut written = self.exports.save(dir, "briefing")?;
        let geojson = dir.join("detections.geojson");
        self.report.save_geojson(&geojson)?;
        written.push(geojson);
        Ok(written)
    }
}

/// Detection only: load the configured raster and run the pipeline
pub fn detect(config: &BriefingConfig) -> Result<(DetectionReport, Option<String>), AtlasError> {
    let loaded = load_raster(&config.raster_source());
    let pipeline = PipelineBuilder::from_params(config.detection_params()).build()?;
    let report = pipeline.process(&loaded.raster)?;
    Ok((report, loaded.notice))
}

/// Load, detect, compose and encode one briefing
pub fn render_briefing(
    config: &BriefingConfig,
    generated: &str,
) -> Result<RenderOutput, AtlasError> {
    let mut notices = Vec::new();

    let loaded = load_raster(&config.raster_source());
    notices.extend(loaded.notice.clone());

    let pipeline = PipelineBuilder::from_params(config.detection_params()).build()?;
    info!("Detection pipeline: {}", pipeline.info());
    let report = pipeline.process(&loaded.raster)?;

    let (text, font_notice) = TextRenderer::discover(config.font.as_deref());
    notices.extend(font_notice);

    let series = PortSeries::seeded(config.series_seed());
    let composer = OverlayComposer::new(config.display.clone(), text)?;
    let composition = composer.compose(
        &loaded.raster,
        &report,
        Some(&series),
        config.override_kpis(),
        generated,
    )?;

    let exports = Exports::encode(&composition.image, &config.page)?;
    notices.extend(exports.notices.iter().cloned());

    Ok(RenderOutput {
        report,
        composition,
        exports,
        origin: loaded.origin,
        notices,
    })
}

/// Compose and encode the port indicator dashboard
pub fn render_dashboard(
    config: &BriefingConfig,
    generated: &str,
) -> Result<(Exports, Vec<String>), AtlasError> {
    let (text, font_notice) = TextRenderer::discover(config.font.as_deref());
    let series = PortSeries::seeded(config.series_seed());
    let image = compose_dashboard(
        &series,
        &config.dashboard,
        &config.display.text,
        &config.display.alerts,
        generated,
        &text,
    );
    let exports = Exports::encode(&image, &config.page)?;

    let mut notices: Vec<String> = font_notice.into_iter().collect();
    notices.extend(exports.notices.iter().cloned());
    Ok((exports, notices))
}

/// Current local time in the briefing header format
pub fn now_stamp() -> String {
    generated_stamp(&chrono::Local::now())
}
