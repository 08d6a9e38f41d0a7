//! # SAR Tile Detector
//!
//! Deterministic thresholding heuristics that turn a grayscale SAR / optical
//! raster into vessel, storage tank and pier candidates.
//!
//! - **Tile classification**: mean brightness and bright-pixel ratio per grid tile
//! - **Band scan**: full-width bright bands flagged as piers
//! - **Sampling**: each category capped by seeded uniform subsampling
//! - **Tagging**: display-only dark (no AIS) and moving vessel subsets
//! - **GeoJSON**: export detections in pixel coordinates
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sar_detect::{load_raster, Pipeline, RasterSource};
//!
//! let loaded = load_raster(&RasterSource::Path("scene.tif".into()));
//! let pipeline = Pipeline::builder().with_seed(7).build()?;
//! let report = pipeline.process(&loaded.raster)?;
//! report.save_geojson("detections.geojson")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Presets
//!
//! ```rust,no_run
//! use sar_detect::{DetectionPreset, PipelineBuilder};
//!
//! let pipeline = PipelineBuilder::from_preset(DetectionPreset::OilTerminal)
//!     .with_seed(42)
//!     .build()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod params;
pub mod presets;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod loader;
pub mod io;

pub use error::{DetectError, Result};
pub use types::*;
pub use params::{Caps, DetectionParams, Heuristics, TaggingParams};
pub use presets::DetectionPreset;
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use loader::{load_raster, LoadedRaster, RasterOrigin, RasterSource};
