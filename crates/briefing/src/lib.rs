//! # Briefing
//!
//! Turns a detection report into a fixed-size briefing image and exports it.
//!
//! - **Overlay**: detection markers over the fitted raster
//! - **Panel**: header, KPI bar (with optional demo lock), charts, findings, legend
//! - **Dashboard**: period KPIs, four synthetic port indicator charts, the
//!   acquisition schedule and the situational report
//! - **Export**: PNG plus a single-page A4 landscape PDF (`pdf` feature)
//!
//! ```rust,no_run
//! use briefing::{ComposeSettings, Exports, OverlayComposer, PageLayout, TextRenderer};
//! use sar_detect::{load_raster, Pipeline, RasterSource};
//!
//! let loaded = load_raster(&RasterSource::Missing);
//! let report = Pipeline::builder().build()?.process(&loaded.raster)?;
//! let (text, _notice) = TextRenderer::discover(None);
//! let composer = OverlayComposer::new(ComposeSettings::default(), text)?;
//! let out = composer.compose(&loaded.raster, &report, None, None, "07/09/2024 12:00")?;
//! Exports::encode(&out.image, &PageLayout::default())?.save("out", "briefing")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod theme;
pub mod text;
pub mod layout;
pub mod series;
pub mod chart;
pub mod kpi;
pub mod report;
pub mod overlay;
pub mod panel;
pub mod compose;
pub mod dashboard;
pub mod export;

pub use error::{BriefingError, Result};
pub use text::TextRenderer;
pub use layout::{CanvasSpec, FitMode, RegionTransform};
pub use series::{PeriodKpis, PortSeries};
pub use chart::{Chart, ChartKind, ChartSeries};
pub use kpi::{FixedKpiValues, KpiChip, KpiSnapshot};
pub use report::{AlertThresholds, Finding, Severity, SituationReport};
pub use overlay::{Marker, MarkerClass, MarkerShape, MarkerStyle, OverlayToggles};
pub use panel::{generated_stamp, PanelText};
pub use compose::{ComposeSettings, Composition, OverlayComposer};
pub use dashboard::{compose_dashboard, render_report, render_schedule, DashboardSpec};
pub use export::{encode_png, export_pdf, pdf_available, Exports, PageLayout, Placement};
