use image::{imageops, RgbImage};
use sar_detect::{DetectionReport, Raster};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    dashboard,
    error::{BriefingError, Result},
    kpi::{FixedKpiValues, KpiSnapshot},
    layout::{fit_raster, CanvasSpec},
    overlay::{self, Marker, MarkerStyle, OverlayToggles},
    panel::{self, PanelContent, PanelText},
    report::{AlertThresholds, SituationReport},
    series::PortSeries,
    text::TextRenderer,
};

/// Display settings for the composed briefing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComposeSettings {
    pub canvas: CanvasSpec,
    pub toggles: OverlayToggles,
    pub markers: MarkerStyle,
    pub text: PanelText,
    /// Shown as-is in the KPI bar, not derived from detections
    #[schemars(range(min = 0.0, max = 100.0))]
    pub confidence_pct: f32,
    /// Vertical distance (raster pixels) within which a vessel occupies a pier
    pub pier_proximity: f32,
    pub alerts: AlertThresholds,
    /// Render the synthetic port charts in the panel
    pub show_charts: bool,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            canvas: CanvasSpec::default(),
            toggles: OverlayToggles::default(),
            markers: MarkerStyle::default(),
            text: PanelText::default(),
            confidence_pct: 92.0,
            pier_proximity: 12.0,
            alerts: AlertThresholds::default(),
            show_charts: true,
        }
    }
}

/// Result of one composition.
#[derive(Debug, Clone)]
pub struct Composition {
    pub image: RgbImage,
    /// Markers drawn on the raster region
    pub markers: Vec<Marker>,
    /// Values shown in the KPI bar
    pub kpis: KpiSnapshot,
    pub findings: SituationReport,
}

/// Builds the fixed-size briefing canvas from a raster and its detections.
pub struct OverlayComposer {
    settings: ComposeSettings,
    text: TextRenderer,
}

impl OverlayComposer {
    pub fn new(settings: ComposeSettings, text: TextRenderer) -> Result<Self> {
        settings.canvas.validate()?;
        Ok(Self { settings, text })
    }

    pub fn settings(&self) -> &ComposeSettings {
        &self.settings
    }

    pub fn text(&self) -> &TextRenderer {
        &self.text
    }

    /// Compose the briefing. `override_kpis` replaces the KPI bar values only;
    /// markers always reflect `report`.
    pub fn compose(
        &self,
        raster: &Raster,
        report: &DetectionReport,
        series: Option<&PortSeries>,
        override_kpis: Option<&FixedKpiValues>,
        generated: &str,
    ) -> Result<Composition> {
        let canvas = &self.settings.canvas;
        if raster.width() == 0 || raster.height() == 0 {
            return Err(BriefingError::InvalidCanvas("source raster is empty".into()));
        }
        let left_w = canvas.left_width();
        let right_w = canvas.right_width();

        let (mut left, transform) = fit_raster(raster, left_w, canvas.height, canvas.fit);
        let markers = overlay::project_markers(
            report,
            &transform,
            left_w,
            canvas.height,
            &self.settings.toggles,
            &self.settings.markers,
        );
        overlay::draw_markers(&mut left, &markers, self.settings.markers.line_width);
        debug!(markers = markers.len(), fit = %canvas.fit, "overlay drawn");

        let kpis = KpiSnapshot::from_report(
            report,
            self.settings.pier_proximity,
            self.settings.confidence_pct,
        )
        .with_override(override_kpis);
        let findings = SituationReport::from_snapshot(&kpis, &self.settings.alerts);
        let charts = match series {
            Some(series) if self.settings.show_charts => {
                vec![dashboard::oil_storage_chart(series), dashboard::ships_chart(series)]
            }
            _ => Vec::new(),
        };
        let chips = kpis.chips();

        let content = PanelContent {
            text: &self.settings.text,
            generated,
            kpis: &chips,
            charts: &charts,
            findings: &findings,
            toggles: &self.settings.toggles,
        };
        let right = panel::render_panel(right_w, canvas.height, &content, &self.text);

        let mut image = RgbImage::new(canvas.width, canvas.height);
        imageops::replace(&mut image, &left, 0, 0);
        imageops::replace(&mut image, &right, left_w as i64, 0);

        info!(
            width = canvas.width,
            height = canvas.height,
            vessels = kpis.vessels,
            locked = kpis.locked,
            "briefing composed"
        );
        Ok(Composition {
            image,
            markers,
            kpis,
            findings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FitMode;
    use image::{GrayImage, Luma};
    use sar_detect::Pipeline;

    fn composer(canvas: CanvasSpec) -> OverlayComposer {
        let settings = ComposeSettings { canvas, ..Default::default() };
        OverlayComposer::new(settings, TextRenderer::none()).unwrap()
    }

    fn scene(width: u32, height: u32) -> GrayImage {
        let mut img = GrayImage::from_pixel(width, height, Luma([128]));
        // a dark patch with a bright speck in the first tile
        for y in 0..20 {
            for x in 0..20 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        img.put_pixel(5, 5, Luma([255]));
        img.put_pixel(6, 5, Luma([255]));
        img.put_pixel(5, 6, Luma([255]));
        img.put_pixel(6, 6, Luma([255]));
        img.put_pixel(7, 7, Luma([255]));
        img
    }

    #[test]
    fn test_canvas_size_is_constant() {
        let c = composer(CanvasSpec { width: 800, height: 450, ..Default::default() });
        for (w, h) in [(37, 2000), (1200, 90), (480, 480)] {
            let raster = scene(w, h);
            let report = Pipeline::builder().build().unwrap().process(&raster).unwrap();
            let out = c.compose(&raster, &report, None, None, "01/01/2025 00:00").unwrap();
            assert_eq!(out.image.dimensions(), (800, 450));
        }
    }

    #[test]
    fn test_cover_fit_of_thin_rasters() {
        let c = composer(CanvasSpec::default());
        for (w, h) in [(2000, 2), (1, 2000)] {
            let raster = GrayImage::from_pixel(w, h, Luma([128]));
            let report = Pipeline::builder().build().unwrap().process(&raster).unwrap();
            let out = c.compose(&raster, &report, None, None, "t").unwrap();
            assert_eq!(out.image.dimensions(), (1920, 1080));
        }
    }

    #[test]
    fn test_mid_gray_has_no_markers() {
        let raster = GrayImage::from_pixel(240, 240, Luma([128]));
        let report = Pipeline::builder().build().unwrap().process(&raster).unwrap();
        let out = composer(CanvasSpec::default())
            .compose(&raster, &report, Some(&PortSeries::seeded(7)), None, "now")
            .unwrap();
        assert!(out.markers.is_empty());
        assert_eq!(out.image.dimensions(), (1920, 1080));
    }

    #[test]
    fn test_lock_changes_kpis_not_overlay() {
        let raster = scene(480, 480);
        let report = Pipeline::builder().build().unwrap().process(&raster).unwrap();
        assert_eq!(report.detections.vessels.len(), 1);

        let c = composer(CanvasSpec {
            width: 960,
            height: 540,
            fit: FitMode::Stretch,
            ..Default::default()
        });
        let live = c.compose(&raster, &report, None, None, "t").unwrap();
        let locked = c
            .compose(&raster, &report, None, Some(&FixedKpiValues::default()), "t")
            .unwrap();

        assert_eq!(live.kpis.vessels, 1);
        assert_eq!(locked.kpis.vessels, 27);
        assert_eq!(locked.kpis.moving, 4);
        assert_eq!(live.markers, locked.markers);
        assert_eq!(locked.markers.len(), 1);

        // the raster region is pixel-identical; only the panel differs
        let left_w = c.settings().canvas.left_width();
        for (x, y, p) in live.image.enumerate_pixels() {
            if x < left_w {
                assert_eq!(p, locked.image.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_rejects_invalid_canvas() {
        let settings = ComposeSettings {
            canvas: CanvasSpec { width: 50, ..Default::default() },
            ..Default::default()
        };
        assert!(OverlayComposer::new(settings, TextRenderer::none()).is_err());
    }
}
