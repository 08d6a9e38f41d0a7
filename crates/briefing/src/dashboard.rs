//! Port indicator dashboard: a header, the period KPI bar, a 2x2 grid of
//! charts, then the acquisition schedule next to the situational report.

use image::{imageops, RgbImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    chart::{Chart, ChartKind, ChartSeries},
    panel::{self, PanelText, KPI_BAR_HEIGHT},
    report::{AlertThresholds, SituationReport},
    series::{PortActivity, PortSeries},
    text::TextRenderer,
    theme,
};

pub const HEADER_HEIGHT: u32 = 80;
pub const PADDING: u32 = 20;
const CARD_PAD: u32 = 16;
const TABLE_SIZE: f32 = 14.0;
const TABLE_ROW: u32 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DashboardSpec {
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for DashboardSpec {
    fn default() -> Self {
        Self {
            chart_width: 900,
            chart_height: 420,
        }
    }
}

impl DashboardSpec {
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.chart_width * 2 + PADDING,
            self.grid_top() + self.chart_height * 3 + PADDING * 2,
        )
    }

    /// Top of the first chart row, below the header and the KPI bar
    pub fn grid_top(&self) -> u32 {
        HEADER_HEIGHT + KPI_BAR_HEIGHT + PADDING
    }

    /// Top-left corner of grid cell `(col, row)`; row 2 holds the schedule and report
    pub fn cell_origin(&self, col: u32, row: u32) -> (u32, u32) {
        (
            col * (self.chart_width + PADDING),
            self.grid_top() + row * (self.chart_height + PADDING),
        )
    }
}

fn day_labels(series: &PortSeries) -> Vec<String> {
    series.dates.iter().map(|d| d.format("%d/%m").to_string()).collect()
}

pub fn oil_storage_chart(series: &PortSeries) -> Chart {
    Chart::new("Oil storage volume by acquisition date (M bbl)")
        .with_categories(day_labels(series))
        .with_series(ChartSeries::new(
            "Oil",
            series.oil_volume.clone(),
            theme::PRIMARY,
            ChartKind::Area,
        ))
}

pub fn waiting_time_chart(series: &PortSeries) -> Chart {
    Chart::new("Ships waiting time in anchorage zone (h)")
        .with_categories(day_labels(series))
        .with_series(ChartSeries::new(
            "Wait",
            series.wait_hours.clone(),
            theme::BAR_BLUE,
            ChartKind::Bar,
        ))
}

pub fn ships_chart(series: &PortSeries) -> Chart {
    let as_f64 = |v: &[u32]| v.iter().map(|&x| f64::from(x)).collect::<Vec<_>>();
    Chart::new("Ships in anchorage vs not reporting AIS")
        .with_categories(day_labels(series))
        .with_series(ChartSeries::new(
            "Anchorage",
            as_f64(&series.ships_total),
            theme::LINE_BLUE,
            ChartKind::Line,
        ))
        .with_series(ChartSeries::new(
            "No AIS",
            as_f64(&series.ships_dark),
            theme::ALERT,
            ChartKind::Line,
        ))
}

pub fn forecast_chart(series: &PortSeries) -> Chart {
    Chart::new("Oil storage forecast, next 15 days (M bbl)")
        .with_categories(series.forecast_dates.iter().map(|d| d.format("%d/%m").to_string()))
        .with_series(ChartSeries::new(
            "Forecast",
            series.forecast_volume.clone(),
            theme::PRIMARY,
            ChartKind::Area,
        ))
}

/// The four dashboard charts in grid order
pub fn dashboard_charts(series: &PortSeries) -> [Chart; 4] {
    [
        oil_storage_chart(series),
        waiting_time_chart(series),
        ships_chart(series),
        forecast_chart(series),
    ]
}

fn card(width: u32, height: u32) -> RgbImage {
    let (width, height) = (width.max(1), height.max(1));
    let mut img = RgbImage::from_pixel(width, height, theme::CARD);
    draw_hollow_rect_mut(&mut img, Rect::at(0, 0).of_size(width, height), theme::BORDER);
    img
}

/// Acquisition schedule card; shows the most recent days that fit.
pub fn render_schedule(
    series: &PortSeries,
    width: u32,
    height: u32,
    text: &TextRenderer,
) -> RgbImage {
    let mut img = card(width, height);
    let x = CARD_PAD as i32;
    let col_w = (width.saturating_sub(2 * CARD_PAD) / 3) as i32;
    text.draw(&mut img, "Satellite imagery acquisition schedule", x, 14, 18.0, theme::TEXT);

    let header_y = 48;
    for (i, heading) in ["Date", "Weather", "Port activity"].iter().enumerate() {
        text.draw(&mut img, heading, x + col_w * i as i32, header_y, TABLE_SIZE, theme::MUTED);
    }

    let first_row = header_y as u32 + TABLE_ROW + 6;
    let fits = (height.saturating_sub(first_row + CARD_PAD) / TABLE_ROW) as usize;
    let skip = series.schedule.len().saturating_sub(fits);
    for (i, day) in series.schedule.iter().skip(skip).enumerate() {
        let y = (first_row + i as u32 * TABLE_ROW) as i32;
        let weather_color = if day.weather.is_rough() { theme::AMBER } else { theme::TEXT };
        let activity_color = match day.activity {
            PortActivity::Increase => theme::PRIMARY,
            PortActivity::Decrease => theme::ALERT,
        };
        let date = day.date.format("%d %b %Y").to_string();
        text.draw(&mut img, &date, x, y, TABLE_SIZE, theme::TEXT);
        text.draw(&mut img, &day.weather.to_string(), x + col_w, y, TABLE_SIZE, weather_color);
        let activity = day.activity.to_string();
        text.draw(&mut img, &activity, x + col_w * 2, y, TABLE_SIZE, activity_color);
    }
    img
}

/// Situational report card over the period indicators
pub fn render_report(
    report: &SituationReport,
    width: u32,
    height: u32,
    text: &TextRenderer,
) -> RgbImage {
    let mut img = card(width, height);
    let inner_w = width.saturating_sub(2 * CARD_PAD);
    panel::draw_findings(&mut img, report, CARD_PAD as i32, 14, inner_w, text);
    img
}

pub fn compose_dashboard(
    series: &PortSeries,
    spec: &DashboardSpec,
    panel_text: &PanelText,
    alerts: &AlertThresholds,
    generated: &str,
    text: &TextRenderer,
) -> RgbImage {
    let (width, height) = spec.canvas_size();
    let mut canvas = RgbImage::from_pixel(width, height, theme::BG_DARK);

    let title = format!("{} | Port Monitoring Indexes", panel_text.title);
    text.draw(&mut canvas, &title, 18, 18, 26.0, theme::TEXT);
    let caption = format!(
        "AOI: {}  |  Source: {}  |  Generated: {}",
        panel_text.aoi, panel_text.source, generated
    );
    text.draw(&mut canvas, &caption, 18, 50, 15.0, theme::MUTED);

    let kpis = series.kpis();
    panel::draw_kpi_bar(
        &mut canvas,
        &kpis.chips(),
        0,
        HEADER_HEIGHT as i32,
        width,
        KPI_BAR_HEIGHT,
        text,
    );

    for (i, chart) in dashboard_charts(series).iter().enumerate() {
        let (x, y) = spec.cell_origin((i % 2) as u32, (i / 2) as u32);
        let rendered = chart.render(spec.chart_width, spec.chart_height, text);
        imageops::replace(&mut canvas, &rendered, x as i64, y as i64);
    }

    let report = SituationReport::from_period(&kpis, alerts);
    let (x, y) = spec.cell_origin(0, 2);
    let schedule = render_schedule(series, spec.chart_width, spec.chart_height, text);
    imageops::replace(&mut canvas, &schedule, x as i64, y as i64);
    let (x, y) = spec.cell_origin(1, 2);
    let findings = render_report(&report, spec.chart_width, spec.chart_height, text);
    imageops::replace(&mut canvas, &findings, x as i64, y as i64);

    debug!(width, height, alerts = report.has_alerts(), "dashboard composed");
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_geometry() {
        let spec = DashboardSpec { chart_width: 300, chart_height: 200 };
        assert_eq!(spec.grid_top(), 196);
        assert_eq!(spec.canvas_size(), (620, 836));
        assert_eq!(spec.cell_origin(1, 2), (320, 636));

        let img = compose_dashboard(
            &PortSeries::seeded(7),
            &spec,
            &PanelText::default(),
            &AlertThresholds::default(),
            "07/09/2024 14:05",
            &TextRenderer::none(),
        );
        assert_eq!(img.dimensions(), (620, 836));
        // Header and gutters stay on the page background
        assert_eq!(*img.get_pixel(5, 5), theme::BG_DARK);
        assert_eq!(*img.get_pixel(150, 186), theme::BG_DARK);
        assert_eq!(*img.get_pixel(310, 300), theme::BG_DARK);
        assert_eq!(*img.get_pixel(150, 405), theme::BG_DARK);
        // Chart cards start below the KPI bar
        assert_eq!(*img.get_pixel(0, 196), theme::BORDER);
        assert_eq!(*img.get_pixel(5, 201), theme::CARD);
        // Schedule and report cards fill the last row
        assert_eq!(*img.get_pixel(0, 636), theme::BORDER);
        assert_eq!(*img.get_pixel(320, 636), theme::BORDER);
        assert_eq!(*img.get_pixel(619, 835), theme::BORDER);
    }

    #[test]
    fn test_kpi_bar_below_header() {
        let spec = DashboardSpec { chart_width: 300, chart_height: 200 };
        let img = compose_dashboard(
            &PortSeries::seeded(7),
            &spec,
            &PanelText::default(),
            &AlertThresholds::default(),
            "t",
            &TextRenderer::none(),
        );
        let mid = HEADER_HEIGHT + KPI_BAR_HEIGHT / 2;
        assert_eq!(*img.get_pixel(0, HEADER_HEIGHT), theme::BORDER);
        assert_eq!(*img.get_pixel(5, HEADER_HEIGHT + 5), theme::CARD);
        // five separators between the six period chips
        let mut separators = 0;
        let mut on_border = false;
        for x in 1..img.width() - 1 {
            let hit = *img.get_pixel(x, mid) == theme::BORDER;
            if hit && !on_border {
                separators += 1;
            }
            on_border = hit;
        }
        assert_eq!(separators, 5);
    }

    #[test]
    fn test_report_card_draws_findings() {
        let kpis = PortSeries::seeded(7).kpis();
        let report = SituationReport::from_period(&kpis, &AlertThresholds::default());
        let img = render_report(&report, 300, 200, &TextRenderer::none());
        // first bullet is an info finding, below the block title
        assert_eq!(*img.get_pixel(CARD_PAD + 2, 14 + 32 + 9), theme::TEXT);
    }

    #[test]
    fn test_schedule_card_size() {
        let img = render_schedule(&PortSeries::seeded(7), 300, 120, &TextRenderer::none());
        assert_eq!(img.dimensions(), (300, 120));
        assert_eq!(*img.get_pixel(0, 0), theme::BORDER);
        assert_eq!(*img.get_pixel(150, 60), theme::CARD);
    }

    #[test]
    fn test_chart_titles_and_series() {
        let charts = dashboard_charts(&PortSeries::seeded(1));
        assert_eq!(charts[2].series.len(), 2);
        assert_eq!(charts[1].series[0].kind, ChartKind::Bar);
        assert_eq!(charts[3].categories.len(), crate::series::FORECAST_DAYS);
    }
}
