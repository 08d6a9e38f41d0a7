//! Right-hand briefing panel: header, KPI bar, charts, findings and legend.

use chrono::{DateTime, TimeZone};
use image::{imageops, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut},
    rect::Rect,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    chart::Chart,
    kpi::KpiChip,
    overlay::{self, OverlayToggles},
    report::{Severity, SituationReport},
    text::TextRenderer,
    theme,
};

pub const HEADER_HEIGHT: u32 = 150;
pub const KPI_BAR_HEIGHT: u32 = 96;
pub const CHART_HEIGHT: u32 = 220;
const PAD: u32 = 24;
const FINDING_SIZE: f32 = 16.0;
const FINDING_LINE: u32 = 22;
const LEGEND_RESERVE: u32 = 5 * 24 + 40;

pub const GENERATED_FORMAT: &str = "%d/%m/%Y %H:%M";

pub fn generated_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(GENERATED_FORMAT).to_string()
}

/// Free-text fields printed on the briefing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PanelText {
    pub title: String,
    pub subtitle: String,
    pub aoi: String,
    pub badge: String,
    pub source: String,
}

impl Default for PanelText {
    fn default() -> Self {
        Self {
            title: "DAP ATLAS".into(),
            subtitle: "Port Monitoring from Satellite Imagery".into(),
            aoi: "AOI-001".into(),
            badge: "SAR".into(),
            source: "Sentinel-1 / optical".into(),
        }
    }
}

pub struct PanelContent<'a> {
    pub text: &'a PanelText,
    pub generated: &'a str,
    pub kpis: &'a [KpiChip],
    pub charts: &'a [Chart],
    pub findings: &'a SituationReport,
    pub toggles: &'a OverlayToggles,
}

pub fn render_panel(
    width: u32,
    height: u32,
    content: &PanelContent<'_>,
    text: &TextRenderer,
) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, theme::BG_DARK);
    let inner_w = width.saturating_sub(2 * PAD).max(1);

    draw_header(&mut img, content, text);
    let mut y = HEADER_HEIGHT;

    draw_kpi_bar(&mut img, content.kpis, PAD as i32, y as i32, inner_w, KPI_BAR_HEIGHT, text);
    y += KPI_BAR_HEIGHT + PAD;

    let findings_h = content.findings.findings.len() as u32 * FINDING_LINE * 2 + 40;
    for chart in content.charts {
        if y + CHART_HEIGHT + findings_h + LEGEND_RESERVE > height {
            debug!(chart = %chart.title, "chart skipped, panel too short");
            continue;
        }
        let rendered = chart.render(inner_w, CHART_HEIGHT, text);
        imageops::replace(&mut img, &rendered, PAD as i64, y as i64);
        y += CHART_HEIGHT + PAD / 2;
    }

    y = draw_findings(&mut img, content.findings, PAD as i32, y as i32, inner_w, text) as u32
        + PAD / 2;
    let legend_y = height.saturating_sub(LEGEND_RESERVE).max(y);
    text.draw(&mut img, "Legend", PAD as i32, legend_y as i32, 18.0, theme::MUTED);
    overlay::draw_legend(&mut img, text, PAD as i32, legend_y as i32 + 28, content.toggles);

    img
}

fn draw_header(img: &mut RgbImage, content: &PanelContent<'_>, text: &TextRenderer) {
    let width = img.width();
    draw_filled_rect_mut(img, Rect::at(0, 0).of_size(width, HEADER_HEIGHT - 12), theme::CARD);
    draw_line_segment_mut(
        img,
        (0.0, (HEADER_HEIGHT - 12) as f32),
        (width as f32, (HEADER_HEIGHT - 12) as f32),
        theme::BORDER,
    );
    let x = PAD as i32;
    text.draw(img, &content.text.title, x, 18, 34.0, theme::TEXT);
    text.draw(img, &content.text.subtitle, x, 62, 18.0, theme::MUTED);
    let caption = format!(
        "AOI: {}  |  Source: {}  |  Generated: {}",
        content.text.aoi, content.text.source, content.generated
    );
    text.draw(img, &caption, x, 94, 15.0, theme::MUTED);

    if !content.text.badge.is_empty() {
        let (w, h) = text.measure(&content.text.badge, 15.0);
        let pill_w = w + 20;
        let pill_x = width as i32 - PAD as i32 - pill_w as i32;
        let pill = Rect::at(pill_x, 20).of_size(pill_w, h + 12);
        draw_filled_rect_mut(img, pill, theme::blend(theme::CARD, theme::PRIMARY, 0.12));
        draw_hollow_rect_mut(img, pill, theme::blend(theme::CARD, theme::PRIMARY, 0.25));
        text.draw(img, &content.text.badge, pill_x + 10, 26, 15.0, theme::PRIMARY);
    }
}

/// KPI bar with one equal-width column per chip and separators between columns.
pub fn draw_kpi_bar(
    img: &mut RgbImage,
    chips: &[KpiChip],
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    text: &TextRenderer,
) {
    let bar = Rect::at(x, y).of_size(width.max(1), height.max(1));
    draw_filled_rect_mut(img, bar, theme::CARD);
    draw_hollow_rect_mut(img, bar, theme::BORDER);
    if chips.is_empty() {
        return;
    }

    let col_w = width as f32 / chips.len() as f32;
    for (i, chip) in chips.iter().enumerate() {
        let left = x as f32 + col_w * i as f32;
        if i > 0 {
            draw_line_segment_mut(
                img,
                (left, (y + 12) as f32),
                (left, (y + height as i32 - 12) as f32),
                theme::BORDER,
            );
        }
        let cx = (left + col_w / 2.0) as i32;
        text.draw_centered(img, &chip.value, cx, y + 16, 30.0, theme::PRIMARY);
        text.draw_centered(img, &chip.label, cx, y + 58, 13.0, theme::MUTED);
    }
}

/// Bulleted findings, wrapped to `width`; returns the y below the block.
pub(crate) fn draw_findings(
    img: &mut RgbImage,
    report: &SituationReport,
    x: i32,
    y: i32,
    width: u32,
    text: &TextRenderer,
) -> i32 {
    text.draw(img, "Situational report", x, y, 20.0, theme::TEXT);
    let mut line_y = y + 32;
    for finding in &report.findings {
        let color = match finding.severity {
            Severity::Alert => theme::ALERT,
            Severity::Info => theme::TEXT,
        };
        draw_filled_rect_mut(img, Rect::at(x, line_y + 7).of_size(6, 6), color);
        for line in text.wrap(&finding.text, FINDING_SIZE, width.saturating_sub(20)) {
            text.draw(img, &line, x + 16, line_y, FINDING_SIZE, color);
            line_y += FINDING_LINE as i32;
        }
    }
    line_y
}
