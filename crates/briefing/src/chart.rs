//! Small raster charts for the briefing panel and dashboard.

use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut},
    rect::Rect,
};
use strum::Display;

use crate::{
    text::TextRenderer,
    theme::{self, blend},
};

const TITLE_SIZE: f32 = 20.0;
const TICK_SIZE: f32 = 12.0;
const GRID_LINES: usize = 4;
const MAX_X_LABELS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ChartKind {
    Line,
    Area,
    Bar,
}

#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
    pub color: Rgb<u8>,
    pub kind: ChartKind,
}

impl ChartSeries {
    pub fn new(
        label: impl Into<String>,
        values: Vec<f64>,
        color: Rgb<u8>,
        kind: ChartKind,
    ) -> Self {
        Self {
            label: label.into(),
            values,
            color,
            kind,
        }
    }
}

/// A titled chart over shared x categories.
#[derive(Debug, Clone, Default)]
pub struct Chart {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

/// Pixel rectangle of the plot and the value range it maps.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotArea {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    y_min: f64,
    y_max: f64,
}

impl PlotArea {
    fn y(&self, value: f64) -> f32 {
        let t = (value - self.y_min) / (self.y_max - self.y_min);
        self.bottom - (t as f32) * (self.bottom - self.top)
    }

    /// Centre of slot `i` when the x axis is split into `n` equal slots
    fn slot_x(&self, i: usize, n: usize) -> f32 {
        let slot = (self.right - self.left) / n.max(1) as f32;
        self.left + slot * (i as f32 + 0.5)
    }

    fn slot_width(&self, n: usize) -> f32 {
        (self.right - self.left) / n.max(1) as f32
    }
}

impl Chart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    fn point_count(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.values.len())
            .max()
            .unwrap_or(0)
            .max(self.categories.len())
    }

    /// Value range with headroom; bars always include zero
    fn value_range(&self) -> (f64, f64) {
        let values = self.series.iter().flat_map(|s| s.values.iter().copied());
        let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        if self.series.iter().any(|s| s.kind == ChartKind::Bar) {
            lo = lo.min(0.0);
        }
        if (hi - lo).abs() < f64::EPSILON {
            hi += 1.0;
            lo -= 1.0;
        }
        let pad = (hi - lo) * 0.1;
        let lo = if lo == 0.0 { 0.0 } else { lo - pad };
        (lo, hi + pad)
    }

    pub fn render(&self, width: u32, height: u32, text: &TextRenderer) -> RgbImage {
        let width = width.max(80);
        let height = height.max(60);
        let mut img = RgbImage::from_pixel(width, height, theme::CARD);
        draw_hollow_rect_mut(&mut img, Rect::at(0, 0).of_size(width, height), theme::BORDER);
        text.draw(&mut img, &self.title, 14, 10, TITLE_SIZE, theme::TEXT);

        let (y_min, y_max) = self.value_range();
        let area = PlotArea {
            left: 52.0,
            top: 44.0,
            right: width as f32 - 16.0,
            bottom: height as f32 - 30.0,
            y_min,
            y_max,
        };
        if area.right <= area.left || area.bottom <= area.top {
            return img;
        }

        self.draw_grid(&mut img, &area, text);
        let n = self.point_count();
        for series in &self.series {
            match series.kind {
                ChartKind::Bar => draw_bars(&mut img, &area, series, n),
                ChartKind::Area => {
                    fill_under(&mut img, &area, series, n);
                    draw_polyline(&mut img, &area, series, n);
                }
                ChartKind::Line => draw_polyline(&mut img, &area, series, n),
            }
        }
        self.draw_x_labels(&mut img, &area, text, n);
        if self.series.len() > 1 {
            self.draw_legend(&mut img, text);
        }
        img
    }

    fn draw_grid(&self, img: &mut RgbImage, area: &PlotArea, text: &TextRenderer) {
        for i in 0..=GRID_LINES {
            let value = area.y_min + (area.y_max - area.y_min) * i as f64 / GRID_LINES as f64;
            let y = area.y(value);
            dashed_hline(img, area.left, area.right, y, theme::GRID);
            let label = format_tick(value);
            let (w, h) = text.measure(&label, TICK_SIZE);
            let (lx, ly) = (area.left as i32 - w as i32 - 6, y as i32 - h as i32 / 2);
            text.draw(img, &label, lx, ly, TICK_SIZE, theme::MUTED);
        }
        let baseline = ((area.left, area.bottom), (area.right, area.bottom));
        draw_line_segment_mut(img, baseline.0, baseline.1, theme::BORDER);
        draw_line_segment_mut(img, (area.left, area.top), (area.left, area.bottom), theme::BORDER);
    }

    fn draw_x_labels(&self, img: &mut RgbImage, area: &PlotArea, text: &TextRenderer, n: usize) {
        if self.categories.is_empty() {
            return;
        }
        let step = self.categories.len().div_ceil(MAX_X_LABELS).max(1);
        for (i, label) in self.categories.iter().enumerate().step_by(step) {
            let x = area.slot_x(i, n);
            let ly = area.bottom as i32 + 8;
            text.draw_centered(img, label, x as i32, ly, TICK_SIZE, theme::MUTED);
        }
    }

    fn draw_legend(&self, img: &mut RgbImage, text: &TextRenderer) {
        let mut x = img.width() as i32 - 16;
        for series in self.series.iter().rev() {
            let (w, _) = text.measure(&series.label, TICK_SIZE);
            x -= w as i32;
            text.draw(img, &series.label, x, 14, TICK_SIZE, theme::MUTED);
            x -= 18;
            draw_filled_rect_mut(img, Rect::at(x, 16).of_size(12, 10), series.color);
            x -= 14;
        }
    }
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 10.0 || value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn dashed_hline(img: &mut RgbImage, x0: f32, x1: f32, y: f32, color: Rgb<u8>) {
    const DASH: f32 = 6.0;
    const GAP: f32 = 4.0;
    let mut x = x0;
    while x < x1 {
        let end = (x + DASH).min(x1);
        draw_line_segment_mut(img, (x, y), (end, y), color);
        x += DASH + GAP;
    }
}

fn points(area: &PlotArea, series: &ChartSeries, n: usize) -> Vec<(f32, f32)> {
    series
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (area.slot_x(i, n), area.y(v)))
        .collect()
}

fn draw_polyline(img: &mut RgbImage, area: &PlotArea, series: &ChartSeries, n: usize) {
    let pts = points(area, series, n);
    for pair in pts.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        draw_line_segment_mut(img, a, b, series.color);
        draw_line_segment_mut(img, (a.0, a.1 + 1.0), (b.0, b.1 + 1.0), series.color);
    }
    if let [single] = pts.as_slice() {
        let dot = Rect::at(single.0 as i32 - 2, single.1 as i32 - 2).of_size(5, 5);
        draw_filled_rect_mut(img, dot, series.color);
    }
}

/// Translucent fill between the series and the plot baseline
fn fill_under(img: &mut RgbImage, area: &PlotArea, series: &ChartSeries, n: usize) {
    let pts = points(area, series, n);
    let (w, h) = img.dimensions();
    for pair in pts.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let x_start = a.0.ceil() as i32;
        let x_end = b.0.floor() as i32;
        for x in x_start..=x_end {
            if x < 0 || x >= w as i32 {
                continue;
            }
            let t = if b.0 > a.0 { (x as f32 - a.0) / (b.0 - a.0) } else { 0.0 };
            let y_top = (a.1 + (b.1 - a.1) * t).round().max(0.0) as u32;
            let y_bottom = (area.bottom as u32).min(h - 1);
            for y in y_top..=y_bottom {
                let px = img.get_pixel_mut(x as u32, y);
                *px = blend(*px, series.color, 0.3);
            }
        }
    }
}

fn draw_bars(img: &mut RgbImage, area: &PlotArea, series: &ChartSeries, n: usize) {
    let bar_w = (area.slot_width(n) * 0.6).max(1.0);
    let base = area.y(area.y_min.max(0.0));
    for (i, &v) in series.values.iter().enumerate() {
        let cx = area.slot_x(i, n);
        let top = area.y(v).min(base);
        let height = (base - area.y(v)).abs().max(1.0);
        let rect = Rect::at((cx - bar_w / 2.0) as i32, top as i32)
            .of_size(bar_w as u32, height as u32);
        draw_filled_rect_mut(img, rect, series.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(n: usize) -> Vec<String> {
        (1..=n).map(|d| format!("{d:02}")).collect()
    }

    #[test]
    fn test_render_dimensions() {
        let chart = Chart::new("Oil")
            .with_categories(days(5))
            .with_series(ChartSeries::new(
                "oil",
                vec![1.0, 3.0, 2.0, 5.0, 4.0],
                theme::LINE_BLUE,
                ChartKind::Area,
            ));
        let img = chart.render(400, 250, &TextRenderer::none());
        assert_eq!(img.dimensions(), (400, 250));
    }

    #[test]
    fn test_bars_are_painted() {
        let chart = Chart::new("Wait")
            .with_categories(days(3))
            .with_series(ChartSeries::new(
                "wait",
                vec![10.0, 20.0, 30.0],
                theme::BAR_BLUE,
                ChartKind::Bar,
            ));
        let img = chart.render(400, 250, &TextRenderer::none());
        // Tallest bar is the third slot; sample just above the baseline
        let area_right = 400.0 - 16.0;
        let slot = (area_right - 52.0) / 3.0;
        let cx = (52.0 + slot * 2.5) as u32;
        assert_eq!(*img.get_pixel(cx, 250 - 30 - 3), theme::BAR_BLUE);
    }

    #[test]
    fn test_value_range() {
        let line = ChartSeries::new("a", vec![5.0, 5.0], theme::TEXT, ChartKind::Line);
        let flat = Chart::new("flat").with_series(line);
        let (lo, hi) = flat.value_range();
        assert!(lo < 5.0 && hi > 5.0);

        let bar = ChartSeries::new("b", vec![10.0, 20.0], theme::TEXT, ChartKind::Bar);
        let bars = Chart::new("bars").with_series(bar);
        assert_eq!(bars.value_range().0, 0.0);

        assert_eq!(Chart::new("empty").value_range(), (0.0, 1.0));
    }

    #[test]
    fn test_empty_and_tiny_charts_render() {
        let img = Chart::new("empty").render(10, 10, &TextRenderer::none());
        assert_eq!(img.dimensions(), (80, 60));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(12.34), "12");
        assert_eq!(format_tick(2.0), "2");
        assert_eq!(format_tick(2.3), "2.3");
    }
}
