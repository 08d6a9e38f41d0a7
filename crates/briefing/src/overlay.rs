//! Detection markers projected into the raster region.

use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut},
    rect::Rect,
};
use sar_detect::DetectionReport;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{layout::RegionTransform, text::TextRenderer, theme};

/// Per-category show / hide switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OverlayToggles {
    pub show_vessels: bool,
    pub show_tanks: bool,
    pub show_piers: bool,
}

impl Default for OverlayToggles {
    fn default() -> Self {
        Self {
            show_vessels: true,
            show_tanks: true,
            show_piers: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MarkerStyle {
    /// Outline thickness in canvas pixels
    pub line_width: u32,
    /// Vessel circle radius in canvas pixels
    pub vessel_radius: u32,
    /// Smallest tank radius after projection
    pub min_tank_radius: u32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            vessel_radius: 7,
            min_tank_radius: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MarkerClass {
    #[strum(to_string = "Vessel")]
    Vessel,
    #[strum(to_string = "Dark vessel (no AIS)")]
    DarkVessel,
    #[strum(to_string = "Moving vessel")]
    MovingVessel,
    #[strum(to_string = "Storage tank")]
    Tank,
    #[strum(to_string = "Pier")]
    Pier,
}

impl MarkerClass {
    pub fn color(&self) -> Rgb<u8> {
        match self {
            MarkerClass::Vessel => theme::VESSEL,
            MarkerClass::DarkVessel => theme::DARK_VESSEL,
            MarkerClass::MovingVessel => theme::MOVING_VESSEL,
            MarkerClass::Tank => theme::TANK,
            MarkerClass::Pier => theme::PIER,
        }
    }

    fn visible(&self, toggles: &OverlayToggles) -> bool {
        match self {
            MarkerClass::Vessel | MarkerClass::DarkVessel | MarkerClass::MovingVessel => {
                toggles.show_vessels
            }
            MarkerClass::Tank => toggles.show_tanks,
            MarkerClass::Pier => toggles.show_piers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerShape {
    Circle { cx: i32, cy: i32, radius: i32 },
    Rect { x: i32, y: i32, width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub class: MarkerClass,
    pub shape: MarkerShape,
}

/// Project the report's detections into a `region_w x region_h` region.
/// Markers whose anchor falls outside the region (cropped by cover fit) are dropped.
pub fn project_markers(
    report: &DetectionReport,
    transform: &RegionTransform,
    region_w: u32,
    region_h: u32,
    toggles: &OverlayToggles,
    style: &MarkerStyle,
) -> Vec<Marker> {
    let inside =
        |x: f32, y: f32| x >= 0.0 && y >= 0.0 && x < region_w as f32 && y < region_h as f32;
    let mut markers = Vec::new();

    for (i, vessel) in report.detections.vessels.iter().enumerate() {
        let class = if report.tags.is_dark(i) {
            MarkerClass::DarkVessel
        } else if report.tags.is_moving(i) {
            MarkerClass::MovingVessel
        } else {
            MarkerClass::Vessel
        };
        let (x, y) = transform.apply(vessel.x, vessel.y);
        if class.visible(toggles) && inside(x, y) {
            markers.push(Marker {
                class,
                shape: MarkerShape::Circle {
                    cx: x.round() as i32,
                    cy: y.round() as i32,
                    radius: style.vessel_radius as i32,
                },
            });
        }
    }

    if toggles.show_tanks {
        for tank in &report.detections.tanks {
            let (x, y) = transform.apply(tank.x, tank.y);
            if !inside(x, y) {
                continue;
            }
            let radius = transform.scale_len(tank.radius).round().max(style.min_tank_radius as f32);
            markers.push(Marker {
                class: MarkerClass::Tank,
                shape: MarkerShape::Circle {
                    cx: x.round() as i32,
                    cy: y.round() as i32,
                    radius: radius as i32,
                },
            });
        }
    }

    if toggles.show_piers {
        for pier in &report.detections.piers {
            let (x0, y0) = transform.apply(pier.x0, pier.y0);
            let (x1, y1) = transform.apply(pier.x1, pier.y1);
            let (x0, x1) = (x0.max(0.0), x1.min(region_w as f32 - 1.0));
            if x1 <= x0 || !inside(x0, (y0 + y1) / 2.0) {
                continue;
            }
            markers.push(Marker {
                class: MarkerClass::Pier,
                shape: MarkerShape::Rect {
                    x: x0.round() as i32,
                    y: y0.round() as i32,
                    width: (x1 - x0).round().max(1.0) as u32,
                    height: (y1 - y0).round().max(2.0) as u32,
                },
            });
        }
    }

    markers
}

/// Draw outlined markers, `line_width` pixels thick.
pub fn draw_markers(img: &mut RgbImage, markers: &[Marker], line_width: u32) {
    let thickness = line_width.max(1) as i32;
    for marker in markers {
        let color = marker.class.color();
        match marker.shape {
            MarkerShape::Circle { cx, cy, radius } => {
                for t in 0..thickness.min(radius.max(1)) {
                    draw_hollow_circle_mut(img, (cx, cy), radius - t, color);
                }
            }
            MarkerShape::Rect { x, y, width, height } => {
                draw_hollow_rect_mut(img, Rect::at(x, y).of_size(width, height), color);
                for t in 1..thickness.min(width as i32 / 2).min(height as i32 / 2) {
                    let inset = 2 * t as u32;
                    let inner = Rect::at(x + t, y + t).of_size(
                        width.saturating_sub(inset).max(1),
                        height.saturating_sub(inset).max(1),
                    );
                    draw_hollow_rect_mut(img, inner, color);
                }
            }
        }
    }
}

/// Legend rows for the visible marker classes; returns the height used.
pub fn draw_legend(
    img: &mut RgbImage,
    text: &TextRenderer,
    x: i32,
    y: i32,
    toggles: &OverlayToggles,
) -> u32 {
    const ROW: i32 = 24;
    const SIZE: f32 = 16.0;
    let mut row_y = y;
    for class in MarkerClass::iter().filter(|c| c.visible(toggles)) {
        draw_filled_rect_mut(img, Rect::at(x, row_y + 3).of_size(14, 14), class.color());
        text.draw(img, &class.to_string(), x + 24, row_y, SIZE, theme::TEXT);
        row_y += ROW;
    }
    (row_y - y) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FitMode;
    use sar_detect::{DetectionSet, Pier, Tank, Vessel, VesselTags};

    fn report() -> DetectionReport {
        let detections = DetectionSet {
            vessels: vec![
                Vessel { x: 10.0, y: 10.0 },
                Vessel { x: 50.0, y: 50.0 },
                Vessel { x: 90.0, y: 90.0 },
            ],
            tanks: vec![Tank { x: 50.0, y: 20.0, radius: 3.0 }],
            piers: vec![Pier { x0: 12.0, y0: 70.0, x1: 88.0, y1: 74.0 }],
        };
        DetectionReport {
            raw_counts: detections.counts(),
            detections,
            tags: VesselTags {
                dark_ratio: 0.3,
                dark: vec![0],
                moving: vec![2],
            },
            image_width: 100,
            image_height: 100,
            seed: 0,
        }
    }

    #[test]
    fn test_marker_classes() {
        let t = RegionTransform::new(100, 100, 200, 200, FitMode::Stretch);
        let markers = project_markers(
            &report(),
            &t,
            200,
            200,
            &OverlayToggles::default(),
            &MarkerStyle::default(),
        );
        let classes: Vec<_> = markers.iter().map(|m| m.class).collect();
        assert_eq!(
            classes,
            vec![
                MarkerClass::DarkVessel,
                MarkerClass::Vessel,
                MarkerClass::MovingVessel,
                MarkerClass::Tank,
                MarkerClass::Pier
            ]
        );
        assert_eq!(markers[1].shape, MarkerShape::Circle { cx: 100, cy: 100, radius: 7 });
        assert_eq!(markers[3].shape, MarkerShape::Circle { cx: 100, cy: 40, radius: 6 });
        assert_eq!(markers[4].shape, MarkerShape::Rect { x: 24, y: 140, width: 152, height: 8 });
    }

    #[test]
    fn test_toggles_hide_categories() {
        let t = RegionTransform::new(100, 100, 100, 100, FitMode::Stretch);
        let toggles = OverlayToggles { show_vessels: false, show_tanks: true, show_piers: false };
        let markers = project_markers(&report(), &t, 100, 100, &toggles, &MarkerStyle::default());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].class, MarkerClass::Tank);
    }

    #[test]
    fn test_cropped_markers_dropped() {
        // 100x100 covered into 50x100: x offset -25, vessels at x=10 and x=90 fall outside
        let t = RegionTransform::new(100, 100, 50, 100, FitMode::Cover);
        let toggles = OverlayToggles { show_vessels: true, show_tanks: false, show_piers: false };
        let markers = project_markers(&report(), &t, 50, 100, &toggles, &MarkerStyle::default());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].shape, MarkerShape::Circle { cx: 25, cy: 50, radius: 7 });
    }

    #[test]
    fn test_draw_markers_paints_outline() {
        let mut img = RgbImage::from_pixel(40, 40, theme::BG_DARK);
        let marker = Marker {
            class: MarkerClass::Vessel,
            shape: MarkerShape::Circle { cx: 20, cy: 20, radius: 8 },
        };
        draw_markers(&mut img, &[marker], 2);
        assert_eq!(*img.get_pixel(28, 20), theme::VESSEL);
        assert_eq!(*img.get_pixel(20, 20), theme::BG_DARK);
    }

    #[test]
    fn test_legend_rows_follow_toggles() {
        let mut img = RgbImage::new(200, 200);
        let text = TextRenderer::none();
        assert_eq!(draw_legend(&mut img, &text, 0, 0, &OverlayToggles::default()), 5 * 24);
        let only_piers = OverlayToggles {
            show_vessels: false,
            show_tanks: false,
            show_piers: true,
        };
        assert_eq!(draw_legend(&mut img, &text, 0, 0, &only_piers), 24);
    }
}
