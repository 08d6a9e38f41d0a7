use image::{imageops, imageops::FilterType, GrayImage, RgbImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::{BriefingError, Result};

/// How the source raster fills the left region.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FitMode {
    /// Uniform scale to cover the region, centred crop
    #[default]
    Cover,
    /// Independent x / y scaling to the region
    Stretch,
}

/// Fixed output canvas: raster region on the left, panel on the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    /// Fraction of the width given to the raster region
    #[schemars(range(min = 0.1, max = 0.9))]
    pub split: f32,
    pub fit: FitMode,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            split: 0.62,
            fit: FitMode::Cover,
        }
    }
}

impl CanvasSpec {
    pub fn validate(&self) -> Result<()> {
        if self.width < 200 || self.height < 200 {
            return Err(BriefingError::InvalidCanvas(format!(
                "{}x{} is below the 200x200 minimum",
                self.width, self.height
            )));
        }
        if !(0.1..=0.9).contains(&self.split) {
            return Err(BriefingError::InvalidCanvas(format!(
                "split {} outside [0.1, 0.9]",
                self.split
            )));
        }
        Ok(())
    }

    pub fn left_width(&self) -> u32 {
        ((self.width as f32 * self.split).round() as u32).clamp(1, self.width - 1)
    }

    pub fn right_width(&self) -> u32 {
        self.width - self.left_width()
    }
}

/// Maps raster pixel coordinates into the left region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl RegionTransform {
    pub fn new(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32, fit: FitMode) -> Self {
        let sx = dst_w as f32 / src_w.max(1) as f32;
        let sy = dst_h as f32 / src_h.max(1) as f32;
        match fit {
            FitMode::Stretch => Self {
                scale_x: sx,
                scale_y: sy,
                offset_x: 0.0,
                offset_y: 0.0,
            },
            FitMode::Cover => {
                let s = sx.max(sy);
                Self {
                    scale_x: s,
                    scale_y: s,
                    offset_x: (dst_w as f32 - src_w as f32 * s) / 2.0,
                    offset_y: (dst_h as f32 - src_h as f32 * s) / 2.0,
                }
            }
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale_x + self.offset_x, y * self.scale_y + self.offset_y)
    }

    /// Scale a length; uses the smaller axis scale for radii
    pub fn scale_len(&self, len: f32) -> f32 {
        len * self.scale_x.min(self.scale_y)
    }
}

/// Resize the raster into a `dst_w x dst_h` RGB region according to `fit`.
///
/// Cover crops the visible window out of the source before resizing, so the
/// intermediate buffer never exceeds the region.
pub fn fit_raster(
    raster: &GrayImage,
    dst_w: u32,
    dst_h: u32,
    fit: FitMode,
) -> (RgbImage, RegionTransform) {
    let (src_w, src_h) = raster.dimensions();
    let transform = RegionTransform::new(src_w, src_h, dst_w, dst_h, fit);

    let resized = match fit {
        FitMode::Stretch => imageops::resize(raster, dst_w, dst_h, FilterType::Triangle),
        FitMode::Cover => {
            let win = CoverWindow::new(src_w, src_h, dst_w, dst_h, &transform);
            let source = imageops::crop_imm(raster, win.x, win.y, win.w, win.h).to_image();
            let scaled =
                imageops::resize(&source, win.scaled_w, win.scaled_h, FilterType::Triangle);
            imageops::crop_imm(&scaled, win.left, win.top, dst_w, dst_h).to_image()
        }
    };

    let rgb = RgbImage::from_fn(dst_w, dst_h, |x, y| {
        let v = resized.get_pixel(x, y).0[0];
        image::Rgb([v, v, v])
    });
    (rgb, transform)
}

/// Whole-pixel source window that covers the visible part of a cover fit,
/// its resized size, and where the region starts inside the resized window.
/// The resized window is at most one source pixel per side larger than the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CoverWindow {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    scaled_w: u32,
    scaled_h: u32,
    left: u32,
    top: u32,
}

impl CoverWindow {
    fn new(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32, t: &RegionTransform) -> Self {
        let (x, w, scaled_w, left) = Self::axis(src_w, dst_w, t.scale_x, t.offset_x);
        let (y, h, scaled_h, top) = Self::axis(src_h, dst_h, t.scale_y, t.offset_y);
        Self { x, y, w, h, scaled_w, scaled_h, left, top }
    }

    fn axis(src: u32, dst: u32, scale: f32, offset: f32) -> (u32, u32, u32, u32) {
        let src = src.max(1);
        let start = -offset / scale;
        let first = (start.floor().max(0.0) as u32).min(src - 1);
        let end = ((start + dst as f32 / scale).ceil() as u32).clamp(first + 1, src);
        let len = end - first;
        let scaled = ((len as f32 * scale).round() as u32).max(dst);
        let skip = (-(offset + first as f32 * scale)).round().max(0.0) as u32;
        (first, len, scaled, skip.min(scaled - dst))
    }
}
