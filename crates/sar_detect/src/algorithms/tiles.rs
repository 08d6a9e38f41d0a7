use crate::{
    params::{DetectionParams, Heuristics},
    traits::TileClassifier,
    types::{Raster, Tank, Vessel},
};

/// Aggregate statistics of one rectangular region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    pub mean: f32,
    /// Fraction of pixels strictly above the brightness threshold
    pub bright_ratio: f32,
}

/// Tile extents `(gx, gy)` for a raster split into `grid` tiles per axis.
pub fn tile_extent(width: u32, height: u32, grid: u32) -> (u32, u32) {
    let grid = grid.max(1);
    ((width / grid).max(1), (height / grid).max(1))
}

/// Mean and bright-pixel ratio of the region clipped to the raster.
/// Returns `None` for a zero-area region.
pub fn region_stats(
    raster: &Raster,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    threshold: u8,
) -> Option<RegionStats> {
    let w = w.min(raster.width().saturating_sub(x));
    let h = h.min(raster.height().saturating_sub(y));
    if w == 0 || h == 0 {
        return None;
    }

    let stride = raster.width() as usize;
    let pixels = raster.as_raw();
    let mut sum: u64 = 0;
    let mut bright: u64 = 0;
    for row in y..y + h {
        let start = row as usize * stride + x as usize;
        for &value in &pixels[start..start + w as usize] {
            sum += value as u64;
            if value > threshold {
                bright += 1;
            }
        }
    }

    let n = w as u64 * h as u64;
    Some(RegionStats {
        mean: (sum as f64 / n as f64) as f32,
        bright_ratio: (bright as f64 / n as f64) as f32,
    })
}

/// Mean / bright-ratio tile classifier.
///
/// A tile is a vessel candidate when it is dark water with a bright speck,
/// and a tank candidate when it is generally light with enough bright pixels.
/// The two tests are independent, so one tile can yield both.
#[derive(Debug, Clone)]
pub struct ThresholdTileClassifier {
    pub grid: u32,
    pub thr_bright: u8,
    pub thr_water: u8,
    pub heuristics: Heuristics,
}

impl ThresholdTileClassifier {
    pub fn from_params(params: &DetectionParams) -> Self {
        Self {
            grid: params.grid,
            thr_bright: params.thr_bright,
            thr_water: params.thr_water,
            heuristics: params.heuristics,
        }
    }

    fn tank_radius(&self, gx: u32, gy: u32) -> f32 {
        let h = &self.heuristics;
        (h.tank_radius_factor * gx.min(gy) as f32).max(h.min_tank_radius)
    }
}

impl Default for ThresholdTileClassifier {
    fn default() -> Self {
        Self::from_params(&DetectionParams::default())
    }
}

impl TileClassifier for ThresholdTileClassifier {
    fn classify_tiles(&self, raster: &Raster) -> (Vec<Vessel>, Vec<Tank>) {
        let (width, height) = raster.dimensions();
        let (gx, gy) = tile_extent(width, height, self.grid);
        let radius = self.tank_radius(gx, gy);
        let h = &self.heuristics;

        let mut vessels = Vec::new();
        let mut tanks = Vec::new();

        for y in (0..height).step_by(gy as usize) {
            for x in (0..width).step_by(gx as usize) {
                let Some(stats) = region_stats(raster, x, y, gx, gy, self.thr_bright) else {
                    continue;
                };

                // Centre of the clipped tile so trailing tiles stay inside the raster
                let cx = (x + gx.min(width - x) / 2) as f32;
                let cy = (y + gy.min(height - y) / 2) as f32;

                let on_water = stats.mean < self.thr_water as f32;
                if on_water && stats.bright_ratio > h.vessel_min_bright_ratio {
                    vessels.push(Vessel { x: cx, y: cy });
                }
                if stats.mean > h.tank_min_mean && stats.bright_ratio > h.tank_min_bright_ratio {
                    tanks.push(Tank { x: cx, y: cy, radius });
                }
            }
        }

        (vessels, tanks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn gray_field(size: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(size, size, Luma([value]))
    }

    fn fill(img: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32, value: u8) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Luma([value]));
            }
        }
    }

    fn classifier(grid: u32) -> ThresholdTileClassifier {
        ThresholdTileClassifier {
            grid,
            thr_bright: 210,
            thr_water: 40,
            heuristics: Heuristics::default(),
        }
    }

    #[test]
    fn test_tile_extent_never_zero() {
        assert_eq!(tile_extent(240, 240, 24), (10, 10));
        assert_eq!(tile_extent(5, 3, 24), (1, 1));
        assert_eq!(tile_extent(100, 50, 0), (100, 50));
    }

    #[test]
    fn test_region_stats() {
        let mut img = gray_field(10, 0);
        img.put_pixel(3, 3, Luma([255]));
        let stats = region_stats(&img, 0, 0, 10, 10, 210).unwrap();
        assert!((stats.mean - 2.55).abs() < 1e-4);
        assert_eq!(stats.bright_ratio, 0.01);
        assert!(region_stats(&img, 10, 0, 5, 5, 210).is_none());
    }

    #[test]
    fn test_uniform_gray_yields_nothing() {
        let img = gray_field(240, 128);
        let (vessels, tanks) = classifier(24).classify_tiles(&img);
        assert!(vessels.is_empty());
        assert!(tanks.is_empty());
    }

    #[test]
    fn test_single_speck_on_water_tile() {
        // 240 / 26 = 9 pixel tiles; the dark block covers exactly the tile at (99, 99)
        let mut img = gray_field(240, 128);
        fill(&mut img, 99, 99, 9, 9, 0);
        img.put_pixel(103, 103, Luma([255]));

        let (vessels, tanks) = classifier(26).classify_tiles(&img);
        assert_eq!(vessels, vec![Vessel { x: 103.0, y: 103.0 }]);
        assert!(tanks.is_empty());
    }

    #[test]
    fn test_speck_at_exactly_one_percent_is_not_a_vessel() {
        let mut img = gray_field(240, 128);
        fill(&mut img, 100, 100, 10, 10, 0);
        img.put_pixel(105, 105, Luma([255]));

        let (vessels, _) = classifier(24).classify_tiles(&img);
        assert!(vessels.is_empty());

        img.put_pixel(106, 106, Luma([255]));
        let (vessels, _) = classifier(24).classify_tiles(&img);
        assert_eq!(vessels, vec![Vessel { x: 105.0, y: 105.0 }]);
    }

    #[test]
    fn test_bright_tile_is_tank_with_radius() {
        let mut img = gray_field(240, 128);
        fill(&mut img, 20, 20, 10, 10, 230);
        let (vessels, tanks) = classifier(24).classify_tiles(&img);
        assert!(vessels.is_empty());
        assert_eq!(tanks.len(), 1);
        assert_eq!(tanks[0].x, 25.0);
        assert_eq!(tanks[0].radius, 3.5);
    }

    #[test]
    fn test_tank_radius_has_floor() {
        let mut img = gray_field(48, 128);
        fill(&mut img, 0, 0, 2, 2, 250);
        let (_, tanks) = classifier(24).classify_tiles(&img);
        assert_eq!(tanks.len(), 1);
        assert_eq!(tanks[0].radius, 3.0);
    }

    #[test]
    fn test_partial_edge_tiles_stay_inside_raster() {
        // 245 / 24 = 10 pixel tiles leave a 5 pixel trailing column and row
        let mut img = GrayImage::from_pixel(245, 245, Luma([0]));
        for y in (0..245).step_by(4) {
            for x in (0..245).step_by(4) {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let (vessels, _) = classifier(24).classify_tiles(&img);
        assert!(!vessels.is_empty());
        for v in &vessels {
            assert!(v.x >= 0.0 && v.x < 245.0);
            assert!(v.y >= 0.0 && v.y < 245.0);
        }
        assert!(vessels.iter().any(|v| v.x == 242.0));
    }

    #[test]
    fn test_tile_can_be_vessel_and_tank() {
        let heuristics = Heuristics {
            tank_min_mean: 10.0,
            ..Heuristics::default()
        };
        let classifier = ThresholdTileClassifier {
            grid: 1,
            thr_bright: 210,
            thr_water: 40,
            heuristics,
        };
        let mut img = gray_field(10, 5);
        fill(&mut img, 0, 0, 10, 1, 255);
        let (vessels, tanks) = classifier.classify_tiles(&img);
        assert_eq!(vessels.len(), 1);
        assert_eq!(tanks.len(), 1);
    }
}
