use crate::{
    algorithms::tiles::{region_stats, tile_extent},
    params::{DetectionParams, Heuristics},
    traits::BandScanner,
    types::{Pier, Raster},
};

/// Scans full-width horizontal bands for bright linear structures.
#[derive(Debug, Clone)]
pub struct HorizontalBandScanner {
    pub grid: u32,
    pub thr_bright: u8,
    pub heuristics: Heuristics,
}

impl HorizontalBandScanner {
    pub fn from_params(params: &DetectionParams) -> Self {
        Self {
            grid: params.grid,
            thr_bright: params.thr_bright,
            heuristics: params.heuristics,
        }
    }

    /// Band height: half a tile, never below `min_band_height`
    pub fn band_height(&self, width: u32, height: u32) -> u32 {
        let (_, gy) = tile_extent(width, height, self.grid);
        (gy / 2).max(self.heuristics.min_band_height).max(1)
    }

    fn pier_rect(&self, width: u32, height: u32, band_y: u32, band_h: u32) -> Pier {
        let h = &self.heuristics;
        let mid = band_y + band_h / 2;
        let margin = h.pier_margin.min(width.saturating_sub(1) / 2);
        let x0 = margin;
        let x1 = (width - margin).min(width - 1);
        let y0 = mid.saturating_sub(h.pier_half_height);
        let y1 = (mid + h.pier_half_height).min(height - 1);
        Pier {
            x0: x0 as f32,
            y0: y0 as f32,
            x1: x1 as f32,
            y1: y1 as f32,
        }
    }
}

impl Default for HorizontalBandScanner {
    fn default() -> Self {
        Self::from_params(&DetectionParams::default())
    }
}

impl BandScanner for HorizontalBandScanner {
    fn scan_bands(&self, raster: &Raster) -> Vec<Pier> {
        let (width, height) = raster.dimensions();
        let band_h = self.band_height(width, height);
        let h = &self.heuristics;
        let threshold = self.thr_bright.saturating_sub(h.pier_bright_offset);

        let mut piers = Vec::new();
        for y in (0..height).step_by(band_h as usize) {
            let Some(stats) = region_stats(raster, 0, y, width, band_h, threshold) else {
                continue;
            };
            if stats.bright_ratio > h.pier_min_bright_ratio && stats.mean > h.pier_min_mean {
                let clipped_h = band_h.min(height - y);
                piers.push(self.pier_rect(width, height, y, clipped_h));
            }
        }
        piers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn scanner() -> HorizontalBandScanner {
        HorizontalBandScanner {
            grid: 24,
            thr_bright: 210,
            heuristics: Heuristics::default(),
        }
    }

    #[test]
    fn test_band_height_floor() {
        assert_eq!(scanner().band_height(240, 240), 6);
        assert_eq!(scanner().band_height(480, 480), 10);
    }

    #[test]
    fn test_gray_raster_has_no_piers() {
        let img = GrayImage::from_pixel(240, 240, Luma([128]));
        assert!(scanner().scan_bands(&img).is_empty());
    }

    #[test]
    fn test_bright_row_becomes_pier() {
        let mut img = GrayImage::from_pixel(240, 240, Luma([100]));
        // Rows 60..62 sit inside the band starting at y = 60
        for y in 60..62 {
            for x in 0..240 {
                img.put_pixel(x, y, Luma([230]));
            }
        }
        let piers = scanner().scan_bands(&img);
        assert_eq!(piers, vec![Pier { x0: 12.0, y0: 61.0, x1: 228.0, y1: 65.0 }]);
    }

    #[test]
    fn test_pier_needs_bright_land_mean() {
        let mut img = GrayImage::from_pixel(240, 240, Luma([0]));
        for x in 0..240 {
            img.put_pixel(x, 60, Luma([255]));
        }
        // Bright ratio 1/6 but band mean 42.5 stays under 70
        assert!(scanner().scan_bands(&img).is_empty());
    }

    #[test]
    fn test_piers_fit_tiny_raster() {
        let img = GrayImage::from_pixel(8, 5, Luma([250]));
        let piers = scanner().scan_bands(&img);
        assert_eq!(piers.len(), 1);
        let p = piers[0];
        assert!(p.x0 >= 0.0 && p.x1 < 8.0 && p.x0 <= p.x1);
        assert!(p.y0 >= 0.0 && p.y1 < 5.0);
    }
}
