//! Raster loading with a placeholder fallback.
//!
//! Loading never fails: anything that cannot be decoded is replaced by a
//! synthetic harbour scene and a human-readable notice.

use std::path::{Path, PathBuf};

use image::{ImageFormat, Luma};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{error::Result, types::Raster};

pub const PLACEHOLDER_WIDTH: u32 = 1024;
pub const PLACEHOLDER_HEIGHT: u32 = 768;
const PLACEHOLDER_SEED: u64 = 2025;

/// Where the raster comes from.
#[derive(Debug, Clone)]
pub enum RasterSource {
    /// Local file
    Path(PathBuf),
    /// Uploaded bytes, with the original file name when known
    Bytes { data: Vec<u8>, name: Option<String> },
    /// Nothing supplied
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterOrigin {
    /// Decoded from content sniffing
    Decoded,
    /// Decoded using the format implied by the file name
    FallbackDecoded,
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct LoadedRaster {
    pub raster: Raster,
    pub origin: RasterOrigin,
    pub notice: Option<String>,
}

impl LoadedRaster {
    pub fn is_placeholder(&self) -> bool {
        self.origin == RasterOrigin::Placeholder
    }
}

/// Decode bytes to a grayscale raster: content sniffing first, then the
/// format implied by `name`.
pub fn decode_raster(data: &[u8], name: Option<&str>) -> Result<(Raster, RasterOrigin)> {
    match image::load_from_memory(data) {
        Ok(img) => Ok((img.to_luma8(), RasterOrigin::Decoded)),
        Err(primary) => {
            let format = name.and_then(|n| ImageFormat::from_path(n).ok());
            match format {
                Some(format) => {
                    debug!(?format, "content sniffing failed, retrying with file-name format");
                    let img = image::load_from_memory_with_format(data, format)?;
                    Ok((img.to_luma8(), RasterOrigin::FallbackDecoded))
                }
                None => Err(primary.into()),
            }
        }
    }
}

/// Load a raster from any source, degrading to the placeholder scene.
pub fn load_raster(source: &RasterSource) -> LoadedRaster {
    let attempt = match source {
        RasterSource::Missing => {
            return placeholder(format!(
                "No SAR scene supplied; showing a synthetic {}x{} placeholder",
                PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT
            ));
        }
        RasterSource::Path(path) => read_and_decode(path),
        RasterSource::Bytes { data, name } => decode_raster(data, name.as_deref()),
    };

    match attempt {
        Ok((raster, origin)) if raster.width() > 0 && raster.height() > 0 => {
            debug!(width = raster.width(), height = raster.height(), ?origin, "raster loaded");
            LoadedRaster {
                raster,
                origin,
                notice: None,
            }
        }
        Ok(_) => placeholder(format!(
            "{} is empty; showing a synthetic placeholder",
            describe(source)
        )),
        Err(err) => placeholder(format!(
            "Could not decode {} ({err}); showing a synthetic placeholder",
            describe(source)
        )),
    }
}

fn read_and_decode(path: &Path) -> Result<(Raster, RasterOrigin)> {
    let data = std::fs::read(path)?;
    decode_raster(&data, path.to_str())
}

fn describe(source: &RasterSource) -> String {
    match source {
        RasterSource::Path(path) => path.display().to_string(),
        RasterSource::Bytes { name: Some(name), .. } => name.clone(),
        RasterSource::Bytes { name: None, .. } => "uploaded image".to_string(),
        RasterSource::Missing => "missing image".to_string(),
    }
}

fn placeholder(notice: String) -> LoadedRaster {
    warn!("{notice}");
    LoadedRaster {
        raster: placeholder_scene(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, PLACEHOLDER_SEED),
        origin: RasterOrigin::Placeholder,
        notice: Some(notice),
    }
}

/// Synthetic harbour: speckled land on top, dark water below, a few bright
/// jetties, tank discs on land and metallic specks on the water.
pub fn placeholder_scene(width: u32, height: u32, seed: u64) -> Raster {
    let mut rng = StdRng::seed_from_u64(seed);
    let shore = height * 11 / 20;

    let mut raster = Raster::from_fn(width, height, |_, y| {
        if y < shore { Luma([118]) } else { Luma([22]) }
    });
    for pixel in raster.pixels_mut() {
        let jitter: i16 = rng.gen_range(-14..=14);
        pixel.0[0] = (pixel.0[0] as i16 + jitter).clamp(0, 255) as u8;
    }

    // Jetties reaching into the water
    let jetty_h = (height / 96).max(2);
    for k in 1..=3 {
        let y0 = shore + k * (height - shore) / 5;
        for y in y0..(y0 + jetty_h).min(height) {
            for x in width / 10..width * 9 / 10 {
                raster.put_pixel(x, y, Luma([rng.gen_range(215..=250)]));
            }
        }
    }

    // Tank discs on land
    let tank_r = (width.min(height) / 64).max(2) as i64;
    for _ in 0..14 {
        let cx = rng.gen_range(tank_r..(width as i64 - tank_r).max(tank_r + 1));
        let cy = rng.gen_range(tank_r..(shore as i64 - tank_r).max(tank_r + 1));
        for dy in -tank_r..=tank_r {
            for dx in -tank_r..=tank_r {
                let (x, y) = (cx + dx, cy + dy);
                if dx * dx + dy * dy <= tank_r * tank_r && x < width as i64 && y < height as i64 {
                    raster.put_pixel(x as u32, y as u32, Luma([235]));
                }
            }
        }
    }

    // Vessel specks on the water
    for _ in 0..60 {
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(shore..height);
        for dy in 0..5 {
            for dx in 0..5 {
                if x + dx < width && y + dy < height {
                    raster.put_pixel(x + dx, y + dy, Luma([250]));
                }
            }
        }
    }

    raster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use image::{GrayImage, ImageBuffer, Rgb};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 3, Rgb([200, 100, 50]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png_to_gray() {
        let loaded = load_raster(&RasterSource::Bytes {
            data: png_bytes(),
            name: Some("scene.png".to_string()),
        });
        assert_eq!(loaded.origin, RasterOrigin::Decoded);
        assert_eq!(loaded.raster.dimensions(), (4, 3));
        assert!(loaded.notice.is_none());
    }

    #[test]
    fn test_decode_tiff() {
        let img = GrayImage::from_pixel(5, 5, Luma([77]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Tiff).unwrap();
        let (raster, _) = decode_raster(buf.get_ref(), Some("scene.tif")).unwrap();
        assert_eq!(raster.get_pixel(2, 2).0[0], 77);
    }

    #[test]
    fn test_garbage_falls_back_to_placeholder() {
        let loaded = load_raster(&RasterSource::Bytes {
            data: vec![1, 2, 3, 4],
            name: Some("broken.png".to_string()),
        });
        assert!(loaded.is_placeholder());
        assert_eq!(loaded.raster.dimensions(), (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT));
        assert!(loaded.notice.unwrap().contains("broken.png"));
    }

    #[test]
    fn test_missing_source_and_file_fall_back() {
        let missing = load_raster(&RasterSource::Missing);
        assert!(missing.is_placeholder());
        assert!(missing.notice.is_some());

        let no_file = load_raster(&RasterSource::Path(PathBuf::from("/nonexistent/scene.tif")));
        assert!(no_file.is_placeholder());
    }

    #[test]
    fn test_placeholder_is_deterministic_and_detectable() {
        let a = placeholder_scene(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, 9);
        let b = placeholder_scene(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, 9);
        assert_eq!(a, b);

        let report = Pipeline::builder().build().unwrap().process(&a).unwrap();
        assert!(report.raw_counts.vessels > 0);
        assert!(report.raw_counts.piers > 0);
    }
}
