//! Text rendering with an optional TrueType font.
//!
//! Without a usable font every draw call is a no-op and layout falls back to
//! an average glyph width, so composition still succeeds.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, warn};

use crate::error::{BriefingError, Result};

/// Environment variable naming a font file
pub const FONT_ENV: &str = "ATLAS_FONT";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Average advance as a fraction of the pixel size, used without a font
const FALLBACK_ADVANCE: f32 = 0.55;

pub struct TextRenderer {
    font: Option<FontVec>,
}

impl TextRenderer {
    /// Renderer that measures text but draws nothing
    pub fn none() -> Self {
        Self { font: None }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(bytes).map_err(|e| BriefingError::Font(e.to_string()))?;
        Ok(Self { font: Some(font) })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Try the explicit path, then `ATLAS_FONT`, then well-known system fonts.
    /// Returns a notice when no font could be loaded.
    pub fn discover(explicit: Option<&Path>) -> (Self, Option<String>) {
        let mut candidates: Vec<PathBuf> = Vec::new();
        candidates.extend(explicit.map(Path::to_path_buf));
        candidates.extend(std::env::var_os(FONT_ENV).map(PathBuf::from));
        candidates.extend(SYSTEM_FONTS.iter().map(PathBuf::from));

        for path in &candidates {
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(renderer) => {
                    debug!(font = %path.display(), "font loaded");
                    return (renderer, None);
                }
                Err(err) => warn!(font = %path.display(), %err, "unusable font"),
            }
        }

        let notice = format!(
            "No usable font found (set {FONT_ENV} or pass --font); text labels are omitted"
        );
        warn!("{notice}");
        (Self::none(), Some(notice))
    }

    pub fn is_available(&self) -> bool {
        self.font.is_some()
    }

    /// Draw `text` with its top-left corner at `(x, y)`
    pub fn draw(&self, img: &mut RgbImage, text: &str, x: i32, y: i32, size: f32, color: Rgb<u8>) {
        if let Some(font) = &self.font {
            draw_text_mut(img, color, x, y, PxScale::from(size), font, text);
        }
    }

    /// Draw `text` horizontally centred on `cx`
    pub fn draw_centered(
        &self,
        img: &mut RgbImage,
        text: &str,
        cx: i32,
        y: i32,
        size: f32,
        color: Rgb<u8>,
    ) {
        let (w, _) = self.measure(text, size);
        self.draw(img, text, cx - w as i32 / 2, y, size, color);
    }

    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        match &self.font {
            Some(font) => text_size(PxScale::from(size), font, text),
            None => (
                (text.chars().count() as f32 * size * FALLBACK_ADVANCE).ceil() as u32,
                size.ceil() as u32,
            ),
        }
    }

    /// Greedy word wrap to `max_width` pixels
    pub fn wrap(&self, text: &str, size: f32, max_width: u32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && self.measure(&candidate, size).0 > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_measure() {
        let text = TextRenderer::none();
        assert_eq!(text.measure("abcd", 20.0), (44, 20));
        assert!(!text.is_available());
    }

    #[test]
    fn test_draw_without_font_is_noop() {
        let text = TextRenderer::none();
        let mut img = RgbImage::from_pixel(20, 20, Rgb([1, 2, 3]));
        text.draw(&mut img, "hello", 0, 0, 12.0, Rgb([255, 255, 255]));
        assert!(img.pixels().all(|p| *p == Rgb([1, 2, 3])));
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = TextRenderer::none();
        // 10px glyphs at size 18.2 -> roughly 10 px per char
        let lines = text.wrap("alpha beta gamma delta", 18.2, 110);
        assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
        assert!(text.wrap("", 12.0, 100).is_empty());
    }

    #[test]
    fn test_invalid_font_bytes() {
        assert!(matches!(TextRenderer::from_bytes(vec![0, 1, 2]), Err(BriefingError::Font(_))));
    }
}
