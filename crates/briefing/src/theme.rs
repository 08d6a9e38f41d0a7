//! Dark briefing palette.

use image::Rgb;

pub const PRIMARY: Rgb<u8> = Rgb([0x00, 0xE3, 0xA5]);
pub const BG_DARK: Rgb<u8> = Rgb([0x0B, 0x12, 0x21]);
pub const CARD: Rgb<u8> = Rgb([0x10, 0x18, 0x2B]);
pub const TEXT: Rgb<u8> = Rgb([0xE6, 0xEE, 0xFC]);
pub const MUTED: Rgb<u8> = Rgb([0x9F, 0xB0, 0xC9]);
pub const BORDER: Rgb<u8> = Rgb([0x1D, 0x29, 0x42]);
pub const GRID: Rgb<u8> = Rgb([0x22, 0x30, 0x4F]);
pub const BAR_BLUE: Rgb<u8> = Rgb([0x3A, 0xA3, 0xFF]);
pub const LINE_BLUE: Rgb<u8> = Rgb([0x4D, 0xA3, 0xFF]);
pub const ALERT: Rgb<u8> = Rgb([0xFF, 0x69, 0x4A]);
pub const AMBER: Rgb<u8> = Rgb([0xFF, 0xC8, 0x4A]);

/// Marker colours by detection class
pub const VESSEL: Rgb<u8> = PRIMARY;
pub const DARK_VESSEL: Rgb<u8> = ALERT;
pub const MOVING_VESSEL: Rgb<u8> = AMBER;
pub const TANK: Rgb<u8> = LINE_BLUE;
pub const PIER: Rgb<u8> = MUTED;

/// Alpha-blend `fg` over `bg`
pub fn blend(bg: Rgb<u8>, fg: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |b: u8, f: u8| (b as f32 * (1.0 - a) + f as f32 * a).round() as u8;
    Rgb([mix(bg[0], fg[0]), mix(bg[1], fg[1]), mix(bg[2], fg[2])])
}
