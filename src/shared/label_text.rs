//! Rasterisierung von Label-Texten zu RGBA-Billboards.
//!
//! Eingebetteter 5×7 Bitmap-Font, mehrzeilig, mit Hintergrundfläche und Rand.

use image::{Rgba, RgbaImage};

/// Gerasterter Label-Text samt Pixelmaßen.
#[derive(Debug, Clone)]
pub struct LabelRaster {
    pub image: RgbaImage,
    pub width_px: u32,
    pub height_px: u32,
}

/// Darstellungsparameter für Labels.
#[derive(Debug, Clone, Copy)]
pub struct LabelStyle {
    pub scale: u32,
    pub padding: u32,
    pub text_color: [u8; 4],
    pub background: [u8; 4],
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            scale: 2,
            padding: 4,
            text_color: [20, 20, 20, 255],
            background: [255, 255, 255, 220],
        }
    }
}

/// Pixelbreite einer einzelnen Zeile.
pub fn line_width(line: &str, scale: u32) -> u32 {
    let chars = line.chars().count() as u32;
    if chars == 0 {
        return 0;
    }
    chars * CHAR_WIDTH as u32 * scale + (chars - 1) * scale
}

/// Pixelmaße (Breite, Höhe) eines ggf. mehrzeiligen Texts ohne Padding.
pub fn text_metrics(text: &str, scale: u32) -> (u32, u32) {
    let lines: Vec<&str> = text.lines().collect();
    let line_count = lines.len().max(1) as u32;
    let width = lines.iter().map(|l| line_width(l, scale)).max().unwrap_or(0);
    let height = line_count * CHAR_HEIGHT as u32 * scale + (line_count - 1) * scale * 2;
    (width, height)
}

/// Rastert `text` auf ein Bild mit Hintergrund und Padding.
pub fn rasterize_label(text: &str, style: &LabelStyle) -> LabelRaster {
    let scale = style.scale.max(1);
    let (text_w, text_h) = text_metrics(text, scale);
    let width_px = text_w.max(1) + style.padding * 2;
    let height_px = text_h.max(1) + style.padding * 2;

    let mut image = RgbaImage::from_pixel(width_px, height_px, Rgba(style.background));
    let line_advance = (CHAR_HEIGHT as u32 * scale + scale * 2) as i32;
    let mut y = style.padding as i32;
    for line in text.lines() {
        draw_line(
            &mut image,
            style.padding as i32,
            y,
            line,
            Rgba(style.text_color),
            scale,
        );
        y += line_advance;
    }

    LabelRaster {
        image,
        width_px,
        height_px,
    }
}

fn draw_line(image: &mut RgbaImage, x: i32, y: i32, line: &str, color: Rgba<u8>, scale: u32) {
    let advance = (CHAR_WIDTH as u32 * scale + scale) as i32;
    let mut cursor_x = x;
    for ch in line.chars() {
        draw_glyph(image, cursor_x, y, glyph_for(ch), color, scale);
        cursor_x += advance;
    }
}

fn draw_glyph(
    image: &mut RgbaImage,
    x: i32,
    y: i32,
    glyph: &[u8; CHAR_HEIGHT],
    color: Rgba<u8>,
    scale: u32,
) {
    let (img_w, img_h) = (image.width() as i32, image.height() as i32);
    for (row, &bits) in glyph.iter().enumerate() {
        for col in 0..CHAR_WIDTH {
            if bits & (1 << (CHAR_WIDTH - 1 - col)) == 0 {
                continue;
            }
            for sy in 0..scale as i32 {
                for sx in 0..scale as i32 {
                    let px = x + (col as u32 * scale) as i32 + sx;
                    let py = y + (row as u32 * scale) as i32 + sy;
                    if (0..img_w).contains(&px) && (0..img_h).contains(&py) {
                        image.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }
}

// ── 5×7 Bitmap Font ─────────────────────────────────────────────────

const CHAR_WIDTH: usize = 5;
const CHAR_HEIGHT: usize = 7;

/// Glyph für ein Zeichen; außerhalb ASCII 32–126 wird '?' verwendet.
fn glyph_for(ch: char) -> &'static [u8; CHAR_HEIGHT] {
    let idx = ch as usize;
    if (32..=126).contains(&idx) {
        &FONT_5X7[idx - 32]
    } else {
        &FONT_5X7['?' as usize - 32]
    }
}

/// 5×7 Bitmap-Font (ASCII 32–126), Bits 4–0 = Spalten.
#[rustfmt::skip]
static FONT_5X7: [[u8; 7]; 95] = [
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
    [0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100, 0b00000],
    [0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
    [0b01010, 0b11111, 0b01010, 0b01010, 0b11111, 0b01010, 0b00000],
    [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100],
    [0b11001, 0b11010, 0b00100, 0b01000, 0b01011, 0b10011, 0b00000],
    [0b01100, 0b10010, 0b01100, 0b10101, 0b10010, 0b01101, 0b00000],
    [0b00100, 0b00100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
    [0b00010, 0b00100, 0b01000, 0b01000, 0b00100, 0b00010, 0b00000],
    [0b01000, 0b00100, 0b00010, 0b00010, 0b00100, 0b01000, 0b00000],
    [0b00000, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000],
    [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00100, 0b01000],
    [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000],
    [0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000, 0b00000],
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
    [0b01110, 0b10001, 0b00001, 0b00110, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
    [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000],
    [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00100, 0b01000],
    [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010],
    [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000],
    [0b10000, 0b01000, 0b00100, 0b00010, 0b00100, 0b01000, 0b10000],
    [0b01110, 0b10001, 0b00010, 0b00100, 0b00000, 0b00100, 0b00000],
    [0b01110, 0b10001, 0b10111, 0b10101, 0b10110, 0b10000, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
    [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
    [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
    [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
    [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
    [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
    [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
    [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
    [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
    [0b01110, 0b10001, 0b10000, 0b01110, 0b00001, 0b10001, 0b01110],
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
    [0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100],
    [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
    [0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b01010, 0b10001],
    [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
    [0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110],
    [0b10000, 0b01000, 0b00100, 0b00010, 0b00001, 0b00000, 0b00000],
    [0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110],
    [0b00100, 0b01010, 0b10001, 0b00000, 0b00000, 0b00000, 0b00000],
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
    [0b01000, 0b00100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
    [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
    [0b10000, 0b10000, 0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
    [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110],
    [0b00001, 0b00001, 0b01111, 0b10001, 0b10001, 0b10001, 0b01111],
    [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
    [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000],
    [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
    [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
    [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b00010, 0b00000, 0b00110, 0b00010, 0b00010, 0b10010, 0b01100],
    [0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010],
    [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10101, 0b10001],
    [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
    [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
    [0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
    [0b00000, 0b00000, 0b01111, 0b10001, 0b01111, 0b00001, 0b00001],
    [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000],
    [0b00000, 0b00000, 0b01111, 0b10000, 0b01110, 0b00001, 0b11110],
    [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110],
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101],
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010],
    [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
    [0b00000, 0b00000, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
    [0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b00010, 0b00100, 0b00100, 0b01000, 0b00100, 0b00100, 0b00010],
    [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
    [0b01000, 0b00100, 0b00100, 0b00010, 0b00100, 0b00100, 0b01000],
    [0b00000, 0b00000, 0b01000, 0b10101, 0b00010, 0b00000, 0b00000],
];
