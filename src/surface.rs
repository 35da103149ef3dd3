//! The pixel display capability and an in-memory implementation of it.

use crate::collision::Rect;

/// Glyph cell of the classic 5×7 font, including one column and one row of
/// spacing.
pub const GLYPH_W: i32 = 6;
pub const GLYPH_H: i32 = 8;

// ── Colour ───────────────────────────────────────────────────────────────────

/// 16-bit RGB565 colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const WHITE: Color = Color(0xFFFF);
    pub const RED: Color = Color(0xF800);
    pub const GREEN: Color = Color(0x07E0);
    pub const BLUE: Color = Color(0x001F);
    pub const YELLOW: Color = Color(0xFFE0);
    pub const CYAN: Color = Color(0x07FF);
    pub const MAGENTA: Color = Color(0xF81F);

    /// Expand to 8-bit channels.
    pub const fn to_rgb888(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 11) & 0x1F) as u8;
        let g = ((self.0 >> 5) & 0x3F) as u8;
        let b = (self.0 & 0x1F) as u8;
        ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }
}

/// 1-bit bitmap, rows packed MSB first, each row padded to whole bytes.
#[derive(Debug, PartialEq, Eq)]
pub struct Bitmap {
    pub width: i32,
    pub height: i32,
    pub data: &'static [u8],
}

impl Bitmap {
    pub fn is_set(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 || col >= self.width || row >= self.height {
            return false;
        }
        let stride = (self.width + 7) / 8;
        let byte = self.data[(row * stride + col / 8) as usize];
        byte & (0x80 >> (col % 8)) != 0
    }
}

/// Footprint of `text` drawn at `(x, y)`.
pub fn text_rect(x: i32, y: i32, text: &str, scale: u8) -> Rect {
    let s = i32::from(scale.max(1));
    Rect::new(x, y, text.chars().count() as i32 * GLYPH_W * s, GLYPH_H * s)
}

/// Left edge that centres `text` on a `width`-pixel line.
pub fn centred_x(width: i32, text: &str, scale: u8) -> i32 {
    ((width - text_rect(0, 0, text, scale).w) / 2).max(0)
}

// ── Capability ───────────────────────────────────────────────────────────────

pub trait DrawSurface {
    fn size(&self) -> (i32, i32);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Monospace text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color, scale: u8);

    fn fill_screen(&mut self, color: Color) {
        let (w, h) = self.size();
        self.fill_rect(Rect::new(0, 0, w, h), color);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        if y0 == y1 {
            let x = x0.min(x1);
            self.fill_rect(Rect::new(x, y0, (x1 - x0).abs() + 1, 1), color);
            return;
        }
        if x0 == x1 {
            let y = y0.min(y1);
            self.fill_rect(Rect::new(x0, y, 1, (y1 - y0).abs() + 1), color);
            return;
        }
        // Bresenham
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.draw_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// One-pixel outline.
    fn draw_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let (r, b) = (rect.right() - 1, rect.bottom() - 1);
        self.draw_line(rect.x, rect.y, r, rect.y, color);
        self.draw_line(rect.x, b, r, b, color);
        self.draw_line(rect.x, rect.y, rect.x, b, color);
        self.draw_line(r, rect.y, r, b, color);
    }

    /// Only set bits are painted; clear bits leave the surface untouched.
    fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap, color: Color) {
        for row in 0..bitmap.height {
            for col in 0..bitmap.width {
                if bitmap.is_set(col, row) {
                    self.draw_pixel(x + col, y + row, color);
                }
            }
        }
    }

    /// Opaque row-major pixel block.
    fn draw_pixmap(&mut self, x: i32, y: i32, w: i32, pixels: &[Color]) {
        if w <= 0 {
            return;
        }
        for (i, &color) in pixels.iter().enumerate() {
            let i = i as i32;
            self.draw_pixel(x + i % w, y + i / w, color);
        }
    }
}

// ── Canvas ───────────────────────────────────────────────────────────────────

/// Display-sized pixel array. Text is rasterised as solid 5×7 glyph boxes,
/// which is enough to compare two drawings pixel for pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
    ops: usize,
}

impl Canvas {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width * height) as usize],
            ops: 0,
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Number of drawing primitives issued so far.
    pub fn op_count(&self) -> usize {
        self.ops
    }

    pub fn count(&self, color: Color) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }

    fn put(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    fn fill_clipped(&mut self, rect: Rect, color: Color) {
        let screen = Rect::new(0, 0, self.width, self.height);
        let Some(clip) = rect.intersection(&screen) else {
            return;
        };
        for y in clip.y..clip.bottom() {
            let row = (y * self.width) as usize;
            self.pixels[row + clip.x as usize..row + clip.right() as usize].fill(color);
        }
    }
}

impl DrawSurface for Canvas {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops += 1;
        self.fill_clipped(rect, color);
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.ops += 1;
        self.put(x, y, color);
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color, scale: u8) {
        self.ops += 1;
        let s = i32::from(scale.max(1));
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let gx = x + i as i32 * GLYPH_W * s;
            self.fill_clipped(Rect::new(gx, y, (GLYPH_W - 1) * s, (GLYPH_H - 1) * s), color);
        }
    }
}
