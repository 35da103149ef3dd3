/// Terminal presentation of the pixel display — all terminal I/O lives here.
///
/// Drawing goes into a shadow `Canvas`; `present` then pushes only the
/// terminal cells touched since the last call. Each cell shows two stacked
/// pixels with an upper half-block, and text is overlaid as real characters
/// so it stays readable at one column per pixel.

use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Print},
    QueueableCommand,
};
use pixel_arcade::collision::Rect;
use pixel_arcade::surface::{Canvas, Color, DrawSurface, GLYPH_H, GLYPH_W};

const UPPER_HALF: char = '▀';

fn term_color(color: Color) -> style::Color {
    let (r, g, b) = color.to_rgb888();
    style::Color::Rgb { r, g, b }
}

pub struct TerminalSurface<W: Write> {
    out: W,
    shadow: Canvas,
    cols: i32,
    rows: i32,
    dirty: Vec<bool>,
    pending: Vec<(i32, i32)>,
    overlay: HashMap<(i32, i32), (char, Color)>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, width: i32, height: i32) -> Self {
        let cols = width.max(0);
        let rows = (height.max(0) + 1) / 2;
        Self {
            out,
            shadow: Canvas::new(width, height),
            cols,
            rows,
            dirty: vec![false; (cols * rows) as usize],
            pending: Vec::new(),
            overlay: HashMap::new(),
        }
    }

    fn touch(&mut self, col: i32, row: i32) {
        if col < 0 || row < 0 || col >= self.cols || row >= self.rows {
            return;
        }
        let i = (row * self.cols + col) as usize;
        if !self.dirty[i] {
            self.dirty[i] = true;
            self.pending.push((col, row));
        }
    }

    /// Mark every cell under `rect` as needing a redraw and drop any text
    /// the pixels now cover.
    fn touch_rect(&mut self, rect: Rect) {
        let screen = Rect::new(0, 0, self.cols, self.rows * 2);
        let Some(clip) = rect.intersection(&screen) else {
            return;
        };
        for row in clip.y / 2..=(clip.bottom() - 1) / 2 {
            for col in clip.x..clip.right() {
                self.overlay.remove(&(col, row));
                self.touch(col, row);
            }
        }
    }

    /// Force every cell to be redrawn on the next `present`.
    pub fn invalidate(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                self.touch(col, row);
            }
        }
    }

    /// Push all touched cells to the terminal and flush.
    pub fn present(&mut self) -> std::io::Result<()> {
        let mut pending = std::mem::take(&mut self.pending);
        pending.sort_unstable_by_key(|&(col, row)| (row, col));
        for &(col, row) in &pending {
            self.dirty[(row * self.cols + col) as usize] = false;
            self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
            if let Some(&(ch, color)) = self.overlay.get(&(col, row)) {
                self.out.queue(style::SetForegroundColor(term_color(color)))?;
                self.out.queue(style::SetBackgroundColor(term_color(Color::BLACK)))?;
                self.out.queue(Print(ch))?;
                continue;
            }
            let top = self.shadow.pixel(col, row * 2).unwrap_or_default();
            let bottom = self.shadow.pixel(col, row * 2 + 1).unwrap_or_default();
            self.out.queue(style::SetForegroundColor(term_color(top)))?;
            self.out.queue(style::SetBackgroundColor(term_color(bottom)))?;
            self.out.queue(Print(UPPER_HALF))?;
        }
        pending.clear();
        self.pending = pending;
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> DrawSurface for TerminalSurface<W> {
    fn size(&self) -> (i32, i32) {
        self.shadow.size()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.shadow.fill_rect(rect, color);
        self.touch_rect(rect);
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.shadow.draw_pixel(x, y, color);
        self.touch_rect(Rect::new(x, y, 1, 1));
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color, scale: u8) {
        self.shadow.draw_text(x, y, text, color, scale);
        let s = i32::from(scale.max(1));
        let glyph_row = (y + GLYPH_H * s / 2) / 2;
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let gx = x + i as i32 * GLYPH_W * s;
            let glyph = Rect::new(gx, y, (GLYPH_W - 1) * s, (GLYPH_H - 1) * s);
            self.touch_rect(glyph);
            // blank the glyph box, then put the character in its middle row
            for row in glyph.y.max(0) / 2..=(glyph.bottom() - 1) / 2 {
                for col in glyph.x..glyph.right() {
                    if col >= 0 && col < self.cols && row < self.rows {
                        self.overlay.insert((col, row), (' ', color));
                    }
                }
            }
            if gx >= 0 && gx < self.cols && glyph_row >= 0 && glyph_row < self.rows {
                self.overlay.insert((gx, glyph_row), (ch, color));
            }
        }
    }
}
