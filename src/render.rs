//! Dirty-region rendering.
//!
//! A game describes what *should* be on screen as a [`Scene`]; the
//! [`Renderer`] remembers what it drew last time and issues only the erase
//! and draw calls needed to get from one to the other. The result is pixel
//! identical to clearing the screen and drawing the scene from scratch.

use crate::collision::Rect;
use crate::surface::{text_rect, Bitmap, Color, DrawSurface};

// ── Sprites ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Fill(Color),
    Outline(Color),
    /// Set bits in the colour, clear bits transparent.
    Bitmap(&'static Bitmap, Color),
    /// Opaque pixels, row-major, `rect.w` wide.
    Pixmap(&'static [Color]),
    Text(String, Color, u8),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub rect: Rect,
    pub paint: Paint,
}

impl Sprite {
    pub fn fill(rect: Rect, color: Color) -> Self {
        Self {
            rect,
            paint: Paint::Fill(color),
        }
    }

    pub fn outline(rect: Rect, color: Color) -> Self {
        Self {
            rect,
            paint: Paint::Outline(color),
        }
    }

    pub fn bitmap(x: i32, y: i32, bitmap: &'static Bitmap, color: Color) -> Self {
        Self {
            rect: Rect::new(x, y, bitmap.width, bitmap.height),
            paint: Paint::Bitmap(bitmap, color),
        }
    }

    pub fn pixmap(x: i32, y: i32, w: i32, pixels: &'static [Color]) -> Self {
        let h = if w > 0 { pixels.len() as i32 / w } else { 0 };
        Self {
            rect: Rect::new(x, y, w, h),
            paint: Paint::Pixmap(pixels),
        }
    }

    pub fn text(x: i32, y: i32, text: impl Into<String>, color: Color, scale: u8) -> Self {
        let text = text.into();
        Self {
            rect: text_rect(x, y, &text, scale),
            paint: Paint::Text(text, color, scale),
        }
    }

    pub fn draw<D: DrawSurface + ?Sized>(&self, surface: &mut D) {
        let r = self.rect;
        match &self.paint {
            Paint::Fill(color) => surface.fill_rect(r, *color),
            Paint::Outline(color) => surface.draw_rect(r, *color),
            Paint::Bitmap(bitmap, color) => surface.draw_bitmap(r.x, r.y, bitmap, *color),
            Paint::Pixmap(pixels) => surface.draw_pixmap(r.x, r.y, r.w, pixels),
            Paint::Text(text, color, scale) => surface.draw_text(r.x, r.y, text, *color, *scale),
        }
    }
}

// ── Grid ─────────────────────────────────────────────────────────────────────

/// How a cell content value is painted: a filled rectangle shrunk by
/// `inset` pixels on every side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPaint {
    pub color: Color,
    pub inset: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub origin_x: i32,
    pub origin_y: i32,
    pub cell_w: i32,
    pub cell_h: i32,
    pub cols: usize,
    pub rows: usize,
    /// Indexed by cell content. Content 0 is empty and never looked up.
    pub palette: &'static [CellPaint],
}

impl GridLayout {
    pub fn cell_rect(&self, col: usize, row: usize) -> Rect {
        Rect::new(
            self.origin_x + col as i32 * self.cell_w,
            self.origin_y + row as i32 * self.cell_h,
            self.cell_w,
            self.cell_h,
        )
    }

    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    fn paint_cell<D: DrawSurface + ?Sized>(
        &self,
        surface: &mut D,
        index: usize,
        content: u8,
        background: Color,
    ) {
        let cell = self.cell_rect(index % self.cols, index / self.cols);
        surface.fill_rect(cell, background);
        if content == 0 {
            return;
        }
        if let Some(paint) = self.palette.get(usize::from(content)) {
            let inner = Rect::new(
                cell.x + paint.inset,
                cell.y + paint.inset,
                cell.w - 2 * paint.inset,
                cell.h - 2 * paint.inset,
            );
            if !inner.is_empty() {
                surface.fill_rect(inner, paint.color);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    layout: GridLayout,
    cells: Vec<u8>,
}

impl Grid {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            cells: vec![0; layout.cell_count()],
            layout,
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn set(&mut self, col: usize, row: usize, content: u8) {
        if col < self.layout.cols && row < self.layout.rows {
            self.cells[row * self.layout.cols + col] = content;
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        if col < self.layout.cols && row < self.layout.rows {
            Some(self.cells[row * self.layout.cols + col])
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

// ── Scene ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneLayout {
    pub sprite_slots: usize,
    pub grid: Option<GridLayout>,
}

/// The desired screen content for one render pass, keyed by slot. Lower
/// slots are drawn first.
#[derive(Clone, Debug)]
pub struct Scene {
    sprites: Vec<Option<Sprite>>,
    grid: Option<Grid>,
}

impl Scene {
    pub fn new(layout: &SceneLayout) -> Self {
        Self {
            sprites: vec![None; layout.sprite_slots],
            grid: layout.grid.map(Grid::new),
        }
    }

    /// Empty every slot and cell, keeping the allocation.
    pub fn clear(&mut self) {
        for slot in &mut self.sprites {
            *slot = None;
        }
        if let Some(grid) = &mut self.grid {
            grid.clear();
        }
    }

    pub fn set(&mut self, slot: usize, sprite: Sprite) {
        debug_assert!(slot < self.sprites.len(), "scene slot {slot} out of range");
        if let Some(entry) = self.sprites.get_mut(slot) {
            *entry = Some(sprite);
        }
    }

    pub fn sprites(&self) -> &[Option<Sprite>] {
        &self.sprites
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn grid_mut(&mut self) -> Option<&mut Grid> {
        self.grid.as_mut()
    }
}

// ── Renderer ─────────────────────────────────────────────────────────────────

/// Work done by one render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub erased: usize,
    pub sprites_drawn: usize,
    pub cells_drawn: usize,
}

impl RenderStats {
    pub fn is_idle(&self) -> bool {
        self.erased == 0 && self.sprites_drawn == 0 && self.cells_drawn == 0
    }
}

/// Owns the render snapshot: what was last put on the display, per slot.
#[derive(Debug)]
pub struct Renderer {
    background: Color,
    previous: Vec<Option<Sprite>>,
    /// `None` until the grid has been drawn once.
    previous_grid: Option<Vec<u8>>,
    marked: Vec<bool>,
    dirty: Vec<Rect>,
    erase: Vec<Rect>,
}

impl Renderer {
    pub fn new(layout: &SceneLayout, background: Color) -> Self {
        Self {
            background,
            previous: vec![None; layout.sprite_slots],
            previous_grid: None,
            marked: vec![false; layout.sprite_slots],
            dirty: Vec::new(),
            erase: Vec::new(),
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Forget everything drawn so far. The caller is expected to have
    /// cleared the display to the background colour.
    pub fn invalidate(&mut self) {
        for slot in &mut self.previous {
            *slot = None;
        }
        self.previous_grid = None;
    }

    pub fn snapshot(&self) -> &[Option<Sprite>] {
        &self.previous
    }

    pub fn grid_snapshot(&self) -> Option<&[u8]> {
        self.previous_grid.as_deref()
    }

    /// Bring the display from the last drawn state to `scene`.
    pub fn reconcile<D: DrawSurface + ?Sized>(
        &mut self,
        scene: &Scene,
        surface: &mut D,
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        let current = scene.sprites();
        debug_assert_eq!(current.len(), self.previous.len());

        self.dirty.clear();
        self.erase.clear();
        self.marked.clear();
        self.marked.resize(current.len(), false);

        for (i, (prev, cur)) in self.previous.iter().zip(current).enumerate() {
            if prev == cur {
                continue;
            }
            self.marked[i] = true;
            if let Some(prev) = prev {
                self.erase.push(prev.rect);
                self.dirty.push(prev.rect);
            }
            if let Some(cur) = cur {
                self.dirty.push(cur.rect);
            }
        }

        // Cells whose content changed, plus cells an erase is about to wipe.
        let mut repaint_cells = Vec::new();
        if let Some(grid) = scene.grid() {
            let layout = grid.layout();
            for (index, &content) in grid.cells().iter().enumerate() {
                let stale = self
                    .previous_grid
                    .as_ref()
                    .and_then(|prev| prev.get(index))
                    .map_or(true, |&prev| prev != content);
                let cell = layout.cell_rect(index % layout.cols, index / layout.cols);
                if stale || self.erase.iter().any(|e| e.overlaps(&cell)) {
                    repaint_cells.push(index);
                    self.dirty.push(cell);
                }
            }
        }

        // Anything overlapping a dirty area must be redrawn, which in turn
        // dirties its own footprint.
        loop {
            let mut grew = false;
            for (i, cur) in current.iter().enumerate() {
                if self.marked[i] {
                    continue;
                }
                if let Some(sprite) = cur {
                    if self.dirty.iter().any(|d| d.overlaps(&sprite.rect)) {
                        self.marked[i] = true;
                        self.dirty.push(sprite.rect);
                        grew = true;
                    }
                }
            }
            if !grew {
                break;
            }
        }

        for rect in &self.erase {
            surface.fill_rect(*rect, self.background);
            stats.erased += 1;
        }

        if let Some(grid) = scene.grid() {
            for &index in &repaint_cells {
                grid.layout()
                    .paint_cell(surface, index, grid.cells()[index], self.background);
                stats.cells_drawn += 1;
            }
            self.previous_grid = Some(grid.cells().to_vec());
        }

        for (i, cur) in current.iter().enumerate() {
            if !self.marked[i] {
                continue;
            }
            if let Some(sprite) = cur {
                sprite.draw(surface);
                stats.sprites_drawn += 1;
            }
            self.previous[i] = cur.clone();
        }

        stats
    }

    /// Clear the display and draw `scene` from scratch.
    pub fn repaint<D: DrawSurface + ?Sized>(&mut self, scene: &Scene, surface: &mut D) {
        surface.fill_screen(self.background);
        if let Some(grid) = scene.grid() {
            for (index, &content) in grid.cells().iter().enumerate() {
                grid.layout()
                    .paint_cell(surface, index, content, self.background);
            }
            self.previous_grid = Some(grid.cells().to_vec());
        } else {
            self.previous_grid = None;
        }
        for (slot, sprite) in self.previous.iter_mut().zip(scene.sprites()) {
            if let Some(sprite) = sprite {
                sprite.draw(surface);
            }
            *slot = sprite.clone();
        }
    }
}

/// Gate for screens that are drawn once per phase entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenLatch {
    drawn: bool,
}

impl ScreenLatch {
    /// True exactly once until the latch is reset.
    pub fn first_draw(&mut self) -> bool {
        !std::mem::replace(&mut self.drawn, true)
    }

    pub fn reset(&mut self) {
        self.drawn = false;
    }

    pub fn is_drawn(&self) -> bool {
        self.drawn
    }
}
