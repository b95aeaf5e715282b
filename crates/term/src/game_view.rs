//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, TileSnapshot};
use crate::fb::{digit_count, Cell, CellStyle, FrameBuffer, Rgb};
use crate::palette::{self, color_for, text_color_for};
use crate::types::{EngineState, Pos, GRID_SIZE};

/// Smallest usable tile size: two digit columns plus selection brackets.
pub const MIN_CELL_W: u16 = 4;
pub const MIN_CELL_H: u16 = 1;
/// Largest tile size.
pub const MAX_CELL_W: u16 = 32;
pub const MAX_CELL_H: u16 = 16;

const PANEL_GAP: u16 = 3;
const PANEL_MIN_W: u16 = 14;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Board frame placement inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
}

impl Layout {
    fn inner_x(&self) -> u16 {
        self.start_x + 1
    }

    fn inner_y(&self) -> u16 {
        self.start_y + 1
    }
}

/// Renders the tile board, the side panel and the state overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameView {
    /// Tile width in terminal columns.
    cell_w: u16,
    /// Tile height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 7x3 keeps tiles roughly square in most terminal fonts.
        Self::new(7, 3)
    }
}

impl GameView {
    /// Sizes are clamped to [`MIN_CELL_W`]..=[`MAX_CELL_W`] and
    /// [`MIN_CELL_H`]..=[`MAX_CELL_H`].
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.clamp(MIN_CELL_W, MAX_CELL_W),
            cell_h: cell_h.clamp(MIN_CELL_H, MAX_CELL_H),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn cell_size(&self) -> (u16, u16) {
        (self.cell_w, self.cell_h)
    }

    fn layout(&self, viewport: Viewport) -> Layout {
        let frame_w = (GRID_SIZE as u16).saturating_mul(self.cell_w).saturating_add(2);
        let frame_h = (GRID_SIZE as u16).saturating_mul(self.cell_h).saturating_add(2);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        Layout {
            start_x,
            start_y,
            frame_w,
            frame_h,
        }
    }

    /// Board cell under terminal coordinates `(x, y)`, using the same layout
    /// as [`GameView::render_into`].
    pub fn cell_at(&self, viewport: Viewport, x: u16, y: u16) -> Option<Pos> {
        let layout = self.layout(viewport);
        let dx = x.checked_sub(layout.inner_x())?;
        let dy = y.checked_sub(layout.inner_y())?;
        let col = dx / self.cell_w;
        let row = dy / self.cell_h;
        if col >= GRID_SIZE as u16 || row >= GRID_SIZE as u16 {
            return None;
        }
        Pos::new(row as u8, col as u8)
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Allocation-free once `fb` has reached the viewport size.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell {
            ch: ' ',
            style: CellStyle::new(palette::TEXT, palette::BACKGROUND),
        });

        let layout = self.layout(viewport);

        let grid = CellStyle::new(palette::GRID, palette::GRID);
        fb.fill_rect(
            layout.inner_x(),
            layout.inner_y(),
            layout.frame_w - 2,
            layout.frame_h - 2,
            ' ',
            grid,
        );
        self.draw_border(
            fb,
            layout.start_x,
            layout.start_y,
            layout.frame_w,
            layout.frame_h,
            CellStyle::new(palette::GRID, palette::BACKGROUND).bold(),
        );

        for pos in Pos::all() {
            self.draw_empty_cell(fb, &layout, pos);
        }

        // Selected tile last so it stays on top while sliding.
        for tile in snap.tiles.iter().filter(|t| !t.selected) {
            self.draw_tile(fb, &layout, tile);
        }
        for tile in snap.tiles.iter().filter(|t| t.selected) {
            self.draw_tile(fb, &layout, tile);
        }

        self.draw_side_panel(fb, snap, viewport, &layout);

        match snap.state {
            EngineState::Playing => {}
            EngineState::LevelComplete => self.draw_level_complete(fb, snap, &layout),
            EngineState::GameOver => self.draw_game_over(fb, snap, &layout),
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '╭', style);
        fb.put_char(x + w - 1, y, '╮', style);
        fb.put_char(x, y + h - 1, '╰', style);
        fb.put_char(x + w - 1, y + h - 1, '╯', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, layout: &Layout, pos: Pos) {
        let px = layout.inner_x() + pos.col() as u16 * self.cell_w;
        let py = layout.inner_y() + pos.row() as u16 * self.cell_h;
        let style = CellStyle::new(palette::GRID, palette::EMPTY_CELL);
        fb.fill_rect(px + 1, py, self.cell_w - 2, self.cell_h, ' ', style);
        fb.put_char(
            px + self.cell_w / 2,
            py + self.cell_h / 2,
            '·',
            style.dim(),
        );
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, layout: &Layout, tile: &TileSnapshot) {
        // Animated position, in whole terminal cells.
        let px = layout.inner_x() + (tile.x.max(0.0) * self.cell_w as f32).round() as u16;
        let py = layout.inner_y() + (tile.y.max(0.0) * self.cell_h as f32).round() as u16;

        let base = if tile.target {
            palette::TARGET
        } else {
            color_for(tile.value)
        };
        let bg = if tile.target || tile.special {
            // Pulsing glow between the base colour and white.
            base.mix(palette::WHITE, 0.12 * (1.0 + tile.glow_phase.sin()))
        } else {
            base
        };
        let body_w = self.cell_w - 2;
        fb.fill_rect(px + 1, py, body_w, self.cell_h, ' ', CellStyle::new(bg, bg));

        let mut text = CellStyle::new(text_color_for(bg), bg);
        if tile.merge_pulse > 0.0 || tile.target {
            text = text.bold();
        }

        let marker = if tile.target {
            Some(('★', palette::WHITE))
        } else if tile.special {
            Some(('♦', palette::SPECIAL))
        } else {
            None
        };

        let value_row = py + self.cell_h / 2;
        if let Some((ch, fg)) = marker {
            let marker_style = CellStyle::new(fg, bg).bold();
            if self.cell_h >= 2 {
                fb.put_char(px + self.cell_w / 2, py, ch, marker_style);
            } else if digit_count(tile.value as u64) < body_w {
                fb.put_char(px + 1, py, ch, marker_style);
            }
        }

        // Values wider than the body spill over the bracket columns.
        let digits = digit_count(tile.value as u64);
        let (span_x, span_w) = if digits <= body_w {
            (px + 1, body_w)
        } else {
            (px, self.cell_w)
        };
        let vx = span_x + span_w.saturating_sub(digits) / 2;
        fb.put_u32(vx, value_row, tile.value, text);

        if tile.selected {
            let bracket = CellStyle::new(palette::SELECTED, palette::GRID).bold();
            for dy in 0..self.cell_h {
                fb.put_char(px, py + dy, '[', bracket);
                fb.put_char(px + self.cell_w - 1, py + dy, ']', bracket);
            }
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        layout: &Layout,
    ) {
        let panel_x = layout
            .start_x
            .saturating_add(layout.frame_w)
            .saturating_add(PANEL_GAP);
        if panel_x >= viewport.width || viewport.width - panel_x < PANEL_MIN_W {
            return;
        }

        let label = CellStyle::new(palette::TEXT, palette::BACKGROUND).bold();
        let value = CellStyle::new(palette::TEXT, palette::BACKGROUND);
        let target = CellStyle::new(Rgb::new(184, 134, 11), palette::BACKGROUND).bold();
        let clock = CellStyle::new(Rgb::new(0, 100, 200), palette::BACKGROUND);
        let best = CellStyle::new(Rgb::new(0, 150, 0), palette::BACKGROUND);
        let help = CellStyle::new(palette::GRID, palette::BACKGROUND);

        let mut y = layout.start_y;
        let x = fb.put_str(panel_x, y, "LEVEL ", label);
        fb.put_u32(x, y, snap.level, label);
        y = y.saturating_add(1);
        let x = fb.put_str(panel_x, y, "TARGET ", target);
        fb.put_u32(x, y, snap.target, target);
        y = y.saturating_add(2);

        let x = fb.put_str(panel_x, y, "TIME  ", value);
        put_hms(fb, x, y, snap.display_time_ms(), clock);
        y = y.saturating_add(1);
        let x = fb.put_str(panel_x, y, "BEST  ", value);
        match snap.best_ms {
            Some(ms) => put_hms(fb, x, y, ms, best),
            None => {
                fb.put_str(x, y, "--:--:--", help);
            }
        }
        y = y.saturating_add(1);
        let x = fb.put_str(panel_x, y, "SCORE ", value);
        fb.put_u64(x, y, snap.total_score, label);
        y = y.saturating_add(2);

        for line in [
            "arrows/wasd  move",
            "click/tab    select",
            "r            reset",
            "q            quit",
        ] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, help);
            y = y.saturating_add(1);
        }
    }

    fn overlay_box(&self, fb: &mut FrameBuffer, layout: &Layout, rows: u16) -> (u16, u16, u16) {
        let inner_w = layout.frame_w - 2;
        let top = layout
            .inner_y()
            .saturating_add((layout.frame_h - 2).saturating_sub(rows) / 2);
        let shade = CellStyle::new(palette::WHITE, palette::TEXT);
        fb.fill_rect(layout.inner_x(), top, inner_w, rows, ' ', shade);
        (layout.inner_x(), top, inner_w)
    }

    fn draw_level_complete(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let (x, top, w) = self.overlay_box(fb, layout, 5);
        let title = CellStyle::new(palette::TARGET, palette::TEXT).bold();
        let body = CellStyle::new(palette::WHITE, palette::TEXT);

        fb.put_str_centered(x, top, w, "HURRAY!", title);

        let time_x = x + w.saturating_sub(14) / 2;
        let tx = fb.put_str(time_x, top + 1, "TIME  ", body);
        put_hms(fb, tx, top + 1, snap.display_time_ms(), body);
        if let Some(ms) = snap.best_ms {
            let bx = fb.put_str(time_x, top + 2, "BEST  ", body);
            put_hms(fb, bx, top + 2, ms, body);
        }

        fb.put_str_centered(x, top + 4, w, "SPACE to continue", body.dim());
    }

    fn draw_game_over(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let (x, top, w) = self.overlay_box(fb, layout, 4);
        let title = CellStyle::new(palette::WHITE, palette::TEXT).bold();
        let body = CellStyle::new(palette::WHITE, palette::TEXT);

        fb.put_str_centered(x, top, w, "GAME OVER", title);

        let label = "Final Score: ";
        let len = label.len() as u16 + digit_count(snap.total_score);
        let sx = fb.put_str(x + w.saturating_sub(len) / 2, top + 1, label, body);
        fb.put_u64(sx, top + 1, snap.total_score, body);

        fb.put_str_centered(x, top + 3, w, "SPACE for a new game", body.dim());
    }
}

/// `HH:MM:SS` for a duration in milliseconds. Hours are not wrapped.
pub fn format_hms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Allocation-free [`format_hms`] straight into the framebuffer.
fn put_hms(fb: &mut FrameBuffer, x: u16, y: u16, ms: u64, style: CellStyle) {
    let secs = ms / 1000;
    let mut cx = x;
    for (i, part) in [secs / 3600, (secs / 60) % 60, secs % 60].into_iter().enumerate() {
        if i > 0 {
            fb.put_char(cx, y, ':', style);
            cx = cx.saturating_add(1);
        }
        if part < 10 {
            fb.put_char(cx, y, '0', style);
            cx = cx.saturating_add(1);
        }
        cx = fb.put_u64(cx, y, part, style);
    }
}
