//! GameView: maps a `GameSession` into a terminal framebuffer.
//!
//! Pure (no I/O), so layout and glyph choices are unit-testable. Tiles
//! are drawn at their animated positions, which trail their logical
//! cells while swaps and drops are easing in.

use crate::core::session::GameSession;
use crate::core::tasks::TaskOutcome;
use crate::term::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{BonusKind, Position, ShapeKind};

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

/// Board-to-terminal layout: each board cell covers `cell_w` x `cell_h`
/// terminal cells.
pub struct GameView {
    cell_w: u16,
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 4x2 keeps cells roughly square in typical terminal fonts and
        // leaves room for a centered glyph.
        Self {
            cell_w: 4,
            cell_h: 2,
        }
    }
}

const BOARD_BG: Rgb = Rgb::new(24, 24, 34);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    /// Top-left corner of the board frame, centered in the viewport.
    fn board_origin(&self, grid_w: u8, grid_h: u8, viewport: Viewport) -> (u16, u16) {
        let frame_w = grid_w as u16 * self.cell_w + 2;
        let frame_h = grid_h as u16 * self.cell_h + 2;
        (
            viewport.width.saturating_sub(frame_w) / 2,
            viewport.height.saturating_sub(frame_h) / 2,
        )
    }

    /// Map a terminal coordinate back to a board cell, for mouse input.
    pub fn cell_at(
        &self,
        grid_w: u8,
        grid_h: u8,
        viewport: Viewport,
        x: u16,
        y: u16,
    ) -> Option<Position> {
        let (ox, oy) = self.board_origin(grid_w, grid_h, viewport);
        let inner_x = x.checked_sub(ox.checked_add(1)?)?;
        let inner_y = y.checked_sub(oy.checked_add(1)?)?;
        let col = inner_x / self.cell_w;
        let row = inner_y / self.cell_h;
        if col < grid_w as u16 && row < grid_h as u16 {
            Some(Position::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Render one frame. `cursor` is the keyboard cursor cell.
    pub fn render(&self, session: &GameSession, cursor: Position, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let grid = session.grid();
        let (grid_w, grid_h) = (grid.width(), grid.height());
        let (ox, oy) = self.board_origin(grid_w, grid_h, viewport);
        let board_px_w = grid_w as u16 * self.cell_w;
        let board_px_h = grid_h as u16 * self.cell_h;

        let bg = CellStyle::plain(Rgb::new(70, 70, 85), BOARD_BG);
        fb.fill_rect(ox + 1, oy + 1, board_px_w, board_px_h, ' ', bg);
        self.draw_border(&mut fb, ox, oy, board_px_w + 2, board_px_h + 2);

        // Selection and cursor backgrounds sit at the logical cells.
        if let Some(sel) = session.selected() {
            self.fill_cell(&mut fb, ox, oy, sel, Rgb::new(90, 70, 30));
        }
        if Some(cursor) != session.selected() {
            self.fill_cell(&mut fb, ox, oy, cursor, Rgb::new(45, 45, 70));
        }

        // Tiles, at their animated positions.
        grid.for_each_cell(|_, tile| {
            let Some(tile) = tile else { return };
            let px = ox as f32 + 1.0 + tile.x * self.cell_w as f32;
            let py = oy as f32 + 1.0 + tile.y * self.cell_h as f32;
            if py < oy as f32 + 1.0 {
                // Still falling in from above the frame.
                return;
            }
            let gx = px.round() as u16 + self.cell_w / 2 - 1;
            let gy = py.round() as u16 + self.cell_h / 2 - 1;

            let (glyph, mut style) = tile_face(tile.shape, tile.bonus);
            if tile.vanishing {
                style.dim = true;
                style.bold = false;
            }
            let background = cell_background(&fb, gx, gy);
            style.bg = background;
            let glyph = if tile.vanish_progress > 0.5 { '·' } else { glyph };
            fb.put_char(gx, gy, glyph, style);
        });

        self.draw_side_panel(&mut fb, session, viewport, ox, oy, board_px_w + 2);

        if let Some(outcome) = session.banner() {
            let text = match outcome {
                TaskOutcome::Completed { awarded } => format!("TASK COMPLETE  +{}", awarded),
                TaskOutcome::Failed => "OUT OF MOVES - TRY AGAIN".to_string(),
            };
            self.draw_overlay(&mut fb, ox, oy, board_px_w + 2, board_px_h + 2, &text);
        }

        fb
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, ox: u16, oy: u16, pos: Position, bg: Rgb) {
        let px = ox + 1 + pos.col as u16 * self.cell_w;
        let py = oy + 1 + pos.row as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', CellStyle::plain(bg, bg));
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        let style = CellStyle::plain(Rgb::new(180, 180, 190), PANEL_BG);
        if w < 2 || h < 2 {
            return;
        }
        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        session: &GameSession,
        viewport: Viewport,
        ox: u16,
        oy: u16,
        frame_w: u16,
    ) {
        let panel_x = ox.saturating_add(frame_w).saturating_add(2);
        if panel_x + 12 >= viewport.width {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle::default();
        let task = session.task();
        let progress = session.progress();
        let (glyph, shape_style) = tile_face(task.shape, None);

        let mut y = oy;
        fb.put_str(panel_x, y, "TASK", label);
        y += 1;
        fb.put_char(panel_x, y, glyph, shape_style);
        fb.put_str(
            panel_x + 2,
            y,
            &format!(
                "{} {}/{}",
                task.shape.as_str(),
                progress.collected.min(task.count),
                task.count
            ),
            value,
        );
        y += 2;

        fb.put_str(panel_x, y, "MOVES", label);
        y += 1;
        fb.put_str(panel_x, y, &format!("{}", progress.moves_left.max(0)), value);
        y += 2;

        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        fb.put_str(panel_x, y, &format!("{}", progress.task_score), value);
        y += 2;

        fb.put_str(panel_x, y, "TOTAL", label);
        y += 1;
        fb.put_str(panel_x, y, &format!("{}", session.total_score()), value);
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, text: &str) {
        let text_w = text.chars().count() as u16;
        let tx = x.saturating_add(w.saturating_sub(text_w) / 2);
        let ty = y.saturating_add(h / 2);
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(40, 40, 40),
            bold: true,
            dim: false,
        };
        fb.put_str(tx, ty, text, style);
    }
}

/// Glyph and color for a tile face. Bonus kinds override the shape glyph.
fn tile_face(shape: ShapeKind, bonus: Option<BonusKind>) -> (char, CellStyle) {
    let (glyph, fg) = match bonus {
        Some(BonusKind::HorizontalClear) => ('↔', Rgb::new(255, 160, 90)),
        Some(BonusKind::VerticalClear) => ('↕', Rgb::new(255, 160, 90)),
        Some(BonusKind::ColorClear) => ('★', Rgb::new(255, 255, 160)),
        None => match shape {
            ShapeKind::Square => ('■', Rgb::new(100, 160, 230)),
            ShapeKind::Circle => ('●', Rgb::new(235, 200, 90)),
            ShapeKind::Triangle => ('▲', Rgb::new(120, 215, 130)),
        },
    };
    (
        glyph,
        CellStyle {
            fg,
            bg: BOARD_BG,
            bold: bonus.is_some(),
            dim: false,
        },
    )
}

/// Background already painted at (x, y), so tiles keep selection and
/// cursor highlights behind them.
fn cell_background(fb: &FrameBuffer, x: u16, y: u16) -> Rgb {
    fb.get(x, y).map(|c| c.style.bg).unwrap_or(BOARD_BG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Grid;
    use crate::core::rng::SimpleRng;
    use crate::core::tasks::Task;
    use crate::types::Tile;

    fn test_session() -> GameSession {
        let mut grid = Grid::new(6, 6).unwrap();
        for row in 0..6u8 {
            for col in 0..6u8 {
                let shape = ShapeKind::from_index(u32::from(((col + 2 * (row % 2)) % 4) % 3));
                grid.set(row, col, Some(Tile::new(shape, row, col))).unwrap();
            }
        }
        GameSession::from_parts(
            grid,
            SimpleRng::new(1),
            Task {
                shape: ShapeKind::Circle,
                count: 5,
                moves: 10,
            },
        )
    }

    fn frame_text(fb: &FrameBuffer) -> String {
        let mut out = String::new();
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                out.push(fb.get(x, y).map(|c| c.ch).unwrap_or(' '));
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn render_fills_the_viewport() {
        let session = test_session();
        let view = GameView::default();
        let fb = view.render(&session, Position::new(0, 0), Viewport::new(80, 24));
        assert_eq!((fb.width(), fb.height()), (80, 24));
    }

    #[test]
    fn side_panel_shows_task_and_moves() {
        let session = test_session();
        let view = GameView::default();
        let fb = view.render(&session, Position::new(0, 0), Viewport::new(80, 24));
        let text = frame_text(&fb);
        assert!(text.contains("TASK"));
        assert!(text.contains("0/5"));
        assert!(text.contains("MOVES"));
        assert!(text.contains("10"));
    }

    #[test]
    fn every_tile_glyph_lands_inside_the_frame() {
        let session = test_session();
        let view = GameView::default();
        let fb = view.render(&session, Position::new(0, 0), Viewport::new(80, 24));
        let text = frame_text(&fb);
        let glyphs = text
            .chars()
            .filter(|c| matches!(c, '■' | '●' | '▲'))
            .count();
        // 36 board tiles plus the task glyph in the panel.
        assert_eq!(glyphs, 37);
    }

    #[test]
    fn cell_at_inverts_the_layout() {
        let view = GameView::default();
        let viewport = Viewport::new(80, 24);
        let (ox, oy) = view.board_origin(6, 6, viewport);

        for row in 0..6u8 {
            for col in 0..6u8 {
                let px = ox + 1 + col as u16 * view.cell_w;
                let py = oy + 1 + row as u16 * view.cell_h;
                assert_eq!(
                    view.cell_at(6, 6, viewport, px, py),
                    Some(Position::new(row, col))
                );
                // Every terminal cell of the board cell maps back to it.
                assert_eq!(
                    view.cell_at(6, 6, viewport, px + view.cell_w - 1, py + view.cell_h - 1),
                    Some(Position::new(row, col))
                );
            }
        }
    }

    #[test]
    fn coordinates_outside_the_board_map_to_none() {
        let view = GameView::default();
        let viewport = Viewport::new(80, 24);
        assert_eq!(view.cell_at(6, 6, viewport, 0, 0), None);
        assert_eq!(view.cell_at(6, 6, viewport, 79, 23), None);
    }

    #[test]
    fn no_banner_while_the_task_is_live() {
        let session = test_session();
        let view = GameView::default();
        let fb = view.render(&session, Position::new(0, 0), Viewport::new(80, 24));
        let text = frame_text(&fb);
        assert!(!text.contains("TASK COMPLETE"));
        assert!(!text.contains("OUT OF MOVES"));
    }
}
