//! Pointer and keyboard input tracking for the board.
//!
//! Clicks arrive either from real mouse events (already mapped to a
//! board cell by the view) or from a keyboard cursor driven by the
//! arrow keys. Two presses on the same cell within the double-click
//! window become an activation instead of a reselect; terminals do not
//! report double-clicks natively, so the window is tracked here. A
//! press released on an adjacent cell becomes a drag swap.

use std::time::Instant;

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::{Position, DOUBLE_CLICK_MS};

/// What the player asked the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Single click: select, deselect, or swap with the selection.
    Select(Position),
    /// Double click: fire the bonus tile under the pointer.
    Activate(Position),
}

/// At most this many intents can queue up between frames; the frame
/// loop drains far more often than a human can click.
pub const INTENT_QUEUE_LEN: usize = 8;

/// Collects clicks and cursor movement into per-frame intent batches.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    grid_width: u8,
    grid_height: u8,
    cursor: Position,
    last_click: Option<(Position, Instant)>,
    press_origin: Option<Position>,
    double_click_window_ms: u32,
    pending: ArrayVec<Intent, INTENT_QUEUE_LEN>,
}

impl PointerTracker {
    pub fn new(grid_width: u8, grid_height: u8) -> Self {
        Self {
            grid_width,
            grid_height,
            cursor: Position::new(0, 0),
            last_click: None,
            press_origin: None,
            double_click_window_ms: DOUBLE_CLICK_MS,
            pending: ArrayVec::new(),
        }
    }

    pub fn with_double_click_window_ms(mut self, window_ms: u32) -> Self {
        self.double_click_window_ms = window_ms;
        self
    }

    /// The keyboard cursor cell, drawn by the view.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Register a click on a board cell (mouse or Enter).
    pub fn click(&mut self, pos: Position) {
        self.cursor = pos;
        let now = Instant::now();
        match self.last_click {
            Some((last, at))
                if last == pos && at.elapsed().as_millis() as u32 <= self.double_click_window_ms =>
            {
                self.last_click = None;
                let _ = self.pending.try_push(Intent::Activate(pos));
            }
            _ => {
                self.last_click = Some((pos, now));
                let _ = self.pending.try_push(Intent::Select(pos));
            }
        }
    }

    /// Start of a press (mouse button down on a board cell).
    pub fn press(&mut self, pos: Position) {
        self.press_origin = Some(pos);
    }

    /// End of a press. Released on the press cell it is a click;
    /// released on an adjacent cell it is a drag swap, selecting both
    /// ends in order. A drag further than one cell is abandoned.
    pub fn release(&mut self, pos: Position) {
        match self.press_origin.take() {
            None => self.click(pos),
            Some(origin) if origin == pos => self.click(pos),
            Some(origin) if origin.is_adjacent(pos) => {
                self.last_click = None;
                self.cursor = pos;
                let _ = self.pending.try_push(Intent::Select(origin));
                let _ = self.pending.try_push(Intent::Select(pos));
            }
            Some(_) => {}
        }
    }

    /// Drop a press that ended outside the board.
    pub fn cancel_press(&mut self) {
        self.press_origin = None;
    }

    /// Handle a key press: arrows steer the cursor, Enter and Space
    /// click it. Unknown keys are ignored.
    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                self.cursor.row = self.cursor.row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                self.cursor.row = (self.cursor.row + 1).min(self.grid_height - 1);
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.cursor.col = self.cursor.col.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.cursor.col = (self.cursor.col + 1).min(self.grid_width - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.click(self.cursor);
            }
            _ => {}
        }
    }

    /// Take everything queued since the last frame.
    pub fn take_intents(&mut self) -> ArrayVec<Intent, INTENT_QUEUE_LEN> {
        std::mem::take(&mut self.pending)
    }

    pub fn reset(&mut self) {
        self.last_click = None;
        self.press_origin = None;
        self.pending.clear();
    }
}

/// Quit keys: `q`, Escape, or Ctrl-C.
pub fn should_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn single_click_selects() {
        let mut tracker = PointerTracker::new(6, 6);
        tracker.click(Position::new(2, 3));
        assert_eq!(
            tracker.take_intents().as_slice(),
            &[Intent::Select(Position::new(2, 3))]
        );
    }

    #[test]
    fn quick_second_click_on_same_cell_activates() {
        let mut tracker = PointerTracker::new(6, 6);
        tracker.click(Position::new(1, 1));
        tracker.click(Position::new(1, 1));
        assert_eq!(
            tracker.take_intents().as_slice(),
            &[
                Intent::Select(Position::new(1, 1)),
                Intent::Activate(Position::new(1, 1)),
            ]
        );
    }

    #[test]
    fn slow_second_click_is_just_another_select() {
        let mut tracker = PointerTracker::new(6, 6);
        tracker.click(Position::new(1, 1));
        // Backdate the first click past the window.
        if let Some((_, at)) = tracker.last_click.as_mut() {
            *at = Instant::now() - Duration::from_millis(DOUBLE_CLICK_MS as u64 + 1);
        }
        tracker.click(Position::new(1, 1));
        assert_eq!(
            tracker.take_intents().as_slice(),
            &[
                Intent::Select(Position::new(1, 1)),
                Intent::Select(Position::new(1, 1)),
            ]
        );
    }

    #[test]
    fn clicks_on_different_cells_never_activate() {
        let mut tracker = PointerTracker::new(6, 6);
        tracker.click(Position::new(0, 0));
        tracker.click(Position::new(0, 1));
        tracker.click(Position::new(0, 1));
        let intents = tracker.take_intents();
        assert_eq!(intents[0], Intent::Select(Position::new(0, 0)));
        assert_eq!(intents[1], Intent::Select(Position::new(0, 1)));
        assert_eq!(intents[2], Intent::Activate(Position::new(0, 1)));
    }

    #[test]
    fn arrow_keys_clamp_the_cursor_to_the_grid() {
        let mut tracker = PointerTracker::new(3, 3);
        tracker.handle_key(KeyCode::Up);
        tracker.handle_key(KeyCode::Left);
        assert_eq!(tracker.cursor(), Position::new(0, 0));

        for _ in 0..10 {
            tracker.handle_key(KeyCode::Down);
            tracker.handle_key(KeyCode::Right);
        }
        assert_eq!(tracker.cursor(), Position::new(2, 2));
    }

    #[test]
    fn enter_clicks_the_cursor_cell() {
        let mut tracker = PointerTracker::new(6, 6);
        tracker.handle_key(KeyCode::Down);
        tracker.handle_key(KeyCode::Right);
        tracker.handle_key(KeyCode::Enter);
        assert_eq!(
            tracker.take_intents().as_slice(),
            &[Intent::Select(Position::new(1, 1))]
        );
    }

    #[test]
    fn drag_to_an_adjacent_cell_selects_both_ends() {
        let mut tracker = PointerTracker::new(6, 6);
        tracker.press(Position::new(2, 2));
        tracker.release(Position::new(2, 3));
        assert_eq!(
            tracker.take_intents().as_slice(),
            &[
                Intent::Select(Position::new(2, 2)),
                Intent::Select(Position::new(2, 3)),
            ]
        );
    }

    #[test]
    fn drag_further_than_one_cell_is_abandoned() {
        let mut tracker = PointerTracker::new(6, 6);
        tracker.press(Position::new(2, 2));
        tracker.release(Position::new(4, 4));
        assert!(tracker.take_intents().is_empty());
    }

    #[test]
    fn press_and_release_on_the_same_cell_is_a_click() {
        let mut tracker = PointerTracker::new(6, 6);
        tracker.press(Position::new(1, 1));
        tracker.release(Position::new(1, 1));
        tracker.press(Position::new(1, 1));
        tracker.release(Position::new(1, 1));
        assert_eq!(
            tracker.take_intents().as_slice(),
            &[
                Intent::Select(Position::new(1, 1)),
                Intent::Activate(Position::new(1, 1)),
            ]
        );
    }

    #[test]
    fn cancelled_press_emits_nothing() {
        let mut tracker = PointerTracker::new(6, 6);
        tracker.press(Position::new(0, 0));
        tracker.cancel_press();
        assert!(tracker.take_intents().is_empty());
    }

    #[test]
    fn take_intents_drains_the_queue() {
        let mut tracker = PointerTracker::new(6, 6);
        tracker.click(Position::new(0, 0));
        assert_eq!(tracker.take_intents().len(), 1);
        assert!(tracker.take_intents().is_empty());
    }

    #[test]
    fn quit_keys() {
        use crossterm::event::KeyEvent;
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE
        )));
        assert!(should_quit(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
    }
}
