//! Terminal match-3 runner (default binary).
//!
//! Crossterm drives input (keys and mouse clicks) and a custom
//! framebuffer renderer draws frames; the session advances on a fixed
//! tick.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};

use tui_match3::core::GameSession;
use tui_match3::input::{should_quit, Intent, PointerTracker};
use tui_match3::term::{GameView, TerminalRenderer, Viewport};
use tui_match3::types::TICK_MS;

fn main() -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(1);
    let mut session = GameSession::new(seed)?;

    let view = GameView::default();
    let mut tracker = PointerTracker::new(session.grid().width(), session.grid().height());

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        let fb = view.render(&session, tracker.cursor(), viewport);
        term.draw(&fb)?;

        // Input with timeout until the next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    tracker.handle_key(key.code);
                }
                Event::Mouse(mouse) => {
                    let grid = session.grid();
                    let cell = view.cell_at(
                        grid.width(),
                        grid.height(),
                        viewport,
                        mouse.column,
                        mouse.row,
                    );
                    match (mouse.kind, cell) {
                        (MouseEventKind::Down(MouseButton::Left), Some(pos)) => {
                            tracker.press(pos);
                        }
                        (MouseEventKind::Up(MouseButton::Left), Some(pos)) => {
                            tracker.release(pos);
                        }
                        (MouseEventKind::Up(MouseButton::Left), None) => {
                            tracker.cancel_press();
                        }
                        _ => {}
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for intent in tracker.take_intents() {
                match intent {
                    Intent::Select(pos) => session.click(pos),
                    Intent::Activate(pos) => {
                        // A double click on a plain tile falls back to a
                        // normal click.
                        if !session.activate_bonus(pos) {
                            session.click(pos);
                        }
                    }
                }
            }

            session.tick(TICK_MS);
        }
    }
}
