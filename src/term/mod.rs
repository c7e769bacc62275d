//! Terminal rendering layer.
//!
//! A small framebuffer-based pipeline: the view draws a `GameSession`
//! into a [`fb::FrameBuffer`], and [`renderer::TerminalRenderer`]
//! flushes it to the terminal. The view stays pure so layout can be
//! unit-tested.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::TerminalRenderer;
