//! Input handling for terminal environments.

pub mod handler;

pub use handler::{should_quit, Intent, PointerTracker};
