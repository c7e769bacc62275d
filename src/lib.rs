//! A terminal match-3 game: swap adjacent tiles to line up three or
//! more of a shape, chase collection tasks, and spend bonus tiles.
//!
//! The crate splits into a pure, deterministic [`core`] (grid, match
//! detection, cascade resolution, tasks, the session state machine),
//! an [`input`] layer mapping terminal events to game intents, and a
//! [`term`] layer that renders sessions through a framebuffer.

pub mod core;
pub mod input;
pub mod term;
pub mod types;
