//! Core game logic - pure, deterministic, and free of terminal concerns
//!
//! Everything in here is synchronous state manipulation driven by
//! [`session::GameSession::tick`]; rendering and input live elsewhere.

pub mod cascade;
pub mod grid;
pub mod matches;
pub mod rng;
pub mod session;
pub mod tasks;

pub use cascade::{BonusSpawn, StepDelta};
pub use grid::Grid;
pub use matches::{detect, Match};
pub use rng::SimpleRng;
pub use session::{GameSession, Phase};
pub use tasks::{Task, TaskDeck, TaskOutcome, TaskProgress, PREDEFINED_TASKS};
