//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are pure data structures with no external dependencies, making
//! them usable in any context (core logic, terminal rendering, tests).
//!
//! # Board Dimensions
//!
//! The default board is 6x6, row-major, row 0 at the top. Dimensions are
//! configurable at session construction; zero dimensions are a fatal
//! configuration error.
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SWAP_SETTLE_MS` | 200 | Pause after a swap (and after its revert) |
//! | `CASCADE_SETTLE_MS` | 400 | Pause after each cascade removal/refill |
//! | `TASK_BANNER_MS` | 2000 | Task success/failure banner hold |
//! | `DOUBLE_CLICK_MS` | 400 | Window for detecting a double click |
//!
//! # Match Rules
//!
//! - Runs of 3+ equal shapes match (horizontal or vertical).
//! - A run of exactly 4 spawns an arrow bonus tile.
//! - An L-shaped intersection of 5+ tiles spawns a star bonus tile.
//! - Each removed tile is worth `MATCH_POINTS_PER_TILE` points.

use std::fmt;

/// Default board width in cells.
pub const GRID_WIDTH: u8 = 6;

/// Default board height in cells.
pub const GRID_HEIGHT: u8 = 6;

/// Fixed timestep interval in milliseconds (16ms ~ 60 FPS).
pub const TICK_MS: u32 = 16;

/// Settle delay after applying (or reverting) a swap.
pub const SWAP_SETTLE_MS: u32 = 200;

/// Settle delay after each cascade removal and after each refill.
pub const CASCADE_SETTLE_MS: u32 = 400;

/// How long the task success/failure banner stays up before the next
/// task/board loads.
pub const TASK_BANNER_MS: u32 = 2000;

/// Maximum delay between two clicks on the same cell to count as a
/// double click (bonus activation).
pub const DOUBLE_CLICK_MS: u32 = 400;

/// Minimum run length that counts as a match.
pub const MIN_MATCH_LEN: usize = 3;

/// Exact run length that spawns an arrow bonus tile.
pub const ARROW_SPAWN_LEN: usize = 4;

/// Minimum union size for an L-shaped match (and its star bonus).
pub const STAR_MIN_UNION: usize = 5;

/// Points awarded per distinct tile removed in a cascade step.
pub const MATCH_POINTS_PER_TILE: u32 = 10;

/// Hard iteration cap when re-rolling matches out of a fresh board.
pub const INIT_MAX_ITERATIONS: u32 = 100;

/// Random-task collection target range (inclusive).
pub const RANDOM_TASK_COUNT: (u32, u32) = (8, 15);

/// Random-task move allotment range (inclusive).
pub const RANDOM_TASK_MOVES: (u32, u32) = (12, 20);

/// Per-tick interpolation factor for render positions.
pub const ANIM_LERP_FACTOR: f32 = 0.2;

/// The three matchable tile shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Square,
    Circle,
    Triangle,
}

impl ShapeKind {
    /// All shapes in type-index order.
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Square, ShapeKind::Circle, ShapeKind::Triangle];

    /// Number of distinct shapes.
    pub const COUNT: u32 = 3;

    /// Shape for a type index in `[0, COUNT)`, wrapping out-of-range values.
    pub fn from_index(index: u32) -> Self {
        Self::ALL[(index % Self::COUNT) as usize]
    }

    pub fn index(self) -> u32 {
        match self {
            ShapeKind::Square => 0,
            ShapeKind::Circle => 1,
            ShapeKind::Triangle => 2,
        }
    }

    /// Parse shape from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "square" => Some(ShapeKind::Square),
            "circle" => Some(ShapeKind::Circle),
            "triangle" => Some(ShapeKind::Triangle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Square => "square",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
        }
    }
}

/// Special activation effect carried by a bonus tile.
///
/// A tile with a bonus kind never participates in shape matching; its
/// `shape` field is meaningless for match detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BonusKind {
    /// Clears the tile's entire row on activation.
    HorizontalClear,
    /// Clears the tile's entire column on activation.
    VerticalClear,
    /// Swapped with a normal tile, clears every tile of that tile's shape.
    ColorClear,
}

/// A cell coordinate: `row` 0 at the top, `col` 0 at the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Grid adjacency: Manhattan distance 1, same row or same column.
    pub fn is_adjacent(self, other: Position) -> bool {
        let dr = (self.row as i16 - other.row as i16).abs();
        let dc = (self.col as i16 - other.col as i16).abs();
        dr + dc == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Run orientation of a detected match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
    LShaped,
}

/// A single board tile.
///
/// `x`/`y`/`target_x`/`target_y` are render positions in cell units and
/// never feed back into game decisions. `vanish_progress` runs 0..=1
/// while the tile animates out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub shape: ShapeKind,
    pub bonus: Option<BonusKind>,
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub vanishing: bool,
    pub vanish_progress: f32,
}

impl Tile {
    /// Create a tile resting at its cell.
    pub fn new(shape: ShapeKind, row: u8, col: u8) -> Self {
        Self {
            shape,
            bonus: None,
            x: col as f32,
            y: row as f32,
            target_x: col as f32,
            target_y: row as f32,
            vanishing: false,
            vanish_progress: 0.0,
        }
    }

    /// Create a refill tile entering from above the grid.
    pub fn falling(shape: ShapeKind, row: u8, col: u8) -> Self {
        Self {
            y: -1.0,
            ..Self::new(shape, row, col)
        }
    }

    /// Whether the tile can participate in match scanning.
    pub fn is_eligible(&self) -> bool {
        self.bonus.is_none() && !self.vanishing
    }

    /// Point the render animation at a new resting cell.
    pub fn retarget(&mut self, row: u8, col: u8) {
        self.target_x = col as f32;
        self.target_y = row as f32;
    }

    /// Whether render position or vanish animation is still in flight.
    pub fn is_animating(&self) -> bool {
        (self.vanishing && self.vanish_progress < 1.0)
            || (self.x - self.target_x).abs() > 0.01
            || (self.y - self.target_y).abs() > 0.01
    }
}

/// Errors raised by the game core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Invalid board dimensions at construction (fatal).
    InvalidDimensions { width: u8, height: u8 },
    /// Out-of-bounds cell access (programming error, fails fast).
    OutOfBounds { row: u8, col: u8 },
    /// Structural invariant violation after a mutation (fatal for the
    /// triggering operation).
    MalformedGrid(String),
    /// A cascade step expected a tile where there was none.
    MissingTile { row: u8, col: u8 },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {}x{}", width, height)
            }
            GameError::OutOfBounds { row, col } => {
                write!(f, "cell ({}, {}) is out of bounds", row, col)
            }
            GameError::MalformedGrid(reason) => write!(f, "malformed grid: {}", reason),
            GameError::MissingTile { row, col } => {
                write!(f, "expected a tile at ({}, {})", row, col)
            }
        }
    }
}

impl std::error::Error for GameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_index_roundtrip() {
        for shape in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_index(shape.index()), shape);
        }
        // Out-of-range indices wrap rather than panic.
        assert_eq!(ShapeKind::from_index(3), ShapeKind::Square);
    }

    #[test]
    fn shape_from_str_is_case_insensitive() {
        assert_eq!(ShapeKind::from_str("Circle"), Some(ShapeKind::Circle));
        assert_eq!(ShapeKind::from_str("SQUARE"), Some(ShapeKind::Square));
        assert_eq!(ShapeKind::from_str("hexagon"), None);
    }

    #[test]
    fn adjacency_is_orthogonal_distance_one() {
        let p = Position::new(2, 2);
        assert!(p.is_adjacent(Position::new(1, 2)));
        assert!(p.is_adjacent(Position::new(2, 3)));
        assert!(!p.is_adjacent(Position::new(3, 3))); // diagonal
        assert!(!p.is_adjacent(Position::new(2, 2))); // self
        assert!(!p.is_adjacent(Position::new(2, 4))); // distance 2
    }

    #[test]
    fn bonus_tile_is_never_eligible() {
        let mut tile = Tile::new(ShapeKind::Circle, 0, 0);
        assert!(tile.is_eligible());

        tile.bonus = Some(BonusKind::ColorClear);
        assert!(!tile.is_eligible());

        tile.bonus = None;
        tile.vanishing = true;
        assert!(!tile.is_eligible());
    }

    #[test]
    fn falling_tile_starts_above_the_grid() {
        let tile = Tile::falling(ShapeKind::Square, 3, 2);
        assert_eq!(tile.y, -1.0);
        assert_eq!(tile.target_y, 3.0);
        assert!(tile.is_animating());
    }
}
