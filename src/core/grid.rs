//! Grid module - the rectangular tile container
//!
//! Row-major storage of `Option<Tile>`, row 0 at the top. Cells are only
//! ever empty transiently, mid-cascade; at rest every cell holds a tile.
//! Out-of-bounds access is a programming error and fails fast with
//! `GameError::OutOfBounds` rather than silently doing nothing.

use crate::core::rng::SimpleRng;
use crate::types::{GameError, Position, Tile};

/// The game board - a `width` x `height` grid of optional tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat cell storage, row-major (row * width + col).
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Create an empty grid.
    ///
    /// Zero dimensions are a fatal configuration error.
    pub fn new(width: u8, height: u8) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        })
    }

    /// Create a grid with every cell holding a uniformly random tile.
    ///
    /// Callers that need a match-free board should follow up with
    /// [`crate::core::cascade::resolve_initial_matches`].
    pub fn filled_random(width: u8, height: u8, rng: &mut SimpleRng) -> Result<Self, GameError> {
        let mut grid = Self::new(width, height)?;
        for row in 0..height {
            for col in 0..width {
                grid.set(row, col, Some(Tile::new(rng.next_shape(), row, col)))?;
            }
        }
        grid.validate()?;
        Ok(grid)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline(always)]
    fn index(&self, row: u8, col: u8) -> Result<usize, GameError> {
        if row >= self.height || col >= self.width {
            return Err(GameError::OutOfBounds { row, col });
        }
        Ok(row as usize * self.width as usize + col as usize)
    }

    pub fn in_bounds(&self, row: u8, col: u8) -> bool {
        row < self.height && col < self.width
    }

    /// Get the cell at (row, col); fails fast out of bounds.
    pub fn get(&self, row: u8, col: u8) -> Result<Option<&Tile>, GameError> {
        Ok(self.cells[self.index(row, col)?].as_ref())
    }

    pub fn get_mut(&mut self, row: u8, col: u8) -> Result<Option<&mut Tile>, GameError> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx].as_mut())
    }

    /// Set (or clear) the cell at (row, col).
    pub fn set(&mut self, row: u8, col: u8, tile: Option<Tile>) -> Result<(), GameError> {
        let idx = self.index(row, col)?;
        self.cells[idx] = tile;
        Ok(())
    }

    /// Remove and return the tile at (row, col).
    pub fn take(&mut self, row: u8, col: u8) -> Result<Option<Tile>, GameError> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx].take())
    }

    /// The tile at (row, col), or `MissingTile` if the cell is empty.
    pub fn tile(&self, row: u8, col: u8) -> Result<&Tile, GameError> {
        self.get(row, col)?.ok_or(GameError::MissingTile { row, col })
    }

    pub fn tile_mut(&mut self, row: u8, col: u8) -> Result<&mut Tile, GameError> {
        self.get_mut(row, col)?
            .ok_or(GameError::MissingTile { row, col })
    }

    /// Non-failing lookup for scan loops: `None` when out of bounds or empty.
    pub fn peek(&self, row: u8, col: u8) -> Option<&Tile> {
        if !self.in_bounds(row, col) {
            return None;
        }
        self.cells[row as usize * self.width as usize + col as usize].as_ref()
    }

    /// Exchange two cells and retarget both tiles' render animations.
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), GameError> {
        let ia = self.index(a.row, a.col)?;
        let ib = self.index(b.row, b.col)?;
        self.cells.swap(ia, ib);
        if let Some(tile) = self.cells[ia].as_mut() {
            tile.retarget(a.row, a.col);
        }
        if let Some(tile) = self.cells[ib].as_mut() {
            tile.retarget(b.row, b.col);
        }
        self.validate()
    }

    /// Visit every cell in row-major order.
    pub fn for_each_cell(&self, mut f: impl FnMut(Position, Option<&Tile>)) {
        for row in 0..self.height {
            for col in 0..self.width {
                let idx = row as usize * self.width as usize + col as usize;
                f(Position::new(row, col), self.cells[idx].as_ref());
            }
        }
    }

    /// Assert structural well-formedness.
    ///
    /// A violation here means the grid is corrupt and every downstream
    /// cascade would misbehave, so callers treat it as fatal for the
    /// triggering operation.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::MalformedGrid(format!(
                "dimensions degenerated to {}x{}",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize;
        if self.cells.len() != expected {
            return Err(GameError::MalformedGrid(format!(
                "cell storage holds {} cells, expected {}",
                self.cells.len(),
                expected
            )));
        }
        for (idx, cell) in self.cells.iter().enumerate() {
            if let Some(tile) = cell {
                if !(0.0..=1.0).contains(&tile.vanish_progress) {
                    let row = idx / self.width as usize;
                    let col = idx % self.width as usize;
                    return Err(GameError::MalformedGrid(format!(
                        "tile at ({}, {}) has vanish progress {}",
                        row, col, tile.vanish_progress
                    )));
                }
            }
        }
        Ok(())
    }

    /// Whether every cell holds a tile (the at-rest invariant).
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Whether any tile still has a pending render animation.
    pub fn has_pending_animation(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .any(|tile| tile.is_animating())
    }
}
