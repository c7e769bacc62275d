//! Match detector - pure scan of the grid for runs and intersections
//!
//! Three passes in a fixed order: horizontal runs (rows top to bottom),
//! vertical runs (columns left to right), then L-shaped intersections
//! (every cell, both axes extended in both directions). Only eligible
//! tiles participate: a tile carrying a bonus kind or mid-vanish never
//! matches by shape.
//!
//! L-shaped matches are detected independently per cell and may overlap
//! each other and the straight runs; no dedup happens here. The scan
//! order is what gives bonus placement its "first one wins" priority.

use crate::core::grid::Grid;
use crate::types::{Orientation, Position, ShapeKind, MIN_MATCH_LEN, STAR_MIN_UNION};

/// A detected match. Ephemeral: produced fresh each detection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Cells in the match, in scan order (L-shaped: horizontal arm first,
    /// then the vertical arm minus the shared cells).
    pub positions: Vec<Position>,
    pub orientation: Orientation,
    pub shape: ShapeKind,
    /// Crossing cell of an L-shaped match.
    pub intersection: Option<Position>,
}

impl Match {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Shape of an eligible tile, or `None` for empty/bonus/vanishing cells.
fn eligible_shape(grid: &Grid, row: u8, col: u8) -> Option<ShapeKind> {
    grid.peek(row, col)
        .filter(|tile| tile.is_eligible())
        .map(|tile| tile.shape)
}

/// Scan the grid for matches.
///
/// Returns `None` when no match of any kind exists; the resolution loop
/// uses that as its termination signal.
pub fn detect(grid: &Grid) -> Option<Vec<Match>> {
    let mut matches = Vec::new();

    // Horizontal runs.
    for row in 0..grid.height() {
        let mut col = 0;
        while col < grid.width() {
            let Some(shape) = eligible_shape(grid, row, col) else {
                col += 1;
                continue;
            };
            let mut run = vec![Position::new(row, col)];
            let mut next = col + 1;
            while next < grid.width() && eligible_shape(grid, row, next) == Some(shape) {
                run.push(Position::new(row, next));
                next += 1;
            }
            if run.len() >= MIN_MATCH_LEN {
                matches.push(Match {
                    positions: run,
                    orientation: Orientation::Horizontal,
                    shape,
                    intersection: None,
                });
            }
            col = next;
        }
    }

    // Vertical runs.
    for col in 0..grid.width() {
        let mut row = 0;
        while row < grid.height() {
            let Some(shape) = eligible_shape(grid, row, col) else {
                row += 1;
                continue;
            };
            let mut run = vec![Position::new(row, col)];
            let mut next = row + 1;
            while next < grid.height() && eligible_shape(grid, next, col) == Some(shape) {
                run.push(Position::new(next, col));
                next += 1;
            }
            if run.len() >= MIN_MATCH_LEN {
                matches.push(Match {
                    positions: run,
                    orientation: Orientation::Vertical,
                    shape,
                    intersection: None,
                });
            }
            row = next;
        }
    }

    // L-shaped intersections: extend both arms through every eligible
    // cell, in both directions, counting the cell itself in each arm.
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let Some(shape) = eligible_shape(grid, row, col) else {
                continue;
            };
            let center = Position::new(row, col);

            let mut h_arm = vec![center];
            for c in (col + 1)..grid.width() {
                if eligible_shape(grid, row, c) != Some(shape) {
                    break;
                }
                h_arm.push(Position::new(row, c));
            }
            for c in (0..col).rev() {
                if eligible_shape(grid, row, c) != Some(shape) {
                    break;
                }
                h_arm.push(Position::new(row, c));
            }

            let mut v_arm = vec![center];
            for r in (row + 1)..grid.height() {
                if eligible_shape(grid, r, col) != Some(shape) {
                    break;
                }
                v_arm.push(Position::new(r, col));
            }
            for r in (0..row).rev() {
                if eligible_shape(grid, r, col) != Some(shape) {
                    break;
                }
                v_arm.push(Position::new(r, col));
            }

            if h_arm.len() >= MIN_MATCH_LEN && v_arm.len() >= MIN_MATCH_LEN {
                let mut positions = h_arm;
                for p in v_arm {
                    if !positions.contains(&p) {
                        positions.push(p);
                    }
                }
                if positions.len() >= STAR_MIN_UNION {
                    matches.push(Match {
                        positions,
                        orientation: Orientation::LShaped,
                        shape,
                        intersection: Some(center),
                    });
                }
            }
        }
    }

    if matches.is_empty() {
        None
    } else {
        Some(matches)
    }
}
