//! Cascade module - remove/collapse/refill machinery and bonus spawns
//!
//! These are the building blocks the session's phase machine sequences:
//! plan bonus spawns from a match list, mark tiles as vanishing (counting
//! score and collection), finalize removals, drop survivors, refill from
//! above, and re-roll matches out of a fresh board.
//!
//! Everything here mutates the grid synchronously; the settle delays
//! between steps live in the session, not here.

use crate::core::grid::Grid;
use crate::core::matches::Match;
use crate::core::rng::SimpleRng;
use crate::types::{
    BonusKind, GameError, Orientation, Position, ShapeKind, Tile, ARROW_SPAWN_LEN,
    INIT_MAX_ITERATIONS, MATCH_POINTS_PER_TILE, STAR_MIN_UNION,
};

/// A bonus tile placement queued for after drop/refill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusSpawn {
    pub pos: Position,
    pub kind: BonusKind,
}

/// Removal/collection counts for one cascade step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepDelta {
    /// Distinct tiles newly marked vanishing this step.
    pub removed: u32,
    /// Removed tiles matching the task shape (bonus tiles never count).
    pub collected: u32,
}

impl StepDelta {
    /// Score contribution of this step.
    pub fn points(&self) -> u32 {
        self.removed * MATCH_POINTS_PER_TILE
    }

    fn absorb(&mut self, other: StepDelta) {
        self.removed += other.removed;
        self.collected += other.collected;
    }
}

/// Decide bonus spawns for a match list.
///
/// A run of exactly 4 spawns an arrow at the run's extreme cell: highest
/// row for a vertical run (horizontal-clear arrow), highest column for a
/// horizontal run (vertical-clear arrow). An L-shaped union of 5+ spawns
/// a star at its intersection, capped at one star per step; the first
/// qualifying L in scan order wins.
pub fn plan_bonuses(matches: &[Match]) -> Vec<BonusSpawn> {
    let mut spawns = Vec::new();
    let mut star_placed = false;

    for m in matches {
        match m.orientation {
            Orientation::Vertical if m.len() == ARROW_SPAWN_LEN => {
                if let Some(pos) = m.positions.iter().max_by_key(|p| p.row) {
                    spawns.push(BonusSpawn {
                        pos: *pos,
                        kind: BonusKind::HorizontalClear,
                    });
                }
            }
            Orientation::Horizontal if m.len() == ARROW_SPAWN_LEN => {
                if let Some(pos) = m.positions.iter().max_by_key(|p| p.col) {
                    spawns.push(BonusSpawn {
                        pos: *pos,
                        kind: BonusKind::VerticalClear,
                    });
                }
            }
            Orientation::LShaped if m.len() >= STAR_MIN_UNION && !star_placed => {
                if let Some(pos) = m.intersection {
                    spawns.push(BonusSpawn {
                        pos,
                        kind: BonusKind::ColorClear,
                    });
                    star_placed = true;
                }
            }
            _ => {}
        }
    }

    spawns
}

fn mark_cell(grid: &mut Grid, pos: Position, target: ShapeKind, delta: &mut StepDelta) {
    let Some(tile) = grid
        .get_mut(pos.row, pos.col)
        .ok()
        .flatten()
        .filter(|tile| !tile.vanishing)
    else {
        return;
    };
    tile.vanishing = true;
    tile.vanish_progress = 0.0;
    delta.removed += 1;
    if tile.shape == target && tile.bonus.is_none() {
        delta.collected += 1;
    }
}

/// Mark every match position as vanishing.
///
/// Overlapping matches in the same list cannot double-count: the first
/// mark makes the tile ineligible for a second one.
pub fn mark_matches(grid: &mut Grid, matches: &[Match], target: ShapeKind) -> StepDelta {
    let mut delta = StepDelta::default();
    for m in matches {
        let mut match_delta = StepDelta::default();
        for &pos in &m.positions {
            mark_cell(grid, pos, target, &mut match_delta);
        }
        delta.absorb(match_delta);
    }
    delta
}

/// Mark an explicit cell list as vanishing (arrow and star activations).
pub fn mark_cells(grid: &mut Grid, cells: &[Position], target: ShapeKind) -> StepDelta {
    let mut delta = StepDelta::default();
    for &pos in cells {
        mark_cell(grid, pos, target, &mut delta);
    }
    delta
}

/// Cells cleared by activating an arrow bonus at `pos`: the full row for
/// a horizontal-clear, the full column for a vertical-clear. Tiles
/// already mid-vanish are skipped.
pub fn arrow_targets(grid: &Grid, pos: Position, kind: BonusKind) -> Vec<Position> {
    let mut targets = Vec::new();
    match kind {
        BonusKind::HorizontalClear => {
            for col in 0..grid.width() {
                if grid.peek(pos.row, col).is_some_and(|t| !t.vanishing) {
                    targets.push(Position::new(pos.row, col));
                }
            }
        }
        BonusKind::VerticalClear => {
            for row in 0..grid.height() {
                if grid.peek(row, pos.col).is_some_and(|t| !t.vanishing) {
                    targets.push(Position::new(row, pos.col));
                }
            }
        }
        BonusKind::ColorClear => {}
    }
    targets
}

/// Cells cleared by a star swap: every tile of the target shape plus the
/// star's own cell.
pub fn star_targets(grid: &Grid, star: Position, target: ShapeKind) -> Vec<Position> {
    let mut targets = Vec::new();
    grid.for_each_cell(|pos, tile| {
        if let Some(tile) = tile {
            if tile.shape == target && !tile.vanishing {
                targets.push(pos);
            }
        }
    });
    if !targets.contains(&star) {
        targets.push(star);
    }
    targets
}

/// Empty every vanishing cell. Returns how many were removed.
pub fn finalize_removals(grid: &mut Grid) -> Result<u32, GameError> {
    let mut cleared = Vec::new();
    grid.for_each_cell(|pos, tile| {
        if tile.is_some_and(|t| t.vanishing) {
            cleared.push(pos);
        }
    });
    for pos in &cleared {
        grid.set(pos.row, pos.col, None)?;
    }
    Ok(cleared.len() as u32)
}

/// Compact each column downward, preserving the survivors' relative
/// order. Moved tiles get a new animation target; their render position
/// is left where it was so the drop animates.
pub fn drop_tiles(grid: &mut Grid) -> Result<(), GameError> {
    for col in 0..grid.width() {
        let mut write_row = grid.height();
        for row in (0..grid.height()).rev() {
            if grid.get(row, col)?.is_some() {
                write_row -= 1;
                if write_row != row {
                    let mut tile = grid
                        .take(row, col)?
                        .ok_or(GameError::MissingTile { row, col })?;
                    tile.retarget(write_row, col);
                    grid.set(write_row, col, Some(tile))?;
                }
            }
        }
    }
    grid.validate()
}

/// Fill every empty cell with a fresh random tile entering from above.
pub fn fill_board(grid: &mut Grid, rng: &mut SimpleRng) -> Result<(), GameError> {
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            if grid.get(row, col)?.is_none() {
                grid.set(row, col, Some(Tile::falling(rng.next_shape(), row, col)))?;
            }
        }
    }
    grid.validate()
}

/// Place queued bonus tiles, overwriting whatever refill landed there.
///
/// The bonus tile's shape is reset to index 0; it is non-matchable by
/// shape from here on.
pub fn apply_bonus_spawns(grid: &mut Grid, spawns: &[BonusSpawn]) -> Result<(), GameError> {
    for spawn in spawns {
        let tile = grid.tile_mut(spawn.pos.row, spawn.pos.col)?;
        tile.bonus = Some(spawn.kind);
        tile.shape = ShapeKind::from_index(0);
        tile.vanishing = false;
        tile.vanish_progress = 0.0;
    }
    grid.validate()
}

/// Re-roll only the matched tiles, in place, until no match remains or
/// the iteration cap is hit. Unlike in-game resolution this never drops
/// or refills, so tile positions are undisturbed. Returns the number of
/// iterations used.
pub fn resolve_initial_matches(grid: &mut Grid, rng: &mut SimpleRng) -> Result<u32, GameError> {
    let mut iterations = 0;
    while iterations < INIT_MAX_ITERATIONS {
        let Some(matches) = crate::core::matches::detect(grid) else {
            break;
        };
        for m in &matches {
            for pos in &m.positions {
                let tile = grid.tile_mut(pos.row, pos.col)?;
                tile.shape = rng.next_shape();
                tile.bonus = None;
            }
        }
        grid.validate()?;
        iterations += 1;
    }
    Ok(iterations)
}
