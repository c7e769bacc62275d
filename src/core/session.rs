//! Session module - the playable game loop state machine
//!
//! A session owns the grid, the task deck and all scoring state, and
//! sequences cascade resolution through timed phases driven by
//! [`GameSession::tick`]. Input is accepted only while the phase is
//! `Idle`; everything between a swap and the board coming to rest is
//! "processing" and clicks are dropped.
//!
//! Phase flow:
//!
//! ```text
//! Idle -> SwapSettle -+-> Vanish -> Settle -+-> Idle
//!                     |        ^------------+   or TaskBanner -> Idle
//!                     +-> SwapRevert -> Idle
//! ```
//!
//! Grid failures mid-resolution are recorded via [`GameSession::last_error`]
//! and the session falls back to `Idle` so play can continue.

use crate::core::cascade::{self, BonusSpawn, StepDelta};
use crate::core::grid::Grid;
use crate::core::matches::{self, Match};
use crate::core::rng::SimpleRng;
use crate::core::tasks::{check_completion, Task, TaskDeck, TaskOutcome, TaskProgress};
use crate::types::{
    BonusKind, GameError, Position, ANIM_LERP_FACTOR, CASCADE_SETTLE_MS, GRID_HEIGHT, GRID_WIDTH,
    SWAP_SETTLE_MS, TASK_BANNER_MS,
};

/// Where the session currently is in the resolution cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// At rest; input is accepted.
    Idle,
    /// A swap was made; waiting before checking it for matches.
    SwapSettle {
        remaining_ms: u32,
        a: Position,
        b: Position,
    },
    /// A fruitless swap is animating back.
    SwapRevert { remaining_ms: u32 },
    /// Marked tiles are playing their vanish animation; `spawns` are the
    /// bonus tiles to place once the board refills.
    Vanish {
        remaining_ms: u32,
        spawns: Vec<BonusSpawn>,
    },
    /// Dropped and refilled; waiting before re-scanning for cascades.
    Settle { remaining_ms: u32 },
    /// Showing the task completed/failed banner before the next board.
    TaskBanner {
        remaining_ms: u32,
        outcome: TaskOutcome,
    },
}

/// A full game in progress.
#[derive(Debug, Clone)]
pub struct GameSession {
    grid: Grid,
    rng: SimpleRng,
    deck: TaskDeck,
    task: Task,
    progress: TaskProgress,
    total_score: u32,
    phase: Phase,
    selected: Option<Position>,
    last_error: Option<GameError>,
}

impl GameSession {
    /// Start a session on the standard board.
    pub fn new(seed: u32) -> Result<Self, GameError> {
        Self::with_dimensions(GRID_WIDTH, GRID_HEIGHT, seed)
    }

    /// Start a session on a board of the given size.
    pub fn with_dimensions(width: u8, height: u8, seed: u32) -> Result<Self, GameError> {
        let mut rng = SimpleRng::new(seed);
        let mut deck = TaskDeck::new();
        let task = deck.draw(&mut rng);
        let mut grid = Grid::filled_random(width, height, &mut rng)?;
        cascade::resolve_initial_matches(&mut grid, &mut rng)?;
        Ok(Self {
            progress: TaskProgress::for_task(&task),
            grid,
            rng,
            deck,
            task,
            total_score: 0,
            phase: Phase::Idle,
            selected: None,
            last_error: None,
        })
    }

    /// Assemble a session around a prepared board and task.
    ///
    /// Used by tests and scenario setups; the board is taken as-is, so
    /// it should already be match-free.
    pub fn from_parts(grid: Grid, rng: SimpleRng, task: Task) -> Self {
        Self {
            progress: TaskProgress::for_task(&task),
            grid,
            rng,
            deck: TaskDeck::new(),
            task,
            total_score: 0,
            phase: Phase::Idle,
            selected: None,
            last_error: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn progress(&self) -> &TaskProgress {
        &self.progress
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether input is currently ignored.
    pub fn is_processing(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// The banner to show, if the session is between tasks.
    pub fn banner(&self) -> Option<TaskOutcome> {
        match self.phase {
            Phase::TaskBanner { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// The most recent internal failure, if any. Sticky until taken.
    pub fn last_error(&self) -> Option<&GameError> {
        self.last_error.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<GameError> {
        self.last_error.take()
    }

    /// Handle a click on a cell: select, deselect, or swap with the
    /// current selection when adjacent. Ignored while processing.
    pub fn click(&mut self, pos: Position) {
        if self.is_processing() || !self.grid.in_bounds(pos.row, pos.col) {
            return;
        }
        match self.selected {
            None => self.selected = Some(pos),
            Some(sel) if sel == pos => self.selected = None,
            Some(sel) if sel.is_adjacent(pos) => {
                self.selected = None;
                if let Err(err) = self.begin_swap(sel, pos) {
                    self.fail(err);
                }
            }
            Some(_) => self.selected = Some(pos),
        }
    }

    /// Activate an arrow bonus tile in place (double-click). Returns
    /// whether anything happened. Stars never activate this way; they
    /// fire on swap.
    pub fn activate_bonus(&mut self, pos: Position) -> bool {
        if self.is_processing() || !self.grid.in_bounds(pos.row, pos.col) {
            return false;
        }
        let kind = match self.grid.peek(pos.row, pos.col).and_then(|t| t.bonus) {
            Some(kind @ (BonusKind::HorizontalClear | BonusKind::VerticalClear)) => kind,
            _ => return false,
        };
        self.selected = None;
        self.progress.moves_left -= 1;
        let targets = cascade::arrow_targets(&self.grid, pos, kind);
        let delta = cascade::mark_cells(&mut self.grid, &targets, self.task.shape);
        self.apply_delta(delta);
        self.phase = Phase::Vanish {
            remaining_ms: CASCADE_SETTLE_MS,
            spawns: Vec::new(),
        };
        true
    }

    /// Advance timers and animations by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.advance_animations(elapsed_ms);
        if let Err(err) = self.step_phase(elapsed_ms) {
            self.fail(err);
        }
    }

    /// Consume a move and start resolving a swap of two adjacent cells.
    ///
    /// The move is spent up front; a revert hands it back. A swap
    /// involving a star never exchanges the tiles: the star clears every
    /// tile of the other tile's shape, plus itself, right where it sits.
    fn begin_swap(&mut self, a: Position, b: Position) -> Result<(), GameError> {
        self.progress.moves_left -= 1;

        let a_star = self.grid.tile(a.row, a.col)?.bonus == Some(BonusKind::ColorClear);
        let b_star = self.grid.tile(b.row, b.col)?.bonus == Some(BonusKind::ColorClear);
        if a_star || b_star {
            let (star, other) = if a_star { (a, b) } else { (b, a) };
            let target = self.grid.tile(other.row, other.col)?.shape;
            let cells = cascade::star_targets(&self.grid, star, target);
            let delta = cascade::mark_cells(&mut self.grid, &cells, self.task.shape);
            self.apply_delta(delta);
            self.phase = Phase::Vanish {
                remaining_ms: CASCADE_SETTLE_MS,
                spawns: Vec::new(),
            };
        } else {
            self.grid.swap(a, b)?;
            self.phase = Phase::SwapSettle {
                remaining_ms: SWAP_SETTLE_MS,
                a,
                b,
            };
        }
        Ok(())
    }

    /// Mark one detection pass worth of matches and queue its bonuses.
    fn begin_cascade_step(&mut self, matches: &[Match]) -> Phase {
        let spawns = cascade::plan_bonuses(matches);
        let delta = cascade::mark_matches(&mut self.grid, matches, self.task.shape);
        self.apply_delta(delta);
        Phase::Vanish {
            remaining_ms: CASCADE_SETTLE_MS,
            spawns,
        }
    }

    fn apply_delta(&mut self, delta: StepDelta) {
        self.progress.collected += delta.collected;
        self.progress.task_score += delta.points();
    }

    fn fail(&mut self, err: GameError) {
        self.last_error = Some(err);
        self.phase = Phase::Idle;
    }

    fn step_phase(&mut self, elapsed_ms: u32) -> Result<(), GameError> {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        self.phase = match phase {
            Phase::Idle => Phase::Idle,

            Phase::SwapSettle { remaining_ms, a, b } => {
                if remaining_ms > elapsed_ms {
                    Phase::SwapSettle {
                        remaining_ms: remaining_ms - elapsed_ms,
                        a,
                        b,
                    }
                } else if let Some(matches) = matches::detect(&self.grid) {
                    self.begin_cascade_step(&matches)
                } else {
                    // Fruitless swap: put the tiles back, hand the move back.
                    self.grid.swap(a, b)?;
                    self.progress.moves_left += 1;
                    Phase::SwapRevert {
                        remaining_ms: SWAP_SETTLE_MS,
                    }
                }
            }

            Phase::SwapRevert { remaining_ms } => {
                if remaining_ms > elapsed_ms {
                    Phase::SwapRevert {
                        remaining_ms: remaining_ms - elapsed_ms,
                    }
                } else {
                    Phase::Idle
                }
            }

            Phase::Vanish {
                remaining_ms,
                spawns,
            } => {
                if remaining_ms > elapsed_ms {
                    Phase::Vanish {
                        remaining_ms: remaining_ms - elapsed_ms,
                        spawns,
                    }
                } else {
                    cascade::finalize_removals(&mut self.grid)?;
                    cascade::drop_tiles(&mut self.grid)?;
                    cascade::fill_board(&mut self.grid, &mut self.rng)?;
                    cascade::apply_bonus_spawns(&mut self.grid, &spawns)?;
                    Phase::Settle {
                        remaining_ms: CASCADE_SETTLE_MS,
                    }
                }
            }

            Phase::Settle { remaining_ms } => {
                if remaining_ms > elapsed_ms {
                    Phase::Settle {
                        remaining_ms: remaining_ms - elapsed_ms,
                    }
                } else if let Some(matches) = matches::detect(&self.grid) {
                    self.begin_cascade_step(&matches)
                } else {
                    match check_completion(&self.task, &self.progress) {
                        Some(outcome) => Phase::TaskBanner {
                            remaining_ms: TASK_BANNER_MS,
                            outcome,
                        },
                        None => Phase::Idle,
                    }
                }
            }

            Phase::TaskBanner {
                remaining_ms,
                outcome,
            } => {
                if remaining_ms > elapsed_ms {
                    Phase::TaskBanner {
                        remaining_ms: remaining_ms - elapsed_ms,
                        outcome,
                    }
                } else {
                    self.conclude_task(outcome)?;
                    Phase::Idle
                }
            }
        };
        Ok(())
    }

    /// Fold in (or discard) the task score, pick the next task, and deal
    /// a fresh board. A failed task is retried with a full move budget.
    fn conclude_task(&mut self, outcome: TaskOutcome) -> Result<(), GameError> {
        if let TaskOutcome::Completed { awarded } = outcome {
            self.total_score += awarded;
            self.task = self.deck.draw(&mut self.rng);
        }
        self.progress = TaskProgress::for_task(&self.task);
        self.selected = None;
        self.grid = Grid::filled_random(self.grid.width(), self.grid.height(), &mut self.rng)?;
        cascade::resolve_initial_matches(&mut self.grid, &mut self.rng)?;
        Ok(())
    }

    /// Ease every tile toward its target cell and advance vanish fades.
    fn advance_animations(&mut self, elapsed_ms: u32) {
        let fade = elapsed_ms as f32 / CASCADE_SETTLE_MS as f32;
        for row in 0..self.grid.height() {
            for col in 0..self.grid.width() {
                let Ok(Some(tile)) = self.grid.get_mut(row, col) else {
                    continue;
                };
                tile.x += (tile.target_x - tile.x) * ANIM_LERP_FACTOR;
                tile.y += (tile.target_y - tile.y) * ANIM_LERP_FACTOR;
                if (tile.target_x - tile.x).abs() < 0.01 {
                    tile.x = tile.target_x;
                }
                if (tile.target_y - tile.y).abs() < 0.01 {
                    tile.y = tile.target_y;
                }
                if tile.vanishing {
                    tile.vanish_progress = (tile.vanish_progress + fade).min(1.0);
                }
            }
        }
    }
}
