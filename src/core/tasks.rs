//! Task module - collection goals, move budgets and scoring
//!
//! Tasks come from a fixed ordered list first; once the list is
//! exhausted the deck hands out randomly generated tasks. Task score is
//! kept separate from the running total: it is folded in on success and
//! discarded on failure.

use crate::core::rng::SimpleRng;
use crate::types::{ShapeKind, RANDOM_TASK_COUNT, RANDOM_TASK_MOVES};

/// A collection task: gather `count` tiles of `shape` within `moves` moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub shape: ShapeKind,
    pub count: u32,
    pub moves: u32,
}

/// Fixed opening task list, ordered easy to hard.
pub const PREDEFINED_TASKS: [Task; 5] = [
    Task {
        shape: ShapeKind::Circle,
        count: 5,
        moves: 10,
    },
    Task {
        shape: ShapeKind::Square,
        count: 7,
        moves: 12,
    },
    Task {
        shape: ShapeKind::Triangle,
        count: 9,
        moves: 14,
    },
    Task {
        shape: ShapeKind::Circle,
        count: 11,
        moves: 15,
    },
    Task {
        shape: ShapeKind::Square,
        count: 12,
        moves: 16,
    },
];

/// Hands out tasks: the predefined list in order, then random ones.
#[derive(Debug, Clone)]
pub struct TaskDeck {
    next_index: usize,
}

impl TaskDeck {
    pub fn new() -> Self {
        Self { next_index: 0 }
    }

    /// How many tasks have been handed out so far.
    pub fn dealt(&self) -> usize {
        self.next_index
    }

    /// Draw the next task, generating a random one past the list end.
    pub fn draw(&mut self, rng: &mut SimpleRng) -> Task {
        let task = match PREDEFINED_TASKS.get(self.next_index) {
            Some(task) => *task,
            None => Task {
                shape: rng.next_shape(),
                count: rng.next_between(RANDOM_TASK_COUNT.0, RANDOM_TASK_COUNT.1),
                moves: rng.next_between(RANDOM_TASK_MOVES.0, RANDOM_TASK_MOVES.1),
            },
        };
        self.next_index += 1;
        task
    }
}

impl Default for TaskDeck {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-task progress; reset whenever a task loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskProgress {
    /// Target-shape tiles collected so far.
    pub collected: u32,
    /// Moves remaining; a move is consumed up front and refunded if the
    /// swap is reverted.
    pub moves_left: i32,
    /// Score earned during this task, pending success.
    pub task_score: u32,
}

impl TaskProgress {
    pub fn for_task(task: &Task) -> Self {
        Self {
            collected: 0,
            moves_left: task.moves as i32,
            task_score: 0,
        }
    }
}

/// Result of a completion check after a move fully resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Goal reached: `awarded` is the task score folded into the total.
    Completed { awarded: u32 },
    /// Out of moves with the goal unmet; the task score is discarded.
    Failed,
}

/// Decide whether the current task has just ended.
///
/// Completion wins over failure when both hold on the same move.
pub fn check_completion(task: &Task, progress: &TaskProgress) -> Option<TaskOutcome> {
    if progress.collected >= task.count {
        Some(TaskOutcome::Completed {
            awarded: progress.task_score,
        })
    } else if progress.moves_left <= 0 {
        Some(TaskOutcome::Failed)
    } else {
        None
    }
}
