//! End-to-end session tests: swap, cascade, tasks and scoring through
//! the public API, driven tick by tick.

use tui_match3::core::tasks::{Task, TaskOutcome, PREDEFINED_TASKS};
use tui_match3::core::{detect, GameSession, Grid, SimpleRng};
use tui_match3::types::{BonusKind, Position, ShapeKind, Tile, TASK_BANNER_MS};

fn grid_from(rows: &[&str]) -> Grid {
    let height = rows.len() as u8;
    let width = rows[0].len() as u8;
    let mut grid = Grid::new(width, height).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, ch) in row.chars().enumerate() {
            let shape = match ch {
                's' => ShapeKind::Square,
                'c' => ShapeKind::Circle,
                't' => ShapeKind::Triangle,
                other => panic!("unknown shape initial: {}", other),
            };
            grid.set(r as u8, c as u8, Some(Tile::new(shape, r as u8, c as u8)))
                .unwrap();
        }
    }
    grid
}

/// Quiet 6x6 board where swapping (1,1) and (2,1) lines up three
/// circles across row 2.
fn one_swap_board() -> Grid {
    grid_from(&[
        "ststst", //
        "sctsts", //
        "ctctst", //
        "tststs", //
        "ststst", //
        "tststs",
    ])
}

fn run_until_idle(session: &mut GameSession) {
    for _ in 0..4000 {
        if !session.is_processing() {
            return;
        }
        session.tick(16);
    }
    panic!("session never settled");
}

fn run_until_banner(session: &mut GameSession) -> TaskOutcome {
    for _ in 0..4000 {
        if let Some(outcome) = session.banner() {
            return outcome;
        }
        session.tick(16);
    }
    panic!("no banner appeared");
}

#[test]
fn fresh_sessions_are_deterministic_per_seed() {
    let a = GameSession::new(2024).unwrap();
    let b = GameSession::new(2024).unwrap();
    for row in 0..a.grid().height() {
        for col in 0..a.grid().width() {
            assert_eq!(
                a.grid().tile(row, col).unwrap().shape,
                b.grid().tile(row, col).unwrap().shape
            );
        }
    }
}

#[test]
fn non_adjacent_clicks_never_touch_grid_or_moves() {
    let mut session = GameSession::from_parts(
        one_swap_board(),
        SimpleRng::new(5),
        Task {
            shape: ShapeKind::Circle,
            count: 5,
            moves: 10,
        },
    );
    let before = session.grid().clone();

    session.click(Position::new(0, 0));
    session.click(Position::new(5, 5));
    session.click(Position::new(2, 2));

    assert_eq!(*session.grid(), before);
    assert_eq!(session.progress().moves_left, 10);
    assert!(!session.is_processing());
}

#[test]
fn reverted_swap_leaves_the_exact_pre_swap_grid() {
    let mut session = GameSession::from_parts(
        one_swap_board(),
        SimpleRng::new(5),
        Task {
            shape: ShapeKind::Circle,
            count: 5,
            moves: 10,
        },
    );
    let before: Vec<ShapeKind> = {
        let mut v = Vec::new();
        session.grid().for_each_cell(|_, t| v.push(t.unwrap().shape));
        v
    };

    // (0,0) <-> (0,1) creates nothing.
    session.click(Position::new(0, 0));
    session.click(Position::new(0, 1));
    run_until_idle(&mut session);

    let after: Vec<ShapeKind> = {
        let mut v = Vec::new();
        session.grid().for_each_cell(|_, t| v.push(t.unwrap().shape));
        v
    };
    assert_eq!(before, after);
    assert_eq!(session.progress().moves_left, 10);
}

#[test]
fn one_needed_circle_completes_the_task_and_banks_the_score() {
    let mut session = GameSession::from_parts(
        one_swap_board(),
        SimpleRng::new(5),
        Task {
            shape: ShapeKind::Circle,
            count: 1,
            moves: 10,
        },
    );

    session.click(Position::new(1, 1));
    session.click(Position::new(2, 1));

    let outcome = run_until_banner(&mut session);
    let TaskOutcome::Completed { awarded } = outcome else {
        panic!("expected completion, got {:?}", outcome);
    };
    // At least the planted run of three at 10 points apiece.
    assert!(awarded >= 30);

    for _ in 0..(TASK_BANNER_MS / 16 + 2) {
        session.tick(16);
    }
    assert!(!session.is_processing());
    assert!(session.total_score() >= 30);
    assert_eq!(*session.task(), PREDEFINED_TASKS[0]);
    assert!(session.grid().is_full());
    assert!(detect(session.grid()).is_none());
}

#[test]
fn running_out_of_moves_discards_the_task_score() {
    let mut session = GameSession::from_parts(
        one_swap_board(),
        SimpleRng::new(5),
        Task {
            shape: ShapeKind::Triangle,
            count: 50,
            moves: 1,
        },
    );

    session.click(Position::new(1, 1));
    session.click(Position::new(2, 1));

    assert_eq!(run_until_banner(&mut session), TaskOutcome::Failed);

    for _ in 0..(TASK_BANNER_MS / 16 + 2) {
        session.tick(16);
    }
    assert_eq!(session.total_score(), 0);
    assert_eq!(session.task().shape, ShapeKind::Triangle);
    assert_eq!(session.progress().moves_left, 1);
    assert!(session.grid().is_full());
}

#[test]
fn arrow_activation_runs_a_full_resolution_cycle() {
    let mut grid = one_swap_board();
    grid.tile_mut(3, 2).unwrap().bonus = Some(BonusKind::VerticalClear);
    let mut session = GameSession::from_parts(
        grid,
        SimpleRng::new(8),
        Task {
            shape: ShapeKind::Circle,
            count: 50,
            moves: 10,
        },
    );

    assert!(session.activate_bonus(Position::new(3, 2)));
    run_until_idle(&mut session);

    assert_eq!(session.progress().moves_left, 9);
    // The whole column was removed and refilled.
    assert!(session.grid().is_full());
    assert!(session.grid().validate().is_ok());
    // Column 2 held one circle, which counted toward the task.
    assert!(session.progress().collected >= 1);
    assert!(session.progress().task_score >= 60);
}
